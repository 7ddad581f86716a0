//! Edit form controller: transient edit-session state.
//!
//! Closed → Open(prefilled) → Saving → Closed on success; a validation
//! failure keeps the form open. Cancel discards everything with no side
//! effects.

use taxdesk_core::{EnrichedTaxRecord, RecordPatch};
use thiserror::Error;

use crate::popover::Popover;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,

    #[error("no open edit session")]
    SessionNotOpen,
}

/// Editable state while the form is open. The record itself is a read-only
/// snapshot; only `name` and `country` can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub record: EnrichedTaxRecord,
    pub name: String,
    pub country: String,
    pub country_picker: Popover,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSession {
    Closed,
    Open(EditForm),
    Saving(EditForm),
}

/// The update to submit, produced by a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub id: String,
    pub patch: RecordPatch,
}

/// Owns the edit session for the currently selected record, if any.
#[derive(Debug, Default)]
pub struct EditController {
    session: EditSession,
}

impl Default for EditSession {
    fn default() -> Self {
        EditSession::Closed
    }
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.session, EditSession::Closed)
    }

    /// Open the form prefilled from `record`. Replaces any existing session.
    pub fn open(&mut self, record: EnrichedTaxRecord) {
        let name = record.name().to_string();
        let country = record.country().to_string();
        self.session = EditSession::Open(EditForm {
            record,
            name,
            country,
            country_picker: Popover::default(),
        });
    }

    /// Discard edits and close. No side effects.
    pub fn cancel(&mut self) {
        self.session = EditSession::Closed;
    }

    pub fn form(&self) -> Option<&EditForm> {
        match &self.session {
            EditSession::Open(form) | EditSession::Saving(form) => Some(form),
            EditSession::Closed => None,
        }
    }

    fn form_mut(&mut self) -> Option<&mut EditForm> {
        match &mut self.session {
            EditSession::Open(form) => Some(form),
            _ => None,
        }
    }

    pub fn set_name(&mut self, name: &str) {
        if let Some(form) = self.form_mut() {
            form.name = name.to_string();
        }
    }

    /// Pick a country from the options list and close the picker. Countries
    /// are never free text; the caller offers only values returned by the
    /// countries query.
    pub fn select_country(&mut self, country: &str) {
        if let Some(form) = self.form_mut() {
            form.country = country.to_string();
            form.country_picker.dismiss();
        }
    }

    pub fn toggle_country_picker(&mut self) {
        if let Some(form) = self.form_mut() {
            form.country_picker.toggle();
        }
    }

    /// A click lands inside or outside the open country picker. Outside
    /// dismisses it without changing the selected country.
    pub fn click_country_picker(&mut self, inside: bool) {
        if let Some(form) = self.form_mut() {
            form.country_picker.click(inside);
        }
    }

    /// Validate the form and transition Open → Saving.
    ///
    /// An empty name fails validation and the form stays open. On success the
    /// returned [`SaveRequest`] carries the full name/country patch for the
    /// snapshot record.
    pub fn begin_save(&mut self) -> Result<SaveRequest, ValidationError> {
        let form = match &self.session {
            EditSession::Open(form) => form.clone(),
            _ => return Err(ValidationError::SessionNotOpen),
        };
        if form.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let request = SaveRequest {
            id: form.record.id().to_string(),
            patch: RecordPatch {
                name: Some(form.name.clone()),
                country: Some(form.country.clone()),
            },
        };
        self.session = EditSession::Saving(form);
        Ok(request)
    }

    /// The submitted update settled (either way); close the session.
    pub fn save_finished(&mut self) {
        self.session = EditSession::Closed;
    }
}
