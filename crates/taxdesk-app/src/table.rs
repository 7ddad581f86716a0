//! Table view model: column declarations and client-side country filtering.
//!
//! The view model owns no data beyond the filter set and the filter popover;
//! visible rows are derived on demand from (fetched data, filter).

use std::collections::BTreeSet;

use taxdesk_core::EnrichedTaxRecord;

use crate::popover::Popover;

/// What a column renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Customer name.
    Entity,
    Gender,
    RequestDate,
    /// Carries the country filter popover in its header.
    Country,
    /// Not bound to any record field; raises edit-requested events.
    Actions,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub kind: ColumnKind,
}

/// Column declarations, in render order.
pub const fn columns() -> [Column; 5] {
    [
        Column {
            header: "Entity",
            kind: ColumnKind::Entity,
        },
        Column {
            header: "Gender",
            kind: ColumnKind::Gender,
        },
        Column {
            header: "Request date",
            kind: ColumnKind::RequestDate,
        },
        Column {
            header: "Country",
            kind: ColumnKind::Country,
        },
        Column {
            header: "",
            kind: ColumnKind::Actions,
        },
    ]
}

/// Event raised by the Actions column, carrying the full enriched record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    EditRequested(EnrichedTaxRecord),
}

/// Country filter plus filter-popover state for the records table.
#[derive(Debug, Default)]
pub struct TableView {
    filter: BTreeSet<String>,
    pub filter_popover: Popover,
}

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected countries. Empty means "show all".
    pub fn filter(&self) -> &BTreeSet<String> {
        &self.filter
    }

    /// Add `country` to the filter if absent, remove it if present. No limit
    /// on how many countries are selected at once.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.filter.remove(country) {
            self.filter.insert(country.to_string());
        }
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
    }

    /// Rows to render: all of `data` when the filter is empty, otherwise
    /// exactly the rows whose country is selected. Pure and synchronous over
    /// the fetched page; nothing is filtered server-side.
    pub fn visible_rows<'a>(&self, data: &'a [EnrichedTaxRecord]) -> Vec<&'a EnrichedTaxRecord> {
        if self.filter.is_empty() {
            return data.iter().collect();
        }
        data.iter()
            .filter(|row| self.filter.contains(row.country()))
            .collect()
    }

    /// Invoke the Actions column on a visible row.
    pub fn request_edit(
        &self,
        data: &[EnrichedTaxRecord],
        row: usize,
    ) -> Option<TableEvent> {
        let visible = self.visible_rows(data);
        visible
            .get(row)
            .map(|record| TableEvent::EditRequested((*record).clone()))
    }
}

#[cfg(test)]
mod tests {
    use taxdesk_core::{Gender, REQUEST_DATE, TaxRecord};

    use super::*;

    fn row(id: &str, name: &str, country: &str) -> EnrichedTaxRecord {
        EnrichedTaxRecord {
            record: TaxRecord {
                id: id.into(),
                created_at: "t0".into(),
                name: name.into(),
                avatar: None,
                country: country.into(),
            },
            gender: Gender::Female,
            request_date: REQUEST_DATE,
        }
    }

    fn sample() -> Vec<EnrichedTaxRecord> {
        vec![
            row("1", "Alice", "France"),
            row("2", "Bob", "Germany"),
            row("3", "Carol", "France"),
            row("4", "Dave", "Spain"),
        ]
    }

    #[test]
    fn empty_filter_shows_all_rows() {
        let table = TableView::new();
        let data = sample();
        let visible = table.visible_rows(&data);
        assert_eq!(visible.len(), data.len());
    }

    #[test]
    fn filter_keeps_only_selected_countries() {
        let mut table = TableView::new();
        let data = sample();
        table.toggle_country("France");
        let visible = table.visible_rows(&data);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|r| r.country() == "France"));

        table.toggle_country("Spain");
        let visible = table.visible_rows(&data);
        assert_eq!(visible.len(), 3);
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut table = TableView::new();
        let data = sample();
        table.toggle_country("Germany");
        let once: Vec<&EnrichedTaxRecord> = table.visible_rows(&data);
        let again: Vec<&EnrichedTaxRecord> = table.visible_rows(&data);
        assert_eq!(once, again);
    }

    #[test]
    fn toggling_twice_restores_the_filter_set() {
        let mut table = TableView::new();
        table.toggle_country("France");
        let before = table.filter().clone();
        table.toggle_country("Germany");
        table.toggle_country("Germany");
        assert_eq!(*table.filter(), before);
    }

    #[test]
    fn no_matching_country_yields_zero_rows() {
        let mut table = TableView::new();
        let data = sample();
        table.toggle_country("Japan");
        assert!(table.visible_rows(&data).is_empty());
        table.clear_filter();
        assert_eq!(table.visible_rows(&data).len(), data.len());
    }

    #[test]
    fn edit_request_carries_the_full_record() {
        let mut table = TableView::new();
        let data = sample();
        table.toggle_country("Germany");
        match table.request_edit(&data, 0) {
            Some(TableEvent::EditRequested(record)) => {
                assert_eq!(record.id(), "2");
                assert_eq!(record.name(), "Bob");
            }
            None => panic!("expected an edit-requested event"),
        }
        assert!(table.request_edit(&data, 5).is_none());
    }

    #[test]
    fn column_declarations_in_render_order() {
        let cols = columns();
        assert_eq!(cols[0].header, "Entity");
        assert_eq!(cols[3].kind, ColumnKind::Country);
        assert_eq!(cols[4].header, "");
        assert_eq!(cols[4].kind, ColumnKind::Actions);
    }
}
