//! Root composition: wires the store, query cache, table, and edit form.
//!
//! The app owns the query client and the last data snapshots; everything the
//! UI shows is derived from them via [`App::view`]. Edits flow table →
//! edit controller → mutation → invalidation → refetch.

use std::sync::Arc;

use futures::future;
use taxdesk_client::{ApiError, RecordStore};
use taxdesk_core::{EnrichedTaxRecord, enrich};
use taxdesk_query::{QueryClient, QueryError, QueryKey};
use tracing::{info, warn};

use crate::edit::{EditController, ValidationError};
use crate::table::{TableEvent, TableView};

pub const TAXES_QUERY: QueryKey = QueryKey("taxes");
pub const COUNTRIES_QUERY: QueryKey = QueryKey("countries");

/// What the root renders, derived from the records query.
#[derive(Debug)]
pub enum View<'a> {
    /// Records query has no data yet and is still settling.
    Loading,
    /// Latest records fetch failed with no previous success cached.
    LoadFailed,
    Table {
        rows: Vec<&'a EnrichedTaxRecord>,
    },
}

/// How a submitted edit settled. A failed update is returned as data, logged,
/// and otherwise kept off the screen (fire-and-forget, as the baseline
/// behaves); no invalidation happens on failure.
#[derive(Debug)]
pub enum SaveOutcome {
    Saved,
    Failed(ApiError),
}

pub struct App<S: RecordStore> {
    store: Arc<S>,
    queries: Arc<QueryClient>,
    pub table: TableView,
    pub edit: EditController,
    records: Option<Arc<Vec<EnrichedTaxRecord>>>,
    records_error: Option<QueryError>,
    countries: Arc<Vec<String>>,
}

impl<S: RecordStore> App<S> {
    pub fn new(store: Arc<S>, queries: Arc<QueryClient>) -> Self {
        Self {
            store,
            queries,
            table: TableView::new(),
            edit: EditController::new(),
            records: None,
            records_error: None,
            countries: Arc::new(Vec::new()),
        }
    }

    /// Initial load: records and countries fetch independently and may settle
    /// in any order. A countries failure leaves the filter/picker options
    /// empty without blocking the table.
    pub async fn load(&mut self) {
        let (records, countries) = future::join(
            Self::fetch_records(&self.store, &self.queries),
            Self::fetch_countries(&self.store, &self.queries),
        )
        .await;
        self.apply_records(records);
        self.apply_countries(countries);
    }

    pub async fn load_records(&mut self) {
        let result = Self::fetch_records(&self.store, &self.queries).await;
        self.apply_records(result);
    }

    /// React to a stale records query: refetch if invalidated, otherwise do
    /// nothing. This is the observer half of the invalidation contract.
    pub async fn observe_records(&mut self) {
        if self.queries.snapshot(TAXES_QUERY).stale {
            self.load_records().await;
        }
    }

    /// Drop the cached records and fetch again.
    pub async fn refresh(&mut self) {
        self.queries.invalidate(TAXES_QUERY);
        self.observe_records().await;
    }

    /// Country options for the filter popover and the edit form picker.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn records(&self) -> Option<&[EnrichedTaxRecord]> {
        self.records.as_deref().map(Vec::as_slice)
    }

    /// Derive the current root view from the records query state.
    pub fn view(&self) -> View<'_> {
        match (&self.records, &self.records_error) {
            (Some(records), _) => View::Table {
                rows: self.table.visible_rows(records),
            },
            (None, Some(_)) => View::LoadFailed,
            (None, None) => View::Loading,
        }
    }

    /// Open the edit form for the given visible row, prefilled from it.
    pub fn request_edit(&mut self, row: usize) -> bool {
        let Some(records) = self.records.clone() else {
            return false;
        };
        match self.table.request_edit(&records, row) {
            Some(TableEvent::EditRequested(record)) => {
                self.edit.open(record);
                true
            }
            None => false,
        }
    }

    /// Submit the open edit form.
    ///
    /// Validation failure keeps the form open. A valid form issues the
    /// update; on success the records query is invalidated and refetched, so
    /// the table re-synchronizes from the store (all genders are redrawn, not
    /// just the edited row's).
    pub async fn save(&mut self) -> Result<SaveOutcome, ValidationError> {
        let request = self.edit.begin_save()?;
        let store = self.store.clone();
        let result = self
            .queries
            .mutate(move || async move { store.update_record(&request.id, request.patch).await })
            .await;
        self.edit.save_finished();
        match result {
            Ok(record) => {
                info!(id = %record.id, "record updated");
                self.queries.invalidate(TAXES_QUERY);
                self.observe_records().await;
                Ok(SaveOutcome::Saved)
            }
            Err(err) => {
                warn!(error = %err, "record update failed");
                Ok(SaveOutcome::Failed(err))
            }
        }
    }

    async fn fetch_records(
        store: &Arc<S>,
        queries: &QueryClient,
    ) -> Result<Arc<Vec<EnrichedTaxRecord>>, QueryError> {
        let store = store.clone();
        queries
            .fetch(TAXES_QUERY, move || async move {
                let raw = store.list_records().await?;
                Ok::<_, ApiError>(enrich(raw))
            })
            .await
    }

    async fn fetch_countries(
        store: &Arc<S>,
        queries: &QueryClient,
    ) -> Result<Arc<Vec<String>>, QueryError> {
        let store = store.clone();
        queries
            .fetch(COUNTRIES_QUERY, move || async move {
                store.list_countries().await
            })
            .await
    }

    fn apply_records(&mut self, result: Result<Arc<Vec<EnrichedTaxRecord>>, QueryError>) {
        match result {
            Ok(records) => {
                self.records = Some(records);
                self.records_error = None;
            }
            Err(err) => {
                self.records_error = Some(err);
            }
        }
    }

    fn apply_countries(&mut self, result: Result<Arc<Vec<String>>, QueryError>) {
        match result {
            Ok(countries) => self.countries = countries,
            Err(err) => {
                // Independent query: the table still renders, the option
                // list just stays empty.
                warn!(error = %err, "countries fetch failed");
            }
        }
    }
}
