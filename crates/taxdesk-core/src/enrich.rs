//! Display-only enrichment of raw tax records.
//!
//! The remote store holds neither a gender nor a request date, so the UI
//! derives both client-side: gender is drawn uniformly at random on every
//! fetch (deliberately not stable across refetches) and the request date is
//! a fixed display constant.

use rand::Rng;

use crate::record::{EnrichedTaxRecord, Gender, TaxRecord};

/// Fixed request date shown for every row.
pub const REQUEST_DATE: &str = "Jan 20, 2025";

/// Attach the display-only fields to raw records.
///
/// Length, order, and per-record identity of the input are preserved. Each
/// record draws its gender independently, so re-running on the same input
/// yields an identical list except for the gender draws.
pub fn enrich(records: Vec<TaxRecord>) -> Vec<EnrichedTaxRecord> {
    enrich_with(records, &mut rand::rng())
}

/// [`enrich`] with a caller-supplied RNG, for deterministic tests.
pub fn enrich_with<R: Rng>(records: Vec<TaxRecord>, rng: &mut R) -> Vec<EnrichedTaxRecord> {
    records
        .into_iter()
        .map(|record| EnrichedTaxRecord {
            gender: if rng.random_bool(0.5) {
                Gender::Male
            } else {
                Gender::Female
            },
            request_date: REQUEST_DATE,
            record,
        })
        .collect()
}
