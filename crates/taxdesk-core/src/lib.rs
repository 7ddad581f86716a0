pub mod enrich;
pub mod record;

pub use enrich::{REQUEST_DATE, enrich, enrich_with};
pub use record::{EnrichedTaxRecord, Gender, RecordPatch, TaxRecord};
