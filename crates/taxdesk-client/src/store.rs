//! Trait seam over the remote record store.

use async_trait::async_trait;
use taxdesk_core::{RecordPatch, TaxRecord};

use crate::ApiError;

/// Read/update access to the remote tax record collection plus the read-only
/// country reference list.
///
/// The app is generic over this trait so tests can drive it with an in-memory
/// store instead of HTTP.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All tax records, in store order.
    async fn list_records(&self) -> Result<Vec<TaxRecord>, ApiError>;

    /// Partially update one record. Only the fields set on `patch` change.
    async fn update_record(&self, id: &str, patch: RecordPatch) -> Result<TaxRecord, ApiError>;

    /// Known country names, in store order.
    async fn list_countries(&self) -> Result<Vec<String>, ApiError>;
}
