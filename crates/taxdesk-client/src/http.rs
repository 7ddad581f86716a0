//! HTTP client for the remote tax record store.

use async_trait::async_trait;
use serde::Deserialize;
use taxdesk_core::{RecordPatch, TaxRecord};
use tracing::info;

use crate::error::ApiError;
use crate::store::RecordStore;

/// Base URL of the hosted mock store. Compiled in; the CLI can override it
/// with `--api-url`.
pub const DEFAULT_BASE_URL: &str = "https://685013d7e7c42cfd17974a33.mockapi.io";

/// HTTP client for the store's `/taxes` and `/countries` endpoints.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

/// `GET /countries` returns `[{id, name}]`; only the name is kept.
#[derive(Deserialize)]
struct CountryEntry {
    name: String,
}

impl ApiClient {
    /// Create a client for the given base URL (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl RecordStore for ApiClient {
    async fn list_records(&self) -> Result<Vec<TaxRecord>, ApiError> {
        let url = format!("{}/taxes", self.base_url);
        info!(url = %url, "fetching tax records");
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        let records: Vec<TaxRecord> = resp.json().await?;
        info!(count = records.len(), "fetched tax records");
        Ok(records)
    }

    async fn update_record(&self, id: &str, patch: RecordPatch) -> Result<TaxRecord, ApiError> {
        let url = format!("{}/taxes/{}", self.base_url, id);
        info!(url = %url, "updating tax record");
        let resp = self.client.put(&url).json(&patch).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id.to_string()));
        }
        let resp = Self::check(resp).await?;
        let record: TaxRecord = resp.json().await?;
        info!(id = %record.id, "updated tax record");
        Ok(record)
    }

    async fn list_countries(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/countries", self.base_url);
        info!(url = %url, "fetching countries");
        let resp = Self::check(self.client.get(&url).send().await?).await?;
        let entries: Vec<CountryEntry> = resp.json().await?;
        Ok(entries.into_iter().map(|c| c.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = ApiClient::new("https://example.test/".into());
        assert_eq!(client.base_url, "https://example.test");
    }

    #[test]
    fn country_entries_keep_only_names() {
        let json = r#"[
            {"id": "1", "name": "France"},
            {"id": "2", "name": "Germany"},
            {"id": "3", "name": "Spain"}
        ]"#;
        let entries: Vec<CountryEntry> = serde_json::from_str(json).unwrap();
        let names: Vec<String> = entries.into_iter().map(|c| c.name).collect();
        assert_eq!(names, ["France", "Germany", "Spain"]);
    }

    #[test]
    fn record_array_parses_store_shape() {
        let json = r#"[
            {"id": "1", "createdAt": "t0", "name": "Alice",
             "avatar": "https://cdn.example/1.jpg", "country": "France"},
            {"id": "2", "createdAt": "t1", "name": "Bob", "country": "Germany"}
        ]"#;
        let records: Vec<TaxRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Alice");
        assert!(records[1].avatar.is_none());
    }
}
