//! Wire types shared between the remote tax record store and the client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tax customer record as held by the remote store.
///
/// Records are created and destroyed server-side; the client only reads them
/// and writes back `name`/`country` via [`RecordPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRecord {
    pub id: String,
    /// ISO 8601 timestamp string, opaque to the client.
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub country: String,
}

/// Partial update sent with `PUT /taxes/{id}`.
///
/// Only the fields that are set appear in the JSON body; everything else on
/// the target record is left untouched by contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Display-only gender drawn at enrichment time. Never persisted, not stable
/// across refetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`TaxRecord`] plus the two client-derived display fields.
///
/// Recomputed on every fetch; never sent back to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTaxRecord {
    pub record: TaxRecord,
    pub gender: Gender,
    pub request_date: &'static str,
}

impl EnrichedTaxRecord {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn country(&self) -> &str {
        &self.record.country
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_record_json_roundtrip() {
        let record = TaxRecord {
            id: "17".into(),
            created_at: "2025-01-18T06:21:37.577Z".into(),
            name: "Alice Fay".into(),
            avatar: Some("https://cdn.example/17.jpg".into()),
            country: "France".into(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"createdAt\""));
        let parsed: TaxRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn tax_record_missing_avatar() {
        let json = r#"{
            "id": "3",
            "createdAt": "2025-01-02T00:00:00.000Z",
            "name": "Bob",
            "country": "Germany"
        }"#;
        let parsed: TaxRecord = serde_json::from_str(json).unwrap();
        assert!(parsed.avatar.is_none());
        assert_eq!(parsed.country, "Germany");
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = RecordPatch {
            name: Some("Alicia".into()),
            country: None,
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"name":"Alicia"}"#);

        let full = RecordPatch {
            name: Some("Alicia".into()),
            country: Some("France".into()),
        };
        let json = serde_json::to_string(&full).unwrap();
        assert_eq!(json, r#"{"name":"Alicia","country":"France"}"#);
    }

    #[test]
    fn empty_patch_is_empty_object() {
        let json = serde_json::to_string(&RecordPatch::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn gender_display() {
        assert_eq!(Gender::Male.to_string(), "Male");
        assert_eq!(Gender::Female.to_string(), "Female");
    }
}
