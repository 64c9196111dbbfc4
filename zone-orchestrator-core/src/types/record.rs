//! Record request and response types

use serde::{Deserialize, Serialize};
use zone_orchestrator_model::{Extension, Record, RecordType};

/// Read-only view of one record, values in presentation format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    /// Subdomain name; the apex is `""`.
    pub name: String,
    pub record_type: RecordType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    pub values: Vec<String>,
    #[serde(default)]
    pub extension: Extension,
}

impl RecordSnapshot {
    #[must_use]
    pub fn from_record(name: &str, record: &Record) -> Self {
        Self {
            name: name.to_string(),
            record_type: record.record_type(),
            ttl: record.ttl(),
            values: record.values_as_text(),
            extension: record.extension().clone(),
        }
    }
}

/// Every record of one subdomain, in document order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainSnapshot {
    pub name: String,
    pub records: Vec<RecordSnapshot>,
}

/// Create or update request for one record type of a subdomain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteRecordRequest {
    pub zone: String,
    /// Empty for the default scope.
    #[serde(default)]
    pub scope: String,
    /// Subdomain name; `""` or `@` for the apex.
    pub name: String,
    pub record_type: RecordType,
    /// Values in presentation format
    pub values: Vec<String>,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub extension: Extension,
}
