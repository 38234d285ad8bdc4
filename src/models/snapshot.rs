//! Snapshot of a user's whole collection, used for change polling.

use serde::{Deserialize, Serialize};

use super::LinkItem;

/// Every link of one user, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSnapshot {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    pub links: Vec<LinkItem>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
