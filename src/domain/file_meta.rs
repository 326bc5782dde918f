use serde::{Deserialize, Serialize};

/// Metadata row for an uploaded binary; the bytes live in the project's
/// subfolder under the storage root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub stored_name: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub sha256: String,
}
