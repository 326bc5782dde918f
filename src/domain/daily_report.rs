use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub workers_present: Option<u32>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub materials: Option<String>,
}
