use serde::{Deserialize, Serialize};

use super::fund::Currency;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub project_id: String,
    pub currency: Currency,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
