use serde::{Deserialize, Serialize};

use super::fund::Currency;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub invoice_id: Option<String>,
    pub currency: Currency,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
