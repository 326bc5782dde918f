use serde::{Deserialize, Serialize};

use super::fund::Currency;

/// The one single-object resource; everything else is an array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub business_name: String,
    pub owner_name: String,
    pub default_currency: Currency,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            business_name: String::new(),
            owner_name: String::new(),
            default_currency: Currency::Usd,
            language: "en".to_string(),
        }
    }
}
