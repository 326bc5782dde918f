use serde::{Deserialize, Serialize};

use super::fund::Currency;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub status: Option<String>,
    pub client_id: Option<String>,
    pub budget: Option<f64>,
    pub currency: Option<Currency>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

impl ProjectPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.status.is_none()
            && self.client_id.is_none()
            && self.budget.is_none()
            && self.currency.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.description.is_none()
    }

    pub fn apply(self, project: &mut Project) {
        if let Some(name) = self.name {
            project.name = name;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(client_id) = self.client_id {
            project.client_id = Some(client_id);
        }
        if let Some(budget) = self.budget {
            project.budget = Some(budget);
        }
        if let Some(currency) = self.currency {
            project.currency = Some(currency);
        }
        if let Some(start_date) = self.start_date {
            project.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            project.end_date = Some(end_date);
        }
        if let Some(description) = self.description {
            project.description = Some(description);
        }
    }
}
