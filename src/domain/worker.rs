use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub trade: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WorkerPatch {
    pub name: Option<String>,
    pub trade: Option<String>,
    pub phone: Option<String>,
    pub hourly_rate: Option<f64>,
    pub active: Option<bool>,
}

impl WorkerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.trade.is_none()
            && self.phone.is_none()
            && self.hourly_rate.is_none()
            && self.active.is_none()
    }

    pub fn apply(self, worker: &mut Worker) {
        if let Some(name) = self.name {
            worker.name = name;
        }
        if let Some(trade) = self.trade {
            worker.trade = Some(trade);
        }
        if let Some(phone) = self.phone {
            worker.phone = Some(phone);
        }
        if let Some(hourly_rate) = self.hourly_rate {
            worker.hourly_rate = hourly_rate;
        }
        if let Some(active) = self.active {
            worker.active = active;
        }
    }
}
