use serde::{Deserialize, Serialize};

/// A day-of-work entry. The total cost is frozen at creation so past logs
/// keep their historical value when a worker's rate changes later.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerLog {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub workers_count: u32,
    #[serde(default)]
    pub hours_per_worker: f64,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub note: Option<String>,
}

pub fn frozen_total_cost(workers_count: u32, hours_per_worker: f64, hourly_rate: f64) -> f64 {
    f64::from(workers_count) * hours_per_worker * hourly_rate
}
