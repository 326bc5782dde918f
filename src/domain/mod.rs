pub mod activity;
pub mod client;
pub mod daily_report;
pub mod expense;
pub mod file_meta;
pub mod fund;
pub mod invoice;
pub mod location;
pub mod notification;
pub mod payment;
pub mod permission;
pub mod project;
pub mod settings;
pub mod task;
pub mod worker;
pub mod worker_log;
