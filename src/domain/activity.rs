use serde::{Deserialize, Serialize};

/// Append-only, best-effort trail. Writes here must never fail a primary
/// operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    ProjectCreated,
    ProjectUpdated,
    ProjectRemoved,
    TaskCreated,
    TaskUpdated,
    TaskRemoved,
    ClientCreated,
    ClientUpdated,
    ClientRemoved,
    WorkerCreated,
    WorkerUpdated,
    WorkerRemoved,
    WorkerLogAdded,
    InvoiceCreated,
    InvoiceUpdated,
    InvoiceRemoved,
    PaymentRecorded,
    PaymentRemoved,
    ExpenseRecorded,
    ExpenseRemoved,
    ReportFiled,
    LocationAdded,
    LocationRemoved,
    FundDeposit,
    FundExpense,
    FileAttached,
    UserAdded,
    UserRemoved,
    SettingsChanged,
    BackupRestored,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::ProjectCreated => "project.created",
            ActivityKind::ProjectUpdated => "project.updated",
            ActivityKind::ProjectRemoved => "project.removed",
            ActivityKind::TaskCreated => "task.created",
            ActivityKind::TaskUpdated => "task.updated",
            ActivityKind::TaskRemoved => "task.removed",
            ActivityKind::ClientCreated => "client.created",
            ActivityKind::ClientUpdated => "client.updated",
            ActivityKind::ClientRemoved => "client.removed",
            ActivityKind::WorkerCreated => "worker.created",
            ActivityKind::WorkerUpdated => "worker.updated",
            ActivityKind::WorkerRemoved => "worker.removed",
            ActivityKind::WorkerLogAdded => "worker_log.added",
            ActivityKind::InvoiceCreated => "invoice.created",
            ActivityKind::InvoiceUpdated => "invoice.updated",
            ActivityKind::InvoiceRemoved => "invoice.removed",
            ActivityKind::PaymentRecorded => "payment.recorded",
            ActivityKind::PaymentRemoved => "payment.removed",
            ActivityKind::ExpenseRecorded => "expense.recorded",
            ActivityKind::ExpenseRemoved => "expense.removed",
            ActivityKind::ReportFiled => "report.filed",
            ActivityKind::LocationAdded => "location.added",
            ActivityKind::LocationRemoved => "location.removed",
            ActivityKind::FundDeposit => "fund.deposit",
            ActivityKind::FundExpense => "fund.expense",
            ActivityKind::FileAttached => "file.attached",
            ActivityKind::UserAdded => "user.added",
            ActivityKind::UserRemoved => "user.removed",
            ActivityKind::SettingsChanged => "settings.changed",
            ActivityKind::BackupRestored => "backup.restored",
        }
    }
}
