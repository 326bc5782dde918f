use std::error::Error;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::backup::{self, BackupError, RestoreSummary};
use crate::domain::activity::{ActivityEvent, ActivityKind};
use crate::domain::client::{Client, ClientPatch};
use crate::domain::daily_report::DailyReport;
use crate::domain::expense::Expense;
use crate::domain::file_meta::FileMeta;
use crate::domain::fund::{
    balance_for_project, Currency, FundBalance, FundKind, FundTransaction, ParseCurrencyError,
    ParseFundKindError,
};
use crate::domain::invoice::{Invoice, InvoicePatch, LineItem};
use crate::domain::location::ProjectLocation;
use crate::domain::notification::Notification;
use crate::domain::payment::Payment;
use crate::domain::permission::{ParseRoleError, PermissionUser, Role};
use crate::domain::project::{Project, ProjectPatch};
use crate::domain::settings::Settings;
use crate::domain::task::{Task, TaskPatch};
use crate::domain::worker::{Worker, WorkerPatch};
use crate::domain::worker_log::{frozen_total_cost, WorkerLog};
use crate::ids::{new_record_id, now_utc_rfc3339};
use crate::store::{self, Collection, Store, StoreError};
use crate::workflow::{
    WorkflowError, WorkflowRegistry, INVOICE_WORKFLOW, PROJECT_WORKFLOW, TASK_WORKFLOW,
};

/// One collection per resource, all sharing the same storage root. The
/// presentation layer talks to this and only this.
pub struct App {
    store: Rc<Store>,
    workflows: WorkflowRegistry,
    projects: Collection<Project>,
    tasks: Collection<Task>,
    clients: Collection<Client>,
    workers: Collection<Worker>,
    worker_logs: Collection<WorkerLog>,
    invoices: Collection<Invoice>,
    payments: Collection<Payment>,
    expenses: Collection<Expense>,
    daily_reports: Collection<DailyReport>,
    locations: Collection<ProjectLocation>,
    notifications: Collection<Notification>,
    permissions: Collection<PermissionUser>,
    files: Collection<FileMeta>,
    fund: Collection<FundTransaction>,
    activity: Collection<ActivityEvent>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub client_id: Option<String>,
    pub budget: Option<f64>,
    pub currency: Option<Currency>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    pub priority: Option<i64>,
    pub due_date: Option<String>,
    pub worker_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewInvoice {
    pub project_id: String,
    pub client_id: Option<String>,
    pub number: Option<String>,
    pub currency: Option<Currency>,
    pub items: Vec<LineItem>,
    pub tax_rate: f64,
}

#[derive(Debug, Clone, Default)]
pub struct NewWorkerLog {
    pub project_id: String,
    pub worker_id: Option<String>,
    pub date: String,
    pub workers_count: u32,
    pub hours_per_worker: f64,
    pub hourly_rate: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub project_id: String,
    pub invoice_id: Option<String>,
    pub currency: Currency,
    pub amount: f64,
    pub method: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub project_id: String,
    pub currency: Currency,
    pub amount: f64,
    pub category: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDailyReport {
    pub project_id: String,
    pub date: String,
    pub weather: Option<String>,
    pub workers_present: Option<u32>,
    pub summary: String,
    pub materials: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewLocation {
    pub project_id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub business_name: Option<String>,
    pub owner_name: Option<String>,
    pub default_currency: Option<Currency>,
    pub language: Option<String>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.business_name.is_none()
            && self.owner_name.is_none()
            && self.default_currency.is_none()
            && self.language.is_none()
    }
}

impl App {
    pub fn open(store: Store) -> Result<Self, AppError> {
        let store = Rc::new(store);
        let workflows = WorkflowRegistry::load()?;
        Ok(Self {
            projects: Collection::bound(store::PROJECTS, Rc::clone(&store)),
            tasks: Collection::bound(store::TASKS, Rc::clone(&store)),
            clients: Collection::bound(store::CLIENTS, Rc::clone(&store)),
            workers: Collection::bound(store::WORKERS, Rc::clone(&store)),
            worker_logs: Collection::bound(store::WORKERS_LOG, Rc::clone(&store)),
            invoices: Collection::bound(store::INVOICES, Rc::clone(&store)),
            payments: Collection::bound(store::PAYMENTS, Rc::clone(&store)),
            expenses: Collection::bound(store::EXPENSES, Rc::clone(&store)),
            daily_reports: Collection::bound(store::DAILY_REPORTS, Rc::clone(&store)),
            locations: Collection::bound(store::PROJECT_LOCATIONS, Rc::clone(&store)),
            notifications: Collection::bound(store::NOTIFICATIONS, Rc::clone(&store)),
            permissions: Collection::bound(store::PERMISSIONS, Rc::clone(&store)),
            files: Collection::bound(store::PROJECT_FILES_META, Rc::clone(&store)),
            fund: Collection::bound(store::SMART_FUND, Rc::clone(&store)),
            activity: Collection::bound(store::ACTIVITY, Rc::clone(&store)),
            store,
            workflows,
        })
    }

    // ---- projects ----

    pub fn create_project(&self, input: NewProject) -> Result<Project, AppError> {
        let name = required(&input.name, "project name")?;
        let status = self
            .workflows
            .require(PROJECT_WORKFLOW)?
            .initial_status
            .clone();
        let project = Project {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            name,
            status,
            client_id: input.client_id,
            budget: input.budget,
            currency: input.currency,
            start_date: input.start_date,
            end_date: input.end_date,
            description: input.description,
        };
        let stored = project.clone();
        self.projects.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::ProjectCreated,
            format!("created project '{}'", project.name),
            Some(&project.id),
        );
        Ok(project)
    }

    pub fn update_project(
        &self,
        id: &str,
        mut patch: ProjectPatch,
        force: bool,
    ) -> Result<Option<Project>, AppError> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument(
                "update requires at least one field change".to_string(),
            ));
        }
        if let Some(raw) = patch.status.as_deref() {
            let workflow = self.workflows.require(PROJECT_WORKFLOW)?;
            let next = workflow.parse_status(raw)?;
            if let Some(current) = self.projects.read()?.into_iter().find(|p| p.id == id) {
                workflow.validate_change(&current.status, &next, force)?;
            }
            patch.status = Some(next);
        }

        let mut updated = None;
        self.projects.mutate(|mut list| {
            if let Some(idx) = list.iter().position(|p| p.id == id) {
                let mut project = list[idx].clone();
                patch.apply(&mut project);
                updated = Some(project.clone());
                list[idx] = project;
            }
            list
        })?;

        if let Some(project) = updated.as_ref() {
            self.record_activity(
                ActivityKind::ProjectUpdated,
                format!("updated project '{}'", project.name),
                Some(&project.id),
            );
        }
        Ok(updated)
    }

    /// Removal does not cascade: tasks, invoices, and ledger entries keep
    /// their projectId and simply dangle.
    pub fn remove_project(&self, id: &str) -> Result<bool, AppError> {
        let mut removed_name = None;
        self.projects.mutate(|mut list| {
            if let Some(found) = list.iter().find(|p| p.id == id) {
                removed_name = Some(found.name.clone());
            }
            list.retain(|p| p.id != id);
            list
        })?;
        match removed_name {
            Some(name) => {
                self.record_activity(
                    ActivityKind::ProjectRemoved,
                    format!("removed project '{name}'"),
                    Some(id),
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.projects.read()?)
    }

    pub fn show_project(&self, id: &str) -> Result<Option<Project>, AppError> {
        Ok(self.projects.read()?.into_iter().find(|p| p.id == id))
    }

    // ---- tasks ----

    pub fn create_task(&self, input: NewTask) -> Result<Task, AppError> {
        let title = required(&input.title, "task title")?;
        let status = self.workflows.require(TASK_WORKFLOW)?.initial_status.clone();
        let task = Task {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: input.project_id,
            title,
            status,
            priority: input.priority,
            due_date: input.due_date,
            worker_id: input.worker_id,
        };
        let stored = task.clone();
        self.tasks.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::TaskCreated,
            format!("created task '{}'", task.title),
            Some(&task.project_id),
        );
        Ok(task)
    }

    pub fn update_task(
        &self,
        id: &str,
        mut patch: TaskPatch,
        force: bool,
    ) -> Result<Option<Task>, AppError> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument(
                "update requires at least one field change".to_string(),
            ));
        }
        if let Some(raw) = patch.status.as_deref() {
            let workflow = self.workflows.require(TASK_WORKFLOW)?;
            let next = workflow.parse_status(raw)?;
            if let Some(current) = self.tasks.read()?.into_iter().find(|t| t.id == id) {
                workflow.validate_change(&current.status, &next, force)?;
            }
            patch.status = Some(next);
        }

        let mut updated = None;
        self.tasks.mutate(|mut list| {
            if let Some(idx) = list.iter().position(|t| t.id == id) {
                let mut task = list[idx].clone();
                patch.apply(&mut task);
                updated = Some(task.clone());
                list[idx] = task;
            }
            list
        })?;

        if let Some(task) = updated.as_ref() {
            self.record_activity(
                ActivityKind::TaskUpdated,
                format!("updated task '{}' [{}]", task.title, task.status),
                Some(&task.project_id),
            );
        }
        Ok(updated)
    }

    pub fn remove_task(&self, id: &str) -> Result<bool, AppError> {
        let mut removed = None;
        self.tasks.mutate(|mut list| {
            if let Some(found) = list.iter().find(|t| t.id == id) {
                removed = Some((found.title.clone(), found.project_id.clone()));
            }
            list.retain(|t| t.id != id);
            list
        })?;
        match removed {
            Some((title, project_id)) => {
                self.record_activity(
                    ActivityKind::TaskRemoved,
                    format!("removed task '{title}'"),
                    Some(&project_id),
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.tasks.read()?)
    }

    pub fn show_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        Ok(self.tasks.read()?.into_iter().find(|t| t.id == id))
    }

    // ---- clients ----

    pub fn create_client(&self, input: NewClient) -> Result<Client, AppError> {
        let name = required(&input.name, "client name")?;
        let client = Client {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            note: input.note,
        };
        let stored = client.clone();
        self.clients.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::ClientCreated,
            format!("added client '{}'", client.name),
            None,
        );
        Ok(client)
    }

    pub fn update_client(&self, id: &str, patch: ClientPatch) -> Result<Option<Client>, AppError> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument(
                "update requires at least one field change".to_string(),
            ));
        }
        let mut updated = None;
        self.clients.mutate(|mut list| {
            if let Some(idx) = list.iter().position(|c| c.id == id) {
                let mut client = list[idx].clone();
                patch.apply(&mut client);
                updated = Some(client.clone());
                list[idx] = client;
            }
            list
        })?;
        if let Some(client) = updated.as_ref() {
            self.record_activity(
                ActivityKind::ClientUpdated,
                format!("updated client '{}'", client.name),
                None,
            );
        }
        Ok(updated)
    }

    pub fn remove_client(&self, id: &str) -> Result<bool, AppError> {
        let before = self.clients.read()?.len();
        let after = self
            .clients
            .mutate(|mut list| {
                list.retain(|c| c.id != id);
                list
            })?
            .len();
        let removed = after < before;
        if removed {
            self.record_activity(ActivityKind::ClientRemoved, "removed a client", None);
        }
        Ok(removed)
    }

    pub fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        Ok(self.clients.read()?)
    }

    pub fn show_client(&self, id: &str) -> Result<Option<Client>, AppError> {
        Ok(self.clients.read()?.into_iter().find(|c| c.id == id))
    }

    // ---- workers ----

    pub fn create_worker(
        &self,
        name: &str,
        trade: Option<String>,
        phone: Option<String>,
        hourly_rate: f64,
    ) -> Result<Worker, AppError> {
        let name = required(name, "worker name")?;
        let worker = Worker {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            name,
            trade,
            phone,
            hourly_rate,
            active: true,
        };
        let stored = worker.clone();
        self.workers.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::WorkerCreated,
            format!("added worker '{}'", worker.name),
            None,
        );
        Ok(worker)
    }

    pub fn update_worker(&self, id: &str, patch: WorkerPatch) -> Result<Option<Worker>, AppError> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument(
                "update requires at least one field change".to_string(),
            ));
        }
        let mut updated = None;
        self.workers.mutate(|mut list| {
            if let Some(idx) = list.iter().position(|w| w.id == id) {
                let mut worker = list[idx].clone();
                patch.apply(&mut worker);
                updated = Some(worker.clone());
                list[idx] = worker;
            }
            list
        })?;
        if let Some(worker) = updated.as_ref() {
            self.record_activity(
                ActivityKind::WorkerUpdated,
                format!("updated worker '{}'", worker.name),
                None,
            );
        }
        Ok(updated)
    }

    pub fn remove_worker(&self, id: &str) -> Result<bool, AppError> {
        let before = self.workers.read()?.len();
        let after = self
            .workers
            .mutate(|mut list| {
                list.retain(|w| w.id != id);
                list
            })?
            .len();
        let removed = after < before;
        if removed {
            self.record_activity(ActivityKind::WorkerRemoved, "removed a worker", None);
        }
        Ok(removed)
    }

    pub fn list_workers(&self) -> Result<Vec<Worker>, AppError> {
        Ok(self.workers.read()?)
    }

    pub fn show_worker(&self, id: &str) -> Result<Option<Worker>, AppError> {
        Ok(self.workers.read()?.into_iter().find(|w| w.id == id))
    }

    // ---- worker logs ----

    /// The total cost is a point-in-time snapshot: later rate changes never
    /// rewrite past logs.
    pub fn add_worker_log(&self, input: NewWorkerLog) -> Result<WorkerLog, AppError> {
        if input.workers_count == 0 {
            return Err(AppError::InvalidArgument(
                "workers count must be at least 1".to_string(),
            ));
        }
        let hourly_rate = match input.hourly_rate {
            Some(rate) => rate,
            None => match input.worker_id.as_deref() {
                Some(worker_id) => self
                    .show_worker(worker_id)?
                    .map(|worker| worker.hourly_rate)
                    .unwrap_or(0.0),
                None => 0.0,
            },
        };
        let log = WorkerLog {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: input.project_id,
            worker_id: input.worker_id,
            date: input.date,
            workers_count: input.workers_count,
            hours_per_worker: input.hours_per_worker,
            hourly_rate,
            total_cost: frozen_total_cost(input.workers_count, input.hours_per_worker, hourly_rate),
            note: input.note,
        };
        let stored = log.clone();
        self.worker_logs.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::WorkerLogAdded,
            format!("logged {} worker(s) on {}", log.workers_count, log.date),
            Some(&log.project_id),
        );
        Ok(log)
    }

    pub fn list_worker_logs(&self) -> Result<Vec<WorkerLog>, AppError> {
        Ok(self.worker_logs.read()?)
    }

    // ---- invoices ----

    pub fn create_invoice(&self, input: NewInvoice) -> Result<Invoice, AppError> {
        let status = self
            .workflows
            .require(INVOICE_WORKFLOW)?
            .initial_status
            .clone();
        let mut invoice = Invoice {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: input.project_id,
            client_id: input.client_id,
            number: input.number,
            status,
            currency: input.currency,
            items: input.items,
            tax_rate: input.tax_rate,
            subtotal: 0.0,
            tax_amount: 0.0,
            total: 0.0,
        };
        invoice.recompute_totals();
        let stored = invoice.clone();
        self.invoices.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::InvoiceCreated,
            format!("created invoice totaling {:.2}", invoice.total),
            Some(&invoice.project_id),
        );
        self.push_notification(
            "invoice created",
            format!(
                "invoice {} totals {:.2}",
                invoice.number.as_deref().unwrap_or(&invoice.id),
                invoice.total
            ),
            Some(&invoice.project_id),
        );
        Ok(invoice)
    }

    pub fn update_invoice(
        &self,
        id: &str,
        mut patch: InvoicePatch,
        force: bool,
    ) -> Result<Option<Invoice>, AppError> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument(
                "update requires at least one field change".to_string(),
            ));
        }
        if let Some(raw) = patch.status.as_deref() {
            let workflow = self.workflows.require(INVOICE_WORKFLOW)?;
            let next = workflow.parse_status(raw)?;
            if let Some(current) = self.invoices.read()?.into_iter().find(|i| i.id == id) {
                workflow.validate_change(&current.status, &next, force)?;
            }
            patch.status = Some(next);
        }

        let mut updated = None;
        self.invoices.mutate(|mut list| {
            if let Some(idx) = list.iter().position(|i| i.id == id) {
                let mut invoice = list[idx].clone();
                patch.apply(&mut invoice);
                updated = Some(invoice.clone());
                list[idx] = invoice;
            }
            list
        })?;

        if let Some(invoice) = updated.as_ref() {
            self.record_activity(
                ActivityKind::InvoiceUpdated,
                format!("updated invoice totaling {:.2}", invoice.total),
                Some(&invoice.project_id),
            );
        }
        Ok(updated)
    }

    pub fn remove_invoice(&self, id: &str) -> Result<bool, AppError> {
        let before = self.invoices.read()?.len();
        let after = self
            .invoices
            .mutate(|mut list| {
                list.retain(|i| i.id != id);
                list
            })?
            .len();
        let removed = after < before;
        if removed {
            self.record_activity(ActivityKind::InvoiceRemoved, "removed an invoice", None);
        }
        Ok(removed)
    }

    pub fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        Ok(self.invoices.read()?)
    }

    pub fn show_invoice(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        Ok(self.invoices.read()?.into_iter().find(|i| i.id == id))
    }

    // ---- payments & expenses ----

    pub fn record_payment(&self, input: NewPayment) -> Result<Payment, AppError> {
        require_positive(input.amount, "payment amount")?;
        let payment = Payment {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: input.project_id,
            invoice_id: input.invoice_id,
            currency: input.currency,
            amount: input.amount,
            method: input.method,
            note: input.note,
        };
        let stored = payment.clone();
        self.payments.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::PaymentRecorded,
            format!("recorded payment of {} {}", payment.amount, payment.currency),
            Some(&payment.project_id),
        );
        self.push_notification(
            "payment received",
            format!("{} {}", payment.amount, payment.currency),
            Some(&payment.project_id),
        );
        Ok(payment)
    }

    pub fn remove_payment(&self, id: &str) -> Result<bool, AppError> {
        let before = self.payments.read()?.len();
        let after = self
            .payments
            .mutate(|mut list| {
                list.retain(|p| p.id != id);
                list
            })?
            .len();
        let removed = after < before;
        if removed {
            self.record_activity(ActivityKind::PaymentRemoved, "removed a payment", None);
        }
        Ok(removed)
    }

    pub fn list_payments(&self) -> Result<Vec<Payment>, AppError> {
        Ok(self.payments.read()?)
    }

    pub fn record_expense(&self, input: NewExpense) -> Result<Expense, AppError> {
        require_positive(input.amount, "expense amount")?;
        let expense = Expense {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: input.project_id,
            currency: input.currency,
            amount: input.amount,
            category: input.category,
            note: input.note,
        };
        let stored = expense.clone();
        self.expenses.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::ExpenseRecorded,
            format!("recorded expense of {} {}", expense.amount, expense.currency),
            Some(&expense.project_id),
        );
        Ok(expense)
    }

    pub fn remove_expense(&self, id: &str) -> Result<bool, AppError> {
        let before = self.expenses.read()?.len();
        let after = self
            .expenses
            .mutate(|mut list| {
                list.retain(|e| e.id != id);
                list
            })?
            .len();
        let removed = after < before;
        if removed {
            self.record_activity(ActivityKind::ExpenseRemoved, "removed an expense", None);
        }
        Ok(removed)
    }

    pub fn list_expenses(&self) -> Result<Vec<Expense>, AppError> {
        Ok(self.expenses.read()?)
    }

    // ---- daily reports ----

    pub fn file_report(&self, input: NewDailyReport) -> Result<DailyReport, AppError> {
        let summary = required(&input.summary, "report summary")?;
        let report = DailyReport {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: input.project_id,
            date: input.date,
            weather: input.weather,
            workers_present: input.workers_present,
            summary,
            materials: input.materials,
        };
        let stored = report.clone();
        self.daily_reports.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::ReportFiled,
            format!("filed daily report for {}", report.date),
            Some(&report.project_id),
        );
        Ok(report)
    }

    pub fn list_reports(&self) -> Result<Vec<DailyReport>, AppError> {
        Ok(self.daily_reports.read()?)
    }

    pub fn show_report(&self, id: &str) -> Result<Option<DailyReport>, AppError> {
        Ok(self.daily_reports.read()?.into_iter().find(|r| r.id == id))
    }

    // ---- locations ----

    pub fn add_location(&self, input: NewLocation) -> Result<ProjectLocation, AppError> {
        let name = required(&input.name, "location name")?;
        let location = ProjectLocation {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: input.project_id,
            name,
            latitude: input.latitude,
            longitude: input.longitude,
            note: input.note,
        };
        let stored = location.clone();
        self.locations.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::LocationAdded,
            format!("added location '{}'", location.name),
            Some(&location.project_id),
        );
        Ok(location)
    }

    pub fn remove_location(&self, id: &str) -> Result<bool, AppError> {
        let before = self.locations.read()?.len();
        let after = self
            .locations
            .mutate(|mut list| {
                list.retain(|l| l.id != id);
                list
            })?
            .len();
        let removed = after < before;
        if removed {
            self.record_activity(ActivityKind::LocationRemoved, "removed a location", None);
        }
        Ok(removed)
    }

    pub fn list_locations(&self) -> Result<Vec<ProjectLocation>, AppError> {
        Ok(self.locations.read()?)
    }

    // ---- smart fund ----

    pub fn fund_record(
        &self,
        project_id: &str,
        kind: FundKind,
        currency: Currency,
        amount: f64,
        note: Option<String>,
    ) -> Result<FundTransaction, AppError> {
        require_positive(amount, "fund amount")?;
        let txn = FundTransaction {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: project_id.to_string(),
            kind,
            currency,
            amount,
            note,
        };
        let stored = txn.clone();
        self.fund.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        let activity_kind = match kind {
            FundKind::Deposit => ActivityKind::FundDeposit,
            FundKind::Expense => ActivityKind::FundExpense,
        };
        self.record_activity(
            activity_kind,
            format!("fund {}: {} {}", kind.as_str(), amount, currency),
            Some(project_id),
        );
        Ok(txn)
    }

    pub fn fund_transactions(
        &self,
        project_id: Option<&str>,
    ) -> Result<Vec<FundTransaction>, AppError> {
        let mut list = self.fund.read()?;
        if let Some(project_id) = project_id {
            list.retain(|txn| txn.project_id == project_id);
        }
        Ok(list)
    }

    pub fn fund_balance(&self, project_id: &str) -> Result<FundBalance, AppError> {
        Ok(balance_for_project(&self.fund.read()?, project_id))
    }

    // ---- uploaded files ----

    pub fn attach_file(&self, project_id: &str, source: &Path) -> Result<FileMeta, AppError> {
        let bytes = std::fs::read(source)?;
        let file_name = source
            .file_name()
            .and_then(|value| value.to_str())
            .ok_or_else(|| {
                AppError::InvalidArgument(format!(
                    "source path '{}' has no usable file name",
                    source.display()
                ))
            })?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let sha256 = format!("{:x}", hasher.finalize());

        let stored_name = self
            .store
            .write_binary(Some(project_id), file_name, &bytes)?;
        let meta = FileMeta {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            project_id: project_id.to_string(),
            file_name: file_name.to_string(),
            stored_name,
            size_bytes: bytes.len() as u64,
            sha256,
        };
        let stored = meta.clone();
        self.files.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::FileAttached,
            format!("attached file '{}'", meta.file_name),
            Some(project_id),
        );
        Ok(meta)
    }

    pub fn list_files(&self, project_id: Option<&str>) -> Result<Vec<FileMeta>, AppError> {
        let mut list = self.files.read()?;
        if let Some(project_id) = project_id {
            list.retain(|meta| meta.project_id == project_id);
        }
        Ok(list)
    }

    // ---- notifications ----

    pub fn list_notifications(&self, unread_only: bool) -> Result<Vec<Notification>, AppError> {
        let mut list = self.notifications.read()?;
        if unread_only {
            list.retain(|n| !n.read);
        }
        Ok(list)
    }

    pub fn mark_notification_read(&self, id: &str) -> Result<Option<Notification>, AppError> {
        let mut updated = None;
        self.notifications.mutate(|mut list| {
            if let Some(idx) = list.iter().position(|n| n.id == id) {
                let mut notification = list[idx].clone();
                notification.read = true;
                updated = Some(notification.clone());
                list[idx] = notification;
            }
            list
        })?;
        Ok(updated)
    }

    // ---- permission users ----

    pub fn add_user(&self, username: &str, role: &str) -> Result<PermissionUser, AppError> {
        let username = required(username, "username")?;
        let role = Role::from_str(role)?;
        if self
            .permissions
            .read()?
            .iter()
            .any(|user| user.username == username)
        {
            return Err(AppError::InvalidArgument(format!(
                "user '{username}' already exists"
            )));
        }
        let user = PermissionUser {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            username,
            role: role.as_str().to_string(),
        };
        let stored = user.clone();
        self.permissions.mutate(move |mut list| {
            list.push(stored);
            list
        })?;
        self.record_activity(
            ActivityKind::UserAdded,
            format!("added user '{}' as {}", user.username, user.role),
            None,
        );
        Ok(user)
    }

    pub fn remove_user(&self, id: &str) -> Result<bool, AppError> {
        let before = self.permissions.read()?.len();
        let after = self
            .permissions
            .mutate(|mut list| {
                list.retain(|user| user.id != id);
                list
            })?
            .len();
        let removed = after < before;
        if removed {
            self.record_activity(ActivityKind::UserRemoved, "removed a user", None);
        }
        Ok(removed)
    }

    pub fn list_users(&self) -> Result<Vec<PermissionUser>, AppError> {
        Ok(self.permissions.read()?)
    }

    // ---- settings ----

    pub fn settings(&self) -> Result<Settings, AppError> {
        Ok(self
            .store
            .read_document::<Settings>(store::SETTINGS)?
            .unwrap_or_default())
    }

    pub fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, AppError> {
        if patch.is_empty() {
            return Err(AppError::InvalidArgument(
                "update requires at least one field change".to_string(),
            ));
        }
        let mut settings = self.settings()?;
        if let Some(business_name) = patch.business_name {
            settings.business_name = business_name;
        }
        if let Some(owner_name) = patch.owner_name {
            settings.owner_name = owner_name;
        }
        if let Some(default_currency) = patch.default_currency {
            settings.default_currency = default_currency;
        }
        if let Some(language) = patch.language {
            settings.language = language;
        }
        self.store.write_document(store::SETTINGS, &settings)?;
        self.record_activity(ActivityKind::SettingsChanged, "changed settings", None);
        Ok(settings)
    }

    // ---- activity ----

    pub fn activity_log(&self, project_id: Option<&str>) -> Result<Vec<ActivityEvent>, AppError> {
        let mut list = self.activity.read()?;
        if let Some(project_id) = project_id {
            list.retain(|event| event.project_id.as_deref() == Some(project_id));
        }
        Ok(list)
    }

    // ---- backup bundle ----

    pub fn export_backup(&self) -> Result<serde_json::Value, AppError> {
        Ok(backup::export_bundle(&self.store)?)
    }

    pub fn import_backup(&self, bundle: &serde_json::Value) -> Result<RestoreSummary, AppError> {
        let summary = backup::import_bundle(&self.store, bundle)?;
        self.invalidate_caches();
        self.record_activity(
            ActivityKind::BackupRestored,
            format!("restored resources: {}", summary.restored.join(", ")),
            None,
        );
        Ok(summary)
    }

    pub fn invalidate_caches(&self) {
        self.projects.invalidate();
        self.tasks.invalidate();
        self.clients.invalidate();
        self.workers.invalidate();
        self.worker_logs.invalidate();
        self.invoices.invalidate();
        self.payments.invalidate();
        self.expenses.invalidate();
        self.daily_reports.invalidate();
        self.locations.invalidate();
        self.notifications.invalidate();
        self.permissions.invalidate();
        self.files.invalidate();
        self.fund.invalidate();
        self.activity.invalidate();
    }

    /// Advisory write: the trail is best-effort and a failure here must not
    /// fail the operation that triggered it.
    fn record_activity(&self, kind: ActivityKind, message: impl Into<String>, project_id: Option<&str>) {
        let event = ActivityEvent {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            kind: kind.as_str().to_string(),
            message: message.into(),
            project_id: project_id.map(str::to_string),
        };
        let _ = self.activity.mutate(move |mut list| {
            list.push(event);
            list
        });
    }

    /// Advisory, same as the activity trail.
    fn push_notification(
        &self,
        title: impl Into<String>,
        body: impl Into<String>,
        project_id: Option<&str>,
    ) {
        let notification = Notification {
            id: new_record_id(),
            created_at: now_utc_rfc3339(),
            title: title.into(),
            body: body.into(),
            project_id: project_id.map(str::to_string),
            read: false,
        };
        let _ = self.notifications.mutate(move |mut list| {
            list.push(notification);
            list
        });
    }
}

fn required(raw: &str, field: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(AppError::InvalidArgument(format!("{field} cannot be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}

fn require_positive(amount: f64, field: &str) -> Result<(), AppError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(AppError::InvalidArgument(format!(
            "{field} must be a positive number"
        )))
    }
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Store(StoreError),
    Backup(BackupError),
    Workflow(WorkflowError),
    ParseCurrency(ParseCurrencyError),
    ParseFundKind(ParseFundKindError),
    ParseRole(ParseRoleError),
    InvalidArgument(String),
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Store(err) => write!(f, "storage error: {}", err),
            AppError::Backup(err) => write!(f, "backup error: {}", err),
            AppError::Workflow(err) => write!(f, "{}", err),
            AppError::ParseCurrency(err) => write!(f, "{}", err),
            AppError::ParseFundKind(err) => write!(f, "{}", err),
            AppError::ParseRole(err) => write!(f, "{}", err),
            AppError::InvalidArgument(message) => write!(f, "{}", message),
            AppError::NotFound(id) => write!(f, "record '{}' not found", id),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Backup(err) => Some(err),
            AppError::Workflow(err) => Some(err),
            AppError::ParseCurrency(err) => Some(err),
            AppError::ParseFundKind(err) => Some(err),
            AppError::ParseRole(err) => Some(err),
            AppError::InvalidArgument(_) => None,
            AppError::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Store(value)
    }
}

impl From<BackupError> for AppError {
    fn from(value: BackupError) -> Self {
        AppError::Backup(value)
    }
}

impl From<WorkflowError> for AppError {
    fn from(value: WorkflowError) -> Self {
        AppError::Workflow(value)
    }
}

impl From<ParseCurrencyError> for AppError {
    fn from(value: ParseCurrencyError) -> Self {
        AppError::ParseCurrency(value)
    }
}

impl From<ParseFundKindError> for AppError {
    fn from(value: ParseFundKindError) -> Self {
        AppError::ParseFundKind(value)
    }
}

impl From<ParseRoleError> for AppError {
    fn from(value: ParseRoleError) -> Self {
        AppError::ParseRole(value)
    }
}
