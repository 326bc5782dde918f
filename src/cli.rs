use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand};

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

pub fn styled_command() -> clap::Command {
    Cli::command()
}

#[derive(Debug, Parser)]
#[command(name = "sbk")]
#[command(bin_name = "sbk")]
#[command(version)]
#[command(about = "A local-first project manager for contracting businesses")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'r',
        long,
        env = "SITEBOOK_ROOT",
        help = "Storage root directory (defaults to the remembered root)."
    )]
    pub root: Option<PathBuf>,

    #[arg(
        long = "kv",
        help = "Treat the storage root as a single key-value JSON file."
    )]
    pub kv: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Create the storage root, seed every resource, and remember the root.")]
    Init,
    #[command(about = "Forget the remembered storage root (data stays on disk).")]
    Uninit,
    #[command(about = "Manage projects.")]
    Project(ProjectArgs),
    #[command(about = "Manage tasks.")]
    Task(TaskArgs),
    #[command(about = "Manage clients.")]
    Client(ClientArgs),
    #[command(about = "Manage workers.")]
    Worker(WorkerArgs),
    #[command(about = "Record daily worker logs.")]
    Log(LogArgs),
    #[command(about = "Manage invoices.")]
    Invoice(InvoiceArgs),
    #[command(about = "Record and list payments.")]
    Payment(PaymentArgs),
    #[command(about = "Record and list expenses.")]
    Expense(ExpenseArgs),
    #[command(about = "File and browse daily site reports.")]
    Report(ReportArgs),
    #[command(about = "Smart fund: per-project USD/SYP ledger.")]
    Fund(FundArgs),
    #[command(about = "Manage project locations.")]
    Location(LocationArgs),
    #[command(about = "Attach and list uploaded project files.")]
    File(FileArgs),
    #[command(about = "Browse and acknowledge notifications.")]
    Notification(NotificationArgs),
    #[command(about = "Show the activity trail.")]
    Activity(ActivityArgs),
    #[command(about = "Manage the user roster.")]
    User(UserArgs),
    #[command(about = "Show or change settings.")]
    Settings(SettingsArgs),
    #[command(about = "Export or import a full backup bundle.")]
    Backup(BackupArgs),
    #[command(about = "Remember or show the secondary sync root folder.")]
    SyncRoot(SyncRootArgs),
    #[command(about = "Run storage health diagnostics.")]
    Doctor(DoctorArgs),
    #[command(about = "Validate on-disk resource documents.")]
    Fsck(FsckArgs),
    #[command(about = "Generate or install shell completions.")]
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
#[command(about = "Project commands.")]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum ProjectSubcommands {
    #[command(about = "Create a new project.")]
    New(ProjectNewArgs),
    #[command(about = "List projects with filtering.", alias = "list")]
    Ls(ProjectListArgs),
    #[command(about = "Show one project by id.")]
    Show(ShowArgs),
    #[command(about = "Update project fields.")]
    Update(ProjectUpdateArgs),
    #[command(about = "Remove a project (no cascade).")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Create a project.")]
pub struct ProjectNewArgs {
    #[arg(help = "Project name.")]
    pub name: String,

    #[arg(short = 'c', long = "client", help = "Client id.")]
    pub client_id: Option<String>,

    #[arg(short = 'b', long, help = "Budget amount.")]
    pub budget: Option<f64>,

    #[arg(long, help = "Budget currency (usd or syp).")]
    pub currency: Option<String>,

    #[arg(long = "start", help = "Start date (YYYY-MM-DD).")]
    pub start_date: Option<String>,

    #[arg(long = "end", help = "End date (YYYY-MM-DD).")]
    pub end_date: Option<String>,

    #[arg(short = 'd', long = "desc", help = "Description text.")]
    pub description: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "List projects.")]
pub struct ProjectListArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,

    #[arg(short = 's', long, help = "Filter by status.")]
    pub status: Option<String>,

    #[arg(short = 'c', long = "client", help = "Filter by client id.")]
    pub client_id: Option<String>,

    #[arg(short = 'q', long, help = "Text query over id, name, and description.")]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Update a project.")]
pub struct ProjectUpdateArgs {
    #[arg(help = "Project id.")]
    pub id: String,

    #[arg(short = 'n', long, help = "Set name.")]
    pub name: Option<String>,

    #[arg(short = 's', long, help = "Set status.")]
    pub status: Option<String>,

    #[arg(short = 'c', long = "client", help = "Set client id.")]
    pub client_id: Option<String>,

    #[arg(short = 'b', long, help = "Set budget.")]
    pub budget: Option<f64>,

    #[arg(long, help = "Set budget currency (usd or syp).")]
    pub currency: Option<String>,

    #[arg(long = "start", help = "Set start date.")]
    pub start_date: Option<String>,

    #[arg(long = "end", help = "Set end date.")]
    pub end_date: Option<String>,

    #[arg(short = 'd', long = "desc", help = "Set description.")]
    pub description: Option<String>,

    #[arg(short = 'f', long, help = "Force an otherwise invalid status change.")]
    pub force: bool,
}

#[derive(Debug, Args)]
#[command(about = "Task commands.")]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum TaskSubcommands {
    #[command(about = "Create a new task in a project.")]
    New(TaskNewArgs),
    #[command(about = "List tasks with filtering.", alias = "list")]
    Ls(TaskListArgs),
    #[command(about = "Show one task by id.")]
    Show(ShowArgs),
    #[command(about = "Update task fields.")]
    Update(TaskUpdateArgs),
    #[command(about = "Remove a task.")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Create a task.")]
pub struct TaskNewArgs {
    #[arg(help = "Project id the task belongs to.")]
    pub project_id: String,

    #[arg(help = "Task title.")]
    pub title: String,

    #[arg(short = 'p', long, help = "Priority (0-4).")]
    pub priority: Option<i64>,

    #[arg(long = "due", help = "Due date (YYYY-MM-DD).")]
    pub due_date: Option<String>,

    #[arg(short = 'w', long = "worker", help = "Assigned worker id.")]
    pub worker_id: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "List tasks.")]
pub struct TaskListArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,

    #[arg(short = 'p', long = "project", help = "Filter by project id.")]
    pub project_id: Option<String>,

    #[arg(short = 's', long, help = "Filter by status.")]
    pub status: Option<String>,

    #[arg(short = 'q', long, help = "Text query over id and title.")]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Update a task.")]
pub struct TaskUpdateArgs {
    #[arg(help = "Task id.")]
    pub id: String,

    #[arg(short = 't', long, help = "Set title.")]
    pub title: Option<String>,

    #[arg(short = 's', long, help = "Set status.")]
    pub status: Option<String>,

    #[arg(short = 'p', long, help = "Set priority (0-4).")]
    pub priority: Option<i64>,

    #[arg(long = "due", help = "Set due date.")]
    pub due_date: Option<String>,

    #[arg(short = 'w', long = "worker", help = "Set assigned worker id.")]
    pub worker_id: Option<String>,

    #[arg(short = 'f', long, help = "Force an otherwise invalid status change.")]
    pub force: bool,
}

#[derive(Debug, Args)]
#[command(about = "Client commands.")]
pub struct ClientArgs {
    #[command(subcommand)]
    pub command: ClientSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum ClientSubcommands {
    #[command(about = "Add a client.")]
    New(ClientNewArgs),
    #[command(about = "List clients.", alias = "list")]
    Ls(JsonArgs),
    #[command(about = "Show one client by id.")]
    Show(ShowArgs),
    #[command(about = "Update client fields.")]
    Update(ClientUpdateArgs),
    #[command(about = "Remove a client.")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Add a client.")]
pub struct ClientNewArgs {
    #[arg(help = "Client name.")]
    pub name: String,

    #[arg(short = 'p', long, help = "Phone number.")]
    pub phone: Option<String>,

    #[arg(short = 'e', long, help = "Email address.")]
    pub email: Option<String>,

    #[arg(short = 'a', long, help = "Postal address.")]
    pub address: Option<String>,

    #[arg(short = 'n', long, help = "Free-form note.")]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Update a client.")]
pub struct ClientUpdateArgs {
    #[arg(help = "Client id.")]
    pub id: String,

    #[arg(long, help = "Set name.")]
    pub name: Option<String>,

    #[arg(short = 'p', long, help = "Set phone number.")]
    pub phone: Option<String>,

    #[arg(short = 'e', long, help = "Set email address.")]
    pub email: Option<String>,

    #[arg(short = 'a', long, help = "Set postal address.")]
    pub address: Option<String>,

    #[arg(short = 'n', long, help = "Set note.")]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Worker commands.")]
pub struct WorkerArgs {
    #[command(subcommand)]
    pub command: WorkerSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum WorkerSubcommands {
    #[command(about = "Add a worker.")]
    New(WorkerNewArgs),
    #[command(about = "List workers.", alias = "list")]
    Ls(JsonArgs),
    #[command(about = "Show one worker by id.")]
    Show(ShowArgs),
    #[command(about = "Update worker fields.")]
    Update(WorkerUpdateArgs),
    #[command(about = "Remove a worker.")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Add a worker.")]
pub struct WorkerNewArgs {
    #[arg(help = "Worker name.")]
    pub name: String,

    #[arg(short = 't', long, help = "Trade (mason, electrician, ...).")]
    pub trade: Option<String>,

    #[arg(short = 'p', long, help = "Phone number.")]
    pub phone: Option<String>,

    #[arg(long = "rate", default_value = "0", help = "Hourly rate.")]
    pub hourly_rate: f64,
}

#[derive(Debug, Args)]
#[command(about = "Update a worker.")]
pub struct WorkerUpdateArgs {
    #[arg(help = "Worker id.")]
    pub id: String,

    #[arg(long, help = "Set name.")]
    pub name: Option<String>,

    #[arg(short = 't', long, help = "Set trade.")]
    pub trade: Option<String>,

    #[arg(short = 'p', long, help = "Set phone number.")]
    pub phone: Option<String>,

    #[arg(long = "rate", help = "Set hourly rate.")]
    pub hourly_rate: Option<f64>,

    #[arg(long, help = "Set active flag (true/false).")]
    pub active: Option<bool>,
}

#[derive(Debug, Args)]
#[command(about = "Worker log commands.")]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum LogSubcommands {
    #[command(about = "Record a day of work; the total cost freezes at creation.")]
    Add(LogAddArgs),
    #[command(about = "List worker logs.", alias = "list")]
    Ls(JsonArgs),
}

#[derive(Debug, Args)]
#[command(about = "Record a worker log.")]
pub struct LogAddArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(help = "Work date (YYYY-MM-DD).")]
    pub date: String,

    #[arg(short = 'c', long = "count", default_value = "1", help = "Workers on site.")]
    pub workers_count: u32,

    #[arg(long = "hours", default_value = "8", help = "Hours per worker.")]
    pub hours_per_worker: f64,

    #[arg(short = 'w', long = "worker", help = "Worker id to snapshot the rate from.")]
    pub worker_id: Option<String>,

    #[arg(long = "rate", help = "Hourly rate override.")]
    pub hourly_rate: Option<f64>,

    #[arg(short = 'n', long, help = "Free-form note.")]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Invoice commands.")]
pub struct InvoiceArgs {
    #[command(subcommand)]
    pub command: InvoiceSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum InvoiceSubcommands {
    #[command(about = "Create an invoice from line items.")]
    New(InvoiceNewArgs),
    #[command(about = "List invoices.", alias = "list")]
    Ls(JsonArgs),
    #[command(about = "Show one invoice by id.")]
    Show(ShowArgs),
    #[command(about = "Update invoice fields; totals recompute automatically.")]
    Update(InvoiceUpdateArgs),
    #[command(about = "Remove an invoice.")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Create an invoice.")]
pub struct InvoiceNewArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(
        short = 'i',
        long = "item",
        help = "Line item as 'description:quantity:unit-price' (repeatable)."
    )]
    pub items: Vec<String>,

    #[arg(long = "tax", default_value = "0", help = "Tax rate percentage.")]
    pub tax_rate: f64,

    #[arg(short = 'c', long = "client", help = "Client id.")]
    pub client_id: Option<String>,

    #[arg(short = 'n', long, help = "Invoice number.")]
    pub number: Option<String>,

    #[arg(long, help = "Invoice currency (usd or syp).")]
    pub currency: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Update an invoice.")]
pub struct InvoiceUpdateArgs {
    #[arg(help = "Invoice id.")]
    pub id: String,

    #[arg(
        short = 'i',
        long = "item",
        help = "Replace line items with 'description:quantity:unit-price' (repeatable)."
    )]
    pub items: Vec<String>,

    #[arg(long = "tax", help = "Set tax rate percentage.")]
    pub tax_rate: Option<f64>,

    #[arg(short = 'c', long = "client", help = "Set client id.")]
    pub client_id: Option<String>,

    #[arg(short = 'n', long, help = "Set invoice number.")]
    pub number: Option<String>,

    #[arg(short = 's', long, help = "Set status (draft, sent, paid, void).")]
    pub status: Option<String>,

    #[arg(short = 'f', long, help = "Force an otherwise invalid status change.")]
    pub force: bool,
}

#[derive(Debug, Args)]
#[command(about = "Payment commands.")]
pub struct PaymentArgs {
    #[command(subcommand)]
    pub command: PaymentSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum PaymentSubcommands {
    #[command(about = "Record a payment.")]
    Add(PaymentAddArgs),
    #[command(about = "List payments.", alias = "list")]
    Ls(JsonArgs),
    #[command(about = "Remove a payment.")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Record a payment.")]
pub struct PaymentAddArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(help = "Amount.")]
    pub amount: f64,

    #[arg(help = "Currency (usd or syp).")]
    pub currency: String,

    #[arg(short = 'i', long = "invoice", help = "Invoice id the payment settles.")]
    pub invoice_id: Option<String>,

    #[arg(short = 'm', long, help = "Payment method (cash, transfer, ...).")]
    pub method: Option<String>,

    #[arg(short = 'n', long, help = "Free-form note.")]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Expense commands.")]
pub struct ExpenseArgs {
    #[command(subcommand)]
    pub command: ExpenseSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum ExpenseSubcommands {
    #[command(about = "Record an expense.")]
    Add(ExpenseAddArgs),
    #[command(about = "List expenses.", alias = "list")]
    Ls(JsonArgs),
    #[command(about = "Remove an expense.")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Record an expense.")]
pub struct ExpenseAddArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(help = "Amount.")]
    pub amount: f64,

    #[arg(help = "Currency (usd or syp).")]
    pub currency: String,

    #[arg(short = 'c', long, help = "Expense category.")]
    pub category: Option<String>,

    #[arg(short = 'n', long, help = "Free-form note.")]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Daily report commands.")]
pub struct ReportArgs {
    #[command(subcommand)]
    pub command: ReportSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum ReportSubcommands {
    #[command(about = "File a daily site report.")]
    Add(ReportAddArgs),
    #[command(about = "List daily reports.", alias = "list")]
    Ls(JsonArgs),
    #[command(about = "Show one report by id.")]
    Show(ShowArgs),
}

#[derive(Debug, Args)]
#[command(about = "File a daily report.")]
pub struct ReportAddArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(help = "Report date (YYYY-MM-DD).")]
    pub date: String,

    #[arg(help = "Summary of the day.")]
    pub summary: String,

    #[arg(short = 'w', long, help = "Weather on site.")]
    pub weather: Option<String>,

    #[arg(long = "present", help = "Workers present.")]
    pub workers_present: Option<u32>,

    #[arg(short = 'm', long, help = "Materials used or delivered.")]
    pub materials: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Smart fund commands.")]
pub struct FundArgs {
    #[command(subcommand)]
    pub command: FundSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum FundSubcommands {
    #[command(about = "Deposit into a project's fund.")]
    Deposit(FundEntryArgs),
    #[command(about = "Spend from a project's fund.")]
    Spend(FundEntryArgs),
    #[command(about = "List fund transactions.", alias = "list")]
    Ls(FundListArgs),
    #[command(about = "Show a project's folded USD/SYP balance.")]
    Balance(FundBalanceArgs),
}

#[derive(Debug, Args)]
#[command(about = "Record a fund entry.")]
pub struct FundEntryArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(help = "Amount.")]
    pub amount: f64,

    #[arg(help = "Currency (usd or syp).")]
    pub currency: String,

    #[arg(short = 'n', long, help = "Free-form note.")]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "List fund transactions.")]
pub struct FundListArgs {
    #[arg(help = "Project id (omit for all projects).")]
    pub project_id: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Show a fund balance.")]
pub struct FundBalanceArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Location commands.")]
pub struct LocationArgs {
    #[command(subcommand)]
    pub command: LocationSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum LocationSubcommands {
    #[command(about = "Add a project location.")]
    Add(LocationAddArgs),
    #[command(about = "List locations.", alias = "list")]
    Ls(JsonArgs),
    #[command(about = "Remove a location.")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Add a location.")]
pub struct LocationAddArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(help = "Location name.")]
    pub name: String,

    #[arg(long, help = "Latitude.")]
    pub lat: Option<f64>,

    #[arg(long, help = "Longitude.")]
    pub lon: Option<f64>,

    #[arg(short = 'n', long, help = "Free-form note.")]
    pub note: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Uploaded file commands.")]
pub struct FileArgs {
    #[command(subcommand)]
    pub command: FileSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum FileSubcommands {
    #[command(about = "Copy a file into the project's folder and record its metadata.")]
    Attach(FileAttachArgs),
    #[command(about = "List uploaded files.", alias = "list")]
    Ls(FileListArgs),
}

#[derive(Debug, Args)]
#[command(about = "Attach a file.")]
pub struct FileAttachArgs {
    #[arg(help = "Project id.")]
    pub project_id: String,

    #[arg(help = "Path of the file to upload.")]
    pub source: PathBuf,
}

#[derive(Debug, Args)]
#[command(about = "List uploaded files.")]
pub struct FileListArgs {
    #[arg(help = "Project id (omit for all projects).")]
    pub project_id: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Notification commands.")]
pub struct NotificationArgs {
    #[command(subcommand)]
    pub command: NotificationSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum NotificationSubcommands {
    #[command(about = "List notifications.", alias = "list")]
    Ls(NotificationListArgs),
    #[command(about = "Mark a notification as read.")]
    Read(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "List notifications.")]
pub struct NotificationListArgs {
    #[arg(short = 'u', long, help = "Only unread notifications.")]
    pub unread: bool,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Show the activity trail.")]
pub struct ActivityArgs {
    #[arg(short = 'p', long = "project", help = "Filter by project id.")]
    pub project_id: Option<String>,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "User roster commands.")]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum UserSubcommands {
    #[command(about = "Add a user to the roster.")]
    Add(UserAddArgs),
    #[command(about = "List users.", alias = "list")]
    Ls(JsonArgs),
    #[command(about = "Remove a user.")]
    Rm(IdArgs),
}

#[derive(Debug, Args)]
#[command(about = "Add a user.")]
pub struct UserAddArgs {
    #[arg(help = "Username.")]
    pub username: String,

    #[arg(default_value = "viewer", help = "Role (admin, manager, viewer).")]
    pub role: String,
}

#[derive(Debug, Args)]
#[command(about = "Settings commands.")]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum SettingsSubcommands {
    #[command(about = "Show current settings.")]
    Show(JsonArgs),
    #[command(about = "Change settings.")]
    Set(SettingsSetArgs),
}

#[derive(Debug, Args)]
#[command(about = "Change settings.")]
pub struct SettingsSetArgs {
    #[arg(long = "business", help = "Set business name.")]
    pub business_name: Option<String>,

    #[arg(long = "owner", help = "Set owner name.")]
    pub owner_name: Option<String>,

    #[arg(long = "currency", help = "Set default currency (usd or syp).")]
    pub default_currency: Option<String>,

    #[arg(long, help = "Set language code.")]
    pub language: Option<String>,
}

#[derive(Debug, Args)]
#[command(about = "Backup commands.")]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupSubcommands,
}

#[derive(Debug, Subcommand)]
pub enum BackupSubcommands {
    #[command(about = "Write every resource into one bundle file (stdout if omitted).")]
    Export(BackupExportArgs),
    #[command(about = "Restore resources present in a bundle file; others stay untouched.")]
    Import(BackupImportArgs),
}

#[derive(Debug, Args)]
#[command(about = "Export a backup bundle.")]
pub struct BackupExportArgs {
    #[arg(short = 'o', long = "out", help = "Bundle destination path.")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[command(about = "Import a backup bundle.")]
pub struct BackupImportArgs {
    #[arg(help = "Bundle file to restore from.")]
    pub bundle: PathBuf,
}

#[derive(Debug, Args)]
#[command(about = "Remember or show the sync root.")]
pub struct SyncRootArgs {
    #[arg(help = "Folder to remember as the sync root (omit to show the current one).")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[command(about = "Run diagnostics.")]
pub struct DoctorArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Validate on-disk documents.")]
pub struct FsckArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Generate or install shell completions.")]
pub struct CompletionsArgs {
    #[arg(help = "Shell name (bash, zsh, fish). Auto-detected if omitted.")]
    pub shell: Option<String>,

    #[arg(
        short = 'i',
        long = "install",
        help = "Write completions to the canonical path for the shell."
    )]
    pub install: bool,
}

#[derive(Debug, Args)]
#[command(about = "Show one record.")]
pub struct ShowArgs {
    #[arg(help = "Record id.")]
    pub id: String,

    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
#[command(about = "Remove one record.")]
pub struct IdArgs {
    #[arg(help = "Record id.")]
    pub id: String,
}

#[derive(Debug, Args)]
#[command(about = "List output options.")]
pub struct JsonArgs {
    #[arg(short = 'j', long, help = "Render machine-readable JSON.")]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
