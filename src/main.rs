mod app;
mod backup;
mod cli;
mod completions;
mod doctor;
mod domain;
mod fsck;
mod ids;
mod init;
mod listing;
mod store;
mod ui;
mod workflow;

use std::str::FromStr;

use app::AppError;
use domain::fund::{Currency, FundKind};
use domain::invoice::LineItem;
use ids::display_id;
use store::handle::{HandleDesc, HandleStore};
use store::{BackendKind, Store};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn print_json(value: &impl serde::Serialize) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).expect("json serialization should work")
    );
}

fn run() -> Result<(), AppError> {
    use clap::Parser;
    use cli::{
        BackupSubcommands, ClientSubcommands, Commands, ExpenseSubcommands, FileSubcommands,
        FundSubcommands, InvoiceSubcommands, LocationSubcommands, LogSubcommands,
        NotificationSubcommands, PaymentSubcommands, ProjectSubcommands, ReportSubcommands,
        SettingsSubcommands, TaskSubcommands, UserSubcommands, WorkerSubcommands,
    };

    let cli = cli::Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        return completions::run_completions_command(args.shell.as_deref(), args.install);
    }

    let handles = HandleStore::from_env();

    match &cli.command {
        Commands::Init => {
            let (store, _) = resolve_store(&cli, &handles)?;
            init::init_all(&store, &handles)?;
            return Ok(());
        }
        Commands::Uninit => {
            init::uninit_all(&handles)?;
            return Ok(());
        }
        Commands::SyncRoot(args) => {
            match args.path.as_ref() {
                Some(path) => {
                    handles.save_sync_root(&HandleDesc {
                        kind: BackendKind::Directory,
                        path: path.clone(),
                    });
                    println!("sync root remembered: {}", path.display());
                }
                None => match handles.sync_root() {
                    Some(desc) => println!("sync root: {}", desc.path.display()),
                    None => println!("no sync root remembered"),
                },
            }
            return Ok(());
        }
        _ => {}
    }

    let (store, handle_saved) = resolve_store(&cli, &handles)?;

    if let Commands::Doctor(args) = &cli.command {
        let report = doctor::run_doctor(&store, handle_saved);
        if args.json {
            print_json(&report);
        } else {
            for check in &report.checks {
                println!(
                    "{} [{}] {}",
                    check.name,
                    serde_json::to_string(&check.status)
                        .expect("status serialization should work")
                        .trim_matches('"'),
                    check.detail
                );
            }
        }
        if report.failure_count() > 0 {
            return Err(AppError::InvalidArgument(format!(
                "doctor found {} failing check(s)",
                report.failure_count()
            )));
        }
        return Ok(());
    }

    if let Commands::Fsck(args) = &cli.command {
        let Some(root) = store.directory_root() else {
            return Err(AppError::InvalidArgument(
                "fsck inspects files directly and requires a directory storage root".to_string(),
            ));
        };
        let report = run_fsck_at(root)?;
        if args.json {
            print_json(&report);
        } else {
            println!(
                "fsck resources_scanned={} issues={}",
                report.resources_scanned,
                report.issues.len()
            );
            for issue in &report.issues {
                println!("  - {}: {}", issue.resource, issue.message);
            }
        }
        if !report.ok() {
            return Err(AppError::InvalidArgument(format!(
                "fsck found {} error(s)",
                report.error_count()
            )));
        }
        return Ok(());
    }

    let app = app::App::open(store)?;
    let palette = ui::Palette::auto();

    match cli.command {
        Commands::Project(args) => match args.command {
            ProjectSubcommands::New(new) => {
                let project = app.create_project(app::NewProject {
                    name: new.name,
                    client_id: new.client_id,
                    budget: new.budget,
                    currency: parse_optional_currency(new.currency.as_deref())?,
                    start_date: new.start_date,
                    end_date: new.end_date,
                    description: new.description,
                })?;
                println!(
                    "created {} {} {}",
                    palette.id(display_id(&project.id)),
                    palette.status(&project.status),
                    project.name
                );
            }
            ProjectSubcommands::Ls(args) => {
                let filter = listing::ProjectListFilter {
                    status: args.status,
                    client_id: args.client_id,
                    query: args.query,
                };
                let projects = listing::apply_project_filters(app.list_projects()?, &filter);
                if args.json {
                    print_json(&projects);
                } else {
                    ui::print_project_list(&projects, &filter);
                }
            }
            ProjectSubcommands::Show(args) => match app.show_project(&args.id)? {
                Some(project) => {
                    if args.json {
                        print_json(&project);
                    } else {
                        println!(
                            "{} {} {}",
                            palette.id(&project.id),
                            palette.status(&project.status),
                            project.name
                        );
                        if let Some(client_id) = project.client_id.as_deref() {
                            println!("client: {client_id}");
                        }
                        if let Some(budget) = project.budget {
                            let code = project.currency.map(Currency::code).unwrap_or("");
                            println!("budget: {} {code}", ui::fmt_amount(budget));
                        }
                        if let Some(description) = project.description.as_deref() {
                            println!("{description}");
                        }
                    }
                }
                None => return Err(AppError::NotFound(args.id)),
            },
            ProjectSubcommands::Update(update) => {
                let patch = domain::project::ProjectPatch {
                    name: update.name,
                    status: update.status,
                    client_id: update.client_id,
                    budget: update.budget,
                    currency: parse_optional_currency(update.currency.as_deref())?,
                    start_date: update.start_date,
                    end_date: update.end_date,
                    description: update.description,
                };
                match app.update_project(&update.id, patch, update.force)? {
                    Some(project) => println!(
                        "updated {} {} {}",
                        palette.id(display_id(&project.id)),
                        palette.status(&project.status),
                        project.name
                    ),
                    None => println!("project '{}' not found; nothing changed", update.id),
                }
            }
            ProjectSubcommands::Rm(args) => {
                if app.remove_project(&args.id)? {
                    println!("removed project {}", palette.id(display_id(&args.id)));
                } else {
                    println!("project '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::Task(args) => match args.command {
            TaskSubcommands::New(new) => {
                let task = app.create_task(app::NewTask {
                    project_id: new.project_id,
                    title: new.title,
                    priority: new.priority,
                    due_date: new.due_date,
                    worker_id: new.worker_id,
                })?;
                println!(
                    "created {} {} {}",
                    palette.id(display_id(&task.id)),
                    palette.status(&task.status),
                    task.title
                );
            }
            TaskSubcommands::Ls(args) => {
                let filter = listing::TaskListFilter {
                    project_id: args.project_id,
                    status: args.status,
                    query: args.query,
                };
                let tasks = listing::apply_task_filters(app.list_tasks()?, &filter);
                if args.json {
                    print_json(&tasks);
                } else {
                    ui::print_task_list(&tasks, &filter);
                }
            }
            TaskSubcommands::Show(args) => match app.show_task(&args.id)? {
                Some(task) => {
                    if args.json {
                        print_json(&task);
                    } else {
                        println!(
                            "{} {} {}",
                            palette.id(&task.id),
                            palette.status(&task.status),
                            task.title
                        );
                        println!("project: {}", task.project_id);
                        if let Some(due) = task.due_date.as_deref() {
                            println!("due: {due}");
                        }
                    }
                }
                None => return Err(AppError::NotFound(args.id)),
            },
            TaskSubcommands::Update(update) => {
                let patch = domain::task::TaskPatch {
                    title: update.title,
                    status: update.status,
                    priority: update.priority,
                    due_date: update.due_date,
                    worker_id: update.worker_id,
                };
                match app.update_task(&update.id, patch, update.force)? {
                    Some(task) => println!(
                        "updated {} {} {}",
                        palette.id(display_id(&task.id)),
                        palette.status(&task.status),
                        task.title
                    ),
                    None => println!("task '{}' not found; nothing changed", update.id),
                }
            }
            TaskSubcommands::Rm(args) => {
                if app.remove_task(&args.id)? {
                    println!("removed task {}", palette.id(display_id(&args.id)));
                } else {
                    println!("task '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::Client(args) => match args.command {
            ClientSubcommands::New(new) => {
                let client = app.create_client(app::NewClient {
                    name: new.name,
                    phone: new.phone,
                    email: new.email,
                    address: new.address,
                    note: new.note,
                })?;
                println!(
                    "added client {} {}",
                    palette.id(display_id(&client.id)),
                    client.name
                );
            }
            ClientSubcommands::Ls(args) => {
                let clients = app.list_clients()?;
                if args.json {
                    print_json(&clients);
                } else {
                    for client in &clients {
                        let phone = client.phone.as_deref().unwrap_or("-");
                        println!(
                            "{} {} {}",
                            palette.id(display_id(&client.id)),
                            client.name,
                            palette.dim(phone)
                        );
                    }
                    println!("{}", palette.dim(&format!("{} client(s)", clients.len())));
                }
            }
            ClientSubcommands::Show(args) => match app.show_client(&args.id)? {
                Some(client) => {
                    if args.json {
                        print_json(&client);
                    } else {
                        println!("{} {}", palette.id(&client.id), client.name);
                        if let Some(phone) = client.phone.as_deref() {
                            println!("phone: {phone}");
                        }
                        if let Some(email) = client.email.as_deref() {
                            println!("email: {email}");
                        }
                        if let Some(address) = client.address.as_deref() {
                            println!("address: {address}");
                        }
                    }
                }
                None => return Err(AppError::NotFound(args.id)),
            },
            ClientSubcommands::Update(update) => {
                let patch = domain::client::ClientPatch {
                    name: update.name,
                    phone: update.phone,
                    email: update.email,
                    address: update.address,
                    note: update.note,
                };
                match app.update_client(&update.id, patch)? {
                    Some(client) => println!("updated client {}", client.name),
                    None => println!("client '{}' not found; nothing changed", update.id),
                }
            }
            ClientSubcommands::Rm(args) => {
                if app.remove_client(&args.id)? {
                    println!("removed client {}", palette.id(display_id(&args.id)));
                } else {
                    println!("client '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::Worker(args) => match args.command {
            WorkerSubcommands::New(new) => {
                let worker =
                    app.create_worker(&new.name, new.trade, new.phone, new.hourly_rate)?;
                println!(
                    "added worker {} {} (rate {})",
                    palette.id(display_id(&worker.id)),
                    worker.name,
                    ui::fmt_amount(worker.hourly_rate)
                );
            }
            WorkerSubcommands::Ls(args) => {
                let workers = app.list_workers()?;
                if args.json {
                    print_json(&workers);
                } else {
                    for worker in &workers {
                        let trade = worker.trade.as_deref().unwrap_or("-");
                        let activity = if worker.active { "" } else { " (inactive)" };
                        println!(
                            "{} {} {}{}",
                            palette.id(display_id(&worker.id)),
                            worker.name,
                            palette.dim(trade),
                            activity
                        );
                    }
                    println!("{}", palette.dim(&format!("{} worker(s)", workers.len())));
                }
            }
            WorkerSubcommands::Show(args) => match app.show_worker(&args.id)? {
                Some(worker) => {
                    if args.json {
                        print_json(&worker);
                    } else {
                        println!("{} {}", palette.id(&worker.id), worker.name);
                        println!("rate: {}", ui::fmt_amount(worker.hourly_rate));
                        println!("active: {}", worker.active);
                    }
                }
                None => return Err(AppError::NotFound(args.id)),
            },
            WorkerSubcommands::Update(update) => {
                let patch = domain::worker::WorkerPatch {
                    name: update.name,
                    trade: update.trade,
                    phone: update.phone,
                    hourly_rate: update.hourly_rate,
                    active: update.active,
                };
                match app.update_worker(&update.id, patch)? {
                    Some(worker) => println!("updated worker {}", worker.name),
                    None => println!("worker '{}' not found; nothing changed", update.id),
                }
            }
            WorkerSubcommands::Rm(args) => {
                if app.remove_worker(&args.id)? {
                    println!("removed worker {}", palette.id(display_id(&args.id)));
                } else {
                    println!("worker '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::Log(args) => match args.command {
            LogSubcommands::Add(add) => {
                let log = app.add_worker_log(app::NewWorkerLog {
                    project_id: add.project_id,
                    worker_id: add.worker_id,
                    date: add.date,
                    workers_count: add.workers_count,
                    hours_per_worker: add.hours_per_worker,
                    hourly_rate: add.hourly_rate,
                    note: add.note,
                })?;
                println!(
                    "logged {} worker(s) x {}h on {} = {}",
                    log.workers_count,
                    ui::fmt_amount(log.hours_per_worker),
                    log.date,
                    ui::fmt_amount(log.total_cost)
                );
            }
            LogSubcommands::Ls(args) => {
                let logs = app.list_worker_logs()?;
                if args.json {
                    print_json(&logs);
                } else {
                    for log in &logs {
                        println!(
                            "{} {} {}x{}h cost {}",
                            palette.id(display_id(&log.id)),
                            log.date,
                            log.workers_count,
                            ui::fmt_amount(log.hours_per_worker),
                            ui::fmt_amount(log.total_cost)
                        );
                    }
                    println!("{}", palette.dim(&format!("{} log(s)", logs.len())));
                }
            }
        },
        Commands::Invoice(args) => match args.command {
            InvoiceSubcommands::New(new) => {
                let items = parse_line_items(&new.items)?;
                let invoice = app.create_invoice(app::NewInvoice {
                    project_id: new.project_id,
                    client_id: new.client_id,
                    number: new.number,
                    currency: parse_optional_currency(new.currency.as_deref())?,
                    items,
                    tax_rate: new.tax_rate,
                })?;
                println!(
                    "created invoice {} {} total {}",
                    palette.id(display_id(&invoice.id)),
                    palette.status(&invoice.status),
                    ui::fmt_amount(invoice.total)
                );
            }
            InvoiceSubcommands::Ls(args) => {
                let invoices = app.list_invoices()?;
                if args.json {
                    print_json(&invoices);
                } else {
                    for invoice in &invoices {
                        let number = invoice.number.as_deref().unwrap_or("-");
                        println!(
                            "{} {} {} total {}",
                            palette.id(display_id(&invoice.id)),
                            palette.status(&invoice.status),
                            number,
                            ui::fmt_amount(invoice.total)
                        );
                    }
                    println!("{}", palette.dim(&format!("{} invoice(s)", invoices.len())));
                }
            }
            InvoiceSubcommands::Show(args) => match app.show_invoice(&args.id)? {
                Some(invoice) => {
                    if args.json {
                        print_json(&invoice);
                    } else {
                        println!(
                            "{} {} project {}",
                            palette.id(&invoice.id),
                            palette.status(&invoice.status),
                            invoice.project_id
                        );
                        for item in &invoice.items {
                            println!(
                                "  {} x {} @ {}",
                                item.description,
                                ui::fmt_amount(item.quantity),
                                ui::fmt_amount(item.unit_price)
                            );
                        }
                        println!(
                            "subtotal {} tax {} total {}",
                            ui::fmt_amount(invoice.subtotal),
                            ui::fmt_amount(invoice.tax_amount),
                            ui::fmt_amount(invoice.total)
                        );
                    }
                }
                None => return Err(AppError::NotFound(args.id)),
            },
            InvoiceSubcommands::Update(update) => {
                let items = if update.items.is_empty() {
                    None
                } else {
                    Some(parse_line_items(&update.items)?)
                };
                let patch = domain::invoice::InvoicePatch {
                    client_id: update.client_id,
                    number: update.number,
                    status: update.status,
                    items,
                    tax_rate: update.tax_rate,
                };
                match app.update_invoice(&update.id, patch, update.force)? {
                    Some(invoice) => println!(
                        "updated invoice {} {} total {}",
                        palette.id(display_id(&invoice.id)),
                        palette.status(&invoice.status),
                        ui::fmt_amount(invoice.total)
                    ),
                    None => println!("invoice '{}' not found; nothing changed", update.id),
                }
            }
            InvoiceSubcommands::Rm(args) => {
                if app.remove_invoice(&args.id)? {
                    println!("removed invoice {}", palette.id(display_id(&args.id)));
                } else {
                    println!("invoice '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::Payment(args) => match args.command {
            PaymentSubcommands::Add(add) => {
                let payment = app.record_payment(app::NewPayment {
                    project_id: add.project_id,
                    invoice_id: add.invoice_id,
                    currency: Currency::from_str(&add.currency)?,
                    amount: add.amount,
                    method: add.method,
                    note: add.note,
                })?;
                println!(
                    "recorded payment {} {} {}",
                    palette.id(display_id(&payment.id)),
                    ui::fmt_amount(payment.amount),
                    payment.currency
                );
            }
            PaymentSubcommands::Ls(args) => {
                let payments = app.list_payments()?;
                if args.json {
                    print_json(&payments);
                } else {
                    for payment in &payments {
                        println!(
                            "{} {} {} {}",
                            palette.id(display_id(&payment.id)),
                            payment.created_at,
                            ui::fmt_amount(payment.amount),
                            payment.currency
                        );
                    }
                    println!("{}", palette.dim(&format!("{} payment(s)", payments.len())));
                }
            }
            PaymentSubcommands::Rm(args) => {
                if app.remove_payment(&args.id)? {
                    println!("removed payment {}", palette.id(display_id(&args.id)));
                } else {
                    println!("payment '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::Expense(args) => match args.command {
            ExpenseSubcommands::Add(add) => {
                let expense = app.record_expense(app::NewExpense {
                    project_id: add.project_id,
                    currency: Currency::from_str(&add.currency)?,
                    amount: add.amount,
                    category: add.category,
                    note: add.note,
                })?;
                println!(
                    "recorded expense {} {} {}",
                    palette.id(display_id(&expense.id)),
                    ui::fmt_amount(expense.amount),
                    expense.currency
                );
            }
            ExpenseSubcommands::Ls(args) => {
                let expenses = app.list_expenses()?;
                if args.json {
                    print_json(&expenses);
                } else {
                    for expense in &expenses {
                        let category = expense.category.as_deref().unwrap_or("-");
                        println!(
                            "{} {} {} {}",
                            palette.id(display_id(&expense.id)),
                            palette.dim(category),
                            ui::fmt_amount(expense.amount),
                            expense.currency
                        );
                    }
                    println!("{}", palette.dim(&format!("{} expense(s)", expenses.len())));
                }
            }
            ExpenseSubcommands::Rm(args) => {
                if app.remove_expense(&args.id)? {
                    println!("removed expense {}", palette.id(display_id(&args.id)));
                } else {
                    println!("expense '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::Report(args) => match args.command {
            ReportSubcommands::Add(add) => {
                let report = app.file_report(app::NewDailyReport {
                    project_id: add.project_id,
                    date: add.date,
                    weather: add.weather,
                    workers_present: add.workers_present,
                    summary: add.summary,
                    materials: add.materials,
                })?;
                println!(
                    "filed report {} for {}",
                    palette.id(display_id(&report.id)),
                    report.date
                );
            }
            ReportSubcommands::Ls(args) => {
                let reports = app.list_reports()?;
                if args.json {
                    print_json(&reports);
                } else {
                    for report in &reports {
                        println!(
                            "{} {} {}",
                            palette.id(display_id(&report.id)),
                            report.date,
                            report.summary
                        );
                    }
                    println!("{}", palette.dim(&format!("{} report(s)", reports.len())));
                }
            }
            ReportSubcommands::Show(args) => match app.show_report(&args.id)? {
                Some(report) => {
                    if args.json {
                        print_json(&report);
                    } else {
                        println!("{} {}", palette.id(&report.id), report.date);
                        if let Some(weather) = report.weather.as_deref() {
                            println!("weather: {weather}");
                        }
                        if let Some(present) = report.workers_present {
                            println!("workers present: {present}");
                        }
                        println!("{}", report.summary);
                    }
                }
                None => return Err(AppError::NotFound(args.id)),
            },
        },
        Commands::Fund(args) => match args.command {
            FundSubcommands::Deposit(entry) => {
                let txn = app.fund_record(
                    &entry.project_id,
                    FundKind::Deposit,
                    Currency::from_str(&entry.currency)?,
                    entry.amount,
                    entry.note,
                )?;
                println!(
                    "deposited {} {} into {}",
                    ui::fmt_amount(txn.amount),
                    txn.currency,
                    palette.id(display_id(&txn.project_id))
                );
            }
            FundSubcommands::Spend(entry) => {
                let txn = app.fund_record(
                    &entry.project_id,
                    FundKind::Expense,
                    Currency::from_str(&entry.currency)?,
                    entry.amount,
                    entry.note,
                )?;
                println!(
                    "spent {} {} from {}",
                    ui::fmt_amount(txn.amount),
                    txn.currency,
                    palette.id(display_id(&txn.project_id))
                );
            }
            FundSubcommands::Ls(args) => {
                let transactions = app.fund_transactions(args.project_id.as_deref())?;
                if args.json {
                    print_json(&transactions);
                } else {
                    for txn in &transactions {
                        let sign = match txn.kind {
                            FundKind::Deposit => "+",
                            FundKind::Expense => "-",
                        };
                        println!(
                            "{} {} {}{} {}",
                            palette.id(display_id(&txn.id)),
                            txn.created_at,
                            sign,
                            ui::fmt_amount(txn.amount),
                            txn.currency
                        );
                    }
                    println!(
                        "{}",
                        palette.dim(&format!("{} transaction(s)", transactions.len()))
                    );
                }
            }
            FundSubcommands::Balance(args) => {
                let balance = app.fund_balance(&args.project_id)?;
                if args.json {
                    print_json(&balance);
                } else {
                    ui::print_fund_balance(&args.project_id, &balance);
                }
            }
        },
        Commands::Location(args) => match args.command {
            LocationSubcommands::Add(add) => {
                let location = app.add_location(app::NewLocation {
                    project_id: add.project_id,
                    name: add.name,
                    latitude: add.lat,
                    longitude: add.lon,
                    note: add.note,
                })?;
                println!(
                    "added location {} {}",
                    palette.id(display_id(&location.id)),
                    location.name
                );
            }
            LocationSubcommands::Ls(args) => {
                let locations = app.list_locations()?;
                if args.json {
                    print_json(&locations);
                } else {
                    for location in &locations {
                        let coords = match (location.latitude, location.longitude) {
                            (Some(lat), Some(lon)) => format!("({lat}, {lon})"),
                            _ => String::new(),
                        };
                        println!(
                            "{} {} {}",
                            palette.id(display_id(&location.id)),
                            location.name,
                            palette.dim(&coords)
                        );
                    }
                    println!(
                        "{}",
                        palette.dim(&format!("{} location(s)", locations.len()))
                    );
                }
            }
            LocationSubcommands::Rm(args) => {
                if app.remove_location(&args.id)? {
                    println!("removed location {}", palette.id(display_id(&args.id)));
                } else {
                    println!("location '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::File(args) => match args.command {
            FileSubcommands::Attach(attach) => {
                let meta = app.attach_file(&attach.project_id, &attach.source)?;
                println!(
                    "attached {} as {} ({} bytes)",
                    meta.file_name, meta.stored_name, meta.size_bytes
                );
            }
            FileSubcommands::Ls(args) => {
                let files = app.list_files(args.project_id.as_deref())?;
                if args.json {
                    print_json(&files);
                } else {
                    for meta in &files {
                        println!(
                            "{} {} {} bytes",
                            palette.id(display_id(&meta.id)),
                            meta.file_name,
                            meta.size_bytes
                        );
                    }
                    println!("{}", palette.dim(&format!("{} file(s)", files.len())));
                }
            }
        },
        Commands::Notification(args) => match args.command {
            NotificationSubcommands::Ls(args) => {
                let notifications = app.list_notifications(args.unread)?;
                if args.json {
                    print_json(&notifications);
                } else {
                    for notification in &notifications {
                        let marker = if notification.read { " " } else { "*" };
                        println!(
                            "{marker} {} {} {}",
                            palette.id(display_id(&notification.id)),
                            notification.title,
                            palette.dim(&notification.body)
                        );
                    }
                    println!(
                        "{}",
                        palette.dim(&format!("{} notification(s)", notifications.len()))
                    );
                }
            }
            NotificationSubcommands::Read(args) => match app.mark_notification_read(&args.id)? {
                Some(notification) => println!("marked '{}' as read", notification.title),
                None => println!("notification '{}' not found; nothing changed", args.id),
            },
        },
        Commands::Activity(args) => {
            let events = app.activity_log(args.project_id.as_deref())?;
            if args.json {
                print_json(&events);
            } else {
                for event in &events {
                    println!(
                        "{} {} {}",
                        palette.dim(&event.created_at),
                        event.kind,
                        event.message
                    );
                }
                println!("{}", palette.dim(&format!("{} event(s)", events.len())));
            }
        }
        Commands::User(args) => match args.command {
            UserSubcommands::Add(add) => {
                let user = app.add_user(&add.username, &add.role)?;
                println!(
                    "added user {} {} as {}",
                    palette.id(display_id(&user.id)),
                    user.username,
                    user.role
                );
            }
            UserSubcommands::Ls(args) => {
                let users = app.list_users()?;
                if args.json {
                    print_json(&users);
                } else {
                    for user in &users {
                        println!(
                            "{} {} {}",
                            palette.id(display_id(&user.id)),
                            user.username,
                            palette.dim(&user.role)
                        );
                    }
                    println!("{}", palette.dim(&format!("{} user(s)", users.len())));
                }
            }
            UserSubcommands::Rm(args) => {
                if app.remove_user(&args.id)? {
                    println!("removed user {}", palette.id(display_id(&args.id)));
                } else {
                    println!("user '{}' not found; nothing removed", args.id);
                }
            }
        },
        Commands::Settings(args) => match args.command {
            SettingsSubcommands::Show(args) => {
                let settings = app.settings()?;
                if args.json {
                    print_json(&settings);
                } else {
                    println!("business: {}", settings.business_name);
                    println!("owner: {}", settings.owner_name);
                    println!("default currency: {}", settings.default_currency);
                    println!("language: {}", settings.language);
                }
            }
            SettingsSubcommands::Set(set) => {
                let settings = app.update_settings(app::SettingsPatch {
                    business_name: set.business_name,
                    owner_name: set.owner_name,
                    default_currency: parse_optional_currency(set.default_currency.as_deref())?,
                    language: set.language,
                })?;
                println!("settings updated (business '{}')", settings.business_name);
            }
        },
        Commands::Backup(args) => match args.command {
            BackupSubcommands::Export(export) => {
                let bundle = app.export_backup()?;
                match export.out {
                    Some(path) => {
                        let mut bytes = serde_json::to_vec_pretty(&bundle)
                            .expect("bundle serialization should work");
                        bytes.push(b'\n');
                        std::fs::write(&path, bytes)?;
                        println!("backup written to {}", path.display());
                    }
                    None => print_json(&bundle),
                }
            }
            BackupSubcommands::Import(import) => {
                let raw = std::fs::read(&import.bundle)?;
                let bundle: serde_json::Value = serde_json::from_slice(&raw).map_err(|err| {
                    AppError::InvalidArgument(format!(
                        "bundle '{}' is not valid JSON: {err}",
                        import.bundle.display()
                    ))
                })?;
                let summary = app.import_backup(&bundle)?;
                println!(
                    "restored {} resource(s){}",
                    summary.restored.len(),
                    if summary.ignored.is_empty() {
                        String::new()
                    } else {
                        format!(", ignored {}", summary.ignored.join(", "))
                    }
                );
            }
        },
        Commands::Init | Commands::Uninit | Commands::SyncRoot(_) => {
            unreachable!("root management is handled before app initialization")
        }
        Commands::Doctor(_) | Commands::Fsck(_) => {
            unreachable!("diagnostics are handled before app initialization")
        }
        Commands::Completions(_) => {
            unreachable!("completions are handled before app initialization")
        }
    }

    Ok(())
}

fn resolve_store(cli: &cli::Cli, handles: &HandleStore) -> Result<(Store, bool), AppError> {
    let handle_saved = handles.root().is_some();
    if let Some(root) = cli.root.as_ref() {
        let store = if cli.kv {
            Store::open_key_value(root)?
        } else {
            Store::open_directory(root)?
        };
        return Ok((store, handle_saved));
    }

    match handles.root() {
        Some(desc) => {
            let store = match desc.kind {
                BackendKind::Directory => Store::open_directory(&desc.path)?,
                BackendKind::KeyValue => Store::open_key_value(&desc.path)?,
            };
            Ok((store, true))
        }
        None => Err(AppError::InvalidArgument(
            "no storage root connected; pass --root <dir> or run 'sbk init --root <dir>'"
                .to_string(),
        )),
    }
}

fn run_fsck_at(root: &std::path::Path) -> Result<fsck::FsckReport, AppError> {
    fsck::run_fsck(root).map_err(|fsck::FsckError::Io(err)| AppError::Io(err))
}

fn parse_optional_currency(raw: Option<&str>) -> Result<Option<Currency>, AppError> {
    match raw {
        Some(value) => Ok(Some(Currency::from_str(value)?)),
        None => Ok(None),
    }
}

/// `description:quantity:unit-price`; the description may itself contain
/// colons, so numbers are taken from the right.
fn parse_line_items(raw_items: &[String]) -> Result<Vec<LineItem>, AppError> {
    raw_items.iter().map(|raw| parse_line_item(raw)).collect()
}

fn parse_line_item(raw: &str) -> Result<LineItem, AppError> {
    let mut tail = raw.rsplitn(3, ':');
    let unit_price = tail.next().unwrap_or_default();
    let quantity = tail.next().unwrap_or_default();
    let description = tail.next().unwrap_or_default().trim();

    if description.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "invalid line item '{raw}': expected description:quantity:unit-price"
        )));
    }
    let quantity: f64 = quantity.trim().parse().map_err(|_| {
        AppError::InvalidArgument(format!("invalid line item quantity in '{raw}'"))
    })?;
    let unit_price: f64 = unit_price.trim().parse().map_err(|_| {
        AppError::InvalidArgument(format!("invalid line item unit price in '{raw}'"))
    })?;

    Ok(LineItem {
        description: description.to_string(),
        quantity,
        unit_price,
    })
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
