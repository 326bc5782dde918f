use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use uuid::Uuid;

struct Workspace {
    home: PathBuf,
    root: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let base = std::env::temp_dir().join(format!("sitebook-cli-{}", Uuid::now_v7()));
        let home = base.join("home");
        let root = base.join("site");
        std::fs::create_dir_all(&home).expect("home should be creatable");
        Self { home, root }
    }

    fn base(&self) -> &Path {
        self.home.parent().expect("workspace base should exist")
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(self.base());
    }
}

fn run_sbk(ws: &Workspace, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sitebook"))
        .env("SITEBOOK_HOME", &ws.home)
        .env_remove("SITEBOOK_ROOT")
        .args(args)
        .output()
        .expect("sbk command should run")
}

fn run_sbk_rooted(ws: &Workspace, args: &[&str]) -> Output {
    let root = ws.root.to_str().expect("utf8 root").to_string();
    let mut full = vec!["--root", root.as_str()];
    full.extend_from_slice(args);
    run_sbk(ws, &full)
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout should be JSON ({err})\nstdout: {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn init_seeds_resources_and_remembers_the_root() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));

    for resource in [
        "projects", "tasks", "clients", "activity", "settings", "workers",
        "project_files_meta", "invoices", "payments", "expenses", "workers_log",
        "daily_reports", "notifications", "permissions", "project_locations", "smart_fund",
    ] {
        assert!(
            ws.root.join(format!("{resource}.json")).is_file(),
            "missing {resource}.json"
        );
    }

    // The remembered root makes --root unnecessary from now on.
    let listed = run_sbk(&ws, &["project", "ls", "--json"]);
    assert_success(&listed);
    assert_eq!(stdout_json(&listed), Value::Array(Vec::new()));

    // Re-running init must not clobber data.
    assert_success(&run_sbk(&ws, &["project", "new", "Villa"]));
    assert_success(&run_sbk_rooted(&ws, &["init"]));
    let after = run_sbk(&ws, &["project", "ls", "--json"]);
    assert_success(&after);
    assert_eq!(stdout_json(&after).as_array().map(Vec::len), Some(1));
}

#[test]
fn uninit_forgets_the_root() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));
    assert_success(&run_sbk(&ws, &["uninit"]));

    let output = run_sbk(&ws, &["project", "ls"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no storage root"), "stderr: {stderr}");
}

#[test]
fn project_and_task_lifecycle() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));
    assert_success(&run_sbk(&ws, &["project", "new", "Villa", "--budget", "50000"]));

    let projects = stdout_json(&run_sbk(&ws, &["project", "ls", "--json"]));
    let project_id = projects[0]["id"].as_str().expect("project id").to_string();
    assert_eq!(projects[0]["status"], "planned");
    assert_eq!(projects[0]["budget"], 50000.0);

    assert_success(&run_sbk(&ws, &["task", "new", &project_id, "pour slab"]));
    let tasks = stdout_json(&run_sbk(
        &ws,
        &["task", "ls", "--json", "--project", &project_id],
    ));
    let task_id = tasks[0]["id"].as_str().expect("task id").to_string();
    assert_eq!(tasks[0]["status"], "pending");

    assert_success(&run_sbk(
        &ws,
        &["task", "update", &task_id, "--status", "in_progress"],
    ));

    // pending -> done skips a step and must fail without --force.
    assert_success(&run_sbk(&ws, &["task", "new", &project_id, "wiring"]));
    let tasks = stdout_json(&run_sbk(
        &ws,
        &["task", "ls", "--json", "--status", "pending"],
    ));
    let wiring_id = tasks[0]["id"].as_str().expect("task id").to_string();
    let denied = run_sbk(&ws, &["task", "update", &wiring_id, "--status", "done"]);
    assert!(!denied.status.success());
    assert_success(&run_sbk(
        &ws,
        &["task", "update", &wiring_id, "--status", "done", "--force"],
    ));
}

#[test]
fn updating_an_unknown_id_reports_but_does_not_fail() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));

    let output = run_sbk(&ws, &["project", "update", "ghost", "--name", "Renamed"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("not found"), "stdout: {stdout}");

    let removed = run_sbk(&ws, &["project", "rm", "ghost"]);
    assert_success(&removed);
}

#[test]
fn invoice_totals_are_derived_from_items() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));
    assert_success(&run_sbk(
        &ws,
        &[
            "invoice", "new", "p1", "--item", "bricks:2:100", "--item", "sand:1:50", "--tax",
            "10",
        ],
    ));

    let invoices = stdout_json(&run_sbk(&ws, &["invoice", "ls", "--json"]));
    assert_eq!(invoices[0]["subtotal"], 250.0);
    assert_eq!(invoices[0]["taxAmount"], 25.0);
    assert_eq!(invoices[0]["total"], 275.0);

    // An invoice creation also drops a notification.
    let notifications = stdout_json(&run_sbk(&ws, &["notification", "ls", "--json", "--unread"]));
    assert_eq!(notifications.as_array().map(Vec::len), Some(1));
}

#[test]
fn fund_balance_folds_the_ledger_per_currency() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));
    assert_success(&run_sbk(&ws, &["fund", "deposit", "p1", "100", "usd"]));
    assert_success(&run_sbk(&ws, &["fund", "spend", "p1", "40", "usd"]));
    assert_success(&run_sbk(&ws, &["fund", "deposit", "p1", "5000", "syp"]));

    let balance = stdout_json(&run_sbk(&ws, &["fund", "balance", "p1", "--json"]));
    assert_eq!(balance["usd"], 60.0);
    assert_eq!(balance["syp"], 5000.0);
}

#[test]
fn partial_backup_restore_leaves_other_resources_untouched() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));
    assert_success(&run_sbk(&ws, &["project", "new", "Stays"]));

    let bundle_path = ws.base().join("clients-only.json");
    std::fs::write(
        &bundle_path,
        br#"{"clients": [{"id": "c1", "createdAt": "2026-03-01T10:00:00Z", "name": "Imported"}]}"#,
    )
    .expect("bundle should write");

    assert_success(&run_sbk(
        &ws,
        &[
            "backup",
            "import",
            bundle_path.to_str().expect("utf8 bundle path"),
        ],
    ));

    let projects = stdout_json(&run_sbk(&ws, &["project", "ls", "--json"]));
    assert_eq!(projects.as_array().map(Vec::len), Some(1));
    let clients = stdout_json(&run_sbk(&ws, &["client", "ls", "--json"]));
    assert_eq!(clients[0]["name"], "Imported");

    let export = run_sbk(&ws, &["backup", "export"]);
    assert_success(&export);
    let bundle = stdout_json(&export);
    assert_eq!(bundle["projects"].as_array().map(Vec::len), Some(1));
    assert_eq!(bundle["clients"].as_array().map(Vec::len), Some(1));
}

#[test]
fn a_corrupt_document_reads_as_empty_with_a_diagnostic() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));
    std::fs::write(ws.root.join("tasks.json"), b"{definitely not json")
        .expect("corrupt write");

    let output = run_sbk(&ws, &["task", "ls", "--json"]);
    assert_success(&output);
    assert_eq!(stdout_json(&output), Value::Array(Vec::new()));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid JSON"), "stderr: {stderr}");

    // fsck flags the same corruption as an error.
    let fsck = run_sbk(&ws, &["fsck"]);
    assert!(!fsck.status.success());
}

#[test]
fn doctor_passes_on_a_freshly_seeded_root() {
    let ws = Workspace::new();
    assert_success(&run_sbk_rooted(&ws, &["init"]));
    let output = run_sbk(&ws, &["doctor", "--json"]);
    assert_success(&output);
    let report = stdout_json(&output);
    let checks = report["checks"].as_array().expect("checks array");
    assert!(checks
        .iter()
        .all(|check| check["status"] == "pass"), "report: {report}");
}

#[test]
fn key_value_backend_serves_the_same_commands() {
    let ws = Workspace::new();
    let kv_path = ws.base().join("site.kv.json");
    let kv = kv_path.to_str().expect("utf8 kv path");

    let init = run_sbk(&ws, &["--root", kv, "--kv", "init"]);
    assert_success(&init);

    assert_success(&run_sbk(&ws, &["--root", kv, "--kv", "project", "new", "Villa"]));
    let projects = stdout_json(&run_sbk(&ws, &["--root", kv, "--kv", "project", "ls", "--json"]));
    assert_eq!(projects.as_array().map(Vec::len), Some(1));

    // Remembered kv root keeps working without flags.
    let listed = run_sbk(&ws, &["project", "ls", "--json"]);
    assert_success(&listed);
    assert_eq!(stdout_json(&listed).as_array().map(Vec::len), Some(1));
}
