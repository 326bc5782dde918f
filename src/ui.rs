use std::io::{self, IsTerminal};

use crate::domain::fund::{Currency, FundBalance};
use crate::domain::project::Project;
use crate::domain::task::Task;
use crate::ids::display_id;
use crate::listing::{ProjectListFilter, TaskListFilter};

pub fn print_project_list(projects: &[Project], filter: &ProjectListFilter) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Projects"));
    if let Some(summary) = project_filter_summary(filter) {
        println!("{}", palette.dim(&format!("filters: {summary}")));
    }

    if projects.is_empty() {
        println!("{}", palette.dim("no projects matched"));
        return;
    }

    for project in projects {
        let mut line = format!(
            "{} {} {}",
            palette.id(display_id(&project.id)),
            palette.status(&project.status),
            project.name
        );
        if let Some(budget) = project.budget {
            let code = project.currency.map(Currency::code).unwrap_or("");
            line.push(' ');
            line.push_str(&palette.dim(&format!("({budget} {code})")));
        }
        println!("{line}");
    }
    println!("{}", palette.dim(&format!("{} project(s)", projects.len())));
}

pub fn print_task_list(tasks: &[Task], filter: &TaskListFilter) {
    let palette = Palette::auto();
    println!("{}", palette.heading("Tasks"));
    if let Some(summary) = task_filter_summary(filter) {
        println!("{}", palette.dim(&format!("filters: {summary}")));
    }

    if tasks.is_empty() {
        println!("{}", palette.dim("no tasks matched"));
        return;
    }

    for task in tasks {
        let mut line = format!(
            "{} {} {}",
            palette.id(display_id(&task.id)),
            palette.status(&task.status),
            task.title
        );
        if let Some(due) = task.due_date.as_deref() {
            line.push(' ');
            line.push_str(&palette.dim(&format!("due {due}")));
        }
        println!("{line}");
    }
    println!("{}", palette.dim(&format!("{} task(s)", tasks.len())));
}

pub fn print_fund_balance(project_id: &str, balance: &FundBalance) {
    let palette = Palette::auto();
    println!(
        "{} {}",
        palette.heading("Fund balance"),
        palette.id(display_id(project_id))
    );
    println!("  USD {}", fmt_amount(balance.usd));
    println!("  SYP {}", fmt_amount(balance.syp));
}

pub fn fmt_amount(amount: f64) -> String {
    if (amount - amount.trunc()).abs() < f64::EPSILON {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

fn project_filter_summary(filter: &ProjectListFilter) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(status) = filter.status.as_deref().and_then(non_empty) {
        parts.push(format!("status={status}"));
    }
    if let Some(client_id) = filter.client_id.as_deref().and_then(non_empty) {
        parts.push(format!("client={client_id}"));
    }
    if let Some(query) = filter.query.as_deref().and_then(non_empty) {
        parts.push(format!("query={query}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn task_filter_summary(filter: &TaskListFilter) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(project_id) = filter.project_id.as_deref().and_then(non_empty) {
        parts.push(format!("project={project_id}"));
    }
    if let Some(status) = filter.status.as_deref().and_then(non_empty) {
        parts.push(format!("status={status}"));
    }
    if let Some(query) = filter.query.as_deref().and_then(non_empty) {
        parts.push(format!("query={query}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn id(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    pub fn status(&self, status: &str) -> String {
        let upper = status.to_ascii_uppercase();
        self.paint(status_color_code(status), &format!("[{upper}]"))
    }
}

fn status_color_code(status: &str) -> &'static str {
    match status.trim().to_ascii_lowercase().as_str() {
        "planned" | "pending" | "draft" => "34",
        "active" | "in_progress" | "sent" => "33",
        "on_hold" => "35",
        "completed" | "done" | "paid" => "32",
        "cancelled" | "void" => "31",
        _ => "37",
    }
}

#[cfg(test)]
mod tests {
    use super::{fmt_amount, project_filter_summary, task_filter_summary};
    use crate::listing::{ProjectListFilter, TaskListFilter};

    #[test]
    fn filter_summaries_list_only_active_filters() {
        let filter = ProjectListFilter {
            status: Some("active".to_string()),
            client_id: None,
            query: Some("villa".to_string()),
        };
        assert_eq!(
            project_filter_summary(&filter).expect("summary should exist"),
            "status=active query=villa"
        );
        assert!(project_filter_summary(&ProjectListFilter::default()).is_none());

        let filter = TaskListFilter {
            project_id: Some("p1".to_string()),
            status: None,
            query: None,
        };
        assert_eq!(
            task_filter_summary(&filter).expect("summary should exist"),
            "project=p1"
        );
    }

    #[test]
    fn amounts_drop_trailing_zero_cents() {
        assert_eq!(fmt_amount(5000.0), "5000");
        assert_eq!(fmt_amount(60.5), "60.50");
    }
}
