use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::store;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FsckSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FsckIssue {
    pub resource: String,
    pub severity: FsckSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FsckReport {
    pub resources_scanned: u64,
    pub issues: Vec<FsckIssue>,
}

impl FsckReport {
    /// Warnings (dangling projectId references) do not fail a check run;
    /// referential integrity is deliberately unenforced.
    pub fn ok(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| issue.severity == FsckSeverity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == FsckSeverity::Error)
            .count()
    }
}

#[derive(Debug)]
pub enum FsckError {
    Io(std::io::Error),
}

impl fmt::Display for FsckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsckError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for FsckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FsckError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for FsckError {
    fn from(value: std::io::Error) -> Self {
        FsckError::Io(value)
    }
}

/// Resources whose records carry a projectId worth cross-checking.
const PROJECT_SCOPED: [&str; 9] = [
    store::TASKS,
    store::INVOICES,
    store::PAYMENTS,
    store::EXPENSES,
    store::WORKERS_LOG,
    store::DAILY_REPORTS,
    store::PROJECT_LOCATIONS,
    store::SMART_FUND,
    store::PROJECT_FILES_META,
];

pub fn run_fsck(root: &Path) -> Result<FsckReport, FsckError> {
    let mut issues = Vec::new();
    let mut scanned = 0u64;
    let mut documents: HashMap<&str, Vec<Value>> = HashMap::new();

    for resource in store::COLLECTION_RESOURCES {
        let path = root.join(format!("{resource}.json"));
        if !path.is_file() {
            continue;
        }
        scanned += 1;

        let raw = match std::fs::read(&path) {
            Ok(value) => value,
            Err(err) => {
                issues.push(issue(
                    resource,
                    FsckSeverity::Error,
                    &format!("unable to read file: {}", err),
                ));
                continue;
            }
        };

        let value: Value = match serde_json::from_slice(&raw) {
            Ok(value) => value,
            Err(err) => {
                issues.push(issue(
                    resource,
                    FsckSeverity::Error,
                    &format!("invalid JSON payload: {}", err),
                ));
                continue;
            }
        };

        let Value::Array(records) = value else {
            issues.push(issue(
                resource,
                FsckSeverity::Error,
                "document must be a JSON array of records",
            ));
            continue;
        };

        let mut seen_ids: HashSet<String> = HashSet::new();
        for (index, record) in records.iter().enumerate() {
            let Some(object) = record.as_object() else {
                issues.push(issue(
                    resource,
                    FsckSeverity::Error,
                    &format!("record #{index} is not a JSON object"),
                ));
                continue;
            };

            match object.get("id").and_then(Value::as_str) {
                Some(id) if !id.trim().is_empty() => {
                    if !seen_ids.insert(id.trim().to_string()) {
                        issues.push(issue(
                            resource,
                            FsckSeverity::Error,
                            &format!("duplicate id '{}'", id.trim()),
                        ));
                    }
                }
                _ => {
                    issues.push(issue(
                        resource,
                        FsckSeverity::Error,
                        &format!("record #{index} is missing a string 'id'"),
                    ));
                }
            }

            if object
                .get("createdAt")
                .and_then(Value::as_str)
                .is_none_or(|value| value.trim().is_empty())
            {
                issues.push(issue(
                    resource,
                    FsckSeverity::Warning,
                    &format!("record #{index} is missing 'createdAt'"),
                ));
            }
        }

        documents.insert(resource, records);
    }

    let settings_path = root.join(format!("{}.json", store::SETTINGS));
    if settings_path.is_file() {
        scanned += 1;
        match std::fs::read(&settings_path) {
            Ok(raw) => match serde_json::from_slice::<Value>(&raw) {
                Ok(Value::Object(_)) => {}
                Ok(_) => issues.push(issue(
                    store::SETTINGS,
                    FsckSeverity::Error,
                    "settings document must be a JSON object",
                )),
                Err(err) => issues.push(issue(
                    store::SETTINGS,
                    FsckSeverity::Error,
                    &format!("invalid JSON payload: {}", err),
                )),
            },
            Err(err) => issues.push(issue(
                store::SETTINGS,
                FsckSeverity::Error,
                &format!("unable to read file: {}", err),
            )),
        }
    }

    let known_projects: HashSet<String> = documents
        .get(store::PROJECTS)
        .map(|records| {
            records
                .iter()
                .filter_map(|record| record.get("id").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    for resource in PROJECT_SCOPED {
        let Some(records) = documents.get(resource) else {
            continue;
        };
        for record in records {
            let Some(project_id) = record.get("projectId").and_then(Value::as_str) else {
                continue;
            };
            if !project_id.trim().is_empty() && !known_projects.contains(project_id) {
                issues.push(issue(
                    resource,
                    FsckSeverity::Warning,
                    &format!("projectId '{}' has no matching project", project_id),
                ));
            }
        }
    }

    Ok(FsckReport {
        resources_scanned: scanned,
        issues,
    })
}

fn issue(resource: &str, severity: FsckSeverity, message: &str) -> FsckIssue {
    FsckIssue {
        resource: resource.to_string(),
        severity,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::{run_fsck, FsckSeverity};
    use crate::init::seed_resources;
    use crate::store::Store;

    fn seeded_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("sitebook-fsck-{}", Uuid::now_v7()));
        let store = Store::open_directory(&root).expect("root should open");
        seed_resources(&store).expect("seed should succeed");
        root
    }

    #[test]
    fn clean_seeded_root_reports_no_issues() {
        let root = seeded_root();
        let report = run_fsck(&root).expect("fsck should run");
        assert!(report.ok());
        assert!(report.issues.is_empty());
        assert_eq!(report.resources_scanned, 16);
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn corrupt_and_duplicate_documents_are_errors() {
        let root = seeded_root();
        std::fs::write(root.join("tasks.json"), b"{not json").expect("corrupt write");
        std::fs::write(
            root.join("clients.json"),
            br#"[{"id":"c1","createdAt":"2026-03-01T10:00:00Z"},{"id":"c1","createdAt":"2026-03-01T10:00:00Z"}]"#,
        )
        .expect("duplicate write");

        let report = run_fsck(&root).expect("fsck should run");
        assert!(!report.ok());
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.message.contains("invalid JSON payload")));
        assert!(report
            .issues
            .iter()
            .any(|issue| issue.message.contains("duplicate id 'c1'")));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn dangling_project_references_warn_but_do_not_fail() {
        let root = seeded_root();
        std::fs::write(
            root.join("tasks.json"),
            br#"[{"id":"t1","createdAt":"2026-03-01T10:00:00Z","projectId":"ghost","title":"x"}]"#,
        )
        .expect("task write");

        let report = run_fsck(&root).expect("fsck should run");
        assert!(report.ok(), "warnings alone must not fail fsck");
        assert!(report.issues.iter().any(|issue| {
            issue.severity == FsckSeverity::Warning && issue.message.contains("ghost")
        }));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn records_missing_ids_are_errors() {
        let root = seeded_root();
        std::fs::write(
            root.join("workers.json"),
            br#"[{"name":"no id"}]"#,
        )
        .expect("worker write");

        let report = run_fsck(&root).expect("fsck should run");
        assert!(!report.ok());
        assert_eq!(report.error_count(), 1);

        let _ = std::fs::remove_dir_all(root);
    }
}
