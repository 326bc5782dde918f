use serde::Serialize;
use serde_json::Value;

use crate::store::{self, AccessMode, Store};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DoctorStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub status: DoctorStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn failure_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|check| check.status == DoctorStatus::Fail)
            .count()
    }
}

pub fn run_doctor(store: &Store, handle_saved: bool) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(if handle_saved {
        check("handle", DoctorStatus::Pass, "storage root is remembered")
    } else {
        check(
            "handle",
            DoctorStatus::Warn,
            "no remembered storage root; pass --root or run 'sbk init'",
        )
    });

    let readable = store.ensure_permission(AccessMode::Read);
    checks.push(if readable {
        check(
            "root",
            DoctorStatus::Pass,
            &format!("{} reachable at {}", store.kind(), store.location().display()),
        )
    } else {
        check(
            "root",
            DoctorStatus::Fail,
            &format!("storage root unreachable: {}", store.location().display()),
        )
    });

    checks.push(if store.ensure_permission(AccessMode::ReadWrite) {
        check("write_access", DoctorStatus::Pass, "root is writable")
    } else {
        check(
            "write_access",
            DoctorStatus::Fail,
            "root is not writable; mutations will be refused",
        )
    });

    if readable {
        checks.push(resources_check(store));
        checks.push(documents_check(store));
        checks.push(uploads_check(store));
    }

    DoctorReport { checks }
}

fn resources_check(store: &Store) -> DoctorCheck {
    let mut missing = Vec::new();
    for resource in store::COLLECTION_RESOURCES {
        if !store.resource_exists(resource) {
            missing.push(resource);
        }
    }
    if !store.resource_exists(store::SETTINGS) {
        missing.push(store::SETTINGS);
    }

    if missing.is_empty() {
        check("resources", DoctorStatus::Pass, "all resources present")
    } else {
        check(
            "resources",
            DoctorStatus::Warn,
            &format!(
                "{} resource(s) missing (run 'sbk init'): {}",
                missing.len(),
                missing.join(", ")
            ),
        )
    }
}

/// `read_document` deliberately degrades corrupt content to "no data"; an
/// existing resource that reads as `None` is therefore unparsable.
fn documents_check(store: &Store) -> DoctorCheck {
    let mut unparsable = Vec::new();
    for resource in store::COLLECTION_RESOURCES {
        if !store.resource_exists(resource) {
            continue;
        }
        match store.read_document::<Value>(resource) {
            Ok(Some(_)) => {}
            Ok(None) => unparsable.push(resource.to_string()),
            Err(err) => unparsable.push(format!("{resource} ({err})")),
        }
    }

    if unparsable.is_empty() {
        check("documents", DoctorStatus::Pass, "all documents parse")
    } else {
        check(
            "documents",
            DoctorStatus::Fail,
            &format!("unparsable documents: {}", unparsable.join(", ")),
        )
    }
}

fn uploads_check(store: &Store) -> DoctorCheck {
    let Some(root) = store.directory_root() else {
        return check(
            "uploads",
            DoctorStatus::Pass,
            "key-value backend holds no upload folders",
        );
    };

    let project_ids: Vec<String> = store
        .read_document::<Vec<Value>>(store::PROJECTS)
        .ok()
        .flatten()
        .unwrap_or_default()
        .iter()
        .filter_map(|record| record.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    let mut orphans = Vec::new();
    if let Ok(entries) = std::fs::read_dir(root) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|value| value.to_str()) else {
                continue;
            };
            if !project_ids.iter().any(|id| id == name) {
                orphans.push(name.to_string());
            }
        }
    }

    if orphans.is_empty() {
        check("uploads", DoctorStatus::Pass, "no orphaned upload folders")
    } else {
        check(
            "uploads",
            DoctorStatus::Warn,
            &format!("upload folders without a project: {}", orphans.join(", ")),
        )
    }
}

fn check(name: &str, status: DoctorStatus, detail: &str) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        status,
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::{run_doctor, DoctorStatus};
    use crate::init::seed_resources;
    use crate::store::Store;

    fn unique_root() -> PathBuf {
        std::env::temp_dir().join(format!("sitebook-doctor-{}", Uuid::now_v7()))
    }

    #[test]
    fn healthy_root_passes_every_check() {
        let root = unique_root();
        let store = Store::open_directory(&root).expect("root should open");
        seed_resources(&store).expect("seed should succeed");

        let report = run_doctor(&store, true);
        assert_eq!(report.failure_count(), 0);
        assert!(report
            .checks
            .iter()
            .all(|check| check.status == DoctorStatus::Pass));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn corrupt_document_fails_the_documents_check() {
        let root = unique_root();
        let store = Store::open_directory(&root).expect("root should open");
        seed_resources(&store).expect("seed should succeed");
        std::fs::write(root.join("invoices.json"), b"{oops").expect("corrupt write");

        let report = run_doctor(&store, true);
        assert_eq!(report.failure_count(), 1);
        let documents = report
            .checks
            .iter()
            .find(|check| check.name == "documents")
            .expect("documents check should exist");
        assert_eq!(documents.status, DoctorStatus::Fail);
        assert!(documents.detail.contains("invoices"));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn missing_resources_and_orphan_folders_warn() {
        let root = unique_root();
        let store = Store::open_directory(&root).expect("root should open");
        seed_resources(&store).expect("seed should succeed");
        std::fs::remove_file(root.join("tasks.json")).expect("tasks removal");
        std::fs::create_dir_all(root.join("no-such-project")).expect("orphan dir");

        let report = run_doctor(&store, false);
        assert_eq!(report.failure_count(), 0);
        let warn_names: Vec<&str> = report
            .checks
            .iter()
            .filter(|check| check.status == DoctorStatus::Warn)
            .map(|check| check.name.as_str())
            .collect();
        assert!(warn_names.contains(&"handle"));
        assert!(warn_names.contains(&"resources"));
        assert!(warn_names.contains(&"uploads"));

        let _ = std::fs::remove_dir_all(root);
    }
}
