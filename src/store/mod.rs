use std::error::Error;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod collection;
pub mod handle;

pub use collection::Collection;

pub const PROJECTS: &str = "projects";
pub const TASKS: &str = "tasks";
pub const CLIENTS: &str = "clients";
pub const ACTIVITY: &str = "activity";
pub const SETTINGS: &str = "settings";
pub const WORKERS: &str = "workers";
pub const PROJECT_FILES_META: &str = "project_files_meta";
pub const INVOICES: &str = "invoices";
pub const PAYMENTS: &str = "payments";
pub const EXPENSES: &str = "expenses";
pub const WORKERS_LOG: &str = "workers_log";
pub const DAILY_REPORTS: &str = "daily_reports";
pub const NOTIFICATIONS: &str = "notifications";
pub const PERMISSIONS: &str = "permissions";
pub const PROJECT_LOCATIONS: &str = "project_locations";
pub const SMART_FUND: &str = "smart_fund";

/// Array-valued resources; `settings` is a single object and handled apart.
pub const COLLECTION_RESOURCES: [&str; 15] = [
    PROJECTS,
    TASKS,
    CLIENTS,
    ACTIVITY,
    WORKERS,
    PROJECT_FILES_META,
    INVOICES,
    PAYMENTS,
    EXPENSES,
    WORKERS_LOG,
    DAILY_REPORTS,
    NOTIFICATIONS,
    PERMISSIONS,
    PROJECT_LOCATIONS,
    SMART_FUND,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    ReadWrite,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Directory,
    KeyValue,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Directory => f.write_str("directory"),
            BackendKind::KeyValue => f.write_str("key-value"),
        }
    }
}

/// Whole-document JSON storage under a user-chosen root. Every write is a
/// full-document replace; the last writer wins.
#[derive(Debug)]
pub struct Store {
    backend: Backend,
}

#[derive(Debug)]
enum Backend {
    Directory { root: PathBuf },
    KeyValue { path: PathBuf },
}

impl Store {
    pub fn open_directory(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            backend: Backend::Directory { root },
        })
    }

    /// Fallback backend: the sixteen resources live as keys of one JSON map
    /// file, mirroring a key-value namespace.
    pub fn open_key_value(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            backend: Backend::KeyValue { path },
        })
    }

    pub fn kind(&self) -> BackendKind {
        match &self.backend {
            Backend::Directory { .. } => BackendKind::Directory,
            Backend::KeyValue { .. } => BackendKind::KeyValue,
        }
    }

    /// Root directory, when the directory backend is active.
    pub fn directory_root(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Directory { root } => Some(root),
            Backend::KeyValue { .. } => None,
        }
    }

    pub fn location(&self) -> &Path {
        match &self.backend {
            Backend::Directory { root } => root,
            Backend::KeyValue { path } => path,
        }
    }

    /// Native filesystems have no prompt model, so this never prompts: the
    /// outcome is decided from what the root already allows.
    pub fn ensure_permission(&self, mode: AccessMode) -> bool {
        match &self.backend {
            Backend::Directory { root } => match fs::metadata(root) {
                Ok(meta) => match mode {
                    AccessMode::Read => meta.is_dir(),
                    AccessMode::ReadWrite => meta.is_dir() && !meta.permissions().readonly(),
                },
                Err(_) => false,
            },
            Backend::KeyValue { path } => match fs::metadata(path) {
                Ok(meta) => mode == AccessMode::Read || !meta.permissions().readonly(),
                Err(_) => path.parent().map(Path::exists).unwrap_or(false),
            },
        }
    }

    /// Idempotent bootstrap: creates the resource with `initial` only when it
    /// does not exist yet. Safe to call every session.
    pub fn ensure_resource(&self, resource: &str, initial: &Value) -> Result<(), StoreError> {
        validate_component("resource", resource)?;
        match &self.backend {
            Backend::Directory { root } => {
                let path = root.join(format!("{resource}.json"));
                if !path.exists() {
                    fs::write(&path, pretty_bytes(resource, initial)?)?;
                }
                Ok(())
            }
            Backend::KeyValue { path } => {
                let mut map = load_map(path);
                if !map.contains_key(resource) {
                    map.insert(resource.to_string(), initial.clone());
                    save_map(path, &map)?;
                }
                Ok(())
            }
        }
    }

    pub fn resource_exists(&self, resource: &str) -> bool {
        match &self.backend {
            Backend::Directory { root } => root.join(format!("{resource}.json")).is_file(),
            Backend::KeyValue { path } => load_map(path).contains_key(resource),
        }
    }

    /// Absent, empty, and unparsable content all read as `None`. A parse
    /// failure gets its own stderr diagnostic so corruption stays
    /// distinguishable from a resource that was never created.
    pub fn read_document<T: DeserializeOwned>(
        &self,
        resource: &str,
    ) -> Result<Option<T>, StoreError> {
        validate_component("resource", resource)?;
        match &self.backend {
            Backend::Directory { root } => {
                let path = root.join(format!("{resource}.json"));
                let payload = match fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
                    Err(err) => return Err(StoreError::Io(err)),
                };
                if payload.iter().all(u8::is_ascii_whitespace) {
                    return Ok(None);
                }
                match serde_json::from_slice(&payload) {
                    Ok(value) => Ok(Some(value)),
                    Err(err) => {
                        warn_corrupt(resource, &err);
                        Ok(None)
                    }
                }
            }
            Backend::KeyValue { path } => {
                let map = load_map(path);
                let Some(value) = map.get(resource) else {
                    return Ok(None);
                };
                match serde_json::from_value(value.clone()) {
                    Ok(parsed) => Ok(Some(parsed)),
                    Err(err) => {
                        warn_corrupt(resource, &err);
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Full-document overwrite. Refusal to write surfaces as an error naming
    /// the resource; a write is never silently dropped.
    pub fn write_document<T: Serialize>(&self, resource: &str, value: &T) -> Result<(), StoreError> {
        validate_component("resource", resource)?;
        if !self.ensure_permission(AccessMode::ReadWrite) {
            return Err(StoreError::PermissionDenied {
                resource: resource.to_string(),
            });
        }
        let json = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
            resource: resource.to_string(),
            source,
        })?;
        match &self.backend {
            Backend::Directory { root } => {
                let path = root.join(format!("{resource}.json"));
                fs::write(&path, pretty_bytes(resource, &json)?)?;
                Ok(())
            }
            Backend::KeyValue { path } => {
                let mut map = load_map(path);
                map.insert(resource.to_string(), json);
                save_map(path, &map)
            }
        }
    }

    /// Stores uploaded bytes under an optional subfolder of the root and
    /// returns the final stored name. Name collisions get a short
    /// uniquifying suffix rather than overwriting.
    pub fn write_binary(
        &self,
        sub_folder: Option<&str>,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, StoreError> {
        validate_component("file name", file_name)?;
        if let Some(folder) = sub_folder {
            validate_component("folder", folder)?;
        }
        let Backend::Directory { root } = &self.backend else {
            return Err(StoreError::BinaryUnsupported {
                file_name: file_name.to_string(),
            });
        };
        if !self.ensure_permission(AccessMode::ReadWrite) {
            return Err(StoreError::PermissionDenied {
                resource: file_name.to_string(),
            });
        }

        let dir = match sub_folder {
            Some(folder) => root.join(folder),
            None => root.clone(),
        };
        fs::create_dir_all(&dir)?;

        let stored = if dir.join(file_name).exists() {
            uniquify(file_name)
        } else {
            file_name.to_string()
        };
        fs::write(dir.join(&stored), bytes)?;
        Ok(stored)
    }
}

fn pretty_bytes(resource: &str, value: &Value) -> Result<Vec<u8>, StoreError> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serialize {
        resource: resource.to_string(),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn load_map(path: &Path) -> Map<String, Value> {
    let payload = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return Map::new(),
    };
    match serde_json::from_slice::<Map<String, Value>>(&payload) {
        Ok(map) => map,
        Err(err) => {
            warn_corrupt("key-value store", &err);
            Map::new()
        }
    }
}

fn save_map(path: &Path, map: &Map<String, Value>) -> Result<(), StoreError> {
    let mut bytes = serde_json::to_vec_pretty(map).map_err(|source| StoreError::Serialize {
        resource: "key-value store".to_string(),
        source,
    })?;
    bytes.push(b'\n');
    fs::write(path, bytes)?;
    Ok(())
}

fn warn_corrupt(resource: &str, err: &serde_json::Error) {
    eprintln!("warning: resource '{resource}' holds invalid JSON ({err}); reading as empty");
}

fn uniquify(file_name: &str) -> String {
    let tag = &uuid::Uuid::now_v7().simple().to_string()[..8];
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{tag}.{ext}"),
        None => format!("{file_name}-{tag}"),
    }
}

fn validate_component(field: &'static str, value: &str) -> Result<(), StoreError> {
    let is_valid = !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ' '))
        && !value.starts_with('.');

    if is_valid {
        Ok(())
    } else {
        Err(StoreError::InvalidComponent {
            field,
            value: value.to_string(),
        })
    }
}

#[derive(Debug)]
pub enum StoreError {
    PermissionDenied {
        resource: String,
    },
    Unbound {
        resource: String,
    },
    BinaryUnsupported {
        file_name: String,
    },
    InvalidComponent {
        field: &'static str,
        value: String,
    },
    Serialize {
        resource: String,
        source: serde_json::Error,
    },
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::PermissionDenied { resource } => {
                write!(f, "no write access to resource '{}'", resource)
            }
            StoreError::Unbound { resource } => {
                write!(
                    f,
                    "resource '{}' is not connected to a storage root; run 'sbk init' first",
                    resource
                )
            }
            StoreError::BinaryUnsupported { file_name } => {
                write!(
                    f,
                    "cannot store file '{}': the key-value backend holds JSON resources only",
                    file_name
                )
            }
            StoreError::InvalidComponent { field, value } => {
                write!(
                    f,
                    "invalid {} '{}': use only ASCII letters, numbers, spaces, '.', '-', '_'",
                    field, value
                )
            }
            StoreError::Serialize { resource, source } => {
                write!(f, "failed to serialize resource '{}': {}", resource, source)
            }
            StoreError::Io(err) => write!(f, "storage I/O error: {}", err),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Serialize { source, .. } => Some(source),
            StoreError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        StoreError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use uuid::Uuid;

    use super::{AccessMode, BackendKind, Store, StoreError};

    fn unique_root(prefix: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{prefix}-{}", Uuid::now_v7()))
    }

    #[test]
    fn round_trips_a_document_through_the_directory_backend() {
        let root = unique_root("sitebook-store");
        let store = Store::open_directory(&root).expect("root should open");
        let records = json!([{"id": "a", "createdAt": "2026-03-01T10:00:00Z", "name": "Villa"}]);

        store
            .write_document("projects", &records)
            .expect("write should succeed");
        let loaded: Option<Value> = store
            .read_document("projects")
            .expect("read should succeed");
        assert_eq!(loaded, Some(records));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn ensure_resource_never_overwrites_existing_content() {
        let root = unique_root("sitebook-store");
        let store = Store::open_directory(&root).expect("root should open");

        store
            .ensure_resource("clients", &json!([{"id": "c1"}]))
            .expect("first ensure should succeed");
        store
            .ensure_resource("clients", &json!([]))
            .expect("second ensure should succeed");

        let loaded: Option<Value> = store.read_document("clients").expect("read should succeed");
        assert_eq!(loaded, Some(json!([{"id": "c1"}])));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn absent_and_corrupt_documents_both_read_as_none() {
        let root = unique_root("sitebook-store");
        let store = Store::open_directory(&root).expect("root should open");

        let absent: Option<Value> = store.read_document("tasks").expect("read should succeed");
        assert!(absent.is_none());

        std::fs::write(root.join("tasks.json"), b"{not json").expect("corrupt write");
        let corrupt: Option<Value> = store.read_document("tasks").expect("read should succeed");
        assert!(corrupt.is_none());

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn key_value_backend_matches_directory_semantics() {
        let path = unique_root("sitebook-kv").join("store.json");
        let store = Store::open_key_value(&path).expect("kv store should open");
        assert_eq!(store.kind(), BackendKind::KeyValue);

        store
            .ensure_resource("workers", &json!([]))
            .expect("ensure should succeed");
        store
            .ensure_resource("workers", &json!([{"id": "ghost"}]))
            .expect("re-ensure should succeed");
        let initial: Option<Value> = store.read_document("workers").expect("read should succeed");
        assert_eq!(initial, Some(json!([])));

        store
            .write_document("workers", &json!([{"id": "w1"}]))
            .expect("write should succeed");
        let loaded: Option<Value> = store.read_document("workers").expect("read should succeed");
        assert_eq!(loaded, Some(json!([{"id": "w1"}])));

        let _ = std::fs::remove_dir_all(path.parent().expect("kv parent"));
    }

    #[test]
    fn key_value_backend_refuses_binary_uploads() {
        let path = unique_root("sitebook-kv").join("store.json");
        let store = Store::open_key_value(&path).expect("kv store should open");
        let result = store.write_binary(Some("p1"), "plan.pdf", b"%PDF");
        assert!(matches!(
            result,
            Err(StoreError::BinaryUnsupported { .. })
        ));
        let _ = std::fs::remove_dir_all(path.parent().expect("kv parent"));
    }

    #[test]
    fn binary_uploads_land_in_the_subfolder_and_avoid_collisions() {
        let root = unique_root("sitebook-files");
        let store = Store::open_directory(&root).expect("root should open");

        let first = store
            .write_binary(Some("p1"), "plan.pdf", b"one")
            .expect("first upload should succeed");
        assert_eq!(first, "plan.pdf");

        let second = store
            .write_binary(Some("p1"), "plan.pdf", b"two")
            .expect("second upload should succeed");
        assert_ne!(second, "plan.pdf");
        assert!(second.ends_with(".pdf"));

        assert_eq!(
            std::fs::read(root.join("p1").join("plan.pdf")).expect("first file readable"),
            b"one"
        );
        assert_eq!(
            std::fs::read(root.join("p1").join(&second)).expect("second file readable"),
            b"two"
        );

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn permission_probe_reflects_a_missing_root() {
        let root = unique_root("sitebook-gone");
        let store = Store::open_directory(&root).expect("root should open");
        assert!(store.ensure_permission(AccessMode::ReadWrite));

        std::fs::remove_dir_all(&root).expect("root removal");
        assert!(!store.ensure_permission(AccessMode::Read));

        let records = json!([]);
        let denied = store.write_document("projects", &records);
        assert!(matches!(denied, Err(StoreError::PermissionDenied { .. })));
    }

    #[test]
    fn rejects_traversal_shaped_resource_names() {
        let root = unique_root("sitebook-store");
        let store = Store::open_directory(&root).expect("root should open");
        let result: Result<Option<Value>, _> = store.read_document("../escape");
        assert!(matches!(
            result,
            Err(StoreError::InvalidComponent { .. })
        ));
        let _ = std::fs::remove_dir_all(root);
    }
}
