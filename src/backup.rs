use std::error::Error;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::store::{self, Store, StoreError};

/// One JSON object keyed by resource name; values are each resource's full
/// array (or the settings object). Partial bundles are legal on restore.
pub fn export_bundle(store: &Store) -> Result<Value, StoreError> {
    let mut bundle = Map::new();
    for resource in store::COLLECTION_RESOURCES {
        let value = store
            .read_document::<Value>(resource)?
            .unwrap_or_else(|| Value::Array(Vec::new()));
        bundle.insert(resource.to_string(), value);
    }
    let settings = store
        .read_document::<Value>(store::SETTINGS)?
        .unwrap_or_else(|| Value::Object(Map::new()));
    bundle.insert(store::SETTINGS.to_string(), settings);
    Ok(Value::Object(bundle))
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RestoreSummary {
    pub restored: Vec<String>,
    pub ignored: Vec<String>,
}

/// Writes back every present known resource, ignores unknown keys, and
/// leaves absent resources untouched.
pub fn import_bundle(store: &Store, bundle: &Value) -> Result<RestoreSummary, BackupError> {
    let Value::Object(map) = bundle else {
        return Err(BackupError::NotAnObject);
    };

    let mut restored = Vec::new();
    let mut ignored = Vec::new();
    for (key, value) in map {
        let known = key == store::SETTINGS
            || store::COLLECTION_RESOURCES.contains(&key.as_str());
        if known {
            store.write_document(key, value)?;
            restored.push(key.clone());
        } else {
            ignored.push(key.clone());
        }
    }

    Ok(RestoreSummary { restored, ignored })
}

#[derive(Debug)]
pub enum BackupError {
    NotAnObject,
    Store(StoreError),
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupError::NotAnObject => {
                f.write_str("backup bundle must be a JSON object keyed by resource name")
            }
            BackupError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackupError::NotAnObject => None,
            BackupError::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for BackupError {
    fn from(value: StoreError) -> Self {
        BackupError::Store(value)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::{json, Value};
    use uuid::Uuid;

    use super::{export_bundle, import_bundle, BackupError};
    use crate::store::Store;

    fn unique_store() -> (PathBuf, Store) {
        let root = std::env::temp_dir().join(format!("sitebook-backup-{}", Uuid::now_v7()));
        let store = Store::open_directory(&root).expect("root should open");
        (root, store)
    }

    #[test]
    fn export_gathers_every_resource() {
        let (root, store) = unique_store();
        store
            .write_document("clients", &json!([{"id": "c1", "name": "Rami"}]))
            .expect("write should succeed");

        let bundle = export_bundle(&store).expect("export should succeed");
        assert_eq!(bundle["clients"], json!([{"id": "c1", "name": "Rami"}]));
        assert_eq!(bundle["projects"], json!([]));
        assert!(bundle["settings"].is_object());

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn partial_restore_leaves_other_resources_untouched() {
        let (root, store) = unique_store();
        store
            .write_document("projects", &json!([{"id": "p1", "name": "Villa"}]))
            .expect("seed projects");

        let bundle = json!({"clients": [{"id": "c1", "name": "Rami"}]});
        let summary = import_bundle(&store, &bundle).expect("import should succeed");
        assert_eq!(summary.restored, vec!["clients".to_string()]);

        let projects: Option<Value> = store.read_document("projects").expect("read projects");
        assert_eq!(projects, Some(json!([{"id": "p1", "name": "Villa"}])));
        let clients: Option<Value> = store.read_document("clients").expect("read clients");
        assert_eq!(clients, Some(json!([{"id": "c1", "name": "Rami"}])));

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn unknown_bundle_keys_are_ignored() {
        let (root, store) = unique_store();
        let bundle = json!({"mystery": [1, 2, 3], "tasks": []});
        let summary = import_bundle(&store, &bundle).expect("import should succeed");
        assert_eq!(summary.restored, vec!["tasks".to_string()]);
        assert_eq!(summary.ignored, vec!["mystery".to_string()]);
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn non_object_bundles_are_rejected() {
        let (root, store) = unique_store();
        let result = import_bundle(&store, &json!([1, 2]));
        assert!(matches!(result, Err(BackupError::NotAnObject)));
        let _ = std::fs::remove_dir_all(root);
    }
}
