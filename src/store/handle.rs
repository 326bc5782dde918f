use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::BackendKind;

const HANDLES_FILE: &str = "handles.json";

/// Enough to reopen a storage root in a later session: which backend, and
/// where it lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HandleDesc {
    pub kind: BackendKind,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
struct HandleFile {
    root: Option<HandleDesc>,
    sync_root: Option<HandleDesc>,
}

/// Remembers the chosen storage roots across runs. Saving is best-effort
/// convenience: failures are swallowed, and a missing or corrupt handles
/// file simply reads as "nothing saved".
#[derive(Debug, Clone)]
pub struct HandleStore {
    dir: PathBuf,
}

impl HandleStore {
    /// `$SITEBOOK_HOME`, falling back to `~/.sitebook`.
    pub fn from_env() -> Self {
        let dir = std::env::var_os("SITEBOOK_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".sitebook")))
            .unwrap_or_else(|| PathBuf::from(".sitebook"));
        Self { dir }
    }

    #[allow(dead_code)]
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn root(&self) -> Option<HandleDesc> {
        self.load().root
    }

    pub fn sync_root(&self) -> Option<HandleDesc> {
        self.load().sync_root
    }

    pub fn save_root(&self, desc: &HandleDesc) {
        let mut file = self.load();
        file.root = Some(desc.clone());
        self.save(&file);
    }

    pub fn save_sync_root(&self, desc: &HandleDesc) {
        let mut file = self.load();
        file.sync_root = Some(desc.clone());
        self.save(&file);
    }

    pub fn clear_root(&self) {
        let mut file = self.load();
        file.root = None;
        self.save(&file);
    }

    fn load(&self) -> HandleFile {
        let Ok(payload) = fs::read(self.dir.join(HANDLES_FILE)) else {
            return HandleFile::default();
        };
        serde_json::from_slice(&payload).unwrap_or_default()
    }

    fn save(&self, file: &HandleFile) {
        let Ok(mut bytes) = serde_json::to_vec_pretty(file) else {
            return;
        };
        bytes.push(b'\n');
        if fs::create_dir_all(&self.dir).is_err() {
            return;
        }
        let _ = fs::write(self.dir.join(HANDLES_FILE), bytes);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::{HandleDesc, HandleStore};
    use crate::store::BackendKind;

    fn unique_home() -> PathBuf {
        std::env::temp_dir().join(format!("sitebook-handles-{}", Uuid::now_v7()))
    }

    fn desc(path: &str) -> HandleDesc {
        HandleDesc {
            kind: BackendKind::Directory,
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn saved_roots_survive_a_fresh_store_instance() {
        let home = unique_home();
        let store = HandleStore::at(&home);
        store.save_root(&desc("/data/site"));
        store.save_sync_root(&desc("/backup/site"));

        let reopened = HandleStore::at(&home);
        assert_eq!(reopened.root(), Some(desc("/data/site")));
        assert_eq!(reopened.sync_root(), Some(desc("/backup/site")));

        let _ = std::fs::remove_dir_all(home);
    }

    #[test]
    fn clear_root_removes_only_the_primary_slot() {
        let home = unique_home();
        let store = HandleStore::at(&home);
        store.save_root(&desc("/data/site"));
        store.save_sync_root(&desc("/backup/site"));

        store.clear_root();
        assert_eq!(store.root(), None);
        assert_eq!(store.sync_root(), Some(desc("/backup/site")));

        let _ = std::fs::remove_dir_all(home);
    }

    #[test]
    fn missing_and_corrupt_handle_files_read_as_unsaved() {
        let home = unique_home();
        let store = HandleStore::at(&home);
        assert_eq!(store.root(), None);

        std::fs::create_dir_all(&home).expect("home should be creatable");
        std::fs::write(home.join("handles.json"), b"][").expect("corrupt write");
        assert_eq!(store.root(), None);
        assert_eq!(store.sync_root(), None);

        let _ = std::fs::remove_dir_all(home);
    }

    #[test]
    fn save_into_an_unwritable_location_is_silently_ignored() {
        let store = HandleStore::at("/proc/sitebook-definitely-not-writable");
        store.save_root(&desc("/data/site"));
        assert_eq!(store.root(), None);
    }
}
