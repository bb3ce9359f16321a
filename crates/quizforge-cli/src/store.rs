//! File-backed record store for generated tests.
//!
//! The whole store is one JSON document. Ids grow monotonically and are never
//! reused, even after deletes.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored test. `questions` holds the canonical question-set text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: u64,
    pub title: String,
    pub questions: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    tests: Vec<TestRecord>,
}

fn first_id() -> u64 {
    1
}

/// JSON-file store at a fixed path. A missing file reads as empty.
pub struct TestStore {
    path: PathBuf,
}

impl TestStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile {
                next_id: first_id(),
                tests: Vec::new(),
            });
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read store: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse store: {}", self.path.display()))
    }

    /// Writes go to a sibling temp file that is renamed over the store.
    fn save(&self, file: &StoreFile) -> Result<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let json = serde_json::to_string_pretty(file)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .with_context(|| format!("failed to write store: {}", self.path.display()))?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to replace store: {}", self.path.display()))?;
        Ok(())
    }

    /// Insert a test and return its id.
    pub fn create(&self, title: &str, questions: &str) -> Result<u64> {
        let mut file = self.load()?;
        let id = file.next_id.max(first_id());
        file.next_id = id + 1;
        file.tests.push(TestRecord {
            id,
            title: title.to_string(),
            questions: questions.to_string(),
            created_at: Utc::now(),
        });
        self.save(&file)?;
        tracing::debug!(id, "stored test");
        Ok(id)
    }

    /// All tests, newest first.
    pub fn list(&self) -> Result<Vec<TestRecord>> {
        let mut tests = self.load()?.tests;
        tests.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(tests)
    }

    /// Remove a test. Returns `false` if the id was unknown.
    pub fn delete(&self, id: u64) -> Result<bool> {
        let mut file = self.load()?;
        let before = file.tests.len();
        file.tests.retain(|t| t.id != id);
        if file.tests.len() == before {
            return Ok(false);
        }
        self.save(&file)?;
        Ok(true)
    }

    /// Replace a test's questions. Returns `false` if the id was unknown.
    pub fn update(&self, id: u64, questions: &str) -> Result<bool> {
        let mut file = self.load()?;
        let Some(record) = file.tests.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        record.questions = questions.to_string();
        self.save(&file)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, TestStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TestStore::open(dir.path().join("nested").join("tests.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_lists_empty() {
        let (_dir, store) = temp_store();
        assert!(store.list().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn list_is_newest_first() {
        let (_dir, store) = temp_store();
        let first = store.create("Photosynthesis", "{\"questions\":[]}").unwrap();
        let second = store.create("Algebra", "{\"questions\":[]}").unwrap();
        assert_eq!((first, second), (1, 2));

        let titles: Vec<String> = store.list().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Algebra", "Photosynthesis"]);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (_dir, store) = temp_store();
        store.create("a", "{}").unwrap();
        let b = store.create("b", "{}").unwrap();
        assert!(store.delete(b).unwrap());
        assert_eq!(store.create("c", "{}").unwrap(), 3);
    }

    #[test]
    fn delete_and_update_unknown_ids() {
        let (_dir, store) = temp_store();
        assert!(!store.delete(42).unwrap());
        assert!(!store.update(42, "{}").unwrap());
    }

    #[test]
    fn update_replaces_questions_only() {
        let (_dir, store) = temp_store();
        let id = store.create("Title", "old").unwrap();
        assert!(store.update(id, "new").unwrap());

        let record = &store.list().unwrap()[0];
        assert_eq!(record.title, "Title");
        assert_eq!(record.questions, "new");
    }

    #[test]
    fn writes_leave_no_temp_files_behind() {
        let (_dir, store) = temp_store();
        store.create("a", "{}").unwrap();
        let id = store.create("b", "{}").unwrap();
        store.update(id, "new").unwrap();
        store.delete(1).unwrap();

        let entries: Vec<_> = std::fs::read_dir(store.path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("tests.json")]);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();
        assert!(store.list().is_err());
    }
}
