#[cfg(test)]
use std::collections::BTreeMap;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};
#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use crate::modules::storage::{CreatedFile, DirectoryEntry, FileStore, StoreError, StoreResult};

/// In-memory versioned file store with call counters and failure injection
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryFileStore {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    commits: AtomicUsize,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    fail_listing: Mutex<Option<String>>,
    fail_create_prefixes: Mutex<Vec<String>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with empty files at the given paths
    pub fn with_files(paths: &[&str]) -> Self {
        let store = Self::new();
        {
            let mut files = store.files.lock().unwrap();
            for path in paths {
                files.insert(path.to_string(), Vec::new());
            }
        }
        store
    }

    /// Make every listing fail with a non-"not found" error
    pub fn fail_listing_with(&self, message: &str) {
        *self.fail_listing.lock().unwrap() = Some(message.to_string());
    }

    /// Make creation fail for every path starting with `prefix`
    pub fn fail_create_under(&self, prefix: &str) {
        self.fail_create_prefixes
            .lock()
            .unwrap()
            .push(prefix.to_string());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.list_calls() + self.create_calls()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    /// Paths directly under `dir` (no nested entries)
    pub fn paths_in(&self, dir: &str) -> Vec<String> {
        let prefix = format!("{}/", dir);
        self.paths()
            .into_iter()
            .filter(|p| p.strip_prefix(&prefix).is_some_and(|rest| !rest.contains('/')))
            .collect()
    }

    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn read_json(&self, path: &str) -> Option<serde_json::Value> {
        self.read(path)
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }
}

#[cfg(test)]
#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn list_directory(&self, path: &str, _git_ref: &str) -> StoreResult<Vec<DirectoryEntry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.fail_listing.lock().unwrap().clone() {
            return Err(StoreError::Api {
                status: 500,
                message,
            });
        }

        let prefix = format!("{}/", path.trim_end_matches('/'));
        let files = self.files.lock().unwrap();
        let mut entries: Vec<DirectoryEntry> = Vec::new();

        for key in files.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            let entry = match rest.split_once('/') {
                Some((dir, _)) => DirectoryEntry::dir(dir),
                None => DirectoryEntry::file(rest),
            };
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        if entries.is_empty() {
            return Err(StoreError::NotFound(path.to_string()));
        }
        Ok(entries)
    }

    async fn create_file(
        &self,
        path: &str,
        content: &[u8],
        _message: &str,
        _branch: &str,
    ) -> StoreResult<CreatedFile> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let injected = self
            .fail_create_prefixes
            .lock()
            .unwrap()
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()));
        if injected {
            return Err(StoreError::Transport(format!(
                "connection reset while writing {}",
                path
            )));
        }

        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(StoreError::Conflict(format!("{} already exists", path)));
        }
        files.insert(path.to_string(), content.to_vec());

        let n = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CreatedFile {
            operation_reference: format!("memory://commit/{}", n),
        })
    }

    fn public_url(&self, path: &str) -> String {
        format!("memory://raw/{}", path)
    }
}
