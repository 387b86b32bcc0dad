//! Versioned file store contract
//!
//! Any content-addressable, path-based commit API can back report storage
//! as long as it can list a directory at a ref and create a new file on a
//! branch. The GitHub contents API is the production backend; tests use an
//! in-memory double.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested path does not exist at the given ref
    #[error("Path not found: {0}")]
    NotFound(String),

    /// A file already exists at the target path
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store answered with an unexpected status
    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with a body we could not interpret
    #[error("Invalid store response: {0}")]
    InvalidResponse(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Kind of a directory entry as reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// A single entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirectoryEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[cfg(test)]
impl DirectoryEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }
}

/// Result of a successful file creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedFile {
    /// Opaque reference to the write operation (e.g. the commit URL)
    pub operation_reference: String,
}

/// Versioned file store abstraction
///
/// Implementations must report a missing directory as `StoreError::NotFound`
/// so callers can tell an empty store apart from a broken one, and must never
/// overwrite an existing file from `create_file`.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// List the entries of `path` at `git_ref`
    async fn list_directory(&self, path: &str, git_ref: &str) -> StoreResult<Vec<DirectoryEntry>>;

    /// Create a new file at `path` on `branch` with the given raw content
    async fn create_file(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        branch: &str,
    ) -> StoreResult<CreatedFile>;

    /// Publicly resolvable URL for the raw content stored at `path`
    fn public_url(&self, path: &str) -> String;
}
