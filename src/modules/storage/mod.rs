//! Storage module for report persistence
//!
//! Defines the versioned file store contract and the GitHub-backed
//! implementation used in production.

mod file_store;
mod github_client;

pub use file_store::{
    CreatedFile, DirectoryEntry, FileStore, StoreError, StoreResult,
};
pub use github_client::GitHubContentsClient;
