use std::sync::Arc;

use tracing::{debug, error, info};

use crate::features::reports::models::{AllocationError, Folio};
use crate::modules::storage::{FileStore, StoreError};
use crate::shared::constants::REPORTS_DIR;

/// Derives the next consecutive folio from the records already in the store
///
/// There is no counter service: every allocation lists the report directory
/// and takes the highest folio found plus one. Two allocations that run before
/// either record is written return the same folio.
pub struct FolioService {
    store: Arc<dyn FileStore>,
    git_ref: String,
}

impl FolioService {
    pub fn new(store: Arc<dyn FileStore>, git_ref: impl Into<String>) -> Self {
        Self {
            store,
            git_ref: git_ref.into(),
        }
    }

    /// Compute the next unused folio
    ///
    /// A missing report directory counts as an empty store. Any other listing
    /// failure is returned as-is; no folio is guessed.
    pub async fn allocate_next_folio(&self) -> Result<Folio, AllocationError> {
        let entries = match self.store.list_directory(REPORTS_DIR, &self.git_ref).await {
            Ok(entries) => entries,
            Err(StoreError::NotFound(_)) => {
                debug!("Report directory '{}' not found, starting at 1", REPORTS_DIR);
                Vec::new()
            }
            Err(e) => {
                error!("Failed to list report directory '{}': {}", REPORTS_DIR, e);
                return Err(e.into());
            }
        };

        let max = entries
            .iter()
            .filter(|entry| entry.is_file())
            .filter_map(|entry| {
                let number = Folio::number_from_file_name(&entry.name);
                if number.is_none() {
                    debug!("Skipping entry without a folio number: {}", entry.name);
                }
                number
            })
            .max()
            .unwrap_or(0);

        let folio = Folio::new(max).next().ok_or_else(|| {
            error!("Folio {} is the highest representable, cannot allocate", Folio::new(max));
            AllocationError::Exhausted(max)
        })?;
        info!(
            "Allocated folio {} (scanned {} entries, highest existing {})",
            folio,
            entries.len(),
            max
        );
        Ok(folio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::InMemoryFileStore;

    fn service(store: &Arc<InMemoryFileStore>) -> FolioService {
        FolioService::new(store.clone(), "main")
    }

    #[tokio::test]
    async fn test_missing_directory_yields_first_folio() {
        let store = Arc::new(InMemoryFileStore::new());
        let folio = service(&store).allocate_next_folio().await.unwrap();
        assert_eq!(folio.to_string(), "F-0001");
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_directory_with_only_images_yields_first_folio() {
        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/images/F-0009-1700000000000.png",
        ]));
        let folio = service(&store).allocate_next_folio().await.unwrap();
        assert_eq!(folio.to_string(), "F-0001");
    }

    #[tokio::test]
    async fn test_next_folio_is_max_plus_one() {
        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/F-0001-20250101-0900.json",
            "reports/F-0007-20250102-1015.json",
            "reports/F-0003-20250103-1130.json",
        ]));
        let folio = service(&store).allocate_next_folio().await.unwrap();
        assert_eq!(folio, Folio::new(8));
        assert_eq!(folio.to_string(), "F-0008");
    }

    #[tokio::test]
    async fn test_gaps_are_not_filled() {
        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/F-0002-20250101-0900.json",
            "reports/F-0040-20250101-0901.json",
        ]));
        let folio = service(&store).allocate_next_folio().await.unwrap();
        assert_eq!(folio.to_string(), "F-0041");
    }

    #[tokio::test]
    async fn test_malformed_and_foreign_entries_are_ignored() {
        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/F-0004-20250101-0900.json",
            "reports/F-abc-20250101.json",
            "reports/README.md",
            "reports/G-9999-20250101-0900.json",
            "reports/images/F-5000-1700000000000.png",
        ]));
        let folio = service(&store).allocate_next_folio().await.unwrap();
        assert_eq!(folio.to_string(), "F-0005");
    }

    #[tokio::test]
    async fn test_folio_beyond_four_digits_keeps_growing() {
        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/F-9999-20250101-0900.json",
        ]));
        let folio = service(&store).allocate_next_folio().await.unwrap();
        assert_eq!(folio.to_string(), "F-10000");

        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/F-10000-20250101-0900.json",
            "reports/F-9999-20250101-0900.json",
        ]));
        let folio = service(&store).allocate_next_folio().await.unwrap();
        assert_eq!(folio.to_string(), "F-10001");
    }

    #[tokio::test]
    async fn test_listing_failure_is_propagated() {
        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/F-0001-20250101-0900.json",
        ]));
        store.fail_listing_with("Bad credentials");

        let err = service(&store).allocate_next_folio().await.unwrap_err();
        assert!(matches!(
            err,
            AllocationError::Store(StoreError::Api { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_allocation_without_write_repeats_folio() {
        // Known gap: allocation only reads, so two racing submissions agree.
        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/F-0001-20250101-0900.json",
        ]));
        let service = service(&store);
        let first = service.allocate_next_folio().await.unwrap();
        let second = service.allocate_next_folio().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_highest_representable_folio_fails_allocation() {
        let store = Arc::new(InMemoryFileStore::with_files(&[
            "reports/F-0003-20250101-0900.json",
            "reports/F-18446744073709551615-20250101-0900.json",
        ]));

        let err = service(&store).allocate_next_folio().await.unwrap_err();
        assert!(matches!(err, AllocationError::Exhausted(u64::MAX)));
        assert_eq!(store.create_calls(), 0);
    }
}
