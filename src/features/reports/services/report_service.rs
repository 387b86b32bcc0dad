use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::features::reports::models::{
    Folio, ImageAttachment, ImageReference, SubmissionError, SubmittedReport,
};
use crate::features::reports::services::FolioService;
use crate::modules::storage::{CreatedFile, FileStore, StoreError};
use crate::shared::constants::{FOLIO_FIELD, IMAGE_REFERENCE_FIELD, REPORTS_DIR, REPORT_IMAGES_DIR};

/// Store path of a report record: `reports/<folio>-<YYYYMMDD>-<HHMM>.json`
pub fn record_path(folio: Folio, submitted_at: DateTime<Utc>) -> String {
    format!(
        "{}/{}-{}.json",
        REPORTS_DIR,
        folio,
        submitted_at.format("%Y%m%d-%H%M")
    )
}

/// Store path of a report image: `reports/images/<folio>-<epoch millis>.<ext>`
pub fn image_path(folio: Folio, submitted_at: DateTime<Utc>, extension: &str) -> String {
    format!(
        "{}/{}-{}.{}",
        REPORT_IMAGES_DIR,
        folio,
        submitted_at.timestamp_millis(),
        extension
    )
}

/// Orchestrates a report submission against the versioned file store
///
/// Steps run sequentially: allocate a folio, store the optional image, then
/// commit the JSON record. Only allocation and record persistence are fatal.
pub struct ReportService {
    store: Arc<dyn FileStore>,
    folio_service: Arc<FolioService>,
    branch: String,
    commit_message_prefix: String,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn FileStore>,
        folio_service: Arc<FolioService>,
        branch: impl Into<String>,
        commit_message_prefix: impl Into<String>,
    ) -> Self {
        Self {
            store,
            folio_service,
            branch: branch.into(),
            commit_message_prefix: commit_message_prefix.into(),
        }
    }

    /// Submit a report with an optional image attachment
    pub async fn submit(
        &self,
        mut report: Map<String, Value>,
        image: Option<ImageAttachment>,
    ) -> Result<SubmittedReport, SubmissionError> {
        let folio = self
            .folio_service
            .allocate_next_folio()
            .await
            .map_err(SubmissionError::Allocation)?;
        let submitted_at = Utc::now();

        report.insert(FOLIO_FIELD.to_string(), Value::String(folio.to_string()));

        let image_reference = match image {
            Some(image) => self.store_image(folio, &image, submitted_at).await,
            None => ImageReference::NotProvided,
        };
        report.insert(
            IMAGE_REFERENCE_FIELD.to_string(),
            Value::String(image_reference.to_string()),
        );

        let path = record_path(folio, submitted_at);
        let content = serde_json::to_vec_pretty(&report).map_err(|source| {
            error!("Report {} could not be encoded: {}", folio, source);
            SubmissionError::RecordEncode { folio, source }
        })?;
        let created = self
            .persist_record(&path, &content, folio)
            .await
            .map_err(|source| {
                error!(
                    "Report {} was allocated but not persisted to '{}': {}",
                    folio, path, source
                );
                SubmissionError::RecordPersist { folio, source }
            })?;

        info!(
            "Report {} committed to '{}' ({})",
            folio, path, created.operation_reference
        );

        Ok(SubmittedReport {
            folio,
            image_reference,
            confirmation_reference: created.operation_reference,
        })
    }

    /// Store the image and return its reference; failures degrade the reference
    async fn store_image(
        &self,
        folio: Folio,
        image: &ImageAttachment,
        submitted_at: DateTime<Utc>,
    ) -> ImageReference {
        let bytes = match image.decode() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Image for report {} could not be decoded: {}", folio, e);
                return ImageReference::UploadFailed(format!("invalid base64 content: {}", e));
            }
        };

        let path = image_path(folio, submitted_at, &image.extension());
        let message = format!("{} Image for report #{}", self.commit_message_prefix, folio);

        match self
            .store
            .create_file(&path, &bytes, &message, &self.branch)
            .await
        {
            Ok(_) => {
                let url = self.store.public_url(&path);
                info!("Image for report {} stored at '{}'", folio, path);
                ImageReference::Stored(url)
            }
            Err(e) => {
                warn!(
                    "Image upload for report {} failed, continuing without it: {}",
                    folio, e
                );
                ImageReference::UploadFailed(e.to_string())
            }
        }
    }

    async fn persist_record(
        &self,
        path: &str,
        content: &[u8],
        folio: Folio,
    ) -> Result<CreatedFile, StoreError> {
        let message = format!("{} Failure report #{}", self.commit_message_prefix, folio);

        self.store
            .create_file(path, content, &message, &self.branch)
            .await
    }
}
