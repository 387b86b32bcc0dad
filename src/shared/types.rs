use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body shared by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Underlying cause, present on server-side failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Folio consumed by a submission that failed after allocation
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "F-0042")]
    pub assigned_folio: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
            assigned_folio: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_assigned_folio(mut self, folio: Option<String>) -> Self {
        self.assigned_folio = folio;
        self
    }
}
