use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
///
/// The submission endpoint is public and answers every non-POST method
/// with 405 and the standard error body.
pub fn routes(report_service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/report",
            post(handlers::submit_report).fallback(handlers::method_not_allowed),
        )
        .with_state(report_service)
}
