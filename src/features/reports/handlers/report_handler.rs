use std::sync::Arc;

use axum::{extract::State, http::Method, Json};
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::reports::dtos::{SubmitReportDto, SubmitReportResponseDto};
use crate::features::reports::services::ReportService;
use crate::shared::types::ErrorResponse;

/// Submit a failure report
///
/// Assigns the next consecutive folio, stores the optional image and commits
/// the report as a JSON record. An image that cannot be stored does not fail
/// the request; its error description is returned as `imageUrl`.
#[utoipa::path(
    post,
    path = "/api/report",
    tag = "reports",
    request_body = SubmitReportDto,
    responses(
        (status = 200, description = "Report stored", body = SubmitReportResponseDto),
        (status = 400, description = "Malformed body, or missing or empty report data", body = ErrorResponse),
        (status = 405, description = "Only POST is allowed", body = ErrorResponse),
        (status = 500, description = "Folio allocation or commit failed; `assignedFolio` is set when a folio was consumed", body = ErrorResponse)
    )
)]
pub async fn submit_report(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<SubmitReportDto>,
) -> Result<Json<SubmitReportResponseDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (report, image) = dto.into_parts()?;
    debug!(
        "Received report with {} fields (image: {})",
        report.len(),
        image.is_some()
    );

    let submitted = service.submit(report, image).await?;

    Ok(Json(submitted.into()))
}

/// Any method other than POST on the report endpoint
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(format!(
        "Only POST is allowed on this endpoint (got {}).",
        method
    ))
}
