use utoipa::{Modify, OpenApi};

use crate::features::reports::{dtos as reports_dtos, handlers as reports_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Reports
        reports_handlers::report_handler::submit_report,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            // Reports
            reports_dtos::SubmitReportDto,
            reports_dtos::ImageDataDto,
            reports_dtos::SubmitReportResponseDto,
        )
    ),
    tags(
        (name = "reports", description = "Failure report intake with consecutive folios")
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_report_endpoint() {
        let mut openapi = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Reports".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut openapi);

        assert!(openapi.paths.paths.contains_key("/api/report"));
        assert_eq!(openapi.info.title, "Reports");
        assert_eq!(openapi.info.version, "9.9.9");
    }
}
