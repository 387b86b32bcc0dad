use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::core::error::AppError;
use crate::features::reports::models::{ImageAttachment, SubmittedReport};

/// Report submission request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportDto {
    /// Free-form report fields; stored as-is plus `folio` and `imageUrl`
    #[validate(
        required(message = "Report data is missing"),
        custom(function = validate_report_data)
    )]
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"location": "Calle 5 #120", "description": "Streetlight off"}))]
    pub report_data: Option<Value>,
    /// Optional image attached to the report
    #[serde(default)]
    pub image_data: Option<ImageDataDto>,
}

/// Inline image payload
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageDataDto {
    /// Base64 content, optionally prefixed with `data:<type>;base64,`
    #[serde(default)]
    pub base64: String,
    /// MIME type of the image
    #[serde(default)]
    #[schema(example = "image/png")]
    pub file_type: String,
}

/// Report data must be a JSON object with at least one field
fn validate_report_data(value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Object(map) if !map.is_empty() => Ok(()),
        Value::Object(_) => Err(ValidationError::new("report_data_empty")
            .with_message("Report data must not be empty".into())),
        _ => Err(ValidationError::new("report_data_not_object")
            .with_message("Report data must be a JSON object".into())),
    }
}

impl SubmitReportDto {
    /// Split a validated request into the report fields and an optional image
    ///
    /// An image with empty content counts as no image.
    pub fn into_parts(self) -> Result<(Map<String, Value>, Option<ImageAttachment>), AppError> {
        let Some(Value::Object(report)) = self.report_data else {
            return Err(AppError::Validation(
                "Report data must be a JSON object".to_string(),
            ));
        };

        let image = self
            .image_data
            .filter(|image| !image.base64.trim().is_empty())
            .map(|image| ImageAttachment::new(image.base64, image.file_type));

        Ok((report, image))
    }
}

/// Successful submission response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponseDto {
    pub success: bool,
    /// Assigned folio (`F-NNNN`)
    #[schema(example = "F-0001")]
    pub folio: String,
    /// Public image URL, `No` when no image was sent, or an upload error description
    pub image_url: String,
    pub message: String,
    /// Store reference of the record commit
    pub commit: String,
}

impl From<SubmittedReport> for SubmitReportResponseDto {
    fn from(submitted: SubmittedReport) -> Self {
        Self {
            success: true,
            folio: submitted.folio.to_string(),
            image_url: submitted.image_reference.to_string(),
            message: format!("Report {} saved to the repository.", submitted.folio),
            commit: submitted.confirmation_reference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{Folio, ImageReference};
    use serde_json::json;

    fn dto(body: Value) -> SubmitReportDto {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_missing_or_empty_report_data_fails_validation() {
        for body in [
            json!({}),
            json!({"reportData": null}),
            json!({"reportData": {}}),
            json!({"reportData": "text"}),
            json!({"reportData": [1, 2]}),
        ] {
            let errors = dto(body.clone()).validate().unwrap_err();
            assert!(
                errors.field_errors().contains_key("report_data"),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn test_report_object_passes_validation() {
        assert!(dto(json!({"reportData": {"a": 1}})).validate().is_ok());
    }

    #[test]
    fn test_unvalidated_non_object_is_not_split() {
        let result = dto(json!({"reportData": "text"})).into_parts();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_image_is_optional() {
        let (report, image) = dto(json!({"reportData": {"a": 1}})).into_parts().unwrap();
        assert_eq!(report["a"], 1);
        assert!(image.is_none());

        let (_, image) = dto(json!({
            "reportData": {"a": 1},
            "imageData": {"base64": "  ", "fileType": "image/png"}
        }))
        .into_parts()
        .unwrap();
        assert!(image.is_none());
    }

    #[test]
    fn test_image_fields_are_mapped() {
        let (_, image) = dto(json!({
            "reportData": {"a": 1},
            "imageData": {"base64": "data:image/png;base64,AAAA", "fileType": "image/png"}
        }))
        .into_parts()
        .unwrap();
        let image = image.unwrap();
        assert_eq!(image.media_type, "image/png");
        assert_eq!(image.payload(), "AAAA");
    }

    #[test]
    fn test_response_from_submitted_report() {
        let dto = SubmitReportResponseDto::from(SubmittedReport {
            folio: Folio::new(3),
            image_reference: ImageReference::NotProvided,
            confirmation_reference: "https://example.com/commit/abc".to_string(),
        });
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "folio": "F-0003",
                "imageUrl": "No",
                "message": "Report F-0003 saved to the repository.",
                "commit": "https://example.com/commit/abc"
            })
        );
    }
}
