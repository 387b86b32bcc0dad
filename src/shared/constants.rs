// =============================================================================
// STORE LAYOUT
// =============================================================================

/// Directory holding one JSON record per report
pub const REPORTS_DIR: &str = "reports";

/// Directory holding images attached to reports
pub const REPORT_IMAGES_DIR: &str = "reports/images";

// =============================================================================
// REPORT RECORDS
// =============================================================================

/// Literal prefix of every folio and record name
pub const FOLIO_PREFIX: &str = "F-";

/// Record field stamped with the assigned folio
pub const FOLIO_FIELD: &str = "folio";

/// Record field stamped with the image reference
pub const IMAGE_REFERENCE_FIELD: &str = "imageUrl";

/// Image reference used when a report comes without an image
pub const NO_IMAGE: &str = "No";

// =============================================================================
// IMAGES
// =============================================================================

/// Marker ending a data-URI prefix (`data:image/png;base64,`)
pub const DATA_URI_BASE64_MARKER: &str = ";base64,";

/// Extension used when the declared media type has no usable subtype
pub const DEFAULT_IMAGE_EXTENSION: &str = "bin";
