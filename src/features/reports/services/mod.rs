mod folio_service;
mod report_service;

pub use folio_service::FolioService;
pub use report_service::ReportService;
