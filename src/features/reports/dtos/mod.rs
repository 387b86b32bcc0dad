mod report_dto;

pub use report_dto::{ImageDataDto, SubmitReportDto, SubmitReportResponseDto};
