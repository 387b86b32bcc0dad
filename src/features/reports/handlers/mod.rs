pub mod report_handler;

pub use report_handler::{method_not_allowed, submit_report};
