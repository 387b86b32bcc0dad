mod folio;
mod image;
mod submission;

pub use folio::{AllocationError, Folio};
pub use image::{ImageAttachment, ImageReference};
pub use submission::{SubmissionError, SubmissionFailureKind, SubmittedReport};
