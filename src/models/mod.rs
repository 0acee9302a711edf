pub mod submission;

pub use submission::{NewSubmission, SubmissionRecord};
