use serde::Serialize;

/// A persisted form entry. Constructed only from input that passed every
/// validation rule; never mutated or deleted after insert.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct SubmissionRecord {
    pub id: i64,
    pub title: String,
    pub color: i16,
    pub username: String,
    pub email: String,
    /// Submitting user id; 0 for anonymous.
    pub uid: i64,
    pub ip: String,
    /// Unix timestamp of the submission.
    pub timestamp: i64,
}

/// The validated column set handed to the datastore for one insert.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub title: String,
    pub color: i16,
    pub username: String,
    pub email: String,
    pub uid: i64,
    pub ip: String,
    pub timestamp: i64,
}
