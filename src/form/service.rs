use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{NewSubmission, SubmissionRecord};

use super::email::EmailFormatValidator;
use super::fields::{self, DEFAULT_COLOR, FieldDefinition};
use super::validate::{self, SubmissionInput, ValidationError};

/// Column bound of the varchar(128) ip column.
pub const MAX_IP_CHARS: usize = 128;

#[derive(Debug)]
pub enum DatastoreError {
    Database(sqlx::Error),
    Unavailable(String),
}

impl fmt::Display for DatastoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatastoreError::Database(err) => write!(f, "Database Error: {err}"),
            DatastoreError::Unavailable(msg) => write!(f, "Datastore Unavailable: {msg}"),
        }
    }
}

impl std::error::Error for DatastoreError {}

/// Storage collaborator. One insert per accepted submission; records are
/// never mutated or deleted, so the read side is find/list/count only.
#[async_trait]
pub trait Datastore: Send + Sync {
    async fn insert(&self, row: NewSubmission) -> Result<SubmissionRecord, DatastoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<SubmissionRecord>, DatastoreError>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<SubmissionRecord>, DatastoreError>;
    async fn count(&self) -> Result<i64, DatastoreError>;
}

/// Identity collaborator. Uid 0 means anonymous.
pub trait CurrentUserProvider: Send + Sync {
    fn user_id(&self) -> i64;
    fn account_name(&self) -> String;
}

/// Visitor with no account: uid 0, empty account name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousUser;

impl CurrentUserProvider for AnonymousUser {
    fn user_id(&self) -> i64 {
        0
    }

    fn account_name(&self) -> String {
        String::new()
    }
}

/// The submitting user, passed explicitly rather than read from ambient
/// request state.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
    pub account_name: String,
}

impl Identity {
    pub fn of(provider: &dyn CurrentUserProvider) -> Self {
        Self {
            user_id: provider.user_id(),
            account_name: provider.account_name(),
        }
    }
}

#[derive(Debug)]
pub enum SubmitError {
    /// The input failed validation; nothing was persisted.
    Rejected(Vec<ValidationError>),
    /// The insert failed. No retry: the attempt is lost.
    Datastore(DatastoreError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Rejected(errors) => write!(f, "Rejected: {} field error(s)", errors.len()),
            SubmitError::Datastore(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<DatastoreError> for SubmitError {
    fn from(err: DatastoreError) -> Self {
        SubmitError::Datastore(err)
    }
}

/// Orchestrates validate-then-persist for one submission attempt.
///
/// Stateless across calls apart from the injected collaborators; each call
/// works on its own input and produces at most one persisted record.
pub struct FormSubmissionService {
    datastore: Arc<dyn Datastore>,
    current_user: Arc<dyn CurrentUserProvider>,
    email_validator: Arc<dyn EmailFormatValidator>,
}

impl FormSubmissionService {
    pub fn new(
        datastore: Arc<dyn Datastore>,
        current_user: Arc<dyn CurrentUserProvider>,
        email_validator: Arc<dyn EmailFormatValidator>,
    ) -> Self {
        Self {
            datastore,
            current_user,
            email_validator,
        }
    }

    /// The static field layout, username pre-filled from the current user.
    /// Pure accessor for the rendering layer.
    pub fn describe_fields(&self) -> Vec<FieldDefinition> {
        fields::simple_form_fields(&self.current_user.account_name())
    }

    /// Apply the submission rules. Empty result means the input is
    /// acceptable. No side effects.
    pub fn validate(&self, input: &SubmissionInput) -> Vec<ValidationError> {
        validate::validate(input, self.email_validator.as_ref())
    }

    pub fn identity(&self) -> Identity {
        Identity::of(self.current_user.as_ref())
    }

    /// Validate, then persist. Fail closed: if any rule rejects the input,
    /// the datastore is never called and the errors come back as data.
    pub async fn submit(
        &self,
        input: &SubmissionInput,
        identity: &Identity,
        client_ip: &str,
        now: i64,
    ) -> Result<SubmissionRecord, SubmitError> {
        let errors = self.validate(input);
        if !errors.is_empty() {
            return Err(SubmitError::Rejected(errors));
        }

        // Validation already rejected values outside the declared options;
        // the default only covers an absent or empty field.
        let color = input
            .value("color")
            .and_then(|raw| raw.parse::<i16>().ok())
            .unwrap_or(DEFAULT_COLOR);

        let row = NewSubmission {
            title: input.value("title").unwrap_or_default().to_string(),
            color,
            username: input.value("username").unwrap_or_default().to_string(),
            email: input.value("user_email").unwrap_or_default().to_string(),
            uid: identity.user_id,
            ip: client_ip.chars().take(MAX_IP_CHARS).collect(),
            timestamp: now,
        };

        let record = self.datastore.insert(row).await?;
        Ok(record)
    }
}
