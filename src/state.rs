use std::sync::Arc;

use crate::config::Config;
use crate::form::service::{Datastore, FormSubmissionService};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub service: FormSubmissionService,
    pub datastore: Arc<dyn Datastore>,
    pub config: Config,
}
