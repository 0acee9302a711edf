pub mod config;
pub mod error;
pub mod state;
pub mod db;
pub mod models;
pub mod form;
pub mod net;
pub mod routes;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::form::email::RegexEmailValidator;
use crate::form::service::{CurrentUserProvider, Datastore, FormSubmissionService};
use crate::state::{AppState, SharedState};

pub fn build_app(
    datastore: Arc<dyn Datastore>,
    current_user: Arc<dyn CurrentUserProvider>,
    config: Config,
) -> Router {
    let max_body_size = config.max_body_size;

    let service = FormSubmissionService::new(
        datastore.clone(),
        current_user,
        Arc::new(RegexEmailValidator::new()),
    );

    let state: SharedState = Arc::new(AppState {
        service,
        datastore,
        config,
    });

    // Security headers
    Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
