pub mod form;

use axum::Router;
use axum::routing::get;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/form", get(form::page).post(crate::routes::form::submit))
        .route("/form/confirmation", get(form::confirmation))
}
