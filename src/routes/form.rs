use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde_json::json;

use crate::error::AppError;
use crate::form::fields::{FieldDefinition, FieldKind};
use crate::form::service::SubmitError;
use crate::form::validate::{SubmissionInput, ValidationError};
use crate::net;
use crate::state::SharedState;
use crate::views;

/// The field layout as JSON, for renderers other than the built-in page.
pub async fn fields(State(state): State<SharedState>) -> Json<Vec<FieldDefinition>> {
    Json(state.service.describe_fields())
}

pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase);
    let ct = content_type
        .as_deref()
        .unwrap_or("application/x-www-form-urlencoded");

    // No file uploads: multipart bodies are rejected outright.
    if ct.contains("multipart/form-data") {
        return Err(AppError::BadRequest(
            "File uploads are not supported".to_string(),
        ));
    }
    let is_form_post = ct.contains("application/x-www-form-urlencoded");

    let input = parse_body(ct, &body).map_err(AppError::BadRequest)?;

    let fields = state.service.describe_fields();
    let mut errors = field_level_errors(&fields, &input);
    errors.extend(state.service.validate(&input));

    if errors.is_empty() {
        let identity = state.service.identity();
        let ip = net::client_ip(&headers, Some(addr.ip()), &state.config.trusted_proxies);
        let now = chrono::Utc::now().timestamp();

        match state.service.submit(&input, &identity, &ip, now).await {
            Ok(record) => {
                tracing::info!(
                    "New form entry from user {} inserted: {}",
                    record.username,
                    record.title
                );
                if is_form_post {
                    return Ok(Redirect::to(&state.config.confirmation_path).into_response());
                }
                return Ok((
                    StatusCode::CREATED,
                    Json(json!({
                        "status": "created",
                        "message": "The form has been submitted correctly",
                        "submission": record,
                    })),
                )
                    .into_response());
            }
            Err(SubmitError::Rejected(late)) => errors = late,
            Err(SubmitError::Datastore(err)) => return Err(AppError::Datastore(err)),
        }
    }

    if is_form_post {
        // Re-render the form with the errors and the previous values.
        let page = views::form::render(&fields, &input, &errors);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
    }

    Err(AppError::Unprocessable(errors))
}

/// Parse a request body into field values based on Content-Type.
fn parse_body(content_type: &str, body: &[u8]) -> Result<SubmissionInput, String> {
    if content_type.contains("application/json") {
        parse_json(body)
    } else if content_type.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        parse_json(body).or_else(|_| parse_form_urlencoded(body))
    }
}

fn parse_json(body: &[u8]) -> Result<SubmissionInput, String> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))?;
    let obj = value
        .as_object()
        .ok_or_else(|| "Expected a JSON object".to_string())?;

    let mut input = SubmissionInput::new();
    for (key, value) in obj {
        match value {
            serde_json::Value::String(s) => input.set(key, s),
            serde_json::Value::Number(n) => input.set(key, &n.to_string()),
            serde_json::Value::Bool(b) => input.set(key, if *b { "1" } else { "0" }),
            serde_json::Value::Null => {}
            _ => return Err(format!("Field {key} must be a scalar value")),
        }
    }
    Ok(input)
}

fn parse_form_urlencoded(body: &[u8]) -> Result<SubmissionInput, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;
    Ok(form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

/// Field checks owned by the rendering layer: required values present,
/// select values among the declared options, password pair matching. The
/// core rules live in [`crate::form::validate`].
fn field_level_errors(fields: &[FieldDefinition], input: &SubmissionInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for field in fields {
        if !field.kind.collects_value() {
            continue;
        }

        let value = input.value(&field.name).unwrap_or("");
        if field.required && value.is_empty() {
            errors.push(ValidationError::new(
                &field.name,
                format!("The {} field is required.", field.label),
            ));
            continue;
        }

        match field.kind {
            FieldKind::Select => {
                if !value.is_empty() && !field.options.iter().any(|o| o.value == value) {
                    errors.push(ValidationError::new(
                        &field.name,
                        format!("Invalid choice for {}.", field.label),
                    ));
                }
            }
            FieldKind::PasswordConfirm => {
                let confirm = input
                    .value(&format!("{}_confirm", field.name))
                    .unwrap_or("");
                if value != confirm {
                    errors.push(ValidationError::new(
                        &field.name,
                        "The specified passwords do not match.",
                    ));
                }
            }
            _ => {}
        }
    }

    errors
}
