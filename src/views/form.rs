use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::form::fields::{FieldDefinition, FieldKind};
use crate::form::validate::{SubmissionInput, ValidationError};
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "form.html")]
#[allow(dead_code)]
struct FormTemplate {
    has_errors: bool,
    errors: Vec<String>,
    fields: Vec<FieldView>,
}

#[allow(dead_code)]
struct FieldView {
    name: String,
    label: String,
    kind: String,
    required: bool,
    description: String,
    has_description: bool,
    value: String,
    has_error: bool,
    options: Vec<OptionView>,
}

#[allow(dead_code)]
struct OptionView {
    value: String,
    label: String,
    selected: bool,
}

#[derive(Template)]
#[template(path = "confirmation.html")]
struct ConfirmationTemplate;

pub async fn page(State(state): State<SharedState>) -> impl IntoResponse {
    let fields = state.service.describe_fields();
    Html(render(&fields, &SubmissionInput::new(), &[]))
}

pub async fn confirmation() -> impl IntoResponse {
    Html(ConfirmationTemplate.render().unwrap_or_default())
}

/// Render the form page, pre-filling previous values (passwords excepted)
/// and marking rejected fields.
pub fn render(
    fields: &[FieldDefinition],
    input: &SubmissionInput,
    errors: &[ValidationError],
) -> String {
    let views = fields
        .iter()
        .map(|field| {
            let value = if field.kind == FieldKind::PasswordConfirm {
                String::new()
            } else {
                input
                    .value(&field.name)
                    .map(str::to_string)
                    .or_else(|| field.default_value.clone())
                    .unwrap_or_default()
            };
            let options = field
                .options
                .iter()
                .map(|o| OptionView {
                    value: o.value.clone(),
                    label: o.label.clone(),
                    selected: o.value == value,
                })
                .collect();
            FieldView {
                name: field.name.clone(),
                label: field.label.clone(),
                kind: field.kind.as_str().to_string(),
                required: field.required,
                description: field.description.clone().unwrap_or_default(),
                has_description: field.description.is_some(),
                has_error: errors.iter().any(|e| e.field == field.name),
                options,
                value,
            }
        })
        .collect();

    let template = FormTemplate {
        has_errors: !errors.is_empty(),
        errors: errors.iter().map(|e| e.message.clone()).collect(),
        fields: views,
    };
    template.render().unwrap_or_default()
}
