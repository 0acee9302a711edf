use serde::Serialize;

/// How a field is rendered and collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Select,
    Email,
    /// A password input paired with a confirmation input.
    PasswordConfirm,
    /// Static informational markup, collects no value.
    Item,
    Submit,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Select => "select",
            FieldKind::Email => "email",
            FieldKind::PasswordConfirm => "password_confirm",
            FieldKind::Item => "item",
            FieldKind::Submit => "submit",
        }
    }

    /// Whether the field collects a value from the client.
    pub fn collects_value(&self) -> bool {
        !matches!(self, FieldKind::Item | FieldKind::Submit)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// One input in the form layout. Immutable once built; any UI layer can
/// render the ordered sequence returned by
/// [`FormSubmissionService::describe_fields`](crate::form::service::FormSubmissionService::describe_fields).
#[derive(Debug, Clone, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Grouped sections are expressed flat: fields carrying the same group
    /// name belong together.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl FieldDefinition {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            description: None,
            options: Vec::new(),
            default_value: None,
            group: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    fn options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        self
    }

    fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    fn group(mut self, name: &str) -> Self {
        self.group = Some(name.to_string());
        self
    }
}

/// Fixed color palette, stored as the integer code of the chosen entry.
pub const COLOR_OPTIONS: [(&str, &str); 6] = [
    ("0", "Black"),
    ("1", "Red"),
    ("2", "Blue"),
    ("3", "Green"),
    ("4", "Orange"),
    ("5", "White"),
];

pub const DEFAULT_COLOR: i16 = 2;

/// The static field layout of the simple form. `account_name` pre-fills the
/// username field for the current user.
pub fn simple_form_fields(account_name: &str) -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new("title", "Title", FieldKind::Text)
            .required()
            .description("The title must be at least 5 characters long."),
        FieldDefinition::new("color", "Color", FieldKind::Select)
            .options(&COLOR_OPTIONS)
            .default_value("2")
            .description("Choose a color."),
        FieldDefinition::new("user_email", "User email", FieldKind::Email)
            .required()
            .description("Your email."),
        FieldDefinition::new("first_name", "First name", FieldKind::Text)
            .required()
            .group("personal_data"),
        FieldDefinition::new("last_name", "Last name", FieldKind::Text)
            .required()
            .group("personal_data"),
        FieldDefinition::new("password", "Password", FieldKind::PasswordConfirm)
            .required()
            .group("access_data"),
        FieldDefinition::new("username", "Username", FieldKind::Text)
            .required()
            .description("Your username.")
            .default_value(account_name),
        FieldDefinition::new("comment", "Comment", FieldKind::Item)
            .description("Use this form to register a new entry."),
        FieldDefinition::new("submit", "Submit", FieldKind::Submit),
    ]
}
