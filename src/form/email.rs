use std::sync::LazyLock;

use regex::Regex;

/// Email syntax check. Structure only, not deliverability.
pub trait EmailFormatValidator: Send + Sync {
    fn is_valid(&self, address: &str) -> bool;
}

// RFC-5322-like address pattern:
// - dot-atom local part (atext runs separated by single dots)
// - domain labels of up to 63 chars with no leading/trailing hyphen
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^[A-Za-z0-9!\#$%&'*+/=?^_`{|}~-]+ (\.[A-Za-z0-9!\#$%&'*+/=?^_`{|}~-]+)*
        @
        [A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?
        (\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$
        ",
    )
    .expect("EMAIL_REGEX: invalid regex pattern")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct RegexEmailValidator;

impl RegexEmailValidator {
    pub fn new() -> Self {
        Self
    }
}

impl EmailFormatValidator for RegexEmailValidator {
    fn is_valid(&self, address: &str) -> bool {
        address.len() <= 255 && EMAIL_REGEX.is_match(address)
    }
}
