use thiserror::Error;

/// Errors that can occur while converting field mappings or assembling a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FatturaError {
    /// A mapping value is not a scalar, a nested mapping, or a sequence of those.
    #[error("unsupported value kind at {path}: {kind}")]
    UnsupportedValueKind {
        /// Slash-separated path to the offending key.
        path: String,
        /// Kind of the rejected value (e.g. "null", "nested sequence").
        kind: String,
    },

    /// A mapping key cannot become a tag name.
    #[error("empty or invalid key name at {path}")]
    EmptyKeyName {
        /// Slash-separated path of the parent mapping, with the bad key appended.
        path: String,
    },

    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// XML generation or parsing error.
    #[error("XML error: {0}")]
    Xml(String),
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "sender.address.postcode").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Check identifier if applicable (e.g. "FPA-CAP").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a check identifier.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_carry_path() {
        let err = FatturaError::UnsupportedValueKind {
            path: "Body/Line[2]".into(),
            kind: "null".into(),
        };
        assert_eq!(err.to_string(), "unsupported value kind at Body/Line[2]: null");

        let err = FatturaError::EmptyKeyName { path: "Header/".into() };
        assert_eq!(err.to_string(), "empty or invalid key name at Header/");
    }

    #[test]
    fn validation_error_display() {
        let plain = ValidationError::new("number", "must not be empty");
        assert_eq!(plain.to_string(), "number: must not be empty");

        let ruled = ValidationError::with_rule("sender.address.postcode", "5 digits", "FPA-CAP");
        assert_eq!(ruled.to_string(), "[FPA-CAP] sender.address.postcode: 5 digits");
    }
}
