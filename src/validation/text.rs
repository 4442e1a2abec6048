//! Text input checks.

use crate::config::TextConfig;
use crate::validation::ValidationError;

/// Length bounds for a text field, measured in characters.
#[derive(Debug, Clone)]
pub struct TextRules {
    pub min_length: usize,
    pub max_length: usize,
    /// Field name used in messages.
    pub field_name: String,
}

impl Default for TextRules {
    fn default() -> Self {
        Self::from(&TextConfig::default())
    }
}

impl From<&TextConfig> for TextRules {
    fn from(config: &TextConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            field_name: "Text".to_string(),
        }
    }
}

impl TextRules {
    pub fn named(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }
}

pub fn validate_text(text: &str, rules: &TextRules) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText {
            field: rules.field_name.clone(),
        });
    }

    let len = text.chars().count();
    if len < rules.min_length {
        return Err(ValidationError::TextTooShort {
            field: rules.field_name.clone(),
            min: rules.min_length,
        });
    }
    if len > rules.max_length {
        return Err(ValidationError::TextTooLong {
            field: rules.field_name.clone(),
            max: rules.max_length,
        });
    }
    Ok(())
}
