//! Input validation for stored maintenance logs.
//!
//! Every failing field is collected so the client sees all problems at once.

use std::fmt;

use super::models::LogRecord;

const MAX_ID_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    /// How to fix it, when there is something useful to say.
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn empty_field(field: &str, label: &str) -> Self {
        Self::new(field, format!("{} must not be empty", label))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors joined into one client-facing message.
    pub fn to_message(&self) -> String {
        let details: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        format!(
            "Validation failed with {} error(s): {}",
            self.errors.len(),
            details.join("; ")
        )
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.to_message())
        }
    }
}

pub fn validate_required(value: &str, field: &str, label: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(ValidationError::empty_field(field, label));
    }
}

/// Identifiers end up in URLs and filenames.
pub fn validate_identifier(value: &str, field: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        return;
    }
    if value.len() > MAX_ID_LEN {
        errors.add(ValidationError::new(
            field,
            format!("must be at most {} characters", MAX_ID_LEN),
        ));
    }
    if value.chars().any(|c| c.is_whitespace() || c == '/') {
        errors.add(
            ValidationError::new(field, "must not contain whitespace or '/'")
                .with_suggestion("Use letters, digits, '-' or '_'"),
        );
    }
}

impl LogRecord {
    /// Checks the fields a stored log must carry.
    pub fn validate(&self) -> Result<(), String> {
        let mut errors = ValidationErrors::new();

        validate_required(&self.id, "id", "Log ID", &mut errors);
        validate_identifier(&self.id, "id", &mut errors);
        validate_required(&self.title, "title", "Title", &mut errors);
        validate_required(&self.category, "category", "Category", &mut errors);
        validate_required(&self.location, "location", "Location", &mut errors);
        validate_required(&self.description, "description", "Description", &mut errors);
        validate_required(&self.created_by, "createdBy", "Reporter", &mut errors);
        validate_required(&self.timestamp, "timestamp", "Timestamp", &mut errors);

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> LogRecord {
        LogRecord {
            id: "L1".to_string(),
            title: "Leak".to_string(),
            category: "plumbing".to_string(),
            location: "Rm 4".to_string(),
            description: "Pipe burst".to_string(),
            created_by: "A. Smith".to_string(),
            timestamp: "2024-01-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_record_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_collects_every_missing_field() {
        let err = LogRecord::default().validate().unwrap_err();
        assert!(err.contains("7 error(s)"), "{}", err);
        assert!(err.contains("[createdBy]"));
    }

    #[test]
    fn test_blank_is_missing() {
        let mut record = valid();
        record.title = "   ".to_string();
        let err = record.validate().unwrap_err();
        assert!(err.contains("[title] Title must not be empty"));
    }

    #[test]
    fn test_identifier_rules() {
        let mut errors = ValidationErrors::new();
        validate_identifier("a/b", "id", &mut errors);
        validate_identifier("a b", "id", &mut errors);
        validate_identifier(&"x".repeat(129), "id", &mut errors);
        validate_identifier("MAINT-2024_01", "id", &mut errors);
        let message = errors.to_message();
        assert!(message.contains("3 error(s)"), "{}", message);
        assert!(message.contains("Use letters, digits"));
    }
}
