//! Schema validation of the raw signup payload.
//!
//! Works on an untyped JSON value so that a missing field, a field of the
//! wrong type and a malformed value all come back as per-field errors instead
//! of a single deserialization failure.

use serde_json::{Map, Value};

use super::aggregate::NewWaitlistEntry;
use crate::shared::validation::{FieldError, ValidationError, ValidationRules, EMAIL_PATTERN};

pub const FIELD_FULL_NAME: &str = "fullName";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_COMPANY: &str = "company";

pub const MAX_FULL_NAME_LENGTH: usize = 200;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_COMPANY_LENGTH: usize = 200;

fn full_name_rules() -> ValidationRules {
    ValidationRules::required().with_max_length(MAX_FULL_NAME_LENGTH)
}

fn email_rules() -> ValidationRules {
    ValidationRules::required()
        .with_max_length(MAX_EMAIL_LENGTH)
        .with_pattern(&EMAIL_PATTERN, "Please enter a valid email address")
}

fn company_rules() -> ValidationRules {
    ValidationRules::none().with_max_length(MAX_COMPANY_LENGTH)
}

/// Приведение email к ключу уникальности: без пробелов по краям, в нижнем регистре
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Проверка входных данных формы записи в лист ожидания
///
/// Возвращает все ошибки сразу, по одной на каждое невалидное поле.
pub fn validate_join_request(raw: &Value) -> Result<NewWaitlistEntry, ValidationError> {
    let Some(obj) = raw.as_object() else {
        return Err(ValidationError::single("", "Request body must be a JSON object"));
    };

    let mut errors = Vec::new();

    let full_name = read_string(obj, FIELD_FULL_NAME, "Full name", &full_name_rules(), &mut errors)
        .map(|s| s.trim().to_string());

    let email = read_string(obj, FIELD_EMAIL, "Email", &email_rules(), &mut errors)
        .map(normalize_email);

    let company = read_string(obj, FIELD_COMPANY, "Company", &company_rules(), &mut errors)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match (full_name, email) {
        (Some(full_name), Some(email)) if errors.is_empty() => Ok(NewWaitlistEntry {
            full_name,
            email,
            company,
        }),
        _ => Err(ValidationError::new(errors)),
    }
}

/// Читает строковое поле и проверяет его по правилам.
///
/// `None` означает, что поле отсутствует или невалидно; во втором случае
/// ошибка уже добавлена в `errors`.
fn read_string<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    label: &str,
    rules: &ValidationRules,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    let value = match obj.get(field) {
        None | Some(Value::Null) => {
            if rules.is_required() {
                errors.push(FieldError::new(field, format!("{} is required", label)));
            }
            return None;
        }
        Some(Value::String(s)) => s.as_str(),
        Some(_) => {
            errors.push(FieldError::new(field, format!("{} must be a string", label)));
            return None;
        }
    };

    let trimmed = value.trim();
    if let Err(message) = rules.validate_string(trimmed, label) {
        errors.push(FieldError::new(field, message));
        return None;
    }

    Some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_input_without_company() {
        let entry = validate_join_request(&json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com"
        }))
        .unwrap();

        assert_eq!(entry.full_name, "Ada Lovelace");
        assert_eq!(entry.email, "ada@example.com");
        assert_eq!(entry.company, None);
    }

    #[test]
    fn test_values_are_trimmed_and_email_lowercased() {
        let entry = validate_join_request(&json!({
            "fullName": "  Grace Hopper ",
            "email": " Grace@Navy.MIL ",
            "company": "  US Navy  "
        }))
        .unwrap();

        assert_eq!(entry.full_name, "Grace Hopper");
        assert_eq!(entry.email, "grace@navy.mil");
        assert_eq!(entry.company.as_deref(), Some("US Navy"));
    }

    #[test]
    fn test_blank_or_null_company_is_absent() {
        for company in [json!(""), json!("   "), Value::Null] {
            let entry = validate_join_request(&json!({
                "fullName": "Ada",
                "email": "ada@example.com",
                "company": company
            }))
            .unwrap();
            assert_eq!(entry.company, None);
        }
    }

    #[test]
    fn test_empty_full_name_is_rejected() {
        let err = validate_join_request(&json!({
            "fullName": "",
            "email": "x@example.com"
        }))
        .unwrap_err();

        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, FIELD_FULL_NAME);
        assert_eq!(err.errors[0].message, "Full name cannot be empty");
    }

    #[test]
    fn test_every_failing_field_is_reported() {
        let err = validate_join_request(&json!({
            "email": "not-an-email",
            "company": 42
        }))
        .unwrap_err();

        assert!(err.has_field(FIELD_FULL_NAME));
        assert!(err.has_field(FIELD_EMAIL));
        assert!(err.has_field(FIELD_COMPANY));
        assert_eq!(err.errors.len(), 3);

        let email = err.errors.iter().find(|e| e.field == FIELD_EMAIL).unwrap();
        assert_eq!(email.message, "Please enter a valid email address");
    }

    #[test]
    fn test_wrong_types_are_reported() {
        let err = validate_join_request(&json!({
            "fullName": ["Ada"],
            "email": true
        }))
        .unwrap_err();

        assert_eq!(
            err.errors,
            vec![
                FieldError::new(FIELD_FULL_NAME, "Full name must be a string"),
                FieldError::new(FIELD_EMAIL, "Email must be a string"),
            ]
        );
    }

    #[test]
    fn test_overlong_fields_are_rejected() {
        let err = validate_join_request(&json!({
            "fullName": "a".repeat(MAX_FULL_NAME_LENGTH + 1),
            "email": "ada@example.com",
            "company": "c".repeat(MAX_COMPANY_LENGTH + 1)
        }))
        .unwrap_err();

        assert!(err.has_field(FIELD_FULL_NAME));
        assert!(err.has_field(FIELD_COMPANY));
        assert!(!err.has_field(FIELD_EMAIL));
    }

    #[test]
    fn test_non_object_input_is_rejected() {
        let err = validate_join_request(&json!(["Ada", "ada@example.com"])).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let entry = validate_join_request(&json!({
            "fullName": "Ada",
            "email": "ada@example.com",
            "newsletter": true
        }));
        assert!(entry.is_ok());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM\t"), "ada@example.com");
    }
}
