use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern"));

/// User-facing booking problems. None of these are fatal; they end up as a
/// field annotation or a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required")]
    RequiredField,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Please enter a valid phone number")]
    InvalidPhone,
    #[error("Please select a date and time for your appointment.")]
    MissingDateTime,
    #[error("Please accept the required GDPR consent terms.")]
    MissingConsent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Phone,
}

pub fn validate_field(value: &str, kind: FieldKind, required: bool) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return if required {
            Err(ValidationError::RequiredField)
        } else {
            Ok(())
        };
    }

    match kind {
        FieldKind::Text => Ok(()),
        FieldKind::Email => {
            if EMAIL.is_match(value) {
                Ok(())
            } else {
                Err(ValidationError::InvalidEmail)
            }
        }
        FieldKind::Phone => {
            if PHONE.is_match(&strip_phone_separators(value)) {
                Ok(())
            } else {
                Err(ValidationError::InvalidPhone)
            }
        }
    }
}

fn strip_phone_separators(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_empty_fails() {
        assert_eq!(
            validate_field("   ", FieldKind::Text, true),
            Err(ValidationError::RequiredField)
        );
        assert_eq!(validate_field("", FieldKind::Email, false), Ok(()));
    }

    #[test]
    fn email_pattern() {
        assert_eq!(validate_field("a@b.com", FieldKind::Email, true), Ok(()));
        assert_eq!(
            validate_field("a@b", FieldKind::Email, true),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_field("a b@c.com", FieldKind::Email, true),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            validate_field("a@@b.com", FieldKind::Email, true),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn phone_strips_separators() {
        assert_eq!(validate_field("+1 555-123-4567", FieldKind::Phone, false), Ok(()));
        assert_eq!(validate_field("(555) 123 4567", FieldKind::Phone, false), Ok(()));
    }

    #[test]
    fn phone_rejects_leading_zero_and_overlong() {
        assert_eq!(
            validate_field("0123", FieldKind::Phone, false),
            Err(ValidationError::InvalidPhone)
        );
        assert_eq!(
            validate_field("+12345678901234567", FieldKind::Phone, false),
            Err(ValidationError::InvalidPhone)
        );
        assert_eq!(
            validate_field("555-CALL-NOW", FieldKind::Phone, false),
            Err(ValidationError::InvalidPhone)
        );
    }

    #[test]
    fn messages_match_form_copy() {
        assert_eq!(ValidationError::RequiredField.to_string(), "This field is required");
        assert_eq!(
            ValidationError::MissingConsent.to_string(),
            "Please accept the required GDPR consent terms."
        );
    }
}
