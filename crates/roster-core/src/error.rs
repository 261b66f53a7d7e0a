/// Minimum accepted length for a member-chosen password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Input rejected before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("at least one weekday must be selected")]
    EmptyWeekdays,

    #[error("weekday {0} is out of range (0 = Sunday .. 6 = Saturday)")]
    InvalidWeekday(u8),

    #[error("start date {from} is after end date {to}")]
    InvalidDateRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    #[error("date range spans {days} days, at most {max} are allowed")]
    DateRangeTooLong { days: i64, max: i64 },

    #[error("password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// Trimmed value of a required text field, or `MissingField`.
pub fn require_field<'a>(name: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(name));
    }
    Ok(trimmed)
}

/// Normalised (trimmed, lower-cased) login email.
pub fn validate_email(raw: &str) -> Result<String, ValidationError> {
    let email = require_field("email", raw)?;
    let well_formed = !email.contains(char::is_whitespace)
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_lowercase())
}

/// Length is checked before the confirmation, matching the reset form.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_rejected_first() {
        assert_eq!(validate_new_password("abc", "xyz"), Err(ValidationError::PasswordTooShort));
        assert_eq!(
            validate_new_password("abcdef", "abcdeg"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(validate_new_password("abcdef", "abcdef"), Ok(()));
    }

    #[test]
    fn email_is_normalised() {
        assert_eq!(validate_email("  Anna@Club.DE ").unwrap(), "anna@club.de");
        assert!(matches!(validate_email("anna"), Err(ValidationError::InvalidEmail(_))));
        assert!(matches!(validate_email("@club.de"), Err(ValidationError::InvalidEmail(_))));
        assert_eq!(validate_email("   "), Err(ValidationError::MissingField("email")));
    }

    #[test]
    fn blank_field_is_missing() {
        assert_eq!(require_field("location", "  "), Err(ValidationError::MissingField("location")));
        assert_eq!(require_field("location", " Halle ").unwrap(), "Halle");
    }
}
