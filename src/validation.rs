// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Input validation for the auth and profile forms.
//!
//! Every check is pure and returns its failure as a value. Form-level
//! helpers collect one error per field, in a fixed field order, so a caller
//! can show every problem at once.

use regex::Regex;
use std::sync::LazyLock;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const NAME_MAX_LENGTH: usize = 100;
pub const BIO_MAX_LENGTH: usize = 500;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@([A-Za-z0-9.-]+\.[A-Za-z]{2,})$")
        .unwrap_or_else(|e| panic!("email pattern must compile: {e}"))
});

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    Bio,
}

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Please enter a valid email")]
    EmailFormatInvalid,

    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Password must contain at least 1 uppercase letter")]
    PasswordMissingUppercase,
    #[error("Password must contain at least 1 number")]
    PasswordMissingDigit,
    #[error("Passwords do not match")]
    PasswordsDoNotMatch,

    #[error("Name is required")]
    NameRequired,
    #[error("Name must be 100 characters or less")]
    NameTooLong,
    #[error("Name cannot be all numbers")]
    NameAllDigits,

    #[error("Bio must be 500 characters or less")]
    BioTooLong,
}

impl ValidationError {
    pub fn field(&self) -> Field {
        use ValidationError::*;
        match self {
            EmailRequired | EmailFormatInvalid => Field::Email,
            PasswordRequired | PasswordTooShort | PasswordMissingUppercase
            | PasswordMissingDigit => Field::Password,
            PasswordsDoNotMatch => Field::ConfirmPassword,
            NameRequired | NameTooLong | NameAllDigits => Field::Name,
            BioTooLong => Field::Bio,
        }
    }
}

/// All field errors of one form submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) failed validation", .0.len())]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.0.push(e);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// The error reported for `field`, if any.
    pub fn for_field(&self, field: Field) -> Option<ValidationError> {
        self.0.iter().copied().find(|e| e.field() == field)
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(ValidationError::EmailFormatInvalid);
    }
    Ok(())
}

/// Rules are checked in order and the first failure wins.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.trim().is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NameAllDigits);
    }
    Ok(())
}

/// Bio is optional; only its length is limited.
pub fn validate_bio(bio: &str) -> Result<(), ValidationError> {
    if bio.chars().count() > BIO_MAX_LENGTH {
        return Err(ValidationError::BioTooLong);
    }
    Ok(())
}

pub fn passwords_match(password: &str, confirm: &str) -> bool {
    password == confirm
}

/// Sign-in only requires a password to be present; strength rules are
/// enforced at sign-up.
pub fn validate_sign_in(email: &str, password: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.check(validate_email(email));
    if password.trim().is_empty() {
        errors.0.push(ValidationError::PasswordRequired);
    }
    errors
}

/// Checks name, email, password, then confirmation.
pub fn validate_sign_up(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.check(validate_name(name));
    errors.check(validate_email(email));
    errors.check(validate_password(password));
    if !passwords_match(password, confirm_password) {
        errors.0.push(ValidationError::PasswordsDoNotMatch);
    }
    errors
}

pub fn validate_password_reset(email: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.check(validate_email(email));
    errors
}

pub fn validate_profile_edit(name: &str, bio: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    errors.check(validate_name(name));
    errors.check(validate_bio(bio));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_requires_dotted_domain() {
        assert_eq!(validate_email("a@b"), Err(ValidationError::EmailFormatInvalid));
        assert_eq!(validate_email("a@b.co"), Ok(()));
        assert_eq!(validate_email("asha@test.edu"), Ok(()));
        assert_eq!(validate_email("a@b.c"), Err(ValidationError::EmailFormatInvalid));
        assert_eq!(validate_email("a@b.c0"), Err(ValidationError::EmailFormatInvalid));
        assert_eq!(validate_email("no-at-sign.com"), Err(ValidationError::EmailFormatInvalid));
    }

    #[test]
    fn test_blank_email_is_required_not_malformed() {
        assert_eq!(validate_email(""), Err(ValidationError::EmailRequired));
        assert_eq!(validate_email("   "), Err(ValidationError::EmailRequired));
    }

    #[test]
    fn test_password_rules_first_failure_wins() {
        assert_eq!(validate_password(""), Err(ValidationError::PasswordRequired));
        assert_eq!(validate_password("short1A"), Err(ValidationError::PasswordTooShort));
        assert_eq!(
            validate_password("longenough"),
            Err(ValidationError::PasswordMissingUppercase)
        );
        assert_eq!(
            validate_password("Longenough"),
            Err(ValidationError::PasswordMissingDigit)
        );
        assert_eq!(validate_password("Longenough1"), Ok(()));
        // Too short wins over missing uppercase and digit
        assert_eq!(validate_password("abc"), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn test_password_digit_must_be_ascii() {
        assert_eq!(
            validate_password("Password½"),
            Err(ValidationError::PasswordMissingDigit)
        );
        assert_eq!(
            validate_password("PasswordⅧ"),
            Err(ValidationError::PasswordMissingDigit)
        );
        assert_eq!(
            validate_password("Password٣"),
            Err(ValidationError::PasswordMissingDigit)
        );
        assert_eq!(validate_password("Password7"), Ok(()));
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(validate_name(" "), Err(ValidationError::NameRequired));
        assert_eq!(validate_name("12345"), Err(ValidationError::NameAllDigits));
        assert_eq!(validate_name(&"a".repeat(101)), Err(ValidationError::NameTooLong));
        assert_eq!(validate_name(&"a".repeat(100)), Ok(()));
        assert_eq!(validate_name("Agent 47"), Ok(()));
    }

    #[test]
    fn test_bio_blank_is_valid() {
        assert_eq!(validate_bio(""), Ok(()));
        assert_eq!(validate_bio(&"b".repeat(500)), Ok(()));
        assert_eq!(validate_bio(&"b".repeat(501)), Err(ValidationError::BioTooLong));
    }

    #[test]
    fn test_sign_up_reports_every_field_in_order() {
        let errors = validate_sign_up("", "bad", "short", "different");
        assert_eq!(
            errors.errors(),
            &[
                ValidationError::NameRequired,
                ValidationError::EmailFormatInvalid,
                ValidationError::PasswordTooShort,
                ValidationError::PasswordsDoNotMatch,
            ]
        );
        assert_eq!(
            errors.for_field(Field::ConfirmPassword),
            Some(ValidationError::PasswordsDoNotMatch)
        );
    }

    #[test]
    fn test_sign_in_does_not_apply_strength_rules() {
        assert!(validate_sign_in("asha@test.edu", "weak").is_empty());
        let errors = validate_sign_in("", "");
        assert_eq!(
            errors.errors(),
            &[ValidationError::EmailRequired, ValidationError::PasswordRequired]
        );
    }
}
