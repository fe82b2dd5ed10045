//! Field rules for a signup submission.
//!
//! Each rule is checked on its own; a submission gets one error per failed
//! rule and nothing short-circuits.

use crate::error::FieldError;
use crate::signup::form::SignupForm;

pub const NAME_MIN_CHARS: usize = 4;
pub const NAME_MAX_CHARS: usize = 20;

pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_CONFIRM_PASSWORD: &str = "confirm_password";
pub const FIELD_RECOVERY: &str = "recovery";
pub const FIELD_CAPTCHA: &str = "captcha";

pub const MSG_CAPTCHA: &str = "Captcha not passed";
pub const MSG_EMAIL_BLACKLISTED: &str = "Email domain blacklisted (intermittent)";

/// Run every field rule against the form.
pub fn validate_fields(form: &SignupForm) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let name_len = form.name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
        errors.push(FieldError::new(FIELD_NAME, "Name must be 4-20 chars"));
    }

    if !form.email.contains('@') {
        errors.push(FieldError::new(FIELD_EMAIL, "Email must contain @"));
    }

    if form.password == form.name || form.password == form.email {
        errors.push(FieldError::new(
            FIELD_PASSWORD,
            "Password must differ from name/email",
        ));
    }

    let has_letter = form.password.chars().any(char::is_alphabetic);
    let has_digit = form.password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        errors.push(FieldError::new(
            FIELD_PASSWORD,
            "Password must contain letters and numbers",
        ));
    }

    if form.password != form.confirm_password {
        errors.push(FieldError::new(FIELD_CONFIRM_PASSWORD, "Passwords do not match"));
    }

    if !form.recovery_present() {
        errors.push(FieldError::new(FIELD_RECOVERY, "Recovery phrase required"));
    }

    errors
}
