//! Client-side checks run before any request is sent

use thiserror::Error;

use super::types::SignUpRequest;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a username.")]
    UsernameRequired,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter a phone number.")]
    PhoneRequired,

    /// Short password on the login form
    #[error("Password should be at least 6 characters long.")]
    InvalidPassword,

    /// Short password on the registration form
    #[error("Password should be at least 6 characters long.")]
    WeakPassword,

    #[error("Please ensure both passwords are identical.")]
    PasswordMismatch,
}

impl FormError {
    pub fn title(&self) -> &'static str {
        match self {
            FormError::UsernameRequired => "Username is required",
            FormError::InvalidEmail => "Invalid email",
            FormError::PhoneRequired => "Phone number is required",
            FormError::InvalidPassword => "Invalid password",
            FormError::WeakPassword => "Weak password",
            FormError::PasswordMismatch => "Passwords do not match",
        }
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FormError> {
    if !is_valid_email(email) {
        return Err(FormError::InvalidEmail);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::InvalidPassword);
    }
    Ok(())
}

/// Checks fields in form order and reports the first failure
pub fn validate_registration(form: &SignUpRequest, confirm_password: &str) -> Result<(), FormError> {
    if form.username.is_empty() {
        return Err(FormError::UsernameRequired);
    }
    if !is_valid_email(&form.email) {
        return Err(FormError::InvalidEmail);
    }
    if form.phone.is_empty() {
        return Err(FormError::PhoneRequired);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(FormError::WeakPassword);
    }
    if form.password != confirm_password {
        return Err(FormError::PasswordMismatch);
    }
    Ok(())
}

/// `local@domain.tld`, no whitespace, one `@`, dotted domain with
/// non-empty labels
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
