use thiserror::Error;

use super::validation::FormError;

const EMAIL_NOT_CONFIRMED: &str = "Email not confirmed";
const EMAIL_RATE_LIMITED: &str = "email rate limit exceeded";
const INVALID_CREDENTIALS: &str = "Invalid login credentials";

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("{0}")]
    Form(#[from] FormError),

    /// Sign-in refused until the address is confirmed; the caller may offer
    /// to resend the confirmation mail
    #[error("Your email has not been confirmed. Would you like to resend the confirmation email?")]
    EmailNotConfirmed,

    #[error("Please try again later or use a different email.")]
    RateLimited,

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("{operation} failed: HTTP {status}: {message}")]
    Service {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("{operation} failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read avatar file: {0}")]
    Io(#[from] std::io::Error),
}

impl IdentityError {
    /// Maps an error body from the auth service onto the cases the
    /// screens treat specially
    pub fn classify(operation: &'static str, status: u16, message: String) -> Self {
        if message.contains(EMAIL_NOT_CONFIRMED) {
            IdentityError::EmailNotConfirmed
        } else if message.contains(EMAIL_RATE_LIMITED) {
            IdentityError::RateLimited
        } else if message.contains(INVALID_CREDENTIALS) {
            IdentityError::InvalidCredentials(message)
        } else {
            IdentityError::Service {
                operation,
                status,
                message,
            }
        }
    }

    /// Alert title shown above the message
    pub fn title(&self) -> &'static str {
        match self {
            IdentityError::Form(form) => form.title(),
            IdentityError::EmailNotConfirmed => "Email not confirmed",
            IdentityError::RateLimited => "Too many attempts.",
            IdentityError::InvalidCredentials(_) => "Login error",
            IdentityError::NotSignedIn => "Not signed in",
            IdentityError::Service { .. } | IdentityError::Transport { .. } | IdentityError::Decode { .. } => "Error",
            IdentityError::Io(_) => "Error",
        }
    }

    pub fn offers_resend(&self) -> bool {
        matches!(self, IdentityError::EmailNotConfirmed)
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
