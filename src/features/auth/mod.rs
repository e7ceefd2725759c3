//! Sign-in, registration and password recovery.
//!
//! Login and signup store the returned session in the gateway's credential
//! store; logout only clears it. Both tokens stay inside the store and are
//! never returned to callers.

pub mod client;
pub mod types;

pub use self::client::{current_user, forgot_password, login, logout, reset_password, signup};

use regex::Regex;

/// Loose email shape check used before sending credentials.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email.trim()))
}

/// Minimum password length accepted by the API.
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[must_use]
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("ada@example.com"));
        assert!(valid_email(" ada@example.co.uk "));
        assert!(!valid_email("ada@example"));
        assert!(!valid_email("ada example.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn test_valid_password() {
        assert!(valid_password("secret"));
        assert!(!valid_password("short"));
    }
}
