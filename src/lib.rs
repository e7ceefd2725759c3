//! # Quizdesk (quiz and announcement dashboard client)
//!
//! `quizdesk` talks to the quiz/announcement dashboard API on behalf of a
//! signed-in user. Every call goes through the [`api::Gateway`], which owns the
//! session protocol:
//!
//! ## Session Refresh
//!
//! 1. **Attach:** the stored access token is sent as `Authorization: Bearer`.
//! 2. **Detect:** a `401` on a call that has not been retried starts (or joins)
//!    a refresh. Login, signup and register calls never refresh.
//! 3. **Refresh:** exactly one `POST /auth/refresh-token` is in flight at a time;
//!    every caller that hits `401` meanwhile waits for the same outcome.
//! 4. **Replay:** waiting calls and the original call are re-issued once with the
//!    new token. A second `401` is returned to the caller as-is.
//! 5. **Terminate:** a missing refresh token or a failed refresh clears the
//!    credential store and sends the user back to the sign-in entry route.
//!
//! Credentials live in a [`store::CredentialStore`]; the CLI persists them in a
//! JSON file so sessions survive between invocations.

pub mod api;
pub mod cli;
pub mod features;
pub mod navigation;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// API base used when neither `--api-url` nor `QUIZDESK_API_URL` is set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
