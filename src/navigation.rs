//! Hand-off to the unauthenticated entry point.
//!
//! When a session cannot be recovered the gateway clears the credential store
//! and asks its [`Navigator`] to go to [`ENTRY_ROUTE`]. What "going there"
//! means is up to the front end: the CLI tells the user to sign in again.

/// Route of the sign-in entry point.
pub const ENTRY_ROUTE: &str = "/";

pub trait Navigator: Send + Sync {
    /// Leaves the current view for `route`.
    fn navigate(&self, route: &str);
}

/// Ignores navigation requests; for embedders that only inspect errors.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: &str) {}
}
