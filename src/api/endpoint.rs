//! Path and base-URL helpers shared by the gateway and the feature clients.

use super::ApiError;
use url::Url;

/// Path fragments of calls that establish a session and must never refresh one.
const AUTH_ENDPOINTS: [&str; 3] = ["/auth/login", "/auth/signup", "/auth/register"];

/// Checks that the configured base is an absolute http(s) URL with a host.
pub(crate) fn validate_base_url(base_url: &str) -> Result<(), ApiError> {
    let url = Url::parse(base_url.trim())
        .map_err(|err| ApiError::Config(format!("Invalid API base URL {base_url}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ApiError::Config(format!(
                "Invalid API base URL {base_url}: unsupported scheme {scheme}"
            )))
        }
    }

    if url.host().is_none() {
        return Err(ApiError::Config(format!(
            "Invalid API base URL {base_url}: no host specified"
        )));
    }

    Ok(())
}

/// Builds a URL from an explicit base URL and the provided path.
pub(crate) fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// True for login, signup and register calls.
#[must_use]
pub fn is_auth_endpoint(path: &str) -> bool {
    AUTH_ENDPOINTS
        .iter()
        .any(|endpoint| path.contains(endpoint))
}

/// Joins a collection path and a record identifier, rejecting identifiers that
/// would escape the collection.
///
/// # Errors
/// Returns `ApiError::Serialization` when the identifier is empty or contains
/// characters other than ASCII alphanumerics, `-` and `_`.
pub fn resource_path(collection: &str, id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if !valid {
        return Err(ApiError::Serialization(format!("Invalid identifier: {id:?}")));
    }

    Ok(format!("{}/{id}", collection.trim_end_matches('/')))
}
