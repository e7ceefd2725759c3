//! Client wrappers for the auth API endpoints.

use crate::{
    api::{ApiError, Gateway},
    features::auth::types::{
        AuthResponse, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
        User,
    },
    store::{self, Credentials},
};
use secrecy::SecretString;
use tracing::{info, instrument};

/// Signs in and stores the returned session.
///
/// # Errors
/// Returns the API error unchanged (a `401` here never triggers a refresh), or
/// `ApiError::Storage` if the session cannot be stored.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn login(gateway: &Gateway, request: &LoginRequest) -> Result<User, ApiError> {
    let response: AuthResponse = gateway.post_json("/auth/login", request).await?;
    let user = store_session(gateway, response)?;
    info!(user_id = %user.id, "signed in");
    Ok(user)
}

/// Creates an account and stores the returned session.
///
/// # Errors
/// Returns the API error unchanged, or `ApiError::Storage` if the session
/// cannot be stored.
#[instrument(skip_all, fields(email = %request.email))]
pub async fn signup(gateway: &Gateway, request: &SignupRequest) -> Result<User, ApiError> {
    let response: AuthResponse = gateway.post_json("/auth/signup", request).await?;
    let user = store_session(gateway, response)?;
    info!(user_id = %user.id, "account created");
    Ok(user)
}

/// Ends the local session. The API keeps no server-side session to revoke.
///
/// # Errors
/// Returns `ApiError::Storage` if the credential store cannot be cleared.
pub fn logout(gateway: &Gateway) -> Result<(), ApiError> {
    store::clear_credentials(gateway.store()).map_err(storage_error)?;
    info!("signed out");
    Ok(())
}

/// Asks the API to email a password reset link.
///
/// # Errors
/// Returns the API error unchanged.
#[instrument(skip_all)]
pub async fn forgot_password(
    gateway: &Gateway,
    request: &ForgotPasswordRequest,
) -> Result<(), ApiError> {
    gateway
        .post_json_empty("/auth/forgot-password", request)
        .await
}

/// Sets a new password using the token from the reset link.
///
/// # Errors
/// Returns the API error unchanged.
#[instrument(skip_all)]
pub async fn reset_password(
    gateway: &Gateway,
    request: &ResetPasswordRequest,
) -> Result<(), ApiError> {
    gateway.put_json_empty("/auth/reset-password", request).await
}

/// Returns the signed-in user from the credential store.
///
/// # Errors
/// Returns `ApiError::Storage` if the store cannot be read or is corrupt.
pub fn current_user(gateway: &Gateway) -> Result<Option<User>, ApiError> {
    store::current_user(gateway.store()).map_err(storage_error)
}

fn store_session(gateway: &Gateway, response: AuthResponse) -> Result<User, ApiError> {
    let credentials = Credentials {
        user: response.user,
        access_token: SecretString::from(response.access_token),
        refresh_token: SecretString::from(response.refresh_token),
    };

    store::save_credentials(gateway.store(), &credentials).map_err(storage_error)?;

    Ok(credentials.user)
}

fn storage_error(err: anyhow::Error) -> ApiError {
    ApiError::Storage(format!("{err:#}"))
}
