use crate::{
    api::Gateway,
    cli::actions::print_json,
    features::auth::{
        self,
        types::{ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest},
    },
};
use anyhow::{bail, Result};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub enum AuthAction {
    Login {
        email: String,
        password: SecretString,
    },
    Signup {
        name: String,
        email: String,
        password: SecretString,
    },
    Logout,
    WhoAmI,
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: SecretString,
        password: SecretString,
    },
}

/// # Errors
/// Returns an error if the API call or the credential store fails.
pub async fn execute(action: AuthAction, gateway: &Gateway) -> Result<()> {
    match action {
        AuthAction::Login { email, password } => {
            let request = LoginRequest {
                email,
                password: password.expose_secret().to_string(),
            };
            let user = auth::login(gateway, &request).await?;
            print_json(&user)?;
        }
        AuthAction::Signup {
            name,
            email,
            password,
        } => {
            let request = SignupRequest {
                name,
                email,
                password: password.expose_secret().to_string(),
            };
            let user = auth::signup(gateway, &request).await?;
            print_json(&user)?;
        }
        AuthAction::Logout => {
            auth::logout(gateway)?;
            println!("Signed out.");
        }
        AuthAction::WhoAmI => match auth::current_user(gateway)? {
            Some(user) => print_json(&user)?,
            None => bail!("not signed in"),
        },
        AuthAction::ForgotPassword { email } => {
            auth::forgot_password(gateway, &ForgotPasswordRequest { email }).await?;
            println!("If the address is registered, a reset link is on its way.");
        }
        AuthAction::ResetPassword { token, password } => {
            let request = ResetPasswordRequest {
                new_password: password.expose_secret().to_string(),
                reset_token: token.expose_secret().to_string(),
            };
            auth::reset_password(gateway, &request).await?;
            println!("Password updated. Sign in with the new password.");
        }
    }

    Ok(())
}
