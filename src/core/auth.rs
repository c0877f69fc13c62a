use crate::core::prompt::Prompter;
use crate::error::{AppError, AuthError, CliError};
use std::fmt;

pub const USERNAME_PROMPT: &str = "Enter your AGOL username";
pub const PASSWORD_PROMPT: &str = "Enter your AGOL password";
pub const CLIENT_ID_PROMPT: &str = "Enter your client ID";
pub const AUTH_CODE_PROMPT: &str = "Paste the authorization code";

/// Authentication method entered at the method prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChoice {
    Password,
    ClientId,
}

impl AuthChoice {
    pub fn parse(input: &str) -> Result<Self, AuthError> {
        match input.trim() {
            "1" => Ok(AuthChoice::Password),
            "2" => Ok(AuthChoice::ClientId),
            other => Err(AuthError::InvalidChoice {
                input: other.to_string(),
            }),
        }
    }
}

/// What the connection service needs to establish a session
#[derive(Clone, PartialEq)]
pub enum Credentials {
    Password { username: String, password: String },
    AuthorizationCode { client_id: String, code: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Credentials::AuthorizationCode { client_id, .. } => f
                .debug_struct("AuthorizationCode")
                .field("client_id", client_id)
                .field("code", &"<redacted>")
                .finish(),
        }
    }
}

/// Credential payload collected from the prompts, before any network call
#[derive(Clone, PartialEq)]
pub enum LoginInput {
    Password { username: String, password: String },
    ClientId { client_id: String },
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginInput::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            LoginInput::ClientId { client_id } => f
                .debug_struct("ClientId")
                .field("client_id", client_id)
                .finish(),
        }
    }
}

impl LoginInput {
    /// Collect the credential prompts for `choice`.
    /// Defaults come from the active config profile.
    pub fn collect(
        choice: AuthChoice,
        prompter: &mut dyn Prompter,
        default_username: Option<&str>,
        default_client_id: Option<&str>,
    ) -> Result<Self, AppError> {
        match choice {
            AuthChoice::Password => {
                let username = prompter.prompt(USERNAME_PROMPT, default_username)?;
                let password = prompter.prompt_secret(PASSWORD_PROMPT)?;
                // The secret is sent exactly as typed
                Ok(LoginInput::Password {
                    username: username.trim().to_string(),
                    password,
                })
            }
            AuthChoice::ClientId => {
                let client_id = prompter.prompt(CLIENT_ID_PROMPT, default_client_id)?;
                Ok(LoginInput::ClientId {
                    client_id: client_id.trim().to_string(),
                })
            }
        }
    }

    /// Validate that credentials are not empty
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            LoginInput::Password { username, password } => {
                if username.is_empty() {
                    return Err(AppError::Cli(CliError::InvalidArguments(
                        "Username cannot be empty".to_string(),
                    )));
                }
                if password.is_empty() {
                    return Err(AppError::Cli(CliError::InvalidArguments(
                        "Password cannot be empty".to_string(),
                    )));
                }
            }
            LoginInput::ClientId { client_id } => {
                if client_id.is_empty() {
                    return Err(AppError::Cli(CliError::InvalidArguments(
                        "Client ID cannot be empty".to_string(),
                    )));
                }
            }
        }
        Ok(())
    }
}
