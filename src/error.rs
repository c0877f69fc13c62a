use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("input: {0}")]
    Cli(#[from] CliError),
    #[error("request: {0}")]
    Api(#[from] ApiError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("sign-in: {0}")]
    Auth(#[from] AuthError),
    #[error("pipeline: {0}")]
    State(#[from] StateError),
    #[error("config file: {0}")]
    Storage(#[from] StorageError),
    #[error("output: {0}")]
    Display(#[from] DisplayError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Failed to read input for {field}: {message}")]
    Input { field: String, message: String },
    #[error("Layer selection cancelled")]
    SelectionCancelled,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{endpoint} did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("{endpoint} rejected the session ({status}): {server_message}")]
    Unauthorized {
        status: u16,
        endpoint: String,
        server_message: String,
    },
    /// ArcGIS reports most failures as an error envelope inside a 200 response.
    #[error("ArcGIS error {code}: {message}")]
    Remote {
        code: i64,
        endpoint: String,
        message: String,
        details: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid authentication method selected.")]
    InvalidChoice { input: String },
    #[error("Login failed: {message}")]
    LoginFailed { message: String },
    #[error("Authorization code exchange failed: {message}")]
    CodeExchangeFailed { message: String },
}

/// A pipeline phase was invoked before the phase it depends on completed.
#[derive(Error, Debug, PartialEq)]
pub enum StateError {
    #[error("no session; authenticate first")]
    NoSession,
    #[error("no item; authenticate first")]
    NoItem,
    #[error("no layer selected; use the selector first")]
    NoLayer,
    #[error("item {item_id} has no layers to select")]
    NoLayers { item_id: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("cannot read {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid TOML in {message}")]
    ConfigParseError { message: String },
}

#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("could not format rows: {0}")]
    TableFormat(String),
    #[error("terminal: {0}")]
    TerminalOutput(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Profile '{name}' not found")]
    ProfileNotFound { name: String },
    #[error("profile field '{field}' = '{value}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Unauthorized { .. } => ErrorSeverity::High,
                ApiError::Timeout { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Config(_) => ErrorSeverity::High,
            AppError::Auth(_) => ErrorSeverity::High,
            AppError::State(_) => ErrorSeverity::Critical,
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Display(_) => ErrorSeverity::Low,
        }
    }

    /// Message shown to the user; precondition and auth errors read best without the prefix
    pub fn display_friendly(&self) -> String {
        match self {
            AppError::Auth(e) => e.to_string(),
            AppError::State(e) => e.to_string(),
            AppError::Api(ApiError::Remote { message, .. }) => message.clone(),
            _ => format!("{}", self),
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Unauthorized { .. }) => {
                Some("Check your username/password or client ID and try again".to_string())
            }
            AppError::Api(ApiError::Remote { code: 400, .. }) => Some(
                "Verify the item ID and that your account can access the item".to_string(),
            ),
            AppError::Api(ApiError::Http { status: 0, .. }) => {
                Some("Check the organization URL and your network connection".to_string())
            }
            AppError::Api(ApiError::Timeout { .. }) => {
                Some("Check your internet connection and the organization URL".to_string())
            }
            AppError::Auth(AuthError::InvalidChoice { .. }) => {
                Some("Enter 1 for Username/Password or 2 for Client ID".to_string())
            }
            AppError::State(StateError::NoLayers { .. }) => {
                Some("Use the item ID of a hosted feature layer or feature service".to_string())
            }
            AppError::Config(ConfigError::ProfileNotFound { .. }) => {
                Some("Add the profile to config.toml or omit --profile".to_string())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_choice_message() {
        let err = AuthError::InvalidChoice {
            input: "3".to_string(),
        };
        assert_eq!(format!("{}", err), "Invalid authentication method selected.");

        let app_err = AppError::from(err);
        assert_eq!(app_err.severity(), ErrorSeverity::High);
        assert_eq!(
            app_err.display_friendly(),
            "Invalid authentication method selected."
        );
        assert!(app_err.troubleshooting_hint().is_some());
    }

    #[test]
    fn test_state_error_messages() {
        assert_eq!(
            format!("{}", StateError::NoItem),
            "no item; authenticate first"
        );
        assert_eq!(
            format!("{}", StateError::NoLayer),
            "no layer selected; use the selector first"
        );
        assert_eq!(
            format!(
                "{}",
                StateError::NoLayers {
                    item_id: "abc123".to_string()
                }
            ),
            "item abc123 has no layers to select"
        );
    }

    #[test]
    fn test_state_errors_are_critical() {
        let app_err = AppError::State(StateError::NoLayer);
        assert_eq!(app_err.severity(), ErrorSeverity::Critical);
        assert_eq!(
            format!("{}", app_err),
            "pipeline: no layer selected; use the selector first"
        );
    }

    #[test]
    fn test_api_error_display() {
        let api_err = ApiError::Remote {
            code: 400,
            endpoint: "/content/items/abc".to_string(),
            message: "Item does not exist or is inaccessible.".to_string(),
            details: vec![],
        };
        assert_eq!(
            format!("{}", api_err),
            "ArcGIS error 400: Item does not exist or is inaccessible."
        );

        let app_err = AppError::Api(api_err);
        assert_eq!(app_err.severity(), ErrorSeverity::Medium);
        assert!(app_err.troubleshooting_hint().is_some());

        let app_err = AppError::Api(ApiError::Http {
            status: 502,
            endpoint: "endpoint".to_string(),
            message: "bad gateway".to_string(),
        });
        assert_eq!(app_err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_unauthorized_names_endpoint() {
        let app_err = AppError::Api(ApiError::Unauthorized {
            status: 498,
            endpoint: "/content/items/abc".to_string(),
            server_message: "Invalid token.".to_string(),
        });
        assert_eq!(
            app_err.display_friendly(),
            "request: /content/items/abc rejected the session (498): Invalid token."
        );
        assert_eq!(app_err.severity(), ErrorSeverity::High);
    }
}
