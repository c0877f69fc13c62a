use crate::error::{ApiError, DisplayError};
use std::io;

/// Transport failures carry status 0; a bad org URL usually shows up here
pub fn convert_request_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    let message = if error.is_connect() {
        format!("could not connect ({})", error)
    } else if error.is_decode() || error.is_body() {
        format!("could not read response body ({})", error)
    } else {
        error.to_string()
    };

    ApiError::Http {
        status: error.status().map(|s| s.as_u16()).unwrap_or(0),
        endpoint: endpoint.to_string(),
        message,
    }
}

/// Convert IO errors to DisplayError for terminal operations
pub fn convert_io_to_display_error(error: io::Error, operation: &str) -> DisplayError {
    DisplayError::TerminalOutput(format!("{}: {}", operation, error))
}

/// Helper macro for display errors
#[macro_export]
macro_rules! map_display_error {
    ($result:expr, $operation:expr) => {
        $result
            .map_err(|e| $crate::utils::error_helpers::convert_io_to_display_error(e, $operation))
    };
}
