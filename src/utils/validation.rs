//! Input validation and sanitization utilities
//!
//! This module provides utilities for validating user input
//! before it reaches the network.

use crate::error::CliError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    // Basic URL validation - must start with http:// or https://
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Validate an item id before it is interpolated into a request path
pub fn validate_item_id(item_id: &str) -> crate::Result<()> {
    if item_id.is_empty() {
        return Err(CliError::InvalidArguments("Item ID cannot be empty".to_string()).into());
    }

    if !item_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CliError::InvalidArguments(format!(
            "Invalid item ID '{}': only letters and digits are allowed",
            item_id
        ))
        .into());
    }

    Ok(())
}
