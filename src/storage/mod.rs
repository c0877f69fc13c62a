//! Storage layer for agol-cli
//!
//! Read-only TOML configuration. Nothing the flow produces is persisted.

use crate::error::StorageError;

pub mod config;

type Result<T> = std::result::Result<T, StorageError>;
