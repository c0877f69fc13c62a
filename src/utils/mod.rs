//! Utils module - Shared utilities and helpers
//!
//! This module provides utility functions and helpers that are used across
//! multiple layers of the application architecture.

/// Conversions from library errors into application errors
pub mod error_helpers;

/// Tracing subscriber setup
pub mod logging;

/// Unicode-aware text truncation
pub mod text;

/// Input validation and sanitization utilities
pub mod validation;
