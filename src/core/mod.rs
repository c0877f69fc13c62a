//! Pipeline phases and the types they exchange

pub mod auth;
pub mod pipeline;
pub mod prompt;
pub mod services;
