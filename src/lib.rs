pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → API)
pub mod cli; // Interactive prompts, layer picker and dispatch
pub mod core; // Authenticate → select layer → load table
pub mod storage; // Configuration file

/// Support modules (used across layers)
pub mod api; // ArcGIS REST client
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
