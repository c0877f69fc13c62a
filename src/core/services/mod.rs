pub mod auth_service;
pub mod layer_service;
pub mod query_service;
pub mod traits;
pub mod types;
