use crate::AppError;
use crate::api::models::QueryResponse;
use crate::core::auth::Credentials;
use crate::core::services::types::{Item, Layer, Session};
use async_trait::async_trait;

/// The remote collaborators: connection, content lookup and layer query
#[async_trait]
pub trait Portal: Send + Sync {
    /// URL the user visits to obtain an authorization code for `client_id`
    fn authorize_url(&self, org_url: &str, client_id: &str) -> String;

    /// Establish a session; credential rejection surfaces as `AppError::Auth`
    async fn connect(&self, org_url: &str, credentials: &Credentials) -> Result<Session, AppError>;

    /// Resolve an item id to an item with its layers
    async fn get_item(&self, session: &Session, item_id: &str) -> Result<Item, AppError>;

    /// Every record and every field of `layer`
    async fn query_all(&self, session: &Session, layer: &Layer)
    -> Result<QueryResponse, AppError>;
}
