use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Error envelope returned (usually with HTTP 200) by both sharing and service endpoints
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: RemoteError,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RemoteError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
    /// OAuth endpoints describe failures here instead of `message`
    #[serde(default)]
    pub error_description: Option<String>,
}

impl RemoteError {
    pub fn best_message(&self) -> String {
        let base = if self.message.is_empty() {
            self.error_description.clone().unwrap_or_default()
        } else {
            self.message.clone()
        };

        if self.details.is_empty() {
            base
        } else {
            format!("{} ({})", base, self.details.join("; "))
        }
    }
}

// Authentication models
#[derive(Debug, Serialize)]
pub struct GenerateTokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub referer: &'a str,
    pub client: &'a str,
    /// Minutes
    pub expiration: u32,
    pub f: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    /// Epoch milliseconds
    pub expires: i64,
}

#[derive(Debug, Serialize)]
pub struct AuthorizationCodeRequest<'a> {
    pub client_id: &'a str,
    pub grant_type: &'a str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
    pub f: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    /// Seconds
    pub expires_in: i64,
    pub username: Option<String>,
}

// Content models
#[derive(Debug, Deserialize, Clone)]
pub struct ItemInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    pub url: Option<String>,
    pub owner: Option<String>,
}

/// Service root; its `tables` are not selectable and are not read
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceInfo {
    #[serde(default)]
    pub layers: Vec<LayerInfo>,
}

/// Entry of a service's `layers` array, or the body of a single layer endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct LayerInfo {
    pub id: i64,
    pub name: String,
}

// Query models
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QueryResponse {
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(rename = "exceededTransferLimit", default)]
    pub exceeded_transfer_limit: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Feature {
    #[serde(default)]
    pub attributes: IndexMap<String, Value>,
}
