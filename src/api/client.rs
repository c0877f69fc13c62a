use crate::AppError;
use crate::api::models::{
    AuthorizationCodeRequest, ErrorEnvelope, GenerateTokenRequest, ItemInfo, LayerInfo,
    OAuthTokenResponse, QueryResponse, ServiceInfo, TokenResponse,
};
use crate::core::auth::Credentials;
use crate::core::services::traits::Portal;
use crate::core::services::types::{AuthMethod, Item, Layer, Session};
use crate::error::{ApiError, AuthError};
use crate::utils::error_helpers::convert_request_error;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::REFERER;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("agol-cli/", env!("CARGO_PKG_VERSION"));
const TOKEN_EXPIRATION_MINUTES: u32 = 60;
const OOB_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// ArcGIS sharing + feature service REST client
#[derive(Debug, Clone)]
pub struct ArcGisClient {
    client: Client,
    timeout_secs: u64,
}

impl ArcGisClient {
    // Create client with default settings
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Http {
                status: 0,
                endpoint: "client_init".to_string(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(ArcGisClient {
            client,
            timeout_secs,
        })
    }

    pub fn sharing_url(org_url: &str, path: &str) -> String {
        format!("{}/sharing/rest{}", org_url.trim_end_matches('/'), path)
    }

    /// Authenticated requests repeat the org URL as `Referer`; password
    /// tokens are issued with `client=referer` and are bound to it.
    pub fn build_request(
        &self,
        method: Method,
        url: &str,
        session: Option<&Session>,
    ) -> RequestBuilder {
        let mut request = self.client.request(method, url).query(&[("f", "json")]);

        if let Some(session) = session {
            request = request
                .header("X-Esri-Authorization", format!("Bearer {}", session.token))
                .header(REFERER, session.org_url.as_str());
        }

        request
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ApiError> {
        debug!(endpoint, "sending request");
        request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    timeout_secs: self.timeout_secs,
                    endpoint: endpoint.to_string(),
                }
            } else {
                convert_request_error(e, endpoint)
            }
        })
    }

    pub async fn handle_response<T>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| convert_request_error(e, endpoint))?;
            Self::decode_body(&body, status.as_u16(), endpoint)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            match status.as_u16() {
                401 | 403 => Err(ApiError::Unauthorized {
                    status: status.as_u16(),
                    endpoint: endpoint.to_string(),
                    server_message: error_text,
                }),
                408 | 504 => Err(ApiError::Timeout {
                    timeout_secs: self.timeout_secs,
                    endpoint: endpoint.to_string(),
                }),
                _ => Err(ApiError::Http {
                    status: status.as_u16(),
                    endpoint: endpoint.to_string(),
                    message: error_text,
                }),
            }
        }
    }

    /// Decode a 2xx body, detecting the `{"error": {...}}` envelope first
    pub fn decode_body<T>(body: &str, status: u16, endpoint: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
            let error = envelope.error;
            return Err(match error.code {
                498 | 499 => ApiError::Unauthorized {
                    status: error.code as u16,
                    endpoint: endpoint.to_string(),
                    server_message: error.best_message(),
                },
                _ => ApiError::Remote {
                    code: error.code,
                    endpoint: endpoint.to_string(),
                    message: error.best_message(),
                    details: error.details,
                },
            });
        }

        serde_json::from_str::<T>(body).map_err(|e| ApiError::Http {
            status,
            endpoint: endpoint.to_string(),
            message: format!("Failed to parse response: {}", e),
        })
    }

    pub async fn generate_token(
        &self,
        org_url: &str,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, ApiError> {
        let endpoint = "/generateToken";
        let url = Self::sharing_url(org_url, endpoint);
        let form = GenerateTokenRequest {
            username,
            password,
            referer: org_url,
            client: "referer",
            expiration: TOKEN_EXPIRATION_MINUTES,
            f: "json",
        };

        let request = self.build_request(Method::POST, &url, None).form(&form);
        let response = self.send(request, endpoint).await?;
        self.handle_response(response, endpoint).await
    }

    pub async fn exchange_authorization_code(
        &self,
        org_url: &str,
        client_id: &str,
        code: &str,
    ) -> Result<OAuthTokenResponse, ApiError> {
        let endpoint = "/oauth2/token";
        let url = Self::sharing_url(org_url, endpoint);
        let form = AuthorizationCodeRequest {
            client_id,
            grant_type: "authorization_code",
            code,
            redirect_uri: OOB_REDIRECT_URI,
            f: "json",
        };

        let request = self.build_request(Method::POST, &url, None).form(&form);
        let response = self.send(request, endpoint).await?;
        self.handle_response(response, endpoint).await
    }

    pub async fn get_item_info(
        &self,
        session: &Session,
        item_id: &str,
    ) -> Result<ItemInfo, ApiError> {
        let endpoint = format!("/content/items/{}", item_id);
        let url = Self::sharing_url(&session.org_url, &endpoint);

        let request = self.build_request(Method::GET, &url, Some(session));
        let response = self.send(request, &endpoint).await?;
        self.handle_response(response, &endpoint).await
    }

    pub async fn get_service(
        &self,
        session: &Session,
        service_url: &str,
    ) -> Result<ServiceInfo, ApiError> {
        let request = self.build_request(Method::GET, service_url, Some(session));
        let response = self.send(request, service_url).await?;
        self.handle_response(response, service_url).await
    }

    pub async fn get_layer_info(
        &self,
        session: &Session,
        layer_url: &str,
    ) -> Result<LayerInfo, ApiError> {
        let request = self.build_request(Method::GET, layer_url, Some(session));
        let response = self.send(request, layer_url).await?;
        self.handle_response(response, layer_url).await
    }

    /// `where=1=1`, every field, no geometry
    pub async fn query_layer(
        &self,
        session: &Session,
        layer_url: &str,
    ) -> Result<QueryResponse, ApiError> {
        let endpoint = format!("{}/query", layer_url.trim_end_matches('/'));

        let request = self
            .build_request(Method::GET, &endpoint, Some(session))
            .query(&[
                ("where", "1=1"),
                ("outFields", "*"),
                ("returnGeometry", "false"),
            ]);
        let response = self.send(request, &endpoint).await?;
        self.handle_response(response, &endpoint).await
    }

    /// Layers behind an item url; a url ending in a layer id is a single layer
    async fn resolve_layers(
        &self,
        session: &Session,
        item_url: &str,
    ) -> Result<Vec<Layer>, ApiError> {
        let service_url = item_url.trim_end_matches('/');

        if is_layer_url(service_url) {
            let info = self.get_layer_info(session, service_url).await?;
            return Ok(vec![Layer {
                id: info.id,
                name: info.name,
                url: service_url.to_string(),
            }]);
        }

        let service = self.get_service(session, service_url).await?;
        Ok(service
            .layers
            .into_iter()
            .map(|info| Layer {
                url: format!("{}/{}", service_url, info.id),
                id: info.id,
                name: info.name,
            })
            .collect())
    }
}

fn is_layer_url(url: &str) -> bool {
    url.rsplit('/')
        .next()
        .is_some_and(|segment| !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()))
}

fn expires_from_epoch_ms(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
}

/// Out-of-range lifetimes are treated as unknown
fn expires_in_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    TimeDelta::try_seconds(seconds).and_then(|delta| Utc::now().checked_add_signed(delta))
}

/// Credential rejections become `AuthError`; transport failures stay `ApiError`
fn login_error(error: ApiError) -> AppError {
    match error {
        ApiError::Remote { message, .. } => AuthError::LoginFailed { message }.into(),
        ApiError::Unauthorized { server_message, .. } => AuthError::LoginFailed {
            message: server_message,
        }
        .into(),
        other => other.into(),
    }
}

#[async_trait]
impl Portal for ArcGisClient {
    fn authorize_url(&self, org_url: &str, client_id: &str) -> String {
        format!(
            "{}?client_id={}&response_type=code&expiration=-1&redirect_uri={}",
            Self::sharing_url(org_url, "/oauth2/authorize"),
            client_id,
            OOB_REDIRECT_URI
        )
    }

    async fn connect(&self, org_url: &str, credentials: &Credentials) -> Result<Session, AppError> {
        match credentials {
            Credentials::Password { username, password } => {
                let token = self
                    .generate_token(org_url, username, password)
                    .await
                    .map_err(login_error)?;
                Ok(Session {
                    org_url: org_url.to_string(),
                    token: token.token,
                    method: AuthMethod::Password,
                    username: Some(username.clone()),
                    expires_at: expires_from_epoch_ms(token.expires),
                })
            }
            Credentials::AuthorizationCode { client_id, code } => {
                let token = self
                    .exchange_authorization_code(org_url, client_id, code)
                    .await
                    .map_err(|e| match e {
                        ApiError::Remote { message, .. } => {
                            AuthError::CodeExchangeFailed { message }.into()
                        }
                        other => AppError::from(other),
                    })?;
                Ok(Session {
                    org_url: org_url.to_string(),
                    token: token.access_token,
                    method: AuthMethod::ClientId,
                    username: token.username,
                    expires_at: expires_in_seconds(token.expires_in),
                })
            }
        }
    }

    async fn get_item(&self, session: &Session, item_id: &str) -> Result<Item, AppError> {
        let info = self.get_item_info(session, item_id).await?;

        let layers = match info.url.as_deref() {
            Some(url) if !url.is_empty() => self.resolve_layers(session, url).await?,
            _ => Vec::new(),
        };

        Ok(Item {
            id: info.id,
            title: info.title,
            item_type: info.item_type,
            owner: info.owner,
            layers,
        })
    }

    async fn query_all(
        &self,
        session: &Session,
        layer: &Layer,
    ) -> Result<QueryResponse, AppError> {
        Ok(self.query_layer(session, &layer.url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            org_url: "https://acme.maps.arcgis.com".to_string(),
            token: "tok".to_string(),
            method: AuthMethod::Password,
            username: None,
            expires_at: None,
        }
    }

    #[test]
    fn test_client_creation() {
        let client = ArcGisClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_sharing_url_trims_slash() {
        assert_eq!(
            ArcGisClient::sharing_url("https://acme.maps.arcgis.com/", "/generateToken"),
            "https://acme.maps.arcgis.com/sharing/rest/generateToken"
        );
    }

    #[test]
    fn test_build_request_with_token() {
        let client = ArcGisClient::new().expect("client creation failed");
        let session = session();
        let request = client.build_request(
            Method::GET,
            "https://acme.maps.arcgis.com/sharing/rest/content/items/abc",
            Some(&session),
        );
        let built = request.build().expect("Failed to build request");

        assert_eq!(
            built.url().as_str(),
            "https://acme.maps.arcgis.com/sharing/rest/content/items/abc?f=json"
        );
        assert_eq!(
            built
                .headers()
                .get("X-Esri-Authorization")
                .unwrap()
                .to_str()
                .unwrap(),
            "Bearer tok"
        );
        assert_eq!(
            built.headers().get(REFERER).unwrap().to_str().unwrap(),
            "https://acme.maps.arcgis.com"
        );
    }

    #[test]
    fn test_build_request_without_token() {
        let client = ArcGisClient::new().expect("client creation failed");
        let built = client
            .build_request(Method::POST, "https://acme.test/sharing/rest/generateToken", None)
            .build()
            .expect("Failed to build request");
        assert_eq!(built.method(), Method::POST);
        assert!(built.headers().get("X-Esri-Authorization").is_none());
        assert!(built.headers().get(REFERER).is_none());
    }

    #[test]
    fn test_expires_in_seconds() {
        let expires = expires_in_seconds(3600).unwrap();
        assert!(expires > Utc::now());
        assert!(expires_in_seconds(i64::MAX).is_none());
        assert!(expires_in_seconds(i64::MIN).is_none());
    }

    #[test]
    fn test_decode_body_detects_error_envelope() {
        let body = r#"{"error":{"code":400,"message":"Item does not exist or is inaccessible.","details":[]}}"#;
        let result = ArcGisClient::decode_body::<ItemInfo>(body, 200, "/content/items/x");
        assert!(matches!(result, Err(ApiError::Remote { code: 400, .. })));

        let body = r#"{"error":{"code":498,"message":"Invalid token.","details":[]}}"#;
        let result = ArcGisClient::decode_body::<ItemInfo>(body, 200, "/content/items/x");
        assert!(matches!(
            result,
            Err(ApiError::Unauthorized { status: 498, .. })
        ));
    }

    #[test]
    fn test_decode_body_parse_failure() {
        let result = ArcGisClient::decode_body::<ItemInfo>("<html>", 200, "/x");
        assert!(matches!(result, Err(ApiError::Http { status: 200, .. })));
    }

    #[test]
    fn test_is_layer_url() {
        assert!(is_layer_url("https://s.test/arcgis/rest/services/A/FeatureServer/0"));
        assert!(is_layer_url("https://s.test/arcgis/rest/services/A/FeatureServer/12"));
        assert!(!is_layer_url("https://s.test/arcgis/rest/services/A/FeatureServer"));
        assert!(!is_layer_url(""));
    }

    #[test]
    fn test_authorize_url() {
        let client = ArcGisClient::new().expect("client creation failed");
        let url = client.authorize_url("https://acme.maps.arcgis.com", "myApp");
        assert!(url.starts_with("https://acme.maps.arcgis.com/sharing/rest/oauth2/authorize?"));
        assert!(url.contains("client_id=myApp"));
        assert!(url.contains("response_type=code"));
    }

    #[test]
    fn test_login_error_mapping() {
        let err = login_error(ApiError::Remote {
            code: 400,
            endpoint: "/generateToken".to_string(),
            message: "Unable to generate token. (Invalid username or password.)".to_string(),
            details: vec!["Invalid username or password.".to_string()],
        });
        match err {
            AppError::Auth(AuthError::LoginFailed { message }) => {
                assert_eq!(
                    message,
                    "Unable to generate token. (Invalid username or password.)"
                );
            }
            other => panic!("Expected LoginFailed, got {:?}", other),
        }

        let err = login_error(ApiError::Timeout {
            timeout_secs: 30,
            endpoint: "/generateToken".to_string(),
        });
        assert!(matches!(err, AppError::Api(ApiError::Timeout { .. })));
    }
}
