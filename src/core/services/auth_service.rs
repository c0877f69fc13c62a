use super::traits::Portal;
use super::types::{Item, Session};
use crate::AppError;
use crate::core::auth::{AUTH_CODE_PROMPT, AuthChoice, Credentials, LoginInput};
use crate::core::pipeline::AnalysisSnapshot;
use crate::core::prompt::Prompter;
use crate::error::CliError;
use crate::storage::config::Profile;
use crate::utils::validation::{validate_item_id, validate_url};
use std::sync::Arc;
use tracing::{debug, info};

pub const ORG_URL_PROMPT: &str =
    "Enter your AGOL organization URL (e.g., https://myorg.maps.arcgis.com)";
pub const METHOD_PROMPT: &str =
    "Choose authentication method (1 for Username/Password, 2 for Client ID)";
pub const ITEM_ID_PROMPT: &str = "Enter the AGOL item ID";

/// Authenticator: org URL + credentials → session → item
pub struct AuthService {
    portal: Arc<dyn Portal>,
    profile: Profile,
}

impl AuthService {
    pub fn new(portal: Arc<dyn Portal>, profile: Option<Profile>) -> Self {
        Self {
            portal,
            profile: profile.unwrap_or_default(),
        }
    }

    /// Run the interactive prompts and return a snapshot holding session and item.
    ///
    /// An unrecognized method returns `AuthError::InvalidChoice` before any
    /// further prompt or network call.
    pub async fn authenticate(
        &self,
        prompter: &mut dyn Prompter,
    ) -> Result<AnalysisSnapshot, AppError> {
        let org_url = prompter.prompt(ORG_URL_PROMPT, self.profile.org_url.as_deref())?;
        let org_url = org_url.trim().trim_end_matches('/').to_string();
        validate_url(&org_url)?;

        let method = prompter.prompt(METHOD_PROMPT, self.profile.auth_method.as_deref())?;
        let choice = AuthChoice::parse(&method)?;

        let input = LoginInput::collect(
            choice,
            prompter,
            self.profile.username.as_deref(),
            self.profile.client_id.as_deref(),
        )?;
        input.validate()?;

        let credentials = self.resolve_credentials(&org_url, input, prompter)?;
        let session = self.connect(&org_url, &credentials).await?;

        let item_id = prompter.prompt(ITEM_ID_PROMPT, None)?;
        let item_id = item_id.trim();
        validate_item_id(item_id)?;

        let item = self.lookup_item(&session, item_id).await?;
        Ok(AnalysisSnapshot::new().with_item(session, item))
    }

    /// Establish a session for already collected credentials
    pub async fn connect(
        &self,
        org_url: &str,
        credentials: &Credentials,
    ) -> Result<Session, AppError> {
        debug!(org_url, ?credentials, "connecting");
        let session = self.portal.connect(org_url, credentials).await?;
        info!(
            org_url,
            username = session.username.as_deref().unwrap_or("-"),
            "session established"
        );
        Ok(session)
    }

    pub async fn lookup_item(&self, session: &Session, item_id: &str) -> Result<Item, AppError> {
        let item = self.portal.get_item(session, item_id).await?;
        info!(
            item_id,
            title = %item.title,
            layers = item.layers.len(),
            "item resolved"
        );
        Ok(item)
    }

    /// Client-id logins need a one-time authorization code from the browser
    fn resolve_credentials(
        &self,
        org_url: &str,
        input: LoginInput,
        prompter: &mut dyn Prompter,
    ) -> Result<Credentials, AppError> {
        match input {
            LoginInput::Password { username, password } => {
                Ok(Credentials::Password { username, password })
            }
            LoginInput::ClientId { client_id } => {
                let url = self.portal.authorize_url(org_url, &client_id);
                prompter.message("Open this URL in a browser and sign in:");
                prompter.message(&url);

                let code = prompter.prompt_secret(AUTH_CODE_PROMPT)?;
                let code = code.trim().to_string();
                if code.is_empty() {
                    return Err(CliError::InvalidArguments(
                        "Authorization code cannot be empty".to_string(),
                    )
                    .into());
                }
                Ok(Credentials::AuthorizationCode { client_id, code })
            }
        }
    }
}
