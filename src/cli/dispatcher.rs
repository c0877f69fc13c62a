use crate::api::client::{ArcGisClient, DEFAULT_TIMEOUT_SECS};
use crate::cli::layer_picker::TerminalLayerPicker;
use crate::cli::main_types::{Cli, OutputFormat};
use crate::cli::prompt::TerminalPrompter;
use crate::core::prompt::{LayerPicker, Prompter};
use crate::core::services::auth_service::AuthService;
use crate::core::services::layer_service::LayerService;
use crate::core::services::query_service::QueryService;
use crate::core::services::traits::Portal;
use crate::core::services::types::FeatureTable;
use crate::display::{ProgressSpinner, TableDisplay};
use crate::error::AppError;
use crate::storage::config::{Config, Profile};
use atty::Stream;
use std::sync::Arc;
use tracing::debug;

/// Output settings taken from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub format: OutputFormat,
    pub limit: Option<usize>,
    pub use_colors: bool,
    pub show_progress: bool,
}

impl RunOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            limit: cli.limit,
            use_colors: !cli.no_color,
            show_progress: !cli.verbose && atty::is(Stream::Stderr),
        }
    }
}

/// Runs authenticate → select layer → load table
pub struct Dispatcher {
    profile: Option<Profile>,
    options: RunOptions,
}

impl Dispatcher {
    pub fn new(config: &Config, cli: &Cli) -> Result<Self, AppError> {
        let profile = config.resolve_profile(cli.profile.as_deref())?;
        if let Some(profile) = &profile {
            profile.validate()?;
        }
        debug!(?profile, "profile resolved");

        Ok(Self {
            profile,
            options: RunOptions::from_cli(cli),
        })
    }

    pub fn with_options(profile: Option<Profile>, options: RunOptions) -> Self {
        Self { profile, options }
    }

    /// Interactive run against the real service; prints the result to stdout
    pub async fn run(&self) -> Result<(), AppError> {
        let timeout = self
            .profile
            .as_ref()
            .and_then(|p| p.timeout_seconds)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let portal: Arc<dyn Portal> = Arc::new(ArcGisClient::with_timeout(timeout)?);

        let mut prompter = TerminalPrompter::new();
        let mut picker = TerminalLayerPicker::new(self.options.use_colors);

        let table = self.run_with(portal, &mut prompter, &mut picker).await?;
        println!("{}", self.render(&table)?);
        Ok(())
    }

    /// The whole flow over injectable collaborators
    pub async fn run_with(
        &self,
        portal: Arc<dyn Portal>,
        prompter: &mut dyn Prompter,
        picker: &mut dyn LayerPicker,
    ) -> Result<FeatureTable, AppError> {
        let snapshot = AuthService::new(portal.clone(), self.profile.clone())
            .authenticate(prompter)
            .await?;

        let item = snapshot.require_item()?;
        prompter.message(&format!(
            "Found item: {} ({}, {} layers)",
            item.title,
            item.item_type,
            item.layers.len()
        ));

        let selection = LayerService::new().select_layer(&snapshot, picker)?;
        prompter.message(&selection.confirmation());

        let mut spinner = ProgressSpinner::new("Querying all records...".to_string());
        if self.options.show_progress {
            spinner.start();
        }
        let table = QueryService::new(portal).load_all(&selection.snapshot).await;
        spinner.stop(None);

        table
    }

    pub fn render(&self, table: &FeatureTable) -> Result<String, AppError> {
        let display = TableDisplay::new().with_colors(self.options.use_colors);
        match self.options.format {
            OutputFormat::Table => display.render_feature_table(table, self.options.limit),
            OutputFormat::Json => display.render_json(table),
        }
    }
}
