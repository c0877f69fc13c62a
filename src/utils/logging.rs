use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "AGOL_LOG";

/// Default directive: `warn`, or `debug` for this crate with `--verbose`
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "warn,agol_cli=debug" } else { "warn" }
}

/// Install the global subscriber. Logs go to stderr; stdout carries prompts and results.
pub fn init_tracing(verbose: bool) -> Result<(), String> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| format!("failed to initialize tracing subscriber: {error}"))
}
