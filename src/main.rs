use agol_cli::AppError;
use agol_cli::cli::dispatcher::Dispatcher;
use agol_cli::cli::main_types::Cli;
use agol_cli::storage::config::Config;
use agol_cli::utils::logging::init_tracing;
use clap::Parser;
use std::path::PathBuf;

fn report_error(err: &AppError) {
    eprintln!("{} {}", err.severity().emoji(), err.display_friendly());
    if let Some(hint) = err.troubleshooting_hint() {
        eprintln!("💡 {}", hint);
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("Warning: {}", err);
    }

    // Load Config
    let config_dir = cli.config_dir.as_ref().map(PathBuf::from);
    let config = match Config::load(config_dir.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading config: {}", err);
            std::process::exit(1);
        }
    };

    let dispatcher = match Dispatcher::new(&config, &cli) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            report_error(&err);
            std::process::exit(1);
        }
    };

    if let Err(err) = dispatcher.run().await {
        report_error(&err);
        std::process::exit(1);
    }
}
