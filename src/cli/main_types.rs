use clap::builder::FalseyValueParser;
use clap::{Parser, ValueEnum};

/// With no arguments the tool runs the interactive flow:
/// sign in, pick a layer, print its attribute table.
#[derive(Parser, Debug)]
#[command(name = "agol-cli")]
#[command(about = "Load every record of an ArcGIS Online feature layer into a table")]
#[command(version)]
pub struct Cli {
    #[arg(short, long)]
    pub verbose: bool,

    /// Config profile supplying prompt defaults
    #[arg(short, long)]
    pub profile: Option<String>,

    #[arg(long)]
    pub config_dir: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Render only the first N rows (the query still fetches every record)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Any non-empty `NO_COLOR` other than 0/false/no/off also disables color
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
