//! Command-line surface for `dashboards-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

#[derive(Parser, Debug)]
#[command(
    name = "dashboards-cli",
    version,
    about = "Administration client for a notebook dashboard server",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Server base URL, e.g. <http://localhost:3000> (defaults to the configured address)
    #[arg(long, global = true, value_name = "URL")]
    pub host: Option<String>,

    /// Authorization token (takes precedence over `AUTH_TOKEN` in the config)
    #[arg(long = "auth-token", global = true, value_name = "TOKEN")]
    pub auth_token: Option<String>,

    /// Optional path to a configuration file
    #[arg(
        long = "config-file",
        global = true,
        env = "DASHBOARDS_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    /// Override the log level (trace|debug|info|warn|error)
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging
    #[arg(
        long = "log-json",
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Invalidate the server-side cache
    ClearCache,
    /// Remove a published dashboard
    Delete {
        /// Dashboard path on the server
        path: String,
    },
    /// Publish a notebook as a dashboard
    Upload(UploadArgs),
}

#[derive(Args, Debug, Clone)]
pub struct UploadArgs {
    /// Replace an existing dashboard without asking
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub overwrite: bool,

    /// Local notebook file to upload
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Destination path on the server, without the `.ipynb` suffix
    #[arg(value_name = "PATHNAME")]
    pub pathname: String,
}
