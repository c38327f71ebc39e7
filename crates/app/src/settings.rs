//! Handles settings for the application. Configuration is read from
//! `config/settings.toml` (or the file given with `--config`), then
//! overridden by `FORTUNE__*` environment variables.
//!
//! See `config/settings.toml` for an annotated example.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(version, about = "Shared-ledger expense tracking server")]
struct Args {
    /// Settings file, without extension.
    #[arg(long, env = "FORTUNE_CONFIG", default_value = "config/settings")]
    config: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
    /// Write logs to this file instead of stdout.
    pub log_file: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_file: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub jwt_secret: String,
    pub accounts_database: Database,
    pub ledgers_database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        Self::from_file(&args.config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("FORTUNE").separator("__"))
            .build()?
            .try_deserialize()
    }
}
