//! Runtime configuration: defaults, then an optional RON file, then flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use dashboard_engine::{EngineSettings, ProgressTransport};
use dashboard_logging::LogDestination;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Persistent socket.io subscription.
    SocketIo,
    /// Poll the progress endpoint after each trigger.
    Poll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Operator dashboard for the company scraper.
#[derive(Debug, Default, Parser)]
#[command(name = "dashboard", version)]
pub struct Cli {
    /// RON config file.
    #[arg(long, env = "DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,
    /// Scraper server base URL, e.g. http://localhost:3000.
    #[arg(long, env = "DASHBOARD_BASE_URL")]
    pub base_url: Option<String>,
    /// How progress notifications are received.
    #[arg(long, value_enum)]
    pub transport: Option<TransportKind>,
    /// Poll interval in milliseconds (poll transport only).
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,
    /// Connect timeout in seconds.
    #[arg(long)]
    pub connect_timeout_secs: Option<u64>,
    /// Per-request timeout in seconds; unlimited when unset.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
    #[arg(long, value_enum)]
    pub log: Option<LogTarget>,
    #[arg(long)]
    pub log_level: Option<LevelFilter>,
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Shape of the optional config file. Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub transport: Option<TransportKind>,
    pub poll_interval_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub log: Option<LogTarget>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub engine: EngineSettings,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

impl DashboardConfig {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(file, cli)
    }

    /// Merges file values and flags over the defaults; flags win.
    pub fn resolve(file: FileConfig, cli: &Cli) -> Result<Self, ConfigError> {
        let defaults = EngineSettings::default();

        let base_url = cli
            .base_url
            .clone()
            .or(file.base_url)
            .unwrap_or(defaults.base_url);
        if base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".into()));
        }

        let poll_interval_ms = cli
            .poll_interval_ms
            .or(file.poll_interval_ms)
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        let transport = match cli.transport.or(file.transport) {
            Some(TransportKind::Poll) => ProgressTransport::Poll {
                interval: Duration::from_millis(poll_interval_ms),
            },
            Some(TransportKind::SocketIo) | None => ProgressTransport::SocketIo,
        };

        let connect_timeout = cli
            .connect_timeout_secs
            .or(file.connect_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout);
        let request_timeout = cli
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .map(Duration::from_secs)
            .or(defaults.request_timeout);

        let log_level = match (cli.log_level, file.log_level) {
            (Some(level), _) => level,
            (None, Some(raw)) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("unknown log level {raw:?}")))?,
            (None, None) => LevelFilter::Info,
        };

        Ok(Self {
            engine: EngineSettings {
                base_url,
                connect_timeout,
                request_timeout,
                transport,
            },
            log_destination: cli.log.or(file.log).map(LogDestination::from).unwrap_or_default(),
            log_level,
            log_file: cli
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(dashboard_logging::default_log_file),
        })
    }
}
