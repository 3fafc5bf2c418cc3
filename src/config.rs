// Configuration management for default-gateway
// Supports CLI arguments, config file (TOML), and environment variables

use crate::routes::procfs::{IPV4_ROUTE_PATH, IPV6_ROUTE_PATH};
use crate::routes::source::{platform_source, NetstatDumpSource, RouteSource};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::Level;

/// Discover the default gateways and interfaces from the routing table
#[derive(Parser, Debug, Clone)]
#[command(name = "default-gateway")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// What to look up
    #[command(subcommand)]
    pub command: Command,

    /// Logging level (error, warn, info, debug, trace)
    #[arg(short, long, env = "DGW_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Path to configuration file
    #[arg(short, long, env = "DGW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print a JSON report instead of plain lines
    #[arg(long, env = "DGW_JSON")]
    pub json: bool,

    /// Parse a saved `netstat -rn` dump instead of the live table
    #[arg(long, env = "DGW_NETSTAT_DUMP")]
    pub netstat_dump: Option<PathBuf>,

    /// IPv4 route file (Linux)
    #[arg(long, env = "DGW_IPV4_ROUTE")]
    pub ipv4_route: Option<PathBuf>,

    /// IPv6 route file (Linux)
    #[arg(long, env = "DGW_IPV6_ROUTE")]
    pub ipv6_route: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Gateway addresses of the default routes
    Gateways,
    /// Interfaces carrying a default route
    Interfaces,
    /// The default interface with the most addresses
    Pick,
    /// Addresses assigned to the default interfaces
    Ips,
    /// Every parsed route
    Routes,
}

/// Configuration file structure (TOML format)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Routing table locations
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// IPv4 route file (Linux)
    #[serde(default = "default_ipv4_route_path")]
    pub ipv4_route_path: PathBuf,

    /// IPv6 route file (Linux)
    #[serde(default = "default_ipv6_route_path")]
    pub ipv6_route_path: PathBuf,

    /// Program printing the BSD routing table
    #[serde(default = "default_netstat_program")]
    pub netstat_program: String,

    /// Arguments for the netstat program
    #[serde(default = "default_netstat_args")]
    pub netstat_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Print JSON reports
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_ipv4_route_path() -> PathBuf {
    PathBuf::from(IPV4_ROUTE_PATH)
}
fn default_ipv6_route_path() -> PathBuf {
    PathBuf::from(IPV6_ROUTE_PATH)
}
fn default_netstat_program() -> String {
    "netstat".to_string()
}
fn default_netstat_args() -> Vec<String> {
    vec!["-rn".to_string()]
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        SourcesConfig {
            ipv4_route_path: default_ipv4_route_path(),
            ipv6_route_path: default_ipv6_route_path(),
            netstat_program: default_netstat_program(),
            netstat_args: default_netstat_args(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

/// Merged configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    pub log_level: Level,
    pub json: bool,
    pub sources: SourcesConfig,
    pub netstat_dump: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources (CLI args, config file, defaults)
    /// Priority: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> anyhow::Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(cli_args: CliArgs) -> anyhow::Result<Self> {
        let config_file = if let Some(config_path) = &cli_args.config {
            tracing::info!("Loading configuration from: {}", config_path.display());
            let config_content = std::fs::read_to_string(config_path)?;
            toml::from_str::<ConfigFile>(&config_content)?
        } else {
            let default_path = PathBuf::from("default-gateway.toml");
            if default_path.exists() {
                tracing::info!("Loading configuration from: {}", default_path.display());
                let config_content = std::fs::read_to_string(&default_path)?;
                toml::from_str::<ConfigFile>(&config_content)?
            } else {
                ConfigFile::default()
            }
        };

        Self::merge(cli_args, config_file)
    }

    fn merge(cli_args: CliArgs, config_file: ConfigFile) -> anyhow::Result<Self> {
        let log_level = parse_log_level(
            cli_args
                .log_level
                .as_deref()
                .unwrap_or(&config_file.logging.level),
        )?;

        let mut sources = config_file.sources;
        if let Some(path) = cli_args.ipv4_route {
            sources.ipv4_route_path = path;
        }
        if let Some(path) = cli_args.ipv6_route {
            sources.ipv6_route_path = path;
        }

        Ok(Config {
            command: cli_args.command,
            log_level,
            json: cli_args.json || config_file.output.json,
            sources,
            netstat_dump: cli_args.netstat_dump,
        })
    }

    /// The routing table source to query
    pub fn route_source(&self) -> Box<dyn RouteSource> {
        match &self.netstat_dump {
            Some(path) => Box::new(NetstatDumpSource { path: path.clone() }),
            None => platform_source(&self.sources),
        }
    }
}

fn parse_log_level(level_str: &str) -> anyhow::Result<Level> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(anyhow::anyhow!("Invalid log level: {}", level_str)),
    }
}
