// Platform-specific routing table sources

use super::netstat::parse_netstat;
use super::procfs::{read_ipv4_routes, read_ipv6_routes};
use super::RouteTable;
use crate::config::SourcesConfig;
use crate::error::{GatewayError, GatewayResult};
use std::path::PathBuf;
use std::process::Command;

/// Somewhere a routing table can be read from
pub trait RouteSource {
    fn routes(&self) -> GatewayResult<RouteTable>;
}

/// Runs `netstat -rn` (or a configured equivalent) and parses its output
#[derive(Debug, Clone)]
pub struct NetstatSource {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for NetstatSource {
    fn default() -> Self {
        NetstatSource {
            program: "netstat".to_string(),
            args: vec!["-rn".to_string()],
        }
    }
}

impl RouteSource for NetstatSource {
    fn routes(&self) -> GatewayResult<RouteTable> {
        tracing::info!("Reading routing table from {} {}", self.program, self.args.join(" "));

        let output = Command::new(&self.program).args(&self.args).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("{} exited with {}: {}", self.program, output.status, stderr.trim());
            return Err(GatewayError::CommandExecution(self.program.clone()));
        }

        parse_netstat(&String::from_utf8_lossy(&output.stdout))
    }
}

/// A saved `netstat -rn` dump on disk
#[derive(Debug, Clone)]
pub struct NetstatDumpSource {
    pub path: PathBuf,
}

impl RouteSource for NetstatDumpSource {
    fn routes(&self) -> GatewayResult<RouteTable> {
        tracing::info!("Reading netstat dump from {}", self.path.display());
        let bytes = std::fs::read(&self.path)?;
        parse_netstat(&String::from_utf8_lossy(&bytes))
    }
}

/// Linux /proc/net route files
#[derive(Debug, Clone)]
pub struct ProcSource {
    pub ipv4_path: PathBuf,
    pub ipv6_path: PathBuf,
}

impl RouteSource for ProcSource {
    fn routes(&self) -> GatewayResult<RouteTable> {
        tracing::info!(
            "Reading routing table from {} and {}",
            self.ipv4_path.display(),
            self.ipv6_path.display()
        );

        let mut ipv6 = read_ipv6_routes(&self.ipv6_path)?;
        let mut routes = read_ipv4_routes(&self.ipv4_path)?;
        routes.append(&mut ipv6);

        tracing::debug!("Read {} route(s)", routes.len());
        Ok(routes)
    }
}

/// Stand-in for targets with no known routing table format
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSource;

impl RouteSource for UnsupportedSource {
    fn routes(&self) -> GatewayResult<RouteTable> {
        Err(GatewayError::not_implemented())
    }
}

/// Pick the routing table source for the target this binary was built for
pub fn platform_source(config: &SourcesConfig) -> Box<dyn RouteSource> {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    return Box::new(ProcSource {
        ipv4_path: config.ipv4_route_path.clone(),
        ipv6_path: config.ipv6_route_path.clone(),
    });

    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    ))]
    return Box::new(NetstatSource {
        program: config.netstat_program.clone(),
        args: config.netstat_args.clone(),
    });

    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    )))]
    {
        let _ = config;
        Box::new(UnsupportedSource)
    }
}
