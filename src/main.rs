use default_gateway::config::{Command, Config};
use default_gateway::routes::Route;
use default_gateway::{
    find_default_gateways, find_default_interfaces, find_default_ips, pick_default_interface,
    GatewayError, RouteSource, SystemInterfaces,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// JSON output wrapper
#[derive(Debug, Serialize)]
struct Report<T: Serialize> {
    hostname: String,
    timestamp: String,
    #[serde(flatten)]
    result: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Lookup {
    Gateways(Vec<std::net::IpAddr>),
    Interfaces(Vec<String>),
    Interface(Option<String>),
    Ips(Vec<std::net::IpAddr>),
    Routes(Vec<Route>),
}

impl Lookup {
    fn lines(&self) -> Vec<String> {
        match self {
            Lookup::Gateways(ips) | Lookup::Ips(ips) => ips.iter().map(|ip| ip.to_string()).collect(),
            Lookup::Interfaces(names) => names.clone(),
            Lookup::Interface(name) => name.iter().cloned().collect(),
            Lookup::Routes(routes) => routes
                .iter()
                .map(|route| {
                    format!(
                        "{} {} {} {} {}",
                        route.family(),
                        route.destination(),
                        route.gateway(),
                        route.flags(),
                        route.interface()
                    )
                })
                .collect(),
        }
    }
}

fn run(config: &Config) -> Result<Lookup, GatewayError> {
    let source = config.route_source();
    let source = source.as_ref();

    Ok(match config.command {
        Command::Gateways => Lookup::Gateways(find_default_gateways(source)?),
        Command::Interfaces => Lookup::Interfaces(find_default_interfaces(source)?),
        Command::Pick => Lookup::Interface(pick_default_interface(source, &SystemInterfaces)?),
        Command::Ips => Lookup::Ips(find_default_ips(source, &SystemInterfaces)?),
        Command::Routes => Lookup::Routes(source.routes()?.into_routes()),
    })
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let lookup = match run(&config) {
        Ok(lookup) => lookup,
        Err(e) => {
            tracing::error!("Lookup failed: {}", e);
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    if config.json {
        let report = Report {
            hostname: get_hostname(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            result: lookup,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in lookup.lines() {
            println!("{}", line);
        }
    }

    Ok(())
}
