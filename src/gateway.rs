// Default gateway and interface lookups built on a RouteSource

use crate::error::{GatewayError, GatewayResult};
use crate::routes::source::RouteSource;
use crate::routes::{AddressFamily, Route, RouteTable};
use std::net::IpAddr;

/// Addresses assigned to a named interface
pub trait InterfaceAddrs {
    fn addresses(&self, name: &str) -> GatewayResult<Vec<IpAddr>>;
}

/// Interface addresses from the host via getifaddrs(3)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

#[cfg(unix)]
impl InterfaceAddrs for SystemInterfaces {
    fn addresses(&self, name: &str) -> GatewayResult<Vec<IpAddr>> {
        let addrs = nix::ifaddrs::getifaddrs().map_err(std::io::Error::from)?;

        Ok(addrs
            .filter(|ifaddr| ifaddr.interface_name == name)
            .filter_map(|ifaddr| {
                let address = ifaddr.address?;
                if let Some(v4) = address.as_sockaddr_in() {
                    Some(IpAddr::V4(v4.ip()))
                } else {
                    address.as_sockaddr_in6().map(|v6| IpAddr::V6(v6.ip()))
                }
            })
            .collect())
    }
}

#[cfg(not(unix))]
impl InterfaceAddrs for SystemInterfaces {
    fn addresses(&self, _name: &str) -> GatewayResult<Vec<IpAddr>> {
        Err(GatewayError::not_implemented())
    }
}

/// Default routes of both families, IPv4 first
fn default_routes(routes: &RouteTable) -> Vec<Route> {
    let mut defaults = routes.find_defaults(AddressFamily::Ipv4);
    defaults.extend(routes.find_defaults(AddressFamily::Ipv6));
    defaults
}

/// Parse a gateway string, ignoring any `%zone` suffix
fn gateway_addr(route: &Route) -> GatewayResult<IpAddr> {
    let gateway = route.gateway();
    let without_zone = gateway.split('%').next().unwrap_or(gateway);
    without_zone
        .parse()
        .map_err(|_| GatewayError::InvalidGateway {
            gateway: gateway.to_string(),
        })
}

/// Gateway addresses of all default routes, IPv4 before IPv6
pub fn find_default_gateways(source: &dyn RouteSource) -> GatewayResult<Vec<IpAddr>> {
    let routes = source.routes()?;
    let gateways = default_routes(&routes)
        .iter()
        .map(gateway_addr)
        .collect::<GatewayResult<Vec<_>>>()?;

    tracing::info!("Found {} default gateway(s)", gateways.len());
    Ok(gateways)
}

/// Names of interfaces carrying a default route, without duplicates
pub fn find_default_interfaces(source: &dyn RouteSource) -> GatewayResult<Vec<String>> {
    let routes = source.routes()?;

    let mut interfaces: Vec<String> = Vec::new();
    for route in default_routes(&routes) {
        gateway_addr(&route)?;
        if !interfaces.iter().any(|name| name == route.interface()) {
            interfaces.push(route.interface().to_string());
        }
    }

    tracing::info!("Found {} default interface(s)", interfaces.len());
    Ok(interfaces)
}

/// The default interface with the most addresses. Ties go to the interface
/// listed first.
pub fn pick_default_interface(
    source: &dyn RouteSource,
    addrs: &dyn InterfaceAddrs,
) -> GatewayResult<Option<String>> {
    let mut best: Option<(String, usize)> = None;

    for name in find_default_interfaces(source)? {
        let count = addrs.addresses(&name)?.len();
        tracing::debug!("{} has {} address(es)", name, count);
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((name, count)),
        }
    }

    Ok(best.map(|(name, _)| name))
}

/// Every address assigned to an interface that carries a default route
pub fn find_default_ips(
    source: &dyn RouteSource,
    addrs: &dyn InterfaceAddrs,
) -> GatewayResult<Vec<IpAddr>> {
    let mut out = Vec::new();
    for name in find_default_interfaces(source)? {
        out.extend(addrs.addresses(&name)?.into_iter().map(|ip| ip.to_canonical()));
    }
    Ok(out)
}
