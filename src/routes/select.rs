// Default route selection per address family

use super::{AddressFamily, Route};
use std::net::Ipv6Addr;

/// Filter `routes` down to the default routes of `family`.
///
/// Order is preserved and nothing is de-duplicated.
pub fn select_defaults(routes: &[Route], family: AddressFamily) -> Vec<Route> {
    routes
        .iter()
        .filter(|route| route.family() == family && is_default(route))
        .cloned()
        .collect()
}

fn is_default(route: &Route) -> bool {
    match route.family() {
        AddressFamily::Ipv4 => {
            matches!(route.destination(), "default" | "0.0.0.0")
                && route.has_flags(&["U", "G"])
                && !route.has_flags(&["H"])
        }
        AddressFamily::Ipv6 => {
            matches!(route.destination(), "default" | "::/0")
                && route.has_flags(&["U", "G"])
                && !route.has_flags(&["H"])
                && !is_link_local_gateway(route.gateway())
        }
    }
}

/// Link-local next hops are only meaningful on one segment
fn is_link_local_gateway(gateway: &str) -> bool {
    if gateway == "fe80::" || gateway.starts_with("fe80::%") {
        return true;
    }

    let without_zone = gateway.split('%').next().unwrap_or(gateway);
    without_zone
        .parse::<Ipv6Addr>()
        .map(|addr| addr.segments()[0] & 0xffc0 == 0xfe80)
        .unwrap_or(false)
}
