// Routes module - route model, table parsers and default route selection

pub mod flags;
pub mod hex;
pub mod netstat;
pub mod procfs;
pub mod select;
pub mod source;

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use select::select_defaults;

/// Address family a route belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl TryFrom<u8> for AddressFamily {
    type Error = GatewayError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(AddressFamily::Ipv4),
            2 => Ok(AddressFamily::Ipv6),
            other => Err(GatewayError::InvalidAddressFamily(other)),
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// A single routing table entry, normalized across source formats.
///
/// Destination and gateway are kept in the textual form the source printed
/// them in; BSD netstat uses `default`, `link#4` and zone-qualified
/// addresses that have no single typed representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    family: AddressFamily,
    destination: String,
    flags: String,
    interface: String,
    gateway: String,
}

impl Route {
    pub fn new(
        family: AddressFamily,
        destination: impl Into<String>,
        flags: impl Into<String>,
        interface: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        Route {
            family,
            destination: destination.into(),
            flags: flags.into(),
            interface: interface.into(),
            gateway: gateway.into(),
        }
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn gateway(&self) -> &str {
        &self.gateway
    }

    /// True iff every given flag code appears in the flag string
    pub fn has_flags(&self, codes: &[&str]) -> bool {
        codes.iter().all(|code| self.flags.contains(code))
    }
}

/// Routes in the order they were discovered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        RouteTable { routes: Vec::new() }
    }

    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Move all routes of `other` to the end of this table
    pub fn append(&mut self, other: &mut RouteTable) {
        self.routes.append(&mut other.routes);
    }

    pub fn clear(&mut self) {
        self.routes.clear();
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn into_routes(self) -> Vec<Route> {
        self.routes
    }

    /// Default routes of the given family, in discovery order
    pub fn find_defaults(&self, family: AddressFamily) -> Vec<Route> {
        select_defaults(&self.routes, family)
    }
}

impl FromIterator<Route> for RouteTable {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        RouteTable {
            routes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for RouteTable {
    type Item = Route;
    type IntoIter = std::vec::IntoIter<Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_flags_is_order_insensitive() {
        let route = Route::new(AddressFamily::Ipv4, "default", "UGSc", "en0", "192.168.1.1");
        assert!(route.has_flags(&["G", "U"]));
        assert!(route.has_flags(&[]));
        assert!(!route.has_flags(&["U", "H"]));
    }

    #[test]
    fn test_address_family_from_tag() {
        assert_eq!(AddressFamily::try_from(1).unwrap(), AddressFamily::Ipv4);
        assert_eq!(AddressFamily::try_from(2).unwrap(), AddressFamily::Ipv6);
        assert!(matches!(
            AddressFamily::try_from(0),
            Err(GatewayError::InvalidAddressFamily(0))
        ));
    }

    #[test]
    fn test_append_preserves_order() {
        let mut v4: RouteTable = vec![Route::new(AddressFamily::Ipv4, "0.0.0.0", "UG", "eth0", "10.0.0.1")]
            .into_iter()
            .collect();
        let mut v6: RouteTable = vec![Route::new(AddressFamily::Ipv6, "::", "U", "lo", "::")]
            .into_iter()
            .collect();
        v4.append(&mut v6);

        assert!(v6.is_empty());
        let families: Vec<_> = v4.iter().map(Route::family).collect();
        assert_eq!(families, vec![AddressFamily::Ipv4, AddressFamily::Ipv6]);
    }
}
