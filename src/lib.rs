// default-gateway - find the default gateways and interfaces of this host
//
// Routes come from `netstat -rn` on BSD-family systems and from
// /proc/net/route and /proc/net/ipv6_route on Linux.

pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{
    find_default_gateways, find_default_interfaces, find_default_ips, pick_default_interface,
    InterfaceAddrs, SystemInterfaces,
};
pub use routes::source::{platform_source, RouteSource};
pub use routes::{select_defaults, AddressFamily, Route, RouteTable};
