// Hex-encoded addresses from the Linux route files

use std::net::{Ipv4Addr, Ipv6Addr};

/// Decode an 8 character IPv4 address from /proc/net/route.
///
/// The kernel prints the address in host (little-endian) byte order, so the
/// decoded bytes are reversed before building the address.
pub fn ipv4_from_hex(input: &str) -> Option<Ipv4Addr> {
    if input.len() != 8 {
        return None;
    }
    let mut octets: [u8; 4] = hex::decode(input).ok()?.try_into().ok()?;
    octets.reverse();
    Some(Ipv4Addr::from(octets))
}

/// Decode a 32 character IPv6 address from /proc/net/ipv6_route
pub fn ipv6_from_hex(input: &str) -> Option<Ipv6Addr> {
    if input.len() != 32 {
        return None;
    }
    let octets: [u8; 16] = hex::decode(input).ok()?.try_into().ok()?;
    Some(Ipv6Addr::from(octets))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_byte_order_is_reversed() {
        assert_eq!(ipv4_from_hex("0101000A"), Some(Ipv4Addr::new(10, 0, 1, 1)));
        assert_eq!(ipv4_from_hex("0101A8C0"), Some(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(ipv4_from_hex("00000000"), Some(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_ipv4_rejects_bad_input() {
        assert_eq!(ipv4_from_hex("0101000"), None);
        assert_eq!(ipv4_from_hex("0101000A00"), None);
        assert_eq!(ipv4_from_hex("0101000G"), None);
        assert_eq!(ipv4_from_hex(""), None);
    }

    #[test]
    fn test_ipv6_is_not_reversed() {
        let addr = ipv6_from_hex("fe800000000000000000000000000001");
        assert_eq!(addr, Some("fe80::1".parse().unwrap()));
        assert_eq!(
            ipv6_from_hex("00000000000000000000000000000000"),
            Some(Ipv6Addr::UNSPECIFIED)
        );
    }

    #[test]
    fn test_ipv6_rejects_bad_input() {
        assert_eq!(ipv6_from_hex("fe80000000000000000000000000001"), None);
        assert_eq!(ipv6_from_hex("fe80000000000000000000000000000x"), None);
    }
}
