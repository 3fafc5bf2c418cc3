// Fixed-field parsers for /proc/net/route and /proc/net/ipv6_route
//
// /proc/net/route:
//   Iface  Destination  Gateway   Flags  RefCnt  Use  Metric  Mask      MTU  Window  IRTT
//   ens37  00000000     0101000A  0003   0       0    100     00000000  0    0       0
//
// /proc/net/ipv6_route has no header. Each row is ten fields:
//   dst-net dst-prefix src-net src-prefix next-hop metric refcnt use flags device

use super::flags::RouteFlags;
use super::hex::{ipv4_from_hex, ipv6_from_hex};
use super::{AddressFamily, Route, RouteTable};
use crate::error::{GatewayError, GatewayResult};
use std::io::ErrorKind;
use std::path::Path;

pub const IPV4_ROUTE_PATH: &str = "/proc/net/route";
pub const IPV6_ROUTE_PATH: &str = "/proc/net/ipv6_route";

const IPV6_FIELD_COUNT: usize = 10;

/// Parse the contents of /proc/net/route
pub fn parse_ipv4_table(contents: &str) -> GatewayResult<RouteTable> {
    let mut lines = contents.lines();
    let header: Vec<&str> = lines.next().unwrap_or("").split_whitespace().collect();
    let column = |name: &str| header.iter().position(|field| *field == name);

    let (Some(iface_idx), Some(destination_idx), Some(gateway_idx), Some(flags_idx)) = (
        column("Iface"),
        column("Destination"),
        column("Gateway"),
        column("Flags"),
    ) else {
        return Err(GatewayError::CantParse);
    };

    let mut routes = RouteTable::new();
    for line in lines {
        let row = line.trim();
        if row.is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(GatewayError::invalid_row(row));
        }
        let field = |idx: usize| {
            fields
                .get(idx)
                .copied()
                .ok_or_else(|| GatewayError::invalid_row(row))
        };

        let destination = ipv4_from_hex(field(destination_idx)?)
            .ok_or_else(|| GatewayError::invalid_row(row))?;
        let gateway =
            ipv4_from_hex(field(gateway_idx)?).ok_or_else(|| GatewayError::invalid_row(row))?;
        let bits: [u8; 2] = decode_flags(field(flags_idx)?, row)?;

        routes.push(Route::new(
            AddressFamily::Ipv4,
            destination.to_string(),
            RouteFlags::from(u16::from_be_bytes(bits)).to_string(),
            field(iface_idx)?,
            gateway.to_string(),
        ));
    }

    Ok(routes)
}

/// Parse the contents of /proc/net/ipv6_route
pub fn parse_ipv6_table(contents: &str) -> GatewayResult<RouteTable> {
    let mut routes = RouteTable::new();
    for line in contents.lines() {
        let row = line.trim();
        if row.is_empty() {
            continue;
        }

        let fields: Vec<&str> = row.split_whitespace().collect();
        if fields.len() != IPV6_FIELD_COUNT {
            return Err(GatewayError::invalid_row(row));
        }

        let destination =
            ipv6_from_hex(fields[0]).ok_or_else(|| GatewayError::invalid_row(row))?;
        let next_hop = ipv6_from_hex(fields[4]).ok_or_else(|| GatewayError::invalid_row(row))?;
        let bits: [u8; 4] = decode_flags(fields[8], row)?;

        routes.push(Route::new(
            AddressFamily::Ipv6,
            destination.to_string(),
            RouteFlags::from(u32::from_be_bytes(bits)).to_string(),
            fields[9],
            next_hop.to_string(),
        ));
    }

    Ok(routes)
}

fn decode_flags<const N: usize>(field: &str, row: &str) -> GatewayResult<[u8; N]> {
    hex::decode(field)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| GatewayError::invalid_row(row))
}

/// Read and parse the IPv4 route file. A missing file means no routes.
pub fn read_ipv4_routes(path: impl AsRef<Path>) -> GatewayResult<RouteTable> {
    match read_optional(path.as_ref())? {
        Some(contents) => parse_ipv4_table(&contents),
        None => Ok(RouteTable::new()),
    }
}

/// Read and parse the IPv6 route file. A missing file means no routes,
/// which is the normal state of a host with IPv6 disabled.
pub fn read_ipv6_routes(path: impl AsRef<Path>) -> GatewayResult<RouteTable> {
    match read_optional(path.as_ref())? {
        Some(contents) => parse_ipv6_table(&contents),
        None => Ok(RouteTable::new()),
    }
}

fn read_optional(path: &Path) -> GatewayResult<Option<String>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("{} does not exist, treating as empty", path.display());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const IPV4_HEADER: &str =
        "Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT";

    const LINUX_IPV4: &str = "Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT
wlp4s0\t00000000\t0100A8C0\t0003\t0\t0\t600\t00000000\t0\t0\t0
docker0\t000011AC\t00000000\t0001\t0\t0\t0\t0000FFFF\t0\t0\t0
wlp4s0\t0000A8C0\t00000000\t0001\t0\t0\t600\t00FFFFFF\t0\t0\t0
";

    const LINUX_IPV6: &str = "\
fe800000000000000000000000000000 40 00000000000000000000000000000000 00 00000000000000000000000000000000 00000100 00000001 00000000 00000001 wlp4s0
00000000000000000000000000000001 80 00000000000000000000000000000000 00 00000000000000000000000000000000 00000000 00000004 00000000 80200001 lo
00000000000000000000000000000000 00 00000000000000000000000000000000 00 00000000000000000000000000000000 ffffffff 00000001 00000001 00200200 lo
";

    fn write_fixture(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_ipv4_row_decoding() {
        let contents = format!(
            "Iface Destination Gateway Flags RefCnt Use Metric Mask MTU Window IRTT\n{}\n",
            "eth0\t00000000\t0101000A\t0003\t0\t0\t100\t00000000\t0\t0\t0"
        );
        let table = parse_ipv4_table(&contents).unwrap();

        assert_eq!(table.len(), 1);
        let route = &table.routes()[0];
        assert_eq!(route.family(), AddressFamily::Ipv4);
        assert_eq!(route.destination(), "0.0.0.0");
        assert_eq!(route.gateway(), "10.0.1.1");
        assert_eq!(route.flags(), "UG");
        assert_eq!(route.interface(), "eth0");
    }

    #[test]
    fn test_ipv4_full_table() {
        let table = parse_ipv4_table(LINUX_IPV4).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.routes()[1].destination(), "172.17.0.0");
        assert_eq!(table.routes()[1].flags(), "U");

        let defaults = table.find_defaults(AddressFamily::Ipv4);
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].gateway(), "192.168.0.1");
        assert_eq!(defaults[0].interface(), "wlp4s0");
    }

    #[test]
    fn test_ipv4_header_columns_by_name() {
        let contents = "Gateway Flags Destination Iface\n0101000A 0003 00000000 eth1\n";
        let table = parse_ipv4_table(contents).unwrap();
        assert_eq!(table.routes()[0].interface(), "eth1");
        assert_eq!(table.routes()[0].gateway(), "10.0.1.1");
    }

    #[test]
    fn test_ipv4_missing_column_cant_parse() {
        let contents = "Iface Destination Flags Metric\neth0 00000000 0003 0\n";
        assert!(matches!(parse_ipv4_table(contents), Err(GatewayError::CantParse)));
        assert!(matches!(parse_ipv4_table(""), Err(GatewayError::CantParse)));
        assert!(matches!(
            parse_ipv4_table("iface destination gateway flags\n"),
            Err(GatewayError::CantParse)
        ));
    }

    #[test]
    fn test_ipv4_invalid_rows() {
        let cases = [
            "eth0 00000000 0101000A",
            "eth0 00000000 0101000Z 0003",
            "eth0 000000 0101000A 0003",
            "eth0 00000000 0101000A 03",
            "eth0 00000000 0101000A 000003",
        ];
        for row in cases {
            let contents = format!("{}\n{}\n", IPV4_HEADER, row);
            match parse_ipv4_table(&contents) {
                Err(GatewayError::InvalidRow { row: reported }) => assert_eq!(reported, row),
                other => panic!("expected invalid row for {:?}, got {:?}", row, other),
            }
        }
    }

    #[test]
    fn test_ipv6_fixed_layout() {
        let row = "00000000000000000000000000000000 00 00000000000000000000000000000000 00 00000000000000000000000000000000 ffffffff 00000001 00000001 00200200 lo";
        let table = parse_ipv6_table(row).unwrap();

        assert_eq!(table.len(), 1);
        let route = &table.routes()[0];
        assert_eq!(route.family(), AddressFamily::Ipv6);
        assert_eq!(route.destination(), "::");
        assert_eq!(route.gateway(), "::");
        assert_eq!(route.interface(), "lo");
        assert!(route.has_flags(&["!", "o"]));
        assert!(!route.has_flags(&["U"]));
    }

    #[test]
    fn test_ipv6_full_table() {
        let table = parse_ipv6_table(LINUX_IPV6).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.routes()[0].destination(), "fe80::");
        assert_eq!(table.routes()[0].flags(), "U");
        assert_eq!(table.routes()[1].destination(), "::1");
        assert_eq!(table.routes()[1].flags(), "Uol");
        assert!(table.find_defaults(AddressFamily::Ipv6).is_empty());
    }

    #[test]
    fn test_ipv6_invalid_rows() {
        let short = "00000000000000000000000000000000 00 lo";
        assert!(matches!(
            parse_ipv6_table(short),
            Err(GatewayError::InvalidRow { row }) if row == short
        ));

        let bad_flags = "00000000000000000000000000000000 00 00000000000000000000000000000000 00 00000000000000000000000000000000 ffffffff 00000001 00000001 0200 lo";
        assert!(matches!(
            parse_ipv6_table(bad_flags),
            Err(GatewayError::InvalidRow { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("ipv6_route");

        assert!(read_ipv6_routes(&missing).unwrap().is_empty());
        assert!(read_ipv4_routes(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_file_is_invalid_row() {
        let dir = TempDir::new().unwrap();
        let path = write_fixture(&dir, "random", "lorem ipsum dolor sit amet\n");

        match read_ipv6_routes(&path) {
            Err(GatewayError::InvalidRow { row }) => assert_eq!(row, "lorem ipsum dolor sit amet"),
            other => panic!("expected invalid row, got {:?}", other),
        }
        assert!(matches!(read_ipv4_routes(&path), Err(GatewayError::CantParse)));
    }

    #[test]
    fn test_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(read_ipv4_routes(dir.path()), Err(GatewayError::Io(_))));
    }

    #[test]
    fn test_read_files() {
        let dir = TempDir::new().unwrap();
        let v4 = write_fixture(&dir, "route", LINUX_IPV4);
        let v6 = write_fixture(&dir, "ipv6_route", LINUX_IPV6);

        assert_eq!(read_ipv4_routes(&v4).unwrap().len(), 3);
        assert_eq!(read_ipv6_routes(&v6).unwrap().len(), 3);
    }
}
