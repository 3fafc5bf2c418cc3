// Line-oriented parser for BSD `netstat -rn` output
//
// Darwin prints a column header containing `Netif`, NetBSD uses `Interface`.
// Both group routes under `Internet:` and `Internet6:` section titles.

use super::{AddressFamily, Route, RouteTable};
use crate::error::{GatewayError, GatewayResult};

const DESTINATION: &str = "Destination";
const GATEWAY: &str = "Gateway";
const FLAGS: &str = "Flags";
const NETIF: &str = "Netif";
const INTERFACE: &str = "Interface";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Header,
    InternetHeader,
    Internet4Header,
    Internet4Data,
    Internet6Header,
    Internet6Data,
}

/// Column positions taken from a section's header line
#[derive(Debug, Clone, Copy)]
struct Columns {
    destination: usize,
    gateway: usize,
    flags: usize,
    interface: usize,
}

impl Columns {
    fn from_header(line: &str) -> Option<Self> {
        let names: Vec<&str> = line.split_whitespace().collect();
        if names.len() < 4 {
            return None;
        }

        let index_of = |name: &str| names.iter().position(|field| *field == name);

        let destination = index_of(DESTINATION)?;
        let gateway = index_of(GATEWAY)?;
        let flags = index_of(FLAGS)?;

        let interface = match (index_of(INTERFACE), index_of(NETIF)) {
            // NetBSD
            (Some(idx), _) if idx > 0 => idx,
            // Darwin, FreeBSD, Solaris
            (_, Some(idx)) => idx,
            _ => return None,
        };

        Some(Columns {
            destination,
            gateway,
            flags,
            interface,
        })
    }

    fn route(&self, family: AddressFamily, line: &str) -> Option<Route> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        Some(Route::new(
            family,
            *fields.get(self.destination)?,
            *fields.get(self.flags)?,
            *fields.get(self.interface)?,
            *fields.get(self.gateway)?,
        ))
    }
}

/// Incremental parser fed one line of netstat output at a time.
///
/// Only a bad first line is an error. Anything unexpected later resets the
/// parser, dropping every route collected so far, and it waits for the next
/// `Routing tables` line.
#[derive(Debug)]
pub struct NetstatParser {
    state: ParserState,
    started: bool,
    routes: RouteTable,
    net4: Option<Columns>,
    net6: Option<Columns>,
}

impl Default for NetstatParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NetstatParser {
    pub fn new() -> Self {
        NetstatParser {
            state: ParserState::Header,
            started: false,
            routes: RouteTable::new(),
            net4: None,
            net6: None,
        }
    }

    /// Feed the next line of output
    pub fn feed(&mut self, line: &str) -> GatewayResult<()> {
        let line = line.trim();

        match self.state {
            ParserState::Header => return self.parse_header(line),
            ParserState::InternetHeader => self.parse_internet_header(line),
            ParserState::Internet4Header => self.parse_columns(line, AddressFamily::Ipv4),
            ParserState::Internet6Header => self.parse_columns(line, AddressFamily::Ipv6),
            ParserState::Internet4Data => self.parse_data(line, AddressFamily::Ipv4),
            ParserState::Internet6Data => self.parse_data(line, AddressFamily::Ipv6),
        }

        Ok(())
    }

    /// Drop all collected routes and column maps and wait for a new header
    pub fn reset(&mut self) {
        tracing::debug!(
            "netstat parser reset in state {:?}, discarding {} route(s)",
            self.state,
            self.routes.len()
        );
        self.state = ParserState::Header;
        self.routes.clear();
        self.net4 = None;
        self.net6 = None;
    }

    /// Routes collected so far
    pub fn routes(&self) -> &[Route] {
        self.routes.routes()
    }

    pub fn finish(self) -> RouteTable {
        self.routes
    }

    fn parse_header(&mut self, line: &str) -> GatewayResult<()> {
        if line.eq_ignore_ascii_case("routing tables") {
            self.started = true;
            self.state = ParserState::InternetHeader;
            return Ok(());
        }

        if line.is_empty() || self.started {
            return Ok(());
        }

        Err(GatewayError::CantParse)
    }

    fn parse_internet_header(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }

        match line.to_ascii_lowercase().as_str() {
            "internet:" => self.state = ParserState::Internet4Header,
            "internet6:" => self.state = ParserState::Internet6Header,
            _ => self.reset(),
        }
    }

    fn parse_columns(&mut self, line: &str, family: AddressFamily) {
        let Some(columns) = Columns::from_header(line) else {
            tracing::debug!("unrecognised {} column header: {:?}", family, line);
            self.reset();
            return;
        };

        tracing::debug!("{} columns: {:?}", family, columns);
        match family {
            AddressFamily::Ipv4 => {
                self.net4 = Some(columns);
                self.state = ParserState::Internet4Data;
            }
            AddressFamily::Ipv6 => {
                self.net6 = Some(columns);
                self.state = ParserState::Internet6Data;
            }
        }
    }

    fn parse_data(&mut self, line: &str, family: AddressFamily) {
        if line.is_empty() {
            self.state = ParserState::InternetHeader;
            return;
        }

        let columns = match family {
            AddressFamily::Ipv4 => self.net4,
            AddressFamily::Ipv6 => self.net6,
        };

        match columns.and_then(|columns| columns.route(family, line)) {
            Some(route) => {
                tracing::trace!("{} route: {:?}", family, route);
                self.routes.push(route);
            }
            None => {
                tracing::debug!("short {} row: {:?}", family, line);
                self.reset();
            }
        }
    }
}

/// Parse a complete netstat dump.
///
/// A trailing empty line is always fed so an unterminated final section
/// is closed.
pub fn parse_netstat(output: &str) -> GatewayResult<RouteTable> {
    let mut parser = NetstatParser::new();
    for line in output.lines() {
        parser.feed(line)?;
    }
    parser.feed("")?;
    Ok(parser.finish())
}
