// Linux route flag bits and their netstat-style rendering
//
// Bit values follow include/linux/route.h and include/linux/ipv6_route.h.
// /proc/net/route carries a 16-bit mask, /proc/net/ipv6_route a 32-bit one.

use std::fmt;

/// Raw route flag mask as found in the Linux route files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteFlags(pub u32);

impl RouteFlags {
    /// Route is usable
    pub const UP: RouteFlags = RouteFlags(0x0001);
    /// Destination is reached through a gateway
    pub const GATEWAY: RouteFlags = RouteFlags(0x0002);
    /// Host route rather than a network route
    pub const HOST: RouteFlags = RouteFlags(0x0004);
    /// Reinstate route after timeout
    pub const REINSTATE: RouteFlags = RouteFlags(0x0008);
    /// Created dynamically, e.g. by a redirect
    pub const DYNAMIC: RouteFlags = RouteFlags(0x0010);
    /// Modified dynamically, e.g. by a redirect
    pub const MODIFIED: RouteFlags = RouteFlags(0x0020);
    /// Route carries its own MTU
    pub const MTU: RouteFlags = RouteFlags(0x0040);
    /// Per-route TCP window clamping
    pub const WINDOW: RouteFlags = RouteFlags(0x0080);
    /// Initial round trip time is set
    pub const IRTT: RouteFlags = RouteFlags(0x0100);
    /// Reject route
    pub const REJECT: RouteFlags = RouteFlags(0x0200);
    /// Do not cache (2.0.36 era flag)
    pub const NOT_CACHE: RouteFlags = RouteFlags(0x0400);

    /// Default route learned via neighbour discovery
    pub const DEFAULT: RouteFlags = RouteFlags(0x0001_0000);
    /// Fallback route when no routers are on the link
    pub const ALL_ON_LINK: RouteFlags = RouteFlags(0x0002_0000);
    /// Route set up by router advertisement address configuration
    pub const ADDR_CONF: RouteFlags = RouteFlags(0x0004_0000);
    pub const NO_NEXT_HOP: RouteFlags = RouteFlags(0x0020_0000);
    pub const EXPIRES: RouteFlags = RouteFlags(0x0040_0000);
    pub const CACHE: RouteFlags = RouteFlags(0x0100_0000);
    pub const FLOW: RouteFlags = RouteFlags(0x0200_0000);
    pub const POLICY: RouteFlags = RouteFlags(0x0400_0000);
    pub const LOCAL: RouteFlags = RouteFlags(0x8000_0000);

    // Rendering order. ADDR_CONF and CACHE share 'c'.
    const CODES: [(RouteFlags, char); 20] = [
        (Self::UP, 'U'),
        (Self::GATEWAY, 'G'),
        (Self::REJECT, '!'),
        (Self::HOST, 'H'),
        (Self::REINSTATE, 'R'),
        (Self::DYNAMIC, 'D'),
        (Self::MODIFIED, 'M'),
        (Self::DEFAULT, 'd'),
        (Self::ALL_ON_LINK, 'a'),
        (Self::ADDR_CONF, 'c'),
        (Self::NO_NEXT_HOP, 'o'),
        (Self::EXPIRES, 'e'),
        (Self::CACHE, 'c'),
        (Self::FLOW, 'f'),
        (Self::POLICY, 'p'),
        (Self::LOCAL, 'l'),
        (Self::MTU, 'u'),
        (Self::WINDOW, 'w'),
        (Self::IRTT, 'i'),
        (Self::NOT_CACHE, 'n'),
    ];

    /// True iff every bit of `other` is set
    pub fn is(self, other: RouteFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u32 {
        self.0
    }
}

impl From<u16> for RouteFlags {
    fn from(bits: u16) -> Self {
        RouteFlags(u32::from(bits))
    }
}

impl From<u32> for RouteFlags {
    fn from(bits: u32) -> Self {
        RouteFlags(bits)
    }
}

impl fmt::Display for RouteFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, code) in Self::CODES {
            if self.is(flag) {
                write!(f, "{}", code)?;
            }
        }
        Ok(())
    }
}
