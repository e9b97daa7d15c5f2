//! Bus address resolution.

use std::net::{Ipv4Addr, SocketAddr};

/// Port the bus listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 47621;

/// Environment variable overriding the bus port.
pub const PORT_ENV: &str = "BEACON_PORT";

/// Returns the port set in [`PORT_ENV`], if it parses as one.
#[must_use]
pub fn port_from_env() -> Option<u16> {
	std::env::var(PORT_ENV).ok().and_then(|raw| raw.trim().parse().ok())
}

/// Returns the port to use for the bus.
///
/// # Resolution Order
///
/// 1. [`PORT_ENV`], when it parses as a port.
/// 2. [`DEFAULT_PORT`].
#[must_use]
pub fn default_port() -> u16 {
	port_from_env().unwrap_or(DEFAULT_PORT)
}

/// Returns the loopback socket address for `port`.
///
/// The bus is never exposed beyond the local host.
#[must_use]
pub fn loopback(port: u16) -> SocketAddr {
	SocketAddr::from((Ipv4Addr::LOCALHOST, port))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn loopback_is_local_only() {
		let addr = loopback(DEFAULT_PORT);
		assert!(addr.ip().is_loopback());
		assert_eq!(addr.port(), DEFAULT_PORT);
	}
}
