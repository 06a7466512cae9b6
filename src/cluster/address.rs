//! Node Address
//!
//! Identity of one cluster member endpoint.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// `host:port` of a cluster member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    host: String,
    port: u16,
}

impl NodeAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for NodeAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAddress(s.to_string());
        let (host, port) = s.trim().rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl From<std::net::SocketAddr> for NodeAddress {
    fn from(addr: std::net::SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    #[test]
    fn test_parse_and_display() {
        let addr: NodeAddress = "node-1.cluster.local:1729".parse().unwrap();
        assert_eq!(addr.host(), "node-1.cluster.local");
        assert_eq!(addr.port(), 1729);
        assert_eq!(addr.to_string(), "node-1.cluster.local:1729");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["localhost", ":1729", "localhost:", "localhost:http", "localhost:70000"] {
            let err = bad.parse::<NodeAddress>().unwrap_err();
            assert!(matches!(err, Error::InvalidAddress(ref s) if s == bad), "{}", bad);
        }
    }

    #[test]
    fn test_from_socket_addr() {
        let socket = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 11729);
        assert_eq!(NodeAddress::from(socket), NodeAddress::new("127.0.0.1", 11729));
    }
}
