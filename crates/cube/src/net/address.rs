use std::net::{SocketAddr, ToSocketAddrs};

use crate::error::TransportError;

const DEFAULT_HOST: &str = "localhost";

/// Splits a `host[:port]` target.
///
/// An empty host means `localhost` and a missing or empty port means
/// `default_port`. Bare IPv6 literals contain several colons and are taken
/// whole; use `[addr]:port` to give one a port.
pub fn parse_target(target: &str, default_port: u16) -> Result<(String, u16), TransportError> {
    let (host, port) = if let Some(rest) = target.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| TransportError::InvalidPort(target.to_string()))?;
        match after {
            "" => (host, None),
            _ => match after.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None => return Err(TransportError::InvalidPort(target.to_string())),
            },
        }
    } else {
        match target.split_once(':') {
            Some((host, port)) if !port.contains(':') => (host, Some(port)),
            _ => (target, None),
        }
    };

    let port = match port {
        None | Some("") => default_port,
        Some(port) => match port.parse::<u16>() {
            Ok(0) | Err(_) => return Err(TransportError::InvalidPort(target.to_string())),
            Ok(port) => port,
        },
    };

    let host = if host.is_empty() { DEFAULT_HOST } else { host };

    Ok((host.to_string(), port))
}

/// Resolves a `host[:port]` target to every candidate endpoint, in resolver
/// order.
pub fn resolve(target: &str, default_port: u16) -> Result<Vec<SocketAddr>, TransportError> {
    let (host, port) = parse_target(target, default_port)?;

    let addresses: Vec<SocketAddr> = (host.as_str(), port)
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            host: host.clone(),
            source,
        })?
        .collect();

    if addresses.is_empty() {
        return Err(TransportError::NoAddresses(target.to_string()));
    }

    log::debug!("Resolved {} to {:?}", target, addresses);
    Ok(addresses)
}
