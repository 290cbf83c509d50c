//! Client address helpers.

use std::{
    convert::Infallible,
    net::{IpAddr, SocketAddr},
};

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, Extensions},
};

/// Reads the TCP peer address recorded by `into_make_service_with_connect_info`.
///
/// Returns an empty string when the server was not started with connect info,
/// which never matches localhost and never verifies a token.
pub fn client_ip(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

/// Handler argument carrying the TCP peer address as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(client_ip(&parts.extensions)))
    }
}

/// Whether `address` names the local machine.
///
/// Accepts the literal `localhost`, any IPv4 loopback address in 127.0.0.0/8,
/// `::1` and IPv4-mapped loopback such as `::ffff:127.0.0.1`. A trailing port,
/// with or without IPv6 brackets, is ignored.
pub fn is_localhost(address: &str) -> bool {
    let host = strip_port(address.trim());

    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }

    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4.is_loopback(),
        Ok(IpAddr::V6(v6)) => {
            v6.is_loopback() || v6.to_ipv4_mapped().is_some_and(|v4| v4.is_loopback())
        }
        Err(_) => false,
    }
}

fn strip_port(address: &str) -> &str {
    if let Ok(addr) = address.parse::<SocketAddr>() {
        // borrow the host part back out of the original text
        return match addr {
            SocketAddr::V4(_) => address.rsplit_once(':').map_or(address, |(host, _)| host),
            SocketAddr::V6(_) => address
                .strip_prefix('[')
                .and_then(|rest| rest.split_once(']'))
                .map_or(address, |(host, _)| host),
        };
    }

    if address.parse::<IpAddr>().is_ok() {
        return address;
    }

    match address.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => {
            host
        }
        _ => address,
    }
}
