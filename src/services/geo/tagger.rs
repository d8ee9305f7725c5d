use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::http::HeaderMap;

use super::locator::{GeoLocator, LocationTag};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Loopback, private, link-local and unspecified addresses carry no geography.
fn is_unroutable(addr: IpAddr) -> bool {
    match addr.to_canonical() {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_broadcast()
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_unique_local()
                || v6.is_unicast_link_local()
        }
    }
}

#[derive(Clone)]
pub struct LocationTagger {
    locator: Arc<dyn GeoLocator>,
    trust_forwarded_for: bool,
}

impl LocationTagger {
    pub fn new(locator: Arc<dyn GeoLocator>, trust_forwarded_for: bool) -> Self {
        Self {
            locator,
            trust_forwarded_for,
        }
    }

    /// Never fails: no data degrades to `Unknown`.
    pub fn tag(&self, addr: IpAddr) -> LocationTag {
        if is_unroutable(addr) {
            return LocationTag::Unknown;
        }
        match self.locator.lookup(addr) {
            Some(code) => LocationTag::Region(code),
            None => LocationTag::Unknown,
        }
    }

    /// Where the request came from: the proxy-reported client when trusted, else the peer.
    pub fn source_address(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
        if self.trust_forwarded_for {
            let forwarded = headers
                .get(FORWARDED_FOR)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|first| first.trim().parse::<IpAddr>().ok());
            if forwarded.is_some() {
                return forwarded;
            }
        }
        peer.map(|p| p.ip())
    }

    pub fn tag_request(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> LocationTag {
        self.source_address(headers, peer)
            .map(|addr| self.tag(addr))
            .unwrap_or(LocationTag::Unknown)
    }
}
