use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::PeerAddrError;

/// Network location of a peer node, normalized to `host[:port]`.
///
/// Accepts `http://host:port/anything`, `https://host:port` and bare
/// `host:port`; the scheme and path are dropped and the host is lowercased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeerAddr(String);

impl PeerAddr {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// url of the peer's `path` endpoint
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.0, path)
    }
}

impl FromStr for PeerAddr {
    type Err = PeerAddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.chars().any(char::is_whitespace) {
            return Err(PeerAddrError::Whitespace(s.to_owned()));
        }

        let rest = match trimmed.split_once("://") {
            Some((_scheme, rest)) => rest,
            None => trimmed,
        };
        let netloc = rest.split(['/', '?', '#']).next().unwrap_or_default();
        // drop userinfo, a peer is only ever addressed by host and port
        let netloc = netloc.rsplit('@').next().unwrap_or_default();

        let host = match netloc.rsplit_once(':') {
            Some((host, port)) => {
                if u16::from_str(port).is_err() {
                    return Err(PeerAddrError::InvalidPort(s.to_owned()));
                }
                host
            }
            None => netloc,
        };
        if host.is_empty() {
            return Err(PeerAddrError::MissingHost(s.to_owned()));
        }

        Ok(PeerAddr(netloc.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for PeerAddr {
    type Error = PeerAddrError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PeerAddr> for String {
    fn from(addr: PeerAddr) -> Self {
        addr.0
    }
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Known peers, deduplicated and iterated in address order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PeerSet(BTreeSet<PeerAddr>);

impl PeerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// returns false if the peer was already known
    pub fn register(&mut self, addr: PeerAddr) -> bool {
        self.0.insert(addr)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PeerAddr> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<PeerAddr> {
        self.0.iter().cloned().collect()
    }
}
