//! Longest valid chain rule.
//!
//! Every known peer is asked for its chain. A peer's chain becomes the
//! candidate when it is strictly longer than both our own and the best one
//! seen so far, and passes validation. Peers are examined in address order,
//! so of several equally long winners the first address wins. A peer that
//! cannot be reached or answers with garbage is skipped.

use log::{debug, error, info, warn};
use std::thread;
use std::time::Duration;

use crate::chain::BlockChain;
use crate::error::PeerError;
use crate::message::ChainPayload;
use crate::peer::PeerAddr;
use crate::validator::Validator;

/// Where peer chains come from.
pub trait ChainFetcher: Send + Sync {
    fn fetch_chain(&self, peer: &PeerAddr) -> Result<ChainPayload, PeerError>;
}

/// Polls `GET /chain` on peers over http.
pub struct HttpChainFetcher {
    client: reqwest::blocking::Client,
}

impl HttpChainFetcher {
    /// every request, connect included, is bounded by `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl ChainFetcher for HttpChainFetcher {
    fn fetch_chain(&self, peer: &PeerAddr) -> Result<ChainPayload, PeerError> {
        let res = self
            .client
            .get(peer.url("/chain"))
            .send()
            .map_err(|source| PeerError::Unreachable {
                peer: peer.to_string(),
                source,
            })?;

        if !res.status().is_success() {
            return Err(PeerError::Status {
                peer: peer.to_string(),
                status: res.status().as_u16(),
            });
        }

        res.json::<ChainPayload>()
            .map_err(|e| PeerError::Malformed {
                peer: peer.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Outcome of one resolution round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub replaced: bool,
    pub chain: BlockChain,
    /// the peer whose chain won, if any
    pub source: Option<PeerAddr>,
}

/// Pick the chain this node should hold after asking `peers`.
///
/// Does not touch `local`; the caller decides how to install the result.
pub fn resolve(
    local: &BlockChain,
    peers: &[PeerAddr],
    fetcher: &dyn ChainFetcher,
    validator: &impl Validator,
) -> Resolution {
    match longest_valid_chain(local.len(), peers, fetcher, validator) {
        Some((peer, chain)) => Resolution {
            replaced: true,
            chain,
            source: Some(peer),
        },
        None => Resolution {
            replaced: false,
            chain: local.clone(),
            source: None,
        },
    }
}

/// The longest valid peer chain strictly longer than `local_len`.
pub fn longest_valid_chain(
    local_len: usize,
    peers: &[PeerAddr],
    fetcher: &dyn ChainFetcher,
    validator: &impl Validator,
) -> Option<(PeerAddr, BlockChain)> {
    let mut max_len = local_len;
    let mut winner = None;

    for (peer, fetched) in fetch_all(peers, fetcher) {
        let payload = match fetched {
            Ok(payload) => payload,
            Err(e) => {
                warn!("skipping peer: {e}");
                continue;
            }
        };

        match candidate(&peer, payload, max_len, validator) {
            Ok(Some(chain)) => {
                debug!("peer {peer} offers a valid chain of length {}", chain.len());
                max_len = chain.len();
                winner = Some((peer, chain));
            }
            Ok(None) => debug!("peer {peer} chain is not longer than {max_len}"),
            Err(e) => warn!("skipping peer: {e}"),
        }
    }

    if let Some((peer, chain)) = &winner {
        info!("longest valid chain has length {} from {peer}", chain.len());
    }

    winner
}

/// Ask every peer at once; each request is bounded by the fetcher's own timeout.
fn fetch_all(
    peers: &[PeerAddr],
    fetcher: &dyn ChainFetcher,
) -> Vec<(PeerAddr, Result<ChainPayload, PeerError>)> {
    thread::scope(|s| {
        let handles: Vec<_> = peers
            .iter()
            .map(|peer| (peer, s.spawn(move || fetcher.fetch_chain(peer))))
            .collect();

        handles
            .into_iter()
            .filter_map(|(peer, handle)| match handle.join() {
                Ok(res) => Some((peer.clone(), res)),
                Err(_) => {
                    error!("fetching chain from {peer} panicked");
                    None
                }
            })
            .collect()
    })
}

fn candidate(
    peer: &PeerAddr,
    payload: ChainPayload,
    max_len: usize,
    validator: &impl Validator,
) -> Result<Option<BlockChain>, PeerError> {
    if payload.length != payload.chain.len() {
        return Err(PeerError::Malformed {
            peer: peer.to_string(),
            reason: format!(
                "length is {} but {} blocks were sent",
                payload.length,
                payload.chain.len()
            ),
        });
    }

    if payload.length <= max_len {
        return Ok(None);
    }

    BlockChain::from_blocks(payload.chain, validator)
        .map(Some)
        .map_err(|source| PeerError::InvalidChain {
            peer: peer.to_string(),
            source,
        })
}
