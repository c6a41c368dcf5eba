use thiserror::Error;

/// A submitted transaction was refused before touching the pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// The first reason a chain failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain has no blocks")]
    Empty,

    #[error("first block is not the genesis block")]
    GenesisMismatch,

    #[error("block at position {position} has index {found}, expected {expected}")]
    IndexMismatch {
        position: usize,
        expected: u64,
        found: u64,
    },

    #[error("block {index} does not link to the hash of its predecessor")]
    BrokenLink { index: u64 },

    #[error("block {index} carries proof {proof} which does not solve the puzzle")]
    InvalidProof { index: u64, proof: u64 },
}

/// Why a peer was skipped during conflict resolution.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer {peer} is unreachable: {source}")]
    Unreachable {
        peer: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("peer {peer} answered with status {status}")]
    Status { peer: String, status: u16 },

    #[error("peer {peer} sent a malformed payload: {reason}")]
    Malformed { peer: String, reason: String },

    #[error("peer {peer} sent an invalid chain: {source}")]
    InvalidChain {
        peer: String,
        #[source]
        source: ChainError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeerAddrError {
    #[error("peer address {0:?} has no host")]
    MissingHost(String),

    #[error("peer address {0:?} contains whitespace")]
    Whitespace(String),

    #[error("peer address {0:?} has an invalid port")]
    InvalidPort(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error(transparent)]
    Peer(#[from] PeerAddrError),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("could not start http server on {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("could not build peer http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
