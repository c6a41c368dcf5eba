pub mod block;
pub mod chain;
pub mod config;
pub mod consensus;
pub mod error;
pub mod hasher;
pub mod http_server;
pub mod message;
pub mod node;
pub mod peer;
pub mod transaction;
pub mod transaction_pool;
pub mod validator;

pub use block::Block;
pub use chain::BlockChain;
pub use config::Config;
pub use consensus::{ChainFetcher, HttpChainFetcher, Resolution};
pub use node::Node;
pub use peer::{PeerAddr, PeerSet};
pub use transaction::{Transaction, TransactionRequest};
pub use transaction_pool::TransactionPool;
pub use validator::{pow::PowValidator, Validator};
