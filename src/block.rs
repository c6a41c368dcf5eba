use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::hasher;
use crate::transaction::Transaction;

pub const GENESIS_INDEX: u64 = 1;
pub const GENESIS_PROOF: u64 = 100;
pub const GENESIS_PREVIOUS_HASH: &str = "1";
// fixed so that every node starts from the very same genesis block
pub const GENESIS_TIMESTAMP: u64 = 1506057125;

static GENESIS: Lazy<Block> = Lazy::new(|| Block {
    index: GENESIS_INDEX,
    timestamp: GENESIS_TIMESTAMP,
    transactions: vec![],
    proof: GENESIS_PROOF,
    previous_hash: String::from(GENESIS_PREVIOUS_HASH),
});

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Block {
    pub index: u64,
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// return the genesis block
    pub fn get_genesis() -> Block {
        GENESIS.clone()
    }

    pub fn is_genesis(&self) -> bool {
        *self == *GENESIS
    }

    /// calculate hash of the whole block
    pub fn calculate_hash(&self) -> String {
        hasher::digest(self)
    }

    /// build the block that follows `prev`, linking it by hash
    pub fn generate_next(prev: &Block, transactions: Vec<Transaction>, proof: u64) -> Self {
        Block {
            index: prev.index + 1,
            timestamp: now(),
            transactions,
            proof,
            previous_hash: prev.calculate_hash(),
        }
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
