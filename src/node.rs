use log::{info, warn};
use rand_core::{OsRng, RngCore};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::block::Block;
use crate::chain::BlockChain;
use crate::config::Config;
use crate::consensus::{self, ChainFetcher, HttpChainFetcher, Resolution};
use crate::error::{ServerError, TransactionError};
use crate::message::ChainPayload;
use crate::peer::{PeerAddr, PeerSet};
use crate::transaction::{Transaction, TransactionRequest};
use crate::transaction_pool::TransactionPool;
use crate::validator::pow::PowValidator;
use crate::validator::Validator;

pub const DEFAULT_MINING_REWARD: u64 = 1;

/// Chain and pool change together, so they live behind a single lock.
#[derive(Debug, Default)]
struct Ledger {
    chain: BlockChain,
    pool: TransactionPool,
}

/// Everything one node owns: its ledger, its peers and how it talks to them.
pub struct Node {
    ledger: RwLock<Ledger>,
    peers: RwLock<PeerSet>,
    validator: PowValidator,
    fetcher: Box<dyn ChainFetcher>,
    node_id: String,
    reward: u64,
}

impl Node {
    pub fn new(
        node_id: impl Into<String>,
        validator: PowValidator,
        fetcher: Box<dyn ChainFetcher>,
        reward: u64,
    ) -> Self {
        Self {
            ledger: RwLock::new(Ledger::default()),
            peers: RwLock::new(PeerSet::new()),
            validator,
            fetcher,
            node_id: node_id.into(),
            reward,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let fetcher = HttpChainFetcher::new(config.peer_timeout)?;
        let node_id = config.node_id.clone().unwrap_or_else(generate_node_id);

        let node = Self::new(
            node_id,
            PowValidator::new(config.difficulty),
            Box::new(fetcher),
            config.mining_reward,
        );
        for peer in config.peers.iter() {
            node.register_peer(peer.clone());
        }

        Ok(node)
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn validator(&self) -> &PowValidator {
        &self.validator
    }

    fn read_ledger(&self) -> RwLockReadGuard<'_, Ledger> {
        self.ledger.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_ledger(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.ledger.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a transaction for the next block and return that block's index.
    pub fn submit_transaction(&self, req: TransactionRequest) -> Result<u64, TransactionError> {
        let tx = Transaction::try_from(req).map_err(|e| {
            warn!("rejected transaction: {e}");
            e
        })?;

        let mut ledger = self.write_ledger();
        ledger.pool.add(tx);

        Ok(ledger.chain.get_latest().index + 1)
    }

    /// Solve the puzzle for the current tip, then forge the next block.
    ///
    /// The search runs without holding the lock. If the tip changed meanwhile
    /// the proof is useless and the search starts over against the new tip.
    pub fn mine(&self) -> Block {
        loop {
            let (last_proof, last_hash) = {
                let ledger = self.read_ledger();
                let last = ledger.chain.get_latest();
                (last.proof, last.calculate_hash())
            };

            let proof = self.validator.solve(last_proof);

            let mut ledger = self.write_ledger();
            if ledger.chain.get_latest().calculate_hash() != last_hash {
                warn!("chain tip moved while mining, solving again");
                continue;
            }

            let reward = Transaction::get_reward_tx(self.node_id.as_str(), self.reward);
            ledger.pool.add(reward);
            let transactions = ledger.pool.flush();
            let block = ledger.chain.forge(transactions, proof).clone();

            info!(
                "forged block {} with {} transactions",
                block.index,
                block.transactions.len()
            );
            return block;
        }
    }

    pub fn chain(&self) -> ChainPayload {
        let ledger = self.read_ledger();

        ChainPayload {
            chain: ledger.chain.blocks().to_vec(),
            length: ledger.chain.len(),
        }
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.read_ledger().pool.pending().to_vec()
    }

    /// returns false if the peer was already known
    pub fn register_peer(&self, addr: PeerAddr) -> bool {
        let added = self
            .peers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(addr.clone());
        if added {
            info!("registered peer {addr}");
        }

        added
    }

    pub fn peers(&self) -> Vec<PeerAddr> {
        self.peers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .to_vec()
    }

    /// Run one round of the longest valid chain rule against every known peer.
    ///
    /// Peers are polled and their chains validated with no lock held; the
    /// ledger is locked only to swap the chain in.
    pub fn resolve_now(&self) -> Resolution {
        let local = self.read_ledger().chain.clone();
        let peers = self.peers();

        let res = consensus::resolve(&local, &peers, self.fetcher.as_ref(), &self.validator);
        if !res.replaced {
            info!("our chain is authoritative");
            return res;
        }

        let mut ledger = self.write_ledger();
        if ledger.chain.replace(res.chain.clone()) {
            info!(
                "chain replaced by one of length {} from {:?}",
                res.chain.len(),
                res.source
            );
            return res;
        }

        info!("local chain grew to {} while resolving, keeping it", ledger.chain.len());
        Resolution {
            replaced: false,
            chain: ledger.chain.clone(),
            source: None,
        }
    }

    /// resolve conflicts every `interval` on a background thread
    pub fn spawn_resolver(node: Arc<Node>, interval: Duration) -> JoinHandle<()> {
        thread::spawn(move || loop {
            thread::sleep(interval);
            node.resolve_now();
        })
    }
}

/// random 128 bit identifier, hex encoded
pub fn generate_node_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);

    hex::encode(bytes)
}
