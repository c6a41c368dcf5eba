use serde::Serialize;

use crate::block::Block;
use crate::error::ChainError;
use crate::transaction::Transaction;
use crate::validator::{check_chain, Validator};

/// An ordered, never empty sequence of blocks starting at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BlockChain {
    blocks: Vec<Block>,
}

impl BlockChain {
    /// a chain holding only the genesis block
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::get_genesis()],
        }
    }

    /// wrap blocks received from elsewhere, only if they form a valid chain
    pub fn from_blocks(blocks: Vec<Block>, validator: &impl Validator) -> Result<Self, ChainError> {
        check_chain(&blocks, validator)?;

        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// always false, a chain holds at least the genesis block
    pub fn is_empty(&self) -> bool {
        false
    }

    /// return the latest block
    pub fn get_latest(&self) -> &Block {
        &self.blocks[self.blocks.len() - 1]
    }

    /// append a block built on the latest one and return it
    pub fn forge(&mut self, transactions: Vec<Transaction>, proof: u64) -> &Block {
        let next = Block::generate_next(self.get_latest(), transactions, proof);
        self.blocks.push(next);

        self.get_latest()
    }

    /// swap the whole chain for `other` if it is strictly longer
    pub fn replace(&mut self, other: BlockChain) -> bool {
        if other.len() > self.len() {
            *self = other;
            return true;
        }

        false
    }
}

impl Default for BlockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::pow::PowValidator;

    fn mine(chain: &mut BlockChain, validator: &PowValidator, txs: Vec<Transaction>) {
        let proof = validator.solve(chain.get_latest().proof);
        chain.forge(txs, proof);
    }

    #[test]
    fn test_new() {
        let chain = BlockChain::new();

        assert_eq!(chain.len(), 1);
        assert!(chain.get_latest().is_genesis());
        assert!(!chain.is_empty());
    }

    #[test]
    fn test_forge() {
        let validator = PowValidator::default();
        let mut chain = BlockChain::new();
        let genesis_hash = chain.get_latest().calculate_hash();
        let proof = validator.solve(100);

        let block = chain.forge(vec![Transaction::new("a", "b", 1)], proof).clone();

        assert_eq!(block.index, 2);
        assert_eq!(block.proof, 35293);
        assert_eq!(block.previous_hash, genesis_hash);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get_latest(), &block);
    }

    #[test]
    fn test_forged_chain_is_valid() {
        let validator = PowValidator::new(2);
        let mut chain = BlockChain::new();
        for i in 0..4 {
            mine(&mut chain, &validator, vec![Transaction::new("a", "b", i)]);
        }

        let copy = BlockChain::from_blocks(chain.blocks().to_vec(), &validator).unwrap();

        assert_eq!(copy, chain);
    }

    #[test]
    fn test_from_invalid_blocks() {
        let validator = PowValidator::new(2);

        assert_eq!(
            BlockChain::from_blocks(vec![], &validator),
            Err(ChainError::Empty)
        );
    }

    #[test]
    fn test_replace() {
        let validator = PowValidator::new(1);
        let mut chain = BlockChain::new();
        let mut longer = BlockChain::new();
        mine(&mut longer, &validator, vec![]);

        assert!(!longer.clone().replace(chain.clone()));
        assert!(chain.replace(longer.clone()));
        assert_eq!(chain, longer);
        assert!(!chain.replace(longer));
    }
}
