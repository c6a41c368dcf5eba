pub mod pow;

use log::warn;

use crate::block::Block;
use crate::error::ChainError;

/// The puzzle every non-genesis block has to solve.
pub trait Validator {
    /// check `proof` against the proof of the previous block, pure and stateless
    fn verify(&self, last_proof: u64, proof: u64) -> bool;

    /// search the first proof, counting up from 0, that `verify` accepts
    fn solve(&self, last_proof: u64) -> u64;
}

/// Check a whole chain, returning the first problem found.
///
/// Never mutates anything; it is run against chains received from peers.
pub fn check_chain(blocks: &[Block], validator: &impl Validator) -> Result<(), ChainError> {
    let genesis = blocks.first().ok_or(ChainError::Empty)?;
    if !genesis.is_genesis() {
        return Err(ChainError::GenesisMismatch);
    }

    for (position, pair) in blocks.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        is_valid_next_block(prev, next, position + 1, validator)?;
    }

    Ok(())
}

/// true if the chain is internally consistent
pub fn is_valid_chain(blocks: &[Block], validator: &impl Validator) -> bool {
    match check_chain(blocks, validator) {
        Ok(()) => true,
        Err(e) => {
            warn!("chain rejected: {e}");
            false
        }
    }
}

fn is_valid_next_block(
    prev: &Block,
    next: &Block,
    position: usize,
    validator: &impl Validator,
) -> Result<(), ChainError> {
    if next.index != prev.index + 1 {
        return Err(ChainError::IndexMismatch {
            position,
            expected: prev.index + 1,
            found: next.index,
        });
    }

    if next.previous_hash != prev.calculate_hash() {
        return Err(ChainError::BrokenLink { index: next.index });
    }

    if !validator.verify(prev.proof, next.proof) {
        return Err(ChainError::InvalidProof {
            index: next.index,
            proof: next.proof,
        });
    }

    Ok(())
}
