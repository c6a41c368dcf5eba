use log::debug;

use crate::hasher::sha256_hex;
use crate::validator::Validator;

pub const DEFAULT_DIFFICULTY: usize = 4;
/// A SHA-256 hex digest has 64 characters, so no proof can beat this.
pub const MAX_DIFFICULTY: usize = 64;

/// Proof of work over the previous proof: find `p` such that
/// `sha256(format!("{last_proof}{p}"))` starts with `difficulty` hex zeros.
///
/// The puzzle input is the two proofs written in decimal and concatenated with
/// no separator. Every node must agree on this encoding, otherwise no proof
/// mined elsewhere would verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowValidator {
    difficulty: usize,
}

impl PowValidator {
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    pub fn guess_hash(last_proof: u64, proof: u64) -> String {
        sha256_hex(format!("{last_proof}{proof}"))
    }

    fn has_valid_hash(&self, hash: &str) -> bool {
        hash.len() >= self.difficulty && hash.bytes().take(self.difficulty).all(|b| b == b'0')
    }
}

impl Default for PowValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl Validator for PowValidator {
    fn verify(&self, last_proof: u64, proof: u64) -> bool {
        self.has_valid_hash(&Self::guess_hash(last_proof, proof))
    }

    fn solve(&self, last_proof: u64) -> u64 {
        let mut proof = 0;
        while !self.verify(last_proof, proof) {
            proof += 1;
        }
        debug!("found proof {proof} for last proof {last_proof}");

        proof
    }
}
