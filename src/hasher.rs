//! Canonical block serialization and the SHA-256 digest built on top of it.
//!
//! Block hashes anchor the whole chain, so the bytes that get hashed are
//! written out explicitly here instead of relying on whatever field order a
//! generic serializer happens to produce. Keys appear in lexicographic order
//! at every level and no whitespace is emitted:
//!
//! `{"index":2,"previous_hash":"..","proof":35293,"timestamp":1506057125,"transactions":[{"amount":1,"recipient":"..","sender":"0"}]}`

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::Write;

use crate::block::Block;
use crate::transaction::Transaction;

/// lowercase hex sha256 of `data`, always 64 characters
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);

    hex::encode(hasher.finalize())
}

/// digest of a block over its canonical serialization
pub fn digest(block: &Block) -> String {
    sha256_hex(canonical_json(block))
}

pub fn canonical_json(block: &Block) -> String {
    let mut out = String::with_capacity(128 + block.transactions.len() * 96);

    out.push_str("{\"index\":");
    out.push_str(&block.index.to_string());
    out.push_str(",\"previous_hash\":");
    push_str_literal(&mut out, &block.previous_hash);
    out.push_str(",\"proof\":");
    out.push_str(&block.proof.to_string());
    out.push_str(",\"timestamp\":");
    out.push_str(&block.timestamp.to_string());
    out.push_str(",\"transactions\":[");
    for (i, tx) in block.transactions.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_transaction(&mut out, tx);
    }
    out.push_str("]}");

    out
}

fn push_transaction(out: &mut String, tx: &Transaction) {
    // writing into a String cannot fail
    let _ = write!(out, "{{\"amount\":{},\"recipient\":", tx.amount);
    push_str_literal(out, &tx.recipient);
    out.push_str(",\"sender\":");
    push_str_literal(out, &tx.sender);
    out.push('}');
}

fn push_str_literal(out: &mut String, s: &str) {
    out.push_str(&Value::String(s.to_owned()).to_string());
}
