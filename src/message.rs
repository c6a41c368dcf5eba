//! JSON bodies exchanged with clients and peers.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::peer::PeerAddr;
use crate::transaction::Transaction;

/// What `GET /chain` returns; also what we expect back when polling peers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChainPayload {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MinedBlock {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl From<Block> for MinedBlock {
    fn from(block: Block) -> Self {
        Self {
            message: String::from("New Block Forged"),
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SubmitResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RegisterResponse {
    pub message: String,
    pub total_nodes: Vec<PeerAddr>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResolveResponse {
    pub message: String,
    pub replaced: bool,
    #[serde(rename = "new_chain")]
    pub chain: Vec<Block>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_payload_shape() {
        let payload = ChainPayload {
            chain: vec![Block::get_genesis()],
            length: 1,
        };

        let json: serde_json::Value = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["length"], 1);
        assert_eq!(json["chain"][0]["index"], 1);
        assert_eq!(json["chain"][0]["previous_hash"], "1");
        assert_eq!(json["chain"][0]["proof"], 100);
    }

    #[test]
    fn test_resolve_response_shape() {
        let res = ResolveResponse {
            message: String::from("Our chain was replaced"),
            replaced: true,
            chain: vec![Block::get_genesis()],
        };

        let json: serde_json::Value = serde_json::to_value(&res).unwrap();

        assert_eq!(json["replaced"], true);
        assert_eq!(json["new_chain"][0]["index"], 1);
        assert!(json.get("chain").is_none());
    }

    #[test]
    fn test_chain_payload_missing_field() {
        assert!(serde_json::from_str::<ChainPayload>(r#"{"length":1}"#).is_err());
    }
}
