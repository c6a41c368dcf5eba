use serde::{Deserialize, Serialize};

use crate::error::TransactionError;

/// sender used by the reward transaction of a freshly mined block
pub const REWARD_SENDER: &str = "0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: u64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    /// the transaction that pays the miner of a block
    pub fn get_reward_tx(recipient: impl Into<String>, amount: u64) -> Self {
        Self::new(REWARD_SENDER, recipient, amount)
    }
}

/// A transaction as submitted by a client, before the required fields are checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRequest {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<u64>,
}

impl TryFrom<TransactionRequest> for Transaction {
    type Error = TransactionError;

    fn try_from(req: TransactionRequest) -> Result<Self, Self::Error> {
        let sender = req.sender.ok_or(TransactionError::MissingField("sender"))?;
        let recipient = req
            .recipient
            .ok_or(TransactionError::MissingField("recipient"))?;
        let amount = req.amount.ok_or(TransactionError::MissingField("amount"))?;

        Ok(Transaction {
            sender,
            recipient,
            amount,
        })
    }
}
