//! The opaque RPC collaborator.
//!
//! The client never speaks JSON-RPC itself; it only needs the four calls
//! below. Implementations own transport, deadlines, and retry policy —
//! none of that lives here. Tests satisfy the trait with an in-memory
//! mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Finality guarantee requested for reads and submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

/// The slice of on-chain account state the client cares about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub lamports: u64,
    pub owner: [u8; 32],
    pub data: Vec<u8>,
}

/// A recent block anchor for transaction construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestBlockhash {
    pub blockhash: [u8; 32],
    pub last_valid_block_height: u64,
}

/// Options forwarded with `send_transaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: Commitment,
}

/// A token account balance in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    pub amount: u64,
    pub decimals: u8,
}

/// The external ledger endpoint, as the orchestrator sees it.
#[async_trait]
pub trait RpcClient {
    /// Fetch account state, or `None` if the account does not exist at the
    /// requested commitment level.
    async fn get_account_info(
        &self,
        pubkey: &[u8; 32],
        commitment: Commitment,
    ) -> Result<Option<AccountInfo>, ClientError>;

    async fn get_latest_blockhash(
        &self,
        commitment: Commitment,
    ) -> Result<LatestBlockhash, ClientError>;

    /// Submit wire bytes. Rejections surface as
    /// [`ClientError::SubmissionRejected`] with the endpoint's message.
    async fn send_transaction(
        &self,
        wire: &[u8],
        options: SendOptions,
    ) -> Result<String, ClientError>;

    async fn get_token_account_balance(
        &self,
        pubkey: &[u8; 32],
    ) -> Result<TokenAmount, ClientError>;
}
