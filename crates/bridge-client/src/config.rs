//! Client configuration.
//!
//! All addresses and the network selection live in one explicit struct
//! passed to [`crate::BridgeClient`] at construction. Nothing reads
//! ambient globals; `from_env` exists only as a convenience constructor
//! for the `.env`-style surface the deployment tooling emits.

use std::env;
use std::path::PathBuf;

use bridge_core::address_to_bytes;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Which cluster the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Localnet,
    Devnet,
}

impl Network {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Localnet => "http://127.0.0.1:8899",
            Network::Devnet => "https://api.devnet.solana.com",
        }
    }

    /// Explorer URL for a submitted transaction, for console reporting.
    pub fn tx_url(&self, txid: &str) -> String {
        match self {
            Network::Localnet => format!(
                "http://localhost:3000/tx/{txid}?cluster=custom&customUrl=http%3A%2F%2Flocalhost%3A8899"
            ),
            Network::Devnet => {
                format!("https://explorer.solana.com/tx/{txid}?cluster=devnet")
            }
        }
    }
}

/// Everything the bridge client needs to know about one deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// The on-chain bridge program.
    pub bridge_program_id: [u8; 32],
    /// The token mint being bridged.
    pub mint: [u8; 32],
    /// The sender's associated token account.
    pub owner_token_account: [u8; 32],
    /// The bridge PDA's associated token account (the vault).
    pub bridge_token_account: [u8; 32],
    pub network: Network,
    /// Path to the fee payer's secret key file (Solana CLI `id.json`).
    pub keypair_path: PathBuf,
}

impl BridgeConfig {
    /// Read the configuration from environment variables:
    /// `BRIDGE_PROGRAM_ID`, `MINT_PUBKEY`, `OWNER_ATA`, `BRIDGE_ATA`,
    /// `KEYPAIR_PATH`, and optionally `SOLANA_NETWORK` (`localnet` by
    /// default, or `devnet`).
    pub fn from_env() -> Result<Self, ClientError> {
        let network = match env::var("SOLANA_NETWORK") {
            Ok(value) if value == "devnet" => Network::Devnet,
            Ok(value) if value == "localnet" => Network::Localnet,
            Ok(value) => {
                return Err(ClientError::Config(format!("unknown network `{value}`")))
            }
            Err(_) => Network::Localnet,
        };

        Ok(BridgeConfig {
            bridge_program_id: env_address("BRIDGE_PROGRAM_ID")?,
            mint: env_address("MINT_PUBKEY")?,
            owner_token_account: env_address("OWNER_ATA")?,
            bridge_token_account: env_address("BRIDGE_ATA")?,
            network,
            keypair_path: PathBuf::from(env_var("KEYPAIR_PATH")?),
        })
    }
}

fn env_var(name: &str) -> Result<String, ClientError> {
    env::var(name).map_err(|_| ClientError::Config(format!("missing env var `{name}`")))
}

fn env_address(name: &str) -> Result<[u8; 32], ClientError> {
    let value = env_var(name)?;
    address_to_bytes(&value)
        .map_err(|e| ClientError::Config(format!("bad address in `{name}`: {e}")))
}
