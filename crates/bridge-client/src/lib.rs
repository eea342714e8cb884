//! Online half of the Sisu bridge client: configuration, key loading, the
//! opaque RPC boundary, and the submission orchestrator.
//!
//! All protocol work (payload encoding, PDA derivation, message
//! compilation, signing) lives in `bridge-core`; this crate only wires
//! those pieces to a ledger endpoint and enforces the per-operation
//! preconditions.

pub mod bridge;
pub mod config;
pub mod error;
pub mod keyfile;
pub mod rpc;

pub use bridge::BridgeClient;
pub use config::{BridgeConfig, Network};
pub use error::ClientError;
pub use keyfile::load_keypair;
pub use rpc::{AccountInfo, Commitment, LatestBlockhash, RpcClient, SendOptions, TokenAmount};
