use bridge_core::BridgeError;
use thiserror::Error;

/// Client-side orchestration errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A precondition token account does not exist yet. Recoverable:
    /// create the account, then retry the transfer.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// The RPC endpoint rejected the submission. Surfaced verbatim; no
    /// internal retry.
    #[error("submission rejected: {0}")]
    SubmissionRejected(String),

    /// Any other RPC failure (transport, malformed response).
    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("keyfile error: {0}")]
    Keyfile(String),

    #[error("config error: {0}")]
    Config(String),

    /// Encoding, derivation, or signing failure from the protocol core.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
