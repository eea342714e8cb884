use thiserror::Error;

/// Errors raised while encoding payloads, deriving addresses, or assembling
/// and signing transactions.
///
/// Everything here is detected synchronously, before any bytes reach the
/// network. All variants are fatal for the current attempt; no partial
/// wire bytes are ever produced.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A payload value does not conform to its declared schema.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// No bump seed in 0..=255 produced an off-curve address. Indicates a
    /// program id / seed combination incompatible with the ledger's rules.
    #[error("no valid bump seed found for the given seeds and program id")]
    DerivationExhausted,

    /// A signature was produced for a key that has no slot in the
    /// transaction's signer table.
    #[error("unknown signer: {0}")]
    UnknownSigner(String),

    /// The signing primitive returned something other than 64 bytes.
    #[error("invalid signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// `finalize` was called while signature slots were still empty.
    #[error("incomplete signatures: {0} slot(s) still empty")]
    IncompleteSignatures(usize),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Message compilation failed (e.g. an instruction references an
    /// account key missing from the account table).
    #[error("message compile error: {0}")]
    CompileError(String),
}
