//! Address handling and program-derived address (PDA) computation.
//!
//! Wallet addresses are Base58-encoded 32-byte Ed25519 public keys. The
//! bridge itself is addressed through a PDA: a deterministic, keyless
//! address computed from the bridge program id and a fixed seed. A PDA is
//! valid only if it is NOT a point on the Ed25519 curve, which is what the
//! bump search below guarantees.

use sha2::{Digest, Sha256};

use crate::error::BridgeError;

// ---------------------------------------------------------------------------
// Well-known program ids
// ---------------------------------------------------------------------------

/// The System Program: 32 zero bytes (`11111111111111111111111111111111`).
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// SPL Token Program: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`.
pub const TOKEN_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
];

/// Associated Token Account Program: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: [u8; 32] = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
];

/// Seed string for the bridge's own PDA. Shared with the on-chain program;
/// changing it derives a different address and orphans the deployed state.
pub const BRIDGE_SEED: &[u8] = b"SisuBridge";

/// Domain-separation tag appended to every PDA hash input.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

// ---------------------------------------------------------------------------
// Base58 helpers
// ---------------------------------------------------------------------------

/// Decode a Base58 address string into its 32-byte form.
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], BridgeError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| BridgeError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        BridgeError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}

/// Encode 32 bytes as a Base58 address string.
pub fn bytes_to_address(bytes: &[u8; 32]) -> String {
    bs58::encode(bytes).into_string()
}

/// Validate an address string without keeping the decoded bytes.
///
/// A valid address is Base58 that decodes to exactly 32 bytes. Returns
/// `Ok(true)` when valid, or the decoding error otherwise.
pub fn validate_address(address: &str) -> Result<bool, BridgeError> {
    address_to_bytes(address).map(|_| true)
}

// ---------------------------------------------------------------------------
// PDA derivation
// ---------------------------------------------------------------------------

/// Find the program-derived address and canonical bump for `seeds`.
///
/// Walks bump candidates from 255 down to 0, hashing
/// `seeds || [bump] || program_id || "ProgramDerivedAddress"` with SHA-256,
/// and returns the first candidate that is off the Ed25519 curve. The
/// returned bump is therefore the highest valid one, matching what the
/// ledger runtime recomputes on-chain.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<([u8; 32], u8), BridgeError> {
    for bump in (0u8..=255).rev() {
        if let Some(address) = try_create_program_address(seeds, bump, program_id) {
            return Ok((address, bump));
        }
    }

    Err(BridgeError::DerivationExhausted)
}

/// Compute the PDA candidate for one specific bump.
///
/// Returns `None` when the hash lands ON the curve, i.e. the bump is not
/// usable and the search must continue.
pub fn try_create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &[u8; 32],
) -> Option<[u8; 32]> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return None;
    }

    Some(hash)
}

/// Derive the bridge program's own state PDA from the fixed seed.
pub fn derive_bridge_address(program_id: &[u8; 32]) -> Result<([u8; 32], u8), BridgeError> {
    find_program_address(&[BRIDGE_SEED], program_id)
}

/// Derive the associated token account for a wallet + mint pair.
///
/// Seeds are `[wallet, token_program, mint]` against the Associated Token
/// Account program. The bridge PDA itself can be the "wallet" here: its
/// token vault is the ATA owned by the PDA.
pub fn derive_associated_token_address(
    wallet: &[u8; 32],
    mint: &[u8; 32],
) -> Result<[u8; 32], BridgeError> {
    find_program_address(
        &[wallet.as_ref(), &TOKEN_PROGRAM_ID, mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Check whether 32 bytes decompress to a valid Ed25519 curve point.
fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
