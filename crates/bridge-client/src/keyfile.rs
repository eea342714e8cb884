//! Secret key loading in the Solana CLI `id.json` format: a JSON array of
//! 64 bytes, the Ed25519 seed followed by the public key.

use std::fs;
use std::path::Path;

use bridge_core::Keypair;
use zeroize::Zeroize;

use crate::error::ClientError;

/// Load a keypair from an `id.json`-style secret key file.
///
/// The trailing 32 bytes (the recorded public key) are checked against the
/// key derived from the seed, which catches truncated or hand-edited
/// files. All intermediate buffers holding key material are zeroized.
pub fn load_keypair(path: &Path) -> Result<Keypair, ClientError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ClientError::Keyfile(format!("{}: {e}", path.display())))?;

    let mut bytes: Vec<u8> = serde_json::from_str(&raw)
        .map_err(|e| ClientError::Keyfile(format!("{}: not a JSON byte array: {e}", path.display())))?;

    if bytes.len() != 64 {
        let len = bytes.len();
        bytes.zeroize();
        return Err(ClientError::Keyfile(format!(
            "{}: expected 64 bytes, got {len}",
            path.display()
        )));
    }

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes[..32]);
    let keypair = Keypair::from_seed(&seed);
    seed.zeroize();

    let recorded_pubkey = &bytes[32..];
    let matches = keypair.pubkey().as_slice() == recorded_pubkey;
    bytes.zeroize();

    if !matches {
        return Err(ClientError::Keyfile(format!(
            "{}: public key half does not match the seed",
            path.display()
        )));
    }

    Ok(keypair)
}
