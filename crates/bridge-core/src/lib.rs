//! Offline protocol core for the Sisu bridge client.
//!
//! Everything needed to construct, encode, and sign bridge transactions
//! without touching the network — and without pulling in `solana-sdk`
//! (which drags in tokio and 200+ transitive dependencies). The ledger's
//! compact wire format is implemented by hand, with `ed25519-dalek` for
//! signing, `curve25519-dalek` for the PDA off-curve check, and `bs58`
//! for addresses.
//!
//! The pipeline per submission attempt: derive the bridge PDA
//! ([`address`]), encode the opcode payload ([`codec`]), build the
//! instruction with its positional account list ([`instruction`]), then
//! compile, sign, and serialize ([`transaction`]).

pub mod address;
pub mod codec;
pub mod error;
pub mod instruction;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{
    address_to_bytes, bytes_to_address, derive_associated_token_address, derive_bridge_address,
    find_program_address, try_create_program_address, validate_address,
    ASSOCIATED_TOKEN_PROGRAM_ID, BRIDGE_SEED, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use codec::{decode, encode, FieldKind, Primitive, Schema, TransferInData, TransferOutData, Value};
pub use error::BridgeError;
pub use instruction::{
    build_instruction, initialize, transfer_in, transfer_out, AccountMeta, Instruction, Opcode,
};
pub use transaction::{
    compile_message, decode_compact_u16, encode_compact_u16, CompiledInstruction, CompiledMessage,
    Keypair, SignatureSlot, Signer, Transaction,
};
