//! Transaction message compilation, signing, and wire serialization.
//!
//! The ledger's wire format, built entirely by hand:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        program_id_index u8 | account indices | data
//! ```
//!
//! Signing deliberately bypasses any wallet-style "sign and auto-detect
//! accounts" helper: each required signer is a bare [`Signer`] capability
//! (public key + raw Ed25519 signature), and each produced signature is
//! spliced into the slot whose recorded public key matches. This is what
//! lets a freshly generated key with no wallet registration co-sign a
//! transaction.

use ed25519_dalek::Signer as DalekSigner;
use zeroize::Zeroize;

use crate::address::bytes_to_address;
use crate::error::BridgeError;
use crate::instruction::Instruction;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` in the ledger's compact-u16 format.
///
/// - 0..=0x7f      -> 1 byte
/// - 0x80..=0x3fff -> 2 bytes
/// - above         -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value from the front of `data`.
///
/// Returns `(value, bytes_consumed)`. Fails if the data ends mid-value or
/// the encoded value does not fit in a `u16`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), BridgeError> {
    let mut value: u32 = 0;
    let mut shift = 0u32;
    let mut consumed = 0usize;

    loop {
        let Some(&byte) = data.get(consumed) else {
            return Err(BridgeError::SchemaMismatch(
                "truncated compact-u16".into(),
            ));
        };
        consumed += 1;

        value |= ((byte & 0x7f) as u32) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            break;
        }
        // Three bytes cover the full u16 range.
        if consumed >= 3 {
            break;
        }
    }

    if value > u16::MAX as u32 {
        return Err(BridgeError::SchemaMismatch("compact-u16 overflow".into()));
    }

    Ok((value as u16, consumed))
}

// ---------------------------------------------------------------------------
// Signer capability
// ---------------------------------------------------------------------------

/// A raw asymmetric-key signing capability.
///
/// Anything that can state its public key and produce a detached Ed25519
/// signature over arbitrary bytes satisfies this: an in-memory keypair, a
/// key loaded from disk, or a hardware-backed key.
pub trait Signer {
    fn pubkey(&self) -> [u8; 32];

    /// Sign `message`, returning the detached signature bytes. A correct
    /// implementation returns exactly 64 bytes; the transaction layer
    /// verifies this before splicing.
    fn try_sign(&self, message: &[u8]) -> Result<Vec<u8>, BridgeError>;
}

/// An in-memory Ed25519 keypair.
#[derive(Debug)]
pub struct Keypair {
    signing_key: ed25519_dalek::SigningKey,
}

impl Keypair {
    /// Construct from a 32-byte Ed25519 seed. The local copy of the seed is
    /// zeroized once the signing key is built.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut seed = *seed;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&seed);
        seed.zeroize();
        Keypair { signing_key }
    }

    pub fn pubkey(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl Signer for Keypair {
    fn pubkey(&self) -> [u8; 32] {
        Keypair::pubkey(self)
    }

    fn try_sign(&self, message: &[u8]) -> Result<Vec<u8>, BridgeError> {
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}

// ---------------------------------------------------------------------------
// Message compilation
// ---------------------------------------------------------------------------

/// An instruction with account references replaced by indices into the
/// message's account table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// A compiled, signable transaction message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledMessage {
    /// All account keys, in canonical order: writable signers (fee payer
    /// first), read-only signers, writable non-signers, read-only
    /// non-signers.
    pub account_keys: Vec<[u8; 32]>,
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

impl CompiledMessage {
    /// The unique signer addresses, fee payer first, in first-seen order.
    pub fn required_signers(&self) -> &[[u8; 32]] {
        &self.account_keys[..self.num_required_signatures as usize]
    }

    /// Serialize into the canonical signable byte form. Identical messages
    /// serialize to identical bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);

        buf.extend_from_slice(&encode_compact_u16(self.account_keys.len() as u16));
        for key in &self.account_keys {
            buf.extend_from_slice(key);
        }

        buf.extend_from_slice(&self.recent_blockhash);

        buf.extend_from_slice(&encode_compact_u16(self.instructions.len() as u16));
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            buf.extend_from_slice(&encode_compact_u16(ix.account_indices.len() as u16));
            buf.extend_from_slice(&ix.account_indices);
            buf.extend_from_slice(&encode_compact_u16(ix.data.len() as u16));
            buf.extend_from_slice(&ix.data);
        }

        buf
    }
}

/// Compile instructions into a signable message.
///
/// Account keys are deduplicated by address with signer/writable bits
/// OR-merged, then ordered canonically with the fee payer pinned at index
/// 0. Compiling the same inputs twice yields byte-identical messages.
pub fn compile_message(
    instructions: &[Instruction],
    fee_payer: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<CompiledMessage, BridgeError> {
    struct Entry {
        pubkey: [u8; 32],
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<Entry> = Vec::new();

    let mut upsert = |pubkey: [u8; 32], signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(Entry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    // Fee payer is always the first signer and pays rent, hence writable.
    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program ids are read-only non-signers.
        upsert(ix.program_id, false, false);
    }

    // Stable sort keeps first-seen order within each category, so the fee
    // payer stays at index 0 among writable signers.
    fn rank(e: &Entry) -> u8 {
        match (e.is_signer, e.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
    entries.sort_by_key(rank);

    // Instruction account references are single-byte indices.
    if entries.len() > 256 {
        return Err(BridgeError::CompileError(format!(
            "too many accounts: {} exceed the 256-entry table",
            entries.len()
        )));
    }

    let num_required_signatures = entries.iter().filter(|e| e.is_signer).count();
    if num_required_signatures > u8::MAX as usize {
        return Err(BridgeError::CompileError("too many signers".into()));
    }
    let num_readonly_signed = entries
        .iter()
        .filter(|e| e.is_signer && !e.is_writable)
        .count() as u8;
    let num_readonly_unsigned = entries
        .iter()
        .filter(|e| !e.is_signer && !e.is_writable)
        .count() as u8;

    let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = find_index(&account_keys, &ix.program_id)?;

        let mut account_indices = Vec::with_capacity(ix.accounts.len());
        for meta in &ix.accounts {
            account_indices.push(find_index(&account_keys, &meta.pubkey)?);
        }

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(CompiledMessage {
        account_keys,
        num_required_signatures: num_required_signatures as u8,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        instructions: compiled,
    })
}

fn find_index(account_keys: &[[u8; 32]], pubkey: &[u8; 32]) -> Result<u8, BridgeError> {
    account_keys
        .iter()
        .position(|k| k == pubkey)
        .map(|i| i as u8)
        .ok_or_else(|| {
            BridgeError::CompileError(format!(
                "account {} missing from account table",
                bytes_to_address(pubkey)
            ))
        })
}

// ---------------------------------------------------------------------------
// Signature slots
// ---------------------------------------------------------------------------

/// A per-transaction placeholder for one required signature, keyed by
/// public key. Created empty at compile time; filled exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSlot {
    pub pubkey: [u8; 32],
    pub signature: Option<[u8; 64]>,
}

/// A compiled message together with its signature slots.
///
/// Lifecycle: [`Transaction::new`] allocates one empty slot per required
/// signer, [`Transaction::sign`] fills slots by public key, and
/// [`Transaction::finalize`] emits wire bytes once every slot is filled.
pub struct Transaction {
    message: CompiledMessage,
    /// Canonical signable bytes, cached so every signer signs the same
    /// serialization.
    message_bytes: Vec<u8>,
    slots: Vec<SignatureSlot>,
}

impl Transaction {
    pub fn new(message: CompiledMessage) -> Self {
        let message_bytes = message.serialize();
        let slots = message
            .required_signers()
            .iter()
            .map(|pubkey| SignatureSlot {
                pubkey: *pubkey,
                signature: None,
            })
            .collect();

        Transaction {
            message,
            message_bytes,
            slots,
        }
    }

    pub fn message(&self) -> &CompiledMessage {
        &self.message
    }

    /// The exact bytes each signer signs.
    pub fn message_bytes(&self) -> &[u8] {
        &self.message_bytes
    }

    pub fn slots(&self) -> &[SignatureSlot] {
        &self.slots
    }

    /// Sign with each signer and splice the signatures into their slots.
    ///
    /// Signers are deduplicated by public key (first occurrence wins), so
    /// passing the same signer twice is harmless. Fails with
    /// [`BridgeError::UnknownSigner`] if a signer has no slot.
    pub fn sign(&mut self, signers: &[&dyn Signer]) -> Result<(), BridgeError> {
        let mut seen: Vec<[u8; 32]> = Vec::with_capacity(signers.len());

        for signer in signers {
            let pubkey = signer.pubkey();
            if seen.contains(&pubkey) {
                continue;
            }
            seen.push(pubkey);

            let signature = signer.try_sign(&self.message_bytes)?;
            self.add_signature(&pubkey, &signature)?;
        }

        Ok(())
    }

    /// Place a pre-produced signature into the slot recorded for `pubkey`.
    pub fn add_signature(&mut self, pubkey: &[u8; 32], signature: &[u8]) -> Result<(), BridgeError> {
        let signature: [u8; 64] = signature
            .try_into()
            .map_err(|_| BridgeError::InvalidSignatureLength(signature.len()))?;

        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.pubkey == *pubkey)
            .ok_or_else(|| BridgeError::UnknownSigner(bytes_to_address(pubkey)))?;

        slot.signature = Some(signature);
        Ok(())
    }

    /// Emit the final wire bytes: signature count, one 64-byte signature
    /// per slot in slot order, then the message body.
    ///
    /// Fails with [`BridgeError::IncompleteSignatures`] if any slot is
    /// still empty; no partial wire bytes are produced.
    pub fn finalize(&self) -> Result<Vec<u8>, BridgeError> {
        let empty = self.slots.iter().filter(|s| s.signature.is_none()).count();
        if empty > 0 {
            return Err(BridgeError::IncompleteSignatures(empty));
        }

        let mut wire = Vec::with_capacity(1 + 64 * self.slots.len() + self.message_bytes.len());
        wire.extend_from_slice(&encode_compact_u16(self.slots.len() as u16));
        for slot in &self.slots {
            // finalize checked every slot above
            if let Some(signature) = &slot.signature {
                wire.extend_from_slice(signature);
            }
        }
        wire.extend_from_slice(&self.message_bytes);

        Ok(wire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{build_instruction, AccountMeta, Opcode};

    fn keypair(seed: u8) -> Keypair {
        Keypair::from_seed(&[seed; 32])
    }

    fn simple_instruction(program_id: [u8; 32], accounts: Vec<AccountMeta>) -> Instruction {
        build_instruction(program_id, Opcode::Initialize, &[], accounts)
    }

    // -- compact-u16 ---------------------------------------------------------

    #[test]
    fn compact_u16_boundaries() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
        assert_eq!(encode_compact_u16(0x80), vec![0x80, 0x01]);
        assert_eq!(encode_compact_u16(0x3fff), vec![0xff, 0x7f]);
        assert_eq!(encode_compact_u16(0x4000), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode_compact_u16(u16::MAX), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn compact_u16_decode_inverts_encode() {
        for value in [0u16, 1, 0x7f, 0x80, 0x3fff, 0x4000, u16::MAX] {
            let encoded = encode_compact_u16(value);
            assert_eq!(decode_compact_u16(&encoded).unwrap(), (value, encoded.len()));
        }
        // Trailing bytes are left untouched.
        assert_eq!(decode_compact_u16(&[0x80, 0x01, 0xEE]).unwrap(), (0x80, 2));
    }

    #[test]
    fn compact_u16_decode_rejects_truncated_input() {
        assert!(matches!(
            decode_compact_u16(&[]).unwrap_err(),
            BridgeError::SchemaMismatch(_)
        ));
        // Continuation bit set but nothing follows.
        assert!(matches!(
            decode_compact_u16(&[0x80]).unwrap_err(),
            BridgeError::SchemaMismatch(_)
        ));
    }

    #[test]
    fn compact_u16_decode_rejects_overflow() {
        // Three full payload septets encode 0x1fffff, past the u16 range.
        assert!(matches!(
            decode_compact_u16(&[0xff, 0xff, 0x7f]).unwrap_err(),
            BridgeError::SchemaMismatch(_)
        ));
    }

    // -- Compilation ---------------------------------------------------------

    #[test]
    fn fee_payer_is_first_account() {
        let fee_payer = keypair(1).pubkey();
        let ix = simple_instruction([9; 32], vec![AccountMeta::writable([2; 32])]);
        let msg = compile_message(&[ix], &fee_payer, &[0; 32]).unwrap();

        assert_eq!(msg.account_keys[0], fee_payer);
        assert_eq!(msg.num_required_signatures, 1);
    }

    #[test]
    fn duplicate_accounts_merge_permission_bits() {
        let fee_payer = [1u8; 32];
        // Same key appears read-only in one instruction, writable in another.
        let ix_a = simple_instruction([9; 32], vec![AccountMeta::readonly([2; 32])]);
        let ix_b = simple_instruction([9; 32], vec![AccountMeta::writable([2; 32])]);
        let msg = compile_message(&[ix_a, ix_b], &fee_payer, &[0; 32]).unwrap();

        // fee payer, [2;32] (writable after merge), program id.
        assert_eq!(msg.account_keys.len(), 3);
        assert_eq!(msg.num_readonly_unsigned, 1);
    }

    #[test]
    fn canonical_account_ordering() {
        let fee_payer = [1u8; 32];
        let ix = simple_instruction(
            [9; 32],
            vec![
                AccountMeta::readonly([5; 32]),
                AccountMeta::writable([4; 32]),
                AccountMeta {
                    pubkey: [3; 32],
                    is_signer: true,
                    is_writable: false,
                },
            ],
        );
        let msg = compile_message(&[ix], &fee_payer, &[0; 32]).unwrap();

        // writable signer (fee payer), ro signer, writable non-signer,
        // ro non-signers (account then program id, first-seen order).
        assert_eq!(
            msg.account_keys,
            vec![[1; 32], [3; 32], [4; 32], [5; 32], [9; 32]]
        );
        assert_eq!(msg.num_required_signatures, 2);
        assert_eq!(msg.num_readonly_signed, 1);
        assert_eq!(msg.num_readonly_unsigned, 2);
    }

    #[test]
    fn signer_dedup_first_seen_order() {
        let a = [0xAAu8; 32];
        let b = [0xBBu8; 32];
        let ix = simple_instruction(
            [9; 32],
            vec![
                AccountMeta::signer(a),
                AccountMeta::signer(a),
                AccountMeta::signer(b),
            ],
        );
        // Fee payer IS a, so the signer list [a, a, b] must dedup to [a, b].
        let msg = compile_message(&[ix], &a, &[0; 32]).unwrap();

        assert_eq!(msg.required_signers(), &[a, b]);
    }

    #[test]
    fn oversized_account_table_is_rejected() {
        let fee_payer = [1u8; 32];
        // 300 distinct accounts; any index past 255 would silently wrap.
        let accounts: Vec<AccountMeta> = (0u16..300)
            .map(|i| {
                let mut key = [0xFEu8; 32];
                key[..2].copy_from_slice(&i.to_le_bytes());
                AccountMeta::readonly(key)
            })
            .collect();
        let ix = simple_instruction([9; 32], accounts);

        let err = compile_message(&[ix], &fee_payer, &[0; 32]).unwrap_err();
        assert!(matches!(err, BridgeError::CompileError(_)));
    }

    #[test]
    fn compile_is_deterministic() {
        let fee_payer = [1u8; 32];
        let ix = simple_instruction([9; 32], vec![AccountMeta::writable([2; 32])]);
        let a = compile_message(&[ix.clone()], &fee_payer, &[7; 32]).unwrap();
        let b = compile_message(&[ix], &fee_payer, &[7; 32]).unwrap();
        assert_eq!(a.serialize(), b.serialize());
    }

    #[test]
    fn serialized_message_layout() {
        let fee_payer = [1u8; 32];
        let blockhash = [0xCCu8; 32];
        let ix = simple_instruction([9; 32], vec![AccountMeta::writable([2; 32])]);
        let msg = compile_message(&[ix], &fee_payer, &blockhash).unwrap();
        let bytes = msg.serialize();

        assert_eq!(bytes[0], msg.num_required_signatures);
        assert_eq!(bytes[1], msg.num_readonly_signed);
        assert_eq!(bytes[2], msg.num_readonly_unsigned);

        // Blockhash sits after header + compact len + keys.
        let offset = 3 + 1 + 32 * msg.account_keys.len();
        assert_eq!(&bytes[offset..offset + 32], &blockhash);
    }

    #[test]
    fn instruction_indices_point_into_account_table() {
        let fee_payer = [1u8; 32];
        let target = [2u8; 32];
        let program = [9u8; 32];
        let ix = simple_instruction(program, vec![AccountMeta::writable(target)]);
        let msg = compile_message(&[ix], &fee_payer, &[0; 32]).unwrap();

        let cix = &msg.instructions[0];
        assert_eq!(msg.account_keys[cix.program_id_index as usize], program);
        assert_eq!(msg.account_keys[cix.account_indices[0] as usize], target);
    }

    // -- Slots and signing ---------------------------------------------------

    #[test]
    fn slots_are_created_empty_per_required_signer() {
        let payer = keypair(1);
        let extra = keypair(2);
        let ix = simple_instruction([9; 32], vec![AccountMeta::signer(extra.pubkey())]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let tx = Transaction::new(msg);

        assert_eq!(tx.slots().len(), 2);
        assert!(tx.slots().iter().all(|s| s.signature.is_none()));
    }

    #[test]
    fn signature_lands_in_matching_slot_only() {
        let payer = keypair(1);
        let extra = keypair(2);
        let ix = simple_instruction([9; 32], vec![AccountMeta::signer(extra.pubkey())]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let mut tx = Transaction::new(msg);

        tx.sign(&[&extra]).unwrap();

        let payer_slot = tx.slots().iter().find(|s| s.pubkey == payer.pubkey()).unwrap();
        let extra_slot = tx.slots().iter().find(|s| s.pubkey == extra.pubkey()).unwrap();
        assert!(payer_slot.signature.is_none());
        assert!(extra_slot.signature.is_some());
    }

    #[test]
    fn duplicate_signers_are_deduplicated() {
        let payer = keypair(1);
        let ix = simple_instruction([9; 32], vec![]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let mut tx = Transaction::new(msg);

        tx.sign(&[&payer, &payer, &payer]).unwrap();
        assert!(tx.finalize().is_ok());
    }

    #[test]
    fn unknown_signer_is_rejected() {
        let payer = keypair(1);
        let stranger = keypair(7);
        let ix = simple_instruction([9; 32], vec![]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let mut tx = Transaction::new(msg);

        let err = tx.sign(&[&stranger]).unwrap_err();
        assert!(matches!(err, BridgeError::UnknownSigner(_)));
    }

    #[test]
    fn short_signature_is_rejected() {
        struct BrokenSigner {
            inner: Keypair,
        }
        impl Signer for BrokenSigner {
            fn pubkey(&self) -> [u8; 32] {
                self.inner.pubkey()
            }
            fn try_sign(&self, message: &[u8]) -> Result<Vec<u8>, BridgeError> {
                let mut sig = self.inner.try_sign(message)?;
                sig.pop();
                Ok(sig)
            }
        }

        let payer = BrokenSigner { inner: keypair(1) };
        let ix = simple_instruction([9; 32], vec![]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let mut tx = Transaction::new(msg);

        let err = tx.sign(&[&payer]).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidSignatureLength(63)));
    }

    #[test]
    fn finalize_requires_every_slot_filled() {
        let payer = keypair(1);
        let extra = keypair(2);
        let ix = simple_instruction([9; 32], vec![AccountMeta::signer(extra.pubkey())]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let mut tx = Transaction::new(msg);

        // Two required signers, only one slot filled.
        tx.sign(&[&payer]).unwrap();
        let err = tx.finalize().unwrap_err();
        assert!(matches!(err, BridgeError::IncompleteSignatures(1)));

        tx.sign(&[&extra]).unwrap();
        assert!(tx.finalize().is_ok());
    }

    #[test]
    fn wire_bytes_verify_against_signer_pubkey() {
        use ed25519_dalek::{Signature, VerifyingKey};

        let payer = keypair(0x42);
        let ix = simple_instruction([9; 32], vec![AccountMeta::writable([2; 32])]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0xCC; 32]).unwrap();
        let mut tx = Transaction::new(msg);
        tx.sign(&[&payer]).unwrap();
        let wire = tx.finalize().unwrap();

        // compact-u16(1) | 64-byte signature | message.
        assert_eq!(wire[0], 0x01);
        let sig_bytes: [u8; 64] = wire[1..65].try_into().unwrap();
        let signature = Signature::from_bytes(&sig_bytes);
        let message_bytes = &wire[65..];

        let vk = VerifyingKey::from_bytes(&payer.pubkey()).unwrap();
        assert!(vk.verify_strict(message_bytes, &signature).is_ok());
        assert_eq!(message_bytes, tx.message_bytes());
    }

    #[test]
    fn signing_is_deterministic() {
        let payer = keypair(0x55);
        let ix = simple_instruction([9; 32], vec![AccountMeta::writable([2; 32])]);

        let build = || {
            let msg = compile_message(
                &[ix.clone()],
                &payer.pubkey(),
                &[0x99; 32],
            )
            .unwrap();
            let mut tx = Transaction::new(msg);
            tx.sign(&[&payer]).unwrap();
            tx.finalize().unwrap()
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn randomly_generated_keypair_signs_a_transaction() {
        use ed25519_dalek::{Signature, VerifyingKey};
        use rand::RngCore;

        let mut seed = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        let payer = Keypair::from_seed(&seed);

        let mut other_seed = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut other_seed);
        assert_ne!(payer.pubkey(), Keypair::from_seed(&other_seed).pubkey());

        let ix = simple_instruction([9; 32], vec![AccountMeta::writable([2; 32])]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0xAB; 32]).unwrap();
        let mut tx = Transaction::new(msg);
        tx.sign(&[&payer]).unwrap();
        let wire = tx.finalize().unwrap();

        let sig_bytes: [u8; 64] = wire[1..65].try_into().unwrap();
        let vk = VerifyingKey::from_bytes(&payer.pubkey()).unwrap();
        assert!(vk
            .verify_strict(&wire[65..], &Signature::from_bytes(&sig_bytes))
            .is_ok());
    }

    #[test]
    fn two_signer_wire_places_signatures_in_slot_order() {
        let payer = keypair(1);
        let extra = keypair(2);
        let ix = simple_instruction([9; 32], vec![AccountMeta::signer(extra.pubkey())]);
        let msg = compile_message(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let mut tx = Transaction::new(msg);

        // Sign in reverse order; slot order must still be payer first.
        tx.sign(&[&extra, &payer]).unwrap();
        let wire = tx.finalize().unwrap();

        assert_eq!(wire[0], 0x02);
        let payer_sig = tx.slots()[0].signature.unwrap();
        let extra_sig = tx.slots()[1].signature.unwrap();
        assert_eq!(tx.slots()[0].pubkey, payer.pubkey());
        assert_eq!(&wire[1..65], payer_sig.as_slice());
        assert_eq!(&wire[65..129], extra_sig.as_slice());
    }
}
