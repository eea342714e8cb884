//! Bridge instruction construction.
//!
//! Every bridge instruction is framed as a single opcode byte followed by
//! the schema-encoded payload:
//!
//! ```text
//! byte 0:     opcode (0 = Initialize, 1 = TransferOut, 2 = TransferIn)
//! bytes 1..:  payload (see codec module)
//! ```
//!
//! ACCOUNT ORDER IS PART OF THE PROTOCOL. The on-chain program indexes its
//! accounts positionally and has no way to report "wrong account order"
//! other than a generic failure, so the per-opcode builders below are the
//! only supported way to assemble these instructions.

use crate::address::{SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use crate::codec::{Schema, TransferInData, TransferOutData};
use crate::error::BridgeError;

/// Single-byte discriminator selecting the bridge operation.
///
/// The numeric values are shared with the on-chain program; changing them
/// breaks wire compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Initialize = 0,
    TransferOut = 1,
    TransferIn = 2,
}

impl Opcode {
    /// The payload schema for this opcode. `Initialize` carries no payload,
    /// which is expressed as an empty schema.
    pub fn schema(self) -> Schema {
        match self {
            Opcode::Initialize => Schema::new(&[]),
            Opcode::TransferOut => TransferOutData::schema(),
            Opcode::TransferIn => TransferInData::schema(),
        }
    }
}

/// One account reference in an instruction: who, and with what access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn signer(pubkey: [u8; 32]) -> Self {
        AccountMeta {
            pubkey,
            is_signer: true,
            is_writable: false,
        }
    }

    pub fn writable(pubkey: [u8; 32]) -> Self {
        AccountMeta {
            pubkey,
            is_signer: false,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: [u8; 32]) -> Self {
        AccountMeta {
            pubkey,
            is_signer: false,
            is_writable: false,
        }
    }
}

/// An instruction ready for message compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Frame `payload` under `opcode` against an explicit account list.
///
/// Pure and deterministic. The caller owns the account order; prefer the
/// per-opcode builders below which encode the documented orders.
pub fn build_instruction(
    program_id: [u8; 32],
    opcode: Opcode,
    payload: &[u8],
    accounts: Vec<AccountMeta>,
) -> Instruction {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(opcode as u8);
    data.extend_from_slice(payload);

    Instruction {
        program_id,
        accounts,
        data,
    }
}

/// Build the `Initialize` instruction that creates the bridge state PDA.
///
/// Accounts: `[fee payer (signer), bridge PDA (writable), system program]`.
pub fn initialize(program_id: [u8; 32], fee_payer: [u8; 32], bridge_pda: [u8; 32]) -> Instruction {
    build_instruction(
        program_id,
        Opcode::Initialize,
        &[],
        vec![
            AccountMeta::signer(fee_payer),
            AccountMeta::writable(bridge_pda),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID),
        ],
    )
}

/// Build the `TransferOut` instruction moving tokens into the bridge vault.
///
/// Accounts: `[fee payer (signer), token program, sender token account
/// (writable), bridge token account (writable), bridge PDA (writable)]`.
pub fn transfer_out(
    program_id: [u8; 32],
    fee_payer: [u8; 32],
    sender_token_account: [u8; 32],
    bridge_token_account: [u8; 32],
    bridge_pda: [u8; 32],
    data: &TransferOutData,
) -> Result<Instruction, BridgeError> {
    let payload = data.encode()?;
    Ok(build_instruction(
        program_id,
        Opcode::TransferOut,
        &payload,
        vec![
            AccountMeta::signer(fee_payer),
            AccountMeta::readonly(TOKEN_PROGRAM_ID),
            AccountMeta::writable(sender_token_account),
            AccountMeta::writable(bridge_token_account),
            AccountMeta::writable(bridge_pda),
        ],
    ))
}

/// Build the `TransferIn` instruction releasing tokens from the vault.
///
/// Accounts: `[fee payer (signer), token program, bridge PDA (read-only),
/// bridge token account (writable), receiver token account (writable)]`.
pub fn transfer_in(
    program_id: [u8; 32],
    fee_payer: [u8; 32],
    bridge_pda: [u8; 32],
    bridge_token_account: [u8; 32],
    receiver_token_account: [u8; 32],
    data: &TransferInData,
) -> Result<Instruction, BridgeError> {
    let payload = data.encode()?;
    Ok(build_instruction(
        program_id,
        Opcode::TransferIn,
        &payload,
        vec![
            AccountMeta::signer(fee_payer),
            AccountMeta::readonly(TOKEN_PROGRAM_ID),
            AccountMeta::readonly(bridge_pda),
            AccountMeta::writable(bridge_token_account),
            AccountMeta::writable(receiver_token_account),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transfer_out() -> TransferOutData {
        TransferOutData {
            amount: 900,
            token_address: "0x1234".into(),
            chain_id: 123,
            recipient: "someone".into(),
        }
    }

    #[test]
    fn opcode_values_are_stable() {
        assert_eq!(Opcode::Initialize as u8, 0);
        assert_eq!(Opcode::TransferOut as u8, 1);
        assert_eq!(Opcode::TransferIn as u8, 2);
    }

    #[test]
    fn opcode_schema_mapping() {
        assert!(Opcode::Initialize.schema().fields().is_empty());
        assert_eq!(Opcode::TransferOut.schema(), TransferOutData::schema());
        assert_eq!(Opcode::TransferIn.schema(), TransferInData::schema());
    }

    #[test]
    fn data_starts_with_opcode_byte() {
        let data = sample_transfer_out();
        let payload = data.encode().unwrap();
        let ix = transfer_out([9; 32], [1; 32], [2; 32], [3; 32], [4; 32], &data).unwrap();

        assert_eq!(ix.data[0], 1);
        assert_eq!(&ix.data[1..], payload.as_slice());
    }

    #[test]
    fn initialize_data_is_single_opcode_byte() {
        let ix = initialize([9; 32], [1; 32], [2; 32]);
        assert_eq!(ix.data, vec![0]);
    }

    #[test]
    fn initialize_account_order() {
        let fee_payer = [1u8; 32];
        let pda = [2u8; 32];
        let ix = initialize([9; 32], fee_payer, pda);

        assert_eq!(ix.accounts.len(), 3);
        assert_eq!(ix.accounts[0].pubkey, fee_payer);
        assert!(ix.accounts[0].is_signer);
        assert!(!ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, pda);
        assert!(ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, SYSTEM_PROGRAM_ID);
        assert!(!ix.accounts[2].is_writable);
    }

    #[test]
    fn transfer_out_account_order() {
        let ix = transfer_out(
            [9; 32],
            [1; 32],
            [2; 32],
            [3; 32],
            [4; 32],
            &sample_transfer_out(),
        )
        .unwrap();

        let pubkeys: Vec<[u8; 32]> = ix.accounts.iter().map(|a| a.pubkey).collect();
        assert_eq!(
            pubkeys,
            vec![[1; 32], TOKEN_PROGRAM_ID, [2; 32], [3; 32], [4; 32]]
        );
        // Only the fee payer signs; token accounts and the PDA are writable.
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts.iter().skip(1).all(|a| !a.is_signer));
        assert!(ix.accounts[2].is_writable);
        assert!(ix.accounts[3].is_writable);
        assert!(ix.accounts[4].is_writable);
    }

    #[test]
    fn transfer_in_account_order() {
        let data = TransferInData {
            nonce: 1,
            amounts: vec![5],
        };
        let ix = transfer_in([9; 32], [1; 32], [4; 32], [3; 32], [5; 32], &data).unwrap();

        let pubkeys: Vec<[u8; 32]> = ix.accounts.iter().map(|a| a.pubkey).collect();
        assert_eq!(
            pubkeys,
            vec![[1; 32], TOKEN_PROGRAM_ID, [4; 32], [3; 32], [5; 32]]
        );
        // The PDA is read-only for TransferIn, unlike TransferOut.
        assert!(!ix.accounts[2].is_writable);
        assert!(ix.accounts[3].is_writable);
        assert!(ix.accounts[4].is_writable);
    }

    #[test]
    fn transfer_out_payload_matches_reference_encoding() {
        // amount=900 u64 LE | len=6 "0x1234" | chain=123 u64 LE | len=7 "someone"
        let ix = transfer_out(
            [9; 32],
            [1; 32],
            [2; 32],
            [3; 32],
            [4; 32],
            &sample_transfer_out(),
        )
        .unwrap();

        assert_eq!(
            hex::encode(&ix.data),
            "01\
             8403000000000000\
             06000000307831323334\
             7b00000000000000\
             07000000736f6d656f6e65"
        );
    }

    #[test]
    fn build_instruction_is_deterministic() {
        let accounts = vec![AccountMeta::signer([1; 32])];
        let a = build_instruction([9; 32], Opcode::TransferIn, &[1, 2, 3], accounts.clone());
        let b = build_instruction([9; 32], Opcode::TransferIn, &[1, 2, 3], accounts);
        assert_eq!(a, b);
    }
}
