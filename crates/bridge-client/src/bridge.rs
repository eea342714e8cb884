//! The submission orchestrator.
//!
//! One method per bridge opcode. Each call is strictly sequential —
//! derive, build, compile, sign, submit — and owns all of its state, so
//! concurrent calls sharing a client are safe. No retries and no
//! deadlines here; that is the RPC implementation's job. On any failure
//! the in-progress transaction is simply dropped.

use bridge_core::codec::{TransferInData, TransferOutData};
use bridge_core::transaction::{compile_message, Keypair, Transaction};
use bridge_core::{bytes_to_address, derive_bridge_address, instruction, Instruction};
use tracing::{debug, info};

use crate::config::BridgeConfig;
use crate::error::ClientError;
use crate::rpc::{Commitment, RpcClient, SendOptions, TokenAmount};

/// Send options used for every bridge submission, mirroring the deployment
/// scripts this client replaces.
const SEND_OPTIONS: SendOptions = SendOptions {
    skip_preflight: true,
    preflight_commitment: Commitment::Confirmed,
};

/// High-level client for one bridge deployment.
pub struct BridgeClient<R> {
    config: BridgeConfig,
    rpc: R,
}

impl<R: RpcClient> BridgeClient<R> {
    pub fn new(config: BridgeConfig, rpc: R) -> Self {
        BridgeClient { config, rpc }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The bridge state PDA for this deployment's program id.
    pub fn bridge_pda(&self) -> Result<([u8; 32], u8), ClientError> {
        let (pda, bump) = derive_bridge_address(&self.config.bridge_program_id)?;
        debug!(pda = %bytes_to_address(&pda), bump, "derived bridge pda");
        Ok((pda, bump))
    }

    /// Create the bridge state PDA. Returns `Ok(None)` when the account
    /// already exists (nothing submitted), `Ok(Some(txid))` otherwise.
    pub async fn initialize(&self, fee_payer: &Keypair) -> Result<Option<String>, ClientError> {
        let (pda, _bump) = self.bridge_pda()?;

        if self.account_exists(&pda).await? {
            info!(pda = %bytes_to_address(&pda), "bridge pda already initialized");
            return Ok(None);
        }

        let ix = instruction::initialize(self.config.bridge_program_id, fee_payer.pubkey(), pda);
        self.submit(ix, fee_payer).await.map(Some)
    }

    /// Lock tokens into the bridge vault for release on the remote chain.
    ///
    /// Preconditions checked before anything is signed or sent: the sender
    /// and bridge token accounts must already exist.
    pub async fn transfer_out(
        &self,
        fee_payer: &Keypair,
        data: &TransferOutData,
    ) -> Result<String, ClientError> {
        self.require_account(&self.config.owner_token_account).await?;
        self.require_account(&self.config.bridge_token_account).await?;

        let (pda, _bump) = self.bridge_pda()?;
        let ix = instruction::transfer_out(
            self.config.bridge_program_id,
            fee_payer.pubkey(),
            self.config.owner_token_account,
            self.config.bridge_token_account,
            pda,
            data,
        )?;

        self.submit(ix, fee_payer).await
    }

    /// Release vault tokens to a receiver on this chain.
    ///
    /// Preconditions: the bridge vault and the receiver token account must
    /// already exist.
    pub async fn transfer_in(
        &self,
        fee_payer: &Keypair,
        data: &TransferInData,
        receiver_token_account: [u8; 32],
    ) -> Result<String, ClientError> {
        self.require_account(&self.config.bridge_token_account).await?;
        self.require_account(&receiver_token_account).await?;

        let (pda, _bump) = self.bridge_pda()?;
        let ix = instruction::transfer_in(
            self.config.bridge_program_id,
            fee_payer.pubkey(),
            pda,
            self.config.bridge_token_account,
            receiver_token_account,
            data,
        )?;

        self.submit(ix, fee_payer).await
    }

    /// Balance of a token account, in base units.
    pub async fn token_balance(&self, account: &[u8; 32]) -> Result<TokenAmount, ClientError> {
        self.rpc.get_token_account_balance(account).await
    }

    async fn account_exists(&self, pubkey: &[u8; 32]) -> Result<bool, ClientError> {
        Ok(self
            .rpc
            .get_account_info(pubkey, Commitment::Confirmed)
            .await?
            .is_some())
    }

    async fn require_account(&self, pubkey: &[u8; 32]) -> Result<(), ClientError> {
        if !self.account_exists(pubkey).await? {
            return Err(ClientError::AccountNotFound(bytes_to_address(pubkey)));
        }
        Ok(())
    }

    /// Compile, sign, and submit one instruction with the fee payer as the
    /// sole signer.
    async fn submit(&self, ix: Instruction, fee_payer: &Keypair) -> Result<String, ClientError> {
        let anchor = self.rpc.get_latest_blockhash(Commitment::Finalized).await?;

        let message = compile_message(&[ix], &fee_payer.pubkey(), &anchor.blockhash)?;
        let mut tx = Transaction::new(message);
        tx.sign(&[fee_payer])?;
        let wire = tx.finalize()?;

        let txid = self.rpc.send_transaction(&wire, SEND_OPTIONS).await?;
        info!(
            %txid,
            url = %self.config.network.tx_url(&txid),
            "transaction submitted"
        );
        Ok(txid)
    }
}
