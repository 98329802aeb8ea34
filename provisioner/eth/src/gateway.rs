use crate::gen::StaderSSVStakePool::{self, StaderSSVStakePoolInstance};
use alloy::contract::SolCallBuilder;
use alloy::network::ReceiptResponse;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::Provider;
use alloy::sol_types::{SolCall, SolValue};
use alloy::transports::Transport;
use base64::prelude::*;
use orchestrator::{ChainDepositGateway, ChainRegistrationGateway, GatewayError};
use ssv_types::{DepositData, RegistrationPayload};
use tracing::{debug, info, instrument};

/// Decoded arguments of `depositEthToDepositContract`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositCall {
    pub pubkey: Bytes,
    pub withdrawal_credentials: Bytes,
    pub signature: Bytes,
    pub deposit_data_root: B256,
}

impl TryFrom<&DepositData> for DepositCall {
    type Error = GatewayError;

    fn try_from(deposit: &DepositData) -> Result<Self, Self::Error> {
        let decoded = deposit.decode().map_err(GatewayError::InvalidInput)?;
        Ok(Self {
            pubkey: decoded.pubkey.into(),
            withdrawal_credentials: decoded.withdrawal_credentials.into(),
            signature: decoded.signature.into(),
            deposit_data_root: B256::from(decoded.deposit_data_root),
        })
    }
}

/// Decoded arguments of `registerValidatorToSSVNetwork`, without the fee
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCall {
    pub pubkey: Bytes,
    /// Raw 48 byte share public keys
    pub public_shares: Vec<Bytes>,
    /// ABI encoded strings holding the base64 ciphertext of each share
    pub encrypted_shares: Vec<Bytes>,
    pub operator_ids: Vec<u64>,
}

impl TryFrom<&RegistrationPayload> for RegistrationCall {
    type Error = GatewayError;

    fn try_from(payload: &RegistrationPayload) -> Result<Self, Self::Error> {
        let pubkey = hex::decode(payload.pub_key.trim_start_matches("0x")).map_err(|e| {
            GatewayError::InvalidInput(format!("Validator public key is not hex: {e}"))
        })?;

        let public_shares = payload
            .public_shares
            .iter()
            .map(|share| {
                BASE64_STANDARD.decode(share).map(Bytes::from).map_err(|e| {
                    GatewayError::InvalidInput(format!("Share public key is not base64: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let encrypted_shares = payload
            .encrypted_shares
            .iter()
            .map(|share| Bytes::from(share.abi_encode()))
            .collect();

        Ok(Self {
            pubkey: pubkey.into(),
            public_shares,
            encrypted_shares,
            operator_ids: payload.operator_ids.clone(),
        })
    }
}

/// Submits deposits and registrations through the staking pool contract.
///
/// Every submission waits for its receipt. A reverted transaction is a failure.
#[derive(Clone)]
pub struct SsvPoolGateway<T, P> {
    pool: StaderSSVStakePoolInstance<T, P>,
    ssv_fee: U256,
}

impl<T, P> SsvPoolGateway<T, P>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    /// `ssv_fee` is the amount of SSV token the pool pays the network per registered validator
    pub fn new(pool: Address, provider: P, ssv_fee: U256) -> Self {
        Self {
            pool: StaderSSVStakePool::new(pool, provider),
            ssv_fee,
        }
    }

    pub fn address(&self) -> &Address {
        self.pool.address()
    }

    // Send a call and wait until it is included
    async fn submit<C: SolCall>(
        &self,
        call: SolCallBuilder<T, &P, C>,
        kind: &'static str,
    ) -> Result<(), GatewayError> {
        let pending = call.send().await.map_err(|e| {
            GatewayError::Transport(format!("Failed to send {kind} transaction: {e}"))
        })?;
        let tx_hash = *pending.tx_hash();
        debug!(kind, %tx_hash, "Transaction sent, waiting for receipt");

        let receipt = pending.get_receipt().await.map_err(|e| {
            GatewayError::Transport(format!("Failed to confirm {kind} transaction {tx_hash}: {e}"))
        })?;
        if !receipt.status() {
            return Err(GatewayError::Reverted(format!(
                "{kind} transaction {tx_hash} reverted"
            )));
        }
        info!(kind, %tx_hash, "Transaction confirmed");
        Ok(())
    }
}

impl<T, P> ChainDepositGateway for SsvPoolGateway<T, P>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    #[instrument(skip_all, fields(pubkey = %deposit.pubkey))]
    async fn deposit(&self, deposit: &DepositData) -> Result<(), GatewayError> {
        let call = DepositCall::try_from(deposit)?;
        self.submit(
            self.pool.depositEthToDepositContract(
                call.pubkey,
                call.withdrawal_credentials,
                call.signature,
                call.deposit_data_root,
            ),
            "deposit",
        )
        .await
    }
}

impl<T, P> ChainRegistrationGateway for SsvPoolGateway<T, P>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    #[instrument(skip_all, fields(pubkey = %registration.pub_key))]
    async fn register(&self, registration: &RegistrationPayload) -> Result<(), GatewayError> {
        let call = RegistrationCall::try_from(registration)?;
        self.submit(
            self.pool.registerValidatorToSSVNetwork(
                call.pubkey,
                call.public_shares,
                call.encrypted_shares,
                call.operator_ids,
                self.ssv_fee,
            ),
            "registration",
        )
        .await
    }
}
