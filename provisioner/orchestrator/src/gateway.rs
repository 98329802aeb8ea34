use crate::error::GatewayError;
use ssv_types::{DepositData, RegistrationPayload};
use std::future::Future;

/// Submits validator deposits. Resolves once the transaction is confirmed, so consecutive
/// submissions from one signing account never race.
pub trait ChainDepositGateway {
    fn deposit(&self, deposit: &DepositData) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// Registers validators and their key shares with the DVT network. Resolves once the
/// transaction is confirmed.
pub trait ChainRegistrationGateway {
    fn register(
        &self,
        registration: &RegistrationPayload,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;
}
