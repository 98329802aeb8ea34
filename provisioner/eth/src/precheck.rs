use crate::error::PrecheckError;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::transports::Transport;
use std::sync::LazyLock;
use tracing::{info, instrument};

/// The balance that funds a single validator, 32 ETH
pub static VALIDATOR_DEPOSIT_WEI: LazyLock<U256> =
    LazyLock::new(|| U256::from(32u128 * 10u128.pow(18)));

/// The number of validators the pool balance funds. Fails if fewer keystores are prepared.
pub fn validators_to_process(
    pool_balance: U256,
    keystore_count: usize,
) -> Result<usize, PrecheckError> {
    let validators = usize::try_from(pool_balance / *VALIDATOR_DEPOSIT_WEI)
        .map_err(|e| PrecheckError::Misc(format!("Validator count out of range: {e:?}")))?;

    if keystore_count < validators {
        return Err(PrecheckError::InsufficientKeystores {
            validators,
            keystores: keystore_count,
        });
    }
    Ok(validators)
}

/// Read the ether balance of the staking pool
#[instrument(skip(provider))]
pub async fn fetch_pool_balance<T, P>(provider: &P, pool: Address) -> Result<U256, PrecheckError>
where
    T: Transport + Clone,
    P: Provider<T>,
{
    let balance = provider
        .get_balance(pool)
        .await
        .map_err(|e| PrecheckError::RpcError(format!("Failed to fetch pool balance: {e}")))?;
    info!(%balance, "Fetched pool balance");
    Ok(balance)
}
