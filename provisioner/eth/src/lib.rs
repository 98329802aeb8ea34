//! Execution layer integration: the staking pool contract gateway and the health precheck.

pub use error::PrecheckError;
pub use gateway::{DepositCall, RegistrationCall, SsvPoolGateway};
pub use precheck::{fetch_pool_balance, validators_to_process, VALIDATOR_DEPOSIT_WEI};
mod error;
mod gateway;
mod gen;
mod precheck;
