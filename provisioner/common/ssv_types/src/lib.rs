pub use committee::{Committee, MAX_OPERATORS, MIN_OPERATORS};
pub use deposit::{DepositBytes, DepositData};
pub use operator::{Operator, OperatorId};
pub use share::{KeyShareSet, RegistrationPayload, Share};
pub use util::{prefix_hex, validate_operators};
mod committee;
mod deposit;
mod operator;
mod share;
mod util;
