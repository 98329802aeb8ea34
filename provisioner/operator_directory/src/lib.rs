//! Discovery of the operators that can hold key shares, and their grouping into committees.
//!
//! Operators are fetched once per provisioning run from an [`OperatorRegistry`], ordered by
//! ascending id, then cut into fixed-size committees with [`partition_into_committees`]. A
//! [`CommitteeSelection`] decides which committee each validator of the run is assigned to.

pub use error::DirectoryError;
pub use partition::partition_into_committees;
pub use registry::{
    Config, HttpOperatorRegistry, OperatorRegistry, DEFAULT_PER_PAGE, DEFAULT_REGISTRY_URL,
};
pub use selection::CommitteeSelection;

mod error;
mod partition;
mod registry;
mod selection;
