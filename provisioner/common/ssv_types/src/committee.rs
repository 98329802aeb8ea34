use crate::{Operator, OperatorId};
use std::collections::HashSet;

/// The maximum number of operators a committee can have
/// https://github.com/ssvlabs/ssv/blob/07095fe31e3ded288af722a9c521117980585d95/eth/eventhandler/validation.go#L15
pub const MAX_OPERATORS: usize = 13;

/// The smallest committee that can tolerate a faulty operator
pub const MIN_OPERATORS: usize = 4;

/// A Committee is an ordered group of Operators acting on behalf of one or more Validators.
///
/// Each member holds exactly one share of every validator key assigned to the committee. The
/// member order is significant: shares are produced and submitted in this order.
#[derive(Debug, Clone)]
pub struct Committee {
    members: Vec<Operator>,
}

impl Committee {
    /// Build a committee from an ordered set of operators. Fails on an empty set or on a
    /// duplicated operator id.
    pub fn new(members: Vec<Operator>) -> Result<Self, String> {
        if members.is_empty() {
            return Err("Committee has no operators".to_string());
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = members.iter().find(|op| !seen.insert(op.id)) {
            return Err(format!(
                "Operator {} appears more than once in the committee",
                duplicate.id
            ));
        }

        Ok(Self { members })
    }

    pub fn members(&self) -> &[Operator] {
        &self.members
    }

    /// Operator ids in committee order
    pub fn operator_ids(&self) -> Vec<OperatorId> {
        self.members.iter().map(|op| op.id).collect()
    }

    pub fn contains(&self, id: &OperatorId) -> bool {
        self.members.iter().any(|op| op.id == *id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The number of faulty operators the committee tolerates
    pub fn fault_tolerance(&self) -> usize {
        self.members.len().saturating_sub(1) / 3
    }

    /// The number of shares needed to reconstruct a validator key
    pub fn threshold(&self) -> usize {
        self.members.len() - self.fault_tolerance()
    }
}
