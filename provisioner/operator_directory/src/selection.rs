use serde::{Deserialize, Serialize};
use ssv_types::Committee;

/// Policy deciding which committee a validator is assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitteeSelection {
    /// Every validator of the run uses the committee at this index
    Fixed(usize),
    /// Validators cycle through the committees in order, starting at the first
    RoundRobin,
}

impl Default for CommitteeSelection {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

impl CommitteeSelection {
    /// The committee for the validator at `position` within the run (0 based)
    pub fn select<'a>(&self, committees: &'a [Committee], position: usize) -> Option<&'a Committee> {
        match self {
            Self::Fixed(index) => committees.get(*index),
            Self::RoundRobin => {
                if committees.is_empty() {
                    None
                } else {
                    committees.get(position % committees.len())
                }
            }
        }
    }
}

#[cfg(test)]
mod selection_tests {
    use super::*;
    use openssl::rsa::Rsa;
    use ssv_types::{Operator, OperatorId};

    fn committees(count: u64) -> Vec<Committee> {
        let rsa = Rsa::generate(1024).expect("Failed to generate RSA key");
        let pem = rsa.public_key_to_pem().unwrap();
        (0..count)
            .map(|c| {
                let members = (1..=4)
                    .map(|i| {
                        let public = Rsa::public_key_from_pem(&pem).unwrap();
                        Operator::new_with_pubkey(public, OperatorId(c * 4 + i)).unwrap()
                    })
                    .collect();
                Committee::new(members).unwrap()
            })
            .collect()
    }

    fn first_id(committee: Option<&Committee>) -> Option<u64> {
        committee.map(|c| *c.operator_ids()[0])
    }

    #[test]
    fn test_fixed_selection() {
        let committees = committees(3);
        let selection = CommitteeSelection::Fixed(1);
        for position in 0..5 {
            assert_eq!(first_id(selection.select(&committees, position)), Some(5));
        }
        assert!(CommitteeSelection::Fixed(3).select(&committees, 0).is_none());
    }

    #[test]
    fn test_default_is_first_committee() {
        let committees = committees(2);
        assert_eq!(CommitteeSelection::default(), CommitteeSelection::Fixed(0));
        assert_eq!(
            first_id(CommitteeSelection::default().select(&committees, 7)),
            Some(1)
        );
    }

    #[test]
    fn test_round_robin_selection() {
        let committees = committees(3);
        let picked: Vec<Option<u64>> = (0..6)
            .map(|position| first_id(CommitteeSelection::RoundRobin.select(&committees, position)))
            .collect();
        assert_eq!(
            picked,
            vec![Some(1), Some(5), Some(9), Some(1), Some(5), Some(9)]
        );
        assert!(CommitteeSelection::RoundRobin.select(&[], 0).is_none());
    }
}
