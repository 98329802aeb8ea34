use ssv_types::{Committee, Operator};
use std::collections::HashSet;
use tracing::{error, warn};

/// Split operators into consecutive committees of `committee_size` members.
///
/// The input order is kept. An operator id seen before is ignored, so no operator ends up in two
/// committees. A trailing group smaller than `committee_size` cannot reach threshold and is
/// dropped. Those operators never receive shares in this run, so an operator count that is not a
/// multiple of `committee_size` starves the tail of the list.
pub fn partition_into_committees(operators: &[Operator], committee_size: usize) -> Vec<Committee> {
    if committee_size == 0 {
        error!("Committee size must be greater than zero");
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let unique: Vec<Operator> = operators
        .iter()
        .filter(|op| seen.insert(op.id))
        .cloned()
        .collect();

    let chunks = unique.chunks_exact(committee_size);
    let remainder = chunks.remainder();
    if !remainder.is_empty() {
        let dropped: Vec<u64> = remainder.iter().map(|op| *op.id).collect();
        warn!(
            committee_size,
            ?dropped,
            "Operators do not fill a whole committee and are left out"
        );
    }

    chunks
        .filter_map(|chunk| match Committee::new(chunk.to_vec()) {
            Ok(committee) => Some(committee),
            Err(e) => {
                error!(error = %e, "Failed to build committee");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod partition_tests {
    use super::*;
    use openssl::rsa::Rsa;
    use ssv_types::OperatorId;

    fn operators(ids: impl IntoIterator<Item = u64>) -> Vec<Operator> {
        // One key is enough, partitioning only looks at ids
        let rsa = Rsa::generate(1024).expect("Failed to generate RSA key");
        let pem = rsa.public_key_to_pem().unwrap();
        ids.into_iter()
            .map(|id| {
                let public = Rsa::public_key_from_pem(&pem).unwrap();
                Operator::new_with_pubkey(public, OperatorId(id)).unwrap()
            })
            .collect()
    }

    fn ids(committee: &Committee) -> Vec<u64> {
        committee.operator_ids().into_iter().map(|id| *id).collect()
    }

    #[test]
    fn test_exact_partition() {
        let committees = partition_into_committees(&operators(1..=8), 4);
        assert_eq!(committees.len(), 2);
        assert_eq!(ids(&committees[0]), vec![1, 2, 3, 4]);
        assert_eq!(ids(&committees[1]), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_remainder_dropped() {
        // floor(M/K) committees for every M, trailing M mod K left out
        let pool = operators(1..=11);
        for size in 1..=11usize {
            let committees = partition_into_committees(&pool, size);
            assert_eq!(committees.len(), 11 / size, "size {size}");

            let mut seen = HashSet::new();
            for committee in &committees {
                assert_eq!(committee.len(), size);
                for id in committee.operator_ids() {
                    assert!(seen.insert(id), "operator {id} repeated");
                }
            }
            assert_eq!(seen.len(), (11 / size) * size);
            // The excluded operators are exactly the tail
            assert!(seen.iter().all(|id| **id <= ((11 / size) * size) as u64));
        }
    }

    #[test]
    fn test_too_few_operators() {
        assert!(partition_into_committees(&operators(1..=3), 4).is_empty());
        assert!(partition_into_committees(&[], 4).is_empty());
    }

    #[test]
    fn test_zero_committee_size() {
        assert!(partition_into_committees(&operators(1..=4), 0).is_empty());
    }

    #[test]
    fn test_duplicates_are_not_reused() {
        let committees = partition_into_committees(&operators([1, 2, 2, 3, 4, 5, 1, 6, 7, 8]), 4);
        assert_eq!(committees.len(), 2);
        assert_eq!(ids(&committees[0]), vec![1, 2, 3, 4]);
        assert_eq!(ids(&committees[1]), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_partition_is_deterministic() {
        let pool = operators(1..=13);
        let first: Vec<Vec<u64>> = partition_into_committees(&pool, 4).iter().map(ids).collect();
        let second: Vec<Vec<u64>> = partition_into_committees(&pool, 4).iter().map(ids).collect();
        assert_eq!(first, second);
    }
}
