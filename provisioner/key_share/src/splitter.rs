use crate::encryption::encrypt_share;
use crate::error::KeyShareError;
use crate::keystore::ValidatorKeyMaterial;
use crate::threshold::{scalar_from_secret_key, secret_key_from_scalar, split_secret};
use bls12_381::Scalar;
use ff::Field;
use rand::rngs::OsRng;
use ssv_types::{validate_operators, Committee, KeyShareSet, Share, MIN_OPERATORS};
use tracing::{debug, instrument};

/// Split a validator key into one encrypted share per committee member.
///
/// Shares are produced in committee order, each evaluated at the member's operator id and
/// encrypted to the member's RSA key. Any `committee.threshold()` of them reconstruct the key.
#[instrument(skip_all, fields(validator = %key_material.validator_pubkey_hex(), operators = ?committee.operator_ids()))]
pub fn split(
    key_material: ValidatorKeyMaterial,
    committee: &Committee,
) -> Result<KeyShareSet, KeyShareError> {
    if committee.len() < MIN_OPERATORS {
        return Err(KeyShareError::CommitteeTooSmall {
            size: committee.len(),
            minimum: MIN_OPERATORS,
        });
    }
    let operator_ids = committee.operator_ids();
    validate_operators(&operator_ids).map_err(KeyShareError::InvalidCommittee)?;

    let threshold = committee.threshold();
    let secret = scalar_from_secret_key(&key_material.secret_key)?;
    let mut share_scalars = split_secret(&secret, &operator_ids, threshold, &mut OsRng)?;
    drop(key_material.secret_key);

    let shares = committee
        .members()
        .iter()
        .zip(share_scalars.iter())
        .map(|(operator, scalar)| {
            let share_key = secret_key_from_scalar(scalar)?;
            Ok(Share {
                operator_id: operator.id,
                operator_pubkey: operator.encoded_pubkey.clone(),
                share_pubkey: share_key.public_key(),
                encrypted_private_key: encrypt_share(&share_key, &operator.rsa_pubkey)?,
            })
        })
        .collect::<Result<Vec<_>, KeyShareError>>();
    for scalar in share_scalars.iter_mut() {
        *scalar = Scalar::ZERO;
    }

    let share_set = KeyShareSet::new(
        key_material.validator_pubkey,
        shares?,
        threshold,
        committee,
    )
    .map_err(KeyShareError::InvalidCommittee)?;

    debug!(threshold, "Split validator key into shares");
    Ok(share_set)
}
