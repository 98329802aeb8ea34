//! Shamir secret sharing over the BLS12-381 scalar field.
//!
//! The secret is the constant term of a random polynomial of degree `threshold - 1`. Each operator
//! receives the polynomial evaluated at its operator id, so any `threshold` shares recover the
//! secret through Lagrange interpolation at zero.

use crate::error::KeyShareError;
use bls::SecretKey;
use bls12_381::Scalar;
use ff::Field;
use rand::{CryptoRng, RngCore};
use ssv_types::OperatorId;
use zeroize::Zeroizing;

/// Split `secret` into one share per operator id, in the given order.
pub fn split_secret<R: RngCore + CryptoRng>(
    secret: &Scalar,
    operator_ids: &[OperatorId],
    threshold: usize,
    rng: &mut R,
) -> Result<Vec<Scalar>, KeyShareError> {
    if threshold == 0 || threshold > operator_ids.len() {
        return Err(KeyShareError::Crypto(format!(
            "threshold {threshold} is invalid for {} shares",
            operator_ids.len()
        )));
    }
    // x = 0 would hand out the secret itself
    if operator_ids.iter().any(|id| **id == 0) {
        return Err(KeyShareError::Crypto(
            "operator id 0 cannot be an evaluation point".to_string(),
        ));
    }

    let mut coefficients = generate_polynomial(secret, threshold, rng);
    let shares = operator_ids
        .iter()
        .map(|id| evaluate_polynomial(&coefficients, &Scalar::from(**id)))
        .collect();
    for coefficient in coefficients.iter_mut() {
        *coefficient = Scalar::ZERO;
    }
    Ok(shares)
}

/// Recover the secret from `(operator id, share)` pairs. With fewer shares than the threshold
/// used at split time the result is an unrelated scalar.
pub fn reconstruct_secret(shares: &[(OperatorId, Scalar)]) -> Option<Scalar> {
    if shares.is_empty() {
        return None;
    }

    let mut result = Scalar::ZERO;
    for (i, (x_i, y_i)) in shares.iter().enumerate() {
        let x_i = Scalar::from(**x_i);

        // Lagrange basis polynomial of x_i, evaluated at zero
        let mut numerator = Scalar::ONE;
        let mut denominator = Scalar::ONE;
        for (j, (x_j, _)) in shares.iter().enumerate() {
            if i == j {
                continue;
            }
            let x_j = Scalar::from(**x_j);
            numerator *= x_j;
            denominator *= x_j - x_i;
        }

        // Repeated evaluation points leave the denominator at zero
        let inverse = Option::<Scalar>::from(denominator.invert())?;
        result += y_i * numerator * inverse;
    }
    Some(result)
}

/// Recover a BLS secret key from `(operator id, share key)` pairs.
pub fn reconstruct_secret_key(
    shares: &[(OperatorId, SecretKey)],
) -> Result<SecretKey, KeyShareError> {
    let scalars = shares
        .iter()
        .map(|(id, key)| Ok((*id, scalar_from_secret_key(key)?)))
        .collect::<Result<Vec<_>, KeyShareError>>()?;
    let secret = reconstruct_secret(&scalars)
        .ok_or_else(|| KeyShareError::Crypto("shares cannot be interpolated".to_string()))?;
    secret_key_from_scalar(&secret)
}

// Coefficients [a_0, .., a_{t-1}] with a_0 = secret
fn generate_polynomial<R: RngCore + CryptoRng>(
    secret: &Scalar,
    threshold: usize,
    rng: &mut R,
) -> Vec<Scalar> {
    let mut coefficients = Vec::with_capacity(threshold);
    coefficients.push(*secret);

    let mut bytes = Zeroizing::new([0u8; 64]);
    for _ in 1..threshold {
        rng.fill_bytes(&mut bytes[..]);
        coefficients.push(Scalar::from_bytes_wide(&bytes));
    }
    coefficients
}

// Horner's method
fn evaluate_polynomial(coefficients: &[Scalar], x: &Scalar) -> Scalar {
    let mut result = Scalar::ZERO;
    for coefficient in coefficients.iter().rev() {
        result = result * x + coefficient;
    }
    result
}

/// BLS secret keys serialize big endian, field scalars little endian.
pub(crate) fn scalar_from_secret_key(key: &SecretKey) -> Result<Scalar, KeyShareError> {
    let serialized = key.serialize();
    let mut bytes = Zeroizing::new([0u8; 32]);
    if serialized.as_bytes().len() != bytes.len() {
        return Err(KeyShareError::Crypto(
            "unexpected secret key length".to_string(),
        ));
    }
    bytes.copy_from_slice(serialized.as_bytes());
    bytes.reverse();
    Option::from(Scalar::from_bytes(&*bytes))
        .ok_or_else(|| KeyShareError::Crypto("secret key is not a field element".to_string()))
}

pub(crate) fn secret_key_from_scalar(scalar: &Scalar) -> Result<SecretKey, KeyShareError> {
    let mut bytes = Zeroizing::new(scalar.to_bytes());
    bytes.reverse();
    SecretKey::deserialize(&bytes[..])
        .map_err(|e| KeyShareError::Crypto(format!("invalid share key: {e:?}")))
}
