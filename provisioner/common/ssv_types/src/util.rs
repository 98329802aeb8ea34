use crate::committee::{MAX_OPERATORS, MIN_OPERATORS};
use crate::OperatorId;
use base64::prelude::*;
use openssl::pkey::Public;
use openssl::rsa::Rsa;
use std::collections::HashSet;

// Parse from a RSA public key string into the associated RSA representation
pub fn parse_rsa(pem_data: &str) -> Result<Rsa<Public>, String> {
    // First decode the base64 data
    let pem_decoded = BASE64_STANDARD
        .decode(pem_data)
        .map_err(|e| format!("Unable to decode base64 pem data: {}", e))?;

    // Convert the decoded data to a string
    let mut pem_string = String::from_utf8(pem_decoded)
        .map_err(|e| format!("Unable to convert decoded pem data into a string: {}", e))?;

    // The registry labels PKCS8 keys with the PKCS1 header, swap it so openssl accepts it
    pem_string = pem_string
        .replace(
            "-----BEGIN RSA PUBLIC KEY-----",
            "-----BEGIN PUBLIC KEY-----",
        )
        .replace("-----END RSA PUBLIC KEY-----", "-----END PUBLIC KEY-----");

    let rsa_pubkey = Rsa::public_key_from_pem(pem_string.as_bytes())
        .map_err(|e| format!("Failed to parse RSA public key: {}", e))?;

    Ok(rsa_pubkey)
}

/// Perform basic verification on an operator set: it must be a valid 3f+1 committee with no
/// duplicate members.
pub fn validate_operators(operator_ids: &[OperatorId]) -> Result<(), String> {
    let num_operators = operator_ids.len();

    // make sure there is a valid number of operators
    if num_operators > MAX_OPERATORS {
        return Err(format!(
            "Committee has too many operators: {}",
            num_operators
        ));
    }
    if num_operators < MIN_OPERATORS {
        return Err(format!(
            "Committee has {} operators, at least {} are required",
            num_operators, MIN_OPERATORS
        ));
    }

    // make sure count is valid
    let faulty = (num_operators - 1) / 3;
    if (num_operators - 1) % 3 != 0 || !(1..=4).contains(&faulty) {
        return Err(format!(
            "Given {} operators. Cannot build a 3f+1 quorum",
            num_operators
        ));
    }

    // make sure there are no duplicates
    let mut seen = HashSet::new();
    let are_duplicates = !operator_ids.iter().all(|x| seen.insert(x));
    if are_duplicates {
        return Err("Operator IDs contain duplicates".to_string());
    }

    Ok(())
}

/// Add a `0x` prefix to a hex string if it does not already carry one.
pub fn prefix_hex(value: &str) -> String {
    if value.starts_with("0x") {
        value.to_string()
    } else {
        format!("0x{}", value)
    }
}
