// src/models/address.rs
//! Wallet address validation and the normalized address type.
//!
//! An address is accepted when it is `0x` followed by exactly 40 hex digits.
//! Digits are case-insensitive, but a mixed-case address is treated as an
//! EIP-55 checksummed address and must carry the correct checksum.

use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ADDRESS_PREFIX: &str = "0x";
const ADDRESS_HEX_LEN: usize = 40;

/// Rules applied by [`AddressPolicy::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPolicy {
    /// Reject mixed-case addresses whose casing is not the EIP-55 checksum.
    pub verify_checksum: bool,
}

impl Default for AddressPolicy {
    fn default() -> Self {
        Self { verify_checksum: true }
    }
}

impl AddressPolicy {
    /// Returns true iff `raw` is a syntactically valid account address.
    ///
    /// Pure and total: never panics, returns false for empty or malformed
    /// input, performs no network access.
    pub fn validate(&self, raw: &str) -> bool {
        let digits = match raw.strip_prefix(ADDRESS_PREFIX) {
            Some(digits) => digits,
            None => return false,
        };

        if digits.len() != ADDRESS_HEX_LEN || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return false;
        }

        if !self.verify_checksum {
            return true;
        }

        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper {
            return match Address::from_str(digits) {
                Ok(address) => to_checksum(&address, None)[ADDRESS_PREFIX.len()..] == *digits,
                Err(_) => false,
            };
        }
        true
    }

    /// Validates `raw` and wraps it as a [`NormalizedAddress`].
    pub fn normalize(&self, raw: &str) -> Option<NormalizedAddress> {
        self.validate(raw).then(|| NormalizedAddress(raw.to_string()))
    }
}

/// Validates an address under the default policy (checksum enforced).
#[allow(dead_code)]
pub fn validate(raw: &str) -> bool {
    AddressPolicy::default().validate(raw)
}

/// A wallet address confirmed to satisfy the chain's address-format rules.
///
/// Holds the text exactly as the user supplied it. Only constructible
/// through [`AddressPolicy::normalize`], so it is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedAddress(String);

impl NormalizedAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// EIP-55 form of the address, regardless of how it was typed.
    pub fn checksummed(&self) -> String {
        match Address::from_str(&self.0) {
            Ok(address) => to_checksum(&address, None),
            Err(_) => self.0.clone(),
        }
    }

    /// Leading characters used in the "valid address detected" line.
    pub fn short(&self) -> &str {
        &self.0[..10]
    }
}

impl fmt::Display for NormalizedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
