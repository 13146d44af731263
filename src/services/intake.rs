// src/services/intake.rs
//! Address intake for the claim page.
//!
//! Every change of the wallet input field is fed through [`AddressIntake`],
//! which decides whether the normalized address changes.

use crate::models::address::{AddressPolicy, NormalizedAddress};
use log::debug;
use serde::{Deserialize, Serialize};

/// How invalid input affects an already accepted address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakePolicy {
    /// When false (the default), invalid input leaves the last valid address
    /// in place so partial typing does not flicker the page.
    pub clear_on_invalid: bool,
}

/// Effect of one input change on the normalized address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeChange {
    /// A valid address different from the previous one was accepted.
    Accepted(NormalizedAddress),
    /// The input validated to the address already held.
    Unchanged(NormalizedAddress),
    /// The input was invalid and the held address (if any) was kept.
    Ignored,
    /// The input was invalid and the held address was dropped.
    Cleared,
}

/// Holds the normalized address derived from the latest input.
#[derive(Debug, Clone)]
pub struct AddressIntake {
    address_policy: AddressPolicy,
    policy: IntakePolicy,
    address: Option<NormalizedAddress>,
}

impl AddressIntake {
    pub fn new(address_policy: AddressPolicy, policy: IntakePolicy) -> Self {
        Self {
            address_policy,
            policy,
            address: None,
        }
    }

    /// Applies one raw input change.
    pub fn submit(&mut self, raw: &str) -> IntakeChange {
        match self.address_policy.normalize(raw) {
            Some(address) if self.address.as_ref() == Some(&address) => {
                IntakeChange::Unchanged(address)
            }
            Some(address) => {
                debug!("Accepted wallet address {}", address);
                self.address = Some(address.clone());
                IntakeChange::Accepted(address)
            }
            None if self.policy.clear_on_invalid && self.address.is_some() => {
                debug!("Invalid input, clearing held address");
                self.address = None;
                IntakeChange::Cleared
            }
            None => IntakeChange::Ignored,
        }
    }

    pub fn address(&self) -> Option<&NormalizedAddress> {
        self.address.as_ref()
    }
}
