// src/models/claim.rs
//! Claim progress of a page instance.

use serde::Serialize;

/// Where the page stands on the way to a completed reward claim.
///
/// ```text
/// AwaitingAddress --valid address--> AwaitingVerification
/// AwaitingVerification --new valid address--> AwaitingVerification (session replaced)
/// AwaitingVerification --outcome for active session--> Claimed
/// ```
///
/// `Claimed` is terminal for the lifetime of the page. There is no failure
/// state: an abandoned verification simply stays in `AwaitingVerification`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ClaimState {
    #[default]
    AwaitingAddress,
    AwaitingVerification,
    Claimed {
        #[serde(skip_serializing_if = "Option::is_none")]
        transaction_id: Option<String>,
    },
}

impl ClaimState {
    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimState::Claimed { .. })
    }

    #[allow(dead_code)]
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            ClaimState::Claimed { transaction_id } => transaction_id.as_deref(),
            _ => None,
        }
    }
}
