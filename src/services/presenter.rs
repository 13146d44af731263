// src/services/presenter.rs
//! Claim result presentation.
//!
//! Turns the page state into the lines of text the claim page shows, and
//! picks the block-explorer link for a completed claim. No network calls:
//! links are plain string templates over the configured explorer host.

use crate::settings::PresentationConfig;
use crate::models::address::NormalizedAddress;
use crate::models::claim::ClaimState;
use crate::models::outcome::VerificationOutcome;
use crate::models::session::SessionId;
use serde::Serialize;

/// Explorer link shown once the claim completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimLink {
    pub label: String,
    pub href: String,
}

/// Everything the page renders for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimView {
    pub state: ClaimState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    pub lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ClaimLink>,
}

#[derive(Debug, Clone)]
pub struct ClaimResultPresenter {
    config: PresentationConfig,
}

impl ClaimResultPresenter {
    pub fn new(config: PresentationConfig) -> Self {
        Self { config }
    }

    /// Direct transaction link when the outcome carries a non-blank
    /// transaction id, otherwise the address's token-transfer view.
    pub fn select_link(&self, outcome: &VerificationOutcome, address: &NormalizedAddress) -> String {
        match outcome.clone().into_transaction_id() {
            Some(tx) => format!("https://{}/tx/{}", self.config.explorer_host, tx),
            None => format!(
                "https://{}/address/{}#tokentxns",
                self.config.explorer_host, address
            ),
        }
    }

    /// Renders the page for `state`.
    ///
    /// The address-required prompt is shown whenever no address is held,
    /// whatever the user may have typed.
    pub fn render(
        &self,
        state: &ClaimState,
        address: Option<&NormalizedAddress>,
        session_id: Option<&SessionId>,
    ) -> ClaimView {
        let mut lines = Vec::new();
        let mut link = None;

        match address {
            Some(address) => {
                lines.push(format!("[ OK ] VALID ADDRESS DETECTED: {}...", address.short()))
            }
            None => {
                lines.push("ERROR: WALLET ADDRESS REQUIRED TO PROCEED".to_string());
                lines.push("Please enter a valid Ethereum address above".to_string());
            }
        }

        match (state, address) {
            (ClaimState::AwaitingVerification, Some(_)) if session_id.is_some() => {
                lines.push("SCAN QR CODE TO VERIFY BIRTHDAY WITH SELF PROTOCOL".to_string());
                lines.push("WAITING FOR VERIFICATION...".to_string());
            }
            (ClaimState::Claimed { transaction_id }, Some(address)) => {
                lines.push("BIRTHDAY VERIFICATION SUCCESS!".to_string());
                lines.push(format!("{} CLAIMED!", self.config.reward_label));
                lines.push("TRANSACTION STATUS: COMPLETED".to_string());
                lines.push(format!("DESTINATION: {}", address));

                let outcome = VerificationOutcome {
                    transaction_id: transaction_id.clone(),
                };
                let label = match outcome.clone().into_transaction_id() {
                    Some(_) => format!(">>> VIEW TRANSACTION ON {} <<<", self.config.explorer_name),
                    None => ">>> VIEW YOUR TOKEN TRANSFERS <<<".to_string(),
                };
                link = Some(ClaimLink {
                    label,
                    href: self.select_link(&outcome, address),
                });
            }
            _ => {}
        }

        ClaimView {
            state: state.clone(),
            address: address.map(|a| a.to_string()),
            session_id: session_id.cloned(),
            lines,
            link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::AddressPolicy;

    const ADDR: &str = "0x97d01A133c9Bfd77D6b7147d36bAA005b48735aa";

    fn presenter() -> ClaimResultPresenter {
        ClaimResultPresenter::new(PresentationConfig {
            explorer_host: "alfajores.celoscan.io".to_string(),
            explorer_name: "CELOSCAN".to_string(),
            reward_label: "1,000 RACE TOKENS".to_string(),
        })
    }

    fn address() -> NormalizedAddress {
        AddressPolicy::default().normalize(ADDR).unwrap()
    }

    #[test]
    fn test_select_link_prefers_transaction() {
        let link = presenter().select_link(&VerificationOutcome::with_transaction("0xabc"), &address());
        assert_eq!(link, "https://alfajores.celoscan.io/tx/0xabc");
    }

    #[test]
    fn test_select_link_falls_back_to_address() {
        let link = presenter().select_link(&VerificationOutcome::default(), &address());
        assert_eq!(
            link,
            format!("https://alfajores.celoscan.io/address/{}#tokentxns", ADDR)
        );
    }

    #[test]
    fn test_select_link_ignores_blank_transaction() {
        let link = presenter().select_link(&VerificationOutcome::with_transaction(""), &address());
        assert_eq!(
            link,
            format!("https://alfajores.celoscan.io/address/{}#tokentxns", ADDR)
        );
    }

    #[test]
    fn test_transaction_label_names_configured_explorer() {
        let presenter = ClaimResultPresenter::new(PresentationConfig {
            explorer_host: "explorer.celo.org/mainnet".to_string(),
            explorer_name: "CELO EXPLORER".to_string(),
            reward_label: "1,000 RACE TOKENS".to_string(),
        });
        let address = address();
        let state = ClaimState::Claimed {
            transaction_id: Some("0xabc".to_string()),
        };
        let link = presenter.render(&state, Some(&address), None).link.unwrap();

        assert_eq!(link.label, ">>> VIEW TRANSACTION ON CELO EXPLORER <<<");
        assert_eq!(link.href, "https://explorer.celo.org/mainnet/tx/0xabc");
    }

    #[test]
    fn test_render_without_address() {
        let view = presenter().render(&ClaimState::AwaitingAddress, None, None);

        assert_eq!(view.lines[0], "ERROR: WALLET ADDRESS REQUIRED TO PROCEED");
        assert!(view.address.is_none());
        assert!(view.link.is_none());
    }

    #[test]
    fn test_render_awaiting_verification() {
        let address = address();
        let id = SessionId::generate(1);
        let view = presenter().render(&ClaimState::AwaitingVerification, Some(&address), Some(&id));

        assert_eq!(
            view.lines,
            vec![
                "[ OK ] VALID ADDRESS DETECTED: 0x97d01A13...".to_string(),
                "SCAN QR CODE TO VERIFY BIRTHDAY WITH SELF PROTOCOL".to_string(),
                "WAITING FOR VERIFICATION...".to_string(),
            ]
        );
        assert_eq!(view.session_id, Some(id));
    }

    #[test]
    fn test_render_claimed() {
        let address = address();
        let state = ClaimState::Claimed {
            transaction_id: None,
        };
        let view = presenter().render(&state, Some(&address), None);

        assert!(view.lines.contains(&"1,000 RACE TOKENS CLAIMED!".to_string()));
        assert!(view.lines.contains(&format!("DESTINATION: {}", ADDR)));
        let link = view.link.unwrap();
        assert_eq!(link.label, ">>> VIEW YOUR TOKEN TRANSFERS <<<");
        assert!(link.href.ends_with("#tokentxns"));
    }
}
