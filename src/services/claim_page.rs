// src/services/claim_page.rs
//! The claim page aggregate.
//!
//! Wires address intake, the session controller and the presenter together
//! and applies the page's state machine to each incoming event.

use crate::settings::Settings;
use crate::error::Result;
use crate::models::claim::ClaimState;
use crate::models::outcome::VerificationOutcome;
use crate::models::session::SessionId;
use crate::services::intake::{AddressIntake, IntakeChange};
use crate::services::presenter::{ClaimResultPresenter, ClaimView};
use crate::services::session_controller::{OutcomeDisposition, SessionController};
use crate::services::widget::{Challenge, VerificationWidget};
use log::debug;

pub struct ClaimPage<W> {
    intake: AddressIntake,
    controller: SessionController<W>,
    presenter: ClaimResultPresenter,
}

impl<W: VerificationWidget> ClaimPage<W> {
    pub fn new(settings: &Settings, widget: W) -> Self {
        Self {
            intake: AddressIntake::new(settings.address_policy, settings.intake_policy),
            controller: SessionController::new(settings.deployment.clone(), widget),
            presenter: ClaimResultPresenter::new(settings.presentation.clone()),
        }
    }

    /// Handles one change of the wallet input field.
    ///
    /// Input after the claim completed is ignored so the claimed destination
    /// stays fixed.
    pub fn submit_input(&mut self, raw: &str) -> Result<ClaimView> {
        if self.controller.state().is_claimed() {
            debug!("Ignoring input after claim completed");
            return Ok(self.view());
        }

        match self.intake.submit(raw) {
            IntakeChange::Accepted(address) => {
                self.controller.start(&address)?;
            }
            // a failed render left no session; retry on resubmission
            IntakeChange::Unchanged(address) if self.controller.active_session().is_none() => {
                self.controller.start(&address)?;
            }
            IntakeChange::Cleared => self.controller.reset(),
            IntakeChange::Unchanged(_) | IntakeChange::Ignored => {}
        }

        Ok(self.view())
    }

    /// Completion callback of the verification widget.
    pub fn on_outcome(
        &mut self,
        session_id: &SessionId,
        outcome: VerificationOutcome,
    ) -> OutcomeDisposition {
        self.controller.on_outcome(session_id, outcome)
    }

    pub fn view(&self) -> ClaimView {
        self.presenter.render(
            self.controller.state(),
            self.intake.address(),
            self.controller.active_session().map(|s| &s.id),
        )
    }

    #[allow(dead_code)]
    pub fn state(&self) -> &ClaimState {
        self.controller.state()
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.controller.challenge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppConfig;
    use crate::services::widget::testing::RecordingWidget;
    use crate::services::widget::QrChallengeWidget;

    const ADDR_A: &str = "0x97d01A133c9Bfd77D6b7147d36bAA005b48735aa";
    const ADDR_B: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    fn page_with(config: AppConfig) -> ClaimPage<QrChallengeWidget> {
        ClaimPage::new(&config.into_settings().unwrap(), QrChallengeWidget::new())
    }

    fn page() -> ClaimPage<QrChallengeWidget> {
        page_with(AppConfig::default())
    }

    fn active_id<W: VerificationWidget>(page: &ClaimPage<W>) -> SessionId {
        page.challenge().unwrap().session_id.clone()
    }

    #[test]
    fn test_end_to_end_claim() {
        let mut page = page();
        assert_eq!(page.state(), &ClaimState::AwaitingAddress);

        let view = page.submit_input(ADDR_A).unwrap();
        assert_eq!(view.address.as_deref(), Some(ADDR_A));
        assert_eq!(page.state(), &ClaimState::AwaitingVerification);

        let id = active_id(&page);
        let disposition = page.on_outcome(&id, VerificationOutcome::with_transaction("0xdead"));
        assert_eq!(disposition, OutcomeDisposition::Recorded);
        assert_eq!(
            page.state(),
            &ClaimState::Claimed {
                transaction_id: Some("0xdead".to_string())
            }
        );

        let link = page.view().link.unwrap();
        assert_eq!(link.href, "https://alfajores.celoscan.io/tx/0xdead");
    }

    #[test]
    fn test_partial_typing_does_not_start_session() {
        let mut page = page();
        for end in 1..ADDR_A.len() {
            page.submit_input(&ADDR_A[..end]).unwrap();
            assert_eq!(page.state(), &ClaimState::AwaitingAddress);
            assert!(page.challenge().is_none());
        }
        page.submit_input(ADDR_A).unwrap();
        assert_eq!(page.state(), &ClaimState::AwaitingVerification);
    }

    #[test]
    fn test_invalid_input_keeps_session() {
        let mut page = page();
        page.submit_input(ADDR_A).unwrap();
        let id = active_id(&page);

        let view = page.submit_input("0x97d0").unwrap();
        assert_eq!(view.address.as_deref(), Some(ADDR_A));
        assert_eq!(active_id(&page), id);
    }

    #[test]
    fn test_invalid_input_clears_when_configured() {
        let mut page = page_with(AppConfig {
            clear_on_invalid: true,
            ..AppConfig::default()
        });
        page.submit_input(ADDR_A).unwrap();
        let id = active_id(&page);

        let view = page.submit_input("0x97d0").unwrap();
        assert!(view.address.is_none());
        assert_eq!(page.state(), &ClaimState::AwaitingAddress);
        assert_eq!(
            page.on_outcome(&id, VerificationOutcome::default()),
            OutcomeDisposition::NoActiveSession
        );
    }

    #[test]
    fn test_stale_session_cannot_claim() {
        let mut page = page();
        page.submit_input(ADDR_A).unwrap();
        let stale = active_id(&page);
        page.submit_input(ADDR_B).unwrap();
        let current = active_id(&page);

        assert_eq!(
            page.on_outcome(&stale, VerificationOutcome::with_transaction("0xa")),
            OutcomeDisposition::Stale
        );
        assert_eq!(page.state(), &ClaimState::AwaitingVerification);

        page.on_outcome(&current, VerificationOutcome::with_transaction("0xb"));
        let view = page.view();
        assert_eq!(view.address.as_deref(), Some(ADDR_B));
        assert_eq!(view.state.transaction_id(), Some("0xb"));
    }

    #[test]
    fn test_same_address_does_not_restart_session() {
        let widget = RecordingWidget::default();
        let log = widget.log.clone();
        let mut page = ClaimPage::new(&AppConfig::default().into_settings().unwrap(), widget);

        page.submit_input(ADDR_A).unwrap();
        page.submit_input(ADDR_A).unwrap();
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_resubmission_retries_failed_render() {
        let widget = RecordingWidget {
            fail_renders: true,
            ..RecordingWidget::default()
        };
        let log = widget.log.clone();
        let mut page = ClaimPage::new(&AppConfig::default().into_settings().unwrap(), widget);

        assert!(page.submit_input(ADDR_A).is_err());
        assert!(page.submit_input(ADDR_A).is_err());
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_input_after_claim_is_ignored() {
        let mut page = page();
        page.submit_input(ADDR_A).unwrap();
        let id = active_id(&page);
        page.on_outcome(&id, VerificationOutcome::default());

        let view = page.submit_input(ADDR_B).unwrap();
        assert_eq!(view.address.as_deref(), Some(ADDR_A));
        assert!(view.state.is_claimed());
        assert!(page.challenge().is_none());
        assert_eq!(
            view.link.unwrap().href,
            format!("https://alfajores.celoscan.io/address/{}#tokentxns", ADDR_A)
        );
    }
}
