// src/services/session_controller.rs
//! Verification session controller.
//!
//! Owns the single active verification session of a page, the widget that
//! displays it, and the claim state that completion outcomes advance.
//!
//! Every session gets a fresh [`SessionId`]. Completion callbacks must name
//! the session they belong to, and anything not addressed to the active
//! session is discarded, so a late callback from a replaced session can
//! never credit a claim to the wrong address.

use crate::settings::DeploymentConfig;
use crate::error::Result;
use crate::models::address::NormalizedAddress;
use crate::models::claim::ClaimState;
use crate::models::outcome::VerificationOutcome;
use crate::models::session::{ActiveSession, DisclosureSet, SessionConfiguration, SessionId};
use crate::services::widget::{Challenge, VerificationWidget};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

/// Builds the widget configuration for `address`.
///
/// Only the subject identifier and the disclosure set vary per call; every
/// other field is fixed by the deployment.
pub fn derive_session_config(
    deployment: &DeploymentConfig,
    address: &NormalizedAddress,
    disclosures: &DisclosureSet,
) -> SessionConfiguration {
    SessionConfiguration {
        app_name: deployment.app_name.clone(),
        scope: deployment.scope.clone(),
        endpoint: deployment.endpoint.clone(),
        endpoint_type: deployment.endpoint_type,
        logo_base64: deployment.logo_base64.clone(),
        user_id: address.clone(),
        user_id_type: deployment.user_id_type,
        disclosures: disclosures.clone(),
        dev_mode: deployment.dev_mode,
    }
}

/// What happened to a delivered outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeDisposition {
    /// The outcome completed the claim.
    Recorded,
    /// The outcome named a session that is no longer active.
    Stale,
    /// The claim was already complete; nothing changed.
    AlreadyClaimed,
    /// No session has been started yet.
    NoActiveSession,
}

pub struct SessionController<W> {
    deployment: DeploymentConfig,
    widget: W,
    active: Option<(ActiveSession, Challenge)>,
    state: ClaimState,
    claimed_at: Option<DateTime<Utc>>,
    sequence: u64,
}

impl<W: VerificationWidget> SessionController<W> {
    pub fn new(deployment: DeploymentConfig, widget: W) -> Self {
        Self {
            deployment,
            widget,
            active: None,
            state: ClaimState::AwaitingAddress,
            claimed_at: None,
            sequence: 0,
        }
    }

    /// Replaces any active session with a new one for `address`.
    ///
    /// The previous challenge is torn down before the new one is rendered.
    /// If rendering fails the page is left without an active session, back in
    /// `AwaitingAddress`, and the error is returned; outcomes are then answered with `NoActiveSession`
    /// until a session starts successfully.
    pub fn start(&mut self, address: &NormalizedAddress) -> Result<&ActiveSession> {
        self.stop_active();

        self.sequence += 1;
        let session = ActiveSession {
            id: SessionId::generate(self.sequence),
            config: derive_session_config(&self.deployment, address, &self.deployment.disclosures),
            created_at: Utc::now(),
        };
        let challenge = match self.widget.render(&session) {
            Ok(challenge) => challenge,
            Err(e) => {
                self.state = ClaimState::AwaitingAddress;
                return Err(e);
            }
        };
        self.state = ClaimState::AwaitingVerification;
        info!(
            "Started verification session {} for {}",
            session.id,
            address.checksummed()
        );

        let active = self.active.insert((session, challenge));
        Ok(&active.0)
    }

    /// Drops the active session and returns to awaiting an address.
    pub fn reset(&mut self) {
        if self.state.is_claimed() {
            return;
        }
        self.stop_active();
        self.state = ClaimState::AwaitingAddress;
    }

    /// Completion handler for the verification widget.
    ///
    /// Only the first outcome for the active session has an effect; the
    /// transaction identifier it carries, if any, is kept.
    pub fn on_outcome(
        &mut self,
        session_id: &SessionId,
        outcome: VerificationOutcome,
    ) -> OutcomeDisposition {
        if self.state.is_claimed() {
            return OutcomeDisposition::AlreadyClaimed;
        }

        let active_id = match &self.active {
            Some((session, _)) => session.id.clone(),
            None => {
                warn!("Outcome for session {} arrived with no active session", session_id);
                return OutcomeDisposition::NoActiveSession;
            }
        };

        if &active_id != session_id {
            warn!(
                "Discarding outcome for stale session {} (active: {})",
                session_id, active_id
            );
            return OutcomeDisposition::Stale;
        }

        info!("Verification successful for session {}: {:?}", session_id, outcome);
        self.stop_active();
        self.state = ClaimState::Claimed {
            transaction_id: outcome.into_transaction_id(),
        };
        self.claimed_at = Some(Utc::now());
        OutcomeDisposition::Recorded
    }

    pub fn state(&self) -> &ClaimState {
        &self.state
    }

    pub fn active_session(&self) -> Option<&ActiveSession> {
        self.active.as_ref().map(|(session, _)| session)
    }

    pub fn challenge(&self) -> Option<&Challenge> {
        self.active.as_ref().map(|(_, challenge)| challenge)
    }

    #[allow(dead_code)]
    pub fn claimed_at(&self) -> Option<DateTime<Utc>> {
        self.claimed_at
    }

    fn stop_active(&mut self) {
        if let Some((session, _)) = self.active.take() {
            self.widget.teardown(&session.id);
        }
    }
}
