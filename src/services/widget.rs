// src/services/widget.rs
//! Boundary to the external verification widget.
//!
//! The widget is opaque to the claim page: it is given a session, shows a
//! scannable challenge, and later reports success through the completion
//! callback route. The page only needs to render and tear it down.

use crate::error::{ClaimError, Result};
use crate::models::session::{ActiveSession, SessionId};
use crate::utils::serialization::serialize_base64;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use serde_json::json;

/// What the widget shows for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Challenge {
    pub session_id: SessionId,
    /// Session configuration plus session id, in the widget's JSON shape
    pub payload: serde_json::Value,
    /// `payload` as base64 JSON, ready to be encoded into a QR code
    pub qr_payload: String,
    pub rendered_at: DateTime<Utc>,
}

/// Renders and disposes verification challenges.
pub trait VerificationWidget {
    /// Shows a challenge for `session`, replacing whatever was shown.
    fn render(&mut self, session: &ActiveSession) -> Result<Challenge>;

    /// Stops showing the challenge of `session_id`, if it is still shown.
    fn teardown(&mut self, session_id: &SessionId);
}

/// QR based widget: encodes the session into a base64 JSON payload.
#[derive(Debug, Default)]
pub struct QrChallengeWidget {
    shown: Option<SessionId>,
}

impl QrChallengeWidget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose challenge is currently displayed.
    #[allow(dead_code)]
    pub fn shown(&self) -> Option<&SessionId> {
        self.shown.as_ref()
    }
}

impl VerificationWidget for QrChallengeWidget {
    fn render(&mut self, session: &ActiveSession) -> Result<Challenge> {
        let mut payload = serde_json::to_value(&session.config)?;
        match payload.as_object_mut() {
            Some(fields) => {
                fields.insert("sessionId".to_string(), json!(session.id));
            }
            None => return Err(ClaimError::Widget("session payload is not an object".into())),
        }

        let qr_payload = serialize_base64(&payload)?;
        self.shown = Some(session.id.clone());
        info!("Rendered verification challenge for session {}", session.id);

        Ok(Challenge {
            session_id: session.id.clone(),
            payload,
            qr_payload,
            rendered_at: Utc::now(),
        })
    }

    fn teardown(&mut self, session_id: &SessionId) {
        if self.shown.as_ref() == Some(session_id) {
            debug!("Tearing down challenge for session {}", session_id);
            self.shown = None;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Widget double recording every call, optionally failing renders.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingWidget {
        pub log: Arc<Mutex<Vec<String>>>,
        pub fail_renders: bool,
    }

    impl VerificationWidget for RecordingWidget {
        fn render(&mut self, session: &ActiveSession) -> Result<Challenge> {
            self.log.lock().unwrap().push(format!("render {}", session.config.user_id));
            if self.fail_renders {
                return Err(ClaimError::Widget("render refused".into()));
            }
            QrChallengeWidget::new().render(session)
        }

        fn teardown(&mut self, session_id: &SessionId) {
            self.log.lock().unwrap().push(format!("teardown {}", session_id));
        }
    }
}
