// src/services/page_loop.rs
//! Single-consumer event loop owning the claim page.
//!
//! The page is driven the way a browser drives it: one event at a time, in
//! arrival order. HTTP handlers run concurrently, so they never touch the
//! page directly; they send a [`PageCommand`] through a [`PageHandle`] and
//! wait for the loop's reply.

use crate::error::{ClaimError, Result};
use crate::models::outcome::VerificationOutcome;
use crate::models::session::SessionId;
use crate::services::claim_page::ClaimPage;
use crate::services::presenter::ClaimView;
use crate::services::session_controller::OutcomeDisposition;
use crate::services::widget::{Challenge, VerificationWidget};
use log::info;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Events accepted by the page loop.
pub enum PageCommand {
    SubmitInput {
        raw: String,
        reply: oneshot::Sender<Result<ClaimView>>,
    },
    Outcome {
        session_id: SessionId,
        outcome: VerificationOutcome,
        reply: oneshot::Sender<OutcomeDisposition>,
    },
    View {
        reply: oneshot::Sender<ClaimView>,
    },
    Challenge {
        reply: oneshot::Sender<Option<Challenge>>,
    },
}

/// Cloneable sender side of the page loop.
#[derive(Clone)]
pub struct PageHandle {
    commands: mpsc::Sender<PageCommand>,
}

/// Moves `page` into a new task and returns the handle used to drive it.
///
/// The loop ends once every [`PageHandle`] has been dropped.
pub fn spawn_page<W>(page: ClaimPage<W>) -> (PageHandle, JoinHandle<()>)
where
    W: VerificationWidget + Send + 'static,
{
    let (commands, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let task = tokio::spawn(run_page(page, rx));
    (PageHandle { commands }, task)
}

async fn run_page<W: VerificationWidget>(mut page: ClaimPage<W>, mut rx: mpsc::Receiver<PageCommand>) {
    while let Some(command) = rx.recv().await {
        // A dropped reply receiver only means the caller went away.
        match command {
            PageCommand::SubmitInput { raw, reply } => {
                let _ = reply.send(page.submit_input(&raw));
            }
            PageCommand::Outcome {
                session_id,
                outcome,
                reply,
            } => {
                let _ = reply.send(page.on_outcome(&session_id, outcome));
            }
            PageCommand::View { reply } => {
                let _ = reply.send(page.view());
            }
            PageCommand::Challenge { reply } => {
                let _ = reply.send(page.challenge().cloned());
            }
        }
    }
    info!("Page loop stopped");
}

impl PageHandle {
    pub async fn submit_input(&self, raw: impl Into<String>) -> Result<ClaimView> {
        let raw = raw.into();
        self.request(|reply| PageCommand::SubmitInput { raw, reply }).await?
    }

    pub async fn deliver_outcome(
        &self,
        session_id: SessionId,
        outcome: VerificationOutcome,
    ) -> Result<OutcomeDisposition> {
        self.request(|reply| PageCommand::Outcome {
            session_id,
            outcome,
            reply,
        })
        .await
    }

    pub async fn view(&self) -> Result<ClaimView> {
        self.request(|reply| PageCommand::View { reply }).await
    }

    pub async fn challenge(&self) -> Result<Option<Challenge>> {
        self.request(|reply| PageCommand::Challenge { reply }).await
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> PageCommand) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| ClaimError::PageClosed)?;
        response.await.map_err(|_| ClaimError::PageClosed)
    }
}
