#![cfg(feature = "std")]

//! Delayed computer turns.
//!
//! The engine resolves computer shots synchronously; this scheduler only
//! spaces them out in time for a front-end. At most one task is pending per
//! scheduler, and a task started before a restart never touches the new game.

use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, trace};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::common::{GameError, GamePhase, Side};
use crate::game::{GameSession, ShotReport};

/// Session handle shared between a front-end and the scheduler.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Lock a shared session, recovering from a poisoned mutex.
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, GameSession> {
    match session.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Runs computer shots after a pause, one pending task at a time.
pub struct ComputerTurnScheduler {
    session: SharedSession,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    reports: mpsc::UnboundedSender<ShotReport>,
}

impl ComputerTurnScheduler {
    /// Create a scheduler and the channel its shot reports arrive on.
    pub fn new(
        session: SharedSession,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ShotReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                session,
                delay,
                pending: None,
                reports: tx,
            },
            rx,
        )
    }

    /// Returns `true` while a scheduled computer turn has not finished.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Schedule the computer's turn, replacing any pending one.
    ///
    /// The task fires one shot per delay for as long as the computer keeps
    /// the turn. Must be called from within a tokio runtime.
    pub fn schedule(&mut self) {
        self.cancel();
        let generation = lock_session(&self.session).generation();
        let session = Arc::clone(&self.session);
        let reports = self.reports.clone();
        let delay = self.delay;
        trace!("scheduling computer turn for game #{}", generation);
        self.pending = Some(tokio::spawn(async move {
            loop {
                sleep(delay).await;
                // Send under the lock so a restart waiting on it never
                // sees a report from the game it replaced.
                let again = {
                    let mut guard = lock_session(&session);
                    if guard.generation() != generation {
                        debug!("dropping computer turn for stale game #{}", generation);
                        return;
                    }
                    if guard.phase() != GamePhase::Playing || guard.turn() != Side::Computer {
                        return;
                    }
                    let report = match guard.advance_computer_turn() {
                        Ok(report) => report,
                        Err(e) => {
                            debug!("computer turn rejected: {}", e);
                            return;
                        }
                    };
                    let again = report.game_over.is_none() && report.next_turn == Side::Computer;
                    reports.send(report).is_ok() && again
                };
                if !again {
                    return;
                }
            }
        }));
    }

    /// Abort the pending computer turn, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Cancel pending work, then restart the session.
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.cancel();
        lock_session(&self.session).restart()
    }
}

impl Drop for ComputerTurnScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
