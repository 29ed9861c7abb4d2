use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

use super::state::MockTestSession;
use super::workflow::{TestSessionService, TickOutcome};

//
// ─── COUNTDOWN TICKER ─────────────────────────────────────────────────────────
//

/// Background task driving a shared session's clock once a second.
///
/// The task stops on its own as soon as a tick reports anything but a running
/// clock — pause, user submission, or its own expiry — and can be stopped
/// early with [`CountdownTicker::cancel`]. Dropping the handle also signals
/// the task, so no callback outlives a torn-down session. Resuming a paused
/// session needs a fresh ticker.
pub struct CountdownTicker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Spawns the driving task on the current tokio runtime.
    #[must_use]
    pub fn spawn(service: TestSessionService, session: Arc<Mutex<MockTestSession>>) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(1));
            // The first interval tick completes immediately; consume it so
            // every later tick marks one full elapsed second.
            tick.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = tick.tick() => {
                        let outcome = {
                            let mut guard = session.lock().await;
                            service.tick(&mut guard).await
                        };
                        match outcome {
                            Ok(TickOutcome::Running { .. }) => {}
                            Ok(TickOutcome::Halted | TickOutcome::Submitted(_)) => break,
                            Err(err) => {
                                tracing::error!(error = %err, "countdown tick failed");
                                break;
                            }
                        }
                    }
                }
            }
        });
        Self { shutdown, handle }
    }

    /// Signals the task to stop after its current iteration.
    pub fn cancel(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Whether the driving task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels and waits for the task to wind down.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        let _ = (&mut self.handle).await;
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
