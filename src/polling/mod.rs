//! Polling loop for long-running remote tasks
//!
//! Text-to-audio and dubbing jobs run server-side: the client creates a task,
//! checks its status until it reaches a terminal state, then fetches the
//! result. [`PollingTaskRunner`] owns that loop. The status check and result
//! fetch are supplied by the caller, and waiting goes through an injected
//! [`Clock`] so tests never sleep for real.
//!
//! # Example
//!
//! ```no_run
//! use camb_sdk::config::PollConfig;
//! use camb_sdk::polling::PollingTaskRunner;
//! use camb_sdk::{TaskId, TaskStatus};
//!
//! # async fn example() {
//! let runner = PollingTaskRunner::new(PollConfig::default());
//! let outcome = runner
//!     .run(
//!         &TaskId::from(42),
//!         |_id| async { Ok::<_, std::io::Error>(TaskStatus::Success) },
//!         |_id, _status| async { Ok("result".to_string()) },
//!     )
//!     .await;
//! # }
//! ```

use crate::config::PollConfig;
use crate::error::PollError;
use crate::types::{StatusReport, TaskId, TaskStatus};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Source of delays for the polling loop
#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    /// Suspend the caller for `duration`
    async fn sleep(&self, duration: Duration);
}

/// [`Clock`] backed by `tokio::time::sleep`
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

#[async_trait::async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Repeatedly checks a task's status until it finishes, fails, or the
/// attempt budget runs out
///
/// One runner may drive any number of sequential or concurrent `run` calls;
/// it holds no per-task state.
#[derive(Debug, Clone)]
pub struct PollingTaskRunner<C = TokioClock> {
    config: PollConfig,
    clock: C,
    cancel: CancellationToken,
}

impl PollingTaskRunner<TokioClock> {
    /// Runner that waits on the tokio timer
    pub fn new(config: PollConfig) -> Self {
        Self::with_clock(config, TokioClock)
    }
}

impl<C: Clock> PollingTaskRunner<C> {
    /// Runner that waits on a custom clock
    pub fn with_clock(config: PollConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop polling when `token` is cancelled
    ///
    /// The token is checked before every status check and before every delay,
    /// and interrupts a delay already in progress.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Polling settings in use
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll `task_id` to completion
    ///
    /// Calls `check_status` up to `max_attempts` times, waiting `interval`
    /// between calls. Statuses other than `Success` and `Failed`, including
    /// unrecognised ones, count as still pending. On `Success`, `fetch_result`
    /// is called once with the final status report and its output returned.
    /// No delay follows the last check.
    ///
    /// # Errors
    ///
    /// - [`PollError::Failed`] when the task reports `Failed`
    /// - [`PollError::Timeout`] when `max_attempts` checks pass without a
    ///   terminal status
    /// - [`PollError::Cancelled`] when the cancellation token fires
    /// - [`PollError::Operation`] with the caller's error, untouched, as soon
    ///   as `check_status` or `fetch_result` fails. Nothing is retried.
    pub async fn run<R, T, E, S, SFut, F, FFut>(
        &self,
        task_id: &TaskId,
        mut check_status: S,
        fetch_result: F,
    ) -> Result<T, PollError<E>>
    where
        R: StatusReport,
        S: FnMut(TaskId) -> SFut,
        SFut: Future<Output = Result<R, E>>,
        F: FnOnce(TaskId, R) -> FFut,
        FFut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.config.max_attempts;
        let mut attempt: u32 = 0;

        while attempt < max_attempts {
            self.ensure_not_cancelled(task_id)?;

            let report = check_status(task_id.clone())
                .await
                .map_err(PollError::Operation)?;
            attempt += 1;

            let status = report.status().clone();
            trace!(task_id = %task_id, attempt, max_attempts, status = %status, "Task status");

            match status {
                TaskStatus::Success => {
                    debug!(task_id = %task_id, attempts = attempt, "Task succeeded, fetching result");
                    return fetch_result(task_id.clone(), report)
                        .await
                        .map_err(PollError::Operation);
                }
                TaskStatus::Failed => {
                    debug!(task_id = %task_id, attempts = attempt, "Task reported failure");
                    return Err(PollError::Failed {
                        task_id: task_id.clone(),
                    });
                }
                TaskStatus::Pending | TaskStatus::Unknown(_) => {}
            }

            if attempt == max_attempts {
                break;
            }

            self.ensure_not_cancelled(task_id)?;
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    return Err(PollError::Cancelled { task_id: task_id.clone() });
                }
                _ = self.clock.sleep(self.config.interval) => {}
            }
        }

        debug!(task_id = %task_id, attempts = attempt, "Attempt budget exhausted");
        Err(PollError::Timeout {
            task_id: task_id.clone(),
            attempts: attempt,
        })
    }

    fn ensure_not_cancelled<E>(&self, task_id: &TaskId) -> Result<(), PollError<E>> {
        if self.cancel.is_cancelled() {
            debug!(task_id = %task_id, "Polling cancelled");
            return Err(PollError::Cancelled {
                task_id: task_id.clone(),
            });
        }
        Ok(())
    }
}
