use std::{sync::Arc, time::Duration};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::climate::{ClimateControlModel, StepSource};

/// Periodically perturbs the ambient readings of a shared model.
///
/// The background task is owned by this value: [`stop`](Self::stop) cancels it
/// and waits for it to exit, and dropping the simulator cancels it as well.
pub struct FluctuationSimulator {
    handle: Option<JoinHandle<()>>,
    cancel_token: CancellationToken,
}

impl FluctuationSimulator {
    /// Starts ticking; the first tick lands one full `period` after this call.
    pub fn start<S>(model: Arc<Mutex<ClimateControlModel>>, period: Duration, mut steps: S) -> Self
    where
        S: StepSource + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => {
                        debug!("fluctuation simulator cancelled");
                        break;
                    }
                    _ = ticker.tick() => {
                        let mut model = model.lock().await;
                        if task_token.is_cancelled() {
                            break;
                        }
                        model.tick_fluctuation(&mut steps);
                    }
                }
            }
        });

        Self {
            handle: Some(handle),
            cancel_token,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.cancel_token.is_cancelled()
            && self
                .handle
                .as_ref()
                .map(|handle| !handle.is_finished())
                .unwrap_or(false)
    }

    /// Cancels the timer and waits for the task to exit. No tick is applied
    /// after this returns.
    pub async fn stop(mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for FluctuationSimulator {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
