use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::types::{ScanSnapshot, ScanStatus};

#[derive(Debug)]
struct ScanInner {
    status: watch::Sender<ScanStatus>,
    completed: AtomicU64,
}

/// Simulated maintenance diagnostic: Idle -> Running -> Idle after a fixed
/// delay. At most one scan is in flight and a running scan cannot be cancelled.
#[derive(Debug, Clone)]
pub struct MaintenanceScan {
    inner: Arc<ScanInner>,
    duration: Duration,
}

impl MaintenanceScan {
    pub fn new(duration: Duration) -> Self {
        let (status, _) = watch::channel(ScanStatus::Idle);
        Self {
            inner: Arc::new(ScanInner {
                status,
                completed: AtomicU64::new(0),
            }),
            duration,
        }
    }

    /// Returns `false` without side effects when a scan is already running.
    pub fn start_scan(&self) -> bool {
        let started = self.inner.status.send_if_modified(|status| {
            if *status == ScanStatus::Idle {
                *status = ScanStatus::Running;
                true
            } else {
                false
            }
        });

        if !started {
            debug!("maintenance scan already running");
            return false;
        }

        info!("maintenance scan started");
        let inner = self.inner.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let completed = inner.completed.fetch_add(1, Ordering::SeqCst) + 1;
            inner.status.send_replace(ScanStatus::Idle);
            info!(completed, "maintenance scan finished");
        });

        true
    }

    pub fn status(&self) -> ScanStatus {
        *self.inner.status.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.status() == ScanStatus::Running
    }

    pub fn completed_scans(&self) -> u64 {
        self.inner.completed.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanStatus> {
        self.inner.status.subscribe()
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        let status = self.status();
        ScanSnapshot {
            status: status.as_str(),
            busy: status == ScanStatus::Running,
            completed_scans: self.completed_scans(),
        }
    }
}
