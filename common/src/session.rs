use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::info;

use crate::{
    climate::{ClimateControlModel, RandomSteps, StepSource},
    config::{ClimateConfig, ConfigError, InitialClimateState},
    fluctuation::FluctuationSimulator,
    scan::MaintenanceScan,
    types::{ClimateMode, ClimateSnapshot, ScanSnapshot},
};

/// One mounted climate widget: its model, its fluctuation timer while
/// mounted, and the maintenance scan attached to it.
pub struct ClimateSession {
    model: Arc<Mutex<ClimateControlModel>>,
    simulator: Option<FluctuationSimulator>,
    scan: MaintenanceScan,
    fluctuation_interval: Duration,
}

impl ClimateSession {
    /// Rejects configs the timer or the derived views cannot run with.
    pub fn new(config: ClimateConfig, initial: InitialClimateState) -> Result<Self, ConfigError> {
        config.validate()?;
        let fluctuation_interval = Duration::from_millis(config.fluctuation_interval_ms);
        let scan = MaintenanceScan::new(Duration::from_millis(config.scan_duration_ms));
        Ok(Self {
            model: Arc::new(Mutex::new(ClimateControlModel::new(config, initial))),
            simulator: None,
            scan,
            fluctuation_interval,
        })
    }

    pub fn is_mounted(&self) -> bool {
        self.simulator
            .as_ref()
            .map(FluctuationSimulator::is_running)
            .unwrap_or(false)
    }

    pub fn mount(&mut self) -> bool {
        self.mount_with(RandomSteps::from_entropy())
    }

    /// Starts the fluctuation timer with the given direction source. Returns
    /// `false` when the widget is already mounted.
    pub fn mount_with<S>(&mut self, steps: S) -> bool
    where
        S: StepSource + Send + 'static,
    {
        if self.is_mounted() {
            return false;
        }
        self.simulator = Some(FluctuationSimulator::start(
            self.model.clone(),
            self.fluctuation_interval,
            steps,
        ));
        info!(
            interval_ms = self.fluctuation_interval.as_millis() as u64,
            "climate widget mounted"
        );
        true
    }

    pub async fn unmount(&mut self) -> bool {
        let Some(simulator) = self.simulator.take() else {
            return false;
        };
        simulator.stop().await;
        info!("climate widget unmounted");
        true
    }

    pub fn model(&self) -> Arc<Mutex<ClimateControlModel>> {
        self.model.clone()
    }

    pub fn scan(&self) -> &MaintenanceScan {
        &self.scan
    }

    pub async fn snapshot(&self) -> ClimateSnapshot {
        self.model.lock().await.snapshot()
    }

    pub fn scan_snapshot(&self) -> ScanSnapshot {
        self.scan.snapshot()
    }

    pub async fn set_mode(&self, mode: ClimateMode) -> bool {
        self.model.lock().await.set_mode(mode)
    }

    pub async fn increment_fan(&self) -> bool {
        self.model.lock().await.increment_fan()
    }

    pub async fn decrement_fan(&self) -> bool {
        self.model.lock().await.decrement_fan()
    }

    pub async fn set_fan_speed(&self, speed: i64) -> bool {
        self.model.lock().await.set_fan_speed(speed)
    }

    pub async fn increment_temp(&self) {
        self.model.lock().await.increment_temp();
    }

    pub async fn decrement_temp(&self) {
        self.model.lock().await.decrement_temp();
    }

    pub fn start_scan(&self) -> bool {
        self.scan.start_scan()
    }
}
