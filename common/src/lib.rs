pub mod climate;
pub mod config;
pub mod fluctuation;
pub mod scan;
pub mod session;
pub mod types;

pub use climate::{ClimateControlModel, ClimateState, RandomSteps, ScriptedSteps, Step, StepSource};
pub use config::{
    ClimateConfig, ConfigError, InitialClimateState, RuntimeConfig, MAX_FAN_SPEED, MAX_RPM_PER_STEP,
};
pub use fluctuation::FluctuationSimulator;
pub use scan::MaintenanceScan;
pub use session::ClimateSession;
pub use types::{
    AccentColor, AnimationPeriod, ClimateMode, ClimateSnapshot, ScanSnapshot, ScanStatus,
    UnknownMode,
};
