use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ClimateMode;

pub const MAX_FAN_SPEED: u8 = 3;
pub const MAX_RPM_PER_STEP: u32 = 2_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("{name} range is inverted ({min} > {max})")]
    InvertedRange {
        name: &'static str,
        min: i32,
        max: i32,
    },
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    pub fluctuation_interval_ms: u64,
    pub scan_duration_ms: u64,
    pub rpm_per_step: u32,
    pub aqi_min: i32,
    pub aqi_max: i32,
    pub humidity_min: i32,
    pub humidity_max: i32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            fluctuation_interval_ms: 5_000,
            scan_duration_ms: 2_500,
            rpm_per_step: 450,
            aqi_min: 8,
            aqi_max: 45,
            humidity_min: 30,
            humidity_max: 55,
        }
    }
}

impl ClimateConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fluctuation_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("fluctuation_interval_ms"));
        }
        if self.scan_duration_ms == 0 {
            return Err(ConfigError::ZeroInterval("scan_duration_ms"));
        }
        if !(1..=MAX_RPM_PER_STEP).contains(&self.rpm_per_step) {
            return Err(ConfigError::OutOfRange {
                name: "rpm_per_step",
                value: u64::from(self.rpm_per_step),
                min: 1,
                max: u64::from(MAX_RPM_PER_STEP),
            });
        }
        if self.aqi_min > self.aqi_max {
            return Err(ConfigError::InvertedRange {
                name: "aqi",
                min: self.aqi_min,
                max: self.aqi_max,
            });
        }
        if self.humidity_min > self.humidity_max {
            return Err(ConfigError::InvertedRange {
                name: "humidity",
                min: self.humidity_min,
                max: self.humidity_max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialClimateState {
    pub mode: ClimateMode,
    pub fan_speed: u8,
    pub target_temperature: i32,
    pub air_quality_index: i32,
    pub humidity_percent: i32,
}

impl Default for InitialClimateState {
    fn default() -> Self {
        Self {
            mode: ClimateMode::Heat,
            fan_speed: 2,
            target_temperature: 72,
            air_quality_index: 14,
            humidity_percent: 42,
        }
    }
}

impl InitialClimateState {
    pub fn sanitize(&mut self, config: &ClimateConfig) {
        self.fan_speed = self.fan_speed.min(MAX_FAN_SPEED);
        self.air_quality_index = self
            .air_quality_index
            .clamp(config.aqi_min, config.aqi_max);
        self.humidity_percent = self
            .humidity_percent
            .clamp(config.humidity_min, config.humidity_max);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub climate: ClimateConfig,
    pub initial: InitialClimateState,
    pub http_port: u16,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            climate: ClimateConfig::default(),
            initial: InitialClimateState::default(),
            http_port: 8080,
        }
    }
}
