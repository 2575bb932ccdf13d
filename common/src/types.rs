use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClimateMode {
    Heat,
    Cool,
    FanOnly,
}

impl ClimateMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
            Self::FanOnly => "FAN_ONLY",
        }
    }

    /// Human name used to build the status text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Heat => "Heat",
            Self::Cool => "Cool",
            Self::FanOnly => "Fan",
        }
    }

    pub fn accent_color(self) -> AccentColor {
        match self {
            Self::Heat => AccentColor::Orange,
            Self::Cool => AccentColor::Cyan,
            Self::FanOnly => AccentColor::Green,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown climate mode '{0}'")]
pub struct UnknownMode(pub String);

impl FromStr for ClimateMode {
    type Err = UnknownMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HEAT" => Ok(Self::Heat),
            "COOL" => Ok(Self::Cool),
            "FAN_ONLY" | "FAN" => Ok(Self::FanOnly),
            _ => Err(UnknownMode(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationPeriod {
    Stopped,
    Slow,
    Medium,
    Fast,
}

impl AnimationPeriod {
    pub fn from_fan_speed(speed: u8) -> Self {
        match speed {
            0 => Self::Stopped,
            1 => Self::Slow,
            2 => Self::Medium,
            _ => Self::Fast,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Slow => "slow",
            Self::Medium => "medium",
            Self::Fast => "fast",
        }
    }

    /// One blower revolution in the spin animation; `None` while stopped.
    pub fn spin_duration_ms(self) -> Option<u64> {
        match self {
            Self::Stopped => None,
            Self::Slow => Some(3_000),
            Self::Medium => Some(1_500),
            Self::Fast => Some(750),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccentColor {
    Orange,
    Cyan,
    Green,
}

impl AccentColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Orange => "orange",
            Self::Cyan => "cyan",
            Self::Green => "green",
        }
    }

    /// Glow color behind the widget.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Orange => "#fb923c",
            Self::Cyan => "#22d3ee",
            Self::Green => "#34d399",
        }
    }

    pub fn airflow_hex(self) -> &'static str {
        match self {
            Self::Orange => "#f97316",
            Self::Cyan => "#06b6d4",
            Self::Green => "#10b981",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    Idle,
    Running,
}

impl ScanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClimateSnapshot {
    pub mode: &'static str,
    #[serde(rename = "fanSpeed")]
    pub fan_speed: u8,
    pub active: bool,
    #[serde(rename = "targetTemperature")]
    pub target_temperature: i32,
    #[serde(rename = "airQualityIndex")]
    pub air_quality_index: i32,
    #[serde(rename = "humidityPercent")]
    pub humidity_percent: i32,
    pub rpm: u32,
    #[serde(rename = "rpmLabel")]
    pub rpm_label: String,
    #[serde(rename = "animationPeriod")]
    pub animation_period: &'static str,
    #[serde(rename = "spinDurationMs")]
    pub spin_duration_ms: Option<u64>,
    #[serde(rename = "statusLabel")]
    pub status_label: String,
    #[serde(rename = "accentColor")]
    pub accent_color: &'static str,
    #[serde(rename = "glowHex")]
    pub glow_hex: &'static str,
    #[serde(rename = "airflowHex")]
    pub airflow_hex: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSnapshot {
    pub status: &'static str,
    pub busy: bool,
    #[serde(rename = "completedScans")]
    pub completed_scans: u64,
}
