use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{
    config::{ClimateConfig, InitialClimateState, MAX_FAN_SPEED},
    types::{AccentColor, AnimationPeriod, ClimateMode, ClimateSnapshot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}

impl Step {
    pub fn delta(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

/// Supplies the direction of each ambient reading perturbation.
pub trait StepSource {
    fn next_step(&mut self) -> Step;
}

#[derive(Debug, Clone)]
pub struct RandomSteps<R> {
    rng: R,
}

impl<R: Rng> RandomSteps<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSteps<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> StepSource for RandomSteps<R> {
    fn next_step(&mut self) -> Step {
        if self.rng.random_bool(0.5) {
            Step::Up
        } else {
            Step::Down
        }
    }
}

/// Replays a fixed sequence, then keeps stepping up.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSteps {
    steps: VecDeque<Step>,
}

impl ScriptedSteps {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }
}

impl StepSource for ScriptedSteps {
    fn next_step(&mut self) -> Step {
        self.steps.pop_front().unwrap_or(Step::Up)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClimateState {
    pub mode: ClimateMode,
    pub fan_speed: u8,
    pub target_temperature: i32,
    pub air_quality_index: i32,
    pub humidity_percent: i32,
}

impl ClimateState {
    pub fn is_active(&self) -> bool {
        self.fan_speed > 0
    }
}

#[derive(Debug, Clone)]
pub struct ClimateControlModel {
    config: ClimateConfig,
    state: ClimateState,
}

impl ClimateControlModel {
    pub fn new(config: ClimateConfig, mut initial: InitialClimateState) -> Self {
        initial.sanitize(&config);
        Self {
            config,
            state: ClimateState {
                mode: initial.mode,
                fan_speed: initial.fan_speed,
                target_temperature: initial.target_temperature,
                air_quality_index: initial.air_quality_index,
                humidity_percent: initial.humidity_percent,
            },
        }
    }

    pub fn config(&self) -> &ClimateConfig {
        &self.config
    }

    pub fn state(&self) -> &ClimateState {
        &self.state
    }

    pub fn mode(&self) -> ClimateMode {
        self.state.mode
    }

    pub fn fan_speed(&self) -> u8 {
        self.state.fan_speed
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn target_temperature(&self) -> i32 {
        self.state.target_temperature
    }

    pub fn air_quality_index(&self) -> i32 {
        self.state.air_quality_index
    }

    pub fn humidity_percent(&self) -> i32 {
        self.state.humidity_percent
    }

    pub fn set_mode(&mut self, mode: ClimateMode) -> bool {
        if self.state.mode != mode {
            self.state.mode = mode;
            true
        } else {
            false
        }
    }

    pub fn increment_fan(&mut self) -> bool {
        if self.state.fan_speed >= MAX_FAN_SPEED {
            return false;
        }
        self.state.fan_speed += 1;
        true
    }

    pub fn decrement_fan(&mut self) -> bool {
        if self.state.fan_speed == 0 {
            return false;
        }
        self.state.fan_speed -= 1;
        true
    }

    /// Out-of-range speeds are clamped rather than rejected.
    pub fn set_fan_speed(&mut self, speed: i64) -> bool {
        let clamped = speed.clamp(0, i64::from(MAX_FAN_SPEED)) as u8;
        if i64::from(clamped) != speed {
            debug!("fan speed {speed} clamped to {clamped}");
        }
        if self.state.fan_speed != clamped {
            self.state.fan_speed = clamped;
            true
        } else {
            false
        }
    }

    pub fn increment_temp(&mut self) {
        self.state.target_temperature = self.state.target_temperature.saturating_add(1);
    }

    pub fn decrement_temp(&mut self) {
        self.state.target_temperature = self.state.target_temperature.saturating_sub(1);
    }

    /// Nudges AQI and humidity by one step each, drawn independently.
    pub fn tick_fluctuation(&mut self, steps: &mut impl StepSource) {
        let aqi_step = steps.next_step();
        let humidity_step = steps.next_step();

        self.state.air_quality_index = (self.state.air_quality_index + aqi_step.delta())
            .clamp(self.config.aqi_min, self.config.aqi_max);
        self.state.humidity_percent = (self.state.humidity_percent + humidity_step.delta())
            .clamp(self.config.humidity_min, self.config.humidity_max);

        debug!(
            aqi = self.state.air_quality_index,
            humidity = self.state.humidity_percent,
            "ambient readings fluctuated"
        );
    }

    pub fn rpm(&self) -> u32 {
        if self.is_active() {
            u32::from(self.state.fan_speed).saturating_mul(self.config.rpm_per_step)
        } else {
            0
        }
    }

    pub fn animation_period(&self) -> AnimationPeriod {
        AnimationPeriod::from_fan_speed(self.state.fan_speed)
    }

    pub fn status_label(&self) -> String {
        if self.is_active() {
            format!("Active • {}ing", self.state.mode.label())
        } else {
            "Standby".to_string()
        }
    }

    pub fn accent_color(&self) -> AccentColor {
        self.state.mode.accent_color()
    }

    pub fn snapshot(&self) -> ClimateSnapshot {
        let accent = self.accent_color();
        let period = self.animation_period();
        let rpm = self.rpm();

        ClimateSnapshot {
            mode: self.state.mode.as_str(),
            fan_speed: self.state.fan_speed,
            active: self.is_active(),
            target_temperature: self.state.target_temperature,
            air_quality_index: self.state.air_quality_index,
            humidity_percent: self.state.humidity_percent,
            rpm,
            rpm_label: format!("{rpm} RPM"),
            animation_period: period.as_str(),
            spin_duration_ms: period.spin_duration_ms(),
            status_label: self.status_label(),
            accent_color: accent.as_str(),
            glow_hex: accent.hex(),
            airflow_hex: accent.airflow_hex(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn model() -> ClimateControlModel {
        ClimateControlModel::new(ClimateConfig::default(), InitialClimateState::default())
    }

    #[test]
    fn starts_from_initial_values() {
        let model = model();

        assert_eq!(
            model.state(),
            &ClimateState {
                mode: ClimateMode::Heat,
                fan_speed: 2,
                target_temperature: 72,
                air_quality_index: 14,
                humidity_percent: 42,
            }
        );
        assert!(model.is_active());
    }

    #[test]
    fn construction_clamps_initial_values_once() {
        let model = ClimateControlModel::new(
            ClimateConfig::default(),
            InitialClimateState {
                fan_speed: 9,
                air_quality_index: 90,
                humidity_percent: 0,
                ..InitialClimateState::default()
            },
        );

        assert_eq!(model.config(), &ClimateConfig::default());
        assert_eq!(model.fan_speed(), 3);
        assert_eq!(model.air_quality_index(), 45);
        assert_eq!(model.humidity_percent(), 30);
    }

    #[test]
    fn fan_is_idempotent_at_bounds() {
        let mut model = model();
        assert!(model.set_fan_speed(0));
        let before = model.state().clone();
        assert!(!model.decrement_fan());
        assert_eq!(model.state(), &before);

        assert!(model.set_fan_speed(3));
        let before = model.state().clone();
        assert!(!model.increment_fan());
        assert_eq!(model.state(), &before);
    }

    #[test]
    fn set_fan_speed_clamps_out_of_range_input() {
        let mut model = model();

        assert!(model.set_fan_speed(12));
        assert_eq!(model.fan_speed(), 3);

        assert!(model.set_fan_speed(-4));
        assert_eq!(model.fan_speed(), 0);
        assert!(!model.is_active());

        assert!(!model.set_fan_speed(0));
    }

    #[test]
    fn rpm_tracks_fan_speed() {
        let mut model = model();

        model.set_fan_speed(0);
        assert_eq!(model.rpm(), 0);

        model.set_fan_speed(3);
        assert_eq!(model.rpm(), 1_350);
        assert_eq!(model.snapshot().rpm_label, "1350 RPM");
    }

    #[test]
    fn fan_ceiling_and_rpm_hold_for_extreme_inputs() {
        let config = ClimateConfig {
            rpm_per_step: u32::MAX,
            ..ClimateConfig::default()
        };
        let mut model = ClimateControlModel::new(config, InitialClimateState::default());

        model.set_fan_speed(7);
        assert_eq!(model.fan_speed(), 3);
        assert_eq!(model.animation_period(), AnimationPeriod::Fast);
        assert_eq!(model.rpm(), u32::MAX);
        assert_eq!(model.snapshot().fan_speed, 3);
    }

    #[test]
    fn mode_switch_only_changes_derived_colors() {
        let mut model = model();
        let before = model.state().clone();

        assert!(model.set_mode(ClimateMode::Cool));
        assert!(!model.set_mode(ClimateMode::Cool));

        let after = model.state();
        assert_eq!(after.fan_speed, before.fan_speed);
        assert_eq!(after.target_temperature, before.target_temperature);
        assert_eq!(after.air_quality_index, before.air_quality_index);
        assert_eq!(after.humidity_percent, before.humidity_percent);
        assert_eq!(model.accent_color(), AccentColor::Cyan);
        assert_eq!(model.status_label(), "Active • Cooling");

        assert!(model.set_mode(ClimateMode::Heat));
        assert_eq!(model.state(), &before);
        let snapshot = model.snapshot();
        assert_eq!(model.accent_color(), AccentColor::Orange);
        assert_eq!(snapshot.accent_color, "orange");
        assert_eq!(snapshot.glow_hex, "#fb923c");
        assert_eq!(snapshot.airflow_hex, "#f97316");
    }

    #[test]
    fn temperature_steps_leave_fan_alone() {
        let mut model = model();

        model.increment_temp();
        model.increment_temp();

        assert_eq!(model.target_temperature(), 74);
        assert_eq!(model.fan_speed(), 2);

        for _ in 0..100 {
            model.decrement_temp();
        }
        assert_eq!(model.target_temperature(), -26);
    }

    #[test]
    fn status_label_follows_activity_and_mode() {
        let mut model = model();

        model.set_fan_speed(0);
        assert_eq!(model.status_label(), "Standby");

        model.set_fan_speed(1);
        model.set_mode(ClimateMode::Cool);
        assert_eq!(model.status_label(), "Active • Cooling");

        model.set_mode(ClimateMode::Heat);
        assert_eq!(model.status_label(), "Active • Heating");
    }

    #[test]
    fn tick_draws_aqi_then_humidity() {
        let mut model = model();
        let mut steps = ScriptedSteps::new([Step::Down, Step::Up, Step::Up, Step::Up]);

        model.tick_fluctuation(&mut steps);
        assert_eq!(model.air_quality_index(), 13);
        assert_eq!(model.humidity_percent(), 43);

        model.tick_fluctuation(&mut steps);
        assert_eq!(model.air_quality_index(), 14);
        assert_eq!(model.humidity_percent(), 44);
    }

    #[test]
    fn tick_clamps_at_range_edges() {
        let config = ClimateConfig::default();
        let mut model = ClimateControlModel::new(
            config,
            InitialClimateState {
                air_quality_index: 8,
                humidity_percent: 55,
                ..InitialClimateState::default()
            },
        );
        let mut steps = ScriptedSteps::new([Step::Down, Step::Up]);

        model.tick_fluctuation(&mut steps);

        assert_eq!(model.air_quality_index(), 8);
        assert_eq!(model.humidity_percent(), 55);
    }

    #[test]
    fn snapshot_carries_state_and_derivations() {
        let mut model = model();
        model.set_mode(ClimateMode::FanOnly);
        model.set_fan_speed(1);

        let snapshot = model.snapshot();

        assert_eq!(
            snapshot,
            ClimateSnapshot {
                mode: "FAN_ONLY",
                fan_speed: 1,
                active: true,
                target_temperature: 72,
                air_quality_index: 14,
                humidity_percent: 42,
                rpm: 450,
                rpm_label: "450 RPM".to_string(),
                animation_period: "slow",
                spin_duration_ms: Some(3_000),
                status_label: "Active • Faning".to_string(),
                accent_color: "green",
                glow_hex: "#34d399",
                airflow_hex: "#10b981",
            }
        );
    }

    #[test]
    fn seeded_steps_are_reproducible() {
        let mut first = RandomSteps::seeded(7);
        let mut second = RandomSteps::seeded(7);

        let a: Vec<_> = (0..32).map(|_| first.next_step()).collect();
        let b: Vec<_> = (0..32).map(|_| second.next_step()).collect();

        assert_eq!(a, b);
    }

    #[derive(Debug, Clone)]
    enum FanCommand {
        Up,
        Down,
        Set(i64),
    }

    fn fan_command() -> impl Strategy<Value = FanCommand> {
        prop_oneof![
            Just(FanCommand::Up),
            Just(FanCommand::Down),
            (-10i64..10).prop_map(FanCommand::Set),
        ]
    }

    proptest! {
        #[test]
        fn fan_speed_stays_in_range(commands in proptest::collection::vec(fan_command(), 0..64)) {
            let mut model = model();
            for command in commands {
                match command {
                    FanCommand::Up => { model.increment_fan(); }
                    FanCommand::Down => { model.decrement_fan(); }
                    FanCommand::Set(speed) => { model.set_fan_speed(speed); }
                }
                prop_assert!(model.fan_speed() <= 3);
                prop_assert_eq!(model.is_active(), model.fan_speed() > 0);
                prop_assert_eq!(model.snapshot().active, model.fan_speed() > 0);
            }
        }

        #[test]
        fn readings_stay_in_range(seed in any::<u64>(), ticks in 0usize..400) {
            let mut model = model();
            let mut steps = RandomSteps::seeded(seed);
            for _ in 0..ticks {
                model.tick_fluctuation(&mut steps);
                prop_assert!((8..=45).contains(&model.air_quality_index()));
                prop_assert!((30..=55).contains(&model.humidity_percent()));
            }
        }
    }
}
