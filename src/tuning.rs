//! Game balance and track geometry
//!
//! Every gameplay number lives here so a run can be retuned from JSON without
//! touching the simulation. The web build reads overrides from LocalStorage.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Why a tuning document was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// The JSON did not parse into a `Tuning`
    Parse(String),
    /// A field holds a value the simulation cannot run with
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "tuning json did not parse: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning field `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {}

/// Tunable gameplay parameters
///
/// Units: lengths in track pixels, times in milliseconds. Steering values are
/// per frame; speed rates are per millisecond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track ===
    pub track_width: f32,
    pub track_height: f32,
    pub track_margin: f32,
    pub lane_count: usize,

    // === Cars ===
    pub car_width: f32,
    pub car_height: f32,
    pub player_bottom_margin: f32,

    // === Steering ===
    pub steer_accel: f32,
    pub max_steer: f32,
    pub steer_friction: f32,
    pub steer_epsilon: f32,

    // === Speed ===
    pub initial_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub accel_rate: f32,
    pub brake_rate: f32,
    pub passive_decay: f32,

    // === Timing ===
    pub time_unit: f32,
    pub max_frame_dt: f32,

    // === Spawning ===
    pub speed_factor_min: f32,
    pub speed_factor_max: f32,
    pub spawn_extra_offset: f32,
    pub initial_spawn_interval: f32,
    pub spawn_interval_step: f32,
    pub min_spawn_interval: f32,

    // === Scoring ===
    pub score_step: f32,
    pub pass_reward: f32,
    pub despawn_margin: f32,
    pub distance_score_rate: f32,

    /// RNG seed for obstacle placement (0 = let the driver pick one)
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            track_width: TRACK_WIDTH,
            track_height: TRACK_HEIGHT,
            track_margin: TRACK_MARGIN,
            lane_count: LANE_COUNT,

            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,

            steer_accel: STEER_ACCEL,
            max_steer: MAX_STEER,
            steer_friction: STEER_FRICTION,
            steer_epsilon: STEER_EPSILON,

            initial_speed: INITIAL_SPEED,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            accel_rate: ACCEL_RATE,
            brake_rate: BRAKE_RATE,
            passive_decay: PASSIVE_DECAY,

            time_unit: TIME_UNIT,
            max_frame_dt: MAX_FRAME_DT,

            speed_factor_min: SPEED_FACTOR_MIN,
            speed_factor_max: SPEED_FACTOR_MAX,
            spawn_extra_offset: SPAWN_EXTRA_OFFSET,
            initial_spawn_interval: INITIAL_SPAWN_INTERVAL,
            spawn_interval_step: SPAWN_INTERVAL_STEP,
            min_spawn_interval: MIN_SPAWN_INTERVAL,

            score_step: SCORE_STEP,
            pass_reward: PASS_REWARD,
            despawn_margin: DESPAWN_MARGIN,
            distance_score_rate: DISTANCE_SCORE_RATE,

            seed: 0,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the cross-field constraints the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            if ok {
                Ok(())
            } else {
                Err(TuningError::Invalid { field, reason })
            }
        }

        check(self.lane_count >= 1, "lane_count", "must be at least 1")?;
        check(self.track_width > 0.0, "track_width", "must be positive")?;
        check(self.track_height > 0.0, "track_height", "must be positive")?;
        check(self.track_margin >= 0.0, "track_margin", "must not be negative")?;
        check(
            self.car_width > 0.0 && self.car_height > 0.0,
            "car_width",
            "car dimensions must be positive",
        )?;
        check(
            self.car_width <= self.lane_width(),
            "car_width",
            "car must fit inside a lane",
        )?;
        check(
            self.player_y() >= 0.0,
            "player_bottom_margin",
            "player car must sit inside the track",
        )?;
        check(self.steer_accel >= 0.0, "steer_accel", "must not be negative")?;
        check(self.max_steer > 0.0, "max_steer", "must be positive")?;
        check(self.steer_epsilon >= 0.0, "steer_epsilon", "must not be negative")?;
        check(
            (0.0..1.0).contains(&self.steer_friction),
            "steer_friction",
            "must be in [0, 1)",
        )?;
        check(self.min_speed >= 0.0, "min_speed", "must not be negative")?;
        check(
            self.min_speed <= self.max_speed,
            "max_speed",
            "must not be below min_speed",
        )?;
        check(
            (self.min_speed..=self.max_speed).contains(&self.initial_speed),
            "initial_speed",
            "must lie within [min_speed, max_speed]",
        )?;
        // Speed only leaves [min_speed, max_speed] if a rate runs backwards
        check(self.accel_rate >= 0.0, "accel_rate", "must not be negative")?;
        check(self.brake_rate >= 0.0, "brake_rate", "must not be negative")?;
        check(self.passive_decay >= 0.0, "passive_decay", "must not be negative")?;
        check(self.time_unit > 0.0, "time_unit", "must be positive")?;
        check(self.max_frame_dt > 0.0, "max_frame_dt", "must be positive")?;
        check(
            self.speed_factor_min > 0.0 && self.speed_factor_min <= self.speed_factor_max,
            "speed_factor_min",
            "must be positive and not above speed_factor_max",
        )?;
        check(
            self.spawn_extra_offset >= 0.0,
            "spawn_extra_offset",
            "must not be negative",
        )?;
        check(
            self.min_spawn_interval > 0.0,
            "min_spawn_interval",
            "must be positive",
        )?;
        check(
            self.min_spawn_interval <= self.initial_spawn_interval,
            "initial_spawn_interval",
            "must not be below min_spawn_interval",
        )?;
        check(
            self.spawn_interval_step >= 0.0,
            "spawn_interval_step",
            "must not be negative",
        )?;
        check(self.score_step > 0.0, "score_step", "must be positive")?;
        // Score never decreases within a run
        check(self.pass_reward >= 0.0, "pass_reward", "must not be negative")?;
        check(
            self.distance_score_rate >= 0.0,
            "distance_score_rate",
            "must not be negative",
        )?;
        Ok(())
    }

    /// Width of one lane (the drivable interior split evenly)
    #[inline]
    pub fn lane_width(&self) -> f32 {
        (self.track_width - 2.0 * self.track_margin) / self.lane_count as f32
    }

    /// Left edge of a car centred in `lane`
    #[inline]
    pub fn lane_x(&self, lane: usize) -> f32 {
        let lane_width = self.lane_width();
        self.track_margin + lane as f32 * lane_width + (lane_width - self.car_width) / 2.0
    }

    /// Lane whose corridor contains horizontal position `center_x`
    pub fn lane_at(&self, center_x: f32) -> usize {
        let offset = (center_x - self.track_margin) / self.lane_width();
        (offset.max(0.0) as usize).min(self.lane_count - 1)
    }

    /// Lane the player starts in
    #[inline]
    pub fn center_lane(&self) -> usize {
        self.lane_count / 2
    }

    /// Leftmost x the player car may reach
    #[inline]
    pub fn player_min_x(&self) -> f32 {
        self.track_margin
    }

    /// Rightmost x the player car may reach
    #[inline]
    pub fn player_max_x(&self) -> f32 {
        (self.track_width - self.car_width - self.track_margin).max(self.player_min_x())
    }

    /// Fixed row of the player car
    #[inline]
    pub fn player_y(&self) -> f32 {
        self.track_height - self.car_height - self.player_bottom_margin
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "lane_racer_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native: tuning comes from the command line instead
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No {} store on native, using defaults", Self::STORAGE_KEY);
        Self::default()
    }
}
