//! Data-driven game balance
//!
//! Values a designer would reasonably tweak between builds. Fixed world
//! layout lives in [`crate::consts`]; everything here can be overridden from
//! a JSON document, with missing fields falling back to the defaults.

use serde::{Deserialize, Serialize};

/// Errors raised while loading a tuning document
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    /// The document is not valid JSON or has mistyped fields
    #[error("malformed tuning document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but makes no sense for the simulation
    #[error("tuning value `{field}` out of range: {value}")]
    OutOfRange {
        /// Offending field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
}

/// Supply hut prices and what each purchase grants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopCatalog {
    /// Fuse: extends the night countdown
    pub fuse_cost: u32,
    pub fuse_seconds: f32,
    /// Battery cell: refills the flashlight battery
    pub battery_cost: u32,
    pub battery_amount: f32,
    /// Ward chip: dampens the next creature hit
    pub ward_chip_cost: u32,
}

impl Default for ShopCatalog {
    fn default() -> Self {
        Self {
            fuse_cost: 16,
            fuse_seconds: 18.0,
            battery_cost: 18,
            battery_amount: 38.0,
            ward_chip_cost: 20,
        }
    }
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Night ===
    /// Countdown length of every night (seconds)
    pub night_length: f32,
    /// Fuses cannot push the countdown beyond `night_length + night_time_cap_bonus`
    pub night_time_cap_bonus: f32,
    /// Meter restoration granted when a new night starts
    pub night_health_restore: f32,
    pub night_sanity_restore: f32,
    pub night_battery_restore: f32,

    // === Radio objective ===
    /// Time to finish an active radio task (seconds)
    pub radio_window: f32,
    /// Dormant delay is drawn from [radio_delay_min, radio_delay_min + radio_delay_jitter)
    pub radio_delay_min: f32,
    pub radio_delay_jitter: f32,
    /// Credits for a stabilized radio: base + per_night * night
    pub radio_reward_base: u32,
    pub radio_reward_per_night: u32,
    /// Sanity granted on stabilization
    pub radio_sanity_bonus: f32,
    /// How long hidden doors stay open after stabilization (seconds)
    pub door_reveal_seconds: f32,

    // === Player ===
    /// Movement speed (units/second)
    pub player_speed: f32,
    pub max_health: f32,
    pub max_sanity: f32,
    pub max_battery: f32,
    pub starting_credits: u32,
    pub starting_ward_chips: u32,
    /// Fraction of creature damage that still lands when a ward chip is spent
    pub ward_chip_damage_scale: f32,

    // === Economy ===
    pub shop: ShopCatalog,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            night_length: 180.0,
            night_time_cap_bonus: 40.0,
            night_health_restore: 20.0,
            night_sanity_restore: 26.0,
            night_battery_restore: 35.0,

            radio_window: 30.0,
            radio_delay_min: 10.0,
            radio_delay_jitter: 4.0,
            radio_reward_base: 8,
            radio_reward_per_night: 2,
            radio_sanity_bonus: 6.0,
            door_reveal_seconds: 18.0,

            player_speed: 255.0,
            max_health: 100.0,
            max_sanity: 100.0,
            max_battery: 100.0,
            starting_credits: 35,
            starting_ward_chips: 0,
            ward_chip_damage_scale: 0.35,

            shop: ShopCatalog::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: night {}s, radio window {}s",
            tuning.night_length,
            tuning.radio_window
        );
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("night_length", self.night_length),
            ("radio_window", self.radio_window),
            ("radio_delay_min", self.radio_delay_min),
            ("player_speed", self.player_speed),
            ("max_health", self.max_health),
            ("max_sanity", self.max_sanity),
            ("max_battery", self.max_battery),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }

        let non_negative = [
            ("night_time_cap_bonus", self.night_time_cap_bonus),
            ("night_health_restore", self.night_health_restore),
            ("night_sanity_restore", self.night_sanity_restore),
            ("night_battery_restore", self.night_battery_restore),
            ("radio_delay_jitter", self.radio_delay_jitter),
            ("radio_sanity_bonus", self.radio_sanity_bonus),
            ("door_reveal_seconds", self.door_reveal_seconds),
            ("shop.fuse_seconds", self.shop.fuse_seconds),
            ("shop.battery_amount", self.shop.battery_amount),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.ward_chip_damage_scale) {
            return Err(TuningError::OutOfRange {
                field: "ward_chip_damage_scale",
                value: self.ward_chip_damage_scale,
            });
        }

        Ok(())
    }

    /// Longest the night countdown may be extended to
    pub fn night_time_cap(&self) -> f32 {
        self.night_length + self.night_time_cap_bonus
    }

    /// Credits awarded for stabilizing a radio on `night`
    pub fn radio_reward(&self, night: u8) -> u32 {
        self.radio_reward_base + self.radio_reward_per_night * night as u32
    }
}
