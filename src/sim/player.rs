//! Player state: position, survival meters, flashlight, wallet
//!
//! Meters are clamped on every write, so no sequence of ticks can push health,
//! sanity or battery outside `[0, max]`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::World;
use super::radio::Band;
use crate::consts::*;
use crate::tuning::Tuning;

/// Health regenerated per second inside a sanctuary
const SAFE_HEALTH_REGEN: f32 = 1.2;
/// Sanity regenerated per second inside a sanctuary
const SAFE_SANITY_REGEN: f32 = 3.3;
/// Battery recharged per second inside a sanctuary
const SAFE_BATTERY_REGEN: f32 = 2.2;

/// Below this battery level the dark starts hurting
const LOW_BATTERY: f32 = 14.0;
/// Sanity drain multiplier inside the silent zone
const SILENT_ZONE_FACTOR: f32 = 1.4;

/// Battery drain per second while the flashlight is on
pub fn battery_drain_rate(night: u8) -> f32 {
    2.0 + night as f32 * 0.25
}

/// Sanity drain per second outside sanctuaries
pub fn sanity_drain_rate(night: u8) -> f32 {
    0.58 + night as f32 * 0.14
}

/// Health drain per second when exposed with a weak battery
pub fn dark_health_drain_rate(night: u8) -> f32 {
    0.48 + night as f32 * 0.06
}

/// Silent zone is only active on later nights
pub fn in_silent_zone(pos: Vec2, night: u8) -> bool {
    night >= SILENT_ZONE_FIRST_NIGHT && pos.x > SILENT_ZONE_MIN_X && pos.x < SILENT_ZONE_MAX_X
}

/// A clamped gauge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    current: f32,
    max: f32,
}

impl Meter {
    pub fn full(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn new(current: f32, max: f32) -> Self {
        let mut meter = Self::full(max);
        meter.set(current);
        meter
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn set(&mut self, value: f32) {
        // NaN never reaches the meter
        self.current = if value.is_nan() { self.current } else { value.clamp(0.0, self.max) };
    }

    pub fn add(&mut self, amount: f32) {
        self.set(self.current + amount);
    }

    pub fn drain(&mut self, amount: f32) {
        self.set(self.current - amount);
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }
}

/// Four-way movement intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Unit direction (zero when idle or opposing keys cancel)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Side effects of a meter update worth reporting
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeterReport {
    /// Flashlight was forced off this tick
    pub battery_died: bool,
    pub silent_zone: bool,
}

/// The single player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec2,
    pub health: Meter,
    pub sanity: Meter,
    pub battery: Meter,
    pub flashlight_on: bool,
    pub credits: u32,
    pub ward_chips: u32,
    /// Band selector; tunes radios and picks supply hut items
    pub selected_band: Band,
}

impl PlayerState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
            health: Meter::full(tuning.max_health),
            sanity: Meter::full(tuning.max_sanity),
            battery: Meter::full(tuning.max_battery),
            flashlight_on: true,
            credits: tuning.starting_credits,
            ward_chips: tuning.starting_ward_chips,
            selected_band: Band::Am,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_empty() || self.sanity.is_empty()
    }

    pub fn move_to_spawn(&mut self) {
        self.pos = Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
    }

    /// Carry-over healing between nights
    pub fn restore_for_new_night(&mut self, tuning: &Tuning) {
        self.health.add(tuning.night_health_restore);
        self.sanity.add(tuning.night_sanity_restore);
        self.battery.add(tuning.night_battery_restore);
    }

    /// Flip the flashlight; an empty battery keeps it off. Returns the new state.
    pub fn toggle_flashlight(&mut self) -> bool {
        self.flashlight_on = !self.flashlight_on && !self.battery.is_empty();
        self.flashlight_on
    }

    /// Move by intent, clamp to the hall, then resolve against walls
    pub fn step_movement(&mut self, intent: MoveIntent, world: &World, night: u8, speed: f32, dt: f32) {
        let from = self.pos;
        let mut to = from + intent.direction() * speed * dt;
        to.x = to.x.clamp(PLAYER_MIN_X, PLAYER_MAX_X);
        to.y = to.y.clamp(PLAYER_MIN_Y, PLAYER_MAX_Y);
        self.pos = world.slide_move(from, to, night);
    }

    /// Battery drain, sanctuary regen, sanity and darkness drain
    pub fn update_meters(&mut self, night: u8, in_safe: bool, dt: f32) -> MeterReport {
        let mut report = MeterReport::default();

        if self.flashlight_on {
            self.battery.drain(battery_drain_rate(night) * dt);
            if self.battery.is_empty() {
                self.flashlight_on = false;
                report.battery_died = true;
            }
        }

        report.silent_zone = in_silent_zone(self.pos, night);

        if in_safe {
            self.sanity.add(SAFE_SANITY_REGEN * dt);
            self.health.add(SAFE_HEALTH_REGEN * dt);
            self.battery.add(SAFE_BATTERY_REGEN * dt);
        } else {
            let factor = if report.silent_zone { SILENT_ZONE_FACTOR } else { 1.0 };
            self.sanity.drain(sanity_drain_rate(night) * factor * dt);

            if self.battery.current() < LOW_BATTERY {
                self.health.drain(dark_health_drain_rate(night) * dt);
            }
        }

        report
    }
}
