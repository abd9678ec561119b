//! Night controller: countdown, difficulty, objective and creature cadence
//!
//! Owns the radio objective and the creature population. Transitions that
//! touch the player or the world (new night, doors) are carried out by
//! [`super::GameState`], which calls back into here.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::creature::{CreatureKind, Creatures};
use super::geometry::World;
use super::player::PlayerState;
use super::radio::{Band, RadioObjective, RadioResponse, RadioTick};
use super::state::GameEvent;
use crate::consts::TOTAL_NIGHTS;
use crate::tuning::Tuning;

/// Radios the night asks for
pub fn required_radios(night: u8) -> u32 {
    (3 + night.saturating_sub(1) as u32 / 2).min(5)
}

/// Seconds between creature spawns once the night has failed
pub fn failure_spawn_interval(night: u8) -> f32 {
    (14.0 - 0.8 * night as f32).max(8.0)
}

/// Run outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    /// Survived night 7
    Victory,
    /// Health or sanity ran out
    Defeat,
}

/// Countdown result, applied by the caller after the death check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightTransition {
    Continue,
    Advance(u8),
    Victory,
}

#[derive(Debug, Clone)]
pub struct NightController {
    /// 1..=7
    pub night: u8,
    pub time_left: f32,
    pub required_radios: u32,
    pub radios_completed: u32,
    /// Radio window missed; creatures keep coming until dawn
    pub failed: bool,
    pub failure_spawn_timer: f32,
    pub radio: RadioObjective,
    pub creatures: Creatures,
    pub outcome: Outcome,
}

impl NightController {
    /// Night 1 of a fresh run
    pub fn new(tuning: &Tuning, rng: &mut impl Rng) -> Self {
        Self {
            night: 1,
            time_left: tuning.night_length,
            required_radios: required_radios(1),
            radios_completed: 0,
            failed: false,
            failure_spawn_timer: failure_spawn_interval(1),
            radio: RadioObjective::dormant(tuning, rng),
            creatures: Creatures::default(),
            outcome: Outcome::Ongoing,
        }
    }

    /// Reset per-night state for `night`
    pub fn begin(&mut self, night: u8, tuning: &Tuning, rng: &mut impl Rng) {
        // Night index never goes backwards within a run
        self.night = night.clamp(self.night, TOTAL_NIGHTS);
        self.time_left = tuning.night_length;
        self.required_radios = required_radios(self.night);
        self.radios_completed = 0;
        self.failed = false;
        self.failure_spawn_timer = failure_spawn_interval(self.night);
        self.radio = RadioObjective::dormant(tuning, rng);
        self.creatures.clear();
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::Ongoing
    }

    /// Fuse purchase: more time, up to `cap`
    pub fn extend_countdown(&mut self, seconds: f32, cap: f32) {
        self.time_left = (self.time_left + seconds).min(cap);
    }

    /// Advance the radio objective; a missed window fails the night
    pub fn tick_objective(
        &mut self,
        dt: f32,
        world: &World,
        tuning: &Tuning,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        match self.radio.tick(dt, world.radios.len(), tuning, rng) {
            RadioTick::Quiet => {}
            RadioTick::Activated {
                node,
                band,
                presses_needed,
            } => {
                log::debug!("Radio {} live on {} x{}", node + 1, band, presses_needed);
                events.push(GameEvent::RadioLive {
                    node,
                    band,
                    presses_needed,
                });
            }
            RadioTick::Failed { node } => self.fail(node, rng, events),
        }
    }

    /// Missed radio window: permanent for the rest of the night
    fn fail(&mut self, node: usize, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        self.failed = true;
        self.radio = RadioObjective::Offline;
        log::info!("Night {}: radio {} window missed, creatures released", self.night, node + 1);
        events.push(GameEvent::RadioFailed { node });

        for kind in CreatureKind::ALL {
            let enemy = self.creatures.spawn(Some(kind), self.night, rng);
            events.push(GameEvent::CreatureSpawned {
                id: enemy.id,
                kind: enemy.kind,
            });
        }
    }

    /// Failure spawn cadence and the night countdown
    pub fn tick_countdown(&mut self, dt: f32, rng: &mut impl Rng, events: &mut Vec<GameEvent>) -> NightTransition {
        if self.failed {
            self.failure_spawn_timer -= dt;
            if self.failure_spawn_timer <= 0.0 {
                self.failure_spawn_timer = failure_spawn_interval(self.night);
                let enemy = self.creatures.spawn(None, self.night, rng);
                events.push(GameEvent::CreatureSpawned {
                    id: enemy.id,
                    kind: enemy.kind,
                });
            }
        }

        self.time_left = (self.time_left - dt).max(0.0);
        if self.time_left > 0.0 {
            NightTransition::Continue
        } else if self.night >= TOTAL_NIGHTS {
            NightTransition::Victory
        } else {
            NightTransition::Advance(self.night + 1)
        }
    }

    /// Player used radio node `node` (already range-checked)
    pub fn interact_radio(
        &mut self,
        node: usize,
        band: Band,
        player: &mut PlayerState,
        world: &mut World,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> GameEvent {
        if self.failed {
            return GameEvent::ObjectiveUnavailable;
        }

        match self.radio.interact(node, band, tuning, rng) {
            RadioResponse::WarmingUp => GameEvent::RadioWarmingUp,
            RadioResponse::Offline => GameEvent::ObjectiveUnavailable,
            RadioResponse::IdleNode { node } => GameEvent::RadioIdle { node },
            RadioResponse::Locking { remaining } => GameEvent::SignalLocking { remaining },
            RadioResponse::WrongBand { target, presses_needed } => GameEvent::WrongBand { target, presses_needed },
            RadioResponse::Stabilized { node } => {
                let credits = tuning.radio_reward(self.night);
                self.radios_completed += 1;
                player.credits += credits;
                player.sanity.add(tuning.radio_sanity_bonus);
                world.reveal_doors(tuning.door_reveal_seconds);
                log::info!(
                    "Night {}: radio {} stabilized ({}/{}), +{} credits",
                    self.night,
                    node + 1,
                    self.radios_completed,
                    self.required_radios,
                    credits
                );
                GameEvent::RadioStabilized {
                    node,
                    credits_awarded: credits,
                }
            }
        }
    }
}
