//! Forest creatures: spawning, pursuit, roaming, contact damage
//!
//! Each archetype resolves to a [`Behavior`] once at spawn. The per-tick
//! update reads only that descriptor, never the kind.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::player::PlayerState;
use crate::consts::*;
use crate::tuning::Tuning;

/// Speed multiplier with the flashlight on / off (all kinds)
const FLASHLIGHT_ON_SPEED: f32 = 0.78;
const FLASHLIGHT_OFF_SPEED: f32 = 1.07;
/// Speed multiplier while the player shelters in a sanctuary
const SAFE_ZONE_SPEED: f32 = 0.25;
/// Roaming is slower than pursuit
const ROAM_SPEED: f32 = 0.56;
/// A roam target closer than this counts as reached
const ROAM_ARRIVE_DIST: f32 = 16.0;

/// Contact hitbox half-extents
const HIT_TOLERANCE_X: f32 = 14.0;
const HIT_TOLERANCE_Y: f32 = 24.0;
const HIT_COOLDOWN: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    Stalker,
    Feral,
    Wisp,
}

impl CreatureKind {
    pub const ALL: [CreatureKind; 3] = [CreatureKind::Stalker, CreatureKind::Feral, CreatureKind::Wisp];

    pub fn name(&self) -> &'static str {
        match self {
            CreatureKind::Stalker => "Stalker",
            CreatureKind::Feral => "Feral",
            CreatureKind::Wisp => "Wisp",
        }
    }

    pub fn behavior(&self) -> Behavior {
        match self {
            CreatureKind::Stalker => Behavior {
                detection_radius: 220.0,
                speed_multiplier: 1.0,
                flashlight_multiplier: 0.72,
                spawn_speed_bonus: 0.0,
                perturbation: Perturbation::None,
            },
            CreatureKind::Feral => Behavior {
                detection_radius: 260.0,
                speed_multiplier: 1.12,
                flashlight_multiplier: 1.0,
                spawn_speed_bonus: 10.0,
                perturbation: Perturbation::HeadingJitter { amount: 0.03 },
            },
            CreatureKind::Wisp => Behavior {
                detection_radius: 300.0,
                speed_multiplier: 0.92,
                flashlight_multiplier: 1.0,
                spawn_speed_bonus: 4.0,
                perturbation: Perturbation::LateralDrift {
                    amplitude: 0.08,
                    time_freq: 10.0,
                    pos_freq: 0.01,
                },
            },
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl std::fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Steering noise layered on top of pursuit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Perturbation {
    None,
    /// Random horizontal wobble in [-amount, amount] each tick
    HeadingJitter { amount: f32 },
    /// Vertical weave: sin(time * time_freq + x * pos_freq) * amplitude
    LateralDrift {
        amplitude: f32,
        time_freq: f32,
        pos_freq: f32,
    },
}

impl Perturbation {
    /// Apply to a unit pursuit heading (result is not renormalized)
    pub fn apply(&self, heading: Vec2, pos: Vec2, time: f32, rng: &mut impl Rng) -> Vec2 {
        match *self {
            Perturbation::None => heading,
            Perturbation::HeadingJitter { amount } => {
                heading + Vec2::new(rng.random_range(-amount..=amount), 0.0)
            }
            Perturbation::LateralDrift {
                amplitude,
                time_freq,
                pos_freq,
            } => heading + Vec2::new(0.0, (time * time_freq + pos.x * pos_freq).sin() * amplitude),
        }
    }
}

/// Per-archetype tuning resolved at spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub detection_radius: f32,
    /// Always applied
    pub speed_multiplier: f32,
    /// Applied only while the flashlight is on
    pub flashlight_multiplier: f32,
    /// Added to base speed at spawn
    pub spawn_speed_bonus: f32,
    pub perturbation: Perturbation,
}

/// Creature base speed before jitter and archetype bonus
pub fn base_speed(night: u8) -> f32 {
    80.0 + 8.0 * night as f32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: CreatureKind,
    pub behavior: Behavior,
    pub pos: Vec2,
    /// Spawn speed (units/second) before situational multipliers
    pub speed: f32,
    pub roam_target: Vec2,
    pub roam_timer: f32,
    pub hit_cooldown: f32,
}

impl Enemy {
    /// Speed after flashlight, archetype and sanctuary modifiers
    pub fn effective_speed(&self, flashlight_on: bool, player_in_safe: bool) -> f32 {
        let mut speed = self.speed;
        if flashlight_on {
            speed *= FLASHLIGHT_ON_SPEED * self.behavior.flashlight_multiplier;
        } else {
            speed *= FLASHLIGHT_OFF_SPEED;
        }
        speed *= self.behavior.speed_multiplier;
        if player_in_safe {
            speed *= SAFE_ZONE_SPEED;
        }
        speed
    }

    /// Hunting the player this tick?
    pub fn detects(&self, player_pos: Vec2, player_in_safe: bool) -> bool {
        !player_in_safe && self.pos.distance(player_pos) < self.behavior.detection_radius
    }

    fn touches(&self, player_pos: Vec2) -> bool {
        (self.pos.x - player_pos.x).abs() < HIT_TOLERANCE_X && (self.pos.y - player_pos.y).abs() < HIT_TOLERANCE_Y
    }
}

fn random_roam_target(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.random_range(240.0..WORLD_WIDTH - 180.0),
        rng.random_range(FLOOR_Y - 168.0..FLOOR_Y - 28.0),
    )
}

/// What the creatures see of the world this tick
#[derive(Debug, Clone, Copy)]
pub struct Surroundings {
    pub player_pos: Vec2,
    pub flashlight_on: bool,
    pub player_in_safe: bool,
    /// Simulation clock (seconds)
    pub time: f32,
}

/// A creature landed a hit
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub enemy_id: u32,
    pub kind: CreatureKind,
    pub health_damage: f32,
    pub sanity_damage: f32,
    pub ward_used: bool,
}

/// The creature population of the current night
#[derive(Debug, Clone, Default)]
pub struct Creatures {
    pub enemies: Vec<Enemy>,
    next_id: u32,
}

impl Creatures {
    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    pub fn count(&self, kind: CreatureKind) -> usize {
        self.enemies.iter().filter(|e| e.kind == kind).count()
    }

    /// Spawn a creature somewhere along the hall. `None` picks a random kind.
    pub fn spawn(&mut self, kind: Option<CreatureKind>, night: u8, rng: &mut impl Rng) -> &Enemy {
        let kind = kind.unwrap_or_else(|| CreatureKind::random(rng));
        let behavior = kind.behavior();
        let x = rng.random_range(480.0..WORLD_WIDTH - 180.0);
        let y = rng.random_range(FLOOR_Y - 150.0..FLOOR_Y - 28.0);
        let speed = base_speed(night) + rng.random_range(-8.0..12.0) + behavior.spawn_speed_bonus;
        let roam_target = random_roam_target(rng);

        let id = self.next_id;
        self.next_id += 1;
        log::debug!("Spawned {} #{} at x={:.0} speed={:.1}", kind, id, x, speed);

        self.enemies.push(Enemy {
            id,
            kind,
            behavior,
            pos: Vec2::new(x, y),
            speed,
            roam_target,
            roam_timer: 2.0,
            hit_cooldown: 0.0,
        });
        let last = self.enemies.len() - 1;
        &self.enemies[last]
    }

    /// Steer every creature, resolve contact damage, cull strays
    pub fn update(
        &mut self,
        view: &Surroundings,
        player: &mut PlayerState,
        tuning: &Tuning,
        rng: &mut impl Rng,
        dt: f32,
    ) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for enemy in &mut self.enemies {
            let to_player = view.player_pos - enemy.pos;
            let dist = to_player.length();
            let speed = enemy.effective_speed(view.flashlight_on, view.player_in_safe);

            if enemy.detects(view.player_pos, view.player_in_safe) && dist > 0.001 {
                let heading = enemy
                    .behavior
                    .perturbation
                    .apply(to_player / dist, enemy.pos, view.time, rng);
                enemy.pos += heading * speed * dt;
            } else {
                enemy.roam_timer -= dt;
                let to_target = enemy.roam_target - enemy.pos;
                let roam_dist = to_target.length();
                if roam_dist > 1.0 {
                    enemy.pos += to_target / roam_dist * speed * ROAM_SPEED * dt;
                }
                if enemy.roam_timer <= 0.0 || roam_dist < ROAM_ARRIVE_DIST {
                    enemy.roam_timer = rng.random_range(1.4..3.2);
                    enemy.roam_target = random_roam_target(rng);
                }
            }

            enemy.pos.y = enemy.pos.y.clamp(CREATURE_MIN_Y, CREATURE_MAX_Y);
            enemy.hit_cooldown = (enemy.hit_cooldown - dt).max(0.0);

            if !view.player_in_safe && enemy.hit_cooldown <= 0.0 && enemy.touches(view.player_pos) {
                enemy.hit_cooldown = HIT_COOLDOWN;
                let mut health_damage = rng.random_range(4.0..7.2);
                let mut sanity_damage = rng.random_range(4.5..8.5);
                let ward_used = player.ward_chips > 0;
                if ward_used {
                    player.ward_chips -= 1;
                    health_damage *= tuning.ward_chip_damage_scale;
                    sanity_damage *= tuning.ward_chip_damage_scale;
                }
                player.health.drain(health_damage);
                player.sanity.drain(sanity_damage);

                contacts.push(Contact {
                    enemy_id: enemy.id,
                    kind: enemy.kind,
                    health_damage,
                    sanity_damage,
                    ward_used,
                });
            }
        }

        self.enemies.retain(|e| {
            e.pos.x > -CREATURE_CULL_MARGIN && e.pos.x < WORLD_WIDTH + CREATURE_CULL_MARGIN
        });

        contacts
    }
}
