//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]: the shared map, the player,
//! the night controller and the seeded RNG that every random roll draws from.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::creature::CreatureKind;
use super::geometry::World;
use super::night::{NightController, Outcome};
use super::player::PlayerState;
use super::radio::Band;
use super::safe_zone::SafeZone;
use super::shop::ShopItem;
use crate::tuning::Tuning;

/// Things that happened during a tick, for HUD messages and audio cues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    NightStarted { night: u8, required_radios: u32 },
    /// A radio task went live
    RadioLive { node: usize, band: Band, presses_needed: u8 },
    /// Correct band, keep pressing
    SignalLocking { remaining: u8 },
    /// Wrong band; presses reset
    WrongBand { target: Band, presses_needed: u8 },
    RadioStabilized { node: usize, credits_awarded: u32 },
    /// Interacted with a radio before any task went live
    RadioWarmingUp,
    /// Interacted with a radio that is not the live one
    RadioIdle { node: usize },
    /// The night has failed; radios no longer respond
    ObjectiveUnavailable,
    RadioFailed { node: usize },
    CreatureSpawned { id: u32, kind: CreatureKind },
    CreatureHit {
        kind: CreatureKind,
        health_damage: f32,
        sanity_damage: f32,
        ward_used: bool,
    },
    Purchased { item: ShopItem, cost: u32 },
    PurchaseRefused { item: ShopItem, cost: u32, shortfall: u32 },
    FlashlightToggled { on: bool },
    BatteryDrained,
    /// Lift console status check
    ConsoleStatus,
    NothingToInteract,
    Victory,
    Defeat,
    Restarted,
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Balance values the run was started with
    pub tuning: Tuning,
    /// Every random roll comes from here
    pub rng: Pcg32,
    pub world: World,
    pub safe_zone: SafeZone,
    pub player: PlayerState,
    pub night: NightController,
    /// Events raised by the latest tick
    pub events: Vec<GameEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Shell asked to stop
    pub quit_requested: bool,
}

impl GameState {
    /// New run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let world = World::shared_map();
        let safe_zone = SafeZone::from_world(&world);
        let player = PlayerState::new(&tuning);
        let night = NightController::new(&tuning, &mut rng);

        let mut state = Self {
            seed,
            tuning,
            rng,
            world,
            safe_zone,
            player,
            night,
            events: Vec::new(),
            time_ticks: 0,
            quit_requested: false,
        };
        state.start_night(1, true);
        state
    }

    /// Begin `night`. A fresh start skips the carry-over healing.
    pub fn start_night(&mut self, night: u8, fresh: bool) {
        self.night.begin(night, &self.tuning, &mut self.rng);
        self.world.close_doors();
        self.player.move_to_spawn();
        if !fresh {
            self.player.restore_for_new_night(&self.tuning);
        }

        log::info!(
            "Night {} started: survive {:.0}s, {} radios requested",
            self.night.night,
            self.night.time_left,
            self.night.required_radios
        );
        self.events.push(GameEvent::NightStarted {
            night: self.night.night,
            required_radios: self.night.required_radios,
        });
    }

    /// Throw the run away and start over from night 1 with the same seed
    pub fn restart(&mut self) {
        let quit_requested = self.quit_requested;
        *self = Self::with_tuning(self.seed, self.tuning.clone());
        self.quit_requested = quit_requested;
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted");
    }

    pub fn outcome(&self) -> Outcome {
        self.night.outcome
    }

    /// Victory or defeat; only a restart gets out of here
    pub fn is_terminal(&self) -> bool {
        self.night.is_terminal()
    }

    pub fn in_safe_zone(&self) -> bool {
        self.safe_zone.contains(self.player.pos)
    }
}
