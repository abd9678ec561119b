//! Broadcast 14 - seven nights of radio-tower survival
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, meters, creatures, radio objective, nights)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio and the input/run loop belong to the hosting shell. The
//! shell feeds a [`sim::TickInput`] per frame and draws from [`sim::Snapshot`].

pub mod sim;
pub mod tuning;

pub use sim::{GameState, Snapshot, TickInput, tick};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless runner (seconds)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest time step a single tick may integrate (seconds)
    pub const MAX_TICK_DT: f32 = 0.05;

    /// Campaign length
    pub const TOTAL_NIGHTS: u8 = 7;

    /// World dimensions (side-on tower hall, y grows downward)
    pub const WORLD_WIDTH: f32 = 2400.0;
    pub const FLOOR_Y: f32 = 620.0;

    /// Player movement bounds
    pub const PLAYER_MIN_X: f32 = 90.0;
    pub const PLAYER_MAX_X: f32 = WORLD_WIDTH - 90.0;
    pub const PLAYER_MIN_Y: f32 = FLOOR_Y - 182.0;
    pub const PLAYER_MAX_Y: f32 = FLOOR_Y - 16.0;

    /// Player collision box, anchored at (x - W/2, y - H)
    pub const PLAYER_BOX_W: f32 = 24.0;
    pub const PLAYER_BOX_H: f32 = 26.0;

    /// Where the player stands at the start of every night
    pub const PLAYER_SPAWN_X: f32 = 260.0;
    pub const PLAYER_SPAWN_Y: f32 = FLOOR_Y - 24.0;

    /// Distance within which radios, supply huts and the console respond
    pub const INTERACT_RANGE: f32 = 60.0;
    /// Sanctuary radius around control booths and supply huts
    pub const SAFE_RADIUS: f32 = 88.0;

    /// Lift console (status only)
    pub const CONSOLE_X: f32 = 2140.0;

    /// Silent zone: sanity drains faster here from night 5 on
    pub const SILENT_ZONE_MIN_X: f32 = 930.0;
    pub const SILENT_ZONE_MAX_X: f32 = 1330.0;
    pub const SILENT_ZONE_FIRST_NIGHT: u8 = 5;

    /// Creature vertical band
    pub const CREATURE_MIN_Y: f32 = FLOOR_Y - 170.0;
    pub const CREATURE_MAX_Y: f32 = FLOOR_Y - 22.0;
    /// Creatures further than this outside the world are culled
    pub const CREATURE_CULL_MARGIN: f32 = 40.0;
}

/// True when `b` lies strictly within `range` of `a`
#[inline]
pub fn within_range(a: Vec2, b: Vec2, range: f32) -> bool {
    a.distance_squared(b) < range * range
}
