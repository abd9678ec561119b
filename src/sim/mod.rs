//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped timestep only
//! - Seeded RNG only
//! - Stable iteration order (creatures by spawn order)
//! - No rendering, audio or platform dependencies

pub mod creature;
pub mod geometry;
pub mod night;
pub mod player;
pub mod radio;
pub mod safe_zone;
pub mod shop;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use creature::{Behavior, CreatureKind, Creatures, Enemy, Perturbation};
pub use geometry::{Axis, RadioNode, Rect, Wall, WallMotion, World};
pub use night::{NightController, NightTransition, Outcome, failure_spawn_interval, required_radios};
pub use player::{Meter, MoveIntent, PlayerState};
pub use radio::{ActiveSignal, Band, RadioObjective};
pub use safe_zone::SafeZone;
pub use shop::{PurchaseError, Receipt, ShopItem, purchase};
pub use snapshot::{EnemyView, MeterView, ObjectiveView, RadioView, Snapshot, WallView};
pub use state::{GameEvent, GameState};
pub use tick::{TickInput, tick};
