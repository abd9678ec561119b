//! Read-only view of the simulation for the rendering shell

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::creature::CreatureKind;
use super::geometry::Rect;
use super::night::Outcome;
use super::player::Meter;
use super::radio::{Band, RadioObjective};
use super::state::{GameEvent, GameState};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterView {
    pub current: f32,
    pub max: f32,
}

impl From<Meter> for MeterView {
    fn from(meter: Meter) -> Self {
        Self {
            current: meter.current(),
            max: meter.max(),
        }
    }
}

/// Objective line of the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectiveView {
    /// Next radio goes live in `next_in` seconds
    Dormant { next_in: f32 },
    Active {
        radio: usize,
        radio_name: String,
        required_band: Band,
        presses_remaining: u8,
        time_remaining: f32,
    },
    /// Night failed; survive until dawn
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallView {
    /// Rect at the current simulation time
    pub rect: Rect,
    pub hidden_door: bool,
    /// Hidden door currently passable
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: CreatureKind,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioView {
    pub index: usize,
    pub name: String,
    pub pos: Vec2,
    pub live: bool,
}

/// Everything a HUD and renderer need for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub health: MeterView,
    pub sanity: MeterView,
    pub battery: MeterView,
    pub flashlight_on: bool,
    pub selected_band: Band,
    pub credits: u32,
    pub ward_chips: u32,

    pub night: u8,
    pub time_left: f32,
    pub required_radios: u32,
    pub radios_completed: u32,
    pub night_failed: bool,
    pub objective: ObjectiveView,
    pub outcome: Outcome,

    pub in_safe_zone: bool,
    pub in_silent_zone: bool,
    pub doors_open: bool,

    pub player_pos: Vec2,
    pub enemies: Vec<EnemyView>,
    pub walls: Vec<WallView>,
    pub radios: Vec<RadioView>,

    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Capture the current frame
    pub fn snapshot(&self) -> Snapshot {
        let night = self.night.night;
        let doors_open = self.world.doors_open();
        let live_node = self.night.radio.active().map(|signal| signal.node);

        let objective = match &self.night.radio {
            RadioObjective::Dormant { delay } => ObjectiveView::Dormant { next_in: *delay },
            RadioObjective::Active(signal) => ObjectiveView::Active {
                radio: signal.node,
                radio_name: self
                    .world
                    .radios
                    .get(signal.node)
                    .map(|r| r.name.clone())
                    .unwrap_or_default(),
                required_band: signal.target_band,
                presses_remaining: signal.presses_remaining(),
                time_remaining: signal.time_left,
            },
            RadioObjective::Offline => ObjectiveView::Offline,
        };

        Snapshot {
            health: self.player.health.into(),
            sanity: self.player.sanity.into(),
            battery: self.player.battery.into(),
            flashlight_on: self.player.flashlight_on,
            selected_band: self.player.selected_band,
            credits: self.player.credits,
            ward_chips: self.player.ward_chips,

            night,
            time_left: self.night.time_left,
            required_radios: self.night.required_radios,
            radios_completed: self.night.radios_completed,
            night_failed: self.night.failed,
            objective,
            outcome: self.night.outcome,

            in_safe_zone: self.in_safe_zone(),
            in_silent_zone: super::player::in_silent_zone(self.player.pos, night),
            doors_open,

            player_pos: self.player.pos,
            enemies: self
                .night
                .creatures
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                })
                .collect(),
            walls: self
                .world
                .walls
                .iter()
                .map(|w| WallView {
                    rect: w.rect_at(self.world.time, night),
                    hidden_door: w.hidden_door,
                    open: w.hidden_door && doors_open,
                })
                .collect(),
            radios: self
                .world
                .radios
                .iter()
                .map(|r| RadioView {
                    index: r.index,
                    name: r.name.clone(),
                    pos: r.pos,
                    live: live_node == Some(r.index),
                })
                .collect(),

            events: self.events.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::radio::ActiveSignal;

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(1);
        state.night.radio = RadioObjective::Active(ActiveSignal {
            node: 2,
            target_band: Band::Fm,
            time_left: 12.5,
            presses_needed: 3,
            presses_done: 1,
        });

        let snap = state.snapshot();
        assert_eq!(snap.night, 1);
        assert_eq!(snap.health, MeterView { current: 100.0, max: 100.0 });
        assert_eq!(
            snap.objective,
            ObjectiveView::Active {
                radio: 2,
                radio_name: "Radio 3".to_string(),
                required_band: Band::Fm,
                presses_remaining: 2,
                time_remaining: 12.5,
            }
        );
        assert!(snap.radios[2].live);
        assert!(!snap.radios[0].live);
        assert_eq!(snap.walls.len(), state.world.walls.len());
        assert!(snap.enemies.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = GameState::new(2).snapshot();
        let json = serde_json::to_string(&snap).expect("snapshot serializes");
        assert!(json.contains("\"night\":1"));
    }
}
