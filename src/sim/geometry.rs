//! Level geometry: walls, moving obstacles, hidden doors and landmarks
//!
//! The tower hall is a side-on strip. Walls are axis-aligned rectangles; some
//! sweep back and forth along one axis and some are hidden doors that open
//! for a while after a radio is stabilized.
//!
//! Wall displacement is a pure function of the accumulated simulation clock,
//! never of wall-clock time, so the same wall queried at the same time always
//! lands in the same place.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle (top-left anchored, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    /// Strict overlap test; rectangles that only share an edge do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x && other.pos.x < a_max.x && self.pos.y < b_max.y && other.pos.y < a_max.y
    }
}

/// Collision box of a player standing at `pos` (feet at the bottom edge)
#[inline]
pub fn player_box(pos: Vec2) -> Rect {
    Rect::new(
        pos.x - PLAYER_BOX_W / 2.0,
        pos.y - PLAYER_BOX_H,
        PLAYER_BOX_W,
        PLAYER_BOX_H,
    )
}

/// Axis a moving wall sweeps along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Oscillation of a moving wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallMotion {
    pub axis: Axis,
    /// Peak displacement from the rest position
    pub amplitude: f32,
    /// Angular speed of the sweep (radians/second before night scaling)
    pub speed: f32,
}

/// Later nights sweep moving walls faster
#[inline]
pub fn motion_scale(night: u8) -> f32 {
    1.0 + night.saturating_sub(1) as f32 * 0.16
}

/// A wall segment of the shared map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Rest rectangle
    pub rect: Rect,
    /// Solid unless doors are currently revealed
    pub hidden_door: bool,
    pub motion: Option<WallMotion>,
}

impl Wall {
    pub fn solid(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            rect: Rect::new(x, y, w, h),
            hidden_door: false,
            motion: None,
        }
    }

    pub fn hidden_door(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            hidden_door: true,
            ..Self::solid(x, y, w, h)
        }
    }

    pub fn moving(x: f32, y: f32, w: f32, h: f32, axis: Axis, amplitude: f32, speed: f32) -> Self {
        Self {
            motion: Some(WallMotion {
                axis,
                amplitude,
                speed,
            }),
            ..Self::solid(x, y, w, h)
        }
    }

    /// Effective rectangle at simulation time `time` on `night`
    pub fn rect_at(&self, time: f32, night: u8) -> Rect {
        let mut rect = self.rect;
        if let Some(motion) = self.motion {
            let offset = (time * motion.speed * motion_scale(night)).sin() * motion.amplitude;
            match motion.axis {
                Axis::X => rect.pos.x += offset,
                Axis::Y => rect.pos.y += offset,
            }
        }
        rect
    }
}

/// A radio station the objective can light up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadioNode {
    pub index: usize,
    pub name: String,
    pub pos: Vec2,
}

/// The shared tower map plus its time-varying state
#[derive(Debug, Clone)]
pub struct World {
    pub walls: Vec<Wall>,
    pub radios: Vec<RadioNode>,
    /// Supply huts: shops and sanctuaries
    pub supply_huts: Vec<Vec2>,
    /// Ranger control booths: sanctuaries
    pub booths: Vec<Vec2>,
    /// Accumulated simulation time (seconds), drives wall animation
    pub time: f32,
    /// Hidden doors are open while this is positive
    pub door_reveal: f32,
}

impl World {
    /// Build the map every night shares
    pub fn shared_map() -> Self {
        let mut walls = Vec::new();

        let hall_top = FLOOR_Y - 178.0;
        let hall_bottom = FLOOR_Y - 34.0;
        let divider_w = 18.0;
        let section_w = 175.0;
        let gap_h = 56.0;

        // Dividers with a staggered gap, alternating low and high
        let mut x = 420.0;
        let mut i = 0;
        while x < WORLD_WIDTH - 300.0 {
            let gap_center = FLOOR_Y - if i % 2 == 0 { 98.0 } else { 138.0 };
            let gap_top = gap_center - gap_h * 0.5;
            let gap_bottom = gap_center + gap_h * 0.5;

            let upper_h = (gap_top - hall_top).max(0.0);
            let lower_h = (hall_bottom - gap_bottom).max(0.0);
            if upper_h > 14.0 {
                walls.push(Wall::solid(x, hall_top, divider_w, upper_h));
            }
            if lower_h > 14.0 {
                walls.push(Wall::solid(x, gap_bottom, divider_w, lower_h));
            }

            x += section_w;
            i += 1;
        }

        walls.push(Wall::hidden_door(1110.0, hall_top + 58.0, 18.0, 56.0));
        walls.push(Wall::hidden_door(1540.0, hall_top + 42.0, 18.0, 56.0));

        walls.push(Wall::moving(760.0, FLOOR_Y - 168.0, 110.0, 18.0, Axis::Y, 22.0, 0.9));
        walls.push(Wall::moving(1380.0, FLOOR_Y - 92.0, 120.0, 18.0, Axis::X, 30.0, 1.1));

        let radios = [
            ("Radio 1", 620.0, FLOOR_Y - 130.0),
            ("Radio 2", 1260.0, FLOOR_Y - 125.0),
            ("Radio 3", 1820.0, FLOOR_Y - 132.0),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, (name, x, y))| RadioNode {
            index,
            name: name.to_string(),
            pos: Vec2::new(x, y),
        })
        .collect();

        Self {
            walls,
            radios,
            supply_huts: vec![Vec2::new(930.0, FLOOR_Y - 118.0), Vec2::new(1670.0, FLOOR_Y - 116.0)],
            booths: vec![Vec2::new(370.0, FLOOR_Y - 118.0), Vec2::new(2030.0, FLOOR_Y - 118.0)],
            time: 0.0,
            door_reveal: 0.0,
        }
    }

    /// Advance the animation clock and the door reveal countdown
    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
        self.door_reveal = (self.door_reveal - dt).max(0.0);
    }

    #[inline]
    pub fn doors_open(&self) -> bool {
        self.door_reveal > 0.0
    }

    pub fn reveal_doors(&mut self, seconds: f32) {
        self.door_reveal = seconds.max(0.0);
        log::debug!("Hidden doors open for {:.0}s", seconds);
    }

    pub fn close_doors(&mut self) {
        self.door_reveal = 0.0;
    }

    /// Walls that currently block movement
    pub fn solid_walls(&self) -> impl Iterator<Item = &Wall> {
        let open = self.doors_open();
        self.walls.iter().filter(move |w| !(w.hidden_door && open))
    }

    /// Whether `rect` overlaps any solid wall at the current time
    pub fn collides(&self, rect: &Rect, night: u8) -> bool {
        self.solid_walls()
            .any(|wall| wall.rect_at(self.time, night).overlaps(rect))
    }

    /// Whether a player standing at `pos` would be inside a wall
    pub fn player_collides(&self, pos: Vec2, night: u8) -> bool {
        self.collides(&player_box(pos), night)
    }

    /// Resolve a move from `from` to `to`, sliding along walls
    ///
    /// On a blocked move the horizontal component is reverted first; the
    /// vertical one is reverted only if the player is still inside a wall.
    ///
    /// A player already overlapping a solid wall cannot move at all. This
    /// happens when a hidden door closes on someone standing in the doorway;
    /// they stay put until the doors open again or the night ends.
    pub fn slide_move(&self, from: Vec2, to: Vec2, night: u8) -> Vec2 {
        let mut pos = to;
        if self.player_collides(pos, night) {
            pos.x = from.x;
            if self.player_collides(pos, night) {
                pos.y = from.y;
            }
        }
        pos
    }
}
