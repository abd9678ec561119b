//! Sanctuaries around control booths and supply huts

use glam::Vec2;

use super::geometry::World;
use crate::consts::SAFE_RADIUS;
use crate::within_range;

/// Fixed sanctuary points sharing one radius
#[derive(Debug, Clone)]
pub struct SafeZone {
    pub sanctuaries: Vec<Vec2>,
    pub radius: f32,
}

impl SafeZone {
    /// Booths and supply huts of the shared map
    pub fn from_world(world: &World) -> Self {
        Self {
            sanctuaries: world.booths.iter().chain(&world.supply_huts).copied().collect(),
            radius: SAFE_RADIUS,
        }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        self.sanctuaries
            .iter()
            .any(|&point| within_range(point, pos, self.radius))
    }
}
