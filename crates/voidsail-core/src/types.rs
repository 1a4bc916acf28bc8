//! Fundamental identifiers and simulation types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::DT;

/// Index of a star system inside its galaxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(pub u32);

/// Index of a planet inside its galaxy. Also selects the planet's generation stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanetId(pub u32);

/// Index of an asteroid belt inside its galaxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeltId(pub u32);

/// Index of a maze region inside its galaxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MazeId(pub u32);

/// Opaque handle into the renderer's texture atlas. The core never resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Shape of the terrain surface at one edge of a ground cell.
///
/// `Up` means the surface passes above the cell (the cell is solid there),
/// `Down` means it passes below (the cell is open sky there).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SurfaceDirection {
    Up,
    Fwd,
    Down,
}

/// Difficulty tier used when drawing a planet config for a system slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetTier {
    Easy,
    Medium,
    Hard,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one fixed timestep.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += DT as f64;
    }
}

/// The viewpoint that drives streaming and planet expansion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec2,
    /// Half-extent of the visible area in world units.
    pub view_distance: f32,
}

impl Camera {
    pub fn new(position: Vec2, view_distance: f32) -> Self {
        Self {
            position,
            view_distance,
        }
    }
}
