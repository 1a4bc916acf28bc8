//! Drawable handles exposed by live entities.
//!
//! The core only ticks these and keeps their world pose current; rendering is
//! done elsewhere from the same data after the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::rotate;
use crate::types::TextureId;

/// Render layer. The depth factor scales an entity's radius in streaming tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawableLevel {
    /// Distant backdrop decoration, drawn with parallax.
    DistantDeco,
    Sky,
    Ground,
    Deco,
    Clouds,
    Bodies,
}

impl DrawableLevel {
    pub fn depth(self) -> f32 {
        match self {
            DrawableLevel::DistantDeco => 1.5,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub texture: TextureId,
    pub size: f32,
    /// Offset from the owning entity in its local frame.
    pub rel_pos: Vec2,
    pub rel_angle: f32,
    pub rot_speed: f32,
    pub level: DrawableLevel,
    pub tint: [f32; 4],
    pub flipped: bool,
    /// World pose, refreshed by `update`.
    pub world_pos: Vec2,
    pub world_angle: f32,
}

impl Drawable {
    pub fn new(texture: TextureId, size: f32, rel_pos: Vec2, level: DrawableLevel) -> Self {
        Self {
            texture,
            size,
            rel_pos,
            rel_angle: 0.0,
            rot_speed: 0.0,
            level,
            tint: [1.0; 4],
            flipped: false,
            world_pos: Vec2::ZERO,
            world_angle: 0.0,
        }
    }

    /// Distance from the owner's origin to the drawable's far edge.
    pub fn radius(&self) -> f32 {
        self.rel_pos.length() + self.size * 0.5
    }

    /// Spin and re-anchor to the owner's pose.
    pub fn update(&mut self, base_pos: Vec2, base_angle: f32, dt: f32) {
        self.rel_angle += self.rot_speed * dt;
        self.world_pos = base_pos + rotate(self.rel_pos, base_angle);
        self.world_angle = base_angle + self.rel_angle;
    }
}

/// Bounding radius of a drawable set around its owner.
pub fn radius_of(drawables: &[Drawable]) -> f32 {
    drawables.iter().map(Drawable::radius).fold(0.0, f32::max)
}

/// Depth of the first drawable, 1 for an empty set.
pub fn depth_of(drawables: &[Drawable]) -> f32 {
    drawables.first().map_or(1.0, |d| d.level.depth())
}
