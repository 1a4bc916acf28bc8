//! Ground tile descriptors and per-planet tile pools.
//!
//! Tile space is a unit square centered on the cell: x grows toward the next
//! column (counterclockwise around the planet), y grows toward the planet
//! center. A tile's outline is the collision polyline of the surface crossing
//! the cell; solid interior cells have an empty outline and never get a body.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;

use voidsail_core::config::{MissingResourcePolicy, TileSetConfig};
use voidsail_core::error::GenerationError;
use voidsail_core::random::SeededRandom;
use voidsail_core::types::{SurfaceDirection, TextureId};

const DIRECTIONS: [SurfaceDirection; 3] = [
    SurfaceDirection::Up,
    SurfaceDirection::Fwd,
    SurfaceDirection::Down,
];

/// Immutable cell descriptor shared by every cell of the same `(from, to)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub from: SurfaceDirection,
    pub to: SurfaceDirection,
    pub outline: Arc<[Vec2]>,
    /// Art variants; one is chosen when the tile is instantiated.
    pub textures: Arc<[TextureId]>,
}

impl Tile {
    pub fn has_body(&self) -> bool {
        !self.outline.is_empty()
    }

    /// Solid ground with the surface above both edges.
    pub fn is_interior(&self) -> bool {
        self.from == SurfaceDirection::Up && self.to == SurfaceDirection::Up
    }

    /// Pick an art variant. Uses the cosmetic stream so terrain shape is unaffected.
    pub fn pick_texture(&self, rng: &mut SeededRandom) -> Option<TextureId> {
        rng.pick(&self.textures).copied()
    }
}

/// One tile per `(from, to)` pair, except `down/down` which is open sky.
#[derive(Debug, Clone)]
pub struct TilePools {
    pools: HashMap<(SurfaceDirection, SurfaceDirection), Tile>,
}

impl TilePools {
    /// Build pools from config, substituting fallback outlines per `policy`.
    pub fn build(
        config: &TileSetConfig,
        policy: MissingResourcePolicy,
    ) -> Result<Self, GenerationError> {
        let mut pools = HashMap::new();
        for from in DIRECTIONS {
            for to in DIRECTIONS {
                if from == SurfaceDirection::Down && to == SurfaceDirection::Down {
                    continue;
                }
                let pool = config.pools.iter().find(|p| p.from == from && p.to == to);
                let textures: Arc<[TextureId]> = match pool {
                    Some(p) => p.textures.as_slice().into(),
                    None => {
                        policy.handle(format!("no tile pool for {from:?}/{to:?}"))?;
                        Arc::from(Vec::new())
                    }
                };
                let outline: Vec<Vec2> = if from == SurfaceDirection::Up && to == SurfaceDirection::Up {
                    Vec::new()
                } else {
                    match pool.and_then(|p| p.outline.as_ref()) {
                        Some(points) if is_usable_outline(points) => {
                            points.iter().map(|p| Vec2::new(p[0], p[1])).collect()
                        }
                        _ => {
                            if pool.is_some() {
                                policy.handle(format!(
                                    "no usable outline for tile {from:?}/{to:?}"
                                ))?;
                            }
                            default_outline(from, to)
                        }
                    }
                };
                pools.insert(
                    (from, to),
                    Tile {
                        from,
                        to,
                        outline: outline.into(),
                        textures,
                    },
                );
            }
        }
        Ok(Self { pools })
    }

    pub fn get(&self, from: SurfaceDirection, to: SurfaceDirection) -> Option<&Tile> {
        self.pools.get(&(from, to))
    }
}

fn is_usable_outline(points: &[[f32; 2]]) -> bool {
    points.len() >= 2 && points.iter().all(|p| p[0].is_finite() && p[1].is_finite())
}

/// Depth of the surface at a tile edge.
fn edge_depth(direction: SurfaceDirection) -> f32 {
    match direction {
        SurfaceDirection::Up => -0.5,
        SurfaceDirection::Fwd => 0.0,
        SurfaceDirection::Down => 0.5,
    }
}

/// Straight surface from the `from` edge through the cell center to the `to` edge.
pub fn default_outline(from: SurfaceDirection, to: SurfaceDirection) -> Vec<Vec2> {
    if from == SurfaceDirection::Up && to == SurfaceDirection::Up {
        return Vec::new();
    }
    let y0 = edge_depth(from);
    let y1 = edge_depth(to);
    vec![
        Vec2::new(-0.5, y0),
        Vec2::new(0.0, (y0 + y1) * 0.5),
        Vec2::new(0.5, y1),
    ]
}
