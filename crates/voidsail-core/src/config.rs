//! Pre-validated content configuration and the per-world config registry.
//!
//! Configs arrive already parsed (they derive `Deserialize` for whoever loads
//! them); the core only selects among them. `ConfigRegistry` is constructed
//! once per world and passed explicitly to the builders.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GenerationError;
use crate::random::SeededRandom;
use crate::types::{PlanetTier, SurfaceDirection, TextureId};

/// What to do when a physics outline is missing or unusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingResourcePolicy {
    /// Silently use the fallback shape.
    Ignore,
    /// Log a warning and use the fallback shape.
    #[default]
    Warn,
    /// Abort generation.
    Fail,
}

impl MissingResourcePolicy {
    /// Apply the policy to a missing-resource event.
    pub fn handle(self, message: impl Into<String>) -> Result<(), GenerationError> {
        let message = message.into();
        match self {
            MissingResourcePolicy::Ignore => Ok(()),
            MissingResourcePolicy::Warn => {
                warn!(%message, "missing resource, using fallback");
                Ok(())
            }
            MissingResourcePolicy::Fail => Err(GenerationError::MissingResource(message)),
        }
    }
}

/// Texture variants and collision outline for one `(from, to)` tile pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePoolConfig {
    pub from: SurfaceDirection,
    pub to: SurfaceDirection,
    pub textures: Vec<TextureId>,
    /// Collision polyline in unit tile space, x toward the next column, y toward the planet center.
    #[serde(default)]
    pub outline: Option<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileSetConfig {
    pub pools: Vec<TilePoolConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecoConfig {
    pub name: String,
    pub textures: Vec<TextureId>,
    /// Decorations per unit of circumference.
    pub density: f32,
    pub min_size: f32,
    pub max_size: f32,
    pub allow_flip: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyConfig {
    pub texture: TextureId,
    pub day_tint: [f32; 4],
    pub night_tint: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HullKind {
    Standard,
    Station,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullConfig {
    pub name: String,
    pub texture: TextureId,
    pub size: f32,
    pub approx_radius: f32,
    pub kind: HullKind,
    pub max_health: f32,
    /// Collision polygon in hull space; a circle of `approx_radius` stands in when missing.
    #[serde(default)]
    pub outline: Option<Vec<[f32; 2]>>,
}

impl HullConfig {
    pub fn is_station(&self) -> bool {
        self.kind == HullKind::Station
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipConfig {
    pub hull: HullConfig,
    /// Ships per unit of ground height (ground) or per unit of band area (orbit).
    pub density: f32,
    #[serde(default)]
    pub money: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    pub name: String,
    pub tier: PlanetTier,
    pub min_grav: f32,
    pub max_grav: f32,
    pub row_count: usize,
    pub smooth_landscape: bool,
    pub tiles: TileSetConfig,
    #[serde(default)]
    pub cloud_textures: Vec<TextureId>,
    #[serde(default)]
    pub decos: Vec<DecoConfig>,
    #[serde(default)]
    pub sky: Option<SkyConfig>,
    #[serde(default)]
    pub station: Option<ShipConfig>,
    #[serde(default)]
    pub ground_enemies: Vec<ShipConfig>,
    #[serde(default)]
    pub low_orbit_enemies: Vec<ShipConfig>,
    #[serde(default)]
    pub high_orbit_enemies: Vec<ShipConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSystemConfig {
    pub name: String,
    pub hard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeltConfig {
    pub name: String,
    pub hard: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeConfig {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameTables {
    pub systems: Vec<String>,
    pub planets: Vec<String>,
}

/// All content configs available to one world.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    planets: Vec<Arc<PlanetConfig>>,
    systems: Vec<Arc<SolarSystemConfig>>,
    belts: Vec<Arc<BeltConfig>>,
    mazes: Vec<Arc<MazeConfig>>,
    names: NameTables,
}

impl ConfigRegistry {
    pub fn new(
        planets: Vec<PlanetConfig>,
        systems: Vec<SolarSystemConfig>,
        belts: Vec<BeltConfig>,
        mazes: Vec<MazeConfig>,
        names: NameTables,
    ) -> Self {
        Self {
            planets: planets.into_iter().map(Arc::new).collect(),
            systems: systems.into_iter().map(Arc::new).collect(),
            belts: belts.into_iter().map(Arc::new).collect(),
            mazes: mazes.into_iter().map(Arc::new).collect(),
            names,
        }
    }

    pub fn planets(&self) -> &[Arc<PlanetConfig>] {
        &self.planets
    }

    pub fn planet_by_name(&self, name: &str) -> Option<Arc<PlanetConfig>> {
        self.planets.iter().find(|c| c.name == name).cloned()
    }

    pub fn system_by_name(&self, name: &str) -> Option<Arc<SolarSystemConfig>> {
        self.systems.iter().find(|c| c.name == name).cloned()
    }

    pub fn belt_by_name(&self, name: &str) -> Option<Arc<BeltConfig>> {
        self.belts.iter().find(|c| c.name == name).cloned()
    }

    pub fn maze_by_name(&self, name: &str) -> Option<Arc<MazeConfig>> {
        self.mazes.iter().find(|c| c.name == name).cloned()
    }

    /// Planet config of the given tier, or any planet config if none matches.
    pub fn pick_planet(
        &self,
        rng: &mut SeededRandom,
        tier: PlanetTier,
    ) -> Result<Arc<PlanetConfig>, GenerationError> {
        pick_filtered(rng, &self.planets, |c| c.tier == tier, "planet")
    }

    pub fn pick_system(
        &self,
        rng: &mut SeededRandom,
        hard: bool,
    ) -> Result<Arc<SolarSystemConfig>, GenerationError> {
        pick_filtered(rng, &self.systems, |c| c.hard == hard, "solar system")
    }

    pub fn pick_belt(
        &self,
        rng: &mut SeededRandom,
        hard: bool,
    ) -> Result<Arc<BeltConfig>, GenerationError> {
        pick_filtered(rng, &self.belts, |c| c.hard == hard, "belt")
    }

    pub fn pick_maze(&self, rng: &mut SeededRandom) -> Result<Arc<MazeConfig>, GenerationError> {
        pick_filtered(rng, &self.mazes, |_| true, "maze")
    }

    /// Random entry of the system name table, or a numbered name when the table is empty.
    pub fn system_name(&self, rng: &mut SeededRandom, index: usize) -> String {
        rng.pick(&self.names.systems)
            .cloned()
            .unwrap_or_else(|| format!("System {}", index + 1))
    }

    pub fn planet_name(&self, rng: &mut SeededRandom, index: usize) -> String {
        rng.pick(&self.names.planets)
            .cloned()
            .unwrap_or_else(|| format!("Planet {}", index + 1))
    }
}

fn pick_filtered<T>(
    rng: &mut SeededRandom,
    pool: &[Arc<T>],
    accept: impl Fn(&T) -> bool,
    kind: &'static str,
) -> Result<Arc<T>, GenerationError> {
    let matching: Vec<&Arc<T>> = pool.iter().filter(|c| accept(c)).collect();
    if let Some(config) = rng.pick(&matching) {
        return Ok(Arc::clone(config));
    }
    rng.pick(pool)
        .cloned()
        .ok_or(GenerationError::EmptyConfigPool { kind })
}
