//! World persistence.
//!
//! A save holds the galaxy's bodies by config name plus every ship the
//! stream tracks. Terrain, clouds and decorations are not stored: they are
//! rebuilt from the seed when a planet that was already expanded comes back.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use voidsail_core::bodies::{Galaxy, Maze, Planet, StarSystem, SystemBelt};
use voidsail_core::config::{ConfigRegistry, HullConfig};
use voidsail_core::types::{BeltId, Camera, MazeId, PlanetId, SystemId};

use crate::entities::{FarShip, Pilot};

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("save file i/o failed")]
    Io(#[from] std::io::Error),

    #[error("save file is not valid json")]
    Json(#[from] serde_json::Error),

    #[error("save references unknown {kind} config '{name}'")]
    UnknownConfig { kind: &'static str, name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSave {
    pub seed: u64,
    pub system_count: usize,
    pub tick: u64,
    pub camera: Camera,
    pub systems: Vec<SystemSave>,
    pub mazes: Vec<MazeSave>,
    pub ships: Vec<ShipSave>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSave {
    pub name: String,
    pub position: Vec2,
    pub radius: f32,
    pub config: String,
    pub hard: bool,
    pub planets: Vec<PlanetSave>,
    pub belts: Vec<BeltSave>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetSave {
    pub name: String,
    pub config: String,
    pub distance: f32,
    pub angle_to_system: f32,
    pub angle: f32,
    pub orbit_speed: f32,
    pub rotation_speed: f32,
    pub ground_height: f32,
    pub grav_const: f32,
    pub objects_created: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeltSave {
    pub config: String,
    pub distance: f32,
    pub half_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeSave {
    pub config: String,
    pub position: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipSave {
    pub hull: String,
    pub pilot: Pilot,
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub health: f32,
    pub money: u32,
}

impl WorldSave {
    pub fn capture(
        galaxy: &Galaxy,
        system_count: usize,
        tick: u64,
        camera: Camera,
        ships: &[FarShip],
    ) -> Self {
        let systems = galaxy
            .systems
            .iter()
            .map(|system| SystemSave {
                name: system.name.clone(),
                position: system.position,
                radius: system.radius,
                config: system.config.name.clone(),
                hard: system.hard,
                planets: system
                    .planets
                    .iter()
                    .filter_map(|id| galaxy.planet(*id))
                    .map(planet_save)
                    .collect(),
                belts: system
                    .belts
                    .iter()
                    .filter_map(|id| galaxy.belts.get(id.0 as usize))
                    .map(|belt| BeltSave {
                        config: belt.config.name.clone(),
                        distance: belt.distance,
                        half_width: belt.half_width,
                    })
                    .collect(),
            })
            .collect();
        let mazes = galaxy
            .mazes
            .iter()
            .map(|maze| MazeSave {
                config: maze.config.name.clone(),
                position: maze.position,
                radius: maze.radius,
            })
            .collect();
        let ships = ships
            .iter()
            .map(|ship| ShipSave {
                hull: ship.hull.name.clone(),
                pilot: ship.pilot.clone(),
                position: ship.position,
                velocity: ship.velocity,
                angle: ship.angle,
                health: ship.health,
                money: ship.money,
            })
            .collect();
        Self {
            seed: galaxy.seed,
            system_count,
            tick,
            camera,
            systems,
            mazes,
            ships,
        }
    }

    /// Rebuild the galaxy against `registry`.
    ///
    /// Every planet comes back unexpanded; the ids of planets that were
    /// expanded when saved are returned so the caller can rebuild their
    /// terrain.
    pub fn restore_galaxy(
        &self,
        registry: &ConfigRegistry,
    ) -> Result<(Galaxy, Vec<PlanetId>), SaveError> {
        let mut galaxy = Galaxy {
            seed: self.seed,
            ..Galaxy::default()
        };
        let mut expanded = Vec::new();

        for (index, saved) in self.systems.iter().enumerate() {
            let id = SystemId(index as u32);
            let config = registry
                .system_by_name(&saved.config)
                .ok_or_else(|| unknown("system", &saved.config))?;
            let mut system = StarSystem {
                id,
                name: saved.name.clone(),
                position: saved.position,
                radius: saved.radius,
                config,
                hard: saved.hard,
                planets: Vec::new(),
                belts: Vec::new(),
            };
            for p in &saved.planets {
                let planet_id = PlanetId(galaxy.planets.len() as u32);
                let config = registry
                    .planet_by_name(&p.config)
                    .ok_or_else(|| unknown("planet", &p.config))?;
                let mut planet = Planet::new(
                    planet_id,
                    id,
                    p.name.clone(),
                    config,
                    p.distance,
                    p.angle_to_system,
                    p.angle,
                    p.orbit_speed,
                    p.rotation_speed,
                    p.ground_height,
                    p.grav_const,
                );
                planet.update_position(system.position);
                if p.objects_created {
                    expanded.push(planet_id);
                }
                system.planets.push(planet_id);
                galaxy.planets.push(planet);
            }
            for b in &saved.belts {
                let belt_id = BeltId(galaxy.belts.len() as u32);
                let config = registry
                    .belt_by_name(&b.config)
                    .ok_or_else(|| unknown("belt", &b.config))?;
                galaxy.belts.push(SystemBelt {
                    id: belt_id,
                    system: id,
                    config,
                    distance: b.distance,
                    half_width: b.half_width,
                    position: system.position,
                });
                system.belts.push(belt_id);
            }
            galaxy.systems.push(system);
        }

        for (index, saved) in self.mazes.iter().enumerate() {
            let config = registry
                .maze_by_name(&saved.config)
                .ok_or_else(|| unknown("maze", &saved.config))?;
            galaxy.mazes.push(Maze {
                id: MazeId(index as u32),
                config,
                position: saved.position,
                radius: saved.radius,
            });
        }

        Ok((galaxy, expanded))
    }

    /// Ships as far objects, hulls resolved by name.
    pub fn restore_ships(&self, registry: &ConfigRegistry) -> Result<Vec<FarShip>, SaveError> {
        self.ships
            .iter()
            .map(|saved| {
                let hull = find_hull(registry, &saved.hull)
                    .ok_or_else(|| unknown("hull", &saved.hull))?;
                Ok(FarShip {
                    hull,
                    pilot: saved.pilot.clone(),
                    position: saved.position,
                    velocity: saved.velocity,
                    angle: saved.angle,
                    health: saved.health,
                    money: saved.money,
                })
            })
            .collect()
    }
}

fn planet_save(planet: &Planet) -> PlanetSave {
    PlanetSave {
        name: planet.name.clone(),
        config: planet.config.name.clone(),
        distance: planet.distance,
        angle_to_system: planet.angle_to_system,
        angle: planet.angle,
        orbit_speed: planet.orbit_speed,
        rotation_speed: planet.rotation_speed,
        ground_height: planet.ground_height,
        grav_const: planet.grav_const,
        objects_created: planet.objects_created(),
    }
}

fn unknown(kind: &'static str, name: &str) -> SaveError {
    SaveError::UnknownConfig {
        kind,
        name: name.to_string(),
    }
}

/// First hull with this name among the registry's planet ship configs.
fn find_hull(registry: &ConfigRegistry, name: &str) -> Option<Arc<HullConfig>> {
    registry.planets().iter().find_map(|planet| {
        planet
            .station
            .iter()
            .chain(&planet.ground_enemies)
            .chain(&planet.low_orbit_enemies)
            .chain(&planet.high_orbit_enemies)
            .find(|ship| ship.hull.name == name)
            .map(|ship| Arc::new(ship.hull.clone()))
    })
}

/// Path of the save file for a slot.
pub fn save_path(dir: &Path, slot: &str) -> PathBuf {
    dir.join(format!("{}.json", slot))
}

pub fn save_to_file(dir: &Path, slot: &str, save: &WorldSave) -> Result<PathBuf, SaveError> {
    fs::create_dir_all(dir)?;
    let path = save_path(dir, slot);
    let json = serde_json::to_string_pretty(save)?;
    fs::write(&path, json)?;
    Ok(path)
}

pub fn load_from_file(dir: &Path, slot: &str) -> Result<WorldSave, SaveError> {
    let path = save_path(dir, slot);
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidsail_core::catalog::builtin_registry;
    use voidsail_core::random::SeededRandom;
    use voidsail_procgen::galaxy::GalaxyBuilder;

    fn galaxy() -> Galaxy {
        let registry = builtin_registry();
        let mut rng = SeededRandom::new(7);
        GalaxyBuilder::new(&registry, &mut rng)
            .build(2)
            .expect("builtin galaxy builds")
    }

    #[test]
    fn test_restore_keeps_bodies() {
        let registry = builtin_registry();
        let mut before = galaxy();
        before.planets[0].mark_objects_created(10.0);
        let save = WorldSave::capture(&before, 2, 5, Camera::new(Vec2::ZERO, 20.0), &[]);
        let (restored, expanded) = save.restore_galaxy(&registry).unwrap();

        assert_eq!(restored.planets.len(), before.planets.len());
        assert_eq!(restored.belts.len(), before.belts.len());
        assert_eq!(restored.mazes.len(), before.mazes.len());
        assert_eq!(expanded, vec![PlanetId(0)]);
        assert!(
            restored.planets.iter().all(|p| !p.objects_created()),
            "restored planets start unexpanded"
        );
        for (a, b) in before.planets.iter().zip(&restored.planets) {
            assert_eq!(a.name, b.name);
            assert!(a.position.distance(b.position) < 1e-3, "planet position restored");
        }
    }

    #[test]
    fn test_unknown_config_is_rejected() {
        let registry = builtin_registry();
        let mut save = WorldSave::capture(&galaxy(), 2, 0, Camera::new(Vec2::ZERO, 20.0), &[]);
        save.systems[0].planets[0].config = "no-such-planet".into();
        let err = save.restore_galaxy(&registry).unwrap_err();
        assert!(matches!(
            err,
            SaveError::UnknownConfig { kind: "planet", .. }
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join("voidsail_save_test");
        let save = WorldSave::capture(&galaxy(), 2, 42, Camera::new(Vec2::new(1.0, 2.0), 20.0), &[]);
        let path = save_to_file(&dir, "slot_a", &save).unwrap();
        assert!(path.exists());

        let loaded = load_from_file(&dir, "slot_a").unwrap();
        assert_eq!(loaded, save);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = std::env::temp_dir().join("voidsail_save_missing");
        let err = load_from_file(&dir, "nope").unwrap_err();
        assert!(matches!(err, SaveError::Io(_)));
    }
}
