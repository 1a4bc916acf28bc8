//! GalaxyBuilder: star systems, planets, belts and mazes.
//!
//! Runs once per new world. Systems and mazes are interleaved by a seeded
//! coin once the home system exists, each placed clear of everything placed
//! before it. Within a system, slots are laid out outward from the sun and
//! must add up exactly to the declared system radius.

use glam::Vec2;
use tracing::{debug, info};

use voidsail_core::bodies::{Galaxy, Maze, Planet, StarSystem, SystemBelt};
use voidsail_core::config::ConfigRegistry;
use voidsail_core::constants::{
    ATM_HEIGHT, BELT_CHANCE, BELT_HALF_WIDTH, GROUND_SPEED, MAX_GROUND_HEIGHT, MAX_MAZE_RADIUS,
    MAZES_PER_SYSTEM, MAZE_GAP, PLANETS_PER_SYSTEM, PLANET_GAP, PLANET_ORBIT_SPEED,
    RADIUS_EPSILON, SUN_RADIUS,
};
use voidsail_core::error::GenerationError;
use voidsail_core::geometry::arc_to_angle;
use voidsail_core::random::SeededRandom;
use voidsail_core::types::{BeltId, MazeId, PlanetId, PlanetTier, SystemId};

use crate::placement::{place_disk, ExclusionDisk};

/// One orbital slot of a system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    Planet { ground_height: f32 },
    Belt { half_width: f32 },
}

impl Slot {
    /// Radial space reserved on each side of the slot's center line.
    pub fn reserved(&self) -> f32 {
        match *self {
            Slot::Planet { ground_height } => PLANET_GAP + ATM_HEIGHT + ground_height,
            Slot::Belt { half_width } => PLANET_GAP + half_width,
        }
    }

    /// Full radial width of the slot.
    pub fn width(&self) -> f32 {
        2.0 * self.reserved()
    }
}

/// Sun radius plus every slot's width.
pub fn system_radius(slots: &[Slot]) -> f64 {
    slots
        .iter()
        .fold(SUN_RADIUS as f64, |acc, s| acc + s.width() as f64)
}

pub struct GalaxyBuilder<'a> {
    registry: &'a ConfigRegistry,
    rng: &'a mut SeededRandom,
    disks: Vec<ExclusionDisk>,
}

impl<'a> GalaxyBuilder<'a> {
    pub fn new(registry: &'a ConfigRegistry, rng: &'a mut SeededRandom) -> Self {
        Self {
            registry,
            rng,
            disks: Vec::new(),
        }
    }

    /// Lay out `system_count` systems and twice as many mazes.
    pub fn build(mut self, system_count: usize) -> Result<Galaxy, GenerationError> {
        let mut galaxy = Galaxy {
            seed: self.rng.seed(),
            ..Default::default()
        };
        let mut systems_left = system_count;
        let mut mazes_left = MAZES_PER_SYSTEM * system_count;

        while systems_left > 0 || mazes_left > 0 {
            let mut create_system = systems_left > 0;
            if create_system && mazes_left > 0 && !galaxy.systems.is_empty() {
                create_system = self.rng.test(0.5);
            }
            if create_system {
                self.add_system(&mut galaxy)?;
                systems_left -= 1;
            } else {
                self.add_maze(&mut galaxy)?;
                mazes_left -= 1;
            }
        }

        info!(
            seed = galaxy.seed,
            systems = galaxy.systems.len(),
            planets = galaxy.planets.len(),
            belts = galaxy.belts.len(),
            mazes = galaxy.mazes.len(),
            "galaxy built"
        );
        Ok(galaxy)
    }

    /// Ground heights per slot; at most one inner slot becomes a belt.
    fn generate_slots(&mut self) -> Vec<Slot> {
        let mut belt_created = false;
        let mut slots = Vec::with_capacity(PLANETS_PER_SYSTEM);
        for i in 0..PLANETS_PER_SYSTEM {
            let inner_slot = 0 < i && (i as f32) < 0.5 * PLANETS_PER_SYSTEM as f32;
            if !belt_created && inner_slot && self.rng.test(BELT_CHANCE) {
                belt_created = true;
                slots.push(Slot::Belt {
                    half_width: BELT_HALF_WIDTH,
                });
            } else {
                let ground_height = self.rng.float_in(0.5, 1.0) * MAX_GROUND_HEIGHT;
                slots.push(Slot::Planet { ground_height });
            }
        }
        slots
    }

    fn add_system(&mut self, galaxy: &mut Galaxy) -> Result<(), GenerationError> {
        let hard = !galaxy.systems.is_empty();
        let slots = self.generate_slots();
        let declared = system_radius(&slots);
        let radius = declared as f32;

        let position = place_disk(&self.disks, radius, self.rng);
        self.disks.push(ExclusionDisk {
            center: position,
            radius,
        });

        let index = galaxy.systems.len();
        let id = SystemId(index as u32);
        let config = self.registry.pick_system(self.rng, hard)?;
        let name = self.registry.system_name(self.rng, index);

        let mut system = StarSystem {
            id,
            name,
            position,
            radius,
            config,
            hard,
            planets: Vec::new(),
            belts: Vec::new(),
        };

        let mut dist = SUN_RADIUS as f64;
        for slot in &slots {
            let reserved = slot.reserved() as f64;
            dist += reserved;
            match *slot {
                Slot::Planet { ground_height } => {
                    let inner = dist < declared / 2.0;
                    let planet =
                        self.create_planet(galaxy, &system, dist as f32, ground_height, inner)?;
                    system.planets.push(planet.id);
                    galaxy.planets.push(planet);
                }
                Slot::Belt { half_width } => {
                    let belt_id = BeltId(galaxy.belts.len() as u32);
                    let config = self.registry.pick_belt(self.rng, hard)?;
                    galaxy.belts.push(SystemBelt {
                        id: belt_id,
                        system: id,
                        config,
                        distance: dist as f32,
                        half_width,
                        position,
                    });
                    system.belts.push(belt_id);
                }
            }
            dist += reserved;
        }

        if (dist - declared).abs() > RADIUS_EPSILON as f64 {
            return Err(GenerationError::RadiusMismatch {
                system: system.name.clone(),
                declared: radius,
                accumulated: dist as f32,
            });
        }

        debug!(
            system = %system.name,
            hard,
            radius,
            x = position.x,
            y = position.y,
            "system placed"
        );
        galaxy.systems.push(system);
        Ok(())
    }

    fn create_planet(
        &mut self,
        galaxy: &Galaxy,
        system: &StarSystem,
        distance: f32,
        ground_height: f32,
        inner: bool,
    ) -> Result<Planet, GenerationError> {
        let tier = match (inner, system.hard) {
            (false, false) => PlanetTier::Easy,
            (true, true) => PlanetTier::Hard,
            _ => PlanetTier::Medium,
        };
        let config = self.registry.pick_planet(self.rng, tier)?;
        let orbit_speed = arc_to_angle(PLANET_ORBIT_SPEED, distance) * self.rng.sign();
        let rotation_speed = arc_to_angle(GROUND_SPEED, ground_height) * self.rng.sign();
        let index = galaxy.planets.len();
        let name = self.registry.planet_name(self.rng, index);
        let angle_to_system = self.rng.angle();
        let angle = self.rng.angle();
        let grav_const =
            self.rng.float_in(config.min_grav, config.max_grav) * ground_height * ground_height;

        let mut planet = Planet::new(
            PlanetId(index as u32),
            system.id,
            name,
            config,
            distance,
            angle_to_system,
            angle,
            orbit_speed,
            rotation_speed,
            ground_height,
            grav_const,
        );
        planet.update_position(system.position);
        Ok(planet)
    }

    fn add_maze(&mut self, galaxy: &mut Galaxy) -> Result<(), GenerationError> {
        let radius = self.rng.float_in(0.7, 1.0) * MAX_MAZE_RADIUS;
        let exclusion = radius + MAZE_GAP;
        let position: Vec2 = place_disk(&self.disks, exclusion, self.rng);
        self.disks.push(ExclusionDisk {
            center: position,
            radius: exclusion,
        });
        let config = self.registry.pick_maze(self.rng)?;
        galaxy.mazes.push(Maze {
            id: MazeId(galaxy.mazes.len() as u32),
            config,
            position,
            radius,
        });
        Ok(())
    }
}
