//! Galaxy bodies: star systems, planets, belts and mazes.
//!
//! These are created once by the galaxy builder (or restored from a save)
//! and never destroyed during a session. Only their own per-tick update
//! moves them.

use std::sync::Arc;

use glam::Vec2;

use crate::config::{BeltConfig, MazeConfig, PlanetConfig, SolarSystemConfig};
use crate::constants::{ATM_HEIGHT, MAX_SKY_HEIGHT};
use crate::geometry::{from_angle, rotate};
use crate::types::{BeltId, MazeId, PlanetId, SystemId};

#[derive(Debug, Clone)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub position: Vec2,
    pub radius: f32,
    pub config: Arc<SolarSystemConfig>,
    /// False only for the home system.
    pub hard: bool,
    pub planets: Vec<PlanetId>,
    pub belts: Vec<BeltId>,
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub id: PlanetId,
    pub system: SystemId,
    pub name: String,
    pub config: Arc<PlanetConfig>,
    /// Distance from the system center.
    pub distance: f32,
    /// Polar angle of the planet around its sun.
    pub angle_to_system: f32,
    /// Own rotation angle.
    pub angle: f32,
    /// Angular rate around the sun (rad/s, signed).
    pub orbit_speed: f32,
    /// Angular rate of own rotation (rad/s, signed).
    pub rotation_speed: f32,
    pub ground_height: f32,
    pub grav_const: f32,
    pub position: Vec2,
    /// Orbital velocity of the planet center.
    pub velocity: Vec2,
    objects_created: bool,
    min_ground_height: f32,
    landing_places: Vec<Vec2>,
}

impl Planet {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: PlanetId,
        system: SystemId,
        name: String,
        config: Arc<PlanetConfig>,
        distance: f32,
        angle_to_system: f32,
        angle: f32,
        orbit_speed: f32,
        rotation_speed: f32,
        ground_height: f32,
        grav_const: f32,
    ) -> Self {
        Self {
            id,
            system,
            name,
            config,
            distance,
            angle_to_system,
            angle,
            orbit_speed,
            rotation_speed,
            ground_height,
            grav_const,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            objects_created: false,
            min_ground_height: ground_height,
            landing_places: Vec::new(),
        }
    }

    /// Ground height plus atmosphere.
    pub fn full_height(&self) -> f32 {
        self.ground_height + ATM_HEIGHT
    }

    /// Whether a camera at `pos` is close enough to expand this planet.
    pub fn is_near(&self, pos: Vec2) -> bool {
        pos.distance(self.position) < self.ground_height + MAX_SKY_HEIGHT
    }

    pub fn objects_created(&self) -> bool {
        self.objects_created
    }

    /// Flip the one-way expansion flag. Returns false if it was already set.
    pub fn mark_objects_created(&mut self, min_ground_height: f32) -> bool {
        if self.objects_created {
            return false;
        }
        self.objects_created = true;
        self.min_ground_height = min_ground_height;
        true
    }

    /// Actual innermost terrain radius, known once the ground has been built.
    pub fn min_ground_height(&self) -> f32 {
        self.min_ground_height
    }

    pub fn landing_places(&self) -> &[Vec2] {
        &self.landing_places
    }

    pub fn set_landing_places(&mut self, places: Vec<Vec2>) {
        self.landing_places = places;
    }

    /// Advance orbit and rotation by `dt` around a sun at `system_position`.
    pub fn advance(&mut self, dt: f32, system_position: Vec2) {
        self.angle_to_system += self.orbit_speed * dt;
        self.angle += self.rotation_speed * dt;
        self.update_position(system_position);
    }

    /// Recompute position and orbital velocity from the polar state.
    pub fn update_position(&mut self, system_position: Vec2) {
        self.position = system_position + from_angle(self.angle_to_system, self.distance);
        let tangent = from_angle(self.angle_to_system + std::f32::consts::FRAC_PI_2, 1.0);
        self.velocity = tangent * self.orbit_speed * self.distance;
    }

    /// World position of a point given in the planet's rotating frame.
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        self.position + rotate(local, self.angle)
    }

    /// Rotating-frame coordinates of a world point.
    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        rotate(world - self.position, -self.angle)
    }

    /// Velocity of a point fixed to the planet's surface frame.
    pub fn frame_velocity_at(&self, world: Vec2) -> Vec2 {
        let r = world - self.position;
        self.velocity + r.perp() * self.rotation_speed
    }
}

#[derive(Debug, Clone)]
pub struct SystemBelt {
    pub id: BeltId,
    pub system: SystemId,
    pub config: Arc<BeltConfig>,
    /// Radius of the belt's center line around the sun.
    pub distance: f32,
    pub half_width: f32,
    pub position: Vec2,
}

#[derive(Debug, Clone)]
pub struct Maze {
    pub id: MazeId,
    pub config: Arc<MazeConfig>,
    pub position: Vec2,
    pub radius: f32,
}

/// Everything the galaxy builder produces.
#[derive(Debug, Clone, Default)]
pub struct Galaxy {
    pub seed: u64,
    pub systems: Vec<StarSystem>,
    pub planets: Vec<Planet>,
    pub belts: Vec<SystemBelt>,
    pub mazes: Vec<Maze>,
}

impl Galaxy {
    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        self.systems.get(id.0 as usize)
    }

    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.get(id.0 as usize)
    }

    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut Planet> {
        self.planets.get_mut(id.0 as usize)
    }

    /// Move every planet by one step.
    pub fn advance(&mut self, dt: f32) {
        let Galaxy {
            systems, planets, ..
        } = self;
        for planet in planets.iter_mut() {
            if let Some(system) = systems.get(planet.system.0 as usize) {
                planet.advance(dt, system.position);
            }
        }
    }

    pub fn nearest_planet(&self, pos: Vec2) -> Option<&Planet> {
        nearest(&self.planets, pos, |p| p.position)
    }

    pub fn nearest_system(&self, pos: Vec2) -> Option<&StarSystem> {
        nearest(&self.systems, pos, |s| s.position)
    }

    pub fn nearest_maze(&self, pos: Vec2) -> Option<&Maze> {
        nearest(&self.mazes, pos, |m| m.position)
    }
}

fn nearest<T>(items: &[T], pos: Vec2, position: impl Fn(&T) -> Vec2) -> Option<&T> {
    items.iter().min_by(|a, b| {
        position(a)
            .distance_squared(pos)
            .total_cmp(&position(b).distance_squared(pos))
    })
}
