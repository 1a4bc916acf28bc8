//! Gravity and safe-landing recovery for live ships.
//!
//! Uses the planet and system nearest the camera. A ship inside the planet's
//! atmosphere is pulled toward the planet center; one near the sun is pulled
//! toward the sun. Pull distance is clamped below by the ground height (or
//! the sun's hot radius) so the acceleration stays bounded.

use glam::Vec2;
use hecs::Entity;

use voidsail_core::bodies::{Galaxy, Planet};
use voidsail_core::constants::{SUN_GRAV_CONST, SUN_HOT_RADIUS, SUN_RADIUS};
use voidsail_core::physics::Physics;
use voidsail_core::types::Camera;

use crate::entities::{Ship, Streamed};
use crate::stream::WorldObjectStream;

/// Queue gravity accelerations for every live ship. Ships found below the
/// planet's min ground radius are lifted out instead and collected in `recovered`.
pub fn run(
    galaxy: &Galaxy,
    camera: &Camera,
    physics: &mut dyn Physics,
    stream: &mut WorldObjectStream,
    recovered: &mut Vec<Entity>,
) {
    recovered.clear();

    let Some(planet) = galaxy.nearest_planet(camera.position) else {
        return;
    };
    let system = galaxy.nearest_system(camera.position);

    stream.for_each_live_ship(|entity, ship| {
        let pos = physics
            .body_state(ship.body())
            .map_or(ship.position(), |s| s.position);
        let to_planet = pos.distance(planet.position);

        let (source, grav_const, min_dist) = if to_planet < planet.full_height() {
            if to_planet <= planet.min_ground_height() && !ship.hull().is_station() {
                recover(planet, ship, pos, physics);
                recovered.push(entity);
                return;
            }
            (planet.position, planet.grav_const, planet.ground_height)
        } else {
            match system {
                Some(sys) if sys.position.distance(pos) < SUN_RADIUS => {
                    (sys.position, SUN_GRAV_CONST, SUN_HOT_RADIUS)
                }
                _ => return,
            }
        };

        let offset = source - pos;
        let len = offset.length().max(min_dist);
        let accel = offset.normalize_or_zero() * (grav_const / (len * len));
        physics.apply_acceleration(ship.body(), accel);
    });
}

/// Put a ship that fell through the terrain back at the top of the atmosphere, at rest.
fn recover(planet: &Planet, ship: &mut Ship, pos: Vec2, physics: &mut dyn Physics) {
    let to_ship = pos - planet.position;
    let len = to_ship.length();
    let lifted = if len == 0.0 {
        Vec2::new(0.0, planet.full_height())
    } else {
        to_ship * (planet.full_height() / len)
    };
    physics.set_transform(ship.body(), planet.position + lifted, 0.0);
    physics.set_velocity(ship.body(), Vec2::ZERO, 0.0);
    ship.sync_from_body(&*physics);
}
