//! Planet expansion: builds a planet's objects the first time the camera
//! comes within sky range of it.

use tracing::debug;

use voidsail_core::bodies::Galaxy;
use voidsail_core::config::MissingResourcePolicy;
use voidsail_core::physics::Physics;
use voidsail_core::random::SeededRandom;
use voidsail_core::types::{Camera, PlanetId};

use crate::error::SimError;
use crate::planet_objects::{ExpansionMode, PlanetObjectsBuilder};
use crate::stream::WorldObjectStream;

/// Expand every not-yet-expanded planet the camera is near. Returns how many were expanded.
pub fn run(
    galaxy: &mut Galaxy,
    camera: &Camera,
    physics: &mut dyn Physics,
    stream: &mut WorldObjectStream,
    cosmetic: &mut SeededRandom,
    policy: MissingResourcePolicy,
) -> Result<usize, SimError> {
    let mut expanded = 0;
    for index in 0..galaxy.planets.len() {
        let planet = &galaxy.planets[index];
        if planet.objects_created() || !planet.is_near(camera.position) {
            continue;
        }
        let id = planet.id;
        expand_planet(galaxy, id, physics, stream, cosmetic, policy, ExpansionMode::Full)?;
        expanded += 1;
    }
    Ok(expanded)
}

/// Build one planet's objects, then record its min ground radius and landing places.
///
/// Does nothing for a planet that is already expanded.
pub fn expand_planet(
    galaxy: &mut Galaxy,
    id: PlanetId,
    physics: &mut dyn Physics,
    stream: &mut WorldObjectStream,
    cosmetic: &mut SeededRandom,
    policy: MissingResourcePolicy,
    mode: ExpansionMode,
) -> Result<(), SimError> {
    let seed = galaxy.seed;
    let Some(planet) = galaxy.planet(id) else {
        return Ok(());
    };
    if planet.objects_created() {
        return Ok(());
    }
    let rng = SeededRandom::for_planet(seed, id);
    let mut builder = PlanetObjectsBuilder::new(physics, stream, rng, cosmetic, policy);
    let min_ground_height = builder.create_planet_objs(planet, mode)?;
    let landing_places = builder.take_landing_places();

    if let Some(planet) = galaxy.planet_mut(id) {
        planet.mark_objects_created(min_ground_height);
        planet.set_landing_places(landing_places);
        debug!(planet = %planet.name, min_ground_height, "expansion recorded");
    }
    Ok(())
}
