//! Planet sky gradient.
//!
//! The sky follows the camera while it is inside sky range so it always fills
//! the view, and rests at the planet otherwise. Its tint blends from night to
//! day with the camera's bearing relative to the sun and fades out with
//! altitude.

use glam::Vec2;

use voidsail_core::bodies::{Galaxy, Planet};
use voidsail_core::config::SkyConfig;
use voidsail_core::constants::MAX_SKY_HEIGHT;
use voidsail_core::drawable::{radius_of, Drawable, DrawableLevel};
use voidsail_core::geometry::{angle_diff, angle_of};
use voidsail_core::physics::Physics;
use voidsail_core::types::{Camera, PlanetId};

use super::{Streamed, TickContext};

#[derive(Debug, Clone)]
pub struct Sky {
    planet: PlanetId,
    config: SkyConfig,
    position: Vec2,
    drawables: Vec<Drawable>,
}

impl Sky {
    pub fn new(planet: &Planet, config: SkyConfig) -> Self {
        let size = 2.0 * (planet.ground_height + MAX_SKY_HEIGHT);
        let mut drawable = Drawable::new(config.texture, size, Vec2::ZERO, DrawableLevel::Sky);
        drawable.tint = config.night_tint;
        Self {
            planet: planet.id,
            config,
            position: planet.position,
            drawables: vec![drawable],
        }
    }

    pub fn planet(&self) -> PlanetId {
        self.planet
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// Current tint of the sky drawable.
    pub fn tint(&self) -> [f32; 4] {
        self.drawables.first().map_or(self.config.night_tint, |d| d.tint)
    }
}

/// Day factor in `[0, 1]`: 1 with the camera straight under the sun, 0 on the far side.
pub fn daylight(galaxy: &Galaxy, planet: &Planet, camera: Vec2) -> f32 {
    let Some(system) = galaxy.system(planet.system) else {
        return 1.0;
    };
    let to_sun = angle_of(system.position - planet.position);
    let to_camera = angle_of(camera - planet.position);
    (angle_diff(to_sun, to_camera).cos() + 1.0) * 0.5
}

/// Sky opacity in `[0, 1]`: full at the ground, zero at the edge of sky range.
pub fn intensity(planet: &Planet, camera: &Camera) -> f32 {
    let altitude = camera.position.distance(planet.position) - planet.ground_height;
    1.0 - (altitude / MAX_SKY_HEIGHT).clamp(0.0, 1.0)
}

fn blend(night: [f32; 4], day: [f32; 4], t: f32, alpha: f32) -> [f32; 4] {
    let mut out: [f32; 4] = std::array::from_fn(|i| night[i] + (day[i] - night[i]) * t);
    out[3] *= alpha;
    out
}

impl Streamed for Sky {
    type Alternate = FarSky;

    fn update(&mut self, ctx: &TickContext<'_>, _physics: &mut dyn Physics) {
        let Some(planet) = ctx.galaxy.planet(self.planet) else {
            return;
        };
        self.position = if planet.is_near(ctx.camera.position) {
            ctx.camera.position
        } else {
            planet.position
        };
        let day = daylight(ctx.galaxy, planet, ctx.camera.position);
        let alpha = intensity(planet, ctx.camera);
        let tint = blend(self.config.night_tint, self.config.day_tint, day, alpha);
        for d in &mut self.drawables {
            d.tint = tint;
            d.update(self.position, 0.0, ctx.dt);
        }
    }

    fn is_removable(&self) -> bool {
        false
    }

    fn to_alternate(&self, _ctx: &TickContext<'_>, _physics: &mut dyn Physics) -> FarSky {
        FarSky {
            planet: self.planet,
            config: self.config.clone(),
            position: self.position,
            radius: self.radius(),
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        radius_of(&self.drawables)
    }
}

#[derive(Debug, Clone)]
pub struct FarSky {
    pub planet: PlanetId,
    pub config: SkyConfig,
    pub position: Vec2,
    pub radius: f32,
}

impl Streamed for FarSky {
    type Alternate = Sky;

    fn update(&mut self, ctx: &TickContext<'_>, _physics: &mut dyn Physics) {
        if let Some(planet) = ctx.galaxy.planet(self.planet) {
            self.position = planet.position;
        }
    }

    fn is_removable(&self) -> bool {
        false
    }

    fn to_alternate(&self, ctx: &TickContext<'_>, _physics: &mut dyn Physics) -> Sky {
        match ctx.galaxy.planet(self.planet) {
            Some(planet) => Sky::new(planet, self.config.clone()),
            None => {
                let mut drawable = Drawable::new(
                    self.config.texture,
                    2.0 * self.radius,
                    Vec2::ZERO,
                    DrawableLevel::Sky,
                );
                drawable.tint = self.config.night_tint;
                Sky {
                    planet: self.planet,
                    config: self.config.clone(),
                    position: self.position,
                    drawables: vec![drawable],
                }
            }
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
