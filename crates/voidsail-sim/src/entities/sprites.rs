//! Planet-anchored sprite groups: cloud clusters and decoration packs.
//!
//! A group has no body. It sits at an anchor in the planet frame and may
//! drift around the planet at `rot_speed`; its drawables are laid out in the
//! group's local frame and move as a unit.

use glam::Vec2;

use voidsail_core::bodies::Planet;
use voidsail_core::drawable::{radius_of, Drawable};
use voidsail_core::physics::Physics;

use super::{Anchor, Streamed, TickContext};

#[derive(Debug, Clone)]
pub struct PlanetSprites {
    anchor: Anchor,
    /// Angular drift around the planet (rad/s).
    rot_speed: f32,
    drawables: Vec<Drawable>,
    position: Vec2,
}

impl PlanetSprites {
    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }
}

impl Streamed for PlanetSprites {
    type Alternate = FarPlanetSprites;

    fn update(&mut self, ctx: &TickContext<'_>, _physics: &mut dyn Physics) {
        self.anchor.rel_angle += self.rot_speed * ctx.dt;
        let Some(planet) = ctx.galaxy.planet(self.anchor.planet) else {
            return;
        };
        self.position = self.anchor.position(planet);
        let angle = self.anchor.frame_angle(planet);
        for d in &mut self.drawables {
            d.update(self.position, angle, ctx.dt);
        }
    }

    fn is_removable(&self) -> bool {
        false
    }

    fn to_alternate(&self, _ctx: &TickContext<'_>, _physics: &mut dyn Physics) -> FarPlanetSprites {
        FarPlanetSprites {
            anchor: self.anchor,
            rot_speed: self.rot_speed,
            drawables: self.drawables.clone(),
            position: self.position,
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
pub struct FarPlanetSprites {
    pub anchor: Anchor,
    pub rot_speed: f32,
    pub drawables: Vec<Drawable>,
    pub position: Vec2,
}

impl FarPlanetSprites {
    pub fn new(planet: &Planet, anchor: Anchor, rot_speed: f32, drawables: Vec<Drawable>) -> Self {
        Self {
            position: anchor.position(planet),
            anchor,
            rot_speed,
            drawables,
        }
    }
}

impl Streamed for FarPlanetSprites {
    type Alternate = PlanetSprites;

    fn update(&mut self, ctx: &TickContext<'_>, _physics: &mut dyn Physics) {
        self.anchor.rel_angle += self.rot_speed * ctx.dt;
        if let Some(planet) = ctx.galaxy.planet(self.anchor.planet) {
            self.position = self.anchor.position(planet);
        }
    }

    fn is_removable(&self) -> bool {
        false
    }

    fn to_alternate(&self, ctx: &TickContext<'_>, _physics: &mut dyn Physics) -> PlanetSprites {
        let mut drawables = self.drawables.clone();
        let mut position = self.position;
        if let Some(planet) = ctx.galaxy.planet(self.anchor.planet) {
            position = self.anchor.position(planet);
            let angle = self.anchor.frame_angle(planet);
            for d in &mut drawables {
                d.update(position, angle, 0.0);
            }
        }
        PlanetSprites {
            anchor: self.anchor,
            rot_speed: self.rot_speed,
            drawables,
            position,
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        radius_of(&self.drawables)
    }
}
