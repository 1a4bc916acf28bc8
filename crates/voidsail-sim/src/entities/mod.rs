//! Streamed entity kinds.
//!
//! Every logical object has two representations: a live one (physics body
//! plus drawables, used near the camera) and a far one (plain data). Both
//! sides implement `Streamed`; the variant tag carries kind-specific state.

pub mod ship;
pub mod sky;
pub mod sprites;
pub mod tile;

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use voidsail_core::bodies::{Galaxy, Planet};
use voidsail_core::drawable::{depth_of, Drawable};
use voidsail_core::geometry::from_angle;
use voidsail_core::physics::Physics;
use voidsail_core::types::{Camera, PlanetId};

pub use ship::{FarShip, Pilot, Ship};
pub use sky::{FarSky, Sky};
pub use sprites::{FarPlanetSprites, PlanetSprites};
pub use tile::{FarTile, TileObject};

/// A point fixed in a planet's rotating frame, in polar form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub planet: PlanetId,
    pub rel_angle: f32,
    pub dist: f32,
}

impl Anchor {
    pub fn new(planet: PlanetId, rel_angle: f32, dist: f32) -> Self {
        Self {
            planet,
            rel_angle,
            dist,
        }
    }

    pub fn position(&self, planet: &Planet) -> Vec2 {
        planet.position + from_angle(planet.angle + self.rel_angle, self.dist)
    }

    /// Local frame angle: x along the surface counterclockwise, y toward the center.
    pub fn frame_angle(&self, planet: &Planet) -> f32 {
        planet.angle + self.rel_angle + FRAC_PI_2
    }
}

/// Read-only world state an entity may consult while ticking.
pub struct TickContext<'a> {
    pub galaxy: &'a Galaxy,
    pub camera: &'a Camera,
    pub dt: f32,
}

/// Behavior shared by both representations of every entity kind.
pub trait Streamed {
    /// The representation this one converts into.
    type Alternate;

    fn update(&mut self, ctx: &TickContext<'_>, physics: &mut dyn Physics);
    fn is_removable(&self) -> bool;
    /// Build the other representation, carrying position and velocity over.
    fn to_alternate(&self, ctx: &TickContext<'_>, physics: &mut dyn Physics) -> Self::Alternate;
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ship,
    Tile,
    Sprites,
    Sky,
}

#[derive(Debug)]
pub enum LiveObject {
    Ship(Ship),
    Tile(TileObject),
    Sprites(PlanetSprites),
    Sky(Sky),
}

#[derive(Debug, Clone)]
pub enum FarObject {
    Ship(FarShip),
    Tile(FarTile),
    Sprites(FarPlanetSprites),
    Sky(FarSky),
}

macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Self::Ship($inner) => $body,
            Self::Tile($inner) => $body,
            Self::Sprites($inner) => $body,
            Self::Sky($inner) => $body,
        }
    };
}

impl LiveObject {
    pub fn kind(&self) -> EntityKind {
        match self {
            LiveObject::Ship(_) => EntityKind::Ship,
            LiveObject::Tile(_) => EntityKind::Tile,
            LiveObject::Sprites(_) => EntityKind::Sprites,
            LiveObject::Sky(_) => EntityKind::Sky,
        }
    }

    pub fn drawables(&self) -> &[Drawable] {
        dispatch!(self, o => o.drawables())
    }

    /// Release the physics body, if any. Called synchronously at removal.
    pub fn on_remove(&mut self, physics: &mut dyn Physics) {
        match self {
            LiveObject::Ship(ship) => ship.on_remove(physics),
            LiveObject::Tile(tile) => tile.on_remove(physics),
            LiveObject::Sprites(_) | LiveObject::Sky(_) => {}
        }
    }
}

impl Streamed for LiveObject {
    type Alternate = FarObject;

    fn update(&mut self, ctx: &TickContext<'_>, physics: &mut dyn Physics) {
        dispatch!(self, o => o.update(ctx, physics))
    }

    fn is_removable(&self) -> bool {
        dispatch!(self, o => o.is_removable())
    }

    fn to_alternate(&self, ctx: &TickContext<'_>, physics: &mut dyn Physics) -> FarObject {
        match self {
            LiveObject::Ship(o) => FarObject::Ship(o.to_alternate(ctx, physics)),
            LiveObject::Tile(o) => FarObject::Tile(o.to_alternate(ctx, physics)),
            LiveObject::Sprites(o) => FarObject::Sprites(o.to_alternate(ctx, physics)),
            LiveObject::Sky(o) => FarObject::Sky(o.to_alternate(ctx, physics)),
        }
    }

    fn position(&self) -> Vec2 {
        dispatch!(self, o => o.position())
    }

    fn radius(&self) -> f32 {
        dispatch!(self, o => o.radius())
    }
}

impl FarObject {
    pub fn kind(&self) -> EntityKind {
        match self {
            FarObject::Ship(_) => EntityKind::Ship,
            FarObject::Tile(_) => EntityKind::Tile,
            FarObject::Sprites(_) => EntityKind::Sprites,
            FarObject::Sky(_) => EntityKind::Sky,
        }
    }

    /// Radius scale captured when the entity goes far.
    pub fn depth(&self) -> f32 {
        match self {
            FarObject::Sprites(s) => depth_of(&s.drawables),
            _ => 1.0,
        }
    }
}

impl Streamed for FarObject {
    type Alternate = LiveObject;

    fn update(&mut self, ctx: &TickContext<'_>, physics: &mut dyn Physics) {
        dispatch!(self, o => o.update(ctx, physics))
    }

    fn is_removable(&self) -> bool {
        dispatch!(self, o => o.is_removable())
    }

    fn to_alternate(&self, ctx: &TickContext<'_>, physics: &mut dyn Physics) -> LiveObject {
        match self {
            FarObject::Ship(o) => LiveObject::Ship(o.to_alternate(ctx, physics)),
            FarObject::Tile(o) => LiveObject::Tile(o.to_alternate(ctx, physics)),
            FarObject::Sprites(o) => LiveObject::Sprites(o.to_alternate(ctx, physics)),
            FarObject::Sky(o) => LiveObject::Sky(o.to_alternate(ctx, physics)),
        }
    }

    fn position(&self) -> Vec2 {
        dispatch!(self, o => o.position())
    }

    fn radius(&self) -> f32 {
        dispatch!(self, o => o.radius())
    }
}
