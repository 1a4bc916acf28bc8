//! Ground tiles.
//!
//! A live tile with a non-empty outline owns a kinematic chain body that is
//! re-posed every tick to follow the planet's rotating frame.

use glam::Vec2;

use voidsail_core::bodies::Planet;
use voidsail_core::drawable::{Drawable, DrawableLevel};
use voidsail_core::physics::{BodyDef, BodyHandle, BodyKind, BodyTag, Physics, Shape};
use voidsail_core::types::TextureId;
use voidsail_terrain::Tile;

use super::{Anchor, Streamed, TickContext};

#[derive(Debug)]
pub struct TileObject {
    anchor: Anchor,
    size: f32,
    tile: Tile,
    texture: Option<TextureId>,
    body: Option<BodyHandle>,
    position: Vec2,
    angle: f32,
    drawables: Vec<Drawable>,
}

impl TileObject {
    pub fn spawn(
        physics: &mut dyn Physics,
        planet: &Planet,
        anchor: Anchor,
        size: f32,
        tile: Tile,
        texture: Option<TextureId>,
    ) -> Self {
        let position = anchor.position(planet);
        let angle = anchor.frame_angle(planet);
        let body = tile.has_body().then(|| {
            physics.create_body(BodyDef {
                kind: BodyKind::Kinematic,
                position,
                angle,
                velocity: planet.frame_velocity_at(position),
                shapes: vec![Shape::Chain(
                    tile.outline.iter().map(|p| *p * size).collect(),
                )],
                tag: BodyTag::Tile { planet: planet.id },
            })
        });
        let drawables = texture
            .map(|t| {
                let mut d = Drawable::new(t, size, Vec2::ZERO, DrawableLevel::Ground);
                d.update(position, angle, 0.0);
                d
            })
            .into_iter()
            .collect();
        Self {
            anchor,
            size,
            tile,
            texture,
            body,
            position,
            angle,
            drawables,
        }
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn on_remove(&mut self, physics: &mut dyn Physics) {
        if let Some(body) = self.body.take() {
            physics.destroy_body(body);
        }
    }
}

impl Streamed for TileObject {
    type Alternate = FarTile;

    fn update(&mut self, ctx: &TickContext<'_>, physics: &mut dyn Physics) {
        let Some(planet) = ctx.galaxy.planet(self.anchor.planet) else {
            return;
        };
        self.position = self.anchor.position(planet);
        self.angle = self.anchor.frame_angle(planet);
        if let Some(body) = self.body {
            physics.set_transform(body, self.position, self.angle);
            physics.set_velocity(
                body,
                planet.frame_velocity_at(self.position),
                planet.rotation_speed,
            );
        }
        for d in &mut self.drawables {
            d.update(self.position, self.angle, ctx.dt);
        }
    }

    fn is_removable(&self) -> bool {
        false
    }

    fn to_alternate(&self, _ctx: &TickContext<'_>, _physics: &mut dyn Physics) -> FarTile {
        FarTile {
            anchor: self.anchor,
            size: self.size,
            tile: self.tile.clone(),
            texture: self.texture,
            position: self.position,
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.size * 0.5
    }
}

#[derive(Debug, Clone)]
pub struct FarTile {
    pub anchor: Anchor,
    pub size: f32,
    pub tile: Tile,
    pub texture: Option<TextureId>,
    pub position: Vec2,
}

impl Streamed for FarTile {
    type Alternate = TileObject;

    fn update(&mut self, ctx: &TickContext<'_>, _physics: &mut dyn Physics) {
        if let Some(planet) = ctx.galaxy.planet(self.anchor.planet) {
            self.position = self.anchor.position(planet);
        }
    }

    fn is_removable(&self) -> bool {
        false
    }

    fn to_alternate(&self, ctx: &TickContext<'_>, physics: &mut dyn Physics) -> TileObject {
        match ctx.galaxy.planet(self.anchor.planet) {
            Some(planet) => TileObject::spawn(
                physics,
                planet,
                self.anchor,
                self.size,
                self.tile.clone(),
                self.texture,
            ),
            // Planets are never destroyed; keep the last known pose without a body.
            None => TileObject {
                anchor: self.anchor,
                size: self.size,
                tile: self.tile.clone(),
                texture: self.texture,
                body: None,
                position: self.position,
                angle: 0.0,
                drawables: Vec::new(),
            },
        }
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.size * 0.5
    }
}
