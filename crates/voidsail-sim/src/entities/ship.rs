//! Ships and the pilots that steer them.
//!
//! A live ship owns a dynamic physics body and steers by setting a velocity
//! intent toward its pilot's target. A far ship has no body and simply moves
//! toward the same target, never faster than `MAX_MOVE_SPEED`.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use voidsail_core::bodies::{Galaxy, Planet};
use voidsail_core::config::HullConfig;
use voidsail_core::constants::MAX_MOVE_SPEED;
use voidsail_core::drawable::{radius_of, Drawable, DrawableLevel};
use voidsail_core::geometry::{from_angle, norm_angle};
use voidsail_core::physics::{BodyDef, BodyHandle, BodyKind, BodyTag, Physics, Shape};
use voidsail_core::types::PlanetId;

use super::{Streamed, TickContext};

/// Proportional gain applied to position error when steering a live ship.
const STEER_GAIN: f32 = 2.0;

/// Ship controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pilot {
    /// Holds a fixed spot: planet-local when `planet` is set, world space otherwise.
    StillGuard { planet: Option<PlanetId>, anchor: Vec2 },
    /// Circles `planet` at `height` from its center.
    Orbiter {
        planet: PlanetId,
        height: f32,
        clockwise: bool,
        /// Current world-frame angle around the planet.
        phase: f32,
    },
}

impl Pilot {
    /// Move the pilot's own state forward (orbit phase).
    pub fn advance(&mut self, galaxy: &Galaxy, dt: f32) {
        if let Pilot::Orbiter {
            planet,
            height,
            clockwise,
            phase,
        } = self
        {
            if let Some(p) = galaxy.planet(*planet) {
                let rate = orbit_speed(p.grav_const, *height) / height.max(f32::EPSILON);
                let sign = if *clockwise { -1.0 } else { 1.0 };
                *phase = norm_angle(*phase + sign * rate * dt);
            }
        }
    }

    /// Where the pilot wants the ship to be, and how fast it should be moving there.
    pub fn target(&self, galaxy: &Galaxy, current: Vec2) -> (Vec2, Vec2) {
        match (self, self.planet()) {
            (_, Some(id)) => match galaxy.planet(id) {
                Some(p) => self.target_around(p),
                None => (current, Vec2::ZERO),
            },
            (Pilot::StillGuard { anchor, .. }, None) => (*anchor, Vec2::ZERO),
            (Pilot::Orbiter { .. }, None) => (current, Vec2::ZERO),
        }
    }

    /// Target relative to the pilot's planet.
    pub fn target_around(&self, planet: &Planet) -> (Vec2, Vec2) {
        match self {
            Pilot::StillGuard { anchor, .. } => {
                let pos = planet.local_to_world(*anchor);
                (pos, planet.frame_velocity_at(pos))
            }
            Pilot::Orbiter {
                height,
                clockwise,
                phase,
                ..
            } => {
                let speed = orbit_speed(planet.grav_const, *height);
                let sign = if *clockwise { -1.0 } else { 1.0 };
                let pos = planet.position + from_angle(*phase, *height);
                let tangent = from_angle(*phase + FRAC_PI_2, sign * speed);
                (pos, planet.velocity + tangent)
            }
        }
    }

    pub fn planet(&self) -> Option<PlanetId> {
        match self {
            Pilot::StillGuard { planet, .. } => *planet,
            Pilot::Orbiter { planet, .. } => Some(*planet),
        }
    }
}

/// Circular orbit speed at `height`, capped at the global speed limit.
pub fn orbit_speed(grav_const: f32, height: f32) -> f32 {
    if height <= 0.0 {
        return 0.0;
    }
    (grav_const / height).sqrt().min(MAX_MOVE_SPEED)
}

/// Collision shape of a hull: its outline if usable, a circle of its approximate radius otherwise.
pub fn hull_shape(hull: &HullConfig) -> Shape {
    match hull.outline.as_ref() {
        Some(points) if is_usable_hull(points) => {
            Shape::Polygon(points.iter().map(|p| Vec2::new(p[0], p[1])).collect())
        }
        _ => Shape::Circle {
            center: Vec2::ZERO,
            radius: hull.approx_radius,
        },
    }
}

pub(crate) fn is_usable_hull(points: &[[f32; 2]]) -> bool {
    points.len() >= 3 && points.iter().all(|p| p[0].is_finite() && p[1].is_finite())
}

#[derive(Debug)]
pub struct Ship {
    hull: Arc<HullConfig>,
    pilot: Pilot,
    body: BodyHandle,
    health: f32,
    money: u32,
    position: Vec2,
    velocity: Vec2,
    angle: f32,
    drawables: Vec<Drawable>,
}

impl Ship {
    /// Create the ship's body and drawables at the given pose.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        physics: &mut dyn Physics,
        hull: Arc<HullConfig>,
        pilot: Pilot,
        position: Vec2,
        velocity: Vec2,
        angle: f32,
        health: f32,
        money: u32,
    ) -> Self {
        let body = physics.create_body(BodyDef {
            kind: BodyKind::Dynamic,
            position,
            angle,
            velocity,
            shapes: vec![hull_shape(&hull)],
            tag: BodyTag::Ship,
        });
        let mut drawable = Drawable::new(hull.texture, hull.size, Vec2::ZERO, DrawableLevel::Bodies);
        drawable.update(position, angle, 0.0);
        Self {
            hull,
            pilot,
            body,
            health,
            money,
            position,
            velocity,
            angle,
            drawables: vec![drawable],
        }
    }

    pub fn hull(&self) -> &Arc<HullConfig> {
        &self.hull
    }

    pub fn pilot(&self) -> &Pilot {
        &self.pilot
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    /// Refresh the cached pose after something moved the body directly.
    pub fn sync_from_body(&mut self, physics: &dyn Physics) {
        if let Some(state) = physics.body_state(self.body) {
            self.position = state.position;
            self.velocity = state.velocity;
            self.angle = state.angle;
        }
    }

    pub fn on_remove(&mut self, physics: &mut dyn Physics) {
        physics.destroy_body(self.body);
    }

    /// Body-less copy of the ship's current state.
    pub fn to_far(&self) -> FarShip {
        FarShip {
            hull: self.hull.clone(),
            pilot: self.pilot.clone(),
            position: self.position,
            velocity: self.velocity,
            angle: self.angle,
            health: self.health,
            money: self.money,
        }
    }
}

impl Streamed for Ship {
    type Alternate = FarShip;

    fn update(&mut self, ctx: &TickContext<'_>, physics: &mut dyn Physics) {
        self.sync_from_body(&*physics);
        self.pilot.advance(ctx.galaxy, ctx.dt);
        let (target_pos, target_vel) = self.pilot.target(ctx.galaxy, self.position);
        let desired = (target_vel + (target_pos - self.position) * STEER_GAIN)
            .clamp_length_max(MAX_MOVE_SPEED);
        physics.set_velocity(self.body, desired, 0.0);
        for d in &mut self.drawables {
            d.update(self.position, self.angle, ctx.dt);
        }
    }

    fn is_removable(&self) -> bool {
        self.health <= 0.0
    }

    fn to_alternate(&self, _ctx: &TickContext<'_>, _physics: &mut dyn Physics) -> FarShip {
        self.to_far()
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        radius_of(&self.drawables)
    }
}

/// Body-less ship.
#[derive(Debug, Clone)]
pub struct FarShip {
    pub hull: Arc<HullConfig>,
    pub pilot: Pilot,
    pub position: Vec2,
    pub velocity: Vec2,
    pub angle: f32,
    pub health: f32,
    pub money: u32,
}

impl FarShip {
    pub fn new(hull: Arc<HullConfig>, pilot: Pilot, position: Vec2, money: u32) -> Self {
        let health = hull.max_health;
        Self {
            hull,
            pilot,
            position,
            velocity: Vec2::ZERO,
            angle: 0.0,
            health,
            money,
        }
    }
}

impl Streamed for FarShip {
    type Alternate = Ship;

    fn update(&mut self, ctx: &TickContext<'_>, _physics: &mut dyn Physics) {
        self.pilot.advance(ctx.galaxy, ctx.dt);
        let (target, _) = self.pilot.target(ctx.galaxy, self.position);
        let step = (target - self.position).clamp_length_max(MAX_MOVE_SPEED * ctx.dt);
        self.position += step;
        self.velocity = if ctx.dt > 0.0 { step / ctx.dt } else { Vec2::ZERO };
    }

    fn is_removable(&self) -> bool {
        self.health <= 0.0
    }

    fn to_alternate(&self, _ctx: &TickContext<'_>, physics: &mut dyn Physics) -> Ship {
        Ship::spawn(
            physics,
            self.hull.clone(),
            self.pilot.clone(),
            self.position,
            self.velocity,
            self.angle,
            self.health,
            self.money,
        )
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.hull.size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidsail_core::config::HullKind;

    fn hull(outline: Option<Vec<[f32; 2]>>) -> HullConfig {
        HullConfig {
            name: "probe".into(),
            texture: voidsail_core::types::TextureId(9),
            size: 2.0,
            approx_radius: 0.8,
            kind: HullKind::Standard,
            max_health: 10.0,
            outline,
        }
    }

    #[test]
    fn test_hull_shape_falls_back_to_circle() {
        assert!(matches!(hull_shape(&hull(None)), Shape::Circle { radius, .. } if radius == 0.8));
        let degenerate = hull(Some(vec![[0.0, 0.0], [1.0, 0.0]]));
        assert!(matches!(hull_shape(&degenerate), Shape::Circle { .. }));
        let square = hull(Some(vec![[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]]));
        assert!(matches!(hull_shape(&square), Shape::Polygon(ref p) if p.len() == 4));
    }

    #[test]
    fn test_orbit_speed_is_capped() {
        assert!((orbit_speed(100.0, 25.0) - 2.0).abs() < 1e-6);
        assert_eq!(orbit_speed(1.0e6, 1.0), MAX_MOVE_SPEED);
        assert_eq!(orbit_speed(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_free_guard_targets_anchor() {
        let galaxy = Galaxy::default();
        let pilot = Pilot::StillGuard {
            planet: None,
            anchor: Vec2::new(3.0, 4.0),
        };
        let (pos, vel) = pilot.target(&galaxy, Vec2::ZERO);
        assert_eq!(pos, Vec2::new(3.0, 4.0));
        assert_eq!(vel, Vec2::ZERO);
    }

    #[test]
    fn test_far_ship_speed_is_bounded() {
        let galaxy = Galaxy::default();
        let camera = voidsail_core::types::Camera::new(Vec2::ZERO, 10.0);
        let ctx = TickContext {
            galaxy: &galaxy,
            camera: &camera,
            dt: 0.5,
        };
        let mut physics = voidsail_core::physics::HeadlessPhysics::new();
        let mut ship = FarShip::new(
            Arc::new(hull(None)),
            Pilot::StillGuard {
                planet: None,
                anchor: Vec2::new(100.0, 0.0),
            },
            Vec2::ZERO,
            0,
        );
        ship.update(&ctx, &mut physics);
        assert!((ship.position.x - MAX_MOVE_SPEED * 0.5).abs() < 1e-4);
        assert!((ship.velocity.length() - MAX_MOVE_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_live_ship_releases_body() {
        let mut physics = voidsail_core::physics::HeadlessPhysics::new();
        let mut ship = Ship::spawn(
            &mut physics,
            Arc::new(hull(None)),
            Pilot::StillGuard {
                planet: None,
                anchor: Vec2::ZERO,
            },
            Vec2::new(1.0, 1.0),
            Vec2::ZERO,
            0.0,
            5.0,
            3,
        );
        assert_eq!(physics.body_count(), 1);
        assert_eq!(ship.radius(), 1.0);
        ship.damage(5.0);
        assert!(ship.is_removable());
        ship.on_remove(&mut physics);
        assert_eq!(physics.body_count(), 0);
    }
}
