//! Physics capability surface and a headless backend.
//!
//! The simulation only needs body creation/destruction, pose and velocity
//! access, acceleration intents, one step per tick, and ray casts. Any backend
//! providing those satisfies `Physics`; placement code needs only `RayCast`.
//!
//! `HeadlessPhysics` integrates motion and answers ray queries against the
//! registered shapes. It resolves no contacts.

use glam::Vec2;
use hecs::{Entity, World};

use crate::geometry::{cross, rotate};
use crate::types::PlanetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(Entity);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    /// Moved only by velocities set from outside.
    Kinematic,
    /// Moved by velocities and accumulated accelerations.
    Dynamic,
}

/// Collision geometry in body-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Closed convex outline.
    Polygon(Vec<Vec2>),
    /// Open polyline.
    Chain(Vec<Vec2>),
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    fn bounding_radius(&self) -> f32 {
        match self {
            Shape::Polygon(points) | Shape::Chain(points) => {
                points.iter().map(|p| p.length()).fold(0.0, f32::max)
            }
            Shape::Circle { center, radius } => center.length() + radius,
        }
    }
}

/// Owner tag attached to a body, reported back by ray casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyTag {
    Tile { planet: PlanetId },
    Ship,
}

impl BodyTag {
    pub fn is_tile_of(self, planet: PlanetId) -> bool {
        matches!(self, BodyTag::Tile { planet: p } if p == planet)
    }
}

#[derive(Debug, Clone)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub shapes: Vec<Shape>,
    pub tag: BodyTag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub angle: f32,
    pub velocity: Vec2,
    pub angular_velocity: f32,
}

/// First impact of a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    /// Unit surface normal facing the ray origin.
    pub normal: Vec2,
    /// Position along the ray in `[0, 1]`.
    pub fraction: f32,
    pub tag: BodyTag,
}

pub trait RayCast {
    /// Nearest hit on a body whose tag passes `accept`.
    fn cast_ray_filtered(
        &self,
        from: Vec2,
        to: Vec2,
        accept: &dyn Fn(BodyTag) -> bool,
    ) -> Option<RayHit>;

    fn cast_ray(&self, from: Vec2, to: Vec2) -> Option<RayHit> {
        self.cast_ray_filtered(from, to, &|_| true)
    }
}

pub trait Physics: RayCast {
    fn create_body(&mut self, def: BodyDef) -> BodyHandle;
    /// Release a body immediately. Returns false for an unknown handle.
    fn destroy_body(&mut self, body: BodyHandle) -> bool;
    fn body_state(&self, body: BodyHandle) -> Option<BodyState>;
    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2, angular_velocity: f32);
    fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32);
    /// Queue an acceleration consumed by the next `step`.
    fn apply_acceleration(&mut self, body: BodyHandle, acceleration: Vec2);
    fn step(&mut self, dt: f32);
    fn body_count(&self) -> usize;
}

// --- Headless backend ---

struct Pose {
    position: Vec2,
    angle: f32,
}

struct Motion {
    velocity: Vec2,
    angular_velocity: f32,
    acceleration: Vec2,
}

struct Collider {
    kind: BodyKind,
    shapes: Vec<Shape>,
    tag: BodyTag,
    bound: f32,
}

/// Physics backend with kinematic integration and exact ray queries.
#[derive(Default)]
pub struct HeadlessPhysics {
    world: World,
}

impl HeadlessPhysics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RayCast for HeadlessPhysics {
    fn cast_ray_filtered(
        &self,
        from: Vec2,
        to: Vec2,
        accept: &dyn Fn(BodyTag) -> bool,
    ) -> Option<RayHit> {
        let ray = to - from;
        if ray.length_squared() == 0.0 {
            return None;
        }
        let mut best: Option<RayHit> = None;
        for (_, (pose, collider)) in self.world.query::<(&Pose, &Collider)>().iter() {
            if !accept(collider.tag) {
                continue;
            }
            if distance_to_segment(pose.position, from, to) > collider.bound {
                continue;
            }
            for shape in &collider.shapes {
                let hit = cast_shape(shape, pose, from, ray);
                if let Some((fraction, normal)) = hit {
                    if best.map_or(true, |b| fraction < b.fraction) {
                        best = Some(RayHit {
                            point: from + ray * fraction,
                            normal,
                            fraction,
                            tag: collider.tag,
                        });
                    }
                }
            }
        }
        best
    }
}

impl Physics for HeadlessPhysics {
    fn create_body(&mut self, def: BodyDef) -> BodyHandle {
        let bound = def
            .shapes
            .iter()
            .map(Shape::bounding_radius)
            .fold(0.0, f32::max);
        let entity = self.world.spawn((
            Pose {
                position: def.position,
                angle: def.angle,
            },
            Motion {
                velocity: def.velocity,
                angular_velocity: 0.0,
                acceleration: Vec2::ZERO,
            },
            Collider {
                kind: def.kind,
                shapes: def.shapes,
                tag: def.tag,
                bound,
            },
        ));
        BodyHandle(entity)
    }

    fn destroy_body(&mut self, body: BodyHandle) -> bool {
        self.world.despawn(body.0).is_ok()
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        let pose = self.world.get::<&Pose>(body.0).ok()?;
        let motion = self.world.get::<&Motion>(body.0).ok()?;
        Some(BodyState {
            position: pose.position,
            angle: pose.angle,
            velocity: motion.velocity,
            angular_velocity: motion.angular_velocity,
        })
    }

    fn set_velocity(&mut self, body: BodyHandle, velocity: Vec2, angular_velocity: f32) {
        if let Ok(mut motion) = self.world.get::<&mut Motion>(body.0) {
            motion.velocity = velocity;
            motion.angular_velocity = angular_velocity;
        }
    }

    fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32) {
        if let Ok(mut pose) = self.world.get::<&mut Pose>(body.0) {
            pose.position = position;
            pose.angle = angle;
        }
    }

    fn apply_acceleration(&mut self, body: BodyHandle, acceleration: Vec2) {
        if let Ok(mut motion) = self.world.get::<&mut Motion>(body.0) {
            motion.acceleration += acceleration;
        }
    }

    fn step(&mut self, dt: f32) {
        for (_, (pose, motion, collider)) in self
            .world
            .query_mut::<(&mut Pose, &mut Motion, &Collider)>()
        {
            match collider.kind {
                BodyKind::Static => {}
                BodyKind::Kinematic => {
                    pose.position += motion.velocity * dt;
                    pose.angle += motion.angular_velocity * dt;
                }
                BodyKind::Dynamic => {
                    motion.velocity += motion.acceleration * dt;
                    pose.position += motion.velocity * dt;
                    pose.angle += motion.angular_velocity * dt;
                }
            }
            motion.acceleration = Vec2::ZERO;
        }
    }

    fn body_count(&self) -> usize {
        self.world.len() as usize
    }
}

fn to_world(pose: &Pose, local: Vec2) -> Vec2 {
    pose.position + rotate(local, pose.angle)
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let t = ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Nearest `(fraction, normal)` of the ray `from + t * ray` against one shape.
fn cast_shape(shape: &Shape, pose: &Pose, from: Vec2, ray: Vec2) -> Option<(f32, Vec2)> {
    match shape {
        Shape::Circle { center, radius } => {
            cast_circle(to_world(pose, *center), *radius, from, ray)
        }
        Shape::Polygon(points) | Shape::Chain(points) => {
            let closed = matches!(shape, Shape::Polygon(_));
            let world: Vec<Vec2> = points.iter().map(|p| to_world(pose, *p)).collect();
            let edge_count = if closed {
                world.len()
            } else {
                world.len().saturating_sub(1)
            };
            let mut best: Option<(f32, Vec2)> = None;
            for i in 0..edge_count {
                let a = world[i];
                let b = world[(i + 1) % world.len()];
                if let Some(hit) = cast_segment(a, b, from, ray) {
                    if best.map_or(true, |(f, _)| hit.0 < f) {
                        best = Some(hit);
                    }
                }
            }
            best
        }
    }
}

fn cast_segment(a: Vec2, b: Vec2, from: Vec2, ray: Vec2) -> Option<(f32, Vec2)> {
    let edge = b - a;
    let denom = cross(ray, edge);
    if denom.abs() < f32::EPSILON {
        return None;
    }
    let offset = a - from;
    let t = cross(offset, edge) / denom;
    let u = cross(offset, ray) / denom;
    if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    let mut normal = edge.perp().normalize_or_zero();
    if normal.dot(ray) > 0.0 {
        normal = -normal;
    }
    Some((t, normal))
}

fn cast_circle(center: Vec2, radius: f32, from: Vec2, ray: Vec2) -> Option<(f32, Vec2)> {
    let f = from - center;
    let a = ray.dot(ray);
    let b = 2.0 * f.dot(ray);
    let c = f.dot(f) - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 || c < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / (2.0 * a);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let point = from + ray * t;
    Some((t, (point - center).normalize_or_zero()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(physics: &mut HeadlessPhysics, x: f32, tag: BodyTag) -> BodyHandle {
        physics.create_body(BodyDef {
            kind: BodyKind::Static,
            position: Vec2::new(x, 0.0),
            angle: 0.0,
            velocity: Vec2::ZERO,
            shapes: vec![Shape::Chain(vec![Vec2::new(0.0, -1.0), Vec2::new(0.0, 1.0)])],
            tag,
        })
    }

    #[test]
    fn test_ray_hits_nearest_chain() {
        let mut physics = HeadlessPhysics::new();
        wall(&mut physics, 5.0, BodyTag::Ship);
        wall(&mut physics, 3.0, BodyTag::Ship);
        let hit = physics
            .cast_ray(Vec2::ZERO, Vec2::new(10.0, 0.0))
            .expect("Ray should hit a wall");
        assert!((hit.point.x - 3.0).abs() < 1e-5);
        assert!((hit.normal - Vec2::new(-1.0, 0.0)).length() < 1e-5, "Normal should face the origin");
        assert!((hit.fraction - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_ray_filter_skips_rejected_tags() {
        let mut physics = HeadlessPhysics::new();
        wall(&mut physics, 3.0, BodyTag::Ship);
        wall(&mut physics, 5.0, BodyTag::Tile { planet: PlanetId(2) });
        let hit = physics
            .cast_ray_filtered(Vec2::ZERO, Vec2::new(10.0, 0.0), &|tag| {
                tag.is_tile_of(PlanetId(2))
            })
            .expect("Ray should hit the tile");
        assert!((hit.point.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_hits_circle() {
        let mut physics = HeadlessPhysics::new();
        physics.create_body(BodyDef {
            kind: BodyKind::Dynamic,
            position: Vec2::new(0.0, 10.0),
            angle: 0.0,
            velocity: Vec2::ZERO,
            shapes: vec![Shape::Circle {
                center: Vec2::ZERO,
                radius: 2.0,
            }],
            tag: BodyTag::Ship,
        });
        let hit = physics.cast_ray(Vec2::ZERO, Vec2::new(0.0, 20.0)).unwrap();
        assert!((hit.point.y - 8.0).abs() < 1e-4);
        assert!((hit.normal - Vec2::new(0.0, -1.0)).length() < 1e-4);
    }

    #[test]
    fn test_step_integrates_dynamic_bodies() {
        let mut physics = HeadlessPhysics::new();
        let dynamic = physics.create_body(BodyDef {
            kind: BodyKind::Dynamic,
            position: Vec2::ZERO,
            angle: 0.0,
            velocity: Vec2::ZERO,
            shapes: Vec::new(),
            tag: BodyTag::Ship,
        });
        let fixed = wall(&mut physics, 0.0, BodyTag::Ship);
        physics.set_velocity(fixed, Vec2::new(1.0, 0.0), 0.0);
        physics.apply_acceleration(dynamic, Vec2::new(0.0, 2.0));
        physics.step(0.5);

        let d = physics.body_state(dynamic).unwrap();
        assert!((d.velocity.y - 1.0).abs() < 1e-6);
        assert!((d.position.y - 0.5).abs() < 1e-6);

        // Accelerations are consumed by the step.
        physics.step(0.5);
        let d = physics.body_state(dynamic).unwrap();
        assert!((d.velocity.y - 1.0).abs() < 1e-6);

        // Static walls ignore velocity.
        let w = physics.body_state(fixed).unwrap();
        assert_eq!(w.position.x, 0.0);
    }

    #[test]
    fn test_destroy_releases_body() {
        let mut physics = HeadlessPhysics::new();
        let body = wall(&mut physics, 1.0, BodyTag::Ship);
        assert_eq!(physics.body_count(), 1);
        assert!(physics.destroy_body(body));
        assert!(!physics.destroy_body(body));
        assert_eq!(physics.body_count(), 0);
        assert!(physics.cast_ray(Vec2::ZERO, Vec2::new(5.0, 0.0)).is_none());
    }
}
