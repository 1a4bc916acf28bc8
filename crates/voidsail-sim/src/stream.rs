//! WorldObjectStream: live/far streaming of world entities around the camera.
//!
//! Every tracked entity lives in one hecs arena slot holding either its live
//! or its far representation, so an entity can never be in both states or
//! in neither. State changes found while iterating are queued as transitions
//! and applied at the start of the next update, before the physics step.
//!
//! Update order:
//! 1. Apply queued transitions (bodies of removed live entities are destroyed here)
//! 2. Step physics once
//! 3. Recompute the far-end / far-begin thresholds from the camera
//! 4. Tick every entity once and queue demotions, promotions and removals

use std::collections::HashSet;

use glam::Vec2;
use hecs::{Entity, World};
use serde::Serialize;
use tracing::debug;

use voidsail_core::constants::{
    FAR_BEGIN_FACTOR, FAR_END_FACTOR, MAX_MOVE_SPEED, RADIUS_RECALC_PERIOD,
};
use voidsail_core::drawable::depth_of;
use voidsail_core::physics::Physics;

use crate::entities::{FarObject, FarShip, LiveObject, Ship, Streamed, TickContext};
use crate::error::SimError;

pub struct LiveEntry {
    pub object: LiveObject,
    /// Drawable radius, refreshed every `RADIUS_RECALC_PERIOD`.
    radius: f32,
}

pub struct FarEntry {
    pub object: FarObject,
    /// Seconds before the promotion test runs again.
    delay: f32,
    depth: f32,
}

/// Arena slot: exactly one representation per entity.
pub enum Tracked {
    Live(LiveEntry),
    Far(FarEntry),
}

impl Tracked {
    fn live(object: LiveObject) -> Self {
        let radius = object.radius();
        Tracked::Live(LiveEntry { object, radius })
    }

    fn far(object: FarObject) -> Self {
        let depth = object.depth();
        Tracked::Far(FarEntry {
            object,
            delay: 0.0,
            depth,
        })
    }

    fn representation(&self) -> Representation {
        match self {
            Tracked::Live(_) => Representation::Live,
            Tracked::Far(_) => Representation::Far,
        }
    }

    fn position(&self) -> Vec2 {
        match self {
            Tracked::Live(e) => e.object.position(),
            Tracked::Far(e) => e.object.position(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Live,
    Far,
}

impl Representation {
    fn label(self) -> &'static str {
        match self {
            Representation::Live => "live",
            Representation::Far => "far",
        }
    }
}

#[derive(Debug)]
enum Transition {
    Insert(LiveObject),
    Promote(Entity),
    Demote(Entity),
    Remove(Entity),
}

/// Cumulative conversion counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub promotions: u64,
    pub demotions: u64,
    pub removals: u64,
}

pub struct WorldObjectStream {
    world: World,
    transitions: Vec<Transition>,
    /// Entities with a transition already queued this tick.
    pending: HashSet<Entity>,
    far_end: f32,
    far_begin: f32,
    /// Seconds left before live radii are recalculated.
    recalc_await: f32,
    stats: StreamStats,
}

impl Default for WorldObjectStream {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldObjectStream {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            transitions: Vec::new(),
            pending: HashSet::new(),
            far_end: 0.0,
            far_begin: 0.0,
            recalc_await: 0.0,
            stats: StreamStats::default(),
        }
    }

    /// Track a live entity immediately. Only valid outside `update`.
    pub fn track_live_now(&mut self, object: LiveObject) -> Entity {
        self.world.spawn((Tracked::live(object),))
    }

    /// Track a far entity immediately. Only valid outside `update`.
    pub fn track_far_now(&mut self, object: FarObject) -> Entity {
        self.world.spawn((Tracked::far(object),))
    }

    /// Track a live entity at the start of the next update.
    pub fn track_live_delayed(&mut self, object: LiveObject) {
        self.transitions.push(Transition::Insert(object));
    }

    /// Remove an entity at the start of the next update.
    pub fn remove_delayed(&mut self, entity: Entity) -> Result<(), SimError> {
        if !self.world.contains(entity) {
            return Err(SimError::Untracked(entity));
        }
        queue(
            &mut self.pending,
            &mut self.transitions,
            entity,
            Transition::Remove(entity),
        )
    }

    /// Queue a far entity for promotion. Asking to promote a live entity is a bug.
    pub fn request_promotion(&mut self, entity: Entity) -> Result<(), SimError> {
        self.request(entity, Representation::Live)
    }

    /// Queue a live entity for demotion. Asking to demote a far entity is a bug.
    pub fn request_demotion(&mut self, entity: Entity) -> Result<(), SimError> {
        self.request(entity, Representation::Far)
    }

    fn request(&mut self, entity: Entity, target: Representation) -> Result<(), SimError> {
        let current = self
            .representation(entity)
            .ok_or(SimError::Untracked(entity))?;
        if current == target {
            return Err(SimError::DoubleConversion {
                entity,
                state: target.label(),
            });
        }
        let transition = match target {
            Representation::Live => Transition::Promote(entity),
            Representation::Far => Transition::Demote(entity),
        };
        queue(&mut self.pending, &mut self.transitions, entity, transition)
    }

    /// Run one streaming step. See the module docs for the order of work.
    pub fn update(
        &mut self,
        ctx: &TickContext<'_>,
        physics: &mut dyn Physics,
    ) -> Result<(), SimError> {
        self.apply_transitions(ctx, physics)?;
        physics.step(ctx.dt);

        let camera = ctx.camera.position;
        self.far_end = FAR_END_FACTOR * ctx.camera.view_distance;
        self.far_begin = FAR_BEGIN_FACTOR * self.far_end;

        let recalc = if self.recalc_await > 0.0 {
            self.recalc_await -= ctx.dt;
            false
        } else {
            self.recalc_await = RADIUS_RECALC_PERIOD;
            true
        };
        let slack = MAX_MOVE_SPEED * (RADIUS_RECALC_PERIOD - self.recalc_await);

        for (entity, tracked) in self.world.query_mut::<&mut Tracked>() {
            match tracked {
                Tracked::Live(entry) => {
                    entry.object.update(ctx, physics);
                    if entry.object.is_removable() {
                        queue(
                            &mut self.pending,
                            &mut self.transitions,
                            entity,
                            Transition::Remove(entity),
                        )?;
                        continue;
                    }
                    let presence = (entry.radius + slack) * depth_of(entry.object.drawables());
                    let dist = entry.object.position().distance(camera) - presence;
                    if dist > self.far_begin {
                        queue(
                            &mut self.pending,
                            &mut self.transitions,
                            entity,
                            Transition::Demote(entity),
                        )?;
                        continue;
                    }
                    if recalc {
                        entry.radius = entry.object.radius();
                    }
                }
                Tracked::Far(entry) => {
                    entry.object.update(ctx, physics);
                    if entry.object.is_removable() {
                        queue(
                            &mut self.pending,
                            &mut self.transitions,
                            entity,
                            Transition::Remove(entity),
                        )?;
                        continue;
                    }
                    if entry.delay > 0.0 {
                        entry.delay -= ctx.dt;
                        continue;
                    }
                    let r = entry.object.radius() * entry.depth;
                    let dist = entry.object.position().distance(camera) - r;
                    if dist < self.far_end {
                        queue(
                            &mut self.pending,
                            &mut self.transitions,
                            entity,
                            Transition::Promote(entity),
                        )?;
                    } else {
                        entry.delay = (dist - self.far_end) / (2.0 * MAX_MOVE_SPEED);
                    }
                }
            }
        }
        Ok(())
    }

    fn apply_transitions(
        &mut self,
        ctx: &TickContext<'_>,
        physics: &mut dyn Physics,
    ) -> Result<(), SimError> {
        self.pending.clear();
        for transition in std::mem::take(&mut self.transitions) {
            match transition {
                Transition::Insert(object) => {
                    self.world.spawn((Tracked::live(object),));
                }
                Transition::Promote(entity) => {
                    let mut tracked = self
                        .world
                        .get::<&mut Tracked>(entity)
                        .map_err(|_| SimError::Untracked(entity))?;
                    let live = match &*tracked {
                        Tracked::Far(entry) => entry.object.to_alternate(ctx, physics),
                        Tracked::Live(_) => {
                            return Err(SimError::DoubleConversion {
                                entity,
                                state: "live",
                            })
                        }
                    };
                    debug!(?entity, kind = ?live.kind(), "promoted to live");
                    *tracked = Tracked::live(live);
                    self.stats.promotions += 1;
                }
                Transition::Demote(entity) => {
                    let mut tracked = self
                        .world
                        .get::<&mut Tracked>(entity)
                        .map_err(|_| SimError::Untracked(entity))?;
                    let far = match &mut *tracked {
                        Tracked::Live(entry) => {
                            let far = entry.object.to_alternate(ctx, physics);
                            entry.object.on_remove(physics);
                            far
                        }
                        Tracked::Far(_) => {
                            return Err(SimError::DoubleConversion {
                                entity,
                                state: "far",
                            })
                        }
                    };
                    debug!(?entity, kind = ?far.kind(), "demoted to far");
                    *tracked = Tracked::far(far);
                    self.stats.demotions += 1;
                }
                Transition::Remove(entity) => {
                    let tracked = self
                        .world
                        .remove_one::<Tracked>(entity)
                        .map_err(|_| SimError::Untracked(entity))?;
                    self.world
                        .despawn(entity)
                        .map_err(|_| SimError::Untracked(entity))?;
                    if let Tracked::Live(mut entry) = tracked {
                        entry.object.on_remove(physics);
                    }
                    self.stats.removals += 1;
                }
            }
        }
        Ok(())
    }

    /// Make every far entity re-test its distance on the next update.
    pub fn reset_delays(&mut self) {
        for (_entity, tracked) in self.world.query_mut::<&mut Tracked>() {
            if let Tracked::Far(entry) = tracked {
                entry.delay = 0.0;
            }
        }
    }

    pub fn representation(&self, entity: Entity) -> Option<Representation> {
        self.world
            .get::<&Tracked>(entity)
            .ok()
            .map(|t| t.representation())
    }

    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        self.world.get::<&Tracked>(entity).ok().map(|t| t.position())
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.contains(entity)
    }

    pub fn live_count(&self) -> usize {
        self.count(Representation::Live)
    }

    pub fn far_count(&self) -> usize {
        self.count(Representation::Far)
    }

    fn count(&self, which: Representation) -> usize {
        self.world
            .query::<&Tracked>()
            .iter()
            .filter(|(_, t)| t.representation() == which)
            .count()
    }

    /// Transitions waiting for the next update.
    pub fn queued_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn far_end_dist(&self) -> f32 {
        self.far_end
    }

    pub fn far_begin_dist(&self) -> f32 {
        self.far_begin
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    pub fn for_each_live_ship(&mut self, mut f: impl FnMut(Entity, &mut Ship)) {
        for (entity, tracked) in self.world.query_mut::<&mut Tracked>() {
            if let Tracked::Live(LiveEntry {
                object: LiveObject::Ship(ship),
                ..
            }) = tracked
            {
                f(entity, ship);
            }
        }
    }

    pub fn for_each_far_ship(&self, mut f: impl FnMut(Entity, &FarShip)) {
        for (entity, tracked) in self.world.query::<&Tracked>().iter() {
            if let Tracked::Far(FarEntry {
                object: FarObject::Ship(ship),
                ..
            }) = tracked
            {
                f(entity, ship);
            }
        }
    }

    /// Body-less snapshot of every ship, live ones included.
    pub fn ship_snapshots(&self) -> Vec<FarShip> {
        let mut ships = Vec::new();
        for (_entity, tracked) in self.world.query::<&Tracked>().iter() {
            match tracked {
                Tracked::Live(LiveEntry {
                    object: LiveObject::Ship(ship),
                    ..
                }) => ships.push(ship.to_far()),
                Tracked::Far(FarEntry {
                    object: FarObject::Ship(ship),
                    ..
                }) => ships.push(ship.clone()),
                _ => {}
            }
        }
        ships
    }
}

fn queue(
    pending: &mut HashSet<Entity>,
    transitions: &mut Vec<Transition>,
    entity: Entity,
    transition: Transition,
) -> Result<(), SimError> {
    if !pending.insert(entity) {
        return Err(SimError::DoubleConversion {
            entity,
            state: "pending",
        });
    }
    transitions.push(transition);
    Ok(())
}
