//! Simulation engine: owns the galaxy, the physics backend and the object
//! stream, and runs one fixed step per `tick`.
//!
//! Completely headless. A fatal error during a tick is recorded as a
//! `FatalReport` and the engine refuses further ticks.

use std::error::Error as _;

use glam::Vec2;
use hecs::Entity;
use serde::Serialize;
use tracing::{debug, error, info};

use voidsail_core::bodies::Galaxy;
use voidsail_core::config::{ConfigRegistry, MissingResourcePolicy};
use voidsail_core::constants::DT;
use voidsail_core::physics::{HeadlessPhysics, Physics};
use voidsail_core::random::SeededRandom;
use voidsail_core::types::{Camera, SimTime};
use voidsail_procgen::galaxy::GalaxyBuilder;

use crate::entities::{FarObject, FarShip, TickContext};
use crate::error::SimError;
use crate::planet_objects::ExpansionMode;
use crate::save::WorldSave;
use crate::stream::WorldObjectStream;
use crate::systems;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// World seed. Same seed and tick count give the same world.
    pub seed: u64,
    pub system_count: usize,
    /// Half-extent of the camera's view; streaming distances scale with it.
    pub view_distance: f32,
    pub missing_resource: MissingResourcePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            system_count: 2,
            view_distance: 20.0,
            missing_resource: MissingResourcePolicy::Warn,
        }
    }
}

/// Diagnostic captured when a tick fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FatalReport {
    pub tick: u64,
    pub message: String,
    /// Underlying causes, outermost first.
    pub causes: Vec<String>,
}

impl FatalReport {
    fn from_error(tick: u64, err: &SimError) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            tick,
            message: err.to_string(),
            causes,
        }
    }
}

pub struct SimulationEngine {
    registry: ConfigRegistry,
    galaxy: Galaxy,
    physics: Box<dyn Physics>,
    stream: WorldObjectStream,
    camera: Camera,
    cosmetic: SeededRandom,
    policy: MissingResourcePolicy,
    system_count: usize,
    time: SimTime,
    fatal: Option<FatalReport>,
    recovered_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Generate a fresh galaxy and place the camera just above the first planet.
    pub fn new_game(config: SimConfig, registry: ConfigRegistry) -> Result<Self, SimError> {
        Self::with_physics(config, registry, Box::new(HeadlessPhysics::new()))
    }

    pub fn with_physics(
        config: SimConfig,
        registry: ConfigRegistry,
        physics: Box<dyn Physics>,
    ) -> Result<Self, SimError> {
        let mut rng = SeededRandom::new(config.seed);
        let galaxy = GalaxyBuilder::new(&registry, &mut rng).build(config.system_count)?;
        let start = galaxy
            .planets
            .first()
            .map_or(Vec2::ZERO, |p| p.position + Vec2::new(0.0, p.full_height()));
        info!(
            seed = config.seed,
            systems = galaxy.systems.len(),
            planets = galaxy.planets.len(),
            "new game"
        );
        Ok(Self {
            cosmetic: SeededRandom::cosmetic(config.seed),
            registry,
            galaxy,
            physics,
            stream: WorldObjectStream::new(),
            camera: Camera::new(start, config.view_distance),
            policy: config.missing_resource,
            system_count: config.system_count,
            time: SimTime::default(),
            fatal: None,
            recovered_buffer: Vec::new(),
        })
    }

    /// Rebuild a world from a save.
    ///
    /// Planets that were expanded get their terrain back without their
    /// ships; the saved ships are tracked far and stream in as usual.
    pub fn resume(
        save: &WorldSave,
        registry: ConfigRegistry,
        config: SimConfig,
    ) -> Result<Self, SimError> {
        Self::resume_with_physics(save, registry, config, Box::new(HeadlessPhysics::new()))
    }

    pub fn resume_with_physics(
        save: &WorldSave,
        registry: ConfigRegistry,
        config: SimConfig,
        physics: Box<dyn Physics>,
    ) -> Result<Self, SimError> {
        let (galaxy, expanded) = save.restore_galaxy(&registry)?;
        let ships = save.restore_ships(&registry)?;
        let mut engine = Self {
            cosmetic: SeededRandom::cosmetic(save.seed),
            registry,
            galaxy,
            physics,
            stream: WorldObjectStream::new(),
            camera: save.camera,
            policy: config.missing_resource,
            system_count: save.system_count,
            time: SimTime::default(),
            fatal: None,
            recovered_buffer: Vec::new(),
        };
        engine.time.tick = save.tick;
        engine.time.elapsed_secs = save.tick as f64 * DT as f64;

        for id in expanded {
            systems::planets::expand_planet(
                &mut engine.galaxy,
                id,
                engine.physics.as_mut(),
                &mut engine.stream,
                &mut engine.cosmetic,
                engine.policy,
                ExpansionMode::TerrainOnly,
            )?;
        }
        for ship in ships {
            engine.stream.track_far_now(FarObject::Ship(ship));
        }
        info!(
            tick = save.tick,
            ships = save.ships.len(),
            "resumed from save"
        );
        Ok(engine)
    }

    /// Advance one fixed step.
    ///
    /// Once a tick has failed every later call returns `SimError::Halted`.
    pub fn tick(&mut self) -> Result<(), SimError> {
        if self.fatal.is_some() {
            return Err(SimError::Halted);
        }
        match self.run_systems() {
            Ok(()) => {
                self.time.advance();
                Ok(())
            }
            Err(err) => {
                let report = FatalReport::from_error(self.time.tick, &err);
                error!(
                    tick = report.tick,
                    message = %report.message,
                    causes = ?report.causes,
                    "simulation halted"
                );
                self.fatal = Some(report);
                Err(err)
            }
        }
    }

    fn run_systems(&mut self) -> Result<(), SimError> {
        self.galaxy.advance(DT);

        let expanded = systems::planets::run(
            &mut self.galaxy,
            &self.camera,
            self.physics.as_mut(),
            &mut self.stream,
            &mut self.cosmetic,
            self.policy,
        )?;
        if expanded > 0 {
            debug!(tick = self.time.tick, expanded, "planets expanded");
        }

        systems::gravity::run(
            &self.galaxy,
            &self.camera,
            self.physics.as_mut(),
            &mut self.stream,
            &mut self.recovered_buffer,
        );
        if !self.recovered_buffer.is_empty() {
            debug!(
                tick = self.time.tick,
                count = self.recovered_buffer.len(),
                "ships pulled out of the ground"
            );
        }

        let ctx = TickContext {
            galaxy: &self.galaxy,
            camera: &self.camera,
            dt: DT,
        };
        self.stream.update(&ctx, self.physics.as_mut())
    }

    pub fn galaxy(&self) -> &Galaxy {
        &self.galaxy
    }

    pub fn stream(&self) -> &WorldObjectStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut WorldObjectStream {
        &mut self.stream
    }

    pub fn physics(&self) -> &dyn Physics {
        self.physics.as_ref()
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    /// Report of the error that halted the engine, if any.
    pub fn fatal_report(&self) -> Option<&FatalReport> {
        self.fatal.as_ref()
    }

    /// Ships pulled out of the ground during the last tick.
    pub fn recovered_ships(&self) -> &[Entity] {
        &self.recovered_buffer
    }

    /// Move the camera smoothly; far delays keep counting down.
    pub fn set_camera_position(&mut self, position: Vec2) {
        self.camera.position = position;
    }

    /// Jump the camera. Far delays computed for the old position are dropped.
    pub fn teleport_camera(&mut self, position: Vec2) {
        self.camera.position = position;
        self.stream.reset_delays();
    }

    pub fn set_view_distance(&mut self, view_distance: f32) {
        self.camera.view_distance = view_distance;
    }

    pub fn add_far_ship(&mut self, ship: FarShip) -> Entity {
        self.stream.track_far_now(FarObject::Ship(ship))
    }

    pub fn to_save(&self) -> WorldSave {
        WorldSave::capture(
            &self.galaxy,
            self.system_count,
            self.time.tick,
            self.camera,
            &self.stream.ship_snapshots(),
        )
    }
}
