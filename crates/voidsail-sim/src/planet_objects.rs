//! PlanetObjectsBuilder: everything that appears when a planet is approached.
//!
//! Runs once per planet, synchronously inside the tick that triggers it, and
//! always in the same order: ground tiles, clouds, decoration packs, sky,
//! then ships. Layout draws from the planet's own random stream so the
//! result depends only on the world seed and the planet id; art variants
//! draw from the shared cosmetic stream.

use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::sync::Arc;

use glam::Vec2;
use tracing::info;

use voidsail_core::bodies::Planet;
use voidsail_core::config::{DecoConfig, HullConfig, MissingResourcePolicy, ShipConfig};
use voidsail_core::constants::{
    ATM_HEIGHT, AVG_CLOUD_LINEAR_WIDTH, CLOUD_DENSITY, DECO_PACK_ANGULAR_WIDTH, DECO_PACK_SIZE,
    DECO_PLACE_TRIES, HIGH_ORBIT_BAND, LANDING_PLACE_COUNT, LOW_ORBIT_BAND, MAX_CLOUD_LINEAR_SPEED,
    MAX_CLOUD_PIECE_COUNT, MAX_CLOUD_PIECE_DIST_SHIFT, MAX_CLOUD_PIECE_ROT_SPEED,
    MAX_CLOUD_PIECE_SIZE, MAX_CLOUD_PIECE_TILT, TOP_TILE_SIZE,
};
use voidsail_core::drawable::{Drawable, DrawableLevel};
use voidsail_core::error::GenerationError;
use voidsail_core::geometry::{
    angle_of, angular_width_of_sphere, arc_to_angle, from_angle, norm_angle, rotate, window_index,
};
use voidsail_core::physics::{Physics, RayCast};
use voidsail_core::random::SeededRandom;
use voidsail_core::types::TextureId;
use voidsail_procgen::{find_flat_place, ConsumedAngles};
use voidsail_terrain::{GroundBuilder, TilePools};

use crate::entities::ship::is_usable_hull;
use crate::entities::{
    Anchor, FarObject, FarPlanetSprites, FarShip, FarTile, LiveObject, Pilot, Sky, TileObject,
};
use crate::error::SimError;
use crate::stream::WorldObjectStream;

/// How much of a planet to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionMode {
    /// Terrain, scenery and population.
    Full,
    /// Terrain and scenery only; ships already exist elsewhere (resumed games).
    TerrainOnly,
}

/// Row layout of a planet's ground: outermost row first.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundRings {
    pub columns: usize,
    /// Center radius of each row.
    pub radii: Vec<f32>,
    /// Tile size of each row.
    pub sizes: Vec<f32>,
}

impl GroundRings {
    pub fn new(planet: &Planet) -> Result<Self, GenerationError> {
        let max_r = planet.ground_height - TOP_TILE_SIZE / 2.0;
        let columns = (TAU * max_r / TOP_TILE_SIZE).max(0.0) as usize;
        if columns == 0 {
            return Err(GenerationError::NoGroundColumns {
                planet: planet.id.0,
                ground_height: planet.ground_height,
            });
        }
        let rows = planet.config.row_count;
        let mut radii = Vec::with_capacity(rows);
        let mut sizes = Vec::with_capacity(rows);
        let mut r = max_r;
        for _ in 0..rows {
            let size = TAU * r / columns as f32;
            radii.push(r);
            sizes.push(size);
            r -= size;
        }
        Ok(Self {
            columns,
            radii,
            sizes,
        })
    }

    /// Inner edge of the innermost row.
    pub fn min_radius(&self) -> Option<f32> {
        Some(self.radii.last()? - self.sizes.last()? / 2.0)
    }
}

#[derive(Debug, Default)]
struct Counts {
    tiles: usize,
    bodies: usize,
    clouds: usize,
    deco_packs: usize,
    ships: usize,
}

pub struct PlanetObjectsBuilder<'a> {
    physics: &'a mut dyn Physics,
    stream: &'a mut WorldObjectStream,
    rng: SeededRandom,
    cosmetic: &'a mut SeededRandom,
    policy: MissingResourcePolicy,
    counts: Counts,
    landing_places: Vec<Vec2>,
}

impl<'a> PlanetObjectsBuilder<'a> {
    /// `rng` should be the planet's own stream, see `SeededRandom::for_planet`.
    pub fn new(
        physics: &'a mut dyn Physics,
        stream: &'a mut WorldObjectStream,
        rng: SeededRandom,
        cosmetic: &'a mut SeededRandom,
        policy: MissingResourcePolicy,
    ) -> Self {
        Self {
            physics,
            stream,
            rng,
            cosmetic,
            policy,
            counts: Counts::default(),
            landing_places: Vec::new(),
        }
    }

    /// Build and track the planet's objects. Returns the actual minimum ground radius.
    pub fn create_planet_objs(
        &mut self,
        planet: &Planet,
        mode: ExpansionMode,
    ) -> Result<f32, SimError> {
        let min_radius = self.create_ground(planet)?;
        self.create_clouds(planet);
        self.create_deco(planet);
        if let Some(sky) = &planet.config.sky {
            self.stream
                .track_live_delayed(LiveObject::Sky(Sky::new(planet, sky.clone())));
        }
        // Searched before ships draw from the stream so both modes agree.
        self.landing_places = (0..LANDING_PLACE_COUNT)
            .map(|_| find_flat_place(&*self.physics, planet, None, 0.0, &mut self.rng))
            .collect();
        if mode == ExpansionMode::Full {
            self.create_ships(planet)?;
        }
        info!(
            planet = %planet.name,
            ?mode,
            tiles = self.counts.tiles,
            bodies = self.counts.bodies,
            clouds = self.counts.clouds,
            deco_packs = self.counts.deco_packs,
            ships = self.counts.ships,
            min_radius,
            "planet expanded"
        );
        Ok(min_radius)
    }

    /// Flat landing spots in the planet's rotating frame, found during `create_planet_objs`.
    pub fn take_landing_places(&mut self) -> Vec<Vec2> {
        std::mem::take(&mut self.landing_places)
    }

    fn create_ground(&mut self, planet: &Planet) -> Result<f32, SimError> {
        let rings = GroundRings::new(planet)?;
        let Some(min_radius) = rings.min_radius() else {
            return Ok(planet.ground_height);
        };
        let pools = TilePools::build(&planet.config.tiles, self.policy)?;
        let map = GroundBuilder::new(
            &pools,
            rings.columns,
            rings.radii.len(),
            planet.config.smooth_landscape,
        )
        .build(&mut self.rng);

        for (row, (&dist, &size)) in rings.radii.iter().zip(&rings.sizes).enumerate() {
            for col in 0..rings.columns {
                let Some(tile) = map.get(col, row) else {
                    continue;
                };
                let rel_angle = TAU * col as f32 / rings.columns as f32;
                let anchor = Anchor::new(planet.id, rel_angle, dist);
                let texture = tile.pick_texture(self.cosmetic);
                if tile.has_body() {
                    let object =
                        TileObject::spawn(self.physics, planet, anchor, size, tile.clone(), texture);
                    self.stream.track_live_now(LiveObject::Tile(object));
                    self.counts.bodies += 1;
                } else {
                    self.stream.track_far_now(FarObject::Tile(FarTile {
                        anchor,
                        size,
                        tile: tile.clone(),
                        texture,
                        position: anchor.position(planet),
                    }));
                }
                self.counts.tiles += 1;
            }
        }
        Ok(min_radius)
    }

    fn create_clouds(&mut self, planet: &Planet) {
        let textures = &planet.config.cloud_textures;
        if textures.is_empty() {
            return;
        }
        let max = (CLOUD_DENSITY * ATM_HEIGHT * planet.ground_height) as usize;
        let count = self.rng.int_from_fraction(0.7, max);
        for _ in 0..count {
            let cloud = self.create_cloud(planet, textures);
            self.stream.track_far_now(FarObject::Sprites(cloud));
            self.counts.clouds += 1;
        }
    }

    fn create_cloud(&mut self, planet: &Planet, textures: &[TextureId]) -> FarPlanetSprites {
        let dist_perc = self.rng.float_in(0.0, 1.0);
        let dist = planet.ground_height - TOP_TILE_SIZE + 0.9 * ATM_HEIGHT * dist_perc;
        let angle = self.rng.angle();

        let size_perc = self.rng.float_in(0.2, 1.0);
        let linear_width = size_perc * (dist_perc + 0.5) * AVG_CLOUD_LINEAR_WIDTH;
        let max_angle_shift = arc_to_angle(linear_width, dist);
        let max_dist_shift = (1.0 - dist_perc) * MAX_CLOUD_PIECE_DIST_SHIFT;

        let piece_count = (size_perc * MAX_CLOUD_PIECE_COUNT as f32) as usize;
        let pieces = (0..piece_count)
            .filter_map(|_| self.cloud_piece(textures, max_angle_shift, max_dist_shift, dist))
            .collect();
        let rot_speed = self.rng.float_in(0.1, 1.0) * arc_to_angle(MAX_CLOUD_LINEAR_SPEED, dist);
        FarPlanetSprites::new(planet, Anchor::new(planet.id, angle, dist), rot_speed, pieces)
    }

    fn cloud_piece(
        &mut self,
        textures: &[TextureId],
        max_angle_shift: f32,
        max_dist_shift: f32,
        base_dist: f32,
    ) -> Option<Drawable> {
        let texture = self.cosmetic.pick(textures).copied();
        let flipped = self.cosmetic.test(0.5);

        let angle_shift_rel = self.rng.symmetric(1.0);
        let dist_perc = 1.0 - angle_shift_rel.abs();
        let size = 0.5 * (1.0 + dist_perc) * MAX_CLOUD_PIECE_SIZE;
        let rel_angle = self.rng.symmetric(MAX_CLOUD_PIECE_TILT);
        let rot_speed = self.rng.symmetric(MAX_CLOUD_PIECE_ROT_SPEED);
        let dist_shift = if max_dist_shift == 0.0 {
            0.0
        } else {
            dist_perc * self.rng.float_in(0.0, max_dist_shift)
        };

        // Group frame: y points at the planet center, which sits at (0, base_dist).
        let dist = base_dist + dist_shift;
        let shift = angle_shift_rel * max_angle_shift;
        let rel_pos = rotate(Vec2::new(0.0, -dist), shift) + Vec2::new(0.0, base_dist);

        let mut piece = Drawable::new(texture?, size, rel_pos, DrawableLevel::Clouds);
        piece.rel_angle = rel_angle;
        piece.rot_speed = rot_speed;
        piece.flipped = flipped;
        Some(piece)
    }

    fn create_deco(&mut self, planet: &Planet) {
        let mut packs: BTreeMap<(i32, i32), Vec<Drawable>> = BTreeMap::new();
        for deco in &planet.config.decos {
            self.add_deco(planet, deco, &mut packs);
        }
        for ((angle_index, dist_index), drawables) in packs {
            let base_angle = (angle_index as f32 + 0.5) * DECO_PACK_ANGULAR_WIDTH;
            let base_dist = (dist_index as f32 + 0.5) * DECO_PACK_SIZE;
            let anchor = Anchor::new(planet.id, base_angle, base_dist);
            let pack = FarPlanetSprites::new(planet, anchor, 0.0, drawables);
            self.stream.track_far_now(FarObject::Sprites(pack));
            self.counts.deco_packs += 1;
        }
    }

    fn add_deco(
        &mut self,
        planet: &Planet,
        deco: &DecoConfig,
        packs: &mut BTreeMap<(i32, i32), Vec<Drawable>>,
    ) {
        let gh = planet.ground_height;
        let mut consumed = ConsumedAngles::new();
        let count = (TAU * gh * deco.density) as usize;

        for _ in 0..count {
            let size = self.rng.float_in(deco.min_size, deco.max_size);
            let half_width = angular_width_of_sphere(size / 2.0, gh);

            let mut angle = 0.0;
            for _ in 0..DECO_PLACE_TRIES {
                angle = self.rng.angle();
                if !consumed.is_consumed(angle, half_width) {
                    consumed.add(angle, half_width);
                    break;
                }
            }

            let world_angle = planet.angle + angle;
            let start = planet.position + from_angle(world_angle, gh);
            let id = planet.id;
            let surface = self
                .physics
                .cast_ray_filtered(start, planet.position, &|tag| tag.is_tile_of(id))
                .map_or(start, |hit| hit.point);
            let dist = surface.distance(planet.position);

            let angle_index = window_index(norm_angle(angle), DECO_PACK_ANGULAR_WIDTH);
            let dist_index = window_index(dist, DECO_PACK_SIZE);
            let base_angle = (angle_index as f32 + 0.5) * DECO_PACK_ANGULAR_WIDTH;
            let base_dist = (dist_index as f32 + 0.5) * DECO_PACK_SIZE;
            let base_pos = planet.position + from_angle(planet.angle + base_angle, base_dist);
            let frame = planet.angle + base_angle + FRAC_PI_2;
            let rel_pos = rotate(surface - base_pos, -frame);

            let texture = self.cosmetic.pick(&deco.textures).copied();
            let flipped = deco.allow_flip && self.cosmetic.test(0.5);
            let Some(texture) = texture else {
                continue;
            };
            let mut drawable = Drawable::new(texture, size, rel_pos, DrawableLevel::Deco);
            drawable.rel_angle = norm_angle(angle) - base_angle;
            drawable.flipped = flipped;
            packs
                .entry((angle_index, dist_index))
                .or_default()
                .push(drawable);
        }
    }

    fn create_ships(&mut self, planet: &Planet) -> Result<(), SimError> {
        let mut taken = ConsumedAngles::new();
        let config = &planet.config;

        if let Some(station) = &config.station {
            let hull = self.checked_hull(&station.hull)?;
            let ship = self.ground_ship(planet, hull, station.money, &mut taken);
            self.track_ship(ship);
        }

        for enemy in &config.ground_enemies {
            let count = (enemy.density * planet.ground_height) as usize;
            if count == 0 {
                continue;
            }
            let hull = self.checked_hull(&enemy.hull)?;
            for _ in 0..count {
                let ship = self.ground_ship(planet, hull.clone(), enemy.money, &mut taken);
                self.track_ship(ship);
            }
        }

        self.orbit_enemies(planet, LOW_ORBIT_BAND, &config.low_orbit_enemies)?;
        self.orbit_enemies(planet, HIGH_ORBIT_BAND, &config.high_orbit_enemies)?;
        Ok(())
    }

    fn track_ship(&mut self, ship: FarShip) {
        self.stream.track_far_now(FarObject::Ship(ship));
        self.counts.ships += 1;
    }

    fn checked_hull(&self, hull: &HullConfig) -> Result<Arc<HullConfig>, SimError> {
        let usable = hull.outline.as_deref().is_some_and(is_usable_hull);
        if !usable {
            self.policy
                .handle(format!("hull {} has no usable outline", hull.name))?;
        }
        Ok(Arc::new(hull.clone()))
    }

    /// A ship parked on the surface, guarding its spot.
    fn ground_ship(
        &mut self,
        planet: &Planet,
        hull: Arc<HullConfig>,
        money: u32,
        taken: &mut ConsumedAngles,
    ) -> FarShip {
        let mut local = find_flat_place(
            &*self.physics,
            planet,
            Some(taken),
            hull.approx_radius,
            &mut self.rng,
        );
        let height = local.length();
        let above_ground = if hull.is_station() {
            hull.size * 0.75
        } else {
            hull.size
        };
        if height > 0.0 {
            local *= (height + above_ground) / height;
        }

        let position = planet.local_to_world(local);
        let mut angle = angle_of(planet.position - position) - PI;
        if hull.is_station() {
            angle += FRAC_PI_2;
        }
        let mut ship = FarShip::new(
            hull,
            Pilot::StillGuard {
                planet: Some(planet.id),
                anchor: local,
            },
            position,
            money,
        );
        ship.angle = angle;
        ship.velocity = planet.frame_velocity_at(position);
        ship
    }

    /// Orbiters spread evenly through the atmosphere band `(offset, width)`.
    fn orbit_enemies(
        &mut self,
        planet: &Planet,
        (offset, width): (f32, f32),
        configs: &[ShipConfig],
    ) -> Result<(), SimError> {
        let gh = planet.ground_height;
        let counts: Vec<usize> = configs
            .iter()
            .map(|c| (width * c.density * gh * ATM_HEIGHT) as usize)
            .collect();
        let total: usize = counts.iter().sum();
        if total == 0 {
            return Ok(());
        }
        let step = width / total as f32;
        let mut height_perc = offset;

        for (config, &count) in configs.iter().zip(&counts) {
            if count == 0 {
                continue;
            }
            let hull = self.checked_hull(&config.hull)?;
            for _ in 0..count {
                let height = gh + height_perc * ATM_HEIGHT;
                let phase = self.rng.angle();
                let clockwise = self.rng.test(0.5);
                let pilot = Pilot::Orbiter {
                    planet: planet.id,
                    height,
                    clockwise,
                    phase,
                };
                let position = planet.position + from_angle(phase, height);
                let mut ship = FarShip::new(hull.clone(), pilot, position, config.money);
                ship.velocity = ship.pilot.target_around(planet).1;
                self.track_ship(ship);
                height_perc += step;
            }
        }
        Ok(())
    }
}
