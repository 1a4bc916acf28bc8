//! Tests for galaxy bodies, the content catalog and drawables.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::Vec2;

use crate::bodies::{Galaxy, Planet, StarSystem};
use crate::catalog::builtin_registry;
use crate::constants::{ATM_HEIGHT, MAX_SKY_HEIGHT};
use crate::drawable::{depth_of, radius_of, Drawable, DrawableLevel};
use crate::random::SeededRandom;
use crate::types::{PlanetId, PlanetTier, SurfaceDirection, SystemId, TextureId};

fn test_planet(ground_height: f32) -> Planet {
    let registry = builtin_registry();
    let config = registry
        .pick_planet(&mut SeededRandom::new(1), PlanetTier::Easy)
        .unwrap();
    Planet::new(
        PlanetId(0),
        SystemId(0),
        "Test".into(),
        config,
        100.0,
        0.0,
        0.0,
        0.01,
        0.02,
        ground_height,
        400.0,
    )
}

// ---- Planets ----

#[test]
fn test_planet_position_follows_orbit() {
    let mut planet = test_planet(20.0);
    planet.update_position(Vec2::new(10.0, 0.0));
    assert!((planet.position - Vec2::new(110.0, 0.0)).length() < 1e-4);

    planet.angle_to_system = FRAC_PI_2;
    planet.update_position(Vec2::ZERO);
    assert!((planet.position - Vec2::new(0.0, 100.0)).length() < 1e-3);
    assert!(
        (planet.velocity - Vec2::new(-1.0, 0.0)).length() < 1e-4,
        "Orbital velocity should be tangential, got {:?}",
        planet.velocity
    );
}

#[test]
fn test_planet_advance_moves_angles() {
    let mut planet = test_planet(20.0);
    planet.advance(10.0, Vec2::ZERO);
    assert!((planet.angle_to_system - 0.1).abs() < 1e-6);
    assert!((planet.angle - 0.2).abs() < 1e-6);
}

#[test]
fn test_local_world_round_trip() {
    let mut planet = test_planet(20.0);
    planet.angle = 0.7;
    planet.update_position(Vec2::new(-30.0, 5.0));
    let local = Vec2::new(3.0, -4.0);
    let back = planet.world_to_local(planet.local_to_world(local));
    assert!((back - local).length() < 1e-4);
}

#[test]
fn test_objects_created_is_one_way() {
    let mut planet = test_planet(20.0);
    assert!(!planet.objects_created());
    assert!(planet.mark_objects_created(17.5));
    assert!(planet.objects_created());
    assert!(!planet.mark_objects_created(3.0), "Flag must flip exactly once");
    assert_eq!(planet.min_ground_height(), 17.5);
}

#[test]
fn test_planet_heights() {
    let mut planet = test_planet(20.0);
    planet.update_position(Vec2::ZERO);
    assert_eq!(planet.full_height(), 20.0 + ATM_HEIGHT);
    let edge = planet.position + Vec2::new(20.0 + MAX_SKY_HEIGHT - 0.5, 0.0);
    assert!(planet.is_near(edge));
    assert!(!planet.is_near(edge + Vec2::new(1.0, 0.0)));
}

#[test]
fn test_nearest_queries() {
    let registry = builtin_registry();
    let config = registry.pick_system(&mut SeededRandom::new(1), false).unwrap();
    let mut galaxy = Galaxy::default();
    for (i, x) in [0.0, 500.0].iter().enumerate() {
        galaxy.systems.push(StarSystem {
            id: SystemId(i as u32),
            name: format!("S{i}"),
            position: Vec2::new(*x, 0.0),
            radius: 100.0,
            config: Arc::clone(&config),
            hard: i > 0,
            planets: Vec::new(),
            belts: Vec::new(),
        });
    }
    let nearest = galaxy.nearest_system(Vec2::new(400.0, 10.0)).unwrap();
    assert_eq!(nearest.id, SystemId(1));
    assert!(galaxy.nearest_planet(Vec2::ZERO).is_none());
}

// ---- Catalog ----

#[test]
fn test_catalog_covers_every_tile_pair() {
    let registry = builtin_registry();
    assert!(!registry.planets().is_empty());
    for planet in registry.planets() {
        assert_eq!(planet.tiles.pools.len(), 8, "{}: every pair but down/down", planet.name);
        assert!(!planet
            .tiles
            .pools
            .iter()
            .any(|p| p.from == SurfaceDirection::Down && p.to == SurfaceDirection::Down));
        for pool in &planet.tiles.pools {
            assert!(!pool.textures.is_empty());
        }
    }
}

#[test]
fn test_catalog_has_every_tier() {
    let registry = builtin_registry();
    let mut rng = SeededRandom::new(5);
    for tier in [PlanetTier::Easy, PlanetTier::Medium, PlanetTier::Hard] {
        assert_eq!(registry.pick_planet(&mut rng, tier).unwrap().tier, tier);
    }
}

// ---- Drawables ----

#[test]
fn test_drawable_radius_and_update() {
    let mut a = Drawable::new(TextureId(1), 2.0, Vec2::new(3.0, 0.0), DrawableLevel::Deco);
    let b = Drawable::new(TextureId(1), 1.0, Vec2::ZERO, DrawableLevel::Deco);
    assert_eq!(radius_of(&[a.clone(), b]), 4.0);

    a.rot_speed = 1.0;
    a.update(Vec2::new(1.0, 1.0), FRAC_PI_2, 0.5);
    assert!((a.world_pos - Vec2::new(1.0, 4.0)).length() < 1e-5);
    assert!((a.world_angle - (FRAC_PI_2 + 0.5)).abs() < 1e-6);
}

#[test]
fn test_depth_of_first_drawable() {
    let far = Drawable::new(TextureId(1), 1.0, Vec2::ZERO, DrawableLevel::DistantDeco);
    assert_eq!(depth_of(&[far]), 1.5);
    assert_eq!(depth_of(&[]), 1.0);
}
