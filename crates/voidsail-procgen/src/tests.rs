//! Tests for galaxy layout and planet surface placement.

use glam::Vec2;

use voidsail_core::bodies::{Galaxy, Planet};
use voidsail_core::catalog::builtin_registry;
use voidsail_core::config::ConfigRegistry;
use voidsail_core::constants::{ATM_HEIGHT, MAX_GROUND_HEIGHT, PLANET_GAP, SUN_RADIUS};
use voidsail_core::geometry::{angle_diff, angle_of, angular_width_of_sphere};
use voidsail_core::physics::{BodyDef, BodyKind, BodyTag, HeadlessPhysics, Physics, Shape};
use voidsail_core::random::SeededRandom;
use voidsail_core::types::{PlanetId, PlanetTier, SystemId};

use crate::galaxy::{system_radius, GalaxyBuilder, Slot};
use crate::placement::{find_flat_place, ConsumedAngles};

fn build(seed: u64, systems: usize) -> Galaxy {
    let registry = builtin_registry();
    let mut rng = SeededRandom::new(seed);
    GalaxyBuilder::new(&registry, &mut rng)
        .build(systems)
        .expect("Galaxy generation should succeed")
}

// ---- Galaxy layout ----

#[test]
fn test_seed_42_two_systems() {
    let galaxy = build(42, 2);
    assert_eq!(galaxy.systems.len(), 2);
    assert_eq!(galaxy.mazes.len(), 4);
    assert!(!galaxy.systems[0].hard, "First system is the home system");
    assert!(galaxy.systems[1].hard);
    assert_eq!(galaxy.seed, 42);
}

#[test]
fn test_later_systems_are_hard() {
    for seed in 0..10 {
        let galaxy = build(seed, 5);
        assert_eq!(galaxy.systems.len(), 5);
        assert_eq!(galaxy.mazes.len(), 10);
        for (i, system) in galaxy.systems.iter().enumerate() {
            assert_eq!(system.hard, i > 0, "seed {seed} system {i}");
        }
    }
}

#[test]
fn test_determinism_same_seed() {
    fn fingerprint(g: &Galaxy) -> Vec<u32> {
        let mut out = Vec::new();
        for s in &g.systems {
            out.extend([s.position.x.to_bits(), s.position.y.to_bits(), s.radius.to_bits()]);
        }
        for p in &g.planets {
            out.extend([
                p.distance.to_bits(),
                p.angle_to_system.to_bits(),
                p.angle.to_bits(),
                p.orbit_speed.to_bits(),
                p.rotation_speed.to_bits(),
                p.ground_height.to_bits(),
                p.grav_const.to_bits(),
            ]);
        }
        for b in &g.belts {
            out.extend([b.distance.to_bits(), b.half_width.to_bits()]);
        }
        for m in &g.mazes {
            out.extend([m.position.x.to_bits(), m.position.y.to_bits(), m.radius.to_bits()]);
        }
        out
    }

    let a = build(1234, 3);
    let b = build(1234, 3);
    assert_eq!(fingerprint(&a), fingerprint(&b), "Same seed must give identical layouts");
    let names_a: Vec<&str> = a.planets.iter().map(|p| p.name.as_str()).collect();
    let names_b: Vec<&str> = b.planets.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names_a, names_b);

    let c = build(4321, 3);
    assert_ne!(fingerprint(&a), fingerprint(&c), "Different seeds should diverge");
}

#[test]
fn test_systems_and_mazes_do_not_overlap() {
    for seed in 0..20 {
        let galaxy = build(seed, 4);
        let mut disks: Vec<(Vec2, f32)> = galaxy
            .systems
            .iter()
            .map(|s| (s.position, s.radius))
            .collect();
        disks.extend(galaxy.mazes.iter().map(|m| (m.position, m.radius)));
        for i in 0..disks.len() {
            for j in (i + 1)..disks.len() {
                let (a, ra) = disks[i];
                let (b, rb) = disks[j];
                assert!(
                    a.distance(b) >= ra + rb - 1e-3,
                    "seed {seed}: bodies {i} and {j} overlap"
                );
            }
        }
    }
}

#[test]
fn test_radius_accounting() {
    for seed in 0..20 {
        let galaxy = build(seed, 3);
        for system in &galaxy.systems {
            let mut expected = SUN_RADIUS as f64;
            for id in &system.planets {
                let p = galaxy.planet(*id).unwrap();
                expected += (2.0 * (PLANET_GAP + ATM_HEIGHT + p.ground_height)) as f64;
            }
            for id in &system.belts {
                let b = &galaxy.belts[id.0 as usize];
                expected += (2.0 * (PLANET_GAP + b.half_width)) as f64;
            }
            assert!(
                (system.radius as f64 - expected).abs() < 1e-3,
                "seed {seed} system {}: declared {} vs accumulated {expected}",
                system.name,
                system.radius
            );
        }
    }
}

#[test]
fn test_slots_are_ordered_and_inside_system() {
    let galaxy = build(77, 3);
    for system in &galaxy.systems {
        assert_eq!(system.planets.len() + system.belts.len(), 5);
        assert!(system.belts.len() <= 1, "At most one belt per system");
        let mut last = 0.0;
        for id in &system.planets {
            let p = galaxy.planet(*id).unwrap();
            assert!(p.distance > last);
            assert!(p.distance + p.full_height() < system.radius);
            assert!(p.ground_height >= 0.5 * MAX_GROUND_HEIGHT && p.ground_height < MAX_GROUND_HEIGHT);
            assert_eq!(p.system, system.id);
            let offset = p.position - system.position;
            assert!((offset.length() - p.distance).abs() < 1e-2);
            last = p.distance;
        }
    }
}

#[test]
fn test_home_system_outer_planets_are_easy() {
    let galaxy = build(8, 2);
    let home = &galaxy.systems[0];
    for id in &home.planets {
        let p = galaxy.planet(*id).unwrap();
        let tier = p.config.tier;
        assert_ne!(tier, PlanetTier::Hard, "Home system never gets hard planets");
        if p.distance >= home.radius / 2.0 {
            assert_eq!(tier, PlanetTier::Easy);
        }
    }
}

#[test]
fn test_slot_widths() {
    let slots = [
        Slot::Planet { ground_height: 20.0 },
        Slot::Belt { half_width: 20.0 },
    ];
    let expected = SUN_RADIUS + 2.0 * (PLANET_GAP + ATM_HEIGHT + 20.0) + 2.0 * (PLANET_GAP + 20.0);
    assert!((system_radius(&slots) - expected as f64).abs() < 1e-4);
}

#[test]
fn test_zero_systems_builds_nothing() {
    let galaxy = build(5, 0);
    assert!(galaxy.systems.is_empty());
    assert!(galaxy.mazes.is_empty());
}

#[test]
fn test_empty_registry_is_an_error() {
    let registry = ConfigRegistry::default();
    let mut rng = SeededRandom::new(1);
    assert!(GalaxyBuilder::new(&registry, &mut rng).build(1).is_err());
}

// ---- Flat place search ----

fn round_planet(physics: &mut HeadlessPhysics, ground_height: f32) -> Planet {
    let registry = builtin_registry();
    let config = registry.planets()[0].clone();
    let mut planet = Planet::new(
        PlanetId(0),
        SystemId(0),
        "Disk".into(),
        config,
        200.0,
        0.0,
        0.3,
        0.0,
        0.0,
        ground_height,
        100.0,
    );
    planet.update_position(Vec2::new(-50.0, 10.0));
    physics.create_body(BodyDef {
        kind: BodyKind::Static,
        position: planet.position,
        angle: 0.0,
        velocity: Vec2::ZERO,
        shapes: vec![Shape::Circle {
            center: Vec2::ZERO,
            radius: ground_height,
        }],
        tag: BodyTag::Tile { planet: PlanetId(0) },
    });
    planet
}

#[test]
fn test_flat_place_lands_on_surface() {
    let mut physics = HeadlessPhysics::new();
    let planet = round_planet(&mut physics, 20.0);
    let mut rng = SeededRandom::new(3);
    let spot = find_flat_place(&physics, &planet, None, 1.0, &mut rng);
    assert!(
        (spot.length() - 20.0).abs() < 1e-2,
        "Spot should be on the ground, got radius {}",
        spot.length()
    );
}

#[test]
fn test_flat_place_respects_taken_angles() {
    let mut physics = HeadlessPhysics::new();
    let planet = round_planet(&mut physics, 20.0);
    let mut rng = SeededRandom::new(11);
    let mut taken = ConsumedAngles::new();
    let half_width = 2.0;
    let spots: Vec<Vec2> = (0..4)
        .map(|_| find_flat_place(&physics, &planet, Some(&mut taken), half_width, &mut rng))
        .collect();
    assert_eq!(taken.len(), 4);

    let min_gap = 2.0 * angular_width_of_sphere(half_width, 20.0);
    for i in 0..spots.len() {
        for j in (i + 1)..spots.len() {
            let gap = angle_diff(angle_of(spots[i]), angle_of(spots[j])).abs();
            assert!(gap >= min_gap - 1e-3, "Spots {i} and {j} share a window");
        }
    }
}

#[test]
fn test_flat_place_without_terrain_uses_ground_height() {
    let physics = HeadlessPhysics::new();
    let registry = builtin_registry();
    let planet = Planet::new(
        PlanetId(4),
        SystemId(0),
        "Bare".into(),
        registry.planets()[0].clone(),
        100.0,
        0.0,
        0.0,
        0.0,
        0.0,
        15.0,
        100.0,
    );
    let spot = find_flat_place(&physics, &planet, None, 0.0, &mut SeededRandom::new(1));
    assert!((spot.length() - 15.0).abs() < 1e-3);
}
