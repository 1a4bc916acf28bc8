//! Built-in content catalog.
//!
//! A small but complete set of configs so a world can be generated without
//! any asset pipeline. Used by the probe tool and by tests.

use crate::config::{
    BeltConfig, ConfigRegistry, DecoConfig, HullConfig, HullKind, MazeConfig, NameTables,
    PlanetConfig, ShipConfig, SkyConfig, SolarSystemConfig, TilePoolConfig, TileSetConfig,
};
use crate::types::{PlanetTier, SurfaceDirection, TextureId};

const DIRECTIONS: [SurfaceDirection; 3] = [
    SurfaceDirection::Up,
    SurfaceDirection::Fwd,
    SurfaceDirection::Down,
];

/// Build the default registry.
pub fn builtin_registry() -> ConfigRegistry {
    let planets = vec![
        planet("meadow", PlanetTier::Easy, 100, 0.8, 1.1, true),
        planet("dust", PlanetTier::Medium, 200, 1.0, 1.3, true),
        planet("ember", PlanetTier::Hard, 300, 1.2, 1.5, false),
    ];
    let systems = vec![
        SolarSystemConfig {
            name: "quiet".into(),
            hard: false,
        },
        SolarSystemConfig {
            name: "contested".into(),
            hard: true,
        },
    ];
    let belts = vec![
        BeltConfig {
            name: "pebbles".into(),
            hard: false,
        },
        BeltConfig {
            name: "shards".into(),
            hard: true,
        },
    ];
    let mazes = vec![MazeConfig {
        name: "wreckfield".into(),
    }];
    let names = NameTables {
        systems: ["Aster", "Brume", "Calyx", "Dorado", "Eidos", "Fennec"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        planets: ["Ash", "Bell", "Cinder", "Drift", "Echo", "Flint", "Gale", "Haze"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    };
    ConfigRegistry::new(planets, systems, belts, mazes, names)
}

fn planet(
    name: &str,
    tier: PlanetTier,
    texture_base: u32,
    min_grav: f32,
    max_grav: f32,
    has_sky: bool,
) -> PlanetConfig {
    PlanetConfig {
        name: name.into(),
        tier,
        min_grav,
        max_grav,
        row_count: 5,
        smooth_landscape: tier != PlanetTier::Hard,
        tiles: tile_set(texture_base),
        cloud_textures: vec![TextureId(texture_base + 50), TextureId(texture_base + 51)],
        decos: vec![DecoConfig {
            name: format!("{name}_rocks"),
            textures: vec![TextureId(texture_base + 60), TextureId(texture_base + 61)],
            density: 0.2,
            min_size: 0.4,
            max_size: 1.2,
            allow_flip: true,
        }],
        sky: has_sky.then(|| SkyConfig {
            texture: TextureId(texture_base + 70),
            day_tint: [0.5, 0.7, 1.0, 1.0],
            night_tint: [0.05, 0.05, 0.15, 1.0],
        }),
        station: (tier == PlanetTier::Easy).then(|| ShipConfig {
            hull: hull("outpost", HullKind::Station, 6.0, 3.0, 400.0),
            density: 0.0,
            money: 500,
        }),
        ground_enemies: vec![ShipConfig {
            hull: hull("crawler", HullKind::Standard, 1.2, 0.6, 30.0),
            density: 0.08,
            money: 20,
        }],
        low_orbit_enemies: vec![ShipConfig {
            hull: hull("skimmer", HullKind::Standard, 1.0, 0.5, 20.0),
            density: 0.05,
            money: 15,
        }],
        high_orbit_enemies: vec![ShipConfig {
            hull: hull("hawk", HullKind::Standard, 1.4, 0.7, 40.0),
            density: 0.02,
            money: 40,
        }],
    }
}

fn hull(name: &str, kind: HullKind, size: f32, approx_radius: f32, max_health: f32) -> HullConfig {
    let r = approx_radius;
    HullConfig {
        name: name.into(),
        texture: TextureId(900),
        size,
        approx_radius,
        kind,
        max_health,
        outline: Some(vec![[-r, -r], [r, -r], [r, r], [-r, r]]),
    }
}

fn tile_set(texture_base: u32) -> TileSetConfig {
    let mut pools = Vec::new();
    let mut next_texture = texture_base;
    for from in DIRECTIONS {
        for to in DIRECTIONS {
            if from == SurfaceDirection::Down && to == SurfaceDirection::Down {
                continue;
            }
            let textures = vec![TextureId(next_texture), TextureId(next_texture + 1)];
            next_texture += 2;
            let outline = if from == SurfaceDirection::Up && to == SurfaceDirection::Up {
                None
            } else {
                Some(surface_outline(from, to))
            };
            pools.push(TilePoolConfig {
                from,
                to,
                textures,
                outline,
            });
        }
    }
    TileSetConfig { pools }
}

/// A slightly bumped surface line from the `from` edge to the `to` edge.
fn surface_outline(from: SurfaceDirection, to: SurfaceDirection) -> Vec<[f32; 2]> {
    let y0 = edge_depth(from);
    let y1 = edge_depth(to);
    let mid = (y0 + y1) * 0.5;
    vec![
        [-0.5, y0],
        [-0.2, y0 + (mid - y0) * 0.6 - 0.05],
        [0.2, y1 + (mid - y1) * 0.6 + 0.05],
        [0.5, y1],
    ]
}

fn edge_depth(direction: SurfaceDirection) -> f32 {
    match direction {
        SurfaceDirection::Up => -0.5,
        SurfaceDirection::Fwd => 0.0,
        SurfaceDirection::Down => 0.5,
    }
}
