//! PlacementSolver: bounded-retry spatial placement.
//!
//! Two searches share the same shape: sample a fixed number of random angles,
//! score each, and settle for the best one found rather than block.
//!
//! - Exclusion-disk placement lays out systems and mazes on growing rings.
//! - Flat-surface placement ray casts onto a planet's terrain and keeps the
//!   spot whose surface normal is closest to radial.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use tracing::{debug, warn};

use voidsail_core::bodies::Planet;
use voidsail_core::constants::{MAX_RING_STEPS, PLACEMENT_TRIES, SUN_RADIUS};
use voidsail_core::geometry::{angle_diff, angle_of, angular_width_of_sphere, from_angle, norm_angle};
use voidsail_core::physics::RayCast;
use voidsail_core::random::SeededRandom;

/// A circle other bodies must stay out of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionDisk {
    pub center: Vec2,
    pub radius: f32,
}

impl ExclusionDisk {
    /// How far a disk at `center` with `radius` intrudes into this one. Non-positive means clear.
    pub fn overlap(&self, center: Vec2, radius: f32) -> f32 {
        self.radius + radius - self.center.distance(center)
    }
}

fn worst_overlap(existing: &[ExclusionDisk], center: Vec2, radius: f32) -> f32 {
    existing
        .iter()
        .map(|d| d.overlap(center, radius))
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Position for a disk of `radius` that overlaps none of `existing`.
///
/// Samples `PLACEMENT_TRIES` angles per ring, starting at the origin and
/// growing the ring by `SUN_RADIUS`. After `MAX_RING_STEPS` rings the least
/// overlapping candidate is returned.
pub fn place_disk(existing: &[ExclusionDisk], radius: f32, rng: &mut SeededRandom) -> Vec2 {
    let mut best = Vec2::ZERO;
    let mut best_overlap = f32::INFINITY;
    let mut dist = 0.0;
    for _ in 0..MAX_RING_STEPS {
        for _ in 0..PLACEMENT_TRIES {
            let candidate = from_angle(rng.angle(), dist);
            let overlap = worst_overlap(existing, candidate, radius);
            if overlap <= 0.0 {
                return candidate;
            }
            if overlap < best_overlap {
                best = candidate;
                best_overlap = overlap;
            }
        }
        dist += SUN_RADIUS;
    }
    warn!(
        radius,
        overlap = best_overlap,
        "placement search exhausted, using best candidate"
    );
    best
}

/// Angular windows already taken on a planet, in the planet's rotating frame.
#[derive(Debug, Clone, Default)]
pub struct ConsumedAngles {
    windows: Vec<(f32, f32)>,
}

impl ConsumedAngles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, angle: f32, half_width: f32) {
        self.windows.push((norm_angle(angle), half_width));
    }

    /// Whether a window at `angle` of `half_width` touches any taken window.
    pub fn is_consumed(&self, angle: f32, half_width: f32) -> bool {
        self.windows
            .iter()
            .any(|&(a, hw)| angle_diff(a, angle).abs() < hw + half_width)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

/// Planet-frame offset of the flattest reachable ground spot.
///
/// Samples up to `PLACEMENT_TRIES` angles, skipping those inside `taken`.
/// Each probe casts from outside the atmosphere toward the planet center,
/// hitting only this planet's tiles. When `taken` is given, the winning
/// angle is added to it with the angular half-width of `half_width`.
pub fn find_flat_place<R: RayCast + ?Sized>(
    ray: &R,
    planet: &Planet,
    mut taken: Option<&mut ConsumedAngles>,
    half_width: f32,
    rng: &mut SeededRandom,
) -> Vec2 {
    let angular_half_width = angular_width_of_sphere(half_width, planet.ground_height);
    let mut best: Option<(f32, f32, Vec2)> = None;
    let mut first_angle = None;

    for _ in 0..PLACEMENT_TRIES {
        let local_angle = rng.angle();
        first_angle.get_or_insert(local_angle);
        if let Some(consumed) = taken.as_deref() {
            if consumed.is_consumed(local_angle, angular_half_width) {
                continue;
            }
        }
        let (deviation, point) = probe(ray, planet, local_angle);
        if best.map_or(true, |(d, _, _)| deviation < d) {
            best = Some((deviation, local_angle, point));
        }
    }

    let (angle, point) = match best {
        Some((_, angle, point)) => (angle, point),
        None => {
            // Every sample was taken; crowd the first one.
            let angle = first_angle.unwrap_or(0.0);
            debug!(planet = planet.id.0, "no free angle left, reusing a taken one");
            (angle, probe(ray, planet, angle).1)
        }
    };

    if let Some(consumed) = taken.as_deref_mut() {
        consumed.add(angle, angular_half_width);
    }
    planet.world_to_local(point)
}

/// Deviation from radial and world hit point for one planet-frame angle.
fn probe<R: RayCast + ?Sized>(ray: &R, planet: &Planet, local_angle: f32) -> (f32, Vec2) {
    let world_angle = planet.angle + local_angle;
    let from = planet.position + from_angle(world_angle, planet.full_height());
    let id = planet.id;
    match ray.cast_ray_filtered(from, planet.position, &|tag| tag.is_tile_of(id)) {
        Some(hit) => (angle_diff(world_angle, angle_of(hit.normal)).abs(), hit.point),
        None => (
            FRAC_PI_2,
            planet.position + from_angle(world_angle, planet.ground_height),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_disk_goes_to_origin() {
        let mut rng = SeededRandom::new(1);
        let pos = place_disk(&[], 50.0, &mut rng);
        assert_eq!(pos, Vec2::ZERO);
    }

    #[test]
    fn test_disks_never_overlap() {
        let mut rng = SeededRandom::new(2);
        let mut disks: Vec<ExclusionDisk> = Vec::new();
        for i in 0..12 {
            let radius = 30.0 + (i as f32) * 7.0;
            let center = place_disk(&disks, radius, &mut rng);
            for d in &disks {
                assert!(
                    d.center.distance(center) >= d.radius + radius - 1e-3,
                    "Disk {i} overlaps an earlier one"
                );
            }
            disks.push(ExclusionDisk { center, radius });
        }
    }

    #[test]
    fn test_exhausted_search_returns_least_overlapping_candidate() {
        let blocker = [ExclusionDisk {
            center: Vec2::ZERO,
            radius: 1.0e6,
        }];
        let mut rng = SeededRandom::new(3);
        let mut replay = rng.clone();
        let pos = place_disk(&blocker, 10.0, &mut rng);

        // Same draws, scored independently.
        let mut least = f32::INFINITY;
        let mut dist = 0.0;
        for _ in 0..MAX_RING_STEPS {
            for _ in 0..PLACEMENT_TRIES {
                let candidate = from_angle(replay.angle(), dist);
                least = least.min(blocker[0].overlap(candidate, 10.0));
            }
            dist += SUN_RADIUS;
        }

        let overlap = blocker[0].overlap(pos, 10.0);
        assert!(overlap > 0.0, "Nothing can clear a disk this large");
        assert_eq!(overlap, least, "Result should be the least overlapping candidate");
        let last_ring = (MAX_RING_STEPS - 1) as f32 * SUN_RADIUS;
        assert!(
            (pos.length() - last_ring).abs() < 1e-2,
            "Least overlap sits on the outermost ring, got {}",
            pos.length()
        );
    }

    #[test]
    fn test_consumed_angles_wrap() {
        let mut consumed = ConsumedAngles::new();
        consumed.add(0.05, 0.1);
        assert!(consumed.is_consumed(std::f32::consts::TAU - 0.02, 0.0));
        assert!(!consumed.is_consumed(1.0, 0.1));
        assert!(consumed.is_consumed(0.3, 0.2));
        assert_eq!(consumed.len(), 1);
    }
}
