//! GroundBuilder: a planet's terrain tile grid.
//!
//! Each column gets one random target height in `[0, rows)`, counted in rows
//! from the outermost ring inward. A cell compares its row against the target
//! height of its own column (`from` edge) and of the next column (`to` edge).

use voidsail_core::random::SeededRandom;
use voidsail_core::types::SurfaceDirection;

use crate::tiles::{Tile, TilePools};

/// Result of a ground build, indexed `[column][row]`.
#[derive(Debug, Clone)]
pub struct GroundMap {
    /// Final per-column target heights.
    pub heights: Vec<f32>,
    pub cells: Vec<Vec<Option<Tile>>>,
}

impl GroundMap {
    pub fn columns(&self) -> usize {
        self.cells.len()
    }

    pub fn rows(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Tile> {
        self.cells.get(column)?.get(row)?.as_ref()
    }
}

pub struct GroundBuilder<'a> {
    pools: &'a TilePools,
    columns: usize,
    rows: usize,
    smooth: bool,
}

impl<'a> GroundBuilder<'a> {
    pub fn new(pools: &'a TilePools, columns: usize, rows: usize, smooth: bool) -> Self {
        Self {
            pools,
            columns,
            rows,
            smooth,
        }
    }

    pub fn build(&self, rng: &mut SeededRandom) -> GroundMap {
        let heights = self.target_heights(rng);
        let mut cells = Vec::with_capacity(self.columns);
        for col in 0..self.columns {
            let here = heights[col].floor() as usize;
            let next = heights[(col + 1) % self.columns].floor() as usize;
            let column = (0..self.rows)
                .map(|row| {
                    let from = classify(row, here);
                    let to = classify(row, next);
                    if from == SurfaceDirection::Down && to == SurfaceDirection::Down {
                        return None;
                    }
                    self.pools.get(from, to).cloned()
                })
                .collect();
            cells.push(column);
        }
        GroundMap { heights, cells }
    }

    /// Per-column target heights, smoothed if configured.
    pub fn target_heights(&self, rng: &mut SeededRandom) -> Vec<f32> {
        let raw: Vec<f32> = (0..self.columns)
            .map(|_| rng.up_to(self.rows as f32))
            .collect();
        if self.smooth {
            smooth(&raw, self.rows)
        } else {
            raw
        }
    }
}

/// Surface direction at an edge whose surface sits in row `surface_row`.
pub fn classify(row: usize, surface_row: usize) -> SurfaceDirection {
    if row < surface_row {
        SurfaceDirection::Down
    } else if row > surface_row {
        SurfaceDirection::Up
    } else {
        SurfaceDirection::Fwd
    }
}

/// Circular 3-point filter, then min-shift and rescale back into `[0, rows)`.
pub fn smooth(raw: &[f32], rows: usize) -> Vec<f32> {
    let n = raw.len();
    if n == 0 {
        return Vec::new();
    }
    let filtered: Vec<f32> = (0..n)
        .map(|x| {
            let prev = raw[(x + n - 1) % n];
            let next = raw[(x + 1) % n];
            0.25 * (prev + next) + 0.5 * raw[x]
        })
        .collect();
    let min = filtered.iter().copied().fold(f32::INFINITY, f32::min);
    let max = filtered.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    if range <= f32::EPSILON {
        return vec![0.0; n];
    }
    let mul = (rows as f32 - 0.01) / range;
    filtered
        .iter()
        .map(|d| (mul * (d - min)).clamp(0.0, rows as f32 - 0.01))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voidsail_core::catalog::builtin_registry;
    use voidsail_core::config::MissingResourcePolicy;

    fn pools() -> TilePools {
        let registry = builtin_registry();
        TilePools::build(&registry.planets()[0].tiles, MissingResourcePolicy::Fail).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let pools = pools();
        let map = GroundBuilder::new(&pools, 40, 5, true).build(&mut SeededRandom::new(1));
        assert_eq!(map.columns(), 40);
        assert_eq!(map.rows(), 5);
        assert_eq!(map.heights.len(), 40);
    }

    #[test]
    fn test_smoothed_heights_stay_in_range() {
        let pools = pools();
        for seed in 0..20 {
            let builder = GroundBuilder::new(&pools, 60, 5, true);
            let heights = builder.target_heights(&mut SeededRandom::new(seed));
            for h in &heights {
                assert!((0.0..5.0).contains(h), "Height {h} out of [0, 5)");
            }
            let min = heights.iter().copied().fold(f32::INFINITY, f32::min);
            assert!(min.abs() < 1e-5, "Smoothing should shift the minimum to 0");
        }
    }

    #[test]
    fn test_smoothing_removes_spikes() {
        let raw = [0.0, 0.0, 4.0, 0.0, 0.0, 0.0];
        let s = smooth(&raw, 5);
        assert!(s[1] > 0.0 && s[3] > 0.0, "Neighbours of a spike are lifted");
        assert!((s[2] - 4.99).abs() < 1e-4, "Amplitude is rescaled to the full range");
    }

    #[test]
    fn test_classification_matches_heights() {
        let pools = pools();
        let map = GroundBuilder::new(&pools, 50, 5, false).build(&mut SeededRandom::new(9));
        let cols = map.columns();
        for col in 0..cols {
            let here = map.heights[col];
            let next = map.heights[(col + 1) % cols];
            for row in 0..map.rows() {
                let r = row as f32;
                match map.get(col, row) {
                    None => assert!(r < here.floor() && r < next.floor()),
                    Some(tile) => {
                        let above_both = r > here && r > next;
                        assert_eq!(
                            tile.is_interior(),
                            above_both,
                            "col {col} row {row}: heights {here}/{next}"
                        );
                        assert_eq!(tile.has_body(), !above_both);
                    }
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_ground() {
        let pools = pools();
        let a = GroundBuilder::new(&pools, 30, 5, true).build(&mut SeededRandom::new(4));
        let b = GroundBuilder::new(&pools, 30, 5, true).build(&mut SeededRandom::new(4));
        assert_eq!(a.heights, b.heights);
        for col in 0..30 {
            for row in 0..5 {
                assert_eq!(a.get(col, row), b.get(col, row));
            }
        }
    }
}
