//! Procedural world population
//!
//! A cheap multi-octave sine field stands in for real noise: it only has to
//! be smooth and span [0, 1]. Every placement pass is rejection sampling
//! with a fixed candidate budget, so generation always terminates.

use crate::config::*;
use crate::geometry::distance;
use crate::world::*;
use bevy::prelude::*;
use rand::Rng;

/// Vegetation density on a coarse grid covering the world
#[derive(Debug, Clone)]
pub struct DensityField {
    pub cols: usize,
    pub rows: usize,
    cell_size: f32,
    values: Vec<f32>,
}

impl DensityField {
    pub fn new(world_size: Vec2, cell_size: f32, scale: f32) -> Self {
        let cols = ((world_size.x / cell_size) as usize).max(1);
        let rows = ((world_size.y / cell_size) as usize).max(1);

        let mut values = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            for x in 0..cols {
                let (fx, fy) = (x as f32 * scale, y as f32 * scale);
                let v = fx.sin() * fy.sin()
                    + 0.5 * (fx * 2.0).sin() * (fy * 2.0).sin()
                    + 0.25 * (fx * 4.0).sin() * (fy * 4.0).sin();
                values.push(v);
            }
        }

        let min = values.iter().copied().fold(f32::INFINITY, f32::min);
        let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let range = max - min;
        for v in values.iter_mut() {
            *v = if range > 0.0 { (*v - min) / range } else { 0.0 };
        }

        Self {
            cols,
            rows,
            cell_size,
            values,
        }
    }

    /// Density at a world position, clamped to the grid edges
    pub fn sample(&self, pos: Vec2) -> f32 {
        let x = ((pos.x / self.cell_size).max(0.0) as usize).min(self.cols - 1);
        let y = ((pos.y / self.cell_size).max(0.0) as usize).min(self.rows - 1);
        self.values[y * self.cols + x]
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

fn draw_count(range: (usize, usize), rng: &mut impl Rng) -> usize {
    rng.gen_range(range.0..=range.1)
}

/// Build a fully populated forest for a world of `size`
pub fn generate_forest(size: Vec2, rng: &mut impl Rng) -> Forest {
    let mut forest = Forest::empty(size);
    let density = DensityField::new(size, DENSITY_CELL_SIZE, DENSITY_SCALE);

    place_trees(&mut forest, &density, rng);
    place_bushes(&mut forest, rng);
    place_rocks(&mut forest, rng);
    place_decorations(&mut forest, rng);
    place_fences(&mut forest, rng);

    info!(
        "[World] Generated {} trees, {} bushes, {} rocks, {} decorations, {} fences",
        forest.trees.len(),
        forest.bushes.len(),
        forest.rocks.len(),
        forest.decorations.len(),
        forest.fences.len()
    );
    forest
}

fn place_trees(forest: &mut Forest, density: &DensityField, rng: &mut impl Rng) {
    for _ in 0..draw_count(TREE_CANDIDATES, rng) {
        let pos = forest.random_point(50.0, rng);
        let local = density.sample(pos);

        if rng.r#gen::<f32>() >= local * TREE_DENSITY_FACTOR {
            continue;
        }

        let kind = if local > BIG_TREE_DENSITY && rng.gen_bool(BIG_TREE_CHANCE) {
            TreeKind::Big
        } else {
            TreeKind::Small
        };

        let crowded = forest
            .trees
            .iter()
            .any(|t| distance(pos, t.position) < TREE_MIN_SPACING);
        if !crowded {
            forest.plant_tree(pos, kind, rng);
        }
    }
}

fn place_bushes(forest: &mut Forest, rng: &mut impl Rng) {
    for _ in 0..draw_count(BUSH_CANDIDATES, rng) {
        let pos = forest.random_point(30.0, rng);
        let crowded = forest
            .trees
            .iter()
            .any(|t| distance(pos, t.position) < BUSH_TREE_SPACING);
        if !crowded {
            let size = rng.gen_range(8..=15) as f32;
            forest.bushes.push(Bush { position: pos, size });
        }
    }
}

fn place_rocks(forest: &mut Forest, rng: &mut impl Rng) {
    for _ in 0..draw_count(ROCK_CANDIDATES, rng) {
        let pos = forest.random_point(40.0, rng);
        let crowded = forest
            .trees
            .iter()
            .any(|t| distance(pos, t.position) < ROCK_TREE_SPACING)
            || forest
                .bushes
                .iter()
                .any(|b| distance(pos, b.position) < ROCK_BUSH_SPACING);
        if !crowded {
            let size = rng.gen_range(12..=20) as f32;
            forest.rocks.push(Rock { position: pos, size });
        }
    }
}

fn place_decorations(forest: &mut Forest, rng: &mut impl Rng) {
    for _ in 0..draw_count(DECORATION_CANDIDATES, rng) {
        let pos = forest.random_point(20.0, rng);
        let on_rock = forest
            .rocks
            .iter()
            .any(|r| distance(pos, r.position) < DECORATION_ROCK_SPACING + r.size);
        if on_rock {
            continue;
        }
        let kind = match rng.gen_range(0..3) {
            0 => DecorationKind::Flower,
            1 => DecorationKind::Mushroom,
            _ => DecorationKind::Grass,
        };
        forest.decorations.push(Decoration { position: pos, kind });
    }
}

fn place_fences(forest: &mut Forest, rng: &mut impl Rng) {
    let wanted = draw_count(FENCE_COUNT, rng);

    for _ in 0..FENCE_ATTEMPTS {
        if forest.fences.len() >= wanted {
            break;
        }

        let length = rng.gen_range(FENCE_LENGTH.0..=FENCE_LENGTH.1);
        let extent = if rng.gen_bool(0.5) {
            Vec2::new(length, FENCE_THICKNESS)
        } else {
            Vec2::new(FENCE_THICKNESS, length)
        };
        let min = forest.random_point(60.0, rng);
        let fence = Fence {
            min,
            max: min + extent,
        };

        if !forest.in_bounds(fence.max, 60.0) {
            continue;
        }
        let blocked = forest
            .trees
            .iter()
            .any(|t| fence.overlaps(t.position, FENCE_CLEARANCE + t.size))
            || forest
                .rocks
                .iter()
                .any(|r| fence.overlaps(r.position, FENCE_CLEARANCE + r.size))
            || fence.overlaps(TRADER_POSITION, FENCE_CAMP_CLEARANCE)
            || forest
                .fences
                .iter()
                .any(|other| fence.overlaps(other.center(), other.size().max_element()));
        if !blocked {
            forest.fences.push(fence);
        }
    }

    if forest.fences.len() < wanted {
        debug!(
            "[World] Only placed {} of {} fences",
            forest.fences.len(),
            wanted
        );
    }
}
