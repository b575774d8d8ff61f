use crate::config::*;
use crate::geometry::{distance, random_point_in_rect};
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeKind {
    Small,
    Big,
}

/// Lifecycle of a tree: alive until felled, then briefly dying before removal
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TreeState {
    Alive,
    Dying { remaining: f32 },
}

#[derive(Debug, Clone)]
pub struct Tree {
    pub id: u32,
    pub position: Vec2,
    pub kind: TreeKind,
    pub size: f32,
    pub health: i32,
    pub max_health: i32,
    pub state: TreeState,
}

impl Tree {
    pub fn new(id: u32, position: Vec2, kind: TreeKind, rng: &mut impl Rng) -> Self {
        let (size, max_health) = match kind {
            TreeKind::Small => (rng.gen_range(15..=25) as f32, SMALL_TREE_HEALTH),
            TreeKind::Big => (rng.gen_range(30..=45) as f32, BIG_TREE_HEALTH),
        };
        Self {
            id,
            position,
            kind,
            size,
            health: max_health,
            max_health,
            state: TreeState::Alive,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == TreeState::Alive
    }

    pub fn is_dying(&self) -> bool {
        matches!(self.state, TreeState::Dying { .. })
    }

    /// Health as a fraction of max, used for tinting
    pub fn health_ratio(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }

    /// Apply chop damage. Returns true when this blow felled the tree.
    pub fn apply_damage(&mut self, damage: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - damage).max(0);
        if self.health == 0 {
            self.state = TreeState::Dying {
                remaining: TREE_DECAY_DURATION,
            };
            return true;
        }
        false
    }

    /// Advance the decay timer. Returns true once the tree should be removed.
    fn decay(&mut self, dt: f32) -> bool {
        match &mut self.state {
            TreeState::Alive => false,
            TreeState::Dying { remaining } => {
                *remaining -= dt;
                *remaining <= 0.0
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bush {
    pub position: Vec2,
    pub size: f32,
}

#[derive(Debug, Clone)]
pub struct Rock {
    pub position: Vec2,
    pub size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecorationKind {
    Flower,
    Mushroom,
    Grass,
}

/// Ground clutter with no gameplay effect
#[derive(Debug, Clone)]
pub struct Decoration {
    pub position: Vec2,
    pub kind: DecorationKind,
}

/// Axis-aligned fence segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fence {
    pub min: Vec2,
    pub max: Vec2,
}

impl Fence {
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Does a circle of `radius` at `pos` touch this fence?
    pub fn overlaps(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= self.min.x - radius
            && pos.x <= self.max.x + radius
            && pos.y >= self.min.y - radius
            && pos.y <= self.max.y + radius
    }
}

/// Everything near a point, bucketed by kind
#[derive(Debug, Default)]
pub struct AreaObjects<'a> {
    pub trees: Vec<&'a Tree>,
    pub bushes: Vec<&'a Bush>,
    pub rocks: Vec<&'a Rock>,
    pub decorations: Vec<&'a Decoration>,
}

impl AreaObjects<'_> {
    pub fn len(&self) -> usize {
        self.trees.len() + self.bushes.len() + self.rocks.len() + self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The static world: vegetation, rocks and fences, plus the spatial queries
/// every interaction is gated on.
#[derive(Debug, Clone)]
pub struct Forest {
    pub width: f32,
    pub height: f32,
    pub trees: Vec<Tree>,
    pub bushes: Vec<Bush>,
    pub rocks: Vec<Rock>,
    pub decorations: Vec<Decoration>,
    pub fences: Vec<Fence>,
    next_tree_id: u32,
}

impl Forest {
    /// An empty world of the given size
    pub fn empty(size: Vec2) -> Self {
        Self {
            width: size.x,
            height: size.y,
            trees: Vec::new(),
            bushes: Vec::new(),
            rocks: Vec::new(),
            decorations: Vec::new(),
            fences: Vec::new(),
            next_tree_id: 0,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Insert a tree and hand back its id
    pub fn plant_tree(&mut self, position: Vec2, kind: TreeKind, rng: &mut impl Rng) -> u32 {
        let id = self.next_tree_id;
        self.next_tree_id += 1;
        self.trees.push(Tree::new(id, position, kind, rng));
        id
    }

    pub fn tree(&self, id: u32) -> Option<&Tree> {
        self.trees.iter().find(|t| t.id == id)
    }

    pub fn tree_mut(&mut self, id: u32) -> Option<&mut Tree> {
        self.trees.iter_mut().find(|t| t.id == id)
    }

    pub fn in_bounds(&self, pos: Vec2, radius: f32) -> bool {
        pos.x - radius >= 0.0
            && pos.y - radius >= 0.0
            && pos.x + radius <= self.width
            && pos.y + radius <= self.height
    }

    fn touches_fence(&self, pos: Vec2, radius: f32) -> bool {
        self.fences.iter().any(|f| f.overlaps(pos, radius))
    }

    fn touches_rock(&self, pos: Vec2, radius: f32) -> bool {
        self.rocks
            .iter()
            .any(|r| distance(pos, r.position) < radius + r.size)
    }

    /// No tree (alive or dying), rock or fence within reach of a circle at `pos`
    pub fn is_position_clear(&self, pos: Vec2, radius: f32) -> bool {
        !self
            .trees
            .iter()
            .any(|t| distance(pos, t.position) < radius + t.size)
            && !self.touches_rock(pos, radius)
            && !self.touches_fence(pos, radius)
    }

    /// Like `is_position_clear`, but felled trees that are still fading out
    /// no longer count as obstacles
    pub fn is_position_walkable(&self, pos: Vec2, radius: f32) -> bool {
        !self
            .trees
            .iter()
            .filter(|t| t.is_alive())
            .any(|t| distance(pos, t.position) < radius + t.size)
            && !self.touches_rock(pos, radius)
            && !self.touches_fence(pos, radius)
    }

    /// Movement check for anything walking around: the world edge, fences
    /// and rocks block, tree canopies do not
    pub fn is_blocked(&self, pos: Vec2, radius: f32) -> bool {
        !self.in_bounds(pos, radius) || self.touches_fence(pos, radius) || self.touches_rock(pos, radius)
    }

    pub fn objects_in_area(&self, center: Vec2, radius: f32) -> AreaObjects<'_> {
        AreaObjects {
            trees: self
                .trees
                .iter()
                .filter(|t| distance(t.position, center) <= radius)
                .collect(),
            bushes: self
                .bushes
                .iter()
                .filter(|b| distance(b.position, center) <= radius)
                .collect(),
            rocks: self
                .rocks
                .iter()
                .filter(|r| distance(r.position, center) <= radius)
                .collect(),
            decorations: self
                .decorations
                .iter()
                .filter(|d| distance(d.position, center) <= radius)
                .collect(),
        }
    }

    /// Closest standing tree strictly within `max_distance`
    pub fn nearest_living_tree(&self, pos: Vec2, max_distance: f32) -> Option<u32> {
        self.trees
            .iter()
            .filter(|t| t.is_alive())
            .map(|t| (t.id, distance(pos, t.position)))
            .filter(|(_, d)| *d < max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn living_tree_count(&self) -> usize {
        self.trees.iter().filter(|t| t.is_alive()).count()
    }

    /// Random point inside the world shrunk by `margin` on every side
    pub fn random_point(&self, margin: f32, rng: &mut impl Rng) -> Vec2 {
        let min = Vec2::splat(margin);
        let max = (self.size() - Vec2::splat(margin)).max(min);
        random_point_in_rect(min, max, rng)
    }

    /// Rejection-sample a walkable point at least `margin` from the edges
    pub fn find_walkable_point(
        &self,
        margin: f32,
        radius: f32,
        attempts: usize,
        rng: &mut impl Rng,
    ) -> Option<Vec2> {
        (0..attempts)
            .map(|_| self.random_point(margin, rng))
            .find(|pos| self.in_bounds(*pos, radius) && self.is_position_walkable(*pos, radius))
    }

    /// Per-tick world update: decay felled trees and occasionally regrow one
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        let before = self.trees.len();
        self.trees.retain_mut(|tree| !tree.decay(dt));
        let removed = before - self.trees.len();
        if removed > 0 {
            debug!("[World] Removed {} felled tree(s), {} left", removed, self.trees.len());
        }

        if rng.gen_bool(REGROWTH_CHANCE) {
            self.try_regrow_tree(rng);
        }
    }

    /// Attempt one regrowth: a single candidate, skipped if it isn't clear
    pub fn try_regrow_tree(&mut self, rng: &mut impl Rng) -> Option<u32> {
        if self.trees.len() >= REGROWTH_TREE_CAP {
            return None;
        }
        let pos = self.random_point(50.0, rng);
        if !self.is_position_clear(pos, REGROWTH_CLEARANCE) {
            return None;
        }
        let kind = if rng.gen_bool(REGROWTH_SMALL_CHANCE) {
            TreeKind::Small
        } else {
            TreeKind::Big
        };
        let id = self.plant_tree(pos, kind, rng);
        info!("[World] A {:?} tree regrew at ({:.0}, {:.0})", kind, pos.x, pos.y);
        Some(id)
    }
}
