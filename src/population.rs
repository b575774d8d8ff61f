use crate::agent::{Agent, AgentEvent};
use crate::config::*;
use crate::geometry::distance;
use crate::player::Player;
use crate::species::Species;
use crate::world::Forest;
use bevy::prelude::*;
use rand::Rng;

/// Creatures stay this far from the player's spawn point at session start
const SPAWN_SAFE_RADIUS: f32 = 150.0;

/// Registry of every creature in the session.
///
/// Agents caught mid-tick are only marked; `compact` drops them once the
/// tick's updates are done, so indices stay stable while iterating.
#[derive(Debug, Clone, Default)]
pub struct Creatures {
    agents: Vec<Agent>,
    next_id: u32,
}

impl Creatures {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Draw a head count per species and scatter them over open ground
    pub fn spawn(forest: &Forest, player_spawn: Vec2, rng: &mut impl Rng) -> Self {
        let mut creatures = Self::empty();
        for species in Species::ALL {
            let profile = species.profile();
            let count = rng.gen_range(profile.population.0..=profile.population.1);
            for _ in 0..count {
                let pos = find_spawn(forest, player_spawn, profile.radius, rng);
                creatures.add(species, pos, rng);
            }
        }
        info!(
            "[Creatures] Spawned {} goblins, {} leprechauns, {} bears, {} foxes, {} rabbits",
            creatures.count(Species::Goblin),
            creatures.count(Species::Leprechaun),
            creatures.count(Species::Bear),
            creatures.count(Species::Fox),
            creatures.count(Species::Rabbit)
        );
        creatures
    }

    pub fn add(&mut self, species: Species, position: Vec2, rng: &mut impl Rng) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.agents.push(Agent::new(id, species, position, rng));
        id
    }

    /// Live agents, skipping any marked for removal
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter().filter(|a| !a.removed)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, species: Species) -> usize {
        self.iter().filter(|a| a.species == species).count()
    }

    pub fn get(&self, id: u32) -> Option<&Agent> {
        self.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id && !a.removed)
    }

    /// Closest live agent of `species` strictly within `max_distance` that
    /// passes `filter`
    pub fn nearest(
        &self,
        species: Species,
        pos: Vec2,
        max_distance: f32,
        filter: impl Fn(&Agent) -> bool,
    ) -> Option<u32> {
        self.iter()
            .filter(|a| a.species == species && filter(a))
            .map(|a| (a.id, distance(pos, a.position)))
            .filter(|(_, d)| *d < max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Flag an agent for removal at the end of the tick
    pub fn mark_removed(&mut self, id: u32) -> bool {
        match self.get_mut(id) {
            Some(agent) => {
                agent.removed = true;
                true
            }
            None => false,
        }
    }

    /// Drop every marked agent. Returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.agents.len();
        self.agents.retain(|a| !a.removed);
        before - self.agents.len()
    }

    /// Run one tick of every live agent, in spawn order
    pub fn update(
        &mut self,
        dt: f32,
        player: &mut Player,
        forest: &Forest,
        rng: &mut impl Rng,
    ) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        for agent in self.agents.iter_mut().filter(|a| !a.removed) {
            if let Some(event) = agent.update(dt, player, forest, rng) {
                events.push(event);
            }
        }
        events
    }
}

fn find_spawn(forest: &Forest, player_spawn: Vec2, radius: f32, rng: &mut impl Rng) -> Vec2 {
    for _ in 0..CREATURE_SPAWN_ATTEMPTS {
        let pos = forest.random_point(radius, rng);
        if !forest.is_blocked(pos, radius) && distance(pos, player_spawn) >= SPAWN_SAFE_RADIUS {
            return pos;
        }
    }
    let centre = forest.size() * 0.5;
    warn!(
        "[Creatures] No open ground after {} attempts, spawning at the world centre",
        CREATURE_SPAWN_ATTEMPTS
    );
    centre
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::GoblinMode;
    use crate::world::Fence;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn open_field() -> Forest {
        Forest::empty(Vec2::new(2048.0, 1536.0))
    }

    #[test]
    fn spawn_respects_species_ranges() {
        let forest = open_field();
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let creatures = Creatures::spawn(&forest, Vec2::new(1000.0, 800.0), &mut rng);
            for species in Species::ALL {
                let (lo, hi) = species.profile().population;
                let n = creatures.count(species);
                assert!(n >= lo && n <= hi, "{:?}: {}", species, n);
            }
        }
    }

    #[test]
    fn spawn_keeps_clear_of_fences_and_player() {
        let mut forest = open_field();
        forest.fences.push(Fence {
            min: Vec2::new(400.0, 100.0),
            max: Vec2::new(408.0, 1400.0),
        });
        let player_spawn = Vec2::new(1000.0, 800.0);
        let mut rng = StdRng::seed_from_u64(11);
        let creatures = Creatures::spawn(&forest, player_spawn, &mut rng);
        for agent in creatures.iter() {
            assert!(!forest.is_blocked(agent.position, agent.radius));
            assert!(distance(agent.position, player_spawn) >= SPAWN_SAFE_RADIUS);
        }
    }

    #[test]
    fn spawn_falls_back_to_centre_when_nothing_fits() {
        // Too small for any creature to fit inside the bounds
        let forest = Forest::empty(Vec2::new(10.0, 10.0));
        let mut rng = StdRng::seed_from_u64(1);
        let pos = find_spawn(&forest, Vec2::ZERO, 12.0, &mut rng);
        assert_eq!(pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn marked_agents_are_skipped_until_compacted() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut creatures = Creatures::empty();
        let a = creatures.add(Species::Goblin, Vec2::new(100.0, 100.0), &mut rng);
        let b = creatures.add(Species::Goblin, Vec2::new(120.0, 100.0), &mut rng);

        assert!(creatures.mark_removed(a));
        assert!(!creatures.mark_removed(a));
        assert_eq!(creatures.len(), 1);
        assert!(creatures.get(a).is_none());
        assert_eq!(
            creatures.nearest(Species::Goblin, Vec2::new(100.0, 100.0), 50.0, |_| true),
            Some(b)
        );

        assert_eq!(creatures.compact(), 1);
        assert_eq!(creatures.compact(), 0);
        assert_eq!(creatures.len(), 1);
    }

    #[test]
    fn nearest_applies_species_range_and_filter() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut creatures = Creatures::empty();
        let origin = Vec2::new(500.0, 500.0);
        let fox = creatures.add(Species::Fox, origin + Vec2::new(5.0, 0.0), &mut rng);
        let goblin_far = creatures.add(Species::Goblin, origin + Vec2::new(40.0, 0.0), &mut rng);
        let goblin_near = creatures.add(Species::Goblin, origin + Vec2::new(20.0, 0.0), &mut rng);

        assert_eq!(creatures.nearest(Species::Goblin, origin, 50.0, |_| true), Some(goblin_near));
        assert_eq!(
            creatures.nearest(Species::Goblin, origin, 50.0, |a| a.id != goblin_near),
            Some(goblin_far)
        );
        assert_eq!(creatures.nearest(Species::Goblin, origin, 20.0, |_| true), None);
        assert_eq!(creatures.nearest(Species::Fox, origin, 50.0, |_| true), Some(fox));
    }

    #[test]
    fn update_collects_events_from_every_agent() {
        let forest = open_field();
        let mut rng = StdRng::seed_from_u64(4);
        let mut creatures = Creatures::empty();
        let mut player = Player::new(Vec2::new(500.0, 500.0));
        creatures.add(Species::Bear, Vec2::new(510.0, 500.0), &mut rng);
        creatures.add(Species::Bear, Vec2::new(490.0, 500.0), &mut rng);
        let goblin = creatures.add(Species::Goblin, Vec2::new(540.0, 500.0), &mut rng);

        let events = creatures.update(1.0 / 60.0, &mut player, &forest, &mut rng);
        assert_eq!(events.len(), 2);
        assert_eq!(player.health, PLAYER_MAX_HEALTH - 2 * BEAR_DAMAGE);
        assert_eq!(creatures.get(goblin).and_then(|g| g.goblin_mode()), Some(GoblinMode::Stealing));
    }
}
