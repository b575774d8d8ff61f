use crate::config::*;
use crate::geometry::{distance, escape_point, normalize_or_zero};
use crate::player::Player;
use crate::species::{BehaviorKind, Species, SpeciesProfile, Theft};
use crate::world::Forest;
use bevy::prelude::*;
use rand::Rng;

/// Goblin state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoblinMode {
    Wandering,
    Stealing,
    Fleeing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThiefState {
    pub mode: GoblinMode,
    pub steal_cooldown: f32,
    pub flee_timer: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkittishState {
    pub cooldown: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredatorState {
    pub attack_cooldown: f32,
    pub chasing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TricksterState {
    pub teleport_timer: f32,
    pub teleport_interval: f32,
    pub interaction_cooldown: f32,
}

/// Per-kind behavior state, fully initialised when the agent is created
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    WanderSteal(ThiefState),
    WanderFlee(SkittishState),
    ProximityAggro(PredatorState),
    TeleportPassive(TricksterState),
}

impl Behavior {
    fn for_kind(kind: BehaviorKind, rng: &mut impl Rng) -> Self {
        match kind {
            BehaviorKind::WanderSteal => Behavior::WanderSteal(ThiefState {
                mode: GoblinMode::Wandering,
                steal_cooldown: 0.0,
                flee_timer: 0.0,
            }),
            BehaviorKind::WanderFlee => Behavior::WanderFlee(SkittishState { cooldown: 0.0 }),
            BehaviorKind::ProximityAggro => Behavior::ProximityAggro(PredatorState {
                attack_cooldown: 0.0,
                chasing: false,
            }),
            BehaviorKind::TeleportPassive => Behavior::TeleportPassive(TricksterState {
                teleport_timer: 0.0,
                teleport_interval: draw_teleport_interval(rng),
                interaction_cooldown: 0.0,
            }),
        }
    }
}

fn draw_teleport_interval(rng: &mut impl Rng) -> f32 {
    rng.gen_range(LEPRECHAUN_TELEPORT_INTERVAL.0..=LEPRECHAUN_TELEPORT_INTERVAL.1)
}

/// Something an agent did to the player this tick
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Theft { species: Species, coins: u32, wood: u32 },
    Bite { damage: u32 },
    Teleported { to: Vec2 },
}

impl AgentEvent {
    /// HUD line for the event, if the player should hear about it
    pub fn describe(&self) -> Option<String> {
        match self {
            AgentEvent::Theft { species, coins, wood } if *coins > 0 || *wood > 0 => Some(
                format!("A {} stole {} coins and {} wood!", species.name(), coins, wood),
            ),
            AgentEvent::Theft { .. } => None,
            AgentEvent::Bite { damage } => Some(format!("A bear mauled you for {} damage!", damage)),
            AgentEvent::Teleported { .. } => None,
        }
    }
}

/// A creature in the world
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: u32,
    pub species: Species,
    pub position: Vec2,
    pub target_position: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub wander_timer: f32,
    pub behavior: Behavior,
    pub(crate) removed: bool,
}

impl Agent {
    pub fn new(id: u32, species: Species, position: Vec2, rng: &mut impl Rng) -> Self {
        let profile = species.profile();
        Self {
            id,
            species,
            position,
            target_position: position,
            speed: profile.speed,
            radius: profile.radius,
            wander_timer: 0.0,
            behavior: Behavior::for_kind(profile.behavior, rng),
            removed: false,
        }
    }

    pub fn profile(&self) -> SpeciesProfile {
        self.species.profile()
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn goblin_mode(&self) -> Option<GoblinMode> {
        match &self.behavior {
            Behavior::WanderSteal(state) => Some(state.mode),
            _ => None,
        }
    }

    /// Seconds until a leprechaun will deal with the player again
    pub fn interaction_cooldown(&self) -> Option<f32> {
        match &self.behavior {
            Behavior::TeleportPassive(state) => Some(state.interaction_cooldown.max(0.0)),
            _ => None,
        }
    }

    /// A leprechaun whose interaction cooldown has run out
    pub fn ready_to_interact(&self) -> bool {
        self.interaction_cooldown() == Some(0.0)
    }

    pub fn reset_interaction_cooldown(&mut self) {
        if let Behavior::TeleportPassive(state) = &mut self.behavior {
            state.interaction_cooldown = LEPRECHAUN_COOLDOWN;
        }
    }

    /// Short label for what the agent is up to
    pub fn activity(&self) -> &'static str {
        match &self.behavior {
            Behavior::WanderSteal(s) => match s.mode {
                GoblinMode::Wandering => "wandering",
                GoblinMode::Stealing => "stealing",
                GoblinMode::Fleeing => "fleeing",
            },
            Behavior::WanderFlee(s) if s.cooldown > 0.0 => "fleeing",
            Behavior::WanderFlee(_) => "wandering",
            Behavior::ProximityAggro(s) if s.chasing => "chasing",
            Behavior::ProximityAggro(_) => "wandering",
            Behavior::TeleportPassive(s) if s.interaction_cooldown > 0.0 => "resting",
            Behavior::TeleportPassive(_) => "idle",
        }
    }

    /// Advance this agent by one tick. Only the agent itself and, when it
    /// succeeds at something, the player are mutated.
    pub fn update(
        &mut self,
        dt: f32,
        player: &mut Player,
        forest: &Forest,
        rng: &mut impl Rng,
    ) -> Option<AgentEvent> {
        let player_distance = distance(self.position, player.position);
        let profile = self.profile();

        // Take the behavior out so the routines can borrow `self` freely
        let mut behavior = std::mem::replace(
            &mut self.behavior,
            Behavior::WanderFlee(SkittishState { cooldown: 0.0 }),
        );
        let event = match &mut behavior {
            Behavior::WanderSteal(state) => {
                self.update_thief(state, &profile, dt, player_distance, player, forest, rng)
            }
            Behavior::WanderFlee(state) => {
                self.update_skittish(state, &profile, dt, player_distance, player, forest, rng)
            }
            Behavior::ProximityAggro(state) => {
                self.update_predator(state, &profile, dt, player_distance, player, forest, rng)
            }
            Behavior::TeleportPassive(state) => self.update_trickster(state, dt, forest, rng),
        };
        self.behavior = behavior;
        event
    }

    #[allow(clippy::too_many_arguments)]
    fn update_thief(
        &mut self,
        state: &mut ThiefState,
        profile: &SpeciesProfile,
        dt: f32,
        player_distance: f32,
        player: &mut Player,
        forest: &Forest,
        rng: &mut impl Rng,
    ) -> Option<AgentEvent> {
        state.steal_cooldown -= dt;
        state.flee_timer -= dt;

        match state.mode {
            GoblinMode::Wandering => {
                self.refresh_waypoint(profile, dt, rng);
                if player_distance < profile.trigger_range && state.steal_cooldown <= 0.0 {
                    state.mode = GoblinMode::Stealing;
                    self.target_position = player.position;
                    debug!("[Creatures] Goblin {} is sneaking up on the player", self.id);
                }
                self.step_towards(self.target_position, self.speed, dt, forest);
                None
            }
            GoblinMode::Stealing => {
                if player_distance < GOBLIN_STEAL_REACH {
                    let (coins, wood) = match profile.theft {
                        Some(theft) if rng.gen_bool(theft.chance) => rob(player, &theft, rng),
                        _ => (0, 0),
                    };
                    state.mode = GoblinMode::Fleeing;
                    state.flee_timer = GOBLIN_FLEE_DURATION;
                    state.steal_cooldown = profile.cooldown;
                    self.target_position =
                        escape_point(self.position, player.position, profile.escape_distance);
                    Some(AgentEvent::Theft {
                        species: self.species,
                        coins,
                        wood,
                    })
                } else {
                    self.target_position = player.position;
                    self.step_towards(player.position, self.speed, dt, forest);
                    None
                }
            }
            GoblinMode::Fleeing => {
                if state.flee_timer <= 0.0 {
                    state.mode = GoblinMode::Wandering;
                    self.wander_timer = 0.0;
                } else {
                    let speed = self.speed * GOBLIN_FLEE_SPEED_MULTIPLIER;
                    self.step_towards(self.target_position, speed, dt, forest);
                }
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn update_skittish(
        &mut self,
        state: &mut SkittishState,
        profile: &SpeciesProfile,
        dt: f32,
        player_distance: f32,
        player: &mut Player,
        forest: &Forest,
        rng: &mut impl Rng,
    ) -> Option<AgentEvent> {
        state.cooldown -= dt;
        let mut event = None;

        if player_distance < profile.trigger_range && state.cooldown <= 0.0 {
            if let Some(theft) = profile.theft {
                let (coins, wood) = if rng.gen_bool(theft.chance) {
                    rob(player, &theft, rng)
                } else {
                    (0, 0)
                };
                event = Some(AgentEvent::Theft {
                    species: self.species,
                    coins,
                    wood,
                });
            }
            state.cooldown = profile.cooldown;
            self.target_position =
                escape_point(self.position, player.position, profile.escape_distance);
        } else {
            self.refresh_waypoint(profile, dt, rng);
        }

        self.step_towards(self.target_position, self.speed, dt, forest);
        event
    }

    #[allow(clippy::too_many_arguments)]
    fn update_predator(
        &mut self,
        state: &mut PredatorState,
        profile: &SpeciesProfile,
        dt: f32,
        player_distance: f32,
        player: &mut Player,
        forest: &Forest,
        rng: &mut impl Rng,
    ) -> Option<AgentEvent> {
        state.attack_cooldown -= dt;

        if player_distance < profile.trigger_range {
            state.chasing = true;
            self.target_position = player.position;
            self.step_towards(player.position, self.speed, dt, forest);

            if player_distance < BEAR_ATTACK_RANGE && state.attack_cooldown <= 0.0 {
                let damage = player.take_damage(BEAR_DAMAGE);
                state.attack_cooldown = profile.cooldown;
                return Some(AgentEvent::Bite { damage });
            }
            None
        } else {
            state.chasing = false;
            self.refresh_waypoint(profile, dt, rng);
            let speed = self.speed * BEAR_WANDER_SPEED_MULTIPLIER;
            self.step_towards(self.target_position, speed, dt, forest);
            None
        }
    }

    fn update_trickster(
        &mut self,
        state: &mut TricksterState,
        dt: f32,
        forest: &Forest,
        rng: &mut impl Rng,
    ) -> Option<AgentEvent> {
        state.teleport_timer += dt;
        state.interaction_cooldown -= dt;

        if state.teleport_timer < state.teleport_interval {
            return None;
        }

        state.teleport_timer = 0.0;
        state.teleport_interval = draw_teleport_interval(rng);

        let destination = forest.random_point(LEPRECHAUN_REGION_MARGIN, rng);
        if forest.is_blocked(destination, self.radius) {
            return None;
        }
        self.position = destination;
        self.target_position = destination;
        debug!(
            "[Creatures] Leprechaun {} teleported to ({:.0}, {:.0})",
            self.id, destination.x, destination.y
        );
        Some(AgentEvent::Teleported { to: destination })
    }

    /// Pick a fresh random waypoint every `wander_interval` seconds
    fn refresh_waypoint(&mut self, profile: &SpeciesProfile, dt: f32, rng: &mut impl Rng) {
        self.wander_timer += dt;
        if self.wander_timer >= profile.wander_interval {
            let offset = profile.wander_offset;
            self.target_position = self.position
                + Vec2::new(rng.gen_range(-offset..=offset), rng.gen_range(-offset..=offset));
            self.wander_timer = 0.0;
        }
    }

    /// Move toward `target`. Counts as arrived within the arrival threshold,
    /// and a step into a blocked spot is dropped. Returns whether it moved.
    fn step_towards(&mut self, target: Vec2, speed: f32, dt: f32, forest: &Forest) -> bool {
        let direction = target - self.position;
        if direction.length() <= ARRIVAL_THRESHOLD {
            return false;
        }
        let candidate = self.position + normalize_or_zero(direction) * speed * dt;
        if forest.is_blocked(candidate, self.radius) {
            return false;
        }
        self.position = candidate;
        true
    }
}

/// Take what the thief can carry, never more than the player has
fn rob(player: &mut Player, theft: &Theft, rng: &mut impl Rng) -> (u32, u32) {
    let coins = rng.gen_range(theft.coins.0..=theft.coins.1);
    let wood = rng.gen_range(theft.wood.0..=theft.wood.1);
    player.surrender(coins, wood)
}
