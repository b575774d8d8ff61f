//! Per-species tuning: one table drives every creature kind.
//!
//! Creatures share a single `Agent` type; what makes a fox a fox is its
//! `SpeciesProfile`, and which behavior routine runs is picked by the
//! profile's `BehaviorKind` tag.

use crate::config::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Goblin,
    Leprechaun,
    Bear,
    Fox,
    Rabbit,
}

/// Which behavior routine a species runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    /// Wander, sneak up on the player, rob them, run off
    WanderSteal,
    /// Wander, bolt away when the player gets close, maybe pinching coins
    WanderFlee,
    /// Wander until the player is near, then chase and attack
    ProximityAggro,
    /// Stand still and teleport now and then; hands out boons on request
    TeleportPassive,
}

/// A snatch-and-run theft attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theft {
    pub chance: f64,
    pub coins: (u32, u32),
    pub wood: (u32, u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesProfile {
    pub name: &'static str,
    pub behavior: BehaviorKind,
    pub speed: f32,
    pub radius: f32,
    /// Seconds between fresh wander waypoints
    pub wander_interval: f32,
    /// Max offset of a wander waypoint on each axis
    pub wander_offset: f32,
    /// Player distance that provokes a reaction
    pub trigger_range: f32,
    /// How far the creature runs when it flees
    pub escape_distance: f32,
    /// Cooldown after reacting (steal, attack, interaction)
    pub cooldown: f32,
    pub theft: Option<Theft>,
    /// Inclusive head-count range per session
    pub population: (usize, usize),
}

impl Species {
    pub const ALL: [Species; 5] = [
        Species::Goblin,
        Species::Leprechaun,
        Species::Bear,
        Species::Fox,
        Species::Rabbit,
    ];

    pub fn profile(self) -> SpeciesProfile {
        match self {
            Species::Goblin => SpeciesProfile {
                name: "goblin",
                behavior: BehaviorKind::WanderSteal,
                speed: 80.0,
                radius: 12.0,
                wander_interval: 3.0,
                wander_offset: 80.0,
                trigger_range: GOBLIN_STEAL_TRIGGER,
                escape_distance: GOBLIN_ESCAPE_DISTANCE,
                cooldown: GOBLIN_STEAL_COOLDOWN,
                theft: Some(Theft {
                    chance: GOBLIN_STEAL_CHANCE,
                    coins: GOBLIN_STOLEN_COINS,
                    wood: GOBLIN_STOLEN_WOOD,
                }),
                population: (8, 12),
            },
            Species::Leprechaun => SpeciesProfile {
                name: "leprechaun",
                behavior: BehaviorKind::TeleportPassive,
                speed: 0.0,
                radius: 14.0,
                wander_interval: 0.0,
                wander_offset: 0.0,
                trigger_range: LEPRECHAUN_INTERACT_RANGE,
                escape_distance: 0.0,
                cooldown: LEPRECHAUN_COOLDOWN,
                theft: None,
                population: (3, 5),
            },
            Species::Bear => SpeciesProfile {
                name: "bear",
                behavior: BehaviorKind::ProximityAggro,
                speed: 60.0,
                radius: 20.0,
                wander_interval: 4.0,
                wander_offset: 100.0,
                trigger_range: BEAR_AGGRO_RANGE,
                escape_distance: 0.0,
                cooldown: BEAR_ATTACK_COOLDOWN,
                theft: None,
                population: (4, 7),
            },
            Species::Fox => SpeciesProfile {
                name: "fox",
                behavior: BehaviorKind::WanderFlee,
                speed: 120.0,
                radius: 10.0,
                wander_interval: 2.0,
                wander_offset: 60.0,
                trigger_range: FOX_STEAL_TRIGGER,
                escape_distance: FOX_ESCAPE_DISTANCE,
                cooldown: FOX_STEAL_COOLDOWN,
                theft: Some(Theft {
                    chance: FOX_STEAL_CHANCE,
                    coins: FOX_STOLEN_COINS,
                    wood: (0, 0),
                }),
                population: (8, 14),
            },
            Species::Rabbit => SpeciesProfile {
                name: "rabbit",
                behavior: BehaviorKind::WanderFlee,
                speed: 100.0,
                radius: 8.0,
                wander_interval: 3.0,
                wander_offset: 50.0,
                trigger_range: RABBIT_FLEE_TRIGGER,
                escape_distance: RABBIT_ESCAPE_DISTANCE,
                cooldown: 0.0,
                theft: None,
                population: (12, 20),
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Creatures the player should keep an eye on
    pub fn is_hostile(self) -> bool {
        matches!(self, Species::Goblin | Species::Bear | Species::Fox)
    }
}
