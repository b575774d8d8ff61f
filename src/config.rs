//! Configuration constants for the forest lumberjack game

use bevy::prelude::*;

// ============================================================================
// SCREEN & SESSION
// ============================================================================

/// Default viewport width in pixels
pub const SCREEN_WIDTH: f32 = 1024.0;

/// Default viewport height in pixels
pub const SCREEN_HEIGHT: f32 = 768.0;

/// Coins needed to win a session
pub const TARGET_COINS: u32 = 500;

/// Simulation ticks per second (fixed timestep)
pub const TICK_RATE_HZ: f64 = 60.0;

/// Camera follow smoothing factor applied once per tick
pub const CAMERA_SMOOTHING: f32 = 0.1;

/// Attempts to find a walkable spawn point before falling back
pub const SPAWN_SEARCH_ATTEMPTS: usize = 1000;

/// Spawn point used when the search is exhausted
pub const FALLBACK_SPAWN: Vec2 = Vec2::new(400.0, 300.0);

/// Margin kept between the spawn search area and the world edge
pub const SPAWN_MARGIN: f32 = 100.0;

/// Where the trader's tent stands
pub const TRADER_POSITION: Vec2 = Vec2::new(200.0, 200.0);

/// How long a gameplay notice stays on the HUD, in seconds
pub const NOTICE_DURATION: f32 = 3.0;

/// Maximum notices kept for the HUD
pub const MAX_NOTICES: usize = 4;

// ============================================================================
// WORLD GENERATION
// ============================================================================

/// Size of one density field cell in world units
pub const DENSITY_CELL_SIZE: f32 = 20.0;

/// Base frequency of the density field
pub const DENSITY_SCALE: f32 = 0.1;

/// Range of tree placement candidates per world
pub const TREE_CANDIDATES: (usize, usize) = (150, 250);

/// Minimum spacing between two trees
pub const TREE_MIN_SPACING: f32 = 40.0;

/// Acceptance probability multiplier applied to local density
pub const TREE_DENSITY_FACTOR: f32 = 0.8;

/// Density above which big trees can appear
pub const BIG_TREE_DENSITY: f32 = 0.6;

/// Chance of a big tree in dense areas
pub const BIG_TREE_CHANCE: f64 = 0.3;

/// Range of bush placement candidates
pub const BUSH_CANDIDATES: (usize, usize) = (50, 120);

/// Minimum distance from a bush to any tree
pub const BUSH_TREE_SPACING: f32 = 35.0;

/// Range of rock placement candidates
pub const ROCK_CANDIDATES: (usize, usize) = (30, 50);

/// Minimum distance from a rock to any tree
pub const ROCK_TREE_SPACING: f32 = 45.0;

/// Minimum distance from a rock to any bush
pub const ROCK_BUSH_SPACING: f32 = 25.0;

/// Range of decoration placement candidates
pub const DECORATION_CANDIDATES: (usize, usize) = (80, 140);

/// Minimum distance from a decoration to any rock
pub const DECORATION_ROCK_SPACING: f32 = 20.0;

/// Range of fence segments per world
pub const FENCE_COUNT: (usize, usize) = (4, 7);

/// Range of fence segment lengths
pub const FENCE_LENGTH: (f32, f32) = (80.0, 200.0);

/// Fence segment thickness
pub const FENCE_THICKNESS: f32 = 8.0;

/// Clearance kept between a fence and trees or rocks
pub const FENCE_CLEARANCE: f32 = 20.0;

/// Clearance kept between a fence and the trader camp
pub const FENCE_CAMP_CLEARANCE: f32 = 80.0;

/// Total attempts for placing all fence segments
pub const FENCE_ATTEMPTS: usize = 1000;

// ============================================================================
// TREES
// ============================================================================

/// Health of a small tree
pub const SMALL_TREE_HEALTH: i32 = 25;

/// Health of a big tree
pub const BIG_TREE_HEALTH: i32 = 75;

/// Seconds a felled tree lingers before removal
pub const TREE_DECAY_DURATION: f32 = 0.4;

/// Per-tick chance of attempting regrowth
pub const REGROWTH_CHANCE: f64 = 0.001;

/// Regrowth only happens below this tree count
pub const REGROWTH_TREE_CAP: usize = 100;

/// Clearance required for a regrown tree
pub const REGROWTH_CLEARANCE: f32 = 40.0;

/// Chance a regrown tree is small
pub const REGROWTH_SMALL_CHANCE: f64 = 0.8;

// ============================================================================
// PLAYER
// ============================================================================

/// Player collision radius
pub const PLAYER_RADIUS: f32 = 15.0;

/// Base movement speed in units per second
pub const PLAYER_BASE_SPEED: f32 = 150.0;

/// Speed multiplier granted by the better axe
pub const AXE_SPEED_MULTIPLIER: f32 = 1.3;

pub const PLAYER_MAX_HEALTH: u32 = 100;
pub const PLAYER_MAX_ENERGY: u32 = 100;
pub const PLAYER_STARTING_FOOD: u32 = 1;

/// Energy regained per regeneration interval
pub const ENERGY_REGEN_AMOUNT: u32 = 5;

/// Seconds between energy regeneration ticks
pub const ENERGY_REGEN_INTERVAL: f32 = 2.0;

/// Reach of the chop action
pub const CHOP_RANGE: f32 = 40.0;

/// Minimum energy needed to swing the axe
pub const CHOP_MIN_ENERGY: u32 = 10;

pub const CHOP_DAMAGE: i32 = 25;
pub const CHOP_ENERGY_COST: u32 = 10;
pub const AXE_CHOP_DAMAGE: i32 = 35;
pub const AXE_CHOP_ENERGY_COST: u32 = 8;

/// Wood from a felled small tree (inclusive range)
pub const SMALL_TREE_WOOD: (u32, u32) = (1, 3);

/// Wood from a felled big tree
pub const BIG_TREE_WOOD: u32 = 5;

pub const CHOP_ANIMATION_DURATION: f32 = 0.5;
pub const DAMAGE_FLASH_DURATION: f32 = 0.3;

/// Reach of the catch action
pub const CATCH_RANGE: f32 = 50.0;
pub const CATCH_CHANCE: f64 = 0.7;
pub const AXE_CATCH_CHANCE: f64 = 0.85;
pub const CATCH_REWARD_COINS: (u32, u32) = (15, 30);
pub const CATCH_REWARD_WOOD: (u32, u32) = (0, 2);
pub const CATCH_SUCCESS_COOLDOWN: f32 = 3.0;
pub const CATCH_FAIL_COOLDOWN: f32 = 1.0;

/// Energy restored by one food
pub const FOOD_ENERGY: u32 = 40;

/// Health restored by one potion
pub const POTION_HEALTH: u32 = 50;

/// Seconds of damage protection per purchase
pub const PROTECTION_DURATION: f32 = 60.0;

// ============================================================================
// CREATURES
// ============================================================================

/// Distance under which a moving creature counts as arrived
pub const ARRIVAL_THRESHOLD: f32 = 2.0;

/// Attempts to find an unblocked creature spawn point
pub const CREATURE_SPAWN_ATTEMPTS: usize = 1000;

pub const GOBLIN_STEAL_TRIGGER: f32 = 60.0;
pub const GOBLIN_STEAL_REACH: f32 = 25.0;
pub const GOBLIN_STEAL_CHANCE: f64 = 0.6;
pub const GOBLIN_STOLEN_COINS: (u32, u32) = (5, 15);
pub const GOBLIN_STOLEN_WOOD: (u32, u32) = (0, 2);
pub const GOBLIN_FLEE_DURATION: f32 = 5.0;
pub const GOBLIN_STEAL_COOLDOWN: f32 = 10.0;
pub const GOBLIN_ESCAPE_DISTANCE: f32 = 200.0;
pub const GOBLIN_FLEE_SPEED_MULTIPLIER: f32 = 1.5;

/// Margin of the region leprechauns teleport within
pub const LEPRECHAUN_REGION_MARGIN: f32 = 100.0;
pub const LEPRECHAUN_TELEPORT_INTERVAL: (f32, f32) = (15.0, 30.0);
pub const LEPRECHAUN_INTERACT_RANGE: f32 = 50.0;
pub const LEPRECHAUN_COOLDOWN: f32 = 10.0;
pub const BOON_COINS: (u32, u32) = (20, 50);
pub const BOON_WOOD: (u32, u32) = (3, 8);
pub const BOON_HEAL: u32 = 30;

pub const BEAR_AGGRO_RANGE: f32 = 100.0;
pub const BEAR_ATTACK_RANGE: f32 = 30.0;
pub const BEAR_DAMAGE: u32 = 15;
pub const BEAR_ATTACK_COOLDOWN: f32 = 2.0;
pub const BEAR_WANDER_SPEED_MULTIPLIER: f32 = 0.5;

pub const FOX_STEAL_TRIGGER: f32 = 50.0;
pub const FOX_STEAL_CHANCE: f64 = 0.3;
pub const FOX_STOLEN_COINS: (u32, u32) = (1, 5);
pub const FOX_STEAL_COOLDOWN: f32 = 8.0;
pub const FOX_ESCAPE_DISTANCE: f32 = 150.0;

pub const RABBIT_FLEE_TRIGGER: f32 = 40.0;
pub const RABBIT_ESCAPE_DISTANCE: f32 = 100.0;

// ============================================================================
// SHOP
// ============================================================================

/// Distance at which the trader will deal with the player
pub const TRADE_RADIUS: f32 = 50.0;

/// Coins paid per unit of wood
pub const WOOD_PRICE: u32 = 5;

/// Seconds a transaction message stays visible
pub const SHOP_MESSAGE_DURATION: f32 = 3.0;

/// Session-level settings handed to constructors instead of read from disk
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub target_coins: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            target_coins: TARGET_COINS,
        }
    }
}

impl GameConfig {
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// The world is twice the viewport in each dimension
    pub fn world_size(&self) -> Vec2 {
        self.screen_size() * 2.0
    }
}
