//! One play-through: the world, the player, the creatures and the trader,
//! plus the fixed-step tick that advances them together.

use crate::agent::AgentEvent;
use crate::config::*;
use crate::error::ActionError;
use crate::geometry::distance;
use crate::player::{ChopOutcome, MoveInput, Player};
use crate::population::Creatures;
use crate::shop::{ItemKind, ShopSystem, Tone, TradeMessage, is_trader_nearby};
use crate::generation::generate_forest;
use crate::species::Species;
use crate::world::{Forest, TreeKind};
use bevy::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Discrete player commands, queued by input and drained by the tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Chop,
    SellWood,
    UseFood,
    UsePotion,
    CatchGoblin,
    InteractLeprechaun,
    ToggleShop,
    QuickBuy(ItemKind),
}

impl Action {
    /// Actions that only work standing at the trader's camp
    pub fn needs_trader(self) -> bool {
        matches!(self, Action::SellWood | Action::ToggleShop | Action::QuickBuy(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Victory,
    GameOver,
}

/// Short-lived gameplay message for the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub tone: Tone,
    pub remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    pub position: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub coins: u32,
    pub wood: u32,
    pub food: u32,
    pub potions: u32,
    pub has_better_axe: bool,
    pub protection_remaining: Option<f32>,
    pub catch_cooldown: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeView {
    pub id: u32,
    pub position: Vec2,
    pub kind: TreeKind,
    pub size: f32,
    pub health_ratio: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub id: u32,
    pub species: Species,
    pub position: Vec2,
    pub activity: &'static str,
}

/// Read-only view of a session for the HUD
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub player: PlayerStats,
    pub target_coins: u32,
    pub trader_nearby: bool,
    pub shop_active: bool,
    pub shop_message: Option<TradeMessage>,
    pub notices: Vec<Notice>,
    pub trees: Vec<TreeView>,
    pub agents: Vec<AgentView>,
    pub living_trees: usize,
    pub creatures: usize,
    pub elapsed: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct Session {
    pub config: GameConfig,
    pub forest: Forest,
    pub player: Player,
    pub creatures: Creatures,
    pub shop: ShopSystem,
    pub trader_position: Vec2,
    /// Top-left corner of the view, in world coordinates
    pub camera: Vec2,
    pub elapsed: f32,
    notices: Vec<Notice>,
}

impl Session {
    /// Generate a fresh world and populate it
    pub fn new(config: GameConfig, rng: &mut impl Rng) -> Self {
        let forest = generate_forest(config.world_size(), rng);
        let spawn = find_spawn_point(&forest, rng);
        let creatures = Creatures::spawn(&forest, spawn, rng);
        info!(
            "[Session] New game: player at ({:.0}, {:.0}), {} creatures",
            spawn.x,
            spawn.y,
            creatures.len()
        );
        Self::from_parts(config, forest, Player::new(spawn), creatures)
    }

    /// Assemble a session from prebuilt pieces
    pub fn from_parts(config: GameConfig, forest: Forest, player: Player, creatures: Creatures) -> Self {
        let camera = player.position - config.screen_size() / 2.0;
        Self {
            config,
            forest,
            player,
            creatures,
            shop: ShopSystem::new(),
            trader_position: TRADER_POSITION,
            camera,
            elapsed: 0.0,
            notices: Vec::new(),
        }
    }

    pub fn trader_nearby(&self) -> bool {
        is_trader_nearby(self.player.position, self.trader_position, TRADE_RADIUS)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn notify(&mut self, text: impl Into<String>, tone: Tone) {
        self.notices.push(Notice {
            text: text.into(),
            tone,
            remaining: NOTICE_DURATION,
        });
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
    }

    /// Run a single player command. Failures leave the game untouched and
    /// are reported as a notice or shop message.
    pub fn apply_action(&mut self, action: Action, rng: &mut impl Rng) -> Result<(), ActionError> {
        if action.needs_trader() && !self.trader_nearby() {
            let err = ActionError::TraderTooFar;
            self.notify(err.to_string(), Tone::Failure);
            return Err(err);
        }

        let result = match action {
            Action::Chop => self
                .player
                .try_chop_tree(&mut self.forest, rng)
                .map(|outcome| {
                    if let ChopOutcome::Felled { wood, .. } = outcome {
                        self.notify(format!("Timber! +{} wood", wood), Tone::Success);
                    }
                }),
            Action::CatchGoblin => self
                .player
                .try_catch_goblin(&mut self.creatures, rng)
                .map(|reward| {
                    self.notify(
                        format!("Caught a goblin! +{} coins, +{} wood", reward.coins, reward.wood),
                        Tone::Success,
                    );
                }),
            Action::InteractLeprechaun => self
                .player
                .interact_with_leprechaun(&mut self.creatures, &self.forest, rng)
                .map(|boon| self.notify(boon.describe(), Tone::Success)),
            Action::UseFood => self
                .player
                .use_food()
                .map(|gain| self.notify(format!("Ate some food, +{} energy", gain), Tone::Success)),
            Action::UsePotion => self
                .player
                .use_potion()
                .map(|gain| self.notify(format!("Drank a potion, +{} health", gain), Tone::Success)),
            // Trade outcomes surface through the shop's own message
            Action::SellWood => return self.shop.sell_wood(&mut self.player).map(|_| ()),
            Action::QuickBuy(kind) => return self.shop.buy_item(&mut self.player, kind).map(|_| ()),
            Action::ToggleShop => {
                if self.shop.shop_active {
                    self.shop.close();
                } else {
                    self.shop.open();
                }
                return Ok(());
            }
        };

        if let Err(err) = &result {
            debug!("[Session] {:?} refused: {}", action, err);
            self.notify(err.to_string(), Tone::Failure);
        }
        result
    }

    /// Advance the whole game by `dt` seconds
    pub fn tick(
        &mut self,
        dt: f32,
        movement: MoveInput,
        actions: &[Action],
        rng: &mut impl Rng,
    ) -> SessionStatus {
        for action in actions {
            // Refusals are already reported to the player
            let _ = self.apply_action(*action, rng);
        }

        self.player.handle_input(movement);
        self.player.update(dt, &self.forest);
        self.forest.update(dt, rng);

        let events = self.creatures.update(dt, &mut self.player, &self.forest, rng);
        for event in events {
            self.report(event);
        }
        self.creatures.compact();

        let nearby = self.trader_nearby();
        self.shop.update(dt, nearby);

        let target = self.player.position - self.config.screen_size() / 2.0;
        self.camera += (target - self.camera) * CAMERA_SMOOTHING;

        for notice in &mut self.notices {
            notice.remaining -= dt;
        }
        self.notices.retain(|n| n.remaining > 0.0);
        self.elapsed += dt;

        self.status()
    }

    fn report(&mut self, event: AgentEvent) {
        match &event {
            AgentEvent::Theft { species, coins, wood } if *coins > 0 || *wood > 0 => {
                info!("[Creatures] A {} stole {} coins and {} wood", species.name(), coins, wood);
            }
            AgentEvent::Bite { damage } => {
                info!("[Creatures] Bear attack for {} damage, health now {}", damage, self.player.health);
            }
            _ => {}
        }
        if let Some(text) = event.describe() {
            self.notify(text, Tone::Failure);
        }
    }

    pub fn status(&self) -> SessionStatus {
        if self.player.coins >= self.config.target_coins {
            SessionStatus::Victory
        } else if self.player.is_dead() {
            SessionStatus::GameOver
        } else {
            SessionStatus::Running
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let p = &self.player;
        Snapshot {
            player: PlayerStats {
                position: p.position,
                health: p.health,
                max_health: p.max_health,
                energy: p.energy,
                max_energy: p.max_energy,
                coins: p.coins,
                wood: p.wood,
                food: p.food_count,
                potions: p.potion_count,
                has_better_axe: p.has_better_axe,
                protection_remaining: p.has_protection.then_some(p.protection_timer),
                catch_cooldown: p.catch_cooldown,
            },
            target_coins: self.config.target_coins,
            trader_nearby: self.trader_nearby(),
            shop_active: self.shop.shop_active,
            shop_message: self.shop.message().cloned(),
            notices: self.notices.clone(),
            trees: self
                .forest
                .trees
                .iter()
                .map(|t| TreeView {
                    id: t.id,
                    position: t.position,
                    kind: t.kind,
                    size: t.size,
                    health_ratio: t.health_ratio(),
                    alive: t.is_alive(),
                })
                .collect(),
            agents: self
                .creatures
                .iter()
                .map(|a| AgentView {
                    id: a.id,
                    species: a.species,
                    position: a.position,
                    activity: a.activity(),
                })
                .collect(),
            living_trees: self.forest.living_tree_count(),
            creatures: self.creatures.len(),
            elapsed: self.elapsed,
        }
    }
}

/// Open ground for the player, or the fixed fallback spot
pub fn find_spawn_point(forest: &Forest, rng: &mut impl Rng) -> Vec2 {
    forest
        .find_walkable_point(SPAWN_MARGIN, PLAYER_RADIUS, SPAWN_SEARCH_ATTEMPTS, rng)
        .unwrap_or_else(|| {
            warn!("[Session] No clear spawn point found, using the fallback");
            FALLBACK_SPAWN
        })
}

/// Build a seeded game, verify world generation, then play a scripted
/// stretch and verify the player's stats stayed sane throughout.
pub fn self_check() -> bool {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let config = GameConfig::default();
    let mut session = Session::new(config, &mut rng);
    let mut ok = true;

    let trees = &session.forest.trees;
    for (i, a) in trees.iter().enumerate() {
        if trees[i + 1..]
            .iter()
            .any(|b| distance(a.position, b.position) < TREE_MIN_SPACING)
        {
            warn!("[Session] Self-check: trees {} placed too close together", a.id);
            ok = false;
        }
    }
    for rock in &session.forest.rocks {
        if trees.iter().any(|t| distance(rock.position, t.position) < ROCK_TREE_SPACING) {
            warn!("[Session] Self-check: rock at {:?} crowds a tree", rock.position);
            ok = false;
        }
    }
    if !session.forest.in_bounds(session.player.position, PLAYER_RADIUS) {
        warn!("[Session] Self-check: player spawned outside the world");
        ok = false;
    }

    let script = [
        MoveInput { right: true, ..default() },
        MoveInput { down: true, ..default() },
        MoveInput { left: true, up: true, ..default() },
        MoveInput::default(),
    ];
    let dt = 1.0 / TICK_RATE_HZ as f32;
    for i in 0..600 {
        let movement = script[(i / 150) % script.len()];
        let actions: &[Action] = match i % 60 {
            0 => &[Action::Chop],
            20 => &[Action::CatchGoblin],
            40 => &[Action::InteractLeprechaun, Action::UseFood],
            _ => &[],
        };
        if session.tick(dt, movement, actions, &mut rng) != SessionStatus::Running {
            break;
        }

        let p = &session.player;
        if p.health > p.max_health || p.energy > p.max_energy {
            warn!("[Session] Self-check: stats out of range at tick {}", i);
            ok = false;
        }
        if !session.forest.in_bounds(p.position, PLAYER_RADIUS) {
            warn!("[Session] Self-check: player left the world at tick {}", i);
            ok = false;
        }
    }

    info!(
        "[Session] Self-check {} after {:.1}s of play",
        if ok { "passed" } else { "failed" },
        session.elapsed
    );
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_session(player_pos: Vec2) -> Session {
        let config = GameConfig::default();
        let forest = Forest::empty(config.world_size());
        Session::from_parts(config, forest, Player::new(player_pos), Creatures::empty())
    }

    #[test]
    fn new_session_is_populated() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = Session::new(GameConfig::default(), &mut rng);
        assert!(!session.forest.trees.is_empty());
        assert!(!session.creatures.is_empty());
        assert_eq!(session.trader_position, TRADER_POSITION);
        assert_eq!(session.status(), SessionStatus::Running);
        let pos = session.player.position;
        assert!(
            pos == FALLBACK_SPAWN
                || session.forest.is_position_walkable(pos, PLAYER_RADIUS)
        );
    }

    #[test]
    fn spawn_falls_back_when_world_is_full() {
        let mut forest = Forest::empty(Vec2::new(2048.0, 1536.0));
        forest.rocks.push(crate::world::Rock {
            position: Vec2::new(1024.0, 768.0),
            size: 5000.0,
        });
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(find_spawn_point(&forest, &mut rng), FALLBACK_SPAWN);
    }

    #[test]
    fn trade_actions_need_the_trader() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = quiet_session(Vec2::new(600.0, 600.0));
        session.player.wood = 4;
        assert_eq!(
            session.apply_action(Action::SellWood, &mut rng),
            Err(ActionError::TraderTooFar)
        );
        assert_eq!(session.player.wood, 4);
        assert_eq!(session.notices().len(), 1);

        session.player.position = TRADER_POSITION + Vec2::new(30.0, 0.0);
        assert_eq!(session.apply_action(Action::SellWood, &mut rng), Ok(()));
        assert_eq!(session.player.coins, 20);
        assert_eq!(
            session.apply_action(Action::QuickBuy(ItemKind::Food), &mut rng),
            Ok(())
        );
        assert_eq!((session.player.coins, session.player.food_count), (10, 2));
    }

    #[test]
    fn shop_toggles_and_closes_when_walking_away() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = quiet_session(TRADER_POSITION);
        session.apply_action(Action::ToggleShop, &mut rng).unwrap();
        assert!(session.shop.shop_active);

        session.player.position = Vec2::new(800.0, 800.0);
        session.tick(DT, MoveInput::default(), &[], &mut rng);
        assert!(!session.shop.shop_active);
    }

    #[test]
    fn reaching_the_target_wins() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = quiet_session(TRADER_POSITION);
        session.player.wood = 100;
        let status = session.tick(DT, MoveInput::default(), &[Action::SellWood], &mut rng);
        assert_eq!(status, SessionStatus::Victory);
    }

    #[test]
    fn dying_loses() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut session = quiet_session(Vec2::new(800.0, 800.0));
        session.player.take_damage(1000);
        assert_eq!(session.tick(DT, MoveInput::default(), &[], &mut rng), SessionStatus::GameOver);
    }

    #[test]
    fn felled_trees_leave_the_world() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = quiet_session(Vec2::new(800.0, 800.0));
        let id = session
            .forest
            .plant_tree(Vec2::new(820.0, 800.0), TreeKind::Small, &mut rng);

        session.tick(DT, MoveInput::default(), &[Action::Chop], &mut rng);
        assert!(session.forest.tree(id).unwrap().is_dying());
        assert!(session.notices()[0].text.starts_with("Timber!"));

        for _ in 0..30 {
            session.tick(DT, MoveInput::default(), &[], &mut rng);
        }
        assert!(session.forest.tree(id).is_none());
    }

    #[test]
    fn caught_goblins_are_gone_after_the_tick() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = quiet_session(Vec2::new(800.0, 800.0));
        for _ in 0..20 {
            session
                .creatures
                .add(Species::Goblin, Vec2::new(830.0, 800.0), &mut rng);
        }
        let before = session.creatures.len();
        let mut caught = false;
        for _ in 0..10 {
            session.player.catch_cooldown = 0.0;
            session.player.position = Vec2::new(800.0, 800.0);
            if session.apply_action(Action::CatchGoblin, &mut rng).is_ok() {
                caught = true;
                break;
            }
        }
        assert!(caught);
        assert_eq!(session.creatures.len(), before - 1);
    }

    #[test]
    fn bear_bites_show_up_as_notices() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut session = quiet_session(Vec2::new(800.0, 800.0));
        session
            .creatures
            .add(Species::Bear, Vec2::new(815.0, 800.0), &mut rng);
        session.tick(DT, MoveInput::default(), &[], &mut rng);
        assert_eq!(session.player.health, PLAYER_MAX_HEALTH - BEAR_DAMAGE);
        let snap = session.snapshot();
        assert_eq!(snap.notices.len(), 1);
        assert_eq!(snap.player.health, PLAYER_MAX_HEALTH - BEAR_DAMAGE);
    }

    #[test]
    fn notices_expire_and_are_capped() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut session = quiet_session(Vec2::new(800.0, 800.0));
        for i in 0..6 {
            session.notify(format!("notice {}", i), Tone::Success);
        }
        assert_eq!(session.notices().len(), MAX_NOTICES);
        assert_eq!(session.notices()[0].text, "notice 2");

        session.tick(NOTICE_DURATION + 0.1, MoveInput::default(), &[], &mut rng);
        assert!(session.notices().is_empty());
    }

    #[test]
    fn camera_eases_toward_the_player() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = quiet_session(Vec2::new(800.0, 800.0));
        let start = session.camera;
        session.player.position = Vec2::new(900.0, 800.0);
        session.tick(DT, MoveInput::default(), &[], &mut rng);
        assert!((session.camera.x - (start.x + 10.0)).abs() < 1e-3);
        assert_eq!(session.camera.y, start.y);
    }

    #[test]
    fn failed_actions_change_nothing() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut session = quiet_session(Vec2::new(800.0, 800.0));
        let before = session.player.clone();
        assert_eq!(session.apply_action(Action::UseFood, &mut rng), Err(ActionError::EnergyFull));
        assert_eq!(session.apply_action(Action::UsePotion, &mut rng), Err(ActionError::NoPotion));
        assert_eq!(
            session.apply_action(Action::Chop, &mut rng),
            Err(ActionError::NothingInRange("tree"))
        );
        assert_eq!(session.player.food_count, before.food_count);
        assert_eq!(session.player.energy, before.energy);
        assert_eq!(session.notices().len(), 3);
    }

    #[test]
    fn snapshot_lists_trees_and_creatures() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut session = quiet_session(Vec2::new(800.0, 800.0));
        let small = session.forest.plant_tree(Vec2::new(300.0, 300.0), TreeKind::Small, &mut rng);
        let big = session.forest.plant_tree(Vec2::new(600.0, 300.0), TreeKind::Big, &mut rng);
        session.forest.tree_mut(big).unwrap().apply_damage(CHOP_DAMAGE);
        let fox = session.creatures.add(Species::Fox, Vec2::new(1200.0, 900.0), &mut rng);

        let snap = session.snapshot();
        assert_eq!(snap.trees.len(), 2);
        let tree = |id| snap.trees.iter().find(|t| t.id == id).unwrap();
        assert_eq!(tree(small).health_ratio, 1.0);
        assert!((tree(big).health_ratio - 50.0 / 75.0).abs() < 1e-5);
        assert!(tree(big).alive);

        assert_eq!(snap.agents.len(), 1);
        let agent = snap.agents[0];
        assert_eq!((agent.id, agent.species), (fox, Species::Fox));
        assert_eq!(agent.position, Vec2::new(1200.0, 900.0));
        assert_eq!(agent.activity, "wandering");
    }

    #[test]
    fn self_check_passes() {
        assert!(self_check());
    }
}
