use crate::config::*;
use crate::error::ActionError;
use crate::geometry::normalize_or_zero;
use crate::population::Creatures;
use crate::shop::ItemKind;
use crate::species::Species;
use crate::world::{Forest, TreeKind};
use bevy::prelude::*;
use rand::Rng;

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChopOutcome {
    Damaged { tree_id: u32, remaining: i32 },
    Felled { tree_id: u32, wood: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchReward {
    pub coins: u32,
    pub wood: u32,
}

/// What a leprechaun hands out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boon {
    Coins(u32),
    Wood(u32),
    /// Health actually restored, after capping
    Heal(u32),
    Teleport(Vec2),
}

impl Boon {
    pub fn describe(&self) -> String {
        match self {
            Boon::Coins(n) => format!("The leprechaun gave you {} coins!", n),
            Boon::Wood(n) => format!("The leprechaun gave you {} wood!", n),
            Boon::Heal(n) => format!("The leprechaun healed you for {} health!", n),
            Boon::Teleport(_) => "The leprechaun whisked you away!".to_string(),
        }
    }
}

/// The lumberjack: position, stats, inventory and action timers
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub base_speed: f32,
    pub health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub coins: u32,
    pub wood: u32,
    pub food_count: u32,
    pub potion_count: u32,
    pub has_better_axe: bool,
    pub has_protection: bool,
    pub protection_timer: f32,
    pub catch_cooldown: f32,
    pub energy_regen_timer: f32,
    pub chopping_animation: f32,
    pub damage_flash: f32,
    pub last_direction: Facing,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            speed: PLAYER_BASE_SPEED,
            base_speed: PLAYER_BASE_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            energy: PLAYER_MAX_ENERGY,
            max_energy: PLAYER_MAX_ENERGY,
            coins: 0,
            wood: 0,
            food_count: PLAYER_STARTING_FOOD,
            potion_count: 0,
            has_better_axe: false,
            has_protection: false,
            protection_timer: 0.0,
            catch_cooldown: 0.0,
            energy_regen_timer: 0.0,
            chopping_animation: 0.0,
            damage_flash: 0.0,
            last_direction: Facing::Down,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn is_chopping(&self) -> bool {
        self.chopping_animation > 0.0
    }

    /// Turn held keys into a velocity
    pub fn handle_input(&mut self, input: MoveInput) {
        let mut dir = Vec2::ZERO;
        if input.left {
            dir.x -= 1.0;
            self.last_direction = Facing::Left;
        }
        if input.right {
            dir.x += 1.0;
            self.last_direction = Facing::Right;
        }
        if input.up {
            dir.y -= 1.0;
            self.last_direction = Facing::Up;
        }
        if input.down {
            dir.y += 1.0;
            self.last_direction = Facing::Down;
        }
        self.velocity = normalize_or_zero(dir) * self.speed;
    }

    /// Move, regenerate energy and run down every timer
    pub fn update(&mut self, dt: f32, forest: &Forest) {
        self.apply_movement(dt, forest);

        self.energy_regen_timer += dt;
        if self.energy_regen_timer >= ENERGY_REGEN_INTERVAL {
            self.energy = (self.energy + ENERGY_REGEN_AMOUNT).min(self.max_energy);
            self.energy_regen_timer = 0.0;
        }

        self.chopping_animation = (self.chopping_animation - dt).max(0.0);
        self.damage_flash = (self.damage_flash - dt).max(0.0);
        self.catch_cooldown = (self.catch_cooldown - dt).max(0.0);

        if self.has_protection {
            self.protection_timer -= dt;
            if self.protection_timer <= 0.0 {
                self.protection_timer = 0.0;
                self.has_protection = false;
                info!("[Player] Protection wore off");
            }
        }
    }

    /// Each axis is resolved on its own so the player slides along
    /// obstacles. A player already overlapping something may always move.
    fn apply_movement(&mut self, dt: f32, forest: &Forest) {
        let step = self.velocity * dt;
        if step == Vec2::ZERO {
            return;
        }
        let stuck = forest.is_blocked(self.position, PLAYER_RADIUS);

        let along_x = self.position + Vec2::new(step.x, 0.0);
        if stuck || !forest.is_blocked(along_x, PLAYER_RADIUS) {
            self.position = along_x;
        }
        let along_y = self.position + Vec2::new(0.0, step.y);
        if stuck || !forest.is_blocked(along_y, PLAYER_RADIUS) {
            self.position = along_y;
        }
    }

    pub fn try_chop_tree(
        &mut self,
        forest: &mut Forest,
        rng: &mut impl Rng,
    ) -> Result<ChopOutcome, ActionError> {
        if self.energy < CHOP_MIN_ENERGY {
            return Err(ActionError::NotEnoughEnergy {
                needed: CHOP_MIN_ENERGY,
                have: self.energy,
            });
        }

        let tree_id = forest
            .nearest_living_tree(self.position, CHOP_RANGE)
            .ok_or(ActionError::NothingInRange("tree"))?;
        let tree = forest
            .tree_mut(tree_id)
            .ok_or(ActionError::NothingInRange("tree"))?;

        if tree.kind == TreeKind::Big && !self.has_better_axe {
            return Err(ActionError::AxeTooWeak);
        }

        let (damage, cost) = if self.has_better_axe {
            (AXE_CHOP_DAMAGE, AXE_CHOP_ENERGY_COST)
        } else {
            (CHOP_DAMAGE, CHOP_ENERGY_COST)
        };
        self.energy = self.energy.saturating_sub(cost);
        self.chopping_animation = CHOP_ANIMATION_DURATION;

        if !tree.apply_damage(damage) {
            return Ok(ChopOutcome::Damaged {
                tree_id,
                remaining: tree.health,
            });
        }

        let wood = match tree.kind {
            TreeKind::Small => rng.gen_range(SMALL_TREE_WOOD.0..=SMALL_TREE_WOOD.1),
            TreeKind::Big => BIG_TREE_WOOD,
        };
        self.wood += wood;
        info!("[Player] Felled a {:?} tree for {} wood", tree.kind, wood);
        Ok(ChopOutcome::Felled { tree_id, wood })
    }

    pub fn try_catch_goblin(
        &mut self,
        creatures: &mut Creatures,
        rng: &mut impl Rng,
    ) -> Result<CatchReward, ActionError> {
        if self.catch_cooldown > 0.0 {
            return Err(ActionError::OnCooldown {
                remaining: self.catch_cooldown,
            });
        }

        let goblin = creatures
            .nearest(Species::Goblin, self.position, CATCH_RANGE, |_| true)
            .ok_or(ActionError::NothingInRange("goblin"))?;

        let chance = if self.has_better_axe {
            AXE_CATCH_CHANCE
        } else {
            CATCH_CHANCE
        };
        if !rng.gen_bool(chance) {
            self.catch_cooldown = CATCH_FAIL_COOLDOWN;
            return Err(ActionError::Escaped);
        }

        let reward = CatchReward {
            coins: rng.gen_range(CATCH_REWARD_COINS.0..=CATCH_REWARD_COINS.1),
            wood: rng.gen_range(CATCH_REWARD_WOOD.0..=CATCH_REWARD_WOOD.1),
        };
        self.coins += reward.coins;
        self.wood += reward.wood;
        self.catch_cooldown = CATCH_SUCCESS_COOLDOWN;
        creatures.mark_removed(goblin);
        info!(
            "[Player] Caught goblin {} for {} coins and {} wood",
            goblin, reward.coins, reward.wood
        );
        Ok(reward)
    }

    pub fn interact_with_leprechaun(
        &mut self,
        creatures: &mut Creatures,
        forest: &Forest,
        rng: &mut impl Rng,
    ) -> Result<Boon, ActionError> {
        let Some(id) = creatures.nearest(
            Species::Leprechaun,
            self.position,
            LEPRECHAUN_INTERACT_RANGE,
            |a| a.ready_to_interact(),
        ) else {
            // Distinguish "none here" from "the one here is resting"
            let resting = creatures
                .nearest(Species::Leprechaun, self.position, LEPRECHAUN_INTERACT_RANGE, |_| true)
                .and_then(|id| creatures.get(id))
                .and_then(|a| a.interaction_cooldown());
            return Err(match resting {
                Some(remaining) => ActionError::OnCooldown { remaining },
                None => ActionError::NothingInRange("leprechaun"),
            });
        };

        let boon = match rng.gen_range(0..4) {
            0 => {
                let coins = rng.gen_range(BOON_COINS.0..=BOON_COINS.1);
                self.coins += coins;
                Boon::Coins(coins)
            }
            1 => {
                let wood = rng.gen_range(BOON_WOOD.0..=BOON_WOOD.1);
                self.wood += wood;
                Boon::Wood(wood)
            }
            2 => {
                let before = self.health;
                self.health = (self.health + BOON_HEAL).min(self.max_health);
                Boon::Heal(self.health - before)
            }
            _ => {
                let destination = forest
                    .find_walkable_point(
                        LEPRECHAUN_REGION_MARGIN,
                        PLAYER_RADIUS,
                        SPAWN_SEARCH_ATTEMPTS,
                        rng,
                    )
                    .unwrap_or(self.position);
                self.position = destination;
                Boon::Teleport(destination)
            }
        };

        if let Some(leprechaun) = creatures.get_mut(id) {
            leprechaun.reset_interaction_cooldown();
        }
        info!("[Player] Leprechaun {} granted {:?}", id, boon);
        Ok(boon)
    }

    /// Eat one food. Returns the energy gained.
    pub fn use_food(&mut self) -> Result<u32, ActionError> {
        if self.food_count == 0 {
            return Err(ActionError::NoFood);
        }
        if self.energy >= self.max_energy {
            return Err(ActionError::EnergyFull);
        }
        let before = self.energy;
        self.food_count -= 1;
        self.energy = (self.energy + FOOD_ENERGY).min(self.max_energy);
        Ok(self.energy - before)
    }

    /// Drink one potion. Returns the health restored.
    pub fn use_potion(&mut self) -> Result<u32, ActionError> {
        if self.potion_count == 0 {
            return Err(ActionError::NoPotion);
        }
        if self.health >= self.max_health {
            return Err(ActionError::HealthFull);
        }
        let before = self.health;
        self.potion_count -= 1;
        self.health = (self.health + POTION_HEALTH).min(self.max_health);
        Ok(self.health - before)
    }

    /// Apply damage, halved while protected. Returns the damage dealt.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = if self.has_protection { amount / 2 } else { amount };
        self.health = self.health.saturating_sub(dealt);
        self.damage_flash = DAMAGE_FLASH_DURATION;
        dealt
    }

    pub fn add_item(&mut self, kind: ItemKind, amount: u32) {
        match kind {
            ItemKind::Food => self.food_count += amount,
            ItemKind::Potion => self.potion_count += amount,
            ItemKind::BetterAxe => {
                self.has_better_axe = true;
                self.speed = self.base_speed * AXE_SPEED_MULTIPLIER;
            }
            ItemKind::Protection => {
                self.has_protection = true;
                self.protection_timer = PROTECTION_DURATION;
            }
        }
    }

    /// Give up as much of the demanded loot as the player actually carries
    pub fn surrender(&mut self, coins: u32, wood: u32) -> (u32, u32) {
        let coins = coins.min(self.coins);
        let wood = wood.min(self.wood);
        self.coins -= coins;
        self.wood -= wood;
        (coins, wood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Fence, Rock};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f32 = 1.0 / 60.0;

    fn open_field() -> Forest {
        Forest::empty(Vec2::new(2048.0, 1536.0))
    }

    #[test]
    fn new_player_starts_fresh() {
        let p = Player::new(Vec2::new(10.0, 20.0));
        assert_eq!((p.health, p.energy), (100, 100));
        assert_eq!((p.coins, p.wood, p.food_count, p.potion_count), (0, 0, 1, 0));
        assert!(!p.has_better_axe && !p.has_protection);
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let forest = open_field();
        let mut p = Player::new(Vec2::new(500.0, 500.0));
        p.handle_input(MoveInput { right: true, down: true, ..default() });
        assert!((p.velocity.length() - PLAYER_BASE_SPEED).abs() < 1e-3);
        assert_eq!(p.last_direction, Facing::Down);

        p.update(1.0, &forest);
        let moved = p.position - Vec2::new(500.0, 500.0);
        assert!((moved.length() - PLAYER_BASE_SPEED).abs() < 1e-3);

        p.handle_input(MoveInput::default());
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(p.last_direction, Facing::Down);
    }

    #[test]
    fn player_slides_along_fences_and_stays_in_world() {
        let mut forest = open_field();
        forest.fences.push(Fence {
            min: Vec2::new(520.0, 300.0),
            max: Vec2::new(528.0, 700.0),
        });
        let mut p = Player::new(Vec2::new(500.0, 500.0));
        p.handle_input(MoveInput { right: true, down: true, ..default() });
        for _ in 0..30 {
            p.update(DT, &forest);
        }
        assert!(p.position.x + PLAYER_RADIUS < 520.0);
        assert!(p.position.y > 530.0);

        let mut p = Player::new(Vec2::new(30.0, 30.0));
        p.handle_input(MoveInput { left: true, up: true, ..default() });
        for _ in 0..120 {
            p.update(DT, &forest);
        }
        assert!(forest.in_bounds(p.position, PLAYER_RADIUS));
    }

    #[test]
    fn stuck_player_can_walk_out() {
        let mut forest = open_field();
        forest.rocks.push(Rock { position: Vec2::new(500.0, 500.0), size: 20.0 });
        let mut p = Player::new(Vec2::new(505.0, 500.0));
        p.handle_input(MoveInput { right: true, ..default() });
        p.update(0.1, &forest);
        assert!(p.position.x > 505.0);
    }

    #[test]
    fn energy_regenerates_to_cap() {
        let forest = open_field();
        let mut p = Player::new(Vec2::new(500.0, 500.0));
        p.energy = 50;
        p.update(1.0, &forest);
        assert_eq!(p.energy, 50);
        p.update(1.0, &forest);
        assert_eq!(p.energy, 55);

        p.energy = 98;
        p.update(2.0, &forest);
        assert_eq!(p.energy, 100);
    }

    #[test]
    fn chopping_needs_energy_and_a_tree() {
        let mut forest = open_field();
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = Player::new(Vec2::new(500.0, 500.0));

        p.energy = 9;
        assert_eq!(
            p.try_chop_tree(&mut forest, &mut rng),
            Err(ActionError::NotEnoughEnergy { needed: 10, have: 9 })
        );

        p.energy = 100;
        assert_eq!(
            p.try_chop_tree(&mut forest, &mut rng),
            Err(ActionError::NothingInRange("tree"))
        );

        forest.plant_tree(Vec2::new(540.0, 500.0), TreeKind::Small, &mut rng);
        assert!(p.try_chop_tree(&mut forest, &mut rng).is_err());
    }

    #[test]
    fn two_chops_fell_a_sturdy_tree() {
        let mut forest = open_field();
        let mut rng = StdRng::seed_from_u64(2);
        let id = forest.plant_tree(Vec2::new(520.0, 500.0), TreeKind::Small, &mut rng);
        {
            let tree = forest.tree_mut(id).unwrap();
            tree.health = 50;
            tree.max_health = 50;
        }
        let mut p = Player::new(Vec2::new(500.0, 500.0));

        assert_eq!(
            p.try_chop_tree(&mut forest, &mut rng),
            Ok(ChopOutcome::Damaged { tree_id: id, remaining: 25 })
        );
        assert_eq!(p.energy, 90);
        assert_eq!(p.chopping_animation, CHOP_ANIMATION_DURATION);

        let Ok(ChopOutcome::Felled { wood, .. }) = p.try_chop_tree(&mut forest, &mut rng) else {
            panic!("second chop should fell the tree");
        };
        assert!((1..=3).contains(&wood));
        assert_eq!(p.wood, wood);
        assert_eq!(p.energy, 80);
        assert!(forest.tree(id).unwrap().is_dying());

        // A dying tree can't be chopped again
        assert_eq!(
            p.try_chop_tree(&mut forest, &mut rng),
            Err(ActionError::NothingInRange("tree"))
        );
    }

    #[test]
    fn better_axe_fells_a_small_tree_without_negative_health() {
        let mut forest = open_field();
        let mut rng = StdRng::seed_from_u64(3);
        let id = forest.plant_tree(Vec2::new(520.0, 500.0), TreeKind::Small, &mut rng);
        let mut p = Player::new(Vec2::new(500.0, 500.0));
        p.add_item(ItemKind::BetterAxe, 1);

        assert!(matches!(
            p.try_chop_tree(&mut forest, &mut rng),
            Ok(ChopOutcome::Felled { tree_id, .. }) if tree_id == id
        ));
        assert_eq!(forest.tree(id).unwrap().health, 0);
    }

    #[test]
    fn big_trees_need_the_better_axe() {
        let mut forest = open_field();
        let mut rng = StdRng::seed_from_u64(3);
        let id = forest.plant_tree(Vec2::new(520.0, 500.0), TreeKind::Big, &mut rng);
        let mut p = Player::new(Vec2::new(500.0, 500.0));

        assert_eq!(p.try_chop_tree(&mut forest, &mut rng), Err(ActionError::AxeTooWeak));
        assert_eq!(p.energy, 100);
        assert_eq!(forest.tree(id).unwrap().health, BIG_TREE_HEALTH);
        assert_eq!(p.wood, 0);

        p.add_item(ItemKind::BetterAxe, 1);
        assert!((p.speed - PLAYER_BASE_SPEED * AXE_SPEED_MULTIPLIER).abs() < 1e-4);
        for _ in 0..2 {
            assert!(matches!(
                p.try_chop_tree(&mut forest, &mut rng),
                Ok(ChopOutcome::Damaged { .. })
            ));
        }
        assert_eq!(
            p.try_chop_tree(&mut forest, &mut rng),
            Ok(ChopOutcome::Felled { tree_id: id, wood: BIG_TREE_WOOD })
        );
        assert_eq!(p.energy, 100 - 3 * AXE_CHOP_ENERGY_COST);
    }

    #[test]
    fn catching_goblins() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut creatures = Creatures::empty();
        let mut p = Player::new(Vec2::new(500.0, 500.0));
        assert_eq!(
            p.try_catch_goblin(&mut creatures, &mut rng),
            Err(ActionError::NothingInRange("goblin"))
        );

        let mut caught = 0;
        let mut escaped = 0;
        for _ in 0..40 {
            let id = creatures.add(Species::Goblin, Vec2::new(530.0, 500.0), &mut rng);
            p.catch_cooldown = 0.0;
            let coins_before = p.coins;
            match p.try_catch_goblin(&mut creatures, &mut rng) {
                Ok(reward) => {
                    caught += 1;
                    assert!((15..=30).contains(&reward.coins));
                    assert!(reward.wood <= 2);
                    assert_eq!(p.coins, coins_before + reward.coins);
                    assert_eq!(p.catch_cooldown, CATCH_SUCCESS_COOLDOWN);
                    assert!(creatures.get(id).is_none());
                }
                Err(ActionError::Escaped) => {
                    escaped += 1;
                    assert_eq!(p.catch_cooldown, CATCH_FAIL_COOLDOWN);
                    creatures.mark_removed(id);
                }
                Err(other) => panic!("unexpected {:?}", other),
            }
            creatures.compact();
        }
        assert!(caught > escaped);

        assert!(matches!(
            p.try_catch_goblin(&mut creatures, &mut rng),
            Err(ActionError::OnCooldown { .. })
        ));
    }

    #[test]
    fn leprechaun_grants_a_boon_then_rests() {
        let forest = open_field();
        let mut rng = StdRng::seed_from_u64(5);
        let mut creatures = Creatures::empty();
        let lep = creatures.add(Species::Leprechaun, Vec2::new(520.0, 500.0), &mut rng);
        let mut p = Player::new(Vec2::new(500.0, 500.0));
        p.health = 90;

        let boon = p.interact_with_leprechaun(&mut creatures, &forest, &mut rng).unwrap();
        match boon {
            Boon::Coins(n) => assert_eq!(p.coins, n),
            Boon::Wood(n) => assert_eq!(p.wood, n),
            Boon::Heal(n) => {
                assert_eq!(n, 10);
                assert_eq!(p.health, 100);
            }
            Boon::Teleport(to) => assert_eq!(p.position, to),
        }
        assert_eq!(
            creatures.get(lep).and_then(|l| l.interaction_cooldown()),
            Some(LEPRECHAUN_COOLDOWN)
        );

        p.position = Vec2::new(500.0, 500.0);
        assert!(matches!(
            p.interact_with_leprechaun(&mut creatures, &forest, &mut rng),
            Err(ActionError::OnCooldown { .. })
        ));
    }

    #[test]
    fn consumables_reject_when_pointless() {
        let mut p = Player::new(Vec2::ZERO);
        assert_eq!(p.use_food(), Err(ActionError::EnergyFull));
        assert_eq!(p.food_count, 1);

        p.energy = 70;
        assert_eq!(p.use_food(), Ok(30));
        assert_eq!((p.energy, p.food_count), (100, 0));
        p.energy = 10;
        assert_eq!(p.use_food(), Err(ActionError::NoFood));

        assert_eq!(p.use_potion(), Err(ActionError::NoPotion));
        p.add_item(ItemKind::Potion, 2);
        assert_eq!(p.use_potion(), Err(ActionError::HealthFull));
        p.health = 20;
        assert_eq!(p.use_potion(), Ok(50));
        assert_eq!((p.health, p.potion_count), (70, 1));
    }

    #[test]
    fn damage_is_halved_and_saturates() {
        let mut p = Player::new(Vec2::ZERO);
        assert_eq!(p.take_damage(15), 15);
        assert_eq!(p.damage_flash, DAMAGE_FLASH_DURATION);

        p.add_item(ItemKind::Protection, 1);
        assert_eq!(p.take_damage(15), 7);
        assert_eq!(p.health, 78);

        assert_eq!(p.take_damage(500), 250);
        assert_eq!(p.health, 0);
        assert!(p.is_dead());
    }

    #[test]
    fn protection_expires() {
        let forest = open_field();
        let mut p = Player::new(Vec2::new(500.0, 500.0));
        p.add_item(ItemKind::Protection, 1);
        p.update(PROTECTION_DURATION - 1.0, &forest);
        assert!(p.has_protection);
        p.update(1.5, &forest);
        assert!(!p.has_protection);
        assert_eq!(p.protection_timer, 0.0);
    }

    #[test]
    fn surrender_never_goes_negative() {
        let mut p = Player::new(Vec2::ZERO);
        p.coins = 3;
        p.wood = 1;
        assert_eq!(p.surrender(10, 2), (3, 1));
        assert_eq!((p.coins, p.wood), (0, 0));
    }
}
