//! Draws the session with flat-coloured meshes.
//!
//! Static scenery is spawned once per session. Trees and creatures come and
//! go, so they are kept in step with the session every frame through
//! `SpriteIndex`, which maps simulation ids to entities.

use crate::camera::world_to_screen;
use crate::game::GameState;
use crate::session::Session;
use crate::species::Species;
use crate::config::{PLAYER_RADIUS, TREE_DECAY_DURATION};
use crate::world::{DecorationKind, Tree, TreeKind, TreeState};
use bevy::prelude::*;
use bevy::utils::HashMap;

const Z_DECORATION: f32 = 0.0;
const Z_BUSH: f32 = 0.1;
const Z_ROCK: f32 = 0.2;
const Z_FENCE: f32 = 0.3;
const Z_TRADER: f32 = 0.4;
const Z_CREATURE: f32 = 0.5;
const Z_PLAYER: f32 = 0.6;
const Z_TREE: f32 = 0.7;

/// Shared meshes and materials, built once at startup
#[derive(Resource)]
pub struct SpriteAssets {
    pub circle: Handle<Mesh>,
    pub square: Handle<Mesh>,
    pub small_tree: Handle<ColorMaterial>,
    pub big_tree: Handle<ColorMaterial>,
    pub damaged_tree: Handle<ColorMaterial>,
    pub bush: Handle<ColorMaterial>,
    pub rock: Handle<ColorMaterial>,
    pub fence: Handle<ColorMaterial>,
    pub flower: Handle<ColorMaterial>,
    pub mushroom: Handle<ColorMaterial>,
    pub grass: Handle<ColorMaterial>,
    pub trader: Handle<ColorMaterial>,
    pub player: Handle<ColorMaterial>,
    pub player_hurt: Handle<ColorMaterial>,
    pub creatures: HashMap<Species, Handle<ColorMaterial>>,
}

impl SpriteAssets {
    fn creature(&self, species: Species) -> Handle<ColorMaterial> {
        self.creatures.get(&species).cloned().unwrap_or_default()
    }

    fn decoration(&self, kind: DecorationKind) -> Handle<ColorMaterial> {
        match kind {
            DecorationKind::Flower => self.flower.clone(),
            DecorationKind::Mushroom => self.mushroom.clone(),
            DecorationKind::Grass => self.grass.clone(),
        }
    }

    fn tree(&self, tree: &Tree) -> Handle<ColorMaterial> {
        if tree.health < tree.max_health {
            self.damaged_tree.clone()
        } else if tree.kind == TreeKind::Big {
            self.big_tree.clone()
        } else {
            self.small_tree.clone()
        }
    }
}

/// Simulation id -> entity, for the sprites that get added and removed
#[derive(Resource, Default)]
pub struct SpriteIndex {
    pub trees: HashMap<u32, Entity>,
    pub agents: HashMap<u32, Entity>,
}

#[derive(Component)]
pub struct TreeSprite(pub u32);

#[derive(Component)]
pub struct AgentSprite(pub u32);

#[derive(Component)]
pub struct PlayerSprite;

fn species_color(species: Species) -> Color {
    match species {
        Species::Goblin => Color::srgb(0.3, 0.6, 0.2),
        Species::Leprechaun => Color::srgb(0.1, 0.9, 0.3),
        Species::Bear => Color::srgb(0.4, 0.25, 0.1),
        Species::Fox => Color::srgb(0.9, 0.45, 0.1),
        Species::Rabbit => Color::srgb(0.85, 0.85, 0.8),
    }
}

pub fn load_sprite_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let mut material = |r: f32, g: f32, b: f32| materials.add(ColorMaterial::from_color(Color::srgb(r, g, b)));

    let small_tree = material(0.2, 0.55, 0.2);
    let big_tree = material(0.1, 0.4, 0.15);
    let damaged_tree = material(0.55, 0.5, 0.2);
    let bush = material(0.25, 0.5, 0.25);
    let rock = material(0.5, 0.5, 0.5);
    let fence = material(0.55, 0.35, 0.2);
    let flower = material(0.9, 0.4, 0.7);
    let mushroom = material(0.8, 0.2, 0.2);
    let grass = material(0.35, 0.65, 0.3);
    let trader = material(0.8, 0.7, 0.2);
    let player = material(0.2, 0.4, 0.9);
    let player_hurt = material(1.0, 0.2, 0.2);
    let creatures = Species::ALL
        .into_iter()
        .map(|species| (species, materials.add(ColorMaterial::from_color(species_color(species)))))
        .collect();

    commands.insert_resource(SpriteAssets {
        circle: meshes.add(Circle::new(1.0)),
        square: meshes.add(Rectangle::new(1.0, 1.0)),
        small_tree,
        big_tree,
        damaged_tree,
        bush,
        rock,
        fence,
        flower,
        mushroom,
        grass,
        trader,
        player,
        player_hurt,
        creatures,
    });
}

fn circle_transform(pos: Vec2, radius: f32, z: f32) -> Transform {
    Transform::from_translation(world_to_screen(pos, z)).with_scale(Vec3::new(radius, radius, 1.0))
}

/// Spawn the scenery that never changes during a session
pub fn spawn_world_sprites(
    mut commands: Commands,
    session: Res<Session>,
    assets: Res<SpriteAssets>,
    mut index: ResMut<SpriteIndex>,
) {
    *index = SpriteIndex::default();
    let forest = &session.forest;
    let scoped = StateScoped(GameState::Playing);

    for deco in &forest.decorations {
        commands.spawn((
            Mesh2d(assets.circle.clone()),
            MeshMaterial2d(assets.decoration(deco.kind)),
            circle_transform(deco.position, 3.0, Z_DECORATION),
            scoped.clone(),
        ));
    }
    for bush in &forest.bushes {
        commands.spawn((
            Mesh2d(assets.circle.clone()),
            MeshMaterial2d(assets.bush.clone()),
            circle_transform(bush.position, bush.size, Z_BUSH),
            scoped.clone(),
        ));
    }
    for rock in &forest.rocks {
        commands.spawn((
            Mesh2d(assets.circle.clone()),
            MeshMaterial2d(assets.rock.clone()),
            circle_transform(rock.position, rock.size, Z_ROCK),
            scoped.clone(),
        ));
    }
    for fence in &forest.fences {
        let size = fence.size();
        commands.spawn((
            Mesh2d(assets.square.clone()),
            MeshMaterial2d(assets.fence.clone()),
            Transform::from_translation(world_to_screen(fence.center(), Z_FENCE))
                .with_scale(Vec3::new(size.x, size.y, 1.0)),
            scoped.clone(),
        ));
    }

    commands.spawn((
        Mesh2d(assets.square.clone()),
        MeshMaterial2d(assets.trader.clone()),
        Transform::from_translation(world_to_screen(session.trader_position, Z_TRADER))
            .with_scale(Vec3::new(30.0, 30.0, 1.0)),
        scoped.clone(),
    ));
    commands.spawn((
        PlayerSprite,
        Mesh2d(assets.circle.clone()),
        MeshMaterial2d(assets.player.clone()),
        circle_transform(session.player.position, PLAYER_RADIUS, Z_PLAYER),
        scoped,
    ));
}

/// Spawn sprites for new trees, despawn removed ones, and show damage and
/// decay on the rest
pub fn sync_trees(
    mut commands: Commands,
    session: Res<Session>,
    assets: Res<SpriteAssets>,
    mut index: ResMut<SpriteIndex>,
    mut sprites: Query<(&TreeSprite, &mut Transform, &mut MeshMaterial2d<ColorMaterial>)>,
) {
    let forest = &session.forest;

    index.trees.retain(|id, entity| {
        let alive = forest.tree(*id).is_some();
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });

    for tree in &forest.trees {
        if !index.trees.contains_key(&tree.id) {
            let entity = commands
                .spawn((
                    TreeSprite(tree.id),
                    Mesh2d(assets.circle.clone()),
                    MeshMaterial2d(assets.tree(tree)),
                    circle_transform(tree.position, tree.size, Z_TREE),
                    StateScoped(GameState::Playing),
                ))
                .id();
            index.trees.insert(tree.id, entity);
        }
    }

    for (sprite, mut transform, mut material) in sprites.iter_mut() {
        let Some(tree) = forest.tree(sprite.0) else {
            continue;
        };
        let scale = match tree.state {
            TreeState::Alive => tree.size,
            TreeState::Dying { remaining } => {
                tree.size * (remaining / TREE_DECAY_DURATION).clamp(0.0, 1.0)
            }
        };
        transform.scale = Vec3::new(scale, scale, 1.0);
        material.0 = assets.tree(tree);
    }
}

pub fn sync_agents(
    mut commands: Commands,
    session: Res<Session>,
    assets: Res<SpriteAssets>,
    mut index: ResMut<SpriteIndex>,
    mut sprites: Query<(&AgentSprite, &mut Transform)>,
) {
    let creatures = &session.creatures;

    index.agents.retain(|id, entity| {
        let alive = creatures.get(*id).is_some();
        if !alive {
            commands.entity(*entity).despawn();
        }
        alive
    });

    for agent in creatures.iter() {
        if !index.agents.contains_key(&agent.id) {
            let entity = commands
                .spawn((
                    AgentSprite(agent.id),
                    Mesh2d(assets.circle.clone()),
                    MeshMaterial2d(assets.creature(agent.species)),
                    circle_transform(agent.position, agent.radius, Z_CREATURE),
                    StateScoped(GameState::Playing),
                ))
                .id();
            index.agents.insert(agent.id, entity);
        }
    }

    for (sprite, mut transform) in sprites.iter_mut() {
        if let Some(agent) = creatures.get(sprite.0) {
            transform.translation = world_to_screen(agent.position, Z_CREATURE);
        }
    }
}

pub fn sync_player(
    session: Res<Session>,
    assets: Res<SpriteAssets>,
    mut query: Query<(&mut Transform, &mut MeshMaterial2d<ColorMaterial>), With<PlayerSprite>>,
) {
    let player = &session.player;
    let Ok((mut transform, mut material)) = query.get_single_mut() else {
        return;
    };
    transform.translation = world_to_screen(player.position, Z_PLAYER);

    // Quick squash while swinging the axe
    let squash = if player.is_chopping() { 0.85 } else { 1.0 };
    let radius = PLAYER_RADIUS;
    transform.scale = Vec3::new(radius, radius * squash, 1.0);

    material.0 = if player.damage_flash > 0.0 {
        assets.player_hurt.clone()
    } else {
        assets.player.clone()
    };
}
