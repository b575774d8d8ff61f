use crate::camera::{CameraState, camera_follow, camera_zoom, setup_camera};
use crate::config::*;
use crate::hud::{end_screen_ui, hud_ui, menu_ui};
use crate::input::{PendingActions, collect_actions, movement_from_keys};
use crate::render::{SpriteIndex, load_sprite_assets, spawn_world_sprites, sync_agents, sync_player, sync_trees};
use crate::session::{Session, SessionStatus};
use bevy::prelude::*;

/// Top-level screens
#[derive(States, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    GameOver,
    Victory,
}

/// The game rules: state machine, input queue and the fixed-rate tick.
/// Needs no window, so it also runs under `MinimalPlugins`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .enable_state_scoped_entities::<GameState>()
            .init_resource::<GameConfig>()
            .init_resource::<PendingActions>()
            .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            .add_systems(OnEnter(GameState::Playing), start_session)
            .add_systems(OnEnter(GameState::Menu), end_session)
            .add_systems(Update, handle_state_keys)
            .add_systems(
                Update,
                collect_actions.run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                FixedUpdate,
                tick_session.run_if(in_state(GameState::Playing)),
            );
    }
}

/// Everything that draws: sprites, camera and the egui screens
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraState>()
            .init_resource::<SpriteIndex>()
            .add_systems(Startup, (setup_camera, load_sprite_assets))
            .add_systems(Update, (camera_zoom, menu_ui.run_if(in_state(GameState::Menu))))
            .add_systems(
                Update,
                (
                    spawn_world_sprites.run_if(resource_added::<Session>),
                    sync_trees,
                    sync_agents,
                    sync_player,
                    camera_follow,
                    hud_ui,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                end_screen_ui.run_if(in_state(GameState::GameOver).or(in_state(GameState::Victory))),
            );
    }
}

fn start_session(mut commands: Commands, config: Res<GameConfig>, mut pending: ResMut<PendingActions>) {
    pending.clear();
    let session = Session::new(*config, &mut rand::thread_rng());
    commands.insert_resource(session);
}

fn end_session(mut commands: Commands) {
    commands.remove_resource::<Session>();
}

/// Enter confirms, Escape backs out of a running game
fn handle_state_keys(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    match state.get() {
        GameState::Menu if keys.just_pressed(KeyCode::Enter) => {
            next_state.set(GameState::Playing);
        }
        GameState::Playing if keys.just_pressed(KeyCode::Escape) => {
            info!("[Session] Back to the menu");
            next_state.set(GameState::Menu);
        }
        GameState::GameOver | GameState::Victory if keys.just_pressed(KeyCode::Enter) => {
            next_state.set(GameState::Menu);
        }
        _ => {}
    }
}

fn tick_session(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    session: Option<ResMut<Session>>,
    mut pending: ResMut<PendingActions>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut session) = session else {
        return;
    };
    // The state change lands next frame, further fixed steps this frame wait
    if session.status() != SessionStatus::Running {
        return;
    }
    let actions = pending.drain();
    let movement = movement_from_keys(&keys);

    match session.tick(time.delta_secs(), movement, &actions, &mut rand::thread_rng()) {
        SessionStatus::Running => {}
        SessionStatus::Victory => {
            info!(
                "[Session] Victory with {} coins after {:.0}s",
                session.player.coins, session.elapsed
            );
            next_state.set(GameState::Victory);
        }
        SessionStatus::GameOver => {
            info!("[Session] The lumberjack fell after {:.0}s", session.elapsed);
            next_state.set(GameState::GameOver);
        }
    }
}
