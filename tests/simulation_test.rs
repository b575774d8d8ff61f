use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use forest_lumberjack::game::{GameState, SimulationPlugin};
use forest_lumberjack::input::PendingActions;
use forest_lumberjack::session::{Action, Session};
use std::time::Duration;

/// Headless app running the game rules only
fn headless_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_resource::<ButtonInput<KeyCode>>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(20)))
        .add_plugins(SimulationPlugin);
    app.update();
    app
}

/// Press and release a key, then let the state transition land
fn tap(app: &mut App, key: KeyCode) {
    app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
    app.update();
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
    app.update();
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

#[test]
fn starts_in_menu_without_a_session() {
    let app = headless_app();
    assert_eq!(state(&app), GameState::Menu);
    assert!(app.world().get_resource::<Session>().is_none());
}

#[test]
fn enter_starts_a_fresh_session() {
    let mut app = headless_app();
    tap(&mut app, KeyCode::Enter);
    assert_eq!(state(&app), GameState::Playing);

    let session = app.world().resource::<Session>();
    assert!(!session.forest.trees.is_empty());
    assert!(!session.creatures.is_empty());
    assert_eq!(session.player.coins, 0);
}

#[test]
fn simulation_advances_on_the_fixed_clock() {
    let mut app = headless_app();
    tap(&mut app, KeyCode::Enter);
    for _ in 0..30 {
        app.update();
    }
    let session = app.world().resource::<Session>();
    assert!(session.elapsed > 0.0);
    assert!(session.player.health <= session.player.max_health);
}

#[test]
fn queued_actions_are_drained_by_the_tick() {
    let mut app = headless_app();
    tap(&mut app, KeyCode::Enter);
    app.world_mut()
        .resource_mut::<PendingActions>()
        .push(Action::UsePotion);
    for _ in 0..5 {
        app.update();
    }
    assert!(app.world().resource::<PendingActions>().is_empty());
    // No potions at the start, so the refusal shows up as a notice
    let session = app.world().resource::<Session>();
    assert!(session
        .notices()
        .iter()
        .any(|n| n.text == "You have no potions left"));
}

#[test]
fn escape_returns_to_menu_and_drops_the_session() {
    let mut app = headless_app();
    tap(&mut app, KeyCode::Enter);
    tap(&mut app, KeyCode::Escape);
    assert_eq!(state(&app), GameState::Menu);
    assert!(app.world().get_resource::<Session>().is_none());
}

#[test]
fn reaching_the_coin_target_is_a_victory() {
    let mut app = headless_app();
    tap(&mut app, KeyCode::Enter);
    app.world_mut().resource_mut::<Session>().player.coins = 10_000;
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(state(&app), GameState::Victory);

    // Escape does nothing on the end screen, Enter goes back to the menu
    tap(&mut app, KeyCode::Escape);
    assert_eq!(state(&app), GameState::Victory);
    tap(&mut app, KeyCode::Enter);
    assert_eq!(state(&app), GameState::Menu);
}

#[test]
fn a_finished_session_stops_ticking_within_the_frame() {
    let mut app = headless_app();
    tap(&mut app, KeyCode::Enter);
    // A long frame runs several fixed steps before the state change lands
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    let before = {
        let mut session = app.world_mut().resource_mut::<Session>();
        session.player.coins = 10_000;
        session.elapsed
    };
    app.update();
    app.update();
    assert_eq!(state(&app), GameState::Victory);

    let session = app.world().resource::<Session>();
    assert!((session.elapsed - before - 1.0 / 60.0).abs() < 1e-4);
}

#[test]
fn running_out_of_health_ends_the_game() {
    let mut app = headless_app();
    tap(&mut app, KeyCode::Enter);
    app.world_mut()
        .resource_mut::<Session>()
        .player
        .take_damage(1_000);
    for _ in 0..3 {
        app.update();
    }
    assert_eq!(state(&app), GameState::GameOver);
    assert!(app.world().get_resource::<Session>().is_some());
}

#[test]
fn every_new_game_gets_a_new_world() {
    let mut app = headless_app();
    tap(&mut app, KeyCode::Enter);
    app.world_mut().resource_mut::<Session>().player.wood = 42;
    tap(&mut app, KeyCode::Escape);
    tap(&mut app, KeyCode::Enter);
    assert_eq!(app.world().resource::<Session>().player.wood, 0);
}
