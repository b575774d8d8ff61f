use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use forest_lumberjack::config::GameConfig;
use forest_lumberjack::game::{PresentationPlugin, SimulationPlugin};
use forest_lumberjack::session::self_check;
use std::process::ExitCode;

fn main() -> ExitCode {
    if std::env::args().any(|arg| arg == "--self-check") {
        return if self_check() {
            println!("self-check passed");
            ExitCode::SUCCESS
        } else {
            eprintln!("self-check failed");
            ExitCode::FAILURE
        };
    }

    let config = GameConfig::default();
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Forest Lumberjack".to_string(),
                resolution: (config.screen_width, config.screen_height).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(config)
        .add_plugins((SimulationPlugin, PresentationPlugin))
        .run();
    ExitCode::SUCCESS
}
