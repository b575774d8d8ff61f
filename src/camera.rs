use crate::session::Session;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;

#[derive(Component)]
pub struct MainCamera;

#[derive(Resource)]
pub struct CameraState {
    pub zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self { zoom: 1.0 }
    }
}

/// World positions are y-down; Bevy's 2D space is y-up
pub fn world_to_screen(pos: Vec2, z: f32) -> Vec3 {
    Vec3::new(pos.x, -pos.y, z)
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        MainCamera,
        Transform::from_xyz(0.0, 0.0, 0.0),
        OrthographicProjection {
            scale: 1.0,
            ..OrthographicProjection::default_2d()
        },
    ));
}

pub fn camera_zoom(
    mut scroll_events: EventReader<MouseWheel>,
    mut camera_state: ResMut<CameraState>,
    mut query: Query<&mut OrthographicProjection, With<MainCamera>>,
) {
    for event in scroll_events.read() {
        let zoom_delta = -event.y * 0.1;
        camera_state.zoom = (camera_state.zoom + zoom_delta).clamp(0.5, 2.0);

        if let Ok(mut projection) = query.get_single_mut() {
            projection.scale = camera_state.zoom;
        }
    }
}

/// Centre the view on the session's smoothed camera window
pub fn camera_follow(
    session: Option<Res<Session>>,
    mut query: Query<&mut Transform, With<MainCamera>>,
) {
    let Some(session) = session else {
        return;
    };
    let centre = session.camera + session.config.screen_size() / 2.0;
    if let Ok(mut transform) = query.get_single_mut() {
        let target = world_to_screen(centre, transform.translation.z);
        transform.translation = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_axis_is_flipped() {
        assert_eq!(world_to_screen(Vec2::new(10.0, 20.0), 1.0), Vec3::new(10.0, -20.0, 1.0));
    }
}
