use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::FOG_COLOUR;
// Crate engine modules
use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::flight::{FlightController, advance_camera_flight};
use crate::engine::camera::viewport_camera::{ViewportCamera, camera_controller};
use crate::engine::core::app_state::{AppState, transition_to_running, transition_to_scene_ready};
use crate::engine::core::session::ViewerSession;
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{ConfigLoader, load_config_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::scene_loader::{SceneLoader, request_scene, watch_scene_failure};
use crate::engine::scene::scene_scale::SceneScale;
// Crate tools modules
use crate::tools::markers::MarkerPlugin;
use crate::tools::markers::render::MarkerMaterials;
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        // Registers ViewerConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerConfig>::new(&["json"]))
        .add_plugins(MarkerPlugin)
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .init_resource::<SceneLoader>()
        .init_resource::<ViewerSession>()
        .init_resource::<SceneScale>()
        .init_resource::<ViewportCamera>()
        .init_resource::<FlightController>()
        .init_resource::<MarkerMaterials>()
        .insert_resource(ClearColor(Color::srgb(FOG_COLOUR[0], FOG_COLOUR[1], FOG_COLOUR[2])));

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                // Loading phase systems
                load_config_system,
                request_scene,
                watch_scene_failure,
                transition_to_scene_ready,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::SceneReady)),
        );

    // Runtime systems - only run once the scene is grounded and markers exist
    app.add_systems(
        Update,
        (advance_camera_flight, camera_controller)
            .chain()
            .run_if(in_state(AppState::Running)),
    );

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
    commands.insert_resource(AmbientLight {
        brightness: 400.0,
        ..default()
    });
}

fn spawn_camera(commands: &mut Commands) {
    let scale = SceneScale::default();
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(scale.initial_camera_position())
            .looking_at(scale.orbit_target(), Vec3::Y),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_camera(&mut commands);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
