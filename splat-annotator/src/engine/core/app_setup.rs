use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use bevy_gaussian_splatting::GaussianSplattingPlugin;

use crate::engine::camera::{OrbitCamera, camera_controller};
use crate::engine::core::window_config::create_window_config;
use crate::engine::hud::{StatusEvent, StatusTimer, setup_hud, update_status_text};
use crate::engine::scene::setup_scene;
use crate::engine::splat::{
    ClearSplatEvent, LoadSplatEvent, SplatSession, handle_clear_splat, handle_load_splat,
    reload_shortcut,
};
use crate::io::IoPlugin;
use crate::io::listing::SceneListing;
use crate::markers::MarkersPlugin;
use crate::markers::store::MarkerFile;
use crate::tools::InteractionPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(create_window_config()),
                ..default()
            })
            .set(AssetPlugin {
                // Never probe for .meta files; every miss is a 404 round
                // trip on the web build
                meta_check: AssetMetaCheck::Never,
                ..default()
            }),
    )
    .add_plugins(GaussianSplattingPlugin)
    .add_plugins(JsonAssetPlugin::<MarkerFile>::new(&["json"]))
    .add_plugins(JsonAssetPlugin::<SceneListing>::new(&["listing.json"]))
    .add_plugins((MarkersPlugin, InteractionPlugin, IoPlugin))
    .init_resource::<OrbitCamera>()
    .init_resource::<SplatSession>()
    .init_resource::<StatusTimer>()
    .add_event::<LoadSplatEvent>()
    .add_event::<ClearSplatEvent>()
    .add_event::<StatusEvent>()
    .add_systems(Startup, (setup_scene, setup_hud))
    .add_systems(
        Update,
        (
            camera_controller,
            handle_load_splat,
            handle_clear_splat,
            reload_shortcut,
            update_status_text,
        ),
    );

    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(bevy::diagnostic::FrameTimeDiagnosticsPlugin::default())
        .add_systems(Update, crate::engine::hud::fps_text_update_system);

    app
}
