//! Bevy app construction.

use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::winit::{UpdateMode, WinitSettings};
use orrery_core::OrreryConfig;
use orrery_core::bevy::{OrreryUnifiedPlugin, RoomLink};

use crate::network::MatchboxRoom;
use crate::panels;

/// Join the configured room and run the app until the page goes away.
pub fn run(config: OrreryConfig) {
    tracing::info!("[orrery] creating app for canvas: #{}", config.canvas_id);

    let room = MatchboxRoom::connect(&config.room_url());

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    canvas: Some(format!("#{}", config.canvas_id)),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: true,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // Static hosting has no .meta files.
                meta_check: AssetMetaCheck::Never,
                ..default()
            })
            .disable::<bevy::log::LogPlugin>(),
    );

    // Keep ticking when the canvas loses focus.
    app.insert_resource(WinitSettings {
        focused_mode: UpdateMode::Continuous,
        unfocused_mode: UpdateMode::Continuous,
    });

    app.add_plugins(OrreryUnifiedPlugin::new(config));
    app.insert_resource(RoomLink::new(room));

    app.add_systems(Startup, panels::hide_all_panels);
    app.add_systems(Update, panels::show_selected_panel);

    tracing::info!("[orrery] calling app.run()");
    app.run();
}
