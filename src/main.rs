use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use isoforge::content::{check_content_changes, ContentWatcher, IsometricAssets};
use isoforge::settings::loader as settings_loader;

mod app;
use app::{draw_preview, setup, watch_content};

fn main() -> AppExit {
    let mut settings = settings_loader::load_settings_from_dir("data/settings");
    // `isoforge <pack>` overrides the configured pack
    if let Some(pack) = std::env::args().nth(1) {
        settings.content.pack = pack;
    }

    let mut app = App::new();

    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: settings.window.title.clone(),
                    resolution: (settings.window.width as f32, settings.window.height as f32).into(),
                    position: WindowPosition::Centered(MonitorSelection::Primary),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            })
            .set(ImagePlugin::default_nearest()),
    );

    app.insert_resource(ClearColor(Color::srgb(0.08, 0.08, 0.1)));
    app.insert_resource(settings.clone());

    app.add_systems(Startup, setup);
    if settings.content.hot_reload {
        app.add_systems(PostStartup, watch_content);
        app.add_systems(
            Update,
            check_content_changes.run_if(resource_exists::<ContentWatcher>),
        );
    }
    app.add_systems(
        Update,
        draw_preview
            .run_if(resource_exists::<IsometricAssets>)
            .after(check_content_changes),
    );

    app.run()
}
