//! Setup systems for initializing runtime resources.
//!
//! The content pack is built at `Startup`, before the first frame is drawn.
//! A failed build ends the app with an error exit code; nothing is rendered
//! from a pack that did not build completely.
use bevy::prelude::*;
use isoforge::content::{setup_content_watcher, ContentPaths, ContentWatcher, IsometricAssets};
use isoforge::draw::AtlasTextures;
use isoforge::settings::Settings;

/// Build both atlases, upload them and insert the content resources.
///
/// Inserts `IsometricAssets` and `AtlasTextures` and spawns the 2D camera.
///
/// # Arguments
/// - `commands`: Commands for inserting resources and spawning the camera.
/// - `settings`: Selects the content root and pack.
/// - `images`: Bevy's image storage the atlases are uploaded into.
/// - `exit`: Used to stop the app when the build fails.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    settings: Res<Settings>,
    mut images: ResMut<Assets<Image>>,
    mut exit: EventWriter<AppExit>,
) {
    commands.spawn(Camera2dBundle::default());

    let paths = ContentPaths::new(&settings.content.root, settings.content.pack.as_str());
    match IsometricAssets::open(&paths) {
        Ok(assets) => {
            let textures = AtlasTextures::upload(&assets, &mut images);
            info!(
                "content pack '{}' ready: {} tiles, {} blocks",
                paths.pack(),
                assets.registry().table(isoforge::AssetType::Tile).len(),
                assets.registry().table(isoforge::AssetType::Block).len()
            );
            commands.insert_resource(textures);
            commands.insert_resource(assets);
        }
        Err(e) => {
            error!("Failed to build content pack {}: {e}", paths.pack_dir().display());
            exit.send(AppExit::error());
        }
    }
}

/// Start watching the pack for changes once it has been built.
#[allow(clippy::needless_pass_by_value)]
pub fn watch_content(mut commands: Commands, assets: Option<Res<IsometricAssets>>) {
    let Some(assets) = assets else { return; };
    let watcher = setup_content_watcher(assets.paths()).unwrap_or_else(|e| {
        warn!("Content hot-reload disabled: {e}");
        ContentWatcher::stub()
    });
    commands.insert_resource(watcher);
}
