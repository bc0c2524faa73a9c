//! Asset preview: every registered tile and block drawn once, in a grid.
//!
//! Sprites are redrawn only when the content or its textures change, which
//! after a hot reload means the old sprites are despawned and the new
//! registry is drawn from scratch.
use bevy::prelude::*;
use isoforge::content::IsometricAssets;
use isoforge::draw::{AtlasTextures, IsoSprite, SpriteTarget, WorldCell};
use isoforge::settings::{PreviewSettings, Settings};
use isoforge::AssetType;

/// Top-left screen position of preview cell `index`.
///
/// # Arguments
/// - `index`: Position of the cell in drawing order.
/// - `cell`: Size reserved for every cell, before spacing.
/// - `preview`: Column count and spacing.
/// - `origin`: Screen position of the first cell.
#[must_use]
pub fn cell_position(index: usize, cell: Vec2, preview: &PreviewSettings, origin: Vec2) -> Vec2 {
    let columns = preview.columns.max(1);
    let step = cell + Vec2::splat(preview.spacing);
    let column = (index % columns) as f32;
    let row = (index / columns) as f32;
    origin + Vec2::new(column * step.x, row * step.y)
}

/// Redraw the preview grid when the content pack changes.
#[allow(clippy::needless_pass_by_value)]
pub fn draw_preview(
    mut commands: Commands,
    assets: Res<IsometricAssets>,
    textures: Res<AtlasTextures>,
    settings: Res<Settings>,
    windows: Query<&Window>,
    drawn: Query<Entity, With<IsoSprite>>,
) {
    if !assets.is_changed() && !textures.is_changed() {
        return;
    }

    for entity in &drawn {
        commands.entity(entity).despawn();
    }

    let cell = Vec2::new(
        assets.tile_width().max(assets.block_width()) as f32,
        assets.tile_height().max(assets.block_height()) as f32,
    );
    // screen space starts at the window's top-left corner
    let origin = windows
        .get_single()
        .map(|w| Vec2::new(-w.width() / 2.0, -w.height() / 2.0))
        .unwrap_or(Vec2::ZERO)
        + Vec2::splat(settings.preview.spacing);

    let registry = assets.registry();
    let mut target = SpriteTarget::new(&mut commands, &textures);
    let cells = AssetType::ALL
        .into_iter()
        .flat_map(|t| registry.assets(t).map(move |a| (t, a.name().clone())));

    for (index, (asset_type, name)) in cells.enumerate() {
        let position = cell_position(index, cell, &settings.preview, origin);
        let world_cell = WorldCell::new(name.clone());
        let result = match asset_type {
            AssetType::Tile => assets.draw_tile(&world_cell, &mut target, position),
            AssetType::Block => assets.draw_block(&world_cell, &mut target, position),
        };
        if let Err(e) = result {
            error!("Failed to draw {asset_type} '{name}': {e}");
        }
    }
}
