//! Bevy render target: every draw becomes one sprite cut from an atlas.
//!
//! Atlases are handed to the renderer in memory. The image that was written
//! to disk and read back during the build is turned into a Bevy `Image`
//! with nearest sampling, so pixel art is never smoothed.

use super::{AtlasRegion, RenderTarget, Rotation};
use crate::asset::AssetType;
use crate::content::IsometricAssets;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::texture::ImageSampler;
use bevy::sprite::Anchor;
use image::{DynamicImage, RgbaImage};

/// GPU handles of both atlases.
#[derive(Resource, Clone, Debug, Default)]
pub struct AtlasTextures {
    pub tiles: Handle<Image>,
    pub blocks: Handle<Image>,
}

impl AtlasTextures {
    #[must_use]
    pub fn handle(&self, asset_type: AssetType) -> &Handle<Image> {
        match asset_type {
            AssetType::Tile => &self.tiles,
            AssetType::Block => &self.blocks,
        }
    }

    /// Add both atlases of `assets` to Bevy's image storage.
    pub fn upload(assets: &IsometricAssets, images: &mut Assets<Image>) -> Self {
        Self {
            tiles: images.add(atlas_to_image(assets.atlas(AssetType::Tile))),
            blocks: images.add(atlas_to_image(assets.atlas(AssetType::Block))),
        }
    }
}

/// Convert a stitched atlas into a Bevy texture with nearest sampling.
#[must_use]
pub fn atlas_to_image(atlas: &RgbaImage) -> Image {
    let mut image = Image::from_dynamic(
        DynamicImage::ImageRgba8(atlas.clone()),
        true,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::nearest();
    image
}

/// Marker for sprites spawned by a `SpriteTarget`.
#[derive(Component, Clone, Copy, Debug)]
pub struct IsoSprite;

/// Spawns one sprite per draw call.
///
/// Positions are screen space (origin top-left, y down) and are flipped
/// into Bevy's y-up world. Each draw sits slightly in front of the previous
/// one so later draws cover earlier ones, which is what isometric
/// back-to-front drawing relies on.
pub struct SpriteTarget<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    textures: &'a AtlasTextures,
    depth: f32,
}

impl<'a, 'w, 's> SpriteTarget<'a, 'w, 's> {
    pub const DEPTH_STEP: f32 = 0.001;

    pub fn new(commands: &'a mut Commands<'w, 's>, textures: &'a AtlasTextures) -> Self {
        Self {
            commands,
            textures,
            depth: 0.0,
        }
    }
}

impl RenderTarget for SpriteTarget<'_, '_, '_> {
    fn draw_region(&mut self, region: AtlasRegion, position: Vec2, tint: Color, rotation: Rotation) {
        let rect = region.rect;
        let size = Vec2::new(rect.width as f32, rect.height as f32);
        // rotate around the cell centre, not its corner
        let centre = position + size / 2.0;

        self.commands.spawn((
            SpriteBundle {
                sprite: Sprite {
                    color: tint,
                    rect: Some(Rect::new(
                        rect.x as f32,
                        rect.y as f32,
                        rect.right() as f32,
                        rect.bottom() as f32,
                    )),
                    anchor: Anchor::Center,
                    ..default()
                },
                texture: self.textures.handle(region.atlas).clone(),
                transform: Transform::from_xyz(centre.x, -centre.y, self.depth)
                    .with_rotation(Quat::from_rotation_z(-rotation.radians())),
                ..default()
            },
            IsoSprite,
        ));
        self.depth += Self::DEPTH_STEP;
    }
}
