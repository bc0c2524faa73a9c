//! End-to-end checks of the startup build on real content trees.

use bevy::color::Color;
use bevy::math::Vec2;
use image::{Rgba, RgbaImage};
use isoforge::asset::{PixelRect, Tag};
use isoforge::atlas::AtlasLayout;
use isoforge::draw::{AtlasRegion, RenderTarget, Rotation, WorldCell};
use isoforge::error::{DrawError, UnknownAssetError};
use isoforge::{AssetType, ContentPaths, IsometricAssets};
use std::fs;
use std::path::Path;

fn write_asset(dir: &Path, config: Option<&str>, tags: &[(&str, [u8; 4])], size: (u32, u32)) {
    fs::create_dir_all(dir).unwrap();
    if let Some(config) = config {
        fs::write(dir.join("config.yml"), config).unwrap();
    }
    for (tag, px) in tags {
        RgbaImage::from_pixel(size.0, size.1, Rgba(*px))
            .save(dir.join(format!("{tag}.png")))
            .unwrap();
    }
}

const GREEN: [u8; 4] = [30, 200, 40, 255];
const DARK_GREEN: [u8; 4] = [10, 90, 20, 255];
const BLUE: [u8; 4] = [20, 40, 220, 160];
const GREY: [u8; 4] = [120, 120, 120, 255];

/// Tiles: grass (default, rotated), water (default); blocks: stone, wood.
/// Plus a few entries that must never be registered.
fn pack(root: &Path) -> ContentPaths {
    let paths = ContentPaths::new(root.join("content"), "default");
    fs::create_dir_all(paths.pack_dir()).unwrap();
    fs::write(
        paths.config_path(),
        "tile_width: 32\ntile_height: 32\nblock_width: 32\nblock_height: 48\n",
    )
    .unwrap();

    let tiles = paths.tiles_dir();
    write_asset(
        &tiles.join("grass"),
        Some("collections:\n  - Ground\n  - ground\n"),
        &[("default", GREEN), ("rotated", DARK_GREEN)],
        (32, 32),
    );
    write_asset(
        &tiles.join("water"),
        Some("collections: [ground, liquid]\n"),
        &[("default", BLUE)],
        (32, 32),
    );
    // no config: disabled
    write_asset(&tiles.join("lava"), None, &[("default", GREY)], (32, 32));
    // underscore and dot prefixed: disabled
    write_asset(&tiles.join("_wip"), Some("collections: []\n"), &[("default", GREY)], (32, 32));
    write_asset(&tiles.join(".hidden"), Some("collections: []\n"), &[("default", GREY)], (32, 32));
    // config but no images: not registered
    write_asset(&tiles.join("empty"), Some("collections: [ground]\n"), &[], (32, 32));
    fs::write(tiles.join("grass").join("notes.txt"), "not an image").unwrap();

    let blocks = paths.blocks_dir();
    write_asset(&blocks.join("stone"), Some("collections: [solid]\n"), &[("default", GREY)], (32, 48));
    write_asset(
        &blocks.join("wood"),
        Some("collections: [solid, flammable]\n"),
        &[("default", DARK_GREEN), ("east", GREEN)],
        (16, 24),
    );
    paths
}

#[test]
fn grass_example_lands_in_the_first_column() {
    let tmp = tempfile::TempDir::new().unwrap();
    let assets = IsometricAssets::open(&pack(tmp.path())).unwrap();

    let grass = assets.registry().get(AssetType::Tile, "grass").unwrap();
    assert_eq!(
        grass.pixel_rect("default").unwrap(),
        Some(PixelRect { x: 0, y: 0, width: 32, height: 32 })
    );
    assert_eq!(
        grass.pixel_rect("rotated").unwrap(),
        Some(PixelRect { x: 0, y: 32, width: 32, height: 32 })
    );

    let atlas = assets.atlas(AssetType::Tile);
    assert_eq!(atlas.dimensions(), (64, 64));
    assert_eq!(atlas.get_pixel(5, 5), &Rgba(GREEN));
    assert_eq!(atlas.get_pixel(5, 40), &Rgba(DARK_GREEN));
    assert_eq!(atlas.get_pixel(40, 5), &Rgba(BLUE));
    // water has a single row
    assert_eq!(atlas.get_pixel(40, 40), &Rgba([0, 0, 0, 0]));
}

#[test]
fn disabled_and_imageless_assets_are_excluded() {
    let tmp = tempfile::TempDir::new().unwrap();
    let assets = IsometricAssets::open(&pack(tmp.path())).unwrap();
    let registry = assets.registry();

    let tiles: Vec<&str> = registry
        .assets(AssetType::Tile)
        .map(|a| a.name().as_str())
        .collect();
    assert_eq!(tiles, vec!["grass", "water"]);
    for name in ["lava", "_wip", ".hidden", "empty"] {
        assert!(registry.get(AssetType::Tile, name).is_none(), "{name} registered");
    }
    assert_eq!(registry.get(AssetType::Tile, "grass").unwrap().tag_count(), 2);
}

#[test]
fn every_tag_has_a_disjoint_rect_inside_its_atlas() {
    let tmp = tempfile::TempDir::new().unwrap();
    let assets = IsometricAssets::open(&pack(tmp.path())).unwrap();

    for asset_type in AssetType::ALL {
        let (width, height) = assets.atlas(asset_type).dimensions();
        let (cell_width, cell_height) = assets.config().cell_size(asset_type);
        let mut rects = Vec::new();
        for asset in assets.registry().assets(asset_type) {
            for tag in asset.tags() {
                let rect = asset.pixel_rect(tag.as_str()).unwrap().unwrap();
                assert_eq!((rect.width, rect.height), (cell_width, cell_height));
                assert!(rect.right() <= width && rect.bottom() <= height);
                rects.push(rect);
            }
        }
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }
}

#[test]
fn undersized_sources_are_scaled_to_the_block_cell() {
    let tmp = tempfile::TempDir::new().unwrap();
    let assets = IsometricAssets::open(&pack(tmp.path())).unwrap();

    let wood = assets.registry().get(AssetType::Block, "wood").unwrap();
    let east = wood.pixel_rect("east").unwrap().unwrap();
    assert_eq!(east, PixelRect { x: 32, y: 48, width: 32, height: 48 });

    let atlas = assets.atlas(AssetType::Block);
    assert_eq!(atlas.dimensions(), (64, 96));
    assert_eq!(atlas.get_pixel(east.x + 31, east.y + 47), &Rgba(GREEN));
}

#[test]
fn collections_hold_only_registered_assets() {
    let tmp = tempfile::TempDir::new().unwrap();
    let assets = IsometricAssets::open(&pack(tmp.path())).unwrap();
    let registry = assets.registry();

    let ground: Vec<&str> = registry
        .collection(AssetType::Tile, "ground")
        .unwrap()
        .iter()
        .map(|n| n.as_str())
        .collect();
    assert_eq!(ground, vec!["grass", "water"]);
    assert_eq!(registry.collection(AssetType::Block, "SOLID").unwrap().len(), 2);
    assert!(registry.collection(AssetType::Tile, "solid").is_none());

    for asset_type in AssetType::ALL {
        for (_, members) in registry.table(asset_type).collections() {
            for member in members {
                assert!(registry.get(asset_type, member.as_str()).is_some());
            }
        }
    }
}

#[test]
fn rebuilding_an_unchanged_pack_is_identical() {
    let tmp = tempfile::TempDir::new().unwrap();
    let paths = pack(tmp.path());

    let first = IsometricAssets::open(&paths).unwrap();
    let first_layout = AtlasLayout::read(&paths.layout_path(AssetType::Tile)).unwrap();
    let second = IsometricAssets::open(&paths).unwrap();
    let second_layout = AtlasLayout::read(&paths.layout_path(AssetType::Tile)).unwrap();

    for asset_type in AssetType::ALL {
        assert_eq!(first.atlas(asset_type), second.atlas(asset_type));
    }
    assert_eq!(first_layout, second_layout);
}

#[test]
fn empty_asset_types_still_build() {
    let tmp = tempfile::TempDir::new().unwrap();
    let paths = ContentPaths::new(tmp.path().join("content"), "bare");
    fs::create_dir_all(paths.tiles_dir()).unwrap();
    fs::create_dir_all(paths.blocks_dir()).unwrap();
    fs::write(
        paths.config_path(),
        "Tile_Width: 16\ntile_height: '16'\nblock_width: 16\nblock_height: 24\nextra: ignored\n",
    )
    .unwrap();

    let assets = IsometricAssets::open(&paths).unwrap();
    assert!(assets.registry().is_complete());
    assert_eq!(assets.atlas(AssetType::Tile).dimensions(), (16, 16));
    assert_eq!(assets.atlas(AssetType::Block).dimensions(), (16, 24));
    assert!(paths.atlas_path(AssetType::Block).is_file());
}

#[test]
fn files_sharing_a_tag_name_yield_one_tag_and_one_cell() {
    let tmp = tempfile::TempDir::new().unwrap();
    let paths = ContentPaths::new(tmp.path().join("content"), "dup");
    fs::create_dir_all(paths.blocks_dir()).unwrap();
    fs::write(
        paths.config_path(),
        "tile_width: 4\ntile_height: 4\nblock_width: 4\nblock_height: 4\n",
    )
    .unwrap();
    let red = [255, 0, 0, 255];
    write_asset(
        &paths.tiles_dir().join("grass"),
        Some("collections: [ground]\n"),
        &[("default", red), ("default.top", GREEN)],
        (4, 4),
    );

    let assets = IsometricAssets::open(&paths).unwrap();
    let grass = assets.registry().get(AssetType::Tile, "grass").unwrap();

    let tags: Vec<&str> = grass.tags().map(|t| t.as_str()).collect();
    assert_eq!(tags, vec!["default"]);
    assert_eq!(grass.tag_count(), 1);
    assert_eq!(
        grass.pixel_rect("default").unwrap(),
        Some(PixelRect { x: 0, y: 0, width: 4, height: 4 })
    );
    assert_eq!(assets.atlas(AssetType::Tile).dimensions(), (4, 4));
    assert_eq!(assets.atlas(AssetType::Tile).get_pixel(1, 1), &Rgba(red));
}

#[derive(Default)]
struct Recorder {
    calls: Vec<(AtlasRegion, Vec2, Color, Rotation)>,
}

impl RenderTarget for Recorder {
    fn draw_region(&mut self, region: AtlasRegion, position: Vec2, tint: Color, rotation: Rotation) {
        self.calls.push((region, position, tint, rotation));
    }
}

#[test]
fn draw_facade_issues_exactly_one_draw_per_entity() {
    let tmp = tempfile::TempDir::new().unwrap();
    let assets = IsometricAssets::open(&pack(tmp.path())).unwrap();
    let mut target = Recorder::default();

    assets
        .draw_tile(&WorldCell::new("grass").with_tag(Tag::from("rotated")), &mut target, Vec2::new(3.0, 4.0))
        .unwrap();
    assets
        .draw_block(&WorldCell::new("wood").with_rotation(Rotation::East), &mut target, Vec2::ZERO)
        .unwrap();
    assets.draw_block(&WorldCell::empty(), &mut target, Vec2::ZERO).unwrap();

    assert_eq!(target.calls.len(), 2);
    assert_eq!(
        target.calls[0].0,
        AtlasRegion { atlas: AssetType::Tile, rect: PixelRect { x: 0, y: 32, width: 32, height: 32 } }
    );
    assert_eq!(target.calls[0].1, Vec2::new(3.0, 4.0));
    assert_eq!(target.calls[1].0.atlas, AssetType::Block);
    assert_eq!(target.calls[1].0.rect.y, 48);
    assert_eq!(target.calls[1].3, Rotation::East);

    // a tile name is not a block name
    let err = assets
        .draw_block(&WorldCell::new("grass"), &mut target, Vec2::ZERO)
        .unwrap_err();
    assert!(matches!(err, DrawError::UnknownAsset(UnknownAssetError::Asset { .. })));
    assert_eq!(target.calls.len(), 2);
}
