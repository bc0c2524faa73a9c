//! Atlas mapper: replace every grid position of one asset type with its
//! pixel rectangle inside the stitched atlas.
//!
//! Runs exactly once per type, after `AssetRegistry::mark_stitched`. Calling
//! it early or twice is a `StateError`. Rectangles are validated against the
//! atlas dimensions before anything is written, so a failed call leaves the
//! registry untouched.

use super::cell_rect;
use crate::asset::{AssetRegistry, AssetType, AtlasConfig, AtlasState, Placement};
use crate::error::StateError;

/// Map all tags of `asset_type` to pixel rectangles.
///
/// # Errors
/// - `StateError::NotStitched` if the atlas has not been built yet,
/// - `StateError::AlreadyMapped` if the mapper already ran for this type,
/// - `StateError::OutOfBounds` if a cell falls outside the atlas image.
pub fn map_to_pixels(
    registry: &mut AssetRegistry,
    config: &AtlasConfig,
    asset_type: AssetType,
) -> Result<(), StateError> {
    let (width, height) = match registry.state(asset_type) {
        AtlasState::Discovered => return Err(StateError::NotStitched(asset_type)),
        AtlasState::Mapped { .. } => return Err(StateError::AlreadyMapped(asset_type)),
        AtlasState::Stitched { width, height } => (width, height),
    };
    let (cell_width, cell_height) = config.cell_size(asset_type);

    let table = registry.table_mut(asset_type);

    // validate first so an error leaves every placement as it was
    for asset in table.assets() {
        for tag in asset.tags() {
            let Some(Placement::Unmapped(grid)) = asset.placement(tag.as_str()) else {
                continue;
            };
            let right = (u64::from(grid.column) + 1) * u64::from(cell_width);
            let bottom = (u64::from(grid.row) + 1) * u64::from(cell_height);
            if right > u64::from(width) || bottom > u64::from(height) {
                return Err(StateError::OutOfBounds {
                    asset_type,
                    asset: asset.name().clone(),
                    tag: tag.clone(),
                    width,
                    height,
                });
            }
        }
    }

    for asset in table.assets_mut() {
        for (_, placement) in asset.placements_mut() {
            if let Placement::Unmapped(grid) = *placement {
                *placement = Placement::Mapped(cell_rect(grid.row, grid.column, cell_width, cell_height));
            }
        }
    }

    table.set_state(AtlasState::Mapped { width, height });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{Asset, AssetName, Discovery, PixelRect, Tag};

    fn config() -> AtlasConfig {
        AtlasConfig {
            tile_width: 32,
            tile_height: 32,
            block_width: 16,
            block_height: 24,
        }
    }

    fn registry_with(asset_type: AssetType, assets: &[(&str, &[&str])]) -> AssetRegistry {
        let mut discovery = Discovery::default();
        for (column, (name, tags)) in assets.iter().enumerate() {
            let mut asset = Asset::new(asset_type, AssetName::from(*name), column as u32);
            for tag in *tags {
                asset.push_tag(Tag::from(*tag));
            }
            discovery.assets.insert(AssetName::from(*name), asset);
        }
        let mut registry = AssetRegistry::default();
        registry.register(asset_type, discovery);
        registry
    }

    #[test]
    fn grass_tags_map_down_the_first_column() {
        let mut registry = registry_with(AssetType::Tile, &[("grass", &["default", "rotated"])]);
        registry.mark_stitched(AssetType::Tile, 32, 64).unwrap();

        map_to_pixels(&mut registry, &config(), AssetType::Tile).unwrap();

        let grass = registry.get(AssetType::Tile, "grass").unwrap();
        assert_eq!(
            grass.pixel_rect("default").unwrap(),
            Some(PixelRect { x: 0, y: 0, width: 32, height: 32 })
        );
        assert_eq!(
            grass.pixel_rect("rotated").unwrap(),
            Some(PixelRect { x: 0, y: 32, width: 32, height: 32 })
        );
        assert_eq!(
            registry.state(AssetType::Tile),
            AtlasState::Mapped { width: 32, height: 64 }
        );
    }

    #[test]
    fn blocks_use_block_cell_size() {
        let mut registry = registry_with(AssetType::Block, &[("stone", &["default"]), ("wood", &["default", "side"])]);
        registry.mark_stitched(AssetType::Block, 32, 48).unwrap();

        map_to_pixels(&mut registry, &config(), AssetType::Block).unwrap();

        let wood = registry.get(AssetType::Block, "wood").unwrap();
        assert_eq!(
            wood.pixel_rect("side").unwrap(),
            Some(PixelRect { x: 16, y: 24, width: 16, height: 24 })
        );
    }

    #[test]
    fn mapping_before_stitching_is_refused() {
        let mut registry = registry_with(AssetType::Tile, &[("grass", &["default"])]);
        assert_eq!(
            map_to_pixels(&mut registry, &config(), AssetType::Tile),
            Err(StateError::NotStitched(AssetType::Tile))
        );
    }

    #[test]
    fn mapping_twice_is_refused() {
        let mut registry = registry_with(AssetType::Tile, &[("grass", &["default"])]);
        registry.mark_stitched(AssetType::Tile, 32, 32).unwrap();
        map_to_pixels(&mut registry, &config(), AssetType::Tile).unwrap();
        assert_eq!(
            map_to_pixels(&mut registry, &config(), AssetType::Tile),
            Err(StateError::AlreadyMapped(AssetType::Tile))
        );
    }

    #[test]
    fn cells_outside_the_atlas_fail_without_partial_mapping() {
        let mut registry = registry_with(AssetType::Tile, &[("grass", &["default", "rotated"])]);
        registry.mark_stitched(AssetType::Tile, 32, 32).unwrap();

        let err = map_to_pixels(&mut registry, &config(), AssetType::Tile).unwrap_err();
        assert!(matches!(err, StateError::OutOfBounds { .. }));

        let grass = registry.get(AssetType::Tile, "grass").unwrap();
        assert!(grass.pixel_rect("default").is_err());
        assert!(matches!(registry.state(AssetType::Tile), AtlasState::Stitched { .. }));
    }
}
