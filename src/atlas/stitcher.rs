//! Texture stitcher: compose a grid of sub-images into one atlas image.
//!
//! The stitcher is synchronous and runs once per asset type at startup.
//! Every source image is copied verbatim into its cell (alpha included, no
//! blending); an image whose size differs from the cell is first resized
//! with nearest-neighbour filtering so pixel art stays crisp. Cells with no
//! image stay fully transparent.

use crate::error::StitchError;
use bevy::log::debug;
use image::imageops::FilterType;
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Decode every path in `grid` (`[column][row]`) and compose the atlas.
///
/// # Errors
/// Returns `StitchError::Decode` if a source image cannot be read and
/// `StitchError::TooLarge` if the atlas dimensions overflow `u32`.
pub fn stitch(grid: &[Vec<PathBuf>], cell_width: u32, cell_height: u32) -> Result<RgbaImage, StitchError> {
    let mut atlas = blank_atlas(grid, cell_width, cell_height)?;

    for (column, paths) in grid.iter().enumerate() {
        for (row, path) in paths.iter().enumerate() {
            let img = image::open(path)
                .map_err(|source| StitchError::Decode {
                    path: path.clone(),
                    source,
                })?
                .to_rgba8();
            let cell = fit_to_cell(img, cell_width, cell_height, path);
            place(&mut atlas, &cell, row, column, cell_width, cell_height);
        }
    }

    Ok(atlas)
}

/// Compose already decoded images. Same layout as [`stitch`].
///
/// # Errors
/// Returns `StitchError::TooLarge` if the atlas dimensions overflow `u32`.
pub fn compose(cells: &[Vec<RgbaImage>], cell_width: u32, cell_height: u32) -> Result<RgbaImage, StitchError> {
    let mut atlas = blank_atlas(cells, cell_width, cell_height)?;
    for (column, images) in cells.iter().enumerate() {
        for (row, img) in images.iter().enumerate() {
            let cell = fit_to_cell(img.clone(), cell_width, cell_height, Path::new("<memory>"));
            place(&mut atlas, &cell, row, column, cell_width, cell_height);
        }
    }
    Ok(atlas)
}

/// Write `atlas` to `path` as PNG, then read it back.
///
/// The returned image is what the renderer uploads, so the GPU copy always
/// matches the file on disk.
///
/// # Errors
/// Returns `StitchError::CreateDir`, `StitchError::Write` or
/// `StitchError::Reload` on I/O or codec failures.
pub fn persist(atlas: &RgbaImage, path: &Path) -> Result<RgbaImage, StitchError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StitchError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    atlas.save(path).map_err(|source| StitchError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    let reloaded = image::open(path).map_err(|source| StitchError::Reload {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(reloaded.to_rgba8())
}

/// Transparent canvas sized for `grid`. An empty grid still gets one cell
/// so the PNG can be written and reloaded.
fn blank_atlas<T>(grid: &[Vec<T>], cell_width: u32, cell_height: u32) -> Result<RgbaImage, StitchError> {
    let columns = grid.len().max(1);
    let rows = grid.iter().map(Vec::len).max().unwrap_or(0).max(1);

    let too_large = || StitchError::TooLarge {
        columns,
        rows,
        cell_width,
        cell_height,
    };
    let width = u32::try_from(columns)
        .ok()
        .and_then(|c| c.checked_mul(cell_width))
        .ok_or_else(too_large)?;
    let height = u32::try_from(rows)
        .ok()
        .and_then(|r| r.checked_mul(cell_height))
        .ok_or_else(too_large)?;

    Ok(RgbaImage::new(width, height))
}

fn fit_to_cell(img: RgbaImage, cell_width: u32, cell_height: u32, path: &Path) -> RgbaImage {
    if img.width() == cell_width && img.height() == cell_height {
        return img;
    }
    debug!(
        "resizing {} from {}x{} to {cell_width}x{cell_height}",
        path.display(),
        img.width(),
        img.height()
    );
    image::imageops::resize(&img, cell_width, cell_height, FilterType::Nearest)
}

fn place(atlas: &mut RgbaImage, cell: &RgbaImage, row: usize, column: usize, cell_width: u32, cell_height: u32) {
    // both indices are bounded by the canvas size checked in `blank_atlas`
    let x = i64::from(cell_width) * column as i64;
    let y = i64::from(cell_height) * row as i64;
    image::imageops::replace(atlas, cell, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(px))
    }

    #[test]
    fn atlas_is_columns_wide_and_tallest_column_high() {
        let red = solid(4, 4, [255, 0, 0, 255]);
        let cells = vec![vec![red.clone(), red.clone(), red.clone()], vec![red]];
        let atlas = compose(&cells, 4, 4).unwrap();
        assert_eq!(atlas.dimensions(), (8, 12));
    }

    #[test]
    fn images_land_in_their_cells_and_gaps_stay_transparent() {
        let red = solid(2, 2, [255, 0, 0, 255]);
        let green = solid(2, 2, [0, 255, 0, 255]);
        let blue = solid(2, 2, [0, 0, 255, 255]);
        let atlas = compose(&[vec![red, green], vec![blue]], 2, 2).unwrap();

        assert_eq!(atlas.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(atlas.get_pixel(1, 3), &Rgba([0, 255, 0, 255]));
        assert_eq!(atlas.get_pixel(2, 0), &Rgba([0, 0, 255, 255]));
        // column 1 has only one row
        assert_eq!(atlas.get_pixel(3, 3), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn translucent_pixels_are_copied_not_blended() {
        let ghost = solid(2, 2, [10, 20, 30, 40]);
        let atlas = compose(&[vec![ghost]], 2, 2).unwrap();
        assert_eq!(atlas.get_pixel(1, 1), &Rgba([10, 20, 30, 40]));
    }

    #[test]
    fn mismatched_images_are_resized_to_the_cell() {
        let big = solid(8, 8, [1, 2, 3, 255]);
        let atlas = compose(&[vec![big]], 4, 2).unwrap();
        assert_eq!(atlas.dimensions(), (4, 2));
        assert_eq!(atlas.get_pixel(3, 1), &Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn empty_grid_yields_a_single_transparent_cell() {
        let atlas = compose(&[], 16, 8).unwrap();
        assert_eq!(atlas.dimensions(), (16, 8));
        assert!(atlas.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn stitch_reads_files_and_persist_reloads_identical_pixels() {
        let tmp = tempfile::TempDir::new().unwrap();
        let a = tmp.path().join("a.png");
        let b = tmp.path().join("b.png");
        solid(3, 3, [200, 100, 50, 255]).save(&a).unwrap();
        solid(3, 3, [5, 6, 7, 128]).save(&b).unwrap();

        let atlas = stitch(&[vec![a], vec![b]], 3, 3).unwrap();
        let out = tmp.path().join("out/tiles.png");
        let reloaded = persist(&atlas, &out).unwrap();

        assert!(out.is_file());
        assert_eq!(reloaded, atlas);
        assert_eq!(reloaded.get_pixel(4, 1), &Rgba([5, 6, 7, 128]));
    }

    #[test]
    fn undecodable_source_is_reported_with_its_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bad = tmp.path().join("bad.png");
        std::fs::write(&bad, b"not a png").unwrap();

        let err = stitch(&[vec![bad.clone()]], 2, 2).unwrap_err();
        assert!(matches!(err, StitchError::Decode { path, .. } if path == bad));
    }
}
