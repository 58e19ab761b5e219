//! Debug artifacts written by the `build` command.
//!
//! The atlas bitmap becomes a PNG whose color type matches the pixel format
//! (gray for SDF, RGB for MSDF, RGBA for MTSDF) and the geometry table
//! becomes the JSON layout document.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use msdf_text_atlas::{AtlasBitmap, AtlasGeometry, AtlasLayout, FontAtlas, PixelFormat};

/// File name of the atlas image inside the output directory
pub const IMAGE_FILE_NAME: &str = "atlas.png";
/// File name of the JSON layout inside the output directory
pub const LAYOUT_FILE_NAME: &str = "atlas.json";

/// Paths of the artifacts written for one atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `None` when the atlas has no pixels (empty charset)
    pub image: Option<PathBuf>,
    pub layout: PathBuf,
}

/// Write `atlas.png` and `atlas.json` into `out_dir`, creating it if needed.
pub fn write_artifacts(atlas: &FontAtlas, out_dir: &Path) -> Result<ArtifactPaths> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let image = if atlas.bitmap.width() == 0 || atlas.bitmap.height() == 0 {
        log::warn!("Atlas bitmap is empty, skipping {}", IMAGE_FILE_NAME);
        None
    } else {
        let path = out_dir.join(IMAGE_FILE_NAME);
        write_atlas_image(&atlas.bitmap, &path)?;
        Some(path)
    };

    let layout = out_dir.join(LAYOUT_FILE_NAME);
    write_layout(&atlas.geometry, &layout)?;

    Ok(ArtifactPaths { image, layout })
}

fn color_type(format: PixelFormat) -> ExtendedColorType {
    match format {
        PixelFormat::Sdf => ExtendedColorType::L8,
        PixelFormat::Msdf => ExtendedColorType::Rgb8,
        PixelFormat::Mtsdf => ExtendedColorType::Rgba8,
    }
}

/// Encode the atlas bitmap as a PNG (rows top-down, as stored).
pub fn write_atlas_image(bitmap: &AtlasBitmap, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    PngEncoder::new(BufWriter::new(file))
        .write_image(
            bitmap.pixels(),
            bitmap.width(),
            bitmap.height(),
            color_type(bitmap.format()),
        )
        .with_context(|| format!("failed to encode {}", path.display()))?;

    log::info!(
        "Wrote {}x{} atlas image to {:?}",
        bitmap.width(),
        bitmap.height(),
        path
    );
    Ok(())
}

/// Serialize the geometry table as the JSON layout document.
pub fn write_layout(geometry: &AtlasGeometry, path: &Path) -> Result<()> {
    let json = AtlasLayout::from_geometry(geometry)
        .to_json()
        .context("failed to serialize atlas layout")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;

    log::info!("Wrote layout for {} glyphs to {:?}", geometry.len(), path);
    Ok(())
}
