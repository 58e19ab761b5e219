//! Atlas texture upload.

use msdf_text_atlas::{AtlasBitmap, PixelFormat};

use crate::error::RenderError;

/// Expand atlas pixels to RGBA8. Single-channel distances are replicated
/// into RGB; formats without alpha get an opaque alpha channel.
pub fn expand_to_rgba8(bitmap: &AtlasBitmap) -> Vec<u8> {
    let pixels = bitmap.pixels();
    match bitmap.format() {
        PixelFormat::Mtsdf => pixels.to_vec(),
        PixelFormat::Msdf => pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        PixelFormat::Sdf => pixels.iter().flat_map(|&d| [d, d, d, 255]).collect(),
    }
}

/// The atlas bitmap as a sampled GPU texture.
pub struct AtlasTexture {
    #[allow(dead_code)] // GPU lifetime: must outlive the TextureView created from it
    texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub width: u32,
    pub height: u32,
}

impl AtlasTexture {
    /// Upload `bitmap` as an `Rgba8Unorm` texture. Distances are linear
    /// data, so the texture is not sRGB.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bitmap: &AtlasBitmap,
    ) -> Result<Self, RenderError> {
        let (width, height) = (bitmap.width(), bitmap.height());
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyAtlas);
        }
        let max = device.limits().max_texture_dimension_2d;
        if width > max || height > max {
            return Err(RenderError::TextureTooLarge { width, height, max });
        }

        let rgba = expand_to_rgba8(bitmap);
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RenderError::InvalidTextureData {
                expected,
                actual: rgba.len(),
            });
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msdf atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("msdf atlas sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        log::info!("Uploaded {width}x{height} {:?} atlas texture", bitmap.format());

        Ok(Self {
            texture,
            view,
            sampler,
            width,
            height,
        })
    }
}
