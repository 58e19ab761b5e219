//! The atlas pixel buffer.

use msdf_text_config::PixelFormat;

use crate::packer::Placement;

/// Atlas pixels, rows top to bottom, channels interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasBitmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl AtlasBitmap {
    /// A zeroed bitmap. Zero reads as "far outside" in every channel.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            pixels: vec![0; width as usize * height as usize * format.channels()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Channel values of one pixel, or `None` outside the bitmap
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        self.pixels.get(start..start + channels)
    }

    /// Copy a tightly packed tile into the rectangle `at`. The tile must be
    /// `at.width * at.height` pixels in this bitmap's format.
    pub(crate) fn blit(&mut self, at: &Placement, tile: &[u8]) {
        let channels = self.channels();
        let row_len = at.width as usize * channels;
        let stride = self.width as usize * channels;
        for (row, src) in tile.chunks_exact(row_len).enumerate() {
            let start = (at.y as usize + row) * stride + at.x as usize * channels;
            self.pixels[start..start + row_len].copy_from_slice(src);
        }
    }
}
