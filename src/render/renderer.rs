//! Buffer ownership and frame output.

use std::path::Path;

use crate::color;
use crate::render::framebuffer::FrameBuffer;

/// Owns the color and depth buffers for one frame-sized render target.
pub struct Renderer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![color::BACKGROUND; size],
            depth_buffer: vec![0.0; size], // 0.0 = infinitely far (1/w as w -> infinity)
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.color_buffer = vec![color::BACKGROUND; size];
        self.depth_buffer = vec![0.0; size];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Reset all depths to 0.0 (infinitely far, since we store 1/w).
    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(0.0);
    }

    /// The frame as raw ARGB8888 bytes for the streaming texture.
    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    /// Get a mutable FrameBuffer view into the color and depth buffers.
    pub fn as_framebuffer(&mut self) -> FrameBuffer<'_> {
        FrameBuffer::new(
            &mut self.color_buffer,
            &mut self.depth_buffer,
            self.width,
            self.height,
        )
    }

    /// Save the current frame as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        let img = image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let argb = self.color_buffer[(y * self.width + x) as usize];
            image::Rgba([
                ((argb >> 16) & 0xFF) as u8,
                ((argb >> 8) & 0xFF) as u8,
                (argb & 0xFF) as u8,
                ((argb >> 24) & 0xFF) as u8,
            ])
        });
        img.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_every_pixel() {
        let mut renderer = Renderer::new(4, 4);
        renderer.as_framebuffer().set_pixel(2, 2, 0xFFABCDEF);
        renderer.clear(color::BACKGROUND);
        let mut fb = renderer.as_framebuffer();
        assert_eq!(fb.get_pixel(2, 2), Some(color::BACKGROUND));
        // Depth survives a color clear until clear_depth.
        assert!(!fb.set_pixel_with_depth(2, 2, -1.0, 0xFF000000));
    }

    #[test]
    fn bytes_are_little_endian_argb() {
        let mut renderer = Renderer::new(1, 1);
        renderer.clear(0xAABBCCDD);
        assert_eq!(renderer.as_bytes(), &[0xDD, 0xCC, 0xBB, 0xAA]);
    }

    #[test]
    fn resize_reallocates_the_buffers() {
        let mut renderer = Renderer::new(2, 2);
        renderer.resize(8, 4);
        assert_eq!(renderer.width(), 8);
        assert_eq!(renderer.height(), 4);
        assert_eq!(renderer.as_bytes().len(), 8 * 4 * 4);
    }
}
