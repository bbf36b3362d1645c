//! Frame buffer abstraction for 2D pixel access.

/// A borrowed view into color and depth buffers.
///
/// Wraps 1D slices with width/height metadata for bounds-checked 2D access.
/// Created temporarily whenever buffers and dimensions travel together.
///
/// # Depth Buffer
///
/// The depth buffer stores 1/w (reciprocal of clip-space W) per pixel, which
/// interpolates linearly in screen space. Larger values are closer to the
/// camera.
pub struct FrameBuffer<'a> {
    color_buffer: &'a mut [u32],
    depth_buffer: &'a mut [f32],
    width: u32,
    height: u32,
}

impl<'a> FrameBuffer<'a> {
    pub fn new(
        color_buffer: &'a mut [u32],
        depth_buffer: &'a mut [f32],
        width: u32,
        height: u32,
    ) -> Self {
        debug_assert_eq!(color_buffer.len(), (width * height) as usize);
        debug_assert_eq!(depth_buffer.len(), (width * height) as usize);
        Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is written only when `depth` (1/w, larger = closer) beats
    /// the stored depth at that location. Out-of-bounds coordinates are
    /// silently ignored. Returns whether the write happened, so callers can
    /// mirror the pixel into auxiliary buffers.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) -> bool {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = (y as u32 * self.width + x as u32) as usize;
            if depth > self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.color_buffer[idx] = color;
                return true;
            }
        }
        false
    }

    /// Set a pixel without depth testing or writing. Used by the outline
    /// shell (drawn behind everything) and the screen-space ink pass.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.color_buffer[(y as u32 * self.width + x as u32) as usize] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.color_buffer[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }
}
