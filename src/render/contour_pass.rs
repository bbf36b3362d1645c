//! Screen-space suggestive-contour extraction.
//!
//! The rasterizer fills a [`GBuffer`] with the interpolated view-space
//! normal and position of every visible fragment. This pass then rebuilds
//! the screen-space derivatives of the contour function `c = dot(V, N)`
//! with finite differences and inks the pixels where `c` has a flat spot
//! with genuine curvature, which is where GPU implementations use
//! `dFdx`/`dFdy`.
//!
//! First derivatives are forward differences; second derivatives are
//! backward differences of the forward first differences, so both stencils
//! stay inside a 3x3 neighborhood.

use crate::math::vec3::Vec3;
use crate::render::framebuffer::FrameBuffer;
use crate::shading::{self, FirstDerivatives, SecondDerivatives};

/// Per-pixel geometry written by the rasterizer for visible fragments.
pub struct GBuffer {
    width: u32,
    height: u32,
    normals: Vec<Vec3>,
    view_positions: Vec<Vec3>,
    mask: Vec<bool>,
}

impl GBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            normals: vec![Vec3::ZERO; size],
            view_positions: vec![Vec3::ZERO; size],
            mask: vec![false; size],
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = (width * height) as usize;
        self.width = width;
        self.height = height;
        self.normals = vec![Vec3::ZERO; size];
        self.view_positions = vec![Vec3::ZERO; size];
        self.mask = vec![false; size];
    }

    pub fn clear(&mut self) {
        self.normals.fill(Vec3::ZERO);
        self.view_positions.fill(Vec3::ZERO);
        self.mask.fill(false);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Record the geometry of a visible fragment.
    #[inline]
    pub fn write(&mut self, x: i32, y: i32, normal: Vec3, view_pos: Vec3) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let idx = (y as u32 * self.width + x as u32) as usize;
            self.normals[idx] = normal;
            self.view_positions[idx] = view_pos;
            self.mask[idx] = true;
        }
    }

    #[inline]
    pub fn covered(&self, x: i32, y: i32) -> bool {
        x >= 0
            && x < self.width as i32
            && y >= 0
            && y < self.height as i32
            && self.mask[(y as u32 * self.width + x as u32) as usize]
    }

    /// Unit surface normal at a covered pixel.
    #[inline]
    fn normal_at(&self, x: i32, y: i32) -> Vec3 {
        self.normals[(y as u32 * self.width + x as u32) as usize].normalize()
    }

    /// Unit fragment-to-camera direction at a covered pixel.
    #[inline]
    fn view_dir_at(&self, x: i32, y: i32) -> Vec3 {
        -self.view_positions[(y as u32 * self.width + x as u32) as usize].normalize()
    }

    /// Forward first differences of the normal and view direction at (x, y).
    fn first_derivatives(&self, x: i32, y: i32) -> FirstDerivatives {
        let n = self.normal_at(x, y);
        let v = self.view_dir_at(x, y);
        FirstDerivatives {
            n_x: self.normal_at(x + 1, y) - n,
            n_y: self.normal_at(x, y + 1) - n,
            v_x: self.view_dir_at(x + 1, y) - v,
            v_y: self.view_dir_at(x, y + 1) - v,
        }
    }
}

/// Inks suggestive contours into the color buffer after the main pass.
pub struct SuggestiveContourPass {
    pub epsilon: f32,
    pub ink: u32,
}

impl SuggestiveContourPass {
    pub fn new(epsilon: f32, ink: u32) -> Self {
        Self { epsilon, ink }
    }

    /// Classify every interior pixel with a fully covered 3x3 neighborhood
    /// and paint the suggestive ones.
    pub fn apply(&self, gbuffer: &GBuffer, buffer: &mut FrameBuffer) {
        let width = gbuffer.width() as i32;
        let height = gbuffer.height() as i32;

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                if !self.stencil_covered(gbuffer, x, y) {
                    continue;
                }

                let d1 = gbuffer.first_derivatives(x, y);
                let left = gbuffer.first_derivatives(x - 1, y);
                let up = gbuffer.first_derivatives(x, y - 1);
                let d2 = SecondDerivatives {
                    n_xx: d1.n_x - left.n_x,
                    n_yx: d1.n_x - up.n_x,
                    n_xy: d1.n_y - left.n_y,
                    n_yy: d1.n_y - up.n_y,
                    v_xx: d1.v_x - left.v_x,
                    v_yx: d1.v_x - up.v_x,
                    v_xy: d1.v_y - left.v_y,
                    v_yy: d1.v_y - up.v_y,
                };

                let n = gbuffer.normal_at(x, y);
                let v = gbuffer.view_dir_at(x, y);
                let g = shading::contour_gradient_sq(n, v, &d1);
                let h = shading::contour_hessian_sq(n, v, &d1, &d2);
                if shading::is_suggestive_contour(g, h, self.epsilon) {
                    buffer.set_pixel(x, y, self.ink);
                }
            }
        }
    }

    /// The difference stencils sample the full 3x3 neighborhood; a single
    /// uncovered neighbor would differentiate across the silhouette.
    fn stencil_covered(&self, gbuffer: &GBuffer, x: i32, y: i32) -> bool {
        for dy in -1..=1 {
            for dx in -1..=1 {
                if !gbuffer.covered(x + dx, y + dy) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;
    use crate::shading::SUGGESTIVE_EPSILON;

    const SIZE: u32 = 9;

    fn run_pass(gbuffer: &GBuffer) -> Vec<u32> {
        let mut colors = vec![color::BACKGROUND; (SIZE * SIZE) as usize];
        let mut depth = vec![0.0f32; (SIZE * SIZE) as usize];
        let mut fb = FrameBuffer::new(&mut colors, &mut depth, SIZE, SIZE);
        SuggestiveContourPass::new(SUGGESTIVE_EPSILON, color::INK_CYAN).apply(gbuffer, &mut fb);
        colors
    }

    #[test]
    fn flat_patch_stays_uninked() {
        // Constant geometry: g = 0 everywhere, but h = 0 too.
        let mut gb = GBuffer::new(SIZE, SIZE);
        for y in 0..SIZE as i32 {
            for x in 0..SIZE as i32 {
                gb.write(x, y, Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 5.0));
            }
        }
        let pixels = run_pass(&gb);
        assert!(pixels.iter().all(|&p| p == color::BACKGROUND));
    }

    #[test]
    fn curved_flat_spot_gets_inked() {
        // Normals tilt symmetrically away from the center column: at the
        // center the contour gradient nearly vanishes while the second
        // derivative does not, the defining suggestive-contour situation.
        let mut gb = GBuffer::new(SIZE, SIZE);
        let k = 0.05;
        for y in 0..SIZE as i32 {
            for x in 0..SIZE as i32 {
                let dx = (x - 4) as f32;
                let normal = Vec3::new(k * dx, 0.0, -1.0).normalize();
                gb.write(x, y, normal, Vec3::new(0.0, 0.0, 5.0));
            }
        }
        let pixels = run_pass(&gb);
        let center = (4 * SIZE + 4) as usize;
        assert_eq!(pixels[center], color::INK_CYAN);
    }

    #[test]
    fn silhouette_neighbors_are_skipped() {
        // Same curved field, but a hole in coverage next to the center: the
        // stencil refuses to differentiate across it.
        let mut gb = GBuffer::new(SIZE, SIZE);
        let k = 0.05;
        for y in 0..SIZE as i32 {
            for x in 0..SIZE as i32 {
                if x == 5 && y == 4 {
                    continue;
                }
                let dx = (x - 4) as f32;
                let normal = Vec3::new(k * dx, 0.0, -1.0).normalize();
                gb.write(x, y, normal, Vec3::new(0.0, 0.0, 5.0));
            }
        }
        let pixels = run_pass(&gb);
        let center = (4 * SIZE + 4) as usize;
        assert_eq!(pixels[center], color::BACKGROUND);
    }
}
