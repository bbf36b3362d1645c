//! Edge function triangle rasterization.
//!
//! For an edge from A to B, the edge function at point P is
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! the 2D cross product (B - A) x (P - A). A pixel is inside the triangle
//! when all three edge functions share the sign of the triangle's signed
//! area, and the normalized values are the barycentric weights used for
//! attribute interpolation.
//!
//! References: Pineda, "A Parallel Algorithm for Polygon Rasterization"
//! (1988).

use crate::math::vec3::Vec3;
use crate::render::contour_pass::GBuffer;
use crate::render::framebuffer::FrameBuffer;

/// Per-vertex attributes interpolated across the triangle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Varyings {
    /// View-space vertex normal (unit at the vertices; renormalized by
    /// shaders after interpolation).
    pub normal: Vec3,
    /// View-space vertex position.
    pub view_pos: Vec3,
}

/// A projected triangle ready for rasterization.
///
/// `points` hold screen-space x and y; z carries the clip-space w for depth.
#[derive(Debug, Clone, Copy)]
pub struct ScreenTriangle {
    pub points: [Vec3; 3],
    pub varyings: [Varyings; 3],
}

/// Per-fragment shading, called once per covered pixel.
///
/// `lambda` are the barycentric weights; `normal` and `view_pos` arrive
/// already interpolated.
pub trait FragmentShader {
    fn shade(&self, lambda: [f32; 3], normal: Vec3, view_pos: Vec3) -> u32;
}

/// Triangle rasterizer iterating the bounding box with edge functions.
#[derive(Default)]
pub struct EdgeFunctionRasterizer;

impl EdgeFunctionRasterizer {
    pub fn new() -> Self {
        EdgeFunctionRasterizer {}
    }

    #[inline]
    fn edge_function(a: Vec3, b: Vec3, p: Vec3) -> f32 {
        (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
    }

    /// Rasterize a triangle through the given fragment shader.
    ///
    /// With `depth_write` the fragment runs the usual 1/w depth test and, on
    /// a pass, also lands in `gbuffer` (when one is supplied). Without it the
    /// color buffer is written unconditionally, which is how the outline
    /// shell stays behind everything drawn afterwards.
    pub fn rasterize<S: FragmentShader>(
        &self,
        triangle: &ScreenTriangle,
        buffer: &mut FrameBuffer,
        mut gbuffer: Option<&mut GBuffer>,
        shader: &S,
        depth_write: bool,
    ) {
        let [v0, v1, v2] = triangle.points;

        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(buffer.width() as i32 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(buffer.height() as i32 - 1);

        let area = Self::edge_function(v0, v1, v2);
        if area.abs() < f32::EPSILON {
            return; // degenerate
        }
        let inv_area = 1.0 / area;

        // 1/w per vertex; linear in screen space.
        let inv_w = [1.0 / v0.z, 1.0 / v1.z, 1.0 / v2.z];
        let [a0, a1, a2] = triangle.varyings;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at pixel center
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);

                let w0 = Self::edge_function(v1, v2, p);
                let w1 = Self::edge_function(v2, v0, p);
                let w2 = Self::edge_function(v0, v1, p);

                // Inside test handling both windings.
                let inside = if area > 0.0 {
                    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                } else {
                    w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                };
                if !inside {
                    continue;
                }

                let lambda = [w0 * inv_area, w1 * inv_area, w2 * inv_area];
                let normal =
                    a0.normal * lambda[0] + a1.normal * lambda[1] + a2.normal * lambda[2];
                let view_pos =
                    a0.view_pos * lambda[0] + a1.view_pos * lambda[1] + a2.view_pos * lambda[2];

                let color = shader.shade(lambda, normal, view_pos);

                if depth_write {
                    let depth =
                        inv_w[0] * lambda[0] + inv_w[1] * lambda[1] + inv_w[2] * lambda[2];
                    if buffer.set_pixel_with_depth(x, y, depth, color) {
                        if let Some(gb) = gbuffer.as_deref_mut() {
                            gb.write(x, y, normal, view_pos);
                        }
                    }
                } else {
                    buffer.set_pixel(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color;

    struct SolidShader(u32);

    impl FragmentShader for SolidShader {
        fn shade(&self, _lambda: [f32; 3], _normal: Vec3, _view_pos: Vec3) -> u32 {
            self.0
        }
    }

    /// Interpolated normal remapped into RGB, for interpolation checks.
    struct NormalProbe;

    impl FragmentShader for NormalProbe {
        fn shade(&self, _lambda: [f32; 3], normal: Vec3, _view_pos: Vec3) -> u32 {
            color::from_unit_vector(normal.normalize())
        }
    }

    fn triangle(points: [Vec3; 3]) -> ScreenTriangle {
        ScreenTriangle {
            points,
            varyings: [Varyings::default(); 3],
        }
    }

    fn raster_into(
        tri: &ScreenTriangle,
        shader: &impl FragmentShader,
        depth_write: bool,
        size: u32,
    ) -> Vec<u32> {
        let mut color = vec![0u32; (size * size) as usize];
        let mut depth = vec![0.0f32; (size * size) as usize];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, size, size);
        EdgeFunctionRasterizer::new().rasterize(tri, &mut fb, None, shader, depth_write);
        color
    }

    #[test]
    fn covers_pixels_inside_the_triangle() {
        let tri = triangle([
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(14.0, 1.0, 1.0),
            Vec3::new(1.0, 14.0, 1.0),
        ]);
        let pixels = raster_into(&tri, &SolidShader(0xFFFFFFFF), true, 16);
        // Centroid is covered, far corner is not.
        assert_eq!(pixels[5 * 16 + 5], 0xFFFFFFFF);
        assert_eq!(pixels[15 * 16 + 15], 0);
    }

    #[test]
    fn both_windings_are_filled() {
        let ccw = triangle([
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(14.0, 1.0, 1.0),
            Vec3::new(1.0, 14.0, 1.0),
        ]);
        let mut cw = ccw;
        cw.points.swap(1, 2);
        let a = raster_into(&ccw, &SolidShader(0xFF0000FF), true, 16);
        let b = raster_into(&cw, &SolidShader(0xFF0000FF), true, 16);
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let tri = triangle([
            Vec3::new(2.0, 2.0, 1.0),
            Vec3::new(8.0, 8.0, 1.0),
            Vec3::new(5.0, 5.0, 1.0),
        ]);
        let pixels = raster_into(&tri, &SolidShader(0xFFFFFFFF), true, 16);
        assert!(pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn closer_triangle_wins_the_depth_test() {
        let mut color = vec![0u32; 256];
        let mut depth = vec![0.0f32; 256];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 16, 16);
        let raster = EdgeFunctionRasterizer::new();

        let mut far = triangle([
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(15.0, 0.0, 10.0),
            Vec3::new(0.0, 15.0, 10.0),
        ]);
        raster.rasterize(&far, &mut fb, None, &SolidShader(0xFF111111), true);

        far.points.iter_mut().for_each(|p| p.z = 5.0); // closer: larger 1/w
        raster.rasterize(&far, &mut fb, None, &SolidShader(0xFF222222), true);
        assert_eq!(fb.get_pixel(4, 4), Some(0xFF222222));

        far.points.iter_mut().for_each(|p| p.z = 20.0); // farther again
        raster.rasterize(&far, &mut fb, None, &SolidShader(0xFF333333), true);
        assert_eq!(fb.get_pixel(4, 4), Some(0xFF222222));
    }

    #[test]
    fn varyings_interpolate_across_the_face() {
        let mut tri = triangle([
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(15.0, 0.0, 1.0),
            Vec3::new(0.0, 15.0, 1.0),
        ]);
        tri.varyings[0].normal = Vec3::new(1.0, 0.0, 0.0);
        tri.varyings[1].normal = Vec3::new(-1.0, 0.0, 0.0);
        tri.varyings[2].normal = Vec3::new(1.0, 0.0, 0.0);
        let pixels = raster_into(&tri, &NormalProbe, true, 16);

        // Near vertex 0 the normal is ~+X (red high), near vertex 1 ~-X.
        let left = color::unpack(pixels[16]);
        let right = color::unpack(pixels[14]);
        assert!(left.x > 0.9);
        assert!(right.x < 0.1);
    }

    #[test]
    fn gbuffer_receives_only_depth_passing_fragments() {
        let mut color = vec![0u32; 64];
        let mut depth = vec![0.0f32; 64];
        let mut fb = FrameBuffer::new(&mut color, &mut depth, 8, 8);
        let mut gb = GBuffer::new(8, 8);
        let raster = EdgeFunctionRasterizer::new();

        let mut tri = triangle([
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(7.0, 0.0, 2.0),
            Vec3::new(0.0, 7.0, 2.0),
        ]);
        tri.varyings = [Varyings {
            normal: Vec3::new(0.0, 0.0, -1.0),
            view_pos: Vec3::new(0.0, 0.0, 2.0),
        }; 3];
        raster.rasterize(&tri, &mut fb, Some(&mut gb), &SolidShader(0xFF0000FF), true);
        assert!(gb.covered(2, 2));
        assert!(!gb.covered(7, 7));
    }
}
