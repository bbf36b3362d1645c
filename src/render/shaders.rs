//! Fragment shaders, one per shading technique.
//!
//! Each shader is a thin struct over [`ShaderContext`] that turns the
//! interpolated varyings into a packed color using the pure functions in
//! [`crate::shading`]. View-space convention: the camera sits at the origin,
//! so the unit direction from a fragment toward the camera is
//! `-view_pos.normalize()`.

use crate::color;
use crate::math::vec3::Vec3;
use crate::render::rasterizer::FragmentShader;
use crate::shading::{self, SurfaceColors};
use crate::technique::Uniforms;

/// Per-frame state shared by the lit shaders.
#[derive(Debug, Clone, Copy)]
pub struct ShaderContext {
    /// Unit direction the light travels, in view space.
    pub light_dir: Vec3,
    pub uniforms: Uniforms,
}

impl ShaderContext {
    pub fn surface_colors(&self) -> SurfaceColors {
        SurfaceColors {
            diffuse: self.uniforms.diffuse_color,
            ambient: self.uniforms.ambient_color,
            specular: self.uniforms.specular_color,
        }
    }
}

/// Constant color for every fragment. Drives flat shading (color computed
/// once per face) and the outline shell.
pub struct SolidShader {
    color: u32,
}

impl SolidShader {
    pub fn new(color: u32) -> Self {
        Self { color }
    }
}

impl FragmentShader for SolidShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], _normal: Vec3, _view_pos: Vec3) -> u32 {
        self.color
    }
}

/// Interpolates colors evaluated at the vertices (Gouraud shading).
pub struct GouraudShader {
    colors: [Vec3; 3],
}

impl GouraudShader {
    pub fn new(colors: [Vec3; 3]) -> Self {
        Self { colors }
    }
}

impl FragmentShader for GouraudShader {
    #[inline]
    fn shade(&self, lambda: [f32; 3], _normal: Vec3, _view_pos: Vec3) -> u32 {
        let rgb = self.colors[0] * lambda[0]
            + self.colors[1] * lambda[1]
            + self.colors[2] * lambda[2];
        color::pack(rgb)
    }
}

/// View-space normals remapped into RGB.
pub struct NormalShader;

impl FragmentShader for NormalShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], normal: Vec3, _view_pos: Vec3) -> u32 {
        color::from_unit_vector(normal.normalize())
    }
}

/// Fragment-to-camera directions remapped into RGB.
pub struct ViewShader;

impl FragmentShader for ViewShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], _normal: Vec3, view_pos: Vec3) -> u32 {
        color::from_unit_vector(-view_pos.normalize())
    }
}

/// The view direction projected onto the tangent plane, remapped into RGB.
pub struct TangentProjectionShader;

impl FragmentShader for TangentProjectionShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], normal: Vec3, view_pos: Vec3) -> u32 {
        let view_dir = -view_pos.normalize();
        let w = shading::tangent_projection(view_dir, normal.normalize());
        color::from_unit_vector(w)
    }
}

/// Per-fragment Phong reflectance.
pub struct PhongShader<'a> {
    ctx: &'a ShaderContext,
}

impl<'a> PhongShader<'a> {
    pub fn new(ctx: &'a ShaderContext) -> Self {
        Self { ctx }
    }
}

impl FragmentShader for PhongShader<'_> {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], normal: Vec3, view_pos: Vec3) -> u32 {
        let n = normal.normalize();
        let view_dir = -view_pos.normalize();
        let rgb = shading::phong(n, self.ctx.light_dir, view_dir, &self.ctx.surface_colors());
        color::pack(rgb)
    }
}

/// Diffuse-only (Lambert) reflectance plus ambient.
pub struct LambertShader<'a> {
    ctx: &'a ShaderContext,
}

impl<'a> LambertShader<'a> {
    pub fn new(ctx: &'a ShaderContext) -> Self {
        Self { ctx }
    }
}

impl FragmentShader for LambertShader<'_> {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], normal: Vec3, _view_pos: Vec3) -> u32 {
        let n = normal.normalize();
        let rgb = shading::lambert(n, self.ctx.light_dir, self.ctx.uniforms.diffuse_color)
            + self.ctx.uniforms.ambient_color;
        color::pack(rgb)
    }
}

/// Half-Lambert strength quantized into five bands.
pub struct CelShader<'a> {
    ctx: &'a ShaderContext,
}

impl<'a> CelShader<'a> {
    pub fn new(ctx: &'a ShaderContext) -> Self {
        Self { ctx }
    }

    #[inline]
    fn cel_color(&self, normal: Vec3) -> Vec3 {
        let strength = shading::half_lambert(normal, self.ctx.light_dir);
        self.ctx.uniforms.diffuse_color * shading::cel_band(strength)
            + self.ctx.uniforms.ambient_color
    }
}

impl FragmentShader for CelShader<'_> {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], normal: Vec3, _view_pos: Vec3) -> u32 {
        color::pack(self.cel_color(normal.normalize()))
    }
}

/// Full Phong evaluated per fragment, then quantized by its luma with the
/// gamma-compensated band multipliers.
pub struct CelPhongShader<'a> {
    ctx: &'a ShaderContext,
}

impl<'a> CelPhongShader<'a> {
    pub fn new(ctx: &'a ShaderContext) -> Self {
        Self { ctx }
    }
}

impl FragmentShader for CelPhongShader<'_> {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], normal: Vec3, view_pos: Vec3) -> u32 {
        let n = normal.normalize();
        let view_dir = -view_pos.normalize();
        let lit = shading::phong(n, self.ctx.light_dir, view_dir, &self.ctx.surface_colors());
        let band = shading::cel_band_gamma(shading::luminance(lit));
        color::pack(self.ctx.uniforms.diffuse_color * band)
    }
}

/// Cel shading with grazing-angle fragments inked black.
pub struct CelContourShader<'a> {
    cel: CelShader<'a>,
    threshold: f32,
}

impl<'a> CelContourShader<'a> {
    pub fn new(ctx: &'a ShaderContext) -> Self {
        Self {
            cel: CelShader::new(ctx),
            threshold: ctx.uniforms.contour_threshold,
        }
    }
}

impl FragmentShader for CelContourShader<'_> {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], normal: Vec3, view_pos: Vec3) -> u32 {
        let n = normal.normalize();
        let c = (-view_pos.normalize()).dot(n);
        if shading::is_contour(c, self.threshold) {
            return color::INK_BLACK;
        }
        color::pack(self.cel.cel_color(n))
    }
}
