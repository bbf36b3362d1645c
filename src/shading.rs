//! Reflectance models and line-extraction classifiers.
//!
//! Everything in this module is a pure function over view-space vectors.
//! The rasterizer decides *where* these run (per vertex, per fragment, or in
//! a screen-space pass); the math itself carries no per-frame state.
//!
//! # Conventions
//!
//! - `normal` (N): unit surface normal in view space.
//! - `light_dir` (L): unit direction the light travels, source toward target,
//!   in view space. Diffuse terms therefore use `-L`.
//! - `view_dir` (V): unit direction from the surface point toward the camera.
//!   In view space the camera sits at the origin, so `V = -normalize(p)`.

use crate::math::vec3::Vec3;

/// Phong specular exponent shared by every specular variant.
pub const SHININESS: f32 = 70.0;

/// Default cutoff for the simple contour classifier (`|dot(V, N)|`).
pub const CONTOUR_THRESHOLD: f32 = 0.175;

/// Default gradient cutoff for the suggestive-contour classifier.
pub const SUGGESTIVE_EPSILON: f32 = 0.001;

/// Diffuse, ambient and specular colors fed to the reflectance models.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceColors {
    pub diffuse: Vec3,
    pub ambient: Vec3,
    pub specular: Vec3,
}

/// Lambertian (cosine) term: `max(dot(-L, N), 0)`.
#[inline]
pub fn lambertian(normal: Vec3, light_dir: Vec3) -> f32 {
    (-light_dir).dot(normal).max(0.0)
}

/// Half-Lambert lighting strength, remapped into [0, 1].
///
/// Used by the cel quantizer so surfaces facing fully away from the light
/// still land in a visible band instead of clipping to black.
#[inline]
pub fn half_lambert(normal: Vec3, light_dir: Vec3) -> f32 {
    (-light_dir).dot(normal) * 0.5 + 0.5
}

/// Phong specular term, gated on the surface actually facing the light.
///
/// `pow(max(dot(reflect(L, N), -V), 0), 70)` when the Lambertian term is
/// positive, else 0.
#[inline]
pub fn phong_specular(normal: Vec3, light_dir: Vec3, view_dir: Vec3) -> f32 {
    if lambertian(normal, light_dir) <= 0.0 {
        return 0.0;
    }
    let reflection = light_dir.reflect(normal);
    reflection.dot(-view_dir).max(0.0).powf(SHININESS)
}

/// Full Phong reflectance: `lambertian * diffuse + ambient + specular * specular_color`.
///
/// The sum is intentionally not clamped to 1.0; a fully lit highlight
/// overflows the displayable range and saturates only at pack time.
#[inline]
pub fn phong(normal: Vec3, light_dir: Vec3, view_dir: Vec3, colors: &SurfaceColors) -> Vec3 {
    let diffuse = colors.diffuse * lambertian(normal, light_dir);
    let specular = colors.specular * phong_specular(normal, light_dir, view_dir);
    diffuse + colors.ambient + specular
}

/// Lambert reflectance: diffuse term only.
#[inline]
pub fn lambert(normal: Vec3, light_dir: Vec3, diffuse: Vec3) -> Vec3 {
    diffuse * lambertian(normal, light_dir)
}

/// Rec. 601 luma of an RGB color.
#[inline]
pub fn luminance(color: Vec3) -> f32 {
    0.299 * color.x + 0.587 * color.y + 0.114 * color.z
}

/// Cel quantizer: buckets a lighting strength into five bands.
///
/// Band boundaries are strict `>` comparisons, so a strength of exactly 0.8
/// falls into the 0.75 band.
#[inline]
pub fn cel_band(strength: f32) -> f32 {
    if strength > 0.8 {
        1.0
    } else if strength > 0.6 {
        0.75
    } else if strength > 0.4 {
        0.5
    } else if strength > 0.2 {
        0.25
    } else {
        0.0
    }
}

/// Cel quantizer with gamma-compensated multipliers.
///
/// Used when quantizing the greyscale luma of an already-lit color. The
/// multipliers are empirical: on an sRGB display, scaling 0xffffff by 0.5
/// reads back as roughly 0.2159 grey, so the perceptually even bands need
/// these non-linear values. Do not "fix" them analytically.
#[inline]
pub fn cel_band_gamma(strength: f32) -> f32 {
    if strength > 0.8 {
        1.0
    } else if strength > 0.6 {
        0.5210
    } else if strength > 0.4 {
        0.2159
    } else if strength > 0.2 {
        0.0513
    } else {
        0.0
    }
}

/// Simple contour test: the view ray grazes the surface.
///
/// `c = dot(V, N)`; fragments with `|c| <= threshold` are silhouette pixels.
/// Symmetric in the sign of `c` so back-facing grazing fragments classify
/// identically.
#[inline]
pub fn is_contour(c: f32, threshold: f32) -> bool {
    c <= threshold && c >= -threshold
}

/// Projects the view vector onto the surface's tangent plane.
///
/// This is the "w" vector of the suggestive-contours formulation: the
/// direction on the surface along which the radial curvature is measured.
#[inline]
pub fn tangent_projection(view_dir: Vec3, normal: Vec3) -> Vec3 {
    (view_dir - normal * view_dir.dot(normal)).normalize()
}

/// Screen-space first derivatives of the interpolated normal and viewer
/// vectors at a fragment, one pair per screen axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstDerivatives {
    pub n_x: Vec3,
    pub n_y: Vec3,
    pub v_x: Vec3,
    pub v_y: Vec3,
}

/// Screen-space second derivatives (derivatives of [`FirstDerivatives`]).
///
/// The mixed entries are kept separate because the finite-difference
/// construction does not make them symmetric.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondDerivatives {
    pub n_xx: Vec3,
    pub n_yx: Vec3,
    pub n_xy: Vec3,
    pub n_yy: Vec3,
    pub v_xx: Vec3,
    pub v_yx: Vec3,
    pub v_xy: Vec3,
    pub v_yy: Vec3,
}

/// Gradient of the contour function `c = dot(V, N)` by the chain rule:
/// `dc/dx = dot(dN/dx, V) + dot(N, dV/dx)`, likewise for y.
#[inline]
pub fn contour_gradient(normal: Vec3, view_dir: Vec3, d: &FirstDerivatives) -> (f32, f32) {
    let c_x = d.n_x.dot(view_dir) + normal.dot(d.v_x);
    let c_y = d.n_y.dot(view_dir) + normal.dot(d.v_y);
    (c_x, c_y)
}

/// Squared magnitude of the contour gradient, `g = |grad c|^2`.
#[inline]
pub fn contour_gradient_sq(normal: Vec3, view_dir: Vec3, d: &FirstDerivatives) -> f32 {
    let (c_x, c_y) = contour_gradient(normal, view_dir, d);
    c_x * c_x + c_y * c_y
}

/// Squared Frobenius magnitude of the Hessian-like matrix of `c`.
///
/// The four entries reproduce the reference shader's nested-derivative
/// expansion exactly, including its asymmetric cross terms:
///
/// ```text
/// c_xx = dot(n_xx, V) + 2*dot(n_x, v_x) + dot(N, v_xx)
/// c_yx = dot(n_yx, V) + 2*dot(n_y, v_y) + dot(N, v_yx)
/// c_xy = dot(n_xy, V) + 2*dot(n_x, v_x) + dot(N, v_xy)
/// c_yy = dot(n_yy, V) + 2*dot(n_y, v_y) + dot(N, v_yy)
/// ```
#[inline]
pub fn contour_hessian_sq(
    normal: Vec3,
    view_dir: Vec3,
    d1: &FirstDerivatives,
    d2: &SecondDerivatives,
) -> f32 {
    let c_xx = d2.n_xx.dot(view_dir) + 2.0 * d1.n_x.dot(d1.v_x) + normal.dot(d2.v_xx);
    let c_yx = d2.n_yx.dot(view_dir) + 2.0 * d1.n_y.dot(d1.v_y) + normal.dot(d2.v_yx);
    let c_xy = d2.n_xy.dot(view_dir) + 2.0 * d1.n_x.dot(d1.v_x) + normal.dot(d2.v_xy);
    let c_yy = d2.n_yy.dot(view_dir) + 2.0 * d1.n_y.dot(d1.v_y) + normal.dot(d2.v_yy);
    c_xx * c_xx + c_yx * c_yx + c_xy * c_xy + c_yy * c_yy
}

/// Suggestive-contour classification: the contour function has a flat spot
/// (`0 <= g <= epsilon`) that is a genuine extremum (`h > 0`).
///
/// The `h > 0` test is what keeps planar regions (g = 0 but also h = 0)
/// from being inked.
#[inline]
pub fn is_suggestive_contour(g: f32, h: f32, epsilon: f32) -> bool {
    g >= 0.0 && g <= epsilon && h > 0.0
}
