//! ARGB8888 color packing and the fixed palette used by the demos.

use crate::math::vec3::Vec3;

pub const BACKGROUND: u32 = 0xFF1A1A1A;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const INK_BLACK: u32 = 0xFF000000;
pub const INK_CYAN: u32 = 0xFF00FFFF;

/// Pack an RGB color in [0, 1] floats into an opaque ARGB8888 pixel.
///
/// Channels are clamped here, at the display boundary. The shading math
/// itself can and does produce values above 1.0 (Phong ambient + specular
/// overflow), which is preserved behavior.
#[inline]
pub fn pack(rgb: Vec3) -> u32 {
    let r = (rgb.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (rgb.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (rgb.z.clamp(0.0, 1.0) * 255.0) as u32;
    0xFF00_0000 | (r << 16) | (g << 8) | b
}

/// Unpack an ARGB8888 pixel into RGB floats in [0, 1], dropping alpha.
#[inline]
pub fn unpack(color: u32) -> Vec3 {
    Vec3::new(
        ((color >> 16) & 0xFF) as f32 / 255.0,
        ((color >> 8) & 0xFF) as f32 / 255.0,
        (color & 0xFF) as f32 / 255.0,
    )
}

/// Remap a unit vector's components from [-1, 1] into RGB [0, 1].
///
/// The convention every normal/view visualization shader uses:
/// `v * 0.5 + 0.5`.
#[inline]
pub fn from_unit_vector(v: Vec3) -> u32 {
    pack(v * 0.5 + Vec3::splat(0.5))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_round_trip() {
        let c = Vec3::new(0.25, 0.5, 1.0);
        let unpacked = unpack(pack(c));
        assert!((unpacked.x - c.x).abs() < 1.0 / 255.0);
        assert!((unpacked.y - c.y).abs() < 1.0 / 255.0);
        assert!((unpacked.z - c.z).abs() < 1.0 / 255.0);
    }

    #[test]
    fn pack_clamps_overflow() {
        // Phong output can exceed 1.0; packing must saturate, not wrap.
        assert_eq!(pack(Vec3::new(2.0, -1.0, 0.0)), 0xFFFF0000);
    }

    #[test]
    fn unit_vector_midpoint_is_grey() {
        assert_eq!(from_unit_vector(Vec3::ZERO), 0xFF7F7F7F);
    }
}
