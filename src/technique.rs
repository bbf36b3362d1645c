//! Shading technique selection and per-scene shading parameters.

use std::fmt;

use crate::math::vec3::Vec3;
use crate::shading;

/// Which shading or line-extraction technique the engine renders with.
///
/// Number keys 1-9 and 0 cycle through these at runtime; `G` selects the
/// suggestive-contour pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Technique {
    /// View-space normals remapped into RGB (key: 1)
    Normals,
    /// View vectors remapped into RGB (key: 2)
    ViewVectors,
    /// View vector projected onto the tangent plane (key: 3)
    TangentProjection,
    /// One Phong evaluation per face (key: 4)
    Flat,
    /// Phong at the vertices, colors interpolated (key: 5)
    Gouraud,
    /// Phong per fragment (key: 6)
    #[default]
    Phong,
    /// Diffuse-only per fragment (key: 7)
    Lambert,
    /// Half-Lambert strength quantized into five bands (key: 8)
    Cel,
    /// Full Phong quantized by luma with gamma-compensated bands (key: 9)
    CelPhong,
    /// Cel shading plus inked silhouette contours (key: 0)
    CelContour,
    /// Cel contours plus the screen-space suggestive-contour pass (key: G)
    SuggestiveContour,
}

impl Technique {
    pub const ALL: [Technique; 11] = [
        Technique::Normals,
        Technique::ViewVectors,
        Technique::TangentProjection,
        Technique::Flat,
        Technique::Gouraud,
        Technique::Phong,
        Technique::Lambert,
        Technique::Cel,
        Technique::CelPhong,
        Technique::CelContour,
        Technique::SuggestiveContour,
    ];

    /// Parse a command-line technique name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normals" => Some(Technique::Normals),
            "view" => Some(Technique::ViewVectors),
            "tangent" => Some(Technique::TangentProjection),
            "flat" => Some(Technique::Flat),
            "gouraud" => Some(Technique::Gouraud),
            "phong" => Some(Technique::Phong),
            "lambert" => Some(Technique::Lambert),
            "cel" => Some(Technique::Cel),
            "cel-phong" => Some(Technique::CelPhong),
            "cel-contour" => Some(Technique::CelContour),
            "suggestive" => Some(Technique::SuggestiveContour),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Technique::Normals => "normals",
            Technique::ViewVectors => "view",
            Technique::TangentProjection => "tangent",
            Technique::Flat => "flat",
            Technique::Gouraud => "gouraud",
            Technique::Phong => "phong",
            Technique::Lambert => "lambert",
            Technique::Cel => "cel",
            Technique::CelPhong => "cel-phong",
            Technique::CelContour => "cel-contour",
            Technique::SuggestiveContour => "suggestive",
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-scene shading parameters shared by every technique.
#[derive(Debug, Clone, Copy)]
pub struct Uniforms {
    pub diffuse_color: Vec3,
    pub ambient_color: Vec3,
    pub specular_color: Vec3,
    /// Ink used by the suggestive-contour pass. Simple contours always ink
    /// black so the two line families stay distinguishable.
    pub ink_color: u32,
    pub contour_threshold: f32,
    pub suggestive_epsilon: f32,
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            diffuse_color: Vec3::ONE,
            // 0x101010 as floats
            ambient_color: Vec3::splat(0.0627),
            specular_color: Vec3::ONE,
            ink_color: crate::color::INK_CYAN,
            contour_threshold: shading::CONTOUR_THRESHOLD,
            suggestive_epsilon: shading::SUGGESTIVE_EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_technique_round_trips_through_its_name() {
        for technique in Technique::ALL {
            assert_eq!(Technique::from_name(technique.name()), Some(technique));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(Technique::from_name("wireframe"), None);
    }
}
