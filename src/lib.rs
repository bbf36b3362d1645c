//! A CPU software renderer for comparing shading and line-drawing
//! techniques.
//!
//! The viewer rasterizes a mesh through one of eleven techniques, from
//! classic reflectance models (flat, Gouraud, Phong, Lambert) through cel
//! quantization to screen-space contour and suggestive-contour extraction.
//! SDL2 is used only for windowing and display; every pixel is computed on
//! the CPU.
//!
//! # Quick Start
//!
//! ```ignore
//! use inkline::prelude::*;
//!
//! let config = DemoConfig::default();
//! let mut engine = Engine::from_config(&config);
//! engine.render();
//! ```

pub mod camera;
pub mod color;
pub mod config;
pub mod engine;
pub mod light;
pub mod math;
pub mod mesh;
pub mod primitives;
pub mod shading;
pub mod technique;
pub mod transform;
pub mod window;

pub(crate) mod render;
pub(crate) mod stl;

pub use engine::Engine;
pub use mesh::{LoadError, Mesh};
pub use technique::{Technique, Uniforms};
pub use transform::Transform;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::camera::OrbitCamera;
    pub use crate::config::{DemoConfig, Shape};
    pub use crate::engine::Engine;
    pub use crate::light::DirectionalLight;
    pub use crate::mesh::{LoadError, Mesh};
    pub use crate::technique::{Technique, Uniforms};
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;

    // Window & Input
    pub use crate::window::{FrameInput, FrameLimiter, Window};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::render::{
        EdgeFunctionRasterizer, FragmentShader, FrameBuffer, GBuffer, ScreenTriangle,
        SuggestiveContourPass, Varyings,
    };
}
