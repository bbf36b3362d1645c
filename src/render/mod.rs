//! Rendering: framebuffer views, the triangle rasterizer, fragment shaders
//! and the screen-space contour pass.

pub mod contour_pass;
pub mod framebuffer;
pub mod rasterizer;
pub mod renderer;
pub mod shaders;

pub use contour_pass::{GBuffer, SuggestiveContourPass};
pub use framebuffer::FrameBuffer;
pub use rasterizer::{EdgeFunctionRasterizer, FragmentShader, ScreenTriangle, Varyings};
pub use renderer::Renderer;
