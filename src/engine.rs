//! Core rendering engine.
//!
//! The [`Engine`] owns the scene (mesh, camera, light, transform) and the
//! render targets, and runs the per-frame pipeline: model-view transform,
//! backface culling, perspective projection, rasterization through the
//! active technique's fragment shader, and for suggestive contours an extra
//! screen-space pass over the G-buffer.

use std::path::Path;

use crate::camera::OrbitCamera;
use crate::color;
use crate::config::{self, DemoConfig, Shape};
use crate::light::DirectionalLight;
use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::mesh::Mesh;
use crate::primitives;
use crate::render::shaders::{
    CelContourShader, CelPhongShader, CelShader, GouraudShader, LambertShader, NormalShader,
    PhongShader, ShaderContext, SolidShader, TangentProjectionShader, ViewShader,
};
use crate::render::{
    EdgeFunctionRasterizer, GBuffer, Renderer, ScreenTriangle, SuggestiveContourPass, Varyings,
};
use crate::shading;
use crate::technique::{Technique, Uniforms};
use crate::transform::Transform;

/// Radians per second of idle model spin.
const SPIN_RATE: f32 = 0.4;

pub struct Engine {
    renderer: Renderer,
    gbuffer: GBuffer,
    rasterizer: EdgeFunctionRasterizer,
    mesh: Mesh,
    shell: Option<Mesh>,
    outline_offset: f32,
    technique: Technique,
    uniforms: Uniforms,
    camera: OrbitCamera,
    light: DirectionalLight,
    transform: Transform,
    projection: Mat4,
}

impl Engine {
    pub fn from_config(config: &DemoConfig) -> Self {
        let mesh = load_shape(&config.shape);
        let outline_offset = config.outline.unwrap_or(config::OUTLINE_OFFSET);
        let shell = config
            .outline
            .map(|offset| mesh.extrude_along_normals(offset));

        Self {
            renderer: Renderer::new(config.width, config.height),
            gbuffer: GBuffer::new(config.width, config.height),
            rasterizer: EdgeFunctionRasterizer::new(),
            mesh,
            shell,
            outline_offset,
            technique: config.technique,
            uniforms: Uniforms::default(),
            camera: OrbitCamera::default(),
            light: DirectionalLight::default(),
            transform: Transform::default(),
            projection: projection_for(config.width, config.height),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.renderer.resize(width, height);
        self.gbuffer.resize(width, height);
        self.projection = projection_for(width, height);
    }

    pub fn set_technique(&mut self, technique: Technique) {
        self.technique = technique;
    }

    pub fn technique(&self) -> Technique {
        self.technique
    }

    pub fn toggle_outline(&mut self) {
        self.shell = match self.shell {
            Some(_) => None,
            None => Some(self.mesh.extrude_along_normals(self.outline_offset)),
        };
    }

    pub fn outline_enabled(&self) -> bool {
        self.shell.is_some()
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    /// The rendered frame as ARGB8888 bytes.
    pub fn frame_bytes(&self) -> &[u8] {
        self.renderer.as_bytes()
    }

    pub fn save_frame(&self, path: &Path) -> Result<(), image::ImageError> {
        self.renderer.save_png(path)
    }

    /// Advance the idle spin. `delta_seconds` is the time since last update.
    pub fn update(&mut self, delta_seconds: f32) {
        self.transform.rotation.y += SPIN_RATE * delta_seconds;
    }

    /// Render one frame into the color buffer.
    pub fn render(&mut self) {
        self.renderer.clear(color::BACKGROUND);
        self.renderer.clear_depth();

        let view = self.camera.view_matrix();
        let model_view = view * self.transform.to_matrix();
        let normal_matrix = model_view
            .inverse()
            .unwrap_or_else(Mat4::identity)
            .transpose();
        let ctx = ShaderContext {
            light_dir: self.light.view_direction(&view),
            uniforms: self.uniforms,
        };
        let width = self.renderer.width() as f32;
        let height = self.renderer.height() as f32;
        let surface = ctx.surface_colors();

        // The outline shell draws first, unculled and without depth writes,
        // so the main mesh paints over it everywhere they overlap and only
        // the extruded rim survives.
        if let Some(shell) = &self.shell {
            let mut fb = self.renderer.as_framebuffer();
            let ink = SolidShader::new(color::INK_BLACK);
            for face in shell.faces() {
                let Some(tri) =
                    assemble(shell, *face, &model_view, &normal_matrix, &self.projection, width, height, false)
                else {
                    continue;
                };
                self.rasterizer.rasterize(&tri, &mut fb, None, &ink, false);
            }
        }

        let suggestive = self.technique == Technique::SuggestiveContour;
        if suggestive {
            self.gbuffer.clear();
        }
        let mut gbuffer = suggestive.then_some(&mut self.gbuffer);

        let mut fb = self.renderer.as_framebuffer();
        for face in self.mesh.faces() {
            let Some(tri) =
                assemble(&self.mesh, *face, &model_view, &normal_matrix, &self.projection, width, height, true)
            else {
                continue;
            };

            match self.technique {
                Technique::Normals => {
                    self.rasterizer.rasterize(&tri, &mut fb, None, &NormalShader, true);
                }
                Technique::ViewVectors => {
                    self.rasterizer.rasterize(&tri, &mut fb, None, &ViewShader, true);
                }
                Technique::TangentProjection => {
                    self.rasterizer
                        .rasterize(&tri, &mut fb, None, &TangentProjectionShader, true);
                }
                Technique::Flat => {
                    // One Phong evaluation at the face centroid with the
                    // geometric face normal.
                    let [a, b, c] = tri.varyings.map(|v| v.view_pos);
                    let n = (b - a).cross(c - a).normalize();
                    let centroid = (a + b + c) / 3.0;
                    let rgb = shading::phong(n, ctx.light_dir, -centroid.normalize(), &surface);
                    let shader = SolidShader::new(color::pack(rgb));
                    self.rasterizer.rasterize(&tri, &mut fb, None, &shader, true);
                }
                Technique::Gouraud => {
                    let colors = tri.varyings.map(|v| {
                        shading::phong(
                            v.normal,
                            ctx.light_dir,
                            -v.view_pos.normalize(),
                            &surface,
                        )
                    });
                    let shader = GouraudShader::new(colors);
                    self.rasterizer.rasterize(&tri, &mut fb, None, &shader, true);
                }
                Technique::Phong => {
                    self.rasterizer
                        .rasterize(&tri, &mut fb, None, &PhongShader::new(&ctx), true);
                }
                Technique::Lambert => {
                    self.rasterizer
                        .rasterize(&tri, &mut fb, None, &LambertShader::new(&ctx), true);
                }
                Technique::Cel => {
                    self.rasterizer
                        .rasterize(&tri, &mut fb, None, &CelShader::new(&ctx), true);
                }
                Technique::CelPhong => {
                    self.rasterizer
                        .rasterize(&tri, &mut fb, None, &CelPhongShader::new(&ctx), true);
                }
                Technique::CelContour => {
                    self.rasterizer
                        .rasterize(&tri, &mut fb, None, &CelContourShader::new(&ctx), true);
                }
                Technique::SuggestiveContour => {
                    self.rasterizer.rasterize(
                        &tri,
                        &mut fb,
                        gbuffer.as_deref_mut(),
                        &CelContourShader::new(&ctx),
                        true,
                    );
                }
            }
        }

        if let Some(gbuffer) = gbuffer {
            SuggestiveContourPass::new(self.uniforms.suggestive_epsilon, self.uniforms.ink_color)
                .apply(gbuffer, &mut fb);
        }
    }
}

fn projection_for(width: u32, height: u32) -> Mat4 {
    Mat4::perspective_lh(
        config::FOV_DEGREES.to_radians(),
        width as f32 / height.max(1) as f32,
        config::NEAR_PLANE,
        config::FAR_PLANE,
    )
}

fn load_shape(shape: &Shape) -> Mesh {
    match shape {
        Shape::Sphere => primitives::sphere(3.0, 32, 16),
        Shape::Torus => primitives::torus(3.0, 1.0, 16, 100),
        Shape::TorusKnot => primitives::torus_knot(2.0, 0.6, 128, 16, 2, 3),
        Shape::Plane => primitives::plane(10.0, 10.0),
        Shape::Stl(path) => Mesh::from_stl(path).unwrap_or_else(|e| {
            eprintln!("failed to load {}: {e}; showing the sphere", path.display());
            primitives::sphere(3.0, 32, 16)
        }),
        Shape::Obj(path) => Mesh::from_obj(path).unwrap_or_else(|e| {
            eprintln!("failed to load {}: {e}; showing the sphere", path.display());
            primitives::sphere(3.0, 32, 16)
        }),
    }
}

/// Transform one face into a screen-space triangle.
///
/// Returns None when the face is backface-culled (main pass only) or any
/// vertex lands on or behind the near plane.
#[allow(clippy::too_many_arguments)]
fn assemble(
    mesh: &Mesh,
    face: [u32; 3],
    model_view: &Mat4,
    normal_matrix: &Mat4,
    projection: &Mat4,
    width: f32,
    height: f32,
    cull: bool,
) -> Option<ScreenTriangle> {
    let view_verts = face.map(|i| model_view.transform_point(mesh.positions()[i as usize]));

    if cull {
        let ab = view_verts[1] - view_verts[0];
        let ac = view_verts[2] - view_verts[0];
        let face_normal = ab.cross(ac);
        // In view space the camera is at the origin, so the ray toward it
        // from the face is just the negated vertex.
        if face_normal.dot(-view_verts[0]) < 0.0 {
            return None;
        }
    }

    let mut points = [Vec3::ZERO; 3];
    for (point, view_pos) in points.iter_mut().zip(&view_verts) {
        let clip = *projection * Vec4::point(*view_pos);
        if clip.w <= 0.0 {
            return None; // behind or on the near plane
        }
        *point = Vec3::new(
            (clip.x / clip.w + 1.0) * 0.5 * width,
            (1.0 - clip.y / clip.w) * 0.5 * height,
            clip.w,
        );
    }

    let mut varyings = [Varyings::default(); 3];
    for (slot, (&i, view_pos)) in face.iter().zip(&view_verts).enumerate() {
        varyings[slot] = Varyings {
            normal: normal_matrix
                .transform_direction(mesh.normals()[i as usize])
                .normalize(),
            view_pos: *view_pos,
        };
    }

    Some(ScreenTriangle { points, varyings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn engine_with(technique: Technique, outline: Option<f32>) -> Engine {
        let config = DemoConfig {
            shape: Shape::Sphere,
            technique,
            outline,
            width: 64,
            height: 64,
            ..DemoConfig::default()
        };
        Engine::from_config(&config)
    }

    fn pixels(engine: &Engine) -> Vec<u32> {
        engine
            .frame_bytes()
            .chunks_exact(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }

    fn center_pixel(engine: &Engine) -> u32 {
        pixels(engine)[32 * 64 + 32]
    }

    #[test]
    fn every_technique_draws_the_sphere() {
        for technique in Technique::ALL {
            let mut engine = engine_with(technique, None);
            engine.render();
            assert_ne!(
                center_pixel(&engine),
                color::BACKGROUND,
                "technique {technique} left the screen empty"
            );
        }
    }

    #[test]
    fn cel_shading_uses_a_handful_of_colors() {
        let mut engine = engine_with(Technique::Cel, None);
        engine.render();
        let unique: HashSet<u32> = pixels(&engine)
            .into_iter()
            .filter(|&p| p != color::BACKGROUND)
            .collect();
        // Five bands, each offset by the same ambient.
        assert!(unique.len() <= 5, "got {} distinct colors", unique.len());
        assert!(!unique.is_empty());
    }

    #[test]
    fn outline_shell_leaves_an_inked_rim() {
        let mut engine = engine_with(Technique::Phong, Some(0.25));
        engine.render();
        let inked = pixels(&engine)
            .into_iter()
            .filter(|&p| p == color::INK_BLACK)
            .count();
        assert!(inked > 0, "no outline pixels survived the main pass");

        engine.toggle_outline();
        engine.render();
        let inked = pixels(&engine)
            .into_iter()
            .filter(|&p| p == color::INK_BLACK)
            .count();
        assert_eq!(inked, 0);
    }

    #[test]
    fn contour_technique_inks_the_silhouette() {
        let mut engine = engine_with(Technique::CelContour, None);
        engine.render();
        let inked = pixels(&engine)
            .into_iter()
            .filter(|&p| p == color::INK_BLACK)
            .count();
        // Grazing fragments ring the sphere's silhouette.
        assert!(inked > 10, "only {inked} contour pixels");
    }

    #[test]
    fn normal_matrix_handles_nonuniform_scale() {
        let model_view = Mat4::scaling(2.0, 1.0, 1.0);
        let normal_matrix = model_view.inverse().unwrap().transpose();
        // Tangent and normal of a 45-degree plane. Scaling the normal
        // directly would break perpendicularity; the inverse transpose
        // must preserve it.
        let tangent = model_view.transform_direction(Vec3::new(1.0, -1.0, 0.0));
        let normal = normal_matrix.transform_direction(Vec3::new(1.0, 1.0, 0.0));
        assert!(normal.dot(tangent).abs() < 1e-6);
    }

    #[test]
    fn update_spins_the_model() {
        let mut engine = engine_with(Technique::Phong, None);
        let before = engine.transform.rotation.y;
        engine.update(0.5);
        assert!(engine.transform.rotation.y > before);
    }

    #[test]
    fn resize_rebuilds_the_render_target() {
        let mut engine = engine_with(Technique::Phong, None);
        engine.resize(32, 16);
        engine.render();
        assert_eq!(engine.frame_bytes().len(), 32 * 16 * 4);
    }
}
