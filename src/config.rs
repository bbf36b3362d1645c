//! Command-line configuration for the demo viewer.

use std::path::PathBuf;

use crate::technique::Technique;

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const FOV_DEGREES: f32 = 60.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 1000.0;

/// Radians of orbit per pixel of mouse drag.
pub const ORBIT_SENSITIVITY: f32 = 0.008;
/// World units of zoom per wheel tick.
pub const ZOOM_SENSITIVITY: f32 = 0.5;

/// Default object-space offset for the extruded outline shell.
pub const OUTLINE_OFFSET: f32 = 0.15;

/// Which mesh the viewer displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Shape {
    Sphere,
    #[default]
    TorusKnot,
    Torus,
    Plane,
    Stl(PathBuf),
    Obj(PathBuf),
}

/// Parsed command-line options.
///
/// ```text
/// inkline [SHAPE | MESH_FILE] [--technique NAME] [--outline [OFFSET]]
///         [--size WxH] [--frame PATH]
/// ```
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub shape: Shape,
    pub technique: Technique,
    /// Outline shell offset, present when outlining starts enabled.
    pub outline: Option<f32>,
    pub width: u32,
    pub height: u32,
    /// Where the `S` key saves the current frame.
    pub frame_path: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            shape: Shape::default(),
            technique: Technique::default(),
            outline: None,
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            frame_path: PathBuf::from("frame.png"),
        }
    }
}

impl DemoConfig {
    pub fn from_args(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut config = Self::default();
        let mut args = args.peekable();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--technique" => {
                    let name = args.next().ok_or("--technique requires a name")?;
                    config.technique = Technique::from_name(&name)
                        .ok_or_else(|| format!("unknown technique: {name}"))?;
                }
                "--outline" => {
                    // Optional offset; a following flag means "use the default".
                    let offset = match args.peek() {
                        Some(next) if !next.starts_with("--") => {
                            let raw = args.next().unwrap_or_default();
                            raw.parse()
                                .map_err(|_| format!("bad outline offset: {raw}"))?
                        }
                        _ => OUTLINE_OFFSET,
                    };
                    config.outline = Some(offset);
                }
                "--size" => {
                    let raw = args.next().ok_or("--size requires WxH")?;
                    let (w, h) = raw
                        .split_once('x')
                        .ok_or_else(|| format!("bad size: {raw}"))?;
                    config.width = w.parse().map_err(|_| format!("bad width: {w}"))?;
                    config.height = h.parse().map_err(|_| format!("bad height: {h}"))?;
                    if config.width == 0 || config.height == 0 {
                        return Err(format!("size must be non-zero: {raw}"));
                    }
                }
                "--frame" => {
                    config.frame_path = PathBuf::from(args.next().ok_or("--frame requires a path")?);
                }
                other if other.starts_with("--") => {
                    return Err(format!("unknown option: {other}"));
                }
                other => {
                    config.shape = parse_shape(other)?;
                }
            }
        }

        Ok(config)
    }
}

fn parse_shape(arg: &str) -> Result<Shape, String> {
    match arg {
        "sphere" => return Ok(Shape::Sphere),
        "torus" => return Ok(Shape::Torus),
        "knot" | "torus-knot" => return Ok(Shape::TorusKnot),
        "plane" => return Ok(Shape::Plane),
        _ => {}
    }
    let path = PathBuf::from(arg);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("stl") => Ok(Shape::Stl(path)),
        Some(ext) if ext.eq_ignore_ascii_case("obj") => Ok(Shape::Obj(path)),
        _ => Err(format!("unknown shape or mesh file: {arg}")),
    }
}
