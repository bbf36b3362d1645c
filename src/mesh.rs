//! Indexed triangle meshes.
//!
//! Meshes arrive either as procedural primitives (already indexed, analytic
//! normals) or as triangle soup from an STL file, which gets welded into an
//! indexed mesh with recomputed vertex normals.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::math::vec3::Vec3;
use crate::stl;

/// Errors raised while loading mesh files.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Obj(tobj::LoadError),
    /// The file parsed but carried no vertex positions. Treated as a fatal
    /// precondition violation, not an empty scene.
    NoGeometry,
    Malformed(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "i/o error: {e}"),
            LoadError::Obj(e) => write!(f, "obj error: {e}"),
            LoadError::NoGeometry => write!(f, "mesh has no vertex positions"),
            LoadError::Malformed(msg) => write!(f, "malformed mesh file: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Obj(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

/// An indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone)]
pub struct Mesh {
    name: String,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Create a mesh from already-indexed data.
    ///
    /// If `normals` is empty they are recomputed from face geometry.
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        faces: Vec<[u32; 3]>,
    ) -> Self {
        let mut mesh = Self {
            name: name.into(),
            positions,
            normals,
            faces,
        };
        if mesh.normals.len() != mesh.positions.len() {
            mesh.recompute_normals();
        }
        mesh
    }

    /// Build an indexed mesh from unshared triangle-soup vertices.
    ///
    /// Coincident positions (exact coordinate equality, which is what STL
    /// duplication produces) are merged so faces share vertices, then vertex
    /// normals are recomputed by averaging adjacent face normals.
    pub fn from_soup(name: impl Into<String>, triangles: &[[Vec3; 3]]) -> Self {
        let mut positions: Vec<Vec3> = Vec::new();
        let mut faces: Vec<[u32; 3]> = Vec::with_capacity(triangles.len());
        let mut index_of: HashMap<[u32; 3], u32> = HashMap::new();

        for tri in triangles {
            let mut face = [0u32; 3];
            for (slot, v) in tri.iter().enumerate() {
                let key = [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
                let index = *index_of.entry(key).or_insert_with(|| {
                    positions.push(*v);
                    (positions.len() - 1) as u32
                });
                face[slot] = index;
            }
            faces.push(face);
        }

        let mut mesh = Self {
            name: name.into(),
            positions,
            normals: Vec::new(),
            faces,
        };
        mesh.recompute_normals();
        mesh
    }

    /// Load a mesh from an STL file (binary or ASCII), welding the soup.
    pub fn from_stl(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let triangles = stl::load(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "stl".to_string());
        println!(
            "loaded {} triangles from {}",
            triangles.len(),
            path.display()
        );
        Ok(Self::from_soup(name, &triangles))
    }

    /// Load a mesh from an OBJ file. All models in the file are merged.
    pub fn from_obj(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut faces = Vec::new();

        for model in &models {
            let base = positions.len() as u32;
            let mesh = &model.mesh;
            for p in mesh.positions.chunks_exact(3) {
                positions.push(Vec3::new(p[0], p[1], p[2]));
            }
            for n in mesh.normals.chunks_exact(3) {
                normals.push(Vec3::new(n[0], n[1], n[2]));
            }
            for idx in mesh.indices.chunks_exact(3) {
                faces.push([base + idx[0], base + idx[1], base + idx[2]]);
            }
        }

        if positions.is_empty() {
            return Err(LoadError::NoGeometry);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "obj".to_string());
        println!("loaded {} triangles from {}", faces.len(), path.display());
        Ok(Self::new(name, positions, normals, faces))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Recompute vertex normals as the normalized uniform average of the
    /// normals of all adjacent faces.
    pub fn recompute_normals(&mut self) {
        let mut sums = vec![Vec3::ZERO; self.positions.len()];
        for face in &self.faces {
            let [a, b, c] = face.map(|i| self.positions[i as usize]);
            let face_normal = (b - a).cross(c - a).normalize();
            for &i in face {
                sums[i as usize] = sums[i as usize] + face_normal;
            }
        }
        self.normals = sums.iter().map(|n| n.normalize()).collect();
    }

    /// Returns a copy of the mesh with every vertex displaced along its
    /// normal by `offset` (object space).
    ///
    /// Used to render the solid-color outline shell behind a model. The
    /// offset is a fixed constant, so on screen the outline gets thinner as
    /// the camera moves away.
    pub fn extrude_along_normals(&self, offset: f32) -> Self {
        let positions = self
            .positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| *p + *n * offset)
            .collect();
        Self {
            name: format!("{}_shell", self.name),
            positions,
            normals: self.normals.clone(),
            faces: self.faces.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;
    use approx::assert_relative_eq;

    /// Two triangles sharing an edge, expressed as unshared soup vertices.
    fn folded_soup() -> Vec<[Vec3; 3]> {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 0.0, -1.0);
        let d = Vec3::new(0.0, 1.0, 0.0);
        vec![[a, b, c], [a, c, d]]
    }

    #[test]
    fn welding_merges_duplicate_positions() {
        let soup = folded_soup();
        let mesh = Mesh::from_soup("fold", &soup);
        // 6 soup vertices, 4 unique positions.
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.vertex_count() <= soup.len() * 3);
        assert_eq!(mesh.face_count(), 2);
    }

    #[test]
    fn welded_normals_average_adjacent_faces() {
        let mesh = Mesh::from_soup("fold", &folded_soup());
        // Face normals: first triangle +Y, second +X.
        // Vertex b touches only the first face.
        let b = mesh
            .positions()
            .iter()
            .position(|p| *p == Vec3::new(1.0, 0.0, 0.0))
            .unwrap();
        let nb = mesh.normals()[b];
        assert_relative_eq!(nb.y, 1.0, epsilon = 1e-6);

        // Vertex a touches both faces: uniform average of +Y and +X.
        let a = mesh
            .positions()
            .iter()
            .position(|p| *p == Vec3::ZERO)
            .unwrap();
        let na = mesh.normals()[a];
        let expected = (Vec3::new(0.0, 1.0, 0.0) + Vec3::new(1.0, 0.0, 0.0)).normalize();
        assert_relative_eq!(na.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(na.y, expected.y, epsilon = 1e-6);
        assert_relative_eq!(na.z, expected.z, epsilon = 1e-6);
    }

    #[test]
    fn extrude_round_trips() {
        let mesh = primitives::sphere(3.0, 16, 16);
        for offset in [0.1, 0.25, -0.5, 2.0] {
            let out = mesh.extrude_along_normals(offset);
            let back = out.extrude_along_normals(-offset);
            for (orig, restored) in mesh.positions().iter().zip(back.positions()) {
                assert_relative_eq!(orig.x, restored.x, epsilon = 1e-4);
                assert_relative_eq!(orig.y, restored.y, epsilon = 1e-4);
                assert_relative_eq!(orig.z, restored.z, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn extrude_grows_a_sphere_radially() {
        let mesh = primitives::sphere(3.0, 8, 8);
        let shell = mesh.extrude_along_normals(0.25);
        for p in shell.positions() {
            assert_relative_eq!(p.magnitude(), 3.25, epsilon = 1e-4);
        }
    }

    #[test]
    fn missing_positions_is_a_fatal_load_error() {
        let mesh = Mesh::new("empty", Vec::new(), Vec::new(), Vec::new());
        assert_eq!(mesh.vertex_count(), 0);
        // from_obj surfaces this as NoGeometry; the constructor tolerates it
        // so procedural call sites stay infallible.
        let err = LoadError::NoGeometry;
        assert_eq!(err.to_string(), "mesh has no vertex positions");
    }
}
