//! STL triangle-soup reader (binary and ASCII).
//!
//! STL stores three unshared vertex positions per triangle. The reader
//! returns raw soup; welding into an indexed mesh happens in
//! [`crate::mesh::Mesh::from_soup`]. Facet normals stored in the file are
//! ignored because vertex normals get recomputed after welding anyway.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::math::vec3::Vec3;
use crate::mesh::LoadError;

const BINARY_HEADER_LEN: usize = 80;
const BINARY_TRIANGLE_LEN: usize = 50; // 12 f32 + u16 attribute count

/// Load STL triangle soup from a file, auto-detecting binary vs ASCII.
pub fn load(path: &Path) -> Result<Vec<[Vec3; 3]>, LoadError> {
    let bytes = fs::read(path)?;
    parse(&bytes)
}

/// Parse STL bytes, auto-detecting the format.
///
/// ASCII files start with "solid", but so do some binary files, so the
/// reliable check is whether the declared binary triangle count matches the
/// file length exactly.
pub fn parse(bytes: &[u8]) -> Result<Vec<[Vec3; 3]>, LoadError> {
    if let Some(count) = binary_triangle_count(bytes) {
        return parse_binary(bytes, count);
    }
    if bytes.starts_with(b"solid") {
        return parse_ascii(bytes);
    }
    Err(LoadError::Malformed(
        "neither a valid binary nor ASCII STL".to_string(),
    ))
}

/// Returns the triangle count if `bytes` is a well-formed binary STL.
fn binary_triangle_count(bytes: &[u8]) -> Option<u32> {
    if bytes.len() < BINARY_HEADER_LEN + 4 {
        return None;
    }
    let count = u32::from_le_bytes(bytes[BINARY_HEADER_LEN..BINARY_HEADER_LEN + 4].try_into().ok()?);
    let expected = BINARY_HEADER_LEN + 4 + count as usize * BINARY_TRIANGLE_LEN;
    (expected == bytes.len()).then_some(count)
}

fn parse_binary(bytes: &[u8], count: u32) -> Result<Vec<[Vec3; 3]>, LoadError> {
    let mut cursor = Cursor::new(&bytes[BINARY_HEADER_LEN + 4..]);
    let mut triangles = Vec::with_capacity(count as usize);

    for _ in 0..count {
        // Facet normal, unused.
        for _ in 0..3 {
            cursor.read_f32::<LittleEndian>()?;
        }
        let mut tri = [Vec3::ZERO; 3];
        for v in &mut tri {
            let x = cursor.read_f32::<LittleEndian>()?;
            let y = cursor.read_f32::<LittleEndian>()?;
            let z = cursor.read_f32::<LittleEndian>()?;
            *v = Vec3::new(x, y, z);
        }
        cursor.read_u16::<LittleEndian>()?; // attribute byte count
        triangles.push(tri);
    }

    Ok(triangles)
}

fn parse_ascii(bytes: &[u8]) -> Result<Vec<[Vec3; 3]>, LoadError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| LoadError::Malformed("ASCII STL is not valid UTF-8".to_string()))?;

    let mut triangles = Vec::new();
    let mut pending: Vec<Vec3> = Vec::with_capacity(3);

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }
        let mut read = || -> Result<f32, LoadError> {
            tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| LoadError::Malformed(format!("bad vertex line: {line:?}")))
        };
        let v = Vec3::new(read()?, read()?, read()?);
        pending.push(v);
        if pending.len() == 3 {
            triangles.push([pending[0], pending[1], pending[2]]);
            pending.clear();
        }
    }

    if !pending.is_empty() {
        return Err(LoadError::Malformed(
            "facet with fewer than 3 vertices".to_string(),
        ));
    }
    if triangles.is_empty() {
        return Err(LoadError::NoGeometry);
    }
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary_fixture(triangles: &[[Vec3; 3]]) -> Vec<u8> {
        let mut bytes = vec![0u8; BINARY_HEADER_LEN];
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            for _ in 0..3 {
                bytes.extend_from_slice(&0f32.to_le_bytes()); // facet normal
            }
            for v in tri {
                bytes.extend_from_slice(&v.x.to_le_bytes());
                bytes.extend_from_slice(&v.y.to_le_bytes());
                bytes.extend_from_slice(&v.z.to_le_bytes());
            }
            bytes.extend_from_slice(&0u16.to_le_bytes());
        }
        bytes
    }

    fn unit_triangle() -> [Vec3; 3] {
        [
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn parses_binary_stl() {
        let tris = vec![unit_triangle(), unit_triangle()];
        let bytes = binary_fixture(&tris);
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], unit_triangle());
    }

    #[test]
    fn parses_ascii_stl() {
        let text = "\
solid demo
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid demo
";
        let parsed = parse(text.as_bytes()).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0], unit_triangle());
    }

    #[test]
    fn binary_detection_beats_solid_prefix() {
        // A binary file whose header begins with "solid" must still parse
        // as binary when the length math checks out.
        let mut bytes = binary_fixture(&[unit_triangle()]);
        bytes[..5].copy_from_slice(b"solid");
        let parsed = parse(&bytes).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn rejects_truncated_ascii_facet() {
        let text = "solid broken\nvertex 0 0 0\nvertex 1 0 0\nendsolid\n";
        assert!(matches!(
            parse(text.as_bytes()),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse(b"not an stl at all").is_err());
    }

    #[test]
    fn empty_ascii_solid_has_no_geometry() {
        let text = "solid empty\nendsolid empty\n";
        assert!(matches!(parse(text.as_bytes()), Err(LoadError::NoGeometry)));
    }
}
