//! Procedural demo meshes: UV sphere, torus, torus knot, ground plane.
//!
//! Parametrizations follow the usual grid construction: vertices on a
//! (segments + 1)^2 lattice with seam vertices duplicated, quads split into
//! two triangles, analytic normals. Winding is counter-clockwise seen from
//! outside the surface.

use std::f32::consts::{PI, TAU};

use crate::math::vec3::Vec3;
use crate::mesh::Mesh;

/// UV sphere centered at the origin.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let w = width_segments.max(3);
    let h = height_segments.max(2);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for iy in 0..=h {
        let phi = iy as f32 / h as f32 * PI; // 0 at the north pole
        for ix in 0..=w {
            let theta = ix as f32 / w as f32 * TAU;
            let normal = Vec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            positions.push(normal * radius);
            normals.push(normal);
        }
    }

    let mut faces = Vec::new();
    let stride = w + 1;
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * stride + ix;
            let a1 = a + 1;
            let b = a + stride;
            let b1 = b + 1;
            // Quads collapse to single triangles at the poles.
            if iy != 0 {
                faces.push([a, b1, b]);
            }
            if iy != h - 1 {
                faces.push([a, a1, b1]);
            }
        }
    }

    Mesh::new("sphere", positions, normals, faces)
}

/// Torus in the XY plane: ring radius `radius`, tube radius `tube`.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let rs = radial_segments.max(3);
    let ts = tubular_segments.max(3);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for j in 0..=rs {
        let v = j as f32 / rs as f32 * TAU;
        for i in 0..=ts {
            let u = i as f32 / ts as f32 * TAU;
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let point = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            positions.push(point);
            normals.push((point - center).normalize());
        }
    }

    let mut faces = Vec::new();
    let stride = ts + 1;
    for j in 0..rs {
        for i in 0..ts {
            let a = j * stride + i;
            let a1 = a + 1;
            let b = a + stride;
            let b1 = b + 1;
            faces.push([a, b1, b]);
            faces.push([a, a1, b1]);
        }
    }

    Mesh::new("torus", positions, normals, faces)
}

/// (p, q) torus knot with a circular tube swept along the knot curve.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Mesh {
    let ts = tubular_segments.max(3);
    let rs = radial_segments.max(3);
    let pf = p as f32;
    let qf = q as f32;

    // Point on the knot's center curve at parameter u.
    let curve = |u: f32| -> Vec3 {
        let cs = (qf / pf * u).cos();
        Vec3::new(
            radius * (2.0 + cs) * 0.5 * (pf * u).cos(),
            radius * (2.0 + cs) * 0.5 * (pf * u).sin(),
            radius * (qf / pf * u).sin() * 0.5,
        )
    };

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for i in 0..=ts {
        let u = i as f32 / ts as f32 * pf * TAU;
        let p1 = curve(u);
        let p2 = curve(u + 0.01);

        // Approximate Frenet-like frame from neighboring curve samples.
        let tangent = p2 - p1;
        let bitangent = tangent.cross(p2 + p1).normalize();
        let frame_normal = bitangent.cross(tangent).normalize();

        for j in 0..=rs {
            let v = j as f32 / rs as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            let point = p1 + frame_normal * cx + bitangent * cy;
            positions.push(point);
            normals.push((point - p1).normalize());
        }
    }

    let mut faces = Vec::new();
    let stride = rs + 1;
    for i in 0..ts {
        for j in 0..rs {
            let a = i * stride + j;
            let a1 = a + 1;
            let b = a + stride;
            let b1 = b + 1;
            // The tube section runs clockwise (cx is negated), so the quad
            // split mirrors the torus to keep faces outward.
            faces.push([a, b, b1]);
            faces.push([a, b1, a1]);
        }
    }

    Mesh::new("torus_knot", positions, normals, faces)
}

/// Flat rectangle in the XZ plane, normal facing +Y.
pub fn plane(width: f32, depth: f32) -> Mesh {
    let hw = width / 2.0;
    let hd = depth / 2.0;
    let positions = vec![
        Vec3::new(-hw, 0.0, -hd),
        Vec3::new(hw, 0.0, -hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(-hw, 0.0, hd),
    ];
    let normals = vec![Vec3::UP; 4];
    let faces = vec![[0, 2, 1], [0, 3, 2]];
    Mesh::new("plane", positions, normals, faces)
}
