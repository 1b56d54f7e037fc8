//! # Primitive Shape Generation
//!
//! Procedural cube and line meshes, plus OBJ loading for externally authored cubes.

use std::path::Path;

use cgmath::{InnerSpace, Vector3, Zero};

use super::MeshData;
use crate::{
    error::GfxError,
    gfx::scene::{vertex::Vertex3D, Topology},
};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes.
/// Each face has its own four vertices with outward normals and UVs from 0 to 1,
/// so the whole texture maps onto every face.
pub fn generate_cube() -> MeshData {
    let mut data = MeshData::new(Topology::Triangles);

    #[rustfmt::skip]
    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    #[rustfmt::skip]
    let tex_coords = [
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions
        .iter()
        .zip(tex_coords.iter())
        .enumerate()
        .map(|(i, (position, tex_coord))| Vertex3D {
            position: *position,
            colour: WHITE,
            tex_coord: *tex_coord,
            normal: face_normals[i / 4],
        })
        .collect();

    // Two counter-clockwise triangles per face
    data.indices = (0..6u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect();

    data
}

/// Generate a single white line segment from `from` to `to`
pub fn generate_line(from: Vector3<f32>, to: Vector3<f32>) -> MeshData {
    let mut data = MeshData::new(Topology::Lines);
    let direction = to - from;
    for (position, u) in [(from, 0.0), (to, 1.0)] {
        data.vertices.push(Vertex3D {
            position: position.into(),
            colour: WHITE,
            tex_coord: [u, 0.0],
            normal: direction.into(),
        });
    }
    data.indices = vec![0, 1];
    data
}

/// Load the first model of an OBJ file as a triangle mesh
///
/// Missing normals are computed from the faces; missing texture coordinates are zero.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData, GfxError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|source| GfxError::MeshLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let model = models
        .into_iter()
        .next()
        .ok_or_else(|| GfxError::EmptyMesh(path.to_path_buf()))?;
    let mesh = model.mesh;

    let normals = if !mesh.normals.is_empty() && mesh.normals.len() == mesh.positions.len() {
        mesh.normals
    } else {
        calculate_face_normals(&mesh.positions, &mesh.indices)
    };

    let vertex_count = mesh.positions.len() / 3;
    let mut data = MeshData::new(Topology::Triangles);
    data.vertices = (0..vertex_count)
        .map(|i| Vertex3D {
            position: [
                mesh.positions[i * 3],
                mesh.positions[i * 3 + 1],
                mesh.positions[i * 3 + 2],
            ],
            colour: WHITE,
            tex_coord: [
                mesh.texcoords.get(i * 2).copied().unwrap_or(0.0),
                1.0 - mesh.texcoords.get(i * 2 + 1).copied().unwrap_or(1.0),
            ],
            normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
        })
        .collect();
    data.indices = mesh.indices;

    log::debug!(
        "Loaded {} ({} vertices, {} triangles)",
        path.display(),
        data.vertex_count(),
        data.triangle_count()
    );
    Ok(data)
}

/// Averages face normals into per-vertex normals for meshes that ship without them
pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex = |i: usize| Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]);
    let mut sums = vec![Vector3::<f32>::zero(); positions.len() / 3];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        let face_normal = (vertex(i1) - vertex(i0)).cross(vertex(i2) - vertex(i0));
        for index in [i0, i1, i2] {
            sums[index] += face_normal;
        }
    }

    sums.into_iter()
        .flat_map(|sum| {
            let n = if sum.is_zero() { sum } else { sum.normalize() };
            [n.x, n.y, n.z]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.topology, Topology::Triangles);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = generate_cube();
        for v in &cube.vertices {
            let p = Vector3::from(v.position);
            let n = Vector3::from(v.normal);
            assert!(p.dot(n) > 0.0);
        }
    }

    #[test]
    fn test_line_generation() {
        let line = generate_line(Vector3::new(-2.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -10.0));
        assert_eq!(line.topology, Topology::Lines);
        assert_eq!(line.indices, vec![0, 1]);
        assert_eq!(line.vertices[0].position, [-2.0, 0.0, 10.0]);
        assert_eq!(line.vertices[1].position, [0.0, 0.0, -10.0]);
        assert_eq!(line.triangle_count(), 0);
    }

    #[test]
    fn test_face_normals_for_single_triangle() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let normals = calculate_face_normals(&positions, &[0, 1, 2]);
        assert_eq!(normals, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_face_normals_are_unit_length_and_degenerate_faces_stay_zero() {
        let positions = [
            0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 4.0, // scaled triangle in the xz plane
            1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, // collapsed to a point
        ];
        let normals = calculate_face_normals(&positions, &[0, 1, 2, 3, 4, 5]);

        let first = Vector3::new(normals[0], normals[1], normals[2]);
        assert!((first.magnitude() - 1.0).abs() < 1e-6);
        assert_eq!(first, Vector3::new(0.0, -1.0, 0.0));
        assert!(normals[9..].iter().all(|n| *n == 0.0));
    }

    #[test]
    fn test_missing_obj_is_reported() {
        let result = load_obj("does/not/exist/cube.obj");
        assert!(matches!(result, Err(GfxError::MeshLoad { .. })));
    }
}
