//! # Geometry Generation and Loading
//!
//! Produces CPU-side meshes ready for upload through a
//! [`ResourceProvider`](crate::gfx::rendering::ResourceProvider):
//!
//! - **Cube**: unit textured cube, the demo's default cube mesh
//! - **Line**: a single segment, used for the lasers
//! - **OBJ**: arbitrary meshes loaded with `tobj`
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use lasercube::gfx::geometry::{generate_cube, generate_line};
//!
//! let cube = generate_cube();
//! let laser = generate_line(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 10.0));
//! assert_eq!(cube.triangle_count(), 12);
//! assert_eq!(laser.vertex_count(), 2);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::{vertex::Vertex3D, Topology};

/// Generated or loaded geometry ready for GPU upload
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex3D>,
    /// Indices into `vertices`, counter-clockwise winding for triangles
    pub indices: Vec<u32>,
    /// Topology the mesh is authored for
    pub topology: Topology,
}

impl MeshData {
    /// Create a new empty mesh with the given topology
    pub fn new(topology: Topology) -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            topology,
        }
    }

    /// Get the number of vertices in this mesh
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this mesh (zero for line meshes)
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Lines => 0,
            Topology::Triangles | Topology::Patches => self.indices.len() / 3,
        }
    }
}
