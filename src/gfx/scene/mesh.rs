//! Mesh handles and primitive topology tags
//!
//! Geometry buffers live with the render backend; the scene only keeps a handle per mesh
//! and the topology tag used to assemble it, which effects may switch at runtime.

use std::collections::HashMap;

/// Opaque handle to geometry uploaded by a [`ResourceProvider`](crate::gfx::rendering::ResourceProvider)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Primitive assembly mode used when a mesh is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    #[default]
    Triangles,
    Lines,
    /// Triangle patches fed to the tessellated heightmap effects
    Patches,
}

/// Topology tag per registered mesh
#[derive(Debug, Default)]
pub struct MeshRegistry {
    topologies: HashMap<MeshId, Topology>,
}

impl MeshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mesh: MeshId, topology: Topology) {
        self.topologies.insert(mesh, topology);
    }

    /// Returns the tag for `mesh`; unregistered meshes draw as triangles
    pub fn topology(&self, mesh: MeshId) -> Topology {
        self.topologies.get(&mesh).copied().unwrap_or_default()
    }

    pub fn set_topology(&mut self, mesh: MeshId, topology: Topology) {
        self.topologies.insert(mesh, topology);
    }

    pub fn len(&self) -> usize {
        self.topologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topologies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_switch() {
        let mut registry = MeshRegistry::new();
        registry.register(MeshId(0), Topology::Triangles);
        registry.register(MeshId(1), Topology::Lines);

        registry.set_topology(MeshId(0), Topology::Patches);

        assert_eq!(registry.topology(MeshId(0)), Topology::Patches);
        assert_eq!(registry.topology(MeshId(1)), Topology::Lines);
        assert_eq!(registry.topology(MeshId(7)), Topology::Triangles);
        assert_eq!(registry.len(), 2);
    }
}
