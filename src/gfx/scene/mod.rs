//! # Scene Management Module
//!
//! Object hierarchy, mesh handles and the orchestrator that drives each frame.
//!
//! ## Key Components
//!
//! - [`Scene`] - owns objects, shaders, camera, lighting and the animation clock
//! - [`RenderObject`] - a transform node with a mesh, an effect and texture slots
//! - [`TransformNode`] - local/world transform pair with owned children
//! - [`Vertex3D`] - vertex layout shared by every mesh

pub mod mesh;
pub mod node;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use mesh::{MeshId, MeshRegistry, Topology};
pub use node::{TransformNode, Transformable};
pub use object::{ObjectId, RenderObject, TextureId, TextureSlots};
pub use scene::Scene;
pub use vertex::Vertex3D;
