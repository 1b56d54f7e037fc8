//! # Transform Nodes
//!
//! A [`TransformNode`] holds a local matrix, the world matrix computed from it, and the
//! children it owns. Children are owned values, so the hierarchy is always a strict tree.
//!
//! The node is generic over its child type: anything that embeds a node of its own kind
//! (see [`Transformable`]) can be arranged into a hierarchy. The scene uses
//! `TransformNode<RenderObject>`.

use cgmath::{Matrix4, SquareMatrix};

/// Types that embed a [`TransformNode`] whose children are of the same type
pub trait Transformable: Sized {
    fn node(&self) -> &TransformNode<Self>;
    fn node_mut(&mut self) -> &mut TransformNode<Self>;
}

/// Local/world transform pair plus owned children
#[derive(Debug, Clone)]
pub struct TransformNode<C> {
    local: Matrix4<f32>,
    world: Matrix4<f32>,
    children: Vec<C>,
}

impl<C> Default for TransformNode<C> {
    fn default() -> Self {
        Self::new(Matrix4::identity())
    }
}

impl<C> TransformNode<C> {
    /// Creates a childless node; its world transform equals `local` until recomputed
    pub fn new(local: Matrix4<f32>) -> Self {
        Self {
            local,
            world: local,
            children: Vec::new(),
        }
    }

    pub fn set_local_transform(&mut self, local: Matrix4<f32>) {
        self.local = local;
    }

    pub fn local_transform(&self) -> Matrix4<f32> {
        self.local
    }

    /// World transform as of the last [`compute_world_transform`](Self::compute_world_transform)
    pub fn world_transform(&self) -> Matrix4<f32> {
        self.world
    }

    /// Takes ownership of `child` and appends it after any existing children
    pub fn add_child(&mut self, child: C) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[C] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [C] {
        &mut self.children
    }
}

impl<C: Transformable> TransformNode<C> {
    /// Stores `parent_world * local` as this node's world transform and propagates it
    /// to every descendant. Roots pass the identity.
    pub fn compute_world_transform(&mut self, parent_world: Matrix4<f32>) -> Matrix4<f32> {
        self.world = parent_world * self.local;
        let world = self.world;
        for child in &mut self.children {
            child.node_mut().compute_world_transform(world);
        }
        world
    }
}
