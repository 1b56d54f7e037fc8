//! # Render Objects
//!
//! A [`RenderObject`] is a transform node plus everything needed to draw it: a mesh
//! handle, the [`Effect`] selecting its shader program, and its bound textures. All three
//! are handles into resources owned elsewhere, so they can be swapped at any time.

use std::collections::BTreeMap;

use cgmath::Matrix4;

use super::{
    mesh::MeshId,
    node::{TransformNode, Transformable},
};
use crate::gfx::rendering::shader_set::Effect;

/// Identifier assigned by the [`Scene`](super::Scene) when an object is inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u32);

/// Opaque handle to a texture uploaded by a [`ResourceProvider`](crate::gfx::rendering::ResourceProvider)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Texture slot index to texture. Slots the active shader never samples are ignored.
pub type TextureSlots = BTreeMap<u32, TextureId>;

/// A drawable node in the scene hierarchy
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub name: String,
    pub(crate) id: Option<ObjectId>,
    pub transform: TransformNode<RenderObject>,
    pub mesh: MeshId,
    pub effect: Effect,
    pub textures: TextureSlots,
}

impl Transformable for RenderObject {
    fn node(&self) -> &TransformNode<Self> {
        &self.transform
    }

    fn node_mut(&mut self) -> &mut TransformNode<Self> {
        &mut self.transform
    }
}

impl RenderObject {
    /// Creates an object with an identity transform and no textures
    pub fn new(name: impl Into<String>, mesh: MeshId, effect: Effect) -> Self {
        Self {
            name: name.into(),
            id: None,
            transform: TransformNode::default(),
            mesh,
            effect,
            textures: TextureSlots::new(),
        }
    }

    /// Binds `texture` to slot 0 (builder pattern)
    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.set_texture(0, texture);
        self
    }

    /// Sets the local transform (builder pattern)
    pub fn with_local_transform(mut self, local: Matrix4<f32>) -> Self {
        self.transform.set_local_transform(local);
        self
    }

    /// Id assigned on insertion into a scene; `None` while detached
    pub fn id(&self) -> Option<ObjectId> {
        self.id
    }

    pub fn set_texture(&mut self, slot: u32, texture: TextureId) {
        self.textures.insert(slot, texture);
    }

    pub fn clear_texture(&mut self, slot: u32) {
        self.textures.remove(&slot);
    }

    pub fn set_effect(&mut self, effect: Effect) {
        self.effect = effect;
    }

    pub fn set_local_transform(&mut self, local: Matrix4<f32>) {
        self.transform.set_local_transform(local);
    }

    pub fn local_transform(&self) -> Matrix4<f32> {
        self.transform.local_transform()
    }

    pub fn world_transform(&self) -> Matrix4<f32> {
        self.transform.world_transform()
    }

    /// Attaches `child` below this object; it is owned and moves with it
    pub fn add_child(&mut self, child: RenderObject) {
        self.transform.add_child(child);
    }

    pub fn children(&self) -> &[RenderObject] {
        self.transform.children()
    }

    /// Depth-first search of this object and its descendants
    pub fn find(&self, id: ObjectId) -> Option<&RenderObject> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Mutable depth-first search of this object and its descendants
    pub fn find_mut(&mut self, id: ObjectId) -> Option<&mut RenderObject> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.transform
            .children_mut()
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Visits this object, then its children in order
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a RenderObject)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Assigns ids to this object and any pre-attached children that lack one
    pub(crate) fn assign_ids(&mut self, next_id: &mut u32) {
        if self.id.is_none() {
            self.id = Some(ObjectId(*next_id));
            *next_id += 1;
        }
        for child in self.transform.children_mut() {
            child.assign_ids(next_id);
        }
    }
}
