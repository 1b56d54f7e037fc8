//! Per-draw bindings: the object's model matrix (slot 1) and its texture set (slot 2)

use std::collections::HashMap;

use cgmath::Matrix4;

use super::texture_resource::TextureResource;
use crate::{
    gfx::scene::{TextureId, TextureSlots},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Number of texture slots the shaders sample
pub const TEXTURE_SLOTS: usize = 3;

/// Texture ids bound to slots 0, 1 and 2; `None` binds the white placeholder
pub type TextureSetKey = [Option<TextureId>; TEXTURE_SLOTS];

/// Picks the bound texture for each sampled slot. Higher slots are ignored.
pub fn texture_set_key(slots: &TextureSlots) -> TextureSetKey {
    let mut key = [None; TEXTURE_SLOTS];
    for (slot, texture) in slots.range(0..TEXTURE_SLOTS as u32) {
        key[*slot as usize] = Some(*texture);
    }
    key
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
}

impl From<Matrix4<f32>> for ObjectUniform {
    fn from(model: Matrix4<f32>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

/// A growable pool of per-object uniform buffers, one per draw in a frame
pub struct ObjectBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    pool: Vec<(UniformBuffer<ObjectUniform>, wgpu::BindGroup)>,
}

impl ObjectBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Object Bind Group Layout");
        Self {
            bind_group_layout,
            pool: Vec::new(),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// Writes `model` into pool entry `index`, growing the pool as needed
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        index: usize,
        model: Matrix4<f32>,
    ) {
        while self.pool.len() <= index {
            let ubo = UniformBuffer::new(device);
            let bind_group = BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Object Bind Group");
            self.pool.push((ubo, bind_group));
        }
        self.pool[index].0.update_content(queue, model.into());
    }

    pub fn bind_group(&self, index: usize) -> Option<&wgpu::BindGroup> {
        self.pool.get(index).map(|(_, bind_group)| bind_group)
    }
}

/// Texture storage plus one cached bind group per distinct texture set
pub struct TextureBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    sampler: wgpu::Sampler,
    placeholder: TextureResource,
    textures: Vec<TextureResource>,
    bind_groups: HashMap<TextureSetKey, wgpu::BindGroup>,
}

impl TextureBindings {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let mut builder = BindGroupLayoutBuilder::new();
        for _ in 0..TEXTURE_SLOTS {
            // Heightmap effects sample slot 2 from the vertex stage
            builder = builder.next_binding_rendering(binding_types::texture_2d());
        }
        let bind_group_layout = builder
            .next_binding_rendering(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Texture Bind Group Layout");

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Texture Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            bind_group_layout,
            sampler,
            placeholder: TextureResource::white_pixel(device, queue),
            textures: Vec::new(),
            bind_groups: HashMap::new(),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn insert(&mut self, texture: TextureResource) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() as u32 - 1)
    }

    /// Creates the bind group for `key` on first use
    pub fn prepare(&mut self, device: &wgpu::Device, key: TextureSetKey) {
        if self.bind_groups.contains_key(&key) {
            return;
        }
        let view = |slot: usize| {
            key[slot]
                .and_then(|id| self.textures.get(id.0 as usize))
                .unwrap_or(&self.placeholder)
                .view
                .clone()
        };
        let views = [view(0), view(1), view(2)];
        let bind_group = BindGroupBuilder::new(&self.bind_group_layout)
            .texture(&views[0])
            .texture(&views[1])
            .texture(&views[2])
            .sampler(&self.sampler)
            .create(device, "Texture Bind Group");
        log::debug!("Created texture bind group for {:?}", key);
        self.bind_groups.insert(key, bind_group);
    }

    pub fn bind_group(&self, key: &TextureSetKey) -> Option<&wgpu::BindGroup> {
        self.bind_groups.get(key)
    }
}
