//! Global uniform bindings for camera, lighting and animation data
//!
//! Everything here is shared by every draw in a frame and bound to slot 0 in all
//! render pipelines.

use crate::{
    gfx::rendering::backend::FrameGlobals,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// One point light as the shaders see it
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    /// World position in xyz, radius in w
    pub position_radius: [f32; 4],
    /// RGB colour, w unused
    pub colour: [f32; 4],
}

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in `common.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Camera position (homogeneous coordinates)
    pub camera_position: [f32; 4],
    /// Animation progress in x, yzw unused
    pub animation: [f32; 4],
    pub lights: [LightUniform; 2],
}
// Total: 64 + 64 + 16 + 16 + 2 * 32 = 224 bytes

impl From<&FrameGlobals> for GlobalUBOContent {
    fn from(globals: &FrameGlobals) -> Self {
        let light = |i: usize| {
            let l = &globals.lights[i];
            LightUniform {
                position_radius: l.position.extend(l.radius).into(),
                colour: l.colour.extend(1.0).into(),
            }
        };
        Self {
            view: globals.view.into(),
            projection: globals.projection.into(),
            camera_position: globals.camera_position.extend(1.0).into(),
            animation: [globals.progress, 0.0, 0.0, 0.0],
            lights: [light(0), light(1)],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Owns the global uniform buffer plus its layout and bind group
pub struct GlobalBindings {
    ubo: GlobalUBO,
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let ubo = GlobalUBO::new(device);
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // camera + lights + progress
            .create(device, "Globals Bind Group Layout");
        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Global Bind Group");

        GlobalBindings {
            ubo,
            bind_group_layout,
            bind_group,
        }
    }

    /// Writes this frame's globals; unchanged content is not re-uploaded
    pub fn update(&mut self, queue: &wgpu::Queue, globals: &FrameGlobals) {
        self.ubo.update_content(queue, GlobalUBOContent::from(globals));
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::lighting::{Light, LightingState, LightSlot};
    use cgmath::{Matrix4, SquareMatrix, Vector3};

    #[test]
    fn test_uniform_layout_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 224);
        assert_eq!(std::mem::size_of::<GlobalUBOContent>() % 16, 0);
    }

    #[test]
    fn test_frame_globals_packing() {
        let mut lighting = LightingState::new();
        lighting.set_light(
            LightSlot::Primary,
            Vector3::new(5.0, 10.0, 10.0),
            1000.0,
            Vector3::new(1.0, 1.0, 1.0),
        );
        let globals = FrameGlobals {
            projection: Matrix4::identity(),
            view: Matrix4::from_translation(Vector3::new(0.0, 0.0, -3.0)),
            camera_position: Vector3::new(0.0, 0.0, 3.0),
            progress: 0.75,
            lights: *lighting.lights(),
            depth_test: true,
        };

        let content = GlobalUBOContent::from(&globals);
        assert_eq!(content.animation[0], 0.75);
        assert_eq!(content.camera_position, [0.0, 0.0, 3.0, 1.0]);
        assert_eq!(content.view[3], [0.0, 0.0, -3.0, 1.0]);
        assert_eq!(content.lights[0].position_radius, [5.0, 10.0, 10.0, 1000.0]);
        let off = Light::off();
        assert_eq!(content.lights[1].position_radius[3], off.radius);
        assert_eq!(content.lights[1].colour, [0.0, 0.0, 0.0, 1.0]);
    }
}
