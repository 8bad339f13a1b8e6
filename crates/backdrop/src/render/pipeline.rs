//! # Pipeline: Unlit Render Pipelines and Shared GPU Resources
//!
//! Everything in the background is drawn flat: a colour, an opacity and an
//! emissive boost, no lights and no depth buffer. What varies between entities
//! is only the primitive topology and how fragments blend, so one pipeline is
//! built per `(Topology, Blend)` pair up front (six in total) and entities
//! pick theirs at draw time.
//!
//! ## Vertex Layout
//!
//! ```text
//! slot 0, per vertex: GpuVertex (24 bytes)
//! ┌──────────────┬──────────────┐
//! │ position     │ color        │
//! │ [f32; 3]     │ [f32; 3]     │
//! │ location(0)  │ location(1)  │
//! └──────────────┴──────────────┘
//!
//! slot 1, per instance: model matrix columns (64 bytes)
//! ┌──────────┬──────────┬──────────┬──────────┐
//! │ col 0    │ col 1    │ col 2    │ col 3    │
//! │ loc(2)   │ loc(3)   │ loc(4)   │ loc(5)   │
//! └──────────┴──────────┴──────────┴──────────┘
//! ```
//!
//! Non-instanced entities bind a shared one-matrix identity buffer in slot 1,
//! so the shader has a single path.
//!
//! ## Uniforms
//!
//! ```text
//! Group 0: Camera (per frame)           view_proj: mat4x4           64 bytes
//! Group 1: Draw (per entity, dynamic)   model: mat4x4
//!                                        color: vec4 (rgb, opacity)
//!                                        emissive: vec4 (rgb·k, vc)  96 bytes
//! ```
//!
//! Group 1 uses a dynamic offset: one buffer holds every entity's uniform at
//! a stride rounded up to `min_uniform_buffer_offset_alignment`, and each
//! `draw_indexed` passes its byte offset. `emissive.w` is 1.0 when the entity
//! uses per-vertex colours.
//!
//! ## Points
//!
//! WebGPU has no point size: `PointList` rasterizes one pixel per point, so
//! `Material::point_size` only affects the headless renderer's bookkeeping.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::Blend;
use super::gpu::GpuContext;
use super::mesh::Topology;
use crate::math::Mat4;

/// Per-vertex data: position and colour.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct GpuVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl GpuVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position: vec3<f32>
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color: vec3<f32>
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };
}

/// Per-instance model matrix, column-major.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 32,
                shader_location: 4,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: 48,
                shader_location: 5,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    pub fn from_mat4(m: &Mat4) -> Self {
        Self {
            model: m.to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct DrawUniform {
    pub model: [[f32; 4]; 4], // 64 bytes
    pub color: [f32; 4],      // rgb + opacity
    pub emissive: [f32; 4],   // rgb * intensity + vertex-colour flag → total 96
}

/// Pipelines plus the buffers every draw shares.
pub(crate) struct DrawPipelines {
    pipelines: HashMap<(Topology, Blend), wgpu::RenderPipeline>,

    pub camera_buffer: wgpu::Buffer,
    pub camera_bind_group: wgpu::BindGroup,

    draw_bind_group_layout: wgpu::BindGroupLayout,
    pub draw_buffer: wgpu::Buffer,
    pub draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,

    /// One identity matrix, bound in slot 1 for non-instanced entities.
    pub identity_instance: wgpu::Buffer,
}

impl DrawPipelines {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        // ── Shader ──────────────────────────────────────────────────────
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("backdrop unlit shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        // ── Bind group layout 0: Camera (per frame) ────────────────────
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("backdrop camera layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        // ── Bind group layout 1: Draw (per entity, dynamic offset) ─────
        let draw_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("backdrop draw layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<DrawUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("backdrop pipeline layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &draw_bind_group_layout],
            push_constant_ranges: &[],
        });

        // ── One pipeline per (topology, blend) ──────────────────────────
        let mut pipelines = HashMap::new();
        for topology in [Topology::Points, Topology::Lines, Topology::Triangles] {
            for blend in [Blend::Normal, Blend::Additive] {
                let pipeline = build_pipeline(gpu, &shader, &pipeline_layout, topology, blend);
                pipelines.insert((topology, blend), pipeline);
            }
        }

        // ── Camera buffer + bind group ──────────────────────────────────
        let camera_uniform = CameraUniform {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        };
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop camera buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backdrop camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // ── Dynamic draw buffer ─────────────────────────────────────────
        let initial_capacity = 64;
        let (draw_buffer, draw_bind_group) =
            create_draw_buffer(device, &draw_bind_group_layout, initial_capacity);

        let identity_instance = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("backdrop identity instance"),
            contents: bytemuck::cast_slice(&[InstanceRaw::from_mat4(&Mat4::IDENTITY)]),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            pipelines,
            camera_buffer,
            camera_bind_group,
            draw_bind_group_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity: initial_capacity,
            identity_instance,
        }
    }

    pub fn get(&self, topology: Topology, blend: Blend) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&(topology, blend))
    }

    /// Ensure the dynamic draw buffer can hold `count` entries.
    /// Recreates if needed. Returns the aligned stride in bytes.
    pub fn ensure_draw_capacity(&mut self, device: &wgpu::Device, count: usize) -> u32 {
        let stride = draw_stride(device);

        if count > self.draw_capacity {
            let new_cap = count.next_power_of_two();
            let (buffer, bind_group) = create_draw_buffer(device, &self.draw_bind_group_layout, new_cap);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = new_cap;
            log::debug!("Draw uniform buffer grown to {new_cap} slots");
        }

        stride as u32
    }
}

fn wgpu_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::Points => wgpu::PrimitiveTopology::PointList,
        Topology::Lines => wgpu::PrimitiveTopology::LineList,
        Topology::Triangles => wgpu::PrimitiveTopology::TriangleList,
    }
}

fn blend_state(blend: Blend) -> wgpu::BlendState {
    match blend {
        Blend::Normal => wgpu::BlendState::ALPHA_BLENDING,
        Blend::Additive => wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        },
    }
}

fn build_pipeline(
    gpu: &GpuContext,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    topology: Topology,
    blend: Blend,
) -> wgpu::RenderPipeline {
    let label = format!("backdrop {topology:?}/{blend:?} pipeline");
    gpu.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[GpuVertex::LAYOUT, InstanceRaw::LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.surface_format(),
                blend: Some(blend_state(blend)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu_topology(topology),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Wireframes and transparent solids are seen from both sides.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn draw_stride(device: &wgpu::Device) -> usize {
    let align = device.limits().min_uniform_buffer_offset_alignment as usize;
    align_up(std::mem::size_of::<DrawUniform>(), align)
}

/// Create a dynamic draw uniform buffer with the given capacity.
fn create_draw_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let size = (draw_stride(device) * capacity) as u64;

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("backdrop draw dynamic buffer"),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("backdrop draw bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
            }),
        }],
    });

    (buffer, bind_group)
}

/// Round `value` up to the next multiple of `align` (a power of two).
pub(crate) fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_the_shader() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 24);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);
        assert_eq!(std::mem::size_of::<CameraUniform>(), 64);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 96);
    }

    #[test]
    fn align_up_rounds_to_alignment() {
        assert_eq!(align_up(96, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(1, 4), 4);
    }

    #[test]
    fn instance_columns_are_column_major() {
        let m = Mat4::from_translation(crate::math::Vec3::new(1.0, 2.0, 3.0));
        let raw = InstanceRaw::from_mat4(&m);
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
