//! # WgpuRenderer: The GPU Implementation of [`SceneRenderer`]
//!
//! Each entity owns a vertex buffer, an index buffer and, when instanced, an
//! instance buffer. A CPU copy of the vertices is kept so the scene can
//! rewrite positions or colours; the upload happens once per frame, in
//! [`render`](SceneRenderer::render), only for entities marked dirty.
//!
//! ## Frame Flow
//!
//! ```text
//! render(camera)
//!   ├─ write camera uniform
//!   ├─ flush dirty vertex / instance buffers
//!   ├─ pack one DrawUniform per visible entity into the dynamic buffer
//!   ├─ acquire surface texture ── Lost/Outdated → reconfigure, skip frame
//!   │                          └─ Timeout → skip frame
//!   │                          └─ anything else → BackdropError::Surface
//!   └─ one pass: clear, then draw_indexed per entity in creation order
//! ```
//!
//! Scene colours arrive sRGB-encoded. On an sRGB surface they are decoded to
//! linear before upload, so the hardware encode on store does not apply twice.
//!
//! There is no depth buffer. Everything is translucent and drawn back-to-front
//! closely enough in creation order for a background.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::gpu::GpuContext;
use super::handle::{EntityHandle, Slots};
use super::mesh::Topology;
use super::pipeline::{CameraUniform, DrawPipelines, DrawUniform, GpuVertex, InstanceRaw};
use super::{EntityDesc, Material, MaterialProperty, RenderStats, SceneRenderer};
use crate::error::BackdropError;
use crate::math::{Mat4, Transform, Vec3, srgb_to_linear};
use crate::scene::camera::Camera;

struct GpuEntity {
    label: String,
    topology: Topology,
    material: Material,
    transform: Transform,

    vertices: Vec<GpuVertex>,
    vertex_buffer: wgpu::Buffer,
    vertices_dirty: bool,

    index_buffer: wgpu::Buffer,
    index_count: u32,

    instances: Option<Vec<InstanceRaw>>,
    instance_buffer: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instances_dirty: bool,
}

impl GpuEntity {
    fn draw_uniform(&self, decode_srgb: bool) -> DrawUniform {
        let m = &self.material;
        let k = m.emissive_intensity;
        let color = surface_color(m.color, decode_srgb);
        let emissive = surface_color(m.emissive, decode_srgb);
        DrawUniform {
            model: self.transform.matrix().to_cols_array_2d(),
            color: [color[0], color[1], color[2], m.opacity],
            emissive: [
                emissive[0] * k,
                emissive[1] * k,
                emissive[2] * k,
                if m.vertex_colors { 1.0 } else { 0.0 },
            ],
        }
    }

    fn instance_count(&self) -> u32 {
        self.instances.as_ref().map_or(1, |i| i.len() as u32)
    }

    fn is_visible(&self) -> bool {
        self.index_count > 0 && self.instance_count() > 0 && self.material.opacity > 0.0
    }
}

fn surface_color(rgb: [f32; 3], decode_srgb: bool) -> [f32; 3] {
    if decode_srgb { srgb_to_linear(rgb) } else { rgb }
}

fn instance_buffer(device: &wgpu::Device, label: &str, instances: &[InstanceRaw]) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{label} instances")),
        contents: bytemuck::cast_slice(instances),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}

/// Unlit wgpu renderer drawing to a winit window surface.
pub struct WgpuRenderer {
    gpu: GpuContext,
    pipelines: DrawPipelines,
    entities: Slots<GpuEntity>,
    clear_color: [f64; 4],
    /// The surface encodes to sRGB on store; decode scene colours first.
    decode_srgb: bool,
    frames: u64,
    last_draw_calls: usize,
    /// Scratch buffer for packing draw uniforms.
    uniform_bytes: Vec<u8>,
}

impl WgpuRenderer {
    /// Acquire adapter, device and surface for `window`.
    pub fn new(window: Arc<winit::window::Window>) -> Result<Self, BackdropError> {
        let gpu = GpuContext::new(window)?;
        let pipelines = DrawPipelines::new(&gpu);
        let decode_srgb = gpu.surface_config.format.is_srgb();
        Ok(Self {
            gpu,
            pipelines,
            entities: Slots::new(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            decode_srgb,
            frames: 0,
            last_draw_calls: 0,
            uniform_bytes: Vec::new(),
        })
    }

    /// Upload every dirty vertex and instance buffer.
    fn flush(&mut self) {
        let device = &self.gpu.device;
        let queue = &self.gpu.queue;
        for entity in self.entities.values_mut() {
            if entity.vertices_dirty {
                queue.write_buffer(&entity.vertex_buffer, 0, bytemuck::cast_slice(&entity.vertices));
                entity.vertices_dirty = false;
            }
            if entity.instances_dirty {
                if let Some(instances) = &entity.instances {
                    if instances.len() > entity.instance_capacity || entity.instance_buffer.is_none() {
                        entity.instance_buffer = Some(instance_buffer(device, &entity.label, instances));
                        entity.instance_capacity = instances.len();
                    } else if let Some(buffer) = &entity.instance_buffer {
                        queue.write_buffer(buffer, 0, bytemuck::cast_slice(instances));
                    }
                }
                entity.instances_dirty = false;
            }
        }
    }
}

impl SceneRenderer for WgpuRenderer {
    fn create(&mut self, desc: EntityDesc) -> EntityHandle {
        let mesh = desc.geometry.mesh(desc.material.wireframe);
        let vertices: Vec<GpuVertex> = mesh
            .positions
            .iter()
            .enumerate()
            .map(|(i, position)| GpuVertex {
                position: *position,
                color: mesh
                    .colors
                    .as_ref()
                    .and_then(|c| c.get(i).copied())
                    .map_or([1.0; 3], |c| surface_color(c, self.decode_srgb)),
            })
            .collect();

        let device = &self.gpu.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} vertices", desc.label)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} indices", desc.label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instances: Option<Vec<InstanceRaw>> = desc
            .instances
            .as_ref()
            .map(|m| m.iter().map(InstanceRaw::from_mat4).collect());
        let instance_buffer = instances
            .as_ref()
            .map(|raw| instance_buffer(device, &desc.label, raw));
        let instance_capacity = instances.as_ref().map_or(0, Vec::len);

        log::debug!(
            "Created {} ({} vertices, {:?})",
            desc.label,
            vertices.len(),
            mesh.topology
        );

        self.entities.insert(GpuEntity {
            label: desc.label,
            topology: mesh.topology,
            material: desc.material,
            transform: desc.transform,
            vertices,
            vertex_buffer,
            vertices_dirty: false,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instances,
            instance_buffer,
            instance_capacity,
            instances_dirty: false,
        })
    }

    fn set_transform(&mut self, handle: EntityHandle, transform: Transform) {
        if let Some(entity) = self.entities.get_mut(handle) {
            entity.transform = transform;
        }
    }

    fn set_instances(&mut self, handle: EntityHandle, instances: &[Mat4]) {
        if let Some(entity) = self.entities.get_mut(handle) {
            let raw = entity.instances.get_or_insert_with(Vec::new);
            raw.clear();
            raw.extend(instances.iter().map(InstanceRaw::from_mat4));
            entity.instances_dirty = true;
        }
    }

    fn set_positions(&mut self, handle: EntityHandle, positions: &[Vec3]) {
        if let Some(entity) = self.entities.get_mut(handle) {
            for (vertex, p) in entity.vertices.iter_mut().zip(positions) {
                vertex.position = p.to_array();
            }
            entity.vertices_dirty = true;
        }
    }

    fn set_colors(&mut self, handle: EntityHandle, colors: &[[f32; 3]]) {
        let decode_srgb = self.decode_srgb;
        if let Some(entity) = self.entities.get_mut(handle) {
            for (vertex, c) in entity.vertices.iter_mut().zip(colors) {
                vertex.color = surface_color(*c, decode_srgb);
            }
            entity.vertices_dirty = true;
        }
    }

    fn set_material(&mut self, handle: EntityHandle, property: MaterialProperty) {
        if let Some(entity) = self.entities.get_mut(handle) {
            entity.material.apply(property);
        }
    }

    fn remove(&mut self, handle: EntityHandle) -> bool {
        // Dropping the entity releases its buffers.
        self.entities.remove(handle).is_some()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    fn set_clear_color(&mut self, color: [f64; 4]) {
        let [r, g, b, a] = color;
        let rgb = surface_color([r as f32, g as f32, b as f32], self.decode_srgb);
        self.clear_color = [rgb[0] as f64, rgb[1] as f64, rgb[2] as f64, a];
    }

    fn render(&mut self, camera: &Camera) -> Result<(), BackdropError> {
        let camera_uniform = CameraUniform {
            view_proj: camera.view_proj().to_cols_array_2d(),
        };
        self.gpu
            .queue
            .write_buffer(&self.pipelines.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));

        self.flush();

        // ── Pack draw uniforms ──────────────────────────────────────────
        let visible: Vec<EntityHandle> = self
            .entities
            .iter()
            .filter_map(|(h, e)| e.is_visible().then_some(h))
            .collect();
        let stride = self.pipelines.ensure_draw_capacity(&self.gpu.device, visible.len()) as usize;
        self.uniform_bytes.clear();
        self.uniform_bytes.resize(stride * visible.len(), 0);
        for (slot, handle) in visible.iter().enumerate() {
            if let Some(entity) = self.entities.get(*handle) {
                let uniform = entity.draw_uniform(self.decode_srgb);
                let start = slot * stride;
                self.uniform_bytes[start..start + std::mem::size_of::<DrawUniform>()]
                    .copy_from_slice(bytemuck::bytes_of(&uniform));
            }
        }
        if !self.uniform_bytes.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.pipelines.draw_buffer, 0, &self.uniform_bytes);
        }

        // ── Acquire the frame ───────────────────────────────────────────
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(err) => return Err(BackdropError::Surface(err.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("backdrop frame encoder"),
            });

        let [r, g, b, a] = self.clear_color;
        let mut draw_calls = 0;
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("backdrop pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.pipelines.camera_bind_group, &[]);

            for (slot, handle) in visible.iter().enumerate() {
                let Some(entity) = self.entities.get(*handle) else {
                    continue;
                };
                let Some(pipeline) = self.pipelines.get(entity.topology, entity.material.blend) else {
                    continue;
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, &self.pipelines.draw_bind_group, &[(slot * stride) as u32]);
                pass.set_vertex_buffer(0, entity.vertex_buffer.slice(..));
                let instances = entity
                    .instance_buffer
                    .as_ref()
                    .unwrap_or(&self.pipelines.identity_instance);
                pass.set_vertex_buffer(1, instances.slice(..));
                pass.set_index_buffer(entity.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..entity.index_count, 0, 0..entity.instance_count());
                draw_calls += 1;
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.frames += 1;
        self.last_draw_calls = draw_calls;
        Ok(())
    }

    fn clear(&mut self) {
        self.entities.clear();
    }

    fn stats(&self) -> RenderStats {
        let mut stats = RenderStats {
            entities: self.entities.len(),
            draw_calls: self.last_draw_calls,
            frames: self.frames,
            ..Default::default()
        };
        for (_, entity) in self.entities.iter() {
            stats.vertices += entity.vertices.len();
            if let Some(instances) = &entity.instances {
                stats.instances += instances.len();
            }
        }
        stats
    }
}
