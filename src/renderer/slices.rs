//! Instanced renderer for the weave demo's barcode-sliced mesh.
//!
//! The mesh is drawn once per slice group (instance); fragments survive
//! only where the channel's offset table assigns their barcode coordinate
//! to that group. Each color channel gets its own offset table, params
//! buffer, and bind group so the three channel passes are independent.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::anim::barcode::{OffsetTable, VectorTable};
use crate::error::CycloramaError;
use crate::geometry::{MeshData, Vertex};
use crate::gpu::pipeline_helpers::{
    texture_2d_uint, uniform_buffer_vertex_fragment,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::renderer::pipeline_util::{depth_stencil_state, hdr_single_target};

/// Fixed size of the displacement-vector uniform array. The demo uses 10
/// groups; the array is padded to this.
pub const MAX_SLICES: usize = 16;

/// Number of color channels (and offset tables).
pub const CHANNELS: usize = 3;

/// Per-channel shader parameters. Layout must match `slices.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SliceParams {
    /// Scene-rotation model matrix (shared by all channels each frame).
    model: [[f32; 4]; 4],
    /// Output color mask for this channel.
    channel: [f32; 4],
    /// Displacement magnitude.
    spread: f32,
    /// Offset-table length as float.
    lines: f32,
    _pad: [f32; 2],
}

/// Draws the sliced mesh once per channel into that channel's buffer.
pub struct SlicesRenderer {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_count: u32,
    lines: u32,

    offset_textures: [wgpu::Texture; CHANNELS],
    params_buffers: [wgpu::Buffer; CHANNELS],
    vectors_buffer: wgpu::Buffer,
    bind_groups: [wgpu::BindGroup; CHANNELS],
    pipeline: wgpu::RenderPipeline,
}

impl SlicesRenderer {
    /// Create buffers, per-channel tables, and the slices pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices shader fails to compose.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        mesh: &MeshData,
        lines: u32,
        slices: u32,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, CycloramaError> {
        debug_assert!((slices as usize) <= MAX_SLICES);

        let (vertex_buffer, index_buffer, index_count) =
            Self::create_mesh_buffers(&context.device, mesh);

        let offset_textures = std::array::from_fn(|i| {
            context.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(&format!("Offset Table {i}")),
                size: wgpu::Extent3d {
                    width: lines,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::R8Uint,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        });

        let params = SliceParams {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            channel: [1.0, 1.0, 1.0, 1.0],
            spread: 0.05,
            lines: lines as f32,
            _pad: [0.0; 2],
        };
        let params_buffers = std::array::from_fn(|i| {
            context.device.create_buffer_init(
                &wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Slice Params {i}")),
                    contents: bytemuck::cast_slice(&[params]),
                    usage: wgpu::BufferUsages::UNIFORM
                        | wgpu::BufferUsages::COPY_DST,
                },
            )
        });

        let vectors_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Slice Vectors"),
                contents: bytemuck::cast_slice(&[[0.0f32; 4]; MAX_SLICES]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Slices Bind Group Layout"),
                entries: &[
                    uniform_buffer_vertex_fragment(0),
                    uniform_buffer_vertex_fragment(1),
                    texture_2d_uint(2),
                ],
            },
        );

        let bind_groups = std::array::from_fn(|i| {
            let view =
                offset_textures[i].create_view(&Default::default());
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Slices Bind Group {i}")),
                    layout: &layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: params_buffers[i].as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: vectors_buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::TextureView(
                                &view,
                            ),
                        },
                    ],
                })
        });

        let shader = shader_composer.compose(
            &context.device,
            "Slices Shader",
            include_str!("../../assets/shaders/mesh/slices.wgsl"),
            "mesh/slices.wgsl",
        )?;

        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Slices Pipeline Layout"),
                bind_group_layouts: &[camera_layout, &layout],
                push_constant_ranges: &[],
            },
        );

        let pipeline = context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Slices Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &hdr_single_target(),
                    compilation_options: Default::default(),
                }),
                // Displaced slices expose their back faces
                primitive: wgpu::PrimitiveState {
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(depth_stencil_state()),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        );

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count,
            instance_count: slices,
            lines,
            offset_textures,
            params_buffers,
            vectors_buffer,
            bind_groups,
            pipeline,
        })
    }

    fn create_mesh_buffers(
        device: &wgpu::Device,
        mesh: &MeshData,
    ) -> (wgpu::Buffer, wgpu::Buffer, u32) {
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Slices Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Slices Index Buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        (vertex_buffer, index_buffer, mesh.indices.len() as u32)
    }

    /// Swap in a new mesh (the randomize-geometry key).
    pub fn set_mesh(&mut self, device: &wgpu::Device, mesh: &MeshData) {
        let (vertex_buffer, index_buffer, index_count) =
            Self::create_mesh_buffers(device, mesh);
        self.vertex_buffer = vertex_buffer;
        self.index_buffer = index_buffer;
        self.index_count = index_count;
    }

    /// Upload one channel's offset table.
    pub fn upload_table(
        &self,
        queue: &wgpu::Queue,
        channel: usize,
        table: &OffsetTable,
    ) {
        debug_assert_eq!(table.entries().len(), self.lines as usize);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.offset_textures[channel],
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            table.entries(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.lines),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: self.lines,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Upload the shared displacement-vector table.
    pub fn upload_vectors(
        &self,
        queue: &wgpu::Queue,
        vectors: &VectorTable,
    ) {
        let mut padded = [[0.0f32; 4]; MAX_SLICES];
        for (slot, dir) in padded.iter_mut().zip(vectors.directions()) {
            *slot = [dir.x, dir.y, dir.z, 0.0];
        }
        queue.write_buffer(
            &self.vectors_buffer,
            0,
            bytemuck::cast_slice(&padded),
        );
    }

    /// Update one channel's model matrix, color mask, and spread.
    pub fn update_params(
        &self,
        queue: &wgpu::Queue,
        channel: usize,
        model: Mat4,
        channel_mask: [f32; 4],
        spread: f32,
    ) {
        let params = SliceParams {
            model: model.to_cols_array_2d(),
            channel: channel_mask,
            spread,
            lines: self.lines as f32,
            _pad: [0.0; 2],
        };
        queue.write_buffer(
            &self.params_buffers[channel],
            0,
            bytemuck::cast_slice(&[params]),
        );
    }

    /// Record the instanced draw for one channel pass.
    pub fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        channel: usize,
    ) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.bind_groups[channel], &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(
            self.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }
}
