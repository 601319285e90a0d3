//! Screen-space ambient occlusion for the cube-grid demos.
//!
//! Hemisphere sampling in view space against the depth buffer, with a
//! small tiled noise texture to rotate the kernel and a box-blur pass to
//! hide the banding.

use glam::Vec3;
use rand::Rng;
use wgpu::util::DeviceExt;

use super::screen_pass::ScreenPass;
use crate::camera::Camera;
use crate::error::CycloramaError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, depth_texture_2d, filtering_sampler,
    linear_sampler, non_filtering_sampler, texture_2d,
    texture_2d_unfilterable, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::PostProcessingOptions;

const KERNEL_SIZE: usize = 32;
const NOISE_SIZE: u32 = 4;

/// SSAO parameters uniform - must match the WGSL struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct SsaoParams {
    inv_proj: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
    screen_size: [f32; 2],
    radius: f32,
    bias: f32,
    power: f32,
    _pad: [f32; 3],
}

/// SSAO + blur renderer. The blurred output feeds the composite pass.
pub struct SsaoPass {
    ssao_view: wgpu::TextureView,
    blurred_view: wgpu::TextureView,

    kernel_buffer: wgpu::Buffer,
    params_buffer: wgpu::Buffer,

    noise_view: wgpu::TextureView,
    noise_sampler: wgpu::Sampler,
    sampler: wgpu::Sampler,

    ssao_pipeline: wgpu::RenderPipeline,
    ssao_layout: wgpu::BindGroupLayout,
    ssao_bind_group: wgpu::BindGroup,
    blur_pipeline: wgpu::RenderPipeline,
    blur_layout: wgpu::BindGroupLayout,
    blur_bind_group: wgpu::BindGroup,

    /// Stored geometry views for bind group recreation on resize.
    depth_view: wgpu::TextureView,
    normal_view: wgpu::TextureView,

    width: u32,
    height: u32,

    radius: f32,
    bias: f32,
    power: f32,
}

impl SsaoPass {
    /// Create kernel, noise, targets, and both pipelines.
    ///
    /// # Errors
    ///
    /// Returns an error if either SSAO shader fails to compose.
    pub fn new(
        context: &RenderContext,
        depth_view: &wgpu::TextureView,
        normal_view: &wgpu::TextureView,
        opts: &PostProcessingOptions,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, CycloramaError> {
        let width = context.render_width();
        let height = context.render_height();

        let ssao_view =
            Self::create_target(context, width, height, "SSAO Texture");
        let blurred_view =
            Self::create_target(context, width, height, "SSAO Blurred");

        let kernel_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("SSAO Kernel"),
                contents: bytemuck::cast_slice(&Self::generate_kernel()),
                usage: wgpu::BufferUsages::UNIFORM,
            },
        );

        let params = SsaoParams {
            inv_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            screen_size: [width as f32, height as f32],
            radius: opts.ao_radius,
            bias: opts.ao_bias,
            power: opts.ao_power,
            _pad: [0.0; 3],
        };
        let params_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("SSAO Params"),
                contents: bytemuck::cast_slice(&[params]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let noise_view = Self::create_noise_texture(context);
        let noise_sampler =
            context.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("SSAO Noise Sampler"),
                address_mode_u: wgpu::AddressMode::Repeat,
                address_mode_v: wgpu::AddressMode::Repeat,
                mag_filter: wgpu::FilterMode::Nearest,
                min_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            });
        let sampler = linear_sampler(&context.device, "SSAO Sampler");

        let ssao_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("SSAO Bind Group Layout"),
                entries: &[
                    depth_texture_2d(0),
                    texture_2d_unfilterable(1),
                    filtering_sampler(2),
                    non_filtering_sampler(3),
                    uniform_buffer(4),
                    uniform_buffer(5),
                    texture_2d(6),
                ],
            },
        );
        let ssao_shader = shader_composer.compose(
            &context.device,
            "SSAO Shader",
            include_str!("../../../assets/shaders/screen/ssao.wgsl"),
            "screen/ssao.wgsl",
        )?;
        let ssao_pipeline = create_screen_space_pipeline(
            &context.device,
            "SSAO",
            &ssao_shader,
            wgpu::TextureFormat::R8Unorm,
            None,
            &[&ssao_layout],
        );

        let blur_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("SSAO Blur Layout"),
                entries: &[
                    texture_2d(0),
                    filtering_sampler(1),
                    uniform_buffer(2),
                ],
            },
        );
        let blur_shader = shader_composer.compose(
            &context.device,
            "SSAO Blur Shader",
            include_str!("../../../assets/shaders/screen/ssao_blur.wgsl"),
            "screen/ssao_blur.wgsl",
        )?;
        let blur_pipeline = create_screen_space_pipeline(
            &context.device,
            "SSAO Blur",
            &blur_shader,
            wgpu::TextureFormat::R8Unorm,
            None,
            &[&blur_layout],
        );

        let ssao_bind_group = Self::create_ssao_bind_group(
            context,
            &ssao_layout,
            depth_view,
            normal_view,
            &noise_view,
            &sampler,
            &noise_sampler,
            &kernel_buffer,
            &params_buffer,
        );
        let blur_bind_group = Self::create_blur_bind_group(
            context,
            &blur_layout,
            &ssao_view,
            &sampler,
            &params_buffer,
        );

        Ok(Self {
            ssao_view,
            blurred_view,
            kernel_buffer,
            params_buffer,
            noise_view,
            noise_sampler,
            sampler,
            ssao_pipeline,
            ssao_layout,
            ssao_bind_group,
            blur_pipeline,
            blur_layout,
            blur_bind_group,
            depth_view: depth_view.clone(),
            normal_view: normal_view.clone(),
            width,
            height,
            radius: opts.ao_radius,
            bias: opts.ao_bias,
            power: opts.ao_power,
        })
    }

    fn create_target(
        context: &RenderContext,
        width: u32,
        height: u32,
        label: &str,
    ) -> wgpu::TextureView {
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    /// Hemisphere sample kernel, denser near the origin.
    fn generate_kernel() -> [[f32; 4]; KERNEL_SIZE] {
        let mut rng = rand::rng();
        std::array::from_fn(|i| {
            let sample = Vec3::new(
                rng.random::<f32>() * 2.0 - 1.0,
                rng.random::<f32>() * 2.0 - 1.0,
                rng.random::<f32>(),
            )
            .normalize_or_zero();

            let t = i as f32 / KERNEL_SIZE as f32;
            let scale = 0.1 + t * t * 0.9;
            let s = sample * scale;
            [s.x, s.y, s.z, 0.0]
        })
    }

    /// 4x4 texture of random rotation vectors, tiled across the screen.
    fn create_noise_texture(
        context: &RenderContext,
    ) -> wgpu::TextureView {
        let mut rng = rand::rng();
        let mut noise_data = vec![0u8; (NOISE_SIZE * NOISE_SIZE * 4) as usize];

        for pixel in noise_data.chunks_exact_mut(4) {
            let x = rng.random::<f32>() * 2.0 - 1.0;
            let y = rng.random::<f32>() * 2.0 - 1.0;
            let len = x.hypot(y);
            let (nx, ny) =
                if len > 0.0 { (x / len, y / len) } else { (1.0, 0.0) };
            pixel[0] = ((nx * 0.5 + 0.5) * 255.0) as u8;
            pixel[1] = ((ny * 0.5 + 0.5) * 255.0) as u8;
            pixel[2] = 128;
            pixel[3] = 255;
        }

        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("SSAO Noise Texture"),
            size: wgpu::Extent3d {
                width: NOISE_SIZE,
                height: NOISE_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        context.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &noise_data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(NOISE_SIZE * 4),
                rows_per_image: Some(NOISE_SIZE),
            },
            wgpu::Extent3d {
                width: NOISE_SIZE,
                height: NOISE_SIZE,
                depth_or_array_layers: 1,
            },
        );

        texture.create_view(&Default::default())
    }

    #[allow(clippy::too_many_arguments)]
    fn create_ssao_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        depth: &wgpu::TextureView,
        normal: &wgpu::TextureView,
        noise: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        noise_sampler: &wgpu::Sampler,
        kernel_buffer: &wgpu::Buffer,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("SSAO Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(depth),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(noise),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(
                            noise_sampler,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: kernel_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 5,
                        resource: params_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 6,
                        resource: wgpu::BindingResource::TextureView(normal),
                    },
                ],
            })
    }

    fn create_blur_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        ssao_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("SSAO Blur Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            ssao_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
    }

    /// Push current projection matrices (call before rendering).
    pub fn update_matrices(&self, queue: &wgpu::Queue, camera: &Camera) {
        let proj = camera.build_projection();
        let params = SsaoParams {
            inv_proj: proj.inverse().to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            screen_size: [self.width as f32, self.height as f32],
            radius: self.radius,
            bias: self.bias,
            power: self.power,
            _pad: [0.0; 3],
        };
        queue.write_buffer(
            &self.params_buffer,
            0,
            bytemuck::cast_slice(&[params]),
        );
    }

    /// The blurred AO view for the composite pass.
    pub fn output_view(&self) -> &wgpu::TextureView {
        &self.blurred_view
    }
}

impl ScreenPass for SsaoPass {
    fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        // SSAO pass
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("SSAO Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &self.ssao_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    ..Default::default()
                });
            pass.set_pipeline(&self.ssao_pipeline);
            pass.set_bind_group(0, &self.ssao_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        // Blur pass
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("SSAO Blur Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &self.blurred_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    ..Default::default()
                });
            pass.set_pipeline(&self.blur_pipeline);
            pass.set_bind_group(0, &self.blur_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
    }

    fn resize(&mut self, context: &RenderContext) {
        if context.render_width() == self.width
            && context.render_height() == self.height
        {
            return;
        }
        self.width = context.render_width();
        self.height = context.render_height();

        self.ssao_view = Self::create_target(
            context,
            self.width,
            self.height,
            "SSAO Texture",
        );
        self.blurred_view = Self::create_target(
            context,
            self.width,
            self.height,
            "SSAO Blurred",
        );

        self.ssao_bind_group = Self::create_ssao_bind_group(
            context,
            &self.ssao_layout,
            &self.depth_view,
            &self.normal_view,
            &self.noise_view,
            &self.sampler,
            &self.noise_sampler,
            &self.kernel_buffer,
            &self.params_buffer,
        );
        self.blur_bind_group = Self::create_blur_bind_group(
            context,
            &self.blur_layout,
            &self.ssao_view,
            &self.sampler,
            &self.params_buffer,
        );
    }
}

impl SsaoPass {
    /// Swap the geometry views this pass samples and rebuild the bind
    /// group immediately. `resize` early-returns when the render size is
    /// unchanged (surface-lost recovery re-runs the resize path at the
    /// same dimensions), so the rebuild cannot be deferred to it.
    pub fn set_geometry_views(
        &mut self,
        context: &RenderContext,
        depth: wgpu::TextureView,
        normal: wgpu::TextureView,
    ) {
        self.depth_view = depth;
        self.normal_view = normal;
        self.ssao_bind_group = Self::create_ssao_bind_group(
            context,
            &self.ssao_layout,
            &self.depth_view,
            &self.normal_view,
            &self.noise_view,
            &self.sampler,
            &self.noise_sampler,
            &self.kernel_buffer,
            &self.params_buffer,
        );
    }
}
