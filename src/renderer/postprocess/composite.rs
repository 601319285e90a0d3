//! Final composite: HDR color modulated by ambient occlusion, exposure and
//! gamma applied, written to the swapchain.

use wgpu::util::DeviceExt;

use super::screen_pass::ScreenPass;
use crate::error::CycloramaError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler,
    texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::PostProcessingOptions;

/// Composite parameters uniform - must match the WGSL struct.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CompositeParams {
    ao_strength: f32,
    exposure: f32,
    gamma: f32,
    _pad: f32,
}

/// Owns the HDR color target of the geometry pass and resolves it to the
/// surface with AO applied.
pub struct CompositePass {
    color_view: wgpu::TextureView,

    params_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,

    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,

    ssao_view: wgpu::TextureView,
    output_view: Option<wgpu::TextureView>,

    width: u32,
    height: u32,
}

impl CompositePass {
    /// Create the HDR color target and the composite pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the composite shader fails to compose.
    pub fn new(
        context: &RenderContext,
        ssao_view: &wgpu::TextureView,
        opts: &PostProcessingOptions,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, CycloramaError> {
        let width = context.render_width();
        let height = context.render_height();
        let color_view = Self::create_color_target(context, width, height);

        let params = CompositeParams {
            ao_strength: opts.ao_strength,
            exposure: opts.exposure,
            gamma: opts.gamma,
            _pad: 0.0,
        };
        let params_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Composite Params"),
                contents: bytemuck::cast_slice(&[params]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );
        let sampler = linear_sampler(&context.device, "Composite Sampler");

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Composite Bind Group Layout"),
                entries: &[
                    texture_2d(0),
                    texture_2d(1),
                    filtering_sampler(2),
                    uniform_buffer(3),
                ],
            },
        );

        let shader = shader_composer.compose(
            &context.device,
            "Composite Shader",
            include_str!("../../../assets/shaders/screen/composite.wgsl"),
            "screen/composite.wgsl",
        )?;
        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Composite",
            &shader,
            context.format(),
            None,
            &[&layout],
        );

        let bind_group = Self::create_bind_group(
            context,
            &layout,
            &color_view,
            ssao_view,
            &sampler,
            &params_buffer,
        );

        Ok(Self {
            color_view,
            params_buffer,
            sampler,
            layout,
            bind_group,
            pipeline,
            ssao_view: ssao_view.clone(),
            output_view: None,
            width,
            height,
        })
    }

    fn create_color_target(
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("HDR Color Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba16Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        color_view: &wgpu::TextureView,
        ssao_view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
        params_buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Composite Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            color_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            ssao_view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: params_buffer.as_entire_binding(),
                    },
                ],
            })
    }

    /// The geometry pass renders its color output here.
    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    /// Point the composite at this frame's swapchain view.
    pub fn set_output_view(&mut self, view: wgpu::TextureView) {
        self.output_view = Some(view);
    }

    /// Swap the AO input (call after the SSAO pass resizes).
    pub fn set_ssao_view(
        &mut self,
        context: &RenderContext,
        ssao_view: &wgpu::TextureView,
    ) {
        self.ssao_view = ssao_view.clone();
        self.bind_group = Self::create_bind_group(
            context,
            &self.layout,
            &self.color_view,
            &self.ssao_view,
            &self.sampler,
            &self.params_buffer,
        );
    }
}

impl ScreenPass for CompositePass {
    fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        let Some(output_view) = &self.output_view else {
            return;
        };
        let mut pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: output_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    fn resize(&mut self, context: &RenderContext) {
        if context.render_width() == self.width
            && context.render_height() == self.height
        {
            return;
        }
        self.width = context.render_width();
        self.height = context.render_height();

        self.color_view =
            Self::create_color_target(context, self.width, self.height);

        self.bind_group = Self::create_bind_group(
            context,
            &self.layout,
            &self.color_view,
            &self.ssao_view,
            &self.sampler,
            &self.params_buffer,
        );
    }
}
