//! Three-channel compositor for the weave demo.
//!
//! The sliced mesh is rendered once per color channel into a dedicated HDR
//! buffer, then the three buffers are summed to the swapchain. Each channel
//! pass clears to a third of the background color so the sum reconstructs
//! the full background where no geometry landed.

use super::screen_pass::ScreenPass;
use crate::error::CycloramaError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler,
    texture_2d,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::renderer::slices::CHANNELS;

/// Per-channel HDR targets plus the additive combine pass.
pub struct ChannelCompositor {
    channel_views: [wgpu::TextureView; CHANNELS],
    depth_view: wgpu::TextureView,

    sampler: wgpu::Sampler,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,

    output_view: Option<wgpu::TextureView>,

    width: u32,
    height: u32,
}

impl ChannelCompositor {
    /// Create the channel targets, shared depth buffer, and combine
    /// pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the combine shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, CycloramaError> {
        let width = context.render_width();
        let height = context.render_height();
        let channel_views = Self::create_channel_views(context, width, height);
        let depth_view = Self::create_depth_view(context, width, height);

        let sampler = linear_sampler(&context.device, "Combine Sampler");
        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Combine Bind Group Layout"),
                entries: &[
                    texture_2d(0),
                    texture_2d(1),
                    texture_2d(2),
                    filtering_sampler(3),
                ],
            },
        );

        let shader = shader_composer.compose(
            &context.device,
            "Combine Shader",
            include_str!("../../../assets/shaders/screen/combine.wgsl"),
            "screen/combine.wgsl",
        )?;
        let pipeline = create_screen_space_pipeline(
            &context.device,
            "Combine",
            &shader,
            context.format(),
            None,
            &[&layout],
        );

        let bind_group = Self::create_bind_group(
            context,
            &layout,
            &channel_views,
            &sampler,
        );

        Ok(Self {
            channel_views,
            depth_view,
            sampler,
            layout,
            bind_group,
            pipeline,
            output_view: None,
            width,
            height,
        })
    }

    fn create_channel_views(
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> [wgpu::TextureView; CHANNELS] {
        std::array::from_fn(|i| {
            let texture =
                context.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some(&format!("Channel Texture {i}")),
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
        })
    }

    fn create_depth_view(
        context: &RenderContext,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Channel Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }

    fn create_bind_group(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        channel_views: &[wgpu::TextureView; CHANNELS],
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Combine Bind Group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            &channel_views[0],
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            &channel_views[1],
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(
                            &channel_views[2],
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            })
    }

    /// Render target for one channel pass.
    pub fn channel_view(&self, channel: usize) -> &wgpu::TextureView {
        &self.channel_views[channel]
    }

    /// Depth buffer shared by the channel passes (cleared per channel).
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Point the combine at this frame's swapchain view.
    pub fn set_output_view(&mut self, view: wgpu::TextureView) {
        self.output_view = Some(view);
    }
}

impl ScreenPass for ChannelCompositor {
    fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        let Some(output_view) = &self.output_view else {
            return;
        };
        let mut pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Combine Pass"),
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

        self.channel_views =
            Self::create_channel_views(context, self.width, self.height);
        self.depth_view =
            Self::create_depth_view(context, self.width, self.height);
        self.bind_group = Self::create_bind_group(
            context,
            &self.layout,
            &self.channel_views,
            &self.sampler,
        );
    }
}
