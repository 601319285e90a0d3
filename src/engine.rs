//! The demo engine: owns the GPU context, the camera, the loop clock, and
//! whichever render path the selected demo uses.
//!
//! The cube-grid demos render geometry into an HDR color + normal G-buffer,
//! run SSAO over it, and composite to the swapchain. The weave demo renders
//! the sliced mesh once per color channel and sums the three buffers.

use glam::Mat4;
use rand::rngs::ThreadRng;

use crate::anim::barcode::{random_spread, OffsetTable, VectorTable};
use crate::anim::clock::LoopClock;
use crate::anim::grid::GridDriver;
use crate::camera::CameraController;
use crate::demo::{DemoDescriptor, DemoKind, WeaveParams};
use crate::error::CycloramaError;
use crate::geometry::procedural::ShapeKind;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::Options;
use crate::renderer::cube_grid::{CubeGridRenderer, CubeInstance};
use crate::renderer::postprocess::channels::ChannelCompositor;
use crate::renderer::postprocess::composite::CompositePass;
use crate::renderer::postprocess::screen_pass::ScreenPass;
use crate::renderer::postprocess::ssao::SsaoPass;
use crate::renderer::slices::{SlicesRenderer, CHANNELS};
use crate::renderer::{create_depth_texture, create_normal_texture};
use crate::util::FrameTiming;

/// Additive color masks for the weave demo's three channel passes.
const CHANNEL_MASKS: [[f32; 4]; CHANNELS] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];

/// Render path for the cube-grid demos.
struct GridScene {
    driver: GridDriver,
    renderer: CubeGridRenderer,
    depth_view: wgpu::TextureView,
    normal_view: wgpu::TextureView,
    ssao: SsaoPass,
    composite: CompositePass,
    instances: Vec<CubeInstance>,
}

/// Render path for the weave demo.
struct WeaveScene {
    renderer: SlicesRenderer,
    channels: ChannelCompositor,
    params: WeaveParams,
    shape: ShapeKind,
    rng: ThreadRng,
    spread: f32,
    frames_since_regen: u32,
}

/// Owns everything needed to run one demo.
pub struct DemoEngine {
    /// GPU device, queue, surface.
    pub context: RenderContext,
    /// Orbit camera; the window handler forwards mouse input here.
    pub camera_controller: CameraController,
    descriptor: DemoDescriptor,
    clock: LoopClock,
    frame_timing: FrameTiming,
    loop_duration_ms: f64,

    grid: Option<GridScene>,
    weave: Option<WeaveScene>,
}

impl DemoEngine {
    /// Build the render path for the demo the descriptor selects.
    ///
    /// # Errors
    ///
    /// Returns an error if any shader fails to compose.
    pub fn new(
        context: RenderContext,
        descriptor: DemoDescriptor,
        options: &Options,
    ) -> Result<Self, CycloramaError> {
        let mut shader_composer = ShaderComposer::new()?;
        let camera_controller =
            CameraController::new(&context, &options.camera);

        let mut grid = None;
        let mut weave = None;

        if let Some(params) = descriptor.grid.clone() {
            let renderer = CubeGridRenderer::new(
                &context,
                &camera_controller.layout,
                &mut shader_composer,
            )?;
            let (_, depth_view) = create_depth_texture(&context);
            let (_, normal_view) = create_normal_texture(&context);
            let ssao = SsaoPass::new(
                &context,
                &depth_view,
                &normal_view,
                &options.post_processing,
                &mut shader_composer,
            )?;
            let composite = CompositePass::new(
                &context,
                ssao.output_view(),
                &options.post_processing,
                &mut shader_composer,
            )?;
            grid = Some(GridScene {
                driver: GridDriver::new(params),
                renderer,
                depth_view,
                normal_view,
                ssao,
                composite,
                instances: Vec::new(),
            });
        }

        if let Some(mut params) = descriptor.weave.clone() {
            // The animation options override the descriptor's regeneration
            // tuning so presets can slow the flicker down.
            params.regen_interval = options.animation.regen_interval.max(1);
            params.spread_range =
                (options.animation.spread_min, options.animation.spread_max);

            let shape = ShapeKind::TorusKnot;
            let renderer = SlicesRenderer::new(
                &context,
                &camera_controller.layout,
                &shape.mesh(),
                params.lines,
                params.slices,
                &mut shader_composer,
            )?;
            let channels =
                ChannelCompositor::new(&context, &mut shader_composer)?;

            let mut scene = WeaveScene {
                renderer,
                channels,
                params,
                shape,
                rng: rand::rng(),
                spread: 0.0,
                frames_since_regen: 0,
            };
            scene.regenerate(&context.queue);
            weave = Some(scene);
        }

        Ok(Self {
            context,
            camera_controller,
            clock: LoopClock::new(),
            frame_timing: FrameTiming::new(options.animation.target_fps),
            // Presets may retime the loop; the descriptor carries the
            // demo's stock duration.
            loop_duration_ms: if options.animation.loop_duration_ms > 0.0 {
                options.animation.loop_duration_ms
            } else {
                descriptor.loop_duration_ms
            },
            descriptor,
            grid,
            weave,
        })
    }

    /// Which demo this engine is running.
    pub fn kind(&self) -> DemoKind {
        self.descriptor.kind
    }

    /// Toggle the animation clock between running and paused.
    pub fn toggle_pause(&mut self) {
        self.clock.toggle();
        log::info!(
            "animation {}",
            if self.clock.is_running() {
                "resumed"
            } else {
                "paused"
            }
        );
    }

    /// Whether the animation clock is advancing.
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Cycle the weave demo's mesh to the next shape. No-op for the cube
    /// demos.
    pub fn randomize_geometry(&mut self) {
        if let Some(scene) = &mut self.weave {
            scene.shape = scene.shape.next();
            scene
                .renderer
                .set_mesh(&self.context.device, &scene.shape.mesh());
            log::info!("switched weave shape to {:?}", scene.shape);
        }
    }

    /// Smoothed frames-per-second estimate.
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Reconfigure the surface and every size-dependent pass.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.camera_controller
            .resize(self.context.config.width, self.context.config.height);

        if let Some(scene) = &mut self.grid {
            let (_, depth_view) = create_depth_texture(&self.context);
            let (_, normal_view) = create_normal_texture(&self.context);
            // set_geometry_views rebuilds the SSAO bind group even when
            // the render size is unchanged (surface-lost recovery goes
            // through here with the current dimensions)
            scene.ssao.set_geometry_views(
                &self.context,
                depth_view.clone(),
                normal_view.clone(),
            );
            scene.depth_view = depth_view;
            scene.normal_view = normal_view;
            scene.ssao.resize(&self.context);
            scene.composite.resize(&self.context);
            scene
                .composite
                .set_ssao_view(&self.context, scene.ssao.output_view());
        }
        if let Some(scene) = &mut self.weave {
            scene.channels.resize(&self.context);
        }
    }

    /// Advance the animation and render one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the swapchain needs
    /// reconfiguration (the caller resizes and retries next frame).
    pub fn render(&mut self, dt_ms: f64) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }
        self.clock.advance(dt_ms);
        self.camera_controller.update_gpu(&self.context.queue);

        let frame = self.context.get_next_frame()?;
        let frame_view = frame.texture.create_view(&Default::default());
        let mut encoder = self.context.create_encoder();

        let loop_time = self.clock.loop_time(self.loop_duration_ms);
        let time_ms = self.clock.time_ms();

        if let Some(scene) = &mut self.grid {
            Self::render_grid(
                &self.context,
                &self.camera_controller,
                &self.descriptor,
                scene,
                &mut encoder,
                &frame_view,
                loop_time,
                time_ms,
            );
        }
        if let Some(scene) = &mut self.weave {
            Self::render_weave(
                &self.context,
                &self.camera_controller,
                &self.descriptor,
                scene,
                &mut encoder,
                &frame_view,
                time_ms,
                self.clock.is_running(),
            );
        }

        self.context.submit(encoder);
        frame.present();
        self.frame_timing.end_frame();
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn render_grid(
        context: &RenderContext,
        camera: &CameraController,
        descriptor: &DemoDescriptor,
        scene: &mut GridScene,
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
        loop_time: f32,
        time_ms: f64,
    ) {
        scene.driver.update(loop_time);
        let outer = scene.driver.scene_rotation(time_ms)
            * scene.driver.group_transform(loop_time);

        scene.instances.clear();
        for state in scene.driver.states() {
            if !state.visible || state.scale <= 0.0 {
                continue;
            }
            let model = outer * GridDriver::element_transform(state);
            scene.instances.push(CubeInstance {
                model: model.to_cols_array_2d(),
            });
        }
        scene
            .renderer
            .update_instances(&context.queue, &scene.instances);
        scene.ssao.update_matrices(&context.queue, &camera.camera);

        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Geometry Pass"),
                    color_attachments: &[
                        Some(wgpu::RenderPassColorAttachment {
                            view: scene.composite.color_view(),
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    descriptor.clear_color,
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        }),
                        Some(wgpu::RenderPassColorAttachment {
                            view: &scene.normal_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    wgpu::Color::TRANSPARENT,
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        }),
                    ],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &scene.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            scene.renderer.draw(&mut pass, &camera.bind_group);
        }

        scene.ssao.render(encoder);
        scene.composite.set_output_view(frame_view.clone());
        scene.composite.render(encoder);
    }

    #[allow(clippy::too_many_arguments)]
    fn render_weave(
        context: &RenderContext,
        camera: &CameraController,
        descriptor: &DemoDescriptor,
        scene: &mut WeaveScene,
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
        time_ms: f64,
        running: bool,
    ) {
        // Tables only reshuffle while the animation runs, so pausing
        // freezes the slicing along with the motion.
        if running {
            scene.frames_since_regen += 1;
            if scene.frames_since_regen >= scene.params.regen_interval {
                scene.regenerate(&context.queue);
            }
        }

        let spin = scene.params.spin_speed * time_ms as f32;
        let model = Mat4::from_euler(
            glam::EulerRot::XYZ,
            spin / 1000.0,
            spin / 1100.0,
            spin / 900.0,
        );
        for (channel, mask) in CHANNEL_MASKS.iter().enumerate() {
            scene.renderer.update_params(
                &context.queue,
                channel,
                model,
                *mask,
                scene.spread,
            );
        }

        // Each channel clears to a third of the background so the additive
        // combine reconstructs it where no geometry landed.
        let third = wgpu::Color {
            r: descriptor.clear_color.r / 3.0,
            g: descriptor.clear_color.g / 3.0,
            b: descriptor.clear_color.b / 3.0,
            a: 1.0,
        };
        for channel in 0..CHANNELS {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Channel Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: scene.channels.channel_view(channel),
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(third),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: scene.channels.depth_view(),
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            scene
                .renderer
                .draw(&mut pass, &camera.bind_group, channel);
        }

        scene.channels.set_output_view(frame_view.clone());
        scene.channels.render(encoder);
    }
}

impl WeaveScene {
    /// Reshuffle the per-channel offset tables, group displacement
    /// directions, and spread magnitude.
    fn regenerate(&mut self, queue: &wgpu::Queue) {
        for channel in 0..CHANNELS {
            let table = OffsetTable::generate(
                &mut self.rng,
                self.params.lines as usize,
                self.params.slices,
            );
            self.renderer.upload_table(queue, channel, &table);
        }
        let vectors = VectorTable::generate(&mut self.rng, self.params.slices);
        self.renderer.upload_vectors(queue, &vectors);
        self.spread = random_spread(&mut self.rng, self.params.spread_range);
        self.frames_since_regen = 0;
    }
}
