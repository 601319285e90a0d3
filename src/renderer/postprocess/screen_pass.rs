use crate::gpu::render_context::RenderContext;

/// A full-screen pass that owns its targets and can follow window resizes.
pub trait ScreenPass {
    /// Record this pass's render work into the encoder.
    fn render(&self, encoder: &mut wgpu::CommandEncoder);

    /// Recreate size-dependent resources for the context's current render
    /// resolution.
    fn resize(&mut self, context: &RenderContext);
}
