//! naga_oil-based shader composition with `#import` support.

use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::CycloramaError;

/// Wraps [`Composer`] to provide shader composition with `#import` support.
///
/// Pre-loads all shared WGSL modules at construction time. Consuming shaders
/// use `#import cyclorama::module_name` to pull in shared code. The composer
/// produces `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path).
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

impl ShaderComposer {
    /// Build a composer with all shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`CycloramaError::ShaderCompose`] if a shared module fails to
    /// parse (a build defect, not a runtime condition).
    pub fn new() -> Result<Self, CycloramaError> {
        let mut composer = Composer::default();

        let modules: &[ModuleDef] = &[ModuleDef {
            source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
            file_path: "modules/fullscreen.wgsl",
        }];

        for m in modules {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    CycloramaError::ShaderCompose(format!(
                        "failed to register shader module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives) into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`CycloramaError::ShaderCompose`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, CycloramaError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu
    /// shader module. Useful for testing composition without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`CycloramaError::ShaderCompose`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, CycloramaError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                CycloramaError::ShaderCompose(format!(
                    "failed to compose shader '{file_path}': {e}"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shader source definitions for all composable shaders in the project.
    /// Each entry is (source, file_path).
    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (
                include_str!("../../assets/shaders/mesh/cube_grid.wgsl"),
                "cube_grid.wgsl",
            ),
            (
                include_str!("../../assets/shaders/mesh/slices.wgsl"),
                "slices.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/ssao.wgsl"),
                "ssao.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/ssao_blur.wgsl"),
                "ssao_blur.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/composite.wgsl"),
                "composite.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/combine.wgsl"),
                "combine.wgsl",
            ),
        ]
    }

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            composer.compose_naga(source, file_path).unwrap_or_else(|e| {
                panic!("shader '{file_path}' failed to compose: {e}")
            });
        }
    }
}
