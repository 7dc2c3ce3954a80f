use eframe::egui_wgpu;

use super::{GpuUniforms, MandelbrotPipeline};

/// Paint callback egui-wgpu: une instance par frame, porte les uniforms de la vue.
pub struct MandelbrotCallback {
    uniforms: GpuUniforms,
}

impl MandelbrotCallback {
    pub fn new(uniforms: GpuUniforms) -> Self {
        Self { uniforms }
    }
}

impl egui_wgpu::CallbackTrait for MandelbrotCallback {
    fn prepare(
        &self,
        _device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _egui_encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        if let Some(pipeline) = callback_resources.get::<MandelbrotPipeline>() {
            pipeline.prepare(queue, &self.uniforms);
        }
        Vec::new()
    }

    fn paint<'a>(
        &'a self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'a>,
        callback_resources: &'a egui_wgpu::CallbackResources,
    ) {
        // egui-wgpu a déjà réglé viewport et scissor sur le rectangle du callback.
        if let Some(pipeline) = callback_resources.get::<MandelbrotPipeline>() {
            pipeline.paint(render_pass);
        }
    }
}
