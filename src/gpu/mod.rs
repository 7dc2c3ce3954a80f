//! Pipeline wgpu du fragment shader Mandelbrot.
//!
//! Le rendu se fait directement dans la passe egui via un paint callback
//! (voir `callback.rs`): aucun buffer de sortie ni readback, chaque frame ne fait
//! qu'écrire 48 octets d'uniforms puis dessiner un triangle plein écran.

mod callback;

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::error::ViewerError;
use crate::fractal::types::MIN_SCALE;
use crate::fractal::FractalParams;

pub use callback::MandelbrotCallback;

/// Source WGSL embarquée.
pub const BUILTIN_SHADER: &str = include_str!("mandelbrot.wgsl");

/// Bloc d'uniforms, même disposition que `struct Uniforms` dans le shader.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuUniforms {
    origin: [f32; 2],
    size: [f32; 2],
    center: [f32; 2],
    scale: f32,
    iter_max: u32,
    bailout: f32,
    palette: u32,
    color_repeat: f32,
    srgb_target: u32,
}

impl GpuUniforms {
    /// `origin` est le coin haut-gauche de la zone de dessin en pixels framebuffer.
    pub fn new(params: &FractalParams, origin: [f32; 2], srgb_target: bool) -> Self {
        Self {
            origin,
            size: [params.width as f32, params.height as f32],
            center: [params.center_x as f32, params.center_y as f32],
            scale: params.scale as f32,
            iter_max: params.iteration_max,
            bailout: params.bailout as f32,
            palette: params.palette.index() as u32,
            color_repeat: params.color_repeat as f32,
            srgb_target: srgb_target as u32,
        }
    }
}

/// Plus petite échelle que le shader f32 rend sans pixeliser autour de `params.center()`.
///
/// Le shader ajoute le décalage du pixel au centre en f32: deux pixels voisins
/// doivent rester séparés de plusieurs ulp de la plus grande coordonnée du centre.
pub fn shader_min_scale(params: &FractalParams) -> f64 {
    let magnitude = params.center_x.abs().max(params.center_y.abs()).max(1.0);
    (F32_PIXEL_ULPS * f32::EPSILON as f64 * magnitude).max(MIN_SCALE)
}

/// Écart minimal entre deux pixels voisins, en ulp f32.
const F32_PIXEL_ULPS: f64 = 4.0;

/// Ressources GPU persistantes, stockées dans les `callback_resources` d'egui-wgpu.
pub struct MandelbrotPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    srgb_target: bool,
}

impl MandelbrotPipeline {
    /// Compile `source` et construit le pipeline pour `target_format`.
    ///
    /// La création se fait dans un error scope de validation: une erreur de
    /// compilation WGSL ou d'interface entre étages est renvoyée au lieu de
    /// paniquer dans le handler d'erreurs non capturées de wgpu.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        source: &str,
    ) -> Result<Self, ViewerError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mandelbrot-shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mandelbrot-uniforms"),
            size: std::mem::size_of::<GpuUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mandelbrot-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<GpuUniforms>() as u64),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mandelbrot-bind-group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mandelbrot-pipeline-layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mandelbrot-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ViewerError::ShaderCompilation(err.to_string()));
        }

        log::info!("pipeline Mandelbrot compilé (cible {target_format:?})");

        Ok(Self {
            pipeline,
            bind_group,
            uniform_buffer,
            srgb_target: target_format.is_srgb(),
        })
    }

    /// Indique au shader s'il doit linéariser ses couleurs.
    pub fn srgb_target(&self) -> bool {
        self.srgb_target
    }

    fn prepare(&self, queue: &wgpu::Queue, uniforms: &GpuUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    fn paint<'rp>(&'rp self, render_pass: &mut wgpu::RenderPass<'rp>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

/// Compile le shader utilisateur s'il est fourni, sinon (ou en cas d'échec) le shader embarqué.
///
/// Les diagnostics de compilation sont journalisés ligne par ligne.
pub fn build_pipeline(
    device: &wgpu::Device,
    target_format: wgpu::TextureFormat,
    custom_source: Option<&str>,
) -> Result<MandelbrotPipeline, ViewerError> {
    if let Some(source) = custom_source {
        match MandelbrotPipeline::new(device, target_format, source) {
            Ok(pipeline) => return Ok(pipeline),
            Err(err) => {
                log_diagnostics(&err);
                log::warn!("retour au shader embarqué");
            }
        }
    }
    MandelbrotPipeline::new(device, target_format, BUILTIN_SHADER).map_err(|err| {
        log_diagnostics(&err);
        err
    })
}

fn log_diagnostics(err: &ViewerError) {
    for line in err.to_string().lines() {
        log::error!("{line}");
    }
}
