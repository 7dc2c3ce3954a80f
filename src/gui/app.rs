use std::time::Instant;

use eframe::egui_wgpu;
use egui::{Context, Key, PointerButton, Sense, TextureHandle, TextureOptions};

use crate::error::ViewerError;
use crate::fractal::navigation::{self, IterationStep};
use crate::fractal::types::{default_scale, max_scale, MAX_COLOR_REPEAT, MIN_SCALE};
use crate::fractal::FractalParams;
use crate::gpu::{self, GpuUniforms, MandelbrotCallback};
use crate::gui::texture::rgb_image_to_color_image;
use crate::io::png::{save_png, screenshot_path};
use crate::render::{colorize, render_escape_time};

/// Options de démarrage issues de la ligne de commande.
#[derive(Clone, Debug)]
pub struct ViewerOptions {
    /// Vue initiale (centre, itérations, palette...). La taille est recalculée à la première frame.
    pub params: FractalParams,
    /// Zoom initial relatif au cadrage par défaut.
    pub zoom: f64,
    /// Source WGSL remplaçant le shader embarqué.
    pub shader_source: Option<String>,
}

/// Actions clavier, lues une fois par frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyAction {
    MoreIterations,
    FewerIterations,
    NextPalette,
    CycleColorRepeat,
    ResetView,
    Screenshot,
    Quit,
}

const KEY_BINDINGS: [(Key, KeyAction); 11] = [
    (Key::ArrowUp, KeyAction::MoreIterations),
    (Key::Plus, KeyAction::MoreIterations),
    (Key::Equals, KeyAction::MoreIterations),
    (Key::ArrowDown, KeyAction::FewerIterations),
    (Key::Minus, KeyAction::FewerIterations),
    (Key::C, KeyAction::NextPalette),
    (Key::R, KeyAction::CycleColorRepeat),
    (Key::Home, KeyAction::ResetView),
    (Key::Backspace, KeyAction::ResetView),
    (Key::S, KeyAction::Screenshot),
    (Key::Escape, KeyAction::Quit),
];

/// Applique une action clavier qui modifie la vue. Retourne `true` si la vue a changé.
fn apply_view_action(params: &mut FractalParams, action: KeyAction) -> bool {
    match action {
        KeyAction::MoreIterations => navigation::adjust_iterations(params, IterationStep::Increase),
        KeyAction::FewerIterations => navigation::adjust_iterations(params, IterationStep::Decrease),
        KeyAction::NextPalette => {
            params.palette = params.palette.next();
            true
        }
        KeyAction::CycleColorRepeat => {
            params.color_repeat = if params.color_repeat >= MAX_COLOR_REPEAT {
                1
            } else {
                params.color_repeat + 1
            };
            true
        }
        KeyAction::ResetView => {
            navigation::reset(params);
            true
        }
        KeyAction::Screenshot | KeyAction::Quit => false,
    }
}

/// Entrées de la zone de rendu pour une frame, en points egui.
#[derive(Clone, Copy, Debug)]
struct ViewInput {
    rect: egui::Rect,
    pixels_per_point: f32,
    /// Déplacement du bouton principal pendant un glisser.
    drag_delta: Option<egui::Vec2>,
    hover_pos: Option<egui::Pos2>,
    scroll: f32,
    pinch: f32,
}

/// Met la vue à jour pour une frame: taille, zoom initial, glisser puis molette.
///
/// Les positions egui sont converties en pixels physiques relatifs au coin de
/// la zone, le repère de `navigation`. `min_scale` borne le zoom avant selon le
/// moteur de rendu. Retourne `false` tant que la zone n'a pas de taille.
fn update_view<F>(
    params: &mut FractalParams,
    pending_zoom: &mut Option<f64>,
    input: &ViewInput,
    min_scale: F,
) -> bool
where
    F: Fn(&FractalParams) -> f64,
{
    let ppp = input.pixels_per_point;
    let width = (input.rect.width() * ppp).round() as u32;
    let height = (input.rect.height() * ppp).round() as u32;
    if width == 0 || height == 0 {
        return false;
    }
    if navigation::resize(params, width, height) {
        log::debug!("zone de rendu: {width}x{height} px");
    }
    if let Some(zoom) = pending_zoom.take() {
        let upper = max_scale(width, height);
        let lower = min_scale(params).min(upper);
        params.scale = (default_scale(width, height) / zoom).clamp(lower, upper);
    }

    if let Some(delta) = input.drag_delta {
        navigation::pan(params, (delta.x * ppp) as f64, (delta.y * ppp) as f64);
    }

    if let Some(pos) = input.hover_pos {
        let factor = navigation::zoom_factor_for_scroll(input.scroll) * input.pinch as f64;
        if factor != 1.0 {
            let local = (pos - input.rect.min) * ppp;
            let lower = min_scale(params);
            navigation::zoom_at_limited(params, local.x as f64, local.y as f64, factor, lower);
        }
    }

    true
}

/// Chemin de rendu effectif.
enum Backend {
    /// Fragment shader via paint callback; le pipeline vit dans les callback_resources.
    Gpu { srgb_target: bool },
    /// Repli: rendu rayon puis texture egui, refait seulement quand la vue change.
    Cpu {
        texture: Option<TextureHandle>,
        rendered: Option<FractalParams>,
        last_render_time: Option<f64>,
    },
}

impl Backend {
    fn cpu() -> Self {
        Backend::Cpu {
            texture: None,
            rendered: None,
            last_render_time: None,
        }
    }

    /// Échelle minimale que ce chemin rend fidèlement.
    fn min_scale(&self, params: &FractalParams) -> f64 {
        match self {
            Backend::Gpu { .. } => gpu::shader_min_scale(params),
            Backend::Cpu { .. } => MIN_SCALE,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Backend::Gpu { .. } => "GPU (wgpu)",
            Backend::Cpu { .. } => "CPU (rayon)",
        }
    }
}

/// Application egui: une seule boucle événements + rendu, cadencée par la vsync.
pub struct MandelviewApp {
    params: FractalParams,
    backend: Backend,
    /// Zoom initial à appliquer dès que la taille réelle de la zone est connue.
    pending_zoom: Option<f64>,
}

impl MandelviewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: ViewerOptions) -> Self {
        let backend = match cc.wgpu_render_state.as_ref() {
            Some(render_state) => match gpu::build_pipeline(
                &render_state.device,
                render_state.target_format,
                options.shader_source.as_deref(),
            ) {
                Ok(pipeline) => {
                    let srgb_target = pipeline.srgb_target();
                    render_state
                        .renderer
                        .write()
                        .callback_resources
                        .insert(pipeline);
                    Backend::Gpu { srgb_target }
                }
                Err(err) => {
                    log::error!("{err}: passage au rendu CPU");
                    Backend::cpu()
                }
            },
            None => {
                log::warn!("{}: passage au rendu CPU", ViewerError::NoRenderState);
                Backend::cpu()
            }
        };

        log::info!("rendu: {}", backend.label());

        Self {
            params: options.params,
            backend,
            pending_zoom: Some(options.zoom),
        }
    }

    fn handle_keys(&mut self, ctx: &Context) {
        // Lecture sous le verrou de l'InputState, traitement après.
        let actions: Vec<KeyAction> = ctx.input(|i| {
            KEY_BINDINGS
                .iter()
                .filter(|(key, _)| i.key_pressed(*key))
                .map(|(_, action)| *action)
                .collect()
        });

        for action in actions {
            match action {
                KeyAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                KeyAction::Screenshot => self.save_screenshot(),
                _ => {
                    if apply_view_action(&mut self.params, action) {
                        log::debug!(
                            "{action:?}: iterations={} palette={} repeat={}",
                            self.params.iteration_max,
                            self.params.palette.name(),
                            self.params.color_repeat
                        );
                    }
                }
            }
        }
    }

    fn save_screenshot(&self) {
        let path = screenshot_path();
        if let Err(err) = save_png(&self.params, &path) {
            log::error!("export PNG: {err}");
        }
    }

    /// Zone de rendu: synchronise la taille, gère glisser/molette, puis dessine.
    fn fractal_view(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());
        let ppp = ui.ctx().pixels_per_point();

        let dragging = response.dragged_by(PointerButton::Primary);
        let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
        let input = ViewInput {
            rect,
            pixels_per_point: ppp,
            drag_delta: dragging.then(|| response.drag_delta()),
            hover_pos: response.hover_pos(),
            scroll,
            pinch,
        };
        let backend = &self.backend;
        if !update_view(&mut self.params, &mut self.pending_zoom, &input, |p| {
            backend.min_scale(p)
        }) {
            return;
        }
        if dragging {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        }

        match &mut self.backend {
            Backend::Gpu { srgb_target } => {
                let origin = [(rect.min.x * ppp).round(), (rect.min.y * ppp).round()];
                let uniforms = GpuUniforms::new(&self.params, origin, *srgb_target);
                ui.painter().add(egui_wgpu::Callback::new_paint_callback(
                    rect,
                    MandelbrotCallback::new(uniforms),
                ));
            }
            Backend::Cpu {
                texture,
                rendered,
                last_render_time,
            } => {
                if rendered.as_ref() != Some(&self.params) || texture.is_none() {
                    let start = Instant::now();
                    let (iterations, zs) = render_escape_time(&self.params);
                    if let Some(img) = colorize(&self.params, &iterations, &zs) {
                        *texture = Some(ui.ctx().load_texture(
                            "mandelbrot",
                            rgb_image_to_color_image(&img),
                            TextureOptions::NEAREST,
                        ));
                        *rendered = Some(self.params.clone());
                        *last_render_time = Some(start.elapsed().as_secs_f64());
                    }
                }
                if let Some(texture) = texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter()
                        .image(texture.id(), rect, uv, egui::Color32::WHITE);
                }
            }
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!("Iterations: {}", self.params.iteration_max));
            ui.separator();
            ui.label(format!("Palette: {}", self.params.palette.name()));
            ui.separator();
            ui.label(format!("Color Repeat: {}", self.params.color_repeat));
            ui.separator();
            ui.label(format!("Zoom: {:.3e}x", self.params.zoom_level()));
            ui.separator();
            let center = self.params.center();
            ui.label(format!("Centre: ({:.10}, {:.10})", center.re, center.im));
            ui.separator();
            ui.label(self.backend.label());
            if matches!(self.backend, Backend::Gpu { .. })
                && self.params.scale <= self.backend.min_scale(&self.params) * (1.0 + 1e-9)
            {
                ui.separator();
                ui.label("Limite de précision f32 atteinte");
            }
            if let Backend::Cpu {
                last_render_time: Some(time),
                ..
            } = &self.backend
            {
                ui.separator();
                ui.label(format!("Temps: {:.3}s", time));
            }
        });
    }
}

impl eframe::App for MandelviewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.fractal_view(ui));

        // Pas de request_repaint permanent: egui redessine sur événement d'entrée.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::fractal::types::{DEFAULT_ITERATIONS, MAX_ITERATIONS};

    #[test]
    fn key_bindings_are_unique() {
        for (i, (key, _)) in KEY_BINDINGS.iter().enumerate() {
            assert!(
                KEY_BINDINGS[i + 1..].iter().all(|(other, _)| other != key),
                "{key:?} liée deux fois"
            );
        }
    }

    #[test]
    fn iteration_keys_double_and_halve() {
        let mut params = FractalParams::new(100, 100);
        assert!(apply_view_action(&mut params, KeyAction::MoreIterations));
        assert_eq!(params.iteration_max, DEFAULT_ITERATIONS * 2);
        assert!(apply_view_action(&mut params, KeyAction::FewerIterations));
        assert_eq!(params.iteration_max, DEFAULT_ITERATIONS);

        params.iteration_max = MAX_ITERATIONS;
        assert!(!apply_view_action(&mut params, KeyAction::MoreIterations));
    }

    #[test]
    fn palette_and_repeat_cycle() {
        let mut params = FractalParams::new(100, 100);
        apply_view_action(&mut params, KeyAction::NextPalette);
        assert_eq!(params.palette, Palette::Fire);

        params.color_repeat = MAX_COLOR_REPEAT;
        apply_view_action(&mut params, KeyAction::CycleColorRepeat);
        assert_eq!(params.color_repeat, 1);
        apply_view_action(&mut params, KeyAction::CycleColorRepeat);
        assert_eq!(params.color_repeat, 2);
    }

    #[test]
    fn reset_key_restores_default_framing() {
        let mut params = FractalParams::new(640, 480);
        navigation::zoom_at(&mut params, 3.0, 3.0, 50.0);
        assert!(apply_view_action(&mut params, KeyAction::ResetView));
        assert_eq!(params.scale, FractalParams::new(640, 480).scale);
    }

    fn frame_input(rect: egui::Rect, ppp: f32) -> ViewInput {
        ViewInput {
            rect,
            pixels_per_point: ppp,
            drag_delta: None,
            hover_pos: None,
            scroll: 0.0,
            pinch: 1.0,
        }
    }

    fn view_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(400.0, 300.0))
    }

    #[test]
    fn initial_zoom_applies_once_on_first_sized_frame() {
        let mut params = FractalParams::new(1, 1);
        let mut pending = Some(4.0);

        let empty = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(0.0, 300.0));
        assert!(!update_view(&mut params, &mut pending, &frame_input(empty, 2.0), |_| MIN_SCALE));
        assert_eq!(pending, Some(4.0));

        let input = frame_input(view_rect(), 2.0);
        assert!(update_view(&mut params, &mut pending, &input, |_| MIN_SCALE));
        assert_eq!((params.width, params.height), (800, 600));
        assert!((params.zoom_level() - 4.0).abs() < 1e-9);
        assert_eq!(pending, None);

        let scale = params.scale;
        assert!(update_view(&mut params, &mut pending, &input, |_| MIN_SCALE));
        assert_eq!(params.scale, scale);
    }

    #[test]
    fn initial_zoom_out_on_small_view_frames_whole_set() {
        let mut params = FractalParams::new(1, 1);
        let mut pending = Some(1.0);
        let tiny = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(30.0, 20.0));
        assert!(update_view(&mut params, &mut pending, &frame_input(tiny, 1.0), |_| MIN_SCALE));
        assert_eq!(params.scale, default_scale(30, 20));
    }

    #[test]
    fn drag_moves_grabbed_point_in_physical_pixels() {
        let mut params = FractalParams::new(1, 1);
        let mut pending = None;
        let mut input = frame_input(view_rect(), 2.0);
        update_view(&mut params, &mut pending, &input, |_| MIN_SCALE);

        let grabbed = navigation::pixel_to_complex(&params, 100.0, 100.0);
        input.drag_delta = Some(egui::vec2(5.0, -3.0));
        update_view(&mut params, &mut pending, &input, |_| MIN_SCALE);
        let under_pointer = navigation::pixel_to_complex(&params, 110.0, 94.0);
        assert!((grabbed - under_pointer).norm() < 1e-12);
    }

    #[test]
    fn scroll_zooms_around_hovered_point() {
        let mut params = FractalParams::new(1, 1);
        let mut pending = None;
        let mut input = frame_input(view_rect(), 2.0);
        update_view(&mut params, &mut pending, &input, |_| MIN_SCALE);

        // (110, 70) points dans une zone qui commence en (10, 20): (200, 100) pixels locaux.
        let hovered = navigation::pixel_to_complex(&params, 200.0, 100.0);
        let scale = params.scale;
        input.hover_pos = Some(egui::pos2(110.0, 70.0));
        input.scroll = 100.0;
        update_view(&mut params, &mut pending, &input, |_| MIN_SCALE);

        assert!(params.scale < scale);
        let after = navigation::pixel_to_complex(&params, 200.0, 100.0);
        assert!((hovered - after).norm() < 1e-12);
    }

    #[test]
    fn scroll_zoom_stops_at_backend_minimum() {
        let mut params = FractalParams::new(1, 1);
        let mut pending = None;
        let mut input = frame_input(view_rect(), 1.0);
        input.hover_pos = Some(egui::pos2(60.0, 60.0));
        input.scroll = 1e5;
        update_view(&mut params, &mut pending, &input, |_| 1e-6);
        assert_eq!(params.scale, 1e-6);

        let mut pending = Some(1e12);
        let mut params = FractalParams::new(1, 1);
        update_view(&mut params, &mut pending, &frame_input(view_rect(), 1.0), gpu::shader_min_scale);
        assert_eq!(params.scale, gpu::shader_min_scale(&params));
    }

    #[test]
    fn non_view_actions_do_not_touch_params() {
        let mut params = FractalParams::new(64, 64);
        let original = params.clone();
        assert!(!apply_view_action(&mut params, KeyAction::Screenshot));
        assert!(!apply_view_action(&mut params, KeyAction::Quit));
        assert_eq!(params, original);
    }
}
