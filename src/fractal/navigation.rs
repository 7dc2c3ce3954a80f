//! Transformations de navigation: glisser, zoomer autour du curseur, redimensionner.
//!
//! Toutes les positions écran sont en pixels physiques, origine en haut à gauche.
//! Une position continue `(px, py)` correspond au point complexe
//! `center + ((px - w/2) * scale, -(py - h/2) * scale)`; le centre du pixel `(x, y)`
//! est donc `(x + 0.5, y + 0.5)`, comme `@builtin(position)` dans le shader.

use num_complex::Complex64;

use super::types::{
    default_scale, max_scale, FractalParams, DEFAULT_CENTER_X, DEFAULT_CENTER_Y,
    DEFAULT_ITERATIONS, MAX_ITERATIONS, MIN_ITERATIONS, MIN_SCALE,
};

/// Sensibilité de la molette: un cran (~50 points) zoome d'environ 1.28x.
const SCROLL_ZOOM_SENSITIVITY: f64 = 0.005;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IterationStep {
    Increase,
    Decrease,
}

/// Point complexe situé sous la position écran `(px, py)`.
pub fn pixel_to_complex(params: &FractalParams, px: f64, py: f64) -> Complex64 {
    let half_w = params.width as f64 / 2.0;
    let half_h = params.height as f64 / 2.0;
    Complex64::new(
        params.center_x + (px - half_w) * params.scale,
        params.center_y - (py - half_h) * params.scale,
    )
}

/// Déplace la vue de `(dx, dy)` pixels: le contenu suit le pointeur.
pub fn pan(params: &mut FractalParams, dx: f64, dy: f64) {
    if !dx.is_finite() || !dy.is_finite() {
        return;
    }
    params.center_x -= dx * params.scale;
    params.center_y += dy * params.scale;
}

/// Zoome d'un facteur `factor` (> 1 = zoom avant) en gardant fixe le point
/// complexe sous `(px, py)`.
///
/// Retourne le facteur réellement appliqué après bornage de l'échelle.
pub fn zoom_at(params: &mut FractalParams, px: f64, py: f64, factor: f64) -> f64 {
    zoom_at_limited(params, px, py, factor, MIN_SCALE)
}

/// Comme `zoom_at`, avec une échelle minimale propre au moteur de rendu
/// (le shader f32 ne peut pas descendre jusqu'à `MIN_SCALE`).
///
/// Le bornage ne fait jamais aller l'échelle dans le sens opposé à `factor`:
/// si la vue est déjà hors bornes, un zoom vers l'extérieur de celles-ci est sans effet.
pub fn zoom_at_limited(
    params: &mut FractalParams,
    px: f64,
    py: f64,
    factor: f64,
    min_scale: f64,
) -> f64 {
    if !factor.is_finite() || factor <= 0.0 || !px.is_finite() || !py.is_finite() {
        return 1.0;
    }

    let upper = max_scale(params.width, params.height);
    let lower = min_scale.clamp(MIN_SCALE, upper);
    let mut new_scale = (params.scale / factor).clamp(lower, upper);
    if (factor > 1.0 && new_scale > params.scale) || (factor < 1.0 && new_scale < params.scale) {
        new_scale = params.scale;
    }
    let applied = params.scale / new_scale;

    let anchor = pixel_to_complex(params, px, py);
    // On résout le centre pour que pixel_to_complex(px, py) == anchor avec la nouvelle échelle.
    let half_w = params.width as f64 / 2.0;
    let half_h = params.height as f64 / 2.0;
    params.scale = new_scale;
    params.center_x = anchor.re - (px - half_w) * new_scale;
    params.center_y = anchor.im + (py - half_h) * new_scale;

    applied
}

/// Convertit un défilement vertical (en points egui) en facteur de zoom.
/// Molette vers le haut (delta positif) = zoom avant.
pub fn zoom_factor_for_scroll(delta: f32) -> f64 {
    if !delta.is_finite() {
        return 1.0;
    }
    (delta as f64 * SCROLL_ZOOM_SENSITIVITY).exp()
}

/// Nouvelle taille de framebuffer. Le centre et l'échelle sont conservés:
/// agrandir la fenêtre dévoile plus de plan complexe sans déformer.
pub fn resize(params: &mut FractalParams, width: u32, height: u32) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    if width == params.width && height == params.height {
        return false;
    }
    params.width = width;
    params.height = height;
    true
}

/// Double ou divise par deux le nombre d'itérations, borné.
/// Retourne `true` si la valeur a changé.
pub fn adjust_iterations(params: &mut FractalParams, step: IterationStep) -> bool {
    let old = params.iteration_max;
    let new = match step {
        IterationStep::Increase => old.saturating_mul(2),
        IterationStep::Decrease => old / 2,
    }
    .clamp(MIN_ITERATIONS, MAX_ITERATIONS);
    params.iteration_max = new;
    new != old
}

/// Revient au cadrage initial en gardant taille et colorisation.
pub fn reset(params: &mut FractalParams) {
    params.center_x = DEFAULT_CENTER_X;
    params.center_y = DEFAULT_CENTER_Y;
    params.scale = default_scale(params.width, params.height);
    params.iteration_max = DEFAULT_ITERATIONS;
}
