use clap::Args;

use crate::color::Palette;
use crate::error::ViewerError;
use crate::fractal::types::{
    default_scale, max_scale, DEFAULT_CENTER_X, DEFAULT_CENTER_Y, DEFAULT_COLOR_REPEAT,
    DEFAULT_ITERATIONS, MAX_COLOR_REPEAT, MAX_ITERATIONS, MIN_ITERATIONS, MIN_SCALE,
};
use crate::fractal::FractalParams;

/// Options de vue communes au viewer et à l'outil CLI.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Largeur (fenêtre en points, ou image en pixels pour la CLI)
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Hauteur (fenêtre en points, ou image en pixels pour la CLI)
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Centre X du plan complexe
    #[arg(long, default_value_t = DEFAULT_CENTER_X, allow_negative_numbers = true)]
    pub center_x: f64,

    /// Centre Y du plan complexe
    #[arg(long, default_value_t = DEFAULT_CENTER_Y, allow_negative_numbers = true)]
    pub center_y: f64,

    /// Zoom relatif au cadrage par défaut (1 = ensemble entier visible)
    #[arg(long, default_value_t = 1.0)]
    pub zoom: f64,

    /// Nombre maximal d'itérations
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: u32,

    /// Palette de couleurs (0=Plasma, 1=Fire, 2=Ocean, 3=Grayscale)
    #[arg(long, default_value_t = 0)]
    pub palette: u8,

    /// Répétitions du gradient de couleur (1-60)
    #[arg(long, default_value_t = DEFAULT_COLOR_REPEAT)]
    pub color_repeat: u32,
}

impl ViewArgs {
    /// Construit les paramètres de vue pour `width` x `height` pixels.
    pub fn to_params(&self) -> Result<FractalParams, ViewerError> {
        if self.width == 0 || self.height == 0 {
            return Err(ViewerError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(ViewerError::InvalidArgument(format!(
                "zoom doit être > 0 (reçu {})",
                self.zoom
            )));
        }
        if !self.center_x.is_finite() || !self.center_y.is_finite() {
            return Err(ViewerError::InvalidArgument("centre non fini".to_string()));
        }
        let palette = Palette::from_index(self.palette).ok_or_else(|| {
            ViewerError::InvalidArgument(format!(
                "palette {} inconnue (0 à {})",
                self.palette,
                Palette::ALL.len() - 1
            ))
        })?;

        let mut params = FractalParams::new(self.width, self.height);
        params.center_x = self.center_x;
        params.center_y = self.center_y;
        params.scale = (default_scale(self.width, self.height) / self.zoom)
            .clamp(MIN_SCALE, max_scale(self.width, self.height));
        params.iteration_max = self.iterations.clamp(MIN_ITERATIONS, MAX_ITERATIONS);
        params.palette = palette;
        params.color_repeat = self.color_repeat.clamp(1, MAX_COLOR_REPEAT);
        Ok(params)
    }
}
