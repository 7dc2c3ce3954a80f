use num_complex::Complex64;

use crate::color::Palette;

/// Nombre d'itérations au démarrage.
pub const DEFAULT_ITERATIONS: u32 = 256;
pub const MIN_ITERATIONS: u32 = 16;
pub const MAX_ITERATIONS: u32 = 65536;

/// Rayon d'échappement |z| (identique dans le shader).
pub const DEFAULT_BAILOUT: f64 = 4.0;

/// Bornes de l'échelle (unités du plan complexe par pixel physique).
/// En dessous de MIN_SCALE les f64 ne distinguent plus deux pixels voisins.
pub const MIN_SCALE: f64 = 1e-15;
pub const MAX_SCALE: f64 = 0.1;

/// Répétitions du gradient par défaut.
pub const DEFAULT_COLOR_REPEAT: u32 = 4;
pub const MAX_COLOR_REPEAT: u32 = 60;

/// Domaine affiché par défaut: Re [-2.5, 1.0], Im [-1.25, 1.25].
pub const DEFAULT_CENTER_X: f64 = -0.75;
pub const DEFAULT_CENTER_Y: f64 = 0.0;
pub const DEFAULT_SPAN_X: f64 = 3.5;
pub const DEFAULT_SPAN_Y: f64 = 2.5;

/// Paramètres de vue partagés par le shader, le rendu CPU et l'export PNG.
///
/// La vue est décrite par son centre et une échelle uniforme en unités complexes
/// par pixel: un redimensionnement ne peut donc jamais déformer l'image.
/// L'axe imaginaire pointe vers le haut, l'axe Y écran vers le bas.
#[derive(Clone, Debug, PartialEq)]
pub struct FractalParams {
    /// Largeur du framebuffer en pixels physiques.
    pub width: u32,
    /// Hauteur du framebuffer en pixels physiques.
    pub height: u32,

    pub center_x: f64,
    pub center_y: f64,
    /// Unités du plan complexe par pixel.
    pub scale: f64,

    pub iteration_max: u32,
    pub bailout: f64,

    pub palette: Palette,
    /// Nombre de répétitions du gradient sur `iteration_max` itérations.
    pub color_repeat: u32,
}

impl FractalParams {
    /// Vue par défaut, cadrée pour contenir tout l'ensemble quel que soit le ratio.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            center_x: DEFAULT_CENTER_X,
            center_y: DEFAULT_CENTER_Y,
            scale: default_scale(width, height),
            iteration_max: DEFAULT_ITERATIONS,
            bailout: DEFAULT_BAILOUT,
            palette: Palette::default(),
            color_repeat: DEFAULT_COLOR_REPEAT,
        }
    }

    /// Bornes (xmin, xmax, ymin, ymax) de la région visible.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let half_w = self.width as f64 * self.scale / 2.0;
        let half_h = self.height as f64 * self.scale / 2.0;
        (
            self.center_x - half_w,
            self.center_x + half_w,
            self.center_y - half_h,
            self.center_y + half_h,
        )
    }

    /// Facteur de zoom relatif au cadrage initial (1.0 au démarrage).
    pub fn zoom_level(&self) -> f64 {
        default_scale(self.width, self.height) / self.scale
    }

    pub fn center(&self) -> Complex64 {
        Complex64::new(self.center_x, self.center_y)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Échelle qui fait tenir le domaine par défaut dans `width` x `height` pixels.
pub fn default_scale(width: u32, height: u32) -> f64 {
    let sx = DEFAULT_SPAN_X / width.max(1) as f64;
    let sy = DEFAULT_SPAN_Y / height.max(1) as f64;
    sx.max(sy)
}

/// Échelle maximale pour une vue `width` x `height`: jamais plus serrée que le
/// cadrage par défaut, sinon un petit viewport ne pourrait pas dézoomer.
pub fn max_scale(width: u32, height: u32) -> f64 {
    MAX_SCALE.max(default_scale(width, height))
}

/// Résultat d'une itération escape-time pour un point.
#[derive(Clone, Copy, Debug)]
pub struct FractalResult {
    pub iteration: u32,
    pub z: Complex64,
}
