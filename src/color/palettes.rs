use num_complex::Complex64;

/// Palettes disponibles. L'indice est transmis tel quel au shader (`uniforms.palette`),
/// l'ordre doit donc rester celui de `STOPS` dans `mandelbrot.wgsl`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    #[default]
    Plasma = 0,
    Fire = 1,
    Ocean = 2,
    Grayscale = 3,
}

impl Palette {
    pub const ALL: [Palette; 4] = [Palette::Plasma, Palette::Fire, Palette::Ocean, Palette::Grayscale];

    pub fn from_index(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Plasma => "Plasma",
            Palette::Fire => "Fire",
            Palette::Ocean => "Ocean",
            Palette::Grayscale => "Grayscale",
        }
    }

    /// Palette suivante (cyclique), pour la touche C.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() as usize + 1) % Self::ALL.len()]
    }

    fn stops(self) -> &'static [GradientStop; 4] {
        match self {
            Palette::Plasma => &PLASMA_STOPS,
            Palette::Fire => &FIRE_STOPS,
            Palette::Ocean => &OCEAN_STOPS,
            Palette::Grayscale => &GRAYSCALE_STOPS,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct GradientStop {
    position: f64, // [0.0, 1.0]
    r: u8,
    g: u8,
    b: u8,
}

// Mêmes couleurs et positions que dans le shader.

const PLASMA_STOPS: [GradientStop; 4] = [
    GradientStop { position: 0.00, r: 13, g: 8, b: 135 },   // Deep Blue
    GradientStop { position: 0.33, r: 126, g: 3, b: 168 },  // Violet
    GradientStop { position: 0.66, r: 240, g: 87, b: 100 }, // Pink/Coral
    GradientStop { position: 1.00, r: 240, g: 230, b: 50 }, // Yellow/Orange
];

const FIRE_STOPS: [GradientStop; 4] = [
    GradientStop { position: 0.00, r: 0, g: 0, b: 0 },       // Black
    GradientStop { position: 0.33, r: 255, g: 0, b: 0 },     // Red
    GradientStop { position: 0.66, r: 255, g: 255, b: 0 },   // Yellow
    GradientStop { position: 1.00, r: 255, g: 255, b: 255 }, // White
];

const OCEAN_STOPS: [GradientStop; 4] = [
    GradientStop { position: 0.00, r: 0, g: 0, b: 0 },       // Black
    GradientStop { position: 0.33, r: 0, g: 0, b: 255 },     // Blue
    GradientStop { position: 0.66, r: 0, g: 255, b: 255 },   // Cyan
    GradientStop { position: 1.00, r: 255, g: 255, b: 255 }, // White
];

const GRAYSCALE_STOPS: [GradientStop; 4] = [
    GradientStop { position: 0.00, r: 0, g: 0, b: 0 },
    GradientStop { position: 0.33, r: 85, g: 85, b: 85 },
    GradientStop { position: 0.66, r: 170, g: 170, b: 170 },
    GradientStop { position: 1.00, r: 255, g: 255, b: 255 },
];

fn gradient_interpolate(stops: &[GradientStop], t: f64) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);

    let first = stops[0];
    if t <= first.position {
        return (first.r, first.g, first.b);
    }

    for w in stops.windows(2) {
        let (a, b) = (w[0], w[1]);
        if t <= b.position {
            let factor = (t - a.position) / (b.position - a.position);
            let lerp = |u: u8, v: u8| -> u8 {
                let (u, v) = (u as f64, v as f64);
                (u + factor * (v - u)).round().clamp(0.0, 255.0) as u8
            };
            return (lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b));
        }
    }

    let last = stops[stops.len() - 1];
    (last.r, last.g, last.b)
}

/// Itération continue: nu = n + 1 - log2(ln|z|).
///
/// Valable pour les points échappés (|z| >= bailout >= 2), borné à 0 sinon.
pub fn smooth_iteration(iteration: u32, z: Complex64) -> f64 {
    let mag = z.norm();
    if !mag.is_finite() || mag <= 1.0 {
        return iteration as f64;
    }
    let nu = iteration as f64 + 1.0 - mag.ln().log2();
    if nu.is_finite() {
        nu.max(0.0)
    } else {
        iteration as f64
    }
}

/// Couleur d'un pixel à partir de son nombre d'itérations et de son z final.
///
/// Les points de l'ensemble (iteration >= iter_max) sont noirs. Les autres
/// parcourent le gradient `color_repeat` fois sur `iter_max` itérations.
pub fn color_for_pixel(
    iteration: u32,
    z: Complex64,
    iter_max: u32,
    palette: Palette,
    color_repeat: u32,
) -> (u8, u8, u8) {
    if iteration >= iter_max {
        return (0, 0, 0);
    }
    let nu = smooth_iteration(iteration, z);
    let t = (nu * color_repeat.max(1) as f64 / iter_max.max(1) as f64).fract();
    gradient_interpolate(palette.stops(), t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_is_black() {
        for palette in Palette::ALL {
            let c = color_for_pixel(256, Complex64::new(0.1, 0.1), 256, palette, 4);
            assert_eq!(c, (0, 0, 0));
        }
    }

    #[test]
    fn gradient_endpoints() {
        assert_eq!(gradient_interpolate(&FIRE_STOPS, 0.0), (0, 0, 0));
        assert_eq!(gradient_interpolate(&FIRE_STOPS, 1.0), (255, 255, 255));
        assert_eq!(gradient_interpolate(&FIRE_STOPS, -3.0), (0, 0, 0));
        assert_eq!(gradient_interpolate(&FIRE_STOPS, 0.33), (255, 0, 0));
        let (r, g, b) = gradient_interpolate(&GRAYSCALE_STOPS, 0.5);
        assert!(r == g && g == b && r > 85 && r < 170);
    }

    #[test]
    fn smooth_iteration_is_continuous_at_bailout() {
        // Juste au-dessus du rayon 4: n + 1 - log2(ln 4) ~ n + 0.53
        let nu = smooth_iteration(10, Complex64::new(4.0, 0.0));
        assert!(nu > 10.0 && nu < 11.0, "nu = {nu}");
        // |z| = e^2 -> log2(2) = 1 -> nu = n
        let nu = smooth_iteration(10, Complex64::new(2.0_f64.exp(), 0.0));
        assert!((nu - 10.0).abs() < 1e-12);
    }

    #[test]
    fn smooth_iteration_handles_degenerate_z() {
        assert_eq!(smooth_iteration(5, Complex64::new(f64::NAN, 0.0)), 5.0);
        assert_eq!(smooth_iteration(5, Complex64::new(0.5, 0.0)), 5.0);
    }

    #[test]
    fn palette_cycle() {
        let mut p = Palette::default();
        assert_eq!(p, Palette::Plasma);
        for _ in 0..Palette::ALL.len() {
            p = p.next();
        }
        assert_eq!(p, Palette::Plasma);
        assert_eq!(Palette::from_index(2), Some(Palette::Ocean));
        assert_eq!(Palette::from_index(9), None);
        for palette in Palette::ALL {
            assert_eq!(Palette::from_index(palette.index()), Some(palette));
        }
    }
}
