use image::RgbImage;
use num_complex::Complex64;
use rayon::prelude::*;

use crate::color::color_for_pixel;
use crate::fractal::iterations::mandelbrot;
use crate::fractal::navigation::pixel_to_complex;
use crate::fractal::FractalParams;

/// Calcule la matrice d'itérations et la matrice des valeurs finales de z.
///
/// Retourne un tuple (iterations, zs) où :
/// - `iterations.len() == width * height`
/// - `zs.len() == width * height`
///
/// Chaque pixel échantillonne son centre `(x + 0.5, y + 0.5)`, comme le fragment shader.
/// Le calcul est parallélisé par lignes avec rayon.
pub fn render_escape_time(params: &FractalParams) -> (Vec<u32>, Vec<Complex64>) {
    let width = params.width as usize;

    let rows: Vec<Vec<(u32, Complex64)>> = (0..params.height as usize)
        .into_par_iter()
        .map(|y| {
            (0..width)
                .map(|x| {
                    let c = pixel_to_complex(params, x as f64 + 0.5, y as f64 + 0.5);
                    let r = mandelbrot(params, c);
                    (r.iteration, r.z)
                })
                .collect()
        })
        .collect();

    let mut iterations = Vec::with_capacity(params.pixel_count());
    let mut zs = Vec::with_capacity(params.pixel_count());
    for (iter, z) in rows.into_iter().flatten() {
        iterations.push(iter);
        zs.push(z);
    }
    (iterations, zs)
}

/// Colorise les matrices produites par `render_escape_time`.
///
/// Retourne `None` si les tailles ne correspondent pas à `width * height`.
pub fn colorize(params: &FractalParams, iterations: &[u32], zs: &[Complex64]) -> Option<RgbImage> {
    let n = params.pixel_count();
    if iterations.len() != n || zs.len() != n {
        return None;
    }

    let buffer: Vec<u8> = iterations
        .par_iter()
        .zip(zs.par_iter())
        .flat_map_iter(|(&iter, &z)| {
            let (r, g, b) = color_for_pixel(
                iter,
                z,
                params.iteration_max,
                params.palette,
                params.color_repeat,
            );
            [r, g, b]
        })
        .collect();

    RgbImage::from_raw(params.width, params.height, buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::navigation::zoom_at;

    #[test]
    fn output_sizes_match() {
        let params = FractalParams::new(37, 21);
        let (iterations, zs) = render_escape_time(&params);
        assert_eq!(iterations.len(), 37 * 21);
        assert_eq!(zs.len(), 37 * 21);
    }

    #[test]
    fn default_view_shows_set_and_exterior() {
        let params = FractalParams::new(64, 48);
        let (iterations, _) = render_escape_time(&params);
        let interior = iterations.iter().filter(|&&i| i >= params.iteration_max).count();
        assert!(interior > 0);
        assert!(interior < iterations.len());
        // Le coin supérieur gauche (-2.5+, 1.25+) est hors de l'ensemble.
        assert!(iterations[0] < params.iteration_max);
    }

    #[test]
    fn deep_zoom_inside_cardioid_is_all_interior() {
        let mut params = FractalParams::new(16, 16);
        // Centre la vue sur c = -0.2 puis zoome fortement.
        params.center_x = -0.2;
        params.center_y = 0.0;
        zoom_at(&mut params, 8.0, 8.0, 1e4);
        let (iterations, _) = render_escape_time(&params);
        assert!(iterations.iter().all(|&i| i == params.iteration_max));
    }

    #[test]
    fn colorize_checks_sizes() {
        let params = FractalParams::new(8, 4);
        let (iterations, zs) = render_escape_time(&params);
        let img = colorize(&params, &iterations, &zs).expect("tailles cohérentes");
        assert_eq!(img.dimensions(), (8, 4));
        assert!(colorize(&params, &iterations[1..], &zs).is_none());
    }
}
