use num_complex::Complex64;

use super::types::{FractalParams, FractalResult};

/// Itération escape-time de Mandelbrot: z_{n+1} = z_n^2 + c, z_0 = 0.
///
/// Boucle identique à celle de `mandelbrot.wgsl` (test sur |z|² pour éviter la racine):
/// s'arrête dès que |z| >= bailout ou quand `iteration_max` est atteint.
pub fn mandelbrot(p: &FractalParams, c: Complex64) -> FractalResult {
    let bailout_sqr = p.bailout * p.bailout;
    let mut z = Complex64::new(0.0, 0.0);
    let mut i = 0u32;

    while i < p.iteration_max && z.norm_sqr() < bailout_sqr {
        z = z * z + c;
        i += 1;
    }

    FractalResult { iteration: i, z }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_interior() {
        let params = FractalParams::new(10, 10);
        let r = mandelbrot(&params, Complex64::new(0.0, 0.0));
        assert_eq!(r.iteration, params.iteration_max);
    }

    #[test]
    fn known_interior_points() {
        let params = FractalParams::new(10, 10);
        // Cardioïde principale, bulbe période 2, pointe de l'antenne.
        for c in [
            Complex64::new(-0.5, 0.0),
            Complex64::new(-1.0, 0.0),
            Complex64::new(-2.0, 0.0),
            Complex64::new(0.25, 0.0),
        ] {
            assert_eq!(mandelbrot(&params, c).iteration, params.iteration_max, "c = {c}");
        }
    }

    #[test]
    fn far_point_escapes_immediately() {
        let params = FractalParams::new(10, 10);
        let r = mandelbrot(&params, Complex64::new(10.0, 10.0));
        assert_eq!(r.iteration, 1);
        assert!(r.z.norm() >= params.bailout);
    }

    #[test]
    fn exterior_point_escapes() {
        let params = FractalParams::new(10, 10);
        let r = mandelbrot(&params, Complex64::new(0.5, 0.5));
        assert!(r.iteration < params.iteration_max);
        assert!(r.z.norm() >= params.bailout);
    }
}
