use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ViewerError;
use crate::fractal::FractalParams;
use crate::render::{colorize, render_escape_time};

/// Rend la vue avec le moteur CPU puis l'enregistre au format PNG.
///
/// Le rendu CPU reprend exactement la boucle et la colorisation du shader, l'image
/// exportée correspond donc à ce qui est affiché (aux arrondis f32 du GPU près).
pub fn save_png(params: &FractalParams, output: &Path) -> Result<(), ViewerError> {
    if params.width == 0 || params.height == 0 {
        return Err(ViewerError::InvalidSize {
            width: params.width,
            height: params.height,
        });
    }

    let (iterations, zs) = render_escape_time(params);
    let img = colorize(params, &iterations, &zs).ok_or(ViewerError::InvalidSize {
        width: params.width,
        height: params.height,
    })?;

    // image 0.25 détecte le format depuis l'extension
    img.save(output)?;
    log::info!(
        "image {}x{} enregistrée: {}",
        params.width,
        params.height,
        output.display()
    );
    Ok(())
}

/// Nom de capture horodaté dans le répertoire courant: `mandelbrot_<secondes>.png`.
pub fn screenshot_path() -> PathBuf {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("mandelbrot_{timestamp}.png"))
}
