use std::path::PathBuf;

use clap::Parser;

use mandelview::cli::ViewArgs;
use mandelview::error::ViewerError;
use mandelview::io::png::save_png;

/// Rendu hors écran de l'ensemble de Mandelbrot vers un PNG.
///
/// Utilise le moteur CPU de référence (même itération et même colorisation que le shader).
///
/// Exemple d'utilisation :
///   mandelview-cli --center-x -0.743643 --center-y 0.131825 --zoom 5000 --iterations 2048 --output spiral.png
#[derive(Parser, Debug)]
#[command(name = "mandelview-cli", version, about = "Rendu Mandelbrot en ligne de commande")]
struct Cli {
    #[command(flatten)]
    view: ViewArgs,

    /// Fichier de sortie PNG
    #[arg(long, value_name = "FICHIER")]
    output: PathBuf,
}

fn run(cli: &Cli) -> Result<(), ViewerError> {
    let params = cli.view.to_params()?;
    log::info!(
        "rendu {}x{} centre=({}, {}) zoom={} iterations={}",
        params.width,
        params.height,
        params.center_x,
        params.center_y,
        params.zoom_level(),
        params.iteration_max
    );
    save_png(&params, &cli.output)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Erreur: {e}");
        std::process::exit(1);
    }
}
