use std::path::PathBuf;

use clap::Parser;

use mandelview::cli::ViewArgs;
use mandelview::error::ViewerError;
use mandelview::gui::{MandelviewApp, ViewerOptions};

/// Viewer Mandelbrot interactif.
///
/// Glisser: déplacer. Molette: zoomer sous le curseur. Haut/Bas ou +/-: itérations.
/// C: palette. R: répétitions du gradient. Origine/Retour arrière: vue initiale.
/// S: capture PNG. Échap: quitter.
#[derive(Parser, Debug)]
#[command(name = "mandelview", version, about = "Viewer Mandelbrot interactif (wgpu)")]
struct Args {
    #[command(flatten)]
    view: ViewArgs,

    /// Shader WGSL à utiliser à la place du shader embarqué (doit exposer vs_main/fs_main)
    #[arg(long, value_name = "FICHIER")]
    shader: Option<PathBuf>,

    /// Désactive la synchronisation verticale
    #[arg(long)]
    no_vsync: bool,
}

fn install_panic_hook() {
    // Message plus informatif quand wgpu/winit échouent à l'initialisation
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let msg = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "Panic inconnu".to_string());

        eprintln!("\nErreur fatale dans le viewer:");
        eprintln!("   {msg}");
        if let Some(location) = panic_info.location() {
            eprintln!("   Fichier: {}:{}:{}", location.file(), location.line(), location.column());
        }

        if msg.contains("wgpu") || msg.contains("EGL") || msg.contains("egl") || msg.contains("BadAccess") {
            eprintln!("\nSolutions possibles:");
            eprintln!("   1. Vérifiez qu'un affichage est disponible: echo $DISPLAY");
            eprintln!("   2. Forcez un backend: WGPU_BACKEND=vulkan (ou gl, metal, dx12)");
            eprintln!("   3. Vérifiez les permissions d'accès au GPU: ls -la /dev/dri/");
        }

        default_hook(panic_info);
    }));
}

fn run(args: Args) -> Result<(), ViewerError> {
    let params = args.view.to_params()?;
    let shader_source = args
        .shader
        .as_ref()
        .map(std::fs::read_to_string)
        .transpose()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Mandelbrot")
            .with_inner_size([args.view.width as f32, args.view.height as f32])
            .with_resizable(true),
        hardware_acceleration: eframe::HardwareAcceleration::Preferred,
        renderer: eframe::Renderer::Wgpu,
        vsync: !args.no_vsync,
        ..Default::default()
    };

    let viewer = ViewerOptions {
        params,
        zoom: args.view.zoom,
        shader_source,
    };

    eframe::run_native(
        "Mandelbrot",
        options,
        Box::new(move |cc| Box::new(MandelviewApp::new(cc, viewer))),
    )?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    install_panic_hook();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Erreur lors du lancement de l'application: {e}");
        std::process::exit(1);
    }
}
