use thiserror::Error;

/// Erreurs remontées par le viewer et l'outil CLI.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Le shader WGSL a été rejeté par la validation wgpu (compilation ou link du pipeline).
    #[error("échec de compilation du shader: {0}")]
    ShaderCompilation(String),

    /// eframe n'a pas fourni de contexte wgpu (renderer glow ou GPU absent).
    #[error("aucun contexte wgpu disponible")]
    NoRenderState,

    #[error("argument invalide: {0}")]
    InvalidArgument(String),

    #[error("dimensions invalides: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("erreur E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("erreur image: {0}")]
    Image(#[from] image::ImageError),

    #[error("erreur GUI: {0}")]
    Gui(#[from] eframe::Error),
}
