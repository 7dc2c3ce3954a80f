pub mod types;
pub mod iterations;
pub mod navigation;

pub use types::FractalParams;
