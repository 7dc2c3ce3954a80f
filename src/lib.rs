//! Viewer Mandelbrot: navigation dans le plan complexe, rendu wgpu ou CPU, export PNG.
//!
//! Partagé par le viewer (`mandelview`) et l'outil de rendu hors écran (`mandelview-cli`).

pub mod cli;
pub mod color;
pub mod error;
pub mod fractal;
pub mod gpu;
pub mod gui;
pub mod io;
pub mod render;
