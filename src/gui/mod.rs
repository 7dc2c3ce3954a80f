mod app;
mod texture;

pub use app::{MandelviewApp, ViewerOptions};
