pub mod escape_time;

pub use escape_time::{colorize, render_escape_time};
