pub mod horizontal_cli;
pub mod visualizer;

pub use horizontal_cli::*;
pub use visualizer::*;
