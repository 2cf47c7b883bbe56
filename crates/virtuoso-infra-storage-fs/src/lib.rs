mod files;
mod library;
mod settings;

pub use library::*;
pub use settings::*;
