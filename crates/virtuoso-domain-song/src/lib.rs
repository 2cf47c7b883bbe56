pub mod builtin;
pub mod catalog;
pub mod import;
pub mod model;

pub use builtin::*;
pub use catalog::*;
pub use import::*;
pub use model::*;
