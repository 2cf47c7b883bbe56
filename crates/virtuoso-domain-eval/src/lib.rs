pub mod judge;
pub mod stats;

pub use judge::*;
pub use stats::*;
