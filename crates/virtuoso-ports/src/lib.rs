pub mod audio;
pub mod clock;
pub mod generation;
pub mod storage;
pub mod types;

pub use audio::*;
pub use clock::*;
pub use generation::*;
pub use storage::*;
pub use types::*;
