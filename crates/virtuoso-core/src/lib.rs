pub mod app;
pub mod clock;
pub mod driver;
pub mod history;
pub mod ipc;
pub mod scheduler;
pub mod session;

pub use app::*;
pub use clock::*;
pub use driver::*;
pub use history::*;
pub use ipc::*;
pub use scheduler::*;
pub use session::*;
