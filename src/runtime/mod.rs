pub mod backend;
pub mod command;
pub mod driver;
pub mod effect;
pub mod reducer;
pub mod runner;
pub mod scheduler;

pub use backend::{BookingBackend, SimulatedBackend};
pub use command::Command;
pub use driver::Driver;
pub use reducer::Timings;
pub use runner::Runtime;
