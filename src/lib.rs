pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod runtime;
pub mod terminal;
pub mod ui;

pub use config::BookingConfig;
pub use crate::core::{BookingRequest, BookingState};
pub use error::AppError;
pub use runtime::{BookingBackend, Command, Driver, SimulatedBackend};
