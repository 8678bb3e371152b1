#![allow(dead_code)]

pub mod recording;

pub use entities::{AppError, Order, User};
pub use recording::{Event, Failures, Recorder};
pub use repositories::{OrderRepository, UserRepository};
