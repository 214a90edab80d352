#![forbid(unsafe_code)]

pub mod availability;
pub mod error;
pub mod model;
pub mod progress;
pub mod time;

pub use error::CoreError;
pub use time::Clock;
