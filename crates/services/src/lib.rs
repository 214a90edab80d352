#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod programs;

pub use mindful_core::Clock;

pub use api::{HttpProgramApi, InMemoryProgramApi, ProgramApi};
pub use config::ApiConfig;
pub use error::{ApiError, ProgramServiceError};
pub use programs::{ProgramService, ProgramSnapshot, ProgramSummary};
