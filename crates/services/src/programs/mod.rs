mod service;
mod snapshot;
mod summary;

// Public API of the program subsystem.
pub use crate::error::ProgramServiceError;
pub use service::ProgramService;
pub use snapshot::ProgramSnapshot;
pub use summary::ProgramSummary;
