mod http;
mod memory;
mod records;

use async_trait::async_trait;

use mindful_core::model::{ProgramId, SessionId};

use crate::error::ApiError;

pub use http::HttpProgramApi;
pub use memory::InMemoryProgramApi;
pub use records::{CompletionInfo, ProgramRecord, SessionRecord};

/// Backend contract for program state.
///
/// Implementations only fetch; assembling snapshots is `ProgramService`'s job.
#[async_trait]
pub trait ProgramApi: Send + Sync {
    /// List every program assigned to the participant.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend cannot be reached or answers badly.
    async fn list_programs(&self) -> Result<Vec<ProgramRecord>, ApiError>;

    /// Fetch one program with its sessions and questionnaire flags.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if missing, or other backend errors.
    async fn get_program(&self, id: ProgramId) -> Result<ProgramRecord, ApiError>;

    /// Fetch the participant's completion fact for a single session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if missing, or other backend errors.
    async fn get_completion_info(&self, session_id: SessionId)
    -> Result<CompletionInfo, ApiError>;
}
