use crate::model::{ProgramId, SessionId};

/// One weekly unit of a program.
///
/// `week` is 1-based and unique within its program; it defines the order in
/// which sessions unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    program_id: ProgramId,
    week: u32,
    completed: bool,
    duration_minutes: u32,
    practice_type: String,
    content_type: String,
}

impl Session {
    #[must_use]
    pub fn new(
        id: SessionId,
        program_id: ProgramId,
        week: u32,
        duration_minutes: u32,
        practice_type: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            program_id,
            week,
            completed: false,
            duration_minutes,
            practice_type: practice_type.into(),
            content_type: content_type.into(),
        }
    }

    /// Returns a copy of this session carrying the given completion flag.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn program_id(&self) -> ProgramId {
        self.program_id
    }

    #[must_use]
    pub fn week(&self) -> u32 {
        self.week
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn practice_type(&self) -> &str {
        &self.practice_type
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}
