use chrono::{DateTime, NaiveDate, Utc};

use mindful_core::CoreError;
use mindful_core::availability::{self, SessionFact, SessionState};
use mindful_core::model::{Program, QuestionnaireKind, QuestionnaireStatus};
use mindful_core::progress::{Progress, ProgressSnapshot};

/// Immutable view of one program as fetched at `fetched_at`.
///
/// Each load produces a new snapshot; callers swap the whole value instead of
/// patching a cached one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSnapshot {
    pub program: Program,
    pub questionnaires: QuestionnaireStatus,
    /// The participant has finished the program; every session is replayable.
    pub program_finished: bool,
    pub fetched_at: DateTime<Utc>,
}

impl ProgramSnapshot {
    /// Completion counters for this snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the session count overflows `u32`.
    pub fn progress_snapshot(&self) -> Result<ProgressSnapshot, CoreError> {
        ProgressSnapshot::from_program(&self.program, self.questionnaires)
    }

    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the session count overflows `u32`.
    pub fn progress(&self) -> Result<Progress, CoreError> {
        self.progress_snapshot()?.progress()
    }

    #[must_use]
    pub fn session_facts(&self) -> Vec<SessionFact> {
        self.program.sessions().iter().map(SessionFact::from).collect()
    }

    /// Resolver output for every session, in week order.
    ///
    /// This does not apply the finished-program replay mode; see `program_finished`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the resolver rejects a position.
    pub fn session_states(&self) -> Result<Vec<SessionState>, CoreError> {
        availability::resolve_all(
            &self.session_facts(),
            self.program.has_questionnaires(),
            self.questionnaires.pre_done,
        )
    }

    #[must_use]
    pub fn next_questionnaire(&self) -> Option<QuestionnaireKind> {
        availability::next_questionnaire(
            self.program.has_questionnaires(),
            self.questionnaires.pre_done,
            self.questionnaires.post_done,
            self.program.all_sessions_completed(),
        )
    }

    #[must_use]
    pub fn is_enrollment_open(&self, today: NaiveDate) -> bool {
        self.program.enrollment().contains(today)
    }
}
