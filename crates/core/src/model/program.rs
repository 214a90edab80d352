use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ProgramId, Session};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgramError {
    #[error("program name cannot be empty")]
    EmptyName,

    #[error("enrollment window ends ({ends_on}) before it starts ({starts_on})")]
    InvalidWindow {
        starts_on: NaiveDate,
        ends_on: NaiveDate,
    },

    #[error("session week must be >= 1")]
    InvalidWeek,

    #[error("duplicate session week: {week}")]
    DuplicateWeek { week: u32 },

    #[error("session {session} belongs to program {found}, expected {expected}")]
    ForeignSession {
        session: u64,
        expected: ProgramId,
        found: ProgramId,
    },
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of a program as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    Active,
    Finalized,
}

//
// ─── ENROLLMENT WINDOW ─────────────────────────────────────────────────────────
//

/// Inclusive date range during which a participant is enrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrollmentWindow {
    starts_on: NaiveDate,
    ends_on: NaiveDate,
}

impl EnrollmentWindow {
    /// # Errors
    ///
    /// Returns `ProgramError::InvalidWindow` if `ends_on` precedes `starts_on`.
    pub fn new(starts_on: NaiveDate, ends_on: NaiveDate) -> Result<Self, ProgramError> {
        if ends_on < starts_on {
            return Err(ProgramError::InvalidWindow { starts_on, ends_on });
        }
        Ok(Self { starts_on, ends_on })
    }

    #[must_use]
    pub fn starts_on(&self) -> NaiveDate {
        self.starts_on
    }

    #[must_use]
    pub fn ends_on(&self) -> NaiveDate {
        self.ends_on
    }

    #[must_use]
    pub fn has_started(&self, today: NaiveDate) -> bool {
        today >= self.starts_on
    }

    #[must_use]
    pub fn has_ended(&self, today: NaiveDate) -> bool {
        today > self.ends_on
    }

    #[must_use]
    pub fn contains(&self, today: NaiveDate) -> bool {
        self.has_started(today) && !self.has_ended(today)
    }
}

//
// ─── PROGRAM ───────────────────────────────────────────────────────────────────
//

/// A multi-week curriculum assigned to a participant.
///
/// Sessions are always held sorted by week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    id: ProgramId,
    name: String,
    description: Option<String>,
    sessions: Vec<Session>,
    has_questionnaires: bool,
    has_journals: bool,
    enrollment: EnrollmentWindow,
    status: ProgramStatus,
}

impl Program {
    /// Build a program, validating the session list.
    ///
    /// # Errors
    ///
    /// Returns `ProgramError` if the name is blank, a session belongs to another
    /// program, or week numbers are zero or repeated.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    pub fn new(
        id: ProgramId,
        name: impl Into<String>,
        description: Option<String>,
        mut sessions: Vec<Session>,
        has_questionnaires: bool,
        has_journals: bool,
        enrollment: EnrollmentWindow,
        status: ProgramStatus,
    ) -> Result<Self, ProgramError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProgramError::EmptyName);
        }

        let mut weeks = HashSet::with_capacity(sessions.len());
        for session in &sessions {
            if session.program_id() != id {
                return Err(ProgramError::ForeignSession {
                    session: session.id().value(),
                    expected: id,
                    found: session.program_id(),
                });
            }
            if session.week() == 0 {
                return Err(ProgramError::InvalidWeek);
            }
            if !weeks.insert(session.week()) {
                return Err(ProgramError::DuplicateWeek {
                    week: session.week(),
                });
            }
        }
        sessions.sort_by_key(Session::week);

        let description = description
            .map(|desc| desc.trim().to_owned())
            .filter(|desc| !desc.is_empty());

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            description,
            sessions,
            has_questionnaires,
            has_journals,
            enrollment,
            status,
        })
    }

    #[must_use]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Sessions in week order.
    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    #[must_use]
    pub fn has_questionnaires(&self) -> bool {
        self.has_questionnaires
    }

    #[must_use]
    pub fn has_journals(&self) -> bool {
        self.has_journals
    }

    #[must_use]
    pub fn enrollment(&self) -> EnrollmentWindow {
        self.enrollment
    }

    #[must_use]
    pub fn status(&self) -> ProgramStatus {
        self.status
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.status == ProgramStatus::Finalized
    }

    #[must_use]
    pub fn all_sessions_completed(&self) -> bool {
        self.sessions.iter().all(Session::is_completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window() -> EnrollmentWindow {
        EnrollmentWindow::new(date(2024, 1, 8), date(2024, 3, 3)).unwrap()
    }

    fn session(id: u64, program: u64, week: u32) -> Session {
        Session::new(
            SessionId::new(id),
            ProgramId::new(program),
            week,
            30,
            "breathing",
            "video",
        )
    }

    #[test]
    fn program_sorts_sessions_by_week() {
        let program = Program::new(
            ProgramId::new(1),
            " MBSR ",
            Some("  ".into()),
            vec![session(3, 1, 3), session(1, 1, 1), session(2, 1, 2)],
            true,
            false,
            window(),
            ProgramStatus::Active,
        )
        .unwrap();

        let weeks: Vec<u32> = program.sessions().iter().map(Session::week).collect();
        assert_eq!(weeks, vec![1, 2, 3]);
        assert_eq!(program.name(), "MBSR");
        assert_eq!(program.description(), None);
        assert!(!program.is_finalized());
    }

    #[test]
    fn program_rejects_duplicate_week() {
        let err = Program::new(
            ProgramId::new(1),
            "MBSR",
            None,
            vec![session(1, 1, 2), session(2, 1, 2)],
            false,
            false,
            window(),
            ProgramStatus::Active,
        )
        .unwrap_err();
        assert_eq!(err, ProgramError::DuplicateWeek { week: 2 });
    }

    #[test]
    fn program_rejects_week_zero() {
        let err = Program::new(
            ProgramId::new(1),
            "MBSR",
            None,
            vec![session(1, 1, 0)],
            false,
            false,
            window(),
            ProgramStatus::Active,
        )
        .unwrap_err();
        assert_eq!(err, ProgramError::InvalidWeek);
    }

    #[test]
    fn program_rejects_foreign_session() {
        let err = Program::new(
            ProgramId::new(1),
            "MBSR",
            None,
            vec![session(5, 2, 1)],
            false,
            false,
            window(),
            ProgramStatus::Active,
        )
        .unwrap_err();
        assert!(matches!(err, ProgramError::ForeignSession { session: 5, .. }));
    }

    #[test]
    fn program_rejects_blank_name() {
        let err = Program::new(
            ProgramId::new(1),
            "   ",
            None,
            Vec::new(),
            false,
            false,
            window(),
            ProgramStatus::Active,
        )
        .unwrap_err();
        assert_eq!(err, ProgramError::EmptyName);
    }

    #[test]
    fn window_rejects_inverted_range() {
        let err = EnrollmentWindow::new(date(2024, 3, 1), date(2024, 2, 1)).unwrap_err();
        assert!(matches!(err, ProgramError::InvalidWindow { .. }));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = window();
        assert!(!window.contains(date(2024, 1, 7)));
        assert!(window.contains(date(2024, 1, 8)));
        assert!(window.contains(date(2024, 3, 3)));
        assert!(window.has_ended(date(2024, 3, 4)));
    }
}
