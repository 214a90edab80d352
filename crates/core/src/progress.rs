use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Program, QuestionnaireStatus, Session};

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Aggregate completion counters for a program.
///
/// `completed <= total` always holds; `percent` is in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
    pub percent: u8,
}

impl Progress {
    /// True when there is at least one step and every step is done.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Compute program progress from completion facts.
///
/// When the program has questionnaires, the pre and post questionnaires each
/// count as one extra step. A program with no steps at all reports `0` percent.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` if `sessions_completed` exceeds
/// `total_sessions`.
///
/// # Examples
///
/// ```
/// # use mindful_core::progress::compute;
/// let progress = compute(10, 5, true, true, false)?;
/// assert_eq!((progress.completed, progress.total, progress.percent), (6, 12, 50));
/// # Ok::<(), mindful_core::CoreError>(())
/// ```
pub fn compute(
    total_sessions: u32,
    sessions_completed: u32,
    has_questionnaires: bool,
    pre_done: bool,
    post_done: bool,
) -> Result<Progress, CoreError> {
    if sessions_completed > total_sessions {
        return Err(CoreError::invalid(format!(
            "sessions completed ({sessions_completed}) exceeds total sessions ({total_sessions})"
        )));
    }

    let (extra_total, extra_completed) = if has_questionnaires {
        (2, u32::from(pre_done) + u32::from(post_done))
    } else {
        (0, 0)
    };

    let total = total_sessions
        .checked_add(extra_total)
        .ok_or_else(|| CoreError::invalid("total sessions overflow"))?;
    let completed = sessions_completed + extra_completed;

    Ok(Progress {
        completed,
        total,
        percent: round_percent(completed, total),
    })
}

// Half rounds up; integer-only so identical inputs always agree.
fn round_percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = u64::from(completed);
    let total = u64::from(total);
    let percent = (200 * completed + total) / (2 * total);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Read-only summary of a program's completion state at one point in time.
///
/// A snapshot is rebuilt from every fetch of program state and replaces the
/// previous one; it is never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    sessions_completed: u32,
    total_sessions: u32,
    minutes_completed: u32,
    pre_questionnaire_done: bool,
    post_questionnaire_done: bool,
    has_questionnaires: bool,
}

impl ProgressSnapshot {
    /// Derive a snapshot from an assembled program.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidArgument` if the session count does not fit in `u32`.
    pub fn from_program(
        program: &Program,
        questionnaires: QuestionnaireStatus,
    ) -> Result<Self, CoreError> {
        let sessions = program.sessions();
        let total_sessions = u32::try_from(sessions.len())
            .map_err(|_| CoreError::invalid(format!("too many sessions: {}", sessions.len())))?;

        // Bounded by total_sessions, which already fits in u32.
        let sessions_completed =
            u32::try_from(sessions.iter().filter(|s| s.is_completed()).count()).unwrap_or(u32::MAX);

        Ok(Self {
            sessions_completed,
            total_sessions,
            minutes_completed: minutes_completed(sessions),
            pre_questionnaire_done: questionnaires.pre_done,
            post_questionnaire_done: questionnaires.post_done,
            has_questionnaires: program.has_questionnaires(),
        })
    }

    #[must_use]
    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    #[must_use]
    pub fn total_sessions(&self) -> u32 {
        self.total_sessions
    }

    #[must_use]
    pub fn minutes_completed(&self) -> u32 {
        self.minutes_completed
    }

    #[must_use]
    pub fn pre_questionnaire_done(&self) -> bool {
        self.pre_questionnaire_done
    }

    #[must_use]
    pub fn post_questionnaire_done(&self) -> bool {
        self.post_questionnaire_done
    }

    #[must_use]
    pub fn has_questionnaires(&self) -> bool {
        self.has_questionnaires
    }

    /// Aggregate progress for this snapshot.
    ///
    /// # Errors
    ///
    /// Never fails for a snapshot built by `from_program`; the `Result` mirrors `compute`.
    pub fn progress(&self) -> Result<Progress, CoreError> {
        compute(
            self.total_sessions,
            self.sessions_completed,
            self.has_questionnaires,
            self.pre_questionnaire_done,
            self.post_questionnaire_done,
        )
    }
}

/// Minutes of practice across the completed sessions in `sessions`.
#[must_use]
pub fn minutes_completed(sessions: &[Session]) -> u32 {
    sessions
        .iter()
        .filter(|s| s.is_completed())
        .fold(0_u32, |acc, s| acc.saturating_add(s.duration_minutes()))
}
