use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{QuestionnaireKind, Session};

//
// ─── TYPES ─────────────────────────────────────────────────────────────────────
//

/// The minimal completion fact the resolver needs about one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFact {
    pub week: u32,
    pub completed: bool,
}

impl From<&Session> for SessionFact {
    fn from(session: &Session) -> Self {
        Self {
            week: session.week(),
            completed: session.is_completed(),
        }
    }
}

/// Why a session cannot be started yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockReason {
    PreQuestionnairePending,
    PreviousSessionIncomplete,
}

impl LockReason {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::PreQuestionnairePending => "pre-questionnaire pending",
            Self::PreviousSessionIncomplete => "previous session incomplete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Locked(LockReason),
    Available,
    Completed,
}

/// What the participant can do with a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallToAction {
    None,
    Start,
    Review,
    Repeat,
}

impl SessionState {
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }

    /// Action offered for this state while the program is still in progress.
    #[must_use]
    pub fn call_to_action(&self) -> CallToAction {
        match self {
            Self::Locked(_) => CallToAction::None,
            Self::Available => CallToAction::Start,
            Self::Completed => CallToAction::Review,
        }
    }
}

//
// ─── RESOLVER ──────────────────────────────────────────────────────────────────
//

/// Resolve the state of the session at `index` in a week-ordered sequence.
///
/// Sessions unlock strictly in order: a session is available only when the one
/// before it is completed and, for programs with questionnaires, the
/// pre-questionnaire is done. A completed session reports `Completed` regardless
/// of gating.
///
/// # Errors
///
/// Returns `CoreError::InvalidArgument` if `index` is out of bounds.
pub fn resolve(
    sessions: &[SessionFact],
    index: usize,
    has_questionnaires: bool,
    pre_done: bool,
) -> Result<SessionState, CoreError> {
    let current = sessions.get(index).ok_or_else(|| {
        CoreError::invalid(format!(
            "session index {index} out of bounds for {} sessions",
            sessions.len()
        ))
    })?;

    if current.completed {
        return Ok(SessionState::Completed);
    }
    if has_questionnaires && !pre_done {
        return Ok(SessionState::Locked(LockReason::PreQuestionnairePending));
    }
    if index == 0 || sessions[index - 1].completed {
        return Ok(SessionState::Available);
    }
    Ok(SessionState::Locked(LockReason::PreviousSessionIncomplete))
}

/// Resolve every position of `sessions`, in order.
///
/// The result always has one entry per session.
///
/// # Errors
///
/// Propagates the first `CoreError` raised by `resolve`.
pub fn resolve_all(
    sessions: &[SessionFact],
    has_questionnaires: bool,
    pre_done: bool,
) -> Result<Vec<SessionState>, CoreError> {
    (0..sessions.len())
        .map(|index| resolve(sessions, index, has_questionnaires, pre_done))
        .collect()
}

/// The questionnaire the participant should be pointed at next, if any.
///
/// The pre-questionnaire comes first; the post-questionnaire is only offered
/// once every session has been completed.
#[must_use]
pub fn next_questionnaire(
    has_questionnaires: bool,
    pre_done: bool,
    post_done: bool,
    all_sessions_completed: bool,
) -> Option<QuestionnaireKind> {
    if !has_questionnaires {
        return None;
    }
    if !pre_done {
        return Some(QuestionnaireKind::Pre);
    }
    if all_sessions_completed && !post_done {
        return Some(QuestionnaireKind::Post);
    }
    None
}
