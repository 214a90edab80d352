use chrono::NaiveDate;
use mindful_core::availability::{CallToAction, SessionState};
use mindful_core::model::{ProgramId, QuestionnaireKind, Session, SessionId};
use services::{ProgramService, ProgramSnapshot};

use crate::error::ViewError;
use crate::vm::progress_vm::{ProgressVm, map_progress};
use crate::vm::rich_text_vm::description_to_html;
use crate::vm::time_fmt::{format_minutes, format_window};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionCardVm {
    pub id: SessionId,
    pub week_label: String,
    pub practice_label: String,
    pub duration_label: String,
    pub state: SessionState,
    pub action: CallToAction,
    pub action_label: Option<&'static str>,
    pub lock_hint: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionnairePromptVm {
    pub kind: QuestionnaireKind,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramDetailVm {
    pub id: ProgramId,
    pub name: String,
    pub description_html: Option<String>,
    pub window_label: String,
    pub enrollment_open: bool,
    pub has_journals: bool,
    pub replay_mode: bool,
    pub progress: ProgressVm,
    pub sessions: Vec<SessionCardVm>,
    pub questionnaire_prompt: Option<QuestionnairePromptVm>,
}

/// Apply the finished-program replay mode on top of resolver output.
///
/// Once the participant has finished the program, every session is shown as
/// completed and can be repeated, whatever the resolver said.
#[must_use]
pub fn apply_replay_mode(
    states: &[SessionState],
    program_finished: bool,
) -> Vec<(SessionState, CallToAction)> {
    states
        .iter()
        .map(|state| {
            if program_finished {
                (SessionState::Completed, CallToAction::Repeat)
            } else {
                (*state, state.call_to_action())
            }
        })
        .collect()
}

fn action_label(action: CallToAction) -> Option<&'static str> {
    match action {
        CallToAction::None => None,
        CallToAction::Start => Some("Start session"),
        CallToAction::Review => Some("Review"),
        CallToAction::Repeat => Some("Repeat session"),
    }
}

fn questionnaire_label(kind: QuestionnaireKind) -> &'static str {
    match kind {
        QuestionnaireKind::Pre => "Complete the initial questionnaire to unlock your sessions",
        QuestionnaireKind::Post => "Complete the final questionnaire to finish the program",
    }
}

fn map_session_card(session: &Session, state: SessionState, action: CallToAction) -> SessionCardVm {
    let lock_hint = match state {
        SessionState::Locked(reason) => Some(reason.describe()),
        SessionState::Available | SessionState::Completed => None,
    };

    let practice_label = match (session.practice_type(), session.content_type()) {
        ("", "") => "Practice".to_string(),
        (practice, "") => practice.to_string(),
        ("", content) => content.to_string(),
        (practice, content) => format!("{practice} ({content})"),
    };

    SessionCardVm {
        id: session.id(),
        week_label: format!("Week {}", session.week()),
        practice_label,
        duration_label: format_minutes(session.duration_minutes()),
        state,
        action,
        action_label: action_label(action),
        lock_hint,
    }
}

/// Convert a program snapshot into the detail screen view model.
///
/// # Errors
///
/// Returns `ViewError::Unknown` (after logging the cause) if progress or
/// session states cannot be derived.
pub fn map_program_detail(
    snapshot: &ProgramSnapshot,
    today: NaiveDate,
) -> Result<ProgramDetailVm, ViewError> {
    let program = &snapshot.program;
    let progress_snapshot = snapshot.progress_snapshot()?;
    let progress = progress_snapshot.progress()?;

    let states = apply_replay_mode(&snapshot.session_states()?, snapshot.program_finished);
    let sessions = program
        .sessions()
        .iter()
        .zip(states)
        .map(|(session, (state, action))| map_session_card(session, state, action))
        .collect();

    let questionnaire_prompt = if snapshot.program_finished {
        None
    } else {
        snapshot
            .next_questionnaire()
            .map(|kind| QuestionnairePromptVm {
                kind,
                label: questionnaire_label(kind),
            })
    };

    let window = program.enrollment();
    Ok(ProgramDetailVm {
        id: program.id(),
        name: program.name().to_string(),
        description_html: program.description().map(description_to_html),
        window_label: format_window(window.starts_on(), window.ends_on()),
        enrollment_open: snapshot.is_enrollment_open(today),
        has_journals: program.has_journals(),
        replay_mode: snapshot.program_finished,
        progress: map_progress(&progress_snapshot, progress),
        sessions,
        questionnaire_prompt,
    })
}

/// Load a fresh snapshot and map it for the detail screen.
///
/// # Errors
///
/// Returns `ViewError::NotFound` when the program does not exist.
/// Returns `ViewError::Unknown` for other failures.
pub async fn load_program_detail(
    service: &ProgramService,
    id: ProgramId,
) -> Result<ProgramDetailVm, ViewError> {
    let snapshot = service.load_snapshot(id).await?;
    map_program_detail(&snapshot, service.clock().today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindful_core::availability::LockReason;
    use mindful_core::model::{
        EnrollmentWindow, Program, ProgramStatus, QuestionnaireStatus,
    };
    use mindful_core::time::fixed_now;

    fn snapshot(completed: &[bool], pre_done: bool, finished: bool) -> ProgramSnapshot {
        let program_id = ProgramId::new(4);
        let sessions = completed
            .iter()
            .zip(1_u32..)
            .map(|(&done, week)| {
                Session::new(
                    SessionId::new(u64::from(week)),
                    program_id,
                    week,
                    20,
                    "breathing",
                    "audio",
                )
                .with_completed(done)
            })
            .collect();
        let window = EnrollmentWindow::new(
            NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
        .unwrap();
        let program = Program::new(
            program_id,
            "Compassion",
            Some("**Kindness** first".into()),
            sessions,
            true,
            false,
            window,
            ProgramStatus::Active,
        )
        .unwrap();

        ProgramSnapshot {
            program,
            questionnaires: QuestionnaireStatus::new(pre_done, finished),
            program_finished: finished,
            fetched_at: fixed_now(),
        }
    }

    #[test]
    fn in_progress_program_maps_resolver_states() {
        let vm = map_program_detail(
            &snapshot(&[true, false, false], true, false),
            fixed_now().date_naive(),
        )
        .unwrap();

        let actions: Vec<CallToAction> = vm.sessions.iter().map(|s| s.action).collect();
        assert_eq!(
            actions,
            vec![CallToAction::Review, CallToAction::Start, CallToAction::None]
        );
        assert_eq!(vm.sessions[2].lock_hint, Some("previous session incomplete"));
        assert_eq!(vm.sessions[1].week_label, "Week 2");
        assert_eq!(vm.sessions[1].practice_label, "breathing (audio)");
        assert_eq!(vm.progress.percent_label, "40%");
        assert_eq!(vm.progress.sessions_label, "1/3 sessions");
        assert_eq!(vm.progress.minutes_label, "20 min practiced");
        assert!(vm.enrollment_open);
        assert!(!vm.replay_mode);
        assert_eq!(vm.questionnaire_prompt, None);
        assert!(
            vm.description_html
                .as_deref()
                .unwrap()
                .contains("<strong>Kindness</strong>")
        );
    }

    #[test]
    fn program_without_sessions_maps_cleanly() {
        let vm = map_program_detail(&snapshot(&[], true, false), fixed_now().date_naive())
            .unwrap();

        assert!(vm.sessions.is_empty());
        assert_eq!(vm.progress.sessions_label, "0/0 sessions");
    }

    #[test]
    fn pending_pre_questionnaire_prompts_and_locks() {
        let vm = map_program_detail(
            &snapshot(&[false, false], false, false),
            fixed_now().date_naive(),
        )
        .unwrap();

        assert!(
            vm.sessions
                .iter()
                .all(|s| s.state == SessionState::Locked(LockReason::PreQuestionnairePending))
        );
        assert_eq!(
            vm.questionnaire_prompt.map(|p| p.kind),
            Some(QuestionnaireKind::Pre)
        );
    }

    #[test]
    fn finished_program_makes_every_session_repeatable() {
        let vm = map_program_detail(
            &snapshot(&[true, false, false], true, true),
            fixed_now().date_naive(),
        )
        .unwrap();

        assert!(vm.replay_mode);
        for session in &vm.sessions {
            assert_eq!(session.state, SessionState::Completed);
            assert_eq!(session.action, CallToAction::Repeat);
            assert_eq!(session.action_label, Some("Repeat session"));
        }
        assert_eq!(vm.questionnaire_prompt, None);
    }

    #[test]
    fn replay_mode_is_a_pure_overlay() {
        let states = [
            SessionState::Available,
            SessionState::Locked(LockReason::PreviousSessionIncomplete),
        ];
        assert_eq!(
            apply_replay_mode(&states, false),
            vec![
                (SessionState::Available, CallToAction::Start),
                (
                    SessionState::Locked(LockReason::PreviousSessionIncomplete),
                    CallToAction::None
                ),
            ]
        );
        assert!(
            apply_replay_mode(&states, true)
                .iter()
                .all(|(_, action)| *action == CallToAction::Repeat)
        );
    }
}
