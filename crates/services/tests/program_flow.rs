use std::sync::Arc;

use chrono::NaiveDate;
use mindful_core::availability::{LockReason, SessionState};
use mindful_core::model::{ProgramId, ProgramStatus, QuestionnaireKind, SessionId};
use mindful_core::time::fixed_now;
use services::api::{ProgramRecord, SessionRecord};
use services::{Clock, InMemoryProgramApi, ProgramService};

fn three_week_program(has_questionnaires: bool, pre_done: bool) -> ProgramRecord {
    ProgramRecord {
        id: ProgramId::new(7),
        name: "Mindful Eating".into(),
        description: Some("Three weeks of attention to meals".into()),
        sessions: (1..=3)
            .map(|week| SessionRecord {
                id: SessionId::new(70 + u64::from(week)),
                week,
                duration_minutes: 15 * week,
                practice_type: "eating".into(),
                content_type: "audio".into(),
            })
            .collect(),
        has_questionnaires,
        has_journals: true,
        starts_on: NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
        ends_on: NaiveDate::from_ymd_opt(2023, 11, 30).unwrap(),
        status: ProgramStatus::Active,
        pre_questionnaire_done: pre_done,
        post_questionnaire_done: false,
        completed: false,
    }
}

fn service(api: &InMemoryProgramApi) -> ProgramService {
    ProgramService::new(Clock::fixed(fixed_now()), Arc::new(api.clone()))
}

#[tokio::test]
async fn pending_pre_questionnaire_locks_sessions() {
    let api = InMemoryProgramApi::new();
    api.upsert_program(three_week_program(true, false)).unwrap();
    api.set_completed(SessionId::new(72), true).unwrap();

    let snapshot = service(&api).load_snapshot(ProgramId::new(7)).await.unwrap();

    assert_eq!(
        snapshot.session_states().unwrap(),
        vec![
            SessionState::Locked(LockReason::PreQuestionnairePending),
            SessionState::Completed,
            SessionState::Locked(LockReason::PreQuestionnairePending),
        ]
    );
    assert_eq!(snapshot.next_questionnaire(), Some(QuestionnaireKind::Pre));

    let progress = snapshot.progress().unwrap();
    assert_eq!((progress.completed, progress.total, progress.percent), (1, 5, 20));
}

#[tokio::test]
async fn sessions_unlock_one_after_another() {
    let api = InMemoryProgramApi::new();
    api.upsert_program(three_week_program(false, false)).unwrap();
    api.set_completed(SessionId::new(71), true).unwrap();

    let snapshot = service(&api).load_snapshot(ProgramId::new(7)).await.unwrap();

    assert_eq!(
        snapshot.session_states().unwrap(),
        vec![
            SessionState::Completed,
            SessionState::Available,
            SessionState::Locked(LockReason::PreviousSessionIncomplete),
        ]
    );
    assert_eq!(snapshot.next_questionnaire(), None);
    assert!(snapshot.is_enrollment_open(fixed_now().date_naive()));

    let progress = snapshot.progress_snapshot().unwrap();
    assert_eq!(progress.minutes_completed(), 15);
    assert_eq!(progress.total_sessions(), 3);
}

#[tokio::test]
async fn reloading_replaces_the_snapshot() {
    let api = InMemoryProgramApi::new();
    api.upsert_program(three_week_program(true, true)).unwrap();
    let service = service(&api);

    let before = service.load_snapshot(ProgramId::new(7)).await.unwrap();
    for id in 71..=73 {
        api.set_completed(SessionId::new(id), true).unwrap();
    }
    let after = service.load_snapshot(ProgramId::new(7)).await.unwrap();

    assert_eq!(before.progress().unwrap().percent, 20);
    assert_eq!(after.progress().unwrap().percent, 80);
    assert_eq!(after.next_questionnaire(), Some(QuestionnaireKind::Post));
    assert!(before.program.sessions().iter().all(|s| !s.is_completed()));
}

#[tokio::test]
async fn identical_backend_state_gives_identical_snapshots() {
    let api = InMemoryProgramApi::new();
    api.upsert_program(three_week_program(true, true)).unwrap();
    api.set_completed(SessionId::new(71), true).unwrap();
    let service = service(&api).with_fetch_concurrency(3);

    let first = service.load_snapshot(ProgramId::new(7)).await.unwrap();
    let second = service.load_snapshot(ProgramId::new(7)).await.unwrap();
    assert_eq!(first, second);
}
