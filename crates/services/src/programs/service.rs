use std::collections::HashMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use mindful_core::model::{ProgramId, SessionId};

use super::snapshot::ProgramSnapshot;
use super::summary::ProgramSummary;
use crate::Clock;
use crate::api::ProgramApi;
use crate::config::DEFAULT_FETCH_CONCURRENCY;
use crate::error::ProgramServiceError;

/// Presentation-facing facade that fetches program state and assembles snapshots.
///
/// This service owns:
/// - the time source (`Clock`)
/// - backend access
///
/// It does **not** own UI formatting or the replay-mode presentation rule.
#[derive(Clone)]
pub struct ProgramService {
    clock: Clock,
    api: Arc<dyn ProgramApi>,
    fetch_concurrency: usize,
}

impl ProgramService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn ProgramApi>) -> Self {
        Self {
            clock,
            api,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Cap on completion lookups in flight for one snapshot load (minimum 1).
    #[must_use]
    pub fn with_fetch_concurrency(mut self, limit: usize) -> Self {
        self.fetch_concurrency = limit.max(1);
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Fetch a program and its per-session completion facts into a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProgramServiceError::Api` when any backend call fails, or
    /// `ProgramServiceError::Program` when the record fails validation.
    pub async fn load_snapshot(
        &self,
        id: ProgramId,
    ) -> Result<ProgramSnapshot, ProgramServiceError> {
        let record = self.api.get_program(id).await?;
        let session_ids: Vec<SessionId> = record.sessions.iter().map(|s| s.id).collect();
        debug!(program = %id, sessions = session_ids.len(), "fetching completion info");

        let completion =
            fetch_completion(self.api.as_ref(), &session_ids, self.fetch_concurrency).await?;
        let program = record.to_program(&completion)?;

        let snapshot = ProgramSnapshot {
            program,
            questionnaires: record.questionnaires(),
            program_finished: record.completed,
            fetched_at: self.clock.now(),
        };
        info!(
            program = %id,
            completed = completion.values().filter(|done| **done).count(),
            total = completion.len(),
            "program snapshot assembled"
        );
        Ok(snapshot)
    }

    /// Programs the participant is still working through.
    ///
    /// # Errors
    ///
    /// Returns `ProgramServiceError::Api` on backend failures.
    pub async fn list_assigned(&self) -> Result<Vec<ProgramSummary>, ProgramServiceError> {
        Ok(self
            .list_summaries()
            .await?
            .into_iter()
            .filter(|summary| !summary.is_closed())
            .collect())
    }

    /// Programs that are finalized or finished by the participant.
    ///
    /// # Errors
    ///
    /// Returns `ProgramServiceError::Api` on backend failures.
    pub async fn list_completed(&self) -> Result<Vec<ProgramSummary>, ProgramServiceError> {
        Ok(self
            .list_summaries()
            .await?
            .into_iter()
            .filter(ProgramSummary::is_closed)
            .collect())
    }

    async fn list_summaries(&self) -> Result<Vec<ProgramSummary>, ProgramServiceError> {
        let records = self.api.list_programs().await?;
        debug!(count = records.len(), "listed programs");
        let mut summaries: Vec<ProgramSummary> =
            records.iter().map(ProgramSummary::from_record).collect();
        summaries.sort_by(|a, b| a.starts_on.cmp(&b.starts_on).then(a.id.cmp(&b.id)));
        Ok(summaries)
    }
}

/// Look up completion for every session concurrently and key the answers by id.
///
/// Responses may arrive in any order; reassembly goes through the map, so the
/// result does not depend on scheduling.
async fn fetch_completion(
    api: &dyn ProgramApi,
    session_ids: &[SessionId],
    concurrency: usize,
) -> Result<HashMap<SessionId, bool>, ProgramServiceError> {
    let answers: Vec<(SessionId, SessionId, bool)> = stream::iter(session_ids.iter().copied())
        .map(move |requested| async move {
            let info = api.get_completion_info(requested).await?;
            Ok::<_, ProgramServiceError>((requested, info.session_id, info.completed))
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    let mut completion = HashMap::with_capacity(answers.len());
    for (requested, received, completed) in answers {
        if requested != received {
            return Err(ProgramServiceError::MismatchedCompletionInfo {
                requested,
                received,
            });
        }
        completion.insert(requested, completed);
    }
    Ok(completion)
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use mindful_core::model::ProgramStatus;
    use mindful_core::time::fixed_clock;

    use crate::api::{CompletionInfo, InMemoryProgramApi, ProgramRecord, SessionRecord};
    use crate::error::ApiError;

    fn record(id: u64, weeks: u32) -> ProgramRecord {
        ProgramRecord {
            id: ProgramId::new(id),
            name: format!("Program {id}"),
            description: None,
            sessions: (1..=weeks)
                .map(|week| SessionRecord {
                    id: SessionId::new(id * 100 + u64::from(week)),
                    week,
                    duration_minutes: 10,
                    practice_type: "breathing".into(),
                    content_type: "audio".into(),
                })
                .collect(),
            has_questionnaires: false,
            has_journals: false,
            starts_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            ends_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status: ProgramStatus::Active,
            pre_questionnaire_done: false,
            post_questionnaire_done: false,
            completed: false,
        }
    }

    /// Answers every lookup for the wrong session.
    struct ConfusedApi(ProgramRecord);

    #[async_trait]
    impl ProgramApi for ConfusedApi {
        async fn list_programs(&self) -> Result<Vec<ProgramRecord>, ApiError> {
            Ok(vec![self.0.clone()])
        }

        async fn get_program(&self, _id: ProgramId) -> Result<ProgramRecord, ApiError> {
            Ok(self.0.clone())
        }

        async fn get_completion_info(
            &self,
            session_id: SessionId,
        ) -> Result<CompletionInfo, ApiError> {
            Ok(CompletionInfo {
                session_id: SessionId::new(session_id.value() + 1),
                completed: true,
                completed_at: None,
            })
        }
    }

    #[tokio::test]
    async fn load_snapshot_looks_up_every_session_once() {
        let api = InMemoryProgramApi::new();
        api.upsert_program(record(1, 5)).unwrap();
        api.set_completed(SessionId::new(101), true).unwrap();
        api.set_completed(SessionId::new(102), true).unwrap();

        let service =
            ProgramService::new(fixed_clock(), Arc::new(api.clone())).with_fetch_concurrency(2);
        let snapshot = service.load_snapshot(ProgramId::new(1)).await.unwrap();

        assert_eq!(api.completion_lookups(), 5);
        let done: Vec<bool> = snapshot
            .program
            .sessions()
            .iter()
            .map(|s| s.is_completed())
            .collect();
        assert_eq!(done, vec![true, true, false, false, false]);
        assert_eq!(snapshot.fetched_at, fixed_clock().now());
    }

    #[tokio::test]
    async fn load_snapshot_rejects_mismatched_completion() {
        let service = ProgramService::new(fixed_clock(), Arc::new(ConfusedApi(record(3, 2))));
        let err = service.load_snapshot(ProgramId::new(3)).await.unwrap_err();
        assert!(matches!(
            err,
            ProgramServiceError::MismatchedCompletionInfo { .. }
        ));
    }

    #[tokio::test]
    async fn missing_program_is_not_found() {
        let service = ProgramService::new(fixed_clock(), Arc::new(InMemoryProgramApi::new()));
        let err = service.load_snapshot(ProgramId::new(404)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn lists_split_open_and_closed_programs() {
        let api = InMemoryProgramApi::new();
        api.upsert_program(record(1, 2)).unwrap();
        let mut finalized = record(2, 2);
        finalized.status = ProgramStatus::Finalized;
        api.upsert_program(finalized).unwrap();
        let mut finished = record(3, 2);
        finished.completed = true;
        api.upsert_program(finished).unwrap();

        let service = ProgramService::new(fixed_clock(), Arc::new(api));

        let assigned = service.list_assigned().await.unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, ProgramId::new(1));

        let completed: Vec<ProgramId> = service
            .list_completed()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(completed, vec![ProgramId::new(2), ProgramId::new(3)]);
    }
}
