use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mindful_core::model::{ProgramId, SessionId};

use super::{CompletionInfo, ProgramApi, ProgramRecord};
use crate::error::ApiError;

/// Simple in-memory backend for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgramApi {
    programs: Arc<Mutex<BTreeMap<ProgramId, ProgramRecord>>>,
    completion: Arc<Mutex<HashMap<SessionId, CompletionInfo>>>,
    completion_lookups: Arc<AtomicUsize>,
}

impl InMemoryProgramApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a program record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the store lock is poisoned.
    pub fn upsert_program(&self, record: ProgramRecord) -> Result<(), ApiError> {
        let mut guard = self
            .programs
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        guard.insert(record.id, record);
        Ok(())
    }

    /// Record whether the participant completed `session_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unavailable` if the store lock is poisoned.
    pub fn set_completed(&self, session_id: SessionId, completed: bool) -> Result<(), ApiError> {
        let mut guard = self
            .completion
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        guard.insert(
            session_id,
            CompletionInfo {
                session_id,
                completed,
                completed_at: None,
            },
        );
        Ok(())
    }

    /// Number of `get_completion_info` calls served so far.
    #[must_use]
    pub fn completion_lookups(&self) -> usize {
        self.completion_lookups.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ProgramApi for InMemoryProgramApi {
    async fn list_programs(&self) -> Result<Vec<ProgramRecord>, ApiError> {
        let guard = self
            .programs
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }

    async fn get_program(&self, id: ProgramId) -> Result<ProgramRecord, ApiError> {
        let guard = self
            .programs
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        guard
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("programs/{id}")))
    }

    async fn get_completion_info(
        &self,
        session_id: SessionId,
    ) -> Result<CompletionInfo, ApiError> {
        self.completion_lookups.fetch_add(1, Ordering::Relaxed);
        let guard = self
            .completion
            .lock()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;
        // Sessions the participant never touched have no stored fact yet.
        Ok(guard.get(&session_id).cloned().unwrap_or(CompletionInfo {
            session_id,
            completed: false,
            completed_at: None,
        }))
    }
}
