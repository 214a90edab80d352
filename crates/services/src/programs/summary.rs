use chrono::NaiveDate;

use mindful_core::model::{ProgramId, ProgramStatus};

use crate::api::ProgramRecord;

/// Presentation-agnostic list item for a program.
///
/// Built from the program record alone; no per-session lookups are made for
/// list screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSummary {
    pub id: ProgramId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProgramStatus,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub session_count: usize,
    pub finished: bool,
}

impl ProgramSummary {
    #[must_use]
    pub fn from_record(record: &ProgramRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.trim().to_owned(),
            description: record
                .description
                .as_deref()
                .map(str::trim)
                .filter(|desc| !desc.is_empty())
                .map(str::to_owned),
            status: record.status,
            starts_on: record.starts_on,
            ends_on: record.ends_on,
            session_count: record.sessions.len(),
            finished: record.completed,
        }
    }

    /// Finalized by the backend or finished by the participant.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == ProgramStatus::Finalized || self.finished
    }
}
