use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use mindful_core::model::{
    EnrollmentWindow, Program, ProgramError, ProgramId, ProgramStatus, QuestionnaireStatus,
    Session, SessionId,
};

/// Wire shape of `GET /programs/{id}`.
///
/// Sessions arrive without completion; that comes from one
/// `completion-info` lookup per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
    pub id: ProgramId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub has_questionnaires: bool,
    #[serde(default)]
    pub has_journals: bool,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: ProgramStatus,
    #[serde(default)]
    pub pre_questionnaire_done: bool,
    #[serde(default)]
    pub post_questionnaire_done: bool,
    /// The participant has finished the whole program.
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: SessionId,
    pub week: u32,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub practice_type: String,
    #[serde(default)]
    pub content_type: String,
}

/// Wire shape of `GET /sessions/{id}/completion-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInfo {
    pub session_id: SessionId,
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgramRecord {
    #[must_use]
    pub fn questionnaires(&self) -> QuestionnaireStatus {
        QuestionnaireStatus::new(self.pre_questionnaire_done, self.post_questionnaire_done)
    }

    /// Enrollment window, validated.
    ///
    /// # Errors
    ///
    /// Returns `ProgramError::InvalidWindow` if the dates are inverted.
    pub fn enrollment(&self) -> Result<EnrollmentWindow, ProgramError> {
        EnrollmentWindow::new(self.starts_on, self.ends_on)
    }

    /// Build a domain `Program`, marking sessions complete from `completion`.
    ///
    /// Sessions absent from `completion` are treated as not completed.
    ///
    /// # Errors
    ///
    /// Returns `ProgramError` if the record fails domain validation.
    pub fn to_program(
        &self,
        completion: &HashMap<SessionId, bool>,
    ) -> Result<Program, ProgramError> {
        let sessions = self
            .sessions
            .iter()
            .map(|record| {
                Session::new(
                    record.id,
                    self.id,
                    record.week,
                    record.duration_minutes,
                    record.practice_type.clone(),
                    record.content_type.clone(),
                )
                .with_completed(completion.get(&record.id).copied().unwrap_or(false))
            })
            .collect();

        Program::new(
            self.id,
            self.name.clone(),
            self.description.clone(),
            sessions,
            self.has_questionnaires,
            self.has_journals,
            self.enrollment()?,
            self.status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM_JSON: &str = r#"{
        "id": 12,
        "name": "Eight weeks of calm",
        "sessions": [
            {"id": 102, "week": 2, "durationMinutes": 30, "practiceType": "body-scan", "contentType": "audio"},
            {"id": 101, "week": 1, "durationMinutes": 20, "practiceType": "breathing", "contentType": "video"}
        ],
        "hasQuestionnaires": true,
        "startsOn": "2024-01-08",
        "endsOn": "2024-03-03",
        "status": "active",
        "preQuestionnaireDone": true
    }"#;

    #[test]
    fn decodes_camel_case_program() {
        let record: ProgramRecord = serde_json::from_str(PROGRAM_JSON).unwrap();
        assert_eq!(record.id, ProgramId::new(12));
        assert_eq!(record.description, None);
        assert!(!record.has_journals);
        assert!(!record.completed);
        assert_eq!(record.questionnaires(), QuestionnaireStatus::new(true, false));
        assert_eq!(record.sessions[0].practice_type, "body-scan");
    }

    #[test]
    fn to_program_applies_completion_and_orders_weeks() {
        let record: ProgramRecord = serde_json::from_str(PROGRAM_JSON).unwrap();
        let completion = HashMap::from([(SessionId::new(101), true)]);

        let program = record.to_program(&completion).unwrap();

        let sessions = program.sessions();
        assert_eq!(sessions[0].id(), SessionId::new(101));
        assert!(sessions[0].is_completed());
        assert!(!sessions[1].is_completed());
        assert_eq!(sessions[0].program_id(), ProgramId::new(12));
    }

    #[test]
    fn to_program_rejects_inverted_window() {
        let mut record: ProgramRecord = serde_json::from_str(PROGRAM_JSON).unwrap();
        std::mem::swap(&mut record.starts_on, &mut record.ends_on);
        let err = record.to_program(&HashMap::new()).unwrap_err();
        assert!(matches!(err, ProgramError::InvalidWindow { .. }));
    }

    #[test]
    fn decodes_completion_info() {
        let info: CompletionInfo =
            serde_json::from_str(r#"{"sessionId": 5, "completed": true}"#).unwrap();
        assert_eq!(info.session_id, SessionId::new(5));
        assert!(info.completed);
        assert_eq!(info.completed_at, None);
    }
}
