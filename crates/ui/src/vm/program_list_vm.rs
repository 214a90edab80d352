use chrono::NaiveDate;
use mindful_core::model::{ProgramId, ProgramStatus};
use services::{ProgramService, ProgramSummary};

use crate::error::ViewError;
use crate::vm::rich_text_vm::description_to_text;
use crate::vm::time_fmt::format_window;

/// UI-ready card for the program lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgramCardVm {
    pub id: ProgramId,
    pub name: String,
    pub summary: Option<String>,
    pub window_label: String,
    pub sessions_label: String,
    pub status_label: &'static str,
}

fn status_label(summary: &ProgramSummary, today: NaiveDate) -> &'static str {
    if summary.finished {
        return "Completed";
    }
    match summary.status {
        ProgramStatus::Finalized => "Finalized",
        ProgramStatus::Active if today < summary.starts_on => "Upcoming",
        ProgramStatus::Active if today > summary.ends_on => "Enrollment closed",
        ProgramStatus::Active => "In progress",
    }
}

#[must_use]
pub fn map_program_card(summary: &ProgramSummary, today: NaiveDate) -> ProgramCardVm {
    let sessions_label = match summary.session_count {
        1 => "1 session".to_string(),
        n => format!("{n} sessions"),
    };

    ProgramCardVm {
        id: summary.id,
        name: summary.name.clone(),
        summary: summary
            .description
            .as_deref()
            .map(description_to_text)
            .and_then(|text| text.lines().next().map(str::to_owned)),
        window_label: format_window(summary.starts_on, summary.ends_on),
        sessions_label,
        status_label: status_label(summary, today),
    }
}

#[must_use]
pub fn map_program_cards(summaries: &[ProgramSummary], today: NaiveDate) -> Vec<ProgramCardVm> {
    summaries
        .iter()
        .map(|summary| map_program_card(summary, today))
        .collect()
}

/// # Errors
///
/// Returns `ViewError::Unknown` for service failures.
pub async fn load_assigned_programs(
    service: &ProgramService,
) -> Result<Vec<ProgramCardVm>, ViewError> {
    let summaries = service.list_assigned().await?;
    Ok(map_program_cards(&summaries, service.clock().today()))
}

/// # Errors
///
/// Returns `ViewError::Unknown` for service failures.
pub async fn load_completed_programs(
    service: &ProgramService,
) -> Result<Vec<ProgramCardVm>, ViewError> {
    let summaries = service.list_completed().await?;
    Ok(map_program_cards(&summaries, service.clock().today()))
}
