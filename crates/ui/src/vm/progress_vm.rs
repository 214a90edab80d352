use mindful_core::progress::{Progress, ProgressSnapshot};

use crate::vm::time_fmt::format_minutes;

/// UI-ready progress header for a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressVm {
    pub percent: u8,
    pub percent_label: String,
    pub steps_label: String,
    pub sessions_label: String,
    pub minutes_label: String,
    pub is_complete: bool,
}

#[must_use]
pub fn map_progress(snapshot: &ProgressSnapshot, progress: Progress) -> ProgressVm {
    let steps_label = if snapshot.has_questionnaires() {
        format!(
            "{} of {} steps (incl. questionnaires)",
            progress.completed, progress.total
        )
    } else {
        format!("{} of {} steps", progress.completed, progress.total)
    };

    ProgressVm {
        percent: progress.percent,
        percent_label: format!("{}%", progress.percent),
        steps_label,
        sessions_label: format!(
            "{}/{} sessions",
            snapshot.sessions_completed(),
            snapshot.total_sessions()
        ),
        minutes_label: format!("{} practiced", format_minutes(snapshot.minutes_completed())),
        is_complete: progress.is_complete(),
    }
}
