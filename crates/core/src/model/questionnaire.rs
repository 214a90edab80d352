use serde::{Deserialize, Serialize};

/// Which assessment a participant is being asked to fill in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionnaireKind {
    Pre,
    Post,
}

/// Completion flags for the pre/post questionnaires of one enrollment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireStatus {
    pub pre_done: bool,
    pub post_done: bool,
}

impl QuestionnaireStatus {
    #[must_use]
    pub fn new(pre_done: bool, post_done: bool) -> Self {
        Self {
            pre_done,
            post_done,
        }
    }
}
