use mindful_core::CoreError;
use services::ProgramServiceError;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::NotFound => "This program is no longer available.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<ProgramServiceError> for ViewError {
    fn from(err: ProgramServiceError) -> Self {
        if err.is_not_found() {
            return Self::NotFound;
        }
        warn!(error = %err, "program view failed");
        Self::Unknown
    }
}

impl From<CoreError> for ViewError {
    fn from(err: CoreError) -> Self {
        warn!(error = %err, "program state could not be derived");
        Self::Unknown
    }
}
