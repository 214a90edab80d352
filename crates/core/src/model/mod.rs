mod ids;
mod program;
mod questionnaire;
mod session;

pub use ids::{ParseIdError, ProgramId, SessionId};

pub use program::{EnrollmentWindow, Program, ProgramError, ProgramStatus};
pub use questionnaire::{QuestionnaireKind, QuestionnaireStatus};
pub use session::Session;
