mod program_list_vm;
mod program_vm;
mod progress_vm;
mod rich_text_vm;
mod time_fmt;

pub use program_list_vm::{
    ProgramCardVm, load_assigned_programs, load_completed_programs, map_program_card,
    map_program_cards,
};
pub use program_vm::{
    ProgramDetailVm, QuestionnairePromptVm, SessionCardVm, apply_replay_mode,
    load_program_detail, map_program_detail,
};
pub use progress_vm::{ProgressVm, map_progress};
pub use rich_text_vm::{description_to_html, description_to_text};
