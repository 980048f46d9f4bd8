//! Intake widget: pure selection state machine driven by messages.
mod effect;
mod msg;
mod state;
mod update;

pub use effect::Effect;
pub use msg::{CandidateFile, Msg};
pub use state::{
    FileId, FileView, IntakeState, IntakeView, SelectedFile, UploadedFile, PROGRESS_STEP,
};
pub use update::update;
