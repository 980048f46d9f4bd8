use crate::intake::{FileId, UploadedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartProgress {
        file_id: FileId,
    },
    RequestExplanation {
        submission: u64,
        prompt: String,
        file: UploadedFile,
    },
    NotifyRemoved {
        file_id: FileId,
        name: String,
    },
}
