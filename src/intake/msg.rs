use crate::intake::{FileId, UploadedFile};

/// A file that passed the upload policy, with its preview already computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub file: UploadedFile,
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User dropped or picked files.
    FilesDropped(Vec<CandidateFile>),
    /// Cosmetic upload timer fired for one file.
    ProgressTick(FileId),
    /// User clicked the remove button on a file.
    RemoveFile(FileId),
    /// User edited the prompt box.
    PromptChanged(String),
    /// User clicked Submit.
    SubmitClicked,
    /// The explanation request for `submission` completed.
    ExplanationFinished {
        submission: u64,
        outcome: Result<String, String>,
    },
    /// User clicked Close Explanation.
    CloseClicked,
}
