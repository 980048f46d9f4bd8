use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Percentage added to a file's cosmetic progress per timer tick.
pub const PROGRESS_STEP: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub id: FileId,
    pub file: UploadedFile,
    pub preview: Option<String>,
    pub progress: u8,
    pub error: Option<String>,
    pub success: bool,
}

impl SelectedFile {
    pub fn is_finished(&self) -> bool {
        self.success || self.progress >= 100
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeState {
    max_files: usize,
    files: Vec<SelectedFile>,
    prompt: String,
    result: Option<String>,
    loading: bool,
    error: Option<String>,
    next_file_id: u64,
    submission: u64,
}

impl Default for IntakeState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IntakeState {
    pub fn new(max_files: usize) -> Self {
        Self {
            max_files,
            files: Vec::new(),
            prompt: String::new(),
            result: None,
            loading: false,
            error: None,
            next_file_id: 1,
            submission: 0,
        }
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> Option<&SelectedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submission(&self) -> u64 {
        self.submission
    }

    /// True while the cosmetic progress timer for `id` should keep running.
    pub fn is_tracking(&self, id: FileId) -> bool {
        self.file(id).is_some_and(|f| !f.is_finished())
    }

    pub fn view(&self) -> IntakeView {
        IntakeView {
            files: self.files.iter().map(FileView::from).collect(),
            prompt: self.prompt.clone(),
            result: self.result.clone(),
            loading: self.loading,
            error: self.error.clone(),
            accepted_count: self.files.iter().filter(|f| f.error.is_none()).count(),
            max_files: self.max_files,
        }
    }

    pub(crate) fn has_room(&self) -> bool {
        self.files.len() < self.max_files
    }

    pub(crate) fn push_file(&mut self, file: UploadedFile, preview: Option<String>) -> FileId {
        let id = FileId(self.next_file_id);
        self.next_file_id += 1;
        self.files.push(SelectedFile {
            id,
            file,
            preview,
            progress: 0,
            error: None,
            success: false,
        });
        id
    }

    pub(crate) fn advance_progress(&mut self, id: FileId) {
        if let Some(entry) = self.files.iter_mut().find(|f| f.id == id) {
            if entry.success {
                return;
            }
            entry.progress = entry.progress.saturating_add(PROGRESS_STEP).min(100);
            if entry.progress == 100 {
                entry.success = true;
            }
        }
    }

    pub(crate) fn remove_file(&mut self, id: FileId) -> Option<SelectedFile> {
        let index = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(index))
    }

    pub(crate) fn set_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Marks the widget busy and returns the new submission number.
    pub(crate) fn begin_submission(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        self.submission += 1;
        self.submission
    }

    pub(crate) fn finish_submission(&mut self, outcome: Result<String, String>) {
        self.loading = false;
        match outcome {
            Ok(text) => {
                self.result = Some(text);
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.files.clear();
        self.prompt.clear();
        self.result = None;
        self.error = None;
        self.loading = false;
        // Answers still in flight belong to the cleared widget.
        self.submission += 1;
    }
}

/// Serializable snapshot for the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeView {
    pub files: Vec<FileView>,
    pub prompt: String,
    pub result: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub accepted_count: usize,
    pub max_files: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileView {
    pub id: FileId,
    pub name: String,
    pub media_type: String,
    pub size: usize,
    pub preview: Option<String>,
    pub progress: u8,
    pub error: Option<String>,
    pub success: bool,
}

impl From<&SelectedFile> for FileView {
    fn from(entry: &SelectedFile) -> Self {
        Self {
            id: entry.id,
            name: entry.file.name.clone(),
            media_type: entry.file.media_type.clone(),
            size: entry.file.bytes.len(),
            preview: entry.preview.clone(),
            progress: entry.progress,
            error: entry.error.clone(),
            success: entry.success,
        }
    }
}
