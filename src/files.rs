use serde::{Deserialize, Serialize};

/// Opaque reference to a user-selected file (a content URI on device).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef(pub String);

impl FileRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Platform file picker. `None` when the user backs out.
pub trait FilePicker: Send + Sync {
    fn pick(&self) -> Option<FileRef>;
}

/// Picker for hosts without file access.
pub struct NoFilePicker;

impl FilePicker for NoFilePicker {
    fn pick(&self) -> Option<FileRef> {
        None
    }
}

/// Picker that always returns the same selection.
pub struct StaticFilePicker {
    selection: Option<FileRef>,
}

impl StaticFilePicker {
    pub fn new(selection: Option<FileRef>) -> Self {
        Self { selection }
    }
}

impl FilePicker for StaticFilePicker {
    fn pick(&self) -> Option<FileRef> {
        self.selection.clone()
    }
}
