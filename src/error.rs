//! Error types shared by the session, the element store and the capture
//! collaborators.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LabelerError>;

#[derive(Debug, thiserror::Error)]
pub enum LabelerError {
    /// The element name was empty or only whitespace.
    #[error("Element name must not be empty")]
    Validation,

    #[error("No selection to save, drag a rectangle over the screenshot first")]
    NoSelection,

    #[error("No screenshot is loaded")]
    NoSource,

    /// The template matcher did not return a region.
    #[error("Element not found on the current screen")]
    NotFound,

    #[error("No element at index {0}")]
    IndexOutOfRange(usize),

    #[error("Another capture is still running")]
    Busy,

    #[error("{program} failed: {reason}")]
    ExternalTool { program: String, reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image error on {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl LabelerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }

    pub fn external(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExternalTool {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Notices the operator can act on, shown as warnings instead of errors.
    pub fn is_notice(&self) -> bool {
        matches!(
            self,
            Self::Validation | Self::NoSelection | Self::NotFound | Self::Busy
        )
    }
}
