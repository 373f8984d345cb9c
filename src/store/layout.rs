//! On-disk layout of element images.
//!
//! `<input>/element_image/<YYYY>/<MM>/<HHMMSS>_<identifier>.png`

use chrono::NaiveDateTime;
use log::warn;
use std::path::{self, Path, PathBuf};

const ELEMENT_DIR: &str = "element_image";

/// Where one element image lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementLocation {
    pub file_name: String,
    /// Relative to the input directory
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
}

impl ElementLocation {
    pub fn directory(&self) -> &Path {
        self.absolute_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

#[derive(Debug, Clone)]
pub struct StorageLayout {
    input_dir: PathBuf,
}

impl StorageLayout {
    /// Relative input directories are resolved against the working
    /// directory, record paths are always absolute.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        let input_dir = path::absolute(&input_dir).unwrap_or_else(|e| {
            warn!("Could not resolve {:?}: {}", input_dir, e);
            input_dir.clone()
        });
        Self { input_dir }
    }

    /// Location for an element saved at `at`. When a file with that name
    /// already exists a `_<n>` suffix is added so records never share a file.
    pub fn locate(&self, identifier: &str, at: &NaiveDateTime) -> ElementLocation {
        let stem = format!("{}_{}", at.format("%H%M%S"), file_safe(identifier));
        let relative_dir = PathBuf::from(ELEMENT_DIR)
            .join(at.format("%Y").to_string())
            .join(at.format("%m").to_string());
        let absolute_dir = self.input_dir.join(&relative_dir);

        let mut file_name = format!("{}.png", stem);
        let mut n = 1;
        while absolute_dir.join(&file_name).exists() {
            file_name = format!("{}_{}.png", stem, n);
            n += 1;
        }

        ElementLocation {
            relative_path: relative_dir.join(&file_name),
            absolute_path: absolute_dir.join(&file_name),
            file_name,
        }
    }
}

/// Identifiers are free-form, path separators would escape the directory.
fn file_safe(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}
