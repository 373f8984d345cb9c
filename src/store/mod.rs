//! Element store
//!
//! The ordered, in-memory list of saved elements and the image files that
//! back them. The list itself is not persisted.

pub mod layout;
pub mod naming;
pub mod record;

pub use layout::StorageLayout;
pub use naming::{identifier_for, NameTranslator, PlaceholderTranslator};
pub use record::ElementRecord;

use chrono::NaiveDateTime;
use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;

use crate::error::{LabelerError, Result};
use crate::selection::{crop, SourceBox};

/// Rejects names that are empty or whitespace only
pub fn validate_name(display_name: &str) -> Result<&str> {
    if display_name.trim().is_empty() {
        return Err(LabelerError::Validation);
    }
    Ok(display_name)
}

#[derive(Debug)]
pub struct ElementStore {
    layout: StorageLayout,
    records: Vec<ElementRecord>,
}

impl ElementStore {
    pub fn new(layout: StorageLayout) -> Self {
        Self {
            layout,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[ElementRecord] {
        &self.records
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&ElementRecord> {
        self.records
            .get(index)
            .ok_or(LabelerError::IndexOutOfRange(index))
    }

    /// Crop `source_box` out of `source`, write it as PNG and append the
    /// record.
    pub fn save(
        &mut self,
        display_name: &str,
        identifier: &str,
        source: &RgbaImage,
        source_box: &SourceBox,
        at: &NaiveDateTime,
    ) -> Result<&ElementRecord> {
        let display_name = validate_name(display_name)?;
        let image = crop(source, source_box);
        let location = self.layout.locate(identifier, at);

        let directory = location.directory();
        fs::create_dir_all(directory).map_err(|e| LabelerError::io(directory, e))?;
        image
            .save_with_format(&location.absolute_path, ImageFormat::Png)
            .map_err(|e| LabelerError::image(&location.absolute_path, e))?;

        info!(
            "Saved element {:?} to {:?}",
            display_name, location.absolute_path
        );

        self.records.push(ElementRecord {
            display_name: display_name.to_string(),
            identifier: identifier.to_string(),
            file_name: location.file_name,
            relative_path: location.relative_path,
            absolute_path: location.absolute_path,
            image,
        });
        self.get(self.records.len() - 1)
    }

    /// Remove the record and its file. A file that is already gone is fine.
    pub fn delete(&mut self, index: usize) -> Result<ElementRecord> {
        let path = self.get(index)?.absolute_path.clone();

        match fs::remove_file(&path) {
            Ok(()) => debug!("Removed {:?}", path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{:?} was already removed", path)
            }
            Err(e) => return Err(LabelerError::io(path, e)),
        }

        let record = self.records.remove(index);
        info!("Deleted element {:?}", record.display_name);
        Ok(record)
    }

    pub fn export_snippet(&self, index: usize) -> Result<String> {
        Ok(self.get(index)?.code_snippet())
    }
}
