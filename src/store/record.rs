use image::RgbaImage;
use std::path::PathBuf;

/// A saved element image
#[derive(Debug, Clone)]
pub struct ElementRecord {
    pub display_name: String,
    pub identifier: String,
    pub file_name: String,
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
    pub image: RgbaImage,
}

impl ElementRecord {
    /// Text shown in the element list
    pub fn list_label(&self) -> String {
        format!("{} {}", self.display_name, self.identifier)
    }

    /// Code fragment that clicks this element in an automation script
    pub fn code_snippet(&self) -> String {
        format!(
            "{} = click_image(Image.open(\"{}\"))",
            self.identifier,
            self.absolute_path.display()
        )
    }
}
