//! Application configuration
//!
//! Defaults are compiled in. A few paths and programs can be overridden
//! through environment variables, there is no config file.

use std::env;
use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "ELEMENT_LABELER_DATA_DIR";
pub const ADB_VAR: &str = "ELEMENT_LABELER_ADB";
pub const MATCHER_VAR: &str = "ELEMENT_LABELER_MATCHER";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Canvas area the screenshot is fitted into
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Preview pane size for the current crop
    pub preview_width: u32,
    pub preview_height: u32,
    /// Selections whose shorter side is below this (canvas pixels) are dropped
    pub min_selection_side: f64,
    /// Root of `screenshots/` and `input/element_image/`
    pub data_dir: PathBuf,
    /// Device bridge executable
    pub adb_program: String,
    /// Screenshot path on the device
    pub device_screenshot_path: String,
    /// Template matching executable
    pub matcher_program: String,
    /// Identifier used when name translation is unavailable
    pub placeholder_identifier: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 470,
            canvas_height: 1000,
            preview_width: 300,
            preview_height: 300,
            min_selection_side: 20.0,
            data_dir: PathBuf::from("data"),
            adb_program: "adb".to_string(),
            device_screenshot_path: "/sdcard/screenshot.png".to_string(),
            matcher_program: "template-match".to_string(),
            placeholder_identifier: "button".to_string(),
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = non_empty(DATA_DIR_VAR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(adb) = non_empty(ADB_VAR) {
            self.adb_program = adb;
        }
        if let Some(matcher) = non_empty(MATCHER_VAR) {
            self.matcher_program = matcher;
        }
        self
    }

    /// Local copy of the latest device screenshot
    pub fn screenshot_file(&self) -> PathBuf {
        self.data_dir.join("screenshots").join("screenshot.png")
    }

    /// Root that element image relative paths are resolved against
    pub fn input_dir(&self) -> PathBuf {
        self.data_dir.join("input")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!((config.canvas_width, config.canvas_height), (470, 1000));
        assert_eq!(config.min_selection_side, 20.0);
        assert_eq!(
            config.screenshot_file(),
            PathBuf::from("data/screenshots/screenshot.png")
        );
        assert_eq!(config.input_dir(), PathBuf::from("data/input"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(|key| match key {
            DATA_DIR_VAR => Some("/tmp/labels".to_string()),
            MATCHER_VAR => Some("my-matcher".to_string()),
            ADB_VAR => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.data_dir, PathBuf::from("/tmp/labels"));
        assert_eq!(config.matcher_program, "my-matcher");
        assert_eq!(config.adb_program, "adb");
    }
}
