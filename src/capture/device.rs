//! Device screenshot acquisition over the Android debug bridge.

use log::info;
use std::fs;
use std::path::PathBuf;

use super::run_tool;
use crate::app::config::Config;
use crate::error::{LabelerError, Result};

/// Something that can produce a fresh screenshot as a PNG file
pub trait ScreenSource {
    fn capture(&self) -> Result<PathBuf>;
}

/// Takes the screenshot on the device with `screencap` and pulls it to a
/// fixed local path, overwriting the previous one.
#[derive(Debug, Clone)]
pub struct AdbScreenSource {
    program: String,
    device_path: String,
    local_path: PathBuf,
}

impl AdbScreenSource {
    pub fn new(
        program: impl Into<String>,
        device_path: impl Into<String>,
        local_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            device_path: device_path.into(),
            local_path: local_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.adb_program.clone(),
            config.device_screenshot_path.clone(),
            config.screenshot_file(),
        )
    }

    #[cfg(test)]
    pub fn local_path(&self) -> &std::path::Path {
        &self.local_path
    }
}

impl ScreenSource for AdbScreenSource {
    fn capture(&self) -> Result<PathBuf> {
        if let Some(parent) = self.local_path.parent() {
            fs::create_dir_all(parent).map_err(|e| LabelerError::io(parent, e))?;
        }

        run_tool(
            &self.program,
            &["shell", "screencap", "-p", self.device_path.as_str()],
        )?;

        let local = self.local_path.to_string_lossy();
        run_tool(&self.program, &["pull", self.device_path.as_str(), &*local])?;

        info!("Screenshot pulled to {:?}", self.local_path);
        Ok(self.local_path.clone())
    }
}
