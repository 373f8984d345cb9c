//! Capture module for device screenshots and template matching
//!
//! Both collaborators are external programs. They are reached through the
//! `ScreenSource` and `TemplateMatcher` traits so the session can be driven
//! by fakes in tests.

pub mod device;
pub mod matcher;

pub use device::{AdbScreenSource, ScreenSource};
pub use matcher::{CommandMatcher, TemplateMatcher};

use log::debug;
use std::process::{Command, Output};

use crate::error::{LabelerError, Result};

/// Run an external tool to completion, treating spawn failures and non-zero
/// exit codes as `ExternalTool` errors.
fn run_tool(program: &str, args: &[&str]) -> Result<Output> {
    debug!("Running {} {:?}", program, args);

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| LabelerError::external(program, format!("failed to run: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LabelerError::external(
            program,
            format!("{} {}", output.status, stderr.trim()),
        ));
    }

    Ok(output)
}
