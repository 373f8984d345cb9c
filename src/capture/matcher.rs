//! Template matching through an external program.
//!
//! The program is called as `<matcher> <screenshot> <template>` and prints
//! two lines: a score or status, then the path of an image showing the
//! matched region. An empty second line, `None` or `null` means no match.

use log::{debug, warn};
use std::path::{Path, PathBuf};

use super::run_tool;
use crate::error::Result;

/// What the matcher reported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchOutcome {
    pub status: String,
    pub region_image: Option<PathBuf>,
}

impl MatchOutcome {
    pub fn not_found(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            region_image: None,
        }
    }

    #[cfg(test)]
    pub fn is_match(&self) -> bool {
        self.region_image.is_some()
    }
}

pub trait TemplateMatcher {
    fn find(&self, screenshot: &Path, template: &Path) -> Result<MatchOutcome>;
}

#[derive(Debug, Clone)]
pub struct CommandMatcher {
    program: String,
    leading_args: Vec<String>,
}

impl CommandMatcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Matcher invoked with extra arguments before the two paths
    #[cfg(test)]
    pub fn with_args(program: impl Into<String>, leading_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }
}

impl TemplateMatcher for CommandMatcher {
    fn find(&self, screenshot: &Path, template: &Path) -> Result<MatchOutcome> {
        if !template.exists() {
            warn!("Template {:?} is missing, nothing to match", template);
            return Ok(MatchOutcome::not_found("template missing"));
        }

        let screenshot = screenshot.to_string_lossy();
        let template = template.to_string_lossy();
        let mut args: Vec<&str> = self.leading_args.iter().map(String::as_str).collect();
        args.push(&*screenshot);
        args.push(&*template);

        let output = run_tool(&self.program, &args)?;
        let outcome = parse_match_output(&String::from_utf8_lossy(&output.stdout));
        debug!("Matcher reported {:?}", outcome);
        Ok(outcome)
    }
}

fn parse_match_output(stdout: &str) -> MatchOutcome {
    let mut lines = stdout.lines().map(str::trim);
    let status = lines.next().unwrap_or_default().to_string();
    let region_image = lines
        .next()
        .filter(|line| !line.is_empty() && *line != "None" && *line != "null")
        .map(PathBuf::from);

    MatchOutcome {
        status,
        region_image,
    }
}
