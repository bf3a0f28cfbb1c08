//! Caller-supplied inputs for one release run and the helpers that turn raw
//! CI strings into them.

use crate::error::{ReleaseError, Result};
use std::fs;
use std::path::Path;

/// Everything the caller asks of a single run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionInputs {
    /// Bare SemVer, without the "v" prefix
    pub version_number: String,
    /// Commit being released
    pub sha: String,
    /// Asset paths, uploaded in order
    pub files: Vec<String>,
    /// Release notes
    pub body: String,
    /// Stop after validation without touching tags or releases
    pub validate_only: bool,
}

/// Split a newline-delimited file list on CR and LF, dropping empty entries.
///
/// Order and duplicates are kept.
pub fn parse_file_list(raw: &str) -> Vec<String> {
    raw.split(['\r', '\n'])
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a CI boolean input: "true" or "false" in any case, empty meaning false.
pub fn parse_bool_input(input: &str) -> Result<bool> {
    if input.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if input.is_empty() || input.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ReleaseError::invalid_input(format!(
            "Input string must be 'true' or 'false', got '{}'",
            input
        )))
    }
}

/// Read a version number from a file, trimming surrounding whitespace
pub fn read_version_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let contents = fs::read_to_string(path.as_ref())?;
    Ok(contents.trim().to_string())
}
