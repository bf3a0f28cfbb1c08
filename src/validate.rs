//! Go/no-go checks run before any tag or release is written

use crate::domain::{
    derive_aliases, is_duplicate_release, is_semver_bump, release_exists, ReleaseRecord, SemVer,
    TagVersion,
};
use crate::error::{ReleaseError, Result};
use crate::inputs::ActionInputs;

/// Check caller inputs and return the validated version.
///
/// Rejects an empty or prefixed version, anything that is not plain
/// `MAJOR.MINOR.PATCH`, an empty sha and blank file entries.
pub fn validate_inputs(inputs: &ActionInputs) -> Result<SemVer> {
    let number = inputs.version_number.as_str();

    if number.is_empty() {
        return Err(ReleaseError::invalid_input("Version number is required."));
    }
    if number.starts_with(['v', 'V']) {
        return Err(ReleaseError::invalid_input(format!(
            "Version '{}' must not include the 'v' prefix.",
            number
        )));
    }

    let parsed = semver::Version::parse(number).map_err(|e| {
        ReleaseError::invalid_input(format!(
            "Version '{}' is not a valid SemVer version: {}",
            number, e
        ))
    })?;
    if !parsed.pre.is_empty() {
        return Err(ReleaseError::invalid_input("Prerelease versions are not supported."));
    }
    if !parsed.build.is_empty() {
        return Err(ReleaseError::invalid_input("Build metadata is not supported."));
    }

    if inputs.sha.trim().is_empty() {
        return Err(ReleaseError::invalid_input("Commit sha is required."));
    }

    if let Some(position) = inputs.files.iter().position(|f| f.trim().is_empty()) {
        return Err(ReleaseError::invalid_input(format!(
            "File entry {} is blank.",
            position + 1
        )));
    }

    let version = SemVer::parse(number)?;
    derive_aliases(&version)?;
    Ok(version)
}

/// Judge the proposed release against what already exists.
///
/// Returns [`ReleaseError::DuplicateRelease`] when this exact version and
/// commit were already released, which callers treat as a no-op. A release of
/// the same version from another commit, or a version that is not a single
/// bump above existing history, is a [`ReleaseError::Conflict`].
pub fn validate_github_state(
    patch: &TagVersion,
    releases: &[ReleaseRecord],
    sha: &str,
) -> Result<()> {
    if is_duplicate_release(patch, releases, sha) {
        return Err(ReleaseError::duplicate(format!(
            "Release {} already exists for this sha. Exiting without creating a release.",
            patch.number
        )));
    }

    if release_exists(patch, releases) {
        return Err(ReleaseError::conflict(format!(
            "Release {} already exists for a different commit",
            patch.number
        )));
    }

    if !is_semver_bump(patch, releases) {
        return Err(ReleaseError::conflict(format!(
            "Version '{}' is not a valid SemVer bump of an existing Release",
            patch.number
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TagRef;

    fn inputs(version: &str, sha: &str, files: &[&str]) -> ActionInputs {
        ActionInputs {
            version_number: version.to_string(),
            sha: sha.to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
            ..Default::default()
        }
    }

    fn existing() -> Vec<ReleaseRecord> {
        vec![ReleaseRecord::new("v1.0.0", None)]
    }

    #[test]
    fn test_validate_inputs_accepts_plain_version() {
        let version = validate_inputs(&inputs("1.0.1", "fake-sha", &["a.txt"])).unwrap();
        assert_eq!(version, SemVer::new(1, 0, 1));
    }

    #[test]
    fn test_validate_inputs_minor_without_successor() {
        let err =
            validate_inputs(&inputs("1.18446744073709551615.0", "fake-sha", &[])).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidInput(_)));
        assert!(err.to_string().contains("no next minor version"));
    }

    #[test]
    fn test_validate_inputs_empty_version() {
        let err = validate_inputs(&inputs("", "fake-sha", &[])).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_inputs_v_prefix() {
        assert!(validate_inputs(&inputs("v1.0.0", "fake-sha", &[])).is_err());
    }

    #[test]
    fn test_validate_inputs_other_prefix() {
        assert!(validate_inputs(&inputs("r1.0.0", "fake-sha", &[])).is_err());
    }

    #[test]
    fn test_validate_inputs_prerelease() {
        let err = validate_inputs(&inputs("1.0.1-test", "fake-sha", &[])).unwrap_err();
        assert!(err.to_string().contains("Prerelease versions are not supported."));
    }

    #[test]
    fn test_validate_inputs_build_metadata() {
        let err = validate_inputs(&inputs("1.0.1+ci.4", "fake-sha", &[])).unwrap_err();
        assert!(err.to_string().contains("Build metadata"));
    }

    #[test]
    fn test_validate_inputs_empty_sha() {
        assert!(validate_inputs(&inputs("1.0.1", "", &[])).is_err());
        assert!(validate_inputs(&inputs("1.0.1", "   ", &[])).is_err());
    }

    #[test]
    fn test_validate_inputs_blank_file_entry() {
        let err = validate_inputs(&inputs("1.0.1", "fake-sha", &["a.txt", "  "])).unwrap_err();
        assert!(err.to_string().contains("File entry 2"));
    }

    #[test]
    fn test_validate_github_state_valid_bump() {
        let patch = TagVersion::new("1.0.1");
        assert!(validate_github_state(&patch, &existing(), "fake-sha").is_ok());
    }

    #[test]
    fn test_validate_github_state_initial_versions() {
        for number in ["0.0.0", "0.0.1", "0.1.0", "1.0.0"] {
            let patch = TagVersion::new(number);
            assert!(
                validate_github_state(&patch, &[], "fake-sha").is_ok(),
                "{} should be a valid first release",
                number
            );
        }
    }

    #[test]
    fn test_validate_github_state_not_a_bump() {
        let err = validate_github_state(&TagVersion::new("1.0.2"), &[], "aaa").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Version '1.0.2' is not a valid SemVer bump of an existing Release"
        );

        let err = validate_github_state(&TagVersion::new("0.0.2"), &[], "aaa").unwrap_err();
        assert!(err.to_string().contains("not a valid SemVer bump"));
    }

    #[test]
    fn test_validate_github_state_duplicate() {
        let patch = TagVersion::new("1.0.0").with_ref(Some(TagRef::for_tag("v1.0.0", "aaa")));
        let releases = vec![ReleaseRecord::new("v1.0.0", Some("refs/tags/v1.0.0"))];

        let err = validate_github_state(&patch, &releases, "aaa").unwrap_err();
        assert!(err.is_duplicate());
    }

    #[test]
    fn test_validate_github_state_different_commit() {
        let patch = TagVersion::new("1.0.0");
        let err = validate_github_state(&patch, &existing(), "aaa").unwrap_err();
        assert!(!err.is_duplicate());
        assert_eq!(
            err.to_string(),
            "Release 1.0.0 already exists for a different commit"
        );
    }

    #[test]
    fn test_validate_github_state_same_ref_other_sha() {
        let patch = TagVersion::new("1.0.0").with_ref(Some(TagRef::for_tag("v1.0.0", "old")));
        let releases = vec![ReleaseRecord::new("v1.0.0", Some("refs/tags/v1.0.0"))];

        let err = validate_github_state(&patch, &releases, "new").unwrap_err();
        assert!(matches!(err, ReleaseError::Conflict(_)));
        assert!(err.to_string().contains("already exists for a different commit"));
    }
}
