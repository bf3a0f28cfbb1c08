use std::fmt;

/// Non-fatal outcomes of a release run that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseNotice {
    /// The version was already released from the same commit
    DuplicateRelease { version: String, sha: String },
    /// Validation passed and the run was asked to stop there
    ValidationOnly { version: String },
    /// A newer minor line already has a tag, so the major alias stays put
    MajorAliasHeld {
        major_tag: String,
        next_minor_tag: String,
    },
}

impl ReleaseNotice {
    /// Whether the notice ends the run without publishing
    pub fn is_skip(&self) -> bool {
        !matches!(self, ReleaseNotice::MajorAliasHeld { .. })
    }
}

impl fmt::Display for ReleaseNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseNotice::DuplicateRelease { version, sha } => {
                let short_sha: String = sha.chars().take(7).collect();
                write!(
                    f,
                    "Release {} already exists for commit {}. Exiting without creating a release.",
                    version, short_sha
                )
            }
            ReleaseNotice::ValidationOnly { .. } => {
                write!(f, "Validation successful. Exiting without creating a release.")
            }
            ReleaseNotice::MajorAliasHeld {
                major_tag,
                next_minor_tag,
            } => write!(
                f,
                "Tag {} exists, leaving major alias {} on the newer minor line",
                next_minor_tag, major_tag
            ),
        }
    }
}
