use crate::error::{ReleaseError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Prefix applied to every version number to form its tag name
pub const TAG_PREFIX: &str = "v";

/// A validated release version: `MAJOR.MINOR.PATCH` with no prerelease or
/// build metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemVer(semver::Version);

impl SemVer {
    /// Create a new version from its components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemVer(semver::Version::new(major, minor, patch))
    }

    /// Parse a bare version number (e.g., "1.2.3")
    ///
    /// Rejects prefixes, prerelease segments and build metadata.
    pub fn parse(input: &str) -> Result<Self> {
        let version = semver::Version::parse(input).map_err(|e| {
            ReleaseError::version(format!("'{}' is not a valid SemVer version: {}", input, e))
        })?;

        if !version.pre.is_empty() {
            return Err(ReleaseError::version(format!(
                "'{}' has a prerelease segment",
                input
            )));
        }
        if !version.build.is_empty() {
            return Err(ReleaseError::version(format!(
                "'{}' has build metadata",
                input
            )));
        }

        Ok(SemVer(version))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}

/// The tag numbers derived from one release version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionAliasSet {
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub next_minor: String,
}

/// Derive the major, minor, patch and next-minor numbers from a version
///
/// Fails when the minor component has no successor.
///
/// # Example
/// ```
/// # use release_tagger::domain::{derive_aliases, SemVer};
/// let aliases = derive_aliases(&SemVer::new(1, 2, 3)).unwrap();
/// assert_eq!(aliases.major, "1");
/// assert_eq!(aliases.minor, "1.2");
/// assert_eq!(aliases.patch, "1.2.3");
/// assert_eq!(aliases.next_minor, "1.3");
/// ```
pub fn derive_aliases(version: &SemVer) -> Result<VersionAliasSet> {
    let next_minor = version.minor().checked_add(1).ok_or_else(|| {
        ReleaseError::invalid_input(format!("Version '{}' has no next minor version.", version))
    })?;

    Ok(VersionAliasSet {
        major: version.major().to_string(),
        minor: format!("{}.{}", version.major(), version.minor()),
        patch: version.to_string(),
        next_minor: format!("{}.{}", version.major(), next_minor),
    })
}

/// Tag name for a version or alias number ("1.2" -> "v1.2")
pub fn tag_name_for(number: &str) -> String {
    format!("{}{}", TAG_PREFIX, number)
}

/// Parse a release tag the way release lists spell them.
///
/// Leading whitespace, `=` and `v`/`V` are stripped before parsing. Prerelease
/// tags are accepted here since existing history may contain them.
pub fn parse_release_tag(tag: &str) -> Option<semver::Version> {
    let clean = tag
        .trim()
        .trim_start_matches('=')
        .trim_start_matches(['v', 'V']);
    semver::Version::parse(clean).ok()
}

/// Which component a version bumps, judged by its lowest non-zero component.
///
/// `0.0.0` counts as a patch bump.
pub fn increment_type(version: &str) -> Result<VersionBump> {
    let parsed = parse_release_tag(version).ok_or_else(|| {
        ReleaseError::version(format!("Invalid version: '{}'", version))
    })?;

    let bump = if parsed.patch > 0 {
        VersionBump::Patch
    } else if parsed.minor > 0 {
        VersionBump::Minor
    } else if parsed.major > 0 {
        VersionBump::Major
    } else {
        VersionBump::Patch
    };
    Ok(bump)
}

/// Increment a version by one step of `bump`.
///
/// A prerelease whose lower components are already zero is promoted to its
/// release version instead of being bumped again (`1.1.0-rc.1` + minor = `1.1.0`).
/// Returns `None` when the bumped component would overflow.
pub fn increment(version: &semver::Version, bump: VersionBump) -> Option<semver::Version> {
    let is_pre = !version.pre.is_empty();
    let mut next = semver::Version::new(version.major, version.minor, version.patch);

    match bump {
        VersionBump::Major => {
            if !is_pre || version.minor != 0 || version.patch != 0 {
                next.major = next.major.checked_add(1)?;
            }
            next.minor = 0;
            next.patch = 0;
        }
        VersionBump::Minor => {
            if !is_pre || version.patch != 0 {
                next.minor = next.minor.checked_add(1)?;
            }
            next.patch = 0;
        }
        VersionBump::Patch => {
            if !is_pre {
                next.patch = next.patch.checked_add(1)?;
            }
        }
    }
    Some(next)
}

/// SemVer precedence equality, ignoring build metadata
pub fn same_version(a: &semver::Version, b: &semver::Version) -> bool {
    a.cmp_precedence(b) == Ordering::Equal
}
