//! Release state snapshot and the predicates that judge a proposed release
//! against existing history.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use super::version::{
    increment, increment_type, parse_release_tag, same_version, tag_name_for, VersionAliasSet,
};

/// Version numbers accepted as the very first release of a repository
pub const INITIAL_RELEASES: [&str; 4] = ["0.0.0", "0.0.1", "0.1.0", "1.0.0"];

/// The git object a tag ref currently points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    /// Full ref path, e.g. "refs/tags/v1.0.0"
    #[serde(rename = "ref")]
    pub ref_path: String,
    pub object: RefObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefObject {
    pub sha: String,
}

impl TagRef {
    /// Ref for `refs/tags/<tag_name>` pointing at `sha`
    pub fn for_tag(tag_name: &str, sha: impl Into<String>) -> Self {
        TagRef {
            ref_path: format!("refs/tags/{}", tag_name),
            object: RefObject { sha: sha.into() },
        }
    }
}

/// The fields of a published release that release validation looks at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub tag_name: String,
    #[serde(default)]
    pub target_commitish: Option<String>,
}

impl ReleaseRecord {
    pub fn new(tag_name: impl Into<String>, target_commitish: Option<&str>) -> Self {
        ReleaseRecord {
            tag_name: tag_name.into(),
            target_commitish: target_commitish.map(str::to_string),
        }
    }
}

/// One version or alias tag and its current ref, if the tag exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagVersion {
    /// Bare number ("1.2.3") or alias form ("1.2", "1")
    pub number: String,
    /// Tag name ("v1.2.3")
    pub name: String,
    pub tag_ref: Option<TagRef>,
}

impl TagVersion {
    pub fn new(number: impl Into<String>) -> Self {
        let number = number.into();
        TagVersion {
            name: tag_name_for(&number),
            number,
            tag_ref: None,
        }
    }

    pub fn with_ref(mut self, tag_ref: Option<TagRef>) -> Self {
        self.tag_ref = tag_ref;
        self
    }
}

/// Snapshot of the hosting platform for a single release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseState {
    pub releases: Vec<ReleaseRecord>,
    pub major: TagVersion,
    pub minor: TagVersion,
    pub patch: TagVersion,
    pub next_minor: TagVersion,
}

impl ReleaseState {
    /// Build a state with no refs resolved yet
    pub fn new(aliases: &VersionAliasSet, releases: Vec<ReleaseRecord>) -> Self {
        ReleaseState {
            releases,
            major: TagVersion::new(aliases.major.clone()),
            minor: TagVersion::new(aliases.minor.clone()),
            patch: TagVersion::new(aliases.patch.clone()),
            next_minor: TagVersion::new(aliases.next_minor.clone()),
        }
    }
}

/// Whether a release for `version` already exists.
///
/// A release matches when its tag is the same SemVer as `version.number` and
/// its `target_commitish` equals the ref path of the version's current tag
/// (both absent also counts as equal).
pub fn release_exists(version: &TagVersion, releases: &[ReleaseRecord]) -> bool {
    let Some(wanted) = parse_release_tag(&version.number) else {
        return false;
    };
    let ref_path = version.tag_ref.as_ref().map(|r| r.ref_path.as_str());

    releases.iter().any(|release| {
        let Some(tag) = parse_release_tag(&release.tag_name) else {
            debug!("Ignoring release with non-SemVer tag {}", release.tag_name);
            return false;
        };
        same_version(&tag, &wanted) && release.target_commitish.as_deref() == ref_path
    })
}

/// Whether this exact version was already released from commit `sha`
pub fn is_duplicate_release(patch: &TagVersion, releases: &[ReleaseRecord], sha: &str) -> bool {
    let Some(tag_ref) = &patch.tag_ref else {
        return false;
    };
    release_exists(patch, releases) && tag_ref.object.sha == sha
}

/// Whether `version` is exactly one bump above the closest lower release.
///
/// With no releases at all, only the conventional first versions in
/// [`INITIAL_RELEASES`] qualify.
pub fn is_semver_bump(version: &TagVersion, releases: &[ReleaseRecord]) -> bool {
    let Some(candidate) = parse_release_tag(&version.number) else {
        return false;
    };

    if releases.is_empty() {
        return INITIAL_RELEASES
            .iter()
            .filter_map(|initial| parse_release_tag(initial))
            .any(|initial| same_version(&initial, &candidate));
    }

    let Ok(bump) = increment_type(&version.number) else {
        return false;
    };

    let previous = releases
        .iter()
        .filter_map(|release| parse_release_tag(&release.tag_name))
        .filter(|tag| tag.cmp_precedence(&candidate) == Ordering::Less)
        .max_by(|a, b| a.cmp_precedence(b));

    let Some(previous) = previous else {
        return false;
    };

    let Some(expected) = increment(&previous, bump) else {
        debug!("Previous release {} has no {} successor", previous, bump);
        return false;
    };
    debug!(
        "Previous release {}, {} bump expects {}",
        previous, bump, expected
    );
    same_version(&candidate, &expected)
}
