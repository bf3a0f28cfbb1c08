//! Domain logic - pure release rules independent of the hosting platform

pub mod release;
pub mod version;

pub use release::{
    is_duplicate_release, is_semver_bump, release_exists, RefObject, ReleaseRecord, ReleaseState,
    TagRef, TagVersion, INITIAL_RELEASES,
};
pub use version::{
    derive_aliases, increment, increment_type, parse_release_tag, tag_name_for, SemVer,
    VersionAliasSet, VersionBump, TAG_PREFIX,
};
