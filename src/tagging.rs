//! Creating and moving version tags on the host

use crate::domain::{TagRef, TagVersion};
use crate::error::Result;
use crate::host::{ReleaseHost, TagObjectRequest};
use std::fmt;
use tracing::info;

/// What happened to a tag during reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagAction {
    /// The tag did not exist and was created
    Created,
    /// The tag existed and now points at the released commit
    Moved,
}

impl fmt::Display for TagAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagAction::Created => f.write_str("created"),
            TagAction::Moved => f.write_str("moved"),
        }
    }
}

/// Point the tag for `version` at `sha`, replacing it if it already exists.
///
/// On success `version.tag_ref` holds the new ref.
pub async fn create_or_update_tag<H>(
    host: &H,
    version: &mut TagVersion,
    sha: &str,
) -> Result<TagAction>
where
    H: ReleaseHost + ?Sized,
{
    let action = match &version.tag_ref {
        Some(existing) => {
            info!(
                "Tag {} already exists. Deleting and recreating. ref: {}",
                version.name, existing.ref_path
            );
            delete_tag(host, &existing.ref_path).await?;
            TagAction::Moved
        }
        None => TagAction::Created,
    };

    info!("Creating tag {} for version {}", version.name, version.number);
    create_tag(host, version, sha).await?;

    info!("Creating ref for tag {}", version.name);
    create_tag_ref(host, version, sha).await?;

    version.tag_ref = Some(TagRef::for_tag(&version.name, sha));
    Ok(action)
}

/// Delete a tag ref. A ref that is already gone counts as deleted.
pub async fn delete_tag<H>(host: &H, ref_path: &str) -> Result<()>
where
    H: ReleaseHost + ?Sized,
{
    info!("Deleting tag {}", ref_path);
    match host.delete_tag_ref(ref_path).await {
        Ok(()) => {
            info!("Tag {} deleted", ref_path);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            info!("Tag {} was already deleted", ref_path);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Create the annotated tag object for `version`, returning its sha
pub async fn create_tag<H>(host: &H, version: &TagVersion, sha: &str) -> Result<String>
where
    H: ReleaseHost + ?Sized,
{
    let request = TagObjectRequest {
        tag_name: version.name.clone(),
        message: format!("For release {}", version.number),
        target_sha: sha.to_string(),
    };
    let tag_sha = host.create_tag_object(&request).await?;
    info!("Tag {} created", version.name);
    Ok(tag_sha)
}

/// Create `refs/tags/<version.name>` pointing at `sha`
pub async fn create_tag_ref<H>(host: &H, version: &TagVersion, sha: &str) -> Result<()>
where
    H: ReleaseHost + ?Sized,
{
    host.create_tag_ref(&version.name, sha).await?;
    info!("Ref 'refs/tags/{}' created", version.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReleaseError;
    use crate::host::{HostCall, MockHost};

    fn tag_object(name: &str, number: &str, sha: &str) -> HostCall {
        HostCall::CreateTagObject(TagObjectRequest {
            tag_name: name.to_string(),
            message: format!("For release {}", number),
            target_sha: sha.to_string(),
        })
    }

    #[tokio::test]
    async fn test_creates_missing_tag() {
        let host = MockHost::new();
        let mut version = TagVersion::new("1.0.0");

        let action = create_or_update_tag(&host, &mut version, "abc").await.unwrap();

        assert_eq!(action, TagAction::Created);
        assert_eq!(
            host.calls(),
            vec![
                tag_object("v1.0.0", "1.0.0", "abc"),
                HostCall::CreateTagRef {
                    tag_name: "v1.0.0".to_string(),
                    sha: "abc".to_string()
                },
            ]
        );
        assert_eq!(version.tag_ref, Some(TagRef::for_tag("v1.0.0", "abc")));
    }

    #[tokio::test]
    async fn test_moves_existing_tag() {
        let host = MockHost::new().with_tag("v1", "old");
        let mut version = TagVersion::new("1").with_ref(host.tag("v1"));

        let action = create_or_update_tag(&host, &mut version, "new").await.unwrap();

        assert_eq!(action, TagAction::Moved);
        assert_eq!(
            host.calls(),
            vec![
                HostCall::DeleteTagRef("refs/tags/v1".to_string()),
                tag_object("v1", "1", "new"),
                HostCall::CreateTagRef {
                    tag_name: "v1".to_string(),
                    sha: "new".to_string()
                },
            ]
        );
        assert_eq!(host.tag("v1"), Some(TagRef::for_tag("v1", "new")));
    }

    #[tokio::test]
    async fn test_ref_already_gone_is_not_an_error() {
        let host = MockHost::new();
        let mut version =
            TagVersion::new("1.2").with_ref(Some(TagRef::for_tag("v1.2", "stale")));

        let action = create_or_update_tag(&host, &mut version, "abc").await.unwrap();

        assert_eq!(action, TagAction::Moved);
        assert_eq!(host.tag("v1.2"), Some(TagRef::for_tag("v1.2", "abc")));
    }

    #[tokio::test]
    async fn test_delete_failure_is_fatal() {
        let host = MockHost::new().with_tag("v1", "old").with_delete_failure(500);
        let mut version = TagVersion::new("1").with_ref(host.tag("v1"));

        let err = create_or_update_tag(&host, &mut version, "new")
            .await
            .unwrap_err();

        assert!(matches!(err, ReleaseError::Api { status: 500, .. }));
        assert_eq!(host.writes().len(), 1);
        assert_eq!(version.tag_ref, Some(TagRef::for_tag("v1", "old")));
    }

    #[test]
    fn test_tag_action_display() {
        assert_eq!(TagAction::Created.to_string(), "created");
        assert_eq!(TagAction::Moved.to_string(), "moved");
    }
}
