//! Main release workflow orchestration logic
//!
//! Drives one run through its stages: check inputs, fetch the release state,
//! validate it, reconcile the version and alias tags, then publish the release
//! and its assets. The workflow never reads the environment; everything it
//! needs arrives through [ReleaseWorkflowArgs].

use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::domain::{derive_aliases, ReleaseState, SemVer, TagVersion};
use crate::error::{ReleaseError, Result};
use crate::host::{AssetReader, AssetUpload, CreatedRelease, ReleaseHost, ReleaseRequest};
use crate::inputs::ActionInputs;
use crate::notice::ReleaseNotice;
use crate::tagging::{create_or_update_tag, TagAction};
use crate::validate::{validate_github_state, validate_inputs};

/// Arguments for the release workflow
///
/// Mirrors the CLI inputs in a form that can be driven programmatically
/// without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    pub inputs: ActionInputs,
    /// Page size used when listing releases
    pub per_page: u32,
}

/// Stage a run was in when it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Inputs,
    Fetch,
    Validate,
    Reconcile,
    Publish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Inputs => "inputs",
            Stage::Fetch => "fetch",
            Stage::Validate => "validate",
            Stage::Reconcile => "reconcile",
            Stage::Publish => "publish",
        };
        f.write_str(name)
    }
}

/// A tag touched during reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagUpdate {
    pub tag_name: String,
    pub action: TagAction,
}

/// Result of a published release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub release_id: u64,
    pub tag_name: String,
    pub tags: Vec<TagUpdate>,
    pub assets: Vec<String>,
    pub notices: Vec<ReleaseNotice>,
}

/// Terminal state of a run
#[derive(Debug)]
pub enum Outcome {
    Created(ReleaseReport),
    Skipped(ReleaseNotice),
    Failed { stage: Stage, error: ReleaseError },
}

impl Outcome {
    /// Created and Skipped both count as success
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Failed { .. })
    }
}

/// Run the release workflow against `host`, reading assets through `reader`
pub async fn run_release_workflow<H, R>(host: &H, reader: &R, args: &ReleaseWorkflowArgs) -> Outcome
where
    H: ReleaseHost + ?Sized,
    R: AssetReader + ?Sized,
{
    match execute(host, reader, args).await {
        Ok(outcome) => outcome,
        Err((stage, error)) => {
            warn!("Release failed during {}: {}", stage, error);
            Outcome::Failed { stage, error }
        }
    }
}

fn at(stage: Stage) -> impl Fn(ReleaseError) -> (Stage, ReleaseError) {
    move |error| (stage, error)
}

async fn execute<H, R>(
    host: &H,
    reader: &R,
    args: &ReleaseWorkflowArgs,
) -> std::result::Result<Outcome, (Stage, ReleaseError)>
where
    H: ReleaseHost + ?Sized,
    R: AssetReader + ?Sized,
{
    let inputs = &args.inputs;
    let version = validate_inputs(inputs).map_err(at(Stage::Inputs))?;

    let mut state = fetch_release_state(host, &version, args.per_page)
        .await
        .map_err(at(Stage::Fetch))?;

    if let Err(error) = validate_github_state(&state.patch, &state.releases, &inputs.sha) {
        if error.is_duplicate() {
            info!("{}", error);
            return Ok(Outcome::Skipped(ReleaseNotice::DuplicateRelease {
                version: state.patch.number.clone(),
                sha: inputs.sha.clone(),
            }));
        }
        return Err((Stage::Validate, error));
    }

    if inputs.validate_only {
        let notice = ReleaseNotice::ValidationOnly {
            version: state.patch.number.clone(),
        };
        info!("{}", notice);
        return Ok(Outcome::Skipped(notice));
    }

    let (tags, notices) = reconcile_tags(host, &mut state, &inputs.sha)
        .await
        .map_err(at(Stage::Reconcile))?;

    let (release, assets) = publish_release(host, reader, &state.patch, inputs)
        .await
        .map_err(at(Stage::Publish))?;

    Ok(Outcome::Created(ReleaseReport {
        release_id: release.id,
        tag_name: release.tag_name,
        tags,
        assets,
        notices,
    }))
}

/// Resolve the current ref of one version tag
pub async fn get_version_metadata<H>(host: &H, number: &str) -> Result<TagVersion>
where
    H: ReleaseHost + ?Sized,
{
    let version = TagVersion::new(number);
    let tag_ref = host.get_tag_ref(&version.name).await?;
    Ok(version.with_ref(tag_ref))
}

/// Fetch every release and the refs of the patch, major, minor and
/// next-minor tags for `version`
pub async fn fetch_release_state<H>(
    host: &H,
    version: &SemVer,
    per_page: u32,
) -> Result<ReleaseState>
where
    H: ReleaseHost + ?Sized,
{
    let aliases = derive_aliases(version)?;
    let releases = host.list_all_releases(per_page).await?;
    info!("Found {} existing releases", releases.len());

    let mut state = ReleaseState::new(&aliases, releases);
    state.major = get_version_metadata(host, &aliases.major).await?;
    state.minor = get_version_metadata(host, &aliases.minor).await?;
    state.patch = get_version_metadata(host, &aliases.patch).await?;
    state.next_minor = get_version_metadata(host, &aliases.next_minor).await?;
    Ok(state)
}

/// Create or move the patch and minor tags, and the major alias unless a
/// newer minor line already owns it
pub async fn reconcile_tags<H>(
    host: &H,
    state: &mut ReleaseState,
    sha: &str,
) -> Result<(Vec<TagUpdate>, Vec<ReleaseNotice>)>
where
    H: ReleaseHost + ?Sized,
{
    let mut tags = Vec::new();
    let mut notices = Vec::new();

    for version in [&mut state.patch, &mut state.minor] {
        let action = create_or_update_tag(host, version, sha).await?;
        tags.push(TagUpdate {
            tag_name: version.name.clone(),
            action,
        });
    }

    if state.next_minor.tag_ref.is_none() {
        let action = create_or_update_tag(host, &mut state.major, sha).await?;
        tags.push(TagUpdate {
            tag_name: state.major.name.clone(),
            action,
        });
    } else {
        let notice = ReleaseNotice::MajorAliasHeld {
            major_tag: state.major.name.clone(),
            next_minor_tag: state.next_minor.name.clone(),
        };
        info!("{}", notice);
        notices.push(notice);
    }

    Ok((tags, notices))
}

/// Name of the asset uploaded for `file` on the release of `patch`
pub fn asset_name(patch: &TagVersion, file: &str) -> String {
    let base = Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());
    format!("Release {} - {}", patch.name, base)
}

/// Create the release for `patch` and upload each file in order.
///
/// Assets uploaded before a failing one stay attached.
pub async fn publish_release<H, R>(
    host: &H,
    reader: &R,
    patch: &TagVersion,
    inputs: &ActionInputs,
) -> Result<(CreatedRelease, Vec<String>)>
where
    H: ReleaseHost + ?Sized,
    R: AssetReader + ?Sized,
{
    info!("Creating release object for version {}", patch.name);
    let release = host
        .create_release(&ReleaseRequest {
            tag_name: patch.name.clone(),
            title: format!("Release {}", patch.name),
            body: inputs.body.clone(),
        })
        .await?;

    let mut uploaded = Vec::with_capacity(inputs.files.len());
    for file in &inputs.files {
        let content = reader.read_file_bytes(Path::new(file)).await?;
        let name = asset_name(patch, file);
        info!("Uploading {} ({} bytes)", name, content.len());
        host.upload_release_asset(&AssetUpload {
            release_id: release.id,
            asset_name: name.clone(),
            content,
        })
        .await?;
        uploaded.push(name);
    }

    Ok((release, uploaded))
}
