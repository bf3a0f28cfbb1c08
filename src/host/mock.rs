use crate::domain::{ReleaseRecord, TagRef};
use crate::error::{ReleaseError, Result};
use crate::host::{
    AssetReader, AssetUpload, CreatedRelease, ReleaseHost, ReleaseRequest, TagObjectRequest,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// A host operation recorded by [MockHost]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ListReleases { page: u32 },
    GetTagRef(String),
    DeleteTagRef(String),
    CreateTagObject(TagObjectRequest),
    CreateTagRef { tag_name: String, sha: String },
    CreateRelease(ReleaseRequest),
    UploadAsset { release_id: u64, asset_name: String, size: usize },
}

impl HostCall {
    /// Whether the call changes state on the host
    pub fn is_write(&self) -> bool {
        !matches!(self, HostCall::ListReleases { .. } | HostCall::GetTagRef(_))
    }
}

#[derive(Default)]
struct MockState {
    releases: Vec<ReleaseRecord>,
    refs: BTreeMap<String, TagRef>,
    files: HashMap<PathBuf, Vec<u8>>,
    calls: Vec<HostCall>,
    last_release_id: u64,
    delete_failure: Option<u16>,
    failing_asset: Option<String>,
}

/// In-memory host for testing without network access
///
/// Records every call, keeps releases and tag refs in memory, and serves asset
/// files from a map. Releases created through the mock target their tag ref,
/// so a replayed run sees its own earlier release.
#[derive(Default)]
pub struct MockHost {
    state: Mutex<MockState>,
}

impl MockHost {
    /// Create a new empty mock host
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add an existing release
    pub fn with_release(self, tag_name: &str, target_commitish: Option<&str>) -> Self {
        self.state()
            .releases
            .push(ReleaseRecord::new(tag_name, target_commitish));
        self
    }

    /// Add an existing tag ref pointing at `sha`
    pub fn with_tag(self, tag_name: &str, sha: &str) -> Self {
        self.state()
            .refs
            .insert(tag_name.to_string(), TagRef::for_tag(tag_name, sha));
        self
    }

    /// Serve `content` for asset `path`
    pub fn with_file(self, path: impl Into<PathBuf>, content: &[u8]) -> Self {
        self.state().files.insert(path.into(), content.to_vec());
        self
    }

    /// Fail every ref deletion with the given HTTP status
    pub fn with_delete_failure(self, status: u16) -> Self {
        self.state().delete_failure = Some(status);
        self
    }

    /// Fail the upload of the asset with this name
    pub fn with_failing_asset(self, asset_name: &str) -> Self {
        self.state().failing_asset = Some(asset_name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state().calls.clone()
    }

    /// Calls that would have changed the host
    pub fn writes(&self) -> Vec<HostCall> {
        self.calls().into_iter().filter(HostCall::is_write).collect()
    }

    pub fn releases(&self) -> Vec<ReleaseRecord> {
        self.state().releases.clone()
    }

    pub fn tag(&self, tag_name: &str) -> Option<TagRef> {
        self.state().refs.get(tag_name).cloned()
    }

    fn record(&self, call: HostCall) {
        self.state().calls.push(call);
    }
}

#[async_trait]
impl ReleaseHost for MockHost {
    async fn list_releases(&self, page: u32, per_page: u32) -> Result<Vec<ReleaseRecord>> {
        self.record(HostCall::ListReleases { page });
        let state = self.state();
        let per_page = per_page.max(1) as usize;
        let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);
        Ok(state
            .releases
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect())
    }

    async fn get_tag_ref(&self, tag_name: &str) -> Result<Option<TagRef>> {
        self.record(HostCall::GetTagRef(tag_name.to_string()));
        Ok(self.tag(tag_name))
    }

    async fn delete_tag_ref(&self, ref_path: &str) -> Result<()> {
        self.record(HostCall::DeleteTagRef(ref_path.to_string()));
        let mut state = self.state();
        if let Some(status) = state.delete_failure {
            return Err(ReleaseError::Api {
                status,
                message: format!("cannot delete {}", ref_path),
            });
        }

        let tag_name = ref_path.strip_prefix("refs/tags/").unwrap_or(ref_path);
        match state.refs.remove(tag_name) {
            Some(_) => Ok(()),
            None => Err(ReleaseError::not_found(ref_path)),
        }
    }

    async fn create_tag_object(&self, request: &TagObjectRequest) -> Result<String> {
        self.record(HostCall::CreateTagObject(request.clone()));
        Ok(format!("tag-object-{}", request.tag_name))
    }

    async fn create_tag_ref(&self, tag_name: &str, sha: &str) -> Result<()> {
        self.record(HostCall::CreateTagRef {
            tag_name: tag_name.to_string(),
            sha: sha.to_string(),
        });
        let mut state = self.state();
        if state.refs.contains_key(tag_name) {
            return Err(ReleaseError::Api {
                status: 422,
                message: "Reference already exists".to_string(),
            });
        }
        state
            .refs
            .insert(tag_name.to_string(), TagRef::for_tag(tag_name, sha));
        Ok(())
    }

    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease> {
        self.record(HostCall::CreateRelease(request.clone()));
        let mut state = self.state();
        state.last_release_id += 1;
        let target = format!("refs/tags/{}", request.tag_name);
        state
            .releases
            .push(ReleaseRecord::new(request.tag_name.clone(), Some(&target)));
        Ok(CreatedRelease {
            id: state.last_release_id,
            tag_name: request.tag_name.clone(),
        })
    }

    async fn upload_release_asset(&self, asset: &AssetUpload) -> Result<()> {
        self.record(HostCall::UploadAsset {
            release_id: asset.release_id,
            asset_name: asset.asset_name.clone(),
            size: asset.content.len(),
        });
        if self.state().failing_asset.as_deref() == Some(asset.asset_name.as_str()) {
            return Err(ReleaseError::Api {
                status: 502,
                message: format!("upload of {} failed", asset.asset_name),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AssetReader for MockHost {
    async fn read_file_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        self.state().files.get(path).cloned().ok_or_else(|| {
            ReleaseError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
        })
    }
}
