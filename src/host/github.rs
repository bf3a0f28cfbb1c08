use crate::config::GithubConfig;
use crate::domain::{ReleaseRecord, TagRef};
use crate::error::{ReleaseError, Result};
use crate::host::{
    AssetUpload, CreatedRelease, ReleaseHost, ReleaseRequest, RepoSlug, TagObjectRequest,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const API_VERSION: &str = "2022-11-28";

/// Error body returned by the GitHub REST API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Response of `POST /git/tags`
#[derive(Debug, Deserialize)]
struct CreatedTagObject {
    sha: String,
}

/// [ReleaseHost] backed by the GitHub REST API
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    upload_url: String,
    repo: RepoSlug,
    token: Option<String>,
}

impl GithubClient {
    /// Build a client for `repo`
    ///
    /// Without a token, requests are sent unauthenticated, which is enough to
    /// validate against a public repository but not to publish.
    pub fn new(settings: &GithubConfig, repo: RepoSlug, token: Option<String>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(GithubClient {
            client: builder.build()?,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            upload_url: settings.upload_url.trim_end_matches('/').to_string(),
            repo,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn repo(&self) -> &RepoSlug {
        &self.repo
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_url, self.repo.owner, self.repo.name, path
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request, mapping 404 (and 422 on a missing ref) to
    /// [ReleaseError::NotFound] and any other failure status to
    /// [ReleaseError::Api].
    async fn send(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = api_error_message(&text);
        if is_not_found(status, &message) {
            return Err(ReleaseError::not_found(what));
        }
        Err(ReleaseError::Api {
            status: status.as_u16(),
            message: format!("{}: {}", what, message),
        })
    }
}

fn is_not_found(status: StatusCode, message: &str) -> bool {
    status == StatusCode::NOT_FOUND
        || (status == StatusCode::UNPROCESSABLE_ENTITY
            && message.contains("Reference does not exist"))
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Strip the leading `refs/` the git refs endpoints do not expect
fn ref_endpoint_path(ref_path: &str) -> &str {
    ref_path.strip_prefix("refs/").unwrap_or(ref_path)
}

#[async_trait]
impl ReleaseHost for GithubClient {
    async fn list_releases(&self, page: u32, per_page: u32) -> Result<Vec<ReleaseRecord>> {
        debug!("Listing releases of {} (page {})", self.repo, page);
        let url = self.repo_url("/releases");
        let builder = self
            .request(Method::GET, &url)
            .query(&[("per_page", per_page), ("page", page)]);
        let response = self.send(builder, "list releases").await?;
        Ok(response.json().await?)
    }

    async fn get_tag_ref(&self, tag_name: &str) -> Result<Option<TagRef>> {
        info!("Getting ref for tag {}", tag_name);
        let url = self.repo_url(&format!("/git/ref/tags/{}", tag_name));
        let what = format!("ref for tag {}", tag_name);

        match self.send(self.request(Method::GET, &url), &what).await {
            Ok(response) => {
                let tag_ref: TagRef = response.json().await?;
                info!("Ref for tag {} found {}", tag_name, tag_ref.ref_path);
                Ok(Some(tag_ref))
            }
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn delete_tag_ref(&self, ref_path: &str) -> Result<()> {
        let url = self.repo_url(&format!("/git/refs/{}", ref_endpoint_path(ref_path)));
        self.send(self.request(Method::DELETE, &url), ref_path)
            .await?;
        Ok(())
    }

    async fn create_tag_object(&self, request: &TagObjectRequest) -> Result<String> {
        let url = self.repo_url("/git/tags");
        let payload = json!({
            "tag": request.tag_name,
            "message": request.message,
            "object": request.target_sha,
            "type": "commit",
        });
        let what = format!("create tag {}", request.tag_name);
        let response = self
            .send(self.request(Method::POST, &url).json(&payload), &what)
            .await?;
        let created: CreatedTagObject = response.json().await?;
        Ok(created.sha)
    }

    async fn create_tag_ref(&self, tag_name: &str, sha: &str) -> Result<()> {
        let url = self.repo_url("/git/refs");
        let payload = json!({
            "ref": format!("refs/tags/{}", tag_name),
            "sha": sha,
        });
        let what = format!("create ref for tag {}", tag_name);
        self.send(self.request(Method::POST, &url).json(&payload), &what)
            .await?;
        Ok(())
    }

    async fn create_release(&self, request: &ReleaseRequest) -> Result<CreatedRelease> {
        let url = self.repo_url("/releases");
        let payload = json!({
            "tag_name": request.tag_name,
            "name": request.title,
            "body": request.body,
        });
        let what = format!("create release {}", request.title);
        let response = self
            .send(self.request(Method::POST, &url).json(&payload), &what)
            .await?;
        Ok(response.json().await?)
    }

    async fn upload_release_asset(&self, asset: &AssetUpload) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/releases/{}/assets",
            self.upload_url, self.repo.owner, self.repo.name, asset.release_id
        );
        let builder = self
            .request(Method::POST, &url)
            .query(&[("name", asset.asset_name.as_str())])
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(asset.content.clone());
        let what = format!("upload asset {}", asset.asset_name);
        self.send(builder, &what).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_url: &str) -> GithubClient {
        let settings = GithubConfig {
            api_url: api_url.to_string(),
            ..GithubConfig::default()
        };
        GithubClient::new(&settings, RepoSlug::new("octo", "hello"), None).unwrap()
    }

    #[test]
    fn test_repo_url_trims_trailing_slash() {
        let client = client("https://ghe.example.com/api/v3/");
        assert_eq!(
            client.repo_url("/releases"),
            "https://ghe.example.com/api/v3/repos/octo/hello/releases"
        );
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let client = GithubClient::new(
            &GithubConfig::default(),
            RepoSlug::new("octo", "hello"),
            Some(String::new()),
        )
        .unwrap();
        assert!(client.token.is_none());
        assert_eq!(client.repo().to_string(), "octo/hello");
    }

    #[test]
    fn test_ref_endpoint_path() {
        assert_eq!(ref_endpoint_path("refs/tags/v1"), "tags/v1");
        assert_eq!(ref_endpoint_path("tags/v1"), "tags/v1");
    }

    #[test]
    fn test_api_error_message() {
        assert_eq!(
            api_error_message(r#"{"message":"Reference does not exist","documentation_url":"x"}"#),
            "Reference does not exist"
        );
        assert_eq!(api_error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found(StatusCode::NOT_FOUND, "Not Found"));
        assert!(is_not_found(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Reference does not exist"
        ));
        assert!(!is_not_found(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Reference already exists"
        ));
        assert!(!is_not_found(StatusCode::INTERNAL_SERVER_ERROR, "boom"));
    }

    #[test]
    fn test_created_release_deserializes() {
        let release: CreatedRelease = serde_json::from_str(
            r#"{"id": 42, "tag_name": "v1.0.0", "name": "Release v1.0.0", "draft": false}"#,
        )
        .unwrap();
        assert_eq!(release.id, 42);
        assert_eq!(release.tag_name, "v1.0.0");
    }
}
