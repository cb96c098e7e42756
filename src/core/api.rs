//! Android Publisher v3 client.
//!
//! `PublisherApi` is the seam between the workflow and the remote service.
//! `PlayClient` implements it over blocking HTTP with a bearer token.

use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::auth::{ServiceAccountKey, ANDROID_PUBLISHER_SCOPE};
use crate::defaults::Settings;
use crate::error::{Error, Result};
use crate::upload::ArtifactKind;
use crate::validate::PublishConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEdit {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time_seconds: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApkBinary {
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apk {
    pub version_code: Option<i64>,
    pub binary: Option<ApkBinary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApksListResponse {
    #[serde(default)]
    pub apks: Vec<Apk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub version_code: Option<i64>,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlesListResponse {
    #[serde(default)]
    pub bundles: Vec<Bundle>,
}

/// An uploaded APK or bundle, reduced to what the workflow uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedArtifact {
    pub version_code: Option<i64>,
    pub sha256: Option<String>,
}

impl From<Apk> for UploadedArtifact {
    fn from(apk: Apk) -> Self {
        Self {
            version_code: apk.version_code,
            sha256: apk.binary.and_then(|b| b.sha256),
        }
    }
}

impl From<Bundle> for UploadedArtifact {
    fn from(bundle: Bundle) -> Self {
        Self {
            version_code: bundle.version_code,
            sha256: bundle.sha256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub language: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRelease {
    pub name: String,
    pub release_notes: Vec<LocalizedText>,
    pub status: String,
    /// int64 values, encoded as strings on the wire.
    pub version_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResource {
    pub track: String,
    #[serde(default)]
    pub releases: Vec<TrackRelease>,
}

/// Remote operations of the publishing API used by the release workflow.
pub trait PublisherApi {
    fn insert_edit(&self, package: &str) -> Result<AppEdit>;

    fn upload(
        &self,
        package: &str,
        edit_id: &str,
        kind: ArtifactKind,
        content: Vec<u8>,
    ) -> Result<UploadedArtifact>;

    fn list(&self, package: &str, edit_id: &str, kind: ArtifactKind)
        -> Result<Vec<UploadedArtifact>>;

    fn update_track(
        &self,
        package: &str,
        edit_id: &str,
        track: &TrackResource,
    ) -> Result<TrackResource>;

    fn commit_edit(&self, package: &str, edit_id: &str) -> Result<AppEdit>;
}

/// HTTP client for the Android Publisher API.
pub struct PlayClient {
    http: Client,
    api_url: String,
    upload_url: String,
    access_token: String,
}

impl PlayClient {
    pub fn new(http: Client, settings: &Settings, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: settings.api_url.clone(),
            upload_url: settings.upload_url.clone(),
            access_token: access_token.into(),
        }
    }

    fn edit_url(&self, package: &str, edit_id: &str) -> String {
        format!("{}/applications/{}/edits/{}", self.api_url, package, edit_id)
    }
}

/// Build an authenticated client for the validated configuration.
///
/// The application name becomes the `User-Agent` of every request.
pub fn create_client(config: &PublishConfig, settings: &Settings) -> Result<PlayClient> {
    let http = Client::builder()
        .user_agent(config.name.clone())
        .timeout(settings.timeout)
        .build()
        .map_err(|e| Error::internal_io(e.to_string(), Some("create HTTP client".to_string())))?;

    let key = ServiceAccountKey::load(&config.service_account_file)?;
    log_status!("auth", "Requesting access token for {}", key.client_email);
    let token = key.fetch_access_token(&http, ANDROID_PUBLISHER_SCOPE)?;

    Ok(PlayClient::new(http, settings, token.token))
}

impl PublisherApi for PlayClient {
    fn insert_edit(&self, package: &str) -> Result<AppEdit> {
        let url = format!("{}/applications/{}/edits", self.api_url, package);
        let request = self.http.post(&url).json(&serde_json::json!({}));
        send(self.authorize(request), "edits.insert")
    }

    fn upload(
        &self,
        package: &str,
        edit_id: &str,
        kind: ArtifactKind,
        content: Vec<u8>,
    ) -> Result<UploadedArtifact> {
        let url = format!(
            "{}/applications/{}/edits/{}/{}",
            self.upload_url,
            package,
            edit_id,
            kind.collection()
        );
        let request = self
            .http
            .post(&url)
            .query(&[("uploadType", "media")])
            .header(reqwest::header::CONTENT_TYPE, kind.content_type())
            .body(content);
        let request = self.authorize(request);

        match kind {
            ArtifactKind::Apk => send::<Apk>(request, "edits.apks.upload").map(Into::into),
            ArtifactKind::Bundle => send::<Bundle>(request, "edits.bundles.upload").map(Into::into),
        }
    }

    fn list(
        &self,
        package: &str,
        edit_id: &str,
        kind: ArtifactKind,
    ) -> Result<Vec<UploadedArtifact>> {
        let url = format!("{}/{}", self.edit_url(package, edit_id), kind.collection());
        let request = self.authorize(self.http.get(&url));

        match kind {
            ArtifactKind::Apk => send::<ApksListResponse>(request, "edits.apks.list")
                .map(|r| r.apks.into_iter().map(Into::into).collect()),
            ArtifactKind::Bundle => send::<BundlesListResponse>(request, "edits.bundles.list")
                .map(|r| r.bundles.into_iter().map(Into::into).collect()),
        }
    }

    fn update_track(
        &self,
        package: &str,
        edit_id: &str,
        track: &TrackResource,
    ) -> Result<TrackResource> {
        let url = format!("{}/tracks/{}", self.edit_url(package, edit_id), track.track);
        let request = self.authorize(self.http.put(&url).json(track));
        send(request, "edits.tracks.update")
    }

    fn commit_edit(&self, package: &str, edit_id: &str) -> Result<AppEdit> {
        let url = format!("{}:commit", self.edit_url(package, edit_id));
        let request = self.authorize(self.http.post(&url));
        send(request, "edits.commit")
    }
}

impl PlayClient {
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.access_token)
    }
}

fn send<T: DeserializeOwned>(request: RequestBuilder, operation: &str) -> Result<T> {
    let response = request
        .send()
        .map_err(|e| Error::remote_request_failed(operation, e))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| Error::remote_request_failed(operation, e))?;

    if !status.is_success() {
        return Err(Error::remote_api_error(operation, status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| Error::remote_invalid_response(operation, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn track_resource_serializes_in_api_shape() {
        let track = TrackResource {
            track: "beta".to_string(),
            releases: vec![TrackRelease {
                name: "Release 42".to_string(),
                release_notes: vec![LocalizedText {
                    language: "en-US".to_string(),
                    text: "Bug fixes".to_string(),
                }],
                status: "halted".to_string(),
                version_codes: vec!["42".to_string()],
            }],
        };

        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(
            value,
            json!({
                "track": "beta",
                "releases": [{
                    "name": "Release 42",
                    "releaseNotes": [{ "language": "en-US", "text": "Bug fixes" }],
                    "status": "halted",
                    "versionCodes": ["42"]
                }]
            })
        );
    }

    #[test]
    fn apk_listing_normalizes_binary_digest() {
        let listing: ApksListResponse = serde_json::from_value(json!({
            "kind": "androidpublisher#apksListResponse",
            "apks": [
                { "versionCode": 7, "binary": { "sha1": "aa", "sha256": "bb" } },
                { "versionCode": 9 }
            ]
        }))
        .unwrap();

        let artifacts: Vec<UploadedArtifact> = listing.apks.into_iter().map(Into::into).collect();
        assert_eq!(artifacts[0].version_code, Some(7));
        assert_eq!(artifacts[0].sha256.as_deref(), Some("bb"));
        assert_eq!(artifacts[1].sha256, None);
    }

    #[test]
    fn empty_bundle_listing_defaults_to_no_entries() {
        let listing: BundlesListResponse =
            serde_json::from_value(json!({ "kind": "androidpublisher#bundlesListResponse" }))
                .unwrap();
        assert!(listing.bundles.is_empty());
    }

    #[test]
    fn app_edit_reads_commit_response() {
        let edit: AppEdit =
            serde_json::from_value(json!({ "id": "0123456789", "expiryTimeSeconds": "1700000000" }))
                .unwrap();
        assert_eq!(edit.id, "0123456789");
        assert_eq!(edit.expiry_time_seconds.as_deref(), Some("1700000000"));
    }

    #[test]
    fn edit_urls_follow_api_layout() {
        let client = PlayClient::new(Client::new(), &Settings::default(), "token");
        assert_eq!(
            client.edit_url("com.example.app", "e1"),
            "https://androidpublisher.googleapis.com/androidpublisher/v3/applications/com.example.app/edits/e1"
        );
    }
}
