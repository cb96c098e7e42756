//! Artifact upload: picks the APK or bundle endpoint from the file suffix and
//! resolves the version code the service assigned.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::api::{PublisherApi, UploadedArtifact};
use crate::error::{Error, Result};
use crate::utils::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Apk,
    Bundle,
}

impl ArtifactKind {
    /// Kind for a file name ending in `.apk` or `.aab`.
    pub fn detect(path: &Path) -> Result<Self> {
        let name = path.to_string_lossy();
        if name.ends_with(".apk") {
            Ok(ArtifactKind::Apk)
        } else if name.ends_with(".aab") {
            Ok(ArtifactKind::Bundle)
        } else {
            Err(Error::upload_unsupported_type(name))
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Apk => "application/vnd.android.package-archive",
            ArtifactKind::Bundle => "application/octet-stream",
        }
    }

    /// Path segment of the edit sub-collection.
    pub fn collection(&self) -> &'static str {
        match self {
            ArtifactKind::Apk => "apks",
            ArtifactKind::Bundle => "bundles",
        }
    }
}

/// Upload the application file into the edit and return its version code.
///
/// The version code comes from the upload response, which describes exactly
/// the artifact just uploaded. The highest code listed for the edit is used
/// only when the response carries none.
pub fn upload_artifact(
    api: &dyn PublisherApi,
    package: &str,
    edit_id: &str,
    application_file: &Path,
) -> Result<Option<i64>> {
    let kind = ArtifactKind::detect(application_file)?;
    let content = io::read_bytes(application_file, "read application file")?;
    let local_digest = sha256_hex(&content);

    log_status!(
        "upload",
        "Uploading {} ({} bytes) as {}",
        application_file.display(),
        content.len(),
        kind.content_type()
    );
    let uploaded = api.upload(package, edit_id, kind, content)?;
    check_digest(&uploaded, &local_digest);

    let listed = api.list(package, edit_id, kind)?;
    let version_code = uploaded
        .version_code
        .or_else(|| highest_version_code(&listed));

    if let Some(code) = version_code {
        log_status!("upload", "Resolved version code {}", code);
    }
    Ok(version_code)
}

pub fn highest_version_code(artifacts: &[UploadedArtifact]) -> Option<i64> {
    artifacts.iter().filter_map(|a| a.version_code).max()
}

fn sha256_hex(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

fn check_digest(uploaded: &UploadedArtifact, local_digest: &str) {
    let Some(remote) = uploaded.sha256.as_deref() else {
        return;
    };
    if !remote.eq_ignore_ascii_case(local_digest) {
        log_status!(
            "upload",
            "Warning: server digest {} does not match local digest {}",
            remote,
            local_digest
        );
    }
}
