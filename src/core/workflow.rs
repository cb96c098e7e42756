//! The publishing workflow, one pass from configuration file to committed edit.
//!
//! Stages once the edit is open: `EditOpen -> ArtifactUploaded ->
//! ReleaseComposed -> TrackUpdated -> Committed`. A failure at any stage
//! aborts the run; an edit opened before the failure stays open on the server.

use std::io::{BufRead, Write};
use std::path::Path;

use crate::api::{AppEdit, PublisherApi};
use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::publish;
use crate::release;
use crate::upload;
use crate::validate::{self, PublishConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    EditOpen,
    ArtifactUploaded,
    ReleaseComposed,
    TrackUpdated,
    Committed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::EditOpen => "edit_open",
            Stage::ArtifactUploaded => "artifact_uploaded",
            Stage::ReleaseComposed => "release_composed",
            Stage::TrackUpdated => "track_updated",
            Stage::Committed => "committed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub edit_id: String,
    pub version_code: i64,
    pub commit: AppEdit,
}

/// Load the configuration file, prompt for missing track settings and
/// validate the result. No network access happens here.
pub fn prepare<R: BufRead, W: Write>(
    config_path: &Path,
    prompter: &mut Prompter<R, W>,
) -> Result<PublishConfig> {
    let mut config = Configuration::load(config_path)?;
    config.fill_missing(prompter)?;
    validate::validate(&config)
}

/// Run every remote stage against `api`.
pub fn publish<R: BufRead, W: Write>(
    api: &dyn PublisherApi,
    config: &PublishConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<PublishOutcome> {
    let package = config.package.as_str();

    let edit_id = api.insert_edit(package)?.id;
    log_status!("publish", "Opened edit {} for {}", edit_id, package);

    let version_code = upload::upload_artifact(api, package, &edit_id, &config.application_file)
        .and_then(|code| code.ok_or_else(|| Error::upload_no_version_code(&edit_id)))
        .map_err(|e| left_open(e, &edit_id, Stage::EditOpen))?;

    let notes = release::collect_release_notes(prompter)
        .map_err(|e| left_open(e, &edit_id, Stage::ArtifactUploaded))?;
    let track = release::compose_track(config.track, config.track_status, version_code, notes);

    publish::update_track(api, package, &edit_id, &track)
        .map_err(|e| left_open(e, &edit_id, Stage::ReleaseComposed))?;

    let commit = publish::commit(api, package, &edit_id)
        .map_err(|e| left_open(e, &edit_id, Stage::TrackUpdated))?;
    log_status!("publish", "Edit {} reached stage {}", edit_id, Stage::Committed.as_str());

    Ok(PublishOutcome {
        edit_id,
        version_code,
        commit,
    })
}

/// `stage` is the last stage reached before the failure.
fn left_open(mut err: Error, edit_id: &str, stage: Stage) -> Error {
    if let serde_json::Value::Object(details) = &mut err.details {
        details.insert("editId".to_string(), edit_id.into());
        details.insert("stage".to_string(), stage.as_str().into());
    }
    err.with_hint(format!(
        "Edit {} was left open; it expires on the server or can be deleted from the Play Console",
        edit_id
    ))
}
