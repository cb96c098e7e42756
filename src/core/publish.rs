use crate::api::{AppEdit, PublisherApi, TrackResource};
use crate::error::Result;

/// Send the composed track into the edit.
pub fn update_track(
    api: &dyn PublisherApi,
    package: &str,
    edit_id: &str,
    track: &TrackResource,
) -> Result<()> {
    log_status!("publish", "Updating track '{}' in edit {}", track.track, edit_id);
    api.update_track(package, edit_id, track)?;
    Ok(())
}

/// Commit the edit. After this succeeds the edit can no longer be changed;
/// a failed commit leaves it open on the server.
pub fn commit(api: &dyn PublisherApi, package: &str, edit_id: &str) -> Result<AppEdit> {
    log_status!("publish", "Committing edit {}", edit_id);
    api.commit_edit(package, edit_id)
}

pub fn commit_message(commit: &AppEdit) -> String {
    format!("Release with id {} committed!", commit.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_message_names_the_edit() {
        let commit = AppEdit {
            id: "08172631".to_string(),
            expiry_time_seconds: None,
        };
        assert_eq!(commit_message(&commit), "Release with id 08172631 committed!");
    }
}
