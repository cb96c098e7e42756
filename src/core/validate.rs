//! Pre-flight checks run before any credential is loaded or request is sent.

use std::path::PathBuf;

use crate::config::{Configuration, Track, TrackStatus};
use crate::error::{Error, Result};
use crate::utils::{io, validation};

/// Configuration that passed validation, with paths expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub application_file: PathBuf,
    pub name: String,
    pub package: String,
    pub service_account_file: PathBuf,
    pub track: Track,
    pub track_status: TrackStatus,
}

/// Check the configuration, stopping at the first problem found.
///
/// Order: name/package present, application file exists, service account
/// file exists.
pub fn validate(config: &Configuration) -> Result<PublishConfig> {
    let missing = validation::blank_fields(&[
        ("name", config.name.as_deref()),
        ("package", config.package.as_deref()),
    ]);
    if !missing.is_empty() {
        return Err(Error::config_missing_data(missing));
    }

    let application_file = existing_file(
        config.application_file.as_deref(),
        "applicationFile",
        "The application file does not exist.",
    )?;
    let service_account_file = existing_file(
        config.service_account_file.as_deref(),
        "serviceAccountFile",
        "The service account file does not exist.",
    )?;

    let track = config.track.ok_or_else(|| {
        Error::config_invalid_value("track", None, "no release track was selected")
    })?;
    let track_status = config.track_status.ok_or_else(|| {
        Error::config_invalid_value("trackStatus", None, "no track status was selected")
    })?;

    Ok(PublishConfig {
        application_file,
        name: config.name.clone().unwrap_or_default().trim().to_string(),
        package: config.package.clone().unwrap_or_default().trim().to_string(),
        service_account_file,
        track,
        track_status,
    })
}

fn existing_file(path: Option<&str>, field: &str, message: &str) -> Result<PathBuf> {
    let raw = path.unwrap_or_default();
    if validation::is_blank(path) {
        return Err(Error::file_missing(message, field, raw));
    }

    let expanded = io::expand_path(raw);
    if !expanded.is_file() {
        return Err(Error::file_missing(message, field, raw));
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        app: String,
        account: String,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let app = dir.path().join("app.aab");
        let account = dir.path().join("account.json");
        File::create(&app).unwrap();
        File::create(&account).unwrap();
        Fixture {
            app: app.to_string_lossy().to_string(),
            account: account.to_string_lossy().to_string(),
            _dir: dir,
        }
    }

    fn config(fx: &Fixture) -> Configuration {
        Configuration {
            application_file: Some(fx.app.clone()),
            name: Some("My App".to_string()),
            package: Some("com.example.app".to_string()),
            service_account_file: Some(fx.account.clone()),
            track: Some(Track::Beta),
            track_status: Some(TrackStatus::Halted),
        }
    }

    #[test]
    fn accepts_complete_configuration() {
        let fx = fixture();
        let validated = validate(&config(&fx)).unwrap();
        assert_eq!(validated.application_file, PathBuf::from(&fx.app));
        assert_eq!(validated.package, "com.example.app");
        assert_eq!(validated.track, Track::Beta);
        assert_eq!(validated.track_status, TrackStatus::Halted);
    }

    #[test]
    fn blank_name_is_missing_data() {
        let fx = fixture();
        for name in [None, Some(String::new()), Some("   ".to_string())] {
            let mut cfg = config(&fx);
            cfg.name = name;
            let err = validate(&cfg).unwrap_err();
            assert_eq!(err.message, "Missing configuration data.");
            assert_eq!(err.details["fields"][0], "name");
        }
    }

    #[test]
    fn blank_package_is_missing_data() {
        let fx = fixture();
        let mut cfg = config(&fx);
        cfg.package = Some("\t".to_string());
        let err = validate(&cfg).unwrap_err();
        assert_eq!(err.code.as_str(), "config.missing_data");
    }

    #[test]
    fn missing_data_wins_over_missing_files() {
        let mut cfg = config(&fixture());
        cfg.name = None;
        cfg.application_file = Some("/nonexistent/app.aab".to_string());
        let err = validate(&cfg).unwrap_err();
        assert_eq!(err.message, "Missing configuration data.");
    }

    #[test]
    fn missing_application_file_checked_before_service_account() {
        let mut cfg = config(&fixture());
        cfg.application_file = Some("/nonexistent/app.aab".to_string());
        cfg.service_account_file = Some("/nonexistent/account.json".to_string());
        let err = validate(&cfg).unwrap_err();
        assert_eq!(err.message, "The application file does not exist.");
        assert_eq!(err.details["field"], "applicationFile");
    }

    #[test]
    fn missing_service_account_file() {
        let fx = fixture();
        let mut cfg = config(&fx);
        cfg.service_account_file = None;
        let err = validate(&cfg).unwrap_err();
        assert_eq!(err.message, "The service account file does not exist.");
        assert!(err.code.is_clean_exit());
    }

    #[test]
    fn directory_is_not_an_application_file() {
        let fx = fixture();
        let mut cfg = config(&fx);
        cfg.application_file = Some(fx._dir.path().to_string_lossy().to_string());
        let err = validate(&cfg).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.file_missing");
    }
}
