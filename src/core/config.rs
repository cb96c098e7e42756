//! Release configuration file and the track enums it selects from.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::utils::io;

/// Enum that is chosen by its 1-based ordinal, in the config file or at a prompt.
pub trait Ordinal: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn ordinal(self) -> u8;

    /// Human label shown in prompt menus.
    fn label(self) -> &'static str;

    fn from_ordinal(value: i64) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| i64::from(candidate.ordinal()) == value)
    }

    /// Menu line such as `1 = Alpha, 2 = Beta, 3 = Production`.
    fn menu() -> String {
        Self::ALL
            .iter()
            .map(|v| format!("{} = {}", v.ordinal(), v.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i64")]
pub enum Track {
    Alpha,
    Beta,
    Production,
}

impl Track {
    /// Track name used by the publishing API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Alpha => "alpha",
            Track::Beta => "beta",
            Track::Production => "production",
        }
    }
}

impl Ordinal for Track {
    const ALL: &'static [Self] = &[Track::Alpha, Track::Beta, Track::Production];

    fn ordinal(self) -> u8 {
        match self {
            Track::Alpha => 1,
            Track::Beta => 2,
            Track::Production => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Track::Alpha => "Alpha",
            Track::Beta => "Beta",
            Track::Production => "Production",
        }
    }
}

impl TryFrom<i64> for Track {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        Self::from_ordinal(value).ok_or_else(|| format!("track must be 1-3, got {}", value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "i64")]
pub enum TrackStatus {
    Completed,
    Draft,
    Halted,
    InProgress,
}

impl TrackStatus {
    /// Release status name used by the publishing API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackStatus::Completed => "completed",
            TrackStatus::Draft => "draft",
            TrackStatus::Halted => "halted",
            TrackStatus::InProgress => "inProgress",
        }
    }
}

impl Ordinal for TrackStatus {
    const ALL: &'static [Self] = &[
        TrackStatus::Completed,
        TrackStatus::Draft,
        TrackStatus::Halted,
        TrackStatus::InProgress,
    ];

    fn ordinal(self) -> u8 {
        match self {
            TrackStatus::Completed => 1,
            TrackStatus::Draft => 2,
            TrackStatus::Halted => 3,
            TrackStatus::InProgress => 4,
        }
    }

    fn label(self) -> &'static str {
        match self {
            TrackStatus::Completed => "Completed",
            TrackStatus::Draft => "Draft",
            TrackStatus::Halted => "Halted",
            TrackStatus::InProgress => "InProgress",
        }
    }
}

impl TryFrom<i64> for TrackStatus {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        Self::from_ordinal(value).ok_or_else(|| format!("trackStatus must be 1-4, got {}", value))
    }
}

/// Contents of the JSON configuration file. Missing keys stay `None`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    pub application_file: Option<String>,
    pub name: Option<String>,
    pub package: Option<String>,
    pub service_account_file: Option<String>,
    pub track: Option<Track>,
    pub track_status: Option<TrackStatus>,
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::config_not_found(Some(path.display().to_string())));
        }

        let content = io::read_file(path, "read configuration")?;
        Self::from_json(&path.display().to_string(), &content)
    }

    pub fn from_json(source: &str, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(source, e))
    }

    /// Prompt for the track and track status when the file left them out.
    pub fn fill_missing<R, W>(&mut self, prompter: &mut Prompter<R, W>) -> Result<()>
    where
        R: std::io::BufRead,
        W: std::io::Write,
    {
        if self.track.is_none() {
            self.track = Some(prompter.choose::<Track>("Choose number of track to publish to:")?);
        }
        if self.track_status.is_none() {
            self.track_status =
                Some(prompter.choose::<TrackStatus>("Choose number of track status:")?);
        }
        Ok(())
    }
}
