//! Release composition: release-note language, release-note text and the
//! track payload sent to the publishing API.

use regex::Regex;
use std::io::{BufRead, Write};
use std::sync::OnceLock;

use crate::api::{LocalizedText, TrackRelease, TrackResource};
use crate::config::{Track, TrackStatus};
use crate::error::Result;
use crate::prompt::Prompter;

pub const LANGUAGE_PROMPT: &str = "Please enter language code for release notes (e.g. en-US)";
pub const NOTES_PROMPT: &str = "Please enter release notes. Press Ctrl+D when done.";

fn language_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z]{2}-[A-Z]{2}$").expect("valid language regex"))
}

/// True for codes shaped like `en-US`.
pub fn is_language_code(value: &str) -> bool {
    language_code_pattern().is_match(value)
}

/// Ask for the language code and release notes of the release.
pub fn collect_release_notes<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<LocalizedText> {
    let language = prompter.ask(LANGUAGE_PROMPT, |answer| {
        is_language_code(answer).then(|| answer.to_string())
    })?;
    let text = prompter.read_multiline(NOTES_PROMPT)?.join("\n");

    Ok(LocalizedText { language, text })
}

/// Track payload holding one release with one version code and one note.
pub fn compose_track(
    track: Track,
    status: TrackStatus,
    version_code: i64,
    notes: LocalizedText,
) -> TrackResource {
    TrackResource {
        track: track.as_str().to_string(),
        releases: vec![TrackRelease {
            name: format!("Release {}", version_code),
            release_notes: vec![notes],
            status: status.as_str().to_string(),
            version_codes: vec![version_code.to_string()],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), 5)
    }

    #[test]
    fn accepts_well_formed_language_codes() {
        assert!(is_language_code("en-US"));
        assert!(is_language_code("de-DE"));
    }

    #[test]
    fn rejects_malformed_language_codes() {
        for code in ["EN-us", "en_US", "english", "en-USA", " en-US", "en-US-x", ""] {
            assert!(!is_language_code(code), "{} should be rejected", code);
        }
    }

    #[test]
    fn collects_language_and_joined_notes() {
        let mut p = prompter("EN-us\nen_US\nen-US\nFixed crash\nFaster startup\n\n");
        let notes = collect_release_notes(&mut p).unwrap();

        assert_eq!(notes.language, "en-US");
        assert_eq!(notes.text, "Fixed crash\nFaster startup");

        let shown = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(shown.matches(LANGUAGE_PROMPT).count(), 1);
        assert!(shown.contains("'en_US' is not a valid answer."));
        assert!(shown.contains("Ctrl+D"));
    }

    #[test]
    fn empty_notes_at_end_of_input() {
        let mut p = prompter("de-DE\n");
        let notes = collect_release_notes(&mut p).unwrap();
        assert_eq!(notes.language, "de-DE");
        assert_eq!(notes.text, "");
    }

    #[test]
    fn compose_track_maps_enums_to_api_names() {
        let notes = LocalizedText {
            language: "en-US".to_string(),
            text: "Notes".to_string(),
        };
        let track = compose_track(Track::Beta, TrackStatus::Halted, 1042, notes.clone());

        assert_eq!(track.track, "beta");
        assert_eq!(track.releases.len(), 1);
        let release = &track.releases[0];
        assert_eq!(release.name, "Release 1042");
        assert_eq!(release.status, "halted");
        assert_eq!(release.version_codes, vec!["1042"]);
        assert_eq!(release.release_notes, vec![notes]);
    }
}
