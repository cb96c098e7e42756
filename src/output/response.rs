//! Console reporting and exit code mapping.

use play_publisher::Error;
use std::io::{self, Write};

/// Exit code for a failed run: usage and validation problems end cleanly.
pub fn exit_code_for(err: &Error) -> u8 {
    if err.code.is_clean_exit() {
        0
    } else {
        1
    }
}

/// Multi-line diagnostic for a fatal error.
pub fn render_error(err: &Error) -> String {
    let mut out = format!("Error [{}]: {}", err.code.as_str(), err.message);

    let has_details = match &err.details {
        serde_json::Value::Null => false,
        serde_json::Value::Object(map) => !map.is_empty(),
        _ => true,
    };
    if has_details {
        let details = serde_json::to_string_pretty(&err.details)
            .unwrap_or_else(|_| err.details.to_string());
        out.push_str(&format!("\n{}", details));
    }

    for hint in &err.hints {
        out.push_str(&format!("\nHint: {}", hint.message));
    }
    out
}

/// Print a plain message to stdout, ignoring a closed pipe.
pub fn print_message(message: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", message) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("Failed to write output: {}", e);
        }
    }
}

/// Report a failed run and return the process exit code.
///
/// Usage and validation failures print only their message to stdout.
/// Everything else prints the full diagnostic to stderr.
pub fn report_error(err: &Error) -> u8 {
    if err.code.is_clean_exit() {
        print_message(&err.message);
    } else {
        eprintln!("{}", render_error(err));
    }
    exit_code_for(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_exit_zero() {
        let err = Error::config_missing_data(vec!["name".to_string()]);
        assert_eq!(exit_code_for(&err), 0);
    }

    #[test]
    fn fatal_errors_exit_one() {
        let err = Error::upload_unsupported_type("app.ipa");
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn render_error_includes_code_details_and_hints() {
        let err = Error::remote_api_error("edits.commit", 409, "conflict").with_hint("retry later");
        let text = render_error(&err);

        assert!(text.starts_with("Error [remote.api_error]: API error: HTTP 409"));
        assert!(text.contains("\"status\": 409"));
        assert!(text.contains("Hint: retry later"));
    }

    #[test]
    fn render_error_skips_empty_details() {
        let err = Error::new(
            play_publisher::ErrorCode::RemoteInvalidResponse,
            "boom",
            serde_json::Value::Null,
        );
        assert_eq!(render_error(&err), "Error [remote.invalid_response]: boom");
    }
}
