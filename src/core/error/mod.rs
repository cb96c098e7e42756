

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigNotFound,
    ConfigInvalidJson,
    ConfigInvalidValue,
    ConfigMissingData,

    ValidationFileMissing,

    AuthInvalidCredentials,
    AuthTokenFailed,

    RemoteRequestFailed,
    RemoteApiError,
    RemoteInvalidResponse,

    UploadUnsupportedType,
    UploadNoVersionCode,

    PromptInputClosed,
    PromptAttemptsExhausted,

    InternalIoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigNotFound => "config.not_found",
            ErrorCode::ConfigInvalidJson => "config.invalid_json",
            ErrorCode::ConfigInvalidValue => "config.invalid_value",
            ErrorCode::ConfigMissingData => "config.missing_data",

            ErrorCode::ValidationFileMissing => "validation.file_missing",

            ErrorCode::AuthInvalidCredentials => "auth.invalid_credentials",
            ErrorCode::AuthTokenFailed => "auth.token_failed",

            ErrorCode::RemoteRequestFailed => "remote.request_failed",
            ErrorCode::RemoteApiError => "remote.api_error",
            ErrorCode::RemoteInvalidResponse => "remote.invalid_response",

            ErrorCode::UploadUnsupportedType => "upload.unsupported_type",
            ErrorCode::UploadNoVersionCode => "upload.no_version_code",

            ErrorCode::PromptInputClosed => "prompt.input_closed",
            ErrorCode::PromptAttemptsExhausted => "prompt.attempts_exhausted",

            ErrorCode::InternalIoError => "internal.io_error",
        }
    }

    /// Usage and validation failures are reported to the user and end the
    /// process without signalling failure. Everything else is fatal.
    pub fn is_clean_exit(&self) -> bool {
        matches!(
            self,
            ErrorCode::ConfigNotFound
                | ErrorCode::ConfigMissingData
                | ErrorCode::ValidationFileMissing
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidValueDetails {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMissingDetails {
    pub field: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRequestDetails {
    pub operation: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteApiErrorDetails {
    pub operation: String,
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn config_not_found(path: Option<String>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            "The configuration file could not be found.",
            serde_json::json!({ "path": path }),
        )
        .with_hint("Usage: play-publisher <config.json>")
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            to_details(ConfigInvalidJsonDetails {
                path: path.into(),
                error: err.to_string(),
            }),
        )
    }

    pub fn config_invalid_value(
        key: impl Into<String>,
        value: Option<String>,
        problem: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            "Invalid configuration value",
            to_details(ConfigInvalidValueDetails {
                key: key.into(),
                value,
                problem: problem.into(),
            }),
        )
    }

    pub fn config_missing_data(fields: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ConfigMissingData,
            "Missing configuration data.",
            serde_json::json!({ "fields": fields }),
        )
    }

    pub fn file_missing(
        message: impl Into<String>,
        field: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::ValidationFileMissing,
            message,
            to_details(FileMissingDetails {
                field: field.into(),
                path: path.into(),
            }),
        )
    }

    pub fn auth_invalid_credentials(path: impl Into<String>, problem: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::AuthInvalidCredentials,
            "Service account credentials are invalid",
            serde_json::json!({ "path": path.into(), "problem": problem.into() }),
        )
        .with_hint("Download a fresh JSON key for the service account from the Google Cloud console")
    }

    pub fn auth_token_failed(problem: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::AuthTokenFailed,
            "Failed to obtain an access token",
            serde_json::json!({ "problem": problem.into() }),
        )
        .with_hint("Check that the service account is linked to the Play Console developer account")
    }

    pub fn remote_request_failed(operation: impl Into<String>, err: reqwest::Error) -> Self {
        Self::new(
            ErrorCode::RemoteRequestFailed,
            format!("HTTP request failed: {}", err),
            to_details(RemoteRequestDetails {
                operation: operation.into(),
                error: err.to_string(),
            }),
        )
    }

    pub fn remote_api_error(operation: impl Into<String>, status: u16, body: &str) -> Self {
        Self::new(
            ErrorCode::RemoteApiError,
            format!("API error: HTTP {}", status),
            to_details(RemoteApiErrorDetails {
                operation: operation.into(),
                status,
                body: body.to_string(),
            }),
        )
    }

    pub fn remote_invalid_response(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::RemoteInvalidResponse,
            "Invalid response from publishing API",
            to_details(RemoteRequestDetails {
                operation: operation.into(),
                error: error.into(),
            }),
        )
    }

    pub fn upload_unsupported_type(path: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UploadUnsupportedType,
            "Unsupported artifact type",
            serde_json::json!({ "path": path.into(), "supported": [".apk", ".aab"] }),
        )
    }

    pub fn upload_no_version_code(edit_id: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UploadNoVersionCode,
            "No version code was reported for the uploaded artifact",
            serde_json::json!({ "editId": edit_id.into() }),
        )
    }

    pub fn prompt_input_closed(question: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::PromptInputClosed,
            "Input ended before a valid answer was given",
            serde_json::json!({ "prompt": question.into() }),
        )
    }

    pub fn prompt_attempts_exhausted(question: impl Into<String>, attempts: u32) -> Self {
        Self::new(
            ErrorCode::PromptAttemptsExhausted,
            format!("No valid answer after {} attempts", attempts),
            serde_json::json!({ "prompt": question.into(), "attempts": attempts }),
        )
        .with_hint("Raise the limit with --max-attempts or PLAY_PUBLISHER_MAX_ATTEMPTS")
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            "IO error",
            to_details(InternalIoErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_end_cleanly() {
        assert!(Error::config_missing_data(vec!["name".to_string()])
            .code
            .is_clean_exit());
        assert!(Error::file_missing("gone", "applicationFile", "/x.aab")
            .code
            .is_clean_exit());
        assert!(Error::config_not_found(None).code.is_clean_exit());
    }

    #[test]
    fn remote_and_upload_failures_are_fatal() {
        assert!(!Error::upload_unsupported_type("app.ipa").code.is_clean_exit());
        assert!(!Error::remote_api_error("edits.commit", 500, "boom")
            .code
            .is_clean_exit());
        assert!(!Error::prompt_input_closed("track").code.is_clean_exit());
    }

    #[test]
    fn remote_api_error_keeps_status_and_body() {
        let err = Error::remote_api_error("edits.insert", 403, "forbidden");
        assert_eq!(err.code.as_str(), "remote.api_error");
        assert_eq!(err.details["status"], 403);
        assert_eq!(err.details["body"], "forbidden");
        assert_eq!(err.details["operation"], "edits.insert");
    }

    #[test]
    fn with_hint_appends() {
        let err = Error::upload_no_version_code("edit-1").with_hint("one").with_hint("two");
        assert_eq!(err.hints.len(), 2);
        assert_eq!(err.hints[1].message, "two");
    }
}
