use std::path::PathBuf;

/// Harness error variants.
///
/// These steer control flow inside a test case. Everything user-facing goes
/// through the [`Reporter`](crate::reporter::Reporter).
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("unable to get working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
    #[error("failed to read body: {0}")]
    ReadBody(#[source] reqwest::Error),
    #[error("invalid body: {0}")]
    InvalidBody(anyhow::Error),
    #[error("no body validator configured")]
    MissingValidator,
    #[error("no fixture bound to expected response")]
    MissingFixture,
    #[error("failed to marshal JSON: {0}")]
    Marshal(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    WriteFixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    ReadFixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid fixture JSON in {}: {source}", .path.display())]
    ParseFixture {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("body marker not found in marshaled envelope")]
    MarkerNotFound,
    #[error("no response to work from")]
    NoResponse,
}

impl HarnessError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WorkingDir(_) => "WORKING_DIR",
            Self::ReadBody(_) => "READ_BODY",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::MissingValidator => "MISSING_VALIDATOR",
            Self::MissingFixture => "MISSING_FIXTURE",
            Self::Marshal(_) => "MARSHAL",
            Self::WriteFixture { .. } => "WRITE_FIXTURE",
            Self::ReadFixture { .. } => "READ_FIXTURE",
            Self::ParseFixture { .. } => "PARSE_FIXTURE",
            Self::MarkerNotFound => "MARKER_NOT_FOUND",
            Self::NoResponse => "NO_RESPONSE",
        }
    }
}
