//! Fixture refresh — regenerate a fixture file from a live GET.
//!
//! The envelope is written tab-indented while the decoded body carries an
//! extra three-space prefix. The two are marshaled separately: the envelope
//! goes out with a random marker string in place of the body, then the quoted
//! marker is replaced by the body JSON.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::client::Client;
use crate::context::TestContext;
use crate::error::HarnessError;
use crate::json;
use crate::response::Body;

const ENVELOPE_PREFIX: &str = "";
const ENVELOPE_INDENT: &str = "\t";
const BODY_PREFIX: &str = "   ";
const BODY_INDENT: &str = "\t";

impl TestContext {
    /// Probe the bound URL and overwrite the bound fixture with the result.
    ///
    /// Every failure is reported before it is returned; the `Err` only tells
    /// the caller that nothing was written (or that the write itself failed).
    pub async fn refresh_json_fixture(&mut self, client: &Client) -> Result<PathBuf, HarnessError> {
        let Some(fixture) = self.expected_response.fixture.clone() else {
            self.error("Failed to refresh fixture", HarnessError::MissingFixture);
            return Err(HarnessError::MissingFixture);
        };

        let mut response = match self.test_json_get(client).await? {
            Some(response) => response,
            None => {
                self.error("Failed to HTTP GET", HarnessError::NoResponse);
                return Err(HarnessError::NoResponse);
            }
        };

        let Some(Body::Raw(body)) = response.body.take() else {
            self.error("Failed to HTTP GET", HarnessError::NoResponse);
            return Err(HarnessError::NoResponse);
        };

        let marker = Uuid::new_v4().to_string();
        response.body = Some(Body::Marker(marker.clone()));

        let envelope = json::to_string_indent(&response, ENVELOPE_PREFIX, ENVELOPE_INDENT)
            .map_err(|err| self.fail("Failed to marshal response JSON", err.into()))?;

        let decoded = self
            .validate(body.as_bytes())
            .map_err(|err| self.fail("Failed to unmarshal JSON from body", err))?;

        let body_json = json::to_string_indent(&decoded, BODY_PREFIX, BODY_INDENT)
            .map_err(|err| self.fail("Failed to marshal body data JSON", err.into()))?;

        let data = splice_body(&envelope, &marker, &body_json)
            .map_err(|err| self.fail("Failed to splice body into response JSON", err))?;

        let path = fixture.filepath(&mut self.reporter);
        if let Err(source) = write_fixture(&path, data.as_bytes()).await {
            let err = HarnessError::WriteFixture {
                path: path.clone(),
                source,
            };
            let message = format!("Failed to write json to {}", fixture.filename());
            return Err(self.fail(&message, err));
        }

        tracing::info!(path = %path.display(), bytes = data.len(), "fixture refreshed");
        self.expected_response.body = None;
        Ok(path)
    }

    fn fail(&mut self, message: &str, err: HarnessError) -> HarnessError {
        tracing::warn!(kind = err.kind(), error = %err, "refresh aborted");
        self.error(message, &err);
        err
    }
}

/// Replace the first quoted `marker` in `envelope` with the unquoted `body`.
pub(crate) fn splice_body(envelope: &str, marker: &str, body: &str) -> Result<String, HarnessError> {
    let quoted = format!("\"{marker}\"");
    if !envelope.contains(&quoted) {
        return Err(HarnessError::MarkerNotFound);
    }
    Ok(envelope.replacen(&quoted, body, 1))
}

/// Create or truncate `path`; on Unix the mode is 0o777 less the umask.
pub(crate) async fn write_fixture(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o777);
    let mut file = options.open(path).await?;
    file.write_all(data).await?;
    file.flush().await
}
