//! Read-only fixture comparison, and the refresh-or-compare entry point.

use crate::client::Client;
use crate::config::HarnessConfig;
use crate::context::TestContext;
use crate::error::HarnessError;
use crate::response::Body;

impl TestContext {
    /// Probe the bound URL and check it against the stored fixture. Never
    /// writes. Mismatches are reported in a `Match_Fixture[<url>]` sub-step.
    pub async fn assert_json_fixture(&mut self, client: &Client) -> Result<(), HarnessError> {
        let Some(fixture) = self.expected_response.fixture.clone() else {
            self.error("Failed to compare fixture", HarnessError::MissingFixture);
            return Err(HarnessError::MissingFixture);
        };

        let stored = match fixture.load(&mut self.reporter).await {
            Ok(stored) => stored,
            Err(err) => {
                let message = format!("Failed to load fixture {}", fixture.filename());
                self.error(&message, &err);
                return Err(err);
            }
        };

        let live = match self.test_json_get(client).await? {
            Some(live) => live,
            None => {
                self.error("Failed to HTTP GET", HarnessError::NoResponse);
                return Err(HarnessError::NoResponse);
            }
        };
        let decoded = match live.raw_body() {
            Some(raw) => self.validate(raw.as_bytes())?,
            None => return Err(HarnessError::NoResponse),
        };

        let url = &self.expected_response.url;
        let mut step = self.reporter.step(format!("Match_Fixture[{url}]"));
        if stored.status_code != live.status_code {
            step.error(self.error_message(&format!(
                "status code: expected {:?}, got {:?}",
                stored.status_code, live.status_code
            )));
        }
        if stored.content_type != live.content_type {
            step.error(self.error_message(&format!(
                "content type: expected {:?}, got {:?}",
                stored.content_type, live.content_type
            )));
        }
        match stored.body.as_ref().and_then(Body::as_decoded) {
            Some(expected) if *expected == decoded => {}
            Some(expected) => step.error(self.error_message(&format!(
                "body: expected {expected}, got {decoded}"
            ))),
            None => step.error(self.error_message(&format!(
                "body: fixture {} has no body",
                fixture.filename()
            ))),
        }
        self.reporter.record(step);
        Ok(())
    }

    /// Refresh the fixture when `config.refresh` is set, compare otherwise.
    pub async fn run_json_fixture(
        &mut self,
        client: &Client,
        config: &HarnessConfig,
    ) -> Result<(), HarnessError> {
        if config.refresh {
            self.refresh_json_fixture(client).await.map(|_| ())
        } else {
            self.assert_json_fixture(client).await
        }
    }
}
