//! Per-test-case context and the JSON GET probe.

use std::fmt::Display;
use std::path::PathBuf;

use serde_json::Value;

use crate::client::{Client, TransportError};
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::fixture::Fixture;
use crate::reporter::Reporter;
use crate::response::{Body, ExpectedResponse};
use crate::validate::ValidateBodyFn;

pub const DEFAULT_TEST_URL: &str = "http://localhost";
pub const DEFAULT_STATUS_CODE: u16 = 200;

const CONTENT_TYPE_HEADER: &str = "Content-Type";
const STATUS_OK: u16 = 200;

/// Arguments for [`TestContext::new`]. Unset fields take their defaults.
#[derive(Clone, Default)]
pub struct TestContextArgs {
    pub test_num: usize,
    /// Used as-is when set; `test_url` and `status_code` are then ignored.
    pub expected_response: Option<ExpectedResponse>,
    pub validate_body: Option<ValidateBodyFn>,
    /// default: `http://localhost`
    pub test_url: String,
    /// default: 200
    pub status_code: u16,
    /// Bound directly when set; `filename` is then ignored.
    pub fixture: Option<Fixture>,
    pub filename: String,
    /// Root for a fixture built from `filename`; `<cwd>/fixtures` when unset.
    pub fixture_dir: Option<PathBuf>,
}

impl TestContextArgs {
    /// Arguments carrying the configured fixture directory.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            fixture_dir: config.fixture_dir.clone(),
            ..Default::default()
        }
    }
}

pub struct TestContext {
    pub(crate) reporter: Reporter,
    pub(crate) expected_response: ExpectedResponse,
    validate_body: Option<ValidateBodyFn>,
}

impl TestContext {
    pub fn new(args: TestContextArgs) -> Self {
        let test_url = if args.test_url.is_empty() {
            DEFAULT_TEST_URL.to_owned()
        } else {
            args.test_url
        };
        let status_code = if args.status_code == 0 {
            DEFAULT_STATUS_CODE
        } else {
            args.status_code
        };

        let mut expected_response = args
            .expected_response
            .unwrap_or_else(|| ExpectedResponse::new(test_url, status_code));
        if let Some(fixture) = args.fixture {
            expected_response.fixture = Some(fixture);
        } else if !args.filename.is_empty() {
            expected_response.fixture = Some(match args.fixture_dir {
                Some(dir) => Fixture::with_root(dir, args.filename),
                None => Fixture::new(args.filename),
            });
        }

        Self {
            reporter: Reporter::new(args.test_num),
            expected_response,
            validate_body: args.validate_body,
        }
    }

    pub fn test_num(&self) -> usize {
        self.reporter.test_num()
    }

    pub fn expected_response(&self) -> &ExpectedResponse {
        &self.expected_response
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn into_reporter(self) -> Reporter {
        self.reporter
    }

    /// `"<message> from <url>"`
    pub fn error_message(&self, message: &str) -> String {
        format!("{message} from {}", self.expected_response.url)
    }

    /// `"<message> from <url>: <err>"`
    pub fn error_with(&self, message: &str, err: impl Display) -> String {
        format!("{}: {err}", self.error_message(message))
    }

    /// Report a failure outside any sub-step, naming the URL.
    pub fn error(&mut self, message: &str, err: impl Display) {
        let message = self.error_with(message, err);
        self.reporter.error(message);
    }

    pub(crate) fn validate(&self, body: &[u8]) -> Result<Value, HarnessError> {
        let validate = self
            .validate_body
            .as_ref()
            .ok_or(HarnessError::MissingValidator)?;
        validate(body).map_err(HarnessError::InvalidBody)
    }

    fn ignores(&self, err: &TransportError) -> bool {
        self.expected_response.status_code.is_none() && err.is_connection_refused()
    }

    /// GET the bound URL and capture status, content type and body onto the
    /// expected response, one named sub-step per check.
    ///
    /// With no status demanded, the observed status is stored on the expected
    /// response, so a later refresh writes it.
    ///
    /// Returns `Ok(None)` when there was no response or the status was not
    /// 200. An `Err` carries a body read or validation failure that has
    /// already been reported.
    pub async fn test_json_get(
        &mut self,
        client: &Client,
    ) -> Result<Option<ExpectedResponse>, HarnessError> {
        let url = self.expected_response.url.clone();

        let mut step = self.reporter.step(format!("Get_URL_via_HTTP[{url}]"));
        let response = match client.get(&url, None).await {
            Ok(response) => Some(response),
            Err(err) if self.ignores(&err) => {
                tracing::debug!(%url, "connection refused with no status demanded, ignoring");
                None
            }
            Err(err) => {
                step.error(self.error_with("Failed to HTTP GET", &err));
                None
            }
        };
        self.reporter.record(step);
        let Some(response) = response else {
            return Ok(None);
        };

        let status = response.status();
        let mut step = self.reporter.step(format!("Check_StatusCode[{url}]"));
        match self.expected_response.status_code {
            Some(expected) if expected != status => step.error(
                self.error_message(&format!("Got status code {status}, expected {expected}")),
            ),
            Some(_) => {}
            None => self.expected_response.status_code = Some(status),
        }
        self.reporter.record(step);

        if status != STATUS_OK {
            return Ok(None);
        }

        let content_types = response.content_types();

        let mut outcome = Ok(());
        let mut step = self.reporter.step(format!("Read_Body[{url}]"));
        let body = match response.read_body().await {
            Ok(body) => {
                if body.is_empty() {
                    step.error(self.error_message("Failed due to empty body returned"));
                }
                body
            }
            Err(err) => {
                step.error(self.error_with("Failed to read body", &err));
                outcome = Err(HarnessError::ReadBody(err));
                Vec::new()
            }
        };
        self.expected_response.body = Some(Body::Raw(String::from_utf8_lossy(&body).into_owned()));
        self.reporter.record(step);

        let mut step = self.reporter.step(format!("Check_ContentType[{url}]"));
        match content_types.as_slice() {
            [content_type] => self.expected_response.content_type = content_type.clone(),
            [] => step.error(self.error_message(&format!("no '{CONTENT_TYPE_HEADER}' header"))),
            _ => step.error(self.error_message(&format!(
                "ambiguous '{CONTENT_TYPE_HEADER}' header: {}",
                content_types.join(", ")
            ))),
        }
        self.reporter.record(step);

        let mut step = self.reporter.step(format!("Body_Is_Valid_JSON[{url}]"));
        if let Err(err) = self.validate(&body) {
            step.error(self.error_with("Failed to unmarshal JSON from body", &err));
            if outcome.is_ok() {
                outcome = Err(err);
            }
        }
        self.reporter.record(step);

        outcome.map(|()| Some(self.expected_response.clone()))
    }
}
