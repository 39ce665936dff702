//! Golden-fixture testing for JSON HTTP endpoints.
//!
//! A [`TestContext`] probes one URL with a live GET, checks the status code,
//! content type and body as separately reported sub-steps, and then either
//! compares the result with a fixture under `fixtures/` or rewrites that
//! fixture from live data.
//!
//! ```no_run
//! use http_fixture::{Client, HarnessConfig, TestContext, TestContextArgs, any_json};
//!
//! # async fn run() {
//! let config = HarnessConfig::from_env();
//! let client = Client::new(&config).unwrap();
//! let mut tc = TestContext::new(TestContextArgs {
//!     test_url: "http://localhost:3000/repos".to_owned(),
//!     filename: "repos.json".to_owned(),
//!     validate_body: Some(any_json()),
//!     ..Default::default()
//! });
//! let _ = tc.run_json_fixture(&client, &config).await;
//! tc.reporter().assert_all_passed();
//! # }
//! ```

pub mod client;
pub mod compare;
pub mod config;
pub mod context;
pub mod error;
pub mod fixture;
pub mod json;
pub mod refresh;
pub mod reporter;
pub mod response;
pub mod tracing;
pub mod validate;

pub use client::{Client, HttpResponse, TransportError};
pub use config::HarnessConfig;
pub use context::{TestContext, TestContextArgs};
pub use error::HarnessError;
pub use fixture::Fixture;
pub use reporter::Reporter;
pub use response::{Body, ExpectedResponse};
pub use validate::{ValidateBodyFn, any_json, json_validator, validator};
