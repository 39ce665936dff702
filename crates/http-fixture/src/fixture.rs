//! Fixture locator and loader.
//!
//! A fixture is a golden file under `<cwd>/fixtures/` holding one recorded
//! [`ExpectedResponse`]. The path is recomputed on every call, never stored.

use std::io;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::error::HarnessError;
use crate::reporter::Reporter;
use crate::response::ExpectedResponse;

/// Directory under the working directory that holds fixture files.
pub const FIXTURES_DIR: &str = "fixtures";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    filename: String,
    /// Replaces `<cwd>/fixtures` when set.
    root: Option<PathBuf>,
}

impl Fixture {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            root: None,
        }
    }

    /// Fixture resolved against `root` instead of `<cwd>/fixtures`.
    pub fn with_root(root: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            root: Some(root.into()),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Resolve the fixture path, reporting a working-directory failure and
    /// returning an empty path so that the caller's file operation fails with
    /// its own error.
    pub fn filepath(&self, reporter: &mut Reporter) -> PathBuf {
        match &self.root {
            Some(root) => root.join(trim_leading_separators(&self.filename)),
            None => resolve(std::env::current_dir(), &self.filename, reporter),
        }
    }

    pub fn try_filepath(&self) -> Result<PathBuf, HarnessError> {
        match &self.root {
            Some(root) => Ok(root.join(trim_leading_separators(&self.filename))),
            None => {
                let wd = std::env::current_dir().map_err(HarnessError::WorkingDir)?;
                Ok(locate(&wd, &self.filename))
            }
        }
    }

    /// Read and parse the fixture file. The body comes back decoded.
    pub async fn load(&self, reporter: &mut Reporter) -> Result<ExpectedResponse, HarnessError> {
        let path = self.filepath(reporter);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| HarnessError::ReadFixture {
                path: path.clone(),
                source,
            })?;
        let mut response: ExpectedResponse = serde_json::from_str(&content)
            .map_err(|source| HarnessError::ParseFixture { path, source })?;
        response.fixture = Some(self.clone());
        Ok(response)
    }
}

fn resolve(wd: io::Result<PathBuf>, filename: &str, reporter: &mut Reporter) -> PathBuf {
    match wd {
        Ok(wd) => locate(&wd, filename),
        Err(err) => {
            reporter.error(format!(
                "unable to get working directory for filename='{filename}': {err}"
            ));
            PathBuf::new()
        }
    }
}

/// `<wd>/fixtures/<filename>` with leading separators stripped from `filename`.
pub fn locate(wd: &Path, filename: &str) -> PathBuf {
    wd.join(FIXTURES_DIR).join(trim_leading_separators(filename))
}

fn trim_leading_separators(filename: &str) -> &str {
    filename.trim_start_matches(MAIN_SEPARATOR)
}
