use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::fixture::Fixture;

/// Response body as it moves through a probe and a refresh.
///
/// A probe stores the body verbatim as [`Body::Raw`]. A refresh swaps in a
/// [`Body::Marker`] while the envelope is marshaled, and fixture files read
/// back from disk always yield [`Body::Decoded`].
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Raw(String),
    Decoded(Value),
    Marker(String),
}

impl Body {
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_decoded(&self) -> Option<&Value> {
        match self {
            Self::Decoded(value) => Some(value),
            _ => None,
        }
    }
}

impl Serialize for Body {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Raw(text) | Self::Marker(text) => serializer.serialize_str(text),
            Self::Decoded(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Body {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::Decoded)
    }
}

/// The envelope under test, and the shape of a fixture file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExpectedResponse {
    #[serde(rename = "URL")]
    pub url: String,
    /// `None` means no particular status is demanded.
    pub status_code: Option<u16>,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub body: Option<Body>,
    #[serde(skip)]
    pub fixture: Option<Fixture>,
}

impl ExpectedResponse {
    /// A zero `status_code` leaves the expectation unset.
    pub fn new(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            url: url.into(),
            status_code: (status_code != 0).then_some(status_code),
            content_type: String::new(),
            body: None,
            fixture: None,
        }
    }

    pub fn raw_body(&self) -> Option<&str> {
        self.body.as_ref().and_then(Body::as_raw)
    }
}
