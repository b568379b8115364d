use std::fmt;
use std::time::Duration;

use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::constants::DEFAULT_TIMEOUT_SECS;

// ============================================================================
// Source Description
// ============================================================================

/// How a list-valued query parameter is put on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// `key=a,b,c`
    CommaJoined,
    /// `key=a&key=b&key=c`
    RepeatedKey,
}

/// Value of a single query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
    List(Vec<String>, ListStyle),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Body format a source is expected to answer with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Json,
    PlainText,
}

/// Immutable description of one external data source.
///
/// Built once per invocation through the consuming `with_*` methods and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    pub base_url: String,
    pub path: Vec<String>,
    pub params: Vec<(String, ParamValue)>,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    pub shape: ResponseShape,
}

impl SourceDescriptor {
    pub fn new(base_url: impl Into<String>, shape: ResponseShape) -> Self {
        Self {
            base_url: base_url.into(),
            path: Vec::new(),
            params: Vec::new(),
            headers: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            shape,
        }
    }

    /// Appends a path segment; it is percent-encoded when the request is built
    #[must_use]
    pub fn with_path_segment(mut self, segment: impl Into<String>) -> Self {
        self.path.push(segment.into());
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_list_param<I, S>(mut self, name: impl Into<String>, values: I, style: ListStyle) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.params.push((name.into(), ParamValue::List(values, style)));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// Fetch Outcome
// ============================================================================

/// Classification of a pipeline failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkError,
    DecodeError,
    MissingField,
    ComputeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NetworkError => "NetworkError",
            Self::DecodeError => "DecodeError",
            Self::MissingField => "MissingField",
            Self::ComputeError => "ComputeError",
        };
        f.write_str(name)
    }
}

/// Failure produced by any pipeline stage
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Transport fault: DNS, refused connection, timeout or non-2xx status
    #[error("Network error: {0}")]
    Network(String),

    /// Body did not match the expected response shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Well-formed body lacking an expected path
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Derived value could not be computed
    #[error("Compute error: {0}")]
    Compute(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::NetworkError,
            Self::Decode(_) => ErrorKind::DecodeError,
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::Compute(_) => ErrorKind::ComputeError,
        }
    }

    /// Message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Network(m) | Self::Decode(m) | Self::MissingField(m) | Self::Compute(m) => m,
        }
    }
}

/// Either the stage output or a classified failure
pub type FetchResult<T> = Result<T, FetchError>;

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

// ============================================================================
// Normalized Record
// ============================================================================

/// Scalar value of one normalized field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    /// The source did not provide this field
    Unavailable,
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Unavailable => serializer.serialize_none(),
        }
    }
}

/// Flat, ordered view of a decoded payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    fields: Vec<(String, FieldValue)>,
}

impl NormalizedRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_builder_keeps_declaration_order() {
        let descriptor = SourceDescriptor::new("https://example.com", ResponseShape::Json)
            .with_param("b", "2")
            .with_param("a", 1.0)
            .with_list_param("c", ["x", "y"], ListStyle::RepeatedKey)
            .with_timeout(Duration::from_secs(3));

        let names: Vec<&str> = descriptor.params.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(descriptor.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_error_kind_and_message() {
        let err = FetchError::MissingField("chart.result[0].meta".to_string());
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.message(), "chart.result[0].meta");
        assert_eq!(err.to_string(), "Missing field: chart.result[0].meta");
    }

    #[test]
    fn test_record_serializes_in_insertion_order() {
        let mut record = NormalizedRecord::new();
        record.push("zeta", FieldValue::Number(1.5));
        record.push("alpha", FieldValue::Text("x".to_string()));
        record.push("mid", FieldValue::Unavailable);

        let json = serde_json::to_string(&record).expect("should serialize");
        assert_eq!(json, r#"{"zeta":1.5,"alpha":"x","mid":null}"#);
    }
}
