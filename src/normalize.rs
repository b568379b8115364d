//! Field extraction from decoded payloads.
//!
//! A [`FieldMap`] declares, in output order, how each field of a
//! [`NormalizedRecord`] is obtained: read from a path inside a JSON payload,
//! taken from a plain-text body, or derived from fields declared earlier.

use std::fmt;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::models::{FetchError, FetchResult, FieldValue, NormalizedRecord, Payload};

/// One step of a [`JsonPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location inside a JSON document, written as `chart.result[0].meta.currency`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Parses the dotted/indexed notation. Bracket contents that are not a
    /// non-negative integer are read as a literal key.
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        for part in raw.split('.').filter(|p| !p.is_empty()) {
            let (key, mut rest) = part.find('[').map_or((part, ""), |i| part.split_at(i));
            if !key.is_empty() {
                segments.push(PathSegment::Key(key.to_string()));
            }
            while let Some(stripped) = rest.strip_prefix('[') {
                let Some(end) = stripped.find(']') else {
                    segments.push(PathSegment::Key(rest.to_string()));
                    break;
                };
                let inner = &stripped[..end];
                segments.push(
                    inner
                        .parse()
                        .map_or_else(|_| PathSegment::Key(inner.to_string()), PathSegment::Index),
                );
                rest = &stripped[end + 1..];
            }
        }
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Resolves the path; JSON `null` counts as absent
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match segment {
                PathSegment::Key(key) => current.get(key.as_str())?,
                PathSegment::Index(index) => current.get(*index)?,
            };
        }
        (!current.is_null()).then_some(current)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for JsonPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// How a single field is obtained
#[derive(Debug, Clone)]
pub enum Extract {
    /// First present path wins; later entries are fallbacks
    Path(Vec<JsonPath>),
    /// Whole plain-text body, trimmed
    Body,
    /// `minuend - subtrahend`, both earlier fields
    Difference { minuend: String, subtrahend: String },
    /// `delta / base * 100`, both earlier fields
    PercentChange { delta: String, base: String },
    /// Maps an earlier integer field through a lookup table
    Lookup {
        field: String,
        describe: fn(i64) -> &'static str,
    },
}

impl Extract {
    pub fn path(path: &str) -> Self {
        Self::Path(vec![JsonPath::parse(path)])
    }

    pub fn first_of<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        Self::Path(paths.into_iter().map(JsonPath::parse).collect())
    }

    pub fn difference(minuend: &str, subtrahend: &str) -> Self {
        Self::Difference {
            minuend: minuend.to_string(),
            subtrahend: subtrahend.to_string(),
        }
    }

    pub fn percent_change(delta: &str, base: &str) -> Self {
        Self::PercentChange {
            delta: delta.to_string(),
            base: base.to_string(),
        }
    }

    pub fn lookup(field: &str, describe: fn(i64) -> &'static str) -> Self {
        Self::Lookup {
            field: field.to_string(),
            describe,
        }
    }

    fn describe_source(&self, name: &str) -> String {
        match self {
            Self::Path(paths) => paths
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Body => "response body".to_string(),
            _ => name.to_string(),
        }
    }
}

/// One declared output field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub extract: Extract,
    /// Required fields fail the record when absent; optional ones become
    /// [`FieldValue::Unavailable`]
    pub required: bool,
}

impl FieldSpec {
    pub fn required(name: &str, extract: Extract) -> Self {
        Self {
            name: name.to_string(),
            extract,
            required: true,
        }
    }

    pub fn optional(name: &str, extract: Extract) -> Self {
        Self {
            name: name.to_string(),
            extract,
            required: false,
        }
    }
}

/// Ordered list of output fields
pub type FieldMap = Vec<FieldSpec>;

/// Builds a record holding exactly the fields of `fields`, in declared order
#[instrument(skip_all, fields(fields = fields.len()))]
pub fn normalize(payload: &Payload, fields: &[FieldSpec]) -> FetchResult<NormalizedRecord> {
    let mut record = NormalizedRecord::new();

    for spec in fields {
        let value = extract(payload, &record, spec)?;
        if spec.required && value.is_unavailable() {
            return Err(FetchError::MissingField(spec.extract.describe_source(&spec.name)));
        }
        debug!(field = %spec.name, ?value, "Extracted field");
        record.push(spec.name.clone(), value);
    }

    Ok(record)
}

fn extract(payload: &Payload, record: &NormalizedRecord, spec: &FieldSpec) -> FetchResult<FieldValue> {
    match &spec.extract {
        Extract::Path(paths) => Ok(match payload {
            Payload::Json(root) => paths
                .iter()
                .find_map(|path| path.resolve(root))
                .map_or(FieldValue::Unavailable, json_to_field),
            Payload::Text(_) => FieldValue::Unavailable,
        }),
        Extract::Body => Ok(match payload {
            Payload::Text(text) if text.trim().is_empty() => FieldValue::Unavailable,
            Payload::Text(text) => FieldValue::Text(text.trim().to_string()),
            Payload::Json(value) => FieldValue::Text(value.to_string()),
        }),
        Extract::Difference { minuend, subtrahend } => {
            let (Some(a), Some(b)) = (
                number_field(record, &spec.name, minuend)?,
                number_field(record, &spec.name, subtrahend)?,
            ) else {
                return Ok(FieldValue::Unavailable);
            };
            finite(&spec.name, a - b)
        }
        Extract::PercentChange { delta, base } => {
            let (Some(delta_value), Some(base_value)) = (
                number_field(record, &spec.name, delta)?,
                number_field(record, &spec.name, base)?,
            ) else {
                return Ok(FieldValue::Unavailable);
            };
            if base_value == 0.0 {
                return Err(FetchError::Compute(format!(
                    "{}: cannot divide by {base} of zero",
                    spec.name
                )));
            }
            finite(&spec.name, delta_value / base_value * 100.0)
        }
        Extract::Lookup { field, describe } => {
            let Some(code) = number_field(record, &spec.name, field)? else {
                return Ok(FieldValue::Unavailable);
            };
            if code.fract() != 0.0 {
                return Ok(FieldValue::Unavailable);
            }
            Ok(FieldValue::Text(describe(code as i64).to_string()))
        }
    }
}

/// Reads an earlier numeric field; `None` when it is unavailable or not a number
fn number_field(record: &NormalizedRecord, target: &str, source: &str) -> FetchResult<Option<f64>> {
    record
        .get(source)
        .map(FieldValue::as_f64)
        .ok_or_else(|| FetchError::Compute(format!("{target}: no earlier field named {source}")))
}

fn finite(name: &str, value: f64) -> FetchResult<FieldValue> {
    if value.is_finite() {
        Ok(FieldValue::Number(value))
    } else {
        Err(FetchError::Compute(format!("{name}: result is not a finite number")))
    }
}

fn json_to_field(value: &Value) -> FieldValue {
    match value {
        Value::Number(n) => n.as_f64().map_or(FieldValue::Unavailable, FieldValue::Number),
        Value::String(s) => FieldValue::Text(s.clone()),
        other => FieldValue::Text(other.to_string()),
    }
}
