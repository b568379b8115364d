use std::time::Duration;

use crate::config::Location;
use crate::formatters::{Layout, Line};
use crate::models::{ResponseShape, SourceDescriptor};
use crate::normalize::{Extract, FieldSpec};
use crate::pipeline::Source;

/// wttr.in one-line format: location, condition icon, temperature, humidity, wind
const ONE_LINE_FORMAT: &str = "%l: %c %t %h %w";

/// One-line plain-text conditions
pub fn conditions(location: &Location, base_url: &str, timeout: Duration) -> Source {
    let descriptor = SourceDescriptor::new(base_url, ResponseShape::PlainText)
        .with_path_segment(location.name.as_str())
        .with_param("format", ONE_LINE_FORMAT)
        .with_timeout(timeout);

    Source {
        name: "wttr".to_string(),
        descriptor,
        fields: vec![FieldSpec::required("conditions", Extract::Body)],
        layout: Layout::new(
            format!("{} Now", location.name),
            vec![Line::field("\u{1f4cd}", "Current", "conditions", "")],
        ),
    }
}

/// Full multi-day text forecast without terminal colour codes
pub fn forecast(location: &Location, base_url: &str, timeout: Duration) -> SourceDescriptor {
    SourceDescriptor::new(base_url, ResponseShape::PlainText)
        .with_path_segment(location.name.as_str())
        .with_param("T", "")
        .with_timeout(timeout)
}
