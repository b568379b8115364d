use std::time::Duration;

use crate::config::Location;
use crate::formatters::{Layout, Line};
use crate::models::{ListStyle, ResponseShape, SourceDescriptor};
use crate::normalize::{Extract, FieldSpec};
use crate::pipeline::Source;
use crate::weather_code;

/// Current-condition variables requested from Open-Meteo
const CURRENT_FIELDS: [&str; 7] = [
    "temperature_2m",
    "relative_humidity_2m",
    "apparent_temperature",
    "precipitation",
    "weather_code",
    "wind_speed_10m",
    "wind_direction_10m",
];

/// Current conditions for a coordinate pair
pub fn current_conditions(location: &Location, base_url: &str, timeout: Duration) -> Source {
    let descriptor = SourceDescriptor::new(base_url, ResponseShape::Json)
        .with_path_segment("forecast")
        .with_param("latitude", location.latitude)
        .with_param("longitude", location.longitude)
        .with_list_param("current", CURRENT_FIELDS, ListStyle::CommaJoined)
        .with_param("temperature_unit", "celsius")
        .with_param("wind_speed_unit", "kmh")
        .with_param("timezone", location.timezone.as_str())
        .with_timeout(timeout);

    let fields = vec![
        FieldSpec::optional("weather_code", Extract::path("current.weather_code")),
        FieldSpec::optional("description", Extract::lookup("weather_code", weather_code::describe)),
        FieldSpec::required("temperature", Extract::path("current.temperature_2m")),
        FieldSpec::optional("apparent_temperature", Extract::path("current.apparent_temperature")),
        FieldSpec::optional("humidity", Extract::path("current.relative_humidity_2m")),
        FieldSpec::optional("precipitation", Extract::path("current.precipitation")),
        FieldSpec::optional("wind_speed", Extract::path("current.wind_speed_10m")),
        FieldSpec::optional("wind_direction", Extract::path("current.wind_direction_10m")),
        FieldSpec::optional("time", Extract::path("current.time")),
    ];

    let layout = Layout::new(
        format!("{} Weather", location.name),
        vec![
            Line::heading("description"),
            Line::Blank,
            Line::field("\u{1f321}\u{fe0f} ", "Temperature", "temperature", "\u{b0}C"),
            Line::field("\u{1f914}", "Feels like", "apparent_temperature", "\u{b0}C"),
            Line::field("\u{1f4a7}", "Humidity", "humidity", "%"),
            Line::field("\u{1f327}\u{fe0f} ", "Precipitation", "precipitation", "mm"),
            Line::field("\u{1f4a8}", "Wind", "wind_speed", " km/h"),
            Line::field("\u{1f9ed}", "Direction", "wind_direction", "\u{b0}"),
            Line::field("\u{1f550}", "Observed", "time", ""),
        ],
    );

    Source {
        name: "open-meteo".to_string(),
        descriptor,
        fields,
        layout,
    }
}
