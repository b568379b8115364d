//! Turns a [`SourceDescriptor`] into a fully-qualified request.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use tracing::debug;

use crate::models::{FetchError, FetchResult, ListStyle, ParamValue, SourceDescriptor};

/// URL with encoded path and query, plus validated headers
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub url: Url,
    pub headers: HeaderMap,
}

/// Builds the request for a descriptor.
///
/// Path segments and query values are percent-encoded. A descriptor that
/// cannot be turned into a request is reported as a network error, since
/// nothing can be sent for it.
pub fn build_request(descriptor: &SourceDescriptor) -> FetchResult<PreparedRequest> {
    let mut url = Url::parse(&descriptor.base_url).map_err(|e| {
        FetchError::Network(format!("invalid base URL {:?}: {e}", descriptor.base_url))
    })?;

    if !descriptor.path.is_empty() {
        let mut segments = url.path_segments_mut().map_err(|()| {
            FetchError::Network(format!("base URL {} cannot take a path", descriptor.base_url))
        })?;
        segments.pop_if_empty().extend(&descriptor.path);
    }

    if !descriptor.params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (name, value) in &descriptor.params {
            match value {
                ParamValue::Text(text) => {
                    query.append_pair(name, text);
                }
                ParamValue::Number(number) => {
                    query.append_pair(name, &number.to_string());
                }
                ParamValue::List(items, ListStyle::CommaJoined) => {
                    query.append_pair(name, &items.join(","));
                }
                ParamValue::List(items, ListStyle::RepeatedKey) => {
                    for item in items {
                        query.append_pair(name, item);
                    }
                }
            }
        }
    }

    let mut headers = HeaderMap::new();
    for (name, value) in &descriptor.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| FetchError::Network(format!("invalid header name {name:?}: {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| FetchError::Network(format!("invalid value for header {name}: {e}")))?;
        headers.append(header_name, header_value);
    }

    debug!(url = %url, "Built request");
    Ok(PreparedRequest { url, headers })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResponseShape;

    fn descriptor(base: &str) -> SourceDescriptor {
        SourceDescriptor::new(base, ResponseShape::Json)
    }

    #[test]
    fn test_comma_joined_list_is_one_pair() {
        let request = build_request(
            &descriptor("https://api.example.com/v1/forecast")
                .with_param("latitude", 51.5074)
                .with_list_param("current", ["temperature_2m", "weather_code"], ListStyle::CommaJoined),
        )
        .expect("should build");

        let pairs: Vec<(String, String)> = request.url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("latitude".to_string(), "51.5074".to_string()),
                ("current".to_string(), "temperature_2m,weather_code".to_string()),
            ]
        );
    }

    #[test]
    fn test_repeated_key_list() {
        let request = build_request(
            &descriptor("https://api.example.com")
                .with_list_param("symbol", ["A", "B"], ListStyle::RepeatedKey),
        )
        .expect("should build");

        assert_eq!(request.url.query(), Some("symbol=A&symbol=B"));
    }

    #[test]
    fn test_values_are_url_encoded() {
        let request = build_request(
            &descriptor("https://wttr.in")
                .with_path_segment("New York")
                .with_param("format", "%l: %c")
                .with_param("timezone", "Europe/London"),
        )
        .expect("should build");

        assert_eq!(request.url.path(), "/New%20York");
        assert_eq!(
            request.url.query(),
            Some("format=%25l%3A+%25c&timezone=Europe%2FLondon")
        );
    }

    #[test]
    fn test_path_segment_appends_to_base_path() {
        let request = build_request(
            &descriptor("https://query1.finance.yahoo.com/v8/finance/chart")
                .with_path_segment("MSFT")
                .with_param("range", "1d"),
        )
        .expect("should build");

        assert_eq!(
            request.url.as_str(),
            "https://query1.finance.yahoo.com/v8/finance/chart/MSFT?range=1d"
        );
    }

    #[test]
    fn test_no_params_leaves_no_query() {
        let request = build_request(&descriptor("https://example.com/x")).expect("should build");
        assert_eq!(request.url.query(), None);
    }

    #[test]
    fn test_headers_are_attached() {
        let request = build_request(&descriptor("https://example.com").with_header("Accept", "text/plain"))
            .expect("should build");
        assert_eq!(
            request.headers.get("accept").and_then(|v| v.to_str().ok()),
            Some("text/plain")
        );
    }

    #[test]
    fn test_invalid_inputs_are_network_errors() {
        let err = build_request(&descriptor("not a url")).expect_err("should fail");
        assert!(matches!(err, FetchError::Network(_)));

        let err = build_request(&descriptor("https://example.com").with_header("bad header", "x"))
            .expect_err("should fail");
        assert!(matches!(err, FetchError::Network(_)));
    }
}
