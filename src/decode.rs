use tracing::debug;

use crate::models::{FetchError, FetchResult, Payload, ResponseShape};

/// Decodes a raw body according to the expected shape.
///
/// Plain text passes through untouched and cannot fail.
pub fn decode(raw: String, shape: ResponseShape) -> FetchResult<Payload> {
    match shape {
        ResponseShape::Json => serde_json::from_str(&raw).map(Payload::Json).map_err(|e| {
            debug!(error = %e, "Response body is not valid JSON");
            FetchError::Decode(format!("invalid JSON: {e}"))
        }),
        ResponseShape::PlainText => Ok(Payload::Text(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json() {
        let payload = decode(r#"{"a": [1, 2]}"#.to_string(), ResponseShape::Json).expect("should decode");
        assert_eq!(payload, Payload::Json(serde_json::json!({"a": [1, 2]})));
    }

    #[test]
    fn test_decode_malformed_json() {
        let err = decode("<html>oops</html>".to_string(), ResponseShape::Json).expect_err("should fail");
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_plain_text_passes_through() {
        let raw = "London: ⛅️ +12°C 71% ↙11km/h\n".to_string();
        assert_eq!(
            decode(raw.clone(), ResponseShape::PlainText),
            Ok(Payload::Text(raw))
        );
    }

    #[test]
    fn test_plain_text_accepts_non_json() {
        assert!(decode("{not json".to_string(), ResponseShape::PlainText).is_ok());
    }
}
