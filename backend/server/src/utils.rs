use std::net::SocketAddr;

use axum::{body::Bytes, http::HeaderMap};
use serde_json::Value;

use crate::error::AppError::{self, InvalidScore, MissingScore};

pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// The address a client already forwarded, else the connection's own.
pub fn client_ip(headers: &HeaderMap, remote: SocketAddr) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| remote.ip().to_string())
}

pub fn get_score_from_body(body: &Bytes) -> Result<i64, AppError> {
    let payload: Value = serde_json::from_slice(body).map_err(|_| MissingScore)?;
    let score = payload.get("score").ok_or(MissingScore)?;

    coerce_score(score)
}

/// Accepts integers, floats (truncated), booleans and numeric strings.
/// Anything that does not fit an `i64` is rejected, never clamped.
fn coerce_score(value: &Value) -> Result<i64, AppError> {
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(score) => Ok(score),
            None if number.is_f64() => number
                .as_f64()
                .and_then(truncate_float)
                .ok_or(InvalidScore),
            None => Err(InvalidScore),
        },
        Value::Bool(flag) => Ok(i64::from(*flag)),
        Value::String(text) => text.trim().parse().map_err(|_| InvalidScore),
        _ => Err(InvalidScore),
    }
}

fn truncate_float(float: f64) -> Option<i64> {
    let truncated = float.trunc();

    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    (truncated.is_finite() && truncated >= i64::MIN as f64 && truncated < i64::MAX as f64)
        .then_some(truncated as i64)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> Bytes {
        Bytes::from(value.to_string())
    }

    #[test]
    fn test_client_ip_prefers_header() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static("9.9.9.9"));

        let remote: SocketAddr = "127.0.0.1:4000".parse().unwrap();

        assert_eq!(client_ip(&headers, remote), "9.9.9.9");
    }

    #[test]
    fn test_client_ip_falls_back_to_remote() {
        let remote: SocketAddr = "10.1.2.3:4000".parse().unwrap();

        assert_eq!(client_ip(&HeaderMap::new(), remote), "10.1.2.3");
    }

    #[test]
    fn test_integer_score() {
        assert_eq!(get_score_from_body(&body(json!({ "score": 42 }))).unwrap(), 42);
        assert_eq!(get_score_from_body(&body(json!({ "score": -3 }))).unwrap(), -3);
    }

    #[test]
    fn test_coerced_scores() {
        assert_eq!(get_score_from_body(&body(json!({ "score": "42" }))).unwrap(), 42);
        assert_eq!(get_score_from_body(&body(json!({ "score": " 7 " }))).unwrap(), 7);
        assert_eq!(get_score_from_body(&body(json!({ "score": 9.9 }))).unwrap(), 9);
        assert_eq!(get_score_from_body(&body(json!({ "score": true }))).unwrap(), 1);
    }

    #[test]
    fn test_score_range_edges() {
        assert_eq!(
            get_score_from_body(&body(json!({ "score": i64::MAX }))).unwrap(),
            i64::MAX
        );
        assert_eq!(
            get_score_from_body(&body(json!({ "score": i64::MIN }))).unwrap(),
            i64::MIN
        );
        assert_eq!(get_score_from_body(&body(json!({ "score": -2.7 }))).unwrap(), -2);
        assert_eq!(
            get_score_from_body(&body(json!({ "score": 1e18 }))).unwrap(),
            1_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_missing_score() {
        for payload in [json!({}), json!({ "points": 5 }), json!([1, 2]), json!(null)] {
            assert!(matches!(get_score_from_body(&body(payload)), Err(MissingScore)));
        }

        assert!(matches!(
            get_score_from_body(&Bytes::from_static(b"not json")),
            Err(MissingScore)
        ));
        assert!(matches!(get_score_from_body(&Bytes::new()), Err(MissingScore)));
    }

    #[test]
    fn test_invalid_score() {
        for score in [
            json!("abc"),
            json!(null),
            json!({ "value": 1 }),
            json!([1]),
            json!(18446744073709551615u64),
            json!(9223372036854775808u64),
            json!(1e300),
            json!(-1e300),
            json!(9223372036854775808.0),
            json!("18446744073709551615"),
        ] {
            assert!(matches!(
                get_score_from_body(&body(json!({ "score": score }))),
                Err(InvalidScore)
            ));
        }
    }
}
