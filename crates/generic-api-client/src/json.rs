//! JSON response parsing

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Error;
use crate::response::Response;

/// Decode a response body as JSON
///
/// Objects, arrays and scalars are all accepted. A body that is not valid
/// JSON yields [`Error::MalformedResponse`] carrying a copy of `response`.
pub fn parse_json_response(response: &Response) -> Result<Value, Error> {
    parse_json_response_as(response)
}

/// Decode a response body as JSON into `T`
///
/// Shape mismatches are reported the same way as syntax errors.
pub fn parse_json_response_as<T: DeserializeOwned>(response: &Response) -> Result<T, Error> {
    serde_json::from_slice(response.body()).map_err(|err| {
        tracing::warn!("Malformed JSON response ({}): {}", response.status(), err);
        Error::MalformedResponse {
            message: malformed_message(&err.to_string(), &response.text()),
            response: response.clone(),
            source: err,
        }
    })
}

fn malformed_message(diagnostic: &str, body: &str) -> String {
    format!(
        "{}. Response body:\n{}",
        diagnostic.trim_end_matches('.'),
        body
    )
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_object() {
        let response = Response::new(200, r#"{"x":1}"#);
        let value = parse_json_response(&response).expect("valid JSON");
        assert_eq!(value, json!({"x": 1}));
    }

    #[test]
    fn test_parse_array_and_scalar() {
        let array = parse_json_response(&Response::new(200, "[1,2]")).expect("valid JSON");
        assert_eq!(array, json!([1, 2]));

        let scalar = parse_json_response(&Response::new(200, "true")).expect("valid JSON");
        assert_eq!(scalar, json!(true));
    }

    #[test]
    fn test_not_json_keeps_response() {
        let response = Response::new(200, "not json").with_header("content-type", "text/plain");
        let err = parse_json_response(&response).expect_err("body is not JSON");

        let message = err.to_string();
        assert!(message.ends_with("Response body:\nnot json"), "{message}");
        assert!(!message.starts_with('.'));
        assert_eq!(err.response(), Some(&response));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_empty_body_is_malformed() {
        let err = parse_json_response(&Response::new(204, "")).expect_err("empty body");
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert!(err.to_string().ends_with("Response body:\n"));
    }

    #[test]
    fn test_trailing_periods_are_stripped() {
        assert_eq!(
            malformed_message("json_decode error: Syntax error...", "Hello world\n"),
            "json_decode error: Syntax error. Response body:\nHello world\n"
        );
    }

    #[test]
    fn test_parse_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Echo {
            args: std::collections::BTreeMap<String, String>,
        }

        let response = Response::new(200, r#"{"args":{"orderBy":"ref"}}"#);
        let echo: Echo = parse_json_response_as(&response).expect("valid shape");
        assert_eq!(echo.args.get("orderBy").map(String::as_str), Some("ref"));

        let err = parse_json_response_as::<Echo>(&Response::new(200, r#"{"args":1}"#))
            .expect_err("wrong shape");
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }
}
