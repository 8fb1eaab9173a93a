//! Middleware for logging requests and responses.

use axum::{extract::Request, http::header::CONTENT_TYPE, middleware::Next, response::Response};
use serde_json::Value;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged at the `debug` level.
///
/// Passwords submitted at registration and log-in are redacted before
/// logging.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (headers, body_text) = extract_header_and_body_text_from_request(request).await;

    let content_type = headers.headers.get(CONTENT_TYPE);

    if content_type == Some(&"application/x-www-form-urlencoded".parse().unwrap()) {
        log_request(&headers, &redact_form_password(&body_text, "password"));
    } else if content_type == Some(&"application/json".parse().unwrap()) {
        log_request(&headers, &redact_json_password(&body_text, "password"));
    } else {
        log_request(&headers, &body_text);
    }

    let request = Request::from_parts(headers, body_text.into());
    let response = next.run(request).await;

    let (headers, body_text) = extract_header_and_body_text_from_response(response).await;
    log_response(&headers, &body_text);

    Response::from_parts(headers, body_text.into())
}

fn redact_form_password(form_text: &str, field_name: &str) -> String {
    let password_start = form_text.find(&format!("{}=", field_name));

    let start = match password_start {
        Some(password_pos) => password_pos,
        None => return form_text.to_string(),
    };

    let password_end = form_text[start..].find('&');
    let end = match password_end {
        Some(end) => start + end,
        None => form_text.len(),
    };
    let password = &form_text[start..end];

    form_text.replace(password, &format!("{}=********", field_name))
}

fn redact_json_password(body_text: &str, field_name: &str) -> String {
    let mut body: Value = match serde_json::from_str(body_text) {
        Ok(body) => body,
        Err(_) => return body_text.to_string(),
    };

    if let Some(field) = body.get_mut(field_name) {
        *field = Value::String("********".to_string());
    }

    body.to_string()
}

async fn extract_header_and_body_text_from_request(
    request: Request,
) -> (axum::http::request::Parts, String) {
    let (headers, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

async fn extract_header_and_body_text_from_response(
    response: Response,
) -> (axum::http::response::Parts, String) {
    let (headers, body) = response.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    (headers, String::from_utf8_lossy(&body_bytes).to_string())
}

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Shorten `body` to at most `limit` bytes, cutting on a char boundary.
///
/// A plain byte slice would panic when the limit falls inside a multibyte
/// character, and bodies routinely contain user-supplied UTF-8.
fn truncate_body(body: &str, limit: usize) -> &str {
    if body.len() <= limit {
        return body;
    }

    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {headers:#?}\nbody: {:}...",
            truncate_body(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {headers:#?}\nbody: {:}...",
            truncate_body(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {headers:#?}\nbody: {body:?}");
    }
}


#[cfg(test)]
mod redaction_tests {
    use super::{redact_form_password, redact_json_password};

    #[test]
    fn redacts_password_in_form_body() {
        let body = "username=foo%40bar.baz&password=hunter2";

        let redacted = redact_form_password(body, "password");

        assert_eq!(redacted, "username=foo%40bar.baz&password=********");
    }

    #[test]
    fn leaves_form_body_without_password_unchanged() {
        let body = "username=foo%40bar.baz";

        assert_eq!(redact_form_password(body, "password"), body);
    }

    #[test]
    fn redacts_password_in_json_body() {
        let body = r#"{"email":"foo@bar.baz","password":"hunter2"}"#;

        let redacted = redact_json_password(body, "password");

        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("foo@bar.baz"));
    }

    #[test]
    fn leaves_invalid_json_unchanged() {
        let body = "not json";

        assert_eq!(redact_json_password(body, "password"), body);
    }
}
