use std::time::Duration;

use log::debug;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::error::{Result, SignalRgbError};
use crate::model::ErrorDetail;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 16038;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable that enables request/response tracing.
pub const DEBUG_ENV_VAR: &str = "SIGNALRGB_DEBUG";

/// Issues single HTTP requests against a fixed base URL.
///
/// One request per call, with the configured timeout, and no retries. Every
/// failure leaves this module already translated into [`SignalRgbError`];
/// callers never see a raw `reqwest` error.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl Transport {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Transport {
            base_url: format!("http://{host}:{port}"),
            client: Client::new(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends one request and returns the decoded JSON body.
    ///
    /// The endpoint is appended verbatim to the base URL; apply links arrive
    /// as absolute paths and go through here unchanged. This await is the
    /// only suspension point in the library.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let trace = std::env::var(DEBUG_ENV_VAR).is_ok_and(|v| v == "1");
        if trace {
            debug!("request: {method} {url}");
            if let Some(body) = body {
                debug!("request body: {body}");
            }
        }

        let mut request = self.client.request(method, &url).timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(translate_send_error)?;
        let status = response.status();
        let text = response.text().await.map_err(translate_send_error)?;
        if trace {
            debug!("response: {status} {text}");
        }

        if !status.is_success() {
            return Err(http_status_error(status, &url, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| SignalRgbError::unexpected(format!("An unexpected error occurred: {e}")))
    }
}

fn translate_send_error(err: reqwest::Error) -> SignalRgbError {
    if err.is_connect() {
        SignalRgbError::connection(
            format!("Failed to connect to SignalRGB API: {err}"),
            Some(ErrorDetail::from_title(err.to_string())),
        )
    } else if err.is_timeout() {
        SignalRgbError::connection(
            "Request timed out",
            Some(ErrorDetail::from_title("Request Timeout")),
        )
    } else {
        SignalRgbError::unexpected(format!("An unexpected error occurred: {err}"))
    }
}

/// Builds the error for a non-2xx reply. The first decodable entry of the
/// body's `errors` list becomes the attached detail; otherwise a synthesized
/// one carries the raw failure text.
fn http_status_error(status: StatusCode, url: &str, body: &str) -> SignalRgbError {
    let message = format!("HTTP error occurred: {status} for {url}");
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("errors")?.get(0).cloned())
        .and_then(|entry| serde_json::from_value::<ErrorDetail>(entry).ok())
        .unwrap_or_else(|| ErrorDetail::from_title(message.clone()));
    SignalRgbError::api(message, Some(detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_error_uses_first_error_entry() {
        let err = http_status_error(
            StatusCode::NOT_FOUND,
            "http://localhost:16038/api/v1/lighting/effects/missing",
            r#"{"status":"error","errors":[{"code":"not_found","title":"Not Found"}]}"#,
        );
        assert!(matches!(err, SignalRgbError::Api { .. }));
        assert_eq!(err.code(), Some("not_found"));
        assert_eq!(err.title(), Some("Not Found"));
    }

    #[test]
    fn test_http_status_error_synthesizes_detail_for_opaque_body() {
        let err = http_status_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "http://localhost:16038/api/v1/lighting",
            "<html>so broken</html>",
        );
        assert_eq!(err.code(), None);
        let title = err.title().unwrap();
        assert!(title.contains("500"));
    }
}
