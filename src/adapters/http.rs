//! HTTP predictor: calls a remote risk-prediction endpoint.
//!
//! POSTs the encoded payload as JSON to `{base_url}/predict` and expects
//! `{risk, confidence, message, riskPercentage?}` back.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::{PredictionPayload, PredictionResult, RiskCategory};
use crate::ports::{PredictionError, RiskPredictor};

/// Response body from the prediction endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PredictResponse {
    risk: RiskCategory,
    confidence: f64,
    message: String,
    #[serde(default)]
    risk_percentage: Option<u8>,
}

impl PredictResponse {
    fn into_result(self) -> Result<PredictionResult, PredictionError> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(PredictionError::InvalidResponse(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }
        if let Some(p) = self.risk_percentage {
            if p > 100 {
                return Err(PredictionError::InvalidResponse(format!(
                    "riskPercentage {p} outside [0, 100]"
                )));
            }
        }

        Ok(PredictionResult {
            risk: self.risk,
            confidence: self.confidence,
            message: self.message,
            risk_percentage: self.risk_percentage,
            received_at: chrono::Utc::now(),
        })
    }
}

/// Blocking HTTP client for the prediction endpoint.
pub struct HttpPredictor {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpPredictor {
    /// Create a client for the endpoint at `base_url`.
    ///
    /// # Errors
    /// Returns `PredictionError::Other` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, PredictionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PredictionError::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(&self, e: &reqwest::Error) -> PredictionError {
        if e.is_connect() {
            PredictionError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            PredictionError::Timeout(self.timeout_secs)
        } else {
            PredictionError::Other(e.to_string())
        }
    }

    /// Errors while reading the body: timeouts are network failures, anything
    /// else means the response itself was unusable.
    fn classify_body(&self, e: &reqwest::Error) -> PredictionError {
        if e.is_timeout() {
            PredictionError::Timeout(self.timeout_secs)
        } else {
            PredictionError::InvalidResponse(e.to_string())
        }
    }
}

impl RiskPredictor for HttpPredictor {
    fn predict(&self, payload: &PredictionPayload) -> Result<PredictionResult, PredictionError> {
        let url = format!("{}/predict", self.base_url);
        tracing::debug!("Sending prediction request to {}", url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text() {
                Ok(body) => body,
                Err(e) if e.is_timeout() => return Err(self.classify_body(&e)),
                Err(e) => {
                    tracing::debug!("Could not read error body: {}", e);
                    String::new()
                }
            };
            tracing::warn!("Prediction endpoint returned HTTP {}", status.as_u16());
            return Err(PredictionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PredictResponse = response
            .json()
            .map_err(|e| self.classify_body(&e))?;

        parsed.into_result()
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HealthFormData;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve exactly one canned response; returns the base URL and the raw request.
    fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        serve_raw(response, Duration::ZERO)
    }

    /// Write `response` verbatim, then keep the connection open for `hold`.
    fn serve_raw(response: String, hold: Duration) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
        let addr = listener.local_addr().expect("Should have address");

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("Should accept");
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).expect("Should read");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .and_then(|v| v.trim().parse::<usize>().ok())
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }
            stream
                .write_all(response.as_bytes())
                .expect("Should write");
            let _ = stream.flush();
            thread::sleep(hold);
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn payload() -> PredictionPayload {
        PredictionPayload::from_form(&HealthFormData::sample())
    }

    #[test]
    fn test_successful_prediction() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"risk":"high","confidence":0.73,"message":"See a cardiologist"}"#,
        );
        let predictor = HttpPredictor::new(&url, 5).expect("Should build");
        let result = predictor.predict(&payload()).expect("Should predict");

        assert_eq!(result.risk, RiskCategory::High);
        assert_eq!(result.percentage(), 73);
        assert_eq!(result.message, "See a cardiologist");

        let request = server.join().expect("Server thread");
        assert!(request.starts_with("POST /predict"));
        assert!(request.contains("\"trestbps\":120"));
        assert!(request.contains("\"oldpeak\":1.0"));
    }

    #[test]
    fn test_status_error_keeps_body() {
        let (url, server) = serve_once("500 Internal Server Error", "model offline");
        let predictor = HttpPredictor::new(&url, 5).expect("Should build");
        let err = predictor.predict(&payload()).expect_err("Should fail");
        server.join().expect("Server thread");

        assert_eq!(
            err,
            PredictionError::Status {
                status: 500,
                body: "model offline".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_body_is_invalid_response() {
        let (url, server) = serve_once("200 OK", r#"{"risk":"medium","confidence":0.5}"#);
        let predictor = HttpPredictor::new(&url, 5).expect("Should build");
        let err = predictor.predict(&payload()).expect_err("Should fail");
        server.join().expect("Server thread");

        assert!(matches!(err, PredictionError::InvalidResponse(_)));
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"risk":"low","confidence":1.7,"message":"?"}"#,
        );
        let predictor = HttpPredictor::new(&url, 5).expect("Should build");
        let err = predictor.predict(&payload()).expect_err("Should fail");
        server.join().expect("Server thread");

        assert!(matches!(err, PredictionError::InvalidResponse(_)));
    }

    #[test]
    fn test_stalled_body_is_timeout() {
        // Headers promise more body than is ever sent.
        let response = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 200\r\n\r\n{\"risk\":".to_string();
        let (url, server) = serve_raw(response, Duration::from_secs(3));
        let predictor = HttpPredictor::new(&url, 1).expect("Should build");

        let err = predictor.predict(&payload()).expect_err("Should fail");
        server.join().expect("Server thread");

        assert_eq!(err, PredictionError::Timeout(1));
        assert!(err.is_network());
    }

    #[test]
    fn test_connection_refused_is_network_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("Should bind");
            listener.local_addr().expect("Should have address").port()
        };
        let predictor =
            HttpPredictor::new(&format!("http://127.0.0.1:{port}/"), 5).expect("Should build");
        assert_eq!(predictor.base_url(), format!("http://127.0.0.1:{port}"));

        let err = predictor.predict(&payload()).expect_err("Should fail");
        assert!(err.is_network(), "unexpected error: {err:?}");
    }
}
