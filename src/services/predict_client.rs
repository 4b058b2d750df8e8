//! HTTP client for the prediction service

use crate::error::{TransportError, REQUEST_FAILED};
use crate::model::wire::{ErrorBody, HealthBody, PredictOutcome, PredictRequest, PredictResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PredictClient {
    client: Client,
    base_url: String,
}

impl PredictClient {
    /// `timeout` bounds the whole request, body included
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::Client)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /predict`
    ///
    /// Any non-2xx answer is a structured rejection, even when its body is
    /// unreadable. A 2xx answer must decode, or it counts as a transport
    /// failure.
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictOutcome, TransportError> {
        let url = format!("{}/predict", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(TransportError::from_send)?;

        let status = response.status();
        let body = response.text().await.map_err(TransportError::from_body)?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "prediction response");

        if status.is_success() {
            let parsed: PredictResponse = serde_json::from_str(&body)?;
            return Ok(PredictOutcome::Forecast(parsed));
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| REQUEST_FAILED.to_string());
        Ok(PredictOutcome::Rejected(message))
    }

    /// `GET /`, the service's liveness route
    pub async fn check_health(&self) -> Result<String, TransportError> {
        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(TransportError::from_send)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(TransportError::from_body)?;
        let health: HealthBody = serde_json::from_str(&body)?;
        Ok(health.message.unwrap_or_else(|| "ok".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Method, TimeFrame};
    use mockito::Matcher;
    use serde_json::json;

    fn bitcoin_request() -> PredictRequest {
        PredictRequest {
            keyword: "bitcoin".to_string(),
            time_frame: TimeFrame::Month,
            method: Method::Linear,
            days_to_predict: 14,
        }
    }

    #[tokio::test]
    async fn test_predict_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "keyword": "bitcoin",
                "time_frame": "month",
                "method": "linear",
                "days_to_predict": 14
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "historical": [{"ds": "2024-01-01", "yhat": 1.5, "yhat_lower": 1.0, "yhat_upper": 2.0}],
                    "forecast": [{"ds": "2024-01-02", "yhat": 1.75, "yhat_lower": 1.1, "yhat_upper": 2.4}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = PredictClient::new(server.url(), None).unwrap();
        let outcome = client.predict(&bitcoin_request()).await.unwrap();

        mock.assert_async().await;
        let response = match outcome {
            PredictOutcome::Forecast(response) => response,
            other => panic!("expected forecast, got {:?}", other),
        };
        assert_eq!(response.historical[0].display_row(), "2024-01-01: 1.50%");
        assert_eq!(response.forecast.len(), 1);
    }

    #[tokio::test]
    async fn test_predict_empty_object_is_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = PredictClient::new(server.url(), None).unwrap();
        let outcome = client.predict(&bitcoin_request()).await.unwrap();
        assert_eq!(outcome, PredictOutcome::Forecast(PredictResponse::default()));
    }

    #[tokio::test]
    async fn test_predict_domain_error_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(400)
            .with_body(r#"{"error": "invalid keyword"}"#)
            .create_async()
            .await;

        let client = PredictClient::new(server.url(), None).unwrap();
        let outcome = client.predict(&bitcoin_request()).await.unwrap();
        assert_eq!(outcome, PredictOutcome::Rejected("invalid keyword".to_string()));
    }

    #[tokio::test]
    async fn test_predict_error_without_message_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("POST", "/predict")
            .with_status(404)
            .with_body(r#"{"detail": "Not Found"}"#)
            .create_async()
            .await;

        let client = PredictClient::new(server.url(), None).unwrap();
        let outcome = client.predict(&bitcoin_request()).await.unwrap();
        assert_eq!(outcome, PredictOutcome::Rejected(REQUEST_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_predict_error_with_unreadable_body_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let client = PredictClient::new(server.url(), None).unwrap();
        let outcome = client.predict(&bitcoin_request()).await.unwrap();
        assert_eq!(outcome, PredictOutcome::Rejected(REQUEST_FAILED.to_string()));
    }

    #[tokio::test]
    async fn test_predict_malformed_success_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = PredictClient::new(server.url(), None).unwrap();
        let result = client.predict(&bitcoin_request()).await;
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }

    #[tokio::test]
    async fn test_predict_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PredictClient::new(format!("http://{}", addr), None).unwrap();
        let result = client.predict(&bitcoin_request()).await;
        assert!(matches!(result, Err(TransportError::Send(_))));
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = PredictClient::new(format!("{}/", server.url()), None).unwrap();
        client.predict(&bitcoin_request()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_health() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"{"message": "API is working"}"#)
            .create_async()
            .await;

        let client = PredictClient::new(server.url(), None).unwrap();
        assert_eq!(client.check_health().await.unwrap(), "API is working");
    }

    #[tokio::test]
    async fn test_check_health_bad_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let client = PredictClient::new(server.url(), None).unwrap();
        let result = client.check_health().await;
        assert!(matches!(result, Err(TransportError::Status(503))));
    }
}
