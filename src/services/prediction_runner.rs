//! Background prediction runner
//!
//! Runs service calls on a small tokio runtime so the UI loop never blocks.
//! Results come back over a channel and are picked up by `poll` on each tick.

use crate::error::TransportError;
use crate::model::{PredictOutcome, Submission};
use crate::services::PredictClient;
use anyhow::Result;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A finished background call
#[derive(Debug)]
pub enum RunnerMessage {
    Prediction {
        generation: u64,
        result: Result<PredictOutcome, TransportError>,
    },
    Health(Result<String, TransportError>),
}

struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
    started: Instant,
}

pub struct PredictionRunner {
    runtime: Runtime,
    client: PredictClient,
    sender: Sender<RunnerMessage>,
    receiver: Receiver<RunnerMessage>,
    in_flight: Option<InFlight>,
}

impl PredictionRunner {
    pub fn new(client: PredictClient) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("forecast-runner")
            .enable_all()
            .build()?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            runtime,
            client,
            sender,
            receiver,
            in_flight: None,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.client.base_url()
    }

    /// Send a prediction request in the background
    ///
    /// Any call still running is aborted first; its generation is stale anyway.
    pub fn spawn(&mut self, submission: Submission) {
        self.abort();

        let client = self.client.clone();
        let tx = self.sender.clone();
        let generation = submission.generation;
        let handle = self.runtime.spawn(async move {
            let result = client.predict(&submission.request).await;
            let _ = tx.send(RunnerMessage::Prediction { generation, result });
        });

        self.in_flight = Some(InFlight {
            generation,
            handle,
            started: Instant::now(),
        });
    }

    /// Ping the service's liveness route in the background
    pub fn check_health(&self) {
        let client = self.client.clone();
        let tx = self.sender.clone();
        self.runtime.spawn(async move {
            let result = client.check_health().await;
            let _ = tx.send(RunnerMessage::Health(result));
        });
    }

    /// Drain every finished call
    pub fn poll(&mut self) -> Vec<RunnerMessage> {
        let messages: Vec<RunnerMessage> = self.receiver.try_iter().collect();

        for message in &messages {
            let RunnerMessage::Prediction { generation, .. } = message else {
                continue;
            };
            let matches_in_flight = self
                .in_flight
                .as_ref()
                .is_some_and(|job| job.generation == *generation);
            if !matches_in_flight {
                continue;
            }
            if let Some(job) = self.in_flight.take() {
                debug!(
                    generation,
                    elapsed = ?job.started.elapsed(),
                    "prediction call finished"
                );
            }
        }

        messages
    }

    /// Cancel the in-flight call, if any. Returns true if one was running.
    pub fn abort(&mut self) -> bool {
        match self.in_flight.take() {
            Some(job) if !job.handle.is_finished() => {
                info!(generation = job.generation, "aborting prediction call");
                job.handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|job| !job.handle.is_finished())
    }
}

impl Drop for PredictionRunner {
    fn drop(&mut self) {
        // No result may be delivered after teardown
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NETWORK_ERROR;
    use crate::model::{PredictionState, RequestStatus};
    use std::net::TcpListener;
    use std::thread;
    use std::time::Duration;

    /// Poll until a prediction message arrives or the deadline passes
    fn wait_for_prediction(runner: &mut PredictionRunner, state: &mut PredictionState) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            for message in runner.poll() {
                if let RunnerMessage::Prediction { generation, result } = message {
                    state.settle(generation, result);
                    return true;
                }
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    fn bitcoin_state() -> PredictionState {
        let mut state = PredictionState::default();
        state.set_keyword("bitcoin");
        state.set_time_frame(crate::model::TimeFrame::Month);
        state.set_method(crate::model::Method::Linear);
        state.set_days_to_predict("14");
        state
    }

    #[test]
    fn test_end_to_end_success() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/predict")
            .match_body(
                r#"{"keyword":"bitcoin","time_frame":"month","method":"linear","days_to_predict":14}"#,
            )
            .with_status(200)
            .with_body(r#"{"historical":[{"ds":"2024-01-01","yhat":1.5,"yhat_lower":1.0,"yhat_upper":2.0}]}"#)
            .create();

        let client = PredictClient::new(server.url(), None).unwrap();
        let mut runner = PredictionRunner::new(client).unwrap();
        let mut state = bitcoin_state();

        let submission = state.begin_submit().unwrap();
        runner.spawn(submission);
        assert!(state.loading());

        assert!(wait_for_prediction(&mut runner, &mut state));
        mock.assert();
        assert!(!state.loading());
        assert!(!runner.is_busy());
        let rows: Vec<String> = state.historical_rows().collect();
        assert_eq!(rows, vec!["2024-01-01: 1.50%"]);
        assert_eq!(state.forecast_rows().count(), 0);
    }

    #[test]
    fn test_connection_refused_shows_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PredictClient::new(format!("http://{}", addr), None).unwrap();
        let mut runner = PredictionRunner::new(client).unwrap();
        let mut state = bitcoin_state();

        runner.spawn(state.begin_submit().unwrap());
        assert!(wait_for_prediction(&mut runner, &mut state));
        assert_eq!(state.error(), NETWORK_ERROR);
        assert!(!state.loading());
    }

    #[test]
    fn test_timeout_settles_as_network_error() {
        // Accepts connections but never answers
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client =
            PredictClient::new(format!("http://{}", addr), Some(Duration::from_millis(200))).unwrap();
        let mut runner = PredictionRunner::new(client).unwrap();
        let mut state = bitcoin_state();

        runner.spawn(state.begin_submit().unwrap());
        assert!(wait_for_prediction(&mut runner, &mut state));
        assert_eq!(state.error(), NETWORK_ERROR);
        drop(listener);
    }

    #[test]
    fn test_abort_drops_result() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = PredictClient::new(format!("http://{}", addr), None).unwrap();
        let mut runner = PredictionRunner::new(client).unwrap();
        let mut state = bitcoin_state();

        runner.spawn(state.begin_submit().unwrap());
        assert!(runner.is_busy());
        assert!(runner.abort());
        state.abandon();

        thread::sleep(Duration::from_millis(100));
        assert!(runner.poll().is_empty());
        assert!(!runner.is_busy());
        assert!(matches!(state.status(), RequestStatus::Failed(_)));
        drop(listener);
    }

    #[test]
    fn test_health_check_message() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"{"message":"API is working"}"#)
            .create();

        let client = PredictClient::new(server.url(), None).unwrap();
        let mut runner = PredictionRunner::new(client).unwrap();
        runner.check_health();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut health = None;
        while health.is_none() && Instant::now() < deadline {
            for message in runner.poll() {
                if let RunnerMessage::Health(result) = message {
                    health = Some(result);
                }
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(health.unwrap().unwrap(), "API is working");
    }
}
