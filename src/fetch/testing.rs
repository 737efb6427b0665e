//! Scripted transport for coordinator and service tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;
use tokio::time::Instant;

use crate::error::ConvertError;
use crate::fetch::{HttpResponse, RateTransport};

/// What the transport does for one call.
pub(crate) enum Step {
    Reply(HttpResponse),
    Fail(ConvertError),
    /// Never answers; only a timeout ends the attempt
    Hang,
    Slow(Duration, HttpResponse),
}

/// Plays back a fixed script, then repeats `fallback` (or fails) once empty.
pub(crate) struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    fallback: Option<HttpResponse>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into_iter().collect()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn always(response: HttpResponse) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(VecDeque::new()),
            fallback: Some(response),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }

    /// Time between consecutive calls.
    pub(crate) fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|w| w[1].1 - w[0].1).collect()
    }
}

impl RateTransport for ScriptedTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, ConvertError>> {
        self.calls.lock().unwrap().push((url.to_string(), Instant::now()));

        let step = self.steps.lock().unwrap().pop_front();
        let step = match (step, &self.fallback) {
            (Some(step), _) => step,
            (None, Some(response)) => Step::Reply(response.clone()),
            (None, None) => Step::Fail(ConvertError::Network("script exhausted".into())),
        };

        async move {
            match step {
                Step::Reply(response) => Ok(response),
                Step::Fail(err) => Err(err),
                Step::Hang => futures::future::pending().await,
                Step::Slow(delay, response) => {
                    tokio::time::sleep(delay).await;
                    Ok(response)
                }
            }
        }
        .boxed()
    }
}

/// A successful `pair` reply; `conversion_result` is included when `amount` is.
pub(crate) fn rate_reply(rate: f64, amount: Option<f64>) -> HttpResponse {
    let mut body = json!({ "result": "success", "conversion_rate": rate });
    if let Some(amount) = amount {
        body["conversion_result"] = json!(amount * rate);
    }
    HttpResponse::ok_json(body.to_string())
}

/// An API-level failure reply.
pub(crate) fn api_error(error_type: &str) -> HttpResponse {
    HttpResponse::ok_json(json!({ "result": "error", "error-type": error_type }).to_string())
}

pub(crate) fn status_reply(status: u16) -> HttpResponse {
    HttpResponse::new(status, "")
}
