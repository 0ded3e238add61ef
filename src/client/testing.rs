//! Scripted [`HttpTransport`] shared by the client and service tests.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use super::http::{BoxError, BoxFuture, HttpResponse, HttpTransport, OutgoingRequest};
use super::{BriqClient, BriqClientBuilder};

pub(crate) const TEST_API_KEY: &str = "test_key_0123456789";
pub(crate) const TEST_BASE_URL: &str = "https://api.test.invalid";

#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Respond(HttpResponse),
    Fail(String),
    Hang,
}

#[derive(Debug, Clone)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug)]
struct FakeTransportState {
    script: VecDeque<Outcome>,
    requests: Vec<OutgoingRequest>,
}

impl FakeTransport {
    /// Replays `script` in order; the last outcome repeats once the script runs out.
    pub(crate) fn new(script: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                script: script.into_iter().collect(),
                requests: Vec::new(),
            })),
        }
    }

    pub(crate) fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::new([Outcome::Respond(HttpResponse::new(status, body))])
    }

    pub(crate) fn requests(&self) -> Vec<OutgoingRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn last_request(&self) -> OutgoingRequest {
        self.requests().pop().expect("no request was sent")
    }

    pub(crate) fn calls(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

pub(crate) fn ok(status: u16, body: impl Into<String>) -> Outcome {
    Outcome::Respond(HttpResponse::new(status, body))
}

pub(crate) fn fail(message: &str) -> Outcome {
    Outcome::Fail(message.to_owned())
}

impl HttpTransport for FakeTransport {
    fn send<'a>(&'a self, request: OutgoingRequest) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        let outcome = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            if state.script.len() > 1 {
                state.script.pop_front()
            } else {
                state.script.front().cloned()
            }
        };

        Box::pin(async move {
            match outcome {
                Some(Outcome::Respond(response)) => Ok(response),
                Some(Outcome::Fail(message)) => Err(Box::new(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    message,
                )) as BoxError),
                Some(Outcome::Hang) => std::future::pending().await,
                None => Err("fake transport has no scripted outcome".into()),
            }
        })
    }
}

pub(crate) fn test_builder(transport: &FakeTransport) -> BriqClientBuilder {
    BriqClient::builder(TEST_API_KEY)
        .base_url(TEST_BASE_URL)
        .transport(transport.clone())
}

pub(crate) fn test_client(transport: &FakeTransport) -> BriqClient {
    test_builder(transport).build().unwrap()
}
