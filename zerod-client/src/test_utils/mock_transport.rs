//! Scripted transport that never touches the network.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::{Result, ZerodError};

/// Transport that records every request and replays queued outcomes in
/// order. An empty queue yields a transport error.
#[derive(Clone, Default)]
pub struct MockTransport {
    requests: Arc<RwLock<Vec<HttpRequest>>>,
    outcomes: Arc<RwLock<VecDeque<std::result::Result<HttpResponse, String>>>>,
}

impl MockTransport {
    /// Create a transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.outcomes.write().unwrap().push_back(Ok(response));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.outcomes
            .write()
            .unwrap()
            .push_back(Err(message.into()));
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.read().unwrap().clone()
    }

    /// Most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.read().unwrap().last().cloned()
    }

    /// Number of outcomes not consumed yet.
    pub fn pending(&self) -> usize {
        self.outcomes.read().unwrap().len()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.write().unwrap().push(request);
        match self.outcomes.write().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ZerodError::Transport(message)),
            None => Err(ZerodError::Transport("no response queued".to_string())),
        }
    }
}
