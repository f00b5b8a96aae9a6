//! Scripted transport for tests.
//!
//! Queues canned responses and records every request it receives so tests
//! can assert on headers, methods and form fields without a live server.

use async_trait::async_trait;
use sitemirror_core::Result;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

/// An [`HttpTransport`] that replays queued results in order.
///
/// When the queue runs dry it answers `200` with an empty HTML body.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: ApiResponse) -> &Self {
        self.lock_responses().push_back(Ok(response));
        self
    }

    pub fn push_error(&self, error: sitemirror_core::MirrorError) -> &Self {
        self.lock_responses().push_back(Err(error));
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests().pop()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<ApiResponse>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::html(200, "")))
    }
}
