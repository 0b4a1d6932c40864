/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::scripted(..)` - Replays a fixed list of replies and errors
 * - `MockProvider::echo()` - Returns the bracketed payload unchanged
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::{CompletionRequest, Provider};
use crate::translation::prompts::{CLOSE_MARKER, OPEN_MARKER};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Pops the next scripted reply; fails once the script runs out
    Scripted,
    /// Replies with the text found between the bracket markers
    Echo,
    /// Always fails with a connection error
    Failing,
}

/// Mock provider for testing translation behavior
///
/// Clones share the script and the request log.
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    script: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replay `replies` in order, one per request
    pub fn scripted(replies: Vec<Result<String, ProviderError>>) -> Self {
        let provider = Self::new(MockBehavior::Scripted);
        provider.script.lock().extend(replies);
        provider
    }

    /// Create a mock that returns the payload untouched
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Queue one more scripted reply
    pub fn push_reply(&self, reply: Result<String, ProviderError>) {
        self.script.lock().push_back(reply);
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Prompts received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.prompt.clone()).collect()
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// The text between the last `[[` line and the final `]]` line of a prompt
    pub fn extract_payload(prompt: &str) -> Option<&str> {
        let open = format!("\n{}\n", OPEN_MARKER);
        let close = format!("\n{}", CLOSE_MARKER);
        let start = prompt.rfind(&open)? + open.len();
        let body = prompt[start..].strip_suffix(close.as_str())?;
        Some(body)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        self.requests.lock().push(request.clone());

        match self.behavior {
            MockBehavior::Scripted => self
                .script
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::RequestFailed("mock script exhausted".to_string()))),
            MockBehavior::Echo => Self::extract_payload(&request.prompt)
                .map(str::to_string)
                .ok_or_else(|| ProviderError::ParseError("prompt has no bracketed payload".to_string())),
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Mock provider failure".to_string())),
        }
    }
}
