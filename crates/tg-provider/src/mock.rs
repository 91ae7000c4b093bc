//! Scripted provider for tests
//!
//! Queues canned completions (or failures) and records every prompt it
//! receives, so engine tests can assert both the parsed output and the
//! rendered prompt text.

use crate::error::ProviderError;
use crate::CompletionProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One recorded `complete` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// System prompt as sent
    pub system_prompt: String,
    /// User prompt as sent
    pub user_prompt: String,
    /// Whether JSON output was requested
    pub expect_json: bool,
}

#[derive(Debug)]
enum Scripted {
    Text(String),
    ApiError { status: u16, message: String },
}

/// Provider returning pre-scripted responses in order
#[derive(Debug, Default)]
pub struct MockProvider {
    responses: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockProvider {
    /// Create an empty mock (every call fails with `MissingContent`)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completion text
    #[must_use]
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.responses
            .lock()
            .expect("mock lock")
            .push_back(Scripted::Text(text.into()));
        self
    }

    /// Queue an API failure
    #[must_use]
    pub fn with_api_error(self, status: u16, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .expect("mock lock")
            .push_back(Scripted::ApiError {
                status,
                message: message.into(),
            });
        self
    }

    /// Calls recorded so far
    #[must_use]
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock lock").clone()
    }

    /// Number of calls made
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("mock lock").len()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        expect_json: bool,
    ) -> Result<String, ProviderError> {
        self.calls.lock().expect("mock lock").push(RecordedCall {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            expect_json,
        });

        match self.responses.lock().expect("mock lock").pop_front() {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::ApiError { status, message }) => {
                Err(ProviderError::Api { status, message })
            }
            None => Err(ProviderError::MissingContent),
        }
    }
}
