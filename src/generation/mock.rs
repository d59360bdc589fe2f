//! Deterministic generator for tests and offline demos.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::Generator;
use super::error::GenerationError;
use super::prompt::question_from_prompt;

/// What [`MockGenerator`] answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// `"Mock response for: {question}"`.
    Echo,
    /// Always the same text.
    Fixed(String),
    /// Always fails with this provider message.
    Fail(String),
}

#[derive(Debug)]
struct MockState {
    reply: MockReply,
    delay: Option<Duration>,
    failures_left: usize,
    calls: usize,
    last_prompts: Option<(String, String)>,
}

/// Generator that never leaves the process. Clones share state and counters.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    state: Arc<Mutex<MockState>>,
}

impl MockGenerator {
    pub fn new(reply: MockReply) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                reply,
                delay: None,
                failures_left: 0,
                calls: 0,
                last_prompts: None,
            })),
        }
    }

    pub fn echo() -> Self {
        Self::new(MockReply::Echo)
    }

    pub fn fixed(answer: impl Into<String>) -> Self {
        Self::new(MockReply::Fixed(answer.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockReply::Fail(message.into()))
    }

    /// Waits `delay` before answering each call.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.state.lock().delay = Some(delay);
        self
    }

    /// Makes the next `n` calls fail with a transient provider error.
    pub fn fail_next(&self, n: usize) {
        self.state.lock().failures_left = n;
    }

    /// Number of `generate` calls so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.state.lock().calls
    }

    /// `(system, user)` prompts of the most recent call. Only the latest pair is kept.
    pub fn last_prompts(&self) -> Option<(String, String)> {
        self.state.lock().last_prompts.clone()
    }

    /// The most recent user prompt.
    pub fn last_user_prompt(&self) -> Option<String> {
        self.state
            .lock()
            .last_prompts
            .as_ref()
            .map(|(_, user)| user.clone())
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::echo()
    }
}

impl Generator for MockGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let (reply, delay, fail_now) = {
            let mut state = self.state.lock();
            state.calls += 1;
            state.last_prompts = Some((system_prompt.to_string(), user_prompt.to_string()));
            let fail_now = state.failures_left > 0;
            if fail_now {
                state.failures_left -= 1;
            }
            (state.reply.clone(), state.delay, fail_now)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if fail_now {
            return Err(GenerationError::Provider {
                message: "mock transient failure".to_string(),
            });
        }

        match reply {
            MockReply::Echo => Ok(format!(
                "Mock response for: {}",
                question_from_prompt(user_prompt)
            )),
            MockReply::Fixed(answer) => Ok(answer),
            MockReply::Fail(message) => Err(GenerationError::Provider { message }),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
