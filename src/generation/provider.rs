use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::{debug, instrument};

use super::Generator;
use super::error::GenerationError;
use crate::constants::{DEFAULT_GENERATION_MODEL, GENERATION_TEMPERATURE};

/// Chat-completion generator backed by the `genai` multi-provider client.
///
/// Credentials come from the provider's usual environment variable (`OPENAI_API_KEY` for
/// OpenAI models).
#[derive(Clone)]
pub struct GenaiGenerator {
    client: Client,
    model: String,
    temperature: f64,
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GenaiGenerator {
    /// Creates a generator for `model` with the default temperature.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            temperature: GENERATION_TEMPERATURE,
        }
    }

    /// Overrides the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }
}

impl Default for GenaiGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATION_MODEL)
    }
}

impl Generator for GenaiGenerator {
    #[instrument(skip_all, fields(model = %self.model, prompt_len = user_prompt.len()))]
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ]);
        let options = ChatOptions::default().with_temperature(self.temperature);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| GenerationError::Provider {
                message: e.to_string(),
            })?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        debug!(answer_len = text.len(), "Generation complete");
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
