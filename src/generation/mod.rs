//! Answer generation from retrieved context.
//!
//! [`Generator`] is the seam to the language model. [`GenaiGenerator`] talks to a hosted
//! provider; [`MockGenerator`] answers locally and is selected with `RAGATE_MOCK_PROVIDER`.

mod error;
pub mod mock;
pub mod prompt;
mod provider;

#[cfg(test)]
mod tests;

use std::future::Future;

pub use error::GenerationError;
pub use mock::{MockGenerator, MockReply};
pub use prompt::build_user_prompt;
pub use provider::GenaiGenerator;

/// Produces an answer from a system instruction and a user turn.
pub trait Generator: Send + Sync {
    fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}
