//! Question answering: validation, cache check, retrieval, generation, and storage.
//!
//! [`AnswerService::ask`] drives one question through
//! `Validating → CacheCheck → (Retrieving → Generating → Storing) → Done`. Every call to a
//! collaborator runs under a [`CallPolicy`] (timeout plus bounded retry). An unreachable
//! cache store is not an error: the question is answered by generation and nothing is
//! written back.

mod error;
pub mod policy;
mod service;


pub use error::AnswerError;
pub use policy::{CallFailure, CallPolicy};
pub use service::{Answer, AnswerPolicies, AnswerService, Stage};
