//! # hirehub-inference
//!
//! Inference backend abstraction for HireHub.
//!
//! The system has two inference concerns: turning position/resume text
//! into fixed-dimension embedding vectors, and generating the narrative
//! fit assessments for ranked candidates. [`OllamaBackend`] implements
//! both `hirehub-core` traits (`EmbeddingBackend` via `/api/embed`,
//! `GenerationBackend` via `/api/chat`) against a local Ollama server;
//! [`ChatCompletionsBackend`] implements `GenerationBackend` against a
//! hosted OpenAI-compatible endpoint.
//!
//! For tests, the `mock` feature provides [`mock::MockInferenceBackend`],
//! a deterministic in-process implementation of the same traits.

pub mod chat_completions;
pub mod ollama;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use chat_completions::ChatCompletionsBackend;
pub use ollama::OllamaBackend;

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockEmbeddingGenerator, MockInferenceBackend};
