//! # Code Farm Tutor
//!
//! Coding help for learners, kept outside the interpreter:
//! 1. The host collects a question and a short description of the level
//! 2. The tutor sends the game manual plus the question to an LLM
//! 3. The reply comes back as text; `extract_code` pulls out a script the
//!    host may load into the editor
//!
//! Providers sit behind `LlmProvider`, so tests run against a mock.

pub mod provider;
mod tutor;

pub use provider::{
    ChatMessage, CompletionRequest, CompletionResponse, FinishReason, LlmProvider,
    OpenAIProvider, ProviderConfig, ProviderError, Role, Usage,
};
pub use tutor::{extract_code, level_context, looks_like_code, Explainer, Tutor, TutorConfig};
