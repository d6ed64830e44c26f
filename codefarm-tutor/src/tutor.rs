//! Tutor implementation - answers learner questions with an LLM

use crate::provider::{ChatMessage, CompletionRequest, LlmProvider};
use codefarm_error::{Error, Result};
use codefarm_vm::{vocabulary, GameConfig, Level};
use tracing::{debug, warn};

/// Anything that can answer a question about the current level.
///
/// The interpreter never calls this; hosts do, and tests swap in canned
/// answers.
#[allow(async_fn_in_trait)]
pub trait Explainer {
    async fn explain(&self, prompt: &str, context: &str) -> Result<String>;
}

/// Configuration for the tutor
#[derive(Debug, Clone)]
pub struct TutorConfig {
    pub temperature: f32,
    pub max_tokens: Option<usize>,
    /// Overrides the provider's default model
    pub model: Option<String>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: Some(800),
            model: None,
        }
    }
}

/// Coding tutor backed by a chat-completion provider
pub struct Tutor<P> {
    provider: P,
    manual: String,
    config: TutorConfig,
}

impl<P: LlmProvider> Tutor<P> {
    pub fn new(provider: P, game: &GameConfig) -> Self {
        Self::with_config(provider, game, TutorConfig::default())
    }

    pub fn with_config(provider: P, game: &GameConfig, config: TutorConfig) -> Self {
        Self {
            provider,
            manual: manual(game),
            config,
        }
    }

    /// System prompt sent with every question
    pub fn manual(&self) -> &str {
        &self.manual
    }

    /// The two messages a question turns into
    pub fn messages(&self, prompt: &str, context: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(&self.manual),
            ChatMessage::user(format!("Current level: {}\nQuestion: {}", context, prompt)),
        ]
    }
}

impl<P: LlmProvider> Explainer for Tutor<P> {
    async fn explain(&self, prompt: &str, context: &str) -> Result<String> {
        let mut request = CompletionRequest::new(self.messages(prompt, context))
            .with_temperature(self.config.temperature);
        if let Some(max) = self.config.max_tokens {
            request = request.with_max_tokens(max);
        }
        if let Some(model) = &self.config.model {
            request = request.with_model(model);
        }

        debug!(provider = self.provider.name(), "asking tutor");
        let response = self.provider.complete(request).await.map_err(|e| {
            warn!(error = %e, "tutor request failed");
            Error::from(e).with_operation("tutor::explain")
        })?;

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(Error::inference_failed("The tutor returned an empty answer")
                .with_operation("tutor::explain")
                .with_context("model", response.model)),
        }
    }
}

fn manual(game: &GameConfig) -> String {
    let mut out = String::from(
        "You are the coding tutor of Code Farm, a game that teaches beginners \
         Python-like syntax by driving a farm bot (similar to the turtle library).\n\
         Answer briefly and clearly.\n\n",
    );
    out.push_str(&vocabulary::reference(game));
    out.push_str(
        "\nWhen the learner asks for a solution, answer with runnable code in a \
         single fenced code block.\n",
    );
    out
}

/// One-line summary of a level for the tutor's context
pub fn level_context(level: &Level) -> String {
    format!(
        "{} - {} Goal: {}",
        level.title, level.description, level.goal_description
    )
}

/// Pull the code out of a reply, dropping Markdown fences
pub fn extract_code(reply: &str) -> String {
    let Some(start) = reply.find("```") else {
        return reply.trim().to_string();
    };
    let after = &reply[start + 3..];
    // skip a language tag such as ```python
    let body = match after.find('\n') {
        Some(newline) if !after[..newline].contains("```") => &after[newline + 1..],
        _ => after,
    };
    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim_end().to_string()
}

/// Whether a reply contains something worth loading into the editor
pub fn looks_like_code(reply: &str) -> bool {
    ["def ", "for ", "while ", "forward"]
        .iter()
        .any(|marker| reply.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CompletionResponse, FinishReason, ProviderError, Usage};
    use codefarm_error::ErrorKind;
    use codefarm_vm::level;
    use std::sync::Mutex;

    struct MockProvider {
        reply: Option<String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl MockProvider {
        fn replying(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl LlmProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn default_model(&self) -> &str {
            "mock-1"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            self.seen.lock().unwrap().push(request);
            Ok(CompletionResponse {
                id: "1".into(),
                model: "mock-1".into(),
                content: self.reply.clone(),
                finish_reason: FinishReason::Stop,
                usage: Usage::default(),
            })
        }
    }

    struct FailingProvider;

    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn default_model(&self) -> &str {
            "none"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> std::result::Result<CompletionResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    #[test]
    fn test_prompt_construction() {
        let tutor = Tutor::new(MockProvider::replying(Some("ok")), &GameConfig::default());
        let answer = tokio_test::block_on(tutor.explain("How do I loop?", "Chapter 2")).unwrap();
        assert_eq!(answer, "ok");

        let seen = tutor.provider.seen.lock().unwrap();
        let request = &seen[0];
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.messages.len(), 2);
        assert!(request.messages[0]
            .content
            .as_deref()
            .unwrap()
            .contains("harvest() earns 15 G"));
        assert_eq!(
            request.messages[1].content.as_deref(),
            Some("Current level: Chapter 2\nQuestion: How do I loop?")
        );
    }

    #[test]
    fn test_model_override() {
        let config = TutorConfig {
            model: Some("small".into()),
            ..TutorConfig::default()
        };
        let tutor = Tutor::with_config(
            MockProvider::replying(Some("ok")),
            &GameConfig::default(),
            config,
        );
        tokio_test::block_on(tutor.explain("q", "c")).unwrap();
        assert_eq!(
            tutor.provider.seen.lock().unwrap()[0].model.as_deref(),
            Some("small")
        );
    }

    #[test]
    fn test_empty_answer_is_error() {
        let tutor = Tutor::new(MockProvider::replying(Some("  ")), &GameConfig::default());
        let err = tokio_test::block_on(tutor.explain("q", "c")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InferenceFailed);

        let tutor = Tutor::new(MockProvider::replying(None), &GameConfig::default());
        assert!(tokio_test::block_on(tutor.explain("q", "c")).is_err());
    }

    #[test]
    fn test_provider_failure_maps_kind() {
        let tutor = Tutor::new(FailingProvider, &GameConfig::default());
        let err = tokio_test::block_on(tutor.explain("q", "c")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkFailed);
        assert_eq!(err.operation(), "tutor::explain");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_extract_code() {
        let reply = "Try this:\n```python\nfor i in range(3):\n    forward()\n```\nGood luck!";
        assert_eq!(extract_code(reply), "for i in range(3):\n    forward()");

        assert_eq!(extract_code("```\nplant()\n```"), "plant()");
        assert_eq!(extract_code("  forward()  \n"), "forward()");
        assert_eq!(extract_code("```\nharvest()"), "harvest()");
    }

    #[test]
    fn test_looks_like_code() {
        assert!(looks_like_code("while True:\n    forward()"));
        assert!(looks_like_code("fd() then forward()"));
        assert!(!looks_like_code("Try turning left first."));
    }

    #[test]
    fn test_level_context() {
        let context = level_context(level::by_id(2).unwrap());
        assert!(context.starts_with("Chapter 2: The Power of Loops"));
        assert!(context.contains("Goal: Plant 5 tiles"));
    }
}
