//! services/api/src/adapters/qa_llm.rs
//!
//! This module contains the adapter for the Question-Answering LLM.
//! It implements the `QuestionAnsweringService` port from the `core` crate.
//!
//! The prompt arrives fully assembled; this adapter only performs the call.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use pdf_chat_core::ports::{PortError, PortResult, QuestionAnsweringService};
use std::time::{Duration, Instant};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuestionAnsweringService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiQaAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiQaAdapter {
    /// Creates a new `OpenAiQaAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }
}

//=========================================================================================
// `QuestionAnsweringService` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuestionAnsweringService for OpenAiQaAdapter {
    /// Sends the prompt as a single user message and returns the first choice verbatim.
    async fn answer(&self, prompt: &str) -> PortResult<String> {
        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let llm_start = Instant::now();
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                PortError::Upstream(format!("LLM call timed out after {:?}", self.timeout))
            })?
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;
        info!("⏱️ LLM ({}) took: {:?}", self.model, llm_start.elapsed());

        // Extract the text content from the first choice in the response.
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            PortError::Upstream("LLM returned no choices in its response.".to_string())
        })?;

        match choice.message.content {
            Some(content) if !content.trim().is_empty() => Ok(content),
            _ => Err(PortError::Upstream(
                "LLM response contained no text content.".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::canned_http::{response, serve_once, serve_silence};

    fn adapter(base: &str, timeout: Duration) -> OpenAiQaAdapter {
        let config = OpenAIConfig::new()
            .with_api_key("test-key")
            .with_api_base(base);
        OpenAiQaAdapter::new(Client::with_config(config), "test-model".into(), timeout)
    }

    fn completion(choices: &str) -> String {
        let body = format!(
            r#"{{"id":"chatcmpl-1","object":"chat.completion","created":0,"model":"test-model","choices":{}}}"#,
            choices
        );
        response("200 OK", "application/json", &body)
    }

    #[tokio::test]
    async fn first_choice_is_returned_verbatim() {
        let base = serve_once(completion(
            r#"[{"index":0,"message":{"role":"assistant","content":"Yes [Page 2]."},"finish_reason":"stop"}]"#,
        ))
        .await;

        let answer = adapter(&base, Duration::from_secs(5))
            .answer("prompt")
            .await
            .unwrap();
        assert_eq!(answer, "Yes [Page 2].");
    }

    #[tokio::test]
    async fn no_choices_is_an_upstream_error() {
        let base = serve_once(completion("[]")).await;

        let err = adapter(&base, Duration::from_secs(5))
            .answer("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Upstream(_)));
    }

    #[tokio::test]
    async fn empty_content_is_an_upstream_error() {
        let base = serve_once(completion(
            r#"[{"index":0,"message":{"role":"assistant","content":""},"finish_reason":"stop"}]"#,
        ))
        .await;

        let err = adapter(&base, Duration::from_secs(5))
            .answer("prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Upstream(_)));
    }

    #[tokio::test]
    async fn slow_model_times_out() {
        let base = serve_silence().await;

        let err = adapter(&base, Duration::from_millis(200))
            .answer("prompt")
            .await
            .unwrap_err();
        match err {
            PortError::Upstream(msg) => assert!(msg.contains("timed out"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
