// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language model trait for text-generation adapters.

use async_trait::async_trait;

use crate::error::BedrockError;
use crate::options::CallOptions;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Generation, LlmResult, PromptValue};

/// Adapter for text-generation models.
///
/// Implementors provide [`LanguageModel::generate`]; the convenience
/// methods are built on top of it.
#[async_trait]
pub trait LanguageModel: PluginAdapter {
    /// Generates text for a single prompt.
    ///
    /// The list form mirrors the host framework's interface, but only
    /// one prompt per call is supported: an empty list or more than one
    /// prompt is rejected with [`BedrockError::InvalidRequest`]. Use
    /// [`LanguageModel::generate_prompt`] for several prompts.
    async fn generate(
        &self,
        prompts: &[String],
        options: &CallOptions,
    ) -> Result<Vec<Generation>, BedrockError>;

    /// Generates text for `prompt` and returns the first generation's text.
    async fn call(&self, prompt: &str, options: &CallOptions) -> Result<String, BedrockError> {
        let generations = self.generate(&[prompt.to_string()], options).await?;
        generations
            .into_iter()
            .next()
            .map(|g| g.text)
            .ok_or(BedrockError::EmptyResponse)
    }

    /// Generates text for each prompt in turn, one backend call per prompt.
    async fn generate_prompt(
        &self,
        prompts: &[PromptValue],
        options: &CallOptions,
    ) -> Result<LlmResult, BedrockError> {
        let mut generations = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            generations.push(self.generate(&[prompt.to_string()], options).await?);
        }
        Ok(LlmResult { generations })
    }

    /// Approximate token count for `text`; not vendor-accurate.
    fn num_tokens(&self, text: &str) -> usize {
        crate::tokens::count_tokens(text)
    }
}

/// Returns the only prompt in `prompts`, rejecting empty and multi-prompt lists.
pub fn single_prompt(prompts: &[String]) -> Result<&str, BedrockError> {
    match prompts {
        [prompt] => Ok(prompt.as_str()),
        [] => Err(BedrockError::InvalidRequest("no prompt given".into())),
        _ => Err(BedrockError::InvalidRequest(format!(
            "got {} prompts, but only one prompt per call is supported",
            prompts.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::{AdapterType, HealthStatus};

    /// Echoes the prompt back, or returns nothing when `empty` is set.
    struct Echo {
        empty: bool,
        seen: Mutex<Vec<String>>,
    }

    impl Echo {
        fn new(empty: bool) -> Self {
            Self {
                empty,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PluginAdapter for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }

        fn adapter_type(&self) -> AdapterType {
            AdapterType::LanguageModel
        }

        async fn health_check(&self) -> Result<HealthStatus, BedrockError> {
            Ok(HealthStatus::Healthy)
        }

        async fn shutdown(&self) -> Result<(), BedrockError> {
            Ok(())
        }
    }

    #[async_trait]
    impl LanguageModel for Echo {
        async fn generate(
            &self,
            prompts: &[String],
            _options: &CallOptions,
        ) -> Result<Vec<Generation>, BedrockError> {
            let prompt = single_prompt(prompts)?;
            self.seen.lock().unwrap().push(prompt.to_string());
            if self.empty {
                return Ok(Vec::new());
            }
            Ok(vec![Generation::new(prompt.to_uppercase())])
        }
    }

    #[tokio::test]
    async fn call_returns_first_generation_text() {
        let echo = Echo::new(false);
        let text = echo.call("hello", &CallOptions::new()).await.unwrap();
        assert_eq!(text, "HELLO");
    }

    #[tokio::test]
    async fn call_with_zero_generations_is_empty_response() {
        let echo = Echo::new(true);
        let err = echo.call("hello", &CallOptions::new()).await.unwrap_err();
        assert!(matches!(err, BedrockError::EmptyResponse));
    }

    #[tokio::test]
    async fn generate_prompt_calls_once_per_prompt_in_order() {
        let echo = Echo::new(false);
        let prompts = vec![PromptValue::from("a"), PromptValue::from("b")];
        let result = echo
            .generate_prompt(&prompts, &CallOptions::new())
            .await
            .unwrap();

        assert_eq!(result.generations.len(), 2);
        assert_eq!(result.generations[0][0].text, "A");
        assert_eq!(result.generations[1][0].text, "B");
        assert_eq!(*echo.seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn single_prompt_rejects_empty_and_multiple() {
        assert_eq!(single_prompt(&["x".to_string()]).unwrap(), "x");
        assert!(matches!(
            single_prompt(&[]),
            Err(BedrockError::InvalidRequest(_))
        ));
        let err = single_prompt(&["a".to_string(), "b".to_string()]).unwrap_err();
        assert!(err.to_string().contains("got 2 prompts"), "got: {err}");
    }

    #[test]
    fn num_tokens_uses_shared_counter() {
        let echo = Echo::new(false);
        assert_eq!(echo.num_tokens("hello world"), crate::tokens::count_tokens("hello world"));
    }
}
