// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a well-formed region, positive timeouts and a parseable endpoint.

use crate::diagnostic::ConfigError;
use crate::model::BedrockConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BedrockConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    // An unset region is reported later, by adapter construction.
    let runtime = &config.runtime;
    let region = runtime.region.trim();
    if !runtime.region.is_empty() && region.is_empty() {
        fail("runtime.region must not be blank".to_string());
    } else if region.chars().any(char::is_whitespace) {
        fail(format!(
            "runtime.region `{}` must not contain whitespace",
            runtime.region
        ));
    }

    let bad_endpoint = runtime
        .endpoint_url
        .as_deref()
        .filter(|e| !(e.starts_with("https://") || e.starts_with("http://")));
    if let Some(endpoint) = bad_endpoint {
        fail(format!(
            "runtime.endpoint_url `{endpoint}` must start with http:// or https://"
        ));
    }

    if runtime.timeout_secs == 0 {
        fail("runtime.timeout_secs must be at least 1".to_string());
    }

    if runtime.bearer_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
        fail("runtime.bearer_token must not be empty when set".to_string());
    }

    for (section, model_id) in [
        ("claude", &config.claude.model_id),
        ("llama", &config.llama.model_id),
        ("cohere", &config.cohere.model_id),
        ("titan", &config.titan.model_id),
    ] {
        if model_id.as_deref().is_some_and(|m| m.trim().is_empty()) {
            fail(format!("{section}.model_id must not be empty when set"));
        }
    }

    if config.titan.max_concurrency == 0 {
        fail("titan.max_concurrency must be at least 1".to_string());
    }

    if config.titan.max_chunk_chars == Some(0) {
        fail("titan.max_chunk_chars must be at least 1 when set".to_string());
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        fail(format!(
            "logging.level `{}` must be one of: {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = BedrockConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unset_region_is_left_to_adapter_construction() {
        let config = BedrockConfig::default();
        assert!(config.runtime.region.is_empty());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn blank_region_fails_validation() {
        let mut config = BedrockConfig::default();
        config.runtime.region = "   ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "runtime.region"));
    }

    #[test]
    fn zero_timeout_and_concurrency_are_both_reported() {
        let mut config = BedrockConfig::default();
        config.runtime.timeout_secs = 0;
        config.titan.max_concurrency = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_error(&errors, "timeout_secs"));
        assert!(has_error(&errors, "max_concurrency"));
    }

    #[test]
    fn empty_model_override_fails_validation() {
        let mut config = BedrockConfig::default();
        config.llama.model_id = Some(String::new());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "llama.model_id"));
    }

    #[test]
    fn endpoint_without_scheme_fails_validation() {
        let mut config = BedrockConfig::default();
        config.runtime.endpoint_url = Some("bedrock.internal:8443".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "endpoint_url"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = BedrockConfig::default();
        config.logging.level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "logging.level"));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = BedrockConfig::default();
        config.runtime.region = "eu-central-1".to_string();
        config.runtime.endpoint_url = Some("http://127.0.0.1:4566".to_string());
        config.titan.max_chunk_chars = Some(2000);
        config.titan.max_concurrency = 4;
        config.claude.model_id = Some("anthropic.claude-instant-v1".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
