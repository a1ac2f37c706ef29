// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Bedrock adapters.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at load time, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder printed in place of secret values.
pub const REDACTED: &str = "<redacted>";

/// Top-level adapter configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BedrockConfig {
    /// Transport settings shared by every adapter.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Anthropic Claude adapter settings.
    #[serde(default)]
    pub claude: ClaudeConfig,

    /// Meta Llama adapter settings.
    #[serde(default)]
    pub llama: LlamaConfig,

    /// Cohere Command adapter settings.
    #[serde(default)]
    pub cohere: CohereConfig,

    /// Amazon Titan embedding adapter settings.
    #[serde(default)]
    pub titan: TitanConfig,

    /// Log output settings for the CLI.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BedrockConfig {
    /// Returns a copy with secret values replaced by [`REDACTED`].
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.runtime.bearer_token.is_some() {
            config.runtime.bearer_token = Some(REDACTED.to_string());
        }
        for (name, value) in config.runtime.extra_headers.iter_mut() {
            let lower = name.to_ascii_lowercase();
            if lower == "authorization" || lower.contains("token") || lower.contains("key") {
                *value = REDACTED.to_string();
            }
        }
        config
    }
}

/// Bedrock runtime transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// AWS region hosting the runtime endpoint (e.g. `us-east-1`).
    ///
    /// Has no default. Left empty, adapter construction fails with
    /// `MissingRegion`.
    #[serde(default)]
    pub region: String,

    /// Endpoint override. `None` derives the endpoint from `region`.
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Bearer token for the runtime API. `None` falls back to the
    /// `AWS_BEARER_TOKEN_BEDROCK` environment variable.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Timeout in seconds. Caps a whole synchronous invocation; a stream
    /// fails only when no bytes arrive for this long.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra headers sent with every request (e.g. a proxy's auth header).
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            region: String::new(),
            endpoint_url: None,
            bearer_token: None,
            timeout_secs: default_timeout_secs(),
            extra_headers: BTreeMap::new(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    300
}

/// Anthropic Claude adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClaudeConfig {
    /// Model id override. `None` uses the adapter's default model.
    #[serde(default)]
    pub model_id: Option<String>,

    /// Wrap prompts in the `Human:` / `Assistant:` envelope.
    #[serde(default = "default_true")]
    pub human_assistant_prompt: bool,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            model_id: None,
            human_assistant_prompt: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Meta Llama adapter configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlamaConfig {
    /// Model id override. `None` uses the adapter's default model.
    #[serde(default)]
    pub model_id: Option<String>,
}

/// Cohere Command adapter configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CohereConfig {
    /// Model id override. `None` uses the adapter's default model.
    #[serde(default)]
    pub model_id: Option<String>,
}

/// Amazon Titan embedding adapter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TitanConfig {
    /// Model id override. `None` uses the adapter's default model.
    #[serde(default)]
    pub model_id: Option<String>,

    /// Replace every newline with a space before embedding.
    #[serde(default)]
    pub strip_new_lines: bool,

    /// Maximum texts per batch. `0` sends everything as one batch.
    #[serde(default)]
    pub batch_size: usize,

    /// Split texts longer than this many characters and recombine the pieces.
    #[serde(default)]
    pub max_chunk_chars: Option<usize>,

    /// Maximum embedding requests in flight within a batch.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for TitanConfig {
    fn default() -> Self {
        Self {
            model_id: None,
            strip_new_lines: false,
            batch_size: 0,
            max_chunk_chars: None,
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_max_concurrency() -> usize {
    1
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
