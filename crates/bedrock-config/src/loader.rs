// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bedrock.toml` > `~/.config/bedrock/bedrock.toml` > `/etc/bedrock/bedrock.toml`
//! with environment variable overrides via the `BEDROCK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BedrockConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/bedrock/bedrock.toml";

/// Configuration file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "bedrock.toml";

/// Path of the per-user configuration file, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("bedrock/bedrock.toml"))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bedrock/bedrock.toml` (system-wide)
/// 3. `~/.config/bedrock/bedrock.toml` (user XDG config)
/// 4. `./bedrock.toml` (local directory)
/// 5. `AWS_REGION`, then `BEDROCK_*` environment variables
pub fn load_config() -> Result<BedrockConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<BedrockConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BedrockConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BedrockConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BedrockConfig::default()))
        .merge(Toml::file(path))
        .merge(aws_region_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BedrockConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(aws_region_provider())
        .merge(env_provider())
}

/// Maps the standard `AWS_REGION` variable onto `runtime.region`.
///
/// Merged before [`env_provider`] so `BEDROCK_RUNTIME_REGION` still wins.
fn aws_region_provider() -> Env {
    Env::raw()
        .only(&["AWS_REGION"])
        .map(|_| "runtime.region".into())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `BEDROCK_TITAN_BATCH_SIZE` must map to `titan.batch_size`,
/// not `titan.batch.size`.
fn env_provider() -> Env {
    Env::prefixed("BEDROCK_").map(|key| {
        // `key` keeps the variable's case with the prefix stripped:
        // BEDROCK_RUNTIME_BEARER_TOKEN -> "RUNTIME_BEARER_TOKEN".
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("runtime_", "runtime.", 1)
            .replacen("claude_", "claude.", 1)
            .replacen("llama_", "llama.", 1)
            .replacen("cohere_", "cohere.", 1)
            .replacen("titan_", "titan.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn env_vars_map_to_sections() {
        Jail::expect_with(|jail| {
            jail.set_env("BEDROCK_RUNTIME_BEARER_TOKEN", "tok");
            jail.set_env("BEDROCK_TITAN_BATCH_SIZE", "16");
            jail.set_env("BEDROCK_CLAUDE_MODEL_ID", "anthropic.claude-instant-v1");

            let config: BedrockConfig = Figment::new()
                .merge(Serialized::defaults(BedrockConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.runtime.bearer_token.as_deref(), Some("tok"));
            assert_eq!(config.titan.batch_size, 16);
            assert_eq!(
                config.claude.model_id.as_deref(),
                Some("anthropic.claude-instant-v1")
            );
            Ok(())
        });
    }

    #[test]
    fn bedrock_region_overrides_aws_region() {
        Jail::expect_with(|jail| {
            jail.set_env("AWS_REGION", "eu-west-1");

            let figment = Figment::new()
                .merge(Serialized::defaults(BedrockConfig::default()))
                .merge(aws_region_provider())
                .merge(env_provider());
            let config: BedrockConfig = figment.extract()?;
            assert_eq!(config.runtime.region, "eu-west-1");

            jail.set_env("BEDROCK_RUNTIME_REGION", "ap-south-1");
            let config: BedrockConfig = Figment::new()
                .merge(Serialized::defaults(BedrockConfig::default()))
                .merge(aws_region_provider())
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.runtime.region, "ap-south-1");
            Ok(())
        });
    }

    #[test]
    fn env_overrides_win_over_the_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[runtime]
region = "us-west-2"

[titan]
batch_size = 4
"#,
            )?;
            jail.set_env("BEDROCK_TITAN_BATCH_SIZE", "16");
            jail.set_env("BEDROCK_LOGGING_LEVEL", "debug");

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.titan.batch_size, 16);
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.runtime.region, "us-west-2");
            Ok(())
        });
    }

    #[test]
    fn load_config_from_path_reads_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[titan]
batch_size = 4
"#,
            )?;
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.titan.batch_size, 4);
            Ok(())
        });
    }
}
