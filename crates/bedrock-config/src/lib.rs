// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Bedrock model adapters.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use bedrock_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Region: {}", config.runtime.region);
//! ```

use std::path::{Path, PathBuf};

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::BedrockConfig;

/// Loads the layered configuration (files, then environment) and validates it.
///
/// Every problem is returned at once: either all Figment errors, re-read
/// against the TOML files for spans, or all validation failures.
pub fn load_and_validate() -> Result<BedrockConfig, Vec<ConfigError>> {
    checked(loader::load_config(), collect_toml_sources)
}

/// Same as [`load_and_validate`] for an in-memory TOML document, without env overrides.
pub fn load_and_validate_str(toml_content: &str) -> Result<BedrockConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![(diagnostic::INLINE_SOURCE.to_string(), toml_content.to_string())]
    })
}

/// Same as [`load_and_validate`] with one explicit file in place of the standard locations.
pub fn load_and_validate_path(path: &Path) -> Result<BedrockConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        std::fs::read_to_string(path)
            .map(|content| vec![(path.display().to_string(), content)])
            .unwrap_or_default()
    })
}

fn checked(
    loaded: Result<BedrockConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<BedrockConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Reads whichever standard config files exist, keyed the way Figment reports them.
fn collect_toml_sources() -> Vec<(String, String)> {
    let local = std::env::current_dir()
        .map(|dir| dir.join(loader::LOCAL_CONFIG_PATH))
        .unwrap_or_else(|_| PathBuf::from(loader::LOCAL_CONFIG_PATH));

    [
        Some(local),
        loader::user_config_path(),
        Some(PathBuf::from(loader::SYSTEM_CONFIG_PATH)),
    ]
    .into_iter()
    .flatten()
    .filter_map(|path| {
        let content = std::fs::read_to_string(&path).ok()?;
        Some((path.display().to_string(), content))
    })
    .collect()
}
