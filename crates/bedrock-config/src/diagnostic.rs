// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns Figment errors into miette diagnostics.
//!
//! Unknown keys get a "did you mean" hint (Jaro-Winkler via `strsim`) and,
//! when the key came from a TOML file we can re-read, a labelled span.
//! Type errors for values that came from the environment name the variable
//! to fix.

#![allow(unused_assignments)] // generated by the miette Diagnostic derive

use figment::error::{Error as FigmentError, Kind};
use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Similarity above which a valid key is offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Name under which an in-memory TOML string is registered as a source.
pub const INLINE_SOURCE: &str = "<inline>";

/// A configuration problem, ready for miette to render.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(bedrock::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Closest valid key, if any is close enough.
        suggestion: Option<String>,
        /// Comma-separated keys accepted in the same section.
        valid_keys: String,
        #[label("not a known key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(bedrock::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted path, e.g. `titan.batch_size`.
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(bedrock::config::missing_key),
        help("set `{key}` in bedrock.toml")
    )]
    MissingKey { key: String },

    /// A value parsed but is not acceptable (empty region, zero timeout, ...).
    #[error("validation error: {message}")]
    #[diagnostic(code(bedrock::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(bedrock::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(key) => format!("did you mean `{key}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Converts every error inside `err` into a [`ConfigError`].
///
/// `toml_sources` holds `(path, content)` pairs for the files that were
/// loaded; they are only used to attach spans.
pub fn figment_to_config_errors(
    err: FigmentError,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &FigmentError, toml_sources: &[(String, String)]) -> ConfigError {
    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let (span, src) = locate(error, &error.path, field, toml_sources);
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected),
                valid_keys: expected.join(", "),
                span,
                src,
            }
        }
        Kind::MissingField(field) => ConfigError::MissingKey {
            key: dotted(&error.path, Some(field.as_ref())),
        },
        Kind::InvalidType(actual, expected) => {
            let key = dotted(&error.path, None);
            let (span, src) = match error.path.split_last() {
                Some((field, section)) => locate(error, section, field, toml_sources),
                None => (None, None),
            };
            let expected = if came_from_env(error) {
                format!("{expected} (set via `{}`)", env_var_for(&key))
            } else {
                expected.to_string()
            };
            ConfigError::InvalidType {
                detail: format!("found {actual}, expected {expected}"),
                key,
                expected,
                span,
                src,
            }
        }
        _ => ConfigError::Other(error.to_string()),
    }
}

fn dotted(path: &[String], leaf: Option<&str>) -> String {
    path.iter()
        .map(String::as_str)
        .chain(leaf)
        .collect::<Vec<_>>()
        .join(".")
}

fn came_from_env(error: &FigmentError) -> bool {
    error
        .metadata
        .as_ref()
        .is_some_and(|m| m.name.contains("environment"))
}

/// Environment variable that sets the dotted config `key`.
pub fn env_var_for(key: &str) -> String {
    format!("BEDROCK_{}", key.replace('.', "_").to_ascii_uppercase())
}

/// Finds `field` under `section` in whichever loaded source produced `error`.
fn locate(
    error: &FigmentError,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    if came_from_env(error) {
        return (None, None);
    }
    let origin = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => path.display().to_string(),
        _ => INLINE_SOURCE.to_string(),
    };
    let Some((name, content)) = toml_sources.iter().find(|(name, _)| *name == origin) else {
        return (None, None);
    };

    match find_key_offset(content, section, field) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), field.len())),
            Some(NamedSource::new(name, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `field` as a key inside the `[section]` table of `content`.
///
/// An empty `section` searches the top level, before the first table header.
/// Nested sections are matched by their dotted header, e.g. `[runtime.extra_headers]`.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let wanted = section.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        let trimmed = line.trim_start();

        if let Some(header) = trimmed.strip_prefix('[') {
            current = header
                .split(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            continue;
        }
        if current != wanted {
            continue;
        }

        let is_key = trimmed
            .strip_prefix(field)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_key {
            return Some(start + (line.len() - trimmed.len()));
        }
    }

    None
}

/// Closest key in `valid_keys` to `unknown`, if it clears the similarity threshold.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Writes each error to stderr with miette's graphical renderer.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{rendered}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_region_for_regoin() {
        let valid = &["region", "endpoint_url", "bearer_token", "timeout_secs"];
        assert_eq!(suggest_key("regoin", valid), Some("region".to_string()));
    }

    #[test]
    fn suggests_batch_size_for_batch_sise() {
        let valid = &["model_id", "strip_new_lines", "batch_size", "max_concurrency"];
        assert_eq!(
            suggest_key("batch_sise", valid),
            Some("batch_size".to_string())
        );
    }

    #[test]
    fn nothing_close_means_no_suggestion() {
        let valid = &["region", "endpoint_url", "timeout_secs"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn key_offset_is_found_inside_its_section() {
        let content = "[claude]\nmodel_id = \"x\"\n\n[titan]\nmodel_id = \"y\"\nbatch_sise = 4\n";
        let section = vec!["titan".to_string()];

        let o = find_key_offset(content, &section, "batch_sise").unwrap();
        assert_eq!(&content[o..o + 10], "batch_sise");

        let o = find_key_offset(content, &section, "model_id").unwrap();
        assert!(content[o..].starts_with("model_id = \"y\""));
    }

    #[test]
    fn key_offset_handles_nested_tables_and_prefixes() {
        let content = "[runtime.extra_headers]\nx-trace-id = \"1\"\n[runtime]\nregion_x = 1\nregion = 2\n";

        let nested = vec!["runtime".to_string(), "extra_headers".to_string()];
        assert!(find_key_offset(content, &nested, "x-trace-id").is_some());

        let runtime = vec!["runtime".to_string()];
        let o = find_key_offset(content, &runtime, "region").unwrap();
        assert!(content[o..].starts_with("region = 2"));
    }

    #[test]
    fn missing_section_has_no_offset() {
        let content = "[claude]\nmodel_id = \"x\"\n";
        let section = vec!["titan".to_string()];
        assert!(find_key_offset(content, &section, "model_id").is_none());
    }

    #[test]
    fn env_var_names_follow_the_dotted_key() {
        assert_eq!(env_var_for("titan.batch_size"), "BEDROCK_TITAN_BATCH_SIZE");
        assert_eq!(env_var_for("runtime.region"), "BEDROCK_RUNTIME_REGION");
    }
}
