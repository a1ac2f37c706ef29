// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bedrock - command-line access to the Amazon Bedrock model adapters.

mod embed;
mod generate;

use std::path::PathBuf;

use bedrock_config::BedrockConfig;
use bedrock_core::BedrockError;
use clap::{Parser, Subcommand};

use crate::embed::EmbedArgs;
use crate::generate::GenerateArgs;

/// Bedrock - generate text and embeddings with Amazon Bedrock models.
#[derive(Parser, Debug)]
#[command(name = "bedrock", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a completion with Claude, Llama or Cohere.
    Generate(GenerateArgs),
    /// Embed texts with Titan.
    Embed(EmbedArgs),
    /// Estimate the number of tokens in a text.
    Tokens {
        text: String,
    },
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => bedrock_config::load_and_validate_path(path),
        None => bedrock_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            bedrock_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    if let Err(e) = run(cli.command, &config).await {
        eprintln!("error: {}", error_chain(&e));
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &BedrockConfig) -> Result<(), BedrockError> {
    match command {
        Commands::Generate(args) => {
            let text = generate::run(config, &args).await?;
            if args.stream {
                // Fragments were already printed as they arrived.
                println!();
            } else {
                println!("{text}");
            }
        }
        Commands::Embed(args) => {
            let vectors = embed::run(config, &args).await?;
            print!("{}", embed::render(&vectors)?);
        }
        Commands::Tokens { text } => {
            println!("{}", bedrock_core::tokens::count_tokens(&text));
        }
        Commands::Config => {
            print!("{}", render_config(config)?);
        }
    }
    Ok(())
}

/// The configuration as TOML, with secrets replaced.
fn render_config(config: &BedrockConfig) -> Result<String, BedrockError> {
    toml::to_string_pretty(&config.redacted())
        .map_err(|e| BedrockError::Internal(format!("failed to render configuration: {e}")))
}

/// Joins an error with its sources: `outer: inner: root`.
fn error_chain(error: &BedrockError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Logs go to stderr so stdout carries only command output.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bedrock={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::generate::Vendor;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "bedrock",
            "generate",
            "hello",
            "--vendor",
            "llama",
            "--max-tokens",
            "64",
            "--stop",
            "a",
            "--stop",
            "b",
            "--stream",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.vendor, Vendor::Llama);
        assert_eq!(args.max_tokens, Some(64));
        assert_eq!(args.stop, vec!["a", "b"]);
        assert!(args.stream);
    }

    #[test]
    fn embed_requires_text() {
        assert!(Cli::try_parse_from(["bedrock", "embed"]).is_err());
        let cli = Cli::try_parse_from(["bedrock", "embed", "--query", "x", "y"]).unwrap();
        let Commands::Embed(args) = cli.command else {
            panic!("expected embed");
        };
        assert!(args.query);
        assert_eq!(args.texts, vec!["x", "y"]);
    }

    #[test]
    fn config_output_hides_the_bearer_token() {
        let mut config = bedrock_config::load_and_validate_str("").unwrap();
        config.runtime.bearer_token = Some("top-secret".into());
        let rendered = render_config(&config).unwrap();
        assert!(rendered.contains("[runtime]"));
        assert!(!rendered.contains("top-secret"));
    }

    #[test]
    fn error_chain_appends_sources() {
        let source = serde_json::from_str::<u32>("x").unwrap_err();
        let err = BedrockError::decode("claude response", source);
        let chain = error_chain(&err);
        assert!(chain.starts_with("failed to decode claude response"));
    }
}
