// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bedrock generate`: one completion from a text-generation model.

use std::io::Write;
use std::sync::Arc;

use bedrock_claude::ClaudeLlm;
use bedrock_cohere::CohereLlm;
use bedrock_config::BedrockConfig;
use bedrock_core::{
    BedrockError, BoxError, CallOptions, CallbackHandler, LanguageModel, TracingCallbackHandler,
};
use bedrock_llama::LlamaLlm;
use clap::{Args, ValueEnum};
use tracing::debug;

/// Model family to send the prompt to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Vendor {
    Claude,
    Llama,
    Cohere,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Prompt text.
    pub prompt: String,
    #[arg(long, value_enum, default_value_t = Vendor::Claude)]
    pub vendor: Vendor,
    /// Model id override for the chosen vendor.
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub max_tokens: Option<u32>,
    #[arg(long)]
    pub temperature: Option<f64>,
    #[arg(long)]
    pub top_p: Option<f64>,
    #[arg(long)]
    pub top_k: Option<u32>,
    /// Stop sequence; repeat for several.
    #[arg(long = "stop")]
    pub stop: Vec<String>,
    /// Print fragments as they arrive.
    #[arg(long)]
    pub stream: bool,
}

impl GenerateArgs {
    pub fn call_options(&self) -> CallOptions {
        let mut options = CallOptions::new().with_stop_words(self.stop.iter().cloned());
        options.max_tokens = self.max_tokens;
        options.temperature = self.temperature;
        options.top_p = self.top_p;
        options.top_k = self.top_k;
        if self.stream {
            options = options.with_streaming_func(|chunk| -> Result<(), BoxError> {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(chunk.as_bytes())?;
                stdout.flush()?;
                Ok(())
            });
        }
        options
    }
}

/// Builds the adapter for `vendor`, applying a model override on top of `config`.
///
/// `callbacks` observes every call made through the returned model.
pub fn build_model(
    config: &BedrockConfig,
    vendor: Vendor,
    model: Option<&str>,
    callbacks: Arc<dyn CallbackHandler>,
) -> Result<Box<dyn LanguageModel>, BedrockError> {
    let mut config = config.clone();
    let model = model.map(str::to_string);
    Ok(match vendor {
        Vendor::Claude => {
            config.claude.model_id = model.or(config.claude.model_id);
            Box::new(ClaudeLlm::from_config(&config)?.with_callbacks(callbacks))
        }
        Vendor::Llama => {
            config.llama.model_id = model.or(config.llama.model_id);
            Box::new(LlamaLlm::from_config(&config)?.with_callbacks(callbacks))
        }
        Vendor::Cohere => {
            config.cohere.model_id = model.or(config.cohere.model_id);
            Box::new(CohereLlm::from_config(&config)?.with_callbacks(callbacks))
        }
    })
}

/// Runs the completion and returns its text.
pub async fn run(config: &BedrockConfig, args: &GenerateArgs) -> Result<String, BedrockError> {
    let llm = build_model(
        config,
        args.vendor,
        args.model.as_deref(),
        Arc::new(TracingCallbackHandler),
    )?;
    debug!(vendor = ?args.vendor, stream = args.stream, "generating");
    llm.call(&args.prompt, &args.call_options()).await
}
