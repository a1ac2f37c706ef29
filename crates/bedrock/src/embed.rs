// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bedrock embed`: Titan embeddings, one JSON array per line.

use bedrock_config::BedrockConfig;
use bedrock_core::{BedrockError, Embedder};
use bedrock_titan::TitanEmbedder;
use clap::Args;

#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// Texts to embed.
    #[arg(required = true)]
    pub texts: Vec<String>,
    /// Embed each text as a search query instead of a document.
    #[arg(long)]
    pub query: bool,
}

pub async fn run(config: &BedrockConfig, args: &EmbedArgs) -> Result<Vec<Vec<f32>>, BedrockError> {
    let embedder = TitanEmbedder::from_config(config)?;
    if !args.query {
        return embedder.embed_documents(&args.texts).await;
    }

    let mut vectors = Vec::with_capacity(args.texts.len());
    for text in &args.texts {
        vectors.push(embedder.embed_query(text).await?);
    }
    Ok(vectors)
}

/// Renders each vector as a JSON array on its own line.
pub fn render(vectors: &[Vec<f32>]) -> Result<String, BedrockError> {
    let mut out = String::new();
    for vector in vectors {
        out.push_str(&serde_json::to_string(vector).map_err(BedrockError::encode)?);
        out.push('\n');
    }
    Ok(out)
}
