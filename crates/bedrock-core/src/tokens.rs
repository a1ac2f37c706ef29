// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Approximate token counting.
//!
//! Counts use the `cl100k_base` BPE. Bedrock vendors each tokenize
//! differently, so the number is an estimate for budgeting, not a bill.

use std::sync::OnceLock;

use tiktoken_rs::CoreBPE;
use tracing::warn;

static CL100K: OnceLock<Option<CoreBPE>> = OnceLock::new();

fn cl100k() -> Option<&'static CoreBPE> {
    CL100K
        .get_or_init(|| match tiktoken_rs::cl100k_base() {
            Ok(bpe) => Some(bpe),
            Err(e) => {
                warn!(error = %e, "failed to load cl100k_base, using character estimate");
                None
            }
        })
        .as_ref()
}

/// Returns the approximate number of tokens in `text`.
pub fn count_tokens(text: &str) -> usize {
    match cl100k() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => estimate_tokens(text),
    }
}

/// Character-based fallback: roughly four characters per token.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}
