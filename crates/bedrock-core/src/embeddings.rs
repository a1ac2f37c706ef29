// SPDX-FileCopyrightText: 2026 Bedrock Adapters Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by embedding adapters: newline stripping, batching,
//! splitting long inputs, and recombining piece vectors.

use crate::error::BedrockError;

/// Replaces every `\n` with a single space.
pub fn remove_newlines(text: &str) -> String {
    text.replace('\n', " ")
}

/// Applies [`remove_newlines`] to every text when `strip` is set.
pub fn maybe_remove_newlines(texts: &[String], strip: bool) -> Vec<String> {
    if !strip {
        return texts.to_vec();
    }
    texts.iter().map(|t| remove_newlines(t)).collect()
}

/// Partitions `items` into order-preserving batches of at most `batch_size`.
///
/// A `batch_size` of zero means "everything in one batch". An empty input
/// yields no batches, so a batch is never empty.
pub fn batch_texts<T>(items: &[T], batch_size: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }
    if batch_size == 0 {
        return vec![items];
    }
    items.chunks(batch_size).collect()
}

/// Splits `text` into pieces of at most `max_chars` characters, on char boundaries.
///
/// A `max_chars` of zero, or a text that already fits, yields a single piece.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// Merges piece vectors into one vector, weighting each by its text length.
///
/// A single vector passes through unchanged. Several vectors are averaged
/// with the given weights and the result is L2-normalized.
pub fn combine_vectors(vectors: &[Vec<f32>], weights: &[usize]) -> Result<Vec<f32>, BedrockError> {
    if vectors.is_empty() {
        return Err(BedrockError::InvalidRequest(
            "cannot combine an empty list of vectors".into(),
        ));
    }
    if vectors.len() != weights.len() {
        return Err(BedrockError::InvalidRequest(format!(
            "got {} vectors but {} weights",
            vectors.len(),
            weights.len()
        )));
    }
    if vectors.len() == 1 {
        return Ok(vectors[0].clone());
    }

    let dim = vectors[0].len();
    if let Some(v) = vectors.iter().find(|v| v.len() != dim) {
        return Err(BedrockError::InvalidRequest(format!(
            "vector dimensions differ: {dim} vs {}",
            v.len()
        )));
    }

    let total: usize = weights.iter().sum();
    if total == 0 {
        return Err(BedrockError::InvalidRequest(
            "combined weights must not sum to zero".into(),
        ));
    }

    let mut combined = vec![0.0f32; dim];
    for (vector, &weight) in vectors.iter().zip(weights) {
        let w = weight as f32 / total as f32;
        for (acc, x) in combined.iter_mut().zip(vector) {
            *acc += x * w;
        }
    }

    Ok(l2_normalize(&combined))
}

/// L2-normalize a vector.
fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}
