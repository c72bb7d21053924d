//! Cosine similarity and top-k ranking over embeddings.

use serde::{Deserialize, Serialize};

use crate::{HeimdallError, Result};

/// A candidate's position in the input and its score against the query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scored {
    pub index: usize,
    pub score: f32,
}

/// Cosine similarity between two vectors of equal length.
///
/// Returns a value between -1.0 and 1.0, or 0.0 if either vector has zero
/// norm. Extra trailing elements of the longer slice are ignored; callers
/// that care check dimensions first (as [`rank`] does).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let score = dot / (norm_a * norm_b);
    // -0.0 would sort below 0.0 under total_cmp
    if score == 0.0 { 0.0 } else { score }
}

/// Rank `candidates` by similarity to `query`, best first.
///
/// Ties keep input order. At most `top_k` results are returned.
pub fn rank(query: &[f32], candidates: &[Vec<f32>], top_k: usize) -> Result<Vec<Scored>> {
    if let Some((index, c)) = candidates
        .iter()
        .enumerate()
        .find(|(_, c)| c.len() != query.len())
    {
        return Err(HeimdallError::InvalidInput(format!(
            "dimension mismatch: query has {}, candidate {index} has {}",
            query.len(),
            c.len()
        )));
    }

    let mut scored: Vec<Scored> = candidates
        .iter()
        .enumerate()
        .map(|(index, c)| Scored {
            index,
            score: cosine_similarity(query, c),
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    scored.truncate(top_k);
    Ok(scored)
}
