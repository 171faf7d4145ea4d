//! Heuristic texture similarity
//!
//! Free (no I/O) scoring used to skip the AI call when the answer is obvious,
//! e.g. "Brushed Oak" against an existing "Oak".

use crate::models::{MaterialDescriptor, TextureProjection};

/// Minimum heuristic score that links without consulting the AI
pub const HEURISTIC_CONFIDENCE_THRESHOLD: f64 = 0.85;

/// Score returned when every token of the shorter name appears in the longer one
const TOKEN_CONTAINMENT_SCORE: f64 = 0.9;

/// Cap on the Jaro-Winkler component; a shared prefix alone never links
const JARO_WINKLER_CAP: f64 = 0.85;

const NAME_WEIGHT: f64 = 0.9;
const FINISH_WEIGHT: f64 = 0.05;
const CATEGORY_WEIGHT: f64 = 0.05;

/// Pure similarity function between a descriptor and a catalog texture
pub trait SimilarityScorer: Send + Sync {
    /// Confidence in [0, 1] that `texture` is the material the descriptor describes
    fn score(&self, descriptor: &MaterialDescriptor, texture: &TextureProjection) -> f64;
}

/// Default scorer: name similarity weighted with finish/category alignment
///
/// Name similarity is the better of capped Jaro-Winkler and token
/// containment, taken over both languages. Only identical names or whole
/// token containment score high enough to link on their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameSimilarityScorer;

impl SimilarityScorer for NameSimilarityScorer {
    fn score(&self, descriptor: &MaterialDescriptor, texture: &TextureProjection) -> f64 {
        let candidate = normalize(&descriptor.candidate_name);
        let name_score = name_similarity(&candidate, &normalize(&texture.name.en))
            .max(name_similarity(&candidate, &normalize(&texture.name.he)));

        let finish_match = texture.finish.eq_ignore_ascii_case(&descriptor.finish_hint);
        let category_match = texture.category_slug.as_deref() == Some(descriptor.category_hint.as_str());

        let score = name_score * NAME_WEIGHT
            + if finish_match { FINISH_WEIGHT } else { 0.0 }
            + if category_match { CATEGORY_WEIGHT } else { 0.0 };

        score.clamp(0.0, 1.0)
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Similarity of two normalized names (0.0-1.0)
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }

    let jaro_winkler = strsim::jaro_winkler(a, b) * JARO_WINKLER_CAP;

    let a_tokens: Vec<&str> = a.split_whitespace().collect();
    let b_tokens: Vec<&str> = b.split_whitespace().collect();
    let (shorter, longer) = if a_tokens.len() <= b_tokens.len() {
        (&a_tokens, &b_tokens)
    } else {
        (&b_tokens, &a_tokens)
    };
    let containment = if shorter.iter().all(|t| longer.contains(t)) {
        TOKEN_CONTAINMENT_SCORE
    } else {
        0.0
    };

    jaro_winkler.max(containment)
}
