//! Descriptor Parser
//!
//! Turns free-text material guidance into structured `MaterialDescriptor`s.
//!
//! # Algorithm
//! 1. Split on clause separators (`,` `;` `.` newline)
//! 2. Drop fragments shorter than 4 characters
//! 3. First word found in the material tables becomes the candidate name
//!    (fragments without one are dropped)
//! 4. First finish keyword becomes the finish hint (default `natural`)
//! 5. Leftover words longer than 3 characters become keywords, after the
//!    price-tier string
//!
//! Order follows the guidance text; duplicates are kept (the resolver's exact
//! match tier absorbs them).

use crate::models::{MaterialDescriptor, PriceTier};
use crate::services::keyword_tables::{lookup_finish, lookup_material, DEFAULT_FINISH};
use tracing::debug;

const FRAGMENT_SEPARATORS: &[char] = &[',', ';', '.', '\n'];
const MIN_FRAGMENT_CHARS: usize = 4;
const MIN_KEYWORD_CHARS: usize = 4;

/// Short connectives that pass the length filter but describe nothing
const STOP_WORDS: &[&str] = &[
    "with", "that", "this", "from", "into", "onto", "over", "under", "throughout", "where",
    "which", "while", "some", "very", "also",
];

/// Parse guidance text into material descriptors
pub fn parse(guidance: &str, price_tier: PriceTier) -> Vec<MaterialDescriptor> {
    let descriptors: Vec<MaterialDescriptor> = guidance
        .split(FRAGMENT_SEPARATORS)
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() >= MIN_FRAGMENT_CHARS)
        .filter_map(|fragment| parse_fragment(fragment, price_tier))
        .collect();

    debug!(
        descriptor_count = descriptors.len(),
        price_tier = %price_tier,
        "Parsed material guidance"
    );

    descriptors
}

fn parse_fragment(fragment: &str, price_tier: PriceTier) -> Option<MaterialDescriptor> {
    let words: Vec<String> = fragment
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect();

    let Some((material_idx, material)) = words
        .iter()
        .enumerate()
        .find_map(|(i, w)| lookup_material(w).map(|m| (i, m)))
    else {
        debug!(fragment = %fragment, "No material keyword in fragment, dropping");
        return None;
    };

    let finish = words
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != material_idx)
        .find_map(|(i, w)| lookup_finish(w).map(|f| (i, f)));
    let finish_idx = finish.map(|(i, _)| i);

    let mut keywords = vec![price_tier.as_str().to_string()];
    keywords.extend(
        words
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != material_idx && Some(*i) != finish_idx)
            .map(|(_, w)| w)
            .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
            .filter(|w| !STOP_WORDS.contains(&w.as_str()))
            .cloned(),
    );

    Some(MaterialDescriptor {
        candidate_name: capitalize(material.keyword),
        category_hint: material.category_or_default().to_string(),
        finish_hint: finish.map_or(DEFAULT_FINISH, |(_, f)| f).to_string(),
        keywords,
        price_tier,
        source_fragment: fragment.to_string(),
    })
}

/// Lowercase and strip surrounding punctuation (hyphens inside words are kept)
fn normalize_word(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
