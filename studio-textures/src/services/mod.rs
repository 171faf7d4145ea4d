//! Texture pipeline services
//!
//! Leaf-first: keyword tables and the descriptor parser, the match context
//! cache, similarity scoring, the external AI and image clients, then the
//! synthesizer, resolver, bookkeeper and the orchestrator that drives them.

pub mod descriptor_parser;
pub mod entity_synthesizer;
pub mod image_generator;
pub mod keyword_tables;
pub mod link_bookkeeper;
pub mod match_context;
pub mod pacing;
pub mod semantic_matcher;
pub mod similarity;
pub mod texture_pipeline;
pub mod tiered_resolver;

pub use entity_synthesizer::EntitySynthesizer;
pub use image_generator::{
    DisabledImageGenerator, HttpImageGenerator, ImageError, ImageGenerator, ImageRequest,
};
pub use link_bookkeeper::{LinkBookkeeper, LinkOutcome};
pub use match_context::{MatchContextCache, MatchContextSnapshot};
pub use pacing::{IntervalPacing, NoPacing, PacingPolicy};
pub use semantic_matcher::{
    AiError, DisabledSemanticMatcher, HttpSemanticMatcher, SemanticDecision,
    SemanticMatchRequest, SemanticMatcher, TextureProposal, AI_LINK_CONFIDENCE_THRESHOLD,
};
pub use similarity::{NameSimilarityScorer, SimilarityScorer, HEURISTIC_CONFIDENCE_THRESHOLD};
pub use texture_pipeline::{
    StyleBatchSummary, StyleTextureJob, StyleTextureReport, TexturePipeline,
    TexturePipelineBuilder,
};
pub use tiered_resolver::{Resolution, ResolutionTier, TieredResolver};
