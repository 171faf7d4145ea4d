//! Test Helper Utilities
//!
//! Shared fixtures for studio-textures integration tests

pub mod catalog;
pub mod mocks;

pub use catalog::{count_rows, insert_texture, memory_catalog, usage_count};
pub use mocks::{CountingMatcher, FixedScorer, RecordingImages};

use std::sync::Arc;
use studio_textures::db::SqliteCatalog;
use studio_textures::services::{NoPacing, SemanticMatcher, TexturePipeline, TexturePipelineBuilder};
use studio_common::ManualClock;

/// Pipeline builder with zero pacing and a manual clock
pub fn test_pipeline(catalog: &Arc<SqliteCatalog>, matcher: Arc<dyn SemanticMatcher>) -> TexturePipelineBuilder {
    TexturePipeline::builder(catalog.clone(), matcher)
        .pacing(Arc::new(NoPacing))
        .clock(Arc::new(ManualClock::default()))
}
