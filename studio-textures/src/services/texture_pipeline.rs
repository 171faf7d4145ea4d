//! Texture Pipeline orchestrator
//!
//! Drives one style's material guidance end to end:
//!
//! ```text
//! guidance → parse → truncate(max_textures) → for each descriptor:
//!     pace → resolve (exact → heuristic → semantic → synthesize) → link
//! ```
//!
//! Descriptors are processed sequentially. A descriptor that fails is logged
//! and skipped; a fatal error (no categories in the catalog) aborts the style.
//! There is no transaction across descriptors, so a partially processed style
//! keeps the links it already made.

use crate::db::{CatalogStore, ContextSource};
use crate::error::{PipelineError, PipelineResult};
use crate::models::{PriceTier, TextureGenerationOptions};
use crate::services::descriptor_parser;
use crate::services::entity_synthesizer::EntitySynthesizer;
use crate::services::image_generator::{DisabledImageGenerator, ImageGenerator};
use crate::services::link_bookkeeper::{LinkBookkeeper, LinkOutcome};
use crate::services::match_context::{
    MatchContextCache, DEFAULT_CONTEXT_TEXTURE_LIMIT, DEFAULT_CONTEXT_TTL,
};
use crate::services::pacing::{IntervalPacing, PacingPolicy};
use crate::services::semantic_matcher::SemanticMatcher;
use crate::services::similarity::{NameSimilarityScorer, SimilarityScorer};
use crate::services::tiered_resolver::TieredResolver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use studio_common::{Clock, SystemClock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Outcome of processing one style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleTextureReport {
    pub style_id: Uuid,
    /// Linked texture ids in descriptor order (each id once)
    pub texture_ids: Vec<Uuid>,
    /// Descriptors parsed from the guidance, before the budget cap
    pub descriptors_found: usize,
    pub descriptors_processed: usize,
    pub created: usize,
    pub matched: usize,
    pub already_linked: usize,
    pub skipped: usize,
}

impl StyleTextureReport {
    fn new(style_id: Uuid, descriptors_found: usize) -> Self {
        Self {
            style_id,
            texture_ids: Vec::new(),
            descriptors_found,
            descriptors_processed: 0,
            created: 0,
            matched: 0,
            already_linked: 0,
            skipped: 0,
        }
    }
}

/// One entry of a batch seeding file
#[derive(Debug, Clone, Deserialize)]
pub struct StyleTextureJob {
    pub style_id: Uuid,
    pub guidance: String,
    #[serde(default)]
    pub price_tier: PriceTier,
    #[serde(flatten)]
    pub options: TextureGenerationOptions,
}

/// Per-style result of a batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleBatchSummary {
    pub style_id: Uuid,
    pub linked: usize,
    pub created: usize,
    pub matched: usize,
    pub skipped: usize,
    /// Set when the style was aborted; counts cover the descriptors before the abort
    pub error: Option<String>,
}

impl From<&StyleTextureReport> for StyleBatchSummary {
    fn from(report: &StyleTextureReport) -> Self {
        Self {
            style_id: report.style_id,
            linked: report.texture_ids.len(),
            created: report.created,
            matched: report.matched,
            skipped: report.skipped,
            error: None,
        }
    }
}

pub struct TexturePipeline {
    resolver: TieredResolver,
    bookkeeper: LinkBookkeeper,
    pacing: Arc<dyn PacingPolicy>,
    cache: Arc<MatchContextCache>,
}

impl TexturePipeline {
    /// Start building a pipeline over a catalog and a semantic matcher
    pub fn builder<C>(catalog: Arc<C>, matcher: Arc<dyn SemanticMatcher>) -> TexturePipelineBuilder
    where
        C: CatalogStore + 'static,
    {
        TexturePipelineBuilder {
            catalog: catalog.clone(),
            context_source: catalog,
            matcher,
            images: Arc::new(DisabledImageGenerator),
            clock: Arc::new(SystemClock),
            pacing: Arc::new(IntervalPacing::default()),
            scorer: Arc::new(NameSimilarityScorer),
            context_ttl: DEFAULT_CONTEXT_TTL,
            context_texture_limit: DEFAULT_CONTEXT_TEXTURE_LIMIT,
        }
    }

    /// Resolve and link the materials described in `guidance`; returns linked ids in order
    pub async fn generate_textures_for_style(
        &self,
        style_id: Uuid,
        guidance: &str,
        price_tier: PriceTier,
        options: &TextureGenerationOptions,
    ) -> PipelineResult<Vec<Uuid>> {
        let report = self
            .generate_style_report(style_id, guidance, price_tier, options)
            .await?;
        Ok(report.texture_ids)
    }

    /// Same as `generate_textures_for_style`, with per-tier counts
    pub async fn generate_style_report(
        &self,
        style_id: Uuid,
        guidance: &str,
        price_tier: PriceTier,
        options: &TextureGenerationOptions,
    ) -> PipelineResult<StyleTextureReport> {
        match self.run_style(style_id, guidance, price_tier, options).await {
            (report, None) => Ok(report),
            (_, Some(e)) => Err(e),
        }
    }

    /// Process one style; on a fatal error the report holds what was linked before the abort
    async fn run_style(
        &self,
        style_id: Uuid,
        guidance: &str,
        price_tier: PriceTier,
        options: &TextureGenerationOptions,
    ) -> (StyleTextureReport, Option<PipelineError>) {
        let mut descriptors = descriptor_parser::parse(guidance, price_tier);
        let mut report = StyleTextureReport::new(style_id, descriptors.len());

        if descriptors.len() > options.max_textures {
            debug!(
                style_id = %style_id,
                found = descriptors.len(),
                max_textures = options.max_textures,
                "Truncating descriptors to texture budget"
            );
            descriptors.truncate(options.max_textures);
        }

        info!(
            style_id = %style_id,
            descriptors = descriptors.len(),
            price_tier = %price_tier,
            "Generating textures for style"
        );

        for descriptor in &descriptors {
            self.pacing.pace().await;
            report.descriptors_processed += 1;

            let resolution = match self.resolver.resolve(descriptor, options).await {
                Ok(resolution) => resolution,
                Err(e) if e.is_fatal() => {
                    error!(
                        style_id = %style_id,
                        linked = report.texture_ids.len(),
                        error = %e,
                        "Aborting style"
                    );
                    return (report, Some(e));
                }
                Err(e) => {
                    warn!(
                        style_id = %style_id,
                        candidate = %descriptor.candidate_name,
                        error = %e,
                        "Failed to resolve material, skipping"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            let outcome = match self
                .bookkeeper
                .link_style_to_texture(style_id, resolution.texture_id)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(
                        style_id = %style_id,
                        texture_id = %resolution.texture_id,
                        error = %e,
                        "Failed to link texture, skipping"
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            debug!(
                candidate = %descriptor.candidate_name,
                texture_id = %resolution.texture_id,
                tier = %resolution.tier,
                outcome = ?outcome,
                "Material resolved"
            );

            if resolution.tier.is_new() {
                report.created += 1;
            } else {
                report.matched += 1;
            }
            if outcome == LinkOutcome::AlreadyLinked {
                report.already_linked += 1;
            }
            if !report.texture_ids.contains(&resolution.texture_id) {
                report.texture_ids.push(resolution.texture_id);
            }
        }

        info!(
            style_id = %style_id,
            linked = report.texture_ids.len(),
            created = report.created,
            matched = report.matched,
            skipped = report.skipped,
            "Style textures complete"
        );

        (report, None)
    }

    /// Process several styles in order; a fatal error is recorded and the batch moves on
    ///
    /// An aborted style's summary still counts the links made before the abort.
    pub async fn generate_textures_for_styles(&self, jobs: &[StyleTextureJob]) -> Vec<StyleBatchSummary> {
        let mut summaries = Vec::with_capacity(jobs.len());

        for job in jobs {
            let (report, error) = self
                .run_style(job.style_id, &job.guidance, job.price_tier, &job.options)
                .await;
            let mut summary = StyleBatchSummary::from(&report);
            summary.error = error.map(|e| e.to_string());
            summaries.push(summary);
        }

        summaries
    }

    /// Remove a style↔texture link; returns rows removed
    pub async fn unlink(&self, style_id: Uuid, texture_id: Uuid) -> PipelineResult<u64> {
        self.bookkeeper.unlink(style_id, texture_id).await
    }

    pub fn context_cache(&self) -> &MatchContextCache {
        &self.cache
    }
}

pub struct TexturePipelineBuilder {
    catalog: Arc<dyn CatalogStore>,
    context_source: Arc<dyn ContextSource>,
    matcher: Arc<dyn SemanticMatcher>,
    images: Arc<dyn ImageGenerator>,
    clock: Arc<dyn Clock>,
    pacing: Arc<dyn PacingPolicy>,
    scorer: Arc<dyn SimilarityScorer>,
    context_ttl: Duration,
    context_texture_limit: usize,
}

impl TexturePipelineBuilder {
    pub fn image_generator(mut self, images: Arc<dyn ImageGenerator>) -> Self {
        self.images = images;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn pacing(mut self, pacing: Arc<dyn PacingPolicy>) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn scorer(mut self, scorer: Arc<dyn SimilarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn context_ttl(mut self, ttl: Duration) -> Self {
        self.context_ttl = ttl;
        self
    }

    pub fn context_texture_limit(mut self, limit: usize) -> Self {
        self.context_texture_limit = limit;
        self
    }

    pub fn build(self) -> TexturePipeline {
        let cache = Arc::new(
            MatchContextCache::new(self.context_source, self.clock)
                .with_ttl(self.context_ttl)
                .with_texture_limit(self.context_texture_limit),
        );
        let synthesizer = EntitySynthesizer::new(self.catalog.clone(), self.images, cache.clone());
        let resolver = TieredResolver::new(
            self.catalog.clone(),
            cache.clone(),
            self.scorer,
            self.matcher,
            synthesizer,
        );

        TexturePipeline {
            resolver,
            bookkeeper: LinkBookkeeper::new(self.catalog),
            pacing: self.pacing,
            cache,
        }
    }
}
