//! Tiered Resolver
//!
//! Decides, per descriptor, which texture it refers to, creating one when the
//! catalog has no match. Tiers run strictly in order and the first confident
//! tier wins:
//!
//! 1. **Exact**: English or Hebrew name equals the candidate name (no AI cost)
//! 2. **Heuristic**: best `SimilarityScorer` score over the cached context
//!    is at least `HEURISTIC_CONFIDENCE_THRESHOLD`
//! 3. **Semantic**: one `SemanticMatcher` call; `Linked` is accepted only for
//!    a texture in the context with confidence at least
//!    `AI_LINK_CONFIDENCE_THRESHOLD`, `Created` is synthesized, everything
//!    else (including call failures) goes to keyword fallback synthesis

use crate::db::CatalogStore;
use crate::error::PipelineResult;
use crate::models::{MaterialDescriptor, TextureGenerationOptions};
use crate::services::entity_synthesizer::EntitySynthesizer;
use crate::services::match_context::{MatchContextCache, MatchContextSnapshot};
use crate::services::semantic_matcher::{
    SemanticDecision, SemanticMatchRequest, SemanticMatcher, TextureProposal,
    AI_LINK_CONFIDENCE_THRESHOLD,
};
use crate::services::similarity::{SimilarityScorer, HEURISTIC_CONFIDENCE_THRESHOLD};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Which tier produced the texture id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    Exact,
    Heuristic,
    Semantic,
    SynthesizedFromAi,
    SynthesizedFallback,
}

impl ResolutionTier {
    /// True when the texture was created during this resolution
    pub fn is_new(&self) -> bool {
        matches!(
            self,
            ResolutionTier::SynthesizedFromAi | ResolutionTier::SynthesizedFallback
        )
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionTier::Exact => "exact",
            ResolutionTier::Heuristic => "heuristic",
            ResolutionTier::Semantic => "semantic",
            ResolutionTier::SynthesizedFromAi => "synthesized_from_ai",
            ResolutionTier::SynthesizedFallback => "synthesized_fallback",
        };
        f.write_str(s)
    }
}

/// Resolver result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub texture_id: Uuid,
    pub tier: ResolutionTier,
}

impl Resolution {
    fn new(texture_id: Uuid, tier: ResolutionTier) -> Self {
        Self { texture_id, tier }
    }
}

pub struct TieredResolver {
    catalog: Arc<dyn CatalogStore>,
    cache: Arc<MatchContextCache>,
    scorer: Arc<dyn SimilarityScorer>,
    matcher: Arc<dyn SemanticMatcher>,
    synthesizer: EntitySynthesizer,
}

impl TieredResolver {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        cache: Arc<MatchContextCache>,
        scorer: Arc<dyn SimilarityScorer>,
        matcher: Arc<dyn SemanticMatcher>,
        synthesizer: EntitySynthesizer,
    ) -> Self {
        Self {
            catalog,
            cache,
            scorer,
            matcher,
            synthesizer,
        }
    }

    /// Resolve a descriptor to an existing or newly created texture
    pub async fn resolve(
        &self,
        descriptor: &MaterialDescriptor,
        options: &TextureGenerationOptions,
    ) -> PipelineResult<Resolution> {
        // Tier 1
        if let Some(texture) = self
            .catalog
            .find_texture_by_exact_name(&descriptor.candidate_name, options.organization_id)
            .await?
        {
            debug!(candidate = %descriptor.candidate_name, texture_id = %texture.id, "Exact match");
            return Ok(Resolution::new(texture.id, ResolutionTier::Exact));
        }

        // Tier 2
        let context = self.cache.get_context(options.organization_id).await?;
        if let Some((texture_id, score)) = self.best_heuristic_match(descriptor, &context) {
            if score >= HEURISTIC_CONFIDENCE_THRESHOLD {
                debug!(
                    candidate = %descriptor.candidate_name,
                    texture_id = %texture_id,
                    score = score,
                    "Heuristic match"
                );
                return Ok(Resolution::new(texture_id, ResolutionTier::Heuristic));
            }
            debug!(
                candidate = %descriptor.candidate_name,
                best_score = score,
                "Heuristic score below threshold, consulting semantic matcher"
            );
        }

        // Tier 3
        let request = SemanticMatchRequest {
            descriptor: descriptor.clone(),
            context: Arc::clone(&context),
            style_context: options.style_context.clone(),
            price_tier: descriptor.price_tier,
        };

        let decision = match self.matcher.match_material(&request).await {
            Ok(decision) => review_decision(decision, &context),
            Err(e) => {
                warn!(
                    candidate = %descriptor.candidate_name,
                    error = %e,
                    "Semantic match failed, using keyword fallback"
                );
                SemanticDecision::Unclear {
                    reasoning: e.to_string(),
                }
            }
        };

        match decision {
            SemanticDecision::Linked {
                target_id,
                confidence,
                reasoning,
            } => {
                info!(
                    candidate = %descriptor.candidate_name,
                    texture_id = %target_id,
                    confidence = confidence,
                    reasoning = %reasoning,
                    "Semantic match"
                );
                Ok(Resolution::new(target_id, ResolutionTier::Semantic))
            }
            SemanticDecision::Created {
                proposal,
                confidence,
                reasoning,
            } => {
                if let Some(existing) = self.existing_by_proposed_name(&proposal, options).await? {
                    info!(
                        candidate = %descriptor.candidate_name,
                        proposed = %proposal.name.en,
                        texture_id = %existing,
                        "Proposed texture already exists, linking instead of creating"
                    );
                    return Ok(Resolution::new(existing, ResolutionTier::Semantic));
                }

                debug!(
                    candidate = %descriptor.candidate_name,
                    proposed = %proposal.name.en,
                    confidence = confidence,
                    "Creating texture from semantic proposal"
                );
                let id = self
                    .synthesizer
                    .create_from_ai(&proposal, &reasoning, descriptor, options)
                    .await?;
                Ok(Resolution::new(id, ResolutionTier::SynthesizedFromAi))
            }
            SemanticDecision::Unclear { reasoning } => {
                debug!(
                    candidate = %descriptor.candidate_name,
                    reasoning = %reasoning,
                    "Semantic match unclear, using keyword fallback"
                );
                let id = self.synthesizer.create_fallback(descriptor, options).await?;
                Ok(Resolution::new(id, ResolutionTier::SynthesizedFallback))
            }
        }
    }

    fn best_heuristic_match(
        &self,
        descriptor: &MaterialDescriptor,
        context: &MatchContextSnapshot,
    ) -> Option<(Uuid, f64)> {
        context
            .textures
            .iter()
            .map(|texture| (texture.id, self.scorer.score(descriptor, texture)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }

    async fn existing_by_proposed_name(
        &self,
        proposal: &TextureProposal,
        options: &TextureGenerationOptions,
    ) -> PipelineResult<Option<Uuid>> {
        for name in [&proposal.name.en, &proposal.name.he] {
            if name.trim().is_empty() {
                continue;
            }
            if let Some(texture) = self
                .catalog
                .find_texture_by_exact_name(name, options.organization_id)
                .await?
            {
                return Ok(Some(texture.id));
            }
        }
        Ok(None)
    }
}

/// Downgrade links the resolver cannot trust to `Unclear`
///
/// A link must target a texture the matcher was actually shown and carry at
/// least `AI_LINK_CONFIDENCE_THRESHOLD` confidence.
pub fn review_decision(decision: SemanticDecision, context: &MatchContextSnapshot) -> SemanticDecision {
    match decision {
        SemanticDecision::Linked {
            target_id,
            confidence,
            ..
        } if !context.contains_texture(target_id) => SemanticDecision::Unclear {
            reasoning: format!(
                "link target {} is not in the match context (confidence {:.2})",
                target_id, confidence
            ),
        },
        SemanticDecision::Linked {
            confidence,
            reasoning,
            ..
        } if confidence < AI_LINK_CONFIDENCE_THRESHOLD => SemanticDecision::Unclear {
            reasoning: format!("low confidence link ({:.2}): {}", confidence, reasoning),
        },
        other => other,
    }
}
