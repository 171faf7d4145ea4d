//! Entity Synthesizer
//!
//! Creates textures the catalog does not have yet, either from an AI proposal
//! or from the descriptor alone (keyword fallback). Every created texture is
//! written together with exactly one category link, and the match context is
//! invalidated afterwards so the next descriptor can match it.

use crate::db::CatalogStore;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{
    BilingualName, GenerationStatus, MaterialCategory, MaterialDescriptor, NewTexture,
    TextureGenerationOptions,
};
use crate::services::image_generator::{ImageGenerator, ImageRequest};
use crate::services::keyword_tables::{fallback_translation, sheen_for_finish};
use crate::services::match_context::MatchContextCache;
use crate::services::semantic_matcher::TextureProposal;
use std::sync::Arc;
use studio_common::uuid_utils;
use tracing::{info, warn};
use uuid::Uuid;

const AI_ORIGIN_TAG: &str = "ai-proposal";
const FALLBACK_ORIGIN_TAG: &str = "keyword-fallback";

pub struct EntitySynthesizer {
    catalog: Arc<dyn CatalogStore>,
    images: Arc<dyn ImageGenerator>,
    cache: Arc<MatchContextCache>,
}

impl EntitySynthesizer {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        images: Arc<dyn ImageGenerator>,
        cache: Arc<MatchContextCache>,
    ) -> Self {
        Self {
            catalog,
            images,
            cache,
        }
    }

    /// Create a texture from the properties the semantic matcher proposed
    pub async fn create_from_ai(
        &self,
        proposal: &TextureProposal,
        reasoning: &str,
        descriptor: &MaterialDescriptor,
        options: &TextureGenerationOptions,
    ) -> PipelineResult<Uuid> {
        let proposed_category = match proposal.category_id {
            Some(id) => self.catalog.find_category_by_id(id).await?,
            None => None,
        };
        let category = match proposed_category {
            Some(category) => category,
            None => self.resolve_category(descriptor).await?,
        };

        let he = if proposal.name.he.trim().is_empty() {
            fallback_translation(&proposal.name.en)
        } else {
            proposal.name.he.clone()
        };
        let finish = proposal
            .finish
            .clone()
            .unwrap_or_else(|| descriptor.finish_hint.clone());
        let sheen = proposal
            .sheen
            .clone()
            .or_else(|| sheen_for_finish(&finish).map(str::to_string));

        let texture = NewTexture {
            id: uuid_utils::generate(),
            name: BilingualName::new(proposal.name.en.clone(), he),
            description: Some(format!("AI proposal: {}", reasoning)),
            image_url: None,
            finish,
            sheen,
            base_color: proposal.base_color.clone(),
            is_abstract: true,
            generation_status: GenerationStatus::Completed,
            tags: tags_for(descriptor, AI_ORIGIN_TAG),
            organization_id: options.organization_id,
        };

        self.persist(texture, &category, descriptor, options).await
    }

    /// Create a texture from the descriptor alone
    pub async fn create_fallback(
        &self,
        descriptor: &MaterialDescriptor,
        options: &TextureGenerationOptions,
    ) -> PipelineResult<Uuid> {
        let category = self.resolve_category(descriptor).await?;

        let texture = NewTexture {
            id: uuid_utils::generate(),
            name: BilingualName::new(
                descriptor.candidate_name.clone(),
                fallback_translation(&descriptor.candidate_name),
            ),
            description: Some(format!(
                "Generated from material guidance: {}",
                descriptor.source_fragment
            )),
            image_url: None,
            finish: descriptor.finish_hint.clone(),
            sheen: sheen_for_finish(&descriptor.finish_hint).map(str::to_string),
            base_color: None,
            is_abstract: true,
            generation_status: GenerationStatus::Completed,
            tags: tags_for(descriptor, FALLBACK_ORIGIN_TAG),
            organization_id: options.organization_id,
        };

        self.persist(texture, &category, descriptor, options).await
    }

    /// Category by descriptor slug, else any category; none at all is fatal
    async fn resolve_category(&self, descriptor: &MaterialDescriptor) -> PipelineResult<MaterialCategory> {
        if let Some(category) = self
            .catalog
            .find_category_by_slug(&descriptor.category_hint)
            .await?
        {
            return Ok(category);
        }

        match self.catalog.find_any_category().await? {
            Some(category) => {
                warn!(
                    candidate = %descriptor.candidate_name,
                    wanted = %descriptor.category_hint,
                    assigned = %category.slug,
                    "Category not in catalog, assigned arbitrary category; review needed"
                );
                Ok(category)
            }
            None => Err(PipelineError::NoCategories),
        }
    }

    async fn persist(
        &self,
        mut texture: NewTexture,
        category: &MaterialCategory,
        descriptor: &MaterialDescriptor,
        options: &TextureGenerationOptions,
    ) -> PipelineResult<Uuid> {
        if options.generate_images {
            let request =
                ImageRequest::texture(texture.name.clone(), descriptor.price_tier, texture.finish.clone());
            match self.images.generate_image(&request).await {
                Ok(url) => texture.image_url = url,
                Err(e) => warn!(
                    name = %texture.name.en,
                    error = %e,
                    "Image generation failed, storing texture without image"
                ),
            }
        }

        self.catalog.insert_texture(&texture, category.id).await?;
        self.cache.invalidate().await;

        info!(
            texture_id = %texture.id,
            name = %texture.name.en,
            category = %category.slug,
            has_image = texture.image_url.is_some(),
            "Created texture"
        );

        Ok(texture.id)
    }
}

fn tags_for(descriptor: &MaterialDescriptor, origin: &str) -> Vec<String> {
    let mut tags = descriptor.keywords.clone();
    tags.push(origin.to_string());
    tags
}
