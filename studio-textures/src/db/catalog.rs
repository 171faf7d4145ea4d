//! Catalog store seams
//!
//! The pipeline talks to the catalog through these traits; `SqliteCatalog`
//! is the production implementation over the functions in this module's
//! siblings.

use crate::db::{categories, style_links, textures};
use crate::error::PipelineResult;
use crate::models::{CategoryProjection, MaterialCategory, NewTexture, Texture, TextureProjection};
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Bulk projection reads backing the match context cache
#[async_trait]
pub trait ContextSource: Send + Sync {
    /// Most relevant texture projections visible to the organization, capped at `limit`
    async fn load_texture_projections(
        &self,
        organization_id: Option<Uuid>,
        limit: usize,
    ) -> PipelineResult<Vec<TextureProjection>>;

    async fn load_category_projections(&self) -> PipelineResult<Vec<CategoryProjection>>;
}

/// Read/write catalog operations used by the resolver, synthesizer and bookkeeper
#[async_trait]
pub trait CatalogStore: ContextSource {
    /// Texture whose English or Hebrew name equals `name` exactly
    async fn find_texture_by_exact_name(
        &self,
        name: &str,
        organization_id: Option<Uuid>,
    ) -> PipelineResult<Option<Texture>>;

    async fn get_texture(&self, id: Uuid) -> PipelineResult<Option<Texture>>;

    async fn find_category_by_id(&self, id: Uuid) -> PipelineResult<Option<MaterialCategory>>;

    async fn find_category_by_slug(&self, slug: &str) -> PipelineResult<Option<MaterialCategory>>;

    async fn find_any_category(&self) -> PipelineResult<Option<MaterialCategory>>;

    /// Persist a texture and its category link as one unit
    async fn insert_texture(&self, texture: &NewTexture, category_id: Uuid) -> PipelineResult<()>;

    /// Returns true when a new link was created
    async fn link_style_texture(&self, style_id: Uuid, texture_id: Uuid) -> PipelineResult<bool>;

    /// Returns the number of link rows removed
    async fn unlink_style_texture(&self, style_id: Uuid, texture_id: Uuid) -> PipelineResult<u64>;
}

/// SQLite-backed catalog
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ContextSource for SqliteCatalog {
    async fn load_texture_projections(
        &self,
        organization_id: Option<Uuid>,
        limit: usize,
    ) -> PipelineResult<Vec<TextureProjection>> {
        textures::load_texture_projections(&self.pool, organization_id, limit).await
    }

    async fn load_category_projections(&self) -> PipelineResult<Vec<CategoryProjection>> {
        categories::load_category_projections(&self.pool).await
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn find_texture_by_exact_name(
        &self,
        name: &str,
        organization_id: Option<Uuid>,
    ) -> PipelineResult<Option<Texture>> {
        textures::find_texture_by_exact_name(&self.pool, name, organization_id).await
    }

    async fn get_texture(&self, id: Uuid) -> PipelineResult<Option<Texture>> {
        textures::load_texture(&self.pool, id).await
    }

    async fn find_category_by_id(&self, id: Uuid) -> PipelineResult<Option<MaterialCategory>> {
        categories::find_category_by_id(&self.pool, id).await
    }

    async fn find_category_by_slug(&self, slug: &str) -> PipelineResult<Option<MaterialCategory>> {
        categories::find_category_by_slug(&self.pool, slug).await
    }

    async fn find_any_category(&self) -> PipelineResult<Option<MaterialCategory>> {
        categories::find_any_category(&self.pool).await
    }

    async fn insert_texture(&self, texture: &NewTexture, category_id: Uuid) -> PipelineResult<()> {
        textures::insert_texture_with_category(&self.pool, texture, category_id).await
    }

    async fn link_style_texture(&self, style_id: Uuid, texture_id: Uuid) -> PipelineResult<bool> {
        style_links::link_style_to_texture(&self.pool, style_id, texture_id).await
    }

    async fn unlink_style_texture(&self, style_id: Uuid, texture_id: Uuid) -> PipelineResult<u64> {
        style_links::unlink_style_from_texture(&self.pool, style_id, texture_id).await
    }
}
