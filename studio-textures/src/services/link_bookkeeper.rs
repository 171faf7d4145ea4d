//! Link & Usage Bookkeeper
//!
//! Style↔texture links and the texture usage counter move together: a fresh
//! link adds one use, an unlink removes one (never below zero). Relinking an
//! existing pair changes nothing.

use crate::db::CatalogStore;
use crate::error::PipelineResult;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    Created,
    AlreadyLinked,
}

pub struct LinkBookkeeper {
    catalog: Arc<dyn CatalogStore>,
}

impl LinkBookkeeper {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    /// Link a style to a texture; idempotent
    pub async fn link_style_to_texture(&self, style_id: Uuid, texture_id: Uuid) -> PipelineResult<LinkOutcome> {
        if self.catalog.link_style_texture(style_id, texture_id).await? {
            debug!(style_id = %style_id, texture_id = %texture_id, "Linked style to texture");
            Ok(LinkOutcome::Created)
        } else {
            debug!(style_id = %style_id, texture_id = %texture_id, "Style already linked to texture");
            Ok(LinkOutcome::AlreadyLinked)
        }
    }

    /// Remove a style↔texture link; returns rows removed
    pub async fn unlink(&self, style_id: Uuid, texture_id: Uuid) -> PipelineResult<u64> {
        let removed = self.catalog.unlink_style_texture(style_id, texture_id).await?;
        info!(
            style_id = %style_id,
            texture_id = %texture_id,
            removed = removed,
            "Unlinked style from texture"
        );
        Ok(removed)
    }
}
