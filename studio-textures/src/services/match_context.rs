//! Match Context Cache
//!
//! Holds a time-bounded snapshot of texture and category projections so a
//! batch run doesn't re-read the catalog for every descriptor.
//!
//! - Valid while `now - captured_at < ttl`
//! - Organization scope is part of the key: a different scope is a miss
//! - `invalidate()` must be called after every texture creation
//! - Read failures propagate; an empty context would produce false "no match" results

use crate::db::ContextSource;
use crate::error::PipelineResult;
use crate::models::{CategoryProjection, TextureProjection};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use studio_common::Clock;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_CONTEXT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CONTEXT_TEXTURE_LIMIT: usize = 200;

/// Cached catalog projections
#[derive(Debug, Clone)]
pub struct MatchContextSnapshot {
    pub textures: Vec<TextureProjection>,
    pub categories: Vec<CategoryProjection>,
    pub organization_id: Option<Uuid>,
    pub captured_at: DateTime<Utc>,
}

impl MatchContextSnapshot {
    pub fn contains_texture(&self, id: Uuid) -> bool {
        self.textures.iter().any(|t| t.id == id)
    }
}

/// TTL cache over a `ContextSource`
pub struct MatchContextCache {
    source: Arc<dyn ContextSource>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    texture_limit: usize,
    snapshot: Mutex<Option<Arc<MatchContextSnapshot>>>,
}

impl MatchContextCache {
    pub fn new(source: Arc<dyn ContextSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            ttl: to_chrono(DEFAULT_CONTEXT_TTL),
            texture_limit: DEFAULT_CONTEXT_TEXTURE_LIMIT,
            snapshot: Mutex::new(None),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = to_chrono(ttl);
        self
    }

    pub fn with_texture_limit(mut self, limit: usize) -> Self {
        self.texture_limit = limit;
        self
    }

    /// Current snapshot for the organization scope, reloading on miss or expiry
    pub async fn get_context(
        &self,
        organization_id: Option<Uuid>,
    ) -> PipelineResult<Arc<MatchContextSnapshot>> {
        let mut guard = self.snapshot.lock().await;
        let now = self.clock.now();

        if let Some(snapshot) = guard.as_ref() {
            if snapshot.organization_id == organization_id && now - snapshot.captured_at < self.ttl {
                return Ok(Arc::clone(snapshot));
            }
        }

        let textures = self
            .source
            .load_texture_projections(organization_id, self.texture_limit)
            .await?;
        let categories = self.source.load_category_projections().await?;

        debug!(
            textures = textures.len(),
            categories = categories.len(),
            organization_id = ?organization_id,
            "Match context loaded"
        );

        let snapshot = Arc::new(MatchContextSnapshot {
            textures,
            categories,
            organization_id,
            captured_at: now,
        });
        *guard = Some(Arc::clone(&snapshot));

        Ok(snapshot)
    }

    /// Drop the snapshot so the next `get_context` reads the catalog
    pub async fn invalidate(&self) {
        let mut guard = self.snapshot.lock().await;
        if guard.take().is_some() {
            debug!("Match context invalidated");
        }
    }

    /// Whether a snapshot is currently held (expired or not)
    pub async fn is_populated(&self) -> bool {
        self.snapshot.lock().await.is_some()
    }
}

fn to_chrono(ttl: Duration) -> chrono::Duration {
    chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365))
}
