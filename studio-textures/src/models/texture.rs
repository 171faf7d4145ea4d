//! Texture catalog records and lightweight projections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Display name in both supported languages (English, Hebrew)
///
/// Neither side may be empty once a texture is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualName {
    pub en: String,
    pub he: String,
}

impl BilingualName {
    pub fn new(en: impl Into<String>, he: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            he: he.into(),
        }
    }

    /// Both sides present after trimming
    pub fn is_complete(&self) -> bool {
        !self.en.trim().is_empty() && !self.he.trim().is_empty()
    }

    /// Exact (as stored) match against either language
    pub fn matches_exact(&self, name: &str) -> bool {
        self.en == name || self.he == name
    }
}

/// Generation status marker for textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GenerationStatus {
    Pending,
    Completed,
    Failed,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Pending => "PENDING",
            GenerationStatus::Completed => "COMPLETED",
            GenerationStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(GenerationStatus::Pending),
            "COMPLETED" => Ok(GenerationStatus::Completed),
            "FAILED" => Ok(GenerationStatus::Failed),
            other => Err(format!("Unknown generation status: {}", other)),
        }
    }
}

/// Durable texture record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    pub id: Uuid,
    pub name: BilingualName,
    pub description: Option<String>,
    pub finish: String,
    pub sheen: Option<String>,
    pub base_color: Option<String>,
    /// True when synthesized by the pipeline rather than curated
    pub is_abstract: bool,
    pub generation_status: GenerationStatus,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub usage_count: i64,
    /// `None` = shared/global texture
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a synthesized texture
#[derive(Debug, Clone, PartialEq)]
pub struct NewTexture {
    pub id: Uuid,
    pub name: BilingualName,
    pub description: Option<String>,
    pub finish: String,
    pub sheen: Option<String>,
    pub base_color: Option<String>,
    pub is_abstract: bool,
    pub generation_status: GenerationStatus,
    pub image_url: Option<String>,
    pub tags: Vec<String>,
    pub organization_id: Option<Uuid>,
}

/// Material category record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCategory {
    pub id: Uuid,
    pub name: BilingualName,
    pub slug: String,
}

/// Texture fields the matcher needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureProjection {
    pub id: Uuid,
    pub name: BilingualName,
    pub finish: String,
    pub sheen: Option<String>,
    pub category_slug: Option<String>,
    pub category_name: Option<String>,
}

/// Category fields the matcher needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProjection {
    pub id: Uuid,
    pub name: BilingualName,
    pub slug: String,
}

impl From<MaterialCategory> for CategoryProjection {
    fn from(category: MaterialCategory) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
        }
    }
}
