//! Per-run options for texture generation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default maximum textures linked to a single style
pub const DEFAULT_MAX_TEXTURES: usize = 5;

/// Options for one `generate_textures_for_style` run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureGenerationOptions {
    /// Owning organization for created textures; `None` = global
    pub organization_id: Option<Uuid>,
    /// Budget cap: descriptors past this count are ignored
    pub max_textures: usize,
    pub generate_images: bool,
    /// Free-text style description passed to the semantic matcher
    pub style_context: Option<String>,
}

impl Default for TextureGenerationOptions {
    fn default() -> Self {
        Self {
            organization_id: None,
            max_textures: DEFAULT_MAX_TEXTURES,
            generate_images: true,
            style_context: None,
        }
    }
}
