//! Data models for the texture pipeline

pub mod descriptor;
pub mod generation_options;
pub mod texture;

pub use descriptor::{MaterialDescriptor, PriceTier};
pub use generation_options::{TextureGenerationOptions, DEFAULT_MAX_TEXTURES};
pub use texture::{
    BilingualName, CategoryProjection, GenerationStatus, MaterialCategory, NewTexture, Texture,
    TextureProjection,
};
