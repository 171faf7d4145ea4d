//! studio-textures library interface
//!
//! Texture/material resolution and generation pipeline: turns free-text
//! material guidance for a design style into linked catalog textures,
//! reusing existing textures where possible and synthesizing new ones
//! otherwise.

pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{PipelineError, PipelineResult};
pub use crate::services::{StyleBatchSummary, StyleTextureJob, StyleTextureReport, TexturePipeline};
