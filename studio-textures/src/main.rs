//! studio-textures - texture seeding CLI
//!
//! Runs the texture pipeline against the catalog database for one style
//! (`generate`), a JSON file of style jobs (`batch`), and provides the
//! `unlink` and `seed-categories` maintenance commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use studio_common::config::{self, StudioConfig};
use studio_textures::db::{self, categories, SqliteCatalog};
use studio_textures::models::{PriceTier, TextureGenerationOptions};
use studio_textures::services::{
    DisabledImageGenerator, DisabledSemanticMatcher, HttpImageGenerator, HttpSemanticMatcher,
    ImageGenerator, IntervalPacing, SemanticMatcher, StyleTextureJob, TexturePipeline,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Texture pipeline seeding tool
#[derive(Parser, Debug)]
#[clap(name = "studio-textures")]
#[clap(about = "Resolve material guidance into catalog textures")]
struct Args {
    /// Config file (default: $STUDIO_CONFIG, then the platform config dir)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database file (overrides config)
    #[clap(long, value_name = "FILE")]
    database: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve and link textures for one style
    Generate {
        #[clap(long)]
        style_id: Uuid,

        /// Free-text material guidance
        #[clap(long)]
        guidance: String,

        /// REGULAR or LUXURY
        #[clap(long, default_value = "REGULAR")]
        price_tier: PriceTier,

        #[clap(long)]
        organization_id: Option<Uuid>,

        /// Budget cap (default from config)
        #[clap(long)]
        max_textures: Option<usize>,

        /// Skip image generation
        #[clap(long)]
        no_images: bool,

        /// Style description passed to the semantic matcher
        #[clap(long)]
        style_context: Option<String>,
    },

    /// Process a JSON list of style jobs sequentially
    Batch {
        #[clap(long, value_name = "FILE")]
        input: PathBuf,

        /// Skip image generation for every job
        #[clap(long)]
        no_images: bool,
    },

    /// Remove a style/texture link and decrement usage
    Unlink {
        #[clap(long)]
        style_id: Uuid,

        #[clap(long)]
        texture_id: Uuid,
    },

    /// Insert the default material categories (idempotent)
    SeedCategories,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = config::load_config(args.config.as_deref())?;
    if let Some(database) = args.database {
        config.database_path = Some(database);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    let db_path = config::resolve_database_path(&config);
    info!("Database: {}", db_path.display());
    let pool = db::init_database_pool(&db_path).await?;

    match args.command {
        Command::Generate {
            style_id,
            guidance,
            price_tier,
            organization_id,
            max_textures,
            no_images,
            style_context,
        } => {
            let pipeline = build_pipeline(&config, pool, no_images)?;
            let options = TextureGenerationOptions {
                organization_id,
                max_textures: max_textures.unwrap_or(config.pipeline.max_textures_per_style),
                generate_images: config.pipeline.generate_images && !no_images,
                style_context,
            };

            let report = pipeline
                .generate_style_report(style_id, &guidance, price_tier, &options)
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Batch { input, no_images } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mut jobs: Vec<StyleTextureJob> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse jobs from {}", input.display()))?;
            if no_images || !config.pipeline.generate_images {
                for job in &mut jobs {
                    job.options.generate_images = false;
                }
            }

            info!("Processing {} style jobs", jobs.len());
            let pipeline = build_pipeline(&config, pool, no_images)?;
            let summaries = pipeline.generate_textures_for_styles(&jobs).await;

            let failed = summaries.iter().filter(|s| s.error.is_some()).count();
            if failed > 0 {
                warn!("{} of {} styles aborted", failed, summaries.len());
            }
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }

        Command::Unlink {
            style_id,
            texture_id,
        } => {
            let pipeline = build_pipeline(&config, pool, true)?;
            let removed = pipeline.unlink(style_id, texture_id).await?;
            println!("Removed {} link(s)", removed);
        }

        Command::SeedCategories => {
            let inserted = categories::seed_default_categories(&pool).await?;
            println!("Inserted {} categories", inserted);
        }
    }

    Ok(())
}

fn build_pipeline(config: &StudioConfig, pool: SqlitePool, no_images: bool) -> Result<TexturePipeline> {
    let matcher: Arc<dyn SemanticMatcher> = match config::resolve_ai_api_key(config) {
        Ok(api_key) => Arc::new(HttpSemanticMatcher::new(
            config.ai.base_url.clone(),
            config.ai.model.clone(),
            api_key,
            Duration::from_secs(config.ai.timeout_secs),
            config.ai.requests_per_minute,
        )?),
        Err(e) => {
            warn!("Semantic matching disabled: {}", e);
            Arc::new(DisabledSemanticMatcher)
        }
    };

    let images: Arc<dyn ImageGenerator> = match &config.image.endpoint {
        Some(endpoint) if !no_images && config.pipeline.generate_images => Arc::new(
            HttpImageGenerator::new(endpoint.clone(), Duration::from_secs(config.image.timeout_secs))?,
        ),
        _ => Arc::new(DisabledImageGenerator),
    };

    Ok(TexturePipeline::builder(Arc::new(SqliteCatalog::new(pool)), matcher)
        .image_generator(images)
        .pacing(Arc::new(IntervalPacing::from_millis(config.pipeline.pacing_interval_ms)))
        .context_ttl(Duration::from_secs(config.pipeline.context_ttl_secs))
        .context_texture_limit(config.pipeline.context_texture_limit)
        .build())
}
