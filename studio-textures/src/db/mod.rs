//! Database access for studio-textures
//!
//! SQLite catalog: material categories, textures, and their link tables.

pub mod catalog;
pub mod categories;
pub mod style_links;
pub mod textures;

pub use catalog::{CatalogStore, ContextSource, SqliteCatalog};

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the parent directory and the catalog tables if missing.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create catalog tables and indexes if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS material_categories (
            id TEXT PRIMARY KEY,
            name_en TEXT NOT NULL,
            name_he TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS textures (
            id TEXT PRIMARY KEY,
            name_en TEXT NOT NULL CHECK (length(trim(name_en)) > 0),
            name_he TEXT NOT NULL CHECK (length(trim(name_he)) > 0),
            description TEXT,
            finish TEXT NOT NULL,
            sheen TEXT,
            base_color TEXT,
            is_abstract INTEGER NOT NULL DEFAULT 0,
            generation_status TEXT NOT NULL DEFAULT 'COMPLETED',
            image_url TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            usage_count INTEGER NOT NULL DEFAULT 0 CHECK (usage_count >= 0),
            organization_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_textures_name_en ON textures(name_en)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_textures_name_he ON textures(name_he)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS texture_categories (
            texture_id TEXT NOT NULL REFERENCES textures(id) ON DELETE CASCADE,
            category_id TEXT NOT NULL REFERENCES material_categories(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            PRIMARY KEY (texture_id, category_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS style_textures (
            id TEXT PRIMARY KEY,
            style_id TEXT NOT NULL,
            texture_id TEXT NOT NULL REFERENCES textures(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL,
            UNIQUE (style_id, texture_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!(
        "Database tables initialized (material_categories, textures, texture_categories, style_textures)"
    );

    Ok(())
}
