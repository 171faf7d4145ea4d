//! In-memory catalog fixtures

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use studio_textures::db::{categories, init_tables, textures, SqliteCatalog};
use studio_textures::models::{BilingualName, GenerationStatus, NewTexture};
use uuid::Uuid;

/// Fresh in-memory catalog, optionally seeded with the default categories
///
/// Single connection so every query sees the same in-memory database.
pub async fn memory_catalog(seed_categories: bool) -> Arc<SqliteCatalog> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init_tables(&pool).await.unwrap();

    if seed_categories {
        categories::seed_default_categories(&pool).await.unwrap();
    }

    Arc::new(SqliteCatalog::new(pool))
}

/// Insert a curated texture in the given category; returns its id
pub async fn insert_texture(
    pool: &SqlitePool,
    name_en: &str,
    name_he: &str,
    category_slug: &str,
    organization_id: Option<Uuid>,
) -> Uuid {
    let category = categories::find_category_by_slug(pool, category_slug)
        .await
        .unwrap()
        .expect("category seeded");

    let texture = NewTexture {
        id: Uuid::new_v4(),
        name: BilingualName::new(name_en, name_he),
        description: None,
        finish: "natural".to_string(),
        sheen: None,
        base_color: None,
        is_abstract: false,
        generation_status: GenerationStatus::Completed,
        image_url: None,
        tags: vec![],
        organization_id,
    };
    textures::insert_texture_with_category(pool, &texture, category.id)
        .await
        .unwrap();
    texture.id
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn usage_count(pool: &SqlitePool, texture_id: Uuid) -> i64 {
    textures::load_texture(pool, texture_id)
        .await
        .unwrap()
        .expect("texture exists")
        .usage_count
}
