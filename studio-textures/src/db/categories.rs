//! Material category database operations

use crate::error::PipelineResult;
use crate::models::{BilingualName, CategoryProjection, MaterialCategory};
use crate::services::keyword_tables::DEFAULT_CATEGORIES;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use studio_common::uuid_utils;
use uuid::Uuid;

fn category_from_row(row: &SqliteRow) -> PipelineResult<MaterialCategory> {
    let id: String = row.try_get("id")?;
    Ok(MaterialCategory {
        id: uuid_utils::parse_column("material_categories.id", &id)?,
        name: BilingualName::new(
            row.try_get::<String, _>("name_en")?,
            row.try_get::<String, _>("name_he")?,
        ),
        slug: row.try_get("slug")?,
    })
}

/// Insert a category; an existing slug is left untouched
///
/// Returns true when a row was inserted.
pub async fn insert_category(pool: &SqlitePool, category: &MaterialCategory) -> PipelineResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO material_categories (id, name_en, name_he, slug, created_at)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(slug) DO NOTHING
        "#,
    )
    .bind(category.id.to_string())
    .bind(&category.name.en)
    .bind(&category.name.he)
    .bind(&category.slug)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Seed the categories the descriptor parser can infer
///
/// Returns the number of categories inserted (0 when already seeded).
pub async fn seed_default_categories(pool: &SqlitePool) -> PipelineResult<usize> {
    let mut inserted = 0;
    for (slug, name_en, name_he) in DEFAULT_CATEGORIES {
        let category = MaterialCategory {
            id: uuid_utils::generate(),
            name: BilingualName::new(*name_en, *name_he),
            slug: (*slug).to_string(),
        };
        if insert_category(pool, &category).await? {
            inserted += 1;
        }
    }

    tracing::info!(inserted, "Default material categories seeded");
    Ok(inserted)
}

pub async fn find_category_by_id(pool: &SqlitePool, id: Uuid) -> PipelineResult<Option<MaterialCategory>> {
    let row = sqlx::query("SELECT id, name_en, name_he, slug FROM material_categories WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(category_from_row).transpose()
}

pub async fn find_category_by_slug(
    pool: &SqlitePool,
    slug: &str,
) -> PipelineResult<Option<MaterialCategory>> {
    let row = sqlx::query("SELECT id, name_en, name_he, slug FROM material_categories WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(category_from_row).transpose()
}

/// Any existing category (oldest first), used when slug inference misses
pub async fn find_any_category(pool: &SqlitePool) -> PipelineResult<Option<MaterialCategory>> {
    let row = sqlx::query(
        "SELECT id, name_en, name_he, slug FROM material_categories ORDER BY created_at, slug LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(category_from_row).transpose()
}

pub async fn load_category_projections(pool: &SqlitePool) -> PipelineResult<Vec<CategoryProjection>> {
    let rows = sqlx::query("SELECT id, name_en, name_he, slug FROM material_categories ORDER BY slug")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| category_from_row(row).map(CategoryProjection::from))
        .collect()
}
