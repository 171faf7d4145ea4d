//! Texture database operations

use crate::error::{PipelineError, PipelineResult};
use crate::models::{BilingualName, GenerationStatus, NewTexture, Texture, TextureProjection};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use studio_common::uuid_utils;
use uuid::Uuid;

const TEXTURE_COLUMNS: &str = r#"
    id, name_en, name_he, description, finish, sheen, base_color, is_abstract,
    generation_status, image_url, tags, usage_count, organization_id, created_at, updated_at
"#;

fn texture_from_row(row: &SqliteRow) -> PipelineResult<Texture> {
    let id: String = row.try_get("id")?;
    let organization_id: Option<String> = row.try_get("organization_id")?;
    let status: String = row.try_get("generation_status")?;
    let tags: String = row.try_get("tags")?;

    Ok(Texture {
        id: uuid_utils::parse_column("textures.id", &id)?,
        name: BilingualName::new(
            row.try_get::<String, _>("name_en")?,
            row.try_get::<String, _>("name_he")?,
        ),
        description: row.try_get("description")?,
        finish: row.try_get("finish")?,
        sheen: row.try_get("sheen")?,
        base_color: row.try_get("base_color")?,
        is_abstract: row.try_get("is_abstract")?,
        generation_status: status.parse().map_err(PipelineError::InvalidInput)?,
        image_url: row.try_get("image_url")?,
        tags: serde_json::from_str(&tags)?,
        usage_count: row.try_get("usage_count")?,
        organization_id: uuid_utils::parse_optional_column(
            "textures.organization_id",
            organization_id.as_deref(),
        )?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

/// Insert a texture together with its single category link
///
/// Both rows are written in one transaction so a texture never exists
/// without a category.
pub async fn insert_texture_with_category(
    pool: &SqlitePool,
    texture: &NewTexture,
    category_id: Uuid,
) -> PipelineResult<()> {
    if !texture.name.is_complete() {
        return Err(PipelineError::InvalidInput(format!(
            "Texture name must be set in both languages (en: {:?}, he: {:?})",
            texture.name.en, texture.name.he
        )));
    }

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO textures (
            id, name_en, name_he, description, finish, sheen, base_color, is_abstract,
            generation_status, image_url, tags, usage_count, organization_id, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
        "#,
    )
    .bind(texture.id.to_string())
    .bind(&texture.name.en)
    .bind(&texture.name.he)
    .bind(&texture.description)
    .bind(&texture.finish)
    .bind(&texture.sheen)
    .bind(&texture.base_color)
    .bind(texture.is_abstract)
    .bind(texture.generation_status.as_str())
    .bind(&texture.image_url)
    .bind(serde_json::to_string(&texture.tags)?)
    .bind(texture.organization_id.map(|id| id.to_string()))
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO texture_categories (texture_id, category_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(texture.id.to_string())
    .bind(category_id.to_string())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}

/// Load texture by id
pub async fn load_texture(pool: &SqlitePool, id: Uuid) -> PipelineResult<Option<Texture>> {
    let row = sqlx::query(&format!("SELECT {} FROM textures WHERE id = ?", TEXTURE_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(texture_from_row).transpose()
}

/// Find a texture whose English or Hebrew name equals `name` exactly
///
/// Only textures visible to the organization are considered (global ones
/// plus the organization's own). The most used match wins.
pub async fn find_texture_by_exact_name(
    pool: &SqlitePool,
    name: &str,
    organization_id: Option<Uuid>,
) -> PipelineResult<Option<Texture>> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {}
        FROM textures
        WHERE (name_en = ? OR name_he = ?)
          AND (organization_id IS NULL OR organization_id = ?)
        ORDER BY usage_count DESC, created_at ASC
        LIMIT 1
        "#,
        TEXTURE_COLUMNS
    ))
    .bind(name)
    .bind(name)
    .bind(organization_id.map(|id| id.to_string()))
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(texture_from_row).transpose()
}

/// Load the `limit` most used (then most recent) texture projections
pub async fn load_texture_projections(
    pool: &SqlitePool,
    organization_id: Option<Uuid>,
    limit: usize,
) -> PipelineResult<Vec<TextureProjection>> {
    let rows = sqlx::query(
        r#"
        SELECT t.id, t.name_en, t.name_he, t.finish, t.sheen,
               (SELECT c.slug FROM texture_categories tc
                  JOIN material_categories c ON c.id = tc.category_id
                 WHERE tc.texture_id = t.id
                 ORDER BY tc.created_at LIMIT 1) AS category_slug,
               (SELECT c.name_en FROM texture_categories tc
                  JOIN material_categories c ON c.id = tc.category_id
                 WHERE tc.texture_id = t.id
                 ORDER BY tc.created_at LIMIT 1) AS category_name
        FROM textures t
        WHERE t.organization_id IS NULL OR t.organization_id = ?
        ORDER BY t.usage_count DESC, t.created_at DESC
        LIMIT ?
        "#,
    )
    .bind(organization_id.map(|id| id.to_string()))
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let id: String = row.try_get("id")?;
            Ok(TextureProjection {
                id: uuid_utils::parse_column("textures.id", &id)?,
                name: BilingualName::new(
                    row.try_get::<String, _>("name_en")?,
                    row.try_get::<String, _>("name_he")?,
                ),
                finish: row.try_get("finish")?,
                sheen: row.try_get("sheen")?,
                category_slug: row.try_get("category_slug")?,
                category_name: row.try_get("category_name")?,
            })
        })
        .collect()
}

/// Category ids linked to a texture
pub async fn load_texture_category_ids(pool: &SqlitePool, texture_id: Uuid) -> PipelineResult<Vec<Uuid>> {
    let ids: Vec<String> =
        sqlx::query_scalar("SELECT category_id FROM texture_categories WHERE texture_id = ?")
            .bind(texture_id.to_string())
            .fetch_all(pool)
            .await?;

    ids.iter()
        .map(|id| uuid_utils::parse_column("texture_categories.category_id", id).map_err(Into::into))
        .collect()
}
