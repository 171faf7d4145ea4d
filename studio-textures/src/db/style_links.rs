//! Style ↔ texture link operations and usage counters

use crate::error::{PipelineError, PipelineResult};
use chrono::Utc;
use sqlx::SqlitePool;
use studio_common::uuid_utils;
use uuid::Uuid;

/// Link a style to a texture if not already linked
///
/// Insert and usage increment share one transaction; an existing link makes
/// this a no-op. Returns true when a new link was created.
pub async fn link_style_to_texture(
    pool: &SqlitePool,
    style_id: Uuid,
    texture_id: Uuid,
) -> PipelineResult<bool> {
    let mut tx = pool.begin().await?;

    let existing: Option<String> = sqlx::query_scalar(
        "SELECT id FROM style_textures WHERE style_id = ? AND texture_id = ? LIMIT 1",
    )
    .bind(style_id.to_string())
    .bind(texture_id.to_string())
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_some() {
        return Ok(false);
    }

    let now = Utc::now();
    let inserted = sqlx::query(
        r#"
        INSERT INTO style_textures (id, style_id, texture_id, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(style_id, texture_id) DO NOTHING
        "#,
    )
    .bind(uuid_utils::generate().to_string())
    .bind(style_id.to_string())
    .bind(texture_id.to_string())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if inserted.rows_affected() == 0 {
        return Ok(false);
    }

    let updated = sqlx::query(
        "UPDATE textures SET usage_count = usage_count + 1, updated_at = ? WHERE id = ?",
    )
    .bind(now)
    .bind(texture_id.to_string())
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        // dropping tx rolls back the link insert
        return Err(PipelineError::NotFound(format!("texture {}", texture_id)));
    }

    tx.commit().await?;
    Ok(true)
}

/// Remove every link for the pair and decrement usage once (clamped at zero)
///
/// Returns the number of link rows removed; usage is untouched when 0.
pub async fn unlink_style_from_texture(
    pool: &SqlitePool,
    style_id: Uuid,
    texture_id: Uuid,
) -> PipelineResult<u64> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM style_textures WHERE style_id = ? AND texture_id = ?")
        .bind(style_id.to_string())
        .bind(texture_id.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed > 0 {
        sqlx::query(
            "UPDATE textures SET usage_count = MAX(usage_count - 1, 0), updated_at = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(texture_id.to_string())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(removed)
}

/// Texture ids linked to a style, oldest link first
pub async fn load_style_texture_ids(pool: &SqlitePool, style_id: Uuid) -> PipelineResult<Vec<Uuid>> {
    let ids: Vec<String> = sqlx::query_scalar(
        "SELECT texture_id FROM style_textures WHERE style_id = ? ORDER BY created_at, id",
    )
    .bind(style_id.to_string())
    .fetch_all(pool)
    .await?;

    ids.iter()
        .map(|id| uuid_utils::parse_column("style_textures.texture_id", id).map_err(Into::into))
        .collect()
}
