use log::info;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::ActionError,
    schema::{Id, Tag},
};

pub async fn create_tag(
    name: &str,
    color: &str,
    slug: &str,
    pool: &Pool<Sqlite>,
) -> Result<Tag, ActionError> {
    Tag::validate_new(name, color, slug)?;

    let row: Option<Tag> = sqlx::query_as(
        "INSERT INTO tags (name, color, slug) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING RETURNING *",
    )
    .bind(name)
    .bind(color)
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            info!("Created tag {} ({})", row.id, row.slug);
            Ok(row)
        }
        None => Err(ActionError::conflict(format!("Tag {slug} already exists"))),
    }
}

pub async fn get_tag(id: Id, pool: &Pool<Sqlite>) -> Result<Option<Tag>, ActionError> {
    let tag: Option<Tag> = sqlx::query_as("SELECT * FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

pub async fn find_tag(slug: &str, pool: &Pool<Sqlite>) -> Result<Option<Tag>, ActionError> {
    let tag: Option<Tag> = sqlx::query_as("SELECT * FROM tags WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

pub async fn list_tags(pool: &Pool<Sqlite>) -> Result<Vec<Tag>, ActionError> {
    let list: Vec<Tag> = sqlx::query_as("SELECT * FROM tags ORDER BY name, id")
        .fetch_all(pool)
        .await?;

    Ok(list)
}

pub async fn list_recipe_tags(recipe_id: Id, pool: &Pool<Sqlite>) -> Result<Vec<Tag>, ActionError> {
    let list: Vec<Tag> = sqlx::query_as(
        "
        SELECT t.*
        FROM recipe_tags rt
        INNER JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = $1
        ORDER BY t.name, t.id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(list)
}

pub(crate) async fn first_missing_tag(
    ids: &[Id],
    conn: &mut SqliteConnection,
) -> Result<Option<Id>, ActionError> {
    for id in ids {
        let row: Option<(Id,)> = sqlx::query_as("SELECT id FROM tags WHERE id = $1")
            .bind(*id)
            .fetch_optional(&mut *conn)
            .await?;

        if row.is_none() {
            return Ok(Some(*id));
        }
    }

    Ok(None)
}
