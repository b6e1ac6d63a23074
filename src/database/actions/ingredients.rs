use log::info;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::ActionError,
    filter::IngredientFilter,
    schema::{Id, Ingredient},
};

pub async fn list_ingredients(
    filter: &IngredientFilter,
    pool: &Pool<Sqlite>,
) -> Result<Vec<Ingredient>, ActionError> {
    let rows: Vec<Ingredient> = match &filter.name {
        // substr keeps the match case-sensitive, LIKE would not be.
        Some(prefix) => {
            sqlx::query_as(
                "SELECT * FROM ingredients WHERE substr(name, 1, length($1)) = $1 ORDER BY name, id",
            )
            .bind(prefix)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM ingredients ORDER BY name, id")
                .fetch_all(pool)
                .await?
        }
    };

    Ok(rows)
}

pub async fn get_ingredient(id: Id, pool: &Pool<Sqlite>) -> Result<Option<Ingredient>, ActionError> {
    let row: Option<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn find_ingredient(
    name: &str,
    measurement_unit: &str,
    pool: &Pool<Sqlite>,
) -> Result<Option<Ingredient>, ActionError> {
    let row: Option<Ingredient> =
        sqlx::query_as("SELECT * FROM ingredients WHERE name = $1 AND measurement_unit = $2")
            .bind(name)
            .bind(measurement_unit)
            .fetch_optional(pool)
            .await?;

    Ok(row)
}

/// Seeds a catalog entry. Entries are never edited afterwards.
pub async fn create_ingredient(
    name: &str,
    measurement_unit: &str,
    pool: &Pool<Sqlite>,
) -> Result<Ingredient, ActionError> {
    Ingredient::validate_new(name, measurement_unit)?;

    let row: Option<Ingredient> = sqlx::query_as(
        "
        INSERT INTO ingredients (name, measurement_unit)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING RETURNING *
    ",
    )
    .bind(name)
    .bind(measurement_unit)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            info!("Created ingredient {} ({}, {})", row.id, row.name, row.measurement_unit);
            Ok(row)
        }
        None => Err(ActionError::conflict(format!(
            "Ingredient {name} ({measurement_unit}) already exists"
        ))),
    }
}

/// Returns the first id in `ids` that has no catalog entry.
pub(crate) async fn first_missing_ingredient(
    ids: &[Id],
    conn: &mut SqliteConnection,
) -> Result<Option<Id>, ActionError> {
    for id in ids {
        let row: Option<(Id,)> = sqlx::query_as("SELECT id FROM ingredients WHERE id = $1")
            .bind(*id)
            .fetch_optional(&mut *conn)
            .await?;

        if row.is_none() {
            return Ok(Some(*id));
        }
    }

    Ok(None)
}
