use chrono::Utc;
use log::{debug, info};
use sqlx::{Pool, QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    authentication::permissions::{ActionType, Viewer},
    constants::BIND_LIMIT,
    error::{ActionError, QueryError},
    filter::RecipeFilter,
    schema::{Id, IngredientAmount, Recipe, RecipeIngredient, RecipeWrite, ValidatedRecipe},
    views::{RecipeIntent, RecipeReduced, RecipeRepresentation, RecipeView},
};

use super::{
    find_tag, first_missing_ingredient, first_missing_tag, get_user_view, is_favorited,
    is_in_shopping_cart, list_recipe_tags,
};

pub async fn get_recipe(id: Id, pool: &Pool<Sqlite>) -> Result<Option<Recipe>, ActionError> {
    let row: Option<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Loads a recipe for modification. Only its author gets it back.
pub async fn get_recipe_mut(
    id: Id,
    viewer: &Viewer,
    pool: &Pool<Sqlite>,
) -> Result<Recipe, ActionError> {
    let recipe = get_recipe(id, pool).await?;
    viewer.authenticate(ActionType::ManageOwnRecipes)?;

    match recipe {
        Some(recipe) => {
            if viewer.is_author(recipe.author_id) {
                Ok(recipe)
            } else {
                Err(ActionError::Forbidden(String::from(
                    "Only the author may change this recipe",
                )))
            }
        }
        None => Err(ActionError::not_found("No recipe exists with specified id")),
    }
}

pub async fn list_recipe_parts(
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<Vec<RecipeIngredient>, ActionError> {
    let rows: Vec<RecipeIngredient> = sqlx::query_as(
        "
        SELECT i.id AS id, i.name AS name, i.measurement_unit AS measurement_unit, ri.amount AS amount
        FROM recipe_ingredients ri
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = $1
        ORDER BY ri.id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Publishes a recipe as the acting user, together with its ingredient
/// amounts and tags. Nothing is stored unless everything is.
pub async fn create_recipe(
    viewer: &Viewer,
    write: RecipeWrite,
    pool: &Pool<Sqlite>,
) -> Result<Recipe, ActionError> {
    let author_id = viewer.authenticate(ActionType::CreateRecipes)?;
    let recipe = write.validate()?;

    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    check_references(&recipe, &mut *tr).await?;

    let row: Recipe = sqlx::query_as(
        "
        INSERT INTO recipes (author_id, name, image, text, cooking_time, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
    ",
    )
    .bind(author_id)
    .bind(&recipe.fields.name)
    .bind(&recipe.fields.image)
    .bind(&recipe.fields.text)
    .bind(recipe.fields.cooking_time)
    .bind(Utc::now())
    .fetch_one(&mut *tr)
    .await?;

    insert_recipe_parts(row.id, &recipe.ingredients, &mut *tr).await?;
    insert_recipe_tags(row.id, &recipe.tags, &mut *tr).await?;

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    info!(
        "Created recipe {} by user {} with {} ingredients",
        row.id,
        author_id,
        recipe.ingredients.len()
    );
    Ok(row)
}

/// Replaces the fields, tag set and ingredient amounts of a recipe.
///
/// ATTENTION: DOES NOT CHECK FOR AUTHORSHIP BY ITSELF, get the recipe through
/// [`get_recipe_mut`] first. Ingredient rows are dropped and rebuilt, never
/// diffed.
pub async fn update_recipe(
    recipe: &Recipe,
    write: RecipeWrite,
    pool: &Pool<Sqlite>,
) -> Result<Recipe, ActionError> {
    let next = write.validate()?;

    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    check_references(&next, &mut *tr).await?;

    let row: Option<Recipe> = sqlx::query_as(
        "
        UPDATE recipes SET name = $1, image = $2, text = $3, cooking_time = $4
        WHERE id = $5
        RETURNING *
    ",
    )
    .bind(&next.fields.name)
    .bind(&next.fields.image)
    .bind(&next.fields.text)
    .bind(next.fields.cooking_time)
    .bind(recipe.id)
    .fetch_optional(&mut *tr)
    .await?;

    let row = row.ok_or_else(|| ActionError::not_found("No recipe exists with specified id"))?;

    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(row.id)
        .execute(&mut *tr)
        .await?;
    insert_recipe_tags(row.id, &next.tags, &mut *tr).await?;

    let cleared = sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(row.id)
        .execute(&mut *tr)
        .await?;
    debug!(
        "Rebuilding recipe {}: {} ingredient rows out, {} in",
        row.id,
        cleared.rows_affected(),
        next.ingredients.len()
    );
    insert_recipe_parts(row.id, &next.ingredients, &mut *tr).await?;

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    info!("Updated recipe {}", row.id);
    Ok(row)
}

/// Deletes a recipe with everything that hangs off it.
/// ATTENTION: DOES NOT CHECK FOR AUTHORSHIP BY ITSELF
pub async fn delete_recipe(id: Id, pool: &Pool<Sqlite>) -> Result<(), ActionError> {
    let mut tr = pool
        .begin()
        .await
        .map_err(|_| QueryError::new("Could not start transaction".to_owned()))?;

    for statement in [
        "DELETE FROM favorites WHERE recipe_id = $1",
        "DELETE FROM shopping_cart WHERE recipe_id = $1",
        "DELETE FROM recipe_tags WHERE recipe_id = $1",
        "DELETE FROM recipe_ingredients WHERE recipe_id = $1",
    ] {
        sqlx::query(statement).bind(id).execute(&mut *tr).await?;
    }

    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(&mut *tr)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ActionError::not_found("No recipe exists with specified id"));
    }

    tr.commit()
        .await
        .map_err(|_| QueryError::new("Could not commit transaction".to_owned()))?;

    info!("Deleted recipe {id}");
    Ok(())
}

pub async fn get_recipe_view(
    viewer: &Viewer,
    id: Id,
    pool: &Pool<Sqlite>,
) -> Result<RecipeView, ActionError> {
    let recipe = get_recipe(id, pool)
        .await?
        .ok_or_else(|| ActionError::not_found("No recipe exists with specified id"))?;

    recipe_view(viewer, recipe, pool).await
}

/// Recipes matching `filter`, newest first. Every tag slug in the filter
/// must name an existing tag.
pub async fn list_recipes(
    viewer: &Viewer,
    filter: &RecipeFilter,
    pool: &Pool<Sqlite>,
) -> Result<Vec<RecipeView>, ActionError> {
    let mut tag_ids = Vec::with_capacity(filter.tags.len());
    for slug in filter.tags.iter() {
        match find_tag(slug, pool).await? {
            Some(tag) => tag_ids.push(tag.id),
            None => return Err(ActionError::validation(format!("Unknown tag {slug}"))),
        }
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT r.* FROM recipes r WHERE 1 = 1");

    if let Some(author) = filter.author {
        query.push(" AND r.author_id = ").push_bind(author);
    }

    if !tag_ids.is_empty() {
        query.push(
            " AND EXISTS (SELECT 1 FROM recipe_tags rt WHERE rt.recipe_id = r.id AND rt.tag_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in tag_ids {
            ids.push_bind(id);
        }
        ids.push_unseparated("))");
    }

    if let Some(user_id) = filter.favorites_of(viewer) {
        query
            .push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ")
            .push_bind(user_id)
            .push(")");
    }

    if let Some(user_id) = filter.shopping_cart_of(viewer) {
        query
            .push(" AND EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.recipe_id = r.id AND sc.user_id = ")
            .push_bind(user_id)
            .push(")");
    }

    query.push(" ORDER BY r.created_at DESC, r.id DESC");

    let rows: Vec<Recipe> = query.build_query_as().fetch_all(pool).await?;
    debug!("Recipe listing matched {} rows", rows.len());

    let mut views = Vec::with_capacity(rows.len());
    for recipe in rows {
        views.push(recipe_view(viewer, recipe, pool).await?);
    }

    Ok(views)
}

/// The newest recipes of an author, all of them when `limit` is `None`.
pub async fn list_author_recipes(
    author_id: Id,
    limit: Option<i64>,
    pool: &Pool<Sqlite>,
) -> Result<Vec<RecipeReduced>, ActionError> {
    let rows: Vec<Recipe> = sqlx::query_as(
        "SELECT * FROM recipes WHERE author_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
    )
    .bind(author_id)
    // a negative limit means no limit in SQLite
    .bind(limit.unwrap_or(-1))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(RecipeReduced::from).collect())
}

pub async fn count_author_recipes(author_id: Id, pool: &Pool<Sqlite>) -> Result<i64, ActionError> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM recipes WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(count.0)
}

/// Renders a recipe in the shape `intent` calls for.
pub async fn represent_recipe(
    intent: RecipeIntent,
    viewer: &Viewer,
    id: Id,
    pool: &Pool<Sqlite>,
) -> Result<RecipeRepresentation, ActionError> {
    let recipe = get_recipe(id, pool)
        .await?
        .ok_or_else(|| ActionError::not_found("No recipe exists with specified id"))?;

    match intent {
        RecipeIntent::Create | RecipeIntent::Update | RecipeIntent::Read => Ok(
            RecipeRepresentation::Full(recipe_view(viewer, recipe, pool).await?),
        ),
        RecipeIntent::Action | RecipeIntent::ListPreview => {
            Ok(RecipeRepresentation::Reduced(RecipeReduced::from(recipe)))
        }
    }
}

async fn recipe_view(
    viewer: &Viewer,
    recipe: Recipe,
    pool: &Pool<Sqlite>,
) -> Result<RecipeView, ActionError> {
    let tags = list_recipe_tags(recipe.id, pool).await?;
    let ingredients = list_recipe_parts(recipe.id, pool).await?;
    let author = get_user_view(viewer, recipe.author_id, pool).await?;
    let is_favorited = is_favorited(viewer, recipe.id, pool).await?;
    let is_in_shopping_cart = is_in_shopping_cart(viewer, recipe.id, pool).await?;

    Ok(RecipeView {
        id: recipe.id,
        tags,
        author,
        ingredients,
        name: recipe.name,
        image: recipe.image,
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        created_at: recipe.created_at,
        is_favorited,
        is_in_shopping_cart,
    })
}

async fn check_references(
    recipe: &ValidatedRecipe,
    conn: &mut SqliteConnection,
) -> Result<(), ActionError> {
    let ingredient_ids: Vec<Id> = recipe.ingredients.iter().map(|part| part.id).collect();

    if let Some(id) = first_missing_ingredient(&ingredient_ids, &mut *conn).await? {
        return Err(ActionError::not_found(format!("Ingredient {id} doesn't exist")));
    }

    if let Some(id) = first_missing_tag(&recipe.tags, &mut *conn).await? {
        return Err(ActionError::not_found(format!("Tag {id} doesn't exist")));
    }

    Ok(())
}

async fn insert_recipe_parts(
    recipe_id: Id,
    parts: &[IngredientAmount],
    conn: &mut SqliteConnection,
) -> Result<(), ActionError> {
    for chunk in parts.chunks(BIND_LIMIT / 3) {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ");

        query.push_values(chunk, |mut b, part| {
            b.push_bind(recipe_id).push_bind(part.id).push_bind(part.amount);
        });

        query.build().execute(&mut *conn).await?;
    }

    Ok(())
}

async fn insert_recipe_tags(
    recipe_id: Id,
    tags: &[Id],
    conn: &mut SqliteConnection,
) -> Result<(), ActionError> {
    for chunk in tags.chunks(BIND_LIMIT / 2) {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO recipe_tags (recipe_id, tag_id) ");

        query.push_values(chunk, |mut b, tag_id| {
            b.push_bind(recipe_id).push_bind(*tag_id);
        });

        query.build().execute(&mut *conn).await?;
    }

    Ok(())
}
