use log::info;
use sqlx::{Pool, Sqlite};

use crate::{
    authentication::permissions::{ActionType, Viewer},
    error::ActionError,
    schema::{Id, Recipe},
    views::RecipeReduced,
};

use super::get_recipe;

/// Per-user recipe sets. Adding a member twice or removing a non-member is an
/// error, not a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipSet {
    Favorites,
    ShoppingCart,
}

impl MembershipSet {
    fn table(self) -> &'static str {
        match self {
            MembershipSet::Favorites => "favorites",
            MembershipSet::ShoppingCart => "shopping_cart",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MembershipSet::Favorites => "favorites",
            MembershipSet::ShoppingCart => "the shopping cart",
        }
    }

    fn action(self) -> ActionType {
        match self {
            MembershipSet::Favorites => ActionType::ManageOwnFavorites,
            MembershipSet::ShoppingCart => ActionType::ManageOwnShoppingCart,
        }
    }
}

pub async fn add_to_set(
    set: MembershipSet,
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<RecipeReduced, ActionError> {
    let user_id = viewer.authenticate(set.action())?;

    let recipe = get_recipe(recipe_id, pool)
        .await?
        .ok_or_else(|| ActionError::not_found("No recipe exists with specified id"))?;

    let query = format!(
        "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        set.table()
    );
    let result = sqlx::query(&query)
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ActionError::conflict(format!(
            "Recipe is already in {}",
            set.label()
        )));
    }

    info!("User {user_id} added recipe {recipe_id} to {}", set.table());
    Ok(RecipeReduced::from(recipe))
}

pub async fn remove_from_set(
    set: MembershipSet,
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<(), ActionError> {
    let user_id = viewer.authenticate(set.action())?;

    if get_recipe(recipe_id, pool).await?.is_none() {
        return Err(ActionError::not_found("No recipe exists with specified id"));
    }

    let query = format!(
        "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
        set.table()
    );
    let result = sqlx::query(&query)
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ActionError::Absent(format!(
            "Recipe is not in {}",
            set.label()
        )));
    }

    info!("User {user_id} removed recipe {recipe_id} from {}", set.table());
    Ok(())
}

/// Always false for anonymous viewers.
pub async fn is_in_set(
    set: MembershipSet,
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<bool, ActionError> {
    let Some(user_id) = viewer.user_id() else {
        return Ok(false);
    };

    let query = format!(
        "SELECT recipe_id FROM {} WHERE user_id = $1 AND recipe_id = $2",
        set.table()
    );
    let result: Option<(Id,)> = sqlx::query_as(&query)
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?;

    Ok(result.is_some())
}

pub async fn list_set(
    set: MembershipSet,
    viewer: &Viewer,
    pool: &Pool<Sqlite>,
) -> Result<Vec<RecipeReduced>, ActionError> {
    let Some(user_id) = viewer.user_id() else {
        return Ok(vec![]);
    };

    let query = format!(
        "
        SELECT r.*
        FROM {} m
        INNER JOIN recipes r ON r.id = m.recipe_id
        WHERE m.user_id = $1
        ORDER BY m.id
    ",
        set.table()
    );
    let rows: Vec<Recipe> = sqlx::query_as(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(RecipeReduced::from).collect())
}

pub async fn add_to_favorites(
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<RecipeReduced, ActionError> {
    add_to_set(MembershipSet::Favorites, viewer, recipe_id, pool).await
}

pub async fn remove_from_favorites(
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<(), ActionError> {
    remove_from_set(MembershipSet::Favorites, viewer, recipe_id, pool).await
}

pub async fn is_favorited(
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<bool, ActionError> {
    is_in_set(MembershipSet::Favorites, viewer, recipe_id, pool).await
}

pub async fn list_favorites(
    viewer: &Viewer,
    pool: &Pool<Sqlite>,
) -> Result<Vec<RecipeReduced>, ActionError> {
    list_set(MembershipSet::Favorites, viewer, pool).await
}

pub async fn add_to_shopping_cart(
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<RecipeReduced, ActionError> {
    add_to_set(MembershipSet::ShoppingCart, viewer, recipe_id, pool).await
}

pub async fn remove_from_shopping_cart(
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<(), ActionError> {
    remove_from_set(MembershipSet::ShoppingCart, viewer, recipe_id, pool).await
}

pub async fn is_in_shopping_cart(
    viewer: &Viewer,
    recipe_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<bool, ActionError> {
    is_in_set(MembershipSet::ShoppingCart, viewer, recipe_id, pool).await
}

pub async fn list_shopping_cart(
    viewer: &Viewer,
    pool: &Pool<Sqlite>,
) -> Result<Vec<RecipeReduced>, ActionError> {
    list_set(MembershipSet::ShoppingCart, viewer, pool).await
}
