use log::debug;
use sqlx::{Pool, Sqlite};

use crate::{
    authentication::permissions::Viewer,
    error::ActionError,
    schema::{Id, ShoppingListPart},
    views::ShoppingList,
};

pub async fn list_shopping_list_parts(
    user_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<Vec<ShoppingListPart>, ActionError> {
    let rows: Vec<ShoppingListPart> = sqlx::query_as(
        "
        SELECT i.name AS name, i.measurement_unit AS measurement_unit, ri.amount AS amount
        FROM shopping_cart sc
        INNER JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE sc.user_id = $1
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Consolidated ingredient list of everything in the viewer's cart. Anonymous
/// viewers have an empty cart.
pub async fn compute_shopping_list(
    viewer: &Viewer,
    pool: &Pool<Sqlite>,
) -> Result<ShoppingList, ActionError> {
    let Some(user_id) = viewer.user_id() else {
        return Ok(ShoppingList::default());
    };

    let parts = list_shopping_list_parts(user_id, pool).await?;
    debug!("Shopping list of user {user_id} built from {} lines", parts.len());

    ShoppingList::from_parts(parts)
}
