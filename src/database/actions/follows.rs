use log::info;
use sqlx::{Pool, Sqlite};

use crate::{
    authentication::permissions::{ActionType, Viewer},
    error::ActionError,
    schema::{Id, User},
    views::{FollowedAuthorView, UserView},
};

use super::{count_author_recipes, get_user_by_id, list_author_recipes};

pub async fn is_subscribed(
    viewer: &Viewer,
    author_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<bool, ActionError> {
    let Some(user_id) = viewer.user_id() else {
        return Ok(false);
    };

    let result: Option<(Id,)> =
        sqlx::query_as("SELECT id FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(user_id)
            .bind(author_id)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Subscribes the viewer to `author_id` and returns the new subscription the
/// way [`list_following`] shows it.
pub async fn follow(
    viewer: &Viewer,
    author_id: Id,
    recipes_limit: Option<i64>,
    pool: &Pool<Sqlite>,
) -> Result<FollowedAuthorView, ActionError> {
    let user_id = viewer.authenticate(ActionType::ManageOwnSubscriptions)?;

    if user_id == author_id {
        return Err(ActionError::InvalidOperation(String::from(
            "You can't follow yourself",
        )));
    }
    check_recipes_limit(recipes_limit)?;

    let author = get_user_by_id(pool, author_id)
        .await?
        .ok_or_else(|| ActionError::not_found("User doesn't exist"))?;

    let result = sqlx::query(
        "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(author_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ActionError::conflict("You already follow this author"));
    }

    info!("User {user_id} follows user {author_id}");
    followed_author_view(viewer, author, recipes_limit, pool).await
}

pub async fn unfollow(viewer: &Viewer, author_id: Id, pool: &Pool<Sqlite>) -> Result<(), ActionError> {
    let user_id = viewer.authenticate(ActionType::ManageOwnSubscriptions)?;

    if get_user_by_id(pool, author_id).await?.is_none() {
        return Err(ActionError::not_found("User doesn't exist"));
    }

    let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ActionError::Absent(String::from(
            "You don't follow this author",
        )));
    }

    info!("User {user_id} unfollowed user {author_id}");
    Ok(())
}

/// Authors the viewer follows, oldest subscription first, each with up to
/// `recipes_limit` of their newest recipes.
pub async fn list_following(
    viewer: &Viewer,
    recipes_limit: Option<i64>,
    pool: &Pool<Sqlite>,
) -> Result<Vec<FollowedAuthorView>, ActionError> {
    check_recipes_limit(recipes_limit)?;

    let Some(user_id) = viewer.user_id() else {
        return Ok(vec![]);
    };

    let authors: Vec<User> = sqlx::query_as(
        "
        SELECT u.*
        FROM follows f
        INNER JOIN users u ON u.id = f.followee_id
        WHERE f.follower_id = $1
        ORDER BY f.id
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut views = Vec::with_capacity(authors.len());
    for author in authors {
        views.push(followed_author_view(viewer, author, recipes_limit, pool).await?);
    }

    Ok(views)
}

async fn followed_author_view(
    viewer: &Viewer,
    author: User,
    recipes_limit: Option<i64>,
    pool: &Pool<Sqlite>,
) -> Result<FollowedAuthorView, ActionError> {
    let recipes = list_author_recipes(author.id, recipes_limit, pool).await?;
    let recipes_count = count_author_recipes(author.id, pool).await?;
    let subscribed = is_subscribed(viewer, author.id, pool).await?;

    Ok(FollowedAuthorView {
        author: UserView::from_user(author, subscribed),
        recipes,
        recipes_count,
    })
}

fn check_recipes_limit(recipes_limit: Option<i64>) -> Result<(), ActionError> {
    match recipes_limit {
        Some(limit) if limit < 0 => Err(ActionError::validation(
            "recipes_limit must not be negative",
        )),
        _ => Ok(()),
    }
}
