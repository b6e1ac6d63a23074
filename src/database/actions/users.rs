use log::info;
use sqlx::{Pool, Sqlite};

use crate::{
    authentication::{cryptography::hash_password, permissions::Viewer},
    error::ActionError,
    schema::{Id, NewUser, User},
    views::UserView,
};

use super::is_subscribed;

pub async fn get_user_by_id(pool: &Pool<Sqlite>, user_id: Id) -> Result<Option<User>, ActionError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn get_user_by_username(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<Option<User>, ActionError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Stores a new user with an argon2 hash of their password.
pub async fn register_user(user: NewUser, pool: &Pool<Sqlite>) -> Result<User, ActionError> {
    user.validate()?;

    let password = hash_password(&user.password)
        .map_err(|e| ActionError::validation(format!("Could not hash password ({e})")))?;

    let row: Option<User> = sqlx::query_as(
        "
        INSERT INTO users (email, username, first_name, last_name, password)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT DO NOTHING RETURNING *
    ",
    )
    .bind(&user.email)
    .bind(&user.username)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(password)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            info!("Registered user {} ({})", row.id, row.username);
            Ok(row)
        }
        None => Err(ActionError::conflict("Email or username is already taken")),
    }
}

pub async fn get_user_view(
    viewer: &Viewer,
    user_id: Id,
    pool: &Pool<Sqlite>,
) -> Result<UserView, ActionError> {
    let user = get_user_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ActionError::not_found("User doesn't exist"))?;
    let subscribed = is_subscribed(viewer, user.id, pool).await?;

    Ok(UserView::from_user(user, subscribed))
}

/// Every user, oldest account first, flagged with the viewer's subscriptions.
pub async fn list_users(viewer: &Viewer, pool: &Pool<Sqlite>) -> Result<Vec<UserView>, ActionError> {
    let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY id")
        .fetch_all(pool)
        .await?;

    let mut views = Vec::with_capacity(users.len());
    for user in users {
        let subscribed = is_subscribed(viewer, user.id, pool).await?;
        views.push(UserView::from_user(user, subscribed));
    }

    Ok(views)
}

/// The signed-in user's own profile.
pub async fn get_me(viewer: &Viewer, pool: &Pool<Sqlite>) -> Result<UserView, ActionError> {
    let user_id = viewer.user_id().ok_or(ActionError::Unauthenticated)?;

    get_user_view(viewer, user_id, pool).await
}
