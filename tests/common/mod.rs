#![allow(dead_code)]

use foodgram_sdk::{
    actions::{create_ingredient, create_recipe, create_tag, register_user},
    connection::connect,
    permissions::Viewer,
    schema::{Id, Ingredient, IngredientAmount, Recipe, RecipeFields, RecipeWrite, Tag, User, NewUser},
    Config,
};
use sqlx::{Pool, Sqlite};

pub async fn pool() -> Pool<Sqlite> {
    connect(&Config::in_memory())
        .await
        .expect("in-memory database")
}

pub async fn user(pool: &Pool<Sqlite>, username: &str) -> User {
    register_user(
        NewUser {
            email: format!("{username}@example.com"),
            username: username.to_string(),
            first_name: username.to_string(),
            last_name: String::from("Tester"),
            password: String::from("correct horse"),
        },
        pool,
    )
    .await
    .expect("user")
}

pub async fn ingredient(pool: &Pool<Sqlite>, name: &str, unit: &str) -> Ingredient {
    create_ingredient(name, unit, pool).await.expect("ingredient")
}

pub async fn tag(pool: &Pool<Sqlite>, slug: &str) -> Tag {
    create_tag(&slug.to_uppercase(), "#49B64E", slug, pool)
        .await
        .expect("tag")
}

pub fn write(name: &str, ingredients: &[(Id, i64)], tags: &[Id]) -> RecipeWrite {
    RecipeWrite {
        fields: RecipeFields {
            name: name.to_string(),
            image: format!("recipes/{}.png", name.to_lowercase()),
            text: format!("How to make {name}."),
            cooking_time: 15,
        },
        ingredients: ingredients
            .iter()
            .map(|(id, amount)| IngredientAmount {
                id: *id,
                amount: *amount,
            })
            .collect(),
        tags: tags.to_vec(),
    }
}

pub async fn recipe(
    pool: &Pool<Sqlite>,
    author: &User,
    name: &str,
    ingredients: &[(Id, i64)],
    tags: &[Id],
) -> Recipe {
    create_recipe(&Viewer::User(author.id), write(name, ingredients, tags), pool)
        .await
        .expect("recipe")
}

pub fn viewer(user: &User) -> Viewer {
    Viewer::User(user.id)
}
