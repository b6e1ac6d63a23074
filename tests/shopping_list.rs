mod common;

use foodgram_sdk::{
    actions::{
        add_to_shopping_cart, compute_shopping_list, create_recipe, remove_from_shopping_cart,
    },
    error::ActionError,
    permissions::Viewer,
    shopping_list_reply, AMOUNT_MAX, SHOPPING_LIST_FILENAME,
};
use pretty_assertions::assert_eq;
use warp::{http::StatusCode, hyper::body::to_bytes};

#[tokio::test]
async fn sums_ingredients_across_cart_recipes() {
    let pool = common::pool().await;
    let cook = common::user(&pool, "cook").await;
    let flour = common::ingredient(&pool, "Flour", "g").await;
    let egg = common::ingredient(&pool, "Egg", "pc").await;
    let milk = common::ingredient(&pool, "Milk", "ml").await;
    let sugar = common::ingredient(&pool, "Sugar", "g").await;

    let pancakes = common::recipe(&pool, &cook, "Pancakes", &[(flour.id, 200), (egg.id, 2)], &[]).await;
    let crepes = common::recipe(&pool, &cook, "Crepes", &[(flour.id, 100), (milk.id, 50)], &[]).await;
    common::recipe(&pool, &cook, "Fudge", &[(sugar.id, 400)], &[]).await;

    let viewer = common::viewer(&cook);
    add_to_shopping_cart(&viewer, pancakes.id, &pool).await.unwrap();
    add_to_shopping_cart(&viewer, crepes.id, &pool).await.unwrap();

    let list = compute_shopping_list(&viewer, &pool).await.unwrap();
    assert_eq!(list.items.len(), 3);
    assert_eq!(list.total_for("Flour", "g"), Some(300));
    assert_eq!(list.total_for("Egg", "pc"), Some(2));
    assert_eq!(list.total_for("Milk", "ml"), Some(50));
    assert_eq!(list.total_for("Sugar", "g"), None);

    remove_from_shopping_cart(&viewer, pancakes.id, &pool)
        .await
        .unwrap();
    let list = compute_shopping_list(&viewer, &pool).await.unwrap();
    assert_eq!(list.total_for("Flour", "g"), Some(100));
    assert_eq!(list.total_for("Egg", "pc"), None);
}

#[tokio::test]
async fn groups_same_named_rows_per_unit() {
    let pool = common::pool().await;
    let cook = common::user(&pool, "cook").await;
    let grams = common::ingredient(&pool, "Sugar", "g").await;
    let spoons = common::ingredient(&pool, "Sugar", "tbsp").await;

    let tea = common::recipe(&pool, &cook, "Tea", &[(spoons.id, 2)], &[]).await;
    let jam = common::recipe(&pool, &cook, "Jam", &[(grams.id, 500), (spoons.id, 1)], &[]).await;

    let viewer = common::viewer(&cook);
    add_to_shopping_cart(&viewer, tea.id, &pool).await.unwrap();
    add_to_shopping_cart(&viewer, jam.id, &pool).await.unwrap();

    let list = compute_shopping_list(&viewer, &pool).await.unwrap();
    assert_eq!(list.total_for("Sugar", "g"), Some(500));
    assert_eq!(list.total_for("Sugar", "tbsp"), Some(3));
}

#[tokio::test]
async fn empty_and_anonymous_carts_give_empty_lists() {
    let pool = common::pool().await;
    let cook = common::user(&pool, "cook").await;
    let flour = common::ingredient(&pool, "Flour", "g").await;
    common::recipe(&pool, &cook, "Bread", &[(flour.id, 500)], &[]).await;

    assert!(compute_shopping_list(&common::viewer(&cook), &pool)
        .await
        .unwrap()
        .is_empty());
    assert!(compute_shopping_list(&Viewer::Anonymous, &pool)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn served_as_text_attachment() {
    let pool = common::pool().await;
    let cook = common::user(&pool, "cook").await;
    let flour = common::ingredient(&pool, "Flour", "g").await;
    let egg = common::ingredient(&pool, "Egg", "pc").await;
    let pancakes = common::recipe(&pool, &cook, "Pancakes", &[(flour.id, 200), (egg.id, 2)], &[]).await;

    let viewer = common::viewer(&cook);
    add_to_shopping_cart(&viewer, pancakes.id, &pool).await.unwrap();
    let list = compute_shopping_list(&viewer, &pool).await.unwrap();

    let response = shopping_list_reply(&list);
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()["content-disposition"].to_str().unwrap();
    assert!(disposition.contains(SHOPPING_LIST_FILENAME));

    let body = to_bytes(response.into_body()).await.unwrap();
    assert_eq!(&body[..], "Egg (pc) — 2\nFlour (g) — 200\n".as_bytes());
}

#[tokio::test]
async fn largest_storable_amounts_still_add_up() {
    let pool = common::pool().await;
    let cook = common::user(&pool, "cook").await;
    let flour = common::ingredient(&pool, "Flour", "g").await;

    let error = create_recipe(
        &common::viewer(&cook),
        common::write("Silo", &[(flour.id, AMOUNT_MAX + 1)], &[]),
        &pool,
    )
    .await
    .unwrap_err();
    assert!(matches!(error, ActionError::Validation(_)));

    let silo = common::recipe(&pool, &cook, "Silo", &[(flour.id, AMOUNT_MAX)], &[]).await;
    let barn = common::recipe(&pool, &cook, "Barn", &[(flour.id, AMOUNT_MAX)], &[]).await;

    let viewer = common::viewer(&cook);
    add_to_shopping_cart(&viewer, silo.id, &pool).await.unwrap();
    add_to_shopping_cart(&viewer, barn.id, &pool).await.unwrap();

    let list = compute_shopping_list(&viewer, &pool).await.unwrap();
    assert_eq!(list.total_for("Flour", "g"), Some(2 * AMOUNT_MAX));
}
