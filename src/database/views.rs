use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::ActionError,
    schema::{Id, Recipe, RecipeIngredient, ShoppingListPart, Tag, User},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: Id,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserView {
    pub fn from_user(user: User, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Minimal recipe projection used in action responses and embedded listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeReduced {
    pub id: Id,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

impl From<Recipe> for RecipeReduced {
    fn from(value: Recipe) -> Self {
        Self {
            id: value.id,
            name: value.name,
            image: value.image,
            cooking_time: value.cooking_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    pub id: Id,
    pub tags: Vec<Tag>,
    pub author: UserView,
    pub ingredients: Vec<RecipeIngredient>,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub created_at: DateTime<Utc>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowedAuthorView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeReduced>,
    pub recipes_count: i64,
}

/// What the caller is about to do with a recipe; decides which shape it gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeIntent {
    Create,
    Update,
    Read,
    /// Favorite and shopping cart actions.
    Action,
    ListPreview,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecipeRepresentation {
    Full(RecipeView),
    Reduced(RecipeReduced),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Ingredients of every recipe in a cart, summed per (name, unit) pair.
///
/// Grouping is by name and unit rather than ingredient id, so distinct catalog
/// rows that share both collapse into one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShoppingList {
    pub items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Fails when a group total no longer fits in an `i64`.
    pub fn from_parts(parts: Vec<ShoppingListPart>) -> Result<Self, ActionError> {
        let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
        for part in parts {
            let total = totals
                .entry((part.name, part.measurement_unit))
                .or_insert(0);
            *total = total.checked_add(part.amount).ok_or_else(|| {
                ActionError::validation("Shopping list total is too large")
            })?;
        }

        Ok(Self {
            items: totals
                .into_iter()
                .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
                    name,
                    measurement_unit,
                    total_amount,
                })
                .collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_for(&self, name: &str, measurement_unit: &str) -> Option<i64> {
        self.items
            .iter()
            .find(|item| item.name == name && item.measurement_unit == measurement_unit)
            .map(|item| item.total_amount)
    }

    /// Plain text attachment body, one line per ingredient.
    pub fn render(&self) -> String {
        self.items
            .iter()
            .map(|item| {
                format!(
                    "{} ({}) — {}\n",
                    item.name, item.measurement_unit, item.total_amount
                )
            })
            .collect()
    }
}
