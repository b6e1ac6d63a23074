use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        AMOUNT_MAX, COOKING_TIME_MAX, INGREDIENT_NAME_MAX_LENGTH, MEASUREMENT_UNIT_MAX_LENGTH,
        RECIPE_NAME_MAX_LENGTH, TAG_NAME_MAX_LENGTH,
    },
    error::ActionError,
};

pub type Id = i64;

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct User {
    pub id: Id,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ActionError> {
        if !self.email.contains('@') {
            return Err(ActionError::validation("Invalid email address"));
        }
        for (field, value) in [
            ("username", &self.username),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(ActionError::validation(format!("Field {field} is required")));
            }
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Id,
    pub name: String,
    pub measurement_unit: String,
}

impl Ingredient {
    pub fn validate_new(name: &str, measurement_unit: &str) -> Result<(), ActionError> {
        if name.is_empty() || name.chars().count() > INGREDIENT_NAME_MAX_LENGTH {
            return Err(ActionError::validation(format!(
                "Ingredient name must be 1-{INGREDIENT_NAME_MAX_LENGTH} characters"
            )));
        }
        if measurement_unit.is_empty()
            || measurement_unit.chars().count() > MEASUREMENT_UNIT_MAX_LENGTH
        {
            return Err(ActionError::validation(format!(
                "Measurement unit must be 1-{MEASUREMENT_UNIT_MAX_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Id,
    pub name: String,
    /// Hex code such as `#49B64E`.
    pub color: String,
    pub slug: String,
}

impl Tag {
    pub fn validate_new(name: &str, color: &str, slug: &str) -> Result<(), ActionError> {
        if name.is_empty() || name.chars().count() > TAG_NAME_MAX_LENGTH {
            return Err(ActionError::validation(format!(
                "Tag name must be 1-{TAG_NAME_MAX_LENGTH} characters"
            )));
        }

        let hex = color.strip_prefix('#').unwrap_or("");
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ActionError::validation("Tag color must be a hex code like #49B64E"));
        }

        if slug.is_empty()
            || slug.chars().count() > TAG_NAME_MAX_LENGTH
            || !slug
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ActionError::validation(
                "Tag slug may only contain letters, digits, '-' and '_'",
            ));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: Id,
    pub author_id: Id,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub created_at: DateTime<Utc>,
}

/// One ingredient line of a recipe, joined with its catalog entry.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
    pub id: Id,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// A single ingredient line of a recipe sitting in somebody's cart.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListPart {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub id: Id,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
}

/// Client payload for creating or replacing a recipe. The author is never part
/// of it; it always comes from the acting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeWrite {
    #[serde(flatten)]
    pub fields: RecipeFields,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<Id>,
}

/// A recipe write that passed every check that needs no storage access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecipe {
    pub fields: RecipeFields,
    pub ingredients: Vec<IngredientAmount>,
    pub tags: Vec<Id>,
}

impl RecipeWrite {
    pub fn validate(self) -> Result<ValidatedRecipe, ActionError> {
        let fields = self.fields;

        if fields.name.trim().is_empty() {
            return Err(ActionError::validation("Field name is required"));
        }
        if fields.name.chars().count() > RECIPE_NAME_MAX_LENGTH {
            return Err(ActionError::validation(format!(
                "Recipe name is longer than {RECIPE_NAME_MAX_LENGTH} characters"
            )));
        }
        if fields.text.trim().is_empty() {
            return Err(ActionError::validation("Field text is required"));
        }
        if fields.image.trim().is_empty() {
            return Err(ActionError::validation("Field image is required"));
        }
        if !(1..=COOKING_TIME_MAX).contains(&fields.cooking_time) {
            return Err(ActionError::validation(format!(
                "Cooking time must be 1-{COOKING_TIME_MAX} minutes"
            )));
        }

        if self.ingredients.is_empty() {
            return Err(ActionError::validation("Recipe needs at least one ingredient"));
        }

        let mut seen = HashSet::new();
        for part in self.ingredients.iter() {
            if !(1..=AMOUNT_MAX).contains(&part.amount) {
                return Err(ActionError::validation(format!(
                    "Amount of ingredient {} must be 1-{AMOUNT_MAX}",
                    part.id
                )));
            }
            if !seen.insert(part.id) {
                return Err(ActionError::validation(format!(
                    "Ingredient {} is listed more than once",
                    part.id
                )));
            }
        }

        let mut tags = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Ok(ValidatedRecipe {
            fields,
            ingredients: self.ingredients,
            tags,
        })
    }
}
