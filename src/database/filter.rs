use crate::{authentication::permissions::Viewer, schema::Id};

/// Query parameters accepted by the recipe listing.
///
/// `is_favorited` and `is_in_shopping_cart` only narrow the listing when they
/// equal 1 and the viewer is signed in; any other value is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Tag slugs, a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub author: Option<Id>,
    pub is_favorited: Option<i64>,
    pub is_in_shopping_cart: Option<i64>,
}

impl RecipeFilter {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "tags" => filter.tags.push(value),
                "author" => filter.author = value.parse().ok(),
                "is_favorited" => filter.is_favorited = value.parse().ok(),
                "is_in_shopping_cart" => filter.is_in_shopping_cart = value.parse().ok(),
                _ => {}
            }
        }
        filter
    }

    pub fn favorites_of(&self, viewer: &Viewer) -> Option<Id> {
        match self.is_favorited {
            Some(1) => viewer.user_id(),
            _ => None,
        }
    }

    pub fn shopping_cart_of(&self, viewer: &Viewer) -> Option<Id> {
        match self.is_in_shopping_cart {
            Some(1) => viewer.user_id(),
            _ => None,
        }
    }
}

/// Ingredient lookup by case-sensitive name prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientFilter {
    pub name: Option<String>,
}

impl IngredientFilter {
    pub fn starting_with(prefix: &str) -> Self {
        Self {
            name: Some(prefix.to_string()),
        }
    }
}
