use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{
    error::{ActionError, TypeError},
    schema::{IngredientAmount, RecipeFields, RecipeWrite},
};

pub type FormData = HashMap<String, Value>;

pub struct Form {
    inner: HashMap<String, Value>,
}

impl Form {
    pub fn from_data(data: FormData) -> Self {
        Self { inner: data }
    }

    pub fn get_value<T>(&self, key: &str) -> Result<T, TypeError>
    where
        T: DeserializeOwned,
    {
        match self.inner.get(key) {
            Some(value) => serde_json::from_value(value.to_owned())
                .map_err(|_e| TypeError::new(&format!("Invalid value for {key}"))),
            None => Err(TypeError::new(&format!("Field {key} is required"))),
        }
    }

    /// Accepts both JSON numbers and numeric strings, as sent by HTML forms.
    pub fn get_number(&self, key: &str) -> Result<i64, TypeError> {
        match self.inner.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| TypeError::new(&format!("Field {key} must be an integer"))),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_e| TypeError::new(&format!("Field {key} must be an integer"))),
            Some(_) => Err(TypeError::new(&format!("Field {key} must be an integer"))),
            None => Err(TypeError::new(&format!("Field {key} is required"))),
        }
    }

    pub fn get_str(&self, key: &str) -> Result<String, TypeError> {
        match self.inner.get(key) {
            Some(value) => match value.as_str() {
                Some(v) => Ok(v.to_string()),
                None => Err(TypeError::new(&format!("Field {key} must be a string"))),
            },
            None => Err(TypeError::new(&format!("Field {key} is required"))),
        }
    }
}

impl TryFrom<Form> for RecipeWrite {
    type Error = ActionError;

    fn try_from(form: Form) -> Result<Self, Self::Error> {
        if form.inner.contains_key("author") {
            return Err(ActionError::validation("Recipe author can't be set by the client"));
        }

        Ok(Self {
            fields: RecipeFields {
                name: form.get_str("name")?,
                image: form.get_str("image")?,
                text: form.get_str("text")?,
                cooking_time: form.get_number("cooking_time")?,
            },
            ingredients: form.get_value::<Vec<IngredientAmount>>("ingredients")?,
            tags: form.get_value("tags")?,
        })
    }
}
