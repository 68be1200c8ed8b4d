use serde::{Deserialize, Serialize};

use crate::domain::{DietaryTag, MealType};

pub const RECIPES_PATH: &str = "recipes";
pub const PLANNED_MEAL_PATH: &str = "plannedMeal";

/// Query string for `GET /recipes`. Every parameter is always sent, empty
/// when its filter is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeQuery {
    #[serde(rename = "mealType")]
    pub meal_type: String,
    pub dietary: String,
    pub ingredient: String,
    #[serde(rename = "recipeName")]
    pub recipe_name: String,
}

impl RecipeQuery {
    pub fn new(
        meal_type: Option<MealType>,
        dietary: &[DietaryTag],
        ingredients: &[String],
        recipe_name: &str,
    ) -> Self {
        Self {
            meal_type: meal_type.map(MealType::as_str).unwrap_or_default().to_string(),
            dietary: dietary
                .iter()
                .map(|tag| tag.as_str())
                .collect::<Vec<_>>()
                .join(","),
            ingredient: ingredients.join(","),
            recipe_name: recipe_name.to_string(),
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.meal_type.is_empty()
            && self.dietary.is_empty()
            && self.ingredient.is_empty()
            && self.recipe_name.is_empty()
    }
}
