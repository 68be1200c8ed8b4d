//! Catalog filter state and the transitions the UI drives it through.

use shared::{
    domain::{DietaryTag, MealType},
    protocol::RecipeQuery,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// `None` selects all meal types.
    MealType(Option<MealType>),
    Dietary(Vec<DietaryTag>),
    ToggleDietary(DietaryTag),
    /// Live text of the ingredient/dish input.
    IngredientDraft(String),
    /// Commits the current draft as an ingredient chip.
    AddIngredient,
    RemoveIngredient(String),
    Clear,
}

impl FilterChange {
    pub fn name(&self) -> &'static str {
        match self {
            FilterChange::MealType(_) => "meal_type",
            FilterChange::Dietary(_) => "dietary",
            FilterChange::ToggleDietary(_) => "toggle_dietary",
            FilterChange::IngredientDraft(_) => "ingredient_draft",
            FilterChange::AddIngredient => "add_ingredient",
            FilterChange::RemoveIngredient(_) => "remove_ingredient",
            FilterChange::Clear => "clear",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub meal_type: Option<MealType>,
    pub dietary: Vec<DietaryTag>,
    pub ingredient_draft: String,
    pub ingredients: Vec<String>,
}

impl FilterState {
    /// Applies `change` and reports whether anything observable changed.
    pub fn apply(&mut self, change: FilterChange) -> bool {
        match change {
            FilterChange::MealType(meal_type) => {
                if self.meal_type == meal_type {
                    return false;
                }
                self.meal_type = meal_type;
                true
            }
            FilterChange::Dietary(tags) => {
                let mut deduped = Vec::with_capacity(tags.len());
                for tag in tags {
                    if !deduped.contains(&tag) {
                        deduped.push(tag);
                    }
                }
                if self.dietary == deduped {
                    return false;
                }
                self.dietary = deduped;
                true
            }
            FilterChange::ToggleDietary(tag) => {
                if let Some(index) = self.dietary.iter().position(|t| *t == tag) {
                    self.dietary.remove(index);
                } else {
                    self.dietary.push(tag);
                }
                true
            }
            FilterChange::IngredientDraft(draft) => {
                if self.ingredient_draft == draft {
                    return false;
                }
                self.ingredient_draft = draft;
                true
            }
            FilterChange::AddIngredient => {
                let candidate = self.ingredient_draft.trim().to_string();
                if candidate.is_empty() || self.has_ingredient(&candidate) {
                    return false;
                }
                self.ingredients.push(candidate);
                self.ingredient_draft.clear();
                true
            }
            FilterChange::RemoveIngredient(ingredient) => {
                let before = self.ingredients.len();
                self.ingredients.retain(|existing| *existing != ingredient);
                self.ingredients.len() != before
            }
            FilterChange::Clear => {
                if *self == FilterState::default() {
                    return false;
                }
                *self = FilterState::default();
                true
            }
        }
    }

    pub fn has_ingredient(&self, ingredient: &str) -> bool {
        self.ingredients.iter().any(|existing| existing == ingredient)
    }

    pub fn is_selected(&self, tag: DietaryTag) -> bool {
        self.dietary.contains(&tag)
    }

    pub fn to_query(&self) -> RecipeQuery {
        RecipeQuery::new(
            self.meal_type,
            &self.dietary,
            &self.ingredients,
            &self.ingredient_draft,
        )
    }
}

#[cfg(test)]
#[path = "tests/filters_tests.rs"]
mod tests;
