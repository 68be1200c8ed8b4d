use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainParseError {
    #[error("unknown meal type '{0}' (expected Breakfast, Lunch or Dinner)")]
    UnknownMealType(String),
    #[error("unknown dietary tag '{0}' (expected Vegetarian, Vegan, Gluten-Free or Keto)")]
    UnknownDietaryTag(String),
}
