//! Backend commands queued from UI to backend worker.

use client_core::FilterChange;
use shared::domain::{PlannedMealId, Recipe};

#[derive(Debug, Clone)]
pub enum BackendCommand {
    UpdateFilters(FilterChange),
    RefreshCatalog,
    AddToPlannedMeal(Recipe),
    LoadPlannedMeals,
    RemovePlannedMeal(PlannedMealId),
    FetchImage { url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::UpdateFilters(_) => "update_filters",
            BackendCommand::RefreshCatalog => "refresh_catalog",
            BackendCommand::AddToPlannedMeal(_) => "add_to_planned_meal",
            BackendCommand::LoadPlannedMeals => "load_planned_meals",
            BackendCommand::RemovePlannedMeal(_) => "remove_planned_meal",
            BackendCommand::FetchImage { .. } => "fetch_image",
        }
    }
}
