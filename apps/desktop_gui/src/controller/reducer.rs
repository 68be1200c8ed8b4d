//! View-model state and the transitions UI actions and backend events drive.

use std::collections::{HashMap, HashSet};

use client_core::{FilterChange, FilterState};
use crossbeam_channel::Sender;
use shared::domain::{PlannedMeal, PlannedMealId, Recipe};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::media::PreviewImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Catalog,
    PlannedMeal,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Catalog => "/",
            Route::PlannedMeal => "/planned-meal",
        }
    }

    /// Label of the navigation button that leads away from this route.
    pub fn nav_label(self) -> &'static str {
        match self {
            Route::Catalog => "Planned Meal",
            Route::PlannedMeal => "Recipes",
        }
    }

    pub fn other(self) -> Route {
        match self {
            Route::Catalog => Route::PlannedMeal,
            Route::PlannedMeal => Route::Catalog,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    Loading,
    /// Decoded pixels waiting for the UI to upload them as a texture.
    Ready(PreviewImage),
    Uploaded,
    Failed,
}

#[derive(Debug, Default)]
pub struct ViewModel {
    pub route: Route,
    /// Mirror of the backend filter state, kept in step by applying the same changes.
    pub filters: FilterState,
    pub recipes: Vec<Recipe>,
    pub planned_meals: Vec<PlannedMeal>,
    pub status: String,
    pub banner: Option<UiError>,
    pub pending_removals: HashSet<PlannedMealId>,
    pub catalog_generation: u64,
    /// Keyed by image url.
    pub images: HashMap<String, ImageState>,
}

pub fn apply_event(vm: &mut ViewModel, event: UiEvent) {
    match event {
        UiEvent::Info(message) => vm.status = message,
        UiEvent::CatalogUpdated {
            generation,
            recipes,
        } => {
            if generation < vm.catalog_generation {
                tracing::debug!(generation, latest = vm.catalog_generation, "ignoring older catalog");
                return;
            }
            vm.catalog_generation = generation;
            vm.status = format!("{} recipes", recipes.len());
            vm.recipes = recipes;
            vm.banner = None;
        }
        UiEvent::PlannedMealsUpdated(meals) => {
            vm.planned_meals = meals;
        }
        UiEvent::PlannedMealAdded { title } => {
            vm.status = format!("Added \"{title}\" to your planned meals");
        }
        UiEvent::PlannedMealRemoved(id) => {
            vm.pending_removals.remove(&id);
            vm.planned_meals.retain(|meal| meal.id != id);
            vm.status = "Removed from planned meals".to_string();
        }
        UiEvent::RemovalFailed { id, error } => {
            vm.pending_removals.remove(&id);
            tracing::warn!(planned_meal_id = %id, "removal failed: {}", error.message());
            vm.banner = Some(error);
        }
        UiEvent::ImageLoaded { url, image } => {
            vm.images.insert(url, ImageState::Ready(image));
        }
        UiEvent::ImageFailed { url, reason } => {
            tracing::debug!(%url, "card image failed: {reason}");
            vm.images.insert(url, ImageState::Failed);
        }
        UiEvent::Error(error) => {
            tracing::warn!(
                category = ?error.category(),
                context = ?error.context(),
                "{}",
                error.message()
            );
            vm.banner = Some(error);
        }
    }
}

pub fn navigate(vm: &mut ViewModel, route: Route, cmd_tx: &Sender<BackendCommand>) {
    vm.route = route;
    if route == Route::PlannedMeal {
        dispatch_backend_command(cmd_tx, BackendCommand::LoadPlannedMeals, &mut vm.status);
    }
}

/// Applies `change` to the mirror and forwards it when it changed anything.
pub fn edit_filters(vm: &mut ViewModel, change: FilterChange, cmd_tx: &Sender<BackendCommand>) {
    let previous = vm.filters.clone();
    if !vm.filters.apply(change.clone()) {
        return;
    }
    if !dispatch_backend_command(cmd_tx, BackendCommand::UpdateFilters(change), &mut vm.status) {
        // The worker never saw it; stay in step with the worker.
        vm.filters = previous;
    }
}

pub fn add_to_planned_meal(vm: &mut ViewModel, recipe: &Recipe, cmd_tx: &Sender<BackendCommand>) {
    dispatch_backend_command(
        cmd_tx,
        BackendCommand::AddToPlannedMeal(recipe.clone()),
        &mut vm.status,
    );
}

pub fn request_removal(vm: &mut ViewModel, id: &PlannedMealId, cmd_tx: &Sender<BackendCommand>) {
    if vm.pending_removals.contains(id) {
        return;
    }
    if dispatch_backend_command(
        cmd_tx,
        BackendCommand::RemovePlannedMeal(id.clone()),
        &mut vm.status,
    ) {
        vm.pending_removals.insert(id.clone());
    }
}

/// Queues a download the first time `url` is seen; later calls are no-ops.
pub fn request_image(vm: &mut ViewModel, url: &str, cmd_tx: &Sender<BackendCommand>) {
    if url.trim().is_empty() || vm.images.contains_key(url) {
        return;
    }
    if dispatch_backend_command(
        cmd_tx,
        BackendCommand::FetchImage {
            url: url.to_string(),
        },
        &mut vm.status,
    ) {
        vm.images.insert(url.to_string(), ImageState::Loading);
    }
}

/// Hands over decoded pixels for upload, leaving `Uploaded` behind.
pub fn take_ready_image(vm: &mut ViewModel, url: &str) -> Option<PreviewImage> {
    let state = vm.images.get_mut(url)?;
    if !matches!(state, ImageState::Ready(_)) {
        return None;
    }
    match std::mem::replace(state, ImageState::Uploaded) {
        ImageState::Ready(image) => Some(image),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/reducer_tests.rs"]
mod tests;
