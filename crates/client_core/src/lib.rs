use std::sync::Arc;

use anyhow::Result;
use shared::{
    domain::{PlannedMeal, PlannedMealId, Recipe, RecipeId},
    protocol::RecipeQuery,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

pub mod api;
pub mod config;
pub mod error;
pub mod filters;

pub use api::{HttpRecipeApi, RecipeApi};
pub use config::ClientSettings;
pub use error::ClientError;
pub use filters::{FilterChange, FilterState};

/// A catalog request pinned to the filter state it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTicket {
    pub generation: u64,
    pub query: RecipeQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The response replaced the visible list; carries its length.
    Applied(usize),
    /// A newer request was issued before this one completed.
    Stale,
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    CatalogUpdated {
        generation: u64,
        recipes: Vec<Recipe>,
    },
    PlannedMealsUpdated(Vec<PlannedMeal>),
    PlannedMealAdded(Recipe),
    Error(String),
}

#[derive(Default)]
struct PlannerState {
    filters: FilterState,
    recipes: Vec<Recipe>,
    catalog_generation: u64,
    planned_meals: Vec<PlannedMeal>,
    planned_generation: u64,
    planned_loads_in_flight: usize,
    /// Ids confirmed deleted while a planned-meal load was outstanding.
    removed_during_loads: Vec<PlannedMealId>,
}

/// Owns the filter state and the two rendered lists, keeping them consistent
/// with the remote API while requests overlap.
pub struct MealPlannerClient {
    api: Arc<dyn RecipeApi>,
    inner: Mutex<PlannerState>,
    events: broadcast::Sender<ClientEvent>,
}

impl MealPlannerClient {
    pub fn new(settings: &ClientSettings) -> Result<Arc<Self>> {
        let api = HttpRecipeApi::new(&settings.api_base_url, settings.request_timeout())?;
        info!(api_base_url = %api.base_url(), "recipe api client ready");
        Ok(Self::new_with_api(Arc::new(api)))
    }

    pub fn new_with_api(api: Arc<dyn RecipeApi>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            api,
            inner: Mutex::new(PlannerState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn filters(&self) -> FilterState {
        self.inner.lock().await.filters.clone()
    }

    pub async fn recipes(&self) -> Vec<Recipe> {
        self.inner.lock().await.recipes.clone()
    }

    pub async fn planned_meals(&self) -> Vec<PlannedMeal> {
        self.inner.lock().await.planned_meals.clone()
    }

    /// Applies `change`; returns a ticket for the new state only when the
    /// state actually changed.
    pub async fn stage_filter_change(&self, change: FilterChange) -> Option<CatalogTicket> {
        let name = change.name();
        let mut guard = self.inner.lock().await;
        if !guard.filters.apply(change) {
            debug!(change = name, "filter change left state untouched");
            return None;
        }
        Some(issue_catalog_ticket(&mut guard))
    }

    pub async fn stage_refresh(&self) -> CatalogTicket {
        let mut guard = self.inner.lock().await;
        issue_catalog_ticket(&mut guard)
    }

    pub async fn execute_catalog(&self, ticket: CatalogTicket) -> Result<RefreshOutcome> {
        let generation = ticket.generation;
        let result = self.api.list_recipes(&ticket.query).await;

        let mut guard = self.inner.lock().await;
        if guard.catalog_generation != generation {
            match &result {
                Ok(recipes) => debug!(
                    generation,
                    latest = guard.catalog_generation,
                    count = recipes.len(),
                    "dropping stale catalog response"
                ),
                Err(err) => debug!(generation, "stale catalog request failed: {err:#}"),
            }
            return Ok(RefreshOutcome::Stale);
        }

        match result {
            Ok(recipes) => {
                guard.recipes = recipes.clone();
                drop(guard);
                let count = recipes.len();
                let _ = self
                    .events
                    .send(ClientEvent::CatalogUpdated { generation, recipes });
                Ok(RefreshOutcome::Applied(count))
            }
            Err(err) => {
                drop(guard);
                error!("error fetching recipes: {err:#}");
                let _ = self
                    .events
                    .send(ClientEvent::Error(format!("error fetching recipes: {err}")));
                Err(err)
            }
        }
    }

    pub async fn update_filters(&self, change: FilterChange) -> Result<Option<RefreshOutcome>> {
        match self.stage_filter_change(change).await {
            Some(ticket) => Ok(Some(self.execute_catalog(ticket).await?)),
            None => Ok(None),
        }
    }

    pub async fn refresh_catalog(&self) -> Result<RefreshOutcome> {
        let ticket = self.stage_refresh().await;
        self.execute_catalog(ticket).await
    }

    pub async fn add_to_planned_meal(&self, recipe: &Recipe) -> Result<()> {
        if let Err(err) = self.api.add_planned_meal(recipe).await {
            error!(recipe_id = %recipe.id, "error adding to planned meal: {err:#}");
            let _ = self
                .events
                .send(ClientEvent::Error(format!("error adding to planned meal: {err}")));
            return Err(err);
        }
        info!(recipe_id = %recipe.id, title = %recipe.title, "added recipe to planned meal");
        let _ = self
            .events
            .send(ClientEvent::PlannedMealAdded(recipe.clone()));
        Ok(())
    }

    /// Adds a recipe from the currently rendered catalog.
    pub async fn add_to_planned_meal_by_id(&self, recipe_id: &RecipeId) -> Result<Recipe> {
        let recipe = self
            .inner
            .lock()
            .await
            .recipes
            .iter()
            .find(|recipe| recipe.id == *recipe_id)
            .cloned()
            .ok_or_else(|| ClientError::UnknownRecipe(recipe_id.to_string()))?;

        self.add_to_planned_meal(&recipe).await?;
        Ok(recipe)
    }

    pub async fn load_planned_meals(&self) -> Result<RefreshOutcome> {
        let (generation, removals_seen) = {
            let mut guard = self.inner.lock().await;
            guard.planned_generation += 1;
            guard.planned_loads_in_flight += 1;
            (guard.planned_generation, guard.removed_during_loads.len())
        };
        let result = self.api.list_planned_meals().await;

        let mut guard = self.inner.lock().await;
        guard.planned_loads_in_flight = guard.planned_loads_in_flight.saturating_sub(1);
        let removed = guard
            .removed_during_loads
            .get(removals_seen..)
            .map(<[PlannedMealId]>::to_vec)
            .unwrap_or_default();
        if guard.planned_loads_in_flight == 0 {
            guard.removed_during_loads.clear();
        }

        if guard.planned_generation != generation {
            match &result {
                Ok(planned) => debug!(
                    generation,
                    latest = guard.planned_generation,
                    count = planned.len(),
                    "dropping stale planned meal response"
                ),
                Err(err) => debug!(generation, "stale planned meal request failed: {err:#}"),
            }
            return Ok(RefreshOutcome::Stale);
        }

        match result {
            Ok(mut planned) => {
                // The snapshot may predate deletions confirmed since it was requested.
                planned.retain(|meal| !removed.contains(&meal.id));
                guard.planned_meals = planned.clone();
                drop(guard);
                let count = planned.len();
                let _ = self.events.send(ClientEvent::PlannedMealsUpdated(planned));
                Ok(RefreshOutcome::Applied(count))
            }
            Err(err) => {
                drop(guard);
                error!("error fetching planned meals: {err:#}");
                let _ = self
                    .events
                    .send(ClientEvent::Error(format!("error fetching planned meals: {err}")));
                Err(err)
            }
        }
    }

    /// Removes a planned meal locally once the server has confirmed the
    /// deletion; the list is untouched on failure.
    pub async fn remove_planned_meal(&self, id: &PlannedMealId) -> Result<()> {
        if let Err(err) = self.api.remove_planned_meal(id).await {
            error!(planned_meal_id = %id, "error removing from planned meals: {err:#}");
            let _ = self.events.send(ClientEvent::Error(format!(
                "error removing from planned meals: {err}"
            )));
            return Err(err);
        }

        let remaining = {
            let mut guard = self.inner.lock().await;
            if guard.planned_loads_in_flight > 0 {
                guard.removed_during_loads.push(id.clone());
            }
            guard.planned_meals.retain(|meal| meal.id != *id);
            guard.planned_meals.clone()
        };
        info!(planned_meal_id = %id, remaining = remaining.len(), "removed planned meal");
        let _ = self
            .events
            .send(ClientEvent::PlannedMealsUpdated(remaining));
        Ok(())
    }
}

fn issue_catalog_ticket(state: &mut PlannerState) -> CatalogTicket {
    state.catalog_generation += 1;
    CatalogTicket {
        generation: state.catalog_generation,
        query: state.filters.to_query(),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
