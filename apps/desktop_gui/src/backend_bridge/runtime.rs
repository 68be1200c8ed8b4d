//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{CatalogTicket, ClientEvent, ClientSettings, MealPlannerClient};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::Recipe;
use tokio::sync::broadcast::error::RecvError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::media::{decode_preview_image, PreviewImage};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match MealPlannerClient::new(&settings) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err}"),
                    )));
                    tracing::error!("failed to build recipe api client: {err:#}");
                    return;
                }
            };

            let image_http = match reqwest::Client::builder()
                .timeout(settings.request_timeout())
                .build()
            {
                Ok(http) => http,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: image client: {err}"),
                    )));
                    return;
                }
            };

            forward_client_events(&client, ui_tx.clone());
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Connected to {}",
                settings.api_base_url
            )));

            let ticket = client.stage_refresh().await;
            spawn_catalog_fetch(&client, ticket, &ui_tx);

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::UpdateFilters(change) => {
                        // Staged in arrival order; only the fetches overlap.
                        if let Some(ticket) = client.stage_filter_change(change).await {
                            spawn_catalog_fetch(&client, ticket, &ui_tx);
                        }
                    }
                    BackendCommand::RefreshCatalog => {
                        let ticket = client.stage_refresh().await;
                        spawn_catalog_fetch(&client, ticket, &ui_tx);
                    }
                    BackendCommand::AddToPlannedMeal(recipe) => {
                        let client = Arc::clone(&client);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            if let Err(err) = client.add_to_planned_meal(&recipe).await {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::PlannedMeal,
                                    add_failure_message(&recipe, &err),
                                )));
                            }
                        });
                    }
                    BackendCommand::LoadPlannedMeals => {
                        let client = Arc::clone(&client);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            if let Err(err) = client.load_planned_meals().await {
                                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                                    UiErrorContext::PlannedMeal,
                                    err.to_string(),
                                )));
                            }
                        });
                    }
                    BackendCommand::RemovePlannedMeal(id) => {
                        let client = Arc::clone(&client);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match client.remove_planned_meal(&id).await {
                                Ok(()) => UiEvent::PlannedMealRemoved(id),
                                Err(err) => UiEvent::RemovalFailed {
                                    id,
                                    error: UiError::from_message(
                                        UiErrorContext::PlannedMeal,
                                        err.to_string(),
                                    ),
                                },
                            };
                            let _ = ui_tx.try_send(event);
                        });
                    }
                    BackendCommand::FetchImage { url } => {
                        let http = image_http.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match fetch_image(&http, &url).await {
                                Ok(image) => UiEvent::ImageLoaded { url, image },
                                Err(reason) => {
                                    tracing::debug!(%url, "recipe image unavailable: {reason}");
                                    UiEvent::ImageFailed { url, reason }
                                }
                            };
                            let _ = ui_tx.try_send(event);
                        });
                    }
                }
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

fn spawn_catalog_fetch(
    client: &Arc<MealPlannerClient>,
    ticket: CatalogTicket,
    ui_tx: &Sender<UiEvent>,
) {
    let client = Arc::clone(client);
    let ui_tx = ui_tx.clone();
    tokio::spawn(async move {
        if let Err(err) = client.execute_catalog(ticket).await {
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::Catalog,
                err.to_string(),
            )));
        }
    });
}

fn add_failure_message(recipe: &Recipe, err: &anyhow::Error) -> String {
    format!("Could not add \"{}\": {err}", recipe.display_title())
}

async fn fetch_image(http: &reqwest::Client, url: &str) -> Result<PreviewImage, String> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|err| format!("failed to download image: {err}"))?;
    if !response.status().is_success() {
        return Err(format!("image request returned {}", response.status()));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|err| format!("failed to read image body: {err}"))?;
    tokio::task::spawn_blocking(move || decode_preview_image(&bytes))
        .await
        .map_err(|err| format!("image decode task failed: {err}"))?
}

/// Failures are reported from the command results, so client error events
/// are not forwarded.
fn forward_client_events(client: &Arc<MealPlannerClient>, ui_tx: Sender<UiEvent>) {
    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "ui event forwarder lagged behind client events");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let evt = match event {
                ClientEvent::CatalogUpdated {
                    generation,
                    recipes,
                } => UiEvent::CatalogUpdated {
                    generation,
                    recipes,
                },
                ClientEvent::PlannedMealsUpdated(meals) => UiEvent::PlannedMealsUpdated(meals),
                ClientEvent::PlannedMealAdded(recipe) => UiEvent::PlannedMealAdded {
                    title: recipe.display_title().to_string(),
                },
                ClientEvent::Error(_) => continue,
            };
            let _ = ui_tx.try_send(evt);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use shared::domain::RecipeId;

    #[test]
    fn add_failure_names_untitled_recipes() {
        let recipe = Recipe {
            id: RecipeId::from("r7"),
            title: String::new(),
            image: String::new(),
            recipe_link: String::new(),
            extra: Map::new(),
        };
        let message = add_failure_message(&recipe, &anyhow::anyhow!("server said no"));
        assert_eq!(message, "Could not add \"(untitled)\": server said no");
    }
}
