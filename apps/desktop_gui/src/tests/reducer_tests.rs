use super::*;

use crossbeam_channel::{bounded, Receiver};
use serde_json::Map;
use shared::domain::{DietaryTag, MealType, RecipeId};

use crate::controller::events::{UiErrorCategory, UiErrorContext};
use crate::media::PreviewImage;

fn recipe(id: &str, title: &str) -> Recipe {
    Recipe {
        id: RecipeId::from(id),
        title: title.to_string(),
        image: String::new(),
        recipe_link: format!("https://recipes.example/{id}"),
        extra: Map::new(),
    }
}

fn planned(id: &str, title: &str) -> PlannedMeal {
    PlannedMeal {
        id: PlannedMealId::from(id),
        title: title.to_string(),
        image: String::new(),
        recipe_link: String::new(),
        extra: Map::new(),
    }
}

fn queue(capacity: usize) -> (Sender<BackendCommand>, Receiver<BackendCommand>) {
    bounded(capacity)
}

#[test]
fn filter_edits_forward_only_real_changes() {
    let (tx, rx) = queue(8);
    let mut vm = ViewModel::default();

    edit_filters(&mut vm, FilterChange::MealType(Some(MealType::Lunch)), &tx);
    edit_filters(&mut vm, FilterChange::MealType(Some(MealType::Lunch)), &tx);
    edit_filters(&mut vm, FilterChange::ToggleDietary(DietaryTag::Keto), &tx);

    let sent: Vec<_> = rx.try_iter().collect();
    assert_eq!(sent.len(), 2);
    assert!(matches!(
        &sent[0],
        BackendCommand::UpdateFilters(FilterChange::MealType(Some(MealType::Lunch)))
    ));
    assert_eq!(vm.filters.meal_type, Some(MealType::Lunch));
    assert_eq!(vm.filters.dietary, vec![DietaryTag::Keto]);
}

#[test]
fn rejected_filter_edit_rolls_the_mirror_back() {
    let (tx, rx) = queue(1);
    let mut vm = ViewModel::default();

    edit_filters(&mut vm, FilterChange::IngredientDraft("ka".to_string()), &tx);
    edit_filters(&mut vm, FilterChange::IngredientDraft("kale".to_string()), &tx);

    assert_eq!(vm.filters.ingredient_draft, "ka");
    assert!(vm.status.contains("queue is full"));
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn catalog_updates_never_go_backwards() {
    let mut vm = ViewModel::default();
    apply_event(
        &mut vm,
        UiEvent::CatalogUpdated {
            generation: 3,
            recipes: vec![recipe("r3", "Latest")],
        },
    );
    apply_event(
        &mut vm,
        UiEvent::CatalogUpdated {
            generation: 2,
            recipes: vec![recipe("r2", "Older")],
        },
    );

    assert_eq!(vm.catalog_generation, 3);
    assert_eq!(vm.recipes.len(), 1);
    assert_eq!(vm.recipes[0].title, "Latest");
}

#[test]
fn entering_planned_meal_route_reloads_it() {
    let (tx, rx) = queue(4);
    let mut vm = ViewModel::default();

    navigate(&mut vm, Route::PlannedMeal, &tx);
    navigate(&mut vm, Route::Catalog, &tx);
    navigate(&mut vm, Route::PlannedMeal, &tx);

    let sent: Vec<_> = rx.try_iter().collect();
    assert_eq!(sent.len(), 2);
    assert!(sent
        .iter()
        .all(|cmd| matches!(cmd, BackendCommand::LoadPlannedMeals)));
    assert_eq!(vm.route.path(), "/planned-meal");
    assert_eq!(vm.route.nav_label(), "Recipes");
}

#[test]
fn removal_waits_for_confirmation() {
    let (tx, rx) = queue(4);
    let mut vm = ViewModel::default();
    apply_event(
        &mut vm,
        UiEvent::PlannedMealsUpdated(vec![planned("p1", "Soup"), planned("p2", "Salad")]),
    );
    let id = PlannedMealId::from("p1");

    request_removal(&mut vm, &id, &tx);
    request_removal(&mut vm, &id, &tx);
    assert_eq!(rx.try_iter().count(), 1);
    assert_eq!(vm.planned_meals.len(), 2);
    assert!(vm.pending_removals.contains(&id));

    apply_event(&mut vm, UiEvent::PlannedMealRemoved(id.clone()));
    assert!(vm.pending_removals.is_empty());
    assert_eq!(vm.planned_meals, vec![planned("p2", "Salad")]);
}

#[test]
fn failed_removal_keeps_the_entry_and_shows_a_banner() {
    let (tx, _rx) = queue(4);
    let mut vm = ViewModel::default();
    apply_event(&mut vm, UiEvent::PlannedMealsUpdated(vec![planned("p1", "Soup")]));
    let id = PlannedMealId::from("p1");
    request_removal(&mut vm, &id, &tx);

    apply_event(
        &mut vm,
        UiEvent::RemovalFailed {
            id: id.clone(),
            error: UiError::from_message(
                UiErrorContext::PlannedMeal,
                "http://localhost:5000/plannedMeal/p1 returned 500: boom",
            ),
        },
    );

    assert_eq!(vm.planned_meals.len(), 1);
    assert!(vm.pending_removals.is_empty());
    let banner = vm.banner.as_ref().expect("banner");
    assert_eq!(banner.category(), UiErrorCategory::Server);
    assert!(banner.banner_text().starts_with("Planned meal: "));
}

#[test]
fn error_text_is_classified() {
    let transport = UiError::from_message(
        UiErrorContext::Catalog,
        "request to http://localhost:5000/recipes failed: error sending request",
    );
    assert_eq!(transport.category(), UiErrorCategory::Transport);
    assert!(transport.banner_text().contains("recipe API running"));

    let decode = UiError::from_message(
        UiErrorContext::Catalog,
        "invalid response payload from http://localhost:5000/recipes: expected value",
    );
    assert_eq!(decode.category(), UiErrorCategory::Validation);

    let other = UiError::from_message(UiErrorContext::General, "something odd");
    assert_eq!(other.category(), UiErrorCategory::Unknown);
    assert_eq!(other.context(), UiErrorContext::General);
}

#[test]
fn successful_catalog_clears_a_stale_banner() {
    let mut vm = ViewModel::default();
    apply_event(
        &mut vm,
        UiEvent::Error(UiError::from_message(UiErrorContext::Catalog, "request to x failed")),
    );
    assert!(vm.banner.is_some());

    apply_event(
        &mut vm,
        UiEvent::CatalogUpdated {
            generation: 1,
            recipes: Vec::new(),
        },
    );
    assert!(vm.banner.is_none());
    assert_eq!(vm.status, "0 recipes");
}

#[test]
fn images_are_requested_once_and_handed_over_once() {
    let (tx, rx) = queue(4);
    let mut vm = ViewModel::default();
    let url = "https://img.example/soup.jpg";

    request_image(&mut vm, url, &tx);
    request_image(&mut vm, url, &tx);
    request_image(&mut vm, "  ", &tx);
    let sent: Vec<_> = rx.try_iter().collect();
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], BackendCommand::FetchImage { url: sent_url } if sent_url == url));
    assert!(take_ready_image(&mut vm, url).is_none());

    let image = PreviewImage {
        width: 1,
        height: 1,
        rgba: vec![0, 0, 0, 255],
    };
    apply_event(
        &mut vm,
        UiEvent::ImageLoaded {
            url: url.to_string(),
            image: image.clone(),
        },
    );
    assert_eq!(take_ready_image(&mut vm, url), Some(image));
    assert_eq!(take_ready_image(&mut vm, url), None);
    assert_eq!(vm.images.get(url), Some(&ImageState::Uploaded));
}

#[test]
fn failed_images_are_not_retried() {
    let (tx, rx) = queue(4);
    let mut vm = ViewModel::default();
    let url = "https://img.example/missing.jpg";
    request_image(&mut vm, url, &tx);
    apply_event(
        &mut vm,
        UiEvent::ImageFailed {
            url: url.to_string(),
            reason: "image request returned 404 Not Found".to_string(),
        },
    );
    request_image(&mut vm, url, &tx);

    assert_eq!(rx.try_iter().count(), 1);
    assert_eq!(vm.images.get(url), Some(&ImageState::Failed));
}
