//! Filter controls and meal cards. Widgets render from a snapshot and report
//! what the user asked for; the app folds those requests into the view model.

use client_core::{FilterChange, FilterState};
use eframe::egui;
use shared::domain::{DietaryTag, MealType};

use crate::ui::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    ViewRecipe,
    Primary,
}

pub fn filter_bar(ui: &mut egui::Ui, filters: &FilterState) -> Vec<FilterChange> {
    let mut changes = Vec::new();

    ui.horizontal_wrapped(|ui| {
        let mut meal_type = filters.meal_type;
        egui::ComboBox::from_id_salt("meal_type_filter")
            .selected_text(meal_type.map_or("All", MealType::as_str))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut meal_type, None, "All");
                for option in MealType::ALL {
                    ui.selectable_value(&mut meal_type, Some(option), option.as_str());
                }
            });
        if meal_type != filters.meal_type {
            changes.push(FilterChange::MealType(meal_type));
        }

        let dietary_label = if filters.dietary.is_empty() {
            "Dietary".to_string()
        } else {
            format!("Dietary ({})", filters.dietary.len())
        };
        ui.menu_button(dietary_label, |ui| {
            for tag in DietaryTag::ALL {
                let mut checked = filters.is_selected(tag);
                if ui.checkbox(&mut checked, tag.as_str()).changed() {
                    changes.push(FilterChange::ToggleDietary(tag));
                }
            }
        });

        let mut draft = filters.ingredient_draft.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut draft)
                .hint_text("Search by Ingredient/Dish")
                .desired_width(220.0),
        );
        if response.changed() {
            changes.push(FilterChange::IngredientDraft(draft));
        }
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Add Ingredient").clicked() || submitted {
            changes.push(FilterChange::AddIngredient);
            if submitted {
                response.request_focus();
            }
        }

        if *filters != FilterState::default() && ui.small_button("Clear filters").clicked() {
            changes.push(FilterChange::Clear);
        }
    });

    if !filters.ingredients.is_empty() {
        ui.horizontal_wrapped(|ui| {
            for ingredient in &filters.ingredients {
                if let Some(change) = ingredient_chip(ui, ingredient) {
                    changes.push(change);
                }
            }
        });
    }

    changes
}

fn ingredient_chip(ui: &mut egui::Ui, ingredient: &str) -> Option<FilterChange> {
    let mut removed = false;
    egui::Frame::new()
        .fill(theme::CHIP_FILL)
        .corner_radius(12)
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(ingredient);
                removed = ui.small_button("✕").on_hover_text("Remove").clicked();
            });
        });
    removed.then(|| FilterChange::RemoveIngredient(ingredient.to_string()))
}

pub fn meal_card(
    ui: &mut egui::Ui,
    title: &str,
    image: Option<&egui::TextureHandle>,
    primary_label: &str,
    busy: bool,
) -> Option<CardAction> {
    let mut action = None;
    egui::Frame::new()
        .fill(theme::CARD_FILL)
        .stroke(egui::Stroke::new(1.0, theme::CARD_STROKE))
        .corner_radius(8)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(theme::CARD_WIDTH);
            ui.vertical(|ui| {
                let image_size = egui::vec2(theme::CARD_WIDTH, theme::CARD_IMAGE_HEIGHT);
                match image {
                    Some(texture) => {
                        ui.add(egui::Image::new(texture).fit_to_exact_size(image_size));
                    }
                    None => {
                        let (rect, _) = ui.allocate_exact_size(image_size, egui::Sense::hover());
                        ui.painter().rect_filled(rect, 6.0, theme::CARD_STROKE);
                    }
                }

                ui.label(egui::RichText::new(title).strong().size(16.0));

                ui.horizontal(|ui| {
                    if ui.button("View Recipe").clicked() {
                        action = Some(CardAction::ViewRecipe);
                    }
                    let label = egui::RichText::new(primary_label).color(egui::Color32::WHITE);
                    let button = egui::Button::new(label).fill(theme::ACCENT);
                    if ui.add_enabled(!busy, button).clicked() {
                        action = Some(CardAction::Primary);
                    }
                    if busy {
                        ui.spinner();
                    }
                });
            });
        });
    action
}
