use std::{collections::HashMap, time::Duration};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::UiEvent,
    reducer::{self, Route, ViewModel},
};
use crate::ui::{
    theme,
    widgets::{self, CardAction},
};

pub struct FeastBlissApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    vm: ViewModel,
    textures: HashMap<String, egui::TextureHandle>,
}

impl FeastBlissApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        theme::apply(&cc.egui_ctx);
        Self {
            cmd_tx,
            ui_rx,
            vm: ViewModel {
                status: "Loading recipes...".to_string(),
                ..ViewModel::default()
            },
            textures: HashMap::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            reducer::apply_event(&mut self.vm, event);
        }
    }

    /// Requests missing card images and uploads any that finished decoding.
    fn sync_images(&mut self, ctx: &egui::Context, urls: Vec<String>) {
        for url in urls {
            reducer::request_image(&mut self.vm, &url, &self.cmd_tx);
            if let Some(image) = reducer::take_ready_image(&mut self.vm, &url) {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width, image.height],
                    &image.rgba,
                );
                let texture =
                    ctx.load_texture(format!("card:{url}"), color_image, egui::TextureOptions::LINEAR);
                self.textures.insert(url, texture);
            }
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(
                egui::Frame::new()
                    .fill(theme::ACCENT)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("FeastBliss")
                            .size(22.0)
                            .strong()
                            .color(egui::Color32::WHITE),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let target = self.vm.route.other();
                        if ui.button(self.vm.route.nav_label()).clicked() {
                            reducer::navigate(&mut self.vm, target, &self.cmd_tx);
                        }
                    });
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if let Some(banner) = &self.vm.banner {
                let mut dismissed = false;
                ui.horizontal(|ui| {
                    ui.colored_label(theme::ERROR_TEXT, banner.banner_text());
                    dismissed = ui.small_button("✕").clicked();
                });
                if dismissed {
                    self.vm.banner = None;
                }
            }
            ui.horizontal(|ui| {
                ui.label(self.vm.route.path());
                ui.separator();
                ui.label(&self.vm.status);
            });
        });
    }

    fn show_catalog(&mut self, ui: &mut egui::Ui) {
        for change in widgets::filter_bar(ui, &self.vm.filters) {
            reducer::edit_filters(&mut self.vm, change, &self.cmd_tx);
        }
        ui.separator();

        if self.vm.recipes.is_empty() {
            ui.label("No recipes match these filters.");
            return;
        }

        let urls = self.vm.recipes.iter().map(|r| r.image.clone()).collect();
        self.sync_images(ui.ctx(), urls);

        let mut requested = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                egui::Grid::new("recipe_grid")
                    .num_columns(theme::GRID_COLUMNS)
                    .spacing([12.0, 12.0])
                    .show(ui, |ui| {
                        for (index, recipe) in self.vm.recipes.iter().enumerate() {
                            let action = widgets::meal_card(
                                ui,
                                recipe.display_title(),
                                self.textures.get(&recipe.image),
                                "Add to Planned Meal",
                                false,
                            );
                            if let Some(action) = action {
                                requested = Some((index, action));
                            }
                            if (index + 1) % theme::GRID_COLUMNS == 0 {
                                ui.end_row();
                            }
                        }
                    });
            });

        let Some((index, action)) = requested else {
            return;
        };
        let Some(recipe) = self.vm.recipes.get(index).cloned() else {
            return;
        };
        match action {
            CardAction::ViewRecipe => open_link(ui.ctx(), &recipe.recipe_link),
            CardAction::Primary => reducer::add_to_planned_meal(&mut self.vm, &recipe, &self.cmd_tx),
        }
    }

    fn show_planned_meals(&mut self, ui: &mut egui::Ui) {
        ui.heading("Planned Meal");
        ui.separator();

        if self.vm.planned_meals.is_empty() {
            ui.label("No planned meals yet. Add some from the recipe list.");
            return;
        }

        let urls = self.vm.planned_meals.iter().map(|m| m.image.clone()).collect();
        self.sync_images(ui.ctx(), urls);

        let mut requested = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                egui::Grid::new("planned_grid")
                    .num_columns(theme::GRID_COLUMNS)
                    .spacing([12.0, 12.0])
                    .show(ui, |ui| {
                        for (index, meal) in self.vm.planned_meals.iter().enumerate() {
                            let busy = self.vm.pending_removals.contains(&meal.id);
                            let action = widgets::meal_card(
                                ui,
                                meal.display_title(),
                                self.textures.get(&meal.image),
                                "Remove",
                                busy,
                            );
                            if let Some(action) = action {
                                requested = Some((index, action));
                            }
                            if (index + 1) % theme::GRID_COLUMNS == 0 {
                                ui.end_row();
                            }
                        }
                    });
            });

        let Some((index, action)) = requested else {
            return;
        };
        let Some(meal) = self.vm.planned_meals.get(index).cloned() else {
            return;
        };
        match action {
            CardAction::ViewRecipe => open_link(ui.ctx(), &meal.recipe_link),
            CardAction::Primary => reducer::request_removal(&mut self.vm, &meal.id, &self.cmd_tx),
        }
    }
}

fn open_link(ctx: &egui::Context, link: &str) {
    if link.trim().is_empty() {
        tracing::debug!("recipe has no link to open");
        return;
    }
    ctx.open_url(egui::OpenUrl::new_tab(link));
}

impl eframe::App for FeastBlissApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| match self.vm.route {
            Route::Catalog => self.show_catalog(ui),
            Route::PlannedMeal => self.show_planned_meals(ui),
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
