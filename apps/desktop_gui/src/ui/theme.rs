use eframe::egui::{self, Color32};

pub const ACCENT: Color32 = Color32::from_rgb(0xF2, 0x8C, 0x28);
pub const ACCENT_DARK: Color32 = Color32::from_rgb(0xC8, 0x6A, 0x10);
pub const CARD_FILL: Color32 = Color32::from_rgb(0xFF, 0xF7, 0xEE);
pub const CARD_STROKE: Color32 = Color32::from_rgb(0xF0, 0xD9, 0xC0);
pub const CHIP_FILL: Color32 = Color32::from_rgb(0xFD, 0xE3, 0xC8);
pub const ERROR_TEXT: Color32 = Color32::from_rgb(0xB0, 0x2A, 0x1E);

pub const CARD_WIDTH: f32 = 240.0;
pub const CARD_IMAGE_HEIGHT: f32 = 150.0;
pub const GRID_COLUMNS: usize = 3;

pub fn apply(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals::light());
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(10.0, 4.0);
        style.visuals.selection.bg_fill = ACCENT;
        style.visuals.hyperlink_color = ACCENT_DARK;
        style.visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, ACCENT);
    });
}
