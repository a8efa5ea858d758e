use eframe::egui;

/// Slides are laid out on a fixed virtual canvas and scaled to fit.
pub const DESIGN_WIDTH: f32 = 1920.0;
pub const DESIGN_HEIGHT: f32 = 1080.0;

/// Fixed scale for overview thumbnails (320×180).
pub const THUMBNAIL_SCALE: f32 = 1.0 / 6.0;

/// Largest scale at which the whole canvas fits in `width`×`height`. Never
/// enlarges past the design size.
pub fn fit_scale(width: f32, height: f32) -> f32 {
    if !(width > 0.0 && height > 0.0) {
        return 0.0;
    }
    (width / DESIGN_WIDTH).min(height / DESIGN_HEIGHT).min(1.0)
}

pub fn canvas_size(scale: f32) -> egui::Vec2 {
    egui::vec2(DESIGN_WIDTH * scale, DESIGN_HEIGHT * scale)
}

/// The scaled canvas, centered in `container`.
pub fn canvas_rect(container: egui::Rect, scale: f32) -> egui::Rect {
    egui::Rect::from_center_size(container.center(), canvas_size(scale))
}
