pub mod canvas;
pub mod image_cache;
pub mod layouts;
pub mod text;

use std::sync::Arc;

use eframe::egui::{self, Color32, FontId};

use crate::animation::{Choreography, Motion, Property, Target};
use crate::parser::{Slide, Template};
use crate::theme::PresentationTheme;

use image_cache::ImageCache;

/// How a slide is put on screen.
#[derive(Clone, Copy)]
pub enum RenderMode<'a> {
    /// Fitted to the container, playing its entrance.
    Full {
        choreography: &'a Choreography,
        elapsed_ms: f64,
        motion: Motion,
    },
    /// Fixed 1/6 scale, every element at rest.
    Thumbnail,
}

/// Everything a layout needs to draw one slide. Layouts work in design units
/// on the 1920×1080 canvas; the stage converts to screen pixels.
pub struct Stage<'a> {
    pub ui: &'a egui::Ui,
    pub theme: &'a PresentationTheme,
    pub images: &'a ImageCache,
    pub canvas: egui::Rect,
    pub scale: f32,
    choreography: &'a Choreography,
    pub elapsed_ms: f64,
    pub motion: Motion,
}

impl<'a> Stage<'a> {
    pub fn px(&self, design: f32) -> f32 {
        design * self.scale
    }

    /// Screen pixels back to design units.
    pub fn design(&self, px: f32) -> f32 {
        if self.scale > 0.0 { px / self.scale } else { 0.0 }
    }

    /// Screen x of a design-space x.
    pub fn x(&self, design: f32) -> f32 {
        self.canvas.left() + design * self.scale
    }

    /// Screen y of a design-space y.
    pub fn y(&self, design: f32) -> f32 {
        self.canvas.top() + design * self.scale
    }

    pub fn pos(&self, x: f32, y: f32) -> egui::Pos2 {
        egui::pos2(self.x(x), self.y(y))
    }

    pub fn rect(&self, x: f32, y: f32, w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.x(x), self.y(y)),
            egui::vec2(self.px(w), self.px(h)),
        )
    }

    pub fn value(&self, target: Target, property: Property) -> f32 {
        self.choreography
            .value(target, property, self.elapsed_ms)
    }

    pub fn opacity(&self, target: Target) -> f32 {
        self.choreography.opacity(target, self.elapsed_ms)
    }

    /// Entrance offset of `target`, in screen pixels.
    pub fn offset(&self, target: Target) -> egui::Vec2 {
        egui::vec2(
            self.px(self.value(target, Property::OffsetX)),
            self.px(self.value(target, Property::OffsetY)),
        )
    }

    pub fn color(&self, color: Color32, opacity: f32) -> Color32 {
        PresentationTheme::with_opacity(color, opacity)
    }

    pub fn display_font(&self, size: f32) -> FontId {
        FontId::new(self.px(size), text::font_family(self.theme.fonts.display))
    }

    pub fn body_font(&self, size: f32) -> FontId {
        FontId::new(self.px(size), text::font_family(self.theme.fonts.body))
    }

    /// Lay out text without a baked-in color; [`Stage::paint`] supplies it.
    pub fn layout(
        &self,
        s: &str,
        font: FontId,
        italics: bool,
        max_width: f32,
    ) -> Arc<egui::Galley> {
        text::layout(
            self.ui,
            s,
            font,
            Color32::PLACEHOLDER,
            italics,
            self.px(max_width),
        )
    }

    /// Paint `galley` for `target` with its entrance offset and opacity
    /// applied. `left`, `width` and `top` are design units.
    #[allow(clippy::too_many_arguments)]
    pub fn paint(
        &self,
        target: Target,
        galley: Arc<egui::Galley>,
        left: f32,
        width: f32,
        top: f32,
        align: text::Align,
        color: Color32,
    ) -> egui::Rect {
        let offset = self.offset(target);
        let color = self.color(color, self.opacity(target));
        text::paint(
            self.ui,
            galley,
            self.x(left) + offset.x,
            self.px(width),
            self.y(top) + offset.y,
            align,
            color,
        )
    }

    /// Draw an image for `target` into `area` (design-space rect already
    /// converted with [`Stage::rect`]), with its entrance applied.
    pub fn image(
        &self,
        target: Target,
        src: &str,
        area: egui::Rect,
        fit: text::Fit,
    ) -> Option<egui::Rect> {
        let grow = self.value(target, Property::Scale);
        let drawn =
            egui::Rect::from_center_size(area.center() + self.offset(target), area.size() * grow);
        let clip = match fit {
            text::Fit::Cover => area,
            text::Fit::Contain => drawn,
        };
        text::draw_image_in_area(
            self.ui,
            self.images,
            src,
            drawn,
            clip,
            fit,
            self.opacity(target),
        )
    }
}

/// Draw `slide` into `container`. Returns the canvas rect it occupied.
pub fn render_slide(
    ui: &mut egui::Ui,
    slide: &Slide,
    theme: &PresentationTheme,
    images: &ImageCache,
    container: egui::Rect,
    mode: RenderMode<'_>,
) -> egui::Rect {
    let settled = Choreography::settled();
    let (scale, canvas, choreography, elapsed_ms, motion) = match mode {
        RenderMode::Full {
            choreography,
            elapsed_ms,
            motion,
        } => {
            let scale = canvas::fit_scale(container.width(), container.height());
            (
                scale,
                canvas::canvas_rect(container, scale),
                choreography,
                elapsed_ms,
                motion,
            )
        }
        RenderMode::Thumbnail => {
            let scale = canvas::THUMBNAIL_SCALE;
            (
                scale,
                canvas::canvas_rect(container, scale),
                &settled,
                0.0,
                Motion::Reduced,
            )
        }
    };

    let mut slide_ui = ui.new_child(
        egui::UiBuilder::new()
            .max_rect(canvas)
            .id_salt(("slide", slide.id.as_str())),
    );
    slide_ui.set_clip_rect(canvas.intersect(ui.clip_rect()));

    let stage = Stage {
        ui: &slide_ui,
        theme,
        images,
        canvas,
        scale,
        choreography,
        elapsed_ms,
        motion,
    };

    let content = &slide.content;
    match slide.template {
        Template::Title => layouts::title::render(&stage, content),
        Template::Section => layouts::section::render(&stage, content),
        Template::Content => layouts::content::render(&stage, content),
        Template::Image => layouts::image::render(&stage, content),
        Template::ImageText => layouts::image_text::render(&stage, content),
        Template::Quote => layouts::quote::render(&stage, content),
        Template::List => layouts::list::render(&stage, content),
        Template::Stat => layouts::stat::render(&stage, content),
        Template::End => layouts::end::render(&stage, content),
    }
    canvas
}

/// Full-bleed background image with a theme-colored scrim on top so slide
/// text stays readable.
pub fn draw_background(
    ui: &egui::Ui,
    theme: &PresentationTheme,
    images: &ImageCache,
    src: &str,
    rect: egui::Rect,
) {
    if text::draw_image_in_area(ui, images, src, rect, rect, text::Fit::Cover, 1.0).is_some() {
        ui.painter().rect_filled(
            rect,
            0.0,
            PresentationTheme::with_opacity(theme.colors.background, 0.72),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::NoteInput;
    use crate::parser::parse_note_to_slides;
    use crate::theme;

    fn sample_slides() -> Vec<Slide> {
        let note: NoteInput =
            serde_yaml::from_str(include_str!("../../../../sample-notes/field-trip.yaml")).unwrap();
        parse_note_to_slides(&note)
    }

    fn with_ui(mut f: impl FnMut(&mut egui::Ui)) {
        let ctx = egui::Context::default();
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| f(ui));
        });
    }

    #[test]
    fn test_every_slide_renders_fitted_to_its_container() {
        let slides = sample_slides();
        let dir = tempfile::tempdir().unwrap();
        let images = ImageCache::new(dir.path().to_path_buf());
        let theme = theme::get_theme(None);
        let container =
            egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(960.0, 540.0));

        with_ui(|ui| {
            for slide in &slides {
                let choreography = Choreography::for_slide(slide, Motion::Full);
                for elapsed_ms in [0.0, 300.0, 10_000.0] {
                    let canvas = render_slide(
                        ui,
                        slide,
                        &theme,
                        &images,
                        container,
                        RenderMode::Full {
                            choreography: &choreography,
                            elapsed_ms,
                            motion: Motion::Full,
                        },
                    );
                    assert_eq!(canvas, container, "slide {}", slide.id);
                }
            }
        });
    }

    #[test]
    fn test_thumbnails_use_the_fixed_scale() {
        let slides = sample_slides();
        let dir = tempfile::tempdir().unwrap();
        let images = ImageCache::new(dir.path().to_path_buf());
        let theme = theme::get_theme(Some("paper"));
        let cell = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(320.0, 180.0));

        with_ui(|ui| {
            for slide in &slides {
                let canvas = render_slide(ui, slide, &theme, &images, cell, RenderMode::Thumbnail);
                assert!(
                    (canvas.width() - 320.0).abs() < 0.01 && (canvas.height() - 180.0).abs() < 0.01,
                    "slide {}: {:?}",
                    slide.id,
                    canvas
                );
            }
        });
    }
}
