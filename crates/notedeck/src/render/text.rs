use std::sync::Arc;

use eframe::egui::{self, Color32, FontFamily, FontId, Pos2, Stroke};

use crate::render::image_cache::ImageCache;

/// Map a theme font token onto a registered egui family.
pub fn font_family(token: &str) -> FontFamily {
    match token {
        "mono" => FontFamily::Monospace,
        _ => FontFamily::Proportional,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Lay out `text` wrapped at `max_width` screen pixels. Pass
/// `Color32::PLACEHOLDER` to pick the color when painting.
pub fn layout(
    ui: &egui::Ui,
    text: &str,
    font: FontId,
    color: Color32,
    italics: bool,
    max_width: f32,
) -> Arc<egui::Galley> {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width.max(1.0);
    job.append(
        text,
        0.0,
        egui::text::TextFormat {
            font_id: font,
            color,
            italics,
            ..Default::default()
        },
    );
    ui.painter().layout_job(job)
}

/// Paint a galley so its visible rect starts at `top` and is aligned within
/// `[left, left + width]`. Returns the painted rect.
pub fn paint(
    ui: &egui::Ui,
    galley: Arc<egui::Galley>,
    left: f32,
    width: f32,
    top: f32,
    align: Align,
    color: Color32,
) -> egui::Rect {
    let size = galley.rect.size();
    let x = match align {
        Align::Left => left,
        Align::Center => left + (width - size.x) / 2.0,
    };
    let min = Pos2::new(x, top);
    let origin = min - galley.rect.min.to_vec2();
    ui.painter().galley(origin, galley, color);
    egui::Rect::from_min_size(min, size)
}

/// Words laid out one galley each so they can be faded independently.
pub struct WordFlow {
    pub words: Vec<(Arc<egui::Galley>, egui::Vec2)>,
    pub size: egui::Vec2,
}

/// Flow `words` into centered lines no wider than `max_width`. Offsets are
/// relative to the top-left of the block. Galleys carry no color of their own.
pub fn flow_words(
    ui: &egui::Ui,
    words: &[&str],
    font: FontId,
    max_width: f32,
    line_gap: f32,
) -> WordFlow {
    let space = font.size * 0.3;
    let galleys: Vec<Arc<egui::Galley>> = words
        .iter()
        .map(|w| {
            ui.painter()
                .layout_no_wrap(w.to_string(), font.clone(), Color32::PLACEHOLDER)
        })
        .collect();

    let mut lines: Vec<Vec<usize>> = vec![Vec::new()];
    let mut line_width = 0.0;
    for (i, galley) in galleys.iter().enumerate() {
        let w = galley.rect.width();
        let wraps =
            lines.last().is_some_and(|l| !l.is_empty()) && line_width + space + w > max_width;
        if wraps {
            lines.push(Vec::new());
            line_width = 0.0;
        }
        if let Some(line) = lines.last_mut() {
            if !line.is_empty() {
                line_width += space;
            }
            line_width += w;
            line.push(i);
        }
    }

    let line_height = galleys
        .iter()
        .map(|g| g.rect.height())
        .fold(font.size, f32::max);
    let mut offsets = vec![egui::Vec2::ZERO; galleys.len()];
    let line_widths: Vec<f32> = lines
        .iter()
        .map(|line| {
            let words: f32 = line.iter().map(|&i| galleys[i].rect.width()).sum();
            words + space * line.len().saturating_sub(1) as f32
        })
        .collect();
    let widest = line_widths.iter().copied().fold(0.0, f32::max);
    for (row, line) in lines.iter().enumerate() {
        let mut x = (widest - line_widths[row]) / 2.0;
        let y = row as f32 * (line_height + line_gap);
        for &i in line {
            offsets[i] = egui::vec2(x - galleys[i].rect.min.x, y - galleys[i].rect.min.y);
            x += galleys[i].rect.width() + space;
        }
    }

    let rows = lines.iter().filter(|l| !l.is_empty()).count();
    let height = if rows == 0 {
        0.0
    } else {
        rows as f32 * line_height + (rows - 1) as f32 * line_gap
    };
    WordFlow {
        words: galleys.into_iter().zip(offsets).collect(),
        size: egui::vec2(widest, height),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Whole image visible, letterboxed.
    Contain,
    /// Fill the area, cropping the overflow.
    Cover,
}

/// Draw an image into `available`, clipped to `clip`. Returns the visible
/// rect, or `None` when the image couldn't be loaded and was left out.
pub fn draw_image_in_area(
    ui: &egui::Ui,
    images: &ImageCache,
    src: &str,
    available: egui::Rect,
    clip: egui::Rect,
    fit: Fit,
    opacity: f32,
) -> Option<egui::Rect> {
    let texture = images.get_or_load(ui, src)?;
    let draw_rect = compute_image_rect(fit, texture.size_vec2(), available);
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
    let tint = Color32::from_rgba_unmultiplied(255, 255, 255, alpha);
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    let clip = clip.intersect(ui.clip_rect());
    ui.painter()
        .with_clip_rect(clip)
        .image(texture.id(), draw_rect, uv, tint);
    Some(draw_rect.intersect(clip))
}

pub fn compute_image_rect(fit: Fit, tex_size: egui::Vec2, available: egui::Rect) -> egui::Rect {
    if tex_size.x <= 0.0 || tex_size.y <= 0.0 {
        return available;
    }
    let scale = match fit {
        Fit::Contain => (available.width() / tex_size.x).min(available.height() / tex_size.y),
        Fit::Cover => (available.width() / tex_size.x).max(available.height() / tex_size.y),
    };
    egui::Rect::from_center_size(available.center(), tex_size * scale)
}

/// A short horizontal accent rule, drawn left to right up to `reveal`.
pub fn draw_rule(
    ui: &egui::Ui,
    start: Pos2,
    length: f32,
    thickness: f32,
    reveal: f32,
    color: Color32,
) {
    let end = Pos2::new(start.x + length * reveal.clamp(0.0, 1.0), start.y);
    if end.x > start.x {
        ui.painter()
            .line_segment([start, end], Stroke::new(thickness, color));
    }
}
