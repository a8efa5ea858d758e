use crate::animation::{Property, Target};
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::canvas::DESIGN_HEIGHT;
use crate::render::text::Align;

use super::{BODY_SIZE, CONTENT_WIDTH, HEADING_SIZE, MARGIN};

const TOP: f32 = 120.0;
const BOTTOM: f32 = 100.0;
const HEADING_GAP: f32 = 56.0;
const ITEM_GAP: f32 = 28.0;
const BULLET_RADIUS: f32 = 10.0;
const TEXT_INDENT: f32 = 56.0;
const MIN_ITEM_SIZE: f32 = 24.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;
    let mut y = TOP;

    if let Some(heading) = content.heading.as_deref() {
        let galley = stage.layout(heading, stage.display_font(HEADING_SIZE), false, CONTENT_WIDTH);
        let rect = stage.paint(
            Target::Heading,
            galley,
            MARGIN,
            CONTENT_WIDTH,
            y,
            Align::Left,
            colors.accent,
        );
        y += stage.design(rect.height()) + HEADING_GAP;
    }

    let item_width = CONTENT_WIDTH - TEXT_INDENT;
    let available = DESIGN_HEIGHT - BOTTOM - y;

    // Long lists shrink their text until they fit.
    let mut size = BODY_SIZE;
    let mut galleys = layout_items(stage, &content.items, size, item_width);
    let needed = items_height(stage, &galleys);
    if needed > available && needed > 0.0 {
        size = (BODY_SIZE * available / needed).max(MIN_ITEM_SIZE);
        galleys = layout_items(stage, &content.items, size, item_width);
    }
    let gap = ITEM_GAP * size / BODY_SIZE;

    for (i, galley) in galleys.into_iter().enumerate() {
        let height = stage.design(galley.rect.height());
        let first_line = (size * 1.25).min(height);

        let grow = stage.value(Target::Bullet(i), Property::Scale).max(0.0);
        if grow > 0.0 {
            let center = stage.pos(MARGIN + BULLET_RADIUS, y + first_line / 2.0);
            stage.ui.painter().circle_filled(
                center,
                stage.px(BULLET_RADIUS * size / BODY_SIZE) * grow,
                colors.accent,
            );
        }

        stage.paint(
            Target::Item(i),
            galley,
            MARGIN + TEXT_INDENT,
            item_width,
            y,
            Align::Left,
            colors.text,
        );
        y += height + gap;
    }
}

fn layout_items(
    stage: &Stage,
    items: &[String],
    size: f32,
    width: f32,
) -> Vec<std::sync::Arc<eframe::egui::Galley>> {
    items
        .iter()
        .map(|item| stage.layout(item, stage.body_font(size), false, width))
        .collect()
}

fn items_height(stage: &Stage, galleys: &[std::sync::Arc<eframe::egui::Galley>]) -> f32 {
    let text: f32 = galleys.iter().map(|g| stage.design(g.rect.height())).sum();
    text + ITEM_GAP * galleys.len().saturating_sub(1) as f32
}
