use crate::animation::counter::parse_stat_value;
use crate::animation::{Property, Target};
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::text::Align;

use super::{CONTENT_WIDTH, MARGIN, centered_top};

const VALUE_SIZE: f32 = 220.0;
const LABEL_SIZE: f32 = 48.0;
const LABEL_GAP: f32 = 24.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;
    let Some(raw) = content.stat_value.as_deref() else {
        return;
    };

    // Lay out the settled value once so the block doesn't move while counting.
    let value = parse_stat_value(raw);
    let settled = stage.layout(
        &value.display(f64::INFINITY, stage.motion),
        stage.display_font(VALUE_SIZE),
        false,
        CONTENT_WIDTH,
    );
    let value_height = stage.design(settled.rect.height());

    let label = content
        .stat_label
        .as_deref()
        .map(|l| stage.layout(l, stage.body_font(LABEL_SIZE), false, CONTENT_WIDTH));
    let mut height = value_height;
    if let Some(g) = &label {
        height += LABEL_GAP + stage.design(g.rect.height());
    }
    let top = centered_top(height, 80.0);

    let grow = stage.value(Target::Value, Property::Scale);
    let current = stage.layout(
        &value.display(stage.elapsed_ms, stage.motion),
        stage.display_font(VALUE_SIZE * grow),
        false,
        CONTENT_WIDTH,
    );
    let current_top = top + (value_height - stage.design(current.rect.height())) / 2.0;
    stage.paint(
        Target::Value,
        current,
        MARGIN,
        CONTENT_WIDTH,
        current_top,
        Align::Center,
        colors.accent,
    );

    if let Some(galley) = label {
        stage.paint(
            Target::Label,
            galley,
            MARGIN,
            CONTENT_WIDTH,
            top + value_height + LABEL_GAP,
            Align::Center,
            colors.text_muted,
        );
    }
}
