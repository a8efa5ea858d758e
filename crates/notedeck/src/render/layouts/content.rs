use crate::animation::Target;
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::text::Align;

use super::{BODY_SIZE, HEADING_SIZE, MARGIN, centered_top};

/// Comfortable reading measure for body text.
const MEASURE: f32 = 1400.0;
const HEADING_GAP: f32 = 48.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;

    let heading = content.heading.as_deref().map(|h| {
        stage.layout(h, stage.display_font(HEADING_SIZE), false, MEASURE)
    });
    let body = content
        .body
        .as_deref()
        .map(|b| stage.layout(b, stage.body_font(BODY_SIZE), false, MEASURE));

    let mut height = 0.0;
    if let Some(g) = &heading {
        height += stage.design(g.rect.height()) + HEADING_GAP;
    }
    if let Some(g) = &body {
        height += stage.design(g.rect.height());
    }

    let mut y = centered_top(height, 100.0);
    if let Some(galley) = heading {
        let rect = stage.paint(
            Target::Heading,
            galley,
            MARGIN,
            MEASURE,
            y,
            Align::Left,
            colors.accent,
        );
        y += stage.design(rect.height()) + HEADING_GAP;
    }
    if let Some(galley) = body {
        stage.paint(Target::Body, galley, MARGIN, MEASURE, y, Align::Left, colors.text);
    }
}
