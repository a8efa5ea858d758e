use crate::animation::Target;
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::text::Align;

use super::{CONTENT_WIDTH, MARGIN, SMALL_SIZE, centered_top};

const THANKS_SIZE: f32 = 88.0;
const AUTHOR_SIZE: f32 = 40.0;
const GAP: f32 = 36.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;

    let heading = content
        .heading
        .as_deref()
        .map(|h| stage.layout(h, stage.display_font(THANKS_SIZE), false, CONTENT_WIDTH));
    let author = content
        .author
        .as_deref()
        .map(|a| stage.layout(a, stage.body_font(AUTHOR_SIZE), false, CONTENT_WIDTH));
    let url = content
        .url
        .as_deref()
        .map(|u| stage.layout(u, stage.body_font(SMALL_SIZE), false, CONTENT_WIDTH));

    let parts = [
        (Target::Heading, heading, colors.text),
        (Target::Meta, author, colors.text_muted),
        (Target::Url, url, colors.accent),
    ];

    let mut height = 0.0;
    for galley in parts.iter().filter_map(|(_, g, _)| g.as_ref()) {
        if height > 0.0 {
            height += GAP;
        }
        height += stage.design(galley.rect.height());
    }

    let mut y = centered_top(height, 80.0);
    for (target, galley, color) in parts {
        let Some(galley) = galley else { continue };
        let rect = stage.paint(target, galley, MARGIN, CONTENT_WIDTH, y, Align::Center, color);
        y += stage.design(rect.height()) + GAP;
    }
}
