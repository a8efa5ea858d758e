use crate::animation::Target;
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::text::{Align, Fit};

use super::{BODY_SIZE, CONTENT_WIDTH, HEADING_SIZE, MARGIN, centered_top};

const IMAGE_SIZE: f32 = 840.0;
const IMAGE_TOP: f32 = 120.0;
const COLUMN_LEFT: f32 = MARGIN + IMAGE_SIZE + 80.0;
const COLUMN_WIDTH: f32 = MARGIN + CONTENT_WIDTH - COLUMN_LEFT;
const HEADING_GAP: f32 = 36.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;

    let area = stage.rect(MARGIN, IMAGE_TOP, IMAGE_SIZE, IMAGE_SIZE);
    let has_image = content
        .image
        .as_deref()
        .and_then(|src| stage.image(Target::Image, src, area, Fit::Cover))
        .is_some();

    // Without a picture the text takes the whole width.
    let (left, width) = if has_image {
        (COLUMN_LEFT, COLUMN_WIDTH)
    } else {
        (MARGIN, CONTENT_WIDTH)
    };

    let heading = content.heading.as_deref().map(|h| {
        stage.layout(h, stage.display_font(HEADING_SIZE * 0.875), false, width)
    });
    let body = content
        .body
        .as_deref()
        .map(|b| stage.layout(b, stage.body_font(BODY_SIZE * 0.9), false, width));

    let mut height = 0.0;
    if let Some(g) = &heading {
        height += stage.design(g.rect.height()) + HEADING_GAP;
    }
    if let Some(g) = &body {
        height += stage.design(g.rect.height());
    }

    let mut y = centered_top(height, IMAGE_TOP);
    if let Some(galley) = heading {
        let rect = stage.paint(Target::Heading, galley, left, width, y, Align::Left, colors.accent);
        y += stage.design(rect.height()) + HEADING_GAP;
    }
    if let Some(galley) = body {
        stage.paint(Target::Body, galley, left, width, y, Align::Left, colors.text);
    }
}
