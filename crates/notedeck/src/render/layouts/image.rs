use crate::animation::Target;
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::canvas::{DESIGN_HEIGHT, DESIGN_WIDTH};
use crate::render::text::{Align, Fit};

use super::{CONTENT_WIDTH, MARGIN};

const CAPTION_SIZE: f32 = 30.0;
const TOP: f32 = 80.0;
const CAPTION_GAP: f32 = 32.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;

    let caption = content.caption.as_deref().map(|c| {
        stage.layout(c, stage.body_font(CAPTION_SIZE), true, CONTENT_WIDTH)
    });
    let caption_height = caption
        .as_ref()
        .map_or(0.0, |g| stage.design(g.rect.height()) + CAPTION_GAP);

    let image_height = DESIGN_HEIGHT - 2.0 * TOP - caption_height;
    let area = stage.rect(MARGIN, TOP, DESIGN_WIDTH - 2.0 * MARGIN, image_height);
    let drawn = content
        .image
        .as_deref()
        .and_then(|src| stage.image(Target::Image, src, area, Fit::Contain));

    if let Some(galley) = caption {
        // Sit under the picture, or where it would have been.
        let top = drawn.map_or(TOP + image_height, |r| {
            stage.design(r.bottom() - stage.canvas.top())
        });
        stage.paint(
            Target::Caption,
            galley,
            MARGIN,
            CONTENT_WIDTH,
            top + CAPTION_GAP,
            Align::Center,
            colors.text_muted,
        );
    }
}
