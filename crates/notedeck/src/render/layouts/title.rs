use crate::animation::Target;
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::text::{Align, Fit};

use super::{CONTENT_WIDTH, MARGIN, SMALL_SIZE, centered_top};

const TITLE_SIZE: f32 = 104.0;
const SUBTITLE_SIZE: f32 = 44.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;

    // Header image fills the canvas under a scrim.
    if let Some(src) = &content.image {
        let full = stage.canvas;
        if stage.image(Target::Image, src, full, Fit::Cover).is_some() {
            let scrim = stage.color(colors.background, 0.7 * stage.opacity(Target::Image));
            stage.ui.painter().rect_filled(full, 0.0, scrim);
        }
    }

    let heading = content.heading.as_deref().map(|h| {
        stage.layout(
            h,
            stage.display_font(TITLE_SIZE),
            false,
            CONTENT_WIDTH,
        )
    });
    let subheading = content.subheading.as_deref().map(|s| {
        stage.layout(
            s,
            stage.body_font(SUBTITLE_SIZE),
            false,
            CONTENT_WIDTH,
        )
    });
    let meta: Vec<&str> = [content.author.as_deref(), content.date.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let meta = (!meta.is_empty()).then(|| {
        stage.layout(
            &meta.join("  ·  "),
            stage.body_font(SMALL_SIZE),
            false,
            CONTENT_WIDTH,
        )
    });

    let gap = 32.0;
    let mut height = 0.0;
    for galley in [&heading, &subheading, &meta].into_iter().flatten() {
        if height > 0.0 {
            height += gap;
        }
        height += stage.design(galley.rect.height());
    }

    let mut y = centered_top(height, 80.0);
    if let Some(galley) = heading {
        let rect = stage.paint(
            Target::Heading,
            galley,
            MARGIN,
            CONTENT_WIDTH,
            y,
            Align::Left,
            colors.text,
        );
        y += stage.design(rect.height()) + gap;
    }
    if let Some(galley) = subheading {
        let rect = stage.paint(
            Target::Subheading,
            galley,
            MARGIN,
            CONTENT_WIDTH,
            y,
            Align::Left,
            colors.text_muted,
        );
        y += stage.design(rect.height()) + gap;
    }
    if let Some(galley) = meta {
        stage.paint(
            Target::Meta,
            galley,
            MARGIN,
            CONTENT_WIDTH,
            y,
            Align::Left,
            colors.accent,
        );
    }
}
