use crate::animation::{Property, Target};
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::canvas::DESIGN_WIDTH;
use crate::render::text::{self, Align};

use super::{CONTENT_WIDTH, MARGIN, centered_top};

const SECTION_SIZE: f32 = 96.0;
const RULE_LENGTH: f32 = 160.0;
const RULE_THICKNESS: f32 = 6.0;
const RULE_GAP: f32 = 48.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;
    let Some(heading) = content.heading.as_deref() else {
        return;
    };

    // The entrance scale is applied through the font size so wrapping stays
    // consistent with the settled layout.
    let grow = stage.value(Target::Heading, Property::Scale);
    let galley = stage.layout(
        heading,
        stage.display_font(SECTION_SIZE * grow),
        false,
        CONTENT_WIDTH,
    );
    let height = stage.design(galley.rect.height());
    let top = centered_top(height + RULE_GAP, 80.0) + RULE_GAP;

    let reveal = stage.value(Target::Accent, Property::Reveal);
    text::draw_rule(
        stage.ui,
        stage.pos((DESIGN_WIDTH - RULE_LENGTH) / 2.0, top - RULE_GAP),
        stage.px(RULE_LENGTH),
        stage.px(RULE_THICKNESS),
        reveal,
        colors.accent,
    );

    stage.paint(
        Target::Heading,
        galley,
        MARGIN,
        CONTENT_WIDTH,
        top,
        Align::Center,
        colors.text,
    );
}
