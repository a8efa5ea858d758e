use eframe::egui::{self, Pos2};

use crate::animation::{Target, quote_words};
use crate::parser::SlideContent;
use crate::render::Stage;
use crate::render::text::{self, Align};

use super::{CONTENT_WIDTH, MARGIN, centered_top};

const QUOTE_SIZE: f32 = 60.0;
const ATTRIBUTION_SIZE: f32 = 34.0;
const QUOTE_WIDTH: f32 = CONTENT_WIDTH * 0.8;
const LINE_GAP: f32 = 14.0;
const ATTRIBUTION_GAP: f32 = 48.0;

pub fn render(stage: &Stage, content: &SlideContent) {
    let colors = &stage.theme.colors;
    let Some(quote) = content.quote.as_deref() else {
        return;
    };

    let quoted = wrap_with_quotes(quote);
    let words = quote_words(&quoted);
    let flow = text::flow_words(
        stage.ui,
        &words,
        stage.display_font(QUOTE_SIZE),
        stage.px(QUOTE_WIDTH),
        stage.px(LINE_GAP),
    );

    let attribution = content.attribution.as_deref().map(|a| {
        stage.layout(
            &clean_attribution(a),
            stage.body_font(ATTRIBUTION_SIZE),
            true,
            QUOTE_WIDTH,
        )
    });

    let quote_height = stage.design(flow.size.y);
    let mut height = quote_height;
    if let Some(g) = &attribution {
        height += ATTRIBUTION_GAP + stage.design(g.rect.height());
    }

    let top = centered_top(height, 100.0);
    let quote_left = MARGIN + (CONTENT_WIDTH - stage.design(flow.size.x)) / 2.0;

    // Accent bar spanning the quote text.
    let bar = egui::Rect::from_min_size(
        stage.pos(quote_left - 40.0, top),
        egui::vec2(stage.px(6.0), flow.size.y),
    );
    stage.ui.painter().rect_filled(
        bar,
        stage.px(3.0),
        stage.color(colors.accent, stage.opacity(Target::Accent)),
    );

    let origin = stage.pos(quote_left, top);
    for (i, (galley, offset)) in flow.words.into_iter().enumerate() {
        let target = Target::Word(i);
        let opacity = stage.opacity(target);
        if opacity <= 0.0 {
            continue;
        }
        let pos: Pos2 = origin + offset + stage.offset(target);
        stage
            .ui
            .painter()
            .galley(pos, galley, stage.color(colors.text, opacity));
    }

    if let Some(galley) = attribution {
        stage.paint(
            Target::Attribution,
            galley,
            MARGIN,
            CONTENT_WIDTH,
            top + quote_height + ATTRIBUTION_GAP,
            Align::Center,
            colors.text_muted,
        );
    }
}

/// Wrap in curly quotation marks unless the text already carries them.
fn wrap_with_quotes(quote: &str) -> String {
    let trimmed = quote.trim();
    let starts = trimmed.starts_with('\u{201C}') || trimmed.starts_with('"');
    let ends = trimmed.ends_with('\u{201D}') || trimmed.ends_with('"');
    let mut out = String::with_capacity(trimmed.len() + 6);
    if !starts {
        out.push('\u{201C}');
    }
    out.push_str(trimmed);
    if !ends {
        out.push('\u{201D}');
    }
    out
}

fn clean_attribution(attribution: &str) -> String {
    let trimmed = attribution.trim();
    let rest = ["\u{2014}", "\u{2013}", "---", "--", "~", "-"]
        .iter()
        .find_map(|p| trimmed.strip_prefix(p))
        .unwrap_or(trimmed);
    format!("\u{2014} {}", rest.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_with_quotes() {
        assert_eq!(wrap_with_quotes("Go"), "\u{201C}Go\u{201D}");
        assert_eq!(wrap_with_quotes("\"Go\""), "\"Go\"");
        assert_eq!(wrap_with_quotes(" \u{201C}Go "), "\u{201C}Go\u{201D}");
    }

    #[test]
    fn test_quote_marks_keep_word_count() {
        let q = "Stay hungry, stay foolish";
        assert_eq!(quote_words(&wrap_with_quotes(q)).len(), quote_words(q).len());
    }

    #[test]
    fn test_clean_attribution() {
        assert_eq!(clean_attribution("Ada"), "\u{2014} Ada");
        assert_eq!(clean_attribution("-- Ada"), "\u{2014} Ada");
        assert_eq!(clean_attribution("\u{2014}Ada"), "\u{2014} Ada");
        assert_eq!(clean_attribution("~ Ada"), "\u{2014} Ada");
    }
}
