//! Block-to-slide classification.
//!
//! Walks the note's blocks in order and assigns every one of them to exactly
//! one slide template. Nothing is dropped: blocks without a dedicated
//! template end up on a content slide.

use std::sync::OnceLock;

use regex::Regex;

use super::markup::Block;
use super::{SlideContent, Template};

/// Content slides accumulate consecutive paragraphs up to this many characters.
pub const CONTENT_BUDGET: usize = 480;

/// Longest paragraph that still pairs with an adjacent image.
pub const SHORT_PARAGRAPH: usize = 280;

/// Longest paragraph that can be read as a statistic.
pub const STAT_MAX_CHARS: usize = 80;

/// Most words a statistic's label may have.
pub const STAT_MAX_LABEL_WORDS: usize = 8;

/// Leading figure (optional currency, digits with separators, optional
/// suffix) followed by a label.
const STAT_PATTERN: &str = r"^(?P<value>[$€£¥]?\d[\d,]*(?:\.\d+)?(?:%|\+|[kKmMbB]\+?|[x×])?)\s+(?P<label>.+)$";

pub type Draft = (Template, SlideContent);

/// Classify body blocks into slide drafts (title and end slides are added by the caller).
pub fn classify(blocks: &[Block]) -> Vec<Draft> {
    let mut c = Classifier::default();
    let mut i = 0;
    while i < blocks.len() {
        let next = blocks.get(i + 1);
        let consumed_next = c.block(&blocks[i], next);
        i += if consumed_next { 2 } else { 1 };
    }
    c.flush();
    c.out
}

/// Split a paragraph into `(value, label)` if it reads like a statistic.
pub fn stat_shape(text: &str) -> Option<(String, String)> {
    static STAT: OnceLock<Regex> = OnceLock::new();
    let re = STAT.get_or_init(|| Regex::new(STAT_PATTERN).expect("valid stat regex"));

    let text = text.trim();
    if text.is_empty() || text.contains('\n') || text.chars().count() > STAT_MAX_CHARS {
        return None;
    }
    let caps = re.captures(text)?;
    let value = caps.name("value")?.as_str();
    let label = caps.name("label")?.as_str().trim();

    // A bare four digit number opens a sentence about a year far more often
    // than it states a figure.
    if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if label.split_whitespace().count() > STAT_MAX_LABEL_WORDS {
        return None;
    }
    if label.ends_with(['.', '!', '?', ':', ';']) {
        return None;
    }
    if !label.chars().any(char::is_alphabetic) {
        return None;
    }
    Some((value.to_string(), label.to_string()))
}

struct Pending {
    heading: Option<String>,
    body: String,
}

#[derive(Default)]
struct Classifier {
    out: Vec<Draft>,
    heading: Option<String>,
    pending: Option<Pending>,
}

fn is_short(text: &str) -> bool {
    text.chars().count() <= SHORT_PARAGRAPH
}

impl Classifier {
    /// Handle one block. Returns true when `next` was consumed as part of it.
    fn block(&mut self, block: &Block, next: Option<&Block>) -> bool {
        match block {
            Block::Heading { text, .. } => {
                self.flush();
                self.heading = Some(text.clone());
                let adjoined = match next {
                    Some(Block::List { items, .. }) => !items.is_empty(),
                    Some(Block::Paragraph { text, emphasized }) => {
                        !*emphasized && stat_shape(text).is_none()
                    }
                    _ => false,
                };
                if !adjoined {
                    self.emit(
                        Template::Section,
                        SlideContent {
                            heading: Some(text.clone()),
                            ..Default::default()
                        },
                    );
                }
                false
            }
            Block::BlockQuote { text, attribution } => {
                self.flush();
                self.emit(
                    Template::Quote,
                    SlideContent {
                        quote: Some(text.clone()),
                        attribution: attribution.clone(),
                        ..Default::default()
                    },
                );
                false
            }
            Block::List { items, .. } => {
                self.flush();
                if items.is_empty() {
                    return false;
                }
                self.emit(
                    Template::List,
                    SlideContent {
                        heading: self.heading.clone(),
                        items: items.clone(),
                        ..Default::default()
                    },
                );
                false
            }
            Block::Image { src, caption } => {
                self.flush();
                self.image(src, caption.as_deref(), next)
            }
            Block::Paragraph { text, emphasized } => self.paragraph(text, *emphasized, next),
            Block::CodeBlock { code } => {
                self.flush();
                self.fallback(code);
                false
            }
            Block::Other { text } => {
                self.flush();
                self.fallback(text);
                false
            }
            Block::HorizontalRule => {
                self.flush();
                false
            }
        }
    }

    fn image(&mut self, src: &str, caption: Option<&str>, next: Option<&Block>) -> bool {
        if caption.is_none() {
            if let Some(Block::Paragraph { text, emphasized }) = next {
                if *emphasized && is_short(text) {
                    self.emit(
                        Template::Image,
                        SlideContent {
                            image: Some(src.to_string()),
                            caption: Some(text.clone()),
                            ..Default::default()
                        },
                    );
                    return true;
                }
                if is_short(text) && stat_shape(text).is_none() {
                    self.image_text(src, text);
                    return true;
                }
            }
        }
        self.emit(
            Template::Image,
            SlideContent {
                image: Some(src.to_string()),
                caption: caption.map(str::to_string),
                ..Default::default()
            },
        );
        false
    }

    fn image_text(&mut self, src: &str, text: &str) {
        self.emit(
            Template::ImageText,
            SlideContent {
                heading: self.heading.clone(),
                body: Some(text.to_string()),
                image: Some(src.to_string()),
                ..Default::default()
            },
        );
    }

    fn paragraph(&mut self, text: &str, emphasized: bool, next: Option<&Block>) -> bool {
        if let Some((value, label)) = stat_shape(text) {
            self.flush();
            self.emit(
                Template::Stat,
                SlideContent {
                    stat_value: Some(value),
                    stat_label: Some(label),
                    ..Default::default()
                },
            );
            return false;
        }

        if !emphasized && is_short(text) {
            if let Some(Block::Image {
                src,
                caption: None,
            }) = next
            {
                self.flush();
                self.image_text(src, text);
                return true;
            }
        }

        self.accumulate(text);
        false
    }

    fn accumulate(&mut self, text: &str) {
        if let Some(pending) = &mut self.pending {
            let combined = pending.body.chars().count() + 2 + text.chars().count();
            if pending.heading == self.heading && combined <= CONTENT_BUDGET {
                pending.body.push_str("\n\n");
                pending.body.push_str(text);
                return;
            }
        }
        self.flush();
        self.pending = Some(Pending {
            heading: self.heading.clone(),
            body: text.to_string(),
        });
    }

    /// Content slide for a block no other template claims.
    fn fallback(&mut self, text: &str) {
        log::trace!("unclassified block ({} chars) -> content", text.len());
        self.emit(
            Template::Content,
            SlideContent {
                heading: self.heading.clone(),
                body: Some(text.to_string()),
                ..Default::default()
            },
        );
    }

    fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.out.push((
                Template::Content,
                SlideContent {
                    heading: pending.heading,
                    body: Some(pending.body),
                    ..Default::default()
                },
            ));
        }
    }

    fn emit(&mut self, template: Template, content: SlideContent) {
        self.out.push((template, content));
    }
}
