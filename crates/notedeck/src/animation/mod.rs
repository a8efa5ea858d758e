//! Entrance choreography for each slide template.
//!
//! Everything here is plain data: a [`Choreography`] is a list of [`Tween`]s
//! sampled by elapsed time. The renderer asks for a value per element and
//! property, so nothing in this module knows how a slide is drawn.

pub mod counter;
pub mod ease;

pub use ease::Ease;

use crate::parser::{Slide, SlideContent, Template};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Full,
    /// Every tween collapses to zero duration and zero delay.
    Reduced,
}

impl Motion {
    pub fn from_reduced(reduced: bool) -> Self {
        if reduced { Motion::Reduced } else { Motion::Full }
    }

    pub fn is_reduced(self) -> bool {
        self == Motion::Reduced
    }
}

/// An animatable element of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Heading,
    Subheading,
    Body,
    Image,
    Caption,
    /// Author, date and similar small print.
    Meta,
    /// Decorative accent rule.
    Accent,
    Word(usize),
    Attribution,
    Item(usize),
    Bullet(usize),
    Value,
    Label,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    /// Horizontal offset in design units.
    OffsetX,
    /// Vertical offset in design units.
    OffsetY,
    Scale,
    /// Fraction of an element's extent that is drawn, 0..1.
    Reveal,
}

impl Property {
    /// Value of an element that has no tween for this property.
    pub fn rest(self) -> f32 {
        match self {
            Property::Opacity | Property::Scale | Property::Reveal => 1.0,
            Property::OffsetX | Property::OffsetY => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub target: Target,
    pub property: Property,
    pub from: f32,
    pub to: f32,
    pub duration_ms: u32,
    pub delay_ms: u32,
    pub easing: Ease,
}

impl Tween {
    pub fn new(target: Target, property: Property, from: f32, to: f32) -> Self {
        Self {
            target,
            property,
            from,
            to,
            duration_ms: ENTER_MS,
            delay_ms: 0,
            easing: Ease::OutCubic,
        }
    }

    pub fn duration(mut self, ms: u32) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn delay(mut self, ms: u32) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn easing(mut self, easing: Ease) -> Self {
        self.easing = easing;
        self
    }

    pub fn end_ms(&self) -> u32 {
        self.delay_ms + self.duration_ms
    }

    pub fn sample(&self, elapsed_ms: f64) -> f32 {
        let local = elapsed_ms - self.delay_ms as f64;
        if local < 0.0 {
            return self.from;
        }
        if self.duration_ms == 0 || local >= self.duration_ms as f64 {
            return self.to;
        }
        let eased = self.easing.apply(local / self.duration_ms as f64) as f32;
        self.from + (self.to - self.from) * eased
    }
}

pub const ENTER_MS: u32 = 600;
const RISE: f32 = 40.0;
const STEP_MS: u32 = 150;

pub const QUOTE_WORD_START_MS: u32 = 200;
pub const QUOTE_WORD_STAGGER_MS: u32 = 70;
pub const QUOTE_WORD_MS: u32 = 450;
const QUOTE_ATTRIBUTION_GAP_MS: u32 = 150;

pub const LIST_ITEM_START_MS: u32 = 250;
pub const LIST_ITEM_STAGGER_MS: u32 = 120;
const LIST_BULLET_MS: u32 = 350;
const LIST_ITEM_MS: u32 = 450;

/// The tweens that bring one slide on stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choreography {
    tweens: Vec<Tween>,
    /// Extra time the slide keeps changing after its last tween, e.g. a counter.
    tail_ms: u32,
}

impl Choreography {
    pub fn for_slide(slide: &Slide, motion: Motion) -> Self {
        let c = &slide.content;
        let mut choreo = match slide.template {
            Template::Title => title(c),
            Template::Section => section(),
            Template::Content => content(c),
            Template::Image => image(c),
            Template::ImageText => image_text(c),
            Template::Quote => quote(c),
            Template::List => list(c),
            Template::Stat => stat(),
            Template::End => end(c),
        };
        if motion.is_reduced() {
            choreo.reduce();
        }
        choreo
    }

    /// No tweens at all; every element is at rest. Used for thumbnails.
    pub fn settled() -> Self {
        Self::default()
    }

    fn reduce(&mut self) {
        for tween in &mut self.tweens {
            tween.duration_ms = 0;
            tween.delay_ms = 0;
        }
        self.tail_ms = 0;
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn value(&self, target: Target, property: Property, elapsed_ms: f64) -> f32 {
        self.tweens
            .iter()
            .find(|t| t.target == target && t.property == property)
            .map_or(property.rest(), |t| t.sample(elapsed_ms))
    }

    pub fn opacity(&self, target: Target, elapsed_ms: f64) -> f32 {
        self.value(target, Property::Opacity, elapsed_ms)
    }

    pub fn duration_ms(&self) -> u32 {
        self.tweens
            .iter()
            .map(Tween::end_ms)
            .max()
            .unwrap_or(0)
            .max(self.tail_ms)
    }

    pub fn is_settled(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.duration_ms() as f64
    }

    fn push(&mut self, tween: Tween) {
        self.tweens.push(tween);
    }

    /// Fade in while rising from below.
    fn fade_rise(&mut self, target: Target, delay_ms: u32) {
        self.push(Tween::new(target, Property::Opacity, 0.0, 1.0).delay(delay_ms));
        self.push(Tween::new(target, Property::OffsetY, RISE, 0.0).delay(delay_ms));
    }

    fn fade(&mut self, target: Target, delay_ms: u32, duration_ms: u32) {
        self.push(
            Tween::new(target, Property::Opacity, 0.0, 1.0)
                .delay(delay_ms)
                .duration(duration_ms),
        );
    }
}

/// Word split used by both the quote choreography and the quote layout, so
/// word indices agree.
pub fn quote_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

pub fn quote_attribution_delay_ms(word_count: usize) -> u32 {
    let last_start =
        QUOTE_WORD_START_MS + word_count.saturating_sub(1) as u32 * QUOTE_WORD_STAGGER_MS;
    last_start + QUOTE_WORD_MS + QUOTE_ATTRIBUTION_GAP_MS
}

fn title(c: &SlideContent) -> Choreography {
    let mut ch = Choreography::default();
    if c.image.is_some() {
        ch.fade(Target::Image, 0, 900);
        // Slow, even drift out of the zoom.
        ch.push(
            Tween::new(Target::Image, Property::Scale, 1.06, 1.0)
                .duration(1200)
                .easing(Ease::Linear),
        );
    }
    ch.fade_rise(Target::Heading, 100);
    ch.fade_rise(Target::Subheading, 100 + STEP_MS);
    ch.fade(Target::Meta, 100 + 2 * STEP_MS, ENTER_MS);
    ch
}

fn section() -> Choreography {
    let mut ch = Choreography::default();
    ch.fade(Target::Heading, 0, 700);
    ch.push(
        Tween::new(Target::Heading, Property::Scale, 0.94, 1.0)
            .duration(700)
            .easing(Ease::OutQuart),
    );
    ch.push(
        Tween::new(Target::Accent, Property::Reveal, 0.0, 1.0)
            .delay(250)
            .duration(600)
            .easing(Ease::InOutCubic),
    );
    ch
}

fn content(c: &SlideContent) -> Choreography {
    let mut ch = Choreography::default();
    let mut delay = 0;
    if c.heading.is_some() {
        ch.fade_rise(Target::Heading, delay);
        delay += STEP_MS;
    }
    ch.fade_rise(Target::Body, delay);
    ch
}

fn image(c: &SlideContent) -> Choreography {
    let mut ch = Choreography::default();
    ch.fade(Target::Image, 0, 800);
    ch.push(Tween::new(Target::Image, Property::Scale, 1.04, 1.0).duration(1000));
    if c.caption.is_some() {
        ch.fade_rise(Target::Caption, 400);
    }
    ch
}

fn image_text(c: &SlideContent) -> Choreography {
    let mut ch = Choreography::default();
    ch.fade(Target::Image, 0, 700);
    ch.push(Tween::new(Target::Image, Property::OffsetX, -60.0, 0.0).duration(700));
    let mut delay = STEP_MS;
    if c.heading.is_some() {
        ch.fade(Target::Heading, delay, ENTER_MS);
        ch.push(Tween::new(Target::Heading, Property::OffsetX, RISE, 0.0).delay(delay));
        delay += STEP_MS;
    }
    ch.fade(Target::Body, delay, ENTER_MS);
    ch.push(Tween::new(Target::Body, Property::OffsetX, RISE, 0.0).delay(delay));
    ch
}

fn quote(c: &SlideContent) -> Choreography {
    let mut ch = Choreography::default();
    ch.fade(Target::Accent, 0, 500);
    let words = c.quote.as_deref().map(quote_words).unwrap_or_default();
    for i in 0..words.len() {
        let delay = QUOTE_WORD_START_MS + i as u32 * QUOTE_WORD_STAGGER_MS;
        ch.push(
            Tween::new(Target::Word(i), Property::Opacity, 0.0, 1.0)
                .delay(delay)
                .duration(QUOTE_WORD_MS),
        );
        ch.push(
            Tween::new(Target::Word(i), Property::OffsetY, 20.0, 0.0)
                .delay(delay)
                .duration(QUOTE_WORD_MS),
        );
    }
    if c.attribution.is_some() {
        ch.fade_rise(Target::Attribution, quote_attribution_delay_ms(words.len()));
    }
    ch
}

fn list(c: &SlideContent) -> Choreography {
    let mut ch = Choreography::default();
    if c.heading.is_some() {
        ch.fade_rise(Target::Heading, 0);
    }
    for i in 0..c.items.len() {
        let delay = LIST_ITEM_START_MS + i as u32 * LIST_ITEM_STAGGER_MS;
        ch.push(
            Tween::new(Target::Bullet(i), Property::Scale, 0.0, 1.0)
                .delay(delay)
                .duration(LIST_BULLET_MS)
                .easing(Ease::OutBack),
        );
        ch.fade(Target::Item(i), delay + 60, LIST_ITEM_MS);
        ch.push(
            Tween::new(Target::Item(i), Property::OffsetX, -30.0, 0.0)
                .delay(delay + 60)
                .duration(LIST_ITEM_MS),
        );
    }
    ch
}

fn stat() -> Choreography {
    let mut ch = Choreography::default();
    ch.fade(Target::Value, 0, 400);
    ch.push(
        Tween::new(Target::Value, Property::Scale, 0.9, 1.0)
            .duration(500)
            .easing(Ease::OutBack),
    );
    ch.fade_rise(Target::Label, 300);
    ch.tail_ms = counter::COUNTER_DELAY_MS + counter::COUNTER_DURATION_MS;
    ch
}

fn end(c: &SlideContent) -> Choreography {
    let mut ch = Choreography::default();
    ch.fade_rise(Target::Heading, 0);
    ch.fade(Target::Meta, STEP_MS, ENTER_MS);
    if c.url.is_some() {
        ch.fade_rise(Target::Url, 2 * STEP_MS);
    }
    ch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(template: Template, content: SlideContent) -> Slide {
        Slide {
            id: "n-1".to_string(),
            template,
            content,
        }
    }

    fn every_template() -> Vec<Slide> {
        let content = SlideContent {
            heading: Some("Heading".to_string()),
            subheading: Some("Sub".to_string()),
            body: Some("Body text".to_string()),
            image: Some("img.png".to_string()),
            caption: Some("Caption".to_string()),
            quote: Some("Stay hungry stay foolish".to_string()),
            attribution: Some("Someone".to_string()),
            items: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            stat_value: Some("1,234+".to_string()),
            stat_label: Some("steps".to_string()),
            author: Some("Ada".to_string()),
            date: Some("today".to_string()),
            url: Some("https://a.b/ada".to_string()),
        };
        [
            Template::Title,
            Template::Section,
            Template::Content,
            Template::Image,
            Template::ImageText,
            Template::Quote,
            Template::List,
            Template::Stat,
            Template::End,
        ]
        .into_iter()
        .map(|t| slide(t, content.clone()))
        .collect()
    }

    #[test]
    fn test_tween_sampling() {
        let t = Tween::new(Target::Body, Property::Opacity, 0.0, 1.0)
            .delay(100)
            .duration(200)
            .easing(Ease::Linear);
        assert_eq!(t.sample(0.0), 0.0);
        assert_eq!(t.sample(100.0), 0.0);
        assert!((t.sample(200.0) - 0.5).abs() < 1e-6);
        assert_eq!(t.sample(300.0), 1.0);
        assert_eq!(t.sample(10_000.0), 1.0);
    }

    #[test]
    fn test_title_image_drifts_evenly() {
        let slide = Slide {
            id: "t".to_string(),
            template: Template::Title,
            content: SlideContent {
                heading: Some("Trip".to_string()),
                image: Some("cover.jpg".to_string()),
                ..Default::default()
            },
        };
        let ch = Choreography::for_slide(&slide, Motion::Full);
        let mid = ch.value(Target::Image, Property::Scale, 600.0);
        assert!((mid - 1.03).abs() < 1e-4, "mid {mid}");
        assert_eq!(ch.value(Target::Image, Property::Scale, 1200.0), 1.0);
    }

    #[test]
    fn test_untweened_elements_are_at_rest() {
        let ch = Choreography::settled();
        assert_eq!(ch.value(Target::Heading, Property::Opacity, 0.0), 1.0);
        assert_eq!(ch.value(Target::Heading, Property::OffsetY, 0.0), 0.0);
        assert_eq!(ch.value(Target::Image, Property::Scale, 0.0), 1.0);
        assert!(ch.is_settled(0.0));
    }

    #[test]
    fn test_every_template_ends_at_rest() {
        for s in every_template() {
            let ch = Choreography::for_slide(&s, Motion::Full);
            let end = ch.duration_ms() as f64;
            for tween in ch.tweens() {
                assert_eq!(
                    ch.value(tween.target, tween.property, end),
                    tween.property.rest(),
                    "{} {:?} {:?}",
                    s.template.name(),
                    tween.target,
                    tween.property
                );
            }
        }
    }

    #[test]
    fn test_reduced_motion_collapses_every_tween() {
        for s in every_template() {
            let ch = Choreography::for_slide(&s, Motion::Reduced);
            assert_eq!(ch.duration_ms(), 0, "{}", s.template.name());
            for tween in ch.tweens() {
                assert_eq!(tween.delay_ms, 0);
                assert_eq!(tween.duration_ms, 0);
                assert_eq!(ch.value(tween.target, tween.property, 0.0), tween.to);
            }
        }
    }

    #[test]
    fn test_quote_words_are_staggered() {
        let s = slide(
            Template::Quote,
            SlideContent {
                quote: Some("one two three four".to_string()),
                attribution: Some("Someone".to_string()),
                ..Default::default()
            },
        );
        let ch = Choreography::for_slide(&s, Motion::Full);
        let at = QUOTE_WORD_START_MS as f64 + QUOTE_WORD_STAGGER_MS as f64 * 1.5;
        let first = ch.opacity(Target::Word(0), at);
        let second = ch.opacity(Target::Word(1), at);
        let fourth = ch.opacity(Target::Word(3), at);
        assert!(first > second);
        assert!(second > 0.0);
        assert_eq!(fourth, 0.0);
    }

    #[test]
    fn test_quote_attribution_waits_for_last_word() {
        let s = slide(
            Template::Quote,
            SlideContent {
                quote: Some("a b c d e f g".to_string()),
                attribution: Some("Someone".to_string()),
                ..Default::default()
            },
        );
        let ch = Choreography::for_slide(&s, Motion::Full);
        let last_word_end = ch
            .tweens()
            .iter()
            .filter(|t| matches!(t.target, Target::Word(_)))
            .map(Tween::end_ms)
            .max()
            .unwrap();
        let attribution = ch
            .tweens()
            .iter()
            .find(|t| t.target == Target::Attribution)
            .unwrap();
        assert!(attribution.delay_ms >= last_word_end);
        assert_eq!(attribution.delay_ms, quote_attribution_delay_ms(7));
    }

    #[test]
    fn test_list_bullets_pop_with_overshoot() {
        let s = slide(
            Template::List,
            SlideContent {
                items: vec!["a".to_string(), "b".to_string()],
                ..Default::default()
            },
        );
        let ch = Choreography::for_slide(&s, Motion::Full);
        let bullet = ch
            .tweens()
            .iter()
            .find(|t| t.target == Target::Bullet(1))
            .unwrap();
        assert_eq!(bullet.easing, Ease::OutBack);
        assert_eq!(
            bullet.delay_ms,
            LIST_ITEM_START_MS + LIST_ITEM_STAGGER_MS
        );
        let peak = (0..=bullet.duration_ms)
            .map(|ms| ch.value(Target::Bullet(1), Property::Scale, (bullet.delay_ms + ms) as f64))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_stat_runs_until_counter_finishes() {
        let s = slide(Template::Stat, SlideContent::default());
        let ch = Choreography::for_slide(&s, Motion::Full);
        assert_eq!(
            ch.duration_ms(),
            counter::COUNTER_DELAY_MS + counter::COUNTER_DURATION_MS
        );
        assert!(!ch.is_settled(1000.0));
        assert!(ch.is_settled(1900.0));
    }

    #[test]
    fn test_absent_fields_get_no_tweens() {
        let s = slide(
            Template::End,
            SlideContent {
                heading: Some("Bye".to_string()),
                ..Default::default()
            },
        );
        let ch = Choreography::for_slide(&s, Motion::Full);
        assert!(ch.tweens().iter().all(|t| t.target != Target::Url));
    }
}
