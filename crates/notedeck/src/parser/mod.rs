pub mod classify;
pub mod markup;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::note::{NoteIdentity, NoteInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    Title,
    Section,
    Content,
    Image,
    ImageText,
    Quote,
    List,
    Stat,
    End,
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Template::Title => "title",
            Template::Section => "section",
            Template::Content => "content",
            Template::Image => "image",
            Template::ImageText => "image-text",
            Template::Quote => "quote",
            Template::List => "list",
            Template::Stat => "stat",
            Template::End => "end",
        }
    }

    /// Look up a template by name. Unknown names render as content.
    pub fn from_name(name: &str) -> Self {
        match name.trim() {
            "title" => Template::Title,
            "section" => Template::Section,
            "image" => Template::Image,
            "image-text" | "image_text" => Template::ImageText,
            "quote" => Template::Quote,
            "list" => Template::List,
            "stat" => Template::Stat,
            "end" => Template::End,
            _ => Template::Content,
        }
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Template::from_name(&name))
    }
}

/// Payload of one slide. Which fields are set depends on the template; a
/// renderer only reads its own fields and skips the ones that are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    pub template: Template,
    pub content: SlideContent,
}

/// Turn a note into its slides.
///
/// Always starts with a title slide and ends with an end slide, so the result
/// has at least two entries. Pure: the same note always gives the same slides.
pub fn parse_note_to_slides(note: &NoteInput) -> Vec<Slide> {
    let blocks = markup::parse(&note.content);
    let body = classify::classify(&blocks);

    let title = SlideContent {
        heading: non_empty(&note.title),
        subheading: note.subtitle.as_deref().and_then(non_empty),
        author: non_empty(&note.author),
        date: non_empty(&note.date),
        image: note.header_image.as_deref().and_then(non_empty),
        ..Default::default()
    };
    let end = SlideContent {
        heading: non_empty(&note.title),
        author: non_empty(&note.author),
        url: note.profile_url.as_deref().and_then(non_empty),
        ..Default::default()
    };

    let drafts = std::iter::once((Template::Title, title))
        .chain(body)
        .chain(std::iter::once((Template::End, end)));

    let slides: Vec<Slide> = drafts
        .enumerate()
        .map(|(index, (template, content))| Slide {
            id: format!("{}-{}", note.id, index),
            template,
            content,
        })
        .collect();

    log::debug!(
        "note {:?}: {} blocks -> {} slides",
        note.id,
        blocks.len(),
        slides.len()
    );
    slides
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Slides of one note, computed once and kept until the note identity changes.
#[derive(Debug, Clone)]
pub struct Deck {
    identity: NoteIdentity,
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new(note: &NoteInput) -> Self {
        Self {
            identity: note.identity(),
            slides: parse_note_to_slides(note),
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Rebuild for `note` if it is a different note than the cached one.
    /// Returns whether the slides changed.
    pub fn refresh(&mut self, note: &NoteInput) -> bool {
        let identity = note.identity();
        if identity == self.identity {
            return false;
        }
        log::info!("note {:?} changed, rebuilding slides", identity.id);
        *self = Self {
            identity,
            slides: parse_note_to_slides(note),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(content: &str) -> NoteInput {
        NoteInput {
            id: "trip".to_string(),
            title: "Field Trip".to_string(),
            subtitle: Some("Notes from the coast".to_string()),
            content: content.to_string(),
            author: "Ada Byron".to_string(),
            username: "ada".to_string(),
            date: "2026-05-02".to_string(),
            header_image: None,
            profile_url: Some("https://example.site/ada".to_string()),
        }
    }

    fn templates(slides: &[Slide]) -> Vec<Template> {
        slides.iter().map(|s| s.template).collect()
    }

    #[test]
    fn test_single_paragraph_note() {
        let slides = parse_note_to_slides(&note("<p>Hello world</p>"));
        assert_eq!(
            templates(&slides),
            vec![Template::Title, Template::Content, Template::End]
        );
        assert_eq!(slides[1].content.body.as_deref(), Some("Hello world"));
    }

    #[test]
    fn test_empty_body_gives_title_and_end() {
        for content in ["", "   ", "<p></p>", "<div><br></div>"] {
            let slides = parse_note_to_slides(&note(content));
            assert_eq!(
                templates(&slides),
                vec![Template::Title, Template::End],
                "content {content:?}"
            );
        }
    }

    #[test]
    fn test_first_and_last_templates_always_hold() {
        let inputs = [
            "<h1>Only a heading</h1>",
            "<blockquote>Q</blockquote><ul><li>a</li></ul>",
            "<p>42 things</p>",
            "<img src=\"x.png\">",
            "<p>unterminated <b",
            "</p></p><<<>>>&&&",
        ];
        for content in inputs {
            let slides = parse_note_to_slides(&note(content));
            assert!(slides.len() >= 2, "content {content:?}");
            assert_eq!(slides[0].template, Template::Title);
            assert_eq!(slides.last().map(|s| s.template), Some(Template::End));
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let content = include_str!("../../../../sample-notes/field-trip.html");
        let a = parse_note_to_slides(&note(content));
        let b = parse_note_to_slides(&note(content));
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_note_covers_every_template() {
        let content = include_str!("../../../../sample-notes/field-trip.html");
        let slides = parse_note_to_slides(&note(content));
        for template in [
            Template::Section,
            Template::Content,
            Template::Image,
            Template::ImageText,
            Template::Quote,
            Template::List,
            Template::Stat,
        ] {
            assert!(
                slides.iter().any(|s| s.template == template),
                "missing {} in {:?}",
                template.name(),
                templates(&slides)
            );
        }
    }

    #[test]
    fn test_title_and_end_fields() {
        let mut n = note("");
        n.header_image = Some("cover.jpg".to_string());
        let slides = parse_note_to_slides(&n);
        let title = &slides[0].content;
        assert_eq!(title.heading.as_deref(), Some("Field Trip"));
        assert_eq!(title.subheading.as_deref(), Some("Notes from the coast"));
        assert_eq!(title.author.as_deref(), Some("Ada Byron"));
        assert_eq!(title.date.as_deref(), Some("2026-05-02"));
        assert_eq!(title.image.as_deref(), Some("cover.jpg"));
        let end = &slides[1].content;
        assert_eq!(end.url.as_deref(), Some("https://example.site/ada"));
    }

    #[test]
    fn test_missing_optional_fields_stay_none() {
        let mut n = note("");
        n.subtitle = Some("   ".to_string());
        n.profile_url = None;
        n.date = String::new();
        let slides = parse_note_to_slides(&n);
        assert!(slides[0].content.subheading.is_none());
        assert!(slides[0].content.date.is_none());
        assert!(slides[1].content.url.is_none());
    }

    #[test]
    fn test_slide_ids_are_indexed() {
        let slides = parse_note_to_slides(&note("<p>a</p>"));
        let ids: Vec<&str> = slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["trip-0", "trip-1", "trip-2"]);
    }

    #[test]
    fn test_template_names_round_trip() {
        for t in [
            Template::Title,
            Template::Section,
            Template::Content,
            Template::Image,
            Template::ImageText,
            Template::Quote,
            Template::List,
            Template::Stat,
            Template::End,
        ] {
            assert_eq!(Template::from_name(t.name()), t);
        }
    }

    #[test]
    fn test_unknown_template_deserializes_as_content() {
        let slide: Slide =
            serde_yaml::from_str("id: x\ntemplate: hologram\ncontent:\n  body: hi\n").unwrap();
        assert_eq!(slide.template, Template::Content);
    }

    #[test]
    fn test_deck_refresh_only_on_identity_change() {
        let n = note("<p>a</p>");
        let mut deck = Deck::new(&n);
        assert_eq!(deck.len(), 3);
        assert!(!deck.refresh(&n.clone()));

        let changed = note("<p>a</p><blockquote>b</blockquote>");
        assert!(deck.refresh(&changed));
        assert_eq!(deck.len(), 4);
        assert_eq!(deck.get(2).map(|s| s.template), Some(Template::Quote));
    }
}
