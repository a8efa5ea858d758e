use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// A note as handed over by the note store. Immutable for one presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteInput {
    /// Falls back to the file stem when loaded from disk.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Rich-text markup from the editor.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub date: String,
    #[serde(
        default,
        alias = "headerImage",
        skip_serializing_if = "Option::is_none"
    )]
    pub header_image: Option<String>,
    #[serde(
        default,
        alias = "profileUrl",
        alias = "url",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_url: Option<String>,
}

/// What a deck is keyed on. Two notes with the same identity produce the same
/// slides, so the deck is only rebuilt when this changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteIdentity {
    pub id: String,
    pub username: String,
    fingerprint: u64,
}

impl NoteInput {
    pub fn identity(&self) -> NoteIdentity {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        NoteIdentity {
            id: self.id.clone(),
            username: self.username.clone(),
            fingerprint: hasher.finish(),
        }
    }

    /// Fill in `profile_url` from a site base url when the note doesn't carry one.
    pub fn with_profile_base(mut self, base_url: Option<&str>) -> Self {
        if self.profile_url.is_none() && !self.username.trim().is_empty() {
            if let Some(base) = base_url.filter(|b| !b.trim().is_empty()) {
                self.profile_url = Some(format!(
                    "{}/{}",
                    base.trim().trim_end_matches('/'),
                    self.username.trim().trim_start_matches('@')
                ));
            }
        }
        self
    }
}

/// Load a note from a YAML or JSON file. The format is picked by extension,
/// anything that isn't `.json` is read as YAML (which also accepts JSON).
pub fn load(path: &Path) -> Result<NoteInput> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut note: NoteInput = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {} as JSON", path.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {} as YAML", path.display()))?
    };
    if note.id.trim().is_empty() {
        note.id = path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
    }
    log::debug!(
        "loaded note {:?} ({} bytes of markup) from {}",
        note.id,
        note.content.len(),
        path.display()
    );
    Ok(note)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn note() -> NoteInput {
        NoteInput {
            id: "n1".to_string(),
            title: "Hello".to_string(),
            content: "<p>Hello world</p>".to_string(),
            author: "Ada".to_string(),
            username: "ada".to_string(),
            date: "2026-03-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_identity_is_stable_and_content_sensitive() {
        let a = note();
        assert_eq!(a.identity(), a.clone().identity());

        let mut b = note();
        b.content.push_str("<p>More</p>");
        assert_ne!(a.identity(), b.identity());

        let mut c = note();
        c.username = "grace".to_string();
        assert_ne!(a.identity(), c.identity());
    }

    #[test]
    fn test_profile_base_fills_missing_url() {
        let n = note().with_profile_base(Some("https://example.site/"));
        assert_eq!(n.profile_url.as_deref(), Some("https://example.site/ada"));
    }

    #[test]
    fn test_profile_base_keeps_existing_url() {
        let mut n = note();
        n.profile_url = Some("https://ada.dev".to_string());
        let n = n.with_profile_base(Some("https://example.site"));
        assert_eq!(n.profile_url.as_deref(), Some("https://ada.dev"));
    }

    #[test]
    fn test_profile_base_needs_username() {
        let mut n = note();
        n.username = String::new();
        assert!(
            n.with_profile_base(Some("https://example.site"))
                .profile_url
                .is_none()
        );
    }

    #[test]
    fn test_load_yaml_with_camel_case_fields() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "title: Trip\nheaderImage: cover.jpg\ncontent: \"<p>Hi</p>\"\nauthor: Ada"
        )
        .unwrap();
        let n = load(file.path()).unwrap();
        assert_eq!(n.title, "Trip");
        assert_eq!(n.header_image.as_deref(), Some("cover.jpg"));
        assert!(!n.id.is_empty(), "id falls back to the file stem");
    }

    #[test]
    fn test_load_without_id_or_title_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harbour-walk.yaml");
        std::fs::write(&path, "content: \"<p>Gulls</p>\"\n").unwrap();
        let n = load(&path).unwrap();
        assert_eq!(n.id, "harbour-walk");
        assert_eq!(n.title, "");
        assert_eq!(n.content, "<p>Gulls</p>");
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"id":"x","title":"T","content":"<p>a</p>","profileUrl":"https://a.b"}}"#
        )
        .unwrap();
        let n = load(file.path()).unwrap();
        assert_eq!(n.id, "x");
        assert_eq!(n.profile_url.as_deref(), Some("https://a.b"));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        assert!(load(Path::new("/definitely/not/here.yaml")).is_err());
    }

    #[test]
    fn test_sample_note_loads() {
        let n: NoteInput =
            serde_yaml::from_str(include_str!("../../../sample-notes/field-trip.yaml")).unwrap();
        assert_eq!(n.id, "field-trip");
    }
}
