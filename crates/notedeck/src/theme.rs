use eframe::egui::Color32;

/// Theme used when no id is given or the id is not recognised.
pub const DEFAULT_THEME: &str = "midnight";

const THEME_IDS: [&str; 5] = ["midnight", "paper", "ocean", "sunset", "mono"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub background: Color32,
    pub surface: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub accent_muted: Color32,
}

/// Font family references. Renderers map these onto the families they have
/// registered; anything they don't know falls back to proportional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeFonts {
    pub display: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresentationTheme {
    pub id: &'static str,
    pub colors: ThemeColors,
    pub fonts: ThemeFonts,
}

/// All built-in theme ids, default first.
pub fn theme_ids() -> &'static [&'static str] {
    &THEME_IDS
}

/// Resolve a theme id. Never fails: unknown or missing ids give the default theme.
pub fn get_theme(id: Option<&str>) -> PresentationTheme {
    let id = id.map(|s| s.trim().to_ascii_lowercase());
    match id.as_deref() {
        Some("paper") => PresentationTheme::paper(),
        Some("ocean") => PresentationTheme::ocean(),
        Some("sunset") => PresentationTheme::sunset(),
        Some("mono") => PresentationTheme::mono(),
        Some("midnight") => PresentationTheme::midnight(),
        Some(other) => {
            log::debug!("unknown theme {other:?}, using {DEFAULT_THEME}");
            PresentationTheme::midnight()
        }
        None => PresentationTheme::midnight(),
    }
}

impl PresentationTheme {
    pub fn midnight() -> Self {
        Self {
            id: "midnight",
            colors: ThemeColors {
                background: Color32::from_rgb(0x0F, 0x11, 0x1A),
                surface: Color32::from_rgb(0x1A, 0x1D, 0x2B),
                text: Color32::from_rgb(0xF2, 0xF3, 0xF7),
                text_muted: Color32::from_rgb(0x9A, 0xA0, 0xB4),
                accent: Color32::from_rgb(0x7C, 0x9C, 0xFF),
                accent_muted: Color32::from_rgb(0x34, 0x3F, 0x6B),
            },
            fonts: ThemeFonts {
                display: "sans",
                body: "sans",
            },
        }
    }

    pub fn paper() -> Self {
        Self {
            id: "paper",
            colors: ThemeColors {
                background: Color32::from_rgb(0xFA, 0xF7, 0xF0),
                surface: Color32::from_rgb(0xF0, 0xEB, 0xDF),
                text: Color32::from_rgb(0x22, 0x1F, 0x1A),
                text_muted: Color32::from_rgb(0x6E, 0x67, 0x5B),
                accent: Color32::from_rgb(0xB5, 0x4A, 0x2C),
                accent_muted: Color32::from_rgb(0xE8, 0xC9, 0xBC),
            },
            fonts: ThemeFonts {
                display: "serif",
                body: "serif",
            },
        }
    }

    pub fn ocean() -> Self {
        Self {
            id: "ocean",
            colors: ThemeColors {
                background: Color32::from_rgb(0x06, 0x26, 0x3A),
                surface: Color32::from_rgb(0x0B, 0x37, 0x52),
                text: Color32::from_rgb(0xE6, 0xF4, 0xFA),
                text_muted: Color32::from_rgb(0x8F, 0xB9, 0xCC),
                accent: Color32::from_rgb(0x3F, 0xD0, 0xC9),
                accent_muted: Color32::from_rgb(0x1B, 0x5E, 0x6E),
            },
            fonts: ThemeFonts {
                display: "sans",
                body: "sans",
            },
        }
    }

    pub fn sunset() -> Self {
        Self {
            id: "sunset",
            colors: ThemeColors {
                background: Color32::from_rgb(0x2B, 0x12, 0x1E),
                surface: Color32::from_rgb(0x3D, 0x1A, 0x2A),
                text: Color32::from_rgb(0xFF, 0xF1, 0xE6),
                text_muted: Color32::from_rgb(0xD9, 0xA8, 0x9E),
                accent: Color32::from_rgb(0xFF, 0x8A, 0x4C),
                accent_muted: Color32::from_rgb(0x6B, 0x2E, 0x35),
            },
            fonts: ThemeFonts {
                display: "serif",
                body: "sans",
            },
        }
    }

    pub fn mono() -> Self {
        Self {
            id: "mono",
            colors: ThemeColors {
                background: Color32::WHITE,
                surface: Color32::from_rgb(0xF2, 0xF2, 0xF2),
                text: Color32::from_rgb(0x11, 0x11, 0x11),
                text_muted: Color32::from_rgb(0x66, 0x66, 0x66),
                accent: Color32::from_rgb(0x11, 0x11, 0x11),
                accent_muted: Color32::from_rgb(0xCC, 0xCC, 0xCC),
            },
            fonts: ThemeFonts {
                display: "mono",
                body: "sans",
            },
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let opacity = opacity.clamp(0.0, 1.0);
        Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            (color.a() as f32 * opacity) as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_theme_falls_back_to_default() {
        assert_eq!(get_theme(Some("no-such-theme")).id, DEFAULT_THEME);
        assert_eq!(get_theme(None).id, DEFAULT_THEME);
        assert_eq!(get_theme(Some("")).id, DEFAULT_THEME);
    }

    #[test]
    fn test_every_listed_theme_resolves_to_itself() {
        for id in theme_ids() {
            assert_eq!(get_theme(Some(id)).id, *id);
        }
        assert_eq!(theme_ids()[0], DEFAULT_THEME);
    }

    #[test]
    fn test_theme_id_is_case_insensitive() {
        assert_eq!(get_theme(Some("  Paper ")).id, "paper");
    }

    #[test]
    fn test_with_opacity() {
        let c = PresentationTheme::with_opacity(Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(c.a(), 127);
        let clamped = PresentationTheme::with_opacity(Color32::from_rgb(10, 20, 30), 4.0);
        assert_eq!(clamped.a(), 255);
    }
}
