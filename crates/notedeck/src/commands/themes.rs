use colored::Colorize;

use crate::config::Config;
use crate::theme::{self, DEFAULT_THEME};

pub fn run() {
    let config = Config::load_or_default();
    let configured = config.theme().unwrap_or(DEFAULT_THEME);

    for id in theme::theme_ids() {
        let t = theme::get_theme(Some(id));
        let accent = t.colors.accent;
        let swatch = "■".truecolor(accent.r(), accent.g(), accent.b());
        let fonts = format!("{} / {}", t.fonts.display, t.fonts.body).dimmed();
        if *id == configured {
            println!("{swatch} {} {fonts} {}", id.bold(), "(current)".green());
        } else {
            println!("{swatch} {id} {fonts}");
        }
    }
}
