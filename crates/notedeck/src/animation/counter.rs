//! Count-up for stat slides.

use super::{Ease, Motion};

pub const COUNTER_DELAY_MS: u32 = 400;
pub const COUNTER_DURATION_MS: u32 = 1500;

/// A stat value split into the part that counts and the text around it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatValue {
    pub prefix: String,
    pub target: f64,
    pub decimals: usize,
    pub suffix: String,
    numeric: bool,
    raw: String,
}

/// Split `"$1,234.5k+"` into `"$"`, `1234.5`, one decimal and `"k+"`.
///
/// Thousands separators are dropped. A value with no digits is kept verbatim
/// and never animates.
pub fn parse_stat_value(raw: &str) -> StatValue {
    let raw = raw.trim();
    let start = raw.find(|c: char| c.is_ascii_digit());
    let Some(start) = start else {
        return StatValue {
            prefix: String::new(),
            target: 0.0,
            decimals: 0,
            suffix: String::new(),
            numeric: false,
            raw: raw.to_string(),
        };
    };
    let (prefix, rest) = raw.split_at(start);
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());
    // A trailing "." or "," belongs to the text, not the number.
    let number = rest[..end].trim_end_matches(['.', ',']);
    let suffix = &rest[number.len()..];

    let digits: String = number.chars().filter(|c| *c != ',').collect();
    let decimals = digits.split_once('.').map_or(0, |(_, frac)| frac.len());
    let target = digits.parse::<f64>().unwrap_or(0.0);

    StatValue {
        prefix: prefix.to_string(),
        target,
        decimals,
        suffix: suffix.to_string(),
        numeric: true,
        raw: raw.to_string(),
    }
}

impl StatValue {
    /// Counted value at `elapsed_ms` after the slide was entered.
    pub fn current(&self, elapsed_ms: f64, motion: Motion) -> f64 {
        if motion.is_reduced() {
            return self.target;
        }
        let t = elapsed_ms - COUNTER_DELAY_MS as f64;
        if t <= 0.0 {
            return 0.0;
        }
        let p = (t / COUNTER_DURATION_MS as f64).min(1.0);
        let value = self.target * Ease::OutQuart.apply(p);
        round_to(value, self.decimals)
    }

    /// Text to draw at `elapsed_ms`.
    pub fn display(&self, elapsed_ms: f64, motion: Motion) -> String {
        if !self.numeric {
            return self.raw.clone();
        }
        format!(
            "{}{}{}",
            self.prefix,
            format_grouped(self.current(elapsed_ms, motion), self.decimals),
            self.suffix
        )
    }
}

fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format with comma thousands grouping and a fixed number of decimals.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
