//! Resolved colors per theme. Tones are named in the document model and turned into concrete
//! colors only when painting.

use folio_core::{FolioConfig, Theme, Tone};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub theme: Theme,
    pub ink: String,
    pub muted: String,
    pub faint: String,
    /// Indexed by [`Tone`] in declaration order: teal, teal2, good, warn, bad.
    pub tones: [String; 5],
}

const TONE_NAMES: [&str; 5] = ["teal", "teal2", "good", "warn", "bad"];

fn tone_index(tone: Tone) -> usize {
    match tone {
        Tone::Teal => 0,
        Tone::Teal2 => 1,
        Tone::Good => 2,
        Tone::Warn => 3,
        Tone::Bad => 4,
    }
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                theme,
                ink: "#0f1419".to_string(),
                muted: "rgba(15,20,25,0.7)".to_string(),
                faint: "rgba(15,20,25,0.12)".to_string(),
                tones: ["#85cbda", "#8ad8c0", "#c6f459", "#9cb7eb", "#f39a8e"].map(String::from),
            },
            Theme::Dark => Self {
                theme,
                ink: "#eef3f6".to_string(),
                muted: "rgba(238,243,246,0.72)".to_string(),
                faint: "rgba(238,243,246,0.14)".to_string(),
                tones: ["#9ad7e4", "#9fe3cd", "#d2f77a", "#b0c6f0", "#f6ada3"]
                    .map(String::from),
            },
        }
    }

    /// Theme palette with `palette.<theme>.<name>` overrides from config (ink, muted, faint and
    /// the five tone names).
    pub fn from_config(theme: Theme, config: &FolioConfig) -> Self {
        let mut palette = Self::for_theme(theme);
        let base = format!("palette.{}", theme.as_str());
        let over = |slot: &mut String, name: &str| {
            if let Some(v) = config.get_str(&format!("{base}.{name}")) {
                *slot = v.to_string();
            }
        };
        over(&mut palette.ink, "ink");
        over(&mut palette.muted, "muted");
        over(&mut palette.faint, "faint");
        for (slot, name) in palette.tones.iter_mut().zip(TONE_NAMES) {
            over(slot, name);
        }
        palette
    }

    pub fn tone(&self, tone: Tone) -> &str {
        &self.tones[tone_index(tone)]
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().strip_prefix('#')?;
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    match hex.len() {
        3 => Some((digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => {
            let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            Some((byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

/// `rgba(r,g,b,a)` for a hex color; anything that is not 3- or 6-digit hex is returned as is.
pub fn rgba(color: &str, alpha: f64) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => format!("rgba({r},{g},{b},{})", crate::svg::fmt(alpha.clamp(0.0, 1.0))),
        None => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_expands_short_and_long_hex() {
        assert_eq!(rgba("#85cbda", 0.22), "rgba(133,203,218,0.22)");
        assert_eq!(rgba("#fff", 1.0), "rgba(255,255,255,1)");
        assert_eq!(rgba("tomato", 0.5), "tomato");
        assert_eq!(rgba("#12345", 0.5), "#12345");
    }

    #[test]
    fn light_palette_uses_base_tones() {
        let p = Palette::for_theme(Theme::Light);
        assert_eq!(p.tone(Tone::Warn), "#9cb7eb");
        assert!(!p.is_dark());
    }

    #[test]
    fn config_overrides_tones() {
        let mut config = FolioConfig::default();
        config.set_value("palette.dark.good", serde_json::json!("#00ff00"));
        let p = Palette::from_config(Theme::Dark, &config);
        assert_eq!(p.tone(Tone::Good), "#00ff00");
        assert_eq!(p.tone(Tone::Teal), "#9ad7e4");
    }
}
