use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// CSS class prefix on highlighted spans (`hl-keyword`, `hl-string`, ...).
pub const CLASS_PREFIX: &str = "hl-";

/// Class-based syntax highlighter over syntect's bundled grammars.
pub struct Highlighter {
    syntaxes: SyntaxSet,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("syntaxes", &self.syntaxes.syntaxes().len())
            .finish()
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Whether `lang` names a grammar that produces highlighting (plain text does not).
    pub fn recognizes(&self, lang: &str) -> bool {
        self.syntaxes
            .find_syntax_by_token(lang.trim())
            .is_some_and(|s| s.name != "Plain Text")
    }

    /// Highlighted HTML for `code`, or `None` when `lang` is unknown or highlighting fails.
    pub fn highlight(&self, lang: &str, code: &str) -> Option<String> {
        let syntax = self.syntaxes.find_syntax_by_token(lang.trim())?;
        if syntax.name == "Plain Text" {
            return None;
        }
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntaxes,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );
        for line in LinesWithEndings::from(code) {
            if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::warn!(lang, error = %err, "syntax highlighting failed; rendering as plain text");
                return None;
            }
        }
        Some(generator.finalize())
    }
}
