//! Syntect-based highlighting backend, extended with the two-face syntax
//! definitions.

use std::sync::OnceLock;

use syntect::{
  highlighting::Theme,
  html::{
    ClassStyle,
    ClassedHTMLGenerator,
    css_for_theme_with_class_style,
  },
  parsing::SyntaxSet,
  util::LinesWithEndings,
};
use two_face::{
  re_exports::syntect::highlighting::ThemeSet,
  theme::{EmbeddedLazyThemeSet, EmbeddedThemeName},
};

use super::{
  CLASS_PREFIX,
  error::{SyntaxError, SyntaxResult},
  types::{Highlighted, SyntaxConfig, SyntaxHighlighter, SyntaxManager},
};

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
  prefix: CLASS_PREFIX,
};

const FALLBACK_THEME: &str = "InspiredGitHub";

/// Syntect-based syntax highlighter
pub struct SyntectHighlighter {
  theme_name: String,
}

impl SyntectHighlighter {
  /// Create a new Syntect highlighter with the specified theme.
  #[must_use]
  pub fn new(theme_name: Option<String>) -> Self {
    Self {
      theme_name: theme_name.unwrap_or_else(|| FALLBACK_THEME.to_string()),
    }
  }

  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(two_face::syntax::extra_newlines)
  }

  fn theme_set() -> &'static EmbeddedLazyThemeSet {
    static THEME_SET: OnceLock<EmbeddedLazyThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(two_face::theme::extra)
  }

  fn default_theme_set() -> &'static ThemeSet {
    static DEFAULT_THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    DEFAULT_THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  fn embedded_theme(name: &str) -> Option<EmbeddedThemeName> {
    match name {
      "Dracula" => Some(EmbeddedThemeName::Dracula),
      "Github" => Some(EmbeddedThemeName::Github),
      "GruvboxDark" => Some(EmbeddedThemeName::GruvboxDark),
      "GruvboxLight" => Some(EmbeddedThemeName::GruvboxLight),
      "MonokaiExtended" => Some(EmbeddedThemeName::MonokaiExtended),
      "MonokaiExtendedLight" => Some(EmbeddedThemeName::MonokaiExtendedLight),
      "Nord" => Some(EmbeddedThemeName::Nord),
      "OneHalfDark" => Some(EmbeddedThemeName::OneHalfDark),
      "OneHalfLight" => Some(EmbeddedThemeName::OneHalfLight),
      "SolarizedDark" => Some(EmbeddedThemeName::SolarizedDark),
      "SolarizedLight" => Some(EmbeddedThemeName::SolarizedLight),
      "TwoDark" => Some(EmbeddedThemeName::TwoDark),
      "VisualStudioDarkPlus" => Some(EmbeddedThemeName::VisualStudioDarkPlus),
      "Zenburn" => Some(EmbeddedThemeName::Zenburn),
      _ => None,
    }
  }

  /// Look a theme up by name, falling back to `InspiredGitHub`.
  fn get_theme(&self, theme_name: Option<&str>) -> &'static Theme {
    let name = theme_name
      .filter(|name| !name.is_empty())
      .unwrap_or(&self.theme_name);

    if let Some(theme) = Self::default_theme_set().themes.get(name) {
      return theme;
    }

    if let Some(embedded_name) = Self::embedded_theme(name) {
      return Self::theme_set().get(embedded_name);
    }

    log::warn!("Unknown highlight theme '{name}', using {FALLBACK_THEME}");
    Self::default_theme_set()
      .themes
      .get(FALLBACK_THEME)
      .unwrap_or_else(|| Self::theme_set().get(EmbeddedThemeName::InspiredGithub))
  }
}

impl Default for SyntectHighlighter {
  fn default() -> Self {
    Self::new(None)
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn supports_language(&self, language: &str) -> bool {
    Self::syntax_set().find_syntax_by_token(language).is_some()
  }

  fn highlight(
    &self,
    code: &str,
    language: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<Highlighted> {
    let syntax_set = Self::syntax_set();
    let syntax = syntax_set
      .find_syntax_by_token(language)
      .ok_or_else(|| SyntaxError::UnsupportedLanguage(language.to_string()))?;

    let mut generator =
      ClassedHTMLGenerator::new_with_class_style(syntax, syntax_set, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
      generator
        .parse_html_for_line_which_includes_newline(line)
        .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))?;
    }
    let html = generator.finalize();

    let css = css_for_theme_with_class_style(self.get_theme(theme), CLASS_STYLE)
      .map_err(|e| SyntaxError::StylesheetFailed(e.to_string()))?;

    Ok(Highlighted { html, css })
  }
}

/// Create a Syntect-based syntax manager using `theme` by default.
///
/// # Errors
///
/// Never fails today; the signature matches the other constructors.
pub fn create_syntect_manager(theme: Option<String>) -> SyntaxResult<SyntaxManager> {
  let highlighter = Box::new(SyntectHighlighter::new(theme.clone()));
  let config = SyntaxConfig {
    default_theme: theme,
    ..SyntaxConfig::default()
  };
  Ok(SyntaxManager::new(highlighter, config))
}
