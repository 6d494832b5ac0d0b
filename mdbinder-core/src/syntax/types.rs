//! Core types and traits for syntax highlighting.

use std::collections::HashMap;

use super::{
  css::scope_stylesheet,
  error::{SyntaxError, SyntaxResult},
};

/// Highlighted markup for one code block plus the stylesheet it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
  /// Inner markup of the `pre` element.
  pub html: String,
  /// Rules styling the classes used in `html`.
  pub css:  String,
}

/// Trait for syntax highlighting backends.
///
/// Backends emit class-based markup so the stylesheet can be shared by every
/// block of the same language.
pub trait SyntaxHighlighter {
  /// Check if a language is supported
  fn supports_language(&self, language: &str) -> bool;

  /// Highlight code with the specified language and theme.
  ///
  /// # Errors
  ///
  /// Returns an error if the language is unknown to the backend or the
  /// backend fails to produce markup or a stylesheet.
  fn highlight(
    &self,
    code: &str,
    language: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<Highlighted>;
}

/// Configuration for syntax highlighting
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Default theme to use when none is specified
  pub default_theme: Option<String>,

  /// Maps language classes found in documents to backend language names
  pub language_aliases: HashMap<String, String>,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    let mut language_aliases = HashMap::new();

    language_aliases.insert("html5".to_string(), "html".to_string());
    language_aliases.insert("sass".to_string(), "scss".to_string());
    language_aliases.insert("js".to_string(), "javascript".to_string());
    language_aliases.insert("ts".to_string(), "typescript".to_string());
    language_aliases.insert("py".to_string(), "python".to_string());
    language_aliases.insert("sh".to_string(), "bash".to_string());
    language_aliases.insert("shell".to_string(), "bash".to_string());
    language_aliases.insert("yml".to_string(), "yaml".to_string());

    Self {
      default_theme: None,
      language_aliases,
    }
  }
}

/// High-level syntax highlighting manager.
///
/// Resolves aliases, picks the theme and scopes the backend's stylesheet to
/// the language class of the block.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  /// Create a new syntax manager with the given highlighter and config
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  /// Create a new syntax manager with the default configuration
  #[must_use]
  pub fn with_highlighter(highlighter: Box<dyn SyntaxHighlighter>) -> Self {
    Self::new(highlighter, SyntaxConfig::default())
  }

  /// Resolve a language name using aliases
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let language = language.to_lowercase();
    self
      .config
      .language_aliases
      .get(&language)
      .cloned()
      .unwrap_or(language)
  }

  /// Whether blocks tagged with `language` can be highlighted.
  #[must_use]
  pub fn recognizes(&self, language: &str) -> bool {
    self
      .highlighter
      .supports_language(&self.resolve_language(language))
  }

  /// Highlight a block whose `pre` element carries the class `language`.
  ///
  /// The returned stylesheet only matches `pre.<language>` elements.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] for unknown languages and
  /// propagates backend failures.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
  ) -> SyntaxResult<Highlighted> {
    let resolved_language = self.resolve_language(language);
    if !self.highlighter.supports_language(&resolved_language) {
      return Err(SyntaxError::UnsupportedLanguage(resolved_language));
    }

    let theme = self.config.default_theme.as_deref();
    let highlighted =
      self.highlighter.highlight(code, &resolved_language, theme)?;

    Ok(Highlighted {
      css:  scope_stylesheet(&highlighted.css, &format!("pre.{language}")),
      html: highlighted.html,
    })
  }
}
