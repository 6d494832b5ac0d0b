//! Trait-based syntax highlighting for fenced code blocks.
//!
//! Backends produce class-based markup plus a stylesheet for those classes.
//! The default backend is Syntect, extended with two-face syntax definitions.

pub mod css;
pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{Highlighted, SyntaxConfig, SyntaxHighlighter, SyntaxManager};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Prefix of every class emitted by the highlighter.
pub const CLASS_PREFIX: &str = "hl-";

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when the crate was built
/// without a highlighting backend.
pub fn create_default_manager(
  theme: Option<String>,
) -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    create_syntect_manager(theme)
  }

  #[cfg(not(feature = "syntect"))]
  {
    let _ = theme;
    Err(SyntaxError::NoBackendAvailable)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn test_syntax_config_default() {
    let config = SyntaxConfig::default();
    assert_eq!(config.language_aliases["html5"], "html");
    assert_eq!(config.language_aliases["sass"], "scss");
    assert!(config.default_theme.is_none());
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlight_emits_classes_and_css() {
    let highlighter = SyntectHighlighter::default();
    let highlighted = highlighter
      .highlight("fn main() {}\n", "rust", None)
      .expect("rust should highlight");
    assert!(highlighted.html.contains("main"));
    assert!(highlighted.html.contains("class=\"hl-"));
    assert!(highlighted.css.contains(".hl-"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_manager_scopes_stylesheet_to_block_class() {
    let manager =
      create_default_manager(None).expect("syntect backend is enabled");
    let highlighted = manager
      .highlight_code("<?php echo 1; ?>\n", "php")
      .expect("php should highlight");
    assert!(!highlighted.css.is_empty());
    for rule in highlighted.css.lines() {
      assert!(rule.starts_with("pre.php"), "unscoped rule: {rule}");
    }
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_configured_theme_changes_stylesheet() {
    let code = "fn main() {}\n";
    let default = create_default_manager(None)
      .expect("syntect backend is enabled")
      .highlight_code(code, "rust")
      .expect("rust should highlight");
    let nord = create_default_manager(Some("Nord".to_string()))
      .expect("syntect backend is enabled")
      .highlight_code(code, "rust")
      .expect("rust should highlight");
    assert_eq!(default.html, nord.html);
    assert_ne!(default.css, nord.css);
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_manager_rejects_unknown_language() {
    let manager =
      create_default_manager(None).expect("syntect backend is enabled");
    assert!(!manager.recognizes("no-such-language"));
    assert!(matches!(
      manager.highlight_code("x", "no-such-language"),
      Err(SyntaxError::UnsupportedLanguage(_))
    ));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_alias_resolution() {
    let manager =
      create_default_manager(None).expect("syntect backend is enabled");
    assert_eq!(manager.resolve_language("HTML5"), "html");
    assert_eq!(manager.resolve_language("rust"), "rust");
    assert!(manager.recognizes("html5"));
    assert!(manager.recognizes("javascript"));
  }
}
