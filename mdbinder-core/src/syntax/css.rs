//! Stylesheet scoping for highlighted blocks.
use std::sync::LazyLock;

use regex::Regex;

use super::CLASS_PREFIX;
use crate::utils::never_matching_regex;

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?s)/\*.*?\*/").unwrap_or_else(|e| {
    log::error!("Failed to compile COMMENT_RE regex: {e}");
    never_matching_regex()
  })
});

static RULE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"([^{}]+)\{([^{}]*)\}").unwrap_or_else(|e| {
    log::error!("Failed to compile RULE_RE regex: {e}");
    never_matching_regex()
  })
});

/// Rewrite every rule of `css` so it only applies below `scope`.
///
/// Comments and empty rules are dropped, each rule ends up on one line. The
/// backend's block-level class is mapped onto the scope element itself, so
/// the block background lands on the `pre`.
#[must_use]
pub fn scope_stylesheet(css: &str, scope: &str) -> String {
  let block_class = format!(".{CLASS_PREFIX}code");
  let without_comments = COMMENT_RE.replace_all(css, "");

  let mut rules = Vec::new();
  for caps in RULE_RE.captures_iter(&without_comments) {
    let declarations = caps[2]
      .lines()
      .map(str::trim)
      .filter(|line| !line.is_empty())
      .collect::<Vec<_>>()
      .join(" ");
    if declarations.is_empty() {
      continue;
    }

    let selectors = caps[1]
      .split(',')
      .map(str::trim)
      .filter(|selector| !selector.is_empty())
      .map(|selector| {
        if selector == block_class {
          scope.to_string()
        } else {
          format!("{scope} {selector}")
        }
      })
      .collect::<Vec<_>>()
      .join(", ");

    rules.push(format!("{selectors} {{ {declarations} }}"));
  }

  rules.join("\n")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_scope_prefixes_every_selector() {
    let css = "/*\n * theme generated\n */\n\n.hl-comment, .hl-punctuation \
               {\n color: #969896;\n font-style: italic;\n}\n";
    assert_eq!(
      scope_stylesheet(css, "pre.php"),
      "pre.php .hl-comment, pre.php .hl-punctuation { color: #969896; \
       font-style: italic; }"
    );
  }

  #[test]
  fn test_block_class_maps_to_scope() {
    let css = ".hl-code {\n color: #323232;\n background-color: #ffffff;\n}\n";
    assert_eq!(
      scope_stylesheet(css, "pre.rust"),
      "pre.rust { color: #323232; background-color: #ffffff; }"
    );
  }

  #[test]
  fn test_empty_rules_are_dropped() {
    assert_eq!(scope_stylesheet(".hl-x {\n}\n", "pre.c"), "");
  }
}
