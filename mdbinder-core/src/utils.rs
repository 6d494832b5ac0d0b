use std::path::{Component, Path, PathBuf};

/// Regex used in place of a pattern that failed to compile.
#[must_use]
pub fn never_matching_regex() -> regex::Regex {
  // Asserts something impossible, so it never matches
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  regex::Regex::new(r"[^\s\S]")
    .expect("regex pattern [^\\s\\S] should always compile")
}

/// Render a path with `/` separators regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
  path
    .components()
    .filter_map(|component| {
      match component {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        Component::ParentDir => Some("..".to_string()),
        _ => None,
      }
    })
    .collect::<Vec<_>>()
    .join("/")
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` above the start of a relative path is kept.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {},
      Component::ParentDir => {
        let can_pop = matches!(
          out.components().next_back(),
          Some(Component::Normal(_))
        );
        if can_pop {
          out.pop();
        } else {
          out.push("..");
        }
      },
      other => out.push(other.as_os_str()),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_to_slash_joins_normal_components() {
    assert_eq!(to_slash(Path::new("docs/guide/intro.md")), "docs/guide/intro.md");
    assert_eq!(to_slash(Path::new("./a/b.md")), "a/b.md");
  }

  #[test]
  fn test_normalize_lexically() {
    assert_eq!(
      normalize_lexically(Path::new("docs/./guide/../intro.md")),
      PathBuf::from("docs/intro.md")
    );
    assert_eq!(
      normalize_lexically(Path::new("../x.md")),
      PathBuf::from("../x.md")
    );
  }

  #[test]
  fn test_never_matching_regex() {
    let re = never_matching_regex();
    assert!(!re.is_match(""));
    assert!(!re.is_match("anything at all"));
  }
}
