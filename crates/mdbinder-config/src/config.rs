use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "md2pdf.json";

/// Alternative configuration file names, checked after [`CONFIG_FILE_NAME`].
const FALLBACK_CONFIG_FILE_NAMES: [&str; 1] = ["md2pdf.toml"];

/// Placeholder replaced by the working directory in path settings.
pub const CWD_PLACEHOLDER: &str = "{CWD}";

const DEFAULT_DOCUMENT_TITLE: &str = "Documentation";
const DEFAULT_TOC_MAX_LEVEL: u8 = 4;
const DEFAULT_MARGIN_TOP_IF_HEADER: u32 = 25;

/// Configuration of one mdbinder project.
///
/// Loaded from `md2pdf.json` (or a TOML file with the same keys) and
/// adjusted through `--config KEY=VALUE` flags. Keys use camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
  /// Target PDF file. The assembled HTML is written next to it.
  pub output_file: Option<PathBuf>,

  /// Markdown sources in output order. Discovered when empty.
  pub files: Vec<PathBuf>,

  /// Search subdirectories when discovering sources.
  pub recursive: bool,

  /// Document title used for the HTML `title` element.
  pub document_title: String,

  /// Title substituted into header and footer templates.
  pub page_title: String,

  /// HTML template shown at the top of every page.
  pub header: Option<PathBuf>,

  /// HTML template shown at the bottom of every page.
  pub footer: Option<PathBuf>,

  /// Additional stylesheets linked after the built-in one.
  #[serde(rename = "userCSS")]
  pub user_css: Vec<PathBuf>,

  /// Deepest heading level listed in the table of contents, `0` disables it.
  #[serde(deserialize_with = "toc_level")]
  pub toc_max_level: u8,

  /// Explicit switch for the table of contents.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub toc_enabled: Option<bool>,

  /// Heading of the table of contents.
  pub toc_title: String,

  /// Top page margin in millimeters when a header is used.
  #[serde(deserialize_with = "margin")]
  pub page_margin_top_if_header: u32,

  /// Value of the document's `lang` attribute.
  pub language: String,

  /// Theme used for code highlighting.
  pub highlight_theme: String,

  /// Directory holding `document.html` or `default.css` overrides.
  pub template_dir: Option<PathBuf>,

  /// Command producing the PDF, `{input}` and `{output}` are substituted.
  pub pdf_command: Vec<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      output_file:               None,
      files:                     Vec::new(),
      recursive:                 false,
      document_title:            DEFAULT_DOCUMENT_TITLE.to_string(),
      page_title:                String::new(),
      header:                    None,
      footer:                    None,
      user_css:                  Vec::new(),
      toc_max_level:             DEFAULT_TOC_MAX_LEVEL,
      toc_enabled:               None,
      toc_title:                 "Contents".to_string(),
      page_margin_top_if_header: DEFAULT_MARGIN_TOP_IF_HEADER,
      language:                  "en".to_string(),
      highlight_theme:           "InspiredGitHub".to_string(),
      template_dir:              None,
      pdf_command:               Vec::new(),
    }
  }
}

/// Accept numbers written as numbers or strings; an empty string yields
/// `None`.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: TryFrom<u64>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum NumberOrText {
    Number(u64),
    Text(String),
  }

  let number = match NumberOrText::deserialize(deserializer)? {
    NumberOrText::Number(number) => number,
    NumberOrText::Text(text) if text.trim().is_empty() => {
      return Ok(None);
    },
    NumberOrText::Text(text) => {
      text.trim().parse::<u64>().map_err(|_| {
        serde::de::Error::custom(format!("expected a number, found '{text}'"))
      })?
    },
  };

  T::try_from(number)
    .map(Some)
    .map_err(|_| serde::de::Error::custom(format!("{number} is out of range")))
}

fn toc_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
  Ok(lenient_number(deserializer)?.unwrap_or(DEFAULT_TOC_MAX_LEVEL))
}

fn margin<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
  Ok(lenient_number(deserializer)?.unwrap_or(DEFAULT_MARGIN_TOP_IF_HEADER))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn parse_number<T: std::str::FromStr>(
  key: &str,
  value: &str,
) -> Result<T, ConfigError> {
  value.parse().map_err(|_| {
    ConfigError::Config(format!("Invalid value for '{key}': '{value}'"))
  })
}

fn optional_path(value: &str) -> Option<PathBuf> {
  (!value.is_empty()).then(|| PathBuf::from(value))
}

fn path_list(value: &str) -> Vec<PathBuf> {
  value
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(PathBuf::from)
    .collect()
}

fn expand_cwd(path: &Path, cwd: &str) -> PathBuf {
  let raw = path.to_string_lossy();
  if raw.contains(CWD_PLACEHOLDER) {
    PathBuf::from(raw.replace(CWD_PLACEHOLDER, cwd))
  } else {
    path.to_path_buf()
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content).map_err(|source| {
              ConfigError::Serde {
                path: path.to_path_buf(),
                source,
              }
            })
          },
          "toml" => {
            toml::from_str(&content).map_err(|source| {
              ConfigError::Toml {
                path: path.to_path_buf(),
                source,
              }
            })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load, override, normalize and validate the configuration of the project
  /// rooted at `cwd`.
  ///
  /// `config_file` is used when it exists, otherwise the default file names
  /// are looked up in `cwd`.
  ///
  /// # Errors
  ///
  /// Returns an error if no configuration file is found, it cannot be
  /// parsed, an override is invalid or a required setting is missing.
  pub fn load(
    config_file: Option<&Path>,
    config_overrides: &[String],
    cwd: &Path,
  ) -> Result<Self, ConfigError> {
    let path = config_file
      .filter(|path| path.exists())
      .map(Path::to_path_buf)
      .or_else(|| {
        if let Some(missing) = config_file {
          log::warn!(
            "Config file {} does not exist, looking for {CONFIG_FILE_NAME}",
            missing.display()
          );
        }
        Self::find_config_file(cwd)
      })
      .ok_or_else(|| {
        ConfigError::Config(format!(
          "No configuration found. Run `mdbinder init` to create \
           {CONFIG_FILE_NAME} in {}",
          cwd.display()
        ))
      })?;

    log::info!("Using config file: {}", path.display());
    let mut config = Self::from_file(&path)?;

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.normalize(cwd);
    config.validate()?;
    Ok(config)
  }

  /// Search for a config file in `dir`.
  #[must_use]
  pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    std::iter::once(CONFIG_FILE_NAME)
      .chain(FALLBACK_CONFIG_FILE_NAMES)
      .map(|name| dir.join(name))
      .find(|path| path.is_file())
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// List settings take comma separated values, `pdfCommand` is split on
  /// whitespace.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys and unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "outputFile" => self.output_file = optional_path(value),
      "files" => self.files = path_list(value),
      "recursive" => self.recursive = parse_bool(key, value)?,
      "documentTitle" => self.document_title = value.to_string(),
      "pageTitle" => self.page_title = value.to_string(),
      "header" => self.header = optional_path(value),
      "footer" => self.footer = optional_path(value),
      "userCSS" => self.user_css = path_list(value),
      "tocMaxLevel" => self.toc_max_level = parse_number(key, value)?,
      "tocEnabled" => {
        self.toc_enabled = if value.is_empty() {
          None
        } else {
          Some(parse_bool(key, value)?)
        };
      },
      "tocTitle" => self.toc_title = value.to_string(),
      "pageMarginTopIfHeader" => {
        self.page_margin_top_if_header = parse_number(key, value)?;
      },
      "language" => self.language = value.to_string(),
      "highlightTheme" => self.highlight_theme = value.to_string(),
      "templateDir" => self.template_dir = optional_path(value),
      "pdfCommand" => {
        self.pdf_command =
          value.split_whitespace().map(str::to_string).collect();
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }
    Ok(())
  }

  /// Fill in defaults for blank settings and expand `{CWD}` in paths.
  pub fn normalize(&mut self, cwd: &Path) {
    let cwd = cwd.to_string_lossy().replace('\\', "/");

    if self.document_title.trim().is_empty() {
      self.document_title = DEFAULT_DOCUMENT_TITLE.to_string();
    }
    if self.page_margin_top_if_header == 0 {
      self.page_margin_top_if_header = DEFAULT_MARGIN_TOP_IF_HEADER;
    }

    self.output_file = self
      .output_file
      .take()
      .filter(|path| !path.as_os_str().is_empty())
      .map(|path| expand_cwd(&path, &cwd));
    self.header = self
      .header
      .take()
      .filter(|path| !path.as_os_str().is_empty())
      .map(|path| expand_cwd(&path, &cwd));
    self.footer = self
      .footer
      .take()
      .filter(|path| !path.as_os_str().is_empty())
      .map(|path| expand_cwd(&path, &cwd));
    self.template_dir = self
      .template_dir
      .take()
      .filter(|path| !path.as_os_str().is_empty())
      .map(|path| expand_cwd(&path, &cwd));

    for path in self.files.iter_mut().chain(self.user_css.iter_mut()) {
      *path = expand_cwd(path, &cwd);
    }
    self.files.retain(|path| !path.as_os_str().is_empty());
    self.user_css.retain(|path| !path.as_os_str().is_empty());
  }

  /// Check settings that would make a build fail later on.
  ///
  /// # Errors
  ///
  /// Returns an error if `outputFile` is missing or `tocMaxLevel` exceeds 6.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.output_file.is_none() {
      return Err(ConfigError::Config(
        "Missing required setting 'outputFile'".to_string(),
      ));
    }

    if self.toc_max_level > 6 {
      return Err(ConfigError::Config(format!(
        "Invalid value for 'tocMaxLevel': {}. Expected 0 to 6",
        self.toc_max_level
      )));
    }

    Ok(())
  }

  /// Whether a table of contents is generated.
  ///
  /// Defaults to on whenever `tocMaxLevel` is positive.
  #[must_use]
  pub fn is_toc_enabled(&self) -> bool {
    self.toc_max_level > 0 && self.toc_enabled.unwrap_or(true)
  }

  /// Top page margin in millimeters.
  #[must_use]
  pub const fn margin_top(&self) -> u32 {
    if self.header.is_some() {
      self.page_margin_top_if_header
    } else {
      20
    }
  }

  /// Where the assembled HTML is written.
  ///
  /// An `outputFile` ending in `.html` is used as is, anything else gets its
  /// extension replaced.
  #[must_use]
  pub fn html_output_path(&self) -> Option<PathBuf> {
    let output = self.output_file.as_ref()?;
    let is_html = output
      .extension()
      .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
    Some(if is_html {
      output.clone()
    } else {
      output.with_extension("html")
    })
  }

  /// Look up a template file in `templateDir`.
  #[must_use]
  pub fn get_template_file(&self, name: &str) -> Option<PathBuf> {
    let path = self.template_dir.as_ref()?.join(name);
    path.is_file().then_some(path)
  }

  /// Write the default configuration file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file exists and `force` is not set, or if it
  /// cannot be written.
  pub fn generate_default_config(
    path: &Path,
    force: bool,
  ) -> Result<(), ConfigError> {
    if path.exists() && !force {
      return Err(ConfigError::Config(format!(
        "{} already exists. Use --force to overwrite it",
        path.display()
      )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
    {
      fs::create_dir_all(parent)?;
    }

    fs::write(path, mdbinder_templates::DEFAULT_CONFIG).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Write the starter header, footer and stylesheet into `dir`.
  ///
  /// Existing files are kept unless `force` is set. Returns the files that
  /// were written.
  ///
  /// # Errors
  ///
  /// Returns an error if the directory or a file cannot be written.
  pub fn export_assets(
    dir: &Path,
    force: bool,
  ) -> Result<Vec<PathBuf>, ConfigError> {
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for (name, content) in mdbinder_templates::starter_assets() {
      let path = dir.join(name);
      if path.exists() && !force {
        log::info!("Keeping existing {}", path.display());
        continue;
      }
      fs::write(&path, content)?;
      log::info!("Created {}", path.display());
      written.push(path);
    }

    Ok(written)
  }
}
