pub const DOCUMENT_TEMPLATE: &str = include_str!("../templates/document.html");
pub const DEFAULT_CSS: &str = include_str!("../templates/default.css");
pub const DEFAULT_CONFIG: &str = include_str!("../templates/md2pdf.json");

// Starter files written by `mdbinder init --assets`
pub const HEADER_TEMPLATE: &str = include_str!("../templates/header.html");
pub const FOOTER_TEMPLATE: &str = include_str!("../templates/footer.html");
pub const USER_CSS: &str = include_str!("../templates/md2pdf.css");

/// Starter files by the name they are written under.
#[must_use]
pub fn starter_assets() -> [(&'static str, &'static str); 3] {
  [
    ("header.html", HEADER_TEMPLATE),
    ("footer.html", FOOTER_TEMPLATE),
    ("md2pdf.css", USER_CSS),
  ]
}
