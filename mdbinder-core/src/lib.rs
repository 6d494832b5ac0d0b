//! # mdbinder-core
//!
//! Assembles an ordered set of Markdown files into one paginated,
//! cross-linked HTML document and derives a table of contents from its
//! headings.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mdbinder_core::{
//!   Assembler,
//!   OutlineBuilder,
//!   outline,
//!   syntax::create_default_manager,
//! };
//!
//! let assembler = Assembler::new(".")
//!   .with_syntax_manager(create_default_manager(None).ok());
//! let document = assembler.assemble_files(&["intro.md", "usage.md"])?;
//!
//! let markup = document.markup();
//! let toc = outline::render(&OutlineBuilder::new(1, 4).build(&markup));
//! # Ok::<(), mdbinder_core::AssembleError>(())
//! ```
//!
//! ## Pipeline
//!
//! Every source becomes one page: Markdown is rendered with comrak, code
//! blocks are folded into `<pre class="lang">` and highlighted, headings get
//! run-unique anchors, and links and images are rewritten so they work
//! inside the merged document.

pub mod assemble;
pub mod dom;
mod error;
pub mod markdown;
pub mod outline;
pub mod postprocess;
pub mod resolve;
pub mod slug;
pub mod syntax;
mod types;
pub mod utils;

pub use crate::{
  assemble::{Assembler, RunContext},
  error::{AssembleError, AssembleResult},
  markdown::{ComrakRenderer, MarkdownRenderer},
  outline::{Outline, OutlineBuilder, OutlineNode},
  slug::SlugAssigner,
  types::{Document, HeadingAnchor, PAGE_BREAK, Page, SourceDocument},
};
