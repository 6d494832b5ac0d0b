pub mod discovery;
pub mod output;

pub use crate::utils::{
  discovery::{discover_sources, resolve_sources},
  output::{run_pdf_command, write_output},
};
