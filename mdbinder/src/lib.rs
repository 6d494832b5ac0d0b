//! Expose mdbinder's internal API for use in integration tests. It is not
//! meant as a stable library interface, use `mdbinder-core` for that.
pub mod build;
pub mod cli;
pub mod html;
pub mod utils;
