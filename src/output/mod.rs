//! Output formatting.
//!
//! - [`terminal`] - field formatting and colored diff printing
//! - [`csv`] - CSV tables for the address tools
//! - [`statement`] - plain-text invoice statements

mod csv;
mod statement;
pub mod terminal;

// Re-export public functions
pub use csv::{print_cidr_list_csv, print_vlsm_csv};
pub use statement::render_statement;
pub use terminal::{format_field, pad_label, print_env_diff};
