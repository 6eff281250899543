//! Table loading.
//!
//! Most callers should use [`load`] / [`load_with_options`] (from [`unified`]), which decode raw
//! bytes under a declared [`crate::format::TableFormat`] into an in-memory
//! [`crate::types::Table`], inferring one type per column.
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (Cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
mod infer;
pub mod unified;

pub use unified::{LoadOptions, load, load_from_path, load_named, load_with_options};
