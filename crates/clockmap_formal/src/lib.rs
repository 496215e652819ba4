//! Formal-verification configuration upkeep for clockmap.
//!
//! A formal run configuration (e.g. a SymbiYosys `.sby` file) lists the
//! RTL sources twice: as read commands and as file paths. This crate scans
//! the source directory into a sorted [`FileSet`] and rewrites exactly those
//! two sections of a [`TemplateDocument`] with [`patch`], leaving all other
//! lines byte-identical. Patching is idempotent.

#![warn(missing_docs)]

pub mod error;
pub mod fileset;
pub mod patch;
pub mod template;

pub use error::{PatchError, ScanError};
pub use fileset::FileSet;
pub use patch::{patch, PatchSpec};
pub use template::TemplateDocument;
