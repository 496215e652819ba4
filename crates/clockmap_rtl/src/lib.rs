//! Port-level RTL analysis for clockmap.
//!
//! The crate reads a module's port list as plain text and derives its
//! clocking structure in three stages:
//!
//! 1. [`extract_ports`] turns declaration text into [`Port`] records
//!    ([`locate_module`] finds the port list inside a whole source file).
//! 2. [`classify`] labels each port with a [`ClockRole`] using an ordered
//!    [`PatternTable`] and binds resets and data signals to a clock.
//! 3. [`DomainGraph::build`] collects the distinct [`ClockDomain`]s and the
//!    ordered [`CrossingPair`]s between them.
//!
//! Nothing here fails: unusable declarations and unbound signals are
//! reported as diagnostics and the best-effort result is returned.

#![warn(missing_docs)]

pub mod classify;
pub mod domain;
pub mod extract;
pub mod module;
pub mod pattern;
pub mod port;

pub use classify::{classify, Binding, ClassifiedPort, Classification, ClockRole};
pub use domain::{ClockDomain, CrossingPair, DomainGraph};
pub use extract::{extract_ports, PortExtraction};
pub use module::{extract_module_ports, locate_module, ModuleHeader};
pub use pattern::PatternTable;
pub use port::{Direction, Port};
