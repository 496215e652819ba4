//! Timing-constraint synthesis for clockmap.
//!
//! Turns a [`DomainGraph`](clockmap_rtl::DomainGraph) and the classified
//! ports of a module into an SDC-style [`ConstraintDocument`]: one clock per
//! domain, a global uncertainty, false paths for every ordered crossing and
//! one input or output delay per non-clock port.
//!
//! The document carries no state between runs; identical inputs render to
//! byte-identical text.

#![warn(missing_docs)]

pub mod constraints;
pub mod synth;

pub use constraints::{ConstraintDocument, DelayKind, Directive};
pub use synth::{synthesize, Environment, SynthesisParams};
