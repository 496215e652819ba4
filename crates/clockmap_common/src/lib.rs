//! Shared value types used across the clockmap crates.
//!
//! This crate provides clock [`Frequency`] values with unit parsing,
//! [`Nanoseconds`] for periods and delays with deterministic formatting,
//! and the [`Glob`] pattern type used by the signal classifier and the
//! template patcher.

#![warn(missing_docs)]

pub mod frequency;
pub mod glob;
pub mod nanos;

pub use frequency::{Frequency, ParseFrequencyError};
pub use glob::Glob;
pub use nanos::Nanoseconds;
