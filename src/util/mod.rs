//! Utility functions.
//!
//! Number and units formatting shared by the exporters.

pub mod formatters;
