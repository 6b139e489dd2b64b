//! ncexport - Convert one-dimensional netCDF files into text tables.
//!
//! Every variable sharing the single dimension of a dataset becomes a column
//! of a generic CSV table. Radiosonde soundings are additionally written as a
//! fixed-width NOAA/GMD flight record (`flt.dat`).
//!
//! # Features
//!
//! - Classic, 64-bit offset and netCDF-4 files
//! - Byte, char, short, int, float and double variables
//! - CSV header rows for names, standard names, long names and units
//! - Flight records with unit conversions and a launch-time header
//! - Outputs appear atomically; a failed conversion leaves no partial file
//!
//! # Example
//!
//! ```ignore
//! use ncexport::batch::{convert, OutputPaths};
//! use ncexport::data::NetcdfSource;
//! use std::path::Path;
//!
//! let input = Path::new("sounding.nc");
//! let source = NetcdfSource::open(input)?;
//! let report = convert(&source, &OutputPaths::for_input(input), chrono::Utc::now())?;
//! println!("wrote {} rows to {}", report.rows, report.outputs.csv.display());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod batch;
pub mod data;
pub mod error;
pub mod export;
pub mod util;

pub use error::{ExportError, Result};
