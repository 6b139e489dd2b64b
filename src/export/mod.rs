//! Text exporters.
//!
//! Both formats use CRLF line endings.

mod flight;
mod launch_time;
mod table;

pub use flight::{FlightRecordExporter, DATA_COLUMNS, HEADER_LINES, REQUIRED_VARIABLES};
pub use launch_time::{LaunchTime, LAUNCH_TIME_ATTRIBUTE};
pub use table::TableExporter;

/// Line terminator of every exported file.
pub const LINE_END: &str = "\r\n";

/// Separator between CSV fields.
pub const FIELD_SEPARATOR: &str = ", ";
