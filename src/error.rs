//! Error types for ncexport.
//!
//! This module provides a unified error handling approach using `thiserror`.
//! Every variant maps onto a process exit code through [`ExportError::exit_code`],
//! mirroring the status codes the netCDF C library reports.

use crate::data::ElementKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ncexport operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// netCDF status codes used when an error did not come straight from the library.
pub mod status {
    /// Generic failure for unsupported input.
    pub const UNSUPPORTED: i32 = -1;
    /// Invalid argument (`NC_EINVAL`).
    pub const NC_EINVAL: i32 = -36;
    /// Attribute not found (`NC_ENOTATT`).
    pub const NC_ENOTATT: i32 = -43;
    /// Not a valid data type or type mismatch (`NC_EBADTYPE`).
    pub const NC_EBADTYPE: i32 = -45;
    /// Variable not found (`NC_ENOTVAR`).
    pub const NC_ENOTVAR: i32 = -49;
    /// Start + count exceeds dimension bound (`NC_EEDGE`).
    pub const NC_EEDGE: i32 = -57;
    /// Failure outside the netCDF library (I/O on output files).
    pub const IO: i32 = 1;
}

/// Errors that can occur while converting a dataset.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A call into the dataset library failed.
    #[error("NetCDF error in: {operation} with status: {status} ({message})")]
    NetCDF {
        operation: String,
        status: i32,
        message: String,
    },

    /// The dataset does not have exactly one dimension.
    #[error("only 1-dimensional NetCDF files are supported, found {found} dimensions")]
    UnsupportedShape { found: usize },

    /// The file is not one of the recognized netCDF formats.
    #[error("unrecognized file format")]
    UnsupportedFormat,

    /// A variable required by the flight record does not exist.
    #[error("variable not found: {name}")]
    VariableNotFound { name: String },

    /// A variable exists but was skipped while loading columns.
    #[error("variable '{name}' has no loaded column")]
    ColumnUnavailable { name: String },

    /// A column holds a different element kind than the one required.
    #[error("invalid NetCDF type for '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: ElementKind,
        found: ElementKind,
    },

    /// A required attribute is missing.
    #[error("attribute not found: {name}")]
    AttributeNotFound { name: String },

    /// The launch time attribute does not follow `YYYY-MM-DDTHH:MM:SS`.
    #[error("cannot parse launch time '{text}': expected YYYY-MM-DDTHH:MM:SS")]
    InvalidLaunchTime { text: String },

    /// A read returned a different number of values than the shared dimension.
    #[error("variable '{name}' returned {found} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// Failed to write an output file.
    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Create a NetCDF error for a failed library operation.
    pub fn netcdf(operation: impl Into<String>, err: netcdf::Error) -> Self {
        let status = match &err {
            netcdf::Error::Netcdf(code) => *code,
            _ => status::UNSUPPORTED,
        };
        Self::NetCDF {
            operation: operation.into(),
            status,
            message: err.to_string(),
        }
    }

    /// Create a VariableNotFound error.
    pub fn variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }

    /// Create an AttributeNotFound error.
    pub fn attribute_not_found(name: impl Into<String>) -> Self {
        Self::AttributeNotFound { name: name.into() }
    }

    /// Create an OutputWrite error.
    pub fn output_write(path: PathBuf, source: std::io::Error) -> Self {
        Self::OutputWrite { path, source }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NetCDF { status, .. } => *status,
            Self::UnsupportedShape { .. } | Self::UnsupportedFormat => status::UNSUPPORTED,
            Self::VariableNotFound { .. } | Self::ColumnUnavailable { .. } => status::NC_ENOTVAR,
            Self::TypeMismatch { .. } => status::NC_EBADTYPE,
            Self::AttributeNotFound { .. } => status::NC_ENOTATT,
            Self::InvalidLaunchTime { .. } => status::NC_EINVAL,
            Self::LengthMismatch { .. } => status::NC_EEDGE,
            Self::OutputWrite { .. } | Self::Io(_) => status::IO,
        }
    }
}

impl From<netcdf::Error> for ExportError {
    fn from(err: netcdf::Error) -> Self {
        Self::netcdf("netcdf", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_status_becomes_exit_code() {
        let err = ExportError::netcdf("nc_open", netcdf::Error::Netcdf(-51));
        assert_eq!(err.exit_code(), -51);
        assert!(err.to_string().starts_with("NetCDF error in: nc_open with status: -51"));
    }

    #[test]
    fn shape_errors_exit_with_minus_one() {
        assert_eq!(ExportError::UnsupportedShape { found: 2 }.exit_code(), -1);
        assert_eq!(ExportError::UnsupportedFormat.exit_code(), -1);
    }

    #[test]
    fn missing_variable_uses_enotvar() {
        assert_eq!(
            ExportError::variable_not_found("press").exit_code(),
            status::NC_ENOTVAR
        );
    }
}
