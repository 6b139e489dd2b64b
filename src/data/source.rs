//! Dataset access abstraction.
//!
//! Everything the exporters need from a self-describing array file goes
//! through [`DatasetSource`]. [`NetcdfSource`](super::NetcdfSource) backs it
//! with a netCDF file; [`MemoryDataset`](super::MemoryDataset) backs it with
//! plain vectors.

use crate::error::Result;
use std::fmt;

/// Element kinds a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 8-bit integer, written as unsigned.
    Byte,
    /// Single character.
    Char,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
}

impl ElementKind {
    /// Short lowercase name, as shown in progress output.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Byte => "byte",
            ElementKind::Char => "char",
            ElementKind::Int16 => "short",
            ElementKind::Int32 => "int",
            ElementKind::Float32 => "float",
            ElementKind::Float64 => "double",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// On-disk format of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// netCDF classic (CDF-1).
    Classic,
    /// netCDF 64-bit offset (CDF-2).
    Offset64,
    /// netCDF-4 (HDF5 based).
    Netcdf4,
    /// Anything else.
    Unrecognized,
}

impl FileFormat {
    /// Detect the format from the first bytes of a file.
    pub fn from_magic(header: &[u8]) -> Self {
        const HDF5_SIGNATURE: &[u8] = b"\x89HDF\r\n\x1a\n";

        match header {
            [b'C', b'D', b'F', 1, ..] => FileFormat::Classic,
            [b'C', b'D', b'F', 2, ..] => FileFormat::Offset64,
            h if h.starts_with(HDF5_SIGNATURE) => FileFormat::Netcdf4,
            _ => FileFormat::Unrecognized,
        }
    }

    /// Human readable description.
    pub fn description(self) -> &'static str {
        match self {
            FileFormat::Classic => "classic file format",
            FileFormat::Offset64 => "64-bit file format",
            FileFormat::Netcdf4 => "netcdf4 file format",
            FileFormat::Unrecognized => "unrecognized file format",
        }
    }
}

/// A dimension declared by the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionInfo {
    /// Dimension name.
    pub name: String,
    /// Current length.
    pub len: usize,
    /// Whether the dimension is unlimited.
    pub unlimited: bool,
}

/// Identity and shape of one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    /// Variable name.
    pub name: String,
    /// Element kind, `None` when the stored type is not one we can load.
    pub kind: Option<ElementKind>,
    /// Name of the stored type, for diagnostics.
    pub type_name: String,
    /// Number of dimensions.
    pub rank: usize,
    /// Number of attributes attached to the variable.
    pub attribute_count: usize,
}

/// Where an attribute lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeTarget {
    /// Attached to the dataset as a whole.
    Global,
    /// Attached to the variable with this index.
    Variable(usize),
}

/// Read access to a self-describing array dataset.
///
/// Variables are addressed by index `0..variable_count()`. Closing happens on drop.
pub trait DatasetSource {
    /// On-disk format of the dataset.
    fn format(&self) -> FileFormat;

    /// All dimensions, in declaration order.
    fn dimensions(&self) -> Result<Vec<DimensionInfo>>;

    /// Names of the global attributes.
    fn global_attribute_names(&self) -> Result<Vec<String>>;

    /// Number of variables.
    fn variable_count(&self) -> Result<usize>;

    /// Identity and shape of a variable.
    fn variable_info(&self, index: usize) -> Result<VariableInfo>;

    /// Index of the variable with this exact name.
    fn variable_index(&self, name: &str) -> Result<Option<usize>>;

    /// Declared length of an attribute, `None` when it is absent.
    fn attribute_length(&self, target: AttributeTarget, name: &str) -> Result<Option<usize>>;

    /// Raw text bytes of an attribute. May run past the declared length.
    fn read_attribute_text(&self, target: AttributeTarget, name: &str) -> Result<Vec<u8>>;

    /// Read a byte variable.
    fn read_bytes(&self, index: usize) -> Result<Vec<u8>>;

    /// Read a char variable.
    fn read_chars(&self, index: usize) -> Result<Vec<u8>>;

    /// Read a 16-bit integer variable.
    fn read_i16(&self, index: usize) -> Result<Vec<i16>>;

    /// Read a 32-bit integer variable.
    fn read_i32(&self, index: usize) -> Result<Vec<i32>>;

    /// Read a 32-bit float variable.
    fn read_f32(&self, index: usize) -> Result<Vec<f32>>;

    /// Read a 64-bit float variable.
    fn read_f64(&self, index: usize) -> Result<Vec<f64>>;
}
