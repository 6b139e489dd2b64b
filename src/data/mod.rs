//! Data reading and representation.
//!
//! This module handles reading one-dimensional variables out of a dataset
//! and holding them as typed columns together with their descriptive metadata.

mod column;
mod memory;
mod metadata;
mod reader;
mod source;
mod variable_data;

pub use column::Column;
pub use memory::{MemoryDataset, MemoryVariable};
pub use metadata::{read_text_attribute, VariableMetadata, LONG_NAME, STANDARD_NAME, UNITS};
pub use reader::NetcdfSource;
pub use source::{
    AttributeTarget, DatasetSource, DimensionInfo, ElementKind, FileFormat, VariableInfo,
};
pub use variable_data::{load_column, ColumnStore, LoadOutcome, LoadedVariable, SkipReason};
