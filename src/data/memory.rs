//! In-memory dataset.
//!
//! [`MemoryDataset`] implements [`DatasetSource`] over plain values, so the
//! loaders and exporters can run without a file on disk.

use super::{
    AttributeTarget, Column, DatasetSource, DimensionInfo, ElementKind, FileFormat, VariableInfo,
};
use crate::error::{status, ExportError, Result};

/// A named attribute with raw text bytes.
#[derive(Debug, Clone)]
struct MemoryAttribute {
    name: String,
    bytes: Vec<u8>,
    declared_len: usize,
}

impl MemoryAttribute {
    fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            bytes: value.as_bytes().to_vec(),
            declared_len: value.len(),
        }
    }
}

/// Values held by a [`MemoryVariable`].
#[derive(Debug, Clone)]
enum MemoryValues {
    Loaded(Column),
    Unsupported(String),
}

/// A variable in a [`MemoryDataset`].
#[derive(Debug, Clone)]
pub struct MemoryVariable {
    name: String,
    values: MemoryValues,
    rank: usize,
    attributes: Vec<MemoryAttribute>,
}

impl MemoryVariable {
    /// A rank-1 variable holding `column`.
    pub fn new(name: impl Into<String>, column: Column) -> Self {
        Self {
            name: name.into(),
            values: MemoryValues::Loaded(column),
            rank: 1,
            attributes: Vec::new(),
        }
    }

    /// A variable whose stored type cannot be loaded.
    pub fn unsupported(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: MemoryValues::Unsupported(type_name.into()),
            rank: 1,
            attributes: Vec::new(),
        }
    }

    /// Override the number of dimensions reported for this variable.
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    /// Attach a text attribute.
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push(MemoryAttribute::text(name, value));
        self
    }

    /// Attach an attribute whose stored bytes may run past its declared length.
    pub fn raw_attribute(mut self, name: &str, bytes: Vec<u8>, declared_len: usize) -> Self {
        self.attributes.push(MemoryAttribute {
            name: name.to_string(),
            bytes,
            declared_len,
        });
        self
    }
}

/// A dataset held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryDataset {
    format: FileFormat,
    dimensions: Vec<DimensionInfo>,
    global_attributes: Vec<MemoryAttribute>,
    variables: Vec<MemoryVariable>,
}

impl MemoryDataset {
    /// A dataset with a single dimension.
    pub fn new(dimension: impl Into<String>, len: usize) -> Self {
        Self::without_dimensions().dimension(dimension, len)
    }

    /// A dataset with no dimensions at all.
    pub fn without_dimensions() -> Self {
        Self {
            format: FileFormat::Netcdf4,
            dimensions: Vec::new(),
            global_attributes: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Declare another dimension.
    pub fn dimension(mut self, name: impl Into<String>, len: usize) -> Self {
        self.dimensions.push(DimensionInfo {
            name: name.into(),
            len,
            unlimited: false,
        });
        self
    }

    /// Report a different file format.
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }

    /// Attach a global text attribute.
    pub fn global_attribute(mut self, name: &str, value: &str) -> Self {
        self.global_attributes.push(MemoryAttribute::text(name, value));
        self
    }

    /// Append a variable; its index is the number of variables added before it.
    pub fn variable(mut self, variable: MemoryVariable) -> Self {
        self.variables.push(variable);
        self
    }

    fn get(&self, index: usize, operation: &str) -> Result<&MemoryVariable> {
        self.variables.get(index).ok_or_else(|| ExportError::NetCDF {
            operation: operation.to_string(),
            status: status::NC_ENOTVAR,
            message: format!("no variable with index {}", index),
        })
    }

    fn column(&self, index: usize, operation: &str) -> Result<&Column> {
        match &self.get(index, operation)?.values {
            MemoryValues::Loaded(column) => Ok(column),
            MemoryValues::Unsupported(type_name) => Err(type_error(operation, type_name)),
        }
    }

    fn attributes(&self, target: AttributeTarget) -> Result<&[MemoryAttribute]> {
        match target {
            AttributeTarget::Global => Ok(&self.global_attributes),
            AttributeTarget::Variable(index) => Ok(&self.get(index, "nc_inq_att")?.attributes),
        }
    }

    fn find_attribute(
        &self,
        target: AttributeTarget,
        name: &str,
    ) -> Result<Option<&MemoryAttribute>> {
        Ok(self.attributes(target)?.iter().find(|a| a.name == name))
    }
}

fn type_error(operation: &str, found: &str) -> ExportError {
    ExportError::NetCDF {
        operation: operation.to_string(),
        status: status::NC_EBADTYPE,
        message: format!("stored type is {}", found),
    }
}

impl DatasetSource for MemoryDataset {
    fn format(&self) -> FileFormat {
        self.format
    }

    fn dimensions(&self) -> Result<Vec<DimensionInfo>> {
        Ok(self.dimensions.clone())
    }

    fn global_attribute_names(&self) -> Result<Vec<String>> {
        Ok(self.global_attributes.iter().map(|a| a.name.clone()).collect())
    }

    fn variable_count(&self) -> Result<usize> {
        Ok(self.variables.len())
    }

    fn variable_info(&self, index: usize) -> Result<VariableInfo> {
        let var = self.get(index, "nc_inq_var")?;
        let (kind, type_name) = match &var.values {
            MemoryValues::Loaded(column) => (Some(column.kind()), column.kind().name().to_string()),
            MemoryValues::Unsupported(type_name) => (None, type_name.clone()),
        };
        Ok(VariableInfo {
            name: var.name.clone(),
            kind,
            type_name,
            rank: var.rank,
            attribute_count: var.attributes.len(),
        })
    }

    fn variable_index(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.variables.iter().position(|v| v.name == name))
    }

    fn attribute_length(&self, target: AttributeTarget, name: &str) -> Result<Option<usize>> {
        Ok(self.find_attribute(target, name)?.map(|a| a.declared_len))
    }

    fn read_attribute_text(&self, target: AttributeTarget, name: &str) -> Result<Vec<u8>> {
        self.find_attribute(target, name)?
            .map(|a| a.bytes.clone())
            .ok_or_else(|| ExportError::NetCDF {
                operation: "nc_get_att_text".to_string(),
                status: status::NC_ENOTATT,
                message: format!("attribute {} not found", name),
            })
    }

    fn read_bytes(&self, index: usize) -> Result<Vec<u8>> {
        match self.column(index, "nc_get_var_uchar")? {
            Column::Byte(a) => Ok(a.to_vec()),
            other => Err(type_error("nc_get_var_uchar", other.kind().name())),
        }
    }

    fn read_chars(&self, index: usize) -> Result<Vec<u8>> {
        match self.column(index, "nc_get_var_text")? {
            Column::Char(a) => Ok(a.to_vec()),
            other => Err(type_error("nc_get_var_text", other.kind().name())),
        }
    }

    fn read_i16(&self, index: usize) -> Result<Vec<i16>> {
        match self.column(index, "nc_get_var_short")? {
            Column::Int16(a) => Ok(a.to_vec()),
            other => Err(type_error("nc_get_var_short", other.kind().name())),
        }
    }

    fn read_i32(&self, index: usize) -> Result<Vec<i32>> {
        match self.column(index, "nc_get_var_int")? {
            Column::Int32(a) => Ok(a.to_vec()),
            other => Err(type_error("nc_get_var_int", other.kind().name())),
        }
    }

    fn read_f32(&self, index: usize) -> Result<Vec<f32>> {
        match self.column(index, "nc_get_var_float")? {
            Column::Float32(a) => Ok(a.to_vec()),
            other => Err(type_error("nc_get_var_float", other.kind().name())),
        }
    }

    fn read_f64(&self, index: usize) -> Result<Vec<f64>> {
        match self.column(index, "nc_get_var_double")? {
            Column::Float64(a) => Ok(a.to_vec()),
            other => Err(type_error("nc_get_var_double", other.kind().name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn reports_variables_in_insertion_order() {
        let dataset = MemoryDataset::new("time", 2)
            .variable(MemoryVariable::new("a", Column::Int32(array![1, 2])).attribute("units", "1"))
            .variable(MemoryVariable::unsupported("b", "int64").with_rank(2));

        assert_eq!(dataset.variable_count().unwrap(), 2);
        assert_eq!(dataset.variable_index("b").unwrap(), Some(1));
        assert_eq!(dataset.variable_index("c").unwrap(), None);

        let a = dataset.variable_info(0).unwrap();
        assert_eq!(a.kind, Some(ElementKind::Int32));
        assert_eq!(a.attribute_count, 1);

        let b = dataset.variable_info(1).unwrap();
        assert_eq!(b.kind, None);
        assert_eq!(b.type_name, "int64");
        assert_eq!(b.rank, 2);
    }

    #[test]
    fn typed_reads_are_strict() {
        let dataset = MemoryDataset::new("time", 1)
            .variable(MemoryVariable::new("t", Column::Float64(array![1.0])));

        assert_eq!(dataset.read_f64(0).unwrap(), vec![1.0]);
        let err = dataset.read_f32(0).unwrap_err();
        assert_eq!(err.exit_code(), status::NC_EBADTYPE);
        assert_eq!(dataset.read_f64(3).unwrap_err().exit_code(), status::NC_ENOTVAR);
    }
}
