//! NetCDF file reader.

use super::{AttributeTarget, DatasetSource, DimensionInfo, ElementKind, FileFormat, VariableInfo};
use crate::error::{status, ExportError, Result};
use netcdf::types::{FloatType, IntType, NcVariableType};
use std::fmt::Display;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A netCDF file opened for reading.
pub struct NetcdfSource {
    path: PathBuf,
    file: netcdf::File,
    format: FileFormat,
    /// Variable names in id order; index into this is the variable index.
    names: Vec<String>,
}

impl std::fmt::Debug for NetcdfSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetcdfSource")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("variables", &self.names.len())
            .finish()
    }
}

impl NetcdfSource {
    /// Open a netCDF file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = netcdf::open(path).map_err(|e| ExportError::netcdf("nc_open", e))?;
        let format = sniff_format(path)?;
        let names = file.variables().map(|v| v.name().to_string()).collect();
        debug!("opened {} as {:?}", path.display(), format);

        Ok(Self {
            path: path.to_path_buf(),
            file,
            format,
            names,
        })
    }

    /// Path the dataset was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn variable(&self, index: usize, operation: &str) -> Result<netcdf::Variable<'_>> {
        self.names
            .get(index)
            .and_then(|name| self.file.variable(name))
            .ok_or_else(|| ExportError::NetCDF {
                operation: operation.to_string(),
                status: status::NC_ENOTVAR,
                message: format!("no variable with index {}", index),
            })
    }

    fn attribute_text(&self, target: AttributeTarget, name: &str) -> Result<Option<String>> {
        let text = match target {
            AttributeTarget::Global => self
                .file
                .attribute(name)
                .map(|attr| attr_value_to_string(&attr))
                .transpose()?,
            AttributeTarget::Variable(index) => {
                let var = self.variable(index, "nc_inq_attlen")?;
                let text = var
                    .attribute(name)
                    .map(|attr| attr_value_to_string(&attr))
                    .transpose()?;
                text
            }
        };
        Ok(text)
    }
}

fn sniff_format(path: &Path) -> Result<FileFormat> {
    let mut header = Vec::with_capacity(8);
    std::fs::File::open(path)?.take(8).read_to_end(&mut header)?;
    Ok(FileFormat::from_magic(&header))
}

fn element_kind(vartype: &NcVariableType) -> Option<ElementKind> {
    match vartype {
        NcVariableType::Int(IntType::I8) | NcVariableType::Int(IntType::U8) => {
            Some(ElementKind::Byte)
        }
        NcVariableType::Char => Some(ElementKind::Char),
        NcVariableType::Int(IntType::I16) => Some(ElementKind::Int16),
        NcVariableType::Int(IntType::I32) => Some(ElementKind::Int32),
        NcVariableType::Float(FloatType::F32) => Some(ElementKind::Float32),
        NcVariableType::Float(FloatType::F64) => Some(ElementKind::Float64),
        _ => None,
    }
}

/// Short type name for progress output.
fn type_name(kind: Option<ElementKind>, vartype: &NcVariableType) -> String {
    match kind {
        Some(kind) => kind.name().to_string(),
        None => format!("{:?}", vartype).to_lowercase(),
    }
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn attr_value_to_string(attr: &netcdf::Attribute<'_>) -> Result<String> {
    use netcdf::AttributeValue;

    let value = attr
        .value()
        .map_err(|e| ExportError::netcdf("nc_get_att_text", e))?;

    Ok(match value {
        AttributeValue::Str(v) => v,
        AttributeValue::Strs(v) => v.join(", "),
        AttributeValue::Uchar(v) => v.to_string(),
        AttributeValue::Schar(v) => v.to_string(),
        AttributeValue::Ushort(v) => v.to_string(),
        AttributeValue::Short(v) => v.to_string(),
        AttributeValue::Uint(v) => v.to_string(),
        AttributeValue::Int(v) => v.to_string(),
        AttributeValue::Ulonglong(v) => v.to_string(),
        AttributeValue::Longlong(v) => v.to_string(),
        AttributeValue::Float(v) => v.to_string(),
        AttributeValue::Double(v) => v.to_string(),
        AttributeValue::Uchars(v) => join(&v),
        AttributeValue::Schars(v) => join(&v),
        AttributeValue::Ushorts(v) => join(&v),
        AttributeValue::Shorts(v) => join(&v),
        AttributeValue::Uints(v) => join(&v),
        AttributeValue::Ints(v) => join(&v),
        AttributeValue::Ulonglongs(v) => join(&v),
        AttributeValue::Longlongs(v) => join(&v),
        AttributeValue::Floats(v) => join(&v),
        AttributeValue::Doubles(v) => join(&v),
    })
}

impl DatasetSource for NetcdfSource {
    fn format(&self) -> FileFormat {
        self.format
    }

    fn dimensions(&self) -> Result<Vec<DimensionInfo>> {
        Ok(self
            .file
            .dimensions()
            .map(|dim| DimensionInfo {
                name: dim.name().to_string(),
                len: dim.len(),
                unlimited: dim.is_unlimited(),
            })
            .collect())
    }

    fn global_attribute_names(&self) -> Result<Vec<String>> {
        Ok(self
            .file
            .attributes()
            .map(|attr| attr.name().to_string())
            .collect())
    }

    fn variable_count(&self) -> Result<usize> {
        Ok(self.names.len())
    }

    fn variable_info(&self, index: usize) -> Result<VariableInfo> {
        let var = self.variable(index, "nc_inq_var")?;
        let vartype = var.vartype();
        let kind = element_kind(&vartype);
        let type_name = type_name(kind, &vartype);

        Ok(VariableInfo {
            name: var.name().to_string(),
            kind,
            type_name,
            rank: var.dimensions().len(),
            attribute_count: var.attributes().count(),
        })
    }

    fn variable_index(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.names.iter().position(|n| n == name))
    }

    fn attribute_length(&self, target: AttributeTarget, name: &str) -> Result<Option<usize>> {
        Ok(self.attribute_text(target, name)?.map(|text| text.len()))
    }

    fn read_attribute_text(&self, target: AttributeTarget, name: &str) -> Result<Vec<u8>> {
        self.attribute_text(target, name)?
            .map(String::into_bytes)
            .ok_or_else(|| ExportError::NetCDF {
                operation: "nc_get_att_text".to_string(),
                status: status::NC_ENOTATT,
                message: format!("attribute {} not found", name),
            })
    }

    fn read_bytes(&self, index: usize) -> Result<Vec<u8>> {
        let var = self.variable(index, "nc_get_var_uchar")?;
        let values: std::result::Result<Vec<u8>, netcdf::Error> = match var.vartype() {
            NcVariableType::Int(IntType::I8) => {
                let signed: std::result::Result<Vec<i8>, netcdf::Error> = var.get_values(..);
                signed.map(|v| v.into_iter().map(|x| x as u8).collect())
            }
            _ => var.get_values(..),
        };
        values.map_err(|e| ExportError::netcdf("nc_get_var_uchar", e))
    }

    fn read_chars(&self, index: usize) -> Result<Vec<u8>> {
        self.variable(index, "nc_get_var_text")?
            .get_raw_values(..)
            .map_err(|e| ExportError::netcdf("nc_get_var_text", e))
    }

    fn read_i16(&self, index: usize) -> Result<Vec<i16>> {
        let values: Vec<i16> = self
            .variable(index, "nc_get_var_short")?
            .get_values(..)
            .map_err(|e| ExportError::netcdf("nc_get_var_short", e))?;
        Ok(values)
    }

    fn read_i32(&self, index: usize) -> Result<Vec<i32>> {
        let values: Vec<i32> = self
            .variable(index, "nc_get_var_int")?
            .get_values(..)
            .map_err(|e| ExportError::netcdf("nc_get_var_int", e))?;
        Ok(values)
    }

    fn read_f32(&self, index: usize) -> Result<Vec<f32>> {
        let values: Vec<f32> = self
            .variable(index, "nc_get_var_float")?
            .get_values(..)
            .map_err(|e| ExportError::netcdf("nc_get_var_float", e))?;
        Ok(values)
    }

    fn read_f64(&self, index: usize) -> Result<Vec<f64>> {
        let values: Vec<f64> = self
            .variable(index, "nc_get_var_double")?
            .get_values(..)
            .map_err(|e| ExportError::netcdf("nc_get_var_double", e))?;
        Ok(values)
    }
}
