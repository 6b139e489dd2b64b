//! Typed one-dimensional columns.

use super::{DatasetSource, ElementKind};
use crate::error::{ExportError, Result};
use crate::util::formatters::format_fixed;
use ndarray::{Array1, ArrayView1};

/// One variable's values, in the element kind it is stored as.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Unsigned bytes.
    Byte(Array1<u8>),
    /// Characters, one byte each.
    Char(Array1<u8>),
    /// 16-bit integers.
    Int16(Array1<i16>),
    /// 32-bit integers.
    Int32(Array1<i32>),
    /// 32-bit floats.
    Float32(Array1<f32>),
    /// 64-bit floats.
    Float64(Array1<f64>),
}

impl Column {
    /// Read variable `index` from `source` with the typed read matching `kind`.
    ///
    /// Fails with [`ExportError::LengthMismatch`] when the read does not
    /// return exactly `len` values.
    pub fn load<S: DatasetSource + ?Sized>(
        source: &S,
        index: usize,
        name: &str,
        kind: ElementKind,
        len: usize,
    ) -> Result<Self> {
        let column = match kind {
            ElementKind::Byte => Column::Byte(Array1::from(source.read_bytes(index)?)),
            ElementKind::Char => Column::Char(Array1::from(source.read_chars(index)?)),
            ElementKind::Int16 => Column::Int16(Array1::from(source.read_i16(index)?)),
            ElementKind::Int32 => Column::Int32(Array1::from(source.read_i32(index)?)),
            ElementKind::Float32 => Column::Float32(Array1::from(source.read_f32(index)?)),
            ElementKind::Float64 => Column::Float64(Array1::from(source.read_f64(index)?)),
        };

        if column.len() != len {
            return Err(ExportError::LengthMismatch {
                name: name.to_string(),
                expected: len,
                found: column.len(),
            });
        }

        Ok(column)
    }

    /// Element kind of this column.
    pub fn kind(&self) -> ElementKind {
        match self {
            Column::Byte(_) => ElementKind::Byte,
            Column::Char(_) => ElementKind::Char,
            Column::Int16(_) => ElementKind::Int16,
            Column::Int32(_) => ElementKind::Int32,
            Column::Float32(_) => ElementKind::Float32,
            Column::Float64(_) => ElementKind::Float64,
        }
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Column::Byte(a) | Column::Char(a) => a.len(),
            Column::Int16(a) => a.len(),
            Column::Int32(a) => a.len(),
            Column::Float32(a) => a.len(),
            Column::Float64(a) => a.len(),
        }
    }

    /// Whether the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the values as 32-bit floats, if that is what the column holds.
    pub fn as_f32(&self) -> Option<ArrayView1<'_, f32>> {
        match self {
            Column::Float32(a) => Some(a.view()),
            _ => None,
        }
    }

    /// Output bytes for the value at `index`.
    ///
    /// Integers are plain decimal (bytes unsigned), chars are the stored byte
    /// itself, floats use fixed notation with six fractional digits.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn stringify(&self, index: usize) -> Vec<u8> {
        let text = match self {
            Column::Char(a) => return vec![a[index]],
            Column::Byte(a) => a[index].to_string(),
            Column::Int16(a) => a[index].to_string(),
            Column::Int32(a) => a[index].to_string(),
            Column::Float32(a) => format_fixed(f64::from(a[index]), 0, 6),
            Column::Float64(a) => format_fixed(a[index], 0, 6),
        };
        text.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MemoryDataset, MemoryVariable};
    use ndarray::array;

    #[test]
    fn stringify_follows_element_kind() {
        assert_eq!(Column::Byte(array![0, 200, 255]).stringify(1), b"200");
        assert_eq!(Column::Char(array![b'a', b',', b' ']).stringify(1), b",");
        assert_eq!(Column::Int16(array![-32768, 7]).stringify(0), b"-32768");
        assert_eq!(Column::Int32(array![-5, 123456]).stringify(1), b"123456");
        assert_eq!(Column::Float32(array![0.5, 60.0]).stringify(1), b"60.000000");
        assert_eq!(Column::Float64(array![-1.25, 1e20]).stringify(0), b"-1.250000");
        assert_eq!(
            Column::Float64(array![1e20]).stringify(0),
            b"100000000000000000000.000000"
        );
    }

    #[test]
    fn char_bytes_are_not_reencoded() {
        assert_eq!(Column::Char(array![0xB0, b'x']).stringify(0), [0xB0]);
        assert_eq!(Column::Char(array![0xFF]).stringify(0), [0xFF]);
    }

    #[test]
    fn float32_keeps_stored_precision() {
        // 0.1f32 is 0.100000001490116...
        assert_eq!(Column::Float32(array![0.1]).stringify(0), b"0.100000");
        assert_eq!(Column::Float32(array![273.15]).stringify(0), b"273.149994");
    }

    #[test]
    fn load_dispatches_on_kind() {
        let dataset = MemoryDataset::new("obs", 3)
            .variable(MemoryVariable::new("flag", Column::Byte(array![1, 2, 3])))
            .variable(MemoryVariable::new("press", Column::Float32(array![1000.0, 900.0, 800.0])));

        let flag = Column::load(&dataset, 0, "flag", ElementKind::Byte, 3).unwrap();
        assert_eq!(flag.kind(), ElementKind::Byte);
        assert_eq!(flag.len(), 3);

        let press = Column::load(&dataset, 1, "press", ElementKind::Float32, 3).unwrap();
        assert_eq!(press.as_f32().unwrap()[2], 800.0);
    }

    #[test]
    fn load_rejects_wrong_length() {
        let dataset = MemoryDataset::new("obs", 3)
            .variable(MemoryVariable::new("rh", Column::Float32(array![0.5, 0.6])));

        let err = Column::load(&dataset, 0, "rh", ElementKind::Float32, 3).unwrap_err();
        assert!(matches!(
            err,
            ExportError::LengthMismatch { expected: 3, found: 2, .. }
        ));
    }
}
