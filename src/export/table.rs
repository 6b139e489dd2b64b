//! Generic CSV export.
//!
//! Four header rows (names, standard names, long names, bracketed units)
//! followed by one row per sample. Fields are separated by `", "` and lines
//! end in CRLF. Values are written exactly as stored.

use super::{FIELD_SEPARATOR, LINE_END};
use crate::data::{Column, ColumnStore, LoadedVariable};
use crate::error::Result;
use crate::util::formatters::bracket_units;
use std::io::Write;

/// Writes every loaded column of a [`ColumnStore`] as CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableExporter;

impl TableExporter {
    /// Write the table to `out`.
    ///
    /// Variables without a column appear in neither the header rows nor the data rows.
    pub fn export<W: Write>(&self, store: &ColumnStore, out: &mut W) -> Result<()> {
        let columns: Vec<(&LoadedVariable, &Column)> = store.loaded().collect();

        write_row(out, columns.iter().map(|(v, _)| v.name().to_string()))?;
        write_row(
            out,
            columns.iter().map(|(v, _)| v.metadata.standard_name.clone()),
        )?;
        write_row(out, columns.iter().map(|(v, _)| v.metadata.long_name.clone()))?;
        write_row(out, columns.iter().map(|(v, _)| bracket_units(&v.metadata.units)))?;

        for row in 0..store.dimension_length() {
            write_row(out, columns.iter().map(|(_, c)| c.stringify(row)))?;
        }

        out.flush()?;
        Ok(())
    }
}

/// Fields are written as raw bytes; char columns may hold non-UTF-8 data.
fn write_row<W, F>(out: &mut W, fields: impl Iterator<Item = F>) -> Result<()>
where
    W: Write,
    F: AsRef<[u8]>,
{
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.write_all(FIELD_SEPARATOR.as_bytes())?;
        }
        out.write_all(field.as_ref())?;
    }
    out.write_all(LINE_END.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MemoryDataset, MemoryVariable, LONG_NAME, STANDARD_NAME, UNITS};
    use ndarray::array;

    fn render(dataset: &MemoryDataset, len: usize) -> String {
        let store = ColumnStore::load(dataset, len).unwrap();
        let mut out = Vec::new();
        TableExporter.export(&store, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_headers_then_rows() {
        let dataset = MemoryDataset::new("time", 2)
            .variable(
                MemoryVariable::new("time", Column::Float32(array![0.0, 1.5]))
                    .attribute(STANDARD_NAME, "time")
                    .attribute(LONG_NAME, "Time since launch")
                    .attribute(UNITS, "s"),
            )
            .variable(
                MemoryVariable::new("flag", Column::Byte(array![255, 3])).attribute(UNITS, "[1]"),
            )
            .variable(MemoryVariable::new("qc", Column::Char(array![b'G', b'B'])));

        let expected = "time, flag, qc\r\n\
                        time, , \r\n\
                        Time since launch, , \r\n\
                        [s], [1], []\r\n\
                        0.000000, 255, G\r\n\
                        1.500000, 3, B\r\n";
        assert_eq!(render(&dataset, 2), expected);
    }

    #[test]
    fn raw_values_are_not_converted() {
        let dataset = MemoryDataset::new("time", 3)
            .variable(MemoryVariable::new("time", Column::Float32(array![0.0, 60.0, 120.0])))
            .variable(MemoryVariable::new("temp", Column::Float32(array![273.15, 0.0, 0.0])));

        let text = render(&dataset, 3);
        let rows: Vec<&str> = text.split("\r\n").skip(4).collect();
        assert_eq!(rows[0], "0.000000, 273.149994");
        assert_eq!(rows[1], "60.000000, 0.000000");
        assert_eq!(rows[2], "120.000000, 0.000000");
    }

    #[test]
    fn skipped_variables_leave_headers_aligned() {
        let dataset = MemoryDataset::new("time", 1)
            .variable(MemoryVariable::new("a", Column::Int32(array![1])))
            .variable(MemoryVariable::new("grid", Column::Int32(array![0])).with_rank(2))
            .variable(MemoryVariable::unsupported("big", "int64"))
            .variable(MemoryVariable::new("b", Column::Int16(array![-2])));

        let text = render(&dataset, 1);
        let lines: Vec<&str> = text.trim_end().split("\r\n").collect();
        assert_eq!(lines[0], "a, b");
        assert_eq!(lines[3], "[], []");
        assert_eq!(lines[4], "1, -2");
        for line in &lines {
            assert_eq!(line.matches(FIELD_SEPARATOR).count(), 1, "line {:?}", line);
        }
    }

    #[test]
    fn char_bytes_are_written_verbatim() {
        let dataset = MemoryDataset::new("time", 2)
            .variable(MemoryVariable::new("deg", Column::Char(array![0xB0, b'C'])));
        let store = ColumnStore::load(&dataset, 2).unwrap();
        let mut out = Vec::new();
        TableExporter.export(&store, &mut out).unwrap();

        assert!(out.ends_with(b"\xB0\r\nC\r\n"));
        assert!(!out.windows(2).any(|w| w == [0xC2, 0xB0]));
    }

    #[test]
    fn empty_dimension_writes_only_headers() {
        let dataset = MemoryDataset::new("time", 0)
            .variable(MemoryVariable::new("a", Column::Float64(Vec::new().into())));

        assert_eq!(render(&dataset, 0), "a\r\n\r\n\r\n[]\r\n");
    }
}
