//! Batch conversion of netCDF files.
//!
//! Each input file yields a generic CSV table and a flight record next to it.
//! Files are processed one at a time; nothing is shared between them.

use crate::data::{ColumnStore, DatasetSource, DimensionInfo, FileFormat, NetcdfSource};
use crate::error::{ExportError, Result};
use crate::export::{FlightRecordExporter, TableExporter};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Output files derived from one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Generic CSV table.
    pub csv: PathBuf,
    /// Flight record.
    pub flight_record: PathBuf,
}

impl OutputPaths {
    /// Derive output names from an input path.
    ///
    /// `sounding.nc` becomes `sounding.csv` and `soundingflt.dat`.
    pub fn for_input(input: &Path) -> Self {
        let mut flight_name = input.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
        flight_name.push("flt.dat");

        Self {
            csv: input.with_extension("csv"),
            flight_record: input.with_file_name(flight_name),
        }
    }
}

/// Shape of a dataset accepted for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    /// On-disk format.
    pub format: FileFormat,
    /// The single shared dimension.
    pub dimension: DimensionInfo,
    /// Number of variables.
    pub variable_count: usize,
    /// Names of the global attributes.
    pub global_attributes: Vec<String>,
}

/// Check that a dataset can be converted and report what it holds.
///
/// Fails with [`ExportError::UnsupportedShape`] unless there is exactly one
/// dimension, and with [`ExportError::UnsupportedFormat`] for unknown formats.
pub fn inspect<S: DatasetSource + ?Sized>(source: &S) -> Result<DatasetSummary> {
    let mut dimensions = source.dimensions()?;
    let variable_count = source.variable_count()?;
    let global_attributes = source.global_attribute_names()?;

    if dimensions.len() != 1 {
        return Err(ExportError::UnsupportedShape {
            found: dimensions.len(),
        });
    }

    info!("# dims: {}", dimensions.len());
    info!("# vars: {}", variable_count);
    info!("# global atts: {}", global_attributes.len());
    for name in &global_attributes {
        debug!("global attribute: {}", name);
    }

    let dimension = dimensions.remove(0);
    if dimension.unlimited {
        info!("contains unlimited dimension");
    }

    let format = source.format();
    info!("{}", format.description());
    if format == FileFormat::Unrecognized {
        return Err(ExportError::UnsupportedFormat);
    }

    info!("dimension: {} length: {}", dimension.name, dimension.len);

    Ok(DatasetSummary {
        format,
        dimension,
        variable_count,
        global_attributes,
    })
}

/// Summary of one converted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// Files written.
    pub outputs: OutputPaths,
    /// Data rows in each output.
    pub rows: usize,
    /// Columns in the CSV table.
    pub columns: usize,
    /// Variables left out of the CSV table.
    pub skipped: usize,
}

/// Convert an opened dataset into both output files.
///
/// The CSV is written first. If the flight record then fails, the CSV stays
/// and no flight record file is created.
pub fn convert<S: DatasetSource + ?Sized>(
    source: &S,
    outputs: &OutputPaths,
    generated: DateTime<Utc>,
) -> Result<FileReport> {
    let summary = inspect(source)?;
    let store = ColumnStore::load(source, summary.dimension.len)?;

    write_atomically(&outputs.csv, |out| TableExporter.export(&store, out))?;
    info!("wrote {}", outputs.csv.display());

    info!("current gmt time: {}", generated.format("%Y/%m/%d %H:%M:%S"));
    let flight = FlightRecordExporter::from_source(source, generated)?;
    info!("launch gmt time: {}", flight.launch());

    write_atomically(&outputs.flight_record, |out| flight.export(source, &store, out))?;
    info!("wrote {}", outputs.flight_record.display());

    Ok(FileReport {
        outputs: outputs.clone(),
        rows: store.dimension_length(),
        columns: store.len() - store.skipped_count(),
        skipped: store.skipped_count(),
    })
}

/// Open `input` and convert it.
pub fn process_file(input: &Path, generated: DateTime<Utc>) -> Result<FileReport> {
    let outputs = OutputPaths::for_input(input);
    let source = NetcdfSource::open(input)?;

    info!("opened NetCDF file: {}", input.display());
    info!("output CSV filename: {}", outputs.csv.display());
    info!("output flt.dat filename: {}", outputs.flight_record.display());

    convert(&source, &outputs, generated)
}

/// Write `path` through a temporary file in the same directory.
///
/// The file only appears once `render` has succeeded.
fn write_atomically<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let fail = |e: std::io::Error| ExportError::output_write(path.to_path_buf(), e);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".ncexport-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let mut temp = builder.tempfile_in(dir).map_err(fail)?;

    {
        let mut out = BufWriter::new(temp.as_file_mut());
        render(&mut out)?;
        out.flush().map_err(fail)?;
    }

    temp.persist(path).map_err(|e| fail(e.error))?;
    Ok(())
}

/// How a batch reacts to a failed file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Stop at the first failed file instead of moving on.
    pub fail_fast: bool,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files converted successfully.
    pub converted: Vec<FileReport>,
    /// Files that failed, with their error.
    pub failures: Vec<(PathBuf, ExportError)>,
    /// Files never attempted because the batch stopped early.
    pub not_attempted: Vec<PathBuf>,
}

impl BatchReport {
    /// Exit code for the whole batch: the first failure's code, or 0.
    pub fn exit_code(&self) -> i32 {
        self.failures
            .first()
            .map(|(_, err)| err.exit_code())
            .unwrap_or(0)
    }
}

/// Convert every input in order.
pub fn run_batch(inputs: &[PathBuf], options: BatchOptions) -> BatchReport {
    run_with(inputs, options, |input| process_file(input, Utc::now()))
}

fn run_with<F>(inputs: &[PathBuf], options: BatchOptions, mut convert_one: F) -> BatchReport
where
    F: FnMut(&Path) -> Result<FileReport>,
{
    let mut report = BatchReport::default();

    for (i, input) in inputs.iter().enumerate() {
        match convert_one(input) {
            Ok(file) => report.converted.push(file),
            Err(err) => {
                error!("{}: {}", input.display(), err);
                report.failures.push((input.clone(), err));
                if options.fail_fast {
                    report.not_attempted = inputs[i + 1..].to_vec();
                    if !report.not_attempted.is_empty() {
                        warn!(
                            "stopping after failure, {} files not processed",
                            report.not_attempted.len()
                        );
                    }
                    break;
                }
            }
        }
    }

    report
}
