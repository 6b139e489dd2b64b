//! Flight record (`flt.dat`) export.
//!
//! A fixed 16-line header followed by one line per sample with twelve
//! fixed-width fields. Eleven of the fields come from named 32-bit float
//! variables after a unit conversion; the last is a constant flag.

use super::launch_time::{LaunchTime, LAUNCH_TIME_ATTRIBUTE};
use super::LINE_END;
use crate::data::{read_text_attribute, AttributeTarget, ColumnStore, DatasetSource, ElementKind};
use crate::error::{ExportError, Result};
use crate::util::formatters::{format_fixed, format_int};
use chrono::{DateTime, Utc};
use ndarray::ArrayView1;
use std::io::Write;
use tracing::debug;

/// Number of lines in the header block.
pub const HEADER_LINES: usize = 16;
/// Number of fields per data line.
pub const DATA_COLUMNS: usize = 12;

const VERSION_TAG: &str = "1.001";
const AUTHORSHIP: &str = "Software written by Allen Jordan, NOAA";
const INSTRUMENT: &str = "Vaisala RS92";
const DISCLAIMER: [&str; 2] = [
    "    THE DATA CONTAINED IN THIS FILE ARE PRELIMINARY",
    "     AND SUBJECT TO REPROCESSING AND VERIFICATION",
];

const FIELD_WIDTH: usize = 10;
const LABEL_WIDTH: usize = 27;
const FLAG: i64 = 1;
const KELVIN_OFFSET: f32 = 273.15;

const COLUMN_LABELS: [&str; DATA_COLUMNS] = [
    "Time", "Press", "Alt", "Temp", "RH", "TFp V", "GPS lat", "GPS lon", "GPS alt", "Wind",
    "Wind Dir", "Fl",
];
const COLUMN_UNITS: [&str; DATA_COLUMNS] = [
    "[min]", "[hpa]", "[km]", "[deg C]", "[%]", "[deg C]", "[deg]", "[deg]", "[km]", "[m/s]",
    "[deg]", "[]",
];

/// Variables read by the flight record, in lookup order.
pub const REQUIRED_VARIABLES: [&str; 11] = [
    "time", "press", "temp", "rh", "wdir", "wspeed", "geopot", "lon", "lat", "alt", "FP",
];

/// The eleven source columns of a flight record.
#[derive(Debug, Clone)]
struct SoundingColumns<'a> {
    time: ArrayView1<'a, f32>,
    press: ArrayView1<'a, f32>,
    temp: ArrayView1<'a, f32>,
    rh: ArrayView1<'a, f32>,
    wdir: ArrayView1<'a, f32>,
    wspeed: ArrayView1<'a, f32>,
    geopot: ArrayView1<'a, f32>,
    lon: ArrayView1<'a, f32>,
    lat: ArrayView1<'a, f32>,
    alt: ArrayView1<'a, f32>,
    frost_point: ArrayView1<'a, f32>,
}

impl<'a> SoundingColumns<'a> {
    fn resolve<S: DatasetSource + ?Sized>(source: &S, store: &'a ColumnStore) -> Result<Self> {
        let column = |name: &str| -> Result<ArrayView1<'a, f32>> {
            let index = source
                .variable_index(name)?
                .ok_or_else(|| ExportError::variable_not_found(name))?;
            let column = store
                .column(index)
                .ok_or_else(|| ExportError::ColumnUnavailable {
                    name: name.to_string(),
                })?;
            column.as_f32().ok_or_else(|| ExportError::TypeMismatch {
                name: name.to_string(),
                expected: ElementKind::Float32,
                found: column.kind(),
            })
        };

        Ok(Self {
            time: column("time")?,
            press: column("press")?,
            temp: column("temp")?,
            rh: column("rh")?,
            wdir: column("wdir")?,
            wspeed: column("wspeed")?,
            geopot: column("geopot")?,
            lon: column("lon")?,
            lat: column("lat")?,
            alt: column("alt")?,
            frost_point: column("FP")?,
        })
    }

    /// One data line, without the line terminator.
    ///
    /// Conversions run in single precision, like the stored values.
    fn line(&self, i: usize) -> String {
        let fields = [
            format_fixed(f64::from(self.time[i] / 60.0), FIELD_WIDTH, 5),
            format_fixed(f64::from(self.press[i]), FIELD_WIDTH, 2),
            format_fixed(f64::from(self.geopot[i] / 1000.0), FIELD_WIDTH, 4),
            format_fixed(f64::from(self.temp[i] - KELVIN_OFFSET), FIELD_WIDTH, 2),
            format_fixed(f64::from(self.rh[i] * 100.0), FIELD_WIDTH, 2),
            format_fixed(f64::from(self.frost_point[i] - KELVIN_OFFSET), FIELD_WIDTH, 2),
            format_fixed(f64::from(self.lat[i]), FIELD_WIDTH, 5),
            format_fixed(f64::from(self.lon[i]), FIELD_WIDTH, 5),
            format_fixed(f64::from(self.alt[i] / 1000.0), FIELD_WIDTH, 4),
            format_fixed(f64::from(self.wspeed[i]), FIELD_WIDTH, 2),
            format_fixed(f64::from(self.wdir[i]), FIELD_WIDTH, 2),
            format_int(FLAG, FIELD_WIDTH),
        ];
        fields.join(",")
    }
}

/// Writes a sounding as a flight record.
#[derive(Debug, Clone)]
pub struct FlightRecordExporter {
    launch: LaunchTime,
    generated: DateTime<Utc>,
}

impl FlightRecordExporter {
    /// Exporter for a sounding launched at `launch`, stamped with `generated`.
    pub fn new(launch: LaunchTime, generated: DateTime<Utc>) -> Self {
        Self { launch, generated }
    }

    /// Read the launch time from the dataset's global attributes.
    pub fn from_source<S: DatasetSource + ?Sized>(
        source: &S,
        generated: DateTime<Utc>,
    ) -> Result<Self> {
        let text = read_text_attribute(source, AttributeTarget::Global, LAUNCH_TIME_ATTRIBUTE)?
            .ok_or_else(|| ExportError::attribute_not_found(LAUNCH_TIME_ATTRIBUTE))?;
        Ok(Self::new(LaunchTime::parse(&text)?, generated))
    }

    /// Launch time written in the header.
    pub fn launch(&self) -> LaunchTime {
        self.launch
    }

    /// The sixteen header lines, without terminators.
    pub fn header(&self) -> Vec<String> {
        let labelled = |label: &str, value: &dyn std::fmt::Display| {
            format!("{:>width$} = {}", label, value, width = LABEL_WIDTH)
        };
        let columns = |cells: &[&str]| {
            cells
                .iter()
                .map(|c| format!("{:>width$}", c, width = FIELD_WIDTH))
                .collect::<Vec<_>>()
                .join(",")
        };

        vec![
            format!(
                "Extended NOAA/GMD preliminary data {} [GMT], nc2fltdat version {}",
                self.generated.format("%d-%m-%Y %H:%M:%S"),
                VERSION_TAG
            ),
            AUTHORSHIP.to_string(),
            labelled("Header lines", &HEADER_LINES),
            labelled("Data columns", &DATA_COLUMNS),
            labelled("Date [GMT]", &self.launch.date_text()),
            labelled("Time [GMT]", &self.launch.time_text()),
            labelled("Instrument type", &INSTRUMENT),
            String::new(),
            String::new(),
            DISCLAIMER[0].to_string(),
            DISCLAIMER[1].to_string(),
            String::new(),
            String::new(),
            String::new(),
            columns(&COLUMN_LABELS),
            columns(&COLUMN_UNITS),
        ]
    }

    /// Write the flight record to `out`.
    ///
    /// All eleven source variables are resolved before anything is written.
    /// Each must exist, be loaded, and hold 32-bit floats.
    pub fn export<S, W>(&self, source: &S, store: &ColumnStore, out: &mut W) -> Result<()>
    where
        S: DatasetSource + ?Sized,
        W: Write,
    {
        let columns = SoundingColumns::resolve(source, store)?;

        for line in self.header() {
            out.write_all(line.as_bytes())?;
            out.write_all(LINE_END.as_bytes())?;
        }

        for i in 0..store.dimension_length() {
            out.write_all(columns.line(i).as_bytes())?;
            out.write_all(LINE_END.as_bytes())?;
        }
        debug!("wrote {} flight record lines", store.dimension_length());

        out.flush()?;
        Ok(())
    }
}
