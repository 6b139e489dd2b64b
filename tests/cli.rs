use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SOUNDING_VARIABLES: [&str; 11] = [
    "time", "press", "temp", "rh", "wdir", "wspeed", "geopot", "lon", "lat", "alt", "FP",
];

fn ncexport() -> Command {
    Command::cargo_bin("ncexport").unwrap()
}

/// Write a two-sample sounding with every flight record variable plus an
/// integer status column.
fn write_sounding(dir: &Path, launch: Option<&str>) -> PathBuf {
    let path = dir.join("sounding.nc");
    let mut file = netcdf::create(&path).unwrap();
    file.add_dimension("obs", 2).unwrap();

    for name in SOUNDING_VARIABLES {
        let values: [f32; 2] = match name {
            "time" => [0.0, 60.0],
            "press" => [1013.25, 1000.0],
            "temp" => [273.15, 283.15],
            "rh" => [0.5, 0.25],
            "geopot" => [1500.0, 1600.0],
            "alt" => [1650.0, 1750.0],
            "lat" => [40.0375, 40.04],
            "lon" => [-105.25, -105.24],
            "FP" => [263.15, 253.15],
            "wspeed" => [3.5, 4.0],
            _ => [270.0, 275.0],
        };
        let mut var = file.add_variable::<f32>(name, &["obs"]).unwrap();
        var.put_values(&values, ..).unwrap();
        var.put_attribute("units", "u").unwrap();
    }

    {
        let mut status = file.add_variable::<i32>("status", &["obs"]).unwrap();
        status.put_values(&[7i32, 8], ..).unwrap();
        status.put_attribute("long_name", "quality flag").unwrap();
    }

    if let Some(launch) = launch {
        file.add_attribute("g.Ascent.StartTime", launch).unwrap();
    }
    path
}

#[test]
fn no_arguments_prints_usage() {
    let assert = ncexport()
        .assert()
        .failure()
        .stderr(predicate::str::contains("NetCDF filename argument required"))
        .stderr(predicate::str::contains("Usage"));

    #[cfg(unix)]
    assert.code(255);
    #[cfg(not(unix))]
    let _ = assert;
}

#[test]
fn missing_file_reports_open_failure() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.nc");

    ncexport()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("nc_open"));

    assert!(!dir.path().join("absent.csv").exists());
    assert!(!dir.path().join("absentflt.dat").exists());
}

#[test]
fn converts_sounding_into_csv_and_flight_record() {
    let dir = TempDir::new().unwrap();
    let input = write_sounding(dir.path(), Some("2012-05-01T11:23:45"));

    ncexport().arg(&input).assert().success();

    let csv = fs::read_to_string(dir.path().join("sounding.csv")).unwrap();
    let rows: Vec<&str> = csv.split("\r\n").collect();
    assert_eq!(
        rows[0],
        "time, press, temp, rh, wdir, wspeed, geopot, lon, lat, alt, FP, status"
    );
    assert_eq!(rows[2], ", , , , , , , , , , , quality flag");
    assert_eq!(rows[3], "[u], [u], [u], [u], [u], [u], [u], [u], [u], [u], [u], []");
    assert!(rows[4].starts_with("0.000000, 1013.250000, "));
    assert!(rows[5].ends_with(", 8"));
    assert_eq!(rows.len(), 4 + 2 + 1);

    let flt = fs::read_to_string(dir.path().join("soundingflt.dat")).unwrap();
    let lines: Vec<&str> = flt.split("\r\n").collect();
    assert_eq!(lines.len(), 16 + 2 + 1);
    assert_eq!(lines[4], "                 Date [GMT] = 01-05-2012");
    assert_eq!(
        lines[16],
        "   0.00000,   1013.25,    1.5000,      0.00,     50.00,    -10.00,  40.03750,-105.25000,    1.6500,      3.50,    270.00,         1"
    );
    assert!(lines[17]
        .starts_with("   1.00000,   1000.00,    1.6000,     10.00,     25.00,    -20.00,"));
}

#[test]
fn missing_launch_time_keeps_csv_only() {
    let dir = TempDir::new().unwrap();
    let input = write_sounding(dir.path(), None);

    let assert = ncexport()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("g.Ascent.StartTime"));
    #[cfg(unix)]
    assert.code(256 - 43);
    #[cfg(not(unix))]
    let _ = assert;

    assert!(dir.path().join("sounding.csv").exists());
    assert!(!dir.path().join("soundingflt.dat").exists());
}

#[test]
fn two_dimensional_file_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("grid.nc");
    {
        let mut file = netcdf::create(&input).unwrap();
        file.add_dimension("x", 2).unwrap();
        file.add_dimension("y", 3).unwrap();
        let mut var = file.add_variable::<f32>("field", &["x", "y"]).unwrap();
        var.put_values(&[0.0f32; 6], ..).unwrap();
    }

    ncexport()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("only 1-dimensional"));

    assert!(!dir.path().join("grid.csv").exists());
    assert!(!dir.path().join("gridflt.dat").exists());
}

#[test]
fn batch_continues_past_bad_file() {
    let dir = TempDir::new().unwrap();
    let good = write_sounding(dir.path(), Some("2012-05-01 11:23:45"));
    let bad = dir.path().join("absent.nc");

    ncexport()
        .arg(&bad)
        .arg(&good)
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.nc"));
    assert!(dir.path().join("soundingflt.dat").exists());

    fs::remove_file(dir.path().join("soundingflt.dat")).unwrap();
    fs::remove_file(dir.path().join("sounding.csv")).unwrap();
    ncexport()
        .arg("--fail-fast")
        .arg(&bad)
        .arg(&good)
        .assert()
        .failure();
    assert!(!dir.path().join("soundingflt.dat").exists());
}

#[test]
fn failure_is_reported_before_next_file_starts() {
    let dir = TempDir::new().unwrap();
    let good = write_sounding(dir.path(), Some("2012-05-01T11:23:45"));
    let bad = dir.path().join("absent.nc");

    let output = ncexport().arg(&bad).arg(&good).output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    let failure = stderr.find("absent.nc: NetCDF error in: nc_open").unwrap();
    let next = stderr.find("opened NetCDF file").unwrap();
    assert!(failure < next, "stderr:\n{}", stderr);
}

#[test]
fn log_file_run_still_prints_failures() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("run.log");

    ncexport()
        .arg("--log")
        .arg(&log)
        .arg(dir.path().join("absent.nc"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: "))
        .stderr(predicate::str::contains("nc_open"));

    let logged = fs::read_to_string(&log).unwrap();
    assert!(logged.contains("absent.nc: NetCDF error in: nc_open"));
}
