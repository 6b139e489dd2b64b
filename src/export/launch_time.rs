//! Launch time of a sounding, read from a free-text global attribute.

use crate::error::{ExportError, Result};
use chrono::NaiveDateTime;
use std::fmt;

/// Global attribute holding the ascent start time.
pub const LAUNCH_TIME_ATTRIBUTE: &str = "g.Ascent.StartTime";

const LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const LAYOUT_LEN: usize = 19;

/// Calendar date and time of launch, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchTime(NaiveDateTime);

impl LaunchTime {
    /// Parse `YYYY-MM-DDTHH:MM:SS` from the start of `text`.
    ///
    /// Anything after the seconds (fractions, a `Z`) is ignored. A space
    /// may replace the `T`.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || ExportError::InvalidLaunchTime {
            text: text.to_string(),
        };

        let trimmed = text.trim_start();
        let head = trimmed.get(..LAYOUT_LEN).ok_or_else(invalid)?;

        LAYOUTS
            .iter()
            .find_map(|layout| NaiveDateTime::parse_from_str(head, layout).ok())
            .map(LaunchTime)
            .ok_or_else(invalid)
    }

    /// The parsed date and time.
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// `DD-MM-YYYY`.
    pub fn date_text(&self) -> String {
        self.0.format("%d-%m-%Y").to_string()
    }

    /// `HH:MM:SS`.
    pub fn time_text(&self) -> String {
        self.0.format("%H:%M:%S").to_string()
    }
}

impl fmt::Display for LaunchTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y/%m/%d %H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_iso_layout() {
        let launch = LaunchTime::parse("2012-05-01T11:23:45").unwrap();
        let dt = launch.datetime();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2012, 5, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (11, 23, 45));
        assert_eq!(launch.date_text(), "01-05-2012");
        assert_eq!(launch.time_text(), "11:23:45");
    }

    #[test]
    fn ignores_trailing_fraction_and_zone() {
        let launch = LaunchTime::parse("2011-12-31T23:59:58.000Z").unwrap();
        assert_eq!(launch.time_text(), "23:59:58");
        assert_eq!(LaunchTime::parse("2011-12-31 23:59:58 UTC").unwrap(), launch);
    }

    #[test]
    fn rejects_other_layouts() {
        for text in [
            "",
            "2012-05-01",
            "01/05/2012 11:23:45",
            "2012-13-01T00:00:00",
            "20120501T112345xxxx",
        ] {
            let err = LaunchTime::parse(text).unwrap_err();
            assert!(
                matches!(err, ExportError::InvalidLaunchTime { .. }),
                "text {:?}",
                text
            );
        }
    }
}
