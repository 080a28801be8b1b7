use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::shared::constants::{BATCH_OUTPUT_SUFFIX, FALLBACK_SOURCE_NAME, OUTPUT_EXTENSION};

const SECONDS_PER_DAY: u64 = 86_400;

/// UTC wall-clock time at second resolution, displayed as `yyyyMMddHHmmss`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl Timestamp {
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Times before the Unix epoch clamp to the epoch.
    pub fn from_system_time(time: SystemTime) -> Self {
        let secs = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix_seconds(secs)
    }

    pub fn from_unix_seconds(secs: u64) -> Self {
        let days = (secs / SECONDS_PER_DAY) as i64;
        let rem = (secs % SECONDS_PER_DAY) as u32;
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: rem / 3600,
            minute: rem % 3600 / 60,
            second: rem % 60,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Proleptic Gregorian date for a day count relative to 1970-01-01.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Filename of a captured thumbnail:
/// `{width}x{height}_{yyyyMMddHHmmss}_{source}.png`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputName {
    pub width: u32,
    pub height: u32,
    pub timestamp: Timestamp,
    pub source: String,
}

impl OutputName {
    pub fn new(width: u32, height: u32, timestamp: Timestamp, source: &str) -> Self {
        Self {
            width,
            height,
            timestamp,
            source: sanitize_source(source),
        }
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}x{}_{}_{}.{OUTPUT_EXTENSION}",
            self.width, self.height, self.timestamp, self.source
        )
    }
}

impl fmt::Display for OutputName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// Output filename for a batch input: `{stem}_cropped.png`.
pub fn cropped_file_name(input: &Path) -> String {
    format!(
        "{}{BATCH_OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}",
        sanitize_source(&file_stem(input))
    )
}

/// `{stem}_{n}_cropped.png`, for inputs whose plain name is already taken.
pub fn numbered_cropped_file_name(input: &Path, n: usize) -> String {
    format!(
        "{}_{n}{BATCH_OUTPUT_SUFFIX}.{OUTPUT_EXTENSION}",
        sanitize_source(&file_stem(input))
    )
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Replaces separators, whitespace and control characters with `_`.
fn sanitize_source(source: &str) -> String {
    let cleaned: String = source
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | ':') {
                '_'
            } else {
                c
            }
        })
        .collect();
    if cleaned.is_empty() {
        FALLBACK_SOURCE_NAME.to_string()
    } else {
        cleaned
    }
}
