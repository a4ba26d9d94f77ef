//! Accident record table loader.
//!
//! Parses the per-accident CSV into [`AccidentRecord`]s. Numeric fields
//! that are empty, non-numeric or carry a negative sentinel are coerced to
//! `None` rather than failing the load. Rows without a district, a year or
//! a recognised severity cannot be aggregated and are skipped.

use std::io::Read;
use std::path::Path;

use accident_map_accident_models::{
    AccidentRecord, AreaType, DriveHand, Propulsion, Severity, SexOfDriver,
};
use chrono::NaiveTime;
use serde::Deserialize;

use crate::DbError;

/// One CSV row before coercion.
#[derive(Debug, Deserialize)]
struct RawAccidentRow {
    #[serde(default)]
    accident_index: String,
    #[serde(default, alias = "local_authority_district")]
    district_name: String,
    #[serde(default, alias = "year", deserialize_with = "csv::invalid_option")]
    accident_year: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    age_of_driver: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    age_of_vehicle: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    engine_capacity_cc: Option<i64>,
    #[serde(default, alias = "time_of_day")]
    time: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    propulsion_code: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    sex_of_driver: Option<i64>,
    #[serde(
        default,
        alias = "urban_or_rural",
        deserialize_with = "csv::invalid_option"
    )]
    urban_or_rural_area: Option<i64>,
    #[serde(
        default,
        alias = "drive_hand",
        deserialize_with = "csv::invalid_option"
    )]
    vehicle_left_hand_drive: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    accident_severity: Option<i64>,
}

/// Why a row was not turned into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipReason {
    MissingDistrict,
    MissingYear,
    InvalidSeverity,
}

/// Counts of loaded and skipped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows turned into records.
    pub loaded: usize,
    /// Rows without a district name.
    pub missing_district: usize,
    /// Rows without a usable year.
    pub missing_year: usize,
    /// Rows whose severity code is not 1-3.
    pub invalid_severity: usize,
}

impl LoadReport {
    /// Total number of skipped rows.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.missing_district + self.missing_year + self.invalid_severity
    }
}

/// Parses the accident table from any reader.
///
/// # Errors
///
/// Returns [`DbError::Csv`] if the CSV itself is malformed.
pub fn read_accidents<R: Read>(reader: R) -> Result<(Vec<AccidentRecord>, LoadReport), DbError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for result in csv_reader.deserialize::<RawAccidentRow>() {
        match coerce_row(result?) {
            Ok(record) => {
                records.push(record);
                report.loaded += 1;
            }
            Err(SkipReason::MissingDistrict) => report.missing_district += 1,
            Err(SkipReason::MissingYear) => report.missing_year += 1,
            Err(SkipReason::InvalidSeverity) => report.invalid_severity += 1,
        }
    }

    if report.skipped() > 0 {
        log::warn!(
            "Skipped {} accident rows ({} without district, {} without year, {} with invalid severity)",
            report.skipped(),
            report.missing_district,
            report.missing_year,
            report.invalid_severity,
        );
    }
    log::info!("Loaded {} accident records", report.loaded);

    Ok((records, report))
}

/// Reads the accident table from a CSV file on disk.
///
/// # Errors
///
/// Returns [`DbError`] if the file cannot be opened or parsed.
pub fn load_accidents(path: &Path) -> Result<(Vec<AccidentRecord>, LoadReport), DbError> {
    let file = std::fs::File::open(path)?;
    read_accidents(file)
}

fn coerce_row(row: RawAccidentRow) -> Result<AccidentRecord, SkipReason> {
    if row.district_name.is_empty() {
        return Err(SkipReason::MissingDistrict);
    }

    let year = row
        .accident_year
        .and_then(|y| u16::try_from(y).ok())
        .filter(|y| *y > 0)
        .ok_or(SkipReason::MissingYear)?;

    let severity = row
        .accident_severity
        .and_then(|c| i32::try_from(c).ok())
        .and_then(|c| Severity::from_value(c).ok())
        .ok_or(SkipReason::InvalidSeverity)?;

    Ok(AccidentRecord {
        accident_index: row.accident_index,
        district_name: row.district_name,
        year,
        age_of_driver: non_negative(row.age_of_driver),
        age_of_vehicle: non_negative(row.age_of_vehicle),
        engine_capacity_cc: non_negative(row.engine_capacity_cc),
        time_of_day: row.time.as_deref().and_then(parse_time_of_day),
        propulsion: code(row.propulsion_code).and_then(Propulsion::from_code),
        sex_of_driver: code(row.sex_of_driver).and_then(SexOfDriver::from_code),
        area_type: code(row.urban_or_rural_area).and_then(AreaType::from_code),
        drive_hand: code(row.vehicle_left_hand_drive).and_then(DriveHand::from_code),
        severity,
    })
}

/// Negative values are the dataset's missing-value sentinel.
fn non_negative<T: TryFrom<i64>>(value: Option<i64>) -> Option<T> {
    value.filter(|v| *v >= 0).and_then(|v| T::try_from(v).ok())
}

fn code(value: Option<i64>) -> Option<i32> {
    value.and_then(|v| i32::try_from(v).ok())
}

/// Parses an `HH:MM` (or `HH:MM:SS`) time of day.
#[must_use]
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use chrono::Timelike as _;

    use super::*;

    const HEADER: &str = "accident_index,district_name,accident_year,age_of_driver,age_of_vehicle,\
        engine_capacity_cc,time,propulsion_code,sex_of_driver,urban_or_rural_area,\
        vehicle_left_hand_drive,accident_severity\n";

    fn parse(rows: &str) -> (Vec<AccidentRecord>, LoadReport) {
        read_accidents(format!("{HEADER}{rows}").as_bytes()).unwrap()
    }

    #[test]
    fn parses_complete_row() {
        let (records, report) = parse("2018A1,Leeds,2018,34,5,1598,17:42,1,1,1,1,2\n");
        assert_eq!(report.loaded, 1);
        let r = &records[0];
        assert_eq!(r.district_name, "Leeds");
        assert_eq!(r.year, 2018);
        assert_eq!(r.age_of_driver, Some(34));
        assert_eq!(r.age_of_vehicle, Some(5));
        assert_eq!(r.engine_capacity_cc, Some(1598));
        assert_eq!(r.time_of_day.map(|t| t.hour()), Some(17));
        assert_eq!(r.propulsion, Some(Propulsion::Petrol));
        assert_eq!(r.sex_of_driver, Some(SexOfDriver::Male));
        assert_eq!(r.area_type, Some(AreaType::Urban));
        assert_eq!(r.drive_hand, Some(DriveHand::Right));
        assert_eq!(r.severity, Severity::Moderate);
    }

    #[test]
    fn sentinels_and_garbage_become_missing() {
        let (records, _) = parse("2018A2,Leeds,2018,-1,abc,,25:99,-1,-1,3,9,1\n");
        let r = &records[0];
        assert_eq!(r.age_of_driver, None);
        assert_eq!(r.age_of_vehicle, None);
        assert_eq!(r.engine_capacity_cc, None);
        assert_eq!(r.time_of_day, None);
        assert_eq!(r.propulsion, None);
        assert_eq!(r.sex_of_driver, None);
        assert_eq!(r.area_type, Some(AreaType::Unallocated));
        assert_eq!(r.drive_hand, None);
        assert_eq!(r.severity, Severity::Light);
    }

    #[test]
    fn skips_unusable_rows() {
        let (records, report) = parse(
            "A,,2018,30,1,1000,10:00,1,1,1,1,1\n\
             B,Leeds,,30,1,1000,10:00,1,1,1,1,1\n\
             C,Leeds,2018,30,1,1000,10:00,1,1,1,1,7\n\
             D,Leeds,2018,30,1,1000,10:00,1,1,1,1,3\n",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].accident_index, "D");
        assert_eq!(report.missing_district, 1);
        assert_eq!(report.missing_year, 1);
        assert_eq!(report.invalid_severity, 1);
        assert_eq!(report.skipped(), 3);
    }

    #[test]
    fn parses_times_with_seconds() {
        assert_eq!(parse_time_of_day("07:05:00").map(|t| t.minute()), Some(5));
        assert_eq!(parse_time_of_day("7:05").map(|t| t.hour()), Some(7));
        assert!(parse_time_of_day("noon").is_none());
    }
}
