#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Accident record taxonomy types and severity definitions.
//!
//! This crate defines the coded categorical attributes of a road accident
//! record (severity, sex of driver, area type, drive hand, propulsion), the
//! record itself, and the chart [`Metric`]s and [`YearFilter`] that the
//! dashboard aggregates over. Every numeric code mapping lives here so that
//! loaders, aggregation and rendering agree on one taxonomy.

use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Error returned when a numeric code does not map to a known variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCodeError {
    /// Name of the coded attribute (e.g. `"severity"`).
    pub attribute: &'static str,
    /// The invalid code that was provided.
    pub value: i32,
}

impl std::fmt::Display for InvalidCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} code {}", self.attribute, self.value)
    }
}

impl std::error::Error for InvalidCodeError {}

/// Accident severity, from 1 (light) to 3 (severe).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Code 1
    Light = 1,
    /// Code 2
    Moderate = 2,
    /// Code 3
    Severe = 3,
}

impl Severity {
    /// Order in which severities are stacked and listed in chart legends.
    pub const STACK_ORDER: [Self; 3] = [Self::Severe, Self::Moderate, Self::Light];

    /// Returns the numeric code of this severity.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity from its numeric code.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not in the range 1-3.
    pub const fn from_value(value: i32) -> Result<Self, InvalidCodeError> {
        match value {
            1 => Ok(Self::Light),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Severe),
            _ => Err(InvalidCodeError {
                attribute: "severity",
                value,
            }),
        }
    }

    /// Fixed chart color for this severity.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Light => "#ffbf00",
            Self::Moderate => "#ff7f0e",
            Self::Severe => "#d62728",
        }
    }

    /// Returns all variants of this enum in code order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Light, Self::Moderate, Self::Severe]
    }
}

/// Sex of the driver involved in the accident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SexOfDriver {
    /// Code 1
    Male = 1,
    /// Code 2
    Female = 2,
    /// Code 3
    Unknown = 3,
}

impl SexOfDriver {
    /// Decodes a sex-of-driver code. The `-1` sentinel and unrecognised
    /// codes decode to `None`.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            3 => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Display label used in charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

/// Urban / rural classification of the accident location.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AreaType {
    /// Code 1
    Urban = 1,
    /// Code 2
    Rural = 2,
    /// Code 3
    Unallocated = 3,
}

impl AreaType {
    /// Decodes an urban-or-rural code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Urban),
            2 => Some(Self::Rural),
            3 => Some(Self::Unallocated),
            _ => None,
        }
    }

    /// Display label used in charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Urban => "Urban",
            Self::Rural => "Rural",
            Self::Unallocated => "Unallocated",
        }
    }
}

/// Which side of the vehicle the steering wheel is on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DriveHand {
    /// Code 1
    Right = 1,
    /// Code 2
    Left = 2,
}

impl DriveHand {
    /// Decodes a drive-hand code. Both `9` and `-1` mean "missing".
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Right),
            2 => Some(Self::Left),
            _ => None,
        }
    }

    /// Display label used in charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Right => "Right-hand drive",
            Self::Left => "Left-hand drive",
        }
    }
}

/// Vehicle propulsion type (STATS19 codes 1-12).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Propulsion {
    Petrol = 1,
    HeavyOil = 2,
    Electric = 3,
    Steam = 4,
    Gas = 5,
    PetrolGas = 6,
    GasBiFuel = 7,
    HybridElectric = 8,
    GasDiesel = 9,
    NewFuelTechnology = 10,
    FuelCells = 11,
    ElectricDiesel = 12,
}

impl Propulsion {
    /// Decodes a propulsion code. The `-1` sentinel decodes to `None`.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Petrol),
            2 => Some(Self::HeavyOil),
            3 => Some(Self::Electric),
            4 => Some(Self::Steam),
            5 => Some(Self::Gas),
            6 => Some(Self::PetrolGas),
            7 => Some(Self::GasBiFuel),
            8 => Some(Self::HybridElectric),
            9 => Some(Self::GasDiesel),
            10 => Some(Self::NewFuelTechnology),
            11 => Some(Self::FuelCells),
            12 => Some(Self::ElectricDiesel),
            _ => None,
        }
    }

    /// Returns the numeric code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Display label used in charts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Petrol => "Petrol",
            Self::HeavyOil => "Heavy oil",
            Self::Electric => "Electric",
            Self::Steam => "Steam",
            Self::Gas => "Gas",
            Self::PetrolGas => "Petrol/Gas (LPG)",
            Self::GasBiFuel => "Gas/Bi-fuel",
            Self::HybridElectric => "Hybrid electric",
            Self::GasDiesel => "Gas Diesel",
            Self::NewFuelTechnology => "New fuel technology",
            Self::FuelCells => "Fuel cells",
            Self::ElectricDiesel => "Electric diesel",
        }
    }
}

/// A single accident, one row of the accident table.
///
/// Missing or non-numeric source values are represented as `None` and are
/// excluded from any aggregation that needs them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentRecord {
    /// Source accident identifier.
    pub accident_index: String,
    /// Name of the district the accident happened in.
    pub district_name: String,
    /// Calendar year of the accident.
    pub year: u16,
    /// Age of the driver in years.
    pub age_of_driver: Option<u16>,
    /// Age of the vehicle in years.
    pub age_of_vehicle: Option<u16>,
    /// Engine capacity in cubic centimetres.
    pub engine_capacity_cc: Option<u32>,
    /// Local time the accident happened.
    pub time_of_day: Option<NaiveTime>,
    pub propulsion: Option<Propulsion>,
    pub sex_of_driver: Option<SexOfDriver>,
    pub area_type: Option<AreaType>,
    pub drive_hand: Option<DriveHand>,
    pub severity: Severity,
}

/// The attribute a comparison chart groups accidents by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    /// Age of the driver
    DriverAge,
    /// Age of the vehicle
    VehicleAge,
    /// Engine capacity
    EngineCapacity,
    /// Hour of the day
    TimeOfDay,
    /// Propulsion type
    Propulsion,
    /// Sex of the driver
    SexOfDriver,
    /// Urban or rural area
    UrbanOrRural,
    /// Left- or right-hand drive vehicle
    DriveHand,
}

impl Metric {
    /// Returns all variants in dropdown order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::DriverAge,
            Self::VehicleAge,
            Self::EngineCapacity,
            Self::TimeOfDay,
            Self::Propulsion,
            Self::SexOfDriver,
            Self::UrbanOrRural,
            Self::DriveHand,
        ]
    }

    /// Dropdown label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DriverAge => "Accidents per age of driver",
            Self::VehicleAge => "Accidents per age of vehicle",
            Self::EngineCapacity => "Accidents per engine capacity",
            Self::TimeOfDay => "Accidents per time of day",
            Self::Propulsion => "Accidents per propulsion type",
            Self::SexOfDriver => "Accidents per sex of driver",
            Self::UrbanOrRural => "Accidents in urban and rural areas",
            Self::DriveHand => "Accidents per drive-hand side",
        }
    }

    /// The x-axis title of the chart for this metric.
    #[must_use]
    pub const fn axis_title(self) -> &'static str {
        match self {
            Self::DriverAge => "Age of driver (years)",
            Self::VehicleAge => "Age of vehicle (years)",
            Self::EngineCapacity => "Engine capacity (cc)",
            Self::TimeOfDay => "Time of day (hour)",
            Self::Propulsion => "Propulsion type",
            Self::SexOfDriver => "Sex of driver",
            Self::UrbanOrRural => "Urban or rural area",
            Self::DriveHand => "Drive-hand side",
        }
    }

    /// Whether this metric is drawn as a binned histogram rather than a
    /// categorical bar chart.
    #[must_use]
    pub const fn is_histogram(self) -> bool {
        matches!(self, Self::EngineCapacity)
    }

    /// Whether bucket keys are numeric values (as opposed to category codes).
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::DriverAge | Self::VehicleAge | Self::EngineCapacity | Self::TimeOfDay
        )
    }
}

/// Year filter: a single calendar year or the "sum" sentinel meaning all
/// years combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum YearFilter {
    /// A single calendar year.
    Year(u16),
    /// All years combined.
    Sum,
}

impl YearFilter {
    /// Whether a record from `year` passes this filter.
    #[must_use]
    pub const fn includes(self, year: u16) -> bool {
        match self {
            Self::Year(y) => y == year,
            Self::Sum => true,
        }
    }
}

/// Error returned when a year filter string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidYearFilterError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for InvalidYearFilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid year '{}': expected a year or one of sum/aggregate/all",
            self.input
        )
    }
}

impl std::error::Error for InvalidYearFilterError {}

impl FromStr for YearFilter {
    type Err = InvalidYearFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "sum" | "aggregate" | "all" => Ok(Self::Sum),
            other => other
                .parse::<u16>()
                .ok()
                .filter(|y| (1000..=9999).contains(y))
                .map(Self::Year)
                .ok_or_else(|| InvalidYearFilterError {
                    input: trimmed.to_string(),
                }),
        }
    }
}

impl std::fmt::Display for YearFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(y) => write!(f, "{y}"),
            Self::Sum => f.write_str("sum"),
        }
    }
}

impl TryFrom<String> for YearFilter {
    type Error = InvalidYearFilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearFilter> for String {
    fn from(value: YearFilter) -> Self {
        value.to_string()
    }
}
