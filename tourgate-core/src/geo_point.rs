//! Validated geographic points and the validation error they report.

use std::fmt;
use std::ops::RangeInclusive;

use geo::Coord;
use thiserror::Error;

const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Latitude lies in `[-90, 90]` and longitude in `[-180, 180]`; both are
/// finite. The only way to obtain a `GeoPoint` is through [`GeoPoint::new`]
/// or request validation, so every instance is in range.
///
/// # Examples
///
/// ```
/// use tourgate_core::GeoPoint;
///
/// # fn main() -> Result<(), tourgate_core::ValidationError> {
/// let kyoto = GeoPoint::new(35.0, 135.0)?;
/// let coord = kyoto.to_coord();
/// assert_eq!((coord.x, coord.y), (135.0, 35.0));
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every coordinate that is out of
    /// range or not finite.
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        let point = Self::checked("point", lat, lng, &mut violations);
        point.ok_or(ValidationError { violations })
    }

    /// Validate a point, appending any violations under the `field` label.
    pub(crate) fn checked(
        field: &str,
        lat: f64,
        lng: f64,
        violations: &mut Vec<Violation>,
    ) -> Option<Self> {
        let before = violations.len();
        if !LATITUDE_RANGE.contains(&lat) {
            violations.push(Violation::LatitudeOutOfRange {
                field: field.to_owned(),
                value: lat,
            });
        }
        if !LONGITUDE_RANGE.contains(&lng) {
            violations.push(Violation::LongitudeOutOfRange {
                field: field.to_owned(),
                value: lng,
            });
        }
        (violations.len() == before).then_some(Self { lat, lng })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Convert into a [`geo::Coord`] with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn to_coord(&self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

/// A single rule broken by a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Latitude outside `[-90, 90]` or not finite.
    LatitudeOutOfRange {
        /// Field path, e.g. `depot` or `locations[2]`.
        field: String,
        /// Offending value.
        value: f64,
    },
    /// Longitude outside `[-180, 180]` or not finite.
    LongitudeOutOfRange {
        /// Field path, e.g. `depot` or `locations[2]`.
        field: String,
        /// Offending value.
        value: f64,
    },
    /// Number of visit locations outside `1..=max`.
    LocationCount {
        /// Number of locations supplied.
        count: usize,
        /// Configured upper bound.
        max: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatitudeOutOfRange { field, value } => {
                write!(f, "{field}.lat must be between -90 and 90 (got {value})")
            }
            Self::LongitudeOutOfRange { field, value } => {
                write!(f, "{field}.lng must be between -180 and 180 (got {value})")
            }
            Self::LocationCount { count, max } => {
                write!(f, "locations must contain between 1 and {max} entries (got {count})")
            }
        }
    }
}

/// Errors returned when a request or point fails validation.
///
/// Carries every violated rule so callers can report them together.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub(crate) const fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// The violated rules, in the order they were detected.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
