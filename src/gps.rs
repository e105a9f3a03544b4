//! Decimal coordinate → EXIF GPS tag conversion.
//!
//! EXIF stores coordinates as degree/minute/second unsigned rationals plus a
//! hemisphere reference letter. This module converts signed decimal degrees
//! into that encoding:
//!
//! - [`decimal_to_dms`] splits a decimal degree value into DMS components and
//!   picks the hemisphere label from the value's sign.
//! - [`to_rational`] turns a decimal number into an exact
//!   (numerator, denominator) pair, reconstructed from the number's decimal
//!   string representation rather than its binary float approximation, so
//!   `0.1` becomes `1/10` and not `3602879701896397/36028797018963968`.
//! - [`build_gps_block`] assembles the full GPS tag group for a
//!   (latitude, longitude) pair.
//!
//! Everything here is pure; the only failure mode is numeric input that
//! cannot be represented in EXIF's u32 rationals.

use little_exif::exif_tag::ExifTag;
use little_exif::rational::uR64;
use thiserror::Error;

/// Hemisphere labels for latitude: negative → south, positive → north.
pub const LATITUDE_LABELS: [&str; 2] = ["S", "N"];
/// Hemisphere labels for longitude: negative → west, positive → east.
pub const LONGITUDE_LABELS: [&str; 2] = ["W", "E"];

/// Seconds are rounded to this many decimal places before encoding.
const SECONDS_DECIMALS: i32 = 5;

#[derive(Error, Debug)]
pub enum GpsError {
    #[error("value {0} cannot be encoded as an EXIF rational")]
    Unrepresentable(f64),
}

/// A coordinate split into EXIF-style degree/minute/second components.
#[derive(Debug, Clone, PartialEq)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    /// Rounded to 5 decimal places.
    pub seconds: f64,
    /// One of the two supplied labels, or empty for a zero value.
    pub hemisphere: String,
}

/// Split a signed decimal degree value into DMS components.
///
/// `labels` is `[negative_label, positive_label]`; a value of exactly zero
/// gets an empty hemisphere label.
pub fn decimal_to_dms(value: f64, labels: [&str; 2]) -> Dms {
    let hemisphere = if value < 0.0 {
        labels[0]
    } else if value > 0.0 {
        labels[1]
    } else {
        ""
    };

    let abs = value.abs();
    let degrees = abs.trunc() as u32;
    let total_minutes = (abs - degrees as f64) * 60.0;
    let minutes = total_minutes.trunc() as u32;
    let seconds = round_to((total_minutes - minutes as f64) * 60.0, SECONDS_DECIMALS);

    Dms {
        degrees,
        minutes,
        seconds,
        hemisphere: hemisphere.to_string(),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// An exact unsigned rational, reduced to lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    fn to_ur64(self) -> uR64 {
        uR64 {
            nominator: self.numerator,
            denominator: self.denominator,
        }
    }
}

/// Convert a non-negative decimal number to an exact rational.
///
/// Works from the shortest decimal representation (`f64`'s `Display` output,
/// which never uses exponent notation), so finite-decimal inputs round-trip
/// exactly: `to_rational(12.0288)` is `120288/10000` reduced to `7518/625`,
/// and `numerator / denominator` recovers the original value.
pub fn to_rational(value: f64) -> Result<Rational, GpsError> {
    if !value.is_finite() || value < 0.0 {
        return Err(GpsError::Unrepresentable(value));
    }

    let repr = value.to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let digits: String = format!("{int_part}{frac_part}");
    let numerator: u64 = digits
        .parse()
        .map_err(|_| GpsError::Unrepresentable(value))?;
    let denominator = 10u64
        .checked_pow(frac_part.len() as u32)
        .ok_or(GpsError::Unrepresentable(value))?;

    let divisor = gcd(numerator, denominator);
    let numerator = u32::try_from(numerator / divisor)
        .map_err(|_| GpsError::Unrepresentable(value))?;
    let denominator = u32::try_from(denominator / divisor)
        .map_err(|_| GpsError::Unrepresentable(value))?;

    Ok(Rational {
        numerator,
        denominator,
    })
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// The EXIF GPS tag group for one coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsBlock {
    pub latitude_ref: String,
    pub latitude: [Rational; 3],
    pub longitude_ref: String,
    pub longitude: [Rational; 3],
}

impl GpsBlock {
    /// Render the block as `little_exif` GPS IFD tags, in reference-first
    /// order (LatitudeRef, Latitude, LongitudeRef, Longitude).
    pub fn to_tags(&self) -> Vec<ExifTag> {
        vec![
            ExifTag::GPSLatitudeRef(self.latitude_ref.clone()),
            ExifTag::GPSLatitude(self.latitude.iter().map(|r| r.to_ur64()).collect()),
            ExifTag::GPSLongitudeRef(self.longitude_ref.clone()),
            ExifTag::GPSLongitude(self.longitude.iter().map(|r| r.to_ur64()).collect()),
        ]
    }
}

/// Build the GPS tag block for a decimal (latitude, longitude) pair.
pub fn build_gps_block(latitude: f64, longitude: f64) -> Result<GpsBlock, GpsError> {
    let lat = decimal_to_dms(latitude, LATITUDE_LABELS);
    let lng = decimal_to_dms(longitude, LONGITUDE_LABELS);

    Ok(GpsBlock {
        latitude_ref: lat.hemisphere,
        latitude: dms_rationals(lat.degrees, lat.minutes, lat.seconds)?,
        longitude_ref: lng.hemisphere,
        longitude: dms_rationals(lng.degrees, lng.minutes, lng.seconds)?,
    })
}

fn dms_rationals(degrees: u32, minutes: u32, seconds: f64) -> Result<[Rational; 3], GpsError> {
    Ok([
        to_rational(degrees as f64)?,
        to_rational(minutes as f64)?,
        to_rational(seconds)?,
    ])
}
