use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validate;
use crate::error::ValidationError;

const GRAMMAR: &str =
    "latdeg [latmin [latsec]] N|S londeg [lonmin [lonsec]] E|W altitude [size [horiz [vert]]]";

const MAX_SECONDS: f64 = 59.99;
/// Fractional digits kept for seconds and altitude.
const DECIMALS: usize = 2;
const MIN_ALTITUDE: f64 = -100_000.0;
const MAX_ALTITUDE: f64 = 42_849_672.95;
const MAX_PRECISION: u64 = 90_000_000;

/// Hemisphere of a latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatDirection {
    N,
    S,
}

/// Hemisphere of a longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LongDirection {
    E,
    W,
}

impl LatDirection {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "N" => Some(Self::N),
            "S" => Some(Self::S),
            _ => None,
        }
    }
}

impl LongDirection {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "E" => Some(Self::E),
            "W" => Some(Self::W),
            _ => None,
        }
    }
}

impl fmt::Display for LatDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::N => "N",
            Self::S => "S",
        })
    }
}

impl fmt::Display for LongDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::E => "E",
            Self::W => "W",
        })
    }
}

/// LOC record value.
///
/// Minutes, seconds and the size/precision triple are optional; an absent
/// component is `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocValue {
    pub lat_degrees: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat_minutes: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat_seconds: Option<f64>,
    pub lat_direction: LatDirection,
    pub long_degrees: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_minutes: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_seconds: Option<f64>,
    pub long_direction: LongDirection,
    /// Meters above the WGS 84 spheroid.
    pub altitude: f64,
    /// Diameter of the enclosing sphere, in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision_horz: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision_vert: Option<u32>,
}

/// Field names and bounds of one axis.
struct Axis {
    degrees: &'static str,
    minutes: &'static str,
    seconds: &'static str,
    direction: &'static str,
    hemispheres: &'static str,
    max_degrees: u64,
}

const LATITUDE: Axis = Axis {
    degrees: "lat_degrees",
    minutes: "lat_minutes",
    seconds: "lat_seconds",
    direction: "lat_direction",
    hemispheres: "N, S",
    max_degrees: 90,
};

const LONGITUDE: Axis = Axis {
    degrees: "long_degrees",
    minutes: "long_minutes",
    seconds: "long_seconds",
    direction: "long_direction",
    hemispheres: "E, W",
    max_degrees: 180,
};

struct Coordinate<D> {
    degrees: u8,
    minutes: Option<u8>,
    seconds: Option<f64>,
    direction: D,
}

fn malformed(input: &str) -> ValidationError {
    ValidationError::Malformed {
        input: input.to_string(),
        expected: GRAMMAR,
    }
}

/// `deg [min [sec]] DIR`, stopping at the first hemisphere letter.
fn coordinate<'a, D>(
    tokens: &mut impl Iterator<Item = &'a str>,
    axis: &Axis,
    hemisphere: fn(&str) -> Option<D>,
    input: &str,
) -> Result<Coordinate<D>, ValidationError> {
    let degrees = tokens.next().ok_or_else(|| malformed(input))?;
    let degrees = validate::unsigned(axis.degrees, degrees, 0, axis.max_degrees)?;
    let mut minutes = None;
    let mut seconds = None;
    loop {
        let token = tokens.next().ok_or_else(|| malformed(input))?;
        if let Some(direction) = hemisphere(token) {
            return Ok(Coordinate {
                degrees,
                minutes,
                seconds,
                direction,
            });
        }
        let is_word = token.chars().all(|c| c.is_ascii_alphabetic());
        if is_word || seconds.is_some() {
            return Err(ValidationError::InvalidChoice {
                field: axis.direction,
                input: token.to_string(),
                allowed: axis.hemispheres,
            });
        }
        if minutes.is_none() {
            minutes = Some(validate::unsigned(axis.minutes, token, 0, 59)?);
        } else {
            seconds = Some(validate::decimal(
                axis.seconds,
                token,
                false,
                DECIMALS,
                (0.0, MAX_SECONDS),
            )?);
        }
    }
}

fn precision<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<Option<u32>, ValidationError> {
    tokens
        .next()
        .map(|t| validate::unsigned(field, t, 0, MAX_PRECISION))
        .transpose()
}

impl FromStr for LocValue {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.split(' ').any(str::is_empty) {
            return Err(malformed(s));
        }
        let mut tokens = s.split(' ');
        let lat = coordinate(&mut tokens, &LATITUDE, LatDirection::parse, s)?;
        let long = coordinate(&mut tokens, &LONGITUDE, LongDirection::parse, s)?;
        let altitude = tokens.next().ok_or_else(|| malformed(s))?;
        let altitude = validate::decimal(
            "altitude",
            altitude,
            true,
            DECIMALS,
            (MIN_ALTITUDE, MAX_ALTITUDE),
        )?;
        let size = precision(&mut tokens, "size")?;
        let precision_horz = precision(&mut tokens, "precision_horz")?;
        let precision_vert = precision(&mut tokens, "precision_vert")?;
        if tokens.next().is_some() {
            return Err(malformed(s));
        }
        Ok(Self {
            lat_degrees: lat.degrees,
            lat_minutes: lat.minutes,
            lat_seconds: lat.seconds,
            lat_direction: lat.direction,
            long_degrees: long.degrees,
            long_minutes: long.minutes,
            long_seconds: long.seconds,
            long_direction: long.direction,
            altitude,
            size,
            precision_horz,
            precision_vert,
        })
    }
}

fn write_coordinate(
    f: &mut fmt::Formatter<'_>,
    degrees: u8,
    minutes: Option<u8>,
    seconds: Option<f64>,
    direction: &dyn fmt::Display,
) -> fmt::Result {
    write!(f, "{degrees}")?;
    if let Some(minutes) = minutes {
        write!(f, " {minutes}")?;
        if let Some(seconds) = seconds {
            write!(f, " {seconds:.2}")?;
        }
    }
    write!(f, " {direction}")
}

impl fmt::Display for LocValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_coordinate(
            f,
            self.lat_degrees,
            self.lat_minutes,
            self.lat_seconds,
            &self.lat_direction,
        )?;
        f.write_str(" ")?;
        write_coordinate(
            f,
            self.long_degrees,
            self.long_minutes,
            self.long_seconds,
            &self.long_direction,
        )?;
        write!(f, " {:.2}", self.altitude)?;
        let trailing = [self.size, self.precision_horz, self.precision_vert];
        for value in trailing.into_iter().map_while(|v| v) {
            write!(f, " {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERTH: &str = "31 58 52.10 S 115 49 11.70 E 20.00 10 10 2";

    #[test]
    fn decodes_full_form() {
        let res = PERTH.parse::<LocValue>();
        assert!(res.is_ok(), "{res:?}");
        let Ok(loc) = res else { return };
        assert_eq!(loc.lat_degrees, 31);
        assert_eq!(loc.lat_minutes, Some(58));
        assert_eq!(loc.lat_seconds, Some(52.1));
        assert_eq!(loc.lat_direction, LatDirection::S);
        assert_eq!(loc.long_degrees, 115);
        assert_eq!(loc.long_direction, LongDirection::E);
        assert_eq!(loc.altitude, 20.0);
        assert_eq!(loc.size, Some(10));
        assert_eq!(loc.precision_horz, Some(10));
        assert_eq!(loc.precision_vert, Some(2));
        assert_eq!(loc.to_string(), PERTH);
    }

    #[test]
    fn optional_components_stay_absent() {
        let res = "53 N 2 18 W 20.00 10".parse::<LocValue>();
        assert!(res.is_ok(), "{res:?}");
        let Ok(loc) = res else { return };
        assert_eq!(loc.lat_minutes, None);
        assert_eq!(loc.lat_seconds, None);
        assert_eq!(loc.long_minutes, Some(18));
        assert_eq!(loc.long_seconds, None);
        assert_eq!(loc.size, Some(10));
        assert_eq!(loc.precision_horz, None);
        assert_eq!(loc.to_string(), "53 N 2 18 W 20.00 10");
    }

    #[test]
    fn seconds_render_with_two_decimals() {
        let res = "53 13 10 N 2 18 26.5 W 20 10 1000 2".parse::<LocValue>();
        assert!(res.is_ok(), "{res:?}");
        let Ok(loc) = res else { return };
        assert_eq!(loc.to_string(), "53 13 10.00 N 2 18 26.50 W 20.00 10 1000 2");
    }

    #[test]
    fn rejects_more_than_two_decimals() {
        assert!(matches!(
            "31 58 52.123 S 115 49 11.70 E 20.00 10".parse::<LocValue>(),
            Err(ValidationError::TooManyDecimals {
                field: "lat_seconds",
                max: 2,
                ..
            })
        ));
        assert!(matches!(
            "31 58 52.12 S 115 49 11.70 E 20.005 10".parse::<LocValue>(),
            Err(ValidationError::TooManyDecimals {
                field: "altitude",
                ..
            })
        ));
    }

    #[test]
    fn accepted_text_survives_encode_and_decode() {
        for text in [
            "31 58 52.12 S 115 49 11.7 E -20.05 10",
            "0 0 0.01 N 0 0 59.99 W 42849672.95",
            "53 13 N 2 W -100000",
        ] {
            let res = text.parse::<LocValue>();
            assert!(res.is_ok(), "{text}: {res:?}");
            let Ok(loc) = res else { return };
            assert_eq!(loc.to_string().parse::<LocValue>().as_ref(), Ok(&loc), "{text}");
        }
    }

    #[test]
    fn rejects_wrong_hemisphere() {
        assert!(matches!(
            "31 58 52.10 E 115 49 11.70 E 20.00".parse::<LocValue>(),
            Err(ValidationError::InvalidChoice {
                field: "lat_direction",
                ..
            })
        ));
        assert!(matches!(
            "31 58 52.10 1 S 115 E 20.00".parse::<LocValue>(),
            Err(ValidationError::InvalidChoice {
                field: "lat_direction",
                ..
            })
        ));
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(matches!(
            "91 S 115 E 20.00".parse::<LocValue>(),
            Err(ValidationError::OutOfRange {
                field: "lat_degrees",
                ..
            })
        ));
        assert!(matches!(
            "31 60 S 115 E 20.00".parse::<LocValue>(),
            Err(ValidationError::OutOfRange {
                field: "lat_minutes",
                ..
            })
        ));
        assert!(matches!(
            "31 S 181 E 20.00".parse::<LocValue>(),
            Err(ValidationError::OutOfRange {
                field: "long_degrees",
                ..
            })
        ));
    }

    #[test]
    fn rejects_missing_or_extra_tokens() {
        for text in [
            "31 58 52.10 S 115 49 11.70 E",
            "31 58 52.10 S 115 49 11.70 E 20.00 10 10 2 7",
            "31 58 52.10 S  115 49 11.70 E 20.00",
        ] {
            assert!(
                matches!(text.parse::<LocValue>(), Err(ValidationError::Malformed { .. })),
                "{text}"
            );
        }
        assert!(matches!(
            "31 S 115 E high".parse::<LocValue>(),
            Err(ValidationError::NotADecimal {
                field: "altitude",
                ..
            })
        ));
    }
}
