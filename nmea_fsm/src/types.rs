use chrono::NaiveTime;

use crate::{
    constants::{LATITUDE_DEGREE_DIGITS, LONGITUDE_DEGREE_DIGITS, SENTINEL},
    error::DecodeError,
    flags::Flags,
    store::{Field, FieldStore},
};

/// Represents a world position in signed decimal degrees
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in degrees, negative south of the equator
    pub lat: f64,

    /// Longitude in degrees, negative west of Greenwich
    pub lon: f64,
}

/// GGA fix quality indicator
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixQuality {
    Invalid,
    Gps,
    Dgps,
    Pps,
    Rtk,
    FloatRtk,
    Estimated,
    Manual,
    Simulation,
}

impl TryFrom<u8> for FixQuality {
    type Error = DecodeError;

    /// From the ASCII digit sent in the sentence
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            b'0' => FixQuality::Invalid,
            b'1' => FixQuality::Gps,
            b'2' => FixQuality::Dgps,
            b'3' => FixQuality::Pps,
            b'4' => FixQuality::Rtk,
            b'5' => FixQuality::FloatRtk,
            b'6' => FixQuality::Estimated,
            b'7' => FixQuality::Manual,
            b'8' => FixQuality::Simulation,
            _ => return Err(DecodeError::InvalidQuality(code)),
        })
    }
}

/// Decoded view of the field store
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub position: Position,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// `None` until a GGA sentence has been committed
    pub quality: Option<FixQuality>,
}

impl Fix {
    pub fn decode(store: &FieldStore, flags: Flags) -> Result<Self, DecodeError> {
        if store.is_empty() {
            return Err(DecodeError::NoFix);
        }

        let lat = degrees(
            store.field(Field::LatitudeDegMin),
            LATITUDE_DEGREE_DIGITS,
            90.0,
            Field::LatitudeDegMin,
        )?;
        let lon = degrees(
            store.field(Field::LongitudeDegMin),
            LONGITUDE_DEGREE_DIGITS,
            180.0,
            Field::LongitudeDegMin,
        )?;
        let position = Position {
            lat: if flags.contains(Flags::NORTH) { lat } else { -lat },
            lon: if flags.contains(Flags::EAST) { lon } else { -lon },
        };

        let time = store.field(Field::Time);
        let pair = |i: usize| -> Result<u8, DecodeError> {
            match (time[i], time[i + 1]) {
                (hi @ b'0'..=b'9', lo @ b'0'..=b'9') => Ok((hi - b'0') * 10 + (lo - b'0')),
                _ => Err(DecodeError::InvalidTime),
            }
        };

        let quality = match store.read(Field::Quality, 0) {
            SENTINEL => None,
            code => Some(FixQuality::try_from(code)?),
        };

        Ok(Fix {
            position,
            hour: pair(0)?,
            minute: pair(2)?,
            second: pair(4)?,
            quality,
        })
    }

    pub fn utc_time(&self) -> Result<NaiveTime, DecodeError> {
        NaiveTime::from_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
        .ok_or(DecodeError::InvalidTime)
    }
}

/// `DDMM.mmm` (or `DDDMM.mmm`) to decimal degrees
fn degrees(text: &[u8], degree_digits: usize, limit: f64, field: Field) -> Result<f64, DecodeError> {
    let err = DecodeError::InvalidCoordinate { field };
    let end = text
        .iter()
        .position(|b| *b == SENTINEL)
        .unwrap_or(text.len());
    let text = core::str::from_utf8(&text[..end]).map_err(|_| err)?;
    if text.len() <= degree_digits {
        return Err(err);
    }
    let (deg, min) = text.split_at(degree_digits);
    let deg: u16 = deg.parse().map_err(|_| err)?;
    let min: f64 = min.parse().map_err(|_| err)?;
    if !(0.0..60.0).contains(&min) {
        return Err(err);
    }
    let value = f64::from(deg) + min / 60.0;
    if value > limit {
        return Err(err);
    }
    Ok(value)
}

#[cfg(test)]
mod test {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn degrees_from_text() {
        let lat = degrees(b"4807.038", 2, 90.0, Field::LatitudeDegMin).unwrap();
        assert!(close(lat, 48.0 + 7.038 / 60.0));
        let lon = degrees(b"01131.000", 3, 180.0, Field::LongitudeDegMin).unwrap();
        assert!(close(lon, 11.0 + 31.0 / 60.0));
    }

    #[test]
    fn degrees_stop_at_sentinel() {
        let lat = degrees(b"4916.45?", 2, 90.0, Field::LatitudeDegMin).unwrap();
        assert!(close(lat, 49.0 + 16.45 / 60.0));
    }

    #[test]
    fn degrees_reject_bad_minutes() {
        assert_eq!(
            degrees(b"4875.000", 2, 90.0, Field::LatitudeDegMin),
            Err(DecodeError::InvalidCoordinate {
                field: Field::LatitudeDegMin
            })
        );
        assert!(degrees(b"????????", 2, 90.0, Field::LatitudeDegMin).is_err());
        assert!(degrees(b"9500.000", 2, 90.0, Field::LatitudeDegMin).is_err());
    }

    #[test]
    fn empty_store_has_no_fix() {
        assert_eq!(
            Fix::decode(&FieldStore::default(), Flags::empty()),
            Err(DecodeError::NoFix)
        );
    }

    #[test]
    fn quality_codes() {
        assert_eq!(FixQuality::try_from(b'1'), Ok(FixQuality::Gps));
        assert_eq!(FixQuality::try_from(b'8'), Ok(FixQuality::Simulation));
        assert_eq!(
            FixQuality::try_from(b'9'),
            Err(DecodeError::InvalidQuality(b'9'))
        );
    }
}
