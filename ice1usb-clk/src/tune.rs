//! Clock trim registers and the bias encoding used to carry them over USB.
//!
//! The board stores each trim value as an unsigned number in `0..4096`. On the
//! host side the same value is treated as a signed offset in `-2048..2048`, so
//! writes add [`TUNE_BIAS`] and reads subtract it.
//!
//! Only writes are range-checked. A read hands back whatever the board
//! reports, even if it falls outside the nominal range.

use std::str::FromStr;

use crate::Error;
use crate::consts::{TUNE_BIAS, TUNE_RANGE};

/// One of the two clock trim registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ClockRegister {
    /// Register 0, the coarse ("high") trim.
    High = 0,
    /// Register 1, the fine ("low") trim.
    Low = 1,
}

impl ClockRegister {
    /// Register index, as sent in `wIndex`.
    pub fn index(self) -> u16 {
        self as u16
    }
}

impl std::fmt::Display for ClockRegister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Low => f.write_str("low"),
        }
    }
}

impl TryFrom<i64> for ClockRegister {
    type Error = Error;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::High),
            1 => Ok(Self::Low),
            v => Err(Error::InvalidRegister(v.to_string())),
        }
    }
}

impl FromStr for ClockRegister {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let idx: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidRegister(s.to_owned()))?;
        Self::try_from(idx)
    }
}

/// A logical clock tune value that has already passed the range check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuneValue(i32);

impl TuneValue {
    /// Check a logical value against [`TUNE_RANGE`].
    pub fn new(val: i64) -> Result<Self, Error> {
        match i32::try_from(val) {
            Ok(v) if TUNE_RANGE.contains(&v) => Ok(Self(v)),
            _ => Err(Error::TuneRange {
                range: TUNE_RANGE,
                val,
            }),
        }
    }

    /// The logical (signed) value.
    pub fn get(self) -> i32 {
        self.0
    }

    /// The biased value as it goes out in `wValue`.
    pub fn wire(self) -> u16 {
        (self.0 + TUNE_BIAS) as u16
    }
}

impl std::fmt::Display for TuneValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TuneValue {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidParameter("clock tune value must be an integer"))?;
        Self::new(val)
    }
}

/// Range-check a logical value and apply the bias.
pub fn encode_tune(val: i32) -> Result<u16, Error> {
    TuneValue::new(val as i64).map(TuneValue::wire)
}

/// Remove the bias from a raw register value.
pub fn decode_tune(raw: u16) -> i32 {
    raw as i32 - TUNE_BIAS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_round_trip() {
        for v in TUNE_RANGE {
            let raw = encode_tune(v).unwrap();
            assert!(raw < 4096);
            assert_eq!(decode_tune(raw), v);
        }
    }

    #[test]
    fn tune_boundaries() {
        assert_eq!(encode_tune(-2048).unwrap(), 0);
        assert_eq!(encode_tune(2047).unwrap(), 4095);
        assert!(matches!(
            encode_tune(-2049),
            Err(Error::TuneRange { val: -2049, .. })
        ));
        assert!(matches!(
            encode_tune(2048),
            Err(Error::TuneRange { val: 2048, .. })
        ));
    }

    #[test]
    fn decode_does_not_clamp() {
        assert_eq!(decode_tune(0), -2048);
        assert_eq!(decode_tune(0xffff), 63487);
    }

    #[test]
    fn parse_tune() {
        assert_eq!("-50".parse::<TuneValue>().unwrap().get(), -50);
        assert_eq!(" 100 ".parse::<TuneValue>().unwrap().wire(), 2148);
        assert!(matches!(
            "9999".parse::<TuneValue>(),
            Err(Error::TuneRange { val: 9999, .. })
        ));
        assert!(matches!(
            "99999999999".parse::<TuneValue>(),
            Err(Error::TuneRange { .. })
        ));
        assert!(matches!(
            "twelve".parse::<TuneValue>(),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn register_index() {
        assert_eq!(ClockRegister::try_from(0i64).unwrap(), ClockRegister::High);
        assert_eq!(ClockRegister::try_from(1i64).unwrap(), ClockRegister::Low);
        assert!(matches!(
            ClockRegister::try_from(-1i64),
            Err(Error::InvalidRegister(_))
        ));
        assert!(matches!(
            ClockRegister::try_from(2i64),
            Err(Error::InvalidRegister(_))
        ));
        assert!(matches!(
            "a".parse::<ClockRegister>(),
            Err(Error::InvalidRegister(s)) if s == "a"
        ));
        assert_eq!("1".parse::<ClockRegister>().unwrap().index(), 1);
    }
}
