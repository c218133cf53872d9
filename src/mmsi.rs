//! Maritime Mobile Service Identity.

use core::fmt;

/// Maritime Mobile Service Identity (MMSI).
///
/// The MMSI is the nine-decimal-digit station identity carried in every
/// AIS message as a 30-bit field. Checked construction guarantees the
/// value has at most nine digits.
///
/// # Examples
///
/// ```
/// use ais_vdm::Mmsi;
///
/// let mmsi = Mmsi::try_from(123456789).unwrap();
/// assert_eq!(format!("{}", mmsi), "123456789");
/// assert_eq!(u32::from(mmsi), 123456789);
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Mmsi(u32);

/// Largest valid MMSI (nine decimal digits).
const MMSI_MAX: u32 = 999_999_999;

impl Mmsi {
    /// Wraps a raw 30-bit field value without the nine-digit range
    /// check.
    ///
    /// Messages on the air occasionally carry identities above
    /// 999 999 999; decoding preserves them instead of rejecting the
    /// whole message.
    pub(crate) fn from_raw(value: u32) -> Mmsi {
        Mmsi(value)
    }

    /// The numeric identity.
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Mmsi {
    type Error = MmsiError;

    fn try_from(value: u32) -> Result<Mmsi, MmsiError> {
        if value <= MMSI_MAX {
            Ok(Mmsi(value))
        } else {
            Err(MmsiError::OutOfRange)
        }
    }
}

impl From<Mmsi> for u32 {
    fn from(mmsi: Mmsi) -> u32 {
        mmsi.0
    }
}

impl From<Mmsi> for u64 {
    fn from(mmsi: Mmsi) -> u64 {
        u64::from(mmsi.0)
    }
}

/// Formats the identity as nine digits, zero-padded.
///
/// Leading zeros are significant: coast stations, group addresses and
/// SAR aircraft are distinguished by their leading digits.
impl fmt::Display for Mmsi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:09}", self.0)
    }
}

/// MMSI construction error.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MmsiError {
    /// The value has more than nine decimal digits.
    OutOfRange,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn range_check() {
        assert!(Mmsi::try_from(0).is_ok());
        assert!(Mmsi::try_from(999_999_999).is_ok());
        assert_eq!(Mmsi::try_from(1_000_000_000), Err(MmsiError::OutOfRange));
    }

    #[test]
    fn format() {
        assert_eq!(Mmsi::try_from(123456789).unwrap().to_string(), "123456789");
        assert_eq!(Mmsi::try_from(2655651).unwrap().to_string(), "002655651");
    }
}
