//! Base station report (message type 4).
//!
//! Fixed AIS base stations transmit type 4 to distribute UTC time and
//! their surveyed position. The same 168-bit layout doubles as the UTC
//! date response (type 11), which this crate does not decode.

use crate::bits::{BitBuffer, BitsError};
use crate::message::{
    latitude_to_raw, longitude_to_raw, raw_to_latitude, raw_to_longitude, DecodeError, EpfdType,
    LATITUDE_NOT_AVAILABLE, LONGITUDE_NOT_AVAILABLE,
};
use crate::mmsi::Mmsi;
use chrono::{DateTime, TimeZone, Utc};

const BIT_LENGTH: usize = 168;

const HOUR_NOT_AVAILABLE: u8 = 24;
const MINUTE_NOT_AVAILABLE: u8 = 60;
const SECOND_NOT_AVAILABLE: u8 = 60;

/// Base station report (type 4).
#[derive(Debug, Clone, PartialEq)]
pub struct BaseStationReport {
    repeat_indicator: u8,
    mmsi: Mmsi,
    utc_year: u16,
    utc_month: u8,
    utc_day: u8,
    utc_hour: u8,
    utc_minute: u8,
    utc_second: u8,
    position_accuracy: bool,
    longitude: i32,
    latitude: i32,
    epfd_type: EpfdType,
    spare: u16,
    raim: bool,
    radio_status: u32,
}

impl BaseStationReport {
    /// Creates a report with every field at its not-available default.
    pub fn new(mmsi: Mmsi, repeat_indicator: u8) -> BaseStationReport {
        BaseStationReport {
            repeat_indicator,
            mmsi,
            utc_year: 0,
            utc_month: 0,
            utc_day: 0,
            utc_hour: HOUR_NOT_AVAILABLE,
            utc_minute: MINUTE_NOT_AVAILABLE,
            utc_second: SECOND_NOT_AVAILABLE,
            position_accuracy: false,
            longitude: LONGITUDE_NOT_AVAILABLE,
            latitude: LATITUDE_NOT_AVAILABLE,
            epfd_type: EpfdType::InternalGnss,
            spare: 0,
            raim: false,
            radio_status: 0,
        }
    }

    /// Decodes a report from an assembled bit buffer.
    pub fn from_bits(bits: &BitBuffer) -> Result<BaseStationReport, DecodeError> {
        if bits.len() < BIT_LENGTH {
            return Err(DecodeError::MalformedBits);
        }
        if bits.get_uint(0, 6)? != 4 {
            return Err(DecodeError::WrongType);
        }
        Ok(BaseStationReport {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: Mmsi::from_raw(bits.get_uint(8, 30)? as u32),
            utc_year: bits.get_uint(38, 14)? as u16,
            utc_month: bits.get_uint(52, 4)? as u8,
            utc_day: bits.get_uint(56, 5)? as u8,
            utc_hour: bits.get_uint(61, 5)? as u8,
            utc_minute: bits.get_uint(66, 6)? as u8,
            utc_second: bits.get_uint(72, 6)? as u8,
            position_accuracy: bits.get_bit(78)?,
            longitude: bits.get_int(79, 28)? as i32,
            latitude: bits.get_int(107, 27)? as i32,
            epfd_type: EpfdType::from_raw(bits.get_uint(134, 4)? as u8),
            spare: bits.get_uint(138, 10)? as u16,
            raim: bits.get_bit(148)?,
            radio_status: bits.get_uint(149, 19)? as u32,
        })
    }

    /// Appends the 168-bit layout to `bits`.
    pub fn to_bits(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(4, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.utc_year), 14)?;
        bits.append_uint(u64::from(self.utc_month), 4)?;
        bits.append_uint(u64::from(self.utc_day), 5)?;
        bits.append_uint(u64::from(self.utc_hour), 5)?;
        bits.append_uint(u64::from(self.utc_minute), 6)?;
        bits.append_uint(u64::from(self.utc_second), 6)?;
        bits.append_bit(self.position_accuracy);
        bits.append_int(i64::from(self.longitude), 28)?;
        bits.append_int(i64::from(self.latitude), 27)?;
        bits.append_uint(u64::from(self.epfd_type.to_raw()), 4)?;
        bits.append_uint(u64::from(self.spare), 10)?;
        bits.append_bit(self.raim);
        bits.append_uint(u64::from(self.radio_status), 19)?;
        Ok(())
    }

    /// Repeat indicator.
    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    /// Station identity.
    pub fn mmsi(&self) -> Mmsi {
        self.mmsi
    }

    /// UTC year, `1..=9999`. `None` when not available.
    pub fn utc_year(&self) -> Option<u16> {
        (self.utc_year != 0).then_some(self.utc_year)
    }

    /// UTC month, `1..=12`. `None` when not available.
    pub fn utc_month(&self) -> Option<u8> {
        (self.utc_month != 0).then_some(self.utc_month)
    }

    /// UTC day of month, `1..=31`. `None` when not available.
    pub fn utc_day(&self) -> Option<u8> {
        (self.utc_day != 0).then_some(self.utc_day)
    }

    /// UTC hour, `0..=23`. `None` when not available.
    pub fn utc_hour(&self) -> Option<u8> {
        (self.utc_hour < HOUR_NOT_AVAILABLE).then_some(self.utc_hour)
    }

    /// UTC minute, `0..=59`. `None` when not available.
    pub fn utc_minute(&self) -> Option<u8> {
        (self.utc_minute < MINUTE_NOT_AVAILABLE).then_some(self.utc_minute)
    }

    /// UTC second, `0..=59`. `None` when not available.
    pub fn utc_second(&self) -> Option<u8> {
        (self.utc_second < SECOND_NOT_AVAILABLE).then_some(self.utc_second)
    }

    /// The full UTC timestamp, if every component is available and the
    /// combination names a real instant.
    pub fn utc_datetime(&self) -> Option<DateTime<Utc>> {
        let year = self.utc_year()?;
        let month = self.utc_month()?;
        let day = self.utc_day()?;
        let hour = self.utc_hour()?;
        let minute = self.utc_minute()?;
        let second = self.utc_second()?;
        Utc.with_ymd_and_hms(
            i32::from(year),
            u32::from(month),
            u32::from(day),
            u32::from(hour),
            u32::from(minute),
            u32::from(second),
        )
        .single()
    }

    /// Sets the UTC date and time. Each out-of-range component stores
    /// its own not-available sentinel without affecting the others.
    pub fn set_utc_time(
        &mut self,
        year: u16,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
    ) {
        self.utc_year = if year > 9999 { 0 } else { year };
        self.utc_month = if month > 12 { 0 } else { month };
        self.utc_day = if day > 31 { 0 } else { day };
        self.utc_hour = if hour > 23 { HOUR_NOT_AVAILABLE } else { hour };
        self.utc_minute = if minute > 59 {
            MINUTE_NOT_AVAILABLE
        } else {
            minute
        };
        self.utc_second = if second > 59 {
            SECOND_NOT_AVAILABLE
        } else {
            second
        };
    }

    /// Position accuracy flag: `true` means high (≤ 10 m).
    pub fn position_accuracy(&self) -> bool {
        self.position_accuracy
    }

    pub fn set_position_accuracy(&mut self, accuracy: bool) {
        self.position_accuracy = accuracy;
    }

    /// Longitude in degrees, east positive. `None` when not available.
    pub fn longitude(&self) -> Option<f64> {
        raw_to_longitude(self.longitude)
    }

    /// Sets the longitude in degrees; values outside ±180° store the
    /// not-available sentinel.
    pub fn set_longitude(&mut self, longitude: f64) {
        self.longitude = longitude_to_raw(longitude);
    }

    /// Latitude in degrees, north positive. `None` when not available.
    pub fn latitude(&self) -> Option<f64> {
        raw_to_latitude(self.latitude)
    }

    /// Sets the latitude in degrees; values outside ±90° store the
    /// not-available sentinel.
    pub fn set_latitude(&mut self, latitude: f64) {
        self.latitude = latitude_to_raw(latitude);
    }

    /// Position fixing device type.
    pub fn epfd_type(&self) -> EpfdType {
        self.epfd_type
    }

    pub fn set_epfd_type(&mut self, epfd_type: EpfdType) {
        self.epfd_type = epfd_type;
    }

    /// RAIM flag.
    pub fn raim(&self) -> bool {
        self.raim
    }

    pub fn set_raim(&mut self, raim: bool) {
        self.raim = raim;
    }

    /// The opaque 19-bit radio status field.
    pub fn radio_status(&self) -> u32 {
        self.radio_status
    }

    pub fn set_radio_status(&mut self, radio_status: u32) {
        self.radio_status = radio_status;
    }
}
