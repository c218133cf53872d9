//! Static and voyage related data (message type 5).
//!
//! Class A stations transmit type 5 every six minutes. It carries the
//! vessel's identity (IMO number, call sign, name), physical dimensions,
//! and the current voyage (destination, ETA, draught). At 424 bits it is
//! the classic multipart message: the payload never fits one sentence.

use crate::bits::{BitBuffer, BitsError};
use crate::message::{trim_string_padding, DecodeError, EpfdType};
use crate::mmsi::Mmsi;
use chrono::{DateTime, Datelike, TimeZone, Utc};

const BIT_LENGTH: usize = 424;

const CALL_SIGN_BITS: usize = 42;
const NAME_BITS: usize = 120;
const DESTINATION_BITS: usize = 120;

const ETA_HOUR_NOT_AVAILABLE: u8 = 24;
const ETA_MINUTE_NOT_AVAILABLE: u8 = 60;

/// Static and voyage related data (type 5).
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAndVoyageData {
    repeat_indicator: u8,
    mmsi: Mmsi,
    ais_version: u8,
    imo_number: u32,
    call_sign: String,
    vessel_name: String,
    ship_type: u8,
    dimension_to_bow: u16,
    dimension_to_stern: u16,
    dimension_to_port: u8,
    dimension_to_starboard: u8,
    epfd_type: EpfdType,
    eta_month: u8,
    eta_day: u8,
    eta_hour: u8,
    eta_minute: u8,
    draught: u8,
    destination: String,
    dte: bool,
    spare: bool,
}

impl StaticAndVoyageData {
    /// Creates a message with empty strings and every voyage field at
    /// its not-available default.
    pub fn new(mmsi: Mmsi, repeat_indicator: u8) -> StaticAndVoyageData {
        StaticAndVoyageData {
            repeat_indicator,
            mmsi,
            ais_version: 0,
            imo_number: 0,
            call_sign: String::new(),
            vessel_name: String::new(),
            ship_type: 0,
            dimension_to_bow: 0,
            dimension_to_stern: 0,
            dimension_to_port: 0,
            dimension_to_starboard: 0,
            epfd_type: EpfdType::Undefined,
            eta_month: 0,
            eta_day: 0,
            eta_hour: ETA_HOUR_NOT_AVAILABLE,
            eta_minute: ETA_MINUTE_NOT_AVAILABLE,
            draught: 0,
            destination: String::new(),
            dte: false,
            spare: false,
        }
    }

    /// Decodes a message from an assembled bit buffer.
    pub fn from_bits(bits: &BitBuffer) -> Result<StaticAndVoyageData, DecodeError> {
        if bits.len() < BIT_LENGTH {
            return Err(DecodeError::MalformedBits);
        }
        if bits.get_uint(0, 6)? != 5 {
            return Err(DecodeError::WrongType);
        }
        Ok(StaticAndVoyageData {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: Mmsi::from_raw(bits.get_uint(8, 30)? as u32),
            ais_version: bits.get_uint(38, 2)? as u8,
            imo_number: bits.get_uint(40, 30)? as u32,
            call_sign: trim_string_padding(bits.get_string(70, CALL_SIGN_BITS)?),
            vessel_name: trim_string_padding(bits.get_string(112, NAME_BITS)?),
            ship_type: bits.get_uint(232, 8)? as u8,
            dimension_to_bow: bits.get_uint(240, 9)? as u16,
            dimension_to_stern: bits.get_uint(249, 9)? as u16,
            dimension_to_port: bits.get_uint(258, 6)? as u8,
            dimension_to_starboard: bits.get_uint(264, 6)? as u8,
            epfd_type: EpfdType::from_raw(bits.get_uint(270, 4)? as u8),
            eta_month: bits.get_uint(274, 4)? as u8,
            eta_day: bits.get_uint(278, 5)? as u8,
            eta_hour: bits.get_uint(283, 5)? as u8,
            eta_minute: bits.get_uint(288, 6)? as u8,
            draught: bits.get_uint(294, 8)? as u8,
            destination: trim_string_padding(bits.get_string(302, DESTINATION_BITS)?),
            dte: bits.get_bit(422)?,
            spare: bits.get_bit(423)?,
        })
    }

    /// Appends the 424-bit layout to `bits`.
    ///
    /// Fails with [`BitsError::BadWidth`] if a stored string exceeds its
    /// field (7 characters for the call sign, 20 for name and
    /// destination).
    pub fn to_bits(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(5, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.ais_version), 2)?;
        bits.append_uint(u64::from(self.imo_number), 30)?;
        bits.append_string(&self.call_sign, CALL_SIGN_BITS)?;
        bits.append_string(&self.vessel_name, NAME_BITS)?;
        bits.append_uint(u64::from(self.ship_type), 8)?;
        bits.append_uint(u64::from(self.dimension_to_bow), 9)?;
        bits.append_uint(u64::from(self.dimension_to_stern), 9)?;
        bits.append_uint(u64::from(self.dimension_to_port), 6)?;
        bits.append_uint(u64::from(self.dimension_to_starboard), 6)?;
        bits.append_uint(u64::from(self.epfd_type.to_raw()), 4)?;
        bits.append_uint(u64::from(self.eta_month), 4)?;
        bits.append_uint(u64::from(self.eta_day), 5)?;
        bits.append_uint(u64::from(self.eta_hour), 5)?;
        bits.append_uint(u64::from(self.eta_minute), 6)?;
        bits.append_uint(u64::from(self.draught), 8)?;
        bits.append_string(&self.destination, DESTINATION_BITS)?;
        bits.append_bit(self.dte);
        bits.append_bit(self.spare);
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

    /// AIS version indicator (0 = ITU-R M.1371-1).
    pub fn ais_version(&self) -> u8 {
        self.ais_version
    }

    /// Sets the AIS version indicator; values above 3 reset to 0.
    pub fn set_ais_version(&mut self, version: u8) {
        self.ais_version = if version > 3 { 0 } else { version };
    }

    /// IMO ship identification number; 0 when not available.
    pub fn imo_number(&self) -> u32 {
        self.imo_number
    }

    pub fn set_imo_number(&mut self, imo_number: u32) {
        self.imo_number = imo_number;
    }

    /// Call sign, trailing padding removed.
    pub fn call_sign(&self) -> &str {
        self.call_sign.trim_end_matches(' ')
    }

    /// Sets the call sign; at most 7 characters of the 6-bit alphabet.
    pub fn set_call_sign(&mut self, call_sign: &str) -> Result<(), BitsError> {
        if call_sign.chars().count() > CALL_SIGN_BITS / 6 {
            return Err(BitsError::BadWidth);
        }
        self.call_sign = call_sign.to_owned();
        Ok(())
    }

    /// Vessel name, trailing padding removed.
    pub fn vessel_name(&self) -> &str {
        self.vessel_name.trim_end_matches(' ')
    }

    /// Sets the vessel name; at most 20 characters of the 6-bit
    /// alphabet.
    pub fn set_vessel_name(&mut self, vessel_name: &str) -> Result<(), BitsError> {
        if vessel_name.chars().count() > NAME_BITS / 6 {
            return Err(BitsError::BadWidth);
        }
        self.vessel_name = vessel_name.to_owned();
        Ok(())
    }

    /// Ship and cargo type per Table 53 of ITU-R M.1371-5; 0 when not
    /// available.
    pub fn ship_type(&self) -> u8 {
        self.ship_type
    }

    pub fn set_ship_type(&mut self, ship_type: u8) {
        self.ship_type = ship_type;
    }

    /// Distance from the reference point to the bow, in meters.
    pub fn dimension_to_bow(&self) -> u16 {
        self.dimension_to_bow
    }

    /// Distance from the reference point to the stern, in meters.
    pub fn dimension_to_stern(&self) -> u16 {
        self.dimension_to_stern
    }

    /// Distance from the reference point to port, in meters.
    pub fn dimension_to_port(&self) -> u8 {
        self.dimension_to_port
    }

    /// Distance from the reference point to starboard, in meters.
    pub fn dimension_to_starboard(&self) -> u8 {
        self.dimension_to_starboard
    }

    /// Sets the four reference-point distances. Bow and stern truncate
    /// to 9 bits, port and starboard to 6, at encode time.
    pub fn set_ship_dimensions(&mut self, to_bow: u16, to_stern: u16, to_port: u8, to_starboard: u8) {
        self.dimension_to_bow = to_bow;
        self.dimension_to_stern = to_stern;
        self.dimension_to_port = to_port;
        self.dimension_to_starboard = to_starboard;
    }

    /// Position fixing device type.
    pub fn epfd_type(&self) -> EpfdType {
        self.epfd_type
    }

    pub fn set_epfd_type(&mut self, epfd_type: EpfdType) {
        self.epfd_type = epfd_type;
    }

    /// ETA month, `1..=12`. `None` when not available.
    pub fn eta_month(&self) -> Option<u8> {
        (self.eta_month != 0 && self.eta_month <= 12).then_some(self.eta_month)
    }

    /// ETA day of month, `1..=31`. `None` when not available.
    pub fn eta_day(&self) -> Option<u8> {
        (self.eta_day != 0).then_some(self.eta_day)
    }

    /// ETA hour, `0..=23`. `None` when not available.
    pub fn eta_hour(&self) -> Option<u8> {
        (self.eta_hour < ETA_HOUR_NOT_AVAILABLE).then_some(self.eta_hour)
    }

    /// ETA minute, `0..=59`. `None` when not available.
    pub fn eta_minute(&self) -> Option<u8> {
        (self.eta_minute < ETA_MINUTE_NOT_AVAILABLE).then_some(self.eta_minute)
    }

    /// Sets the estimated time of arrival. Each out-of-range component
    /// stores its own not-available sentinel.
    pub fn set_eta(&mut self, month: u8, day: u8, hour: u8, minute: u8) {
        self.eta_month = if month > 12 { 0 } else { month };
        self.eta_day = if day > 31 { 0 } else { day };
        self.eta_hour = if hour > 23 { ETA_HOUR_NOT_AVAILABLE } else { hour };
        self.eta_minute = if minute > 59 {
            ETA_MINUTE_NOT_AVAILABLE
        } else {
            minute
        };
    }

    /// Resolves the ETA against a reference instant.
    ///
    /// The wire format carries no year. The ETA is placed in the
    /// reference year, or the following year if that instant has
    /// already passed, since an arrival is never in the past. Returns `None`
    /// if any component is not available or the combination names no
    /// real instant.
    pub fn eta(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let month = u32::from(self.eta_month()?);
        let day = u32::from(self.eta_day()?);
        let hour = u32::from(self.eta_hour()?);
        let minute = u32::from(self.eta_minute()?);
        let this_year = Utc
            .with_ymd_and_hms(reference.year(), month, day, hour, minute, 0)
            .single()?;
        if this_year >= reference {
            Some(this_year)
        } else {
            Utc.with_ymd_and_hms(reference.year() + 1, month, day, hour, minute, 0)
                .single()
        }
    }

    /// Maximum present static draught in meters.
    pub fn draught(&self) -> f32 {
        f32::from(self.draught) / 10.0
    }

    /// Sets the draught in meters, clamped into `0.0..=25.5`.
    pub fn set_draught(&mut self, draught: f32) {
        self.draught = if draught.is_nan() || draught < 0.0 {
            0
        } else if draught > 25.5 {
            255
        } else {
            (draught * 10.0).round() as u8
        };
    }

    /// Destination, trailing padding removed.
    pub fn destination(&self) -> &str {
        self.destination.trim_end_matches(' ')
    }

    /// Sets the destination; at most 20 characters of the 6-bit
    /// alphabet.
    pub fn set_destination(&mut self, destination: &str) -> Result<(), BitsError> {
        if destination.chars().count() > DESTINATION_BITS / 6 {
            return Err(BitsError::BadWidth);
        }
        self.destination = destination.to_owned();
        Ok(())
    }

    /// Data terminal equipment flag (`false` = available).
    pub fn dte(&self) -> bool {
        self.dte
    }

    pub fn set_dte(&mut self, dte: bool) {
        self.dte = dte;
    }
}
