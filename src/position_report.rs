//! Class A position report (message types 1, 2 and 3).
//!
//! The position report is the workhorse of AIS: every Class A station
//! transmits one every 2 to 10 seconds while under way. Types 1, 2 and 3
//! share a single 168-bit layout and differ only in the access scheme
//! that produced them, so one struct covers all three.

use crate::bits::{BitBuffer, BitsError};
use crate::message::{
    latitude_to_raw, longitude_to_raw, raw_to_latitude, raw_to_longitude, DecodeError,
    LATITUDE_NOT_AVAILABLE, LONGITUDE_NOT_AVAILABLE,
};
use crate::mmsi::Mmsi;

const BIT_LENGTH: usize = 168;

const ROT_NOT_AVAILABLE: i8 = -128;
const SOG_NOT_AVAILABLE: u16 = 1023;
const SOG_MAX: u16 = 1022;
const COG_NOT_AVAILABLE: u16 = 3600;
const HEADING_NOT_AVAILABLE: u16 = 511;
const TIMESTAMP_NOT_AVAILABLE: u8 = 60;

/// Navigational status of a Class A station.
///
/// Values of the 4-bit navigational status field, per Table 45 of
/// ITU-R M.1371-5.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum NavigationStatus {
    /// Under way using engine (0).
    UnderWayUsingEngine,
    /// At anchor (1).
    AtAnchor,
    /// Not under command (2).
    NotUnderCommand,
    /// Restricted maneuverability (3).
    RestrictedManeuverability,
    /// Constrained by her draught (4).
    ConstrainedByDraught,
    /// Moored (5).
    Moored,
    /// Aground (6).
    Aground,
    /// Engaged in fishing (7).
    EngagedInFishing,
    /// Under way sailing (8).
    UnderWaySailing,
    /// Reserved for high speed craft (9).
    ReservedHsc,
    /// Reserved for wing in ground craft (10).
    ReservedWig,
    /// Power-driven vessel towing astern (11, regional use).
    TowingAstern,
    /// Power-driven vessel pushing ahead or towing alongside (12,
    /// regional use).
    PushingAhead,
    /// Reserved for future use (13).
    Reserved13,
    /// AIS-SART, MOB-AIS or EPIRB-AIS (14).
    AisSartActive,
    /// Status not defined (15, the default).
    NotDefined,
}

impl NavigationStatus {
    /// Converts the raw 4-bit field value.
    pub fn from_raw(value: u8) -> NavigationStatus {
        match value & 0xF {
            0 => NavigationStatus::UnderWayUsingEngine,
            1 => NavigationStatus::AtAnchor,
            2 => NavigationStatus::NotUnderCommand,
            3 => NavigationStatus::RestrictedManeuverability,
            4 => NavigationStatus::ConstrainedByDraught,
            5 => NavigationStatus::Moored,
            6 => NavigationStatus::Aground,
            7 => NavigationStatus::EngagedInFishing,
            8 => NavigationStatus::UnderWaySailing,
            9 => NavigationStatus::ReservedHsc,
            10 => NavigationStatus::ReservedWig,
            11 => NavigationStatus::TowingAstern,
            12 => NavigationStatus::PushingAhead,
            13 => NavigationStatus::Reserved13,
            14 => NavigationStatus::AisSartActive,
            _ => NavigationStatus::NotDefined,
        }
    }

    /// The raw 4-bit field value.
    pub fn to_raw(self) -> u8 {
        match self {
            NavigationStatus::UnderWayUsingEngine => 0,
            NavigationStatus::AtAnchor => 1,
            NavigationStatus::NotUnderCommand => 2,
            NavigationStatus::RestrictedManeuverability => 3,
            NavigationStatus::ConstrainedByDraught => 4,
            NavigationStatus::Moored => 5,
            NavigationStatus::Aground => 6,
            NavigationStatus::EngagedInFishing => 7,
            NavigationStatus::UnderWaySailing => 8,
            NavigationStatus::ReservedHsc => 9,
            NavigationStatus::ReservedWig => 10,
            NavigationStatus::TowingAstern => 11,
            NavigationStatus::PushingAhead => 12,
            NavigationStatus::Reserved13 => 13,
            NavigationStatus::AisSartActive => 14,
            NavigationStatus::NotDefined => 15,
        }
    }
}

/// Class A position report (types 1, 2, 3).
///
/// Sentinel-coded fields are stored raw and exposed through
/// `Option`-typed accessors; the raw value is kept so that re-encoding a
/// decoded message reproduces its exact bit pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionReport {
    message_type: u8,
    repeat_indicator: u8,
    mmsi: Mmsi,
    navigation_status: NavigationStatus,
    rate_of_turn: i8,
    speed_over_ground: u16,
    position_accuracy: bool,
    longitude: i32,
    latitude: i32,
    course_over_ground: u16,
    true_heading: u16,
    timestamp: u8,
    special_maneuver: u8,
    spare: u8,
    raim: bool,
    radio_status: u32,
}

impl PositionReport {
    /// Creates a report with every field at its not-available default.
    ///
    /// `message_type` must be 1, 2 or 3.
    pub fn new(message_type: u8, mmsi: Mmsi, repeat_indicator: u8) -> Result<PositionReport, DecodeError> {
        if !(1..=3).contains(&message_type) {
            return Err(DecodeError::WrongType);
        }
        Ok(PositionReport {
            message_type,
            repeat_indicator,
            mmsi,
            navigation_status: NavigationStatus::NotDefined,
            rate_of_turn: ROT_NOT_AVAILABLE,
            speed_over_ground: SOG_NOT_AVAILABLE,
            position_accuracy: false,
            longitude: LONGITUDE_NOT_AVAILABLE,
            latitude: LATITUDE_NOT_AVAILABLE,
            course_over_ground: COG_NOT_AVAILABLE,
            true_heading: HEADING_NOT_AVAILABLE,
            timestamp: TIMESTAMP_NOT_AVAILABLE,
            special_maneuver: 0,
            spare: 0,
            raim: false,
            radio_status: 0,
        })
    }

    /// Decodes a report from an assembled bit buffer.
    pub fn from_bits(bits: &BitBuffer) -> Result<PositionReport, DecodeError> {
        if bits.len() < BIT_LENGTH {
            return Err(DecodeError::MalformedBits);
        }
        let message_type = bits.get_uint(0, 6)? as u8;
        if !(1..=3).contains(&message_type) {
            return Err(DecodeError::WrongType);
        }
        Ok(PositionReport {
            message_type,
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: Mmsi::from_raw(bits.get_uint(8, 30)? as u32),
            navigation_status: NavigationStatus::from_raw(bits.get_uint(38, 4)? as u8),
            rate_of_turn: bits.get_int(42, 8)? as i8,
            speed_over_ground: bits.get_uint(50, 10)? as u16,
            position_accuracy: bits.get_bit(60)?,
            longitude: bits.get_int(61, 28)? as i32,
            latitude: bits.get_int(89, 27)? as i32,
            course_over_ground: bits.get_uint(116, 12)? as u16,
            true_heading: bits.get_uint(128, 9)? as u16,
            timestamp: bits.get_uint(137, 6)? as u8,
            special_maneuver: bits.get_uint(143, 2)? as u8,
            spare: bits.get_uint(145, 3)? as u8,
            raim: bits.get_bit(148)?,
            radio_status: bits.get_uint(149, 19)? as u32,
        })
    }

    /// Appends the 168-bit layout to `bits`.
    pub fn to_bits(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(u64::from(self.message_type), 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.navigation_status.to_raw()), 4)?;
        bits.append_int(i64::from(self.rate_of_turn), 8)?;
        bits.append_uint(u64::from(self.speed_over_ground), 10)?;
        bits.append_bit(self.position_accuracy);
        bits.append_int(i64::from(self.longitude), 28)?;
        bits.append_int(i64::from(self.latitude), 27)?;
        bits.append_uint(u64::from(self.course_over_ground), 12)?;
        bits.append_uint(u64::from(self.true_heading), 9)?;
        bits.append_uint(u64::from(self.timestamp), 6)?;
        bits.append_uint(u64::from(self.special_maneuver), 2)?;
        bits.append_uint(u64::from(self.spare), 3)?;
        bits.append_bit(self.raim);
        bits.append_uint(u64::from(self.radio_status), 19)?;
        Ok(())
    }

    /// Message type code (1, 2 or 3).
    pub fn message_type(&self) -> u8 {
        self.message_type
    }

    /// Repeat indicator.
    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    /// Station identity.
    pub fn mmsi(&self) -> Mmsi {
        self.mmsi
    }

    /// Navigational status.
    pub fn navigation_status(&self) -> NavigationStatus {
        self.navigation_status
    }

    pub fn set_navigation_status(&mut self, status: NavigationStatus) {
        self.navigation_status = status;
    }

    /// Rate of turn in degrees per minute.
    ///
    /// `None` when not available. Raw ±127 decode to ±infinity: the
    /// station is turning faster than the scale can express.
    pub fn rate_of_turn(&self) -> Option<f32> {
        match self.rate_of_turn {
            ROT_NOT_AVAILABLE => None,
            127 => Some(f32::INFINITY),
            -127 => Some(f32::NEG_INFINITY),
            0 => Some(0.0),
            raw => {
                let magnitude = 4.733 * f32::from(raw.unsigned_abs()).sqrt();
                Some(if raw > 0 { magnitude } else { -magnitude })
            }
        }
    }

    /// The raw 8-bit rate-of-turn indicator.
    pub fn rate_of_turn_raw(&self) -> i8 {
        self.rate_of_turn
    }

    pub fn set_rate_of_turn_raw(&mut self, raw: i8) {
        self.rate_of_turn = raw;
    }

    /// Sets the rate of turn from a value in degrees per minute.
    ///
    /// NaN stores the not-available sentinel; magnitudes above
    /// 708 deg/min store the out-of-scale markers ±127. Other values are
    /// encoded with the square-law scale, rounded to the nearest
    /// indicator step.
    pub fn set_rate_of_turn(&mut self, rot_deg_min: f32) {
        self.rate_of_turn = if rot_deg_min.is_nan() {
            ROT_NOT_AVAILABLE
        } else if rot_deg_min > 708.0 {
            127
        } else if rot_deg_min < -708.0 {
            -127
        } else if rot_deg_min == 0.0 {
            0
        } else {
            let indicator = (rot_deg_min.abs() / 4.733).powi(2).round().min(126.0) as i8;
            if rot_deg_min > 0.0 {
                indicator
            } else {
                -indicator
            }
        };
    }

    /// Speed over ground in knots.
    ///
    /// `None` when not available; 102.2 means "102.2 knots or more".
    pub fn speed_over_ground(&self) -> Option<f32> {
        match self.speed_over_ground {
            SOG_NOT_AVAILABLE => None,
            raw => Some(f32::from(raw) / 10.0),
        }
    }

    /// Sets the speed over ground in knots.
    ///
    /// NaN stores the not-available sentinel; values at or above 102.2
    /// clamp to the top of the scale and negative values clamp to zero.
    pub fn set_speed_over_ground(&mut self, sog: f32) {
        self.speed_over_ground = if sog.is_nan() {
            SOG_NOT_AVAILABLE
        } else if sog >= 102.2 {
            SOG_MAX
        } else if sog < 0.0 {
            0
        } else {
            ((sog * 10.0).round() as u16).min(SOG_MAX)
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

    /// The raw longitude field in 1/10000 minute.
    pub fn longitude_raw(&self) -> i32 {
        self.longitude
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

    /// The raw latitude field in 1/10000 minute.
    pub fn latitude_raw(&self) -> i32 {
        self.latitude
    }

    /// Sets the latitude in degrees; values outside ±90° store the
    /// not-available sentinel.
    pub fn set_latitude(&mut self, latitude: f64) {
        self.latitude = latitude_to_raw(latitude);
    }

    /// Course over ground in degrees. `None` when not available.
    pub fn course_over_ground(&self) -> Option<f32> {
        match self.course_over_ground {
            COG_NOT_AVAILABLE => None,
            raw => Some(f32::from(raw) / 10.0),
        }
    }

    /// Sets the course over ground in degrees.
    ///
    /// NaN stores the not-available sentinel; other inputs are
    /// normalized into `[0, 360)` before scaling.
    pub fn set_course_over_ground(&mut self, cog: f32) {
        if cog.is_nan() {
            self.course_over_ground = COG_NOT_AVAILABLE;
            return;
        }
        let mut cog = cog.rem_euclid(360.0);
        if (cog - 360.0).abs() < 0.05 {
            cog = 0.0;
        }
        self.course_over_ground = ((cog * 10.0).round() as u16).min(3599);
    }

    /// True heading in degrees, `0..=359`. `None` when not available.
    pub fn true_heading(&self) -> Option<u16> {
        match self.true_heading {
            HEADING_NOT_AVAILABLE => None,
            raw => Some(raw),
        }
    }

    /// Sets the true heading; values outside `0..=359` store the
    /// not-available sentinel.
    pub fn set_true_heading(&mut self, heading: u16) {
        self.true_heading = if heading > 359 {
            HEADING_NOT_AVAILABLE
        } else {
            heading
        };
    }

    /// UTC second of the position fix, `0..=59`.
    ///
    /// Values 60 to 63 are the special states of the standard (60 = not
    /// available, 61 = manual input, 62 = dead reckoning,
    /// 63 = positioning system inoperative).
    pub fn timestamp(&self) -> u8 {
        self.timestamp
    }

    /// Sets the timestamp field; values above 63 store the
    /// not-available state.
    pub fn set_timestamp(&mut self, timestamp: u8) {
        self.timestamp = if timestamp > 63 {
            TIMESTAMP_NOT_AVAILABLE
        } else {
            timestamp
        };
    }

    /// Special maneuver indicator: 0 = not available, 1 = not engaged,
    /// 2 = engaged.
    pub fn special_maneuver(&self) -> u8 {
        self.special_maneuver
    }

    /// Sets the special maneuver indicator; values above 2 store the
    /// not-available state.
    pub fn set_special_maneuver(&mut self, indicator: u8) {
        self.special_maneuver = if indicator > 2 { 0 } else { indicator };
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

#[cfg(test)]
mod test {
    use super::*;

    fn report() -> PositionReport {
        PositionReport::new(1, Mmsi::try_from(123456789).unwrap(), 0).unwrap()
    }

    #[test]
    fn new_validates_message_type() {
        let mmsi = Mmsi::try_from(123456789).unwrap();
        assert!(PositionReport::new(1, mmsi, 0).is_ok());
        assert!(PositionReport::new(3, mmsi, 0).is_ok());
        assert_eq!(
            PositionReport::new(0, mmsi, 0),
            Err(DecodeError::WrongType)
        );
        assert_eq!(
            PositionReport::new(4, mmsi, 0),
            Err(DecodeError::WrongType)
        );
    }

    #[test]
    fn encode_decode_roundtrip() {
        let mut message = report();
        message.set_navigation_status(NavigationStatus::UnderWayUsingEngine);
        message.set_speed_over_ground(12.4);
        message.set_longitude(123.456789);
        message.set_latitude(45.678901);
        message.set_course_over_ground(123.4);
        message.set_true_heading(123);
        message.set_timestamp(30);
        message.set_raim(true);

        let mut bits = BitBuffer::new();
        message.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), 168);

        let decoded = PositionReport::from_bits(&bits).unwrap();
        assert_eq!(decoded.message_type(), 1);
        assert_eq!(decoded.mmsi().value(), 123456789);
        assert_eq!(
            decoded.navigation_status(),
            NavigationStatus::UnderWayUsingEngine
        );
        assert!((decoded.speed_over_ground().unwrap() - 12.4).abs() < 0.1);
        assert!((decoded.longitude().unwrap() - 123.456789).abs() < 1e-6);
        assert!((decoded.latitude().unwrap() - 45.678901).abs() < 1e-6);
        assert!((decoded.course_over_ground().unwrap() - 123.4).abs() < 0.1);
        assert_eq!(decoded.true_heading(), Some(123));
        assert_eq!(decoded.timestamp(), 30);
        assert!(decoded.raim());
        assert_eq!(decoded, message);
    }

    #[test]
    fn decode_live_sentence() {
        // !AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23
        let bits = BitBuffer::from_nmea_payload("13HOI:0P0000VOHLCnHQKwvL05Ip").unwrap();
        let message = PositionReport::from_bits(&bits).unwrap();
        assert_eq!(message.message_type(), 1);
        assert_eq!(message.mmsi().value(), 227006760);
        assert_eq!(message.speed_over_ground(), Some(0.0));
        let lon = message.longitude().unwrap();
        let lat = message.latitude().unwrap();
        assert!((lon - 0.13138).abs() < 1e-4);
        assert!((lat - 49.47558).abs() < 1e-4);
    }

    #[test]
    fn latitude_sentinel() {
        let mut message = report();
        message.set_latitude(200.0);
        assert_eq!(message.latitude_raw(), 0x3412140);
        assert_eq!(message.latitude(), None);

        message.set_longitude(181.5);
        assert_eq!(message.longitude_raw(), 0x6791AC0);
        assert_eq!(message.longitude(), None);
    }

    #[test]
    fn rate_of_turn_corners() {
        let mut message = report();

        assert_eq!(message.rate_of_turn_raw(), -128);
        assert_eq!(message.rate_of_turn(), None);

        message.set_rate_of_turn_raw(127);
        assert_eq!(message.rate_of_turn(), Some(f32::INFINITY));
        message.set_rate_of_turn_raw(-127);
        assert_eq!(message.rate_of_turn(), Some(f32::NEG_INFINITY));

        message.set_rate_of_turn_raw(0);
        assert_eq!(message.rate_of_turn(), Some(0.0));

        message.set_rate_of_turn_raw(1);
        let rot = message.rate_of_turn().unwrap();
        assert!((rot - 4.733).abs() < 0.001);

        message.set_rate_of_turn(f32::NAN);
        assert_eq!(message.rate_of_turn_raw(), -128);

        message.set_rate_of_turn(720.0);
        assert_eq!(message.rate_of_turn_raw(), 127);
        message.set_rate_of_turn(-720.0);
        assert_eq!(message.rate_of_turn_raw(), -127);
    }

    #[test]
    fn rate_of_turn_scale_roundtrip() {
        let mut message = report();
        for raw in -126i8..=126 {
            message.set_rate_of_turn_raw(raw);
            let rot = message.rate_of_turn().unwrap();
            message.set_rate_of_turn(rot);
            assert_eq!(message.rate_of_turn_raw(), raw, "raw {raw}");
        }
    }

    #[test]
    fn sog_clamping() {
        let mut message = report();
        message.set_speed_over_ground(150.0);
        assert_eq!(message.speed_over_ground(), Some(102.2));
        message.set_speed_over_ground(-3.0);
        assert_eq!(message.speed_over_ground(), Some(0.0));
        message.set_speed_over_ground(f32::NAN);
        assert_eq!(message.speed_over_ground(), None);
    }

    #[test]
    fn cog_normalization() {
        let mut message = report();
        message.set_course_over_ground(370.0);
        assert!((message.course_over_ground().unwrap() - 10.0).abs() < 0.1);
        message.set_course_over_ground(-10.0);
        assert!((message.course_over_ground().unwrap() - 350.0).abs() < 0.1);
        message.set_course_over_ground(f32::NAN);
        assert_eq!(message.course_over_ground(), None);
    }

    #[test]
    fn heading_and_timestamp_sentinels() {
        let mut message = report();
        message.set_true_heading(360);
        assert_eq!(message.true_heading(), None);
        message.set_true_heading(359);
        assert_eq!(message.true_heading(), Some(359));
        message.set_timestamp(70);
        assert_eq!(message.timestamp(), 60);
        message.set_special_maneuver(5);
        assert_eq!(message.special_maneuver(), 0);
    }

    #[test]
    fn decode_rejects_short_and_foreign_buffers() {
        let mut bits = BitBuffer::new();
        bits.append_uint(1, 6).unwrap();
        assert_eq!(
            PositionReport::from_bits(&bits),
            Err(DecodeError::MalformedBits)
        );

        let mut bits = BitBuffer::new();
        bits.append_uint(5, 6).unwrap();
        for _ in 0..162 {
            bits.append_bit(false);
        }
        assert_eq!(
            PositionReport::from_bits(&bits),
            Err(DecodeError::WrongType)
        );
    }
}
