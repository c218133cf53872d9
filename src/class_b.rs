//! Class B position reports (message types 18 and 19).
//!
//! Class B equipment is the lighter carriage regime: no navigational
//! status, no rate of turn. Type 18 is the periodic position report;
//! type 19 extends the same position prefix with the static data a
//! Class B station never sends in a type 5. The shared prefix (bits 6
//! through 138 of both layouts) lives in [`ClassBCommon`], embedded in
//! both report structs.

use crate::bits::{BitBuffer, BitsError};
use crate::message::{
    latitude_to_raw, longitude_to_raw, raw_to_latitude, raw_to_longitude, trim_string_padding,
    DecodeError, EpfdType, LATITUDE_NOT_AVAILABLE, LONGITUDE_NOT_AVAILABLE,
};
use crate::mmsi::Mmsi;

const STANDARD_BIT_LENGTH: usize = 168;
const EXTENDED_BIT_LENGTH: usize = 312;

const SOG_NOT_AVAILABLE: u16 = 1023;
const COG_NOT_AVAILABLE: u16 = 3600;
const HEADING_NOT_AVAILABLE: u16 = 511;
const TIMESTAMP_NOT_AVAILABLE: u8 = 60;
const NAME_BITS: usize = 120;

/// Fields shared by the type 18 and type 19 layouts.
///
/// Covers the span from the repeat indicator through the timestamp;
/// both message types place these fields at identical offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBCommon {
    repeat_indicator: u8,
    mmsi: Mmsi,
    regional_a: u8,
    speed_over_ground: u16,
    position_accuracy: bool,
    longitude: i32,
    latitude: i32,
    course_over_ground: u16,
    true_heading: u16,
    timestamp: u8,
}

impl ClassBCommon {
    fn new(mmsi: Mmsi, repeat_indicator: u8) -> ClassBCommon {
        ClassBCommon {
            repeat_indicator,
            mmsi,
            regional_a: 0,
            speed_over_ground: SOG_NOT_AVAILABLE,
            position_accuracy: false,
            longitude: LONGITUDE_NOT_AVAILABLE,
            latitude: LATITUDE_NOT_AVAILABLE,
            course_over_ground: COG_NOT_AVAILABLE,
            true_heading: HEADING_NOT_AVAILABLE,
            timestamp: TIMESTAMP_NOT_AVAILABLE,
        }
    }

    /// Reads the shared prefix; both layouts start it at bit 6.
    fn from_bits(bits: &BitBuffer) -> Result<ClassBCommon, DecodeError> {
        Ok(ClassBCommon {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: Mmsi::from_raw(bits.get_uint(8, 30)? as u32),
            regional_a: bits.get_uint(38, 8)? as u8,
            speed_over_ground: bits.get_uint(46, 10)? as u16,
            position_accuracy: bits.get_bit(56)?,
            longitude: bits.get_int(57, 28)? as i32,
            latitude: bits.get_int(85, 27)? as i32,
            course_over_ground: bits.get_uint(112, 12)? as u16,
            true_heading: bits.get_uint(124, 9)? as u16,
            timestamp: bits.get_uint(133, 6)? as u8,
        })
    }

    /// Appends the shared prefix (everything after the type code).
    fn to_bits(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.regional_a), 8)?;
        bits.append_uint(u64::from(self.speed_over_ground), 10)?;
        bits.append_bit(self.position_accuracy);
        bits.append_int(i64::from(self.longitude), 28)?;
        bits.append_int(i64::from(self.latitude), 27)?;
        bits.append_uint(u64::from(self.course_over_ground), 12)?;
        bits.append_uint(u64::from(self.true_heading), 9)?;
        bits.append_uint(u64::from(self.timestamp), 6)?;
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

    /// The 8-bit regional reserved field.
    pub fn regional(&self) -> u8 {
        self.regional_a
    }

    /// Speed over ground in knots. `None` when not available.
    pub fn speed_over_ground(&self) -> Option<f32> {
        match self.speed_over_ground {
            SOG_NOT_AVAILABLE => None,
            raw => Some(f32::from(raw) / 10.0),
        }
    }

    /// Sets the speed over ground in knots.
    ///
    /// NaN and negative values store the not-available sentinel; values
    /// above 102.2 clamp to the top of the scale.
    pub fn set_speed_over_ground(&mut self, sog: f32) {
        self.speed_over_ground = if sog.is_nan() || sog < 0.0 {
            SOG_NOT_AVAILABLE
        } else if sog > 102.2 {
            1022
        } else {
            ((sog * 10.0).round() as u16).min(1022)
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

    /// Course over ground in degrees. `None` when not available.
    pub fn course_over_ground(&self) -> Option<f32> {
        match self.course_over_ground {
            COG_NOT_AVAILABLE => None,
            raw => Some(f32::from(raw) / 10.0),
        }
    }

    /// Sets the course over ground in degrees; NaN and values outside
    /// `[0, 360)` store the not-available sentinel.
    pub fn set_course_over_ground(&mut self, cog: f32) {
        self.course_over_ground = if cog.is_nan() || !(0.0..360.0).contains(&cog) {
            COG_NOT_AVAILABLE
        } else {
            ((cog * 10.0).round() as u16).min(3599)
        };
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

    /// UTC second of the position fix, `0..=59`; 60 to 63 are the
    /// special states of the standard.
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
}

/// Standard Class B position report (type 18).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBPositionReport {
    common: ClassBCommon,
    regional_b: u8,
    cs: bool,
    display: bool,
    dsc: bool,
    band: bool,
    message_22: bool,
    assigned: bool,
    raim: bool,
    radio_status: u32,
}

impl ClassBPositionReport {
    /// Creates a report with every field at its not-available default.
    pub fn new(mmsi: Mmsi, repeat_indicator: u8) -> ClassBPositionReport {
        ClassBPositionReport {
            common: ClassBCommon::new(mmsi, repeat_indicator),
            regional_b: 0,
            cs: true,
            display: false,
            dsc: false,
            band: false,
            message_22: false,
            assigned: false,
            raim: false,
            radio_status: 0,
        }
    }

    /// Decodes a report from an assembled bit buffer.
    pub fn from_bits(bits: &BitBuffer) -> Result<ClassBPositionReport, DecodeError> {
        if bits.len() < STANDARD_BIT_LENGTH {
            return Err(DecodeError::MalformedBits);
        }
        if bits.get_uint(0, 6)? != 18 {
            return Err(DecodeError::WrongType);
        }
        Ok(ClassBPositionReport {
            common: ClassBCommon::from_bits(bits)?,
            regional_b: bits.get_uint(139, 2)? as u8,
            cs: bits.get_bit(141)?,
            display: bits.get_bit(142)?,
            dsc: bits.get_bit(143)?,
            band: bits.get_bit(144)?,
            message_22: bits.get_bit(145)?,
            assigned: bits.get_bit(146)?,
            raim: bits.get_bit(147)?,
            radio_status: bits.get_uint(148, 20)? as u32,
        })
    }

    /// Appends the 168-bit layout to `bits`.
    pub fn to_bits(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(18, 6)?;
        self.common.to_bits(bits)?;
        bits.append_uint(u64::from(self.regional_b), 2)?;
        bits.append_bit(self.cs);
        bits.append_bit(self.display);
        bits.append_bit(self.dsc);
        bits.append_bit(self.band);
        bits.append_bit(self.message_22);
        bits.append_bit(self.assigned);
        bits.append_bit(self.raim);
        bits.append_uint(u64::from(self.radio_status), 20)?;
        Ok(())
    }

    /// The shared position fields.
    pub fn common(&self) -> &ClassBCommon {
        &self.common
    }

    /// Mutable access to the shared position fields.
    pub fn common_mut(&mut self) -> &mut ClassBCommon {
        &mut self.common
    }

    /// Repeat indicator.
    pub fn repeat_indicator(&self) -> u8 {
        self.common.repeat_indicator()
    }

    /// Station identity.
    pub fn mmsi(&self) -> Mmsi {
        self.common.mmsi()
    }

    /// Carrier sense flag: `true` = CS unit, `false` = SOTDMA unit.
    pub fn cs(&self) -> bool {
        self.cs
    }

    pub fn set_cs(&mut self, cs: bool) {
        self.cs = cs;
    }

    /// Display flag: the station has a display for messages 12 and 14.
    pub fn display(&self) -> bool {
        self.display
    }

    pub fn set_display(&mut self, display: bool) {
        self.display = display;
    }

    /// DSC flag: the station is attached to a VHF with DSC capability.
    pub fn dsc(&self) -> bool {
        self.dsc
    }

    pub fn set_dsc(&mut self, dsc: bool) {
        self.dsc = dsc;
    }

    /// Band flag: the station can use the whole marine band.
    pub fn band(&self) -> bool {
        self.band
    }

    pub fn set_band(&mut self, band: bool) {
        self.band = band;
    }

    /// Message 22 flag: frequency management via message 22 accepted.
    pub fn message_22(&self) -> bool {
        self.message_22
    }

    pub fn set_message_22(&mut self, message_22: bool) {
        self.message_22 = message_22;
    }

    /// Assigned-mode flag.
    pub fn assigned(&self) -> bool {
        self.assigned
    }

    pub fn set_assigned(&mut self, assigned: bool) {
        self.assigned = assigned;
    }

    /// RAIM flag.
    pub fn raim(&self) -> bool {
        self.raim
    }

    pub fn set_raim(&mut self, raim: bool) {
        self.raim = raim;
    }

    /// The opaque 20-bit radio status field.
    pub fn radio_status(&self) -> u32 {
        self.radio_status
    }

    pub fn set_radio_status(&mut self, radio_status: u32) {
        self.radio_status = radio_status;
    }
}

/// Extended Class B position report (type 19).
///
/// The same position prefix as type 18 followed by the station's static
/// data. Type 19 is being phased out in favor of type 18 plus type 24,
/// but remains on the air.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedClassBPositionReport {
    common: ClassBCommon,
    regional_b: u8,
    vessel_name: String,
    ship_type: u8,
    dimension_to_bow: u16,
    dimension_to_stern: u16,
    dimension_to_port: u8,
    dimension_to_starboard: u8,
    epfd_type: EpfdType,
    raim: bool,
    dte: bool,
    assigned: bool,
    spare: u8,
}

impl ExtendedClassBPositionReport {
    /// Creates a report with every field at its not-available default.
    pub fn new(mmsi: Mmsi, repeat_indicator: u8) -> ExtendedClassBPositionReport {
        ExtendedClassBPositionReport {
            common: ClassBCommon::new(mmsi, repeat_indicator),
            regional_b: 0,
            vessel_name: String::new(),
            ship_type: 0,
            dimension_to_bow: 0,
            dimension_to_stern: 0,
            dimension_to_port: 0,
            dimension_to_starboard: 0,
            epfd_type: EpfdType::Undefined,
            raim: false,
            dte: false,
            assigned: false,
            spare: 0,
        }
    }

    /// Decodes a report from an assembled bit buffer.
    pub fn from_bits(bits: &BitBuffer) -> Result<ExtendedClassBPositionReport, DecodeError> {
        if bits.len() < EXTENDED_BIT_LENGTH {
            return Err(DecodeError::MalformedBits);
        }
        if bits.get_uint(0, 6)? != 19 {
            return Err(DecodeError::WrongType);
        }
        Ok(ExtendedClassBPositionReport {
            common: ClassBCommon::from_bits(bits)?,
            regional_b: bits.get_uint(139, 4)? as u8,
            vessel_name: trim_string_padding(bits.get_string(143, NAME_BITS)?),
            ship_type: bits.get_uint(263, 8)? as u8,
            dimension_to_bow: bits.get_uint(271, 9)? as u16,
            dimension_to_stern: bits.get_uint(280, 9)? as u16,
            dimension_to_port: bits.get_uint(289, 6)? as u8,
            dimension_to_starboard: bits.get_uint(295, 6)? as u8,
            epfd_type: EpfdType::from_raw(bits.get_uint(301, 4)? as u8),
            raim: bits.get_bit(305)?,
            dte: bits.get_bit(306)?,
            assigned: bits.get_bit(307)?,
            spare: bits.get_uint(308, 4)? as u8,
        })
    }

    /// Appends the 312-bit layout to `bits`.
    pub fn to_bits(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(19, 6)?;
        self.common.to_bits(bits)?;
        bits.append_uint(u64::from(self.regional_b), 4)?;
        bits.append_string(&self.vessel_name, NAME_BITS)?;
        bits.append_uint(u64::from(self.ship_type), 8)?;
        bits.append_uint(u64::from(self.dimension_to_bow), 9)?;
        bits.append_uint(u64::from(self.dimension_to_stern), 9)?;
        bits.append_uint(u64::from(self.dimension_to_port), 6)?;
        bits.append_uint(u64::from(self.dimension_to_starboard), 6)?;
        bits.append_uint(u64::from(self.epfd_type.to_raw()), 4)?;
        bits.append_bit(self.raim);
        bits.append_bit(self.dte);
        bits.append_bit(self.assigned);
        bits.append_uint(u64::from(self.spare), 4)?;
        Ok(())
    }

    /// The shared position fields.
    pub fn common(&self) -> &ClassBCommon {
        &self.common
    }

    /// Mutable access to the shared position fields.
    pub fn common_mut(&mut self) -> &mut ClassBCommon {
        &mut self.common
    }

    /// Repeat indicator.
    pub fn repeat_indicator(&self) -> u8 {
        self.common.repeat_indicator()
    }

    /// Station identity.
    pub fn mmsi(&self) -> Mmsi {
        self.common.mmsi()
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

    /// Sets the four reference-point distances.
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

    /// RAIM flag.
    pub fn raim(&self) -> bool {
        self.raim
    }

    pub fn set_raim(&mut self, raim: bool) {
        self.raim = raim;
    }

    /// Data terminal equipment flag (`false` = available).
    pub fn dte(&self) -> bool {
        self.dte
    }

    pub fn set_dte(&mut self, dte: bool) {
        self.dte = dte;
    }

    /// Assigned-mode flag.
    pub fn assigned(&self) -> bool {
        self.assigned
    }

    pub fn set_assigned(&mut self, assigned: bool) {
        self.assigned = assigned;
    }
}
