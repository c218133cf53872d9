//! Area notice (DAC 1, FI 22).
//!
//! An area notice marks a geographic region with a notice type (caution
//! area, security zone, danger area, ...) for a bounded time. The
//! region is described by a list of subareas (circles, rectangles,
//! sectors, point chains and free-text labels), each prefixed by a
//! 3-bit shape code.

use crate::binary::{BinaryAddressedMessage, BinaryBroadcastMessage};
use crate::bits::{sixbit_decode, sixbit_encode, BitBuffer, BitsError};
use crate::message::{latitude_to_raw, longitude_to_raw, DecodeError};
use crate::mmsi::Mmsi;
use chrono::{DateTime, Datelike, TimeZone, Utc};

use super::{DAC_INTERNATIONAL, FI_AREA_NOTICE};

/// Bits in the fixed header before the subarea list.
const HEADER_BITS: usize = 51;
/// Longest text subarea, in characters.
const TEXT_MAX_CHARS: usize = 14;

const START_HOUR_NOT_AVAILABLE: u8 = 24;
const START_MINUTE_NOT_AVAILABLE: u8 = 60;

/// Notice type of an area notice, per the IMO circular table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum NoticeType {
    /// Caution area (0).
    Caution,
    /// Caution area: marine mammals (1).
    CautionMarineMammals,
    /// Caution area: sea birds (2).
    CautionSeaBirds,
    /// Caution area: fish (3).
    CautionFish,
    /// Caution area: diving operations (4).
    CautionDiving,
    /// Caution area: high speed area (5).
    CautionHighSpeedArea,
    /// Warning: storm (6).
    WarningStorm,
    /// Caution: fishing gear (7).
    CautionFishingGear,
    /// Caution: tow (8).
    CautionTow,
    /// Warning: ice (9).
    WarningIce,
    /// Caution: tide (10).
    CautionTide,
    /// Caution: current (11).
    CautionCurrent,
    /// Caution: obstruction (12).
    CautionObstruction,
    /// Caution: construction (13).
    CautionConstruction,
    /// Caution: rock (14).
    CautionRock,
    /// Caution: waterway blocked (15).
    CautionWaterwayBlocked,
    /// Caution: icing (16).
    CautionIcing,
    /// Caution: water level (17).
    CautionWaterLevel,
    /// Exercise warning (18).
    ExerciseWarning,
    /// Caution: special protection area (19).
    SpecialProtection,
    /// Caution: security zone (20).
    SecurityZone,
    /// Caution: no anchoring (21).
    NoAnchoring,
    /// Caution: deep draught vessel (22).
    DeepDraught,
    /// Information: habitation (23).
    Habitation,
    /// Information: fishing (24).
    Fishing,
    /// Caution: environmental (25).
    Environmental,
    /// Caution: discoloured water (26).
    DiscolouredWater,
    /// Caution: dangerous cargo (27).
    DangerousCargo,
    /// Caution: maritime pilot (28).
    MaritimePilot,
    /// Caution: ferry crossing (29).
    FerryCrossing,
    /// Warning: bridge clearance (30).
    BridgeClearance,
    /// Warning: submerged cable (31).
    SubmergedCable,
    /// Warning: strong current (32).
    StrongCurrent,
    /// Warning: submerged object (33).
    SubmergedObject,
    /// Caution: restricted area (34).
    RestrictedArea,
    /// Warning: danger area (35).
    DangerArea,
    /// Warning: military exercises (36).
    MilitaryExercises,
    /// Warning: underwater operations (37).
    UnderwaterOperations,
    /// Warning: seaplane operations (38).
    SeaplaneOperations,
    /// Warning: recreational craft (39).
    RecreationalCraft,
    /// Warning: high speed craft (40).
    HighSpeedCraft,
    /// Warning: vessel traffic (41).
    VesselTraffic,
    /// Warning: salvage operations (42).
    SalvageOperations,
    /// Warning: dredging operations (43).
    DredgingOperations,
    /// Warning: survey operations (44).
    SurveyOperations,
    /// A value outside the assigned table, preserved verbatim.
    Reserved(u8),
}

impl NoticeType {
    /// Converts the raw 7-bit field value.
    pub fn from_raw(value: u8) -> NoticeType {
        match value & 0x7F {
            0 => NoticeType::Caution,
            1 => NoticeType::CautionMarineMammals,
            2 => NoticeType::CautionSeaBirds,
            3 => NoticeType::CautionFish,
            4 => NoticeType::CautionDiving,
            5 => NoticeType::CautionHighSpeedArea,
            6 => NoticeType::WarningStorm,
            7 => NoticeType::CautionFishingGear,
            8 => NoticeType::CautionTow,
            9 => NoticeType::WarningIce,
            10 => NoticeType::CautionTide,
            11 => NoticeType::CautionCurrent,
            12 => NoticeType::CautionObstruction,
            13 => NoticeType::CautionConstruction,
            14 => NoticeType::CautionRock,
            15 => NoticeType::CautionWaterwayBlocked,
            16 => NoticeType::CautionIcing,
            17 => NoticeType::CautionWaterLevel,
            18 => NoticeType::ExerciseWarning,
            19 => NoticeType::SpecialProtection,
            20 => NoticeType::SecurityZone,
            21 => NoticeType::NoAnchoring,
            22 => NoticeType::DeepDraught,
            23 => NoticeType::Habitation,
            24 => NoticeType::Fishing,
            25 => NoticeType::Environmental,
            26 => NoticeType::DiscolouredWater,
            27 => NoticeType::DangerousCargo,
            28 => NoticeType::MaritimePilot,
            29 => NoticeType::FerryCrossing,
            30 => NoticeType::BridgeClearance,
            31 => NoticeType::SubmergedCable,
            32 => NoticeType::StrongCurrent,
            33 => NoticeType::SubmergedObject,
            34 => NoticeType::RestrictedArea,
            35 => NoticeType::DangerArea,
            36 => NoticeType::MilitaryExercises,
            37 => NoticeType::UnderwaterOperations,
            38 => NoticeType::SeaplaneOperations,
            39 => NoticeType::RecreationalCraft,
            40 => NoticeType::HighSpeedCraft,
            41 => NoticeType::VesselTraffic,
            42 => NoticeType::SalvageOperations,
            43 => NoticeType::DredgingOperations,
            44 => NoticeType::SurveyOperations,
            v => NoticeType::Reserved(v),
        }
    }

    /// The raw 7-bit field value.
    pub fn to_raw(self) -> u8 {
        match self {
            NoticeType::Caution => 0,
            NoticeType::CautionMarineMammals => 1,
            NoticeType::CautionSeaBirds => 2,
            NoticeType::CautionFish => 3,
            NoticeType::CautionDiving => 4,
            NoticeType::CautionHighSpeedArea => 5,
            NoticeType::WarningStorm => 6,
            NoticeType::CautionFishingGear => 7,
            NoticeType::CautionTow => 8,
            NoticeType::WarningIce => 9,
            NoticeType::CautionTide => 10,
            NoticeType::CautionCurrent => 11,
            NoticeType::CautionObstruction => 12,
            NoticeType::CautionConstruction => 13,
            NoticeType::CautionRock => 14,
            NoticeType::CautionWaterwayBlocked => 15,
            NoticeType::CautionIcing => 16,
            NoticeType::CautionWaterLevel => 17,
            NoticeType::ExerciseWarning => 18,
            NoticeType::SpecialProtection => 19,
            NoticeType::SecurityZone => 20,
            NoticeType::NoAnchoring => 21,
            NoticeType::DeepDraught => 22,
            NoticeType::Habitation => 23,
            NoticeType::Fishing => 24,
            NoticeType::Environmental => 25,
            NoticeType::DiscolouredWater => 26,
            NoticeType::DangerousCargo => 27,
            NoticeType::MaritimePilot => 28,
            NoticeType::FerryCrossing => 29,
            NoticeType::BridgeClearance => 30,
            NoticeType::SubmergedCable => 31,
            NoticeType::StrongCurrent => 32,
            NoticeType::SubmergedObject => 33,
            NoticeType::RestrictedArea => 34,
            NoticeType::DangerArea => 35,
            NoticeType::MilitaryExercises => 36,
            NoticeType::UnderwaterOperations => 37,
            NoticeType::SeaplaneOperations => 38,
            NoticeType::RecreationalCraft => 39,
            NoticeType::HighSpeedCraft => 40,
            NoticeType::VesselTraffic => 41,
            NoticeType::SalvageOperations => 42,
            NoticeType::DredgingOperations => 43,
            NoticeType::SurveyOperations => 44,
            NoticeType::Reserved(v) => v & 0x7F,
        }
    }
}

/// One subarea of an area notice.
///
/// The 3-bit shape code is the discriminant; every shape starts with a
/// position in 1/10000 minute. Polyline and polygon subareas keep a
/// flat record of exactly two additional angle pairs; the chained
/// multi-record encoding of the IMO circular is not supported.
#[derive(Debug, Clone, PartialEq)]
pub enum SubArea {
    /// Circle (shape 0): center plus radius in meters. A zero radius
    /// marks a point.
    Circle {
        /// Center longitude in 1/10000 minute.
        longitude: i32,
        /// Center latitude in 1/10000 minute.
        latitude: i32,
        /// Radius in meters, `0..=4095`.
        radius: u16,
    },
    /// Rectangle (shape 1): corner plus dimensions and orientation.
    Rectangle {
        /// Corner longitude in 1/10000 minute.
        longitude: i32,
        /// Corner latitude in 1/10000 minute.
        latitude: i32,
        /// East dimension in meters, `0..=255`.
        e_dimension: u16,
        /// North dimension in meters, `0..=255`.
        n_dimension: u16,
        /// Orientation in degrees, `0..=359`.
        orientation: u16,
    },
    /// Sector (shape 2): center, radius and bearing bounds.
    Sector {
        /// Center longitude in 1/10000 minute.
        longitude: i32,
        /// Center latitude in 1/10000 minute.
        latitude: i32,
        /// Radius in meters, `0..=4095`.
        radius: u16,
        /// Left bearing bound in degrees true.
        left_bound: u16,
        /// Right bearing bound in degrees true.
        right_bound: u16,
    },
    /// Polyline (shape 3): starting point plus two angle pairs.
    Polyline {
        /// Start longitude in 1/10000 minute.
        longitude: i32,
        /// Start latitude in 1/10000 minute.
        latitude: i32,
        /// Scale factor exponent, `0..=3`.
        scale_factor: u8,
        /// Two (longitude, latitude) angle pairs in 1/10000 minute.
        angles: [(i32, i32); 2],
    },
    /// Polygon (shape 4): starting point plus two angle pairs.
    Polygon {
        /// Start longitude in 1/10000 minute.
        longitude: i32,
        /// Start latitude in 1/10000 minute.
        latitude: i32,
        /// Scale factor exponent, `0..=3`.
        scale_factor: u8,
        /// Two (longitude, latitude) angle pairs in 1/10000 minute.
        angles: [(i32, i32); 2],
    },
    /// Text label (shape 5): position plus up to 14 characters.
    Text {
        /// Anchor longitude in 1/10000 minute.
        longitude: i32,
        /// Anchor latitude in 1/10000 minute.
        latitude: i32,
        /// Label text, at most 14 characters of the 6-bit alphabet.
        text: String,
    },
    /// Reserved shape code (6 or 7): position only.
    Reserved {
        /// Raw shape code.
        shape: u8,
        /// Longitude in 1/10000 minute.
        longitude: i32,
        /// Latitude in 1/10000 minute.
        latitude: i32,
    },
}

impl SubArea {
    /// Builds a circle subarea from a position in degrees.
    pub fn circle(longitude_deg: f64, latitude_deg: f64, radius_m: u16) -> SubArea {
        SubArea::Circle {
            longitude: longitude_to_raw(longitude_deg),
            latitude: latitude_to_raw(latitude_deg),
            radius: radius_m,
        }
    }

    /// Builds a rectangle subarea from a corner position in degrees.
    pub fn rectangle(
        longitude_deg: f64,
        latitude_deg: f64,
        e_dimension_m: u16,
        n_dimension_m: u16,
        orientation_deg: u16,
    ) -> SubArea {
        SubArea::Rectangle {
            longitude: longitude_to_raw(longitude_deg),
            latitude: latitude_to_raw(latitude_deg),
            e_dimension: e_dimension_m,
            n_dimension: n_dimension_m,
            orientation: orientation_deg,
        }
    }

    /// Builds a sector subarea from a center position in degrees.
    pub fn sector(
        longitude_deg: f64,
        latitude_deg: f64,
        radius_m: u16,
        left_bound_deg: u16,
        right_bound_deg: u16,
    ) -> SubArea {
        SubArea::Sector {
            longitude: longitude_to_raw(longitude_deg),
            latitude: latitude_to_raw(latitude_deg),
            radius: radius_m,
            left_bound: left_bound_deg,
            right_bound: right_bound_deg,
        }
    }

    /// Builds a text subarea from an anchor position in degrees. The
    /// text is truncated to 14 characters.
    pub fn text(longitude_deg: f64, latitude_deg: f64, text: &str) -> SubArea {
        SubArea::Text {
            longitude: longitude_to_raw(longitude_deg),
            latitude: latitude_to_raw(latitude_deg),
            text: text.chars().take(TEXT_MAX_CHARS).collect(),
        }
    }

    /// The subarea's anchor longitude in degrees.
    pub fn longitude(&self) -> f64 {
        f64::from(self.longitude_raw()) / 600000.0
    }

    /// The subarea's anchor latitude in degrees.
    pub fn latitude(&self) -> f64 {
        f64::from(self.latitude_raw()) / 600000.0
    }

    fn longitude_raw(&self) -> i32 {
        match self {
            SubArea::Circle { longitude, .. }
            | SubArea::Rectangle { longitude, .. }
            | SubArea::Sector { longitude, .. }
            | SubArea::Polyline { longitude, .. }
            | SubArea::Polygon { longitude, .. }
            | SubArea::Text { longitude, .. }
            | SubArea::Reserved { longitude, .. } => *longitude,
        }
    }

    fn latitude_raw(&self) -> i32 {
        match self {
            SubArea::Circle { latitude, .. }
            | SubArea::Rectangle { latitude, .. }
            | SubArea::Sector { latitude, .. }
            | SubArea::Polyline { latitude, .. }
            | SubArea::Polygon { latitude, .. }
            | SubArea::Text { latitude, .. }
            | SubArea::Reserved { latitude, .. } => *latitude,
        }
    }

    fn shape_code(&self) -> u8 {
        match self {
            SubArea::Circle { .. } => 0,
            SubArea::Rectangle { .. } => 1,
            SubArea::Sector { .. } => 2,
            SubArea::Polyline { .. } => 3,
            SubArea::Polygon { .. } => 4,
            SubArea::Text { .. } => 5,
            SubArea::Reserved { shape, .. } => *shape,
        }
    }

    /// Decodes one subarea starting at `offset`. Returns the subarea
    /// and the offset just past it, or `None` when the remaining bits
    /// cannot hold the shape's parameters.
    fn decode(bits: &BitBuffer, offset: usize) -> Option<(SubArea, usize)> {
        if offset + 3 + 55 > bits.len() {
            return None;
        }
        let shape = bits.get_uint(offset, 3).ok()? as u8;
        let longitude = bits.get_int(offset + 3, 28).ok()? as i32;
        let latitude = bits.get_int(offset + 31, 27).ok()? as i32;
        let mut cursor = offset + 58;
        let subarea = match shape {
            0 => {
                if cursor + 14 > bits.len() {
                    return None;
                }
                let radius = bits.get_uint(cursor, 12).ok()? as u16;
                cursor += 14; // radius + 2 spare
                SubArea::Circle {
                    longitude,
                    latitude,
                    radius,
                }
            }
            1 => {
                if cursor + 27 > bits.len() {
                    return None;
                }
                let e_dimension = bits.get_uint(cursor, 8).ok()? as u16;
                let n_dimension = bits.get_uint(cursor + 8, 8).ok()? as u16;
                let orientation = bits.get_uint(cursor + 16, 9).ok()? as u16;
                cursor += 27; // dimensions + orientation + 2 spare
                SubArea::Rectangle {
                    longitude,
                    latitude,
                    e_dimension,
                    n_dimension,
                    orientation,
                }
            }
            2 => {
                if cursor + 32 > bits.len() {
                    return None;
                }
                let radius = bits.get_uint(cursor, 12).ok()? as u16;
                let left_bound = bits.get_uint(cursor + 12, 9).ok()? as u16;
                let right_bound = bits.get_uint(cursor + 21, 9).ok()? as u16;
                cursor += 32; // radius + bounds + 2 spare
                SubArea::Sector {
                    longitude,
                    latitude,
                    radius,
                    left_bound,
                    right_bound,
                }
            }
            3 | 4 => {
                if cursor + 2 + 2 * 55 > bits.len() {
                    return None;
                }
                let scale_factor = bits.get_uint(cursor, 2).ok()? as u8;
                cursor += 2;
                let mut angles = [(0i32, 0i32); 2];
                for pair in angles.iter_mut() {
                    let lon = bits.get_int(cursor, 28).ok()? as i32;
                    let lat = bits.get_int(cursor + 28, 27).ok()? as i32;
                    cursor += 55;
                    *pair = (lon, lat);
                }
                if shape == 3 {
                    SubArea::Polyline {
                        longitude,
                        latitude,
                        scale_factor,
                        angles,
                    }
                } else {
                    SubArea::Polygon {
                        longitude,
                        latitude,
                        scale_factor,
                        angles,
                    }
                }
            }
            5 => {
                let mut text = String::new();
                loop {
                    if text.len() >= TEXT_MAX_CHARS || cursor + 6 > bits.len() {
                        break;
                    }
                    let value = bits.get_uint(cursor, 6).ok()? as u8;
                    cursor += 6;
                    if value == 0 {
                        break;
                    }
                    text.push(sixbit_decode(value));
                }
                SubArea::Text {
                    longitude,
                    latitude,
                    text,
                }
            }
            shape => SubArea::Reserved {
                shape,
                longitude,
                latitude,
            },
        };
        Some((subarea, cursor))
    }

    /// Appends the subarea's encoding to `bits`.
    fn encode(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(u64::from(self.shape_code()), 3)?;
        bits.append_int(i64::from(self.longitude_raw()), 28)?;
        bits.append_int(i64::from(self.latitude_raw()), 27)?;
        match self {
            SubArea::Circle { radius, .. } => {
                bits.append_uint(u64::from(*radius), 12)?;
                bits.append_uint(0, 2)?;
            }
            SubArea::Rectangle {
                e_dimension,
                n_dimension,
                orientation,
                ..
            } => {
                bits.append_uint(u64::from(*e_dimension), 8)?;
                bits.append_uint(u64::from(*n_dimension), 8)?;
                bits.append_uint(u64::from(*orientation), 9)?;
                bits.append_uint(0, 2)?;
            }
            SubArea::Sector {
                radius,
                left_bound,
                right_bound,
                ..
            } => {
                bits.append_uint(u64::from(*radius), 12)?;
                bits.append_uint(u64::from(*left_bound), 9)?;
                bits.append_uint(u64::from(*right_bound), 9)?;
                bits.append_uint(0, 2)?;
            }
            SubArea::Polyline {
                scale_factor,
                angles,
                ..
            }
            | SubArea::Polygon {
                scale_factor,
                angles,
                ..
            } => {
                bits.append_uint(u64::from(*scale_factor), 2)?;
                for (lon, lat) in angles {
                    bits.append_int(i64::from(*lon), 28)?;
                    bits.append_int(i64::from(*lat), 27)?;
                }
            }
            SubArea::Text { text, .. } => {
                for c in text.chars().take(TEXT_MAX_CHARS) {
                    bits.append_uint(u64::from(sixbit_encode(c)), 6)?;
                }
                if text.chars().count() < TEXT_MAX_CHARS {
                    bits.append_uint(0, 6)?;
                }
            }
            SubArea::Reserved { .. } => {}
        }
        Ok(())
    }
}

/// Area notice payload (DAC 1, FI 22).
#[derive(Debug, Clone, PartialEq)]
pub struct AreaNotice {
    message_version: u8,
    notice_type: NoticeType,
    start_month: u8,
    start_day: u8,
    start_hour: u8,
    start_minute: u8,
    duration: u16,
    subareas: Vec<SubArea>,
}

impl AreaNotice {
    /// Creates a notice. `duration` is in minutes, 0 meaning unlimited.
    pub fn new(notice_type: NoticeType, duration: u16) -> AreaNotice {
        AreaNotice {
            message_version: 1,
            notice_type,
            start_month: 0,
            start_day: 0,
            start_hour: START_HOUR_NOT_AVAILABLE,
            start_minute: START_MINUTE_NOT_AVAILABLE,
            duration,
            subareas: Vec::new(),
        }
    }

    /// Decodes a notice from the application payload of a binary
    /// message.
    ///
    /// Subareas are read until the payload cannot hold another complete
    /// record; a trailing partial record ends the list.
    pub fn from_payload(bits: &BitBuffer) -> Result<AreaNotice, DecodeError> {
        if bits.len() < HEADER_BITS {
            return Err(DecodeError::MalformedBits);
        }
        let mut subareas = Vec::new();
        let mut cursor = HEADER_BITS;
        while let Some((subarea, next)) = SubArea::decode(bits, cursor) {
            subareas.push(subarea);
            cursor = next;
        }
        Ok(AreaNotice {
            message_version: bits.get_uint(0, 8)? as u8,
            notice_type: NoticeType::from_raw(bits.get_uint(8, 7)? as u8),
            start_month: bits.get_uint(15, 4)? as u8,
            start_day: bits.get_uint(19, 5)? as u8,
            start_hour: bits.get_uint(24, 5)? as u8,
            start_minute: bits.get_uint(29, 6)? as u8,
            duration: bits.get_uint(35, 16)? as u16,
            subareas,
        })
    }

    /// Serializes the notice to an application payload.
    pub fn to_payload(&self) -> Result<BitBuffer, BitsError> {
        let mut bits = BitBuffer::new();
        bits.append_uint(u64::from(self.message_version), 8)?;
        bits.append_uint(u64::from(self.notice_type.to_raw()), 7)?;
        bits.append_uint(u64::from(self.start_month), 4)?;
        bits.append_uint(u64::from(self.start_day), 5)?;
        bits.append_uint(u64::from(self.start_hour), 5)?;
        bits.append_uint(u64::from(self.start_minute), 6)?;
        bits.append_uint(u64::from(self.duration), 16)?;
        for subarea in &self.subareas {
            subarea.encode(&mut bits)?;
        }
        Ok(bits)
    }

    /// Wraps the notice in a type 6 message addressed to `dest_mmsi`.
    pub fn to_addressed_message(
        &self,
        source_mmsi: Mmsi,
        dest_mmsi: Mmsi,
        sequence_number: u8,
        repeat_indicator: u8,
    ) -> Result<BinaryAddressedMessage, BitsError> {
        let mut message =
            BinaryAddressedMessage::new(source_mmsi, dest_mmsi, sequence_number, repeat_indicator);
        message.set_application_id(DAC_INTERNATIONAL, FI_AREA_NOTICE);
        message.set_data(self.to_payload()?);
        Ok(message)
    }

    /// Wraps the notice in a type 8 broadcast.
    pub fn to_broadcast_message(
        &self,
        source_mmsi: Mmsi,
        repeat_indicator: u8,
    ) -> Result<BinaryBroadcastMessage, BitsError> {
        let mut message = BinaryBroadcastMessage::new(source_mmsi, repeat_indicator);
        message.set_application_id(DAC_INTERNATIONAL, FI_AREA_NOTICE);
        message.set_data(self.to_payload()?);
        Ok(message)
    }

    /// Message version field.
    pub fn message_version(&self) -> u8 {
        self.message_version
    }

    pub fn set_message_version(&mut self, version: u8) {
        self.message_version = version;
    }

    /// Notice type.
    pub fn notice_type(&self) -> NoticeType {
        self.notice_type
    }

    pub fn set_notice_type(&mut self, notice_type: NoticeType) {
        self.notice_type = notice_type;
    }

    /// Start month, `1..=12`. `None` when not available.
    pub fn start_month(&self) -> Option<u8> {
        (self.start_month != 0 && self.start_month <= 12).then_some(self.start_month)
    }

    /// Start day of month, `1..=31`. `None` when not available.
    pub fn start_day(&self) -> Option<u8> {
        (self.start_day != 0).then_some(self.start_day)
    }

    /// Start hour, `0..=23`. `None` when not available.
    pub fn start_hour(&self) -> Option<u8> {
        (self.start_hour < START_HOUR_NOT_AVAILABLE).then_some(self.start_hour)
    }

    /// Start minute, `0..=59`. `None` when not available.
    pub fn start_minute(&self) -> Option<u8> {
        (self.start_minute < START_MINUTE_NOT_AVAILABLE).then_some(self.start_minute)
    }

    /// Sets the start time. Each out-of-range component stores its own
    /// not-available sentinel.
    pub fn set_start_time(&mut self, month: u8, day: u8, hour: u8, minute: u8) {
        self.start_month = if month > 12 { 0 } else { month };
        self.start_day = if day > 31 { 0 } else { day };
        self.start_hour = if hour > 23 {
            START_HOUR_NOT_AVAILABLE
        } else {
            hour
        };
        self.start_minute = if minute > 59 {
            START_MINUTE_NOT_AVAILABLE
        } else {
            minute
        };
    }

    /// Resolves the start time against a reference instant.
    ///
    /// The wire format carries no year. The start is placed in the
    /// reference year, or the previous year when the encoded month is
    /// ahead of the reference month, since a notice starts at or before
    /// the moment it is heard.
    pub fn start_time(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let month = u32::from(self.start_month()?);
        let day = u32::from(self.start_day()?);
        let hour = u32::from(self.start_hour()?);
        let minute = u32::from(self.start_minute()?);
        let year = if month > reference.month() {
            reference.year() - 1
        } else {
            reference.year()
        };
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
    }

    /// Duration in minutes; 0 means unlimited.
    pub fn duration(&self) -> u16 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: u16) {
        self.duration = duration;
    }

    /// The subarea list.
    pub fn subareas(&self) -> &[SubArea] {
        &self.subareas
    }

    /// Appends a subarea.
    pub fn push_subarea(&mut self, subarea: SubArea) {
        self.subareas.push(subarea);
    }

    /// Replaces the subarea list.
    pub fn set_subareas(&mut self, subareas: Vec<SubArea>) {
        self.subareas = subareas;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn circle_notice_roundtrip() {
        let mut notice = AreaNotice::new(NoticeType::SecurityZone, 120);
        notice.set_start_time(7, 14, 9, 0);
        notice.push_subarea(SubArea::circle(-70.95, 42.36, 500));

        let payload = notice.to_payload().unwrap();
        assert_eq!(payload.len(), 51 + 3 + 55 + 14);

        let decoded = AreaNotice::from_payload(&payload).unwrap();
        assert_eq!(decoded, notice);
        assert_eq!(decoded.notice_type(), NoticeType::SecurityZone);
        assert_eq!(decoded.duration(), 120);
        assert_eq!(decoded.start_month(), Some(7));
        assert_eq!(decoded.subareas().len(), 1);
        match &decoded.subareas()[0] {
            SubArea::Circle { radius, .. } => assert_eq!(*radius, 500),
            other => panic!("expected circle, got {other:?}"),
        }
        assert!((decoded.subareas()[0].longitude() + 70.95).abs() < 1e-5);
        assert!((decoded.subareas()[0].latitude() - 42.36).abs() < 1e-5);
    }

    #[test]
    fn mixed_subareas_roundtrip() {
        let mut notice = AreaNotice::new(NoticeType::DangerArea, 0);
        notice.set_start_time(1, 2, 3, 4);
        notice.push_subarea(SubArea::rectangle(4.5, 52.0, 100, 200, 45));
        notice.push_subarea(SubArea::sector(4.6, 52.1, 800, 10, 120));
        notice.push_subarea(SubArea::Polygon {
            longitude: longitude_to_raw(4.7),
            latitude: latitude_to_raw(52.2),
            scale_factor: 0,
            angles: [(1000, -2000), (-1500, 2500)],
        });
        notice.push_subarea(SubArea::text(4.8, 52.3, "KEEP CLEAR"));

        let payload = notice.to_payload().unwrap();
        let decoded = AreaNotice::from_payload(&payload).unwrap();
        assert_eq!(decoded, notice);
        assert_eq!(decoded.subareas().len(), 4);
        match &decoded.subareas()[3] {
            SubArea::Text { text, .. } => assert_eq!(text, "KEEP CLEAR"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn text_truncates_to_fourteen_chars() {
        let subarea = SubArea::text(0.0, 0.0, "A VERY LONG LABEL INDEED");
        match &subarea {
            SubArea::Text { text, .. } => assert_eq!(text.len(), 14),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn full_width_text_roundtrip() {
        let mut notice = AreaNotice::new(NoticeType::Caution, 60);
        notice.push_subarea(SubArea::text(0.0, 0.0, "EXACTLY 14 CHR"));
        let payload = notice.to_payload().unwrap();
        let decoded = AreaNotice::from_payload(&payload).unwrap();
        match &decoded.subareas()[0] {
            SubArea::Text { text, .. } => assert_eq!(text, "EXACTLY 14 CHR"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn trailing_partial_subarea_is_ignored() {
        let mut notice = AreaNotice::new(NoticeType::Caution, 60);
        notice.push_subarea(SubArea::circle(0.0, 0.0, 100));
        let mut payload = notice.to_payload().unwrap();
        // A shape code with no room for its parameters.
        payload.append_uint(0, 3).unwrap();
        payload.append_uint(0, 20).unwrap();

        let decoded = AreaNotice::from_payload(&payload).unwrap();
        assert_eq!(decoded.subareas().len(), 1);
    }

    #[test]
    fn start_time_year_wrap_back() {
        let mut notice = AreaNotice::new(NoticeType::Caution, 60);
        notice.set_start_time(12, 30, 23, 0);
        let reference = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        let start = notice.start_time(reference).unwrap();
        assert_eq!(start.year(), 2024);
        assert_eq!(start.month(), 12);

        notice.set_start_time(1, 1, 0, 0);
        let start = notice.start_time(reference).unwrap();
        assert_eq!(start.year(), 2025);
    }

    #[test]
    fn broadcast_envelope() {
        let mut notice = AreaNotice::new(NoticeType::WarningStorm, 30);
        notice.push_subarea(SubArea::circle(11.0, 58.0, 2000));
        let message = notice
            .to_broadcast_message(Mmsi::try_from(2655651).unwrap(), 0)
            .unwrap();
        assert_eq!(message.dac(), DAC_INTERNATIONAL);
        assert_eq!(message.fi(), FI_AREA_NOTICE);
        let back = AreaNotice::from_payload(message.data()).unwrap();
        assert_eq!(back, notice);
    }

    #[test]
    fn notice_type_raw_roundtrip() {
        for raw in 0..128u8 {
            assert_eq!(NoticeType::from_raw(raw).to_raw(), raw);
        }
    }
}
