//! Typed AIS messages and type-code dispatch.
//!
//! [`AisMessage`] is the sum of every supported message variant. The
//! 6-bit type code at offset 0 of an assembled bit buffer selects the
//! variant decoder through a single `match`; the dispatch table is
//! fixed at compile time and there is no global registry.

use crate::base_station::BaseStationReport;
use crate::binary::{BinaryAddressedMessage, BinaryBroadcastMessage};
use crate::bits::{BitBuffer, BitsError};
use crate::class_b::{ClassBPositionReport, ExtendedClassBPositionReport};
use crate::mmsi::Mmsi;
use crate::position_report::PositionReport;
use crate::sentence::{make_sentence, Channel, SentenceError, Talker};
use crate::static_voyage::StaticAndVoyageData;

/// Raw longitude value meaning "not available" (181° in 1/10000 min).
pub(crate) const LONGITUDE_NOT_AVAILABLE: i32 = 0x6791AC0;
/// Raw latitude value meaning "not available" (91° in 1/10000 min).
pub(crate) const LATITUDE_NOT_AVAILABLE: i32 = 0x3412140;

/// Converts a longitude in degrees to the raw 1/10000-minute encoding,
/// storing the not-available sentinel for values outside ±180°.
pub(crate) fn longitude_to_raw(degrees: f64) -> i32 {
    if !(-180.0..=180.0).contains(&degrees) {
        LONGITUDE_NOT_AVAILABLE
    } else {
        (degrees * 600000.0).round() as i32
    }
}

/// Converts a latitude in degrees to the raw 1/10000-minute encoding,
/// storing the not-available sentinel for values outside ±90°.
pub(crate) fn latitude_to_raw(degrees: f64) -> i32 {
    if !(-90.0..=90.0).contains(&degrees) {
        LATITUDE_NOT_AVAILABLE
    } else {
        (degrees * 600000.0).round() as i32
    }
}

/// Drops the trailing space padding of a decoded 6-bit-ASCII field.
///
/// Pad characters are spaces, so a re-encode of the trimmed string
/// reproduces the original bits.
pub(crate) fn trim_string_padding(mut value: String) -> String {
    let trimmed = value.trim_end_matches(' ').len();
    value.truncate(trimmed);
    value
}

pub(crate) fn raw_to_longitude(raw: i32) -> Option<f64> {
    if raw == LONGITUDE_NOT_AVAILABLE {
        None
    } else {
        Some(f64::from(raw) / 600000.0)
    }
}

pub(crate) fn raw_to_latitude(raw: i32) -> Option<f64> {
    if raw == LATITUDE_NOT_AVAILABLE {
        None
    } else {
        Some(f64::from(raw) / 600000.0)
    }
}

/// Electronic position fixing device type.
///
/// Values of the 4-bit EPFD field, per Table 48 of ITU-R M.1371-5.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EpfdType {
    /// Undefined (0, the default).
    Undefined,
    /// GPS (1).
    Gps,
    /// GLONASS (2).
    Glonass,
    /// Combined GPS/GLONASS (3).
    CombinedGpsGlonass,
    /// Loran-C (4).
    LoranC,
    /// Chayka (5).
    Chayka,
    /// Integrated navigation system (6).
    IntegratedNavigationSystem,
    /// Surveyed (7).
    Surveyed,
    /// Galileo (8).
    Galileo,
    /// Reserved value (9 to 14).
    Reserved(u8),
    /// Internal GNSS (15); also used as "not available".
    InternalGnss,
}

impl EpfdType {
    /// Converts the raw 4-bit field value.
    pub fn from_raw(value: u8) -> EpfdType {
        match value & 0xF {
            0 => EpfdType::Undefined,
            1 => EpfdType::Gps,
            2 => EpfdType::Glonass,
            3 => EpfdType::CombinedGpsGlonass,
            4 => EpfdType::LoranC,
            5 => EpfdType::Chayka,
            6 => EpfdType::IntegratedNavigationSystem,
            7 => EpfdType::Surveyed,
            8 => EpfdType::Galileo,
            15 => EpfdType::InternalGnss,
            v => EpfdType::Reserved(v),
        }
    }

    /// The raw 4-bit field value.
    pub fn to_raw(self) -> u8 {
        match self {
            EpfdType::Undefined => 0,
            EpfdType::Gps => 1,
            EpfdType::Glonass => 2,
            EpfdType::CombinedGpsGlonass => 3,
            EpfdType::LoranC => 4,
            EpfdType::Chayka => 5,
            EpfdType::IntegratedNavigationSystem => 6,
            EpfdType::Surveyed => 7,
            EpfdType::Galileo => 8,
            EpfdType::Reserved(v) => v & 0xF,
            EpfdType::InternalGnss => 15,
        }
    }
}

/// Errors detected while decoding a bit buffer into a typed message.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DecodeError {
    /// The buffer is shorter than the variant's fixed layout (or
    /// shorter than the 6-bit type code).
    MalformedBits,
    /// The type code does not belong to the requested variant.
    WrongType,
    /// No variant decoder exists for this type code.
    UnsupportedType(u8),
}

impl From<BitsError> for DecodeError {
    fn from(_: BitsError) -> DecodeError {
        // Every bits-level failure during decoding means the buffer
        // ended before the variant's fixed layout did.
        DecodeError::MalformedBits
    }
}

/// Errors detected while encoding a typed message to NMEA sentences.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EncodeError {
    /// Bit-level encoding failed (a stored string exceeds its field).
    Bits(BitsError),
    /// Envelope construction failed.
    Sentence(SentenceError),
    /// The payload needs more than one sentence but no group id was
    /// given; without one the receiving side cannot key reassembly.
    EmptyGroupId,
}

impl From<BitsError> for EncodeError {
    fn from(e: BitsError) -> EncodeError {
        EncodeError::Bits(e)
    }
}

impl From<SentenceError> for EncodeError {
    fn from(e: SentenceError) -> EncodeError {
        EncodeError::Sentence(e)
    }
}

/// Longest payload emitted per sentence, in armor characters.
const MAX_PAYLOAD_CHARS: usize = 56;

/// A decoded AIS message.
///
/// One variant per supported type code. Unsupported codes surface as
/// [`DecodeError::UnsupportedType`] and leave the raw bits with the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub enum AisMessage {
    /// Types 1, 2, 3: Class A position report.
    PositionReport(PositionReport),
    /// Type 4: base station report.
    BaseStationReport(BaseStationReport),
    /// Type 5: static and voyage related data.
    StaticAndVoyageData(StaticAndVoyageData),
    /// Type 6: binary addressed message.
    BinaryAddressedMessage(BinaryAddressedMessage),
    /// Type 8: binary broadcast message.
    BinaryBroadcastMessage(BinaryBroadcastMessage),
    /// Type 18: standard Class B position report.
    ClassBPositionReport(ClassBPositionReport),
    /// Type 19: extended Class B position report.
    ExtendedClassBPositionReport(ExtendedClassBPositionReport),
}

impl AisMessage {
    /// Decodes an assembled bit buffer into the variant selected by its
    /// 6-bit type code.
    pub fn from_bits(bits: &BitBuffer) -> Result<AisMessage, DecodeError> {
        if bits.len() < 6 {
            return Err(DecodeError::MalformedBits);
        }
        let message_type = bits.get_uint(0, 6)? as u8;
        log::trace!(
            "dispatching {} bits with message type {}",
            bits.len(),
            message_type
        );
        match message_type {
            1..=3 => Ok(AisMessage::PositionReport(PositionReport::from_bits(bits)?)),
            4 => Ok(AisMessage::BaseStationReport(BaseStationReport::from_bits(
                bits,
            )?)),
            5 => Ok(AisMessage::StaticAndVoyageData(
                StaticAndVoyageData::from_bits(bits)?,
            )),
            6 => Ok(AisMessage::BinaryAddressedMessage(
                BinaryAddressedMessage::from_bits(bits)?,
            )),
            8 => Ok(AisMessage::BinaryBroadcastMessage(
                BinaryBroadcastMessage::from_bits(bits)?,
            )),
            18 => Ok(AisMessage::ClassBPositionReport(
                ClassBPositionReport::from_bits(bits)?,
            )),
            19 => Ok(AisMessage::ExtendedClassBPositionReport(
                ExtendedClassBPositionReport::from_bits(bits)?,
            )),
            other => Err(DecodeError::UnsupportedType(other)),
        }
    }

    /// Serializes the message to its exact bit layout.
    pub fn to_bits(&self) -> Result<BitBuffer, BitsError> {
        let mut bits = BitBuffer::new();
        match self {
            AisMessage::PositionReport(m) => m.to_bits(&mut bits)?,
            AisMessage::BaseStationReport(m) => m.to_bits(&mut bits)?,
            AisMessage::StaticAndVoyageData(m) => m.to_bits(&mut bits)?,
            AisMessage::BinaryAddressedMessage(m) => m.to_bits(&mut bits)?,
            AisMessage::BinaryBroadcastMessage(m) => m.to_bits(&mut bits)?,
            AisMessage::ClassBPositionReport(m) => m.to_bits(&mut bits)?,
            AisMessage::ExtendedClassBPositionReport(m) => m.to_bits(&mut bits)?,
        }
        Ok(bits)
    }

    /// The message type code.
    pub fn message_type(&self) -> u8 {
        match self {
            AisMessage::PositionReport(m) => m.message_type(),
            AisMessage::BaseStationReport(_) => 4,
            AisMessage::StaticAndVoyageData(_) => 5,
            AisMessage::BinaryAddressedMessage(_) => 6,
            AisMessage::BinaryBroadcastMessage(_) => 8,
            AisMessage::ClassBPositionReport(_) => 18,
            AisMessage::ExtendedClassBPositionReport(_) => 19,
        }
    }

    /// The transmitting station's identity.
    pub fn mmsi(&self) -> Mmsi {
        match self {
            AisMessage::PositionReport(m) => m.mmsi(),
            AisMessage::BaseStationReport(m) => m.mmsi(),
            AisMessage::StaticAndVoyageData(m) => m.mmsi(),
            AisMessage::BinaryAddressedMessage(m) => m.mmsi(),
            AisMessage::BinaryBroadcastMessage(m) => m.mmsi(),
            AisMessage::ClassBPositionReport(m) => m.mmsi(),
            AisMessage::ExtendedClassBPositionReport(m) => m.mmsi(),
        }
    }

    /// The repeat indicator.
    pub fn repeat_indicator(&self) -> u8 {
        match self {
            AisMessage::PositionReport(m) => m.repeat_indicator(),
            AisMessage::BaseStationReport(m) => m.repeat_indicator(),
            AisMessage::StaticAndVoyageData(m) => m.repeat_indicator(),
            AisMessage::BinaryAddressedMessage(m) => m.repeat_indicator(),
            AisMessage::BinaryBroadcastMessage(m) => m.repeat_indicator(),
            AisMessage::ClassBPositionReport(m) => m.repeat_indicator(),
            AisMessage::ExtendedClassBPositionReport(m) => m.repeat_indicator(),
        }
    }

    /// Emits the message as one or more complete NMEA sentences.
    ///
    /// Payloads longer than 56 armor characters are split across
    /// sentences sharing `group_id`; fill bits are declared on the last
    /// fragment only. A multi-fragment emission requires a non-empty
    /// `group_id` for the receiving side to reassemble it and fails
    /// with [`EncodeError::EmptyGroupId`] otherwise.
    pub fn to_sentences(
        &self,
        talker: Talker,
        group_id: &str,
        channel: Channel,
    ) -> Result<Vec<String>, EncodeError> {
        let bits = self.to_bits()?;
        let payload = bits.to_nmea_payload();
        let fill_bits = bits.fill_bits();
        let fragment_count = payload.len().div_ceil(MAX_PAYLOAD_CHARS).max(1);
        if fragment_count > 1 && group_id.is_empty() {
            return Err(EncodeError::EmptyGroupId);
        }

        let mut sentences = Vec::with_capacity(fragment_count);
        let mut remaining = payload.as_str();
        for fragment_number in 1..=fragment_count {
            let take = remaining.len().min(MAX_PAYLOAD_CHARS);
            let (chunk, rest) = remaining.split_at(take);
            remaining = rest;
            let last = fragment_number == fragment_count;
            sentences.push(make_sentence(
                talker,
                chunk,
                fragment_count as u8,
                fragment_number as u8,
                group_id,
                channel,
                if last { fill_bits } else { 0 },
            )?);
        }
        Ok(sentences)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sentence::validate_checksum;

    #[test]
    fn dispatch_by_type_code() {
        let bits = BitBuffer::from_nmea_payload("13HOI:0P0000VOHLCnHQKwvL05Ip").unwrap();
        let message = AisMessage::from_bits(&bits).unwrap();
        assert!(matches!(message, AisMessage::PositionReport(_)));
        assert_eq!(message.message_type(), 1);
        assert_eq!(message.mmsi().value(), 227006760);
    }

    #[test]
    fn unsupported_type() {
        let mut bits = BitBuffer::new();
        bits.append_uint(21, 6).unwrap();
        for _ in 0..162 {
            bits.append_bit(false);
        }
        assert_eq!(
            AisMessage::from_bits(&bits),
            Err(DecodeError::UnsupportedType(21))
        );
    }

    #[test]
    fn short_buffer() {
        let mut bits = BitBuffer::new();
        bits.append_uint(1, 4).unwrap();
        assert_eq!(AisMessage::from_bits(&bits), Err(DecodeError::MalformedBits));
    }

    #[test]
    fn single_sentence_emission() {
        let bits = BitBuffer::from_nmea_payload("13HOI:0P0000VOHLCnHQKwvL05Ip").unwrap();
        let message = AisMessage::from_bits(&bits).unwrap();
        let sentences = message
            .to_sentences(Talker::Aivdm, "", Channel::A)
            .unwrap();
        assert_eq!(sentences.len(), 1);
        assert_eq!(
            sentences[0],
            "!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23"
        );
        assert!(validate_checksum(&sentences[0]));
    }

    #[test]
    fn multipart_emission_requires_group_id() {
        // A type 5 message (424 bits) always needs two sentences.
        let voyage = crate::static_voyage::StaticAndVoyageData::new(
            crate::mmsi::Mmsi::try_from(123456789).unwrap(),
            0,
        );
        let message = AisMessage::StaticAndVoyageData(voyage);
        assert_eq!(
            message.to_sentences(Talker::Aivdm, "", Channel::A),
            Err(EncodeError::EmptyGroupId)
        );
        let sentences = message.to_sentences(Talker::Aivdm, "1", Channel::A).unwrap();
        assert_eq!(sentences.len(), 2);
        for sentence in &sentences {
            assert!(validate_checksum(sentence));
        }
    }

    #[test]
    fn epfd_raw_roundtrip() {
        for raw in 0..16u8 {
            assert_eq!(EpfdType::from_raw(raw).to_raw(), raw);
        }
    }
}
