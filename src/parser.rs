//! Parser facade.
//!
//! [`AisParser`] is the single entry point for a raw NMEA feed: it
//! validates the checksum, splits the envelope, routes single-fragment
//! payloads straight to the message decoder and multipart fragments
//! through the reassembler, and surfaces failures through a
//! non-fatal `last_error` channel. The parser stays usable after any
//! failed call.

use crate::bits::BitBuffer;
use crate::message::{AisMessage, DecodeError};
use crate::reassembly::{Clock, CollectMultipart, MonotonicClock, ReassemblyError};
use crate::sentence::{split_fields, validate_checksum, Channel};
use core::fmt;
use std::time::Duration;

/// Parser configuration.
///
/// Both knobs belong to the reassembler: how long an incomplete
/// fragment group may idle before [`AisParser::cleanup_expired`]
/// removes it, and how many incomplete groups may exist at once.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ParserConfig {
    /// Idle timeout for incomplete fragment groups. Default 60 s.
    pub message_timeout: Duration,
    /// Maximum number of concurrent incomplete groups. Default 100.
    pub max_incomplete_messages: usize,
}

impl Default for ParserConfig {
    fn default() -> ParserConfig {
        ParserConfig {
            message_timeout: Duration::from_secs(60),
            max_incomplete_messages: 100,
        }
    }
}

/// Classification of a failed parse call.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Checksum missing, malformed, or mismatched.
    InvalidChecksum,
    /// Not an `!AIVDM`/`!AIVDO` envelope, or fewer than seven fields.
    InvalidFormat,
    /// Non-numeric fragment fields, fragment number outside the
    /// declared count, bad channel, or bad fill bits.
    BadFragmentInfo,
    /// The 6-bit type code has no variant decoder.
    UnsupportedType,
    /// Armor decoding failed, or a variant decoder rejected the bits.
    InvalidPayload,
    /// Reassembler internal error.
    Other,
}

/// The error recorded by the most recent failed parse call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
    message: String,
}

impl ParseError {
    /// The error classification.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// A human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Stateful AIS sentence parser.
///
/// One parser owns one reassembler. Instances are single-owner: no
/// internal locking, callers serialize access. Independent instances do
/// not share state.
///
/// # Examples
///
/// ```
/// use ais_vdm::{AisMessage, AisParser};
///
/// let mut parser = AisParser::new();
/// let message = parser
///     .parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23")
///     .expect("complete single-fragment message");
/// match message {
///     AisMessage::PositionReport(report) => {
///         assert_eq!(report.mmsi().value(), 227006760);
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug)]
pub struct AisParser<C = MonotonicClock> {
    reassembler: CollectMultipart<C>,
    last_error: Option<ParseError>,
}

impl AisParser<MonotonicClock> {
    /// Creates a parser with the default configuration.
    pub fn new() -> AisParser<MonotonicClock> {
        AisParser::with_config(ParserConfig::default())
    }

    /// Creates a parser with the given configuration.
    pub fn with_config(config: ParserConfig) -> AisParser<MonotonicClock> {
        AisParser::with_clock(config, MonotonicClock)
    }
}

impl Default for AisParser<MonotonicClock> {
    fn default() -> AisParser<MonotonicClock> {
        AisParser::new()
    }
}

impl<C: Clock> AisParser<C> {
    /// Creates a parser with an injected reassembly clock.
    pub fn with_clock(config: ParserConfig, clock: C) -> AisParser<C> {
        AisParser {
            reassembler: CollectMultipart::with_clock(
                config.message_timeout,
                config.max_incomplete_messages,
                clock,
            ),
            last_error: None,
        }
    }

    /// Parses one NMEA sentence.
    ///
    /// Returns a typed message when the sentence completes one:
    /// immediately for single-fragment messages, or on the final
    /// fragment of a multipart group. Returns `None` both on failure
    /// (recorded in [`last_error`](Self::last_error)) and when a
    /// multipart group is simply still incomplete (no error recorded);
    /// examine the error channel to distinguish the two.
    pub fn parse(&mut self, line: &str) -> Option<AisMessage> {
        self.last_error = None;
        let line = line.trim_end();

        if !validate_checksum(line) {
            self.set_error(ErrorKind::InvalidChecksum, "invalid NMEA checksum");
            return None;
        }

        let fields = split_fields(line);
        if fields.len() < 7 || (fields[0] != "!AIVDM" && fields[0] != "!AIVDO") {
            self.set_error(ErrorKind::InvalidFormat, "not an AIS VDM/VDO sentence");
            return None;
        }

        let (Ok(fragment_count), Ok(fragment_number)) =
            (fields[1].parse::<u8>(), fields[2].parse::<u8>())
        else {
            self.set_error(ErrorKind::BadFragmentInfo, "non-numeric fragment fields");
            return None;
        };
        if fragment_count < 1 || fragment_number < 1 || fragment_number > fragment_count {
            self.set_error(ErrorKind::BadFragmentInfo, "fragment number out of range");
            return None;
        }

        let group_id = fields[3];

        let mut channel_chars = fields[4].chars();
        let channel = match (channel_chars.next(), channel_chars.next()) {
            (Some(c), None) => match Channel::try_from(c) {
                Ok(channel) => channel,
                Err(_) => {
                    self.set_error(ErrorKind::BadFragmentInfo, "invalid channel");
                    return None;
                }
            },
            _ => {
                self.set_error(ErrorKind::BadFragmentInfo, "invalid channel");
                return None;
            }
        };

        let payload = fields[5];
        let Ok(fill_bits) = fields[6].parse::<u8>() else {
            self.set_error(ErrorKind::BadFragmentInfo, "non-numeric fill bits");
            return None;
        };
        if fill_bits > 5 {
            self.set_error(ErrorKind::BadFragmentInfo, "fill bits out of range");
            return None;
        }

        if fragment_count == 1 {
            let mut bits = match BitBuffer::from_nmea_payload(payload) {
                Ok(bits) => bits,
                Err(_) => {
                    self.set_error(ErrorKind::InvalidPayload, "payload armor decode failed");
                    return None;
                }
            };
            bits.truncate(bits.len().saturating_sub(usize::from(fill_bits)));
            self.dispatch(&bits)
        } else {
            match self.reassembler.add_fragment(
                fragment_number,
                fragment_count,
                group_id,
                channel,
                payload,
                fill_bits,
            ) {
                Ok(Some(bits)) => self.dispatch(&bits),
                // Still waiting for more fragments; not a failure.
                Ok(None) => None,
                Err(ReassemblyError::EmptyGroupId) => {
                    self.set_error(
                        ErrorKind::BadFragmentInfo,
                        "multipart fragment with empty group id",
                    );
                    None
                }
                Err(ReassemblyError::BadFragmentNumber | ReassemblyError::BadFillBits) => {
                    self.set_error(ErrorKind::BadFragmentInfo, "invalid fragment information");
                    None
                }
                Err(ReassemblyError::BadPayload) => {
                    self.set_error(
                        ErrorKind::Other,
                        "stored fragment payload failed armor decode",
                    );
                    None
                }
            }
        }
    }

    /// Submits a sentence expected to be part of a multipart group.
    ///
    /// Identical to [`parse`](Self::parse); the name exists to signal
    /// caller intent.
    pub fn add_fragment(&mut self, line: &str) -> Option<AisMessage> {
        self.parse(line)
    }

    /// The error recorded by the most recent call, or `None` if it
    /// succeeded or merely left a group incomplete.
    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    /// Removes incomplete groups that have idled past the configured
    /// timeout.
    pub fn cleanup_expired(&mut self) {
        self.reassembler.cleanup_expired();
    }

    /// Number of incomplete multipart groups currently buffered.
    pub fn incomplete_count(&self) -> usize {
        self.reassembler.incomplete_count()
    }

    /// Drops every incomplete multipart group.
    pub fn clear_incomplete_messages(&mut self) {
        self.reassembler.clear();
    }

    /// Replaces the idle timeout used by subsequent sweeps.
    pub fn set_message_timeout(&mut self, timeout: Duration) {
        self.reassembler.set_timeout(timeout);
    }

    /// Replaces the cap on concurrent incomplete groups, evicting the
    /// oldest groups if the store currently exceeds it.
    pub fn set_max_incomplete_messages(&mut self, max_messages: usize) {
        self.reassembler.set_max_groups(max_messages);
    }

    fn dispatch(&mut self, bits: &BitBuffer) -> Option<AisMessage> {
        match AisMessage::from_bits(bits) {
            Ok(message) => Some(message),
            Err(DecodeError::UnsupportedType(code)) => {
                self.set_error(
                    ErrorKind::UnsupportedType,
                    format!("unsupported message type {code}"),
                );
                None
            }
            Err(error) => {
                self.set_error(
                    ErrorKind::InvalidPayload,
                    format!("message decoding failed: {error:?}"),
                );
                None
            }
        }
    }

    fn set_error(&mut self, kind: ErrorKind, message: impl Into<String>) {
        let message = message.into();
        log::trace!("parse failed: {kind:?}: {message}");
        self.last_error = Some(ParseError { kind, message });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::message::AisMessage;
    use crate::mmsi::Mmsi;
    use crate::reassembly::ManualClock;
    use crate::sentence::Talker;
    use crate::static_voyage::StaticAndVoyageData;

    /// A two-fragment type 5 emission for the multipart tests.
    fn multipart_sentences(group_id: &str) -> (Vec<String>, StaticAndVoyageData) {
        let mut message = StaticAndVoyageData::new(Mmsi::try_from(123456789).unwrap(), 0);
        message.set_imo_number(9876543);
        message.set_call_sign("TEST123").unwrap();
        message.set_vessel_name("MULTI PART TEST VESS").unwrap();
        message.set_ship_type(70);
        message.set_ship_dimensions(100, 50, 10, 15);
        message.set_eta(5, 15, 14, 30);
        message.set_draught(5.0);
        message.set_destination("PORT OF TEST").unwrap();
        let sentences = AisMessage::StaticAndVoyageData(message.clone())
            .to_sentences(Talker::Aivdm, group_id, Channel::A)
            .unwrap();
        assert_eq!(sentences.len(), 2);
        (sentences, message)
    }

    fn parser() -> AisParser<ManualClock> {
        AisParser::with_clock(ParserConfig::default(), ManualClock::new())
    }

    #[test]
    fn parse_single_fragment() {
        let mut parser = AisParser::new();
        let message = parser
            .parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23")
            .unwrap();
        assert!(parser.last_error().is_none());
        assert_eq!(message.message_type(), 1);
        assert_eq!(message.mmsi().value(), 227006760);
    }

    #[test]
    fn parse_tolerates_trailing_newline() {
        let mut parser = AisParser::new();
        let message = parser.parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23\r\n");
        assert!(message.is_some());
    }

    #[test]
    fn checksum_failure_is_recorded() {
        let mut parser = AisParser::new();
        assert!(parser
            .parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*24")
            .is_none());
        assert_eq!(
            parser.last_error().unwrap().kind(),
            ErrorKind::InvalidChecksum
        );

        // The next successful call clears the error.
        parser
            .parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23")
            .unwrap();
        assert!(parser.last_error().is_none());
    }

    #[test]
    fn non_ais_sentence() {
        let mut parser = AisParser::new();
        let sentence = "$GPGGA,115739.00,4158.8441367,N,09147.4416929,W,4,13,0.9,255.747,M,-32.00,M,01,0000*6E";
        assert!(parser.parse(sentence).is_none());
        assert_eq!(parser.last_error().unwrap().kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn bad_fragment_fields() {
        let mut parser = AisParser::new();
        for sentence_body in [
            "!AIVDM,x,1,,A,13HOI:0P,0",
            "!AIVDM,2,3,,A,13HOI:0P,0",
            "!AIVDM,1,1,,C,13HOI:0P,0",
            "!AIVDM,1,1,,A,13HOI:0P,9",
        ] {
            let sentence = format!(
                "{sentence_body}*{:02X}",
                crate::sentence::checksum(sentence_body)
            );
            assert!(parser.parse(&sentence).is_none(), "{sentence}");
            assert_eq!(
                parser.last_error().unwrap().kind(),
                ErrorKind::BadFragmentInfo,
                "{sentence}"
            );
        }
    }

    #[test]
    fn unsupported_type_is_reported() {
        // Type 9 (SAR aircraft position report) has no decoder here.
        let mut bits = BitBuffer::new();
        bits.append_uint(9, 6).unwrap();
        for _ in 0..162 {
            bits.append_bit(false);
        }
        let sentence = crate::sentence::make_sentence(
            Talker::Aivdm,
            &bits.to_nmea_payload(),
            1,
            1,
            "",
            Channel::A,
            bits.fill_bits(),
        )
        .unwrap();

        let mut parser = AisParser::new();
        assert!(parser.parse(&sentence).is_none());
        assert_eq!(
            parser.last_error().unwrap().kind(),
            ErrorKind::UnsupportedType
        );
    }

    #[test]
    fn multipart_in_order() {
        let (sentences, original) = multipart_sentences("2");
        let mut parser = parser();

        assert!(parser.parse(&sentences[0]).is_none());
        assert!(parser.last_error().is_none());
        assert_eq!(parser.incomplete_count(), 1);

        let message = parser.parse(&sentences[1]).unwrap();
        assert_eq!(parser.incomplete_count(), 0);
        match message {
            AisMessage::StaticAndVoyageData(decoded) => {
                assert_eq!(decoded.vessel_name(), "MULTI PART TEST VESS");
                assert_eq!(decoded, original);
            }
            other => panic!("expected type 5, got {other:?}"),
        }
    }

    #[test]
    fn multipart_out_of_order() {
        let (sentences, _) = multipart_sentences("3");

        let mut forward = parser();
        forward.parse(&sentences[0]);
        let in_order = forward.parse(&sentences[1]).unwrap();

        let mut backward = parser();
        assert!(backward.parse(&sentences[1]).is_none());
        let out_of_order = backward.parse(&sentences[0]).unwrap();

        assert_eq!(in_order, out_of_order);
    }

    #[test]
    fn multipart_timeout() {
        let (sentences, _) = multipart_sentences("4");
        let clock = ManualClock::new();
        let mut parser = AisParser::with_clock(
            ParserConfig {
                message_timeout: Duration::from_secs(1),
                ..ParserConfig::default()
            },
            clock.clone(),
        );

        parser.parse(&sentences[0]);
        assert_eq!(parser.incomplete_count(), 1);

        clock.advance(Duration::from_secs(2));
        parser.cleanup_expired();
        assert_eq!(parser.incomplete_count(), 0);

        // The second fragment alone opens a fresh incomplete group.
        assert!(parser.parse(&sentences[1]).is_none());
        assert!(parser.last_error().is_none());
        assert_eq!(parser.incomplete_count(), 1);
    }

    #[test]
    fn multipart_empty_group_id_is_rejected() {
        // The emitter refuses to produce such sentences, so blank the
        // group id of a valid fragment and fix up the checksum.
        let (sentences, _) = multipart_sentences("9");
        let body = sentences[0]
            .split('*')
            .next()
            .unwrap()
            .replacen(",9,", ",,", 1);
        let fragment = format!("{body}*{:02X}", crate::sentence::checksum(&body));

        let mut parser = parser();
        assert!(parser.parse(&fragment).is_none());
        assert_eq!(
            parser.last_error().unwrap().kind(),
            ErrorKind::BadFragmentInfo
        );
        assert_eq!(parser.incomplete_count(), 0);
    }

    #[test]
    fn capacity_eviction_through_facade() {
        let mut parser = AisParser::with_clock(
            ParserConfig {
                max_incomplete_messages: 2,
                ..ParserConfig::default()
            },
            ManualClock::new(),
        );
        for group_id in ["10", "11", "12"] {
            let (sentences, _) = multipart_sentences(group_id);
            parser.parse(&sentences[0]);
        }
        assert_eq!(parser.incomplete_count(), 2);
    }

    #[test]
    fn groups_do_not_cross_channels() {
        let (sentences, _) = multipart_sentences("6");
        // Move fragment 2 to channel B, fixing up the checksum.
        let fragment_2_on_b = {
            let body = sentences[1]
                .split('*')
                .next()
                .unwrap()
                .replacen(",A,", ",B,", 1);
            format!("{body}*{:02X}", crate::sentence::checksum(&body))
        };

        let mut parser = parser();
        parser.parse(&sentences[0]);
        assert!(parser.parse(&fragment_2_on_b).is_none());
        assert!(parser.last_error().is_none());
        assert_eq!(parser.incomplete_count(), 2);
    }

    #[test]
    fn roundtrip_through_emission() {
        let mut parser = AisParser::new();
        let original = parser
            .parse("!AIVDM,1,1,,B,177KQJ5000G?tO`K>RA1wUbN0TKH,0*5C")
            .unwrap();
        let sentences = original
            .to_sentences(Talker::Aivdm, "", Channel::B)
            .unwrap();
        assert_eq!(
            sentences[0],
            "!AIVDM,1,1,,B,177KQJ5000G?tO`K>RA1wUbN0TKH,0*5C"
        );
        let reparsed = parser.parse(&sentences[0]).unwrap();
        assert_eq!(original, reparsed);
    }
}
