//! NMEA 0183 sentence framing.
//!
//! AIS payloads travel inside `!AIVDM` (received) and `!AIVDO` (own
//! station) sentences. This module validates and computes the XOR
//! checksum, splits a sentence into its comma-separated fields, and
//! constructs well-formed envelopes around an armored payload.

use core::fmt;

/// AIS radio channel.
///
/// ITU-R M.1371 assigns AIS two VHF channels, designated `A` (161.975
/// MHz) and `B` (162.025 MHz). The channel is part of the fragment-group
/// key during multipart reassembly.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Channel {
    /// AIS channel A.
    A,
    /// AIS channel B.
    B,
}

impl TryFrom<char> for Channel {
    type Error = SentenceError;

    fn try_from(value: char) -> Result<Channel, SentenceError> {
        match value {
            'A' => Ok(Channel::A),
            'B' => Ok(Channel::B),
            _ => Err(SentenceError::BadChannel),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::A => write!(f, "A"),
            Channel::B => write!(f, "B"),
        }
    }
}

/// Sentence talker tag.
///
/// `!AIVDM` carries messages received over the air; `!AIVDO` carries the
/// own station's transmissions. The bit layouts are identical.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Talker {
    /// `!AIVDM`, a received message.
    Aivdm,
    /// `!AIVDO`, an own-station message.
    Aivdo,
}

impl fmt::Display for Talker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Talker::Aivdm => write!(f, "!AIVDM"),
            Talker::Aivdo => write!(f, "!AIVDO"),
        }
    }
}

/// Errors detected while constructing an NMEA envelope.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SentenceError {
    /// `fragment_count` below 1 or `fragment_number` outside
    /// `1..=fragment_count`.
    BadFragmentInfo,
    /// Channel character other than `A` or `B`.
    BadChannel,
    /// Fill-bit count above 5.
    BadFillBits,
}

/// Computes the NMEA checksum of a sentence.
///
/// The checksum is the XOR of every byte strictly between the leading
/// `!` or `$` (exclusive) and the `*` (exclusive). If the sentence has
/// no leading marker the XOR starts at the first byte; if it has no `*`
/// the XOR runs to the end.
pub fn checksum(sentence: &str) -> u8 {
    let body = sentence.strip_prefix(&['!', '$'][..]).unwrap_or(sentence);
    let body = match body.find('*') {
        Some(pos) => &body[..pos],
        None => body,
    };
    body.bytes().fold(0, |acc, byte| acc ^ byte)
}

/// Validates the `*HH` checksum of a sentence.
///
/// Requires a `*` followed by exactly two hex digits (upper or lower
/// case); a missing or malformed checksum fails validation.
pub fn validate_checksum(sentence: &str) -> bool {
    let sentence = sentence.trim_end();
    let Some(star) = sentence.find('*') else {
        return false;
    };
    let digits = &sentence[star + 1..];
    if digits.len() != 2 {
        return false;
    }
    let Ok(expected) = u8::from_str_radix(digits, 16) else {
        return false;
    };
    checksum(sentence) == expected
}

/// Splits a sentence into its comma-separated fields.
///
/// The checksum suffix (from `*` onwards) is not part of any field.
pub fn split_fields(sentence: &str) -> Vec<&str> {
    let body = match sentence.find('*') {
        Some(pos) => &sentence[..pos],
        None => sentence,
    };
    body.split(',').collect()
}

/// Builds a complete `!AIVDM`/`!AIVDO` sentence around an armored
/// payload, including the checksum suffix.
pub fn make_sentence(
    talker: Talker,
    payload: &str,
    fragment_count: u8,
    fragment_number: u8,
    group_id: &str,
    channel: Channel,
    fill_bits: u8,
) -> Result<String, SentenceError> {
    if fragment_count < 1 || fragment_number < 1 || fragment_number > fragment_count {
        return Err(SentenceError::BadFragmentInfo);
    }
    if fill_bits > 5 {
        return Err(SentenceError::BadFillBits);
    }
    let body = format!(
        "{talker},{fragment_count},{fragment_number},{group_id},{channel},{payload},{fill_bits}"
    );
    let sum = checksum(&body);
    Ok(format!("{body}*{sum:02X}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn checksum_known_sentence() {
        // Live capture; its published checksum is 0x23.
        let sentence = "!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23";
        assert_eq!(checksum(sentence), 0x23);
        assert!(validate_checksum(sentence));
    }

    #[test]
    fn checksum_detects_corruption() {
        let sentence = "!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23";
        let corrupted = sentence.replace("13HOI", "13HOJ");
        assert!(!validate_checksum(&corrupted));
    }

    #[test]
    fn checksum_requires_two_hex_digits() {
        assert!(!validate_checksum("!AIVDM,1,1,,A,13HOI,0"));
        assert!(!validate_checksum("!AIVDM,1,1,,A,13HOI,0*2"));
        assert!(!validate_checksum("!AIVDM,1,1,,A,13HOI,0*2G"));
        assert!(!validate_checksum("!AIVDM,1,1,,A,13HOI,0*234"));
    }

    #[test]
    fn fields_split() {
        let sentence = "!AIVDM,2,1,3,B,55P5TL01VIaAL@7WKO@mBplU@<PDhh000000001S;AJ::4A80?4i@E53,0*3E";
        let fields = split_fields(sentence);
        assert_eq!(fields.len(), 7);
        assert_eq!(fields[0], "!AIVDM");
        assert_eq!(fields[1], "2");
        assert_eq!(fields[2], "1");
        assert_eq!(fields[3], "3");
        assert_eq!(fields[4], "B");
        assert_eq!(fields[6], "0");
    }

    #[test]
    fn emit_and_validate() {
        let sentence = make_sentence(
            Talker::Aivdm,
            "15MgK45P3@G?fl0E`JbR0OwT0@MS",
            1,
            1,
            "",
            Channel::A,
            0,
        )
        .unwrap();
        assert!(sentence.starts_with("!AIVDM,1,1,,A,15MgK45P3@G?fl0E`JbR0OwT0@MS,0*"));
        assert!(validate_checksum(&sentence));
    }

    #[test]
    fn emit_aivdo() {
        let sentence =
            make_sentence(Talker::Aivdo, "13HOI:0P", 1, 1, "", Channel::B, 2).unwrap();
        assert!(sentence.starts_with("!AIVDO,1,1,,B,13HOI:0P,2*"));
        assert!(validate_checksum(&sentence));
    }

    #[test]
    fn emit_rejects_bad_arguments() {
        let e = make_sentence(Talker::Aivdm, "x", 0, 1, "", Channel::A, 0);
        assert_eq!(e, Err(SentenceError::BadFragmentInfo));
        let e = make_sentence(Talker::Aivdm, "x", 2, 3, "", Channel::A, 0);
        assert_eq!(e, Err(SentenceError::BadFragmentInfo));
        let e = make_sentence(Talker::Aivdm, "x", 1, 1, "", Channel::A, 6);
        assert_eq!(e, Err(SentenceError::BadFillBits));
    }

    #[test]
    fn channel_conversions() {
        assert_eq!(Channel::try_from('A'), Ok(Channel::A));
        assert_eq!(Channel::try_from('B'), Ok(Channel::B));
        assert_eq!(Channel::try_from('C'), Err(SentenceError::BadChannel));
        assert_eq!(Channel::A.to_string(), "A");
        assert_eq!(Channel::B.to_string(), "B");
    }
}
