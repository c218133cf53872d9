//! Binary messages (types 6 and 8).
//!
//! Binary messages are transport envelopes: after the header they carry
//! an opaque application payload identified by a 10-bit Designated Area
//! Code and a 6-bit Function Identifier. Type 6 is addressed to one
//! station; type 8 is broadcast. The payload bits are owned by the
//! message and interpreted by the [`application`](crate::application)
//! module when the DAC/FI pair is known.

use crate::bits::{BitBuffer, BitsError};
use crate::message::DecodeError;
use crate::mmsi::Mmsi;

/// Header bits of a type 6 message before the application payload.
const ADDRESSED_HEADER_BITS: usize = 88;
/// Header bits of a type 8 message before the application payload.
const BROADCAST_HEADER_BITS: usize = 56;

/// Binary addressed message (type 6).
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryAddressedMessage {
    repeat_indicator: u8,
    mmsi: Mmsi,
    sequence_number: u8,
    dest_mmsi: Mmsi,
    retransmit: bool,
    spare: bool,
    dac: u16,
    fi: u8,
    data: BitBuffer,
}

impl BinaryAddressedMessage {
    /// Creates a message with an empty application payload.
    pub fn new(
        mmsi: Mmsi,
        dest_mmsi: Mmsi,
        sequence_number: u8,
        repeat_indicator: u8,
    ) -> BinaryAddressedMessage {
        BinaryAddressedMessage {
            repeat_indicator,
            mmsi,
            sequence_number: sequence_number & 0x3,
            dest_mmsi,
            retransmit: false,
            spare: false,
            dac: 0,
            fi: 0,
            data: BitBuffer::new(),
        }
    }

    /// Decodes a message from an assembled bit buffer. Everything after
    /// the 88-bit header becomes the application payload.
    pub fn from_bits(bits: &BitBuffer) -> Result<BinaryAddressedMessage, DecodeError> {
        if bits.len() < ADDRESSED_HEADER_BITS {
            return Err(DecodeError::MalformedBits);
        }
        if bits.get_uint(0, 6)? != 6 {
            return Err(DecodeError::WrongType);
        }
        let data = bits.extract(ADDRESSED_HEADER_BITS, bits.len() - ADDRESSED_HEADER_BITS)?;
        Ok(BinaryAddressedMessage {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: Mmsi::from_raw(bits.get_uint(8, 30)? as u32),
            sequence_number: bits.get_uint(38, 2)? as u8,
            dest_mmsi: Mmsi::from_raw(bits.get_uint(40, 30)? as u32),
            retransmit: bits.get_bit(70)?,
            spare: bits.get_bit(71)?,
            dac: bits.get_uint(72, 10)? as u16,
            fi: bits.get_uint(82, 6)? as u8,
            data,
        })
    }

    /// Appends the header and application payload to `bits`.
    pub fn to_bits(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(6, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.sequence_number), 2)?;
        bits.append_uint(u64::from(self.dest_mmsi), 30)?;
        bits.append_bit(self.retransmit);
        bits.append_bit(self.spare);
        bits.append_uint(u64::from(self.dac), 10)?;
        bits.append_uint(u64::from(self.fi), 6)?;
        bits.append_buffer(&self.data);
        Ok(())
    }

    /// Repeat indicator.
    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    /// Source station identity.
    pub fn mmsi(&self) -> Mmsi {
        self.mmsi
    }

    /// Destination station identity.
    pub fn dest_mmsi(&self) -> Mmsi {
        self.dest_mmsi
    }

    pub fn set_dest_mmsi(&mut self, dest_mmsi: Mmsi) {
        self.dest_mmsi = dest_mmsi;
    }

    /// Sequence number of this transmission, `0..=3`.
    pub fn sequence_number(&self) -> u8 {
        self.sequence_number
    }

    /// Sets the sequence number; values above 3 reset to 0.
    pub fn set_sequence_number(&mut self, sequence_number: u8) {
        self.sequence_number = if sequence_number > 3 {
            0
        } else {
            sequence_number
        };
    }

    /// Retransmit flag.
    pub fn retransmit(&self) -> bool {
        self.retransmit
    }

    pub fn set_retransmit(&mut self, retransmit: bool) {
        self.retransmit = retransmit;
    }

    /// Designated area code.
    pub fn dac(&self) -> u16 {
        self.dac
    }

    /// Function identifier.
    pub fn fi(&self) -> u8 {
        self.fi
    }

    /// DAC and FI combined into one identifier, DAC in the high half.
    pub fn application_id(&self) -> u32 {
        u32::from(self.dac) << 16 | u32::from(self.fi)
    }

    /// Sets the DAC/FI pair. Values wider than their fields (10 and 6
    /// bits) truncate at encode time.
    pub fn set_application_id(&mut self, dac: u16, fi: u8) {
        self.dac = dac;
        self.fi = fi;
    }

    /// The application payload bits.
    pub fn data(&self) -> &BitBuffer {
        &self.data
    }

    pub fn set_data(&mut self, data: BitBuffer) {
        self.data = data;
    }
}

/// Binary broadcast message (type 8).
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryBroadcastMessage {
    repeat_indicator: u8,
    mmsi: Mmsi,
    spare: u8,
    dac: u16,
    fi: u8,
    data: BitBuffer,
}

impl BinaryBroadcastMessage {
    /// Creates a message with an empty application payload.
    pub fn new(mmsi: Mmsi, repeat_indicator: u8) -> BinaryBroadcastMessage {
        BinaryBroadcastMessage {
            repeat_indicator,
            mmsi,
            spare: 0,
            dac: 0,
            fi: 0,
            data: BitBuffer::new(),
        }
    }

    /// Decodes a message from an assembled bit buffer. Everything after
    /// the 56-bit header becomes the application payload.
    pub fn from_bits(bits: &BitBuffer) -> Result<BinaryBroadcastMessage, DecodeError> {
        if bits.len() < BROADCAST_HEADER_BITS {
            return Err(DecodeError::MalformedBits);
        }
        if bits.get_uint(0, 6)? != 8 {
            return Err(DecodeError::WrongType);
        }
        let data = bits.extract(BROADCAST_HEADER_BITS, bits.len() - BROADCAST_HEADER_BITS)?;
        Ok(BinaryBroadcastMessage {
            repeat_indicator: bits.get_uint(6, 2)? as u8,
            mmsi: Mmsi::from_raw(bits.get_uint(8, 30)? as u32),
            spare: bits.get_uint(38, 2)? as u8,
            dac: bits.get_uint(40, 10)? as u16,
            fi: bits.get_uint(50, 6)? as u8,
            data,
        })
    }

    /// Appends the header and application payload to `bits`.
    pub fn to_bits(&self, bits: &mut BitBuffer) -> Result<(), BitsError> {
        bits.append_uint(8, 6)?;
        bits.append_uint(u64::from(self.repeat_indicator), 2)?;
        bits.append_uint(u64::from(self.mmsi), 30)?;
        bits.append_uint(u64::from(self.spare), 2)?;
        bits.append_uint(u64::from(self.dac), 10)?;
        bits.append_uint(u64::from(self.fi), 6)?;
        bits.append_buffer(&self.data);
        Ok(())
    }

    /// Repeat indicator.
    pub fn repeat_indicator(&self) -> u8 {
        self.repeat_indicator
    }

    /// Source station identity.
    pub fn mmsi(&self) -> Mmsi {
        self.mmsi
    }

    /// Designated area code.
    pub fn dac(&self) -> u16 {
        self.dac
    }

    /// Function identifier.
    pub fn fi(&self) -> u8 {
        self.fi
    }

    /// DAC and FI combined into one identifier, DAC in the high half.
    pub fn application_id(&self) -> u32 {
        u32::from(self.dac) << 16 | u32::from(self.fi)
    }

    /// Sets the DAC/FI pair. Values wider than their fields (10 and 6
    /// bits) truncate at encode time.
    pub fn set_application_id(&mut self, dac: u16, fi: u8) {
        self.dac = dac;
        self.fi = fi;
    }

    /// The application payload bits.
    pub fn data(&self) -> &BitBuffer {
        &self.data
    }

    pub fn set_data(&mut self, data: BitBuffer) {
        self.data = data;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn payload() -> BitBuffer {
        let mut data = BitBuffer::new();
        data.append_uint(0xCAFE, 16).unwrap();
        data.append_uint(0x5, 3).unwrap();
        data
    }

    #[test]
    fn addressed_roundtrip() {
        let mut message = BinaryAddressedMessage::new(
            Mmsi::try_from(123456789).unwrap(),
            Mmsi::try_from(987654321).unwrap(),
            1,
            0,
        );
        message.set_application_id(1, 22);
        message.set_retransmit(true);
        message.set_data(payload());

        let mut bits = BitBuffer::new();
        message.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), 88 + 19);

        let decoded = BinaryAddressedMessage::from_bits(&bits).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.mmsi().value(), 123456789);
        assert_eq!(decoded.dest_mmsi().value(), 987654321);
        assert_eq!(decoded.sequence_number(), 1);
        assert!(decoded.retransmit());
        assert_eq!(decoded.dac(), 1);
        assert_eq!(decoded.fi(), 22);
        assert_eq!(decoded.application_id(), 1 << 16 | 22);
        assert_eq!(decoded.data(), &payload());
    }

    #[test]
    fn broadcast_roundtrip() {
        let mut message = BinaryBroadcastMessage::new(Mmsi::try_from(2655651).unwrap(), 0);
        message.set_application_id(1, 31);
        message.set_data(payload());

        let mut bits = BitBuffer::new();
        message.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), 56 + 19);

        let decoded = BinaryBroadcastMessage::from_bits(&bits).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.dac(), 1);
        assert_eq!(decoded.fi(), 31);
        assert_eq!(decoded.data(), &payload());
    }

    #[test]
    fn empty_payload_is_valid() {
        let message = BinaryBroadcastMessage::new(Mmsi::try_from(1).unwrap(), 0);
        let mut bits = BitBuffer::new();
        message.to_bits(&mut bits).unwrap();
        assert_eq!(bits.len(), 56);
        let decoded = BinaryBroadcastMessage::from_bits(&bits).unwrap();
        assert!(decoded.data().is_empty());
    }

    #[test]
    fn sequence_number_range() {
        let mut message = BinaryAddressedMessage::new(
            Mmsi::try_from(1).unwrap(),
            Mmsi::try_from(2).unwrap(),
            0,
            0,
        );
        message.set_sequence_number(3);
        assert_eq!(message.sequence_number(), 3);
        message.set_sequence_number(4);
        assert_eq!(message.sequence_number(), 0);
    }

    #[test]
    fn decode_live_broadcast() {
        // !AIVDM,1,1,,A,85M:Ih1KmPAU6jAs85`03cJm,0*6A (DAC/FI payload)
        let bits = BitBuffer::from_nmea_payload("85M:Ih1KmPAU6jAs85`03cJm").unwrap();
        let message = BinaryBroadcastMessage::from_bits(&bits).unwrap();
        assert!(message.dac() <= 1023);
        assert!(message.fi() <= 63);
        assert_eq!(message.data().len(), 24 * 6 - 56);
    }

    #[test]
    fn decode_rejects_short_header() {
        let mut bits = BitBuffer::new();
        bits.append_uint(8, 6).unwrap();
        bits.append_uint(0, 40).unwrap();
        assert_eq!(
            BinaryBroadcastMessage::from_bits(&bits),
            Err(DecodeError::MalformedBits)
        );
    }
}
