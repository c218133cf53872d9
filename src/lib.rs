//! AIS (ITU-R M.1371) message codec with NMEA 0183 framing.
//!
//! This crate decodes and encodes the Automatic Identification System
//! messages exchanged by ships and shore stations on VHF, as they
//! appear on an NMEA 0183 feed: `!AIVDM`/`!AIVDO` sentences carrying a
//! densely bit-packed payload in 6-bit ASCII armor, with long messages
//! split across several sentences.
//!
//! The building blocks are usable on their own ([`bits::BitBuffer`]
//! for the bit-level codec, the [`sentence`] module for framing,
//! [`reassembly::CollectMultipart`] for fragment grouping), but most
//! users want the [`AisParser`] facade, which drives all of them:
//!
//! ```
//! use ais_vdm::{AisMessage, AisParser};
//!
//! let mut parser = AisParser::new();
//! match parser.parse("!AIVDM,1,1,,A,13HOI:0P0000VOHLCnHQKwvL05Ip,0*23") {
//!     Some(AisMessage::PositionReport(report)) => {
//!         println!(
//!             "{} at ({:?}, {:?})",
//!             report.mmsi(),
//!             report.latitude(),
//!             report.longitude(),
//!         );
//!     }
//!     Some(_) => {}
//!     // None is either a failure (see `parser.last_error()`) or an
//!     // incomplete multipart group waiting for more fragments.
//!     None => {}
//! }
//! ```
//!
//! Decoded messages are fully typed ([`AisMessage`] is a sum over the
//! supported type codes) and re-encode to their exact bit layout;
//! fields with a "not available" wire sentinel are exposed as `Option`.
//! Binary messages (types 6 and 8) carry their application payload as
//! raw bits, with the DAC=1 area-notice and meteorological payloads
//! decoded by the [`application`] module.
//!
//! The crate performs no I/O and spawns no threads. Multipart state is
//! bounded by the [`ParserConfig`] timeout and capacity knobs; expiry
//! is driven by the caller through [`AisParser::cleanup_expired`].

pub mod application;
pub mod base_station;
pub mod binary;
pub mod bits;
pub mod class_b;
pub mod message;
mod mmsi;
pub mod parser;
pub mod position_report;
pub mod reassembly;
pub mod sentence;
pub mod static_voyage;

pub use message::{AisMessage, DecodeError, EncodeError, EpfdType};
pub use mmsi::{Mmsi, MmsiError};
pub use parser::{AisParser, ErrorKind, ParseError, ParserConfig};
pub use sentence::{Channel, Talker};
