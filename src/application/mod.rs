//! Application payloads carried inside binary messages.
//!
//! The payload of a type 6 or type 8 message is interpreted according
//! to its Designated Area Code and Function Identifier. This module
//! implements the two internationally assigned DAC=1 payloads the crate
//! understands, [`AreaNotice`] (FI 22) and [`MeteorologicalData`]
//! (FI 31), plus the well-known identifier constants for callers
//! routing payloads themselves.

pub mod area_notice;
pub mod meteo;

pub use area_notice::{AreaNotice, NoticeType, SubArea};
pub use meteo::MeteorologicalData;

/// DAC 0: test and development.
pub const DAC_TEST: u16 = 0;
/// DAC 1: international (IMO) applications.
pub const DAC_INTERNATIONAL: u16 = 1;
/// DAC 200: European inland waterways.
pub const DAC_EUROPE: u16 = 200;
/// DAC 316: Canada.
pub const DAC_CANADA: u16 = 316;
/// DAC 366: United States.
pub const DAC_USA: u16 = 366;

/// FI 22 under DAC 1: area notice (broadcast).
pub const FI_AREA_NOTICE: u8 = 22;
/// FI 31 under DAC 1: meteorological and hydrological data.
pub const FI_METEO_HYDRO_DATA: u8 = 31;
/// FI 11 under DAC 1: the older weather observation layout, superseded
/// by FI 31.
pub const FI_WEATHER_OBSERVATION: u8 = 11;
