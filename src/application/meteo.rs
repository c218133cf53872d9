//! Meteorological and hydrological data (DAC 1, FI 31).
//!
//! A weather station payload: a fixed position and observation time
//! followed by a long run of scalar measurements, every one of which
//! has its own "not available" sentinel on the wire. The struct stores
//! the raw field values, so re-encoding a decoded payload is a bitwise
//! identity; the accessors translate sentinels to `None`.

use crate::binary::{BinaryAddressedMessage, BinaryBroadcastMessage};
use crate::bits::{BitBuffer, BitsError};
use crate::message::DecodeError;
use crate::mmsi::Mmsi;

use super::{DAC_INTERNATIONAL, FI_METEO_HYDRO_DATA};

/// Total payload length in bits.
const BIT_LENGTH: usize = 244;

const WIND_NOT_AVAILABLE: u16 = 0x3FF;
const DIRECTION_NOT_AVAILABLE: u16 = 0x1FF;
const TEMPERATURE_NOT_AVAILABLE: i16 = -1024;
const HUMIDITY_NOT_AVAILABLE: u8 = 0x7F;
const PRESSURE_NOT_AVAILABLE: u16 = 0x1FF;
const TENDENCY_NOT_AVAILABLE: u8 = 0x3;
const VISIBILITY_NOT_AVAILABLE: u8 = 0xFF;
const WATER_LEVEL_NOT_AVAILABLE: i16 = -2048;
const TREND_NOT_AVAILABLE: u8 = 0x3;
const SPEED_NOT_AVAILABLE: u8 = 0xFF;
const HEIGHT_NOT_AVAILABLE: u8 = 0xFF;
const PERIOD_NOT_AVAILABLE: u8 = 0x3F;
const PRECIPITATION_NOT_AVAILABLE: u8 = 0x7;
const SALINITY_NOT_AVAILABLE: u16 = 0x1FF;
const ICE_NOT_AVAILABLE: u8 = 0x3;

/// Meteorological and hydrological data payload (DAC 1, FI 31).
///
/// Position resolution is 1/1000 minute, coarser than the 1/10000
/// minute of position reports.
#[derive(Debug, Clone, PartialEq)]
pub struct MeteorologicalData {
    latitude: i32,
    longitude: i32,
    day: u8,
    hour: u8,
    minute: u8,
    wind_speed: u16,
    wind_gust: u16,
    wind_direction: u16,
    air_temperature: i16,
    relative_humidity: u8,
    dew_point: i16,
    air_pressure: u16,
    air_pressure_tendency: u8,
    horizontal_visibility: u8,
    water_level: i16,
    water_level_trend: u8,
    surface_current_speed: u8,
    surface_current_direction: u16,
    wave_height: u8,
    wave_period: u8,
    wave_direction: u16,
    swell_height: u8,
    swell_period: u8,
    swell_direction: u16,
    sea_temperature: i16,
    precipitation_type: u8,
    salinity: u16,
    ice: u8,
}

impl MeteorologicalData {
    /// Creates a payload with every measurement not available and the
    /// position at the origin.
    pub fn new() -> MeteorologicalData {
        MeteorologicalData {
            latitude: 0,
            longitude: 0,
            day: 0,
            hour: 0,
            minute: 0,
            wind_speed: WIND_NOT_AVAILABLE,
            wind_gust: WIND_NOT_AVAILABLE,
            wind_direction: DIRECTION_NOT_AVAILABLE,
            air_temperature: TEMPERATURE_NOT_AVAILABLE,
            relative_humidity: HUMIDITY_NOT_AVAILABLE,
            dew_point: TEMPERATURE_NOT_AVAILABLE,
            air_pressure: PRESSURE_NOT_AVAILABLE,
            air_pressure_tendency: TENDENCY_NOT_AVAILABLE,
            horizontal_visibility: VISIBILITY_NOT_AVAILABLE,
            water_level: WATER_LEVEL_NOT_AVAILABLE,
            water_level_trend: TREND_NOT_AVAILABLE,
            surface_current_speed: SPEED_NOT_AVAILABLE,
            surface_current_direction: DIRECTION_NOT_AVAILABLE,
            wave_height: HEIGHT_NOT_AVAILABLE,
            wave_period: PERIOD_NOT_AVAILABLE,
            wave_direction: DIRECTION_NOT_AVAILABLE,
            swell_height: HEIGHT_NOT_AVAILABLE,
            swell_period: PERIOD_NOT_AVAILABLE,
            swell_direction: DIRECTION_NOT_AVAILABLE,
            sea_temperature: TEMPERATURE_NOT_AVAILABLE,
            precipitation_type: PRECIPITATION_NOT_AVAILABLE,
            salinity: SALINITY_NOT_AVAILABLE,
            ice: ICE_NOT_AVAILABLE,
        }
    }

    /// Decodes a payload from the application data of a binary message.
    pub fn from_payload(bits: &BitBuffer) -> Result<MeteorologicalData, DecodeError> {
        if bits.len() < BIT_LENGTH {
            return Err(DecodeError::MalformedBits);
        }
        Ok(MeteorologicalData {
            latitude: bits.get_int(0, 24)? as i32,
            longitude: bits.get_int(24, 25)? as i32,
            day: bits.get_uint(49, 5)? as u8,
            hour: bits.get_uint(54, 5)? as u8,
            minute: bits.get_uint(59, 6)? as u8,
            wind_speed: bits.get_uint(65, 10)? as u16,
            wind_gust: bits.get_uint(75, 10)? as u16,
            wind_direction: bits.get_uint(85, 9)? as u16,
            air_temperature: bits.get_int(94, 11)? as i16,
            relative_humidity: bits.get_uint(105, 7)? as u8,
            dew_point: bits.get_int(112, 11)? as i16,
            air_pressure: bits.get_uint(123, 9)? as u16,
            air_pressure_tendency: bits.get_uint(132, 2)? as u8,
            horizontal_visibility: bits.get_uint(134, 8)? as u8,
            water_level: bits.get_int(142, 12)? as i16,
            water_level_trend: bits.get_uint(154, 2)? as u8,
            surface_current_speed: bits.get_uint(156, 8)? as u8,
            surface_current_direction: bits.get_uint(164, 9)? as u16,
            wave_height: bits.get_uint(173, 8)? as u8,
            wave_period: bits.get_uint(181, 6)? as u8,
            wave_direction: bits.get_uint(187, 9)? as u16,
            swell_height: bits.get_uint(196, 8)? as u8,
            swell_period: bits.get_uint(204, 6)? as u8,
            swell_direction: bits.get_uint(210, 9)? as u16,
            sea_temperature: bits.get_int(219, 11)? as i16,
            precipitation_type: bits.get_uint(230, 3)? as u8,
            salinity: bits.get_uint(233, 9)? as u16,
            ice: bits.get_uint(242, 2)? as u8,
        })
    }

    /// Serializes the payload.
    pub fn to_payload(&self) -> Result<BitBuffer, BitsError> {
        let mut bits = BitBuffer::with_capacity(BIT_LENGTH);
        bits.append_int(i64::from(self.latitude), 24)?;
        bits.append_int(i64::from(self.longitude), 25)?;
        bits.append_uint(u64::from(self.day), 5)?;
        bits.append_uint(u64::from(self.hour), 5)?;
        bits.append_uint(u64::from(self.minute), 6)?;
        bits.append_uint(u64::from(self.wind_speed), 10)?;
        bits.append_uint(u64::from(self.wind_gust), 10)?;
        bits.append_uint(u64::from(self.wind_direction), 9)?;
        bits.append_int(i64::from(self.air_temperature), 11)?;
        bits.append_uint(u64::from(self.relative_humidity), 7)?;
        bits.append_int(i64::from(self.dew_point), 11)?;
        bits.append_uint(u64::from(self.air_pressure), 9)?;
        bits.append_uint(u64::from(self.air_pressure_tendency), 2)?;
        bits.append_uint(u64::from(self.horizontal_visibility), 8)?;
        bits.append_int(i64::from(self.water_level), 12)?;
        bits.append_uint(u64::from(self.water_level_trend), 2)?;
        bits.append_uint(u64::from(self.surface_current_speed), 8)?;
        bits.append_uint(u64::from(self.surface_current_direction), 9)?;
        bits.append_uint(u64::from(self.wave_height), 8)?;
        bits.append_uint(u64::from(self.wave_period), 6)?;
        bits.append_uint(u64::from(self.wave_direction), 9)?;
        bits.append_uint(u64::from(self.swell_height), 8)?;
        bits.append_uint(u64::from(self.swell_period), 6)?;
        bits.append_uint(u64::from(self.swell_direction), 9)?;
        bits.append_int(i64::from(self.sea_temperature), 11)?;
        bits.append_uint(u64::from(self.precipitation_type), 3)?;
        bits.append_uint(u64::from(self.salinity), 9)?;
        bits.append_uint(u64::from(self.ice), 2)?;
        Ok(bits)
    }

    /// Wraps the payload in a type 6 message addressed to `dest_mmsi`.
    pub fn to_addressed_message(
        &self,
        source_mmsi: Mmsi,
        dest_mmsi: Mmsi,
        sequence_number: u8,
        repeat_indicator: u8,
    ) -> Result<BinaryAddressedMessage, BitsError> {
        let mut message =
            BinaryAddressedMessage::new(source_mmsi, dest_mmsi, sequence_number, repeat_indicator);
        message.set_application_id(DAC_INTERNATIONAL, FI_METEO_HYDRO_DATA);
        message.set_data(self.to_payload()?);
        Ok(message)
    }

    /// Wraps the payload in a type 8 broadcast.
    pub fn to_broadcast_message(
        &self,
        source_mmsi: Mmsi,
        repeat_indicator: u8,
    ) -> Result<BinaryBroadcastMessage, BitsError> {
        let mut message = BinaryBroadcastMessage::new(source_mmsi, repeat_indicator);
        message.set_application_id(DAC_INTERNATIONAL, FI_METEO_HYDRO_DATA);
        message.set_data(self.to_payload()?);
        Ok(message)
    }

    /// Latitude of the observation in degrees, north positive.
    pub fn latitude(&self) -> f64 {
        f64::from(self.latitude) / 60000.0
    }

    /// Sets the latitude in degrees.
    pub fn set_latitude(&mut self, latitude: f64) {
        self.latitude = (latitude * 60000.0).round() as i32;
    }

    /// Longitude of the observation in degrees, east positive.
    pub fn longitude(&self) -> f64 {
        f64::from(self.longitude) / 60000.0
    }

    /// Sets the longitude in degrees.
    pub fn set_longitude(&mut self, longitude: f64) {
        self.longitude = (longitude * 60000.0).round() as i32;
    }

    /// Sets both coordinates of the observation position, in degrees.
    pub fn set_position(&mut self, latitude: f64, longitude: f64) {
        self.set_latitude(latitude);
        self.set_longitude(longitude);
    }

    /// Day of month of the observation; 0 when not available.
    pub fn day(&self) -> u8 {
        self.day
    }

    /// UTC hour of the observation.
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// UTC minute of the observation.
    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Sets the observation time (day of month, UTC hour, UTC minute).
    pub fn set_observation_time(&mut self, day: u8, hour: u8, minute: u8) {
        self.day = if day > 31 { 0 } else { day };
        self.hour = if hour > 23 { 0 } else { hour };
        self.minute = if minute > 59 { 0 } else { minute };
    }

    /// Average wind speed in knots.
    pub fn wind_speed(&self) -> Option<f32> {
        (self.wind_speed != WIND_NOT_AVAILABLE).then(|| f32::from(self.wind_speed) / 10.0)
    }

    /// Sets the average wind speed in knots; NaN and negative values
    /// store the not-available sentinel.
    pub fn set_wind_speed(&mut self, speed: f32) {
        self.wind_speed = encode_tenths_u16(speed, WIND_NOT_AVAILABLE);
    }

    /// Wind gust speed in knots.
    pub fn wind_gust(&self) -> Option<f32> {
        (self.wind_gust != WIND_NOT_AVAILABLE).then(|| f32::from(self.wind_gust) / 10.0)
    }

    /// Sets the wind gust speed in knots; NaN and negative values store
    /// the not-available sentinel.
    pub fn set_wind_gust(&mut self, gust: f32) {
        self.wind_gust = encode_tenths_u16(gust, WIND_NOT_AVAILABLE);
    }

    /// Wind direction in degrees true, `0..=359`.
    pub fn wind_direction(&self) -> Option<u16> {
        (self.wind_direction != DIRECTION_NOT_AVAILABLE).then_some(self.wind_direction)
    }

    /// Sets the wind direction; values above 359 store the
    /// not-available sentinel.
    pub fn set_wind_direction(&mut self, direction: u16) {
        self.wind_direction = encode_direction(direction);
    }

    /// Dry bulb air temperature in degrees Celsius.
    pub fn air_temperature(&self) -> Option<f32> {
        (self.air_temperature != TEMPERATURE_NOT_AVAILABLE)
            .then(|| f32::from(self.air_temperature) / 10.0)
    }

    /// Sets the air temperature in degrees Celsius; NaN stores the
    /// not-available sentinel.
    pub fn set_air_temperature(&mut self, temperature: f32) {
        self.air_temperature = encode_tenths_i16(temperature);
    }

    /// Relative humidity in percent, `0..=100`.
    pub fn relative_humidity(&self) -> Option<u8> {
        (self.relative_humidity != HUMIDITY_NOT_AVAILABLE).then_some(self.relative_humidity)
    }

    /// Sets the relative humidity; values above 100 store the
    /// not-available sentinel.
    pub fn set_relative_humidity(&mut self, humidity: u8) {
        self.relative_humidity = if humidity > 100 {
            HUMIDITY_NOT_AVAILABLE
        } else {
            humidity
        };
    }

    /// Dew point in degrees Celsius.
    pub fn dew_point(&self) -> Option<f32> {
        (self.dew_point != TEMPERATURE_NOT_AVAILABLE).then(|| f32::from(self.dew_point) / 10.0)
    }

    /// Sets the dew point in degrees Celsius; NaN stores the
    /// not-available sentinel.
    pub fn set_dew_point(&mut self, dew_point: f32) {
        self.dew_point = encode_tenths_i16(dew_point);
    }

    /// Air pressure in hPa.
    pub fn air_pressure(&self) -> Option<u16> {
        (self.air_pressure != PRESSURE_NOT_AVAILABLE).then_some(self.air_pressure)
    }

    /// Sets the air pressure in hPa; values above 510 store the
    /// not-available sentinel.
    pub fn set_air_pressure(&mut self, pressure: u16) {
        self.air_pressure = if pressure >= PRESSURE_NOT_AVAILABLE {
            PRESSURE_NOT_AVAILABLE
        } else {
            pressure
        };
    }

    /// Air pressure tendency: 0 = steady, 1 = decreasing,
    /// 2 = increasing.
    pub fn air_pressure_tendency(&self) -> Option<u8> {
        (self.air_pressure_tendency != TENDENCY_NOT_AVAILABLE)
            .then_some(self.air_pressure_tendency)
    }

    /// Sets the air pressure tendency; values above 2 store the
    /// not-available sentinel.
    pub fn set_air_pressure_tendency(&mut self, tendency: u8) {
        self.air_pressure_tendency = if tendency > 2 {
            TENDENCY_NOT_AVAILABLE
        } else {
            tendency
        };
    }

    /// Horizontal visibility in nautical miles.
    pub fn horizontal_visibility(&self) -> Option<f32> {
        (self.horizontal_visibility != VISIBILITY_NOT_AVAILABLE)
            .then(|| f32::from(self.horizontal_visibility) / 10.0)
    }

    /// Sets the horizontal visibility in nautical miles; NaN and
    /// negative values store the not-available sentinel.
    pub fn set_horizontal_visibility(&mut self, visibility: f32) {
        self.horizontal_visibility = encode_tenths_u8(visibility, VISIBILITY_NOT_AVAILABLE);
    }

    /// Water level relative to local chart datum, in meters.
    pub fn water_level(&self) -> Option<f32> {
        (self.water_level != WATER_LEVEL_NOT_AVAILABLE)
            .then(|| f32::from(self.water_level) / 100.0)
    }

    /// Sets the water level in meters; NaN stores the not-available
    /// sentinel.
    pub fn set_water_level(&mut self, level: f32) {
        self.water_level = if level.is_nan() {
            WATER_LEVEL_NOT_AVAILABLE
        } else {
            (level * 100.0).round() as i16
        };
    }

    /// Water level trend: 0 = steady, 1 = decreasing, 2 = increasing.
    pub fn water_level_trend(&self) -> Option<u8> {
        (self.water_level_trend != TREND_NOT_AVAILABLE).then_some(self.water_level_trend)
    }

    /// Sets the water level trend; values above 2 store the
    /// not-available sentinel.
    pub fn set_water_level_trend(&mut self, trend: u8) {
        self.water_level_trend = if trend > 2 { TREND_NOT_AVAILABLE } else { trend };
    }

    /// Surface current speed in knots.
    pub fn surface_current_speed(&self) -> Option<f32> {
        (self.surface_current_speed != SPEED_NOT_AVAILABLE)
            .then(|| f32::from(self.surface_current_speed) / 10.0)
    }

    /// Sets the surface current speed in knots; NaN and negative values
    /// store the not-available sentinel.
    pub fn set_surface_current_speed(&mut self, speed: f32) {
        self.surface_current_speed = encode_tenths_u8(speed, SPEED_NOT_AVAILABLE);
    }

    /// Surface current direction in degrees true, `0..=359`.
    pub fn surface_current_direction(&self) -> Option<u16> {
        (self.surface_current_direction != DIRECTION_NOT_AVAILABLE)
            .then_some(self.surface_current_direction)
    }

    /// Sets the surface current direction; values above 359 store the
    /// not-available sentinel.
    pub fn set_surface_current_direction(&mut self, direction: u16) {
        self.surface_current_direction = encode_direction(direction);
    }

    /// Significant wave height in meters.
    pub fn wave_height(&self) -> Option<f32> {
        (self.wave_height != HEIGHT_NOT_AVAILABLE).then(|| f32::from(self.wave_height) / 10.0)
    }

    /// Sets the wave height in meters; NaN and negative values store
    /// the not-available sentinel.
    pub fn set_wave_height(&mut self, height: f32) {
        self.wave_height = encode_tenths_u8(height, HEIGHT_NOT_AVAILABLE);
    }

    /// Wave period in seconds.
    pub fn wave_period(&self) -> Option<u8> {
        (self.wave_period != PERIOD_NOT_AVAILABLE).then_some(self.wave_period)
    }

    /// Sets the wave period in seconds; values at or above 63 store the
    /// not-available sentinel.
    pub fn set_wave_period(&mut self, period: u8) {
        self.wave_period = if period >= PERIOD_NOT_AVAILABLE {
            PERIOD_NOT_AVAILABLE
        } else {
            period
        };
    }

    /// Wave direction in degrees true, `0..=359`.
    pub fn wave_direction(&self) -> Option<u16> {
        (self.wave_direction != DIRECTION_NOT_AVAILABLE).then_some(self.wave_direction)
    }

    /// Sets the wave direction; values above 359 store the
    /// not-available sentinel.
    pub fn set_wave_direction(&mut self, direction: u16) {
        self.wave_direction = encode_direction(direction);
    }

    /// Swell height in meters.
    pub fn swell_height(&self) -> Option<f32> {
        (self.swell_height != HEIGHT_NOT_AVAILABLE).then(|| f32::from(self.swell_height) / 10.0)
    }

    /// Sets the swell height in meters; NaN and negative values store
    /// the not-available sentinel.
    pub fn set_swell_height(&mut self, height: f32) {
        self.swell_height = encode_tenths_u8(height, HEIGHT_NOT_AVAILABLE);
    }

    /// Swell period in seconds.
    pub fn swell_period(&self) -> Option<u8> {
        (self.swell_period != PERIOD_NOT_AVAILABLE).then_some(self.swell_period)
    }

    /// Sets the swell period in seconds; values at or above 63 store
    /// the not-available sentinel.
    pub fn set_swell_period(&mut self, period: u8) {
        self.swell_period = if period >= PERIOD_NOT_AVAILABLE {
            PERIOD_NOT_AVAILABLE
        } else {
            period
        };
    }

    /// Swell direction in degrees true, `0..=359`.
    pub fn swell_direction(&self) -> Option<u16> {
        (self.swell_direction != DIRECTION_NOT_AVAILABLE).then_some(self.swell_direction)
    }

    /// Sets the swell direction; values above 359 store the
    /// not-available sentinel.
    pub fn set_swell_direction(&mut self, direction: u16) {
        self.swell_direction = encode_direction(direction);
    }

    /// Sea surface temperature in degrees Celsius.
    pub fn sea_temperature(&self) -> Option<f32> {
        (self.sea_temperature != TEMPERATURE_NOT_AVAILABLE)
            .then(|| f32::from(self.sea_temperature) / 10.0)
    }

    /// Sets the sea temperature in degrees Celsius; NaN stores the
    /// not-available sentinel.
    pub fn set_sea_temperature(&mut self, temperature: f32) {
        self.sea_temperature = encode_tenths_i16(temperature);
    }

    /// Precipitation type per the WMO table: 1 = rain,
    /// 2 = thunderstorm, 3 = freezing rain, 4 = mixed/ice, 5 = snow.
    pub fn precipitation_type(&self) -> Option<u8> {
        (self.precipitation_type != PRECIPITATION_NOT_AVAILABLE).then_some(self.precipitation_type)
    }

    /// Sets the precipitation type; values above 5 store the
    /// not-available sentinel.
    pub fn set_precipitation_type(&mut self, precipitation: u8) {
        self.precipitation_type = if precipitation > 5 {
            PRECIPITATION_NOT_AVAILABLE
        } else {
            precipitation
        };
    }

    /// Salinity in parts per thousand.
    pub fn salinity(&self) -> Option<f32> {
        (self.salinity != SALINITY_NOT_AVAILABLE).then(|| f32::from(self.salinity) / 10.0)
    }

    /// Sets the salinity in parts per thousand; NaN and negative values
    /// store the not-available sentinel.
    pub fn set_salinity(&mut self, salinity: f32) {
        self.salinity = if salinity.is_nan() || salinity < 0.0 {
            SALINITY_NOT_AVAILABLE
        } else {
            ((salinity * 10.0).round() as u16).min(SALINITY_NOT_AVAILABLE - 1)
        };
    }

    /// Ice presence: 0 = no, 1 = yes.
    pub fn ice(&self) -> Option<u8> {
        (self.ice != ICE_NOT_AVAILABLE).then_some(self.ice)
    }

    /// Sets the ice flag; values above 1 store the not-available
    /// sentinel.
    pub fn set_ice(&mut self, ice: u8) {
        self.ice = if ice > 1 { ICE_NOT_AVAILABLE } else { ice };
    }
}

impl Default for MeteorologicalData {
    fn default() -> MeteorologicalData {
        MeteorologicalData::new()
    }
}

fn encode_tenths_u16(value: f32, not_available: u16) -> u16 {
    if value.is_nan() || value < 0.0 {
        not_available
    } else {
        ((value * 10.0).round() as u16).min(not_available - 1)
    }
}

fn encode_tenths_u8(value: f32, not_available: u8) -> u8 {
    if value.is_nan() || value < 0.0 {
        not_available
    } else {
        (value * 10.0).round().min(f32::from(not_available) - 1.0) as u8
    }
}

fn encode_tenths_i16(value: f32) -> i16 {
    if value.is_nan() {
        TEMPERATURE_NOT_AVAILABLE
    } else {
        (value * 10.0).round() as i16
    }
}

fn encode_direction(direction: u16) -> u16 {
    if direction > 359 {
        DIRECTION_NOT_AVAILABLE
    } else {
        direction
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn payload_is_244_bits() {
        let data = MeteorologicalData::new();
        assert_eq!(data.to_payload().unwrap().len(), BIT_LENGTH);
    }

    #[test]
    fn only_wind_speed_set() {
        let mut data = MeteorologicalData::new();
        data.set_position(57.0, 11.0);
        data.set_wind_speed(15.5);

        let payload = data.to_payload().unwrap();
        let decoded = MeteorologicalData::from_payload(&payload).unwrap();

        let wind = decoded.wind_speed().unwrap();
        assert!((wind - 15.5).abs() < 0.1);

        assert_eq!(decoded.wind_gust(), None);
        assert_eq!(decoded.wind_direction(), None);
        assert_eq!(decoded.air_temperature(), None);
        assert_eq!(decoded.relative_humidity(), None);
        assert_eq!(decoded.dew_point(), None);
        assert_eq!(decoded.air_pressure(), None);
        assert_eq!(decoded.air_pressure_tendency(), None);
        assert_eq!(decoded.horizontal_visibility(), None);
        assert_eq!(decoded.water_level(), None);
        assert_eq!(decoded.water_level_trend(), None);
        assert_eq!(decoded.surface_current_speed(), None);
        assert_eq!(decoded.surface_current_direction(), None);
        assert_eq!(decoded.wave_height(), None);
        assert_eq!(decoded.wave_period(), None);
        assert_eq!(decoded.wave_direction(), None);
        assert_eq!(decoded.swell_height(), None);
        assert_eq!(decoded.swell_period(), None);
        assert_eq!(decoded.swell_direction(), None);
        assert_eq!(decoded.sea_temperature(), None);
        assert_eq!(decoded.precipitation_type(), None);
        assert_eq!(decoded.salinity(), None);
        assert_eq!(decoded.ice(), None);
    }

    #[test]
    fn full_observation_roundtrip() {
        let mut data = MeteorologicalData::new();
        data.set_position(61.8666, 28.8865);
        data.set_observation_time(16, 13, 50);
        data.set_wind_speed(12.3);
        data.set_wind_gust(18.0);
        data.set_wind_direction(245);
        data.set_air_temperature(-3.2);
        data.set_relative_humidity(87);
        data.set_dew_point(-5.0);
        data.set_air_pressure(290);
        data.set_air_pressure_tendency(1);
        data.set_horizontal_visibility(8.5);
        data.set_water_level(-0.42);
        data.set_water_level_trend(2);
        data.set_surface_current_speed(1.2);
        data.set_surface_current_direction(180);
        data.set_wave_height(2.4);
        data.set_wave_period(7);
        data.set_wave_direction(200);
        data.set_swell_height(1.1);
        data.set_swell_period(11);
        data.set_swell_direction(210);
        data.set_sea_temperature(4.5);
        data.set_precipitation_type(5);
        data.set_salinity(3.4);
        data.set_ice(0);

        let payload = data.to_payload().unwrap();
        let decoded = MeteorologicalData::from_payload(&payload).unwrap();
        assert_eq!(decoded, data);
        assert!((decoded.latitude() - 61.8666).abs() < 1e-4);
        assert!((decoded.longitude() - 28.8865).abs() < 1e-4);
        assert_eq!(decoded.day(), 16);
        assert!((decoded.air_temperature().unwrap() + 3.2).abs() < 0.05);
        assert!((decoded.water_level().unwrap() + 0.42).abs() < 0.005);
        assert_eq!(decoded.wind_direction(), Some(245));
        assert_eq!(decoded.precipitation_type(), Some(5));
        assert_eq!(decoded.ice(), Some(0));
    }

    #[test]
    fn out_of_domain_mutators_reset_to_not_available() {
        let mut data = MeteorologicalData::new();
        data.set_wind_direction(360);
        assert_eq!(data.wind_direction(), None);
        data.set_relative_humidity(101);
        assert_eq!(data.relative_humidity(), None);
        data.set_air_pressure_tendency(3);
        assert_eq!(data.air_pressure_tendency(), None);
        data.set_precipitation_type(6);
        assert_eq!(data.precipitation_type(), None);
        data.set_ice(2);
        assert_eq!(data.ice(), None);
        data.set_wind_speed(-1.0);
        assert_eq!(data.wind_speed(), None);
        data.set_air_temperature(f32::NAN);
        assert_eq!(data.air_temperature(), None);
    }

    #[test]
    fn negative_temperatures_roundtrip() {
        let mut data = MeteorologicalData::new();
        data.set_air_temperature(-60.0);
        data.set_sea_temperature(-2.0);
        let payload = data.to_payload().unwrap();
        let decoded = MeteorologicalData::from_payload(&payload).unwrap();
        assert!((decoded.air_temperature().unwrap() + 60.0).abs() < 0.05);
        assert!((decoded.sea_temperature().unwrap() + 2.0).abs() < 0.05);
    }

    #[test]
    fn broadcast_envelope() {
        let mut data = MeteorologicalData::new();
        data.set_position(59.0, 10.5);
        data.set_wind_speed(5.0);
        let message = data
            .to_broadcast_message(Mmsi::try_from(2655651).unwrap(), 0)
            .unwrap();
        assert_eq!(message.dac(), DAC_INTERNATIONAL);
        assert_eq!(message.fi(), FI_METEO_HYDRO_DATA);
        let back = MeteorologicalData::from_payload(message.data()).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn rejects_short_payload() {
        let mut bits = BitBuffer::new();
        bits.append_uint(0, 64).unwrap();
        assert_eq!(
            MeteorologicalData::from_payload(&bits),
            Err(DecodeError::MalformedBits)
        );
    }
}
