//! Command words going to the sensor and the values coming back.
//!
//! Every command is a 16-bit word sent MSB first. Every response is a sequence of 16-bit words,
//! each followed by its own CRC byte:
//!
//! ```text
//! ┌──────────┬──────────┬─────┬──────────┬──────────┬─────┐
//! │ word MSB │ word LSB │ CRC │ word MSB │ word LSB │ CRC │ ...
//! └──────────┴──────────┴─────┴──────────┴──────────┴─────┘
//! ```
//!
//! A word is only interpreted once its CRC has been checked, and one bad word throws away the
//! whole response.
use crate::checksum;
use crate::config::Repeatability;
use crate::error::ChecksumMismatch;

/// Minimum time between sending a command and reading its answer, or sending the next command.
pub const COMMAND_IDLE_US: u32 = 1_000;
/// Soft reset takes at most 1.5ms (datasheet Table 4), wait a bit longer.
pub const SOFT_RESET_US: u32 = 2_000;
/// Maximum single-shot conversion times, datasheet Table 4, rounded up.
pub const MEASUREMENT_HIGH_US: u32 = 16_000;
pub const MEASUREMENT_MEDIUM_US: u32 = 7_000;
pub const MEASUREMENT_LOW_US: u32 = 5_000;

/// Commands that can be sent to the SHT31.
///
/// These can be found in the datasheet, section 4. There are more commands (periodic
/// acquisition, ART, break) but the driver only does single-shot measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Command {
    // Single-shot measurements with clock stretching enabled, Table 9.
    MeasureHighStretch = 0x2C06,
    MeasureMediumStretch = 0x2C0D,
    MeasureLowStretch = 0x2C10,
    // Single-shot measurements with clock stretching disabled. The sensor NACKs reads until the
    // result is ready.
    MeasureHigh = 0x2400,
    MeasureMedium = 0x240B,
    MeasureLow = 0x2416,
    /// Read the 16-bit status register, Table 17.
    ReadStatus = 0xF32D,
    /// Clear the alert and reset-detected flags in the status register.
    ClearStatus = 0x3041,
    /// Reset the sensor without power cycling it.
    SoftReset = 0x30A2,
    HeaterEnable = 0x306D,
    HeaterDisable = 0x3066,
    /// Read the 32-bit serial number as two words. Not in every datasheet revision, see the
    /// Sensirion "SHT3x electronic identification code" application note.
    ReadSerial = 0x3780,
    ReadSerialStretch = 0x3682,
}

impl Command {
    /// Every command the driver knows about.
    pub const ALL: [Command; 13] = [
        Command::MeasureHighStretch,
        Command::MeasureMediumStretch,
        Command::MeasureLowStretch,
        Command::MeasureHigh,
        Command::MeasureMedium,
        Command::MeasureLow,
        Command::ReadStatus,
        Command::ClearStatus,
        Command::SoftReset,
        Command::HeaterEnable,
        Command::HeaterDisable,
        Command::ReadSerial,
        Command::ReadSerialStretch,
    ];

    /// Pick the single-shot measurement command.
    pub fn measure(repeatability: Repeatability, clock_stretching: bool) -> Self {
        match (repeatability, clock_stretching) {
            (Repeatability::High, true) => Command::MeasureHighStretch,
            (Repeatability::Medium, true) => Command::MeasureMediumStretch,
            (Repeatability::Low, true) => Command::MeasureLowStretch,
            (Repeatability::High, false) => Command::MeasureHigh,
            (Repeatability::Medium, false) => Command::MeasureMedium,
            (Repeatability::Low, false) => Command::MeasureLow,
        }
    }

    pub fn read_serial(clock_stretching: bool) -> Self {
        if clock_stretching {
            Command::ReadSerialStretch
        } else {
            Command::ReadSerial
        }
    }

    pub fn heater(enabled: bool) -> Self {
        if enabled {
            Command::HeaterEnable
        } else {
            Command::HeaterDisable
        }
    }

    /// The two bytes to put on the wire, MSB first.
    pub fn encode(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    /// Look up the command a wire word stands for.
    pub fn from_wire(bytes: [u8; 2]) -> Option<Self> {
        let code = u16::from_be_bytes(bytes);
        Self::ALL.iter().copied().find(|command| *command as u16 == code)
    }

    /// How long to wait after sending this command before the sensor has a valid answer (or
    /// will accept the next command).
    pub fn settle_time_us(self) -> u32 {
        match self {
            Command::MeasureHighStretch | Command::MeasureHigh => MEASUREMENT_HIGH_US,
            Command::MeasureMediumStretch | Command::MeasureMedium => MEASUREMENT_MEDIUM_US,
            Command::MeasureLowStretch | Command::MeasureLow => MEASUREMENT_LOW_US,
            Command::SoftReset => SOFT_RESET_US,
            _ => COMMAND_IDLE_US,
        }
    }
}

/// A single temperature and humidity reading.
///
/// You get:
/// * temperature in degrees Celsius.
/// * humidity in % Relative Humidity, always within 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct Measurement {
    pub temperature: f32,
    pub humidity: f32,
}

impl Measurement {
    /// Convert the raw sensor words, datasheet section 4.13 "Conversion of Signal Output".
    ///
    /// T = -45 + 175 * raw / (2^16 - 1)
    /// RH = 100 * raw / (2^16 - 1)
    pub fn from_raw(raw_temperature: u16, raw_humidity: u16) -> Self {
        let temperature = -45.0 + 175.0 * (raw_temperature as f32 / 65535.0);
        let humidity = 100.0 * (raw_humidity as f32 / 65535.0);

        Measurement {
            temperature,
            humidity: humidity.clamp(0.0, 100.0),
        }
    }

    pub fn fahrenheit(&self) -> f32 {
        self.temperature * 1.8 + 32.0
    }
}

impl From<Measurement> for (f32, f32) {
    fn from(measurement: Measurement) -> Self {
        (measurement.temperature, measurement.humidity)
    }
}

/// Snapshot of the sensor's status register.
///
/// Datasheet Table 17. Bits not listed there are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct StatusWord(pub u16);

impl StatusWord {
    pub const ALERT_PENDING: u16 = 1 << 15;
    pub const HEATER_ON: u16 = 1 << 13;
    pub const HUMIDITY_ALERT: u16 = 1 << 11;
    pub const TEMPERATURE_ALERT: u16 = 1 << 10;
    pub const RESET_DETECTED: u16 = 1 << 4;
    pub const COMMAND_FAILED: u16 = 1 << 1;
    pub const WRITE_CHECKSUM_FAILED: u16 = 1 << 0;

    pub fn bits(self) -> u16 {
        self.0
    }

    /// At least one tracking alert is pending.
    pub fn alert_pending(self) -> bool {
        self.is_set(Self::ALERT_PENDING)
    }

    pub fn heater_active(self) -> bool {
        self.is_set(Self::HEATER_ON)
    }

    pub fn humidity_alert(self) -> bool {
        self.is_set(Self::HUMIDITY_ALERT)
    }

    pub fn temperature_alert(self) -> bool {
        self.is_set(Self::TEMPERATURE_ALERT)
    }

    /// The sensor was reset (power on, soft reset or reset pin) since the last clear status.
    pub fn reset_detected(self) -> bool {
        self.is_set(Self::RESET_DETECTED)
    }

    /// The last command wasn't processed, it was invalid or failed its own checksum.
    pub fn command_failed(self) -> bool {
        self.is_set(Self::COMMAND_FAILED)
    }

    /// The checksum of the last write transfer was wrong.
    pub fn write_checksum_failed(self) -> bool {
        self.is_set(Self::WRITE_CHECKSUM_FAILED)
    }

    fn is_set(self, bit: u16) -> bool {
        self.0 & bit != 0
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        status.0
    }
}

/// The sensor's unique 32-bit serial number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct SerialNumber(pub u32);

impl SerialNumber {
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<SerialNumber> for u32 {
    fn from(serial: SerialNumber) -> Self {
        serial.0
    }
}

/// Check the CRC of one response group and return its word.
fn checked_word(group: [u8; 3]) -> Result<u16, ChecksumMismatch> {
    let data = [group[0], group[1]];
    if !checksum::verify(data, group[2]) {
        warn!("CRC mismatch on word {:#06x}, got {:#04x}", u16::from_be_bytes(data), group[2]);
        return Err(ChecksumMismatch);
    }
    Ok(u16::from_be_bytes(data))
}

/// Decode the 6-byte answer to a measurement command: temperature word, CRC, humidity word, CRC.
pub fn decode_measurement(raw: [u8; 6]) -> Result<Measurement, ChecksumMismatch> {
    let raw_temperature = checked_word([raw[0], raw[1], raw[2]])?;
    let raw_humidity = checked_word([raw[3], raw[4], raw[5]])?;
    Ok(Measurement::from_raw(raw_temperature, raw_humidity))
}

/// Decode the 3-byte answer to [`Command::ReadStatus`].
pub fn decode_status(raw: [u8; 3]) -> Result<StatusWord, ChecksumMismatch> {
    checked_word(raw).map(StatusWord)
}

/// Decode the two groups of the serial number answer, high word first.
///
/// Both words are checked before either is used.
pub fn decode_serial(high: [u8; 3], low: [u8; 3]) -> Result<SerialNumber, ChecksumMismatch> {
    let high = checked_word(high)?;
    let low = checked_word(low)?;
    Ok(SerialNumber((high as u32) << 16 | low as u32))
}
