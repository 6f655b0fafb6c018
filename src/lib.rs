#![cfg_attr(not(any(test, feature = "linux")), no_std)]
//! SHT31 driver.
//!
//! Example:
//!
//!     # use embedded_hal_mock::eh1::delay::NoopDelay;
//!     # use embedded_hal_mock::eh1::i2c::Mock as I2cMock;
//!     # use embedded_hal_mock::eh1::i2c::Transaction;
//!     # use sht31_driver::checksum::compute;
//!     use sht31_driver::{Config, ExclusiveBus, Sht31};
//!     # // 0x6666 is ~25C, 0x8000 is ~50%RH.
//!     # let expectations = vec![
//!     #     Transaction::write(0x44, vec![0x24, 0x00]),
//!     #     Transaction::read(
//!     #         0x44,
//!     #         vec![0x66, 0x66, compute(&[0x66, 0x66]), 0x80, 0x00, compute(&[0x80, 0x00])],
//!     #     ),
//!     # ];
//!     # let i2c = I2cMock::new(&expectations);
//!     # let delay = NoopDelay::new();
//!     let mut sht31 = Sht31::new(ExclusiveBus::new(i2c), delay, 1, Config::default());
//!     let measurement = sht31.read_values().unwrap();
//!
//!     println!("temperature (sht31): {:.2}C", measurement.temperature);
//!     println!("humidity (sht31): {:.2}%", measurement.humidity);
//!     # let (bus, _) = sht31.destroy();
//!     # bus.release().unwrap().done();
//!
//! [SHT3x-DIS Datasheet](https://sensirion.com/media/documents/213E6A3B/63A5A569/Datasheet_SHT3x_DIS.pdf)
//!
//! Every operation is one complete transaction against the sensor. Nothing is cached between
//! operations, so any of them can simply be retried after an error:
//!
//! ```text
//!          BusProvider::open  ──► Error::BusOpen
//!                  │
//!                  ▼
//!       Command (2 bytes, MSB first)
//!                  │
//!                  ▼
//!      Wait conversion / settle time
//!                  │
//!                  ▼
//!    Read 3 bytes per word (2 data + CRC)  ──► Error::BusIo
//!                  │
//!                  ▼
//!           CRC good per word  ──► No ──► Error::ChecksumMismatch
//!                  │
//!                  ▼
//!         BusProvider::close   (always, also on errors)
//!                  │
//!                  ▼
//!            Decoded value
//! ```
//!
//! The driver never retries on its own. [`Error::is_retriable`] tells you which failures are
//! worth another attempt.
mod fmt;

pub mod checksum;
pub mod codec;
pub mod config;
pub mod error;
pub mod session;

use embedded_hal::delay::DelayNs;

pub use codec::{Command, Measurement, SerialNumber, StatusWord};
pub use config::{Address, Config, Repeatability};
pub use error::{ChecksumMismatch, Error};
#[cfg(feature = "linux")]
pub use session::LinuxBus;
pub use session::{BusInUse, BusProvider, BusSession, ExclusiveBus, OpenSession, SessionError};

/// An SHT31 sensor on the bus handed out by `P`.
///
/// The bus is only held while an operation runs. Each method opens it, does its work, and
/// closes it again before returning, also when something went wrong.
pub struct Sht31<P, D> {
    session: BusSession<P, D>,
    config: Config,
}

impl<P, D> Sht31<P, D>
where
    P: BusProvider,
    D: DelayNs,
{
    /// Creates the SHT31 driver for the sensor on bus `bus_id`.
    ///
    /// Nothing is sent to the sensor until the first operation.
    pub fn new(provider: P, delay: D, bus_id: u8, config: Config) -> Self {
        Sht31 {
            session: BusSession::new(provider, delay, bus_id, config.address),
            config,
        }
    }

    /// The configuration the driver was created with.
    pub fn config(&self) -> Config {
        self.config
    }

    /// Open the bus, run `op` on it, and close the bus again no matter how `op` went.
    fn framed<T>(
        &mut self,
        op: impl FnOnce(&mut OpenSession<'_, P, D>) -> Result<T, SessionError<P>>,
    ) -> Result<T, SessionError<P>> {
        let mut session = self.session.open()?;
        let result = op(&mut session);
        session.close();
        result
    }

    /// Measure temperature and humidity.
    ///
    /// Takes one single-shot measurement with the configured repeatability. This blocks for the
    /// conversion time: up to 16ms with high repeatability.
    pub fn read_values(&mut self) -> Result<Measurement, SessionError<P>> {
        let command = Command::measure(self.config.repeatability, self.config.clock_stretching);
        let measurement = self.framed(|session| {
            let mut raw = [0u8; 6];
            session.write_then_read(&command.encode(), &mut raw, command.settle_time_us())?;
            Ok(codec::decode_measurement(raw)?)
        })?;
        debug!("measured {}C {}%RH", measurement.temperature, measurement.humidity);
        Ok(measurement)
    }

    /// Read the status register.
    pub fn read_status(&mut self) -> Result<StatusWord, SessionError<P>> {
        let command = Command::ReadStatus;
        self.framed(|session| {
            let mut raw = [0u8; 3];
            session.write_then_read(&command.encode(), &mut raw, command.settle_time_us())?;
            Ok(codec::decode_status(raw)?)
        })
    }

    /// Turn the built-in heater on or off.
    ///
    /// The heater is only for plausibility checks and removing condensation. It raises the
    /// temperature reading by a few degrees while on.
    pub fn control_heater(&mut self, enabled: bool) -> Result<(), SessionError<P>> {
        debug!("heater enabled: {}", enabled);
        self.send(Command::heater(enabled))
    }

    /// Read the sensor's serial number.
    pub fn read_serial_number(&mut self) -> Result<SerialNumber, SessionError<P>> {
        let command = Command::read_serial(self.config.clock_stretching);
        self.framed(|session| {
            // Two words, each with its own CRC. High word first.
            let mut raw = [0u8; 6];
            session.write_then_read(&command.encode(), &mut raw, command.settle_time_us())?;
            Ok(codec::decode_serial(
                [raw[0], raw[1], raw[2]],
                [raw[3], raw[4], raw[5]],
            )?)
        })
    }

    /// Send the Soft Reset command to the sensor.
    ///
    /// The sensor reloads its calibration and clears the heater. This waits out the reset time
    /// before returning so the next operation can go ahead immediately.
    pub fn soft_reset(&mut self) -> Result<(), SessionError<P>> {
        debug!("soft reset");
        self.send(Command::SoftReset)
    }

    /// Clear the alert and reset-detected flags in the status register.
    pub fn clear_status(&mut self) -> Result<(), SessionError<P>> {
        self.send(Command::ClearStatus)
    }

    /// Send a command that has no answer, then give the sensor time to act on it.
    fn send(&mut self, command: Command) -> Result<(), SessionError<P>> {
        self.framed(|session| {
            session.write(&command.encode())?;
            session.settle(command.settle_time_us());
            Ok(())
        })
    }

    /// Destroys this driver and gives back the bus provider and delay.
    pub fn destroy(self) -> (P, D) {
        self.session.destroy()
    }
}
