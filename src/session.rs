//! Acquiring the I2C bus and talking to the sensor over it.
//!
//! The bus is opened for one operation and closed again straight after, on every path. A
//! [`BusProvider`] hands out the bus, [`BusSession`] remembers which bus and address to ask for,
//! and [`OpenSession`] is the open bus itself. An `OpenSession` has to be given back with
//! [`OpenSession::close`], which consumes it, so a session can't be closed twice.
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorType, I2c};

use crate::config::Address;
use crate::error::Error;

/// Where an I2C bus comes from.
///
/// `open` is called once at the start of every driver operation and `close` once at the end,
/// whether the operation worked or not.
pub trait BusProvider {
    /// The open bus.
    type Bus: I2c;
    /// Why the bus couldn't be opened.
    type Error;

    /// Acquire bus `bus_id` for talking to the sensor at `address`.
    fn open(&mut self, bus_id: u8, address: Address) -> Result<Self::Bus, Self::Error>;

    /// Release a bus previously returned from `open`.
    fn close(&mut self, bus: Self::Bus);
}

/// Error type of the bus a provider hands out.
pub type BusError<P> = <<P as BusProvider>::Bus as ErrorType>::Error;

/// Error type of every operation on a session over provider `P`.
pub type SessionError<P> = Error<<P as BusProvider>::Error, BusError<P>>;

/// A [`BusProvider`] for a bus you already have, like a HAL's I2C peripheral.
///
/// The bus is lent to one session at a time. Asking for it while it's lent out fails with
/// [`BusInUse`]. The bus id is ignored as there is only the one bus.
pub struct ExclusiveBus<I> {
    bus: Option<I>,
}

/// The bus is already claimed by another session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct BusInUse;

impl<I: I2c> ExclusiveBus<I> {
    pub fn new(bus: I) -> Self {
        ExclusiveBus { bus: Some(bus) }
    }

    /// Get the bus back. `None` if it's still lent out.
    pub fn release(self) -> Option<I> {
        self.bus
    }
}

impl<I: I2c> BusProvider for ExclusiveBus<I> {
    type Bus = I;
    type Error = BusInUse;

    fn open(&mut self, _bus_id: u8, _address: Address) -> Result<I, BusInUse> {
        self.bus.take().ok_or(BusInUse)
    }

    fn close(&mut self, bus: I) {
        self.bus = Some(bus);
    }
}

/// Opens `/dev/i2c-<bus_id>` for every operation.
#[cfg(feature = "linux")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxBus;

#[cfg(feature = "linux")]
impl BusProvider for LinuxBus {
    type Bus = linux_embedded_hal::I2cdev;
    type Error = linux_embedded_hal::i2cdev::linux::LinuxI2CError;

    fn open(&mut self, bus_id: u8, _address: Address) -> Result<Self::Bus, Self::Error> {
        linux_embedded_hal::I2cdev::new(std::format!("/dev/i2c-{}", bus_id))
    }

    fn close(&mut self, bus: Self::Bus) {
        // Dropping the I2cdev closes the file descriptor.
        drop(bus);
    }
}

/// A closed bus session: which bus, which sensor, and what to wait with.
///
/// Can be opened and closed any number of times, but only one [`OpenSession`] can exist at a
/// time since it borrows the session mutably.
pub struct BusSession<P, D> {
    provider: P,
    delay: D,
    bus_id: u8,
    address: Address,
}

impl<P, D> BusSession<P, D>
where
    P: BusProvider,
    D: DelayNs,
{
    pub fn new(provider: P, delay: D, bus_id: u8, address: Address) -> Self {
        BusSession {
            provider,
            delay,
            bus_id,
            address,
        }
    }

    pub fn bus_id(&self) -> u8 {
        self.bus_id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Acquire the bus. The returned session must be closed with [`OpenSession::close`].
    pub fn open(&mut self) -> Result<OpenSession<'_, P, D>, SessionError<P>> {
        let bus = self
            .provider
            .open(self.bus_id, self.address)
            .map_err(Error::BusOpen)?;
        trace!("opened bus {} for sensor {:#04x}", self.bus_id, self.address.addr());

        Ok(OpenSession {
            provider: &mut self.provider,
            delay: &mut self.delay,
            bus: Some(bus),
            address: self.address.addr(),
        })
    }

    /// Destroys this session and gives back the provider and delay.
    pub fn destroy(self) -> (P, D) {
        (self.provider, self.delay)
    }
}

/// An open bus to one sensor.
///
/// Close it with [`OpenSession::close`]. If it is dropped without that, for example while
/// unwinding from a panicking bus, the bus is still given back to the provider. Either way it
/// is given back exactly once.
#[must_use = "an open session has to be closed to release the bus"]
pub struct OpenSession<'s, P: BusProvider, D> {
    provider: &'s mut P,
    delay: &'s mut D,
    // Only `None` once released.
    bus: Option<P::Bus>,
    address: u8,
}

impl<P, D> OpenSession<'_, P, D>
where
    P: BusProvider,
    D: DelayNs,
{
    /// Send bytes that don't have an answer.
    pub fn write(&mut self, bytes: &[u8]) -> Result<(), SessionError<P>> {
        trace!("sending {:#04x} to {:#04x}", bytes, self.address);
        let address = self.address;
        self.bus().write(address, bytes).map_err(Error::BusIo)
    }

    /// Send `bytes`, wait `settle_us` microseconds, then fill `response`.
    ///
    /// This is a write, a stop and a separate read rather than a repeated start: without clock
    /// stretching the sensor NACKs the read until it's done, so the wait has to sit between
    /// the two transfers.
    pub fn write_then_read(
        &mut self,
        bytes: &[u8],
        response: &mut [u8],
        settle_us: u32,
    ) -> Result<(), SessionError<P>> {
        self.write(bytes)?;
        self.settle(settle_us);
        let address = self.address;
        self.bus().read(address, response).map_err(Error::BusIo)
    }

    /// Block for `us` microseconds.
    pub fn settle(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    /// Give the bus back to the provider.
    pub fn close(mut self) {
        self.release();
    }

    fn bus(&mut self) -> &mut P::Bus {
        match self.bus.as_mut() {
            Some(bus) => bus,
            // The bus is only taken by `close` and `drop`, which both end the session.
            None => unreachable!("open session without a bus"),
        }
    }
}

impl<P: BusProvider, D> OpenSession<'_, P, D> {
    fn release(&mut self) {
        if let Some(bus) = self.bus.take() {
            trace!("closing bus for sensor {:#04x}", self.address);
            self.provider.close(bus);
        }
    }
}

impl<P: BusProvider, D> Drop for OpenSession<'_, P, D> {
    fn drop(&mut self) {
        self.release();
    }
}
