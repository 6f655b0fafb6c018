/// The two I2C addresses an SHT31 can be strapped to.
///
/// Datasheet section 3.2, Table 7: the ADDR pin selects between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Address {
    /// ADDR pin connected to logic low. 0x44.
    #[default]
    Address0 = 0b0100_0100,
    /// ADDR pin connected to logic high. 0x45.
    Address1 = 0b0100_0101,
}

impl Address {
    /// The 7-bit bus address.
    pub fn addr(self) -> u8 {
        self as u8
    }
}

/// Repeatability of a single-shot measurement.
///
/// Higher repeatability means less noise but a longer conversion, see
/// [`Command::settle_time_us`](crate::Command::settle_time_us).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub enum Repeatability {
    #[default]
    High,
    Medium,
    Low,
}

/// How the driver talks to the sensor.
///
/// The defaults match the usual wiring: ADDR pulled low, high repeatability and no clock
/// stretching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct Config {
    pub address: Address,
    pub repeatability: Repeatability,
    /// Let the sensor hold SCL low until the result is ready instead of NACKing reads. Only
    /// enable this if the bus master supports clock stretching.
    pub clock_stretching: bool,
}

impl Config {
    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_repeatability(mut self, repeatability: Repeatability) -> Self {
        self.repeatability = repeatability;
        self
    }

    pub fn with_clock_stretching(mut self, clock_stretching: bool) -> Self {
        self.clock_stretching = clock_stretching;
        self
    }
}
