use core::fmt;

/// Driver errors.
///
/// `O` is the error the [`BusProvider`](crate::BusProvider) reports when the bus can't be
/// acquired, `E` is the error type of the I2C bus itself.
#[derive(Debug, PartialEq)]
pub enum Error<O, E> {
    /// The bus could not be acquired: missing device, no permission, or already claimed.
    BusOpen(O),
    /// A write or read on the bus failed (NACK, timeout, short transfer).
    BusIo(E),
    /// A response word failed CRC validation. The whole response is discarded.
    ChecksumMismatch,
}

impl<O, E> Error<O, E> {
    /// True if re-running the whole operation might succeed.
    ///
    /// Opening the bus is not expected to start working without someone fixing the system, but
    /// bus glitches and corrupted responses are usually transient.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Error::BusIo(_) | Error::ChecksumMismatch)
    }
}

impl<O, E> From<ChecksumMismatch> for Error<O, E> {
    fn from(_: ChecksumMismatch) -> Self {
        Error::ChecksumMismatch
    }
}

impl<O: fmt::Debug, E: fmt::Debug> fmt::Display for Error<O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BusOpen(e) => write!(f, "could not open the I2C bus: {:?}", e),
            Error::BusIo(e) => write!(f, "I2C transfer failed: {:?}", e),
            Error::ChecksumMismatch => f.write_str("sensor response failed CRC validation"),
        }
    }
}

impl<O: fmt::Debug, E: fmt::Debug> core::error::Error for Error<O, E> {}

/// A response word whose CRC byte didn't match its two data bytes.
///
/// Returned by the decoding functions in [`codec`](crate::codec), and turned into
/// [`Error::ChecksumMismatch`] by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "use-defmt", derive(defmt::Format))]
pub struct ChecksumMismatch;

#[cfg(test)]
mod tests {
    use super::{ChecksumMismatch, Error};

    #[test]
    fn retriable_errors() {
        assert!(!Error::<(), ()>::BusOpen(()).is_retriable());
        assert!(Error::<(), ()>::BusIo(()).is_retriable());
        assert!(Error::<(), ()>::ChecksumMismatch.is_retriable());
    }

    #[test]
    fn checksum_mismatch_converts() {
        let err: Error<(), ()> = ChecksumMismatch.into();
        assert_eq!(err, Error::ChecksumMismatch);
    }
}
