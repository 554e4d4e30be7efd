//! Radio platform interface
//!
//! The RNB service itself (radio protocol, framing, co-processor firmware)
//! lives behind the platform driver. The dispatcher only needs three calls
//! from it, captured by [`RadioPlatform`].
//!
//! - [`spi`]: adapter for RNB co-processors attached over SPI

pub mod spi;

/// Driver calls consumed by the RNB command dispatcher.
///
/// Each call blocks until the driver has finished. The dispatcher never
/// inspects `Error`; it is handed back to the caller unchanged.
pub trait RadioPlatform {
    /// Error reported by the driver
    type Error;

    /// Returns the platform's version string.
    fn version(&self) -> &str;

    /// Fills `buf` with the current status payload.
    ///
    /// Returns the number of payload bytes written to the front of `buf`.
    fn status(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Sends a request payload to the RNB service.
    fn send_request(&mut self, payload: &[u8]) -> Result<(), Self::Error>;
}

impl<P: RadioPlatform + ?Sized> RadioPlatform for &mut P {
    type Error = P::Error;

    fn version(&self) -> &str {
        (**self).version()
    }

    fn status(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).status(buf)
    }

    fn send_request(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
        (**self).send_request(payload)
    }
}
