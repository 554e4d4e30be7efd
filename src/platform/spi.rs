//! SPI transport for RNB co-processors
//!
//! Some boards run the RNB service on a dedicated radio co-processor and
//! reach it over SPI. [`SpiPlatform`] wraps the SPI device and implements
//! [`RadioPlatform`] on top of a small opcode set:
//!
//! | Opcode | Command | Parameters | Response |
//! |--------|---------|------------|----------|
//! | `0x01` | [`GetVersion`] | none | 32 bytes, NUL padded UTF-8 |
//! | `0x02` | [`GetStatusLength`] | none | `u16` big endian |
//! | `0x03` | [`SendRequest`] | `u16` big endian length | none |
//! | `0x0E` | write buffer | offset | payload bytes |
//! | `0x1E` | read buffer | offset, NOP | payload bytes |
//!
//! Payloads always travel through the co-processor's data buffer at offset 0.
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use rnb_cli::{platform::spi::{SpiError, SpiPlatform}, Dispatcher};
//!
//! fn make_dispatcher<SPI: SpiDevice>(spi: SPI) -> Result<Dispatcher<SpiPlatform<SPI>>, SpiError> {
//!     let platform = SpiPlatform::new(spi)?;
//!     Ok(Dispatcher::new(platform))
//! }
//! ```

use core::{convert::Infallible, fmt};

use regiface::{
    errors::Error as RegifaceError, ByteArray, Command, FromByteArray, NoParameters, ToByteArray,
};

use crate::{error::Status, platform::RadioPlatform};

/// Size of the fixed version response
pub const VERSION_LEN: usize = 32;

const WRITE_BUFFER: u8 = 0x0E;
const READ_BUFFER: u8 = 0x1E;

/// Error type for the SPI transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiError {
    /// The SPI transaction failed
    Bus,
    /// The co-processor returned a response that could not be decoded
    Deserialization,
    /// A payload does not fit the caller's buffer or the 16-bit length field
    Overflow,
}

impl From<RegifaceError> for SpiError {
    fn from(err: RegifaceError) -> Self {
        match err {
            RegifaceError::BusError => Self::Bus,
            _ => Self::Deserialization,
        }
    }
}

impl From<SpiError> for Status {
    fn from(err: SpiError) -> Self {
        match err {
            SpiError::Bus => Status::Failed,
            SpiError::Deserialization => Status::Parse,
            SpiError::Overflow => Status::NoBufs,
        }
    }
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => f.write_str("SPI bus error"),
            Self::Deserialization => f.write_str("malformed co-processor response"),
            Self::Overflow => f.write_str("payload too large"),
        }
    }
}

/// Raw version response
///
/// The version string is left aligned and padded with NUL bytes.
#[derive(Debug, Clone, Copy)]
pub struct VersionResponse {
    /// Response bytes as received
    pub bytes: [u8; VERSION_LEN],
}

impl FromByteArray for VersionResponse {
    type Error = Infallible;
    type Array = [u8; VERSION_LEN];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { bytes })
    }
}

/// Payload length field, big endian on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadLength(pub u16);

impl FromByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(u16::from_be_bytes(bytes)))
    }
}

impl ToByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.0.to_be_bytes())
    }
}

/// GetVersion command (0x01)
///
/// Returns the co-processor firmware version string.
#[derive(Debug, Clone)]
pub struct GetVersion;

impl Command for GetVersion {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = VersionResponse;

    fn id() -> Self::IdType {
        0x01
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// GetStatusLength command (0x02)
///
/// Latches the current status payload into the data buffer and returns its
/// length. The payload is then fetched with a buffer read from offset 0.
#[derive(Debug, Clone)]
pub struct GetStatusLength;

impl Command for GetStatusLength {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = PayloadLength;

    fn id() -> Self::IdType {
        0x02
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// SendRequest command (0x03)
///
/// Hands the first `length` bytes of the data buffer to the RNB service.
/// The payload must already have been written at offset 0.
#[derive(Debug, Clone)]
pub struct SendRequest {
    /// Number of payload bytes in the data buffer
    pub length: u16,
}

impl Command for SendRequest {
    type IdType = u8;
    type CommandParameters = PayloadLength;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x03
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        PayloadLength(self.length)
    }
}

/// RNB platform reached over SPI.
///
/// The version string is read once when the platform is created and cached,
/// since it cannot change while the co-processor is running.
pub struct SpiPlatform<SPI> {
    spi: SPI,
    version: [u8; VERSION_LEN],
    version_len: usize,
}

impl<SPI> SpiPlatform<SPI> {
    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> SpiPlatform<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    /// Creates the platform and reads the co-processor version.
    ///
    /// # Errors
    /// * `SpiError::Bus` - SPI communication failed
    /// * `SpiError::Deserialization` - the version is not valid UTF-8
    pub fn new(spi: SPI) -> Result<Self, SpiError> {
        let mut platform = Self {
            spi,
            version: [0; VERSION_LEN],
            version_len: 0,
        };

        let VersionResponse { bytes } = platform.execute_command(GetVersion)?;
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(VERSION_LEN);
        core::str::from_utf8(&bytes[..len]).map_err(|_| SpiError::Deserialization)?;

        platform.version = bytes;
        platform.version_len = len;
        debug!("rnb: co-processor version has {} bytes", len);

        Ok(platform)
    }

    /// Writes bytes to the co-processor's data buffer at `offset`.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn write_buffer(&mut self, offset: u8, bytes: &[u8]) -> Result<(), RegifaceError> {
        let header = &[WRITE_BUFFER, offset];

        self.spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(header.as_slice()),
                embedded_hal::spi::Operation::Write(bytes),
            ])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Reads bytes from the co-processor's data buffer starting at `offset`.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    pub fn read_buffer(&mut self, offset: u8, bytes: &mut [u8]) -> Result<(), RegifaceError> {
        let header = &[READ_BUFFER, offset, 0x00];

        self.spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(header.as_slice()),
                embedded_hal::spi::Operation::Read(bytes),
            ])
            .map_err(|_| RegifaceError::BusError)
    }

    /// Executes a command on the co-processor.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    /// * `RegifaceError::DeserializationError` - failed to parse the response
    pub fn execute_command<C>(&mut self, command: C) -> Result<C::ResponseParameters, RegifaceError>
    where
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        let request = match command.invoking_parameters().to_bytes() {
            Ok(request) => request,
            Err(never) => match never {},
        };
        let mut raw_response = <C::ResponseParameters as FromByteArray>::Array::new();

        self.spi
            .transaction(&mut [
                embedded_hal::spi::Operation::Write(&[C::id()]),
                embedded_hal::spi::Operation::Write(request.as_ref()),
                embedded_hal::spi::Operation::Read(raw_response.as_mut()),
            ])
            .map_err(|_| RegifaceError::BusError)?;

        C::ResponseParameters::from_bytes(raw_response)
            .map_err(|_| RegifaceError::DeserializationError)
    }
}

impl<SPI> RadioPlatform for SpiPlatform<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    type Error = SpiError;

    fn version(&self) -> &str {
        core::str::from_utf8(&self.version[..self.version_len]).unwrap_or_default()
    }

    fn status(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let PayloadLength(len) = self.execute_command(GetStatusLength)?;
        let payload = buf.get_mut(..usize::from(len)).ok_or(SpiError::Overflow)?;

        self.read_buffer(0, payload)?;
        Ok(payload.len())
    }

    fn send_request(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
        let length = u16::try_from(payload.len()).map_err(|_| SpiError::Overflow)?;

        self.write_buffer(0, payload)?;
        self.execute_command(SendRequest { length })?;
        Ok(())
    }
}
