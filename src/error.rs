//! Error types
//!
//! Every failure the dispatcher can report falls into one of four groups:
//! - wrong number of arguments ([`Error::InvalidArgs`])
//! - an unknown subcommand ([`Error::InvalidCommand`])
//! - malformed numeric or hex text ([`Error::Parse`])
//! - a failure reported by the radio platform ([`Error::Platform`])
//!
//! The interpreter reports these to the user as a numeric [`Status`] code,
//! using the same values as the rest of the networking stack's shell.

use core::fmt;

/// Error type for argument text that could not be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Empty text or a character that is not a digit
    InvalidNumber,
    /// The number does not fit in the target integer type
    Overflow,
    /// A character that is not a hexadecimal digit
    InvalidHex,
    /// The hex string decodes to a different number of bytes than requested
    LengthMismatch,
    /// The requested length is larger than the receive buffer
    BufferTooSmall,
    /// The command line holds more tokens than there are argument slots
    TooManyArgs,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidNumber => "invalid number",
            Self::Overflow => "number out of range",
            Self::InvalidHex => "invalid hex digit",
            Self::LengthMismatch => "hex string length does not match",
            Self::BufferTooSmall => "payload exceeds receive buffer",
            Self::TooManyArgs => "too many arguments",
        };
        f.write_str(msg)
    }
}

/// Error returned by the command dispatcher
///
/// `E` is the error type of the underlying [`RadioPlatform`](crate::RadioPlatform)
/// and is passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Arguments were missing, or more were supplied than the command takes
    InvalidArgs,
    /// The first token does not name a known command
    InvalidCommand,
    /// An argument could not be parsed
    Parse(ParseError),
    /// The platform driver reported a failure
    Platform(E),
}

impl<E> From<ParseError> for Error<E> {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl<E> Error<E> {
    /// Maps this error to the status code shown to the shell user.
    ///
    /// Parse failures report [`Status::InvalidArgs`], matching how the
    /// shell's own argument parsers report them.
    pub fn status(&self) -> Status
    where
        E: Clone + Into<Status>,
    {
        match self {
            Self::InvalidArgs | Self::Parse(_) => Status::InvalidArgs,
            Self::InvalidCommand => Status::InvalidCommand,
            Self::Platform(err) => err.clone().into(),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgs => f.write_str("invalid arguments"),
            Self::InvalidCommand => f.write_str("invalid command"),
            Self::Parse(err) => write!(f, "parse error: {err}"),
            Self::Platform(err) => write!(f, "platform error: {err}"),
        }
    }
}

/// Caller-visible status codes
///
/// The numeric values are the shell's error numbers and are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Status {
    /// Operation failed
    Failed = 1,
    /// Message was dropped
    Drop = 2,
    /// Insufficient buffers
    NoBufs = 3,
    /// Service is busy and could not service the operation
    Busy = 5,
    /// Failed to parse message
    Parse = 6,
    /// Input arguments are invalid
    InvalidArgs = 7,
    /// Operation was aborted
    Abort = 11,
    /// Function or method is not implemented
    NotImplemented = 12,
    /// Cannot complete due to invalid state
    InvalidState = 13,
    /// No acknowledgment was received after retransmissions
    NoAck = 14,
    /// The requested item could not be found
    NotFound = 23,
    /// Operation is not supported by the platform
    NotCapable = 27,
    /// Response was not received in time
    ResponseTimeout = 28,
    /// Command is not recognized
    InvalidCommand = 35,
}

impl Status {
    /// Returns the numeric status code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Returns the name printed next to the code.
    pub fn name(self) -> &'static str {
        match self {
            Self::Failed => "Failed",
            Self::Drop => "Drop",
            Self::NoBufs => "NoBufs",
            Self::Busy => "Busy",
            Self::Parse => "Parse",
            Self::InvalidArgs => "InvalidArgs",
            Self::Abort => "Abort",
            Self::NotImplemented => "NotImplemented",
            Self::InvalidState => "InvalidState",
            Self::NoAck => "NoAck",
            Self::NotFound => "NotFound",
            Self::NotCapable => "NotCapable",
            Self::ResponseTimeout => "ResponseTimeout",
            Self::InvalidCommand => "InvalidCommand",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.code(), self.name())
    }
}

impl From<core::convert::Infallible> for Status {
    fn from(never: core::convert::Infallible) -> Self {
        match never {}
    }
}
