#![cfg_attr(not(test), no_std)]
//! RNB Shell Commands
//!
//! This crate provides the `rnb` module of an embedded networking shell. It
//! turns the subcommands a user types at the shell into calls on the radio
//! platform that hosts the RNB (radio network bridge) service.
//!
//! # Commands
//! - `help`: list the subcommands
//! - `sendrequest <length> <hexPayload>`: decode a hex payload of `length`
//!   bytes and hand it to the platform
//! - `status`: print the platform's status payload as upper-case hex
//! - `version`: print the platform's version string
//!
//! # Architecture
//! The crate is organized into several modules:
//!
//! - [`dispatcher`]: command table, lookup and handlers
//!   - [`Dispatcher`] owns the platform and a fixed receive buffer
//!   - The command table is checked for ordering at compile time
//!
//! - [`args`]: argument tokens and their parsers
//!   - Decimal and `0x` prefixed 16-bit integers
//!   - Fixed-length hex strings
//!   - Whitespace tokenizer for raw command lines
//!
//! - [`platform`]: the [`RadioPlatform`] driver interface
//!   - [`platform::spi`]: RNB co-processors attached over SPI
//!
//! - [`error`]: error taxonomy and shell status codes
//! - [`output`]: where command output goes
//! - [`hex`]: hex rendering of payloads
//!
//! # Important Notes
//! - The crate is `no_std` and never allocates
//! - All calls are blocking; there is no retry or timeout at this layer
//! - One dispatcher serves one interpreter context
//! - Enable the `defmt` feature for dispatch and error logging
//!
//! # Example
//! ```
//! use rnb_cli::{Dispatcher, Error, RadioPlatform};
//!
//! /// Echoes the last request back as the status payload.
//! struct Loopback {
//!     last: [u8; 16],
//!     len: usize,
//! }
//!
//! impl RadioPlatform for Loopback {
//!     type Error = core::convert::Infallible;
//!
//!     fn version(&self) -> &str {
//!         "loopback"
//!     }
//!
//!     fn status(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
//!         buf[..self.len].copy_from_slice(&self.last[..self.len]);
//!         Ok(self.len)
//!     }
//!
//!     fn send_request(&mut self, payload: &[u8]) -> Result<(), Self::Error> {
//!         self.last[..payload.len()].copy_from_slice(payload);
//!         self.len = payload.len();
//!         Ok(())
//!     }
//! }
//!
//! let mut rnb: Dispatcher<_, 16> = Dispatcher::new(Loopback { last: [0; 16], len: 0 });
//! let mut out = String::new();
//!
//! rnb.process_line("sendrequest 2 CAFE", &mut out)?;
//! rnb.process_line("status", &mut out)?;
//! assert_eq!(out, "CAFE\r\n");
//! # Ok::<(), Error<core::convert::Infallible>>(())
//! ```

#[macro_use]
mod fmt;

pub mod args;
pub mod dispatcher;
pub mod error;
pub mod hex;
pub mod output;
pub mod platform;

pub use args::{tokenize, Arg, MAX_ARGS};
pub use dispatcher::{find, Command, CommandKind, Dispatcher, COMMANDS, MAX_LINE_LENGTH};
pub use error::{Error, ParseError, Status};
pub use hex::HexBytes;
pub use output::Output;
pub use platform::RadioPlatform;
