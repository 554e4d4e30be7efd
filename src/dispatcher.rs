//! RNB command dispatcher
//!
//! This module maps the RNB subcommands typed at the shell onto calls into
//! the radio platform:
//!
//! | Command | Arguments | Effect |
//! |---------|-----------|--------|
//! | `help` | none | lists the subcommands |
//! | `sendrequest` | `<length> <hexPayload>` | decodes the payload and sends it |
//! | `status` | none | prints the status payload as hex |
//! | `version` | none | prints the platform version |
//!
//! Commands are looked up in [`COMMANDS`], which must stay sorted by name.
//! The ordering is checked at compile time.
//!
//! # Important Notes
//! - Lookup is an exact, case-sensitive match
//! - Nothing is printed until a command's arguments have been validated
//! - Platform errors are returned unchanged as [`Error::Platform`]

use crate::{
    args::{tokenize, Arg, MAX_ARGS},
    error::{Error, ParseError},
    hex::HexBytes,
    output::Output,
    platform::RadioPlatform,
};

/// Default receive buffer capacity, matching the shell's maximum line length
pub const MAX_LINE_LENGTH: usize = 384;

/// Handler selected by a command table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandKind {
    /// List the available subcommands
    Help,
    /// Decode a hex payload and forward it to the platform
    SendRequest,
    /// Print the platform status payload
    Status,
    /// Print the platform version string
    Version,
}

/// Command table entry
#[derive(Debug, Clone, Copy)]
pub struct Command {
    /// Name typed at the shell
    pub name: &'static str,
    /// Handler to run
    pub kind: CommandKind,
}

/// All RNB subcommands, sorted by name.
pub const COMMANDS: [Command; 4] = [
    Command { name: "help", kind: CommandKind::Help },
    Command { name: "sendrequest", kind: CommandKind::SendRequest },
    Command { name: "status", kind: CommandKind::Status },
    Command { name: "version", kind: CommandKind::Version },
];

const _: () = assert!(is_sorted(&COMMANDS), "command table is not sorted");

/// Returns `true` if every name in `table` is strictly greater than the one before it.
pub const fn is_sorted(table: &[Command]) -> bool {
    let mut i = 1;
    while i < table.len() {
        if !precedes(table[i - 1].name, table[i].name) {
            return false;
        }
        i += 1;
    }
    true
}

const fn precedes(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut i = 0;
    while i < a.len() && i < b.len() {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
        i += 1;
    }
    a.len() < b.len()
}

/// Looks up a command by its exact name.
pub fn find(name: &str) -> Option<CommandKind> {
    COMMANDS
        .binary_search_by(|command| command.name.cmp(name))
        .ok()
        .map(|index| COMMANDS[index].kind)
}

/// Shell module for the RNB service.
///
/// Owns the platform driver and a receive buffer of `N` bytes that is reused
/// by every command for decoded payloads and status results.
pub struct Dispatcher<P, const N: usize = MAX_LINE_LENGTH> {
    platform: P,
    buffer: [u8; N],
}

impl<P, const N: usize> Dispatcher<P, N> {
    /// Creates a dispatcher driving `platform`.
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            buffer: [0; N],
        }
    }

    /// Returns a reference to the platform driver.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Returns a mutable reference to the platform driver.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Consumes the dispatcher and returns the platform driver.
    pub fn release(self) -> P {
        self.platform
    }
}

impl<P, const N: usize> Dispatcher<P, N>
where
    P: RadioPlatform,
{
    /// Runs the subcommand named by the first argument.
    ///
    /// With no arguments the help listing is printed and `Ok(())` returned.
    ///
    /// # Errors
    /// * `Error::InvalidCommand` - the first argument is not a known command
    /// * any error returned by the selected command
    pub fn process<O>(&mut self, args: &[Arg<'_>], out: &mut O) -> Result<(), Error<P::Error>>
    where
        O: Output + ?Sized,
    {
        let Some((name, rest)) = args.split_first() else {
            let _ = self.process_help(args, out);
            return Ok(());
        };

        let kind = find(name.as_str()).ok_or(Error::InvalidCommand)?;
        trace!("rnb: running {}", kind);

        match kind {
            CommandKind::Help => self.process_help(rest, out),
            CommandKind::SendRequest => self.process_send_request(rest),
            CommandKind::Status => self.process_status(rest, out),
            CommandKind::Version => self.process_version(rest, out),
        }
    }

    /// Splits `line` on whitespace and runs it with [`process`](Self::process).
    ///
    /// # Errors
    /// * `Error::InvalidArgs` - the line holds more than [`MAX_ARGS`] tokens
    /// * anything [`process`](Self::process) returns
    pub fn process_line<O>(&mut self, line: &str, out: &mut O) -> Result<(), Error<P::Error>>
    where
        O: Output + ?Sized,
    {
        let mut slots = [Arg::default(); MAX_ARGS];
        let args = tokenize(line, &mut slots).map_err(|_| Error::InvalidArgs)?;
        self.process(args, out)
    }

    fn process_help<O>(&self, args: &[Arg<'_>], out: &mut O) -> Result<(), Error<P::Error>>
    where
        O: Output + ?Sized,
    {
        if !args.is_empty() {
            return Err(Error::InvalidArgs);
        }

        for command in &COMMANDS {
            out.output_line(format_args!("{}", command.name));
        }

        Ok(())
    }

    fn process_version<O>(&self, args: &[Arg<'_>], out: &mut O) -> Result<(), Error<P::Error>>
    where
        O: Output + ?Sized,
    {
        if !args.is_empty() {
            return Err(Error::InvalidArgs);
        }

        out.output_line(format_args!("{}", self.platform.version()));
        Ok(())
    }

    fn process_status<O>(&mut self, args: &[Arg<'_>], out: &mut O) -> Result<(), Error<P::Error>>
    where
        O: Output + ?Sized,
    {
        if !args.is_empty() {
            return Err(Error::InvalidArgs);
        }

        let mut len = self.platform.status(&mut self.buffer).map_err(|err| {
            debug!("rnb: status query failed");
            Error::Platform(err)
        })?;

        if len > N {
            warn!("rnb: platform reported {} status bytes, buffer holds {}", len, N);
            len = N;
        }

        out.output_line(format_args!("{}", HexBytes(&self.buffer[..len])));
        Ok(())
    }

    fn process_send_request(&mut self, args: &[Arg<'_>]) -> Result<(), Error<P::Error>> {
        let [length, payload] = args else {
            return Err(Error::InvalidArgs);
        };

        let length = usize::from(length.parse_as_u16()?);
        let request = self
            .buffer
            .get_mut(..length)
            .ok_or(ParseError::BufferTooSmall)?;
        payload.parse_as_hex_into(request)?;

        self.platform.send_request(request).map_err(|err| {
            debug!("rnb: send request of {} bytes failed", length);
            Error::Platform(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;
    use rstest::rstest;

    #[derive(Default)]
    struct FakePlatform {
        version: String,
        status: Vec<u8>,
        reported_len: Option<usize>,
        fail_with: Option<Status>,
        sent: Vec<Vec<u8>>,
    }

    impl RadioPlatform for FakePlatform {
        type Error = Status;

        fn version(&self) -> &str {
            &self.version
        }

        fn status(&mut self, buf: &mut [u8]) -> Result<usize, Status> {
            if let Some(err) = self.fail_with {
                return Err(err);
            }
            let n = self.status.len().min(buf.len());
            buf[..n].copy_from_slice(&self.status[..n]);
            Ok(self.reported_len.unwrap_or(self.status.len()))
        }

        fn send_request(&mut self, payload: &[u8]) -> Result<(), Status> {
            if let Some(err) = self.fail_with {
                return Err(err);
            }
            self.sent.push(payload.to_vec());
            Ok(())
        }
    }

    fn dispatcher() -> Dispatcher<FakePlatform> {
        Dispatcher::new(FakePlatform {
            version: "RNB-1.0.3".into(),
            status: vec![0x01, 0xAB, 0x00, 0xFF],
            ..Default::default()
        })
    }

    fn run<P: RadioPlatform, const N: usize>(
        dispatcher: &mut Dispatcher<P, N>,
        line: &str,
    ) -> (Result<(), Error<P::Error>>, String) {
        let mut out = String::new();
        let result = dispatcher.process_line(line, &mut out);
        (result, out)
    }

    #[test]
    fn command_table_is_sorted() {
        assert!(is_sorted(&COMMANDS));
    }

    #[test]
    fn unsorted_or_duplicate_tables_are_detected() {
        let swapped = [COMMANDS[1], COMMANDS[0]];
        let duplicated = [COMMANDS[0], COMMANDS[0]];
        assert!(!is_sorted(&swapped));
        assert!(!is_sorted(&duplicated));
        assert!(is_sorted(&[]));
    }

    #[rstest]
    #[case("help", Some(CommandKind::Help))]
    #[case("sendrequest", Some(CommandKind::SendRequest))]
    #[case("status", Some(CommandKind::Status))]
    #[case("version", Some(CommandKind::Version))]
    #[case("Help", None)]
    #[case("versions", None)]
    #[case("send", None)]
    #[case("", None)]
    fn finds_exact_names_only(#[case] name: &str, #[case] expected: Option<CommandKind>) {
        assert_eq!(find(name), expected);
    }

    #[test]
    fn no_arguments_prints_help() {
        let mut dispatcher = dispatcher();
        let mut out = String::new();

        assert_eq!(dispatcher.process(&[], &mut out), Ok(()));
        assert_eq!(out, "help\r\nsendrequest\r\nstatus\r\nversion\r\n");
    }

    #[rstest]
    #[case("reset")]
    #[case("VERSION")]
    #[case("stat")]
    #[case("x help")]
    fn unknown_commands_are_rejected(#[case] line: &str) {
        let (result, out) = run(&mut dispatcher(), line);
        assert_eq!(result, Err(Error::InvalidCommand));
        assert!(out.is_empty());
    }

    #[test]
    fn help_lists_commands_in_table_order() {
        let (result, out) = run(&mut dispatcher(), "help");
        assert_eq!(result, Ok(()));
        assert_eq!(out, "help\r\nsendrequest\r\nstatus\r\nversion\r\n");
    }

    #[rstest]
    #[case("help me")]
    #[case("version 1")]
    #[case("status now")]
    #[case("sendrequest")]
    #[case("sendrequest 4")]
    #[case("sendrequest 4 DEADBEEF extra")]
    fn wrong_arity_is_invalid_args(#[case] line: &str) {
        let mut dispatcher = dispatcher();
        let (result, out) = run(&mut dispatcher, line);

        assert_eq!(result, Err(Error::InvalidArgs));
        assert!(out.is_empty());
        assert!(dispatcher.platform().sent.is_empty());
    }

    #[test]
    fn empty_string_argument_counts_as_present() {
        let mut dispatcher = dispatcher();
        let mut out = String::new();
        let args = [Arg::new("version"), Arg::new("")];

        assert_eq!(dispatcher.process(&args, &mut out), Err(Error::InvalidArgs));
    }

    #[test]
    fn version_prints_platform_string() {
        let (result, out) = run(&mut dispatcher(), "version");
        assert_eq!(result, Ok(()));
        assert_eq!(out, "RNB-1.0.3\r\n");
    }

    #[test]
    fn status_prints_payload_as_upper_hex() {
        let (result, out) = run(&mut dispatcher(), "status");
        assert_eq!(result, Ok(()));
        assert_eq!(out, "01AB00FF\r\n");
    }

    #[test]
    fn empty_status_prints_empty_line() {
        let mut dispatcher: Dispatcher<_> = Dispatcher::new(FakePlatform::default());
        let (result, out) = run(&mut dispatcher, "status");
        assert_eq!(result, Ok(()));
        assert_eq!(out, "\r\n");
    }

    #[test]
    fn status_error_passes_through_without_output() {
        let mut dispatcher = dispatcher();
        dispatcher.platform_mut().fail_with = Some(Status::Busy);

        let (result, out) = run(&mut dispatcher, "status");
        assert_eq!(result, Err(Error::Platform(Status::Busy)));
        assert!(out.is_empty());
    }

    #[test]
    fn status_length_is_clamped_to_buffer() {
        let mut dispatcher: Dispatcher<_, 2> = Dispatcher::new(FakePlatform {
            status: vec![0x12, 0x34, 0x56],
            reported_len: Some(3),
            ..Default::default()
        });

        let (result, out) = run(&mut dispatcher, "status");
        assert_eq!(result, Ok(()));
        assert_eq!(out, "1234\r\n");
    }

    #[test]
    fn send_request_forwards_decoded_payload() {
        let mut dispatcher = dispatcher();
        let (result, out) = run(&mut dispatcher, "sendrequest 4 DEADBEEF");

        assert_eq!(result, Ok(()));
        assert!(out.is_empty());
        assert_eq!(dispatcher.platform().sent, vec![vec![0xDE, 0xAD, 0xBE, 0xEF]]);
    }

    #[test]
    fn send_request_of_zero_bytes() {
        let mut dispatcher = dispatcher();
        let args = [Arg::new("sendrequest"), Arg::new("0"), Arg::new("")];

        assert_eq!(dispatcher.process(&args, &mut String::new()), Ok(()));
        assert_eq!(dispatcher.platform().sent, vec![Vec::<u8>::new()]);
    }

    #[rstest]
    #[case("sendrequest four DEADBEEF", ParseError::InvalidNumber)]
    #[case("sendrequest 70000 DEADBEEF", ParseError::Overflow)]
    #[case("sendrequest 4 DEADBEEZ", ParseError::InvalidHex)]
    #[case("sendrequest 4 DEADBE", ParseError::LengthMismatch)]
    #[case("sendrequest 3 DEADBEEF", ParseError::LengthMismatch)]
    fn send_request_parse_failures(#[case] line: &str, #[case] expected: ParseError) {
        let mut dispatcher = dispatcher();
        let (result, _) = run(&mut dispatcher, line);

        assert_eq!(result, Err(Error::Parse(expected)));
        assert!(dispatcher.platform().sent.is_empty());
    }

    #[test]
    fn send_request_longer_than_buffer_is_a_parse_error() {
        let mut dispatcher: Dispatcher<_, 2> = Dispatcher::new(FakePlatform::default());
        let (result, _) = run(&mut dispatcher, "sendrequest 3 AABBCC");

        assert_eq!(result, Err(Error::Parse(ParseError::BufferTooSmall)));
        assert!(dispatcher.platform().sent.is_empty());
    }

    #[test]
    fn send_request_platform_error_passes_through() {
        let mut dispatcher = dispatcher();
        dispatcher.platform_mut().fail_with = Some(Status::NoAck);

        let (result, _) = run(&mut dispatcher, "sendrequest 1 7F");
        assert_eq!(result, Err(Error::Platform(Status::NoAck)));
        assert_eq!(result.unwrap_err().status(), Status::NoAck);
    }

    #[test]
    fn payload_fills_whole_buffer_and_round_trips_through_status() {
        let payload: Vec<u8> = (0..MAX_LINE_LENGTH).map(|i| (i * 7) as u8).collect();
        let line = format!("sendrequest {} {}", payload.len(), HexBytes(&payload));
        let mut dispatcher = dispatcher();

        let (result, _) = run(&mut dispatcher, &line);
        assert_eq!(result, Ok(()));
        assert_eq!(dispatcher.platform().sent[0], payload);

        let echoed = dispatcher.platform().sent[0].clone();
        dispatcher.platform_mut().status = echoed;
        let (result, out) = run(&mut dispatcher, "status");
        assert_eq!(result, Ok(()));
        assert_eq!(out.trim_end(), HexBytes(&payload).to_string());
    }

    #[test]
    fn too_many_tokens_is_invalid_args() {
        let line = "help ".repeat(MAX_ARGS + 1);
        let (result, out) = run(&mut dispatcher(), &line);
        assert_eq!(result, Err(Error::InvalidArgs));
        assert!(out.is_empty());
    }

    #[test]
    fn dispatcher_accepts_borrowed_platform_and_dyn_output() {
        let mut platform = FakePlatform {
            version: "borrowed".into(),
            ..Default::default()
        };
        let mut text = String::new();
        {
            let mut dispatcher: Dispatcher<&mut FakePlatform, 16> = Dispatcher::new(&mut platform);
            let out: &mut dyn Output = &mut text;
            dispatcher.process(&[Arg::new("version")], out).unwrap();
        }
        assert_eq!(text, "borrowed\r\n");
    }
}
