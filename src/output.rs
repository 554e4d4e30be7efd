//! Output sink for command results

use core::fmt;

/// Receives the lines a command prints.
///
/// The shell interpreter owns line formatting and the transport to the
/// user. Commands only ever emit whole lines.
pub trait Output {
    /// Emits one line of output.
    fn output_line(&mut self, line: fmt::Arguments<'_>);
}

/// Any text writer can act as the output, with lines terminated by `"\r\n"`.
///
/// Write errors are dropped; the writer's owner is responsible for its
/// transport.
impl<W: fmt::Write> Output for W {
    fn output_line(&mut self, line: fmt::Arguments<'_>) {
        let _ = self.write_fmt(line);
        let _ = self.write_str("\r\n");
    }
}
