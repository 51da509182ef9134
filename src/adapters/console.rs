//! Serial console adapter.
//!
//! Turns the UART byte stream into [`AppCommand`]s.  Bytes accumulate in
//! a fixed-capacity line buffer; each newline yields at most one command.
//! Lines longer than the buffer are dropped whole.

use heapless::String;
use log::warn;

use crate::app::commands::AppCommand;

/// Longest accepted command line, excluding the terminator.
pub const LINE_CAPACITY: usize = 32;

#[derive(Default)]
pub struct ConsoleLineBuffer {
    line: String<LINE_CAPACITY>,
    overflowed: bool,
}

impl ConsoleLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte.  Returns a command when a complete, valid line ends.
    pub fn feed(&mut self, byte: u8) -> Option<AppCommand> {
        match byte {
            b'\r' | b'\n' => self.finish_line(),
            b if b.is_ascii() && !b.is_ascii_control() => {
                if !self.overflowed && self.line.push(char::from(b)).is_err() {
                    self.overflowed = true;
                }
                None
            }
            _ => None,
        }
    }

    fn finish_line(&mut self) -> Option<AppCommand> {
        let overflowed = core::mem::take(&mut self.overflowed);
        let cmd = if overflowed || self.line.is_empty() {
            None
        } else {
            let parsed = AppCommand::parse(&self.line);
            if parsed.is_none() {
                warn!("console: unknown command '{}'", self.line.as_str());
            }
            parsed
        };
        self.line.clear();
        cmd
    }
}

// ── UART0 polling ─────────────────────────────────────────────

/// Non-blocking byte reader.  Returns how many bytes were written into
/// `buf`; 0 means nothing is pending.
pub trait ByteReader {
    fn read_bytes(&mut self, buf: &mut [u8]) -> usize;
}

/// UART0 RX ring buffer installed by `hw_init`.
#[cfg(target_os = "espidf")]
pub struct Uart0;

#[cfg(target_os = "espidf")]
impl ByteReader for Uart0 {
    fn read_bytes(&mut self, buf: &mut [u8]) -> usize {
        crate::drivers::hw_init::uart0_read(buf)
    }
}

const CHUNK: usize = 16;

/// Polled reader feeding a [`ConsoleLineBuffer`].
///
/// Bytes left in a chunk after a command completes are kept and consumed
/// first on the next poll.
#[derive(Default)]
pub struct UartConsole {
    buffer: ConsoleLineBuffer,
    chunk: [u8; CHUNK],
    pos: usize,
    len: usize,
}

impl UartConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next command from UART0, if one is complete.
    #[cfg(target_os = "espidf")]
    pub fn poll(&mut self) -> Option<AppCommand> {
        self.poll_from(&mut Uart0)
    }

    /// Host builds have no UART; use [`poll_from`](Self::poll_from) or
    /// [`feed`](Self::feed).
    #[cfg(not(target_os = "espidf"))]
    pub fn poll(&mut self) -> Option<AppCommand> {
        None
    }

    /// Drain pending bytes from `reader` and return the first command found.
    pub fn poll_from(&mut self, reader: &mut impl ByteReader) -> Option<AppCommand> {
        loop {
            while self.pos < self.len {
                let b = self.chunk[self.pos];
                self.pos += 1;
                if let Some(cmd) = self.buffer.feed(b) {
                    return Some(cmd);
                }
            }
            self.len = reader.read_bytes(&mut self.chunk).min(CHUNK);
            self.pos = 0;
            if self.len == 0 {
                return None;
            }
        }
    }

    pub fn feed(&mut self, byte: u8) -> Option<AppCommand> {
        self.buffer.feed(byte)
    }
}
