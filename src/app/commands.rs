//! Inbound commands to the application service.
//!
//! Operator requests arriving over the serial console.  Each line is one
//! command:
//!
//! ```text
//! mode calm      force a mode (fresh dwell)
//! auto off       freeze the current mode
//! auto on        resume autonomous selection
//! status         emit a status snapshot now
//! ```

use core::str::FromStr;

use crate::fsm::Mode;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Enter a specific mode immediately.
    ForceMode(Mode),

    /// Enable or disable autonomous mode transitions.
    SetAutonomous(bool),

    /// Emit a status snapshot immediately.
    Status,
}

impl AppCommand {
    /// Parse one console line.  Unknown or malformed lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let verb = words.next()?;
        let arg = words.next();
        if words.next().is_some() {
            return None;
        }

        if verb.eq_ignore_ascii_case("mode") {
            return arg.and_then(|a| Mode::from_str(a).ok()).map(Self::ForceMode);
        }
        if verb.eq_ignore_ascii_case("auto") {
            return match arg {
                Some(a) if a.eq_ignore_ascii_case("on") => Some(Self::SetAutonomous(true)),
                Some(a) if a.eq_ignore_ascii_case("off") => Some(Self::SetAutonomous(false)),
                _ => None,
            };
        }
        if verb.eq_ignore_ascii_case("status") && arg.is_none() {
            return Some(Self::Status);
        }
        None
    }
}
