use std::io::{self, Write};

const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

/// Direction of a protocol line, from the server's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Received from the client.
    Read,
    /// Sent to the client.
    Write,
}

/// Human-oriented dump of the raw protocol dialogue.
///
/// Lines are indented and, when color is on, tinted by direction (green
/// for reads, cyan for writes) so interleaved traffic stays readable.
/// Output goes straight to stdout: this is inspection output, not logging.
#[derive(Clone, Copy, Debug)]
pub struct Transcript {
    enabled: bool,
    color: bool,
}

impl Transcript {
    pub fn new(enabled: bool, color: bool) -> Self {
        Self { enabled, color }
    }

    /// A transcript that never emits anything.
    pub fn disabled() -> Self {
        Self::new(false, false)
    }

    /// Record one raw protocol line.
    pub fn line(&self, direction: Direction, raw: &[u8]) {
        if !self.enabled {
            return;
        }
        let text = format_line(raw);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let _ = if self.color {
            let tint = match direction {
                Direction::Read => GREEN,
                Direction::Write => CYAN,
            };
            writeln!(out, "{}  {}{}", tint, text, RESET)
        } else {
            writeln!(out, "  {}", text)
        };
    }
}

// Indent continuation lines so multi-line data stays visually grouped.
fn format_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .replace("\r\n", "\n")
        .trim_end_matches('\n')
        .replace('\n', "\n  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_terminator() {
        assert_eq!(format_line(b"NOOP\r\n"), "NOOP");
    }

    #[test]
    fn indents_continuations() {
        assert_eq!(
            format_line(b"250-first\r\n250 second\r\n"),
            "250-first\n  250 second"
        );
    }

    #[test]
    fn keeps_non_utf8_lines_printable() {
        let formatted = format_line(b"MAIL FROM:<\xff@x>\r\n");
        assert!(formatted.starts_with("MAIL FROM:<"));
        assert!(!formatted.ends_with('\n'));
    }
}
