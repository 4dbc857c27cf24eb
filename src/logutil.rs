//! Logging utilities for sanitizing player/config strings so logs stay single-line,
//! plus the debug-toggle helper used by the join and grant paths.
//! Escapes control characters that otherwise break log readability.

use log::{debug, info};

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///   Truncates very long strings (over `max_preview`) with an ellipsis to cap log noise.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 300;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                // Represent other control chars as hex \xNN
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Emit a debug line. With `debug.enabled` set in config the line is promoted
/// to `info` so operators see it without raising the global log level.
pub fn debug_log(enabled: bool, message: &str) {
    if enabled {
        info!("[debug] {}", message);
    } else {
        debug!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::escape_log;

    #[test]
    fn escapes_newlines_and_tabs() {
        let s = "Steve\nop\r\tme";
        assert_eq!(escape_log(s), "Steve\\nop\\r\\tme");
    }

    #[test]
    fn escapes_control_chars_and_truncates() {
        assert_eq!(escape_log("a\u{7}b"), "a\\x07b");
        let long = "x".repeat(400);
        let esc = escape_log(&long);
        assert_eq!(esc.chars().count(), 301);
        assert!(esc.ends_with('…'));
    }
}
