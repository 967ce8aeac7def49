//! Logging helpers for user-supplied strings (ids, item names) so log lines
//! stay single-line and readable.

/// Escape a string for single-line logging: newlines, carriage returns, tabs
/// and backslashes become their escape sequences, other control characters
/// become `\xNN`. Strings longer than the preview cap are truncated with an
/// ellipsis to keep log noise down.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 120;
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
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
