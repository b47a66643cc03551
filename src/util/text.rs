use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to truncated text, 3 columns wide.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Largest prefix of `s` at most `width` columns wide, as a byte index.
fn prefix_fitting(s: &str, width: usize) -> usize {
    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }
    end
}

/// Truncate a string to fit within a maximum display width, appending "..."
/// when text was cut off.
///
/// Unicode-aware: CJK and emoji count as 2 columns, combining marks as 0.
/// Game titles routinely mix all three. Borrows when the string already
/// fits, since card rendering calls this for every visible row. Widths of 3
/// columns or less get as many characters as fit with no ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(s[..prefix_fitting(s, max_width)].to_string());
    }
    let end = prefix_fitting(s, max_width - ELLIPSIS_WIDTH);
    let mut out = String::with_capacity(end + ELLIPSIS.len());
    out.push_str(&s[..end]);
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Tab, LF and CR survive; every other byte below 0x20, DEL and ESC do not.
fn is_banned(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && !matches!(b, 0x09 | 0x0a | 0x0d))
}

/// Strip terminal control characters and ANSI escape sequences from text.
///
/// App titles and developer names come from store scrapes and are rendered
/// verbatim in the terminal; a title containing escape sequences must not be
/// able to move the cursor or retitle the window. CSI sequences (`\x1b[`)
/// are dropped through their final byte, OSC sequences (`\x1b]`) through BEL
/// or ST, and a bare ESC is dropped alone.
///
/// Returns `Cow::Borrowed` when the input contains no control characters,
/// the common case.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    if !bytes.iter().any(|&b| is_banned(b)) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b == 0x1b {
            if i + 1 < len && bytes[i + 1] == b'[' {
                // CSI: skip parameter bytes until the final byte 0x40-0x7e
                i += 2;
                while i < len {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break;
                    }
                }
            } else if i + 1 < len && bytes[i + 1] == b']' {
                // OSC: skip everything until BEL or ST
                i += 2;
                while i < len {
                    if bytes[i] == 0x07 {
                        i += 1;
                        break;
                    }
                    if bytes[i] == 0x1b && i + 1 < len && bytes[i + 1] == b'\\' {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            } else {
                i += 1;
            }
        } else if is_banned(b) {
            i += 1;
        } else {
            // Copy the run of safe bytes in one go. Banned bytes are all
            // ASCII and cannot appear mid-codepoint in valid UTF-8, so
            // s[start..i] stays on char boundaries.
            let start = i;
            i += 1;
            while i < len && !is_banned(bytes[i]) {
                i += 1;
            }
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_is_width_aware() {
        // ASCII: "Merge Dragons Saga" = 18 cols, max 12 -> target 9
        assert_eq!(truncate_to_width("Merge Dragons Saga", 12), "Merge Dra...");
        // CJK characters are 2 columns: "天天爱消除" = 10 cols, max 7 -> target 4
        assert_eq!(truncate_to_width("天天爱消除", 7), "天天...");
        // Emoji are 2 columns: "Cats 🐱 Tower" = 13 cols, max 10 -> target 7
        assert_eq!(truncate_to_width("Cats 🐱 Tower", 10), "Cats 🐱...");
    }

    #[test]
    fn test_fitting_text_is_untouched() {
        assert_eq!(truncate_to_width("Short", 10), "Short");
        assert_eq!(truncate_to_width("12345", 5), "12345");
        assert!(matches!(truncate_to_width("Short", 10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_narrow_widths_get_no_ellipsis() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 2), "Te");
        assert_eq!(truncate_to_width("Hi", 3), "Hi");
        // A 2-column char does not fit in 1 column
        assert_eq!(truncate_to_width("天天", 1), "");
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let result = strip_control_chars("Royal Match");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "Royal Match");
    }

    #[test]
    fn test_strip_preserves_tabs_newlines_cr() {
        let input = "line1\nline2\ttabbed\r\nwindows";
        assert_eq!(strip_control_chars(input), input);
    }

    #[test]
    fn test_strip_removes_control_bytes() {
        assert_eq!(
            strip_control_chars("he\x00ll\x07o\x08 w\x0bor\x0cld\x01!"),
            "hello world!"
        );
    }

    #[test]
    fn test_strip_ansi_color_codes() {
        assert_eq!(strip_control_chars("\x1b[31mRed title\x1b[0m"), "Red title");
    }

    #[test]
    fn test_strip_osc_with_bel_and_st() {
        assert_eq!(
            strip_control_chars("\x1b]0;malicious title\x07safe text"),
            "safe text"
        );
        assert_eq!(
            strip_control_chars("\x1b]0;malicious title\x1b\\safe text"),
            "safe text"
        );
    }

    #[test]
    fn test_strip_bare_esc() {
        assert_eq!(strip_control_chars("before\x1bafter"), "beforeafter");
    }

    #[test]
    fn test_strip_unicode_preserved() {
        assert_eq!(
            strip_control_chars("日本語 \x1b[31m赤い\x1b[0m ゲーム"),
            "日本語 赤い ゲーム"
        );
    }
}
