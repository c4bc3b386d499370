//! Soft-wrap logic for splitting logical lines into visual lines.
//!
//! Provides functions for wrapping text to a given display width,
//! accounting for double-width characters (CJK, emoji). Used by
//! [`crate::widget::TextArea`] to render wrapped text with line numbers.

use crate::text_buffer::TextBuffer;
use unicode_width::UnicodeWidthChar;

/// How a logical line is broken into visual lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WrapMode {
    /// No wrapping: the logical line is a single visual line, however wide.
    None,
    /// Break strictly at the display-width boundary, ignoring word breaks.
    Char,
    /// Break at whitespace when possible, falling back to `Char` for a
    /// single word that exceeds the width on its own.
    Word,
}

/// A single visual line resulting from soft-wrapping a logical line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WrapLine {
    /// The text content of this visual line.
    pub text: String,
    /// The index of the logical line this visual line belongs to.
    pub logical_line: usize,
    /// The character offset within the logical line where this visual
    /// line starts.
    pub start_col: usize,
}

/// The result of wrapping an entire buffer.
#[derive(Clone, Debug)]
pub struct WrapResult {
    /// All visual lines in display order.
    pub lines: Vec<WrapLine>,
    /// The width in characters needed for line number display.
    pub line_number_width: u16,
}

/// Wrap a single line of text to the given display width.
///
/// Returns a list of `(text, start_col)` pairs. The text for each
/// visual line and the character offset within the original line.
///
/// The algorithm:
/// 1. Break at word boundaries (whitespace) when possible.
/// 2. Fall back to character boundary for words longer than `width`.
/// 3. Respects display width (CJK = 2, emoji = 2).
/// 4. Never splits multi-byte characters.
pub fn wrap_line(text: &str, width: usize) -> Vec<(String, usize)> {
    if width == 0 {
        return vec![(text.to_string(), 0)];
    }

    if text.is_empty() {
        return vec![(String::new(), 0)];
    }

    let mut result = Vec::new();
    let mut current_line = String::new();
    let mut current_width: usize = 0;
    let mut line_start_col: usize = 0;

    for (char_col, ch) in text.chars().enumerate() {
        let ch_width = ch.width().unwrap_or(0);

        if current_width + ch_width > width && !current_line.is_empty() {
            // Need to wrap — try to find a word boundary to break at
            if let Some(space_byte_idx) = find_last_space(&current_line) {
                // Break at the last space
                let before: String = current_line[..space_byte_idx].to_string();
                let after: String = current_line[space_byte_idx..].trim_start().to_string();
                let before_char_count = before.chars().count();
                result.push((before, line_start_col));
                current_width = display_width_of(&after);
                line_start_col +=
                    before_char_count + count_trimmed_spaces(&current_line[space_byte_idx..]);
                current_line = after;
            } else {
                // No space found — break at character boundary
                result.push((current_line.clone(), line_start_col));
                line_start_col = char_col;
                current_line = String::new();
                current_width = 0;
            }
        }

        current_line.push(ch);
        current_width += ch_width;
    }

    if !current_line.is_empty() || result.is_empty() {
        result.push((current_line, line_start_col));
    }

    result
}

/// Wrap a single line of text to the given display width using an explicit
/// [`WrapMode`]. `wrap_line` is the `Word`-mode case of this, kept as its
/// own function for source compatibility with existing call sites.
pub fn wrap_line_mode(text: &str, width: usize, mode: WrapMode) -> Vec<(String, usize)> {
    match mode {
        WrapMode::None => vec![(text.to_string(), 0)],
        WrapMode::Word => wrap_line(text, width),
        WrapMode::Char => wrap_line_char(text, width),
    }
}

/// Break strictly at the display-width boundary; never looks for a word
/// break. Used by [`WrapMode::Char`] and as the long-word fallback inside
/// [`wrap_line`]'s word-wrap algorithm.
fn wrap_line_char(text: &str, width: usize) -> Vec<(String, usize)> {
    if width == 0 || text.is_empty() {
        return vec![(text.to_string(), 0)];
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut current_width: usize = 0;
    let mut start_col = 0;

    for (char_col, ch) in text.chars().enumerate() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > width && !current.is_empty() {
            result.push((current.clone(), start_col));
            start_col = char_col;
            current = String::new();
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }

    if !current.is_empty() || result.is_empty() {
        result.push((current, start_col));
    }

    result
}

/// Wrap all lines of a text buffer to the given display width, using the
/// default `Word` wrap mode. See [`wrap_lines_mode`] to choose a mode.
pub fn wrap_lines(buffer: &TextBuffer, width: usize) -> WrapResult {
    wrap_lines_mode(buffer, width, WrapMode::Word)
}

/// Wrap all lines of a text buffer to the given display width and mode.
pub fn wrap_lines_mode(buffer: &TextBuffer, width: usize, mode: WrapMode) -> WrapResult {
    let total_lines = buffer.line_count();
    let mut lines = Vec::new();

    for line_idx in 0..total_lines {
        if let Some(line_text) = buffer.line(line_idx) {
            let wrapped = wrap_line_mode(&line_text, width, mode);
            for (text, start_col) in wrapped {
                lines.push(WrapLine {
                    text,
                    logical_line: line_idx,
                    start_col,
                });
            }
        }
    }

    let lnw = line_number_width(total_lines);
    WrapResult {
        lines,
        line_number_width: lnw,
    }
}

/// Calculate the width in characters needed for line number display.
///
/// Returns the number of digits needed to display the largest line
/// number (1-based).
pub fn line_number_width(line_count: usize) -> u16 {
    if line_count == 0 {
        return 1;
    }
    let digits = (line_count as f64).log10().floor() as u16 + 1;
    digits.max(1)
}

/// Calculate the display width of a string.
fn display_width_of(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Find the byte index of the last space character in a string.
fn find_last_space(text: &str) -> Option<usize> {
    text.rfind(' ')
}

/// Count spaces at the start of a string (for trimming calculation).
fn count_trimmed_spaces(text: &str) -> usize {
    text.chars().take_while(|c| *c == ' ').count()
}
